use crate::assets::AssetStore;
use crate::config::constants::{
    BURST_ALPHA_FROM, BURST_DISTANCE_PX, BURST_DURATION_MS, BURST_SCALE_TO,
};
use crate::engine::{Point, Renderer};
use crate::tween::{lerp, Ease, Progress, Tween};
use std::f32::consts::TAU;

const RAINBOW: [u32; 7] = [
    0xff0000, 0xff7f00, 0xffff00, 0x00ff00, 0x00ffff, 0x0000ff, 0x8b00ff,
];

/// One tinted copy of the source texture.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BurstClone {
    pub center: Point,
    pub scale: f32,
    pub alpha: f32,
    pub tint: u32,
}

/// Rainbow copies of a widget flying outward, drawn behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct Burst {
    texture: String,
    center: Point,
    scale: f32,
    tween: Tween,
}

impl Burst {
    pub fn new(texture: &str, center: Point, scale: f32) -> Self {
        Burst {
            texture: texture.to_string(),
            center,
            scale,
            tween: Tween::new(0.0, 1.0, BURST_DURATION_MS, Ease::QuadOut),
        }
    }

    /// Returns false once the burst has faded out.
    pub fn update(&mut self, dt_ms: f32) -> bool {
        matches!(self.tween.update(dt_ms), Progress::InProgress(_))
    }

    pub fn clones(&self) -> impl Iterator<Item = BurstClone> + '_ {
        let t = self.tween.value();
        RAINBOW.iter().enumerate().map(move |(i, tint)| {
            let angle = i as f32 / RAINBOW.len() as f32 * TAU;
            BurstClone {
                center: self.center.offset(
                    angle.cos() * BURST_DISTANCE_PX * t,
                    angle.sin() * BURST_DISTANCE_PX * t,
                ),
                scale: self.scale * lerp(1.0, BURST_SCALE_TO, t),
                alpha: lerp(BURST_ALPHA_FROM, 0.0, t),
                tint: *tint,
            }
        })
    }

    pub fn draw(&self, renderer: &Renderer, assets: &AssetStore, alpha: f32) {
        let Some(image) = assets.get(&self.texture) else {
            return;
        };
        renderer.additive(|renderer| {
            for clone in self.clones() {
                renderer.draw_image_tinted(
                    image,
                    clone.center,
                    clone.scale,
                    clone.tint,
                    clone.alpha * alpha,
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn clones_start_on_the_widget_and_end_invisible_and_spread() {
        let mut burst = Burst::new("cs_left", Point::new(44.0, 479.0), 1.0);
        let start: Vec<BurstClone> = burst.clones().collect();
        assert_eq!(start.len(), 7);
        assert!(start.iter().all(|clone| clone.center == Point::new(44.0, 479.0)));
        assert_relative_eq!(start[0].alpha, BURST_ALPHA_FROM);

        assert!(burst.update(BURST_DURATION_MS / 2.0));
        assert!(!burst.update(BURST_DURATION_MS / 2.0));
        for clone in burst.clones() {
            let dx = clone.center.x - 44.0;
            let dy = clone.center.y - 479.0;
            assert_relative_eq!((dx * dx + dy * dy).sqrt(), BURST_DISTANCE_PX, epsilon = 1e-3);
            assert_relative_eq!(clone.scale, BURST_SCALE_TO);
            assert_relative_eq!(clone.alpha, 0.0);
        }
    }
}
