//! Persistent backdrop behind every in-phone screen.
//!
//! Draw order, back to front:
//! sky -> pulse + scanlines -> centre light -> tunnel -> particles -> phone frame
//!
//! The phone frame is the start menu's bezel image. Zooming out scales it up
//! around the phone screen until only the screen is left, zooming in plays
//! the same transform backwards.
mod particles;
mod tunnel;

pub use self::particles::{Particle, ParticleField};

use crate::config::constants::*;
use crate::engine::{Image, Point, Rect, Renderer};
use crate::tween::{Ease, Progress, Tween};
use rand::Rng;

/// Placement of the phone frame image, origin top left.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PhoneTransform {
    pub position: Point,
    pub scale: f32,
    pub alpha: f32,
}

impl PhoneTransform {
    pub const REST: PhoneTransform = PhoneTransform {
        position: Point { x: 0.0, y: 0.0 },
        scale: 1.0,
        alpha: 1.0,
    };

    /// `t` = 0 is the frame at rest, 1 is zoomed until the screen covers the canvas.
    pub fn at(t: f32) -> Self {
        let target_scale = (GAME_W / SCREEN_W).max(GAME_H / SCREEN_H);
        let scale = 1.0 + (target_scale - 1.0) * t;
        let screen_center_x = SCREEN_X + SCREEN_W / 2.0;
        let screen_center_y = SCREEN_Y + SCREEN_H / 2.0;
        PhoneTransform {
            position: Point {
                x: GAME_W / 2.0 - screen_center_x * scale,
                y: GAME_H / 2.0 - screen_center_y * scale,
            },
            scale,
            alpha: 1.0 - t * 0.8,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Zoom {
    Resting,
    Out(Tween),
    In(Tween),
}

#[derive(Debug, Clone)]
pub struct BackgroundAnimator {
    visible: bool,
    phone_frame_visible: bool,
    zoom: Zoom,
    transform: PhoneTransform,
    particles: ParticleField,
    ring_offset: f32,
    time_ms: f32,
}

impl Default for BackgroundAnimator {
    fn default() -> Self {
        BackgroundAnimator::new()
    }
}

impl BackgroundAnimator {
    pub fn new() -> Self {
        BackgroundAnimator {
            visible: false,
            phone_frame_visible: true,
            zoom: Zoom::Resting,
            transform: PhoneTransform::REST,
            particles: ParticleField::default(),
            ring_offset: 0.0,
            time_ms: 0.0,
        }
    }

    /// Hiding drops every bit of animation state.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.particles.reset();
            self.ring_offset = 0.0;
            self.time_ms = 0.0;
            self.zoom = Zoom::Resting;
            self.transform = PhoneTransform::REST;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// A running zoom-out already ends with the frame hidden, so hiding it
    /// then only waits for that.
    pub fn set_phone_frame_visible(&mut self, visible: bool) {
        if !visible && matches!(self.zoom, Zoom::Out(_)) {
            return;
        }
        self.phone_frame_visible = visible;
        self.zoom = Zoom::Resting;
        self.transform = PhoneTransform::REST;
    }

    pub fn is_phone_frame_visible(&self) -> bool {
        self.phone_frame_visible
    }

    pub fn is_zooming(&self) -> bool {
        !matches!(self.zoom, Zoom::Resting)
    }

    /// Returns false when a zoom is already running.
    pub fn start_zoom_out(&mut self) -> bool {
        if self.is_zooming() {
            return false;
        }
        self.zoom = Zoom::Out(Tween::new(0.0, 1.0, PHONE_ZOOM_OUT_MS, Ease::QuadOut));
        true
    }

    /// Shows the frame fully zoomed out, then brings it back to rest.
    pub fn start_zoom_in(&mut self) -> bool {
        if self.is_zooming() {
            return false;
        }
        self.phone_frame_visible = true;
        self.zoom = Zoom::In(Tween::new(1.0, 0.0, PHONE_ZOOM_IN_MS, Ease::QuadIn));
        self.transform = PhoneTransform::at(1.0);
        true
    }

    /// `None` while the frame is hidden.
    pub fn phone_transform(&self) -> Option<PhoneTransform> {
        (self.visible && self.phone_frame_visible).then_some(self.transform)
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn update<R: Rng + ?Sized>(&mut self, dt_ms: f32, rng: &mut R) {
        if !self.visible {
            return;
        }
        self.time_ms += dt_ms;
        self.update_zoom(dt_ms);

        self.ring_offset += RING_SCROLL_SPEED * dt_ms / 1000.0;
        if self.ring_offset >= 1.0 {
            self.ring_offset -= 1.0;
        }
        self.particles.update(dt_ms, rng);
    }

    fn update_zoom(&mut self, dt_ms: f32) {
        match &mut self.zoom {
            Zoom::Resting => {}
            Zoom::Out(tween) => match tween.update(dt_ms) {
                Progress::InProgress(t) => self.transform = PhoneTransform::at(t),
                Progress::Done(_) => {
                    log::debug!("Phone zoom-out done");
                    self.zoom = Zoom::Resting;
                    self.phone_frame_visible = false;
                    self.transform = PhoneTransform::REST;
                }
            },
            Zoom::In(tween) => match tween.update(dt_ms) {
                Progress::InProgress(t) => self.transform = PhoneTransform::at(t),
                Progress::Done(_) => {
                    log::debug!("Phone zoom-in done");
                    self.zoom = Zoom::Resting;
                    self.transform = PhoneTransform::REST;
                }
            },
        }
    }

    pub fn draw(&self, renderer: &Renderer, phone_frame: Option<&Image>) {
        if !self.visible {
            return;
        }
        tunnel::draw(renderer, self.ring_offset, self.time_ms);
        self.particles.draw(renderer);

        if let (Some(transform), Some(image)) = (self.phone_transform(), phone_frame) {
            let destination = Rect::new(transform.position, image.size().scaled(transform.scale));
            renderer.draw_image_in(image, &destination, transform.alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn visible() -> BackgroundAnimator {
        let mut background = BackgroundAnimator::new();
        background.set_visible(true);
        background
    }

    #[test]
    fn fully_zoomed_frame_centres_the_screen_on_the_canvas() {
        let transform = PhoneTransform::at(1.0);
        assert_relative_eq!(transform.scale, 1.35, epsilon = 1e-6);
        let screen_center_x = transform.position.x + (SCREEN_X + SCREEN_W / 2.0) * transform.scale;
        let screen_center_y = transform.position.y + (SCREEN_Y + SCREEN_H / 2.0) * transform.scale;
        assert_relative_eq!(screen_center_x, GAME_W / 2.0, epsilon = 1e-3);
        assert_relative_eq!(screen_center_y, GAME_H / 2.0, epsilon = 1e-3);
        assert_relative_eq!(transform.alpha, 0.2, epsilon = 1e-6);
    }

    #[test]
    fn zoom_out_hides_the_frame_when_done() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut background = visible();
        assert!(background.start_zoom_out());
        assert!(!background.start_zoom_in());

        background.update(PHONE_ZOOM_OUT_MS / 2.0, &mut rng);
        let halfway = background.phone_transform().unwrap();
        // ease-out is past the linear midpoint
        assert!(halfway.scale > PhoneTransform::at(0.5).scale);

        background.update(PHONE_ZOOM_OUT_MS / 2.0, &mut rng);
        assert!(!background.is_zooming());
        assert!(background.phone_transform().is_none());
    }

    #[test]
    fn hiding_the_frame_mid_zoom_out_lets_the_zoom_finish() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut background = visible();
        background.start_zoom_out();
        background.update(400.0, &mut rng);
        background.set_phone_frame_visible(false);
        assert!(background.is_zooming());
        assert!(background.phone_transform().is_some());
        background.update(400.0, &mut rng);
        assert!(!background.is_phone_frame_visible());
    }

    #[test]
    fn zoom_in_starts_zoomed_and_comes_to_rest() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut background = visible();
        background.set_phone_frame_visible(false);
        assert!(background.start_zoom_in());
        assert_eq!(background.phone_transform(), Some(PhoneTransform::at(1.0)));

        background.update(PHONE_ZOOM_IN_MS / 2.0, &mut rng);
        // ease-in still close to the zoomed end
        assert!(background.phone_transform().unwrap().scale > PhoneTransform::at(0.5).scale);

        background.update(PHONE_ZOOM_IN_MS, &mut rng);
        assert_eq!(background.phone_transform(), Some(PhoneTransform::REST));
    }

    #[test]
    fn hiding_the_background_resets_everything() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut background = visible();
        background.start_zoom_out();
        background.update(500.0, &mut rng);
        assert!(!background.particles().particles().is_empty());

        background.set_visible(false);
        assert!(!background.is_zooming());
        assert!(background.particles().particles().is_empty());
        background.update(500.0, &mut rng);
        assert!(background.particles().particles().is_empty());
    }
}
