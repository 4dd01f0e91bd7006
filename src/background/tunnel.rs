//! Static geometry of the tunnel backdrop. Near rect is the whole canvas,
//! far rect is a small box around the focal point, everything in between is
//! interpolated with a depth curve.
use crate::config::constants::*;
use crate::engine::{Point, Rect, Renderer, Size};
use crate::tween::lerp;
use std::f32::consts::TAU;

const GLOW_COLOR: u32 = 0x8888ff;
const GLOW_LAYERS: usize = 4;

pub fn near_rect() -> Rect {
    Rect::new(Point::new(0.0, 0.0), Size::new(GAME_W, GAME_H))
}

pub fn far_rect() -> Rect {
    Rect::from_center(Point::new(FOCAL_X, FOCAL_Y), Size::new(FAR_W, FAR_H))
}

/// Per channel blend of two 0xRRGGBB colours.
pub fn mix_color(from: u32, to: u32, t: f32) -> u32 {
    let channel = |shift: u32| {
        let a = ((from >> shift) & 0xff) as f32;
        let b = ((to >> shift) & 0xff) as f32;
        (lerp(a, b, t.clamp(0.0, 1.0)).round() as u32) << shift
    };
    channel(16) | channel(8) | channel(0)
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ring {
    pub rect: Rect,
    /// 0 at the canvas edge, 1 at the focal box
    pub depth: f32,
    pub color: u32,
    pub alpha: f32,
    pub width: f32,
}

/// Ring `index` of `0..=RING_COUNT`, `offset` in `0..1` scrolls them outward.
pub fn ring(index: usize, offset: f32) -> Ring {
    let mut depth = (index as f32 - offset) / RING_COUNT as f32;
    if depth < 0.0 {
        depth += 1.0;
    }
    let eased = depth.powf(DEPTH_EASE);
    let near = near_rect();
    let far = far_rect();
    let left = lerp(near.left(), far.left(), eased).round();
    let right = lerp(near.right(), far.right(), eased).round();
    let top = lerp(near.top(), far.top(), eased).round();
    let bottom = lerp(near.bottom(), far.bottom(), eased).round();

    let alpha = 0.5 - depth * 0.42;
    let accent = index % TUNNEL_ACCENT_EVERY == 0;
    Ring {
        rect: Rect::new(Point::new(left, top), Size::new(right - left, bottom - top)),
        depth,
        color: if accent { TUNNEL_ACCENT } else { TUNNEL_COLOR },
        alpha: if accent { (alpha * 1.3).min(0.65) } else { alpha },
        width: (2.5 - depth * 2.0).max(0.5),
    }
}

/// Corner to corner lines between the near and far rects.
pub fn spines() -> [(Point, Point); 4] {
    let near = near_rect();
    let far = far_rect();
    [
        (near.position, far.position),
        (
            Point::new(near.right(), near.top()),
            Point::new(far.right(), far.top()),
        ),
        (
            Point::new(near.left(), near.bottom()),
            Point::new(far.left(), far.bottom()),
        ),
        (
            Point::new(near.right(), near.bottom()),
            Point::new(far.right(), far.bottom()),
        ),
    ]
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rib {
    pub near: Point,
    pub far: Point,
    pub alpha: f32,
}

/// Lines along the four walls, fainter towards the corners.
pub fn wall_ribs() -> Vec<Rib> {
    let near = near_rect();
    let far = far_rect();
    let mut ribs = Vec::with_capacity(2 * (TUNNEL_RIBS_TOP_BOTTOM + TUNNEL_RIBS_LEFT_RIGHT));
    let alpha = |frac: f32| 0.28 - (frac - 0.5).abs() * 2.0 * 0.12;

    for i in 1..=TUNNEL_RIBS_TOP_BOTTOM {
        let frac = i as f32 / (TUNNEL_RIBS_TOP_BOTTOM + 1) as f32;
        let near_x = lerp(near.left(), near.right(), frac);
        let far_x = lerp(far.left(), far.right(), frac);
        for (near_y, far_y) in [(near.top(), far.top()), (near.bottom(), far.bottom())] {
            ribs.push(Rib {
                near: Point::new(near_x, near_y),
                far: Point::new(far_x, far_y),
                alpha: alpha(frac),
            });
        }
    }
    for i in 1..=TUNNEL_RIBS_LEFT_RIGHT {
        let frac = i as f32 / (TUNNEL_RIBS_LEFT_RIGHT + 1) as f32;
        let near_y = lerp(near.top(), near.bottom(), frac);
        let far_y = lerp(far.top(), far.bottom(), frac);
        for (near_x, far_x) in [(near.left(), far.left()), (near.right(), far.right())] {
            ribs.push(Rib {
                near: Point::new(near_x, near_y),
                far: Point::new(far_x, far_y),
                alpha: alpha(frac),
            });
        }
    }
    ribs
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GridCell {
    pub rect: Rect,
    pub color: u32,
    pub alpha: f32,
}

/// The light at the end of the tunnel : a small grid with a spiral colour
/// wave running through it.
pub fn center_grid(time_ms: f32) -> Vec<GridCell> {
    let far = far_rect();
    let cell_w = FAR_W / CENTER_GRID_COLS as f32;
    let cell_h = FAR_H / CENTER_GRID_ROWS as f32;
    let phase = time_ms / CENTER_GRID_CYCLE_MS * TAU;
    let center_col = (CENTER_GRID_COLS - 1) as f32 / 2.0;
    let center_row = (CENTER_GRID_ROWS - 1) as f32 / 2.0;

    let mut cells = Vec::with_capacity(CENTER_GRID_COLS * CENTER_GRID_ROWS);
    for row in 0..CENTER_GRID_ROWS {
        for col in 0..CENTER_GRID_COLS {
            let dx = col as f32 - center_col;
            let dy = row as f32 - center_row;
            let spiral = dy.atan2(dx) + (dx * dx + dy * dy).sqrt() * 0.8 - phase;
            let wave = (spiral.sin() + 1.0) / 2.0;

            let cx = (col as f32 + 0.5) / CENTER_GRID_COLS as f32;
            let cy = (row as f32 + 0.5) / CENTER_GRID_ROWS as f32;
            let edge = (cx - 0.5).abs().max((cy - 0.5).abs()) * 2.0;

            cells.push(GridCell {
                rect: Rect::new(
                    Point::new(
                        (far.left() + col as f32 * cell_w).round(),
                        (far.top() + row as f32 * cell_h).round(),
                    ),
                    Size::new(cell_w.ceil(), cell_h.ceil()),
                ),
                color: mix_color(CENTER_GRID_COLOR_A, CENTER_GRID_COLOR_B, wave),
                alpha: CENTER_GRID_ALPHA - edge * 0.2,
            });
        }
    }
    cells
}

/// Tint washed over the whole screen, oscillating between the two tunnel colours.
pub fn screen_pulse_color(time_ms: f32) -> u32 {
    let pulse = ((time_ms * 0.002).sin() + 1.0) / 2.0;
    mix_color(TUNNEL_COLOR, TUNNEL_ACCENT, pulse)
}

pub fn draw(renderer: &Renderer, ring_offset: f32, time_ms: f32) {
    let near = near_rect();
    renderer.fill_rect(&near, BG_COLOR, 1.0);

    renderer.fill_rect(&near, screen_pulse_color(time_ms), 0.04);
    let mut y = 0.0;
    while y < GAME_H {
        let alpha = 0.015 + (y * 0.3 + time_ms * 0.001).sin() * 0.01;
        if alpha > 0.0 {
            renderer.fill_rect(
                &Rect::new(Point::new(0.0, y), Size::new(GAME_W, 1.0)),
                0x000000,
                alpha,
            );
        }
        y += 4.0;
    }

    for cell in center_grid(time_ms) {
        renderer.fill_rect(&cell.rect, cell.color, cell.alpha);
    }
    let far = far_rect();
    for layer in (1..=GLOW_LAYERS).rev() {
        let expand = layer as f32 * 4.0;
        let halo = Rect::new(
            far.position.offset(-expand, -expand),
            Size::new(FAR_W + expand * 2.0, FAR_H + expand * 2.0),
        );
        renderer.fill_rect(&halo, GLOW_COLOR, 0.06 / layer as f32);
    }

    for (from, to) in spines() {
        renderer.stroke_path(&[from, to], false, 1.5, TUNNEL_COLOR, 0.35);
    }
    for rib in wall_ribs() {
        renderer.stroke_path(&[rib.near, rib.far], false, 1.0, TUNNEL_COLOR, rib.alpha);
    }

    // far to near so near rings land on top
    for index in (0..=RING_COUNT).rev() {
        let ring = ring(index, ring_offset);
        let rect = ring.rect;
        let corners = [
            rect.position,
            Point::new(rect.right(), rect.top()),
            Point::new(rect.right(), rect.bottom()),
            Point::new(rect.left(), rect.bottom()),
        ];
        renderer.stroke_path(&corners, true, ring.width, ring.color, ring.alpha);
    }

    renderer.stroke_path(
        &[
            Point::new(FOCAL_X, near.bottom()),
            Point::new(FOCAL_X, far.bottom()),
        ],
        false,
        1.0,
        TUNNEL_COLOR,
        0.25,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn outermost_ring_is_the_canvas_and_innermost_the_focal_box() {
        let outer = ring(0, 0.0);
        assert_eq!(outer.rect, near_rect());
        assert_eq!(outer.color, TUNNEL_ACCENT);

        let inner = ring(RING_COUNT, 0.0);
        assert_relative_eq!(inner.depth, 1.0);
        assert_eq!(inner.rect, far_rect());
        assert_relative_eq!(inner.width, 0.5);
    }

    #[test]
    fn scrolling_wraps_the_first_ring_to_the_far_end() {
        let ring = ring(0, 0.5);
        assert!(ring.depth > 0.9);
    }

    #[test]
    fn ribs_cover_all_four_walls() {
        let ribs = wall_ribs();
        assert_eq!(
            ribs.len(),
            2 * (TUNNEL_RIBS_TOP_BOTTOM + TUNNEL_RIBS_LEFT_RIGHT)
        );
        // middle rib is the brightest
        let brightest = ribs.iter().map(|rib| rib.alpha).fold(0.0, f32::max);
        assert_relative_eq!(brightest, 0.28);
    }

    #[test]
    fn center_grid_fills_the_far_box() {
        let cells = center_grid(0.0);
        assert_eq!(cells.len(), CENTER_GRID_COLS * CENTER_GRID_ROWS);
        let far = far_rect();
        assert!(cells.iter().all(|cell| far.contains(cell.rect.position)));
    }

    #[test]
    fn mix_color_hits_both_ends() {
        assert_eq!(mix_color(TUNNEL_COLOR, TUNNEL_ACCENT, 0.0), TUNNEL_COLOR);
        assert_eq!(mix_color(TUNNEL_COLOR, TUNNEL_ACCENT, 1.0), TUNNEL_ACCENT);
        assert_eq!(mix_color(0x000000, 0xffffff, 0.5), 0x808080);
    }
}
