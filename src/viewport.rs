//! Canvas <-> page mapping. The core only computes numbers here, `dom.rs`
//! applies them to elements.
use crate::config::constants::{GAME_H, GAME_W};
use crate::engine::{Point, Rect, Size};

/// Where the 540x960 design space sits on the page, in CSS pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportTransform {
    pub offset: Point,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        ViewportTransform::IDENTITY
    }
}

impl ViewportTransform {
    pub const IDENTITY: ViewportTransform = ViewportTransform {
        offset: Point { x: 0.0, y: 0.0 },
        scale_x: 1.0,
        scale_y: 1.0,
    };

    /// Contain-fit of the design space into `container`, centred on both axes.
    pub fn fit(container: Size) -> Self {
        if container.width <= 0.0 || container.height <= 0.0 {
            return ViewportTransform::IDENTITY;
        }
        let scale = (container.width / GAME_W).min(container.height / GAME_H);
        ViewportTransform {
            offset: Point {
                x: (container.width - GAME_W * scale) / 2.0,
                y: (container.height - GAME_H * scale) / 2.0,
            },
            scale_x: scale,
            scale_y: scale,
        }
    }

    /// From the canvas bounding client rect.
    pub fn from_canvas_rect(left: f32, top: f32, width: f32, height: f32) -> Self {
        if width <= 0.0 || height <= 0.0 {
            return ViewportTransform::IDENTITY;
        }
        ViewportTransform {
            offset: Point { x: left, y: top },
            scale_x: width / GAME_W,
            scale_y: height / GAME_H,
        }
    }

    /// Same mapping measured from `origin` instead of the page's top left,
    /// for elements positioned inside a container.
    pub fn relative_to(self, origin: Point) -> Self {
        ViewportTransform {
            offset: Point {
                x: self.offset.x - origin.x,
                y: self.offset.y - origin.y,
            },
            ..self
        }
    }

    pub fn to_screen(&self, rect: &Rect) -> Rect {
        Rect {
            position: Point {
                x: self.offset.x + rect.left() * self.scale_x,
                y: self.offset.y + rect.top() * self.scale_y,
            },
            size: Size {
                width: rect.size.width * self.scale_x,
                height: rect.size.height * self.scale_y,
            },
        }
    }

    pub fn to_design(&self, point: Point) -> Point {
        Point {
            x: (point.x - self.offset.x) / self.scale_x,
            y: (point.y - self.offset.y) / self.scale_y,
        }
    }

    /// Design font size in CSS pixels, rounded down.
    pub fn font_px(&self, design_px: f32) -> f32 {
        (design_px * self.scale_x.min(self.scale_y)).floor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fit_letterboxes_a_wide_container() {
        let viewport = ViewportTransform::fit(Size::new(1080.0, 960.0));
        assert_relative_eq!(viewport.scale_x, 1.0);
        assert_relative_eq!(viewport.offset.x, 270.0);
        assert_relative_eq!(viewport.offset.y, 0.0);
    }

    #[test]
    fn fit_pillarboxes_a_tall_container() {
        let viewport = ViewportTransform::fit(Size::new(270.0, 960.0));
        assert_relative_eq!(viewport.scale_y, 0.5);
        assert_relative_eq!(viewport.offset.y, 240.0);
    }

    #[test]
    fn screen_and_design_space_are_inverse() {
        let viewport = ViewportTransform::from_canvas_rect(10.0, 20.0, 270.0, 480.0);
        let point = Point::new(135.0, 240.0);
        let design = viewport.to_design(point);
        assert_relative_eq!(design.x, 250.0);
        assert_relative_eq!(design.y, 440.0);

        let field = Rect::from_center(Point::new(270.0, 185.0), Size::new(280.0, 50.0));
        let screen = viewport.to_screen(&field);
        assert_relative_eq!(screen.left(), 10.0 + 130.0 * 0.5);
        assert_relative_eq!(screen.size.height, 25.0);
        assert_relative_eq!(viewport.font_px(18.0), 9.0);
    }

    #[test]
    fn container_relative_placement_drops_the_container_offset() {
        // canvas and container both centred at x = 690 on a wide window
        let client = ViewportTransform::from_canvas_rect(690.0, 0.0, 540.0, 960.0);
        let inside = client.relative_to(Point::new(690.0, 0.0));

        let field = Rect::from_center(Point::new(270.0, 185.0), Size::new(280.0, 50.0));
        assert_relative_eq!(inside.to_screen(&field).left(), 130.0);
        assert_relative_eq!(client.to_screen(&field).left(), 820.0);
        assert_eq!(inside.scale_x, client.scale_x);
    }

    #[test]
    fn degenerate_canvas_falls_back_to_identity() {
        assert_eq!(
            ViewportTransform::from_canvas_rect(0.0, 0.0, 0.0, 0.0),
            ViewportTransform::IDENTITY
        );
    }
}
