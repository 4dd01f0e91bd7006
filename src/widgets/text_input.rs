use crate::dom::{DomSurface, TextInputConfig, TextInputHost};
use crate::engine::input::{PointerEvent, PointerKind};
use crate::engine::Rect;

/// Canvas-side half of a native text field : keeps the DOM element lined up
/// with its design-space box and collects what the player typed.
pub struct TextInput {
    host: Option<Box<dyn TextInputHost>>,
    rect: Rect,
    font_px: f32,
}

impl TextInput {
    pub fn new(
        surface: &mut dyn DomSurface,
        rect: Rect,
        font_px: f32,
        config: &TextInputConfig,
    ) -> Self {
        let host = surface.create_text_input(config);
        if host.is_none() {
            log::warn!("No text field for '{}'", config.placeholder);
        }
        let mut input = TextInput {
            host,
            rect,
            font_px,
        };
        input.place(surface);
        input
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    fn place(&mut self, surface: &dyn DomSurface) {
        if let Some(host) = self.host.as_mut() {
            let viewport = surface.overlay_viewport();
            host.place(&viewport.to_screen(&self.rect), viewport.font_px(self.font_px));
        }
    }

    /// Follow the canvas, drop focus on taps elsewhere. Returns the latest
    /// value typed since the previous tick.
    pub fn update(&mut self, surface: &dyn DomSurface, pointer: &[PointerEvent]) -> Option<String> {
        self.place(surface);
        let host = self.host.as_mut()?;
        let tapped_outside = pointer
            .iter()
            .any(|event| event.kind == PointerKind::Down && !self.rect.contains(event.position));
        if tapped_outside {
            host.blur();
        }
        host.take_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::HeadlessSurface;
    use crate::engine::{Point, Size};
    use crate::viewport::ViewportTransform;
    use approx::assert_relative_eq;

    fn config() -> TextInputConfig {
        TextInputConfig {
            placeholder: "Enter name...".into(),
            max_length: 12,
            initial_value: "Kim".into(),
        }
    }

    fn name_box() -> Rect {
        Rect::from_center(Point::new(270.0, 185.0), Size::new(280.0, 50.0))
    }

    #[test]
    fn field_tracks_the_canvas_scale() {
        let mut surface = HeadlessSurface::new();
        let mut input = TextInput::new(&mut surface, name_box(), 18.0, &config());

        surface.state.borrow_mut().viewport = ViewportTransform::fit(Size::new(270.0, 480.0));
        input.update(&surface, &[]);

        let state = surface.state.borrow();
        let (rect, font_px) = state.inputs[0].placement.unwrap();
        assert_relative_eq!(rect.left(), 65.0);
        assert_relative_eq!(rect.size.width, 140.0);
        assert_relative_eq!(font_px, 9.0);
    }

    #[test]
    fn field_is_placed_from_the_container_not_the_page() {
        let mut surface = HeadlessSurface::new();
        {
            let mut state = surface.state.borrow_mut();
            state.viewport = ViewportTransform::from_canvas_rect(690.0, 60.0, 540.0, 960.0);
            state.container_origin = Point::new(690.0, 60.0);
        }
        let mut input = TextInput::new(&mut surface, name_box(), 18.0, &config());
        input.update(&surface, &[]);

        let state = surface.state.borrow();
        let (rect, _) = state.inputs[0].placement.unwrap();
        assert_relative_eq!(rect.left(), 130.0);
        assert_relative_eq!(rect.top(), 160.0);
    }

    #[test]
    fn taps_outside_blur_and_values_come_through() {
        let mut surface = HeadlessSurface::new();
        let mut input = TextInput::new(&mut surface, name_box(), 18.0, &config());

        assert_eq!(input.update(&surface, &[PointerEvent::down(270.0, 185.0)]), None);
        assert_eq!(surface.state.borrow().inputs[0].blurred, 0);

        surface.state.borrow_mut().type_text("Robin");
        let typed = input.update(&surface, &[PointerEvent::down(270.0, 700.0)]);
        assert_eq!(typed.as_deref(), Some("Robin"));
        assert_eq!(surface.state.borrow().inputs[0].blurred, 1);
    }
}
