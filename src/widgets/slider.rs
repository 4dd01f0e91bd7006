use crate::assets::AssetStore;
use crate::config::constants::{SLIDER_BG, SLIDER_KNOB, SLIDER_TRACK};
use crate::engine::input::{PointerEvent, PointerKind};
use crate::engine::{Point, Rect, Renderer, Size};

/// Horizontal slider. The knob travels between the track ends, inset by half
/// a knob, and its position maps linearly onto `0..=1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    center: Point,
    track: Size,
    knob: Size,
    min_x: f32,
    max_x: f32,
    value: f32,
    dragging: bool,
}

impl Slider {
    pub fn new(center: Point, track: Size, knob: Size, value: f32) -> Self {
        let min_x = center.x - track.width / 2.0 + knob.width / 2.0;
        let max_x = center.x + track.width / 2.0 - knob.width / 2.0;
        let mut slider = Slider {
            center,
            track,
            knob,
            min_x,
            max_x,
            value: 0.0,
            dragging: false,
        };
        slider.set_value(value);
        slider
    }

    /// Sized from the slider textures, a missing texture counts as empty.
    pub fn from_assets(center: Point, assets: &AssetStore, value: f32) -> Self {
        let track = assets.size(SLIDER_TRACK).unwrap_or_default();
        let knob = assets.size(SLIDER_KNOB).unwrap_or_default();
        Slider::new(center, track, knob, value)
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn set_value(&mut self, value: f32) {
        self.value = value.clamp(0.0, 1.0);
    }

    pub fn knob_x(&self) -> f32 {
        self.min_x + self.value * (self.max_x - self.min_x)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn knob_rect(&self) -> Rect {
        Rect::from_center(Point::new(self.knob_x(), self.center.y), self.knob)
    }

    fn track_rect(&self) -> Rect {
        Rect::from_center(self.center, self.track)
    }

    /// Knob drags and track clicks. Returns the new value when it changed.
    /// A locked slider still finishes a drag it already started.
    pub fn update(&mut self, pointer: &[PointerEvent], locked: bool) -> Option<f32> {
        let mut changed = None;
        for event in pointer {
            match event.kind {
                PointerKind::Down if !locked => {
                    if self.knob_rect().contains(event.position) {
                        self.dragging = true;
                    } else if self.track_rect().contains(event.position) {
                        changed = self.move_knob_to(event.position.x);
                    }
                }
                PointerKind::Move if self.dragging => {
                    changed = self.move_knob_to(event.position.x).or(changed);
                }
                PointerKind::Up => self.dragging = false,
                _ => {}
            }
        }
        changed
    }

    fn move_knob_to(&mut self, x: f32) -> Option<f32> {
        let span = self.max_x - self.min_x;
        if span <= 0.0 {
            return None;
        }
        let x = x.clamp(self.min_x, self.max_x);
        self.value = ((x - self.min_x) / span).clamp(0.0, 1.0);
        Some(self.value)
    }

    pub fn draw(&self, renderer: &Renderer, assets: &AssetStore, alpha: f32) {
        for key in [SLIDER_TRACK, SLIDER_BG] {
            if let Some(image) = assets.get(key) {
                renderer.draw_image(image, self.center, 1.0, alpha);
            }
        }
        if let Some(knob) = assets.get(SLIDER_KNOB) {
            renderer.draw_image(knob, Point::new(self.knob_x(), self.center.y), 1.0, alpha);
        }
    }
}
