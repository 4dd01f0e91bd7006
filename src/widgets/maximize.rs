use super::tapped;
use crate::assets::AssetStore;
use crate::config::constants::{BTN_MAXIMIZE, BTN_MINIMIZE};
use crate::config::layout;
use crate::dom::DomSurface;
use crate::engine::input::PointerEvent;
use crate::engine::{Rect, Renderer};
use crate::settings::Settings;

/// Corner toggle between the framed and the maximised page layout. Always on
/// top, every scene says on entry whether it shows.
#[derive(Debug, Clone, PartialEq)]
pub struct MaximizeControl {
    visible: bool,
}

impl Default for MaximizeControl {
    fn default() -> Self {
        MaximizeControl::new()
    }
}

impl MaximizeControl {
    pub fn new() -> Self {
        MaximizeControl { visible: false }
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn texture(settings: &Settings) -> &'static str {
        if settings.is_maximized() {
            BTN_MINIMIZE
        } else {
            BTN_MAXIMIZE
        }
    }

    /// Returns true when the tap was taken by the control.
    pub fn update(
        &mut self,
        pointer: &[PointerEvent],
        assets: &AssetStore,
        settings: &mut Settings,
        surface: &mut dyn DomSurface,
    ) -> bool {
        if !self.visible {
            return false;
        }
        let Some(size) = assets.size(Self::texture(settings)) else {
            return false;
        };
        if !tapped(pointer, &Rect::from_center(layout::MAXIMIZE, size)) {
            return false;
        }
        let maximized = !settings.is_maximized();
        log::info!("Maximized : {}", maximized);
        settings.set_maximized(maximized);
        surface.set_maximized(maximized);
        true
    }

    pub fn draw(&self, renderer: &Renderer, assets: &AssetStore, settings: &Settings) {
        if !self.visible {
            return;
        }
        if let Some(image) = assets.get(Self::texture(settings)) {
            renderer.draw_image(image, layout::MAXIMIZE, 1.0, 1.0);
        }
    }
}
