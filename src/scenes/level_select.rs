use super::{Scene, SceneContext, Screen};
use crate::assets::AssetStore;
use crate::config::constants::{TOAST_FONT_PX, TOAST_MS, TOAST_RISE_PX, TOAST_TEXT};
use crate::config::layout::level_select as layout;
use crate::engine::input::PointerEvent;
use crate::engine::Renderer;
use crate::transition::Admission;
use crate::tween::{Ease, Progress, Tween};
use crate::widgets::{ImageButton, LockPolicy};

const TITLE_CARD: &str = "ls_title";
const PORTRAIT_FRAME: &str = "ls_frame";
const LEVELS: [&str; 4] = ["lvl1", "lvl2", "lvl3", "lvl4"];

/// "Coming Soon!" floating up and fading out.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Toast {
    tween: Tween,
}

impl Toast {
    fn new() -> Self {
        Toast {
            tween: Tween::new(0.0, 1.0, TOAST_MS, Ease::QuadOut),
        }
    }

    fn update(&mut self, dt_ms: f32) -> bool {
        matches!(self.tween.update(dt_ms), Progress::InProgress(_))
    }

    fn draw(&self, renderer: &Renderer, alpha: f32) {
        let t = self.tween.value();
        renderer.draw_text(
            TOAST_TEXT,
            layout::TOAST.offset(0.0, -TOAST_RISE_PX * t),
            TOAST_FONT_PX,
            0xffffff,
            0x000000,
            (1.0 - t) * alpha,
        );
    }
}

pub struct LevelSelect {
    /// `None` when the stored character is unknown, only the frame shows
    portrait: Option<ImageButton>,
    levels: Vec<ImageButton>,
    settings: ImageButton,
    achievements: ImageButton,
    toasts: Vec<Toast>,
}

impl LevelSelect {
    pub fn new(ctx: &mut SceneContext) -> Self {
        ctx.background.set_visible(true);
        ctx.background.set_phone_frame_visible(false);
        ctx.maximize.set_visible(true);

        let selected = ctx.session.settings.selected_character_id();
        let portrait = match ctx.characters.iter().find(|c| c.id == selected) {
            Some(character) => Some(
                ImageButton::new(&character.level_key, layout::PORTRAIT)
                    .with_overlay(PORTRAIT_FRAME)
                    .with_policy(LockPolicy::Pop),
            ),
            None => {
                log::warn!("Unknown character '{}', no portrait", selected);
                None
            }
        };

        LevelSelect {
            portrait,
            levels: LEVELS
                .iter()
                .zip(layout::LEVELS)
                .map(|(key, center)| ImageButton::new(key, center))
                .collect(),
            settings: ImageButton::new("ls_settings", layout::SETTINGS_BUTTON),
            achievements: ImageButton::new("ls_ach", layout::ACHIEVEMENTS_BUTTON),
            toasts: Vec::new(),
        }
    }

    pub fn toast_count(&self) -> usize {
        self.toasts.len()
    }

    pub fn has_portrait(&self) -> bool {
        self.portrait.is_some()
    }
}

impl Scene for LevelSelect {
    fn screen(&self) -> Screen {
        Screen::LevelSelect
    }

    fn update(&mut self, ctx: &mut SceneContext, dt_ms: f32, pointer: &[PointerEvent]) {
        self.toasts.retain_mut(|toast| toast.update(dt_ms));

        if let Some(portrait) = self.portrait.as_mut() {
            if portrait.update(dt_ms, pointer, ctx.assets, ctx.session) {
                ctx.transparent_transition_to(Screen::CharacterSelect);
            }
        }

        let mut coming_soon = 0;
        for button in self.levels.iter_mut().chain([&mut self.achievements]) {
            if button.update(dt_ms, pointer, ctx.assets, ctx.session) {
                log::info!("'{}' is not playable yet", button.texture());
                coming_soon += 1;
            }
        }
        self.toasts.extend(std::iter::repeat(Toast::new()).take(coming_soon));

        if self.settings.update(dt_ms, pointer, ctx.assets, ctx.session)
            && ctx.transparent_transition_to(Screen::Settings) == Admission::Started
        {
            ctx.session.return_to = Screen::LevelSelect;
        }
    }

    fn draw(&self, renderer: &Renderer, assets: &AssetStore, alpha: f32) {
        if let Some(image) = assets.get(TITLE_CARD) {
            renderer.draw_image(image, layout::TITLE, 1.0, alpha);
        }
        match &self.portrait {
            Some(portrait) => portrait.draw(renderer, assets, alpha),
            None => {
                if let Some(image) = assets.get(PORTRAIT_FRAME) {
                    renderer.draw_image(image, layout::PORTRAIT, 1.0, alpha);
                }
            }
        }
        for button in self.levels.iter().chain([&self.settings, &self.achievements]) {
            button.draw(renderer, assets, alpha);
        }
        for toast in &self.toasts {
            toast.draw(renderer, alpha);
        }
    }
}
