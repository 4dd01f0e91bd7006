use super::{Scene, SceneContext, ScenePayload, Screen};
use crate::assets::AssetStore;
use crate::config::layout::settings as layout;
use crate::engine::input::PointerEvent;
use crate::engine::{Point, Renderer};
use crate::widgets::{ImageButton, Slider};

const LABELS: [(&str, Point); 3] = [
    ("settings_header", layout::HEADER),
    ("label_music", layout::MUSIC_LABEL),
    ("label_sfx", layout::SFX_LABEL),
];

/// Volume sliders and a way back. Whatever music plays keeps playing.
pub struct SettingsMenu {
    music: Slider,
    sfx: Slider,
    back: ImageButton,
}

impl SettingsMenu {
    pub fn new(ctx: &mut SceneContext) -> Self {
        ctx.background.set_visible(true);
        ctx.background.set_phone_frame_visible(false);
        ctx.maximize.set_visible(true);

        let settings = &ctx.session.settings;
        SettingsMenu {
            music: Slider::from_assets(layout::MUSIC_SLIDER, ctx.assets, settings.bgm_volume()),
            sfx: Slider::from_assets(layout::SFX_SLIDER, ctx.assets, settings.sfx_volume()),
            back: ImageButton::new("btn_back", layout::BACK_BUTTON),
        }
    }

    pub fn music_value(&self) -> f32 {
        self.music.value()
    }

    pub fn sfx_value(&self) -> f32 {
        self.sfx.value()
    }
}

impl Scene for SettingsMenu {
    fn screen(&self) -> Screen {
        Screen::Settings
    }

    fn update(&mut self, ctx: &mut SceneContext, dt_ms: f32, pointer: &[PointerEvent]) {
        let locked = ctx.session.is_input_locked();
        if let Some(volume) = self.music.update(pointer, locked) {
            ctx.session.set_bgm_volume(volume);
        }
        if let Some(volume) = self.sfx.update(pointer, locked) {
            ctx.session.set_sfx_volume(volume);
        }

        if self.back.update(dt_ms, pointer, ctx.assets, ctx.session) {
            let target = ctx.session.return_to;
            let payload = (target == Screen::StartMenu).then_some(ScenePayload::FromInside);
            ctx.transition_to(target, payload);
        }
    }

    fn draw(&self, renderer: &Renderer, assets: &AssetStore, alpha: f32) {
        for (key, center) in LABELS {
            if let Some(image) = assets.get(key) {
                renderer.draw_image(image, center, 1.0, alpha);
            }
        }
        self.music.draw(renderer, assets, alpha);
        self.sfx.draw(renderer, assets, alpha);
        self.back.draw(renderer, assets, alpha);
    }
}
