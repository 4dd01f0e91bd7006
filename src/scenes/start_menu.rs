use super::{Scene, SceneContext, ScenePayload, Screen};
use crate::assets::AssetStore;
use crate::config::constants::{
    BGM_SHUFFLE, BGM_SWITCH_FADE_MS, BGM_TITLE, TITLE_PULSE_MAX, TITLE_PULSE_MIN, TITLE_PULSE_MS,
};
use crate::config::layout::start_menu as layout;
use crate::engine::input::PointerEvent;
use crate::engine::Renderer;
use crate::transition::Admission;
use crate::tween::Pulse;
use crate::widgets::ImageButton;

const TITLE_CARD: &str = "start_title";

/// Title screen, shown inside the phone frame. Both buttons leave by zooming
/// into the phone screen while the menu cross-fades away.
pub struct StartMenu {
    title: Pulse,
    start: ImageButton,
    settings: ImageButton,
}

impl StartMenu {
    pub fn new(ctx: &mut SceneContext, payload: Option<ScenePayload>) -> Self {
        ctx.background.set_visible(true);
        ctx.maximize.set_visible(true);
        match payload {
            Some(ScenePayload::FromInside) => {
                ctx.background.start_zoom_in();
            }
            None => ctx.background.set_phone_frame_visible(true),
        }
        ctx.session.ensure_bgm(BGM_TITLE);

        StartMenu {
            title: Pulse::new(TITLE_PULSE_MIN, TITLE_PULSE_MAX, TITLE_PULSE_MS / 2.0),
            start: ImageButton::new("btn_startgame", layout::START_BUTTON),
            settings: ImageButton::new("btn_settings", layout::SETTINGS_BUTTON),
        }
    }

    pub fn title_scale(&self) -> f32 {
        self.title.value()
    }

    fn on_start(ctx: &mut SceneContext) {
        if ctx.transparent_transition_to(Screen::CharacterSelect) == Admission::Started {
            ctx.session
                .audio
                .switch_bgm(BGM_SHUFFLE, BGM_SWITCH_FADE_MS, BGM_SWITCH_FADE_MS);
            ctx.background.start_zoom_out();
        }
    }

    fn on_settings(ctx: &mut SceneContext) {
        if ctx.transparent_transition_to(Screen::Settings) == Admission::Started {
            ctx.session.return_to = Screen::StartMenu;
            ctx.background.start_zoom_out();
        }
    }
}

impl Scene for StartMenu {
    fn screen(&self) -> Screen {
        Screen::StartMenu
    }

    fn update(&mut self, ctx: &mut SceneContext, dt_ms: f32, pointer: &[PointerEvent]) {
        self.title.update(dt_ms);
        if self.start.update(dt_ms, pointer, ctx.assets, ctx.session) {
            Self::on_start(ctx);
        }
        if self.settings.update(dt_ms, pointer, ctx.assets, ctx.session) {
            Self::on_settings(ctx);
        }
    }

    fn draw(&self, renderer: &Renderer, assets: &AssetStore, alpha: f32) {
        if let Some(image) = assets.get(TITLE_CARD) {
            renderer.draw_image(image, layout::TITLE, self.title.value(), alpha);
        }
        self.start.draw(renderer, assets, alpha);
        self.settings.draw(renderer, assets, alpha);
    }
}
