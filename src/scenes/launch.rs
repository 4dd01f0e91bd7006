use super::{Scene, SceneContext, Screen};
use crate::assets::AssetStore;
use crate::config::constants::BGM_TITLE;
use crate::config::layout;
use crate::engine::input::PointerEvent;
use crate::engine::Renderer;
use crate::transition::Admission;
use crate::widgets::any_press;

const LAUNCH_SCREEN: &str = "launch_screen";

/// Splash screen. Audio is only allowed after a user gesture, so the first
/// tap starts the music and opens the intro.
pub struct Launch {
    launched: bool,
}

impl Launch {
    pub fn new(ctx: &mut SceneContext) -> Self {
        ctx.background.set_visible(false);
        ctx.maximize.set_visible(false);
        Launch { launched: false }
    }
}

impl Scene for Launch {
    fn screen(&self) -> Screen {
        Screen::Launch
    }

    fn update(&mut self, ctx: &mut SceneContext, _dt_ms: f32, pointer: &[PointerEvent]) {
        if self.launched || !any_press(pointer) {
            return;
        }
        if ctx.session.audio.current_bgm_key().is_none() {
            let volume = ctx.session.settings.bgm_volume();
            ctx.session.audio.play_bgm(BGM_TITLE, true, false, volume);
        }
        self.launched = ctx.transition_to(Screen::IntroCutscene, None) == Admission::Started;
    }

    fn draw(&self, renderer: &Renderer, assets: &AssetStore, alpha: f32) {
        if let Some(image) = assets.get(LAUNCH_SCREEN) {
            renderer.draw_image(image, layout::LAUNCH, 1.0, alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::Harness;
    use super::*;
    use crate::settings::MemoryStore;

    #[test]
    fn first_tap_starts_music_and_the_intro() {
        let mut harness = Harness::at(Screen::Launch, MemoryStore::new(), &[]);
        let mut launch = Launch::new(&mut harness.ctx());
        assert!(!harness.background.is_visible());

        harness.run(&mut launch, 16.0, &[]);
        assert!(!harness.transitions.is_transitioning());

        harness.run(&mut launch, 16.0, &[PointerEvent::down(10.0, 10.0)]);
        assert_eq!(harness.transitions.pending_target(), Some(Screen::IntroCutscene));
        assert_eq!(harness.session.audio.current_bgm_key(), Some(BGM_TITLE));

        harness.run(&mut launch, 16.0, &[PointerEvent::down(10.0, 10.0)]);
        assert_eq!(harness.audio.recording.borrow().started.len(), 1);
    }
}
