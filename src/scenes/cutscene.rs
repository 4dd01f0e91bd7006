use super::{Scene, SceneContext, Screen};
use crate::assets::AssetStore;
use crate::config::constants::{CUTSCENE_HOLD_MS, CUTSCENE_WIPE_MS, GAME_W};
use crate::config::layout;
use crate::engine::input::PointerEvent;
use crate::engine::Renderer;
use crate::transition::Admission;
use crate::tween::{Delay, Ease, Tween};
use crate::widgets::any_press;

const SLIDES: [&str; 3] = ["intro_1", "intro_2", "intro_3"];

/// ┌───────────────────── Slideshow ──────────────────────┐
/// │  Holding(n) ── H ──► Wiping(n) ── W ──► Holding(n+1)  │
/// │  Holding(last) ── H ──► Leaving                       │
/// │  any phase ── tap, seen before ──► Leaving            │
/// │  Leaving ── transition admitted ──► Left              │
/// └───────────────────────────────────────────────────────┘
#[derive(Debug, Copy, Clone, PartialEq)]
enum Phase {
    Holding { slide: usize, hold: Delay },
    /// next slide revealed left to right
    Wiping { slide: usize, wipe: Tween },
    Leaving,
    Left,
}

pub struct IntroCutscene {
    phase: Phase,
    last_slide: usize,
}

impl IntroCutscene {
    pub fn new(ctx: &mut SceneContext) -> Self {
        ctx.background.set_visible(false);
        ctx.maximize.set_visible(false);
        IntroCutscene {
            phase: Phase::Holding {
                slide: 0,
                hold: Delay::new(CUTSCENE_HOLD_MS),
            },
            last_slide: 0,
        }
    }

    pub fn slide(&self) -> usize {
        self.last_slide
    }

    pub fn is_leaving(&self) -> bool {
        matches!(self.phase, Phase::Leaving | Phase::Left)
    }

    fn advance(&mut self, ctx: &mut SceneContext, dt_ms: f32) {
        match &mut self.phase {
            Phase::Holding { slide, hold } => {
                if !hold.update(dt_ms) {
                    return;
                }
                if *slide + 1 < SLIDES.len() {
                    self.phase = Phase::Wiping {
                        slide: *slide,
                        wipe: Tween::new(0.0, 1.0, CUTSCENE_WIPE_MS, Ease::Linear),
                    };
                } else {
                    log::info!("Intro cutscene finished");
                    ctx.session.settings.set_has_seen_intro(true);
                    self.phase = Phase::Leaving;
                }
            }
            Phase::Wiping { slide, wipe } => {
                wipe.update(dt_ms);
                if wipe.is_done() {
                    let next = *slide + 1;
                    self.last_slide = next;
                    self.phase = Phase::Holding {
                        slide: next,
                        hold: Delay::new(CUTSCENE_HOLD_MS),
                    };
                }
            }
            Phase::Leaving | Phase::Left => {}
        }
    }

    fn leave(&mut self, ctx: &mut SceneContext) {
        let admission = ctx.transition_to(Screen::StartMenu, None);
        // busy : ask again next tick
        if admission != Admission::Busy {
            self.phase = Phase::Left;
        }
    }
}

impl Scene for IntroCutscene {
    fn screen(&self) -> Screen {
        Screen::IntroCutscene
    }

    fn update(&mut self, ctx: &mut SceneContext, dt_ms: f32, pointer: &[PointerEvent]) {
        if !self.is_leaving() && any_press(pointer) && ctx.session.settings.has_seen_intro() {
            log::info!("Intro cutscene skipped");
            self.phase = Phase::Leaving;
        }
        self.advance(ctx, dt_ms);
        if self.phase == Phase::Leaving {
            self.leave(ctx);
        }
    }

    fn draw(&self, renderer: &Renderer, assets: &AssetStore, alpha: f32) {
        if let Some(image) = assets.get(SLIDES[self.last_slide]) {
            renderer.draw_image(image, layout::CUTSCENE, 1.0, alpha);
        }
        if let Phase::Wiping { slide, wipe } = self.phase {
            let visible_width = (wipe.value() * GAME_W).floor();
            if let Some(image) = SLIDES.get(slide + 1).and_then(|next| assets.get(next)) {
                renderer.draw_image_cropped(image, layout::CUTSCENE, visible_width, alpha);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::Harness;
    use super::*;
    use crate::settings::{keys, MemoryStore};

    const STEP: f32 = 100.0;

    fn harness(seen: bool) -> Harness {
        let store = MemoryStore::new().with(keys::HAS_SEEN_INTRO, if seen { "true" } else { "false" });
        Harness::at(Screen::IntroCutscene, store, &[])
    }

    fn tap() -> Vec<PointerEvent> {
        vec![PointerEvent::down(270.0, 480.0)]
    }

    fn run_for(harness: &mut Harness, cutscene: &mut IntroCutscene, ms: f32) {
        let mut elapsed = 0.0;
        while elapsed < ms {
            harness.run(cutscene, STEP, &[]);
            elapsed += STEP;
        }
    }

    #[test]
    fn slides_hold_then_wipe_in_order() {
        let mut harness = harness(false);
        let mut cutscene = IntroCutscene::new(&mut harness.ctx());

        run_for(&mut harness, &mut cutscene, CUTSCENE_HOLD_MS - STEP);
        assert_eq!(cutscene.slide(), 0);
        run_for(&mut harness, &mut cutscene, STEP + CUTSCENE_WIPE_MS);
        assert_eq!(cutscene.slide(), 1);
        run_for(&mut harness, &mut cutscene, CUTSCENE_HOLD_MS + CUTSCENE_WIPE_MS);
        assert_eq!(cutscene.slide(), 2);
        assert!(!harness.transitions.is_transitioning());
    }

    #[test]
    fn last_slide_hold_fades_out_to_the_start_menu() {
        let mut harness = harness(false);
        let mut cutscene = IntroCutscene::new(&mut harness.ctx());
        let last_hold_ends =
            SLIDES.len() as f32 * CUTSCENE_HOLD_MS + (SLIDES.len() - 1) as f32 * CUTSCENE_WIPE_MS;

        run_for(&mut harness, &mut cutscene, last_hold_ends - STEP);
        assert_eq!(cutscene.slide(), SLIDES.len() - 1);
        assert!(!cutscene.is_leaving());
        assert!(!harness.session.settings.has_seen_intro());

        run_for(&mut harness, &mut cutscene, STEP);
        assert!(cutscene.is_leaving());
        assert!(harness.session.settings.has_seen_intro());
        assert_eq!(harness.transitions.pending_target(), Some(Screen::StartMenu));
        // a regular fade from the last slide, no black wipe first
        assert!(harness.transitions.cover_opacity() < 1.0);
    }

    #[test]
    fn tap_before_the_hold_ends_skips_when_seen() {
        let mut harness = harness(true);
        let mut cutscene = IntroCutscene::new(&mut harness.ctx());
        run_for(&mut harness, &mut cutscene, CUTSCENE_HOLD_MS / 2.0);

        harness.run(&mut cutscene, STEP, &tap());
        assert!(cutscene.is_leaving());
        assert_eq!(harness.transitions.pending_target(), Some(Screen::StartMenu));

        // the scheduled wipe never happens
        run_for(&mut harness, &mut cutscene, CUTSCENE_HOLD_MS + CUTSCENE_WIPE_MS);
        assert_eq!(cutscene.slide(), 0);
    }

    #[test]
    fn tap_is_ignored_until_the_intro_was_seen() {
        let mut harness = harness(false);
        let mut cutscene = IntroCutscene::new(&mut harness.ctx());
        harness.run(&mut cutscene, STEP, &tap());
        assert!(!cutscene.is_leaving());
        assert!(!harness.transitions.is_transitioning());

        run_for(&mut harness, &mut cutscene, CUTSCENE_HOLD_MS + CUTSCENE_WIPE_MS);
        assert_eq!(cutscene.slide(), 1);
    }

    #[test]
    fn skip_during_a_fade_is_retried_until_admitted() {
        let mut harness = harness(true);
        let mut cutscene = IntroCutscene::new(&mut harness.ctx());
        harness
            .transitions
            .fade_from_black(&mut harness.session.input_lock);

        harness.run(&mut cutscene, STEP, &tap());
        assert!(cutscene.is_leaving());
        assert_eq!(harness.transitions.pending_target(), None);

        run_for(&mut harness, &mut cutscene, 1000.0);
        assert!(harness.transitions.is_transitioning());
        assert_eq!(harness.transitions.current_screen(), Screen::IntroCutscene);
        run_for(&mut harness, &mut cutscene, 1000.0);
        assert_eq!(harness.transitions.current_screen(), Screen::StartMenu);
    }
}
