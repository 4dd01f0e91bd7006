use super::burst::Burst;
use super::tapped;
use crate::assets::AssetStore;
use crate::config::constants::{POP_DURATION_MS, POP_SCALE};
use crate::engine::input::PointerEvent;
use crate::engine::{Point, Rect, Renderer};
use crate::session::Session;
use crate::tween::{Ease, Progress, Tween};

/// Who holds the input lock while the button pops
/// - Action : nobody, the action locks for itself if it has to
/// - Pop    : the button, released right before the action fires
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LockPolicy {
    #[default]
    Action,
    Pop,
}

/// ┌──────────── Pop ────────────┐
/// │  Idle  → press → Rising     │
/// │  Rising  (1 → 1.08 QuadOut) │
/// │  Falling (1.08 → 1 QuadIn)  │
/// │  Falling → done → Idle      │
/// │            + action fires   │
/// └─────────────────────────────┘
#[derive(Debug, Copy, Clone, PartialEq)]
enum Pop {
    Idle,
    Rising(Tween),
    Falling(Tween),
}

/// Image that pops when tapped and reports the tap once the pop is over.
#[derive(Debug, Clone)]
pub struct ImageButton {
    texture: String,
    overlay: Option<String>,
    center: Point,
    policy: LockPolicy,
    pop: Pop,
    scale: f32,
    bursts: Vec<Burst>,
}

impl ImageButton {
    pub fn new(texture: &str, center: Point) -> Self {
        ImageButton {
            texture: texture.to_string(),
            overlay: None,
            center,
            policy: LockPolicy::default(),
            pop: Pop::Idle,
            scale: 1.0,
            bursts: Vec::new(),
        }
    }

    /// Second texture drawn on top, popping along.
    pub fn with_overlay(mut self, texture: &str) -> Self {
        self.overlay = Some(texture.to_string());
        self
    }

    pub fn with_policy(mut self, policy: LockPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn texture(&self) -> &str {
        &self.texture
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn burst_count(&self) -> usize {
        self.bursts.len()
    }

    pub fn is_popping(&self) -> bool {
        self.pop != Pop::Idle
    }

    /// `None` while the texture is missing, such a button can't be hit.
    pub fn hit_rect(&self, assets: &AssetStore) -> Option<Rect> {
        assets
            .size(&self.texture)
            .map(|size| Rect::from_center(self.center, size.scaled(self.scale)))
    }

    pub fn spawn_burst(&mut self) {
        self.bursts
            .push(Burst::new(&self.texture, self.center, self.scale));
    }

    /// Returns true on the tick the pop finishes, that is when the button's
    /// action should run.
    pub fn update(
        &mut self,
        dt_ms: f32,
        pointer: &[PointerEvent],
        assets: &AssetStore,
        session: &mut Session,
    ) -> bool {
        self.bursts.retain_mut(|burst| burst.update(dt_ms));

        if self.advance_pop(dt_ms, session) {
            return true;
        }
        let pressed = self
            .hit_rect(assets)
            .map_or(false, |rect| tapped(pointer, &rect));
        if pressed {
            self.press(session);
        }
        false
    }

    fn press(&mut self, session: &mut Session) {
        if session.is_input_locked() || self.is_popping() {
            log::debug!("Button '{}' ignored, input locked", self.texture);
            return;
        }
        session.play_button_sfx();
        if self.policy == LockPolicy::Pop {
            session.input_lock.lock();
        }
        self.pop = Pop::Rising(Tween::new(1.0, POP_SCALE, POP_DURATION_MS, Ease::QuadOut));
    }

    fn advance_pop(&mut self, dt_ms: f32, session: &mut Session) -> bool {
        match &mut self.pop {
            Pop::Idle => false,
            Pop::Rising(tween) => {
                match tween.update(dt_ms) {
                    Progress::InProgress(scale) => self.scale = scale,
                    Progress::Done(scale) => {
                        self.scale = scale;
                        self.pop =
                            Pop::Falling(Tween::new(POP_SCALE, 1.0, POP_DURATION_MS, Ease::QuadIn));
                    }
                }
                false
            }
            Pop::Falling(tween) => match tween.update(dt_ms) {
                Progress::InProgress(scale) => {
                    self.scale = scale;
                    false
                }
                Progress::Done(_) => {
                    self.scale = 1.0;
                    self.pop = Pop::Idle;
                    if self.policy == LockPolicy::Pop {
                        session.input_lock.unlock();
                    }
                    true
                }
            },
        }
    }

    pub fn draw(&self, renderer: &Renderer, assets: &AssetStore, alpha: f32) {
        for burst in &self.bursts {
            burst.draw(renderer, assets, alpha);
        }
        for key in std::iter::once(&self.texture).chain(self.overlay.as_ref()) {
            if let Some(image) = assets.get(key) {
                renderer.draw_image(image, self.center, self.scale, alpha);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::recording::RecordingBackend;
    use crate::audio::AudioCoordinator;
    use crate::engine::Size;
    use crate::settings::{MemoryStore, Settings};
    use approx::assert_relative_eq;

    const STEP: f32 = 10.0;

    fn session() -> Session {
        Session::new(
            Settings::load(Box::new(MemoryStore::new())),
            AudioCoordinator::new(Box::new(RecordingBackend::default())),
        )
    }

    fn assets() -> AssetStore {
        AssetStore::with_sizes([("btn_back", Size::new(100.0, 60.0))])
    }

    fn tap() -> Vec<PointerEvent> {
        vec![PointerEvent::down(60.0, 925.0)]
    }

    /// Ticks until the action fires, returns the elapsed time.
    fn run_until_fired(button: &mut ImageButton, assets: &AssetStore, session: &mut Session) -> Option<f32> {
        let mut elapsed = 0.0;
        for _ in 0..100 {
            elapsed += STEP;
            if button.update(STEP, &[], assets, session) {
                return Some(elapsed);
            }
        }
        None
    }

    #[test]
    fn action_fires_once_after_the_pop() {
        let assets = assets();
        let mut session = session();
        let mut button = ImageButton::new("btn_back", Point::new(60.0, 925.0));

        assert!(!button.update(STEP, &tap(), &assets, &mut session));
        assert!(button.is_popping());
        button.update(POP_DURATION_MS / 2.0, &[], &assets, &mut session);
        assert!(button.scale() > 1.0);

        let fired_after = run_until_fired(&mut button, &assets, &mut session).unwrap();
        assert!(fired_after <= POP_DURATION_MS * 2.0);
        assert_relative_eq!(button.scale(), 1.0);
        assert_eq!(run_until_fired(&mut button, &assets, &mut session), None);
    }

    #[test]
    fn taps_while_locked_or_outside_are_ignored() {
        let assets = assets();
        let mut session = session();
        let mut button = ImageButton::new("btn_back", Point::new(60.0, 925.0));

        session.input_lock.lock();
        button.update(STEP, &tap(), &assets, &mut session);
        assert!(!button.is_popping());
        session.input_lock.unlock();

        button.update(STEP, &[PointerEvent::down(300.0, 300.0)], &assets, &mut session);
        assert!(!button.is_popping());

        let missing = AssetStore::new();
        button.update(STEP, &tap(), &missing, &mut session);
        assert!(!button.is_popping());
    }

    #[test]
    fn click_sound_blocks_a_second_button() {
        let assets = AssetStore::with_sizes([
            ("btn_back", Size::new(100.0, 60.0)),
            ("btn_settings", Size::new(100.0, 60.0)),
        ]);
        let mut session = session();
        let mut back = ImageButton::new("btn_back", Point::new(60.0, 925.0));
        let mut settings = ImageButton::new("btn_settings", Point::new(300.0, 925.0));

        back.update(STEP, &tap(), &assets, &mut session);
        settings.update(STEP, &[PointerEvent::down(300.0, 925.0)], &assets, &mut session);
        assert!(back.is_popping());
        assert!(!settings.is_popping());
    }

    #[test]
    fn pop_policy_holds_the_lock_until_the_action() {
        let assets = assets();
        let mut session = session();
        let mut button =
            ImageButton::new("btn_back", Point::new(60.0, 925.0)).with_policy(LockPolicy::Pop);

        button.update(STEP, &tap(), &assets, &mut session);
        assert!(session.input_lock.is_locked());
        run_until_fired(&mut button, &assets, &mut session).unwrap();
        assert!(!session.input_lock.is_locked());
    }

    #[test]
    fn burst_expires_on_its_own() {
        let assets = assets();
        let mut session = session();
        let mut button = ImageButton::new("btn_back", Point::new(60.0, 925.0));

        button.update(STEP, &tap(), &assets, &mut session);
        assert_eq!(button.burst_count(), 0);
        button.spawn_burst();
        assert_eq!(button.burst_count(), 1);
        for _ in 0..40 {
            button.update(STEP, &[], &assets, &mut session);
        }
        assert_eq!(button.burst_count(), 0);
    }
}
