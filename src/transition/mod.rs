//! Scene transition coordinator.
//!
//! ┌──────────────────── Transition Flow ─────────────────────┐
//! │  From State  →  Event         →  To State                │
//! ├──────────────────────────────────────────────────────────┤
//! │  Idle        →  Begin         →  FadingOut               │
//! │  Idle        →  Cover         →  Switching (already black)│
//! │  -------        ------                                   │
//! │  FadingOut   →  Update        →  Switching (when covered)│
//! │  Switching   →  Update        →  FadingIn  (after settle)│
//! │  FadingIn    →  Update        →  Idle      (when shown)  │
//! └──────────────────────────────────────────────────────────┘
//! The switch (stop old scene, start the next) is handed out by the first
//! `update` spent in Switching, so it happens exactly once. Requests that
//! arrive while not Idle are dropped.
mod state;

use self::state::{
    FadingIn, FadingOut, Idle, IsFadingIn, IsFadingOut, IsSwitching, Switching, TransitionContext,
    TransitionState,
};
use crate::input_lock::InputLock;
use crate::scenes::{ScenePayload, Screen};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    /// full-screen black cover in and out
    Opaque,
    /// scene roots fade over the backdrop, no cover
    Transparent,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TransitionRequest {
    pub target: Screen,
    pub mode: Mode,
    pub payload: Option<ScenePayload>,
}

impl TransitionRequest {
    pub fn opaque(target: Screen) -> Self {
        TransitionRequest {
            target,
            mode: Mode::Opaque,
            payload: None,
        }
    }

    pub fn transparent(target: Screen) -> Self {
        TransitionRequest {
            target,
            mode: Mode::Transparent,
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: ScenePayload) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Answer to a transition request
/// - Started    : input is locked until the new scene is fully shown
/// - Busy       : another transition owns the slot, request dropped
/// - NotAllowed : target is not reachable from the current screen
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Admission {
    Started,
    Busy,
    NotAllowed,
}

enum Event {
    Begin(TransitionRequest),
    Cover(Option<TransitionRequest>),
    Update(f32),
}

#[derive(Debug, Copy, Clone)]
enum TransitionStateMachine {
    Idle(TransitionState<Idle>),
    FadingOut(TransitionState<FadingOut>),
    Switching(TransitionState<Switching>),
    FadingIn(TransitionState<FadingIn>),
}

impl From<TransitionState<Idle>> for TransitionStateMachine {
    fn from(state: TransitionState<Idle>) -> Self {
        TransitionStateMachine::Idle(state)
    }
}

impl From<TransitionState<FadingOut>> for TransitionStateMachine {
    fn from(state: TransitionState<FadingOut>) -> Self {
        TransitionStateMachine::FadingOut(state)
    }
}

impl From<TransitionState<Switching>> for TransitionStateMachine {
    fn from(state: TransitionState<Switching>) -> Self {
        TransitionStateMachine::Switching(state)
    }
}

impl From<TransitionState<FadingIn>> for TransitionStateMachine {
    fn from(state: TransitionState<FadingIn>) -> Self {
        TransitionStateMachine::FadingIn(state)
    }
}

impl From<IsFadingOut> for TransitionStateMachine {
    fn from(is_fading_out: IsFadingOut) -> Self {
        match is_fading_out {
            IsFadingOut::Done(switching_state) => switching_state.into(),
            IsFadingOut::InProgress(fading_out_state) => fading_out_state.into(),
        }
    }
}

impl From<IsSwitching> for TransitionStateMachine {
    fn from(is_switching: IsSwitching) -> Self {
        match is_switching {
            IsSwitching::Done(fading_in_state) => fading_in_state.into(),
            IsSwitching::InProgress(switching_state) => switching_state.into(),
        }
    }
}

impl From<IsFadingIn> for TransitionStateMachine {
    fn from(is_fading_in: IsFadingIn) -> Self {
        match is_fading_in {
            IsFadingIn::Done(idle_state) => idle_state.into(),
            IsFadingIn::InProgress(fading_in_state) => fading_in_state.into(),
        }
    }
}

impl TransitionStateMachine {
    fn transition(self, event: Event) -> Self {
        use TransitionStateMachine::*;
        match (self, event) {
            (Idle(state), Event::Begin(request)) => state.begin(request).into(),
            (Idle(state), Event::Cover(request)) => state.cover(request).into(),
            (FadingOut(state), Event::Update(dt_ms)) => state.update(dt_ms).into(),
            (Switching(state), Event::Update(dt_ms)) => state.update(dt_ms).into(),
            (FadingIn(state), Event::Update(dt_ms)) => state.update(dt_ms).into(),
            (this, _) => this,
        }
    }

    fn context(&self) -> &TransitionContext {
        match self {
            TransitionStateMachine::Idle(state) => state.context(),
            TransitionStateMachine::FadingOut(state) => state.context(),
            TransitionStateMachine::Switching(state) => state.context(),
            TransitionStateMachine::FadingIn(state) => state.context(),
        }
    }
}

pub struct TransitionCoordinator {
    state_machine: TransitionStateMachine,
    current: Screen,
}

impl Default for TransitionCoordinator {
    fn default() -> Self {
        TransitionCoordinator::starting_at(Screen::Launch)
    }
}

impl TransitionCoordinator {
    pub fn starting_at(current: Screen) -> Self {
        TransitionCoordinator {
            state_machine: TransitionState::new().into(),
            current,
        }
    }

    /// Screen that owns the stage, switches over as soon as the next one starts.
    pub fn current_screen(&self) -> Screen {
        self.current
    }

    pub fn is_transitioning(&self) -> bool {
        !matches!(self.state_machine, TransitionStateMachine::Idle(_))
    }

    /// Target still waiting for its switch.
    pub fn pending_target(&self) -> Option<Screen> {
        self.state_machine.context().request().map(|request| request.target)
    }

    /// Fade to black, switch, fade back.
    pub fn transition_to(
        &mut self,
        target: Screen,
        payload: Option<ScenePayload>,
        lock: &mut InputLock,
    ) -> Admission {
        self.request(
            TransitionRequest {
                target,
                mode: Mode::Opaque,
                payload,
            },
            lock,
        )
    }

    /// Cross-fade the scene roots, the backdrop stays visible.
    pub fn transparent_transition_to(
        &mut self,
        target: Screen,
        payload: Option<ScenePayload>,
        lock: &mut InputLock,
    ) -> Admission {
        self.request(
            TransitionRequest {
                target,
                mode: Mode::Transparent,
                payload,
            },
            lock,
        )
    }

    pub fn request(&mut self, request: TransitionRequest, lock: &mut InputLock) -> Admission {
        let admission = self.admit(request.target);
        if admission == Admission::Started {
            log::info!(
                "Transition {:?} -> {:?} ({:?})",
                self.current,
                request.target,
                request.mode
            );
            lock.lock();
            self.state_machine = self.state_machine.transition(Event::Begin(request));
        }
        admission
    }

    /// The caller already wiped to black : cover instantly, switch on the
    /// next update, then fade in as usual.
    pub fn complete_wipe_transition(&mut self, target: Screen, lock: &mut InputLock) -> Admission {
        let admission = self.admit(target);
        if admission == Admission::Started {
            log::info!("Wipe transition {:?} -> {:?}", self.current, target);
            lock.lock();
            self.state_machine = self
                .state_machine
                .transition(Event::Cover(Some(TransitionRequest::opaque(target))));
        }
        admission
    }

    /// Start from a black screen and fade it away, no scene switch.
    pub fn fade_from_black(&mut self, lock: &mut InputLock) -> Admission {
        if self.is_transitioning() {
            log::debug!("fade_from_black dropped, transition in flight");
            return Admission::Busy;
        }
        lock.lock();
        self.state_machine = self.state_machine.transition(Event::Cover(None));
        Admission::Started
    }

    fn admit(&self, target: Screen) -> Admission {
        if self.is_transitioning() {
            log::debug!(
                "Transition to {:?} dropped, {:?} still in flight",
                target,
                self.pending_target()
            );
            Admission::Busy
        } else if !self.current.can_transition_to(target) {
            log::warn!("No transition from {:?} to {:?}", self.current, target);
            Admission::NotAllowed
        } else {
            Admission::Started
        }
    }

    /// Advance the fades. Returns the switch to perform, exactly once per
    /// admitted request.
    pub fn update(&mut self, dt_ms: f32, lock: &mut InputLock) -> Option<TransitionRequest> {
        let switch = match &mut self.state_machine {
            TransitionStateMachine::Switching(state) => state.take_request(),
            _ => None,
        };
        if let Some(request) = switch {
            log::info!("Switching {:?} -> {:?}", self.current, request.target);
            self.current = request.target;
        }

        let was_transitioning = self.is_transitioning();
        self.state_machine = self.state_machine.transition(Event::Update(dt_ms));
        if was_transitioning && !self.is_transitioning() {
            log::info!("Transition into {:?} finished", self.current);
            lock.unlock();
        }
        switch
    }

    /// Opacity of the full-screen black cover.
    pub fn cover_opacity(&self) -> f32 {
        let context = self.state_machine.context();
        match context.mode() {
            Mode::Opaque => context.coverage(),
            Mode::Transparent => 0.0,
        }
    }

    /// Opacity of the active scene's root.
    pub fn scene_alpha(&self) -> f32 {
        let context = self.state_machine.context();
        match context.mode() {
            Mode::Opaque => 1.0,
            Mode::Transparent => 1.0 - context.coverage(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::constants::{ELEMENT_FADE_MS, FADE_MS, SWITCH_SETTLE_MS};
    use approx::assert_relative_eq;

    const STEP: f32 = 10.0;

    /// Runs until idle, returns every switch handed out.
    fn run_to_idle(
        coordinator: &mut TransitionCoordinator,
        lock: &mut InputLock,
    ) -> Vec<TransitionRequest> {
        let mut switches = Vec::new();
        for _ in 0..1000 {
            switches.extend(coordinator.update(STEP, lock));
            if !coordinator.is_transitioning() {
                break;
            }
        }
        switches
    }

    #[test]
    fn dropped_request_leaves_the_in_flight_target_alone() {
        for from in Screen::ALL {
            for to in from.allowed_targets() {
                for intruder in Screen::ALL {
                    let mut lock = InputLock::new();
                    let mut coordinator = TransitionCoordinator::starting_at(from);
                    assert_eq!(
                        coordinator.transition_to(*to, None, &mut lock),
                        Admission::Started
                    );

                    // one intrusion in each phase
                    let mut switches = Vec::new();
                    for _ in 0..200 {
                        assert_eq!(
                            coordinator.transparent_transition_to(intruder, None, &mut lock),
                            Admission::Busy
                        );
                        assert_eq!(
                            coordinator.complete_wipe_transition(intruder, &mut lock),
                            Admission::Busy
                        );
                        if switches.is_empty() {
                            assert_eq!(coordinator.pending_target(), Some(*to));
                        }
                        switches.extend(coordinator.update(STEP, &mut lock));
                        if !coordinator.is_transitioning() {
                            break;
                        }
                    }

                    assert_eq!(switches, vec![TransitionRequest::opaque(*to)]);
                    assert_eq!(coordinator.current_screen(), *to);
                    assert!(!lock.is_locked());
                }
            }
        }
    }

    #[test]
    fn opaque_transition_covers_switches_then_uncovers() {
        let mut lock = InputLock::new();
        let mut coordinator = TransitionCoordinator::starting_at(Screen::Settings);
        coordinator.transition_to(Screen::StartMenu, Some(ScenePayload::FromInside), &mut lock);
        assert!(lock.is_locked());

        assert_eq!(coordinator.update(FADE_MS / 4.0, &mut lock), None);
        assert_relative_eq!(coordinator.cover_opacity(), 0.5);
        assert_relative_eq!(coordinator.scene_alpha(), 1.0);

        assert_eq!(coordinator.update(FADE_MS / 4.0, &mut lock), None);
        assert_relative_eq!(coordinator.cover_opacity(), 1.0);

        let switch = coordinator.update(SWITCH_SETTLE_MS / 2.0, &mut lock);
        assert_eq!(
            switch,
            Some(TransitionRequest::opaque(Screen::StartMenu).with_payload(ScenePayload::FromInside))
        );
        // settling, still black
        assert_relative_eq!(coordinator.cover_opacity(), 1.0);
        assert_eq!(coordinator.update(SWITCH_SETTLE_MS / 2.0, &mut lock), None);

        coordinator.update(FADE_MS / 4.0, &mut lock);
        assert_relative_eq!(coordinator.cover_opacity(), 0.5);
        assert!(lock.is_locked());
        coordinator.update(FADE_MS / 4.0, &mut lock);
        assert!(!coordinator.is_transitioning());
        assert!(!lock.is_locked());
        assert_relative_eq!(coordinator.cover_opacity(), 0.0);
    }

    #[test]
    fn transparent_transition_fades_scene_roots_only() {
        let mut lock = InputLock::new();
        let mut coordinator = TransitionCoordinator::starting_at(Screen::StartMenu);
        coordinator.transparent_transition_to(Screen::CharacterSelect, None, &mut lock);

        coordinator.update(ELEMENT_FADE_MS / 2.0, &mut lock);
        assert_relative_eq!(coordinator.cover_opacity(), 0.0);
        assert_relative_eq!(coordinator.scene_alpha(), 0.5);

        coordinator.update(ELEMENT_FADE_MS / 2.0, &mut lock);
        assert_relative_eq!(coordinator.scene_alpha(), 0.0);
        let switch = coordinator.update(STEP, &mut lock);
        assert_eq!(switch, Some(TransitionRequest::transparent(Screen::CharacterSelect)));
        // no settle delay, the new root is still invisible
        assert_relative_eq!(coordinator.scene_alpha(), 0.0);

        let rest = run_to_idle(&mut coordinator, &mut lock);
        assert!(rest.is_empty());
        assert_relative_eq!(coordinator.scene_alpha(), 1.0);
        assert!(!lock.is_locked());
    }

    #[test]
    fn complete_wipe_goes_black_instantly_and_switches_next_update() {
        let mut lock = InputLock::new();
        let mut coordinator = TransitionCoordinator::starting_at(Screen::IntroCutscene);
        assert_eq!(
            coordinator.complete_wipe_transition(Screen::StartMenu, &mut lock),
            Admission::Started
        );
        assert_relative_eq!(coordinator.cover_opacity(), 1.0);
        assert_eq!(
            coordinator.update(STEP, &mut lock),
            Some(TransitionRequest::opaque(Screen::StartMenu))
        );
        assert!(run_to_idle(&mut coordinator, &mut lock).is_empty());
        assert!(!lock.is_locked());
    }

    #[test]
    fn fade_from_black_never_switches() {
        let mut lock = InputLock::new();
        let mut coordinator = TransitionCoordinator::default();
        assert_eq!(coordinator.fade_from_black(&mut lock), Admission::Started);
        assert!(lock.is_locked());
        assert_relative_eq!(coordinator.cover_opacity(), 1.0);
        assert!(run_to_idle(&mut coordinator, &mut lock).is_empty());
        assert_eq!(coordinator.current_screen(), Screen::Launch);
        assert!(!lock.is_locked());
    }

    #[test]
    fn targets_outside_the_table_are_rejected() {
        let mut lock = InputLock::new();
        let mut coordinator = TransitionCoordinator::starting_at(Screen::Launch);
        assert_eq!(
            coordinator.transition_to(Screen::LevelSelect, None, &mut lock),
            Admission::NotAllowed
        );
        assert!(!coordinator.is_transitioning());
        assert!(!lock.is_locked());
    }
}
