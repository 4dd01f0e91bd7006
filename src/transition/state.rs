/// Each phase of a transition is its own type, so the only way from one phase
/// to the next is through the methods below :
/// - PUBLIC  : TransitionState and the phase markers
/// - PRIVATE : the context fields, nobody outside can skip a phase
///
/// `coverage` is the single animated value, 0 = next scene fully shown and
/// 1 = fully hidden. What it drives depends on the mode (cover or scene root).
use super::{Mode, TransitionRequest};
use crate::config::constants::{ELEMENT_FADE_MS, FADE_MS, SWITCH_SETTLE_MS};
use crate::tween::{Delay, Ease, Progress, Tween};

#[derive(Debug, Copy, Clone)]
pub struct Idle;
#[derive(Debug, Copy, Clone)]
pub struct FadingOut;
#[derive(Debug, Copy, Clone)]
pub struct Switching;
#[derive(Debug, Copy, Clone)]
pub struct FadingIn;

pub enum IsFadingOut {
    Done(TransitionState<Switching>),
    InProgress(TransitionState<FadingOut>),
}

pub enum IsSwitching {
    Done(TransitionState<FadingIn>),
    InProgress(TransitionState<Switching>),
}

pub enum IsFadingIn {
    Done(TransitionState<Idle>),
    InProgress(TransitionState<FadingIn>),
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TransitionContext {
    mode: Mode,
    coverage: f32,
    request: Option<TransitionRequest>,
    fade: Tween,
    settle: Delay,
}

impl TransitionContext {
    fn new(mode: Mode, request: Option<TransitionRequest>) -> Self {
        TransitionContext {
            mode,
            coverage: 0.0,
            request,
            fade: Tween::new(0.0, 1.0, fade_ms(mode), Ease::Linear),
            settle: Delay::new(settle_ms(mode)),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn coverage(&self) -> f32 {
        self.coverage
    }

    pub fn request(&self) -> Option<TransitionRequest> {
        self.request
    }
}

/// Length of one half of the round trip.
fn fade_ms(mode: Mode) -> f32 {
    match mode {
        Mode::Opaque => FADE_MS / 2.0,
        Mode::Transparent => ELEMENT_FADE_MS,
    }
}

fn settle_ms(mode: Mode) -> f32 {
    match mode {
        Mode::Opaque => SWITCH_SETTLE_MS,
        Mode::Transparent => 0.0,
    }
}

#[derive(Debug, Copy, Clone)]
pub struct TransitionState<S> {
    context: TransitionContext,
    // phantom marker, only there to tell the phases apart at compile time
    _state: S,
}

impl<S> TransitionState<S> {
    pub fn context(&self) -> &TransitionContext {
        &self.context
    }
}

impl Default for TransitionState<Idle> {
    fn default() -> Self {
        TransitionState::new()
    }
}

impl TransitionState<Idle> {
    pub fn new() -> Self {
        TransitionState {
            context: TransitionContext::new(Mode::Opaque, None),
            _state: Idle,
        }
    }

    pub fn begin(self, request: TransitionRequest) -> TransitionState<FadingOut> {
        TransitionState {
            context: TransitionContext::new(request.mode, Some(request)),
            _state: FadingOut,
        }
    }

    /// Skip the fade out : the cover is already black (someone else wiped).
    pub fn cover(self, request: Option<TransitionRequest>) -> TransitionState<Switching> {
        let mut context = TransitionContext::new(Mode::Opaque, request);
        context.coverage = 1.0;
        TransitionState {
            context,
            _state: Switching,
        }
    }
}

impl TransitionState<FadingOut> {
    pub fn update(mut self, dt_ms: f32) -> IsFadingOut {
        match self.context.fade.update(dt_ms) {
            Progress::InProgress(coverage) => {
                self.context.coverage = coverage;
                IsFadingOut::InProgress(self)
            }
            Progress::Done(_) => IsFadingOut::Done(self.covered()),
        }
    }

    fn covered(mut self) -> TransitionState<Switching> {
        self.context.coverage = 1.0;
        TransitionState {
            context: self.context,
            _state: Switching,
        }
    }
}

impl TransitionState<Switching> {
    /// Hands the request out once, later calls get `None`.
    pub fn take_request(&mut self) -> Option<TransitionRequest> {
        self.context.request.take()
    }

    pub fn update(mut self, dt_ms: f32) -> IsSwitching {
        self.context.settle.update(dt_ms);
        if self.context.settle.remaining_ms() > 0.0 {
            IsSwitching::InProgress(self)
        } else {
            IsSwitching::Done(self.uncover())
        }
    }

    fn uncover(mut self) -> TransitionState<FadingIn> {
        self.context.fade = Tween::new(1.0, 0.0, fade_ms(self.context.mode), Ease::Linear);
        TransitionState {
            context: self.context,
            _state: FadingIn,
        }
    }
}

impl TransitionState<FadingIn> {
    pub fn update(mut self, dt_ms: f32) -> IsFadingIn {
        match self.context.fade.update(dt_ms) {
            Progress::InProgress(coverage) => {
                self.context.coverage = coverage;
                IsFadingIn::InProgress(self)
            }
            Progress::Done(_) => IsFadingIn::Done(self.finish()),
        }
    }

    fn finish(self) -> TransitionState<Idle> {
        TransitionState::new()
    }
}
