//! Frame-driven interpolation. Nothing here owns a callback : a tween is
//! advanced once per tick and reports `Done` exactly when it reaches its end,
//! the caller turns that into its own next state.
use std::f32::consts::PI;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Ease {
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    SineInOut,
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::QuadIn => t * t,
            Ease::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Ease::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}

pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Returned by `Tween::update`
/// - InProgress : current value, keep ticking
/// - Done       : final value, reported once per tween
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Progress {
    InProgress(f32),
    Done(f32),
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    duration_ms: f32,
    elapsed_ms: f32,
    ease: Ease,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration_ms: f32, ease: Ease) -> Self {
        Tween {
            from,
            to,
            duration_ms: duration_ms.max(0.0),
            elapsed_ms: 0.0,
            ease,
        }
    }

    pub fn update(&mut self, dt_ms: f32) -> Progress {
        self.elapsed_ms = (self.elapsed_ms + dt_ms.max(0.0)).min(self.duration_ms);
        if self.is_done() {
            Progress::Done(self.to)
        } else {
            Progress::InProgress(self.value())
        }
    }

    /// 0..=1, un-eased
    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            self.elapsed_ms / self.duration_ms
        }
    }

    pub fn value(&self) -> f32 {
        lerp(self.from, self.to, self.ease.apply(self.progress()))
    }

    pub fn is_done(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

/// A delayed call without the call : `update` is true on the tick it elapses.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Delay {
    remaining_ms: f32,
}

impl Delay {
    pub fn new(duration_ms: f32) -> Self {
        Delay {
            remaining_ms: duration_ms.max(0.0),
        }
    }

    pub fn update(&mut self, dt_ms: f32) -> bool {
        if self.remaining_ms <= 0.0 {
            return false;
        }
        self.remaining_ms -= dt_ms.max(0.0);
        self.remaining_ms <= 0.0
    }

    pub fn remaining_ms(&self) -> f32 {
        self.remaining_ms.max(0.0)
    }
}

/// Endless yoyo between `min` and `max`, one leg every `half_period_ms`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pulse {
    min: f32,
    max: f32,
    half_period_ms: f32,
    elapsed_ms: f32,
}

impl Pulse {
    pub fn new(min: f32, max: f32, half_period_ms: f32) -> Self {
        Pulse {
            min,
            max,
            half_period_ms: half_period_ms.max(1.0),
            elapsed_ms: 0.0,
        }
    }

    pub fn update(&mut self, dt_ms: f32) -> f32 {
        self.elapsed_ms = (self.elapsed_ms + dt_ms.max(0.0)) % (self.half_period_ms * 2.0);
        self.value()
    }

    pub fn value(&self) -> f32 {
        let leg = self.elapsed_ms / self.half_period_ms;
        let t = if leg <= 1.0 { leg } else { 2.0 - leg };
        lerp(self.min, self.max, Ease::SineInOut.apply(t))
    }
}
