/// Gate for pointer-driven callbacks while something is animating.
///
/// No owner, no queue : whoever locks is expected to unlock once its
/// animation state machine reaches its final phase. The one-shot SFX half of
/// the gate lives in the audio coordinator, `Session::is_input_locked` ORs both.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InputLock {
    locked: bool,
}

impl InputLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent.
    pub fn lock(&mut self) {
        if !self.locked {
            log::debug!("Input locked");
        }
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        if self.locked {
            log::debug!("Input unlocked");
        }
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}
