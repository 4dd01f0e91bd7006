//! Background music and the button click.
//!
//! ┌────────────────────────── BGM fade flow ───────────────────────────┐
//! │  switch_bgm(next)                                                  │
//! │     Steady(current) ── FadingOut(current → 0) ── FadingIn(0 → vol) │
//! │                              stop + destroy       start next       │
//! └────────────────────────────────────────────────────────────────────┘
//! The one-shot SFX keeps its own lock, cleared by the backend reporting
//! the clip as ended or by the clip length plus a margin elapsing.
mod web;

pub use self::web::HtmlAudioBackend;

use crate::config::constants::{SFX_BUTTON, SFX_FALLBACK_CLIP_MS, SFX_UNLOCK_MARGIN_MS};
use crate::tween::{Ease, Progress, Tween};

pub type TrackId = u32;

/// What the coordinator needs from a sound engine.
pub trait AudioBackend {
    /// Create and start a sound. `None` when the key is unknown or playback
    /// cannot be created.
    fn start(&mut self, key: &str, looped: bool, volume: f32) -> Option<TrackId>;
    fn set_volume(&mut self, id: TrackId, volume: f32);
    /// Stop and destroy.
    fn stop(&mut self, id: TrackId);
    fn is_finished(&self, id: TrackId) -> bool;
    fn duration_ms(&self, id: TrackId) -> Option<f32>;
}

#[derive(Debug, Clone, PartialEq)]
struct Track {
    id: TrackId,
    key: String,
}

#[derive(Debug, Clone, PartialEq)]
enum BgmFade {
    Steady,
    FadingOut {
        tween: Tween,
        next: String,
        fade_in_ms: f32,
    },
    FadingIn {
        tween: Tween,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SfxPlayback {
    id: Option<TrackId>,
    elapsed_ms: f32,
    deadline_ms: f32,
}

pub struct AudioCoordinator {
    backend: Box<dyn AudioBackend>,
    current: Option<Track>,
    fade: BgmFade,
    sfx: Option<SfxPlayback>,
}

impl AudioCoordinator {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        AudioCoordinator {
            backend,
            current: None,
            fade: BgmFade::Steady,
            sfx: None,
        }
    }

    pub fn current_bgm_key(&self) -> Option<&str> {
        self.current.as_ref().map(|track| track.key.as_str())
    }

    pub fn current_bgm_id(&self) -> Option<TrackId> {
        self.current.as_ref().map(|track| track.id)
    }

    /// Track that will be playing once the running fade settles.
    pub fn target_bgm_key(&self) -> Option<&str> {
        match &self.fade {
            BgmFade::FadingOut { next, .. } => Some(next.as_str()),
            _ => self.current_bgm_key(),
        }
    }

    /// No-op when `key` already plays, unless `restart_if_same`.
    pub fn play_bgm(&mut self, key: &str, looped: bool, restart_if_same: bool, volume: f32) {
        if self.current_bgm_key() == Some(key) && !restart_if_same {
            return;
        }
        self.stop_current();
        self.fade = BgmFade::Steady;
        self.start_track(key, looped, volume);
    }

    /// Fade the current track out, then fade `key` in up to `volume`.
    pub fn switch_bgm(&mut self, key: &str, fade_out_ms: f32, fade_in_ms: f32) {
        // already heading somewhere, just retarget
        if let BgmFade::FadingOut {
            next,
            fade_in_ms: pending_fade_in,
            ..
        } = &mut self.fade
        {
            *next = key.to_string();
            *pending_fade_in = fade_in_ms;
            return;
        }
        if self.current_bgm_key() == Some(key) {
            return;
        }

        if self.current.is_some() {
            log::debug!("BGM fading out for '{}'", key);
            // a track still fading in fades out from where it got to
            let level = match &self.fade {
                BgmFade::FadingIn { tween } => tween.value(),
                _ => 1.0,
            };
            self.fade = BgmFade::FadingOut {
                tween: Tween::new(level, 0.0, fade_out_ms, Ease::Linear),
                next: key.to_string(),
                fade_in_ms,
            };
        } else {
            self.start_faded_in(key, fade_in_ms);
        }
    }

    /// Applies to the playing track right away; fades follow `volume` on
    /// their next tick.
    pub fn set_bgm_volume(&mut self, volume: f32) {
        if let (Some(track), BgmFade::Steady) = (&self.current, &self.fade) {
            self.backend.set_volume(track.id, volume);
        }
    }

    /// Start the button click unless one is still playing.
    /// Returns whether a click was started.
    pub fn play_button_sfx(&mut self, volume: f32) -> bool {
        if self.sfx.is_some() {
            return false;
        }
        let id = self.backend.start(SFX_BUTTON, false, volume);
        let clip_ms = id
            .and_then(|id| self.backend.duration_ms(id))
            .filter(|ms| ms.is_finite() && *ms > 0.0)
            .unwrap_or(SFX_FALLBACK_CLIP_MS);
        self.sfx = Some(SfxPlayback {
            id,
            elapsed_ms: 0.0,
            deadline_ms: clip_ms + SFX_UNLOCK_MARGIN_MS,
        });
        true
    }

    pub fn is_sfx_locked(&self) -> bool {
        self.sfx.is_some()
    }

    /// Advance fades and the SFX lock. `bgm_volume` is the stored volume.
    pub fn update(&mut self, dt_ms: f32, bgm_volume: f32) {
        self.update_fade(dt_ms, bgm_volume);
        self.update_sfx(dt_ms);
    }

    fn update_fade(&mut self, dt_ms: f32, bgm_volume: f32) {
        match &mut self.fade {
            BgmFade::Steady => {}
            BgmFade::FadingOut {
                tween,
                next,
                fade_in_ms,
            } => match tween.update(dt_ms) {
                Progress::InProgress(level) => {
                    if let Some(track) = &self.current {
                        self.backend.set_volume(track.id, level * bgm_volume);
                    }
                }
                Progress::Done(_) => {
                    let next = std::mem::take(next);
                    let fade_in_ms = *fade_in_ms;
                    self.stop_current();
                    self.start_faded_in(&next, fade_in_ms);
                }
            },
            BgmFade::FadingIn { tween } => {
                let level = match tween.update(dt_ms) {
                    Progress::InProgress(level) => level,
                    Progress::Done(level) => {
                        self.fade = BgmFade::Steady;
                        level
                    }
                };
                if let Some(track) = &self.current {
                    self.backend.set_volume(track.id, level * bgm_volume);
                }
            }
        }
    }

    fn update_sfx(&mut self, dt_ms: f32) {
        let Some(sfx) = &mut self.sfx else {
            return;
        };
        sfx.elapsed_ms += dt_ms;
        let ended = sfx.id.map_or(true, |id| self.backend.is_finished(id));
        if ended || sfx.elapsed_ms >= sfx.deadline_ms {
            if let Some(id) = sfx.id {
                self.backend.stop(id);
            }
            self.sfx = None;
        }
    }

    fn start_faded_in(&mut self, key: &str, fade_in_ms: f32) {
        self.start_track(key, true, 0.0);
        self.fade = if self.current.is_some() {
            BgmFade::FadingIn {
                tween: Tween::new(0.0, 1.0, fade_in_ms, Ease::Linear),
            }
        } else {
            BgmFade::Steady
        };
    }

    fn start_track(&mut self, key: &str, looped: bool, volume: f32) {
        match self.backend.start(key, looped, volume) {
            Some(id) => {
                log::info!("BGM '{}' started", key);
                self.current = Some(Track {
                    id,
                    key: key.to_string(),
                });
            }
            None => log::warn!("BGM '{}' could not be started", key),
        }
    }

    fn stop_current(&mut self) {
        if let Some(track) = self.current.take() {
            log::debug!("BGM '{}' stopped", track.key);
            self.backend.stop(track.id);
        }
    }
}

/// In-memory backend that records every call, for tests of anything that
/// makes noise.
pub mod recording {
    use super::{AudioBackend, TrackId};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedTrack {
        pub key: String,
        pub looped: bool,
        pub volume: f32,
        pub stopped: bool,
        pub finished: bool,
    }

    #[derive(Debug, Default)]
    pub struct Recording {
        pub tracks: HashMap<TrackId, RecordedTrack>,
        pub started: Vec<TrackId>,
        next_id: TrackId,
    }

    impl Recording {
        pub fn track(&self, id: TrackId) -> Option<&RecordedTrack> {
            self.tracks.get(&id)
        }

        pub fn active(&self) -> Vec<&RecordedTrack> {
            self.started
                .iter()
                .filter_map(|id| self.tracks.get(id))
                .filter(|track| !track.stopped)
                .collect()
        }

        pub fn started_keys(&self) -> Vec<&str> {
            self.started
                .iter()
                .filter_map(|id| self.tracks.get(id))
                .map(|track| track.key.as_str())
                .collect()
        }
    }

    /// Cloning shares the recording, so a test keeps a handle after boxing.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingBackend {
        pub recording: Rc<RefCell<Recording>>,
        pub clip_ms: Option<f32>,
    }

    impl AudioBackend for RecordingBackend {
        fn start(&mut self, key: &str, looped: bool, volume: f32) -> Option<TrackId> {
            let mut recording = self.recording.borrow_mut();
            recording.next_id += 1;
            let id = recording.next_id;
            recording.tracks.insert(
                id,
                RecordedTrack {
                    key: key.to_string(),
                    looped,
                    volume,
                    stopped: false,
                    finished: false,
                },
            );
            recording.started.push(id);
            Some(id)
        }

        fn set_volume(&mut self, id: TrackId, volume: f32) {
            if let Some(track) = self.recording.borrow_mut().tracks.get_mut(&id) {
                track.volume = volume;
            }
        }

        fn stop(&mut self, id: TrackId) {
            if let Some(track) = self.recording.borrow_mut().tracks.get_mut(&id) {
                track.stopped = true;
            }
        }

        fn is_finished(&self, id: TrackId) -> bool {
            self.recording
                .borrow()
                .tracks
                .get(&id)
                .map_or(true, |track| track.finished)
        }

        fn duration_ms(&self, _id: TrackId) -> Option<f32> {
            self.clip_ms
        }
    }
}
