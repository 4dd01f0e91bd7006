//! Everything that lives as long as the page : settings, the input gate, the
//! audio coordinator and the screen the settings back button returns to.
use crate::audio::AudioCoordinator;
use crate::input_lock::InputLock;
use crate::scenes::Screen;
use crate::settings::Settings;

pub struct Session {
    pub settings: Settings,
    pub input_lock: InputLock,
    pub audio: AudioCoordinator,
    pub return_to: Screen,
}

impl Session {
    pub fn new(settings: Settings, audio: AudioCoordinator) -> Self {
        Session {
            settings,
            input_lock: InputLock::new(),
            audio,
            return_to: Screen::StartMenu,
        }
    }

    /// Transition lock or a button click still playing.
    pub fn is_input_locked(&self) -> bool {
        self.input_lock.is_locked() || self.audio.is_sfx_locked()
    }

    pub fn play_button_sfx(&mut self) -> bool {
        let volume = self.settings.sfx_volume();
        self.audio.play_button_sfx(volume)
    }

    /// Start `key` unless it is already playing or being faded to.
    pub fn ensure_bgm(&mut self, key: &str) {
        if self.audio.target_bgm_key() != Some(key) {
            let volume = self.settings.bgm_volume();
            self.audio.play_bgm(key, true, false, volume);
        }
    }

    pub fn set_bgm_volume(&mut self, volume: f32) {
        self.settings.set_bgm_volume(volume);
        self.audio.set_bgm_volume(self.settings.bgm_volume());
    }

    pub fn set_sfx_volume(&mut self, volume: f32) {
        self.settings.set_sfx_volume(volume);
    }

    pub fn update(&mut self, dt_ms: f32) {
        let bgm_volume = self.settings.bgm_volume();
        self.audio.update(dt_ms, bgm_volume);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::recording::RecordingBackend;
    use crate::settings::MemoryStore;

    fn session() -> (Session, RecordingBackend) {
        let backend = RecordingBackend::default();
        let session = Session::new(
            Settings::load(Box::new(MemoryStore::new())),
            AudioCoordinator::new(Box::new(backend.clone())),
        );
        (session, backend)
    }

    #[test]
    fn button_click_locks_input_until_it_ends() {
        let (mut session, _backend) = session();
        assert!(!session.is_input_locked());
        assert!(session.play_button_sfx());
        assert!(session.is_input_locked());
        session.update(1000.0);
        assert!(!session.is_input_locked());
    }

    #[test]
    fn ensure_bgm_does_not_restart_a_track_being_faded_to() {
        let (mut session, backend) = session();
        session.ensure_bgm("bgm_trapped");
        session.audio.switch_bgm("bgm_shuffle", 500.0, 500.0);
        session.ensure_bgm("bgm_shuffle");
        session.update(600.0);
        assert_eq!(
            backend.recording.borrow().started_keys(),
            vec!["bgm_trapped", "bgm_shuffle"]
        );
    }

    #[test]
    fn music_volume_applies_to_the_playing_track() {
        let (mut session, backend) = session();
        session.ensure_bgm("bgm_trapped");
        session.set_bgm_volume(1.4);
        let id = session.audio.current_bgm_id().unwrap();
        assert_eq!(backend.recording.borrow().track(id).unwrap().volume, 1.0);
        assert_eq!(session.settings.bgm_volume(), 1.0);
    }
}
