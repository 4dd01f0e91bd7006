//! Player settings, reloaded at start-up and written back on every change.
//!
//! Values are stored as plain strings under fixed keys, so a store only has
//! to speak `get` / `set` of strings:
//! ┌──────────────────────────────┬──────────┬─────────┐
//! │ key                          │ value    │ default │
//! ├──────────────────────────────┼──────────┼─────────┤
//! │ trapped_bgmVolume            │ "0.74"   │ 0.74    │
//! │ trapped_sfxVolume            │ "0.74"   │ 0.74    │
//! │ trapped_hasSeenIntroCutscene │ "true"   │ false   │
//! │ trapped_selectedCharacter    │ "Char_3" │ Char_1  │
//! │ trapped_playerName           │ "Kim"    │ ""      │
//! └──────────────────────────────┴──────────┴─────────┘
//! `is_maximized` lives only for the session.
use crate::browser;
use crate::config::constants::PLAYER_NAME_MAX;
use anyhow::{anyhow, Result};
use std::collections::HashMap;

pub mod keys {
    pub const BGM_VOLUME: &str = "trapped_bgmVolume";
    pub const SFX_VOLUME: &str = "trapped_sfxVolume";
    pub const HAS_SEEN_INTRO: &str = "trapped_hasSeenIntroCutscene";
    pub const SELECTED_CHARACTER: &str = "trapped_selectedCharacter";
    pub const PLAYER_NAME: &str = "trapped_playerName";
}

pub const DEFAULT_VOLUME: f32 = 0.74;
pub const DEFAULT_CHARACTER: &str = "Char_1";

/// Durable string key/value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Volatile store, used when localStorage is unavailable and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// window.localStorage
pub struct LocalStore {
    storage: web_sys::Storage,
}

impl LocalStore {
    pub fn open() -> Result<Self> {
        Ok(LocalStore {
            storage: browser::local_storage()?,
        })
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|err| anyhow!("localStorage read of '{}' failed : {:#?}", key, err))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|err| anyhow!("localStorage write of '{}' failed : {:#?}", key, err))
    }
}

/// Open localStorage, or fall back to a session-only store.
pub fn default_store() -> Box<dyn KeyValueStore> {
    match LocalStore::open() {
        Ok(store) => Box::new(store),
        Err(err) => {
            log::warn!("Settings will not persist : {:#}", err);
            Box::new(MemoryStore::new())
        }
    }
}

pub struct Settings {
    bgm_volume: f32,
    sfx_volume: f32,
    selected_character_id: String,
    player_name: String,
    has_seen_intro: bool,
    is_maximized: bool,
    store: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("bgm_volume", &self.bgm_volume)
            .field("sfx_volume", &self.sfx_volume)
            .field("selected_character_id", &self.selected_character_id)
            .field("player_name", &self.player_name)
            .field("has_seen_intro", &self.has_seen_intro)
            .field("is_maximized", &self.is_maximized)
            .finish()
    }
}

impl Settings {
    /// Read every key once. Unreadable or malformed values keep their default.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let mut settings = Settings {
            bgm_volume: DEFAULT_VOLUME,
            sfx_volume: DEFAULT_VOLUME,
            selected_character_id: DEFAULT_CHARACTER.to_string(),
            player_name: String::new(),
            has_seen_intro: false,
            is_maximized: false,
            store,
        };

        if let Some(volume) = settings.read(keys::BGM_VOLUME).and_then(parse_volume) {
            settings.bgm_volume = volume;
        }
        if let Some(volume) = settings.read(keys::SFX_VOLUME).and_then(parse_volume) {
            settings.sfx_volume = volume;
        }
        if let Some(seen) = settings.read(keys::HAS_SEEN_INTRO) {
            settings.has_seen_intro = seen == "true";
        }
        if let Some(id) = settings.read(keys::SELECTED_CHARACTER) {
            settings.selected_character_id = id;
        }
        if let Some(name) = settings.read(keys::PLAYER_NAME) {
            settings.player_name = truncate_name(&name);
        }

        log::debug!("Settings loaded : {:?}", settings);
        settings
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("Failed to load '{}' : {:#}", key, err);
                None
            }
        }
    }

    fn persist(&mut self, key: &str, value: &str) {
        if let Err(err) = self.store.set(key, value) {
            log::warn!("Failed to save '{}' : {:#}", key, err);
        }
    }

    pub fn bgm_volume(&self) -> f32 {
        self.bgm_volume
    }

    pub fn set_bgm_volume(&mut self, volume: f32) {
        self.bgm_volume = clamp_volume(volume);
        let value = self.bgm_volume.to_string();
        self.persist(keys::BGM_VOLUME, &value);
    }

    pub fn sfx_volume(&self) -> f32 {
        self.sfx_volume
    }

    pub fn set_sfx_volume(&mut self, volume: f32) {
        self.sfx_volume = clamp_volume(volume);
        let value = self.sfx_volume.to_string();
        self.persist(keys::SFX_VOLUME, &value);
    }

    pub fn selected_character_id(&self) -> &str {
        &self.selected_character_id
    }

    pub fn set_selected_character_id(&mut self, id: &str) {
        self.selected_character_id = id.to_string();
        self.persist(keys::SELECTED_CHARACTER, id);
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Names longer than the field allows are cut, never rejected.
    pub fn set_player_name(&mut self, name: &str) {
        self.player_name = truncate_name(name);
        let value = self.player_name.clone();
        self.persist(keys::PLAYER_NAME, &value);
    }

    pub fn has_seen_intro(&self) -> bool {
        self.has_seen_intro
    }

    pub fn set_has_seen_intro(&mut self, seen: bool) {
        self.has_seen_intro = seen;
        self.persist(keys::HAS_SEEN_INTRO, if seen { "true" } else { "false" });
    }

    pub fn is_maximized(&self) -> bool {
        self.is_maximized
    }

    pub fn set_maximized(&mut self, maximized: bool) {
        self.is_maximized = maximized;
    }
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

fn parse_volume(raw: String) -> Option<f32> {
    match raw.trim().parse::<f32>() {
        Ok(volume) => Some(clamp_volume(volume)),
        Err(_) => {
            log::warn!("Ignoring stored volume '{}'", raw);
            None
        }
    }
}

fn truncate_name(name: &str) -> String {
    name.chars().take(PLAYER_NAME_MAX).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Store whose contents stay observable after it is boxed into Settings
    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryStore>>);

    impl KeyValueStore for SharedStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.0.borrow().get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            self.0.borrow_mut().set(key, value)
        }
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(anyhow!("denied"))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(anyhow!("quota exceeded"))
        }
    }

    #[test]
    fn volume_setters_clamp_into_unit_range() {
        let mut settings = Settings::load(Box::new(MemoryStore::new()));
        settings.set_bgm_volume(1.5);
        assert_eq!(settings.bgm_volume(), 1.0);
        settings.set_sfx_volume(-0.3);
        assert_eq!(settings.sfx_volume(), 0.0);
        settings.set_sfx_volume(f32::NAN);
        assert_eq!(settings.sfx_volume(), 0.0);
    }

    #[test]
    fn every_mutation_is_persisted() {
        let store = SharedStore::default();
        let mut settings = Settings::load(Box::new(store.clone()));
        settings.set_bgm_volume(0.5);
        settings.set_has_seen_intro(true);
        settings.set_selected_character_id("Char_4");
        settings.set_player_name("Robin");

        let saved = store.0.borrow();
        assert_eq!(saved.get(keys::BGM_VOLUME).unwrap().as_deref(), Some("0.5"));
        assert_eq!(saved.get(keys::HAS_SEEN_INTRO).unwrap().as_deref(), Some("true"));
        assert_eq!(saved.get(keys::SELECTED_CHARACTER).unwrap().as_deref(), Some("Char_4"));
        assert_eq!(saved.get(keys::PLAYER_NAME).unwrap().as_deref(), Some("Robin"));
    }

    #[test]
    fn reload_restores_previous_session() {
        let store = MemoryStore::new()
            .with(keys::BGM_VOLUME, "0.25")
            .with(keys::SFX_VOLUME, "3")
            .with(keys::HAS_SEEN_INTRO, "true")
            .with(keys::SELECTED_CHARACTER, "Char_7");
        let settings = Settings::load(Box::new(store));
        assert_eq!(settings.bgm_volume(), 0.25);
        assert_eq!(settings.sfx_volume(), 1.0);
        assert!(settings.has_seen_intro());
        assert_eq!(settings.selected_character_id(), "Char_7");
        assert!(!settings.is_maximized());
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let store = MemoryStore::new()
            .with(keys::BGM_VOLUME, "loud")
            .with(keys::HAS_SEEN_INTRO, "yes");
        let settings = Settings::load(Box::new(store));
        assert_eq!(settings.bgm_volume(), DEFAULT_VOLUME);
        assert!(!settings.has_seen_intro());
    }

    #[test]
    fn broken_storage_keeps_defaults_and_still_mutates() {
        let mut settings = Settings::load(Box::new(BrokenStore));
        assert_eq!(settings.selected_character_id(), DEFAULT_CHARACTER);
        settings.set_bgm_volume(0.1);
        assert_eq!(settings.bgm_volume(), 0.1);
    }

    #[test]
    fn player_name_is_capped_at_twelve_chars() {
        let mut settings = Settings::load(Box::new(MemoryStore::new()));
        settings.set_player_name("Maximilianus Rex");
        assert_eq!(settings.player_name(), "Maximilianus");
        assert_eq!(settings.player_name().chars().count(), PLAYER_NAME_MAX);
    }
}
