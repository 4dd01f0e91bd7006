use serde::{Deserialize, Serialize};

pub const MANIFEST_PATH: &str = "manifest.json";

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Image,
    Audio,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AssetEntry {
    pub key: String,
    pub url: String,
    pub kind: AssetKind,
}

/// Portrait pair of one playable character
/// - select : large portrait on the character select screen
/// - level  : small portrait in the level select frame
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CharacterData {
    pub id: String,
    pub select_key: String,
    pub level_key: String,
    pub select_url: String,
    pub level_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Manifest {
    #[serde(default)]
    pub assets: Vec<AssetEntry>,
    #[serde(default)]
    pub characters: Vec<CharacterData>,
}

impl Manifest {
    pub fn images(&self) -> impl Iterator<Item = (&str, &str)> {
        let assets = self
            .assets
            .iter()
            .filter(|entry| entry.kind == AssetKind::Image)
            .map(|entry| (entry.key.as_str(), entry.url.as_str()));
        let portraits = self.characters.iter().flat_map(|c| {
            [
                (c.select_key.as_str(), c.select_url.as_str()),
                (c.level_key.as_str(), c.level_url.as_str()),
            ]
        });
        assets.chain(portraits)
    }

    pub fn audio(&self) -> impl Iterator<Item = (&str, &str)> {
        self.assets
            .iter()
            .filter(|entry| entry.kind == AssetKind::Audio)
            .map(|entry| (entry.key.as_str(), entry.url.as_str()))
    }

    pub fn character(&self, id: &str) -> Option<&CharacterData> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn character_index(&self, id: &str) -> Option<usize> {
        self.characters.iter().position(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "assets": [
            { "key": "launch_screen", "url": "Assets/Launch/LaunchScreen.png", "kind": "image" },
            { "key": "bgm_trapped", "url": "Assets/Audio/Music/Trapped.mp3", "kind": "audio" }
        ],
        "characters": [
            { "id": "Char_1", "select_key": "char1_select", "level_key": "char1_level",
              "select_url": "c1s.png", "level_url": "c1l.png" },
            { "id": "Char_2", "select_key": "char2_select", "level_key": "char2_level",
              "select_url": "c2s.png", "level_url": "c2l.png" }
        ]
    }"#;

    #[test]
    fn images_include_character_portraits() {
        let manifest: Manifest = serde_json::from_str(MANIFEST).unwrap();
        let keys: Vec<&str> = manifest.images().map(|(key, _)| key).collect();
        assert_eq!(
            keys,
            vec![
                "launch_screen",
                "char1_select",
                "char1_level",
                "char2_select",
                "char2_level"
            ]
        );
        assert_eq!(manifest.audio().count(), 1);
    }

    #[test]
    fn character_lookup_by_id() {
        let manifest: Manifest = serde_json::from_str(MANIFEST).unwrap();
        assert_eq!(manifest.character_index("Char_2"), Some(1));
        assert_eq!(manifest.character("Char_9"), None);
    }

    #[test]
    fn missing_tables_default_to_empty() {
        let manifest: Manifest = serde_json::from_str("{}").unwrap();
        assert!(manifest.assets.is_empty());
        assert!(manifest.characters.is_empty());
    }
}
