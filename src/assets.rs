//! Textures by key, loaded once before the first scene.
use crate::audio::HtmlAudioBackend;
use crate::config::manifest::Manifest;
use crate::engine::{self, Image, Size};
use futures::future::join_all;
use std::collections::HashMap;

#[derive(Default)]
pub struct AssetStore {
    images: HashMap<String, Image>,
    sizes: HashMap<String, Size>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dimensions only, no pixels. Enough for layout and hit testing.
    pub fn with_sizes<'a>(sizes: impl IntoIterator<Item = (&'a str, Size)>) -> Self {
        AssetStore {
            images: HashMap::new(),
            sizes: sizes
                .into_iter()
                .map(|(key, size)| (key.to_string(), size))
                .collect(),
        }
    }

    pub fn insert(&mut self, key: &str, image: Image) {
        self.sizes.insert(key.to_string(), image.size());
        self.images.insert(key.to_string(), image);
    }

    pub fn exists(&self, key: &str) -> bool {
        self.sizes.contains_key(key)
    }

    pub fn size(&self, key: &str) -> Option<Size> {
        self.sizes.get(key).copied()
    }

    pub fn get(&self, key: &str) -> Option<&Image> {
        self.images.get(key)
    }
}

/// Load every image of the manifest concurrently and hand the audio URLs to
/// the backend. Images that fail to load are left out of the store.
pub async fn preload(manifest: &Manifest, audio: &mut HtmlAudioBackend) -> AssetStore {
    for (key, url) in manifest.audio() {
        audio.register(key, url);
    }

    let loads = manifest.images().map(|(key, url)| async move {
        (key, url, engine::load_image(url).await)
    });
    let mut store = AssetStore::new();
    for (key, url, result) in join_all(loads).await {
        match result {
            Ok(image) => store.insert(key, image),
            Err(err) => log::warn!("Skipping texture '{}' ({}) : {:#}", key, url, err),
        }
    }
    log::info!("Preloaded {} textures", store.images.len());
    store
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_only_store_answers_lookups() {
        let store = AssetStore::with_sizes([("cs_frame", Size::new(350.0, 576.0))]);
        assert!(store.exists("cs_frame"));
        assert!(!store.exists("cs_text_entry"));
        assert_eq!(store.size("cs_frame"), Some(Size::new(350.0, 576.0)));
        assert!(store.get("cs_frame").is_none());
    }
}
