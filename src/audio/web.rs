use super::{AudioBackend, TrackId};
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use web_sys::HtmlAudioElement;

/// One `<audio>` element per started track, created from a key -> url table
/// filled in by the preload step.
#[derive(Default)]
pub struct HtmlAudioBackend {
    sources: HashMap<String, String>,
    playing: HashMap<TrackId, HtmlAudioElement>,
    next_id: TrackId,
}

impl HtmlAudioBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, key: &str, url: &str) {
        self.sources.insert(key.to_string(), url.to_string());
    }

    fn create(&self, key: &str, looped: bool, volume: f32) -> Result<HtmlAudioElement> {
        let url = self
            .sources
            .get(key)
            .ok_or_else(|| anyhow!("No audio registered for '{}'", key))?;
        let element = HtmlAudioElement::new_with_src(url)
            .map_err(|err| anyhow!("Could not create audio '{}' : {:#?}", key, err))?;
        element.set_loop(looped);
        element.set_volume(volume.clamp(0.0, 1.0).into());
        // autoplay may still be refused before the first gesture, that only
        // surfaces as a rejected promise
        let _pending = element
            .play()
            .map_err(|err| anyhow!("Could not play '{}' : {:#?}", key, err))?;
        Ok(element)
    }
}

impl AudioBackend for HtmlAudioBackend {
    fn start(&mut self, key: &str, looped: bool, volume: f32) -> Option<TrackId> {
        match self.create(key, looped, volume) {
            Ok(element) => {
                self.next_id += 1;
                self.playing.insert(self.next_id, element);
                Some(self.next_id)
            }
            Err(err) => {
                log::warn!("{:#}", err);
                None
            }
        }
    }

    fn set_volume(&mut self, id: TrackId, volume: f32) {
        if let Some(element) = self.playing.get(&id) {
            element.set_volume(volume.clamp(0.0, 1.0).into());
        }
    }

    fn stop(&mut self, id: TrackId) {
        if let Some(element) = self.playing.remove(&id) {
            if let Err(err) = element.pause() {
                log::warn!("Could not pause track {} : {:#?}", id, err);
            }
            element.set_src("");
        }
    }

    fn is_finished(&self, id: TrackId) -> bool {
        self.playing.get(&id).map_or(true, |element| element.ended())
    }

    fn duration_ms(&self, id: TrackId) -> Option<f32> {
        self.playing
            .get(&id)
            .map(|element| element.duration() as f32 * 1000.0)
            .filter(|ms| ms.is_finite())
    }
}
