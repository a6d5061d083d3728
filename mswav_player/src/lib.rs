#![no_std]
extern crate alloc;

use alloc::{boxed::Box, collections::BTreeMap, string::String, sync::Arc};

use async_trait::async_trait;

use mswav::{DecodedAudio, Strictness, Wav};

/// Playback collaborator. Receives interleaved PCM and owns everything
/// downstream of it, starting with wrapping the buffer for whatever
/// playback API is in use.
#[async_trait]
pub trait AudioBackend: Sync + Send {
    async fn play_wave(&self, channels: u16, sample_rate: u32, data: &[i16]);
}

/// Voice-line clips keyed by id. A clip is decoded on its first play
/// request and kept until explicitly unloaded.
pub struct ClipPlayer<'a> {
    backend: &'a dyn AudioBackend,
    strictness: Strictness,
    clips: BTreeMap<String, Arc<DecodedAudio>>,
}

impl<'a> ClipPlayer<'a> {
    pub fn new(backend: &'a dyn AudioBackend) -> Self {
        Self::with_strictness(backend, Strictness::default())
    }

    pub fn with_strictness(backend: &'a dyn AudioBackend, strictness: Strictness) -> Self {
        Self {
            backend,
            strictness,
            clips: BTreeMap::new(),
        }
    }

    /// Plays the clip, decoding `raw` if `id` has not been decoded before.
    /// A failed decode caches nothing and leaves other clips untouched.
    pub async fn play(&mut self, id: &str, raw: &[u8]) -> mswav::Result<()> {
        let clip = match self.clips.get(id) {
            Some(clip) => clip.clone(),
            None => {
                let decoded = match Wav::parse(raw).and_then(|wav| wav.decode_with(self.strictness)) {
                    Ok(decoded) => decoded,
                    Err(e) => {
                        log::warn!("clip {} failed to decode: {:?}", id, e);
                        return Err(e);
                    }
                };
                log::debug!(
                    "decoded clip {}: {} samples, {} channel(s) at {} hz",
                    id,
                    decoded.samples.len(),
                    decoded.channels,
                    decoded.sample_rate
                );

                let clip = Arc::new(decoded);
                self.clips.insert(String::from(id), clip.clone());
                clip
            }
        };

        self.backend.play_wave(clip.channels, clip.sample_rate, &clip.samples).await;

        Ok(())
    }

    pub fn is_loaded(&self, id: &str) -> bool {
        self.clips.contains_key(id)
    }

    /// Drops the decoded clip. Returns whether it was present.
    pub fn unload(&mut self, id: &str) -> bool {
        self.clips.remove(id).is_some()
    }

    pub fn unload_all(&mut self) {
        self.clips.clear();
    }
}
