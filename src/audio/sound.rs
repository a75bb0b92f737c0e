//! Sound registry.
//!
//! Sounds are pooled like every other resource and cached by path: loading
//! a path that is already loaded returns the same handle and bumps a
//! reference count. [`SoundBank::free`] drops one reference; the voice is
//! closed and the handle invalidated only when the last one goes.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use super::backend::{AudioBackend, VoiceId};
use crate::core::{Handle, SlotPool};
use crate::errors::{RasterError, Result};

pub type SoundHandle = Handle<Sound>;

/// A decoded sound and its playback settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Sound {
    path: PathBuf,
    voice: VoiceId,
    looping: bool,
    volume: f32,
    ref_count: u32,
}

impl Sound {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn voice(&self) -> VoiceId {
        self.voice
    }

    #[must_use]
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    #[must_use]
    pub fn volume(&self) -> f32 {
        self.volume
    }

    #[must_use]
    pub fn ref_count(&self) -> u32 {
        self.ref_count
    }
}

/// Pooled, path-deduplicated sounds over an [`AudioBackend`].
#[derive(Debug)]
pub struct SoundBank<A: AudioBackend> {
    backend: A,
    sounds: SlotPool<Sound>,
    cache: FxHashMap<PathBuf, SoundHandle>,
}

impl<A: AudioBackend> SoundBank<A> {
    #[must_use]
    pub fn new(backend: A, capacity: usize) -> Self {
        log::info!("Sound bank initialized with {capacity} slots");
        Self {
            backend,
            sounds: SlotPool::new(capacity),
            cache: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn backend(&self) -> &A {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut A {
        &mut self.backend
    }

    /// Loads `path`, or adds a reference to the already loaded sound.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<SoundHandle> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(RasterError::malformed("sound path is empty"));
        }

        if let Some(&handle) = self.cache.get(path) {
            if let Some(sound) = self.sounds.resolve_mut(handle) {
                sound.ref_count += 1;
                log::debug!("Sound '{}' reused ({} refs)", path.display(), sound.ref_count);
                return Ok(handle);
            }
            // Entry outlived its sound; reload below.
            self.cache.remove(path);
        }

        if self.sounds.is_full() {
            log::error!("Cannot load sound '{}': pool exhausted", path.display());
            return Err(RasterError::ResourceExhausted {
                kind: "sound",
                capacity: self.sounds.capacity(),
            });
        }

        let voice = self.backend.open(path).inspect_err(|err| {
            log::error!("Failed to load sound '{}': {err}", path.display());
        })?;

        let sound = Sound {
            path: path.to_path_buf(),
            voice,
            looping: false,
            volume: 1.0,
            ref_count: 1,
        };

        let handle = match self.sounds.register(sound) {
            Ok(handle) => handle,
            Err(rejected) => {
                self.backend.close(voice);
                return Err(RasterError::ResourceExhausted {
                    kind: "sound",
                    capacity: rejected.capacity(),
                });
            }
        };

        self.cache.insert(path.to_path_buf(), handle);
        log::info!("Sound loaded: '{}'", path.display());
        Ok(handle)
    }

    /// Drops one reference. The sound is closed and unregistered when none
    /// remain. Stale handles are ignored.
    pub fn free(&mut self, handle: SoundHandle) {
        let Some(sound) = self.sounds.resolve_mut(handle) else {
            return;
        };

        sound.ref_count = sound.ref_count.saturating_sub(1);
        if sound.ref_count > 0 {
            return;
        }

        if let Some(sound) = self.sounds.unregister(handle) {
            self.cache.remove(&sound.path);
            self.backend.stop(sound.voice);
            self.backend.close(sound.voice);
            log::debug!("Sound freed: '{}'", sound.path.display());
        }
    }

    /// Starts playback from the start. Returns `false` for stale handles or
    /// when the backend refuses.
    pub fn play(&mut self, handle: SoundHandle, looping: bool) -> bool {
        let Some(sound) = self.sounds.resolve_mut(handle) else {
            return false;
        };
        sound.looping = looping;
        let voice = sound.voice;

        self.backend.stop(voice);
        match self.backend.play(voice, looping) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Failed to play sound: {err}");
                false
            }
        }
    }

    pub fn stop(&mut self, handle: SoundHandle) {
        if let Some(sound) = self.sounds.resolve(handle) {
            self.backend.stop(sound.voice);
        }
    }

    /// Sets the volume, clamped to `[0, 1]`.
    pub fn set_volume(&mut self, handle: SoundHandle, volume: f32) {
        if let Some(sound) = self.sounds.resolve_mut(handle) {
            sound.volume = volume.clamp(0.0, 1.0);
            self.backend.set_volume(sound.voice, sound.volume);
        }
    }

    #[must_use]
    pub fn sound(&self, handle: SoundHandle) -> Option<&Sound> {
        self.sounds.resolve(handle)
    }

    #[must_use]
    pub fn ref_count(&self, handle: SoundHandle) -> Option<u32> {
        self.sound(handle).map(Sound::ref_count)
    }

    #[must_use]
    pub fn path(&self, handle: SoundHandle) -> Option<&Path> {
        self.sound(handle).map(Sound::path)
    }

    /// Cached handle for `path`, without adding a reference.
    #[must_use]
    pub fn cached(&self, path: impl AsRef<Path>) -> Option<SoundHandle> {
        self.cache
            .get(path.as_ref())
            .copied()
            .filter(|&h| self.sounds.contains(h))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// Frees every sound regardless of reference counts.
    pub fn clear_cache(&mut self) {
        let sounds = self.sounds.drain();
        for sound in &sounds {
            self.backend.stop(sound.voice);
            self.backend.close(sound.voice);
        }
        self.cache.clear();
        if !sounds.is_empty() {
            log::info!("Sound cache cleared ({} sounds)", sounds.len());
        }
    }

    /// Releases everything; the bank stays usable afterwards.
    pub fn shutdown(&mut self) {
        self.clear_cache();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudio;

    #[test]
    fn failed_open_leaves_nothing_behind() {
        let mut audio = NullAudio::new();
        audio.fail_open = true;
        let mut bank = SoundBank::new(audio, 4);
        assert!(matches!(bank.load("a.wav"), Err(RasterError::AudioError(_))));
        assert!(bank.is_empty());
        assert!(bank.cached("a.wav").is_none());
    }

    #[test]
    fn empty_path_is_malformed() {
        let mut bank = SoundBank::new(NullAudio::new(), 4);
        assert!(matches!(bank.load(""), Err(RasterError::MalformedDescriptor(_))));
    }

    #[test]
    fn volume_is_clamped() {
        let mut bank = SoundBank::new(NullAudio::new(), 4);
        let h = bank.load("a.wav").unwrap();
        bank.set_volume(h, 2.5);
        assert!((bank.sound(h).unwrap().volume() - 1.0).abs() < f32::EPSILON);
        let voice = bank.sound(h).unwrap().voice();
        assert!((bank.backend().voice(voice).unwrap().volume - 1.0).abs() < f32::EPSILON);
    }
}
