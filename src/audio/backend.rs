use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::errors::{RasterError, Result};

/// Decoded sound owned by an audio backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceId(pub u32);

/// Audio device services: decoding, playback and volume per voice.
pub trait AudioBackend {
    /// Opens and decodes a sound file.
    fn open(&mut self, path: &Path) -> Result<VoiceId>;

    /// Starts playback from the beginning, restarting if already playing.
    fn play(&mut self, voice: VoiceId, looping: bool) -> Result<()>;

    fn stop(&mut self, voice: VoiceId);

    /// Linear gain in `[0, 1]`.
    fn set_volume(&mut self, voice: VoiceId, volume: f32);

    fn close(&mut self, voice: VoiceId);
}

/// State of one voice in [`NullAudio`].
#[derive(Debug, Clone, PartialEq)]
pub struct NullVoice {
    pub path: PathBuf,
    pub playing: bool,
    pub looping: bool,
    pub volume: f32,
    /// Times playback was (re)started.
    pub starts: u32,
}

/// Silent audio backend that tracks voice state in memory.
#[derive(Debug, Default)]
pub struct NullAudio {
    next_id: u32,
    voices: FxHashMap<VoiceId, NullVoice>,
    opens: u32,

    /// Makes every `open` fail.
    pub fail_open: bool,
}

impl NullAudio {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn voice(&self, voice: VoiceId) -> Option<&NullVoice> {
        self.voices.get(&voice)
    }

    #[must_use]
    pub fn open_voices(&self) -> usize {
        self.voices.len()
    }

    /// Total successful `open` calls, i.e. files decoded.
    #[must_use]
    pub fn opens(&self) -> u32 {
        self.opens
    }
}

impl AudioBackend for NullAudio {
    fn open(&mut self, path: &Path) -> Result<VoiceId> {
        if self.fail_open {
            return Err(RasterError::AudioError(format!("cannot decode '{}'", path.display())));
        }
        self.next_id += 1;
        self.opens += 1;
        let id = VoiceId(self.next_id);
        self.voices.insert(
            id,
            NullVoice {
                path: path.to_path_buf(),
                playing: false,
                looping: false,
                volume: 1.0,
                starts: 0,
            },
        );
        Ok(id)
    }

    fn play(&mut self, voice: VoiceId, looping: bool) -> Result<()> {
        let state = self
            .voices
            .get_mut(&voice)
            .ok_or_else(|| RasterError::AudioError(format!("unknown voice {}", voice.0)))?;
        state.playing = true;
        state.looping = looping;
        state.starts += 1;
        Ok(())
    }

    fn stop(&mut self, voice: VoiceId) {
        if let Some(state) = self.voices.get_mut(&voice) {
            state.playing = false;
        }
    }

    fn set_volume(&mut self, voice: VoiceId, volume: f32) {
        if let Some(state) = self.voices.get_mut(&voice) {
            state.volume = volume;
        }
    }

    fn close(&mut self, voice: VoiceId) {
        self.voices.remove(&voice);
    }
}
