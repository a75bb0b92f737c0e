//! Audio: pooled, path-cached sounds over a pluggable device backend.

pub mod backend;
pub mod sound;

pub use backend::{AudioBackend, NullAudio, NullVoice, VoiceId};
pub use sound::{Sound, SoundBank, SoundHandle};
