//! # Raster
//!
//! A small engine for textured quads and billboarded text placed in a 3D
//! transform hierarchy.
//!
//! - [`core`](crate::core): generational [`Handle`]s and the [`SlotPool`] registry
//! - [`scene`]: transforms, the [`TransformGraph`] and the [`Camera`]
//! - [`graphics`]: the [`Graphics`] facade over sprites and texts
//! - [`audio`]: the path-cached [`SoundBank`]
//! - [`app`]: the frame loop over a [`Platform`](app::Platform)
//!
//! Devices (GPU, audio, windowing) sit behind traits; [`HeadlessBackend`],
//! [`NullAudio`] and [`HeadlessPlatform`] run everything in memory.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod app;
pub mod audio;
pub mod core;
pub mod engine;
pub mod errors;
pub mod graphics;
pub mod input;
pub mod logging;
pub mod render;
pub mod resources;
pub mod scene;
pub mod settings;
pub mod text;
pub mod utils;

pub use app::{App, AppDescriptor, AppHandler, HeadlessPlatform, Platform, PlatformEvent, WindowConfig};
pub use audio::{AudioBackend, NullAudio, SoundBank, SoundHandle};
pub use self::core::{Color, Handle, SlotPool};
pub use engine::Engine;
pub use errors::{RasterError, Result};
pub use graphics::{Graphics, SceneObject};
pub use input::{InputState, Key, MouseButton};
pub use logging::{LoggingConfig, init_logging};
pub use render::{FrameContext, HeadlessBackend, RenderBackend};
pub use resources::{ParamValue, SpriteDescriptor, SpriteHandle, TextDescriptor, TextHandle};
pub use scene::{Camera, CameraDescriptor, NodeHandle, Transform, TransformGraph};
pub use settings::EngineSettings;
pub use text::{GlyphRasterizer, TextAlign};
