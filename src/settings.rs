//! Engine Settings
//!
//! Pool capacities, clear color and shader dialect, loadable from JSON.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use raster::settings::EngineSettings;
//!
//! // Defaults: 128 sprites, 128 texts, 128 sounds
//! let settings = EngineSettings::default();
//!
//! // Partial JSON; missing fields keep their defaults
//! let settings = EngineSettings::from_json_str(r#"{ "sprite_capacity": 512 }"#)?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Color;
use crate::errors::Result;

pub const DEFAULT_SPRITE_CAPACITY: usize = 128;
pub const DEFAULT_TEXT_CAPACITY: usize = 128;
pub const DEFAULT_SOUND_CAPACITY: usize = 128;
pub const DEFAULT_NODE_CAPACITY: usize = DEFAULT_SPRITE_CAPACITY + DEFAULT_TEXT_CAPACITY;

/// GLSL flavour used for the built-in shaders and for version injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShaderDialect {
    /// `#version 330 core`
    Desktop,
    /// `#version 300 es`
    Embedded,
}

impl ShaderDialect {
    /// Version directive prepended to shader sources that lack one.
    #[must_use]
    pub fn version_directive(self) -> &'static str {
        match self {
            Self::Desktop => "#version 330 core\n",
            Self::Embedded => "#version 300 es\nprecision mediump float;\n",
        }
    }
}

impl Default for ShaderDialect {
    fn default() -> Self {
        if cfg!(target_arch = "wasm32") {
            Self::Embedded
        } else {
            Self::Desktop
        }
    }
}

/// Engine-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Maximum number of live sprites.
    pub sprite_capacity: usize,
    /// Maximum number of live texts.
    pub text_capacity: usize,
    /// Maximum number of cached sounds.
    pub sound_capacity: usize,
    /// Maximum number of transform nodes (every sprite and text owns one).
    pub node_capacity: usize,
    /// Color the frame is cleared to before drawing.
    pub clear_color: Color,
    pub shader_dialect: ShaderDialect,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            sprite_capacity: DEFAULT_SPRITE_CAPACITY,
            text_capacity: DEFAULT_TEXT_CAPACITY,
            sound_capacity: DEFAULT_SOUND_CAPACITY,
            node_capacity: DEFAULT_NODE_CAPACITY,
            clear_color: Color::rgb(0.1, 0.1, 0.1),
            shader_dialect: ShaderDialect::default(),
        }
    }
}

impl EngineSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
