//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! The main error type [`RasterError`] covers the recoverable failure modes:
//! - Pool exhaustion when registering sprites, texts, sounds or nodes
//! - Malformed resource descriptors
//! - Shader, texture, font and audio failures reported by backends
//! - Transform hierarchy violations (parent cycles)
//!
//! Stale handles are *not* errors for setters, draws or destroys; those
//! silently do nothing and getters return `None`.
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, RasterError>`.
//!
//! ```rust,ignore
//! use raster::errors::{RasterError, Result};
//!
//! fn spawn(gfx: &mut Graphics<HeadlessBackend>) -> Result<SpriteHandle> {
//!     gfx.create_sprite(&SpriteDescriptor::default())
//! }
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for the raster engine.
#[derive(Error, Debug)]
pub enum RasterError {
    // ========================================================================
    // Registry Errors
    // ========================================================================
    /// A fixed-capacity pool has no free slot left.
    #[error("{kind} pool exhausted (capacity {capacity})")]
    ResourceExhausted {
        /// Resource kind of the pool ("sprite", "text", ...)
        kind: &'static str,
        /// Capacity of the pool
        capacity: usize,
    },

    /// A handle no longer resolves to a live object.
    #[error("stale {kind} handle")]
    StaleHandle {
        /// Resource kind the handle refers to
        kind: &'static str,
    },

    // ========================================================================
    // Descriptor & Parameter Errors
    // ========================================================================
    /// A descriptor is missing a required field or holds an invalid value.
    #[error("Malformed descriptor: {0}")]
    MalformedDescriptor(String),

    /// The shader parameter table cannot take another entry.
    #[error("Shader parameter table full ({capacity} entries), cannot add '{name}'")]
    ParameterTableFull {
        /// Name of the rejected parameter
        name: String,
        /// Capacity of the table
        capacity: usize,
    },

    // ========================================================================
    // Hierarchy Errors
    // ========================================================================
    /// Attaching the node would make it its own ancestor.
    #[error("Parent assignment would create a cycle in the transform hierarchy")]
    HierarchyCycle,

    // ========================================================================
    // Backend Errors
    // ========================================================================
    /// Shader compilation or program linking failed.
    #[error("Shader error: {0}")]
    ShaderError(String),

    /// A texture could not be loaded.
    #[error("Failed to load texture '{}': {reason}", path.display())]
    TextureLoad {
        /// Path of the texture file
        path: PathBuf,
        /// Backend-provided reason
        reason: String,
    },

    /// A font could not be loaded or parsed.
    #[error("Failed to load font '{}': {reason}", path.display())]
    FontLoad {
        /// Path of the font file
        path: PathBuf,
        /// Parser-provided reason
        reason: String,
    },

    /// The audio backend reported a failure.
    #[error("Audio error: {0}")]
    AudioError(String),

    /// Any other render backend failure.
    #[error("Render backend error: {0}")]
    Backend(String),

    // ========================================================================
    // I/O & Format Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl RasterError {
    /// Builds a [`RasterError::MalformedDescriptor`] from any displayable message.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDescriptor(message.into())
    }
}

/// Alias for `Result<T, RasterError>`.
pub type Result<T> = std::result::Result<T, RasterError>;
