//! Chainable resource wrappers.
//!
//! [`SpriteMut`] and [`TextMut`] borrow [`Graphics`] mutably and offer a
//! fluent API over one handle. All methods silently no-op when the handle
//! is stale. Failures that the plain setters report as errors (full
//! parameter table, texture upload) are logged instead.
//!
//! # Example
//!
//! ```rust,ignore
//! gfx.sprite_mut(ship)
//!     .set_position(Vec3::new(0.0, 1.0, 0.0))
//!     .set_size(Vec2::splat(0.5))
//!     .set_rotation_z(0.3)
//!     .set_param("uGlow", 0.8);
//! ```
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::must_use_candidate)]
use glam::{Quat, Vec2, Vec3};

use super::Graphics;
use crate::core::Color;
use crate::render::RenderBackend;
use crate::resources::{ParamValue, SpriteHandle, TextHandle};
use crate::text::TextAlign;

/// Temporary mutable borrow of a sprite for chainable operations.
pub struct SpriteMut<'a, B: RenderBackend> {
    gfx: &'a mut Graphics<B>,
    handle: SpriteHandle,
}

impl<'a, B: RenderBackend> SpriteMut<'a, B> {
    #[inline]
    pub fn new(gfx: &'a mut Graphics<B>, handle: SpriteHandle) -> Self {
        Self { gfx, handle }
    }

    #[inline]
    pub fn handle(&self) -> SpriteHandle {
        self.handle
    }

    #[inline]
    pub fn set_position(self, position: Vec3) -> Self {
        self.gfx.set_position(self.handle, position);
        self
    }

    #[inline]
    pub fn set_scale(self, scale: Vec3) -> Self {
        self.gfx.set_sprite_scale(self.handle, scale);
        self
    }

    #[inline]
    pub fn set_size(self, size: Vec2) -> Self {
        self.gfx.set_sprite_size(self.handle, size);
        self
    }

    #[inline]
    pub fn set_rotation(self, rotation: Quat) -> Self {
        self.gfx.set_rotation(self.handle, rotation);
        self
    }

    #[inline]
    pub fn set_rotation_z(self, angle: f32) -> Self {
        self.gfx.set_rotation_z(self.handle, angle);
        self
    }

    #[inline]
    pub fn set_color(self, color: Color) -> Self {
        self.gfx.set_sprite_color(self.handle, color);
        self
    }

    /// Sets a shader parameter. Failures are logged and the chain goes on.
    pub fn set_param(self, name: &str, value: impl Into<ParamValue>) -> Self {
        if let Err(err) = self.gfx.set_sprite_param(self.handle, name, value) {
            log::error!("Failed to set shader parameter '{name}': {err}");
        }
        self
    }
}

/// Temporary mutable borrow of a text for chainable operations.
pub struct TextMut<'a, B: RenderBackend> {
    gfx: &'a mut Graphics<B>,
    handle: TextHandle,
}

impl<'a, B: RenderBackend> TextMut<'a, B> {
    #[inline]
    pub fn new(gfx: &'a mut Graphics<B>, handle: TextHandle) -> Self {
        Self { gfx, handle }
    }

    #[inline]
    pub fn handle(&self) -> TextHandle {
        self.handle
    }

    #[inline]
    pub fn set_position(self, position: Vec3) -> Self {
        self.gfx.set_position(self.handle, position);
        self
    }

    #[inline]
    pub fn set_rotation(self, rotation: Quat) -> Self {
        self.gfx.set_rotation(self.handle, rotation);
        self
    }

    #[inline]
    pub fn set_rotation_z(self, angle: f32) -> Self {
        self.gfx.set_rotation_z(self.handle, angle);
        self
    }

    #[inline]
    pub fn set_color(self, color: Color) -> Self {
        self.gfx.set_text_color(self.handle, color);
        self
    }

    pub fn set_text(self, content: &str) -> Self {
        if let Err(err) = self.gfx.set_text(self.handle, content) {
            log::error!("Failed to update text: {err}");
        }
        self
    }

    pub fn set_font_size(self, font_size: f32) -> Self {
        if let Err(err) = self.gfx.set_font_size(self.handle, font_size) {
            log::error!("Failed to resize text: {err}");
        }
        self
    }

    pub fn set_alignment(self, alignment: TextAlign) -> Self {
        if let Err(err) = self.gfx.set_text_alignment(self.handle, alignment) {
            log::error!("Failed to realign text: {err}");
        }
        self
    }

    pub fn set_line_spacing(self, spacing: f32) -> Self {
        if let Err(err) = self.gfx.set_line_spacing(self.handle, spacing) {
            log::error!("Failed to change line spacing: {err}");
        }
        self
    }
}
