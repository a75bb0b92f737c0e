//! Named shader parameters.
//!
//! A [`ParamTable`] holds up to [`MAX_SHADER_PARAMS`] `{name, value}` pairs
//! that are uploaded as custom uniforms on every draw. Values are a tagged
//! sum type, so reading a parameter can never reinterpret the wrong kind.

use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::errors::{RasterError, Result};

/// Maximum number of custom parameters per sprite.
pub const MAX_SHADER_PARAMS: usize = 16;

/// Typed parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParamValue {
    Float(f32),
    Int(i32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
}

impl ParamValue {
    /// Short kind name, for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Int(_) => "int",
            Self::Vec2(_) => "vec2",
            Self::Vec3(_) => "vec3",
            Self::Vec4(_) => "vec4",
        }
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<Vec2> for ParamValue {
    fn from(v: Vec2) -> Self {
        Self::Vec2(v)
    }
}

impl From<Vec3> for ParamValue {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v)
    }
}

impl From<Vec4> for ParamValue {
    fn from(v: Vec4) -> Self {
        Self::Vec4(v)
    }
}

/// A named parameter as it appears in descriptors and draw calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaderParam {
    pub name: String,
    pub value: ParamValue,
}

impl ShaderParam {
    pub fn new(name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Bounded table of shader parameters, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamTable {
    entries: SmallVec<[ShaderParam; MAX_SHADER_PARAMS]>,
}

impl ParamTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`.
    ///
    /// An existing entry is overwritten in place, even if the kind changes.
    /// A new name is appended; if the table is full the call fails with
    /// [`RasterError::ParameterTableFull`] and the table is unchanged.
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<()> {
        if let Some(entry) = self.entries.iter_mut().find(|p| p.name == name) {
            if entry.value.kind() != value.kind() {
                log::debug!(
                    "Shader parameter '{name}' changes kind from {} to {}",
                    entry.value.kind(),
                    value.kind()
                );
            }
            entry.value = value;
            return Ok(());
        }

        if self.is_full() {
            log::warn!("Shader parameter table full, dropping '{name}'");
            return Err(RasterError::ParameterTableFull {
                name: name.to_owned(),
                capacity: MAX_SHADER_PARAMS,
            });
        }

        self.entries.push(ShaderParam {
            name: name.to_owned(),
            value,
        });
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.entries.iter().find(|p| p.name == name).map(|p| p.value)
    }

    /// Removes `name`, returning its last value.
    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        let index = self.entries.iter().position(|p| p.name == name)?;
        Some(self.entries.remove(index).value)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ShaderParam] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_SHADER_PARAMS
    }
}
