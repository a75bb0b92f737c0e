//! Shader sources.
//!
//! Built-in GLSL for sprites and text, plus loading of user shader files.
//! Sources are stored without a `#version` line; [`prepare_source`] adds the
//! directive for the configured [`ShaderDialect`] unless the source already
//! declares one.

use std::borrow::Cow;
use std::path::Path;

use crate::errors::Result;
use crate::settings::ShaderDialect;

pub const SPRITE_VERTEX_SHADER: &str = r"
layout(location = 0) in vec3 aPos;
layout(location = 1) in vec2 aTexCoord;

uniform mat4 uModel;
uniform mat4 uView;
uniform mat4 uProjection;

out vec2 vTexCoord;

void main() {
    vTexCoord = aTexCoord;
    gl_Position = uProjection * uView * uModel * vec4(aPos, 1.0);
}
";

pub const SPRITE_FRAGMENT_SHADER: &str = r"
in vec2 vTexCoord;
out vec4 FragColor;

uniform vec3 uColor;
uniform bool uUseTexture;
uniform sampler2D uTexture;

void main() {
    vec4 base = vec4(uColor, 1.0);
    if (uUseTexture) {
        base *= texture(uTexture, vTexCoord);
    }
    FragColor = base;
}
";

pub const TEXT_VERTEX_SHADER: &str = SPRITE_VERTEX_SHADER;

pub const TEXT_FRAGMENT_SHADER: &str = r"
in vec2 vTexCoord;
out vec4 FragColor;

uniform vec3 uColor;
uniform sampler2D uTexture;

void main() {
    float coverage = texture(uTexture, vTexCoord).r;
    FragColor = vec4(uColor, coverage);
}
";

/// Prepends the dialect's version directive when `source` has none.
#[must_use]
pub fn prepare_source(source: &str, dialect: ShaderDialect) -> Cow<'_, str> {
    if source.contains("#version") {
        Cow::Borrowed(source)
    } else {
        Cow::Owned(format!("{}{source}", dialect.version_directive()))
    }
}

/// Reads a shader file and prepares it for `dialect`.
pub fn load_shader_source(path: &Path, dialect: ShaderDialect) -> Result<String> {
    let source = std::fs::read_to_string(path).inspect_err(|err| {
        log::error!("Failed to read shader '{}': {err}", path.display());
    })?;

    if !source.contains("#version") {
        log::debug!("Shader '{}' has no #version, injecting one", path.display());
    }
    Ok(prepare_source(&source, dialect).into_owned())
}

/// A vertex/fragment source pair ready for [`RenderBackend::create_program`].
///
/// [`RenderBackend::create_program`]: super::RenderBackend::create_program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    /// Loads the given files, falling back to the built-in sprite shaders for
    /// any stage without a path.
    pub fn for_sprite(
        vertex_path: Option<&Path>,
        fragment_path: Option<&Path>,
        dialect: ShaderDialect,
    ) -> Result<Self> {
        let vertex = match vertex_path {
            Some(path) => load_shader_source(path, dialect)?,
            None => prepare_source(SPRITE_VERTEX_SHADER, dialect).into_owned(),
        };
        let fragment = match fragment_path {
            Some(path) => load_shader_source(path, dialect)?,
            None => prepare_source(SPRITE_FRAGMENT_SHADER, dialect).into_owned(),
        };
        Ok(Self { vertex, fragment })
    }

    /// Built-in text shaders.
    #[must_use]
    pub fn for_text(dialect: ShaderDialect) -> Self {
        Self {
            vertex: prepare_source(TEXT_VERTEX_SHADER, dialect).into_owned(),
            fragment: prepare_source(TEXT_FRAGMENT_SHADER, dialect).into_owned(),
        }
    }
}
