use std::path::PathBuf;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::{Color, Handle};
use crate::errors::{RasterError, Result};
use crate::render::{MeshId, ProgramId, TextureId};
use crate::resources::params::{MAX_SHADER_PARAMS, ParamTable, ShaderParam};
use crate::scene::NodeHandle;

pub type SpriteHandle = Handle<Sprite>;

/// Parameters for [`Graphics::create_sprite`](crate::Graphics::create_sprite).
///
/// Shader paths are optional; a missing stage uses the built-in sprite
/// shader. A texture that fails to load is reported as a warning and the
/// sprite is drawn untextured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteDescriptor {
    pub position: Vec3,
    pub scale: Vec3,
    pub color: Color,
    pub vertex_shader_path: Option<PathBuf>,
    pub fragment_shader_path: Option<PathBuf>,
    pub texture_path: Option<PathBuf>,
    pub params: Vec<ShaderParam>,
}

impl Default for SpriteDescriptor {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            color: Color::WHITE,
            vertex_shader_path: None,
            fragment_shader_path: None,
            texture_path: None,
            params: Vec::new(),
        }
    }
}

impl SpriteDescriptor {
    /// Checks the descriptor before any resource is allocated.
    pub fn validate(&self) -> Result<()> {
        let paths = [
            ("vertex_shader_path", &self.vertex_shader_path),
            ("fragment_shader_path", &self.fragment_shader_path),
            ("texture_path", &self.texture_path),
        ];
        for (field, path) in paths {
            if path.as_ref().is_some_and(|p| p.as_os_str().is_empty()) {
                return Err(RasterError::malformed(format!("sprite {field} is empty")));
            }
        }

        if !self.position.is_finite() || !self.scale.is_finite() {
            return Err(RasterError::malformed("sprite position and scale must be finite"));
        }

        if self.params.len() > MAX_SHADER_PARAMS {
            return Err(RasterError::malformed(format!(
                "sprite declares {} shader parameters, at most {MAX_SHADER_PARAMS} are allowed",
                self.params.len()
            )));
        }

        if let Some(param) = self.params.iter().find(|p| p.name.is_empty()) {
            return Err(RasterError::malformed(format!(
                "sprite shader parameter of kind {} has no name",
                param.value.kind()
            )));
        }

        Ok(())
    }
}

/// A colored, optionally textured quad placed by a transform node.
///
/// The sprite's size is the x/y of its node's scale.
#[derive(Debug)]
pub struct Sprite {
    pub(crate) node: NodeHandle,
    pub(crate) program: ProgramId,
    pub(crate) mesh: MeshId,
    pub(crate) texture: Option<TextureId>,
    pub(crate) color: Color,
    pub(crate) params: ParamTable,
}

impl Sprite {
    #[must_use]
    pub fn node(&self) -> NodeHandle {
        self.node
    }

    #[must_use]
    pub fn program(&self) -> ProgramId {
        self.program
    }

    #[must_use]
    pub fn mesh(&self) -> MeshId {
        self.mesh
    }

    #[must_use]
    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub fn params(&self) -> &ParamTable {
        &self.params
    }
}
