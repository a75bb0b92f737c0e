//! Render backend interface.
//!
//! The engine never talks to a GPU API directly. Everything that touches
//! device objects goes through [`RenderBackend`], which hands back small
//! copyable ids. A windowed host implements it on top of its graphics API;
//! [`HeadlessBackend`](super::HeadlessBackend) implements it in memory.

use std::path::Path;

use glam::{Mat4, Vec2};

use crate::core::Color;
use crate::errors::Result;
use crate::resources::params::ShaderParam;
use crate::text::TextBitmap;

/// Linked shader program owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

/// Vertex/index buffer pair owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub u32);

/// Texture owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Name of the texture-coordinate vertex attribute.
pub const TEXCOORD_ATTRIBUTE: &str = "aTexCoord";

/// Vertex layout of a unit quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadLayout {
    /// `vec3` position only.
    Plain,
    /// `vec3` position followed by `vec2` texcoord.
    Textured,
}

/// CPU-side unit quad centred on the origin, spanning `[-0.5, 0.5]`.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadMesh {
    pub layout: QuadLayout,
    /// Interleaved vertex data, `stride()` floats per vertex.
    pub vertices: Vec<f32>,
    pub indices: [u32; 6],
}

impl QuadMesh {
    const CORNERS: [([f32; 3], [f32; 2]); 4] = [
        ([-0.5, -0.5, 0.0], [0.0, 0.0]),
        ([0.5, -0.5, 0.0], [1.0, 0.0]),
        ([0.5, 0.5, 0.0], [1.0, 1.0]),
        ([-0.5, 0.5, 0.0], [0.0, 1.0]),
    ];

    #[must_use]
    pub fn new(layout: QuadLayout) -> Self {
        let vertices = Self::CORNERS
            .iter()
            .flat_map(|(pos, uv)| {
                let uv: &[f32] = match layout {
                    QuadLayout::Plain => &[],
                    QuadLayout::Textured => uv,
                };
                pos.iter().chain(uv).copied()
            })
            .collect();

        Self {
            layout,
            vertices,
            indices: [0, 1, 2, 2, 3, 0],
        }
    }

    /// Floats per vertex.
    #[must_use]
    pub fn stride(&self) -> usize {
        match self.layout {
            QuadLayout::Plain => 3,
            QuadLayout::Textured => 5,
        }
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.stride()
    }
}

/// Everything needed to draw one quad.
///
/// Backends map the fields to the `uModel`, `uView`, `uProjection`,
/// `uColor`, `uSize`, `uTime`, `uUseTexture` and `uTexture` uniforms and
/// upload `params` under their own names.
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    pub program: ProgramId,
    pub mesh: MeshId,
    pub texture: Option<TextureId>,
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub color: Color,
    pub size: Vec2,
    pub time: f32,
    pub params: &'a [ShaderParam],
}

/// Device-side services the engine relies on.
pub trait RenderBackend {
    /// Compiles and links a program from complete GLSL sources.
    fn create_program(&mut self, vertex_source: &str, fragment_source: &str) -> Result<ProgramId>;

    /// Whether the linked program consumes the named vertex attribute.
    fn program_has_attribute(&self, program: ProgramId, name: &str) -> bool;

    fn destroy_program(&mut self, program: ProgramId);

    /// Uploads a quad's vertex and index buffers.
    fn create_quad(&mut self, quad: &QuadMesh) -> Result<MeshId>;

    fn destroy_mesh(&mut self, mesh: MeshId);

    /// Decodes an image file into an RGBA texture.
    fn load_texture(&mut self, path: &Path) -> Result<TextureId>;

    /// Uploads a single-channel coverage bitmap, reusing `target` when given.
    fn upload_alpha_texture(&mut self, target: Option<TextureId>, bitmap: &TextBitmap) -> Result<TextureId>;

    fn destroy_texture(&mut self, texture: TextureId);

    /// Starts a frame by clearing the color and depth targets.
    fn begin_frame(&mut self, clear_color: Color);

    fn submit(&mut self, call: &DrawCall<'_>);
}
