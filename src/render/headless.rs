//! In-memory render backend.
//!
//! [`HeadlessBackend`] implements [`RenderBackend`] without a GPU: ids are
//! counters, live objects are tracked in sets, and every submitted draw is
//! recorded. Used by the test suite, the demo and for dry runs of a frame.

use std::path::Path;

use glam::{Mat4, Vec2};
use rustc_hash::{FxHashMap, FxHashSet};

use super::backend::{DrawCall, MeshId, ProgramId, QuadLayout, QuadMesh, RenderBackend, TextureId};
use crate::core::Color;
use crate::errors::{RasterError, Result};
use crate::resources::params::ShaderParam;
use crate::text::TextBitmap;

/// Owned copy of a submitted [`DrawCall`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    pub program: ProgramId,
    pub mesh: MeshId,
    pub texture: Option<TextureId>,
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub color: Color,
    pub size: Vec2,
    pub time: f32,
    pub params: Vec<ShaderParam>,
}

impl From<&DrawCall<'_>> for RecordedDraw {
    fn from(call: &DrawCall<'_>) -> Self {
        Self {
            program: call.program,
            mesh: call.mesh,
            texture: call.texture,
            model: call.model,
            view: call.view,
            projection: call.projection,
            color: call.color,
            size: call.size,
            time: call.time,
            params: call.params.to_vec(),
        }
    }
}

#[derive(Debug, Clone)]
enum TextureData {
    File,
    Alpha(TextBitmap),
}

/// Recording backend with optional failure injection.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_id: u32,
    programs: FxHashMap<ProgramId, String>,
    meshes: FxHashMap<MeshId, QuadLayout>,
    textures: FxHashMap<TextureId, TextureData>,
    draws: Vec<RecordedDraw>,
    frames: u64,
    last_clear: Option<Color>,

    /// Makes every `create_program` fail.
    pub fail_programs: bool,
    /// Makes every `create_quad` fail.
    pub fail_meshes: bool,
    /// Makes every texture upload or load fail.
    pub fail_textures: bool,
    /// Paths whose `load_texture` fails regardless of `fail_textures`.
    pub missing_textures: FxHashSet<std::path::PathBuf>,
}

impl HeadlessBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// Draws submitted since the last [`take_draws`](Self::take_draws).
    #[must_use]
    pub fn draws(&self) -> &[RecordedDraw] {
        &self.draws
    }

    pub fn take_draws(&mut self) -> Vec<RecordedDraw> {
        std::mem::take(&mut self.draws)
    }

    #[must_use]
    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }

    #[must_use]
    pub fn live_meshes(&self) -> usize {
        self.meshes.len()
    }

    #[must_use]
    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    /// `true` once every program, mesh and texture has been destroyed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.programs.is_empty() && self.meshes.is_empty() && self.textures.is_empty()
    }

    #[must_use]
    pub fn mesh_layout(&self, mesh: MeshId) -> Option<QuadLayout> {
        self.meshes.get(&mesh).copied()
    }

    /// Bitmap last uploaded to an alpha texture.
    #[must_use]
    pub fn alpha_bitmap(&self, texture: TextureId) -> Option<&TextBitmap> {
        match self.textures.get(&texture)? {
            TextureData::Alpha(bitmap) => Some(bitmap),
            TextureData::File => None,
        }
    }

    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[must_use]
    pub fn last_clear_color(&self) -> Option<Color> {
        self.last_clear
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_program(&mut self, vertex_source: &str, fragment_source: &str) -> Result<ProgramId> {
        if self.fail_programs {
            return Err(RasterError::ShaderError("program link failed".into()));
        }
        if !vertex_source.contains("void main") || !fragment_source.contains("void main") {
            return Err(RasterError::ShaderError("shader stage has no entry point".into()));
        }
        let id = ProgramId(self.allocate());
        self.programs.insert(id, vertex_source.to_owned());
        Ok(id)
    }

    fn program_has_attribute(&self, program: ProgramId, name: &str) -> bool {
        self.programs.get(&program).is_some_and(|vs| vs.contains(name))
    }

    fn destroy_program(&mut self, program: ProgramId) {
        self.programs.remove(&program);
    }

    fn create_quad(&mut self, quad: &QuadMesh) -> Result<MeshId> {
        if self.fail_meshes {
            return Err(RasterError::Backend("vertex buffer allocation failed".into()));
        }
        let id = MeshId(self.allocate());
        self.meshes.insert(id, quad.layout);
        Ok(id)
    }

    fn destroy_mesh(&mut self, mesh: MeshId) {
        self.meshes.remove(&mesh);
    }

    fn load_texture(&mut self, path: &Path) -> Result<TextureId> {
        if self.fail_textures || self.missing_textures.contains(path) {
            return Err(RasterError::TextureLoad {
                path: path.to_path_buf(),
                reason: "image not found".into(),
            });
        }
        let id = TextureId(self.allocate());
        self.textures.insert(id, TextureData::File);
        Ok(id)
    }

    fn upload_alpha_texture(&mut self, target: Option<TextureId>, bitmap: &TextBitmap) -> Result<TextureId> {
        if self.fail_textures {
            return Err(RasterError::Backend("texture upload failed".into()));
        }
        let id = match target {
            Some(id) if self.textures.contains_key(&id) => id,
            _ => TextureId(self.allocate()),
        };
        self.textures.insert(id, TextureData::Alpha(bitmap.clone()));
        Ok(id)
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        self.textures.remove(&texture);
    }

    fn begin_frame(&mut self, clear_color: Color) {
        self.frames += 1;
        self.last_clear = Some(clear_color);
    }

    fn submit(&mut self, call: &DrawCall<'_>) {
        self.draws.push(RecordedDraw::from(call));
    }
}
