//! Graphics facade.
//!
//! [`Graphics`] owns the transform graph, the sprite and text pools, the
//! font library and the render backend. Hosts create resources from
//! descriptors, get handles back, and drive everything through those
//! handles:
//!
//! ```rust,ignore
//! let mut gfx = Graphics::new(HeadlessBackend::new(), &EngineSettings::default());
//! let body = gfx.create_sprite(&SpriteDescriptor::default())?;
//! let label = gfx.create_text(&TextDescriptor { font_path: "font.ttf".into(), text: "hi".into(), ..Default::default() })?;
//! gfx.set_parent(label, Some(body.into()))?;
//! gfx.set_position(body, Vec3::new(0.0, 2.0, 0.0));
//! gfx.draw_all(&FrameContext::with_camera(&camera));
//! ```
//!
//! Every operation taking a handle tolerates stale handles: mutations do
//! nothing, queries return `None`. References returned by queries borrow the
//! facade, so they cannot outlive the next mutation.

mod sprites;
mod texts;
mod wrapper;

pub use wrapper::{SpriteMut, TextMut};

use glam::{Affine3A, Quat, Vec3};

use crate::core::{Color, SlotPool};
use crate::errors::{RasterError, Result};
use crate::render::{FrameContext, MeshId, ProgramId, RenderBackend, ShaderSources, TextureId};
use crate::resources::{Sprite, SpriteHandle, Text, TextHandle};
use crate::scene::{NodeHandle, TransformGraph};
use crate::settings::{EngineSettings, ShaderDialect};
use crate::text::FontLibrary;

/// Anything with a transform node: a sprite, a text, or a bare node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneObject {
    Sprite(SpriteHandle),
    Text(TextHandle),
    Node(NodeHandle),
}

impl SceneObject {
    fn kind(self) -> &'static str {
        match self {
            Self::Sprite(_) => "sprite",
            Self::Text(_) => "text",
            Self::Node(_) => "node",
        }
    }
}

impl From<SpriteHandle> for SceneObject {
    fn from(handle: SpriteHandle) -> Self {
        Self::Sprite(handle)
    }
}

impl From<TextHandle> for SceneObject {
    fn from(handle: TextHandle) -> Self {
        Self::Text(handle)
    }
}

impl From<NodeHandle> for SceneObject {
    fn from(handle: NodeHandle) -> Self {
        Self::Node(handle)
    }
}

/// Backend objects owned by a resource under construction or teardown.
#[derive(Debug, Default)]
struct ResourceParts {
    node: Option<NodeHandle>,
    program: Option<ProgramId>,
    mesh: Option<MeshId>,
    texture: Option<TextureId>,
}

#[derive(Debug, Clone, Copy)]
struct SharedProgram {
    id: ProgramId,
    users: usize,
}

/// Resource registry and draw front-end over a [`RenderBackend`].
pub struct Graphics<B: RenderBackend> {
    backend: B,
    graph: TransformGraph,
    sprites: SlotPool<Sprite>,
    texts: SlotPool<Text>,
    fonts: FontLibrary,
    text_program: Option<SharedProgram>,
    dialect: ShaderDialect,
    clear_color: Color,
}

impl<B: RenderBackend> Graphics<B> {
    #[must_use]
    pub fn new(backend: B, settings: &EngineSettings) -> Self {
        log::info!(
            "Graphics initialized: {} sprites, {} texts, {} nodes",
            settings.sprite_capacity,
            settings.text_capacity,
            settings.node_capacity
        );
        Self {
            backend,
            graph: TransformGraph::new(settings.node_capacity),
            sprites: SlotPool::new(settings.sprite_capacity),
            texts: SlotPool::new(settings.text_capacity),
            fonts: FontLibrary::new(),
            text_program: None,
            dialect: settings.shader_dialect,
            clear_color: settings.clear_color,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    #[must_use]
    pub fn graph(&self) -> &TransformGraph {
        &self.graph
    }

    /// Direct access to the transform graph, e.g. to create grouping nodes.
    ///
    /// Destroying a node owned by a sprite or text leaves that resource
    /// without a transform; it then no longer draws.
    pub fn graph_mut(&mut self) -> &mut TransformGraph {
        &mut self.graph
    }

    pub fn fonts_mut(&mut self) -> &mut FontLibrary {
        &mut self.fonts
    }

    #[must_use]
    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    #[must_use]
    pub fn text_count(&self) -> usize {
        self.texts.len()
    }

    pub fn iter_sprites(&self) -> impl Iterator<Item = (SpriteHandle, &Sprite)> {
        self.sprites.iter()
    }

    pub fn iter_texts(&self) -> impl Iterator<Item = (TextHandle, &Text)> {
        self.texts.iter()
    }

    #[must_use]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    // ========================================================================
    // Transform operations shared by every scene object
    // ========================================================================

    /// Transform node behind `object`, if it is live.
    #[must_use]
    pub fn node_of(&self, object: impl Into<SceneObject>) -> Option<NodeHandle> {
        let node = match object.into() {
            SceneObject::Sprite(h) => self.sprites.resolve(h)?.node,
            SceneObject::Text(h) => self.texts.resolve(h)?.node,
            SceneObject::Node(h) => h,
        };
        self.graph.contains(node).then_some(node)
    }

    /// Parents `child` to `parent` (or detaches it with `None`).
    ///
    /// A stale child is ignored. A stale parent fails with
    /// [`RasterError::StaleHandle`], a cycle with [`RasterError::HierarchyCycle`].
    pub fn set_parent(&mut self, child: impl Into<SceneObject>, parent: Option<SceneObject>) -> Result<()> {
        let Some(child_node) = self.node_of(child) else {
            return Ok(());
        };
        let parent_node = match parent {
            Some(object) => Some(
                self.node_of(object)
                    .ok_or(RasterError::StaleHandle { kind: object.kind() })?,
            ),
            None => None,
        };
        self.graph.set_parent(child_node, parent_node)
    }

    pub fn set_position(&mut self, object: impl Into<SceneObject>, position: Vec3) {
        if let Some(node) = self.node_of(object) {
            self.graph.set_position(node, position);
        }
    }

    /// Local position.
    #[must_use]
    pub fn position(&self, object: impl Into<SceneObject>) -> Option<Vec3> {
        self.graph.position(self.node_of(object)?)
    }

    pub fn set_rotation(&mut self, object: impl Into<SceneObject>, rotation: Quat) {
        if let Some(node) = self.node_of(object) {
            self.graph.set_rotation(node, rotation);
        }
    }

    /// In-plane rotation in radians.
    pub fn set_rotation_z(&mut self, object: impl Into<SceneObject>, angle: f32) {
        if let Some(node) = self.node_of(object) {
            self.graph.set_rotation_z(node, angle);
        }
    }

    pub fn set_rotation_axis_angle(&mut self, object: impl Into<SceneObject>, axis: Vec3, angle: f32) {
        if let Some(node) = self.node_of(object) {
            self.graph.set_rotation_axis_angle(node, axis, angle);
        }
    }

    #[must_use]
    pub fn rotation(&self, object: impl Into<SceneObject>) -> Option<Quat> {
        self.graph.rotation(self.node_of(object)?)
    }

    #[must_use]
    pub fn world_matrix(&self, object: impl Into<SceneObject>) -> Option<Affine3A> {
        self.graph.world_matrix(self.node_of(object)?)
    }

    #[must_use]
    pub fn world_position(&self, object: impl Into<SceneObject>) -> Option<Vec3> {
        self.graph.world_position(self.node_of(object)?)
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Clears the frame to the configured clear color.
    pub fn begin_frame(&mut self) {
        self.backend.begin_frame(self.clear_color);
    }

    /// Refreshes all world matrices, then draws every sprite followed by
    /// every text.
    pub fn draw_all(&mut self, ctx: &FrameContext<'_>) {
        self.graph.update_hierarchy();
        for handle in self.sprites.handles() {
            self.draw_sprite(handle, ctx);
        }
        for handle in self.texts.handles() {
            self.draw_text(handle, ctx);
        }
    }

    /// Destroys every sprite and text and releases the shared text program.
    pub fn shutdown(&mut self) {
        let sprites = self.sprites.drain();
        let texts = self.texts.drain();
        log::info!(
            "Graphics shutting down: releasing {} sprites and {} texts",
            sprites.len(),
            texts.len()
        );

        for sprite in sprites {
            self.release_parts(sprite.into_parts(), false);
        }
        for text in texts {
            self.release_parts(text.into_parts(), true);
        }
        if let Some(shared) = self.text_program.take() {
            self.backend.destroy_program(shared.id);
        }
        self.fonts.clear();
    }

    // ========================================================================
    // Internals
    // ========================================================================

    // Reverse dependency order: texture, program, mesh, then the node.
    fn release_parts(&mut self, parts: ResourceParts, shared_text_program: bool) {
        if let Some(texture) = parts.texture {
            self.backend.destroy_texture(texture);
        }
        if let Some(program) = parts.program {
            if shared_text_program {
                self.release_text_program();
            } else {
                self.backend.destroy_program(program);
            }
        }
        if let Some(mesh) = parts.mesh {
            self.backend.destroy_mesh(mesh);
        }
        if let Some(node) = parts.node {
            self.graph.destroy_node(node);
        }
    }

    fn acquire_text_program(&mut self) -> Result<ProgramId> {
        if let Some(shared) = &mut self.text_program {
            shared.users += 1;
            return Ok(shared.id);
        }

        let sources = ShaderSources::for_text(self.dialect);
        let id = self.backend.create_program(&sources.vertex, &sources.fragment)?;
        log::debug!("Text program created");
        self.text_program = Some(SharedProgram { id, users: 1 });
        Ok(id)
    }

    fn release_text_program(&mut self) {
        let Some(shared) = &mut self.text_program else {
            return;
        };
        shared.users = shared.users.saturating_sub(1);
        if shared.users == 0 {
            let id = shared.id;
            self.text_program = None;
            self.backend.destroy_program(id);
            log::debug!("Text program released");
        }
    }

    /// Number of live texts sharing the text program.
    #[must_use]
    pub fn text_program_users(&self) -> usize {
        self.text_program.map_or(0, |shared| shared.users)
    }
}

impl<B: RenderBackend + std::fmt::Debug> std::fmt::Debug for Graphics<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graphics")
            .field("backend", &self.backend)
            .field("sprites", &self.sprites.len())
            .field("texts", &self.texts.len())
            .field("nodes", &self.graph.len())
            .finish_non_exhaustive()
    }
}
