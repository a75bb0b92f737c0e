use std::path::Path;

use glam::{Mat4, Vec2, Vec3};

use super::{Graphics, ResourceParts, SpriteMut};
use crate::core::Color;
use crate::errors::{RasterError, Result};
use crate::render::{DrawCall, FrameContext, QuadLayout, QuadMesh, RenderBackend, ShaderSources, TEXCOORD_ATTRIBUTE};
use crate::resources::{ParamTable, ParamValue, Sprite, SpriteDescriptor, SpriteHandle};
use crate::scene::Transform;

impl Sprite {
    pub(super) fn into_parts(self) -> ResourceParts {
        ResourceParts {
            node: Some(self.node),
            program: Some(self.program),
            mesh: Some(self.mesh),
            texture: self.texture,
        }
    }
}

impl<B: RenderBackend> Graphics<B> {
    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Builds a sprite and registers it.
    ///
    /// On any failure everything allocated so far is released and no sprite
    /// is registered.
    pub fn create_sprite(&mut self, desc: &SpriteDescriptor) -> Result<SpriteHandle> {
        desc.validate()?;

        if self.sprites.is_full() {
            log::error!("Cannot create sprite: pool exhausted");
            return Err(RasterError::ResourceExhausted {
                kind: "sprite",
                capacity: self.sprites.capacity(),
            });
        }

        let node = self
            .graph
            .create_node_with(Transform::from_position_scale(desc.position, desc.scale))?;
        let mut parts = ResourceParts {
            node: Some(node),
            ..Default::default()
        };

        let sprite = match self.build_sprite(desc, &mut parts) {
            Ok(sprite) => sprite,
            Err(err) => {
                log::error!("Failed to create sprite: {err}");
                self.release_parts(parts, false);
                return Err(err);
            }
        };

        match self.sprites.register(sprite) {
            Ok(handle) => {
                log::debug!("Sprite created: {handle:?}");
                Ok(handle)
            }
            Err(rejected) => {
                let capacity = rejected.capacity();
                self.release_parts(rejected.into_inner().into_parts(), false);
                Err(RasterError::ResourceExhausted {
                    kind: "sprite",
                    capacity,
                })
            }
        }
    }

    fn build_sprite(&mut self, desc: &SpriteDescriptor, parts: &mut ResourceParts) -> Result<Sprite> {
        let mut params = ParamTable::new();
        for param in &desc.params {
            params.set(&param.name, param.value)?;
        }

        let sources = ShaderSources::for_sprite(
            desc.vertex_shader_path.as_deref(),
            desc.fragment_shader_path.as_deref(),
            self.dialect,
        )?;
        let program = self.backend.create_program(&sources.vertex, &sources.fragment)?;
        parts.program = Some(program);

        if let Some(path) = &desc.texture_path {
            match self.backend.load_texture(path) {
                Ok(texture) => parts.texture = Some(texture),
                Err(err) => log::warn!("{err}; sprite will be drawn untextured"),
            }
        }

        let layout = if self.backend.program_has_attribute(program, TEXCOORD_ATTRIBUTE) {
            QuadLayout::Textured
        } else {
            QuadLayout::Plain
        };
        let mesh = self.backend.create_quad(&QuadMesh::new(layout))?;
        parts.mesh = Some(mesh);

        Ok(Sprite {
            node: parts.node.unwrap_or_default(),
            program,
            mesh,
            texture: parts.texture,
            color: desc.color,
            params,
        })
    }

    /// Unregisters the sprite, then releases its texture, program, mesh and
    /// node. Stale handles are ignored.
    pub fn destroy_sprite(&mut self, handle: SpriteHandle) {
        if let Some(sprite) = self.sprites.unregister(handle) {
            self.release_parts(sprite.into_parts(), false);
            log::debug!("Sprite destroyed: {handle:?}");
        }
    }

    #[must_use]
    pub fn sprite(&self, handle: SpriteHandle) -> Option<&Sprite> {
        self.sprites.resolve(handle)
    }

    /// Chainable setters for one sprite.
    pub fn sprite_mut(&mut self, handle: SpriteHandle) -> SpriteMut<'_, B> {
        SpriteMut::new(self, handle)
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    /// Submits one draw call for the sprite. Stale handles draw nothing.
    pub fn draw_sprite(&mut self, handle: SpriteHandle, ctx: &FrameContext<'_>) {
        let Some(sprite) = self.sprites.resolve(handle) else {
            return;
        };
        let Some(world) = self.graph.world_matrix(sprite.node) else {
            return;
        };
        let size = self.graph.scale(sprite.node).map_or(Vec2::ONE, Vec3::truncate);
        let (view, projection) = ctx.view_projection();

        self.backend.submit(&DrawCall {
            program: sprite.program,
            mesh: sprite.mesh,
            texture: sprite.texture,
            model: Mat4::from(world),
            view,
            projection,
            color: sprite.color,
            size,
            time: ctx.time(),
            params: sprite.params.as_slice(),
        });
    }

    // ========================================================================
    // Setters & getters
    // ========================================================================

    pub fn set_sprite_scale(&mut self, handle: SpriteHandle, scale: Vec3) {
        if let Some(sprite) = self.sprites.resolve(handle) {
            self.graph.set_scale(sprite.node, scale);
        }
    }

    #[must_use]
    pub fn sprite_scale(&self, handle: SpriteHandle) -> Option<Vec3> {
        self.graph.scale(self.sprites.resolve(handle)?.node)
    }

    /// Sets the x/y scale, keeping z.
    pub fn set_sprite_size(&mut self, handle: SpriteHandle, size: Vec2) {
        if let Some(sprite) = self.sprites.resolve(handle) {
            self.graph.modify(sprite.node, |t| {
                t.scale = size.extend(t.scale.z);
            });
        }
    }

    #[must_use]
    pub fn sprite_size(&self, handle: SpriteHandle) -> Option<Vec2> {
        self.sprite_scale(handle).map(Vec3::truncate)
    }

    pub fn set_sprite_color(&mut self, handle: SpriteHandle, color: Color) {
        if let Some(sprite) = self.sprites.resolve_mut(handle) {
            sprite.color = color;
        }
    }

    #[must_use]
    pub fn sprite_color(&self, handle: SpriteHandle) -> Option<Color> {
        self.sprites.resolve(handle).map(Sprite::color)
    }

    /// Sets a custom shader parameter.
    ///
    /// Stale handles are ignored. Fails with
    /// [`RasterError::ParameterTableFull`] when the name is new and the
    /// table is full.
    pub fn set_sprite_param(&mut self, handle: SpriteHandle, name: &str, value: impl Into<ParamValue>) -> Result<()> {
        match self.sprites.resolve_mut(handle) {
            Some(sprite) => sprite.params.set(name, value.into()),
            None => Ok(()),
        }
    }

    #[must_use]
    pub fn sprite_param(&self, handle: SpriteHandle, name: &str) -> Option<ParamValue> {
        self.sprites.resolve(handle)?.params.get(name)
    }

    /// Replaces the sprite's texture with one loaded from `path`, or removes
    /// it with `None`.
    ///
    /// The old texture is kept if loading fails.
    pub fn set_sprite_texture(&mut self, handle: SpriteHandle, path: Option<&Path>) -> Result<()> {
        if !self.sprites.contains(handle) {
            return Ok(());
        }

        let texture = path.map(|p| self.backend.load_texture(p)).transpose()?;
        if let Some(sprite) = self.sprites.resolve_mut(handle) {
            let old = std::mem::replace(&mut sprite.texture, texture);
            if let Some(old) = old {
                self.backend.destroy_texture(old);
            }
        }
        Ok(())
    }
}
