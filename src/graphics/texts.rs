use std::rc::Rc;

use glam::{Mat4, UVec2, Vec3};

use super::{Graphics, ResourceParts, TextMut};
use crate::core::Color;
use crate::errors::{RasterError, Result};
use crate::render::{DrawCall, FrameContext, QuadLayout, QuadMesh, RenderBackend};
use crate::resources::text::{MAX_LINE_SPACING, MIN_LINE_SPACING, check_font_size, text_scale, truncate_text};
use crate::resources::{Text, TextDescriptor, TextHandle};
use crate::scene::Transform;
use crate::text::{GlyphRasterizer, TextAlign, rasterize_text};

/// Layout inputs of a text, staged until the re-rasterized bitmap is uploaded.
struct TextLayout {
    content: String,
    font_size: f32,
    line_spacing: f32,
    alignment: TextAlign,
}

impl Text {
    fn layout(&self) -> TextLayout {
        TextLayout {
            content: self.content.clone(),
            font_size: self.font_size,
            line_spacing: self.line_spacing,
            alignment: self.alignment,
        }
    }

    pub(super) fn into_parts(self) -> ResourceParts {
        ResourceParts {
            node: Some(self.node),
            program: Some(self.program),
            mesh: Some(self.mesh),
            texture: Some(self.texture),
        }
    }
}

impl<B: RenderBackend> Graphics<B> {
    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Lays out and uploads a text, then registers it.
    ///
    /// The font is loaded through the font library (once per path). On any
    /// failure everything allocated so far is released.
    pub fn create_text(&mut self, desc: &TextDescriptor) -> Result<TextHandle> {
        desc.validate()?;

        if self.texts.is_full() {
            log::error!("Cannot create text: pool exhausted");
            return Err(RasterError::ResourceExhausted {
                kind: "text",
                capacity: self.texts.capacity(),
            });
        }

        let font = self.fonts.get_or_load(&desc.font_path)?;

        let node = self
            .graph
            .create_node_with(Transform::from_position_scale(desc.position, text_scale(desc.font_size)))?;
        let mut parts = ResourceParts {
            node: Some(node),
            ..Default::default()
        };

        let text = match self.build_text(desc, node, font, &mut parts) {
            Ok(text) => text,
            Err(err) => {
                log::error!("Failed to create text: {err}");
                self.release_parts(parts, true);
                return Err(err);
            }
        };

        match self.texts.register(text) {
            Ok(handle) => {
                log::debug!("Text created: {handle:?}");
                Ok(handle)
            }
            Err(rejected) => {
                let capacity = rejected.capacity();
                self.release_parts(rejected.into_inner().into_parts(), true);
                Err(RasterError::ResourceExhausted { kind: "text", capacity })
            }
        }
    }

    fn build_text(
        &mut self,
        desc: &TextDescriptor,
        node: crate::scene::NodeHandle,
        font: Rc<dyn GlyphRasterizer>,
        parts: &mut ResourceParts,
    ) -> Result<Text> {
        let program = self.acquire_text_program()?;
        parts.program = Some(program);

        let mesh = self.backend.create_quad(&QuadMesh::new(QuadLayout::Textured))?;
        parts.mesh = Some(mesh);

        let content = truncate_text(&desc.text);
        let line_spacing = desc.effective_line_spacing();
        let bitmap = rasterize_text(font.as_ref(), &content, desc.font_size, line_spacing, desc.alignment)?;
        let texture = self.backend.upload_alpha_texture(None, &bitmap)?;
        parts.texture = Some(texture);

        Ok(Text {
            node,
            program,
            mesh,
            texture,
            font,
            font_path: desc.font_path.clone(),
            content,
            font_size: desc.font_size,
            color: desc.color,
            line_spacing,
            alignment: desc.alignment,
            bitmap_size: UVec2::new(bitmap.width, bitmap.height),
        })
    }

    /// Unregisters the text and releases its resources. The shared text
    /// program is destroyed with its last user.
    pub fn destroy_text(&mut self, handle: TextHandle) {
        if let Some(text) = self.texts.unregister(handle) {
            self.release_parts(text.into_parts(), true);
            log::debug!("Text destroyed: {handle:?}");
        }
    }

    #[must_use]
    pub fn text(&self, handle: TextHandle) -> Option<&Text> {
        self.texts.resolve(handle)
    }

    /// Chainable setters for one text.
    pub fn text_mut(&mut self, handle: TextHandle) -> TextMut<'_, B> {
        TextMut::new(self, handle)
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    /// Submits the text quad, stretched horizontally to the bitmap's aspect.
    pub fn draw_text(&mut self, handle: TextHandle, ctx: &FrameContext<'_>) {
        let Some(text) = self.texts.resolve(handle) else {
            return;
        };
        let Some(world) = self.graph.world_matrix(text.node) else {
            return;
        };

        let aspect = text.aspect();
        let model = Mat4::from(world) * Mat4::from_scale(Vec3::new(aspect, 1.0, 1.0));
        let scale = self.graph.scale(text.node).unwrap_or(Vec3::ONE);
        let (view, projection) = ctx.view_projection();

        self.backend.submit(&DrawCall {
            program: text.program,
            mesh: text.mesh,
            texture: Some(text.texture),
            model,
            view,
            projection,
            color: text.color,
            size: (scale * Vec3::new(aspect, 1.0, 1.0)).truncate().abs(),
            time: ctx.time(),
            params: &[],
        });
    }

    // ========================================================================
    // Setters & getters
    // ========================================================================

    /// Replaces the text (truncated to the maximum length) and re-lays it out.
    ///
    /// The text is left unchanged if the layout or upload fails.
    pub fn set_text(&mut self, handle: TextHandle, content: &str) -> Result<()> {
        let Some(text) = self.texts.resolve(handle) else {
            return Ok(());
        };
        let content = truncate_text(content);
        if text.content == content {
            return Ok(());
        }
        let layout = TextLayout { content, ..text.layout() };
        self.relayout_text(handle, layout)
    }

    pub fn set_text_color(&mut self, handle: TextHandle, color: Color) {
        if let Some(text) = self.texts.resolve_mut(handle) {
            text.color = color;
        }
    }

    #[must_use]
    pub fn text_color(&self, handle: TextHandle) -> Option<Color> {
        self.texts.resolve(handle).map(Text::color)
    }

    /// Changes the font size. Non-positive sizes are ignored; sizes above
    /// [`MAX_FONT_SIZE`](crate::resources::MAX_FONT_SIZE) are rejected.
    pub fn set_font_size(&mut self, handle: TextHandle, font_size: f32) -> Result<()> {
        if !(font_size.is_finite() && font_size > 0.0) {
            log::warn!("Ignoring non-positive font size {font_size}");
            return Ok(());
        }
        check_font_size(font_size)?;
        let Some(text) = self.texts.resolve(handle) else {
            return Ok(());
        };
        let layout = TextLayout { font_size, ..text.layout() };
        self.relayout_text(handle, layout)
    }

    #[must_use]
    pub fn font_size(&self, handle: TextHandle) -> Option<f32> {
        self.texts.resolve(handle).map(Text::font_size)
    }

    pub fn set_text_alignment(&mut self, handle: TextHandle, alignment: TextAlign) -> Result<()> {
        let Some(text) = self.texts.resolve(handle) else {
            return Ok(());
        };
        if text.alignment == alignment {
            return Ok(());
        }
        let layout = TextLayout { alignment, ..text.layout() };
        self.relayout_text(handle, layout)
    }

    #[must_use]
    pub fn text_alignment(&self, handle: TextHandle) -> Option<TextAlign> {
        self.texts.resolve(handle).map(Text::alignment)
    }

    /// Sets the line spacing, clamped to `[0.5, 3.0]`.
    pub fn set_line_spacing(&mut self, handle: TextHandle, spacing: f32) -> Result<()> {
        let Some(text) = self.texts.resolve(handle) else {
            return Ok(());
        };
        let spacing = spacing.clamp(MIN_LINE_SPACING, MAX_LINE_SPACING);
        if (text.line_spacing - spacing).abs() <= f32::EPSILON {
            return Ok(());
        }
        let layout = TextLayout {
            line_spacing: spacing,
            ..text.layout()
        };
        self.relayout_text(handle, layout)
    }

    #[must_use]
    pub fn line_spacing(&self, handle: TextHandle) -> Option<f32> {
        self.texts.resolve(handle).map(Text::line_spacing)
    }

    /// Re-rasterizes `layout` into the text's existing texture, then commits
    /// it. Nothing on the text changes unless the upload succeeds.
    fn relayout_text(&mut self, handle: TextHandle, layout: TextLayout) -> Result<()> {
        let Some(text) = self.texts.resolve_mut(handle) else {
            return Ok(());
        };
        let bitmap = rasterize_text(
            text.font.as_ref(),
            &layout.content,
            layout.font_size,
            layout.line_spacing,
            layout.alignment,
        )?;
        text.texture = self.backend.upload_alpha_texture(Some(text.texture), &bitmap)?;
        text.bitmap_size = UVec2::new(bitmap.width, bitmap.height);

        let resized = (text.font_size - layout.font_size).abs() > f32::EPSILON;
        text.content = layout.content;
        text.font_size = layout.font_size;
        text.line_spacing = layout.line_spacing;
        text.alignment = layout.alignment;
        if resized {
            let node = text.node;
            self.graph.set_scale(node, text_scale(layout.font_size));
        }
        Ok(())
    }
}
