use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use glam::{UVec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::{Color, Handle};
use crate::errors::{RasterError, Result};
use crate::render::{MeshId, ProgramId, TextureId};
use crate::scene::NodeHandle;
use crate::text::{GlyphRasterizer, TextAlign};

pub type TextHandle = Handle<Text>;

/// Longest text kept, in characters. Longer input is truncated.
pub const MAX_TEXT_CHARS: usize = 255;
/// Line spacing used when the descriptor gives none.
pub const DEFAULT_LINE_SPACING: f32 = 1.2;
pub const MIN_LINE_SPACING: f32 = 0.5;
pub const MAX_LINE_SPACING: f32 = 3.0;
/// Largest accepted font size, in pixels.
pub const MAX_FONT_SIZE: f32 = 1024.0;
/// World units per font pixel.
pub const TEXT_WORLD_SCALE: f32 = 0.04;

/// Node scale for a font size. Y is negated because bitmaps are stored top
/// row first.
#[must_use]
pub fn text_scale(font_size: f32) -> Vec3 {
    Vec3::new(font_size * TEXT_WORLD_SCALE, -font_size * TEXT_WORLD_SCALE, 1.0)
}

/// Keeps at most [`MAX_TEXT_CHARS`] characters.
#[must_use]
pub fn truncate_text(text: &str) -> String {
    match text.char_indices().nth(MAX_TEXT_CHARS) {
        Some((cut, _)) => {
            log::warn!("Text longer than {MAX_TEXT_CHARS} characters, truncating");
            text[..cut].to_owned()
        }
        None => text.to_owned(),
    }
}

/// Accepts finite sizes in `(0, MAX_FONT_SIZE]`.
pub fn check_font_size(font_size: f32) -> Result<()> {
    if !(font_size.is_finite() && font_size > 0.0) {
        return Err(RasterError::malformed(format!(
            "text font_size must be positive, got {font_size}"
        )));
    }
    if font_size > MAX_FONT_SIZE {
        return Err(RasterError::malformed(format!(
            "text font_size {font_size} exceeds the maximum of {MAX_FONT_SIZE}"
        )));
    }
    Ok(())
}

/// Parameters for [`Graphics::create_text`](crate::Graphics::create_text).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextDescriptor {
    /// Required.
    pub font_path: PathBuf,
    /// Pixel height glyphs are rasterized at. Must be in `(0, MAX_FONT_SIZE]`.
    pub font_size: f32,
    /// Required, non-empty.
    pub text: String,
    pub position: Vec3,
    pub color: Color,
    /// Multiplier on the font's natural line height; `<= 0` means the default.
    pub line_spacing: f32,
    pub alignment: TextAlign,
}

impl Default for TextDescriptor {
    fn default() -> Self {
        Self {
            font_path: PathBuf::new(),
            font_size: 32.0,
            text: String::new(),
            position: Vec3::ZERO,
            color: Color::WHITE,
            line_spacing: DEFAULT_LINE_SPACING,
            alignment: TextAlign::Left,
        }
    }
}

impl TextDescriptor {
    pub fn validate(&self) -> Result<()> {
        if self.font_path.as_os_str().is_empty() {
            return Err(RasterError::malformed("text requires a font_path"));
        }
        if self.text.is_empty() {
            return Err(RasterError::malformed("text requires non-empty text"));
        }
        check_font_size(self.font_size)?;
        if !self.position.is_finite() {
            return Err(RasterError::malformed("text position must be finite"));
        }
        Ok(())
    }

    /// Line spacing with the default applied.
    #[must_use]
    pub fn effective_line_spacing(&self) -> f32 {
        if self.line_spacing > 0.0 {
            self.line_spacing
        } else {
            DEFAULT_LINE_SPACING
        }
    }
}

/// A billboarded text quad placed by a transform node.
pub struct Text {
    pub(crate) node: NodeHandle,
    pub(crate) program: ProgramId,
    pub(crate) mesh: MeshId,
    pub(crate) texture: TextureId,
    pub(crate) font: Rc<dyn GlyphRasterizer>,
    pub(crate) font_path: PathBuf,
    pub(crate) content: String,
    pub(crate) font_size: f32,
    pub(crate) color: Color,
    pub(crate) line_spacing: f32,
    pub(crate) alignment: TextAlign,
    pub(crate) bitmap_size: UVec2,
}

impl Text {
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
    pub fn texture(&self) -> TextureId {
        self.texture
    }

    #[must_use]
    pub fn font_path(&self) -> &Path {
        &self.font_path
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub fn line_spacing(&self) -> f32 {
        self.line_spacing
    }

    #[must_use]
    pub fn alignment(&self) -> TextAlign {
        self.alignment
    }

    /// Size of the rasterized bitmap in pixels.
    #[must_use]
    pub fn bitmap_size(&self) -> UVec2 {
        self.bitmap_size
    }

    /// Bitmap width over height, applied as extra x scale when drawing.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        if self.bitmap_size.y == 0 {
            1.0
        } else {
            self.bitmap_size.x as f32 / self.bitmap_size.y as f32
        }
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Text")
            .field("node", &self.node)
            .field("content", &self.content)
            .field("font_path", &self.font_path)
            .field("font_size", &self.font_size)
            .field("alignment", &self.alignment)
            .field("bitmap_size", &self.bitmap_size)
            .finish_non_exhaustive()
    }
}
