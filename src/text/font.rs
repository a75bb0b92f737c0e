use std::path::{Path, PathBuf};
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::errors::{RasterError, Result};

/// Vertical metrics of a font at a pixel height, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    /// Distance from the baseline to the top of the tallest glyph (positive).
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the lowest glyph (negative).
    pub descent: f32,
}

/// Coverage bitmap of one glyph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphBitmap {
    /// Horizontal offset of the bitmap's left column from the pen position.
    pub left: i32,
    /// Vertical offset of the bitmap's top row from the baseline, y pointing
    /// down (negative above the baseline).
    pub top: i32,
    pub width: usize,
    pub height: usize,
    /// Row-major coverage, `width * height` bytes.
    pub coverage: Vec<u8>,
}

/// Source of glyph metrics and coverage.
///
/// Implemented for [`fontdue::Font`]; anything else (bitmap fonts, test
/// fonts) can be registered with a [`FontLibrary`].
pub trait GlyphRasterizer {
    fn line_metrics(&self, px: f32) -> LineMetrics;

    /// Horizontal pen advance after `ch`.
    fn advance(&self, ch: char, px: f32) -> f32;

    /// Extra horizontal adjustment between `left` and `right`.
    fn kerning(&self, _left: char, _right: char, _px: f32) -> f32 {
        0.0
    }

    fn rasterize(&self, ch: char, px: f32) -> GlyphBitmap;
}

impl GlyphRasterizer for fontdue::Font {
    fn line_metrics(&self, px: f32) -> LineMetrics {
        match self.horizontal_line_metrics(px) {
            Some(m) => LineMetrics {
                ascent: m.ascent,
                descent: m.descent,
            },
            // Fonts without horizontal metrics: split the em box 4:1.
            None => LineMetrics {
                ascent: px * 0.8,
                descent: -px * 0.2,
            },
        }
    }

    fn advance(&self, ch: char, px: f32) -> f32 {
        self.metrics(ch, px).advance_width
    }

    fn kerning(&self, left: char, right: char, px: f32) -> f32 {
        self.horizontal_kern(left, right, px).unwrap_or(0.0)
    }

    fn rasterize(&self, ch: char, px: f32) -> GlyphBitmap {
        let (metrics, coverage) = fontdue::Font::rasterize(self, ch, px);
        GlyphBitmap {
            left: metrics.xmin,
            top: -(metrics.ymin + metrics.height as i32),
            width: metrics.width,
            height: metrics.height,
            coverage,
        }
    }
}

/// Parses a TrueType/OpenType file with `fontdue`.
pub fn load_font(path: &Path) -> Result<fontdue::Font> {
    let bytes = std::fs::read(path).map_err(|err| RasterError::FontLoad {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;

    fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default()).map_err(|reason| {
        RasterError::FontLoad {
            path: path.to_path_buf(),
            reason: reason.to_owned(),
        }
    })
}

/// Fonts keyed by path, loaded once and shared by every text using them.
#[derive(Default)]
pub struct FontLibrary {
    fonts: FxHashMap<PathBuf, Rc<dyn GlyphRasterizer>>,
}

impl FontLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `rasterizer` available under `path` without touching the
    /// filesystem. Replaces any font already registered there.
    pub fn register(&mut self, path: impl Into<PathBuf>, rasterizer: Rc<dyn GlyphRasterizer>) {
        self.fonts.insert(path.into(), rasterizer);
    }

    /// Returns the font registered under `path`, loading it on first use.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Rc<dyn GlyphRasterizer>> {
        if let Some(font) = self.fonts.get(path) {
            return Ok(Rc::clone(font));
        }

        let font: Rc<dyn GlyphRasterizer> = Rc::new(load_font(path)?);
        log::info!("Loaded font '{}'", path.display());
        self.fonts.insert(path.to_path_buf(), Rc::clone(&font));
        Ok(font)
    }

    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.fonts.contains_key(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Drops the library's references; texts keep their own.
    pub fn clear(&mut self) {
        self.fonts.clear();
    }
}

impl std::fmt::Debug for FontLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontLibrary")
            .field("fonts", &self.fonts.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_font_file_reports_path() {
        let mut library = FontLibrary::new();
        let err = library
            .get_or_load(Path::new("no/such/font.ttf"))
            .err()
            .expect("loading a missing font should fail");
        match err {
            RasterError::FontLoad { path, .. } => assert_eq!(path, Path::new("no/such/font.ttf")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(library.is_empty());
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let path = std::env::temp_dir().join("raster_font_garbage.ttf");
        std::fs::write(&path, b"not a font").unwrap();
        assert!(matches!(load_font(&path), Err(RasterError::FontLoad { .. })));
        let _ = std::fs::remove_file(path);
    }
}
