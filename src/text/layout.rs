//! Multi-line text rasterization into a single coverage bitmap.
//!
//! Metrics are rounded to whole pixels the same way at measure and blit
//! time, so measured line widths match what is drawn.

use serde::{Deserialize, Serialize};

use super::font::GlyphRasterizer;
use crate::errors::{RasterError, Result};

/// Padding added around the laid-out text, split evenly on both sides.
pub const TEXT_PADDING: u32 = 10;
/// Largest width or height a text bitmap may have.
pub const MAX_TEXT_BITMAP_DIMENSION: u32 = 16_384;

/// Horizontal alignment of each line inside the bitmap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// Maps `0 | 1 | 2` to left/center/right; anything else is left.
    #[must_use]
    pub fn from_index(index: i32) -> Self {
        match index {
            1 => Self::Center,
            2 => Self::Right,
            _ => Self::Left,
        }
    }
}

/// Single-channel text image, row-major, top row first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextBitmap {
    fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    /// Width over height; 1 for an empty bitmap.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    #[must_use]
    pub fn coverage_at(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    // Max-blends a glyph with its top-left corner at (x, y), clipped to bounds.
    fn blit(&mut self, x: i32, y: i32, glyph: &super::font::GlyphBitmap) {
        for row in 0..glyph.height {
            let dst_y = y + row as i32;
            if dst_y < 0 || dst_y >= self.height as i32 {
                continue;
            }
            for col in 0..glyph.width {
                let dst_x = x + col as i32;
                if dst_x < 0 || dst_x >= self.width as i32 {
                    continue;
                }
                let Some(&src) = glyph.coverage.get(row * glyph.width + col) else {
                    continue;
                };
                let dst = &mut self.pixels[dst_y as usize * self.width as usize + dst_x as usize];
                *dst = (*dst).max(src);
            }
        }
    }
}

/// Vertical layout shared by every line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerticalMetrics {
    /// Rounded ascent; the first baseline sits this far below the top.
    pub baseline: i32,
    /// Distance between consecutive baselines.
    pub line_height: i32,
}

impl VerticalMetrics {
    #[must_use]
    pub fn new(font: &dyn GlyphRasterizer, px: f32, line_spacing: f32) -> Self {
        let metrics = font.line_metrics(px);
        let ascent = metrics.ascent.round() as i32;
        let descent = metrics.descent.round() as i32;
        let line_height = (ascent.saturating_sub(descent) as f32 * line_spacing).round() as i32;
        Self {
            baseline: ascent,
            line_height: line_height.max(1),
        }
    }
}

/// Walks `line`, calling `visit(ch, pen_x)` per character, and returns the
/// final pen position.
fn walk_line(font: &dyn GlyphRasterizer, line: &str, px: f32, mut visit: impl FnMut(char, i32)) -> i32 {
    let mut pen = 0;
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        visit(ch, pen);
        pen = pen.saturating_add(font.advance(ch, px).round() as i32);
        if let Some(&next) = chars.peek() {
            pen = pen.saturating_add(font.kerning(ch, next, px).round() as i32);
        }
    }
    pen
}

/// Width of `line` in whole pixels.
#[must_use]
pub fn measure_line(font: &dyn GlyphRasterizer, line: &str, px: f32) -> u32 {
    walk_line(font, line, px, |_, _| {}).max(0) as u32
}

/// Lays out `text` (lines separated by `'\n'`) and rasterizes it.
///
/// The bitmap is the widest line plus [`TEXT_PADDING`] wide and
/// `lines * line_height` plus [`TEXT_PADDING`] tall.
///
/// # Errors
///
/// [`RasterError::MalformedDescriptor`] when either dimension would exceed
/// [`MAX_TEXT_BITMAP_DIMENSION`].
pub fn rasterize_text(
    font: &dyn GlyphRasterizer,
    text: &str,
    px: f32,
    line_spacing: f32,
    align: TextAlign,
) -> Result<TextBitmap> {
    let vertical = VerticalMetrics::new(font, px, line_spacing);
    let lines: Vec<&str> = text.split('\n').collect();
    let widths: Vec<u32> = lines.iter().map(|line| measure_line(font, line, px)).collect();

    let max_width = widths.iter().copied().max().unwrap_or(0);
    let width = bounded_dimension(u64::from(max_width) + u64::from(TEXT_PADDING), "width")?;
    let line_height = u64::try_from(vertical.line_height).unwrap_or(1);
    let height = bounded_dimension(lines.len() as u64 * line_height + u64::from(TEXT_PADDING), "height")?;
    let mut bitmap = TextBitmap::blank(width, height);

    let half_pad = (TEXT_PADDING / 2) as i32;
    let mut baseline = vertical.baseline;

    for (line, &line_width) in lines.iter().zip(&widths) {
        let start_x = match align {
            TextAlign::Left => half_pad,
            TextAlign::Center => (width as i32 - line_width as i32) / 2,
            TextAlign::Right => width as i32 - line_width as i32 - half_pad,
        };

        walk_line(font, line, px, |ch, pen| {
            let glyph = font.rasterize(ch, px);
            bitmap.blit(start_x + pen + glyph.left, baseline + glyph.top, &glyph);
        });

        baseline += vertical.line_height;
    }

    Ok(bitmap)
}

fn bounded_dimension(value: u64, axis: &str) -> Result<u32> {
    u32::try_from(value)
        .ok()
        .filter(|&v| v <= MAX_TEXT_BITMAP_DIMENSION)
        .ok_or_else(|| {
            RasterError::malformed(format!(
                "text bitmap {axis} {value} exceeds the {MAX_TEXT_BITMAP_DIMENSION}px limit"
            ))
        })
}
