//! Text layout service.
//!
//! Turns a string into a coverage bitmap that a text resource uploads as a
//! texture. Glyph metrics and coverage come from a [`GlyphRasterizer`]
//! (`fontdue` for font files); placement in the world is the transform
//! graph's business, not this module's.

pub mod font;
pub mod layout;

pub use font::{FontLibrary, GlyphBitmap, GlyphRasterizer, LineMetrics, load_font};
pub use layout::{MAX_TEXT_BITMAP_DIMENSION, TEXT_PADDING, TextAlign, TextBitmap, VerticalMetrics, measure_line, rasterize_text};
