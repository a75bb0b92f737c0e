//! Drawable resources and their descriptors.
//!
//! - [`Sprite`]: colored / textured quad with custom shader parameters
//! - [`Text`]: text rasterized into a texture on a quad
//! - [`ParamTable`]: bounded named shader parameters
//!
//! Both resource kinds own one transform node and are addressed by
//! generational handles issued by [`Graphics`](crate::Graphics).

pub mod params;
pub mod sprite;
pub mod text;

pub use params::{MAX_SHADER_PARAMS, ParamTable, ParamValue, ShaderParam};
pub use sprite::{Sprite, SpriteDescriptor, SpriteHandle};
pub use text::{MAX_FONT_SIZE, Text, TextDescriptor, TextHandle};
