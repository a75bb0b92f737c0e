//! Rendering interface:
//! - [`RenderBackend`]: device services (programs, quads, textures, draws)
//! - [`FrameContext`]: the camera and time a draw is made with
//! - [`shader`]: built-in GLSL and shader file loading
//! - [`HeadlessBackend`]: in-memory backend that records draws

pub mod backend;
pub mod context;
pub mod headless;
pub mod shader;

pub use backend::{DrawCall, MeshId, ProgramId, QuadLayout, QuadMesh, RenderBackend, TEXCOORD_ATTRIBUTE, TextureId};
pub use context::FrameContext;
pub use headless::{HeadlessBackend, RecordedDraw};
pub use shader::ShaderSources;
