//! Scene hierarchy:
//! - Transform: local position, rotation, scale
//! - Node: transform plus hierarchy links and cached world matrix
//! - TransformGraph: node arena with parenting and lazy world matrices
//! - TransformSystem: world-matrix propagation passes
//! - Camera: view and projection

pub mod camera;
pub mod graph;
pub mod node;
pub mod transform;
pub mod transform_system;

pub use camera::{Camera, CameraDescriptor};
pub use graph::TransformGraph;
pub use node::Node;
pub use transform::Transform;

/// Generational handle to a transform node.
pub type NodeHandle = crate::core::Handle<Node>;
