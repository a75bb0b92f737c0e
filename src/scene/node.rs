use std::cell::Cell;

use glam::Affine3A;

use crate::scene::NodeHandle;
use crate::scene::transform::Transform;

/// A transform node: local TRS, hierarchy links and the cached world matrix.
///
/// # Hierarchy
///
/// - `parent`: generational handle to the parent (None for roots). It never
///   owns the parent; a destroyed parent simply stops resolving.
/// - `children`: handles of the direct children, kept in sync by
///   [`TransformGraph`](crate::scene::TransformGraph).
///
/// # World matrix cache
///
/// The world matrix is cached in a [`Cell`] together with a dirty flag so it
/// can be refreshed lazily through a shared reference. Invariant: a dirty
/// node's descendants are all dirty, so a clean node has clean ancestors.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub(crate) transform: Transform,

    world: Cell<Affine3A>,
    world_dirty: Cell<bool>,
}

impl Node {
    #[must_use]
    pub fn new(transform: Transform) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            transform,
            world: Cell::new(Affine3A::IDENTITY),
            world_dirty: Cell::new(true),
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Whether the cached world matrix needs recomputing.
    #[inline]
    #[must_use]
    pub fn is_world_dirty(&self) -> bool {
        self.world_dirty.get()
    }

    #[inline]
    pub(crate) fn cached_world(&self) -> Affine3A {
        self.world.get()
    }

    #[inline]
    pub(crate) fn store_world(&self, world: Affine3A) {
        self.world.set(world);
        self.world_dirty.set(false);
    }

    /// Flags the cached world matrix stale. Returns `false` if it already was.
    #[inline]
    pub(crate) fn invalidate_world(&self) -> bool {
        !self.world_dirty.replace(true)
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new(Transform::new())
    }
}
