//! Transform hierarchy.
//!
//! [`TransformGraph`] owns every transform node in a fixed-capacity
//! [`SlotPool`] and keeps parent/child links consistent. Local matrices are
//! rebuilt eagerly by the setters; world matrices are recomputed lazily on
//! read (see [`transform_system`](super::transform_system)), so a caller can
//! never observe a stale world matrix regardless of update order.
//!
//! Stale handles are tolerated everywhere: setters do nothing, getters
//! return `None` or an empty slice.

use glam::{Affine3A, EulerRot, Mat4, Quat, Vec3};

use crate::core::SlotPool;
use crate::errors::{RasterError, Result};
use crate::scene::NodeHandle;
use crate::scene::node::Node;
use crate::scene::transform::Transform;
use crate::scene::transform_system;

/// Arena of transform nodes with parent/child links and cached world matrices.
#[derive(Debug)]
pub struct TransformGraph {
    nodes: SlotPool<Node>,
    roots: Vec<NodeHandle>,
}

impl TransformGraph {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            nodes: SlotPool::new(capacity),
            roots: Vec::new(),
        }
    }

    // ========================================================================
    // Node lifecycle
    // ========================================================================

    /// Creates a root node with an identity transform.
    pub fn create_node(&mut self) -> Result<NodeHandle> {
        self.create_node_with(Transform::new())
    }

    /// Creates a root node with the given local transform.
    pub fn create_node_with(&mut self, mut transform: Transform) -> Result<NodeHandle> {
        transform.update_local_matrix();
        let handle = self.nodes.register(Node::new(transform)).map_err(|err| {
            log::error!("Transform node pool exhausted");
            RasterError::ResourceExhausted {
                kind: "node",
                capacity: err.capacity(),
            }
        })?;
        self.roots.push(handle);
        Ok(handle)
    }

    /// Destroys a node.
    ///
    /// The node is detached from its parent and each of its children becomes
    /// a root, keeping its local transform. Returns `false` for stale handles.
    pub fn destroy_node(&mut self, handle: NodeHandle) -> bool {
        let Some(node) = self.nodes.resolve(handle) else {
            return false;
        };
        let parent = node.parent;
        let children = node.children.clone();

        for child in children {
            if let Some(child_node) = self.nodes.resolve_mut(child) {
                child_node.parent = None;
                self.roots.push(child);
                self.mark_subtree_dirty(child);
            }
        }

        self.unlink(handle, parent);
        self.nodes.unregister(handle);
        true
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.nodes.contains(handle)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    #[inline]
    #[must_use]
    pub fn node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.resolve(handle)
    }

    // ========================================================================
    // Local transform
    // ========================================================================

    /// Applies `f` to the node's transform, then rebuilds the local matrix and
    /// invalidates the subtree's world matrices if anything changed.
    ///
    /// Returns `false` when the handle is stale.
    pub fn modify<F>(&mut self, handle: NodeHandle, f: F) -> bool
    where
        F: FnOnce(&mut Transform),
    {
        let Some(node) = self.nodes.resolve_mut(handle) else {
            return false;
        };
        f(&mut node.transform);
        if node.transform.update_local_matrix() {
            self.mark_subtree_dirty(handle);
        }
        true
    }

    pub fn set_position(&mut self, handle: NodeHandle, position: Vec3) {
        self.modify(handle, |t| t.position = position);
    }

    pub fn set_scale(&mut self, handle: NodeHandle, scale: Vec3) {
        self.modify(handle, |t| t.scale = scale);
    }

    pub fn set_rotation(&mut self, handle: NodeHandle, rotation: Quat) {
        self.modify(handle, |t| t.rotation = rotation);
    }

    /// Rotation of `angle` radians around `axis`. A zero axis is ignored.
    pub fn set_rotation_axis_angle(&mut self, handle: NodeHandle, axis: Vec3, angle: f32) {
        self.modify(handle, |t| {
            if !t.set_rotation_axis_angle(axis, angle) {
                log::warn!("Ignoring rotation around a zero-length axis");
            }
        });
    }

    /// In-plane rotation around +Z.
    pub fn set_rotation_z(&mut self, handle: NodeHandle, angle: f32) {
        self.modify(handle, |t| t.set_rotation_z(angle));
    }

    /// Rotation from XYZ Euler angles in radians.
    pub fn set_rotation_euler(&mut self, handle: NodeHandle, euler: Vec3) {
        self.modify(handle, |t| t.set_rotation_euler_with_order(euler.x, euler.y, euler.z, EulerRot::XYZ));
    }

    /// Orients the node so -Z faces `target` (parent space).
    pub fn look_at(&mut self, handle: NodeHandle, target: Vec3, up: Vec3) {
        self.modify(handle, |t| t.look_at(target, up));
    }

    /// Replaces the local matrix, decomposing it into TRS.
    pub fn apply_local_matrix(&mut self, handle: NodeHandle, matrix: Affine3A) {
        if self.modify(handle, |t| t.apply_local_matrix(matrix)) {
            // apply_local_matrix syncs the shadow state, so modify() saw no change.
            self.mark_subtree_dirty(handle);
        }
    }

    #[must_use]
    pub fn transform(&self, handle: NodeHandle) -> Option<&Transform> {
        self.nodes.resolve(handle).map(|n| &n.transform)
    }

    #[must_use]
    pub fn position(&self, handle: NodeHandle) -> Option<Vec3> {
        self.transform(handle).map(|t| t.position)
    }

    #[must_use]
    pub fn scale(&self, handle: NodeHandle) -> Option<Vec3> {
        self.transform(handle).map(|t| t.scale)
    }

    #[must_use]
    pub fn rotation(&self, handle: NodeHandle) -> Option<Quat> {
        self.transform(handle).map(|t| t.rotation)
    }

    #[must_use]
    pub fn local_matrix(&self, handle: NodeHandle) -> Option<Affine3A> {
        self.transform(handle).map(|t| *t.local_matrix())
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Attaches `child` under `parent`, or detaches it when `parent` is `None`.
    ///
    /// - A stale `child` is a no-op.
    /// - A stale `parent` fails with [`RasterError::StaleHandle`].
    /// - Parenting a node to itself or to one of its descendants fails with
    ///   [`RasterError::HierarchyCycle`].
    ///
    /// The graph is unchanged on error.
    pub fn set_parent(&mut self, child: NodeHandle, parent: Option<NodeHandle>) -> Result<()> {
        let Some(child_node) = self.nodes.resolve(child) else {
            return Ok(());
        };
        let old_parent = child_node.parent;

        if let Some(parent) = parent {
            if !self.nodes.contains(parent) {
                return Err(RasterError::StaleHandle { kind: "node" });
            }
            if parent == child || self.is_ancestor(child, parent) {
                log::warn!("Rejected parent assignment: {child:?} is an ancestor of {parent:?}");
                return Err(RasterError::HierarchyCycle);
            }
        }

        if old_parent == parent {
            return Ok(());
        }

        self.unlink(child, old_parent);

        match parent {
            Some(p) => {
                if let Some(parent_node) = self.nodes.resolve_mut(p) {
                    parent_node.children.push(child);
                }
            }
            None => self.roots.push(child),
        }
        if let Some(child_node) = self.nodes.resolve_mut(child) {
            child_node.parent = parent;
        }

        self.mark_subtree_dirty(child);
        Ok(())
    }

    /// `true` if `ancestor` appears on the parent chain of `node`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeHandle, node: NodeHandle) -> bool {
        let mut current = self.nodes.resolve(node).and_then(|n| n.parent);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = self.nodes.resolve(handle).and_then(|n| n.parent);
        }
        false
    }

    /// Parent of `handle`, if both are live.
    #[must_use]
    pub fn parent(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.nodes
            .resolve(handle)
            .and_then(|n| n.parent)
            .filter(|&p| self.nodes.contains(p))
    }

    #[must_use]
    pub fn children(&self, handle: NodeHandle) -> &[NodeHandle] {
        self.nodes
            .resolve(handle)
            .map_or(&[] as &[NodeHandle], |n| n.children.as_slice())
    }

    #[must_use]
    pub fn roots(&self) -> &[NodeHandle] {
        &self.roots
    }

    // Removes `child` from its parent's children list, or from the roots.
    fn unlink(&mut self, child: NodeHandle, parent: Option<NodeHandle>) {
        let siblings = match parent.and_then(|p| self.nodes.resolve_mut(p)) {
            Some(parent_node) => &mut parent_node.children,
            None => &mut self.roots,
        };
        if let Some(i) = siblings.iter().position(|&h| h == child) {
            siblings.remove(i);
        }
    }

    fn mark_subtree_dirty(&self, root: NodeHandle) {
        let mut stack = vec![root];
        let mut first = true;
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.resolve(handle) else {
                continue;
            };
            // An already-dirty descendant has an already-dirty subtree.
            if !node.invalidate_world() && !first {
                continue;
            }
            first = false;
            stack.extend_from_slice(&node.children);
        }
    }

    // ========================================================================
    // World matrices
    // ========================================================================

    /// Recomputes (if needed) and returns the world matrix of `handle`.
    ///
    /// Idempotent; calling it repeatedly returns the same matrix.
    pub fn update(&self, handle: NodeHandle) -> Option<Affine3A> {
        transform_system::resolve_world(&self.nodes, handle)
    }

    /// World matrix of `handle`: `parent.world * local`, or `local` for roots.
    #[must_use]
    pub fn world_matrix(&self, handle: NodeHandle) -> Option<Affine3A> {
        transform_system::resolve_world(&self.nodes, handle)
    }

    #[must_use]
    pub fn world_matrix_as_mat4(&self, handle: NodeHandle) -> Option<Mat4> {
        self.world_matrix(handle).map(Mat4::from)
    }

    /// Translation column of the world matrix.
    #[must_use]
    pub fn world_position(&self, handle: NodeHandle) -> Option<Vec3> {
        self.world_matrix(handle).map(|m| Vec3::from(m.translation))
    }

    /// Per-frame pass refreshing every dirty world matrix, parents first.
    ///
    /// Returns the number of recomputed nodes.
    pub fn update_hierarchy(&self) -> usize {
        transform_system::update_hierarchy(&self.nodes, &self.roots)
    }

    /// Refreshes the subtree rooted at `handle`.
    pub fn update_subtree(&self, handle: NodeHandle) -> usize {
        transform_system::update_subtree(&self.nodes, handle)
    }
}

impl Default for TransformGraph {
    fn default() -> Self {
        Self::new(crate::settings::DEFAULT_NODE_CAPACITY)
    }
}
