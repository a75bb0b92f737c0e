//! Transform System
//!
//! World-matrix propagation over the node arena, kept apart from
//! [`TransformGraph`](super::TransformGraph) so it only borrows the pool and
//! the root list.
//!
//! Two entry points:
//! - [`resolve_world`]: lazy, on-demand. Walks up the dirty ancestor chain of
//!   one node and recomputes it top-down.
//! - [`update_hierarchy`]: eager, per-frame. Visits every root's subtree with
//!   an explicit stack, parents strictly before children.
//!
//! Both rely on the dirty invariant maintained by the graph: if a node is
//! dirty, so is every descendant.

use glam::Affine3A;
use smallvec::SmallVec;

use crate::core::SlotPool;
use crate::scene::NodeHandle;
use crate::scene::node::Node;

/// Returns the up-to-date world matrix of `handle`, recomputing the dirty
/// part of its ancestor chain.
pub fn resolve_world(nodes: &SlotPool<Node>, handle: NodeHandle) -> Option<Affine3A> {
    let node = nodes.resolve(handle)?;
    if !node.is_world_dirty() {
        return Some(node.cached_world());
    }

    // Dirty chain from `node` upwards, stopping at the first clean ancestor.
    let mut chain: SmallVec<[&Node; 16]> = SmallVec::new();
    let mut parent_world = Affine3A::IDENTITY;
    let mut current = Some(node);

    while let Some(n) = current {
        if !n.is_world_dirty() {
            parent_world = n.cached_world();
            break;
        }
        chain.push(n);
        current = n.parent.and_then(|p| nodes.resolve(p));
    }

    for n in chain.iter().rev() {
        parent_world = parent_world * *n.transform.local_matrix();
        n.store_world(parent_world);
    }

    Some(parent_world)
}

/// Refreshes every dirty world matrix reachable from `roots`.
///
/// Uses an explicit stack instead of recursion so deep hierarchies cannot
/// overflow. Returns the number of nodes whose world matrix was recomputed.
pub fn update_hierarchy(nodes: &SlotPool<Node>, roots: &[NodeHandle]) -> usize {
    // (node, parent world, parent recomputed)
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);
    for &root in roots.iter().rev() {
        stack.push((root, Affine3A::IDENTITY, false));
    }

    drain_stack(nodes, &mut stack)
}

/// Refreshes the subtree rooted at `root`, using the parent's current world
/// matrix. Returns the number of recomputed nodes.
pub fn update_subtree(nodes: &SlotPool<Node>, root: NodeHandle) -> usize {
    let Some(node) = nodes.resolve(root) else {
        return 0;
    };

    let parent_world = node
        .parent
        .and_then(|p| resolve_world(nodes, p))
        .unwrap_or(Affine3A::IDENTITY);

    let mut stack = vec![(root, parent_world, false)];
    drain_stack(nodes, &mut stack)
}

fn drain_stack(nodes: &SlotPool<Node>, stack: &mut Vec<(NodeHandle, Affine3A, bool)>) -> usize {
    let mut updated = 0;

    while let Some((handle, parent_world, parent_changed)) = stack.pop() {
        let Some(node) = nodes.resolve(handle) else {
            continue;
        };

        let needs_update = parent_changed || node.is_world_dirty();
        let world = if needs_update {
            let world = parent_world * *node.transform.local_matrix();
            node.store_world(world);
            updated += 1;
            world
        } else {
            node.cached_world()
        };

        for &child in node.children.iter().rev() {
            stack.push((child, world, needs_update));
        }
    }

    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::transform::Transform;
    use glam::Vec3;

    fn link(nodes: &mut SlotPool<Node>, parent: NodeHandle, child: NodeHandle) {
        nodes.resolve_mut(child).unwrap().parent = Some(parent);
        nodes.resolve_mut(parent).unwrap().children.push(child);
    }

    #[test]
    fn hierarchy_pass_composes_parent_first() {
        let mut nodes = SlotPool::new(8);
        let parent = nodes
            .register(Node::new(Transform::from_position_scale(Vec3::X, Vec3::ONE)))
            .unwrap();
        let child = nodes
            .register(Node::new(Transform::from_position_scale(Vec3::Y, Vec3::ONE)))
            .unwrap();
        link(&mut nodes, parent, child);

        assert_eq!(update_hierarchy(&nodes, &[parent]), 2);
        let world = nodes.resolve(child).unwrap().cached_world();
        assert_eq!(Vec3::from(world.translation), Vec3::new(1.0, 1.0, 0.0));

        // Nothing dirty, nothing recomputed.
        assert_eq!(update_hierarchy(&nodes, &[parent]), 0);
    }

    #[test]
    fn lazy_resolve_only_touches_the_chain() {
        let mut nodes = SlotPool::new(8);
        let root = nodes.register(Node::default()).unwrap();
        let a = nodes.register(Node::default()).unwrap();
        let b = nodes.register(Node::default()).unwrap();
        link(&mut nodes, root, a);
        link(&mut nodes, root, b);

        resolve_world(&nodes, a);
        assert!(!nodes.resolve(root).unwrap().is_world_dirty());
        assert!(!nodes.resolve(a).unwrap().is_world_dirty());
        assert!(nodes.resolve(b).unwrap().is_world_dirty());
    }
}
