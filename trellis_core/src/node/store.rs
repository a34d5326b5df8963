// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, topology, and property management.

use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::id::{INVALID, NodeId};
use super::traverse::{Ancestors, Children};
use crate::alpha::AlphaMask;
use crate::dirty;
use crate::name::Name;
use crate::properties::{NodeProperties, PropertySet};
use crate::transform::Transform3d;

/// Struct-of-arrays storage for a forest of scene-graph nodes.
///
/// Nodes are addressed by [`NodeId`] handles. Internally, each node occupies
/// a slot in parallel arrays. Destroyed nodes are recycled via a free list,
/// and generation counters prevent stale handle access.
///
/// The type parameter is the [`PropertySet`] attached to every node.
#[derive(Debug)]
pub struct SceneGraph<P = NodeProperties> {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Local properties (set by callers) --
    pub(crate) local: Vec<P>,

    // -- Computed properties (written by evaluate) --
    pub(crate) global: Vec<P>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Traversal cache --
    pub(crate) traversal_order: Vec<u32>,
    pub(crate) traversal_dirty: bool,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
    pub(crate) evaluations: u64,
}

impl<P: PropertySet> Default for SceneGraph<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: PropertySet> SceneGraph<P> {
    /// Creates an empty scene graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            local: Vec::new(),
            global: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            traversal_order: Vec::new(),
            traversal_dirty: true,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
            evaluations: 0,
        }
    }

    // -- Allocation API --

    /// Creates a parentless node with identity local properties.
    pub fn create_node(&mut self) -> NodeId {
        self.create_node_with(P::identity())
    }

    /// Creates a parentless node with the given local properties.
    pub fn create_node_with(&mut self, local: P) -> NodeId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot. Its generation was bumped on destroy.
            let i = idx as usize;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.global[i] = local.clone();
            self.local[i] = local;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.global.push(local.clone());
            self.local.push(local);
            self.generation.push(0);
            idx
        };

        self.traversal_dirty = true;
        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
        self.dirty.mark(idx, dirty::PROPERTIES);

        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a node together with its entire subtree.
    ///
    /// The node is first detached from its parent. Every destroyed slot is
    /// recycled and all handles into the subtree become stale.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy_node(&mut self, id: NodeId) {
        self.validate(id);
        let idx = id.idx;

        let p = self.parent[idx as usize];
        if p != INVALID {
            self.unlink_from_parent(idx);
            self.dirty.remove_dependency(idx, p, dirty::PROPERTIES);
            self.dirty.mark(p, dirty::TOPOLOGY);
        }

        let mut stack = Vec::new();
        stack.push(idx);
        while let Some(i) = stack.pop() {
            let mut child = self.first_child[i as usize];
            while child != INVALID {
                stack.push(child);
                child = self.next_sibling[child as usize];
            }
            self.free_slot(i);
        }
        self.traversal_dirty = true;
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    /// Returns the number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    /// Returns whether the graph has no live nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // -- Topology API --

    /// Adds `child` as the last child of `parent`.
    ///
    /// Does nothing if `child` is already a child of `parent`. Marks the
    /// child's subtree so its global properties are recomputed under the new
    /// ancestry.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, if `child == parent`, if `child`
    /// already has a different parent, or if `child` is an ancestor of
    /// `parent`.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        assert!(p != c, "node cannot be its own child: {child:?}");
        if self.parent[c as usize] == p {
            return;
        }
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        assert!(
            !self.is_ancestor_idx(c, p),
            "adding {child:?} under {parent:?} would create a cycle"
        );

        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }

        // Child depends on parent for composed properties.
        let _ = self.dirty.add_dependency(c, p, dirty::PROPERTIES);

        self.dirty.mark_with(c, dirty::PROPERTIES, &EagerPolicy);
        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Detaches `child` from its parent, making it the root of its own tree.
    ///
    /// Idempotent: a node without a parent is left untouched.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn remove_from_parent(&mut self, child: NodeId) {
        self.validate(child);
        let c = child.idx;
        let p = self.parent[c as usize];
        if p == INVALID {
            return;
        }

        self.unlink_from_parent(c);
        self.dirty.remove_dependency(c, p, dirty::PROPERTIES);

        self.dirty.mark_with(c, dirty::PROPERTIES, &EagerPolicy);
        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Returns the parent of a node, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        self.handle(self.parent[id.idx as usize])
    }

    /// Returns an iterator over the direct children of a node, in insertion
    /// order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(
            &self.next_sibling,
            &self.generation,
            self.first_child[id.idx as usize],
        )
    }

    /// Returns an iterator from `id` up to its root, both inclusive.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        self.validate(id);
        Ancestors::new(&self.parent, &self.generation, id.idx)
    }

    /// Returns the root of the tree containing `id`.
    #[must_use]
    pub fn root_of(&self, id: NodeId) -> NodeId {
        let mut root = id;
        for a in self.ancestors(id) {
            root = a;
        }
        root
    }

    /// Returns whether `ancestor` is `node` or one of its ancestors.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.validate(ancestor);
        self.validate(node);
        self.is_ancestor_idx(ancestor.idx, node.idx)
    }

    /// Returns the live nodes that have no parent, in slot order.
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        let mut roots = Vec::new();
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                roots.push(NodeId {
                    idx,
                    generation: self.generation[idx as usize],
                });
            }
        }
        roots
    }

    // -- Property API --

    /// Returns the local properties of a node.
    #[must_use]
    pub fn local_properties(&self, id: NodeId) -> &P {
        self.validate(id);
        &self.local[id.idx as usize]
    }

    /// Returns the cached global properties of a node.
    ///
    /// Only current after [`evaluate`](Self::evaluate); equal to
    /// [`properties_delta_to_root`](Self::properties_delta_to_root) at that
    /// point.
    #[must_use]
    pub fn global_properties(&self, id: NodeId) -> &P {
        self.validate(id);
        &self.global[id.idx as usize]
    }

    /// Replaces the local properties of a node.
    ///
    /// Marks the node and its descendants for recomputation.
    pub fn set_local_properties(&mut self, id: NodeId, local: P) {
        self.validate(id);
        self.local[id.idx as usize] = local;
        self.dirty.mark_with(id.idx, dirty::PROPERTIES, &EagerPolicy);
    }

    /// Mutates the local properties of a node in place.
    ///
    /// Marks the node and its descendants for recomputation.
    pub fn update_local_properties(&mut self, id: NodeId, f: impl FnOnce(&mut P)) {
        self.validate(id);
        f(&mut self.local[id.idx as usize]);
        self.dirty.mark_with(id.idx, dirty::PROPERTIES, &EagerPolicy);
    }

    // -- Raw-index accessors for renderers --
    //
    // These accept raw slot indices (as found in `FrameChanges` or
    // `traversal_order()`) rather than `NodeId` handles, skipping generation
    // validation.

    /// Returns the local properties at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn local_properties_at(&self, idx: u32) -> &P {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        &self.local[idx as usize]
    }

    /// Returns the cached global properties at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn global_properties_at(&self, idx: u32) -> &P {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        &self.global[idx as usize]
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Builds a handle for a live raw index.
    pub(crate) fn handle(&self, idx: u32) -> Option<NodeId> {
        (idx != INVALID).then(|| NodeId {
            idx,
            generation: self.generation[idx as usize],
        })
    }

    /// Whether `ancestor` is `idx` or lies on its parent chain.
    fn is_ancestor_idx(&self, ancestor: u32, idx: u32) -> bool {
        let mut cur = idx;
        while cur != INVALID {
            if cur == ancestor {
                return true;
            }
            cur = self.parent[cur as usize];
        }
        false
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }

    /// Releases one slot. Links are reset when the slot is reused.
    fn free_slot(&mut self, idx: u32) {
        self.dirty.remove_key(idx);
        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;
        self.local[idx as usize] = P::identity();
        self.global[idx as usize] = P::identity();
        self.free_list.push(idx);
        self.pending_removed.push(idx);
    }
}

impl SceneGraph<NodeProperties> {
    /// Sets the local transform of a node and marks it valid.
    pub fn set_transform(&mut self, id: NodeId, transform: Transform3d) {
        self.update_local_properties(id, |p| {
            p.transform.set_value(transform);
        });
    }

    /// Sets the local alpha mask of a node and marks it valid.
    pub fn set_alpha_mask(&mut self, id: NodeId, alpha: f32) {
        self.update_local_properties(id, |p| {
            p.alpha_mask.set_value(AlphaMask::new(alpha));
        });
    }

    /// Attaches a name to a node.
    pub fn set_name(&mut self, id: NodeId, name: &str) {
        self.update_local_properties(id, |p| {
            p.name.set_value(Name::from(name));
            p.name.set_apply_type(crate::property::ApplyType::Replace);
        });
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn create_and_destroy() {
        let mut graph = SceneGraph::<NodeProperties>::new();
        let id = graph.create_node();
        assert!(graph.is_alive(id));
        assert_eq!(graph.len(), 1);
        graph.destroy_node(id);
        assert!(!graph.is_alive(id));
        assert!(graph.is_empty());
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut graph = SceneGraph::<NodeProperties>::new();
        let id1 = graph.create_node();
        graph.destroy_node(id1);
        let id2 = graph.create_node();
        assert!(!graph.is_alive(id1));
        assert!(graph.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
    }

    #[test]
    fn reused_slot_starts_fresh() {
        let mut graph = SceneGraph::<NodeProperties>::new();
        let a = graph.create_node();
        graph.set_alpha_mask(a, 0.5);
        graph.destroy_node(a);
        let b = graph.create_node();
        assert_eq!(graph.local_properties(b), &NodeProperties::new());
        assert_eq!(graph.parent(b), None);
        assert!(graph.children(b).next().is_none());
    }

    #[test]
    fn add_child_and_query() {
        let mut graph = SceneGraph::<NodeProperties>::new();
        let parent = graph.create_node();
        let child1 = graph.create_node();
        let child2 = graph.create_node();

        graph.add_child(parent, child1);
        graph.add_child(parent, child2);

        assert_eq!(graph.parent(child1), Some(parent));
        assert_eq!(graph.parent(child2), Some(parent));

        let kids: Vec<_> = graph.children(parent).collect();
        assert_eq!(kids, vec![child1, child2]);
    }

    #[test]
    fn add_child_twice_to_same_parent_is_noop() {
        let mut graph = SceneGraph::<NodeProperties>::new();
        let parent = graph.create_node();
        let child = graph.create_node();
        graph.add_child(parent, child);
        graph.add_child(parent, child);
        assert_eq!(graph.children(parent).count(), 1);
    }

    #[test]
    fn remove_from_parent_is_idempotent() {
        let mut graph = SceneGraph::<NodeProperties>::new();
        let parent = graph.create_node();
        let a = graph.create_node();
        let b = graph.create_node();
        graph.add_child(parent, a);
        graph.add_child(parent, b);

        graph.remove_from_parent(a);
        assert_eq!(graph.parent(a), None);
        graph.remove_from_parent(a);
        assert_eq!(graph.parent(a), None);

        let kids: Vec<_> = graph.children(parent).collect();
        assert_eq!(kids, vec![b]);
    }

    #[test]
    fn remove_middle_child_keeps_sibling_order() {
        let mut graph = SceneGraph::<NodeProperties>::new();
        let parent = graph.create_node();
        let a = graph.create_node();
        let b = graph.create_node();
        let c = graph.create_node();
        graph.add_child(parent, a);
        graph.add_child(parent, b);
        graph.add_child(parent, c);

        graph.remove_from_parent(b);
        let kids: Vec<_> = graph.children(parent).collect();
        assert_eq!(kids, vec![a, c]);

        graph.add_child(parent, b);
        let kids: Vec<_> = graph.children(parent).collect();
        assert_eq!(kids, vec![a, c, b]);
    }

    #[test]
    fn destroy_removes_whole_subtree() {
        let mut graph = SceneGraph::<NodeProperties>::new();
        let root = graph.create_node();
        let mid = graph.create_node();
        let leaf_a = graph.create_node();
        let leaf_b = graph.create_node();
        let sibling = graph.create_node();
        graph.add_child(root, mid);
        graph.add_child(root, sibling);
        graph.add_child(mid, leaf_a);
        graph.add_child(mid, leaf_b);

        graph.destroy_node(mid);

        assert!(!graph.is_alive(mid));
        assert!(!graph.is_alive(leaf_a));
        assert!(!graph.is_alive(leaf_b));
        assert!(graph.is_alive(sibling));
        let kids: Vec<_> = graph.children(root).collect();
        assert_eq!(kids, vec![sibling]);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn roots_returns_parentless_nodes() {
        let mut graph = SceneGraph::<NodeProperties>::new();
        let a = graph.create_node();
        let b = graph.create_node();
        let c = graph.create_node();

        graph.add_child(a, c);

        let roots = graph.roots();
        assert!(roots.contains(&a));
        assert!(roots.contains(&b));
        assert!(!roots.contains(&c));
        assert_eq!(graph.root_of(c), a);
        assert_eq!(graph.root_of(b), b);
    }

    #[test]
    fn ancestors_walk_to_root() {
        let mut graph = SceneGraph::<NodeProperties>::new();
        let a = graph.create_node();
        let b = graph.create_node();
        let c = graph.create_node();
        graph.add_child(a, b);
        graph.add_child(b, c);

        let chain: Vec<_> = graph.ancestors(c).collect();
        assert_eq!(chain, vec![c, b, a]);
        assert!(graph.is_ancestor(a, c));
        assert!(graph.is_ancestor(c, c));
        assert!(!graph.is_ancestor(c, a));
    }

    #[test]
    #[should_panic(expected = "node cannot be its own child")]
    fn self_parenting_panics() {
        let mut graph = SceneGraph::<NodeProperties>::new();
        let a = graph.create_node();
        graph.add_child(a, a);
    }

    #[test]
    #[should_panic(expected = "child already has a parent")]
    fn second_owner_panics() {
        let mut graph = SceneGraph::<NodeProperties>::new();
        let p1 = graph.create_node();
        let p2 = graph.create_node();
        let child = graph.create_node();
        graph.add_child(p1, child);
        graph.add_child(p2, child);
    }

    #[test]
    #[should_panic(expected = "would create a cycle")]
    fn cycle_panics() {
        let mut graph = SceneGraph::<NodeProperties>::new();
        let a = graph.create_node();
        let b = graph.create_node();
        let c = graph.create_node();
        graph.add_child(a, b);
        graph.add_child(b, c);
        graph.add_child(c, a);
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn destroyed_handle_panics_on_properties() {
        let mut graph = SceneGraph::<NodeProperties>::new();
        let id = graph.create_node();
        graph.destroy_node(id);
        let _ = graph.local_properties(id);
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn destroyed_descendant_handle_panics_on_add_child() {
        let mut graph = SceneGraph::<NodeProperties>::new();
        let root = graph.create_node();
        let child = graph.create_node();
        graph.add_child(root, child);
        graph.destroy_node(root);
        let other = graph.create_node();
        graph.add_child(other, child);
    }

    #[test]
    fn setters_update_local_properties() {
        let mut graph = SceneGraph::<NodeProperties>::new();
        let id = graph.create_node();
        graph.set_transform(id, Transform3d::from_scale(2.0, 2.0, 2.0));
        graph.set_alpha_mask(id, 1.7);
        graph.set_name(id, "cursor");
        let local = graph.local_properties(id);
        assert_eq!(
            *local.transform().value(),
            Transform3d::from_scale(2.0, 2.0, 2.0)
        );
        assert_eq!(local.alpha_mask().value().get(), 1.0);
        assert_eq!(local.name().value().as_str(), "cursor");
    }

    #[test]
    fn graph_over_tuple_properties() {
        use crate::property::AlphaMaskProperty;

        let mut graph = SceneGraph::<(AlphaMaskProperty,)>::new();
        let a = graph.create_node();
        graph.update_local_properties(a, |p| p.0.set_value(AlphaMask::new(0.5)));
        assert_eq!(graph.local_properties(a).0.value().get(), 0.5);
    }
}
