// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use super::id::{INVALID, NodeId};
use super::store::SceneGraph;
use crate::properties::PropertySet;

/// An iterator over the direct children of a node.
///
/// Created by [`SceneGraph::children`].
#[derive(Debug)]
pub struct Children<'a> {
    next_sibling: &'a [u32],
    generation: &'a [u32],
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(next_sibling: &'a [u32], generation: &'a [u32], first: u32) -> Self {
        Self {
            next_sibling,
            generation,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.next_sibling[idx as usize];
        Some(NodeId {
            idx,
            generation: self.generation[idx as usize],
        })
    }
}

/// An iterator from a node up through its parent chain to the root.
///
/// The starting node is yielded first. Created by [`SceneGraph::ancestors`].
#[derive(Debug)]
pub struct Ancestors<'a> {
    parent: &'a [u32],
    generation: &'a [u32],
    current: u32,
}

impl<'a> Ancestors<'a> {
    pub(crate) fn new(parent: &'a [u32], generation: &'a [u32], start: u32) -> Self {
        Self {
            parent,
            generation,
            current: start,
        }
    }
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.parent[idx as usize];
        Some(NodeId {
            idx,
            generation: self.generation[idx as usize],
        })
    }
}

/// Callbacks for [`SceneGraph::depth_first_traverse`].
///
/// Both methods default to no-ops, so implement only the ones you need. A
/// renderer typically pushes transform and opacity state in
/// [`pre_visit`](Self::pre_visit) and pops it in
/// [`post_visit`](Self::post_visit).
pub trait Visitor<P> {
    /// Called before any of `node`'s children are visited.
    fn pre_visit(&mut self, graph: &SceneGraph<P>, node: NodeId) {
        _ = (graph, node);
    }

    /// Called after all of `node`'s children have been visited.
    fn post_visit(&mut self, graph: &SceneGraph<P>, node: NodeId) {
        _ = (graph, node);
    }
}

impl<P: PropertySet> SceneGraph<P> {
    /// Visits the subtree rooted at `root` depth-first.
    ///
    /// Calls `pre_visit` on a node, recurses into its children in insertion
    /// order, then calls `post_visit`. Recursion depth equals tree depth.
    ///
    /// # Panics
    ///
    /// Panics if `root` is stale.
    pub fn depth_first_traverse<V: Visitor<P> + ?Sized>(&self, root: NodeId, visitor: &mut V) {
        self.validate(root);
        self.traverse_from(root.idx, visitor);
    }

    fn traverse_from<V: Visitor<P> + ?Sized>(&self, idx: u32, visitor: &mut V) {
        let node = NodeId {
            idx,
            generation: self.generation[idx as usize],
        };
        visitor.pre_visit(self, node);
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            self.traverse_from(child, visitor);
            child = self.next_sibling[child as usize];
        }
        visitor.post_visit(self, node);
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;
    use crate::properties::NodeProperties;
    use crate::transform::Transform3d;

    #[derive(Default)]
    struct Recorder {
        events: Vec<(char, NodeId)>,
    }

    impl Visitor<NodeProperties> for Recorder {
        fn pre_visit(&mut self, _: &SceneGraph<NodeProperties>, node: NodeId) {
            self.events.push(('+', node));
        }

        fn post_visit(&mut self, _: &SceneGraph<NodeProperties>, node: NodeId) {
            self.events.push(('-', node));
        }
    }

    /// Only counts pre-visits; post-visit stays the default no-op.
    #[derive(Default)]
    struct PreOnly(usize);

    impl Visitor<NodeProperties> for PreOnly {
        fn pre_visit(&mut self, _: &SceneGraph<NodeProperties>, _: NodeId) {
            self.0 += 1;
        }
    }

    /// Mimics a renderer: keeps a stack of composed properties and records
    /// the top of the stack for each node.
    struct StackRenderer {
        stack: Vec<NodeProperties>,
        seen: Vec<(NodeId, NodeProperties)>,
    }

    impl Visitor<NodeProperties> for StackRenderer {
        fn pre_visit(&mut self, graph: &SceneGraph<NodeProperties>, node: NodeId) {
            let top = self
                .stack
                .last()
                .cloned()
                .unwrap_or_else(NodeProperties::identity);
            let composed = top.then(graph.local_properties(node));
            self.seen.push((node, composed.clone()));
            self.stack.push(composed);
        }

        fn post_visit(&mut self, _: &SceneGraph<NodeProperties>, _: NodeId) {
            self.stack.pop();
        }
    }

    fn sample() -> (SceneGraph<NodeProperties>, [NodeId; 4]) {
        let mut graph = SceneGraph::new();
        let a = graph.create_node();
        let b = graph.create_node();
        let c = graph.create_node();
        let d = graph.create_node();
        // Tree: a -> [b -> [d], c]
        graph.add_child(a, b);
        graph.add_child(a, c);
        graph.add_child(b, d);
        (graph, [a, b, c, d])
    }

    #[test]
    fn pre_and_post_visit_nest() {
        let (graph, [a, b, c, d]) = sample();
        let mut rec = Recorder::default();
        graph.depth_first_traverse(a, &mut rec);
        assert_eq!(
            rec.events,
            vec![
                ('+', a),
                ('+', b),
                ('+', d),
                ('-', d),
                ('-', b),
                ('+', c),
                ('-', c),
                ('-', a),
            ]
        );
    }

    #[test]
    fn traversal_of_subtree_only() {
        let (graph, [_, b, _, d]) = sample();
        let mut rec = Recorder::default();
        graph.depth_first_traverse(b, &mut rec);
        assert_eq!(rec.events, vec![('+', b), ('+', d), ('-', d), ('-', b)]);
    }

    #[test]
    fn omitted_callback_is_noop() {
        let (graph, [a, ..]) = sample();
        let mut count = PreOnly::default();
        graph.depth_first_traverse(a, &mut count);
        assert_eq!(count.0, 4);
    }

    #[test]
    fn stack_renderer_matches_delta_to_root() {
        let (mut graph, [a, b, c, d]) = sample();
        graph.set_transform(a, Transform3d::from_uniform_scale(2.0));
        graph.set_transform(b, Transform3d::from_translation(1.0, -3.0, 0.0));
        graph.set_alpha_mask(b, 0.5);
        graph.set_transform(d, Transform3d::from_rotation_z(0.25));
        graph.set_alpha_mask(c, 0.25);

        let mut renderer = StackRenderer {
            stack: Vec::new(),
            seen: Vec::new(),
        };
        graph.depth_first_traverse(a, &mut renderer);
        assert!(renderer.stack.is_empty());
        assert_eq!(renderer.seen.len(), 4);
        for (node, composed) in &renderer.seen {
            assert!(composed.abs_diff_eq(&graph.properties_delta_to_root(*node), 1e-12));
        }
    }
}
