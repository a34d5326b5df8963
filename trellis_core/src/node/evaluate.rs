// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame evaluation and change tracking.
//!
//! Evaluation follows a drain-recompute pattern:
//!
//! 1. **TOPOLOGY**: if the tree shape changed since the last call, rebuild
//!    the depth-first traversal order. The channel itself is drained and
//!    discarded.
//! 2. **PROPERTIES**: drain dirty indices and recompute each node's global
//!    properties as `parent_global ∘ local`, walking the traversal order so
//!    parents are always current before their children.
//!
//! [`FrameChanges`] uses raw slot indices (`u32`) rather than [`NodeId`]
//! handles so renderers can index straight into the graph via
//! [`global_properties_at`](super::SceneGraph::global_properties_at).
//!
//! [`NodeId`]: super::NodeId

use alloc::vec;
use alloc::vec::Vec;

use super::id::INVALID;
use super::store::SceneGraph;
use crate::dirty;
use crate::properties::PropertySet;
use crate::trace::{EvaluateSummary, Tracer};
#[cfg(feature = "trace-rich")]
use crate::trace::{NodeChange, NodeChangeKind};

/// The set of changes produced by a single [`SceneGraph::evaluate`] call.
#[derive(Clone, Debug, Default)]
pub struct FrameChanges {
    /// Nodes whose global properties were recomputed, in traversal order.
    pub properties: Vec<u32>,
    /// Recomputed nodes whose global properties contain an invalid element.
    ///
    /// Renderers must not trust these values (for example, skip drawing
    /// when opacity is unknown).
    pub invalid: Vec<u32>,
    /// Nodes created since the last evaluate.
    pub added: Vec<u32>,
    /// Nodes destroyed since the last evaluate.
    pub removed: Vec<u32>,
    /// Whether the tree topology changed (traversal order was rebuilt).
    pub topology_changed: bool,
}

impl FrameChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.properties.clear();
        self.invalid.clear();
        self.added.clear();
        self.removed.clear();
        self.topology_changed = false;
    }
}

impl<P: PropertySet> SceneGraph<P> {
    /// Evaluates the graph, recomputing dirty global properties and returning
    /// the set of changes.
    pub fn evaluate(&mut self) -> FrameChanges {
        let mut changes = FrameChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer
    /// to avoid allocation.
    pub fn evaluate_into(&mut self, changes: &mut FrameChanges) {
        self.evaluate_traced(changes, &mut Tracer::none());
    }

    /// Like [`evaluate_into`](Self::evaluate_into), reporting a summary (and,
    /// with `trace-rich`, per-node changes) to `tracer`.
    pub fn evaluate_traced(&mut self, changes: &mut FrameChanges, tracer: &mut Tracer<'_>) {
        changes.clear();

        if self.traversal_dirty {
            self.rebuild_traversal_order();
            changes.topology_changed = true;
            self.traversal_dirty = false;
        }

        let mut dirty_mask = vec![false; self.len as usize];
        for idx in self
            .dirty
            .drain(dirty::PROPERTIES)
            .affected()
            .deterministic()
            .run()
        {
            if let Some(d) = dirty_mask.get_mut(idx as usize) {
                *d = true;
            }
        }

        // Recompute in traversal order so parents precede children.
        for &idx in &self.traversal_order {
            if !dirty_mask[idx as usize] {
                continue;
            }
            let parent_idx = self.parent[idx as usize];
            let global = if parent_idx != INVALID {
                self.global[parent_idx as usize].then(&self.local[idx as usize])
            } else {
                self.local[idx as usize].clone()
            };
            if !global.is_valid() {
                changes.invalid.push(idx);
            }
            self.global[idx as usize] = global;
            changes.properties.push(idx);
        }

        // Drain TOPOLOGY (just consume, changes are structural).
        let _: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();

        // Move lifecycle lists.
        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);

        let evaluation = self.evaluations;
        self.evaluations += 1;

        #[cfg(feature = "trace-rich")]
        {
            let mut node_changes = Vec::new();
            let lists = [
                (&changes.properties, NodeChangeKind::Properties),
                (&changes.invalid, NodeChangeKind::Invalid),
                (&changes.added, NodeChangeKind::Added),
                (&changes.removed, NodeChangeKind::Removed),
            ];
            for (list, kind) in lists {
                for &node_index in list {
                    node_changes.push(NodeChange { node_index, kind });
                }
            }
            tracer.node_changes(evaluation, &node_changes);
        }

        tracer.evaluate(&EvaluateSummary {
            evaluation,
            live_nodes: self.len(),
            recomputed: changes.properties.len(),
            invalid: changes.invalid.len(),
            added: changes.added.len(),
            removed: changes.removed.len(),
            topology_changed: changes.topology_changed,
        });
    }

    /// Returns the current traversal order (depth-first pre-order over every
    /// tree, roots in slot order).
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn traversal_order(&self) -> &[u32] {
        &self.traversal_order
    }

    /// Rebuilds the depth-first pre-order traversal of all live nodes.
    fn rebuild_traversal_order(&mut self) {
        self.traversal_order.clear();
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                self.dfs_collect(idx);
            }
        }
    }

    /// Depth-first pre-order collection starting from `idx`.
    fn dfs_collect(&mut self, idx: u32) {
        self.traversal_order.push(idx);
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            self.dfs_collect(child);
            child = self.next_sibling[child as usize];
        }
    }
}
