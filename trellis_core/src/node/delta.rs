// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property deltas between nodes.
//!
//! For a node `x` and one of its ancestors `k`, write `P(k → x)` for the
//! composition of local properties of every node strictly below `k` down to
//! and including `x`, applied in root-to-leaf order. Then:
//!
//! - [`properties_delta_to_root`](SceneGraph::properties_delta_to_root) is
//!   `P(∅ → x)`, which includes the root's own local properties.
//! - [`properties_delta_from_root`](SceneGraph::properties_delta_from_root)
//!   inverts each local from `x` upward and composes them in that order.
//! - [`properties_delta_to`](SceneGraph::properties_delta_to) from `x` to `y`
//!   with closest common ancestor `k` is `inverse(P(k → y)) · P(k → x)`.
//!
//! Inverses are always built from per-node inverses along the path rather
//! than by inverting a composed result. The common ancestor's own properties
//! (and everything above it) cancel out and are never inverted, so a query
//! between two nodes stays valid even if an ancestor is not invertible.

use alloc::vec::Vec;
use core::fmt;

use super::id::{INVALID, NodeId};
use super::store::SceneGraph;
use crate::properties::PropertySet;

/// Errors from two-node queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryError {
    /// The two nodes live in different trees and share no ancestor.
    DisjointTrees {
        /// The node the query started from.
        from: NodeId,
        /// The node the query was aimed at.
        to: NodeId,
    },
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DisjointTrees { from, to } => {
                write!(f, "nodes {from} and {to} have no common ancestor")
            }
        }
    }
}

impl core::error::Error for QueryError {}

impl<P: PropertySet> SceneGraph<P> {
    /// Returns the deepest node that is an ancestor of (or equal to) both
    /// `a` and `b`, or `None` if they belong to different trees.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    #[must_use]
    pub fn closest_common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        self.validate(a);
        self.validate(b);
        self.common_ancestor_idx(a.idx, b.idx)
            .and_then(|idx| self.handle(idx))
    }

    /// Composes local properties from the root down to and including `id`.
    ///
    /// For a root node this equals its local properties.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn properties_delta_to_root(&self, id: NodeId) -> P {
        self.validate(id);
        self.delta_down(INVALID, id.idx)
    }

    /// Composes the inverses of local properties from `id` up to the root,
    /// `id`'s inverse first.
    ///
    /// When every element is invertible this is the inverse of
    /// [`properties_delta_to_root`](Self::properties_delta_to_root).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn properties_delta_from_root(&self, id: NodeId) -> P {
        self.validate(id);
        self.delta_up(id.idx, INVALID)
    }

    /// Returns the delta taking `from`'s local frame into `to`'s local frame.
    ///
    /// Computed through the closest common ancestor `k` as the inverted path
    /// from `to` up to `k`, followed by the path from `k` down to `from`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::DisjointTrees`] if the nodes share no ancestor.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn properties_delta_to(&self, from: NodeId, to: NodeId) -> Result<P, QueryError> {
        self.validate(from);
        self.validate(to);
        let k = self
            .common_ancestor_idx(from.idx, to.idx)
            .ok_or(QueryError::DisjointTrees { from, to })?;
        let mut delta = self.delta_up(to.idx, k);
        delta.apply(&self.delta_down(k, from.idx));
        Ok(delta)
    }

    /// Slot indices from `idx` upward, stopping before `stop` (or after the
    /// root when `stop` is [`INVALID`]).
    fn chain(&self, idx: u32, stop: u32) -> Vec<u32> {
        let mut chain = Vec::new();
        let mut cur = idx;
        while cur != stop && cur != INVALID {
            chain.push(cur);
            cur = self.parent[cur as usize];
        }
        chain
    }

    /// `P(stop → idx)`: locals applied root-side first.
    fn delta_down(&self, stop: u32, idx: u32) -> P {
        let mut delta = P::identity();
        for i in self.chain(idx, stop).into_iter().rev() {
            delta.apply(&self.local[i as usize]);
        }
        delta
    }

    /// Inverse of `P(stop → idx)`, built from per-node inverses.
    fn delta_up(&self, idx: u32, stop: u32) -> P {
        let mut delta = P::identity();
        for i in self.chain(idx, stop) {
            delta.apply(&self.local[i as usize].inverted());
        }
        delta
    }

    fn common_ancestor_idx(&self, a: u32, b: u32) -> Option<u32> {
        let chain_a = self.chain(a, INVALID);
        let chain_b = self.chain(b, INVALID);
        // Walk both chains from the root end; the last agreeing slot is the
        // closest common ancestor. Different roots agree nowhere.
        chain_a
            .iter()
            .rev()
            .zip(chain_b.iter().rev())
            .take_while(|(x, y)| x == y)
            .last()
            .map(|(x, _)| *x)
    }
}
