// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene graph data model.
//!
//! A *node* is an element of a rooted tree. Each node has:
//!
//! - An identity ([`NodeId`]): a generational handle that becomes stale when
//!   the node is destroyed.
//! - Topology: parent, first-child and sibling links forming an ordered tree.
//!   Children are owned by their parent; destroying a node destroys its
//!   subtree. The parent link is a plain index and owns nothing.
//! - **Local properties** (any [`PropertySet`](crate::properties::PropertySet)),
//!   relative to the parent's frame.
//! - **Global properties** cached by [`evaluate`](SceneGraph::evaluate): the
//!   composition of local properties from the root down to the node.
//!
//! Queries relating two nodes ([`closest_common_ancestor`],
//! [`properties_delta_to`]) run in time proportional to tree depth and do not
//! depend on the cache.
//!
//! [`closest_common_ancestor`]: SceneGraph::closest_common_ancestor
//! [`properties_delta_to`]: SceneGraph::properties_delta_to

mod delta;
mod evaluate;
mod id;
mod store;
mod traverse;

pub use delta::QueryError;
pub use evaluate::FrameChanges;
pub use id::{INVALID, NodeId};
pub use store::SceneGraph;
pub use traverse::{Ancestors, Children, Visitor};
