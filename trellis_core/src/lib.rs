// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Composable node properties and a scene graph that relates them.
//!
//! `trellis_core` provides the algebra an overlay UI needs to answer "where
//! is node B, and how does it look, from node A's point of view?". It is
//! `no_std` compatible (with `alloc`) and stores the tree in struct-of-arrays
//! form with generational index handles.
//!
//! # Architecture
//!
//! ```text
//!   Composable value (Transform3d, AlphaMask, Name)
//!       │
//!       ▼
//!   Property<V> ── value + valid flag + apply type (Operate / Replace)
//!       │
//!       ▼
//!   PropertySet ── Property<V>, tuples, NodeProperties
//!       │
//!       ▼
//!   SceneGraph<P> ──► properties_delta_to(from, to)
//!                └──► evaluate() ──► FrameChanges
//! ```
//!
//! **[`property`]**: The [`Composable`](property::Composable) trait and the
//! [`Property`](property::Property) wrapper. Composition is `earlier · later`;
//! a failed inversion marks the result invalid instead of erroring.
//!
//! **[`transform`]**, **[`alpha`]**, **[`name`]**: The three concrete value
//! types. Transforms form a group (up to singular matrices), alpha masks a
//! monoid, names are last-non-empty-wins.
//!
//! **[`properties`]**: The [`PropertySet`](properties::PropertySet) trait
//! that lets heterogeneous property bundles compose element-wise, and the
//! standard [`NodeProperties`](properties::NodeProperties) bundle.
//!
//! **[`node`]**: The [`SceneGraph`](node::SceneGraph) arena. Nodes own their
//! children, parents are plain indices. Provides closest-common-ancestor
//! and relative-delta queries, a depth-first visitor, and a cached
//! evaluation of every node's global properties.
//!
//! **[`dirty`]**: Dirty-tracking channels (via `understory_dirty`) that keep
//! the evaluation cache incremental.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! evaluation instrumentation, with a zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Example
//!
//! ```
//! use trellis_core::node::SceneGraph;
//! use trellis_core::properties::NodeProperties;
//! use trellis_core::transform::Transform3d;
//!
//! let mut graph = SceneGraph::<NodeProperties>::new();
//! let window = graph.create_node();
//! let button = graph.create_node();
//! let tooltip = graph.create_node();
//! graph.add_child(window, button);
//! graph.add_child(window, tooltip);
//! graph.set_transform(button, Transform3d::from_translation(40.0, 10.0, 0.0));
//! graph.set_transform(tooltip, Transform3d::from_translation(0.0, 30.0, 0.0));
//!
//! // Maps points in the button's frame into the tooltip's frame.
//! let delta = graph.properties_delta_to(button, tooltip).unwrap();
//! assert!(delta.transform().is_valid());
//! let p = delta.transform().value().transform_point3([0.0, 0.0, 0.0]);
//! assert_eq!(p, [40.0, -20.0, 0.0]);
//! ```
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-node
//!   change events.

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod alpha;
pub mod dirty;
pub mod name;
pub mod node;
pub mod properties;
pub mod property;
pub mod trace;
pub mod transform;
