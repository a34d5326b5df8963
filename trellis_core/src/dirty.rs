// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The scene graph uses multi-channel dirty tracking (via [`understory_dirty`])
//! to keep its cached root-delta properties current without re-walking the
//! whole tree every frame.
//!
//! - [`PROPERTIES`] propagates: it is marked with
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) over child-to-parent
//!   dependency edges, because a node's global properties are composed from
//!   all of its ancestors' locals.
//! - [`TOPOLOGY`] is local: marked on create/destroy and attach/detach. It
//!   only signals that the traversal order must be rebuilt.
//!
//! Both channels are drained by
//! [`SceneGraph::evaluate`](crate::node::SceneGraph::evaluate).

use understory_dirty::Channel;

/// Local properties changed; global properties of the node and all its
/// descendants need recomputation.
pub const PROPERTIES: Channel = Channel::new(0);

/// Tree topology changed; triggers a traversal order rebuild.
pub const TOPOLOGY: Channel = Channel::new(1);
