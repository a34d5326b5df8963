// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and snapshot export for trellis diagnostics.
//!
//! This crate provides development helpers on top of `trellis_core`:
//!
//! - [`pretty::PrettyPrintSink`]: a [`TraceSink`](trellis_core::trace::TraceSink)
//!   that writes one human-readable line per evaluation event.
//! - [`snapshot`]: dumps a [`SceneGraph`](trellis_core::node::SceneGraph)
//!   with its local and global properties as JSON.

pub mod pretty;
pub mod snapshot;
