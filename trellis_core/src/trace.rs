// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for graph evaluation.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! [`SceneGraph::evaluate_traced`] calls once per evaluation. All method
//! bodies default to no-ops, so implementing only the events you care about
//! is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`NodeChange`] events and the
//!   corresponding `TraceSink` method.
//!
//! [`SceneGraph::evaluate_traced`]: crate::node::SceneGraph::evaluate_traced

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// Per-evaluation summary, emitted at the end of every evaluate call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvaluateSummary {
    /// Monotonic evaluation counter, starting at zero.
    pub evaluation: u64,
    /// Live nodes in the graph after evaluation.
    pub live_nodes: usize,
    /// Nodes whose global properties were recomputed.
    pub recomputed: usize,
    /// Recomputed nodes with an invalid global property.
    pub invalid: usize,
    /// Nodes created since the previous evaluation.
    pub added: usize,
    /// Nodes destroyed since the previous evaluation.
    pub removed: usize,
    /// Whether the traversal order was rebuilt.
    pub topology_changed: bool,
}

/// What happened to a node during an evaluation.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeChangeKind {
    /// Global properties were recomputed.
    Properties,
    /// Recomputed global properties are invalid.
    Invalid,
    /// Node was created.
    Added,
    /// Node was destroyed.
    Removed,
}

/// A per-evaluation node change record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeChange {
    /// Slot index of the node that changed.
    pub node_index: u32,
    /// What changed.
    pub kind: NodeChangeKind,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from graph evaluation.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called with a summary of each evaluation.
    fn on_evaluate(&mut self, s: &EvaluateSummary) {
        _ = s;
    }

    /// Called with per-node changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_node_changes(&mut self, evaluation: u64, changes: &[NodeChange]) {
        _ = (evaluation, changes);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits an [`EvaluateSummary`].
    #[inline]
    pub fn evaluate(&mut self, s: &EvaluateSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_evaluate(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits node changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn node_changes(&mut self, evaluation: u64, changes: &[NodeChange]) {
        if let Some(s) = &mut self.sink {
            s.on_node_changes(evaluation, changes);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
