// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use trellis_core::trace::{EvaluateSummary, NodeChange, NodeChangeKind, TraceSink};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn kind_name(kind: NodeChangeKind) -> &'static str {
    match kind {
        NodeChangeKind::Properties => "props",
        NodeChangeKind::Invalid => "invalid",
        NodeChangeKind::Added => "added",
        NodeChangeKind::Removed => "removed",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_evaluate(&mut self, s: &EvaluateSummary) {
        let topology = if s.topology_changed {
            "rebuilt"
        } else {
            "same"
        };
        let _ = writeln!(
            self.writer,
            "[evaluate] #{} nodes={} recomputed={} invalid={} added={} removed={} \
             topology={topology}",
            s.evaluation,
            s.live_nodes,
            s.recomputed,
            s.invalid,
            s.added,
            s.removed,
        );
    }

    fn on_node_changes(&mut self, evaluation: u64, changes: &[NodeChange]) {
        if changes.is_empty() {
            return;
        }
        let list: Vec<String> = changes
            .iter()
            .map(|c| format!("{}:{}", c.node_index, kind_name(c.kind)))
            .collect();
        let _ = writeln!(self.writer, "[nodes] #{evaluation} {}", list.join(" "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::node::{FrameChanges, SceneGraph};
    use trellis_core::properties::NodeProperties;
    use trellis_core::trace::Tracer;

    #[test]
    fn pretty_print_summary() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_evaluate(&EvaluateSummary {
            evaluation: 4,
            live_nodes: 3,
            recomputed: 2,
            topology_changed: true,
            ..EvaluateSummary::default()
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.starts_with("[evaluate] #4"), "got: {output}");
        assert!(output.contains("recomputed=2"), "got: {output}");
        assert!(output.contains("topology=rebuilt"), "got: {output}");
    }

    #[test]
    fn pretty_print_from_evaluate() {
        let mut graph = SceneGraph::<NodeProperties>::new();
        let root = graph.create_node();
        let child = graph.create_node();
        graph.add_child(root, child);

        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        let mut changes = FrameChanges::default();
        graph.evaluate_traced(&mut changes, &mut Tracer::new(&mut sink));

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2, "got: {output}");
        assert_eq!(lines[0], "[nodes] #0 0:props 1:props 0:added 1:added");
        assert!(lines[1].starts_with("[evaluate] #0 nodes=2"), "got: {output}");
    }

    #[test]
    fn empty_node_changes_are_skipped() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_node_changes(0, &[]);
        assert!(sink.into_inner().is_empty());
    }
}
