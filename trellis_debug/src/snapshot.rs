// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON snapshots of a scene graph.
//!
//! [`to_json`] walks every tree in a [`SceneGraph`] and produces a nested JSON
//! document with each node's local and cached global properties. Global
//! values are only as fresh as the last
//! [`evaluate`](SceneGraph::evaluate) call.
//!
//! ```json
//! {
//!   "roots": [
//!     {
//!       "id": 0,
//!       "generation": 0,
//!       "local": { "transform": { ... }, "alpha_mask": { ... }, "name": { ... } },
//!       "global": { ... },
//!       "children": [ ... ]
//!     }
//!   ]
//! }
//! ```

use std::io::{self, Write};

use serde_json::{Value, json};

use trellis_core::node::{NodeId, SceneGraph};
use trellis_core::properties::NodeProperties;
use trellis_core::property::{ApplyType, Composable, Property};

/// Builds a JSON snapshot of every tree in `graph`, roots in slot order.
#[must_use]
pub fn to_json(graph: &SceneGraph<NodeProperties>) -> Value {
    let roots: Vec<Value> = graph
        .roots()
        .into_iter()
        .map(|root| node_json(graph, root))
        .collect();
    json!({ "roots": roots })
}

/// Writes a pretty-printed JSON snapshot of `graph` to `writer`.
pub fn write_pretty(graph: &SceneGraph<NodeProperties>, writer: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, &to_json(graph))?;
    writeln!(writer)
}

fn node_json(graph: &SceneGraph<NodeProperties>, id: NodeId) -> Value {
    let children: Vec<Value> = graph
        .children(id)
        .map(|child| node_json(graph, child))
        .collect();
    json!({
        "id": id.index(),
        "generation": id.generation(),
        "local": properties_json(graph.local_properties(id)),
        "global": properties_json(graph.global_properties(id)),
        "children": children,
    })
}

fn properties_json(p: &NodeProperties) -> Value {
    let transform = p.transform();
    let alpha = p.alpha_mask();
    let name = p.name();
    json!({
        "transform": property_json(transform, json!(transform.value().cols)),
        "alpha_mask": property_json(alpha, json!(alpha.value().get())),
        "name": property_json(name, json!(name.value().as_str())),
    })
}

fn property_json<V: Composable>(p: &Property<V>, value: Value) -> Value {
    let apply = match p.apply_type() {
        ApplyType::Operate => "operate",
        ApplyType::Replace => "replace",
    };
    json!({
        "value": value,
        "valid": p.is_valid(),
        "apply": apply,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::transform::Transform3d;

    fn sample() -> SceneGraph<NodeProperties> {
        let mut graph = SceneGraph::new();
        let root = graph.create_node_with(NodeProperties::new().with_name("window"));
        let child = graph.create_node_with(
            NodeProperties::new()
                .with_transform(Transform3d::from_translation(5.0, 0.0, 0.0))
                .with_alpha_mask(0.5),
        );
        let _lonely = graph.create_node();
        graph.add_child(root, child);
        let _ = graph.evaluate();
        graph
    }

    #[test]
    fn snapshot_nests_children() {
        let snap = to_json(&sample());
        let roots = snap["roots"].as_array().unwrap();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0]["id"], 0);
        assert_eq!(roots[1]["id"], 2);

        let child = &roots[0]["children"][0];
        assert_eq!(child["id"], 1);
        assert_eq!(child["local"]["alpha_mask"]["value"], 0.5);
        assert_eq!(child["local"]["transform"]["value"][3][0], 5.0);
        assert_eq!(child["local"]["name"]["value"], "");
        // The global name is inherited from the root.
        assert_eq!(child["global"]["name"]["value"], "window");
        assert_eq!(roots[0]["local"]["name"]["apply"], "replace");
        assert_eq!(child["global"]["transform"]["valid"], true);
    }

    #[test]
    fn snapshot_reports_validity_and_apply_type() {
        let mut graph = SceneGraph::<NodeProperties>::new();
        let node = graph.create_node();
        graph.set_name(node, "ghost");
        graph.update_local_properties(node, |p| p.alpha_mask.set_valid(false));
        let _ = graph.evaluate();

        let snap = to_json(&graph);
        let local = &snap["roots"][0]["local"];
        assert_eq!(local["alpha_mask"]["valid"], false);
        assert_eq!(local["alpha_mask"]["apply"], "operate");
        assert_eq!(local["transform"]["valid"], true);
        assert_eq!(local["name"]["apply"], "replace");
        assert_eq!(snap["roots"][0]["global"]["alpha_mask"]["valid"], false);
    }

    #[test]
    fn snapshot_of_empty_graph() {
        let graph = SceneGraph::<NodeProperties>::new();
        assert_eq!(to_json(&graph), json!({ "roots": [] }));
    }

    #[test]
    fn write_pretty_round_trips_through_parser() {
        let graph = sample();
        let mut out = Vec::new();
        write_pretty(&graph, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, to_json(&graph));
    }
}
