//! Canvas document codec.
//!
//! The persisted shape is a JSON object:
//!
//! ```json
//! {
//!   "squares": [[10.0, 10.0, 50.0, 1], [70.0, 10.0, 50.0, 2]],
//!   "square_files": {"1": "/media/a.mp4"},
//!   "connections": [[1, 2]],
//!   "aliases": {"1": "Intro"}
//! }
//! ```
//!
//! Every field is optional on load, and `null` counts as absent. Entries that
//! are unreadable (wrong arity, non-integer ids, non-string paths) or would
//! break the graph invariants (duplicate ids, references to unknown nodes,
//! non-numeric keys) are dropped with a warning and counted in the
//! [`LoadReport`]. Text that is not JSON, or whose top level is not a
//! document, fails to decode.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::domain::errors::DocumentError;
use crate::domain::model::{GraphModel, Node, NodeId, Position};

/// On-disk representation of a canvas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawDocument")]
pub struct CanvasDocument {
    pub squares: Vec<(f64, f64, f64, u32)>,
    pub square_files: BTreeMap<String, String>,
    pub connections: Vec<(u32, u32)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aliases: Option<BTreeMap<String, String>>,
    /// Entries that were unreadable when the document was decoded
    #[serde(skip)]
    pub malformed: LoadReport,
}

/// Loosely typed document; each field is checked entry by entry
#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    squares: Value,
    #[serde(default)]
    square_files: Value,
    #[serde(default)]
    connections: Value,
    #[serde(default)]
    aliases: Value,
}

impl From<RawDocument> for CanvasDocument {
    fn from(raw: RawDocument) -> Self {
        let mut malformed = LoadReport::default();
        let squares = entries(raw.squares, "squares", &mut malformed.dropped_nodes, square_entry);
        let connections = entries(
            raw.connections,
            "connections",
            &mut malformed.dropped_edges,
            connection_entry,
        );
        let square_files =
            string_map(raw.square_files, "square_files", &mut malformed.dropped_bindings)
                .unwrap_or_default();
        let aliases = string_map(raw.aliases, "aliases", &mut malformed.dropped_aliases);

        Self {
            squares,
            square_files,
            connections,
            aliases,
            malformed,
        }
    }
}

fn entries<T>(
    value: Value,
    field: &str,
    dropped: &mut usize,
    convert: fn(&Value) -> Option<T>,
) -> Vec<T> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| {
                let entry = convert(item);
                if entry.is_none() {
                    warn!("Dropping malformed {} entry {}", field, item);
                    *dropped += 1;
                }
                entry
            })
            .collect(),
        other => {
            warn!("Ignoring {}: expected an array, found {}", field, other);
            *dropped += 1;
            Vec::new()
        }
    }
}

fn string_map(value: Value, field: &str, dropped: &mut usize) -> Option<BTreeMap<String, String>> {
    match value {
        Value::Null => None,
        Value::Object(map) => Some(
            map.into_iter()
                .filter_map(|(key, value)| match value {
                    Value::String(text) => Some((key, text)),
                    other => {
                        warn!("Dropping malformed {} entry {}: {}", field, key, other);
                        *dropped += 1;
                        None
                    }
                })
                .collect(),
        ),
        other => {
            warn!("Ignoring {}: expected an object, found {}", field, other);
            *dropped += 1;
            None
        }
    }
}

fn square_entry(value: &Value) -> Option<(f64, f64, f64, u32)> {
    match value.as_array()?.as_slice() {
        [x, y, size, id] => Some((x.as_f64()?, y.as_f64()?, size.as_f64()?, raw_id(id)?)),
        _ => None,
    }
}

fn connection_entry(value: &Value) -> Option<(u32, u32)> {
    match value.as_array()?.as_slice() {
        [source, target] => Some((raw_id(source)?, raw_id(target)?)),
        _ => None,
    }
}

fn raw_id(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|id| u32::try_from(id).ok())
}

/// What was discarded while rebuilding a graph from a document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub nodes: usize,
    pub edges: usize,
    pub dropped_nodes: usize,
    pub dropped_edges: usize,
    pub dropped_bindings: usize,
    pub dropped_aliases: usize,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.dropped_nodes == 0
            && self.dropped_edges == 0
            && self.dropped_bindings == 0
            && self.dropped_aliases == 0
    }
}

impl CanvasDocument {
    /// Decode a document from JSON text
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Encode the document as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Snapshot a graph
    pub fn from_graph(graph: &GraphModel) -> Self {
        let squares = graph
            .nodes()
            .iter()
            .map(|n| (n.position.x, n.position.y, n.size, n.id.0))
            .collect();
        let square_files = graph
            .file_bindings()
            .iter()
            .map(|(id, path)| (id.to_string(), path.to_string_lossy().into_owned()))
            .collect();
        let connections = graph
            .edges()
            .iter()
            .map(|e| (e.source.0, e.target.0))
            .collect();
        let aliases = graph
            .aliases()
            .iter()
            .map(|(id, alias)| (id.to_string(), alias.clone()))
            .collect();

        Self {
            squares,
            square_files,
            connections,
            aliases: Some(aliases),
            malformed: LoadReport::default(),
        }
    }

    /// Rebuild a graph: nodes first, then edges by id lookup, then bindings
    pub fn to_graph(&self) -> (GraphModel, LoadReport) {
        let mut graph = GraphModel::new();
        let mut report = self.malformed.clone();

        for &(x, y, size, id) in &self.squares {
            let node = Node::new(NodeId(id), Position::new(x, y), size);
            match graph.insert_node(node) {
                Ok(()) => report.nodes += 1,
                Err(e) => {
                    warn!("Dropping square: {}", e);
                    report.dropped_nodes += 1;
                }
            }
        }

        for &(source, target) in &self.connections {
            match graph.add_edge(NodeId(source), NodeId(target)) {
                Ok(_) => report.edges += 1,
                Err(e) => {
                    warn!("Cannot connect {} to {}: {}", source, target, e);
                    report.dropped_edges += 1;
                }
            }
        }

        for (key, path) in &self.square_files {
            let bound = parse_id(key).and_then(|id| graph.bind_file(id, PathBuf::from(path)).ok());
            if bound.is_none() {
                warn!("Dropping file binding {} -> {}", key, path);
                report.dropped_bindings += 1;
            }
        }

        if let Some(aliases) = &self.aliases {
            for (key, alias) in aliases {
                let set = parse_id(key).and_then(|id| graph.set_alias(id, alias.clone()).ok());
                if set.is_none() {
                    warn!("Dropping alias {} -> {}", key, alias);
                    report.dropped_aliases += 1;
                }
            }
        }

        let unnamed: Vec<NodeId> = graph
            .nodes()
            .iter()
            .map(|n| n.id)
            .filter(|id| graph.alias(*id).is_none())
            .collect();
        for id in unnamed {
            // id comes from the live node list
            let _ = graph.set_alias(id, GraphModel::placeholder_alias(id));
        }

        (graph, report)
    }
}

fn parse_id(key: &str) -> Option<NodeId> {
    key.trim().parse::<u32>().ok().map(NodeId)
}
