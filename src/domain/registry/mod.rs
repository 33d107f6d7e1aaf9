//! Named sequences derived from the graph.
//!
//! The registry caches the derived sequence list together with the graph
//! revision it was built from. Reads compare revisions and re-derive when the
//! graph moved on, so callers never see a partially updated list.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error};

use crate::domain::errors::RouteError;
use crate::domain::model::{GraphModel, NodeId};
use crate::domain::routes::{Route, RouteEngine};

/// A named, file-resolved route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sequence {
    pub name: String,
    #[serde(serialize_with = "serialize_route")]
    pub route: Route,
    pub files: Vec<Option<PathBuf>>,
}

impl Sequence {
    /// Bound files in route order, absent entries removed
    pub fn playable_files(&self) -> Vec<&Path> {
        self.files.iter().flatten().map(PathBuf::as_path).collect()
    }

    pub fn is_playable(&self) -> bool {
        self.files.iter().any(Option::is_some)
    }
}

/// Generated name of the `index`-th route (zero based)
pub fn sequence_name(index: usize) -> String {
    format!("Sequence {}", index + 1)
}

#[derive(Debug, Clone)]
struct Snapshot {
    revision: u64,
    result: Result<Vec<Sequence>, RouteError>,
}

/// Lazily rebuilt cache of named sequences
#[derive(Debug, Clone, Default)]
pub struct SequenceRegistry {
    engine: RouteEngine,
    snapshot: Option<Snapshot>,
}

impl SequenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(engine: RouteEngine) -> Self {
        Self {
            engine,
            snapshot: None,
        }
    }

    /// Drop the cached list; the next read re-derives
    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    /// Whether the cache no longer matches `graph`
    pub fn is_stale(&self, graph: &GraphModel) -> bool {
        self.snapshot
            .as_ref()
            .map_or(true, |s| s.revision != graph.revision())
    }

    /// Re-derive unconditionally and return the sequence names
    pub fn rebuild(&mut self, graph: &GraphModel) -> Result<Vec<String>, RouteError> {
        self.snapshot = Some(Snapshot {
            revision: graph.revision(),
            result: self.resolve(graph),
        });
        self.sequences(graph)
            .map(|list| list.iter().map(|s| s.name.clone()).collect())
    }

    /// Current sequences, re-derived only when the graph changed
    pub fn sequences(&mut self, graph: &GraphModel) -> Result<&[Sequence], RouteError> {
        if self.is_stale(graph) {
            self.snapshot = Some(Snapshot {
                revision: graph.revision(),
                result: self.resolve(graph),
            });
        }
        match self.snapshot.as_ref().map(|s| &s.result) {
            Some(Ok(list)) => Ok(list.as_slice()),
            Some(Err(e)) => Err(e.clone()),
            None => Ok(&[]),
        }
    }

    /// Sequence names; a derivation failure degrades to an empty list
    pub fn names(&mut self, graph: &GraphModel) -> Vec<String> {
        match self.sequences(graph) {
            Ok(list) => list.iter().map(|s| s.name.clone()).collect(),
            Err(e) => {
                error!("Cannot derive sequences: {}", e);
                Vec::new()
            }
        }
    }

    /// Look up one sequence by its generated name
    pub fn get(&mut self, graph: &GraphModel, name: &str) -> Result<Option<&Sequence>, RouteError> {
        Ok(self.sequences(graph)?.iter().find(|s| s.name == name))
    }

    fn resolve(&self, graph: &GraphModel) -> Result<Vec<Sequence>, RouteError> {
        let routes = self.engine.derive(graph)?;
        let sequences: Vec<Sequence> = routes
            .into_iter()
            .enumerate()
            .map(|(index, route)| {
                let files = route
                    .nodes()
                    .iter()
                    .map(|&id| resolve_file(graph, id))
                    .collect();
                Sequence {
                    name: sequence_name(index),
                    route,
                    files,
                }
            })
            .collect();
        for sequence in &sequences {
            debug!(name = %sequence.name, route = %sequence.route, "resolved sequence");
        }
        Ok(sequences)
    }
}

fn resolve_file(graph: &GraphModel, id: NodeId) -> Option<PathBuf> {
    graph.file_binding(id).map(Path::to_path_buf)
}

fn serialize_route<S: serde::Serializer>(route: &Route, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(route.nodes())
}
