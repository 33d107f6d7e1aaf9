//! Route derivation
//!
//! Every node starts a depth-first walk that follows successors in edge
//! insertion order until it reaches a sink. The resulting candidates are then
//! reduced to the maximal ones: a candidate that appears as a contiguous run
//! inside a different candidate is dropped, and among identical candidates
//! only the first survives. Discovery order is kept, so repeated derivations
//! over an unchanged graph return the same list.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::domain::errors::RouteError;
use crate::domain::model::{GraphModel, NodeId};

/// Longest path explored before derivation gives up
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// An ordered walk from a start node to a sink
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route(Vec<NodeId>);

impl Route {
    /// Routes are only built from non-empty walks
    pub(crate) fn new(nodes: Vec<NodeId>) -> Self {
        debug_assert!(!nodes.is_empty());
        Self(nodes)
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.0
    }

    /// Whether `self` occurs as a contiguous run of ids inside `other`
    pub fn is_contained_in(&self, other: &Route) -> bool {
        !self.0.is_empty() && other.0.windows(self.0.len()).any(|window| window == self.0.as_slice())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{}", id)?;
        }
        Ok(())
    }
}

/// Derives maximal routes from a graph
#[derive(Debug, Clone)]
pub struct RouteEngine {
    max_depth: usize,
}

impl Default for RouteEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteEngine {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.max(1),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Derive the maximal, deduplicated routes of `graph` in discovery order
    pub fn derive(&self, graph: &GraphModel) -> Result<Vec<Route>, RouteError> {
        let adjacency = Self::adjacency(graph);
        let mut candidates = Vec::new();

        for node in graph.nodes() {
            let mut path = vec![node.id];
            self.walk(&adjacency, &mut path, &mut candidates)?;
        }

        let routes = Self::maximal(candidates);
        debug!(routes = routes.len(), nodes = graph.len(), "derived routes");
        Ok(routes)
    }

    fn adjacency(graph: &GraphModel) -> HashMap<NodeId, Vec<NodeId>> {
        let mut adjacency: HashMap<NodeId, Vec<NodeId>> =
            graph.nodes().iter().map(|n| (n.id, Vec::new())).collect();
        for edge in graph.edges() {
            if let Some(successors) = adjacency.get_mut(&edge.source) {
                successors.push(edge.target);
            }
        }
        adjacency
    }

    fn walk(
        &self,
        adjacency: &HashMap<NodeId, Vec<NodeId>>,
        path: &mut Vec<NodeId>,
        candidates: &mut Vec<Route>,
    ) -> Result<(), RouteError> {
        let Some(&current) = path.last() else {
            return Ok(());
        };
        let successors = adjacency.get(&current).map(Vec::as_slice).unwrap_or(&[]);

        if successors.is_empty() {
            candidates.push(Route::new(path.clone()));
            return Ok(());
        }

        if path.len() >= self.max_depth {
            return Err(RouteError::DepthExceeded {
                start: path[0],
                limit: self.max_depth,
            });
        }

        for &next in successors {
            if path.contains(&next) {
                let mut cycle = path.clone();
                cycle.push(next);
                return Err(RouteError::CycleDetected { path: cycle });
            }
            path.push(next);
            self.walk(adjacency, path, candidates)?;
            path.pop();
        }
        Ok(())
    }

    fn maximal(candidates: Vec<Route>) -> Vec<Route> {
        let mut kept: Vec<Route> = Vec::new();
        for (i, candidate) in candidates.iter().enumerate() {
            let covered = candidates
                .iter()
                .enumerate()
                .any(|(j, other)| i != j && other != candidate && candidate.is_contained_in(other));
            if !covered && !kept.contains(candidate) {
                kept.push(candidate.clone());
            }
        }
        kept
    }
}

/// Derive routes with the default depth budget
pub fn derive_routes(graph: &GraphModel) -> Result<Vec<Route>, RouteError> {
    RouteEngine::new().derive(graph)
}
