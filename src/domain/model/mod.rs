// Domain models - Graph of canvas nodes, links and file bindings

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::GraphError;

/// Edge length of a freshly added node
pub const DEFAULT_NODE_SIZE: f64 = 50.0;
/// Gap between freshly added nodes
pub const NODE_PADDING: f64 = 10.0;
/// Edge length of the link handle drawn at a node's top-right corner
pub const HANDLE_SIZE: f64 = 10.0;

/// Stable node identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Canvas coordinate of a node's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset_from(&self, origin: Position) -> Position {
        Position::new(self.x - origin.x, self.y - origin.y)
    }
}

/// A square placed on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub position: Position,
    pub size: f64,
}

impl Node {
    pub fn new(id: NodeId, position: Position, size: f64) -> Self {
        Self { id, position, size }
    }

    /// Whether the point lies inside the node's square
    pub fn contains(&self, point: Position) -> bool {
        point.x >= self.position.x
            && point.x <= self.position.x + self.size
            && point.y >= self.position.y
            && point.y <= self.position.y + self.size
    }

    /// Centre of the output handle used to start a link
    pub fn handle_center(&self) -> Position {
        Position::new(self.position.x + self.size, self.position.y)
    }

    /// Whether the point lies on the output handle
    pub fn handle_contains(&self, point: Position) -> bool {
        let center = self.handle_center();
        let half = HANDLE_SIZE / 2.0;
        (point.x - center.x).abs() <= half && (point.y - center.y).abs() <= half
    }
}

/// Directed "play next" link between two nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }

    pub fn touches(&self, id: NodeId) -> bool {
        self.source == id || self.target == id
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// The editable graph.
///
/// Nodes keep their insertion order, which is the order routes are
/// enumerated in. Edges hold ids only; every lookup goes through the model.
/// Each successful mutation bumps [`GraphModel::revision`] so derived state
/// can tell it is stale.
#[derive(Debug, Clone, Default)]
pub struct GraphModel {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    files: BTreeMap<NodeId, PathBuf>,
    aliases: BTreeMap<NodeId, String>,
    next_id: u32,
    revision: u64,
}

impl GraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Placeholder alias given to nodes that have none
    pub fn placeholder_alias(id: NodeId) -> String {
        format!("Node {}", id)
    }

    /// Add a node in the next free tile slot and return its id
    pub fn add_node(&mut self) -> NodeId {
        let id = self.allocate_id();
        let x = self.nodes.len() as f64 * (DEFAULT_NODE_SIZE + NODE_PADDING) + NODE_PADDING;
        let position = Position::new(x, NODE_PADDING);
        self.nodes.push(Node::new(id, position, DEFAULT_NODE_SIZE));
        self.aliases.insert(id, Self::placeholder_alias(id));
        self.touch();
        id
    }

    /// Insert a node with a caller-chosen id, as when restoring a document
    pub fn insert_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.contains(node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        self.next_id = self.next_id.max(node.id.0);
        self.nodes.push(node);
        self.touch();
        Ok(())
    }

    pub fn move_node(&mut self, id: NodeId, position: Position) -> Result<(), GraphError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(GraphError::UnknownNode(id))?;
        node.position = position;
        self.touch();
        Ok(())
    }

    /// Remove a node together with its edges, file binding and alias
    pub fn delete_node(&mut self, id: NodeId) -> Result<Node, GraphError> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or(GraphError::UnknownNode(id))?;
        let node = self.nodes.remove(index);
        self.edges.retain(|edge| !edge.touches(id));
        self.files.remove(&id);
        self.aliases.remove(&id);
        self.touch();
        Ok(node)
    }

    pub fn add_edge(&mut self, source: NodeId, target: NodeId) -> Result<Edge, GraphError> {
        for id in [source, target] {
            if !self.contains(id) {
                return Err(GraphError::UnknownNode(id));
            }
        }
        let edge = Edge::new(source, target);
        self.edges.push(edge);
        self.touch();
        Ok(edge)
    }

    /// Remove the first edge equal to `edge`; returns whether one was removed
    pub fn remove_edge(&mut self, edge: Edge) -> bool {
        match self.edges.iter().position(|e| *e == edge) {
            Some(index) => {
                self.edges.remove(index);
                self.touch();
                true
            }
            None => false,
        }
    }

    /// Bind or replace the media file of a node
    pub fn bind_file(&mut self, id: NodeId, path: impl Into<PathBuf>) -> Result<Option<PathBuf>, GraphError> {
        if !self.contains(id) {
            return Err(GraphError::UnknownNode(id));
        }
        let previous = self.files.insert(id, path.into());
        self.touch();
        Ok(previous)
    }

    pub fn set_alias(&mut self, id: NodeId, alias: impl Into<String>) -> Result<(), GraphError> {
        if !self.contains(id) {
            return Err(GraphError::UnknownNode(id));
        }
        self.aliases.insert(id, alias.into());
        self.touch();
        Ok(())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn file_binding(&self, id: NodeId) -> Option<&Path> {
        self.files.get(&id).map(PathBuf::as_path)
    }

    pub fn file_bindings(&self) -> &BTreeMap<NodeId, PathBuf> {
        &self.files
    }

    pub fn alias(&self, id: NodeId) -> Option<&str> {
        self.aliases.get(&id).map(String::as_str)
    }

    pub fn aliases(&self) -> &BTreeMap<NodeId, String> {
        &self.aliases
    }

    /// Direct successors of a node in edge insertion order
    pub fn successors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.edges
            .iter()
            .filter(move |e| e.source == id)
            .map(|e| e.target)
    }

    /// First node whose square contains the point
    pub fn node_at(&self, point: Position) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.contains(point)).map(|n| n.id)
    }

    /// First node whose output handle contains the point
    pub fn handle_at(&self, point: Position) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|n| n.handle_contains(point))
            .map(|n| n.id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Mutation counter; changes whenever the graph changes
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn allocate_id(&mut self) -> NodeId {
        // count + 1 on a fresh graph; never below an id that was handed out
        self.next_id = self.next_id.max(self.nodes.len() as u32) + 1;
        NodeId(self.next_id)
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}
