//! Editing session.
//!
//! An [`EditSession`] owns the graph, the sequence registry and the transient
//! editor state (selection, node drag, link being drawn). All changes go
//! through [`EditSession::apply`]; references to missing nodes are ignored
//! with a warning instead of failing.

use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::domain::document::{CanvasDocument, LoadReport};
use crate::domain::errors::{GraphError, RouteError};
use crate::domain::model::{Edge, GraphModel, NodeId, Position};
use crate::domain::registry::{Sequence, SequenceRegistry};
use crate::domain::routes::RouteEngine;

/// A discrete editing action
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    AddNode,
    MoveNode { id: NodeId, position: Position },
    DeleteNode(NodeId),
    DeleteSelected,
    Connect { source: NodeId, target: NodeId },
    Disconnect { source: NodeId, target: NodeId },
    BindFile { id: NodeId, path: PathBuf },
    SetAlias { id: NodeId, alias: String },
    Select(Option<NodeId>),
    /// Pointer pressed: starts a link on a handle, a drag on a node,
    /// or clears the selection on empty canvas
    Press { at: Position },
    /// Pointer moved while pressed
    DragTo { at: Position },
    /// Pointer released: ends a drag, completes a link dropped on a handle
    Release { at: Position },
    /// Abandon the link being drawn
    CancelLink,
}

/// Result of applying a command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    NodeAdded(NodeId),
    EdgeAdded(Edge),
    Applied,
    Ignored(String),
}

impl CommandOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, CommandOutcome::Ignored(_))
    }
}

/// Node being dragged and where it was grabbed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub node: NodeId,
    pub grab_offset: Position,
}

/// Link being drawn from a node's handle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingLink {
    pub source: NodeId,
    pub cursor: Position,
}

/// Transient editor state, reset on load
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorState {
    pub selected: Option<NodeId>,
    pub drag: Option<DragState>,
    pub pending_link: Option<PendingLink>,
}

impl EditorState {
    fn forget(&mut self, id: NodeId) {
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.drag.map(|d| d.node) == Some(id) {
            self.drag = None;
        }
        if self.pending_link.map(|l| l.source) == Some(id) {
            self.pending_link = None;
        }
    }
}

/// Receives the sequence names whenever derived sequences change
pub trait SequenceListener {
    fn sequences_changed(&mut self, names: &[String]);
}

impl<F: FnMut(&[String])> SequenceListener for F {
    fn sequences_changed(&mut self, names: &[String]) {
        self(names)
    }
}

#[derive(Default)]
pub struct EditSession {
    graph: GraphModel,
    registry: SequenceRegistry,
    state: EditorState,
    listeners: Vec<Box<dyn SequenceListener>>,
    /// Names most recently handed to listeners
    notified: Option<Vec<String>>,
}

impl fmt::Debug for EditSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditSession")
            .field("graph", &self.graph)
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(engine: RouteEngine) -> Self {
        Self {
            registry: SequenceRegistry::with_engine(engine),
            ..Self::default()
        }
    }

    pub fn graph(&self) -> &GraphModel {
        &self.graph
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn subscribe(&mut self, listener: impl SequenceListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Replace the whole graph from a document.
    ///
    /// Transient state is cleared first, then sequences are rebuilt and every
    /// listener is notified, even if the names did not change.
    pub fn load(&mut self, document: &CanvasDocument) -> LoadReport {
        self.state = EditorState::default();
        let (graph, report) = document.to_graph();
        self.graph = graph;
        self.registry.invalidate();
        info!(
            nodes = report.nodes,
            edges = report.edges,
            dropped_edges = report.dropped_edges,
            "Canvas loaded"
        );
        let names = self.registry.names(&self.graph);
        self.notify(names);
        report
    }

    pub fn to_document(&self) -> CanvasDocument {
        CanvasDocument::from_graph(&self.graph)
    }

    /// Apply one command to the graph or the editor state
    pub fn apply(&mut self, command: EditCommand) -> CommandOutcome {
        debug!(?command, "apply");
        let outcome = match command {
            EditCommand::AddNode => CommandOutcome::NodeAdded(self.graph.add_node()),
            EditCommand::MoveNode { id, position } => {
                Self::checked(self.graph.move_node(id, position))
            }
            EditCommand::DeleteNode(id) => self.delete(id),
            EditCommand::DeleteSelected => match self.state.selected {
                Some(id) => self.delete(id),
                None => CommandOutcome::Ignored("no node selected".to_string()),
            },
            EditCommand::Connect { source, target } => self.connect(source, target),
            EditCommand::Disconnect { source, target } => {
                if self.graph.remove_edge(Edge::new(source, target)) {
                    CommandOutcome::Applied
                } else {
                    CommandOutcome::Ignored(format!("no edge {} -> {}", source, target))
                }
            }
            EditCommand::BindFile { id, path } => match self.graph.bind_file(id, path) {
                Ok(Some(previous)) => {
                    info!("Replaced file for node {} (was {})", id, previous.display());
                    CommandOutcome::Applied
                }
                Ok(None) => CommandOutcome::Applied,
                Err(e) => Self::ignored(e),
            },
            EditCommand::SetAlias { id, alias } => Self::checked(self.graph.set_alias(id, alias)),
            EditCommand::Select(Some(id)) if !self.graph.contains(id) => {
                Self::ignored(GraphError::UnknownNode(id))
            }
            EditCommand::Select(selection) => {
                self.state.selected = selection;
                CommandOutcome::Applied
            }
            EditCommand::Press { at } => self.press(at),
            EditCommand::DragTo { at } => self.drag_to(at),
            EditCommand::Release { at } => self.release(at),
            EditCommand::CancelLink => match self.state.pending_link.take() {
                Some(link) => {
                    debug!(source = %link.source, "link cancelled");
                    CommandOutcome::Applied
                }
                None => CommandOutcome::Ignored("no link in progress".to_string()),
            },
        };
        if let CommandOutcome::Ignored(reason) = &outcome {
            warn!("Command ignored: {}", reason);
        }
        outcome
    }

    /// Re-derive sequences and notify listeners if the name list changed
    /// since the last notification.
    ///
    /// Returns the current names; a derivation failure yields none.
    pub fn refresh(&mut self) -> Vec<String> {
        let names = self.registry.names(&self.graph);
        if self.notified.as_ref() != Some(&names) {
            self.notify(names.clone());
        }
        names
    }

    pub fn sequences(&mut self) -> Result<&[Sequence], RouteError> {
        self.registry.sequences(&self.graph)
    }

    pub fn sequence(&mut self, name: &str) -> Result<Option<&Sequence>, RouteError> {
        self.registry.get(&self.graph, name)
    }

    fn delete(&mut self, id: NodeId) -> CommandOutcome {
        match self.graph.delete_node(id) {
            Ok(_) => {
                self.state.forget(id);
                info!("Deleted node {} with its links and bindings", id);
                CommandOutcome::Applied
            }
            Err(e) => Self::ignored(e),
        }
    }

    fn connect(&mut self, source: NodeId, target: NodeId) -> CommandOutcome {
        match self.graph.add_edge(source, target) {
            Ok(edge) => {
                info!("Connected {}", edge);
                CommandOutcome::EdgeAdded(edge)
            }
            Err(e) => CommandOutcome::Ignored(format!(
                "cannot connect {} to {}: {}",
                source, target, e
            )),
        }
    }

    fn press(&mut self, at: Position) -> CommandOutcome {
        if let Some(source) = self.graph.handle_at(at) {
            self.state.pending_link = Some(PendingLink { source, cursor: at });
            return CommandOutcome::Applied;
        }
        match self.graph.node_at(at).and_then(|id| self.graph.node(id)) {
            Some(node) => {
                self.state.selected = Some(node.id);
                self.state.drag = Some(DragState {
                    node: node.id,
                    grab_offset: at.offset_from(node.position),
                });
            }
            None => self.state.selected = None,
        }
        CommandOutcome::Applied
    }

    fn drag_to(&mut self, at: Position) -> CommandOutcome {
        if let Some(link) = self.state.pending_link.as_mut() {
            link.cursor = at;
            return CommandOutcome::Applied;
        }
        match self.state.drag {
            Some(drag) => Self::checked(self.graph.move_node(drag.node, at.offset_from(drag.grab_offset))),
            None => CommandOutcome::Ignored("nothing is being dragged".to_string()),
        }
    }

    fn release(&mut self, at: Position) -> CommandOutcome {
        self.state.drag = None;
        match self.state.pending_link.take() {
            Some(link) => match self.graph.handle_at(at) {
                Some(target) => self.connect(link.source, target),
                None => CommandOutcome::Ignored("link released away from a handle".to_string()),
            },
            None => CommandOutcome::Applied,
        }
    }

    fn notify(&mut self, names: Vec<String>) {
        for listener in &mut self.listeners {
            listener.sequences_changed(&names);
        }
        self.notified = Some(names);
    }

    fn checked(result: Result<(), GraphError>) -> CommandOutcome {
        match result {
            Ok(()) => CommandOutcome::Applied,
            Err(e) => Self::ignored(e),
        }
    }

    fn ignored(error: GraphError) -> CommandOutcome {
        CommandOutcome::Ignored(error.to_string())
    }
}

#[cfg(test)]
mod tests;
