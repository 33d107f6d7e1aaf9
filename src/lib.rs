//! ReelRoute Library
//!
//! A node-graph video sequencer: clip nodes are linked on a canvas, every
//! maximal route through the links becomes a named sequence, and sequences
//! are played, concatenated or written out as an edit decision list.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::{DomainError, GraphError, RouteError};
pub use domain::model::{Edge, GraphModel, Node, NodeId, Position};
pub use domain::registry::{Sequence, SequenceRegistry};
pub use domain::routes::{derive_routes, Route, RouteEngine};
pub use domain::session::{CommandOutcome, EditCommand, EditSession};
pub use error::{ReelRouteError, ReelRouteResult};
