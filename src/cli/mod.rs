//! CLI module for ReelRoute
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// ReelRoute node-graph video sequencer
///
/// Builds a canvas of clip nodes joined by directed links, derives every
/// maximal route through it as a named sequence, and plays or exports them.
#[derive(Parser, Debug)]
#[command(name = "reelroute")]
#[command(about = "ReelRoute - Sequence video clips by linking them on a canvas")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Canvas document to operate on
    #[arg(long, short, default_value = "canvas.json", global = true)]
    pub project: PathBuf,

    /// Configuration file (default: reelroute.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Logging level; RUST_LOG takes precedence
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Replace existing export targets
    #[arg(long, global = true)]
    pub overwrite: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty canvas
    Init(args::InitArgs),
    /// Add nodes at the next free slot
    AddNode(args::AddNodeArgs),
    /// Move a node to a new position
    MoveNode(args::MoveNodeArgs),
    /// Delete a node with its links, file and alias
    DeleteNode(args::NodeArgs),
    /// Link one node to another
    Connect(args::LinkArgs),
    /// Remove a link
    Disconnect(args::LinkArgs),
    /// Bind a media file to a node
    Bind(args::BindArgs),
    /// Set the display alias of a node
    Alias(args::AliasArgs),
    /// Print nodes, links, files and aliases
    Show(args::ShowArgs),
    /// List derived sequences
    Sequences(args::SequencesArgs),
    /// Play a sequence with ffplay
    Play(args::PlayArgs),
    /// Concatenate a sequence into one video with ffmpeg
    Export(args::ExportArgs),
    /// Write an edit decision list for a sequence
    Edl(args::EdlArgs),
}
