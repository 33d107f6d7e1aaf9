//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Replace an existing canvas
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the add-node command
#[derive(Args, Debug)]
pub struct AddNodeArgs {
    /// Number of nodes to add
    #[arg(long, short = 'n', default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub count: u32,
}

/// Arguments for the move-node command
#[derive(Args, Debug)]
pub struct MoveNodeArgs {
    /// Node id
    pub id: u32,

    /// New left edge
    #[arg(allow_negative_numbers = true)]
    pub x: f64,

    /// New top edge
    #[arg(allow_negative_numbers = true)]
    pub y: f64,
}

/// Arguments naming a single node
#[derive(Args, Debug)]
pub struct NodeArgs {
    /// Node id
    pub id: u32,
}

/// Arguments for the connect and disconnect commands
#[derive(Args, Debug)]
pub struct LinkArgs {
    /// Source node id
    pub source: u32,

    /// Target node id
    pub target: u32,
}

/// Arguments for the bind command
#[derive(Args, Debug)]
pub struct BindArgs {
    /// Node id
    pub id: u32,

    /// Media file played for this node
    pub path: PathBuf,
}

/// Arguments for the alias command
#[derive(Args, Debug)]
pub struct AliasArgs {
    /// Node id
    pub id: u32,

    /// Display name
    pub name: String,
}

/// Arguments for the show command
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Output the canvas document as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the sequences command
#[derive(Args, Debug)]
pub struct SequencesArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the play command
#[derive(Args, Debug)]
pub struct PlayArgs {
    /// Sequence name, e.g. "Sequence 1"
    pub name: String,
}

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Sequence name
    pub name: String,

    /// Output video file
    #[arg(short, long)]
    pub output: PathBuf,
}

/// Arguments for the edl command
#[derive(Args, Debug)]
pub struct EdlArgs {
    /// Sequence name
    pub name: String,

    /// Output EDL file
    #[arg(short, long)]
    pub output: PathBuf,

    /// EDL title (default: the sequence name)
    #[arg(long)]
    pub title: Option<String>,
}
