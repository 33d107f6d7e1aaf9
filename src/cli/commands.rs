//! Command implementations

use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::app::edit_interactor::EditResponse;
use crate::app::AppContainer;
use crate::cli::args::*;
use crate::domain::document::CanvasDocument;
use crate::domain::model::{NodeId, Position};
use crate::domain::session::{CommandOutcome, EditCommand};

/// Execute the init command
pub async fn init(container: &dyn AppContainer, project: &Path, args: InitArgs) -> Result<()> {
    container
        .edit_interactor()
        .init(project, args.force)
        .await
        .with_context(|| format!("Failed to create {}", project.display()))?;
    println!("Created {}", project.display());
    Ok(())
}

/// Execute the add-node command
pub async fn add_node(container: &dyn AppContainer, project: &Path, args: AddNodeArgs) -> Result<()> {
    let commands = (0..args.count).map(|_| EditCommand::AddNode).collect();
    run_edit(container, project, commands).await
}

/// Execute the move-node command
pub async fn move_node(container: &dyn AppContainer, project: &Path, args: MoveNodeArgs) -> Result<()> {
    let command = EditCommand::MoveNode {
        id: NodeId(args.id),
        position: Position::new(args.x, args.y),
    };
    run_edit(container, project, vec![command]).await
}

/// Execute the delete-node command
pub async fn delete_node(container: &dyn AppContainer, project: &Path, args: NodeArgs) -> Result<()> {
    run_edit(container, project, vec![EditCommand::DeleteNode(NodeId(args.id))]).await
}

/// Execute the connect command
pub async fn connect(container: &dyn AppContainer, project: &Path, args: LinkArgs) -> Result<()> {
    let command = EditCommand::Connect {
        source: NodeId(args.source),
        target: NodeId(args.target),
    };
    run_edit(container, project, vec![command]).await
}

/// Execute the disconnect command
pub async fn disconnect(container: &dyn AppContainer, project: &Path, args: LinkArgs) -> Result<()> {
    let command = EditCommand::Disconnect {
        source: NodeId(args.source),
        target: NodeId(args.target),
    };
    run_edit(container, project, vec![command]).await
}

/// Execute the bind command
pub async fn bind(container: &dyn AppContainer, project: &Path, args: BindArgs) -> Result<()> {
    if !args.path.exists() {
        warn!("{} does not exist yet; it will be skipped until it does", args.path.display());
    }
    let command = EditCommand::BindFile {
        id: NodeId(args.id),
        path: args.path,
    };
    run_edit(container, project, vec![command]).await
}

/// Execute the alias command
pub async fn alias(container: &dyn AppContainer, project: &Path, args: AliasArgs) -> Result<()> {
    let command = EditCommand::SetAlias {
        id: NodeId(args.id),
        alias: args.name,
    };
    run_edit(container, project, vec![command]).await
}

/// Execute the show command
pub async fn show(container: &dyn AppContainer, project: &Path, args: ShowArgs) -> Result<()> {
    let graph = container
        .sequence_interactor()
        .graph(project)
        .await
        .with_context(|| format!("Failed to open {}", project.display()))?;

    if args.json {
        let document = CanvasDocument::from_graph(&graph);
        println!("{}", document.to_json()?);
        return Ok(());
    }

    println!("Nodes: {}", graph.len());
    for node in graph.nodes() {
        let alias = graph.alias(node.id).unwrap_or("");
        let file = graph
            .file_binding(node.id)
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:>4}  {:<20} ({:.0}, {:.0})  {}",
            node.id, alias, node.position.x, node.position.y, file
        );
    }
    println!("Links: {}", graph.edges().len());
    for edge in graph.edges() {
        println!("  {}", edge);
    }
    Ok(())
}

/// Execute the sequences command
pub async fn sequences(container: &dyn AppContainer, project: &Path, args: SequencesArgs) -> Result<()> {
    let listing = container
        .sequence_interactor()
        .list(project)
        .await
        .with_context(|| format!("Failed to open {}", project.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    if let Some(problem) = &listing.problem {
        eprintln!("No sequences: {}", problem);
    }
    for sequence in &listing.sequences {
        println!("{}: {}", sequence.name, sequence.route);
        for (id, file) in sequence.route.nodes().iter().zip(&sequence.files) {
            match file {
                Some(path) => println!("  {:>4}  {}", id, path.display()),
                None => println!("  {:>4}  (no file)", id),
            }
        }
    }
    Ok(())
}

/// Execute the play command
pub async fn play(container: &dyn AppContainer, project: &Path, args: PlayArgs) -> Result<()> {
    let report = container
        .export_interactor()
        .play(project, &args.name)
        .await
        .with_context(|| format!("Failed to play {}", args.name))?;

    println!("Played {} of {} clips", report.played.len(), report.played.len() + report.failed.len());
    for file in &report.failed {
        eprintln!("  failed: {}", file.display());
    }
    Ok(())
}

/// Execute the export command
pub async fn export(container: &dyn AppContainer, project: &Path, args: ExportArgs) -> Result<()> {
    let report = container
        .export_interactor()
        .export_video(project, &args.name, &args.output)
        .await
        .with_context(|| format!("Failed to export {}", args.name))?;

    println!("Exported {} clips to {}", report.clips, report.output.display());
    Ok(())
}

/// Execute the edl command
pub async fn edl(container: &dyn AppContainer, project: &Path, args: EdlArgs) -> Result<()> {
    let report = container
        .export_interactor()
        .export_edl(project, &args.name, &args.output, args.title.as_deref())
        .await
        .with_context(|| format!("Failed to write EDL for {}", args.name))?;

    println!("Wrote {} events to {}", report.events, report.output.display());
    for file in &report.skipped {
        eprintln!("  skipped: {}", file.display());
    }
    Ok(())
}

/// Apply edit commands and report each outcome; any ignored command fails the run
async fn run_edit(container: &dyn AppContainer, project: &Path, commands: Vec<EditCommand>) -> Result<()> {
    let response = container
        .edit_interactor()
        .edit(project, commands)
        .await
        .with_context(|| format!("Failed to edit {}", project.display()))?;

    print_outcomes(&response);

    let ignored: Vec<&str> = response
        .outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            CommandOutcome::Ignored(reason) => Some(reason.as_str()),
            _ => None,
        })
        .collect();
    if !ignored.is_empty() {
        bail!("{}", ignored.join("; "));
    }

    info!("{} sequences after edit", response.sequences.len());
    Ok(())
}

fn print_outcomes(response: &EditResponse) {
    for outcome in &response.outcomes {
        match outcome {
            CommandOutcome::NodeAdded(id) => println!("Added node {}", id),
            CommandOutcome::EdgeAdded(edge) => println!("Connected {}", edge),
            CommandOutcome::Applied => println!("OK"),
            CommandOutcome::Ignored(_) => {}
        }
    }
    if response.saved {
        println!("Sequences: {}", response.sequences.join(", "));
    }
}
