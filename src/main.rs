//! ReelRoute CLI
//!
//! Edits a canvas of linked clip nodes and plays or exports the sequences
//! derived from it.
//!
//! # Usage
//!
//! ```bash
//! reelroute init
//! reelroute add-node --count 3
//! reelroute connect 1 2
//! reelroute bind 1 intro.mp4
//! reelroute sequences
//! reelroute export "Sequence 1" --output cut.mp4
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use reelroute_cli::app::DefaultAppContainer;
use reelroute_cli::cli::{commands, Cli, Commands};
use reelroute_cli::config_initialization::initialize_configuration_hierarchy;
use reelroute_cli::utils::logging::{init_logging, LoggingConfig};

/// Main entry point for the ReelRoute CLI application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let config = initialize_configuration_hierarchy(&cli).context("Failed to load configuration")?;

    // Initialize logging
    let level = config.log_level.parse()?;
    init_logging(&LoggingConfig::new(level, cli.json_logs))?;
    debug!(?config, "Effective configuration");

    let container = DefaultAppContainer::new(&config);
    let project = cli.project.as_path();

    // Execute the requested command
    match cli.command {
        Commands::Init(args) => commands::init(&container, project, args).await?,
        Commands::AddNode(args) => commands::add_node(&container, project, args).await?,
        Commands::MoveNode(args) => commands::move_node(&container, project, args).await?,
        Commands::DeleteNode(args) => commands::delete_node(&container, project, args).await?,
        Commands::Connect(args) => commands::connect(&container, project, args).await?,
        Commands::Disconnect(args) => commands::disconnect(&container, project, args).await?,
        Commands::Bind(args) => commands::bind(&container, project, args).await?,
        Commands::Alias(args) => commands::alias(&container, project, args).await?,
        Commands::Show(args) => commands::show(&container, project, args).await?,
        Commands::Sequences(args) => commands::sequences(&container, project, args).await?,
        Commands::Play(args) => commands::play(&container, project, args).await?,
        Commands::Export(args) => commands::export(&container, project, args).await?,
        Commands::Edl(args) => commands::edl(&container, project, args).await?,
    }

    info!("ReelRoute completed successfully");
    Ok(())
}
