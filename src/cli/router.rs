//! Command routing and execution
//!
//! This module handles routing CLI commands to their respective implementations.

use anyhow::Result;
use std::path::Path;

use crate::cli::args::Commands;
use crate::cli::commands::*;
use crate::cli::params::load_catalog;
use crate::config::Settings;

/// Execute a CLI command with loaded settings
pub async fn execute_command(
    command: Commands,
    settings: &Settings,
    shapes: Option<&Path>,
) -> Result<()> {
    let catalog = load_catalog(settings, shapes).await?;

    match command {
        Commands::List => run_list_command(&catalog),
        Commands::Render { selection, format } => {
            run_render_command(&catalog, settings, &selection, format).await
        }
        Commands::Run {
            selection,
            sequential,
        } => run_aggregation_command(&catalog, settings, &selection, sequential).await,
    }
}
