//! Resolution of command-line inputs shared by `render` and `run`

use std::path::Path;
use tracing::{debug, info};

use crate::cli::args::JobSelection;
use crate::config::Settings;
use crate::error::{AggregationError, ErrorCode, Result};
use crate::pipeline::{FilterExpression, PipelineShape, RunId, ShapeCatalog};

/// Built-in shapes plus those from the settings file and `--shapes`
pub async fn load_catalog(settings: &Settings, extra: Option<&Path>) -> Result<ShapeCatalog> {
    let mut catalog = ShapeCatalog::builtin();

    if let Some(path) = settings.jobs.shapes_file.as_deref() {
        catalog.extend_from_file(path).await?;
    }
    if let Some(path) = extra {
        catalog.extend_from_file(path).await?;
    }

    Ok(catalog)
}

/// The filter from `--filter` or `--filter-file`, or the always-true filter
pub async fn resolve_filter(selection: &JobSelection) -> Result<FilterExpression> {
    if let Some(text) = &selection.filter {
        return FilterExpression::parse(text);
    }

    match &selection.filter_file {
        Some(path) => {
            let text = tokio::fs::read_to_string(path).await.map_err(|e| {
                AggregationError::config_with_code(
                    ErrorCode::CONFIG_READ_FAILED,
                    format!("Cannot read filter file {}", path.display()),
                )
                .with_source(e)
            })?;
            FilterExpression::parse(&text).map_err(|e| e.with_context(path.display()))
        }
        None => Ok(FilterExpression::all()),
    }
}

/// The run id from `--run-id`, or a timestamp
pub fn resolve_run_id(selection: &JobSelection) -> RunId {
    match &selection.run_id {
        Some(id) => RunId::new(id.as_str()),
        None => {
            let run_id = RunId::generate();
            info!("Using generated run id {}", run_id);
            run_id
        }
    }
}

/// Jobs named with `--job`, else `jobs.enabled` from settings, else all
pub fn select_jobs(
    catalog: &ShapeCatalog,
    selection: &JobSelection,
    settings: &Settings,
) -> Result<Vec<PipelineShape>> {
    let names = if selection.jobs.is_empty() {
        &settings.jobs.enabled
    } else {
        &selection.jobs
    };
    let shapes = catalog.select(names)?;
    debug!(
        "Selected jobs: {}",
        shapes
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(shapes)
}
