//! `ganymede-agg run`: execute jobs against the configured store

use anyhow::{bail, Result};
use tracing::debug;

use crate::cli::args::JobSelection;
use crate::cli::params::{resolve_filter, resolve_run_id, select_jobs};
use crate::config::Settings;
use crate::pipeline::{PipelineRunner, ShapeCatalog};
use crate::store::open_store;

pub async fn run_aggregation_command(
    catalog: &ShapeCatalog,
    settings: &Settings,
    selection: &JobSelection,
    sequential: bool,
) -> Result<()> {
    let shapes = select_jobs(catalog, selection, settings)?;
    let filter = resolve_filter(selection).await?;
    let run_id = resolve_run_id(selection);

    let store = open_store(&settings.store)
        .await
        .map_err(crate::error::AggregationError::from)?;
    let max_concurrent = if sequential {
        1
    } else {
        settings.jobs.max_concurrent_jobs
    };
    let runner = PipelineRunner::new(store).with_max_concurrent_jobs(max_concurrent);
    debug!("Running {} jobs for run {}", shapes.len(), run_id);

    let report = runner.run_all(&shapes, &filter, &run_id).await;
    let total = report.outcomes.len();

    let mut errors = Vec::new();
    for outcome in report.outcomes {
        match outcome.result {
            Ok(name) => println!("✅ {} -> {}", outcome.job, name),
            Err(e) => {
                // A lone failure is reported once, by the fatal error handler
                if total > 1 {
                    eprintln!("❌ {}: {}", outcome.job, e.user_message());
                }
                errors.push(e);
            }
        }
    }

    match errors.len() {
        0 => Ok(()),
        // A lone failure keeps its own exit code
        1 if total == 1 => Err(errors.remove(0).into()),
        failed => bail!("{} of {} jobs failed for run {}", failed, total, run_id),
    }
}
