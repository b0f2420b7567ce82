//! `ganymede-agg render`: print substituted pipelines without executing them

use anyhow::Result;

use crate::cli::args::{JobSelection, RenderFormat};
use crate::cli::params::{resolve_filter, resolve_run_id, select_jobs};
use crate::config::Settings;
use crate::pipeline::{build_pipeline, render_json, render_script, Pipeline, ShapeCatalog};

pub async fn run_render_command(
    catalog: &ShapeCatalog,
    settings: &Settings,
    selection: &JobSelection,
    format: RenderFormat,
) -> Result<()> {
    let shapes = select_jobs(catalog, selection, settings)?;
    let filter = resolve_filter(selection).await?;
    let run_id = resolve_run_id(selection);

    let pipelines = shapes
        .iter()
        .map(|shape| build_pipeline(shape, &filter, &run_id))
        .collect::<crate::error::Result<Vec<Pipeline>>>()?;

    match format {
        RenderFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&render_json(&pipelines))?)
        }
        RenderFormat::Shell => print!("{}", render_script(&pipelines)?),
    }
    Ok(())
}
