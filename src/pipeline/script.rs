//! Rendering pipelines for inspection or for the mongo shell
//!
//! The shell form is a script of `db.getCollection(..).aggregate([..]);`
//! statements with the filter and run id already substituted, suitable for
//! piping into `mongo <database>`.

use serde_json::{json, Value};
use std::fmt::Write;

use super::stage::Pipeline;
use crate::error::{AggregationError, Result};

/// Render pipelines as a JSON array of `{job, source, pipeline}` objects
pub fn render_json(pipelines: &[Pipeline]) -> Value {
    Value::Array(
        pipelines
            .iter()
            .map(|pipeline| {
                json!({
                    "job": pipeline.job(),
                    "source": pipeline.source(),
                    "pipeline": pipeline.to_documents(),
                })
            })
            .collect(),
    )
}

/// Render pipelines as a mongo shell script
pub fn render_script(pipelines: &[Pipeline]) -> Result<String> {
    let mut script = String::new();
    for (index, pipeline) in pipelines.iter().enumerate() {
        if index > 0 {
            script.push('\n');
        }
        let source = serde_json::to_string(pipeline.source()).map_err(render_error)?;
        let stages =
            serde_json::to_string_pretty(&pipeline.to_documents()).map_err(render_error)?;

        // Writing into a String cannot fail
        let _ = writeln!(script, "// {}", pipeline.job());
        let _ = writeln!(script, "db.getCollection({}).aggregate({});", source, stages);
    }
    Ok(script)
}

fn render_error(err: serde_json::Error) -> AggregationError {
    AggregationError::other("Failed to render pipeline").with_source(err)
}
