//! `ganymede-agg list`

use crate::pipeline::{PipelineShape, ShapeCatalog};

/// Print one row per job
pub fn run_list_command(catalog: &ShapeCatalog) -> anyhow::Result<()> {
    print!("{}", format_table(catalog.shapes()));
    Ok(())
}

fn format_table(shapes: &[PipelineShape]) -> String {
    let mut out = format!(
        "{:<24} {:<20} {:<36} {}\n",
        "JOB", "SOURCE", "UNWIND", "OUTPUT"
    );
    for shape in shapes {
        out.push_str(&format!(
            "{:<24} {:<20} {:<36} {}\n",
            shape.name, shape.source_collection, shape.unwind_field, shape.output_template
        ));
    }
    out
}
