//! Aggregation job shapes, templating and execution
//!
//! - `shape` - the `PipelineShape` record and its structural rules
//! - `catalog` - the built-in jobs and caller-defined shapes
//! - `output_name` - run ids and output collection templating
//! - `stage` - filter expressions and the four-stage pipeline
//! - `script` - JSON and mongo shell rendering
//! - `runner` - execution against a `DocumentStore`

pub mod catalog;
pub mod output_name;
pub mod runner;
pub mod script;
pub mod shape;
pub mod stage;

pub use catalog::{builtin_shapes, find_shape, ShapeCatalog};
pub use output_name::{OutputCollectionName, RunId};
pub use runner::{build_pipeline, JobOutcome, PipelineRunner, RunReport};
pub use script::{render_json, render_script};
pub use shape::PipelineShape;
pub use stage::{FilterExpression, Pipeline, Stage};
