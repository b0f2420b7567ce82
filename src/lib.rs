//! # ganymede-aggregations
//!
//! Flattens nested inventory documents into per-component reporting
//! collections. Each job unwinds one array field of a source collection,
//! projects a fixed set of fields and writes the result into an output
//! collection whose name carries the run id.
//!
//! ## Usage
//!
//! ```bash
//! ganymede-agg run --filter '{"report_period": "2016-05"}' --run-id 42
//! ```
//!
//! ## Modules
//!
//! - `pipeline` - Job shapes, output naming, pipeline construction and the runner
//! - `store` - The `DocumentStore` seam plus memory and JSON-lines backends
//! - `config` - Settings file and environment overrides
//! - `error` - Coded error type shared by the library and the binary
//! - `app` - Logging setup and fatal error reporting
//! - `cli` - Argument parsing and command handlers
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod store;

pub use error::{AggregationError, ErrorCode, Result};
pub use pipeline::{
    build_pipeline, builtin_shapes, find_shape, FilterExpression, OutputCollectionName, Pipeline,
    PipelineRunner, PipelineShape, RunId, RunReport, ShapeCatalog, Stage,
};
pub use store::{DocumentStore, FileStore, MemoryStore, StoreError};
