//! Document store abstraction consumed by the aggregation runner
//!
//! The runner only needs one capability from a store: execute a pipeline of
//! filter, unwind, projection and output stages server-side. Two in-process
//! backends implement it with the same semantics a document database applies
//! to those stages:
//!
//! - `MemoryStore` keeps collections in memory (tests, benchmarks)
//! - `FileStore` keeps one JSON-lines file per collection

mod engine;
pub mod error;
pub mod file;
pub mod memory;
pub mod naming;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::config::{BackendType, StoreSettings};
use crate::pipeline::Pipeline;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;

/// A document store able to execute aggregation pipelines
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Database the collections live in
    fn database(&self) -> &str;

    /// Check a collection name against this store's naming rules
    fn validate_collection_name(&self, name: &str) -> StoreResult<()> {
        naming::validate_collection_name(self.database(), name)
    }

    /// Execute the pipeline against its source collection
    ///
    /// The pipeline must end with an output stage. The destination collection
    /// is replaced atomically: on error it keeps its previous contents.
    async fn aggregate(&self, pipeline: &Pipeline) -> StoreResult<()>;
}

/// Open the store described by the settings
pub async fn open_store(settings: &StoreSettings) -> StoreResult<Arc<dyn DocumentStore>> {
    debug!(
        "Opening {:?} store for database '{}'",
        settings.backend, settings.database
    );
    match settings.backend {
        BackendType::Memory => Ok(Arc::new(MemoryStore::new(&settings.database))),
        BackendType::File => {
            let store = FileStore::open(&settings.data_dir, &settings.database).await?;
            Ok(Arc::new(store))
        }
    }
}

/// Split a pipeline into the stages to evaluate and its output collection
pub(crate) fn split_output(pipeline: &Pipeline) -> StoreResult<(&[crate::pipeline::Stage], &str)> {
    pipeline.split_output().ok_or_else(|| {
        StoreError::InvalidPipeline(format!(
            "pipeline for job '{}' must end with a single $out stage",
            pipeline.job()
        ))
    })
}
