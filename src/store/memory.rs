//! In-memory document store for tests and benchmarks

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::trace;

use super::{engine, split_output, DocumentStore, StoreResult};
use crate::pipeline::Pipeline;

/// In-memory document store
#[derive(Debug, Clone)]
pub struct MemoryStore {
    database: String,
    collections: Arc<RwLock<HashMap<String, Vec<Value>>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Append documents to a collection, creating it if needed
    pub async fn insert_many(&self, collection: &str, documents: impl IntoIterator<Item = Value>) {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .extend(documents);
    }

    /// Snapshot of a collection, `None` if it does not exist
    pub async fn collection(&self, name: &str) -> Option<Vec<Value>> {
        self.collections.read().await.get(name).cloned()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn database(&self) -> &str {
        &self.database
    }

    async fn aggregate(&self, pipeline: &Pipeline) -> StoreResult<()> {
        let (stages, target) = split_output(pipeline)?;
        self.validate_collection_name(target)?;

        let source = self
            .collections
            .read()
            .await
            .get(pipeline.source())
            .cloned()
            .unwrap_or_default();
        trace!(
            "Aggregating {} documents from '{}'",
            source.len(),
            pipeline.source()
        );

        let results = engine::execute(source, stages)?;
        self.collections
            .write()
            .await
            .insert(target.to_string(), results);
        Ok(())
    }
}
