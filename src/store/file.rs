//! File-backed document store
//!
//! Layout: `<data_dir>/<database>/<collection>.jsonl`, one JSON document per
//! line. Output collections are written to a temporary file in the same
//! directory and renamed into place, so readers never see a partial result.

use async_trait::async_trait;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, trace};

use super::{engine, naming, split_output, DocumentStore, StoreError, StoreResult};
use crate::pipeline::Pipeline;

const COLLECTION_EXTENSION: &str = "jsonl";

/// File-backed document store
#[derive(Debug, Clone)]
pub struct FileStore {
    database: String,
    base_dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) the database directory under `data_dir`
    pub async fn open(data_dir: &Path, database: &str) -> StoreResult<Self> {
        if database.is_empty() || database.contains(['/', '\\', '.', '\0']) {
            return Err(StoreError::backend(format!(
                "invalid database name '{}'",
                database
            )));
        }

        let base_dir = data_dir.join(database);
        fs::create_dir_all(&base_dir).await?;
        debug!("File store ready at {}", base_dir.display());

        Ok(Self {
            database: database.to_string(),
            base_dir,
        })
    }

    /// Directory holding this database's collection files
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn collection_path(&self, name: &str) -> PathBuf {
        self.base_dir
            .join(format!("{}.{}", name, COLLECTION_EXTENSION))
    }

    /// Read a collection, `None` if it does not exist
    pub async fn collection(&self, name: &str) -> StoreResult<Option<Vec<Value>>> {
        self.validate_collection_name(name)?;
        let path = self.collection_path(name);
        if !fs::try_exists(&path).await? {
            return Ok(None);
        }

        let content = fs::read_to_string(&path).await?;
        let mut documents = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let doc: Value = serde_json::from_str(line).map_err(|e| {
                StoreError::serialization(format!("{}:{}: {}", path.display(), index + 1, e))
            })?;
            documents.push(doc);
        }
        Ok(Some(documents))
    }

    /// Append documents to a collection, creating it if needed
    pub async fn insert_many(
        &self,
        collection: &str,
        documents: impl IntoIterator<Item = Value>,
    ) -> StoreResult<()> {
        let mut existing = self.collection(collection).await?.unwrap_or_default();
        existing.extend(documents);
        self.replace_collection(collection, existing).await
    }

    /// Atomically replace a collection's contents
    async fn replace_collection(&self, name: &str, documents: Vec<Value>) -> StoreResult<()> {
        let dir = self.base_dir.clone();
        let path = self.collection_path(name);
        trace!("Writing {} documents to {}", documents.len(), path.display());

        tokio::task::spawn_blocking(move || write_atomically(&dir, &path, &documents))
            .await
            .map_err(StoreError::backend)?
    }
}

fn write_atomically(dir: &Path, path: &Path, documents: &[Value]) -> StoreResult<()> {
    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    {
        let mut writer = std::io::BufWriter::new(staged.as_file_mut());
        for doc in documents {
            serde_json::to_writer(&mut writer, doc).map_err(StoreError::serialization)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
    }
    staged.as_file().sync_all()?;
    staged.persist(path).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}

#[async_trait]
impl DocumentStore for FileStore {
    fn database(&self) -> &str {
        &self.database
    }

    // Names double as file names, so path separators are rejected too
    fn validate_collection_name(&self, name: &str) -> StoreResult<()> {
        naming::validate_collection_name(&self.database, name)?;
        if name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(StoreError::invalid_name(
                name,
                "must not contain path separators or start with '.'",
            ));
        }
        Ok(())
    }

    async fn aggregate(&self, pipeline: &Pipeline) -> StoreResult<()> {
        let (stages, target) = split_output(pipeline)?;
        self.validate_collection_name(target)?;

        let source = self
            .collection(pipeline.source())
            .await?
            .unwrap_or_default();
        trace!(
            "Aggregating {} documents from '{}'",
            source.len(),
            pipeline.source()
        );

        let results = engine::execute(source, stages)?;
        self.replace_collection(target, results).await
    }
}
