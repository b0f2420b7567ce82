//! Templating and execution of aggregation jobs
//!
//! Every job is the same four-stage transform:
//!
//! 1. `$match` with the caller's filter, passed through untouched
//! 2. `$unwind` of the shape's array field (missing or empty arrays drop the document)
//! 3. `$project` of the shape's fields without `_id`
//! 4. `$out` into the templated collection, replacing it
//!
//! Jobs share no state. `run_all` executes a set of them with bounded
//! concurrency and reports each outcome separately; nothing is retried.

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, info_span, Instrument};

use super::output_name::{OutputCollectionName, RunId};
use super::shape::PipelineShape;
use super::stage::{FilterExpression, Pipeline, Stage};
use crate::error::{AggregationError, Result};
use crate::store::DocumentStore;

/// Default number of jobs in flight for `run_all`
pub const DEFAULT_MAX_CONCURRENT_JOBS: usize = 4;

/// Build the pipeline for a shape without consulting any store
///
/// Fails with a shape configuration error before anything is executed.
pub fn build_pipeline(
    shape: &PipelineShape,
    filter: &FilterExpression,
    run_id: &RunId,
) -> Result<Pipeline> {
    shape.validate()?;
    let output = shape.output_name(run_id);

    Ok(Pipeline::new(
        shape.name.clone(),
        shape.source_collection.clone(),
        vec![
            Stage::Match(filter.clone()),
            Stage::Unwind {
                path: shape.unwind_field.clone(),
            },
            Stage::Project {
                fields: shape.projected_fields.clone(),
            },
            Stage::Out {
                collection: output.into_string(),
            },
        ],
    ))
}

/// Outcome of one job within a `run_all`
#[derive(Debug)]
pub struct JobOutcome {
    pub job: String,
    pub result: Result<OutputCollectionName>,
}

/// Per-job outcomes of a `run_all`, in the order the shapes were given
#[derive(Debug)]
pub struct RunReport {
    pub run_id: RunId,
    pub outcomes: Vec<JobOutcome>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    pub fn succeeded(&self) -> impl Iterator<Item = (&str, &OutputCollectionName)> {
        self.outcomes.iter().filter_map(|o| match &o.result {
            Ok(name) => Some((o.job.as_str(), name)),
            Err(_) => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &AggregationError)> {
        self.outcomes.iter().filter_map(|o| match &o.result {
            Ok(_) => None,
            Err(e) => Some((o.job.as_str(), e)),
        })
    }
}

/// Runs aggregation jobs against a document store
#[derive(Clone)]
pub struct PipelineRunner {
    store: Arc<dyn DocumentStore>,
    max_concurrent_jobs: usize,
}

impl PipelineRunner {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            max_concurrent_jobs: DEFAULT_MAX_CONCURRENT_JOBS,
        }
    }

    /// Limit how many jobs `run_all` keeps in flight; 1 runs them sequentially
    pub fn with_max_concurrent_jobs(mut self, max: usize) -> Self {
        self.max_concurrent_jobs = max.max(1);
        self
    }

    pub fn max_concurrent_jobs(&self) -> usize {
        self.max_concurrent_jobs
    }

    /// Build a pipeline and check its output name against the store's rules
    pub fn build(
        &self,
        shape: &PipelineShape,
        filter: &FilterExpression,
        run_id: &RunId,
    ) -> Result<Pipeline> {
        let pipeline = build_pipeline(shape, filter, run_id)?;
        if let Some(output) = pipeline.output_collection() {
            self.store.validate_collection_name(output)?;
        }
        Ok(pipeline)
    }

    /// Execute one job and return the collection it materialized
    pub async fn run(
        &self,
        shape: &PipelineShape,
        filter: &FilterExpression,
        run_id: &RunId,
    ) -> Result<OutputCollectionName> {
        let span = info_span!("aggregation", job = %shape.name, run_id = %run_id);
        self.run_job(shape, filter, run_id).instrument(span).await
    }

    async fn run_job(
        &self,
        shape: &PipelineShape,
        filter: &FilterExpression,
        run_id: &RunId,
    ) -> Result<OutputCollectionName> {
        let pipeline = self.build(shape, filter, run_id)?;
        let output = shape.output_name(run_id);
        debug!(
            "Aggregating {} -> {} (unwind {})",
            shape.source_collection, output, shape.unwind_field
        );

        let started = Instant::now();
        match self.store.aggregate(&pipeline).await {
            Ok(()) => {
                info!(
                    "Materialized {} from {} in {:?}",
                    output,
                    shape.source_collection,
                    started.elapsed()
                );
                Ok(output)
            }
            Err(e) => {
                let err = AggregationError::from(e).with_collection(output.as_str());
                error!("Aggregation into {} failed: {}", output, err);
                Err(err)
            }
        }
    }

    /// Execute every shape with the same filter and run id
    pub async fn run_all(
        &self,
        shapes: &[PipelineShape],
        filter: &FilterExpression,
        run_id: &RunId,
    ) -> RunReport {
        debug!(
            "Running {} jobs, at most {} at a time",
            shapes.len(),
            self.max_concurrent_jobs
        );

        let outcomes = stream::iter(shapes)
            .map(|shape| async move {
                JobOutcome {
                    job: shape.name.clone(),
                    result: self.run(shape, filter, run_id).await,
                }
            })
            .buffered(self.max_concurrent_jobs)
            .collect::<Vec<_>>()
            .await;

        RunReport {
            run_id: run_id.clone(),
            outcomes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::pipeline::find_shape;
    use crate::store::{MemoryStore, StoreError, StoreResult};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store that counts requests and fails every one of them
    struct FailingStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DocumentStore for FailingStore {
        fn database(&self) -> &str {
            "ganymede"
        }

        async fn aggregate(&self, _pipeline: &Pipeline) -> StoreResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(StoreError::backend("not authorized on ganymede"))
        }
    }

    #[test]
    fn test_build_pipeline_stage_order() {
        let shape = find_shape("consistency_groups").unwrap();
        let pipeline =
            build_pipeline(shape, &FilterExpression::all(), &RunId::new("42")).unwrap();

        assert_eq!(pipeline.source(), "drs_cluster_pairs");
        assert_eq!(
            pipeline.to_documents(),
            vec![
                json!({"$match": {}}),
                json!({"$unwind": "$general.consistency_groups"}),
                json!({"$project": {
                    "_id": 0,
                    "general.drs_pair_id": 1,
                    "report_period": 1,
                    "ganymede_doc_version": 1,
                    "general.consistency_groups.cg_id": 1,
                    "general.consistency_groups.state": 1,
                }}),
                json!({"$out": "consistency_groups42"}),
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_shape_fails_before_store_request() {
        let store = Arc::new(FailingStore {
            calls: AtomicUsize::new(0),
        });
        let runner = PipelineRunner::new(store.clone());

        let mut shape = find_shape("server_disks").unwrap().clone();
        shape.projected_fields.clear();

        let err = runner
            .run(&shape, &FilterExpression::all(), &RunId::new("1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AggregationError::ShapeConfiguration { .. }));
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_identifier_fails_before_store_request() {
        let store = Arc::new(FailingStore {
            calls: AtomicUsize::new(0),
        });
        let runner = PipelineRunner::new(store.clone());
        let shape = find_shape("mcp_geos").unwrap();

        let err = runner
            .run(shape, &FilterExpression::all(), &RunId::new("bad$id"))
            .await
            .unwrap_err();
        assert!(matches!(err, AggregationError::InvalidIdentifier { .. }));
        assert_eq!(err.code(), ErrorCode::IDENTIFIER_REJECTED);
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_store_error_is_propagated() {
        let store = Arc::new(FailingStore {
            calls: AtomicUsize::new(0),
        });
        let runner = PipelineRunner::new(store.clone());
        let shape = find_shape("image_disks").unwrap();

        let err = runner
            .run(shape, &FilterExpression::all(), &RunId::new("9"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::STORE_BACKEND_ERROR);
        assert!(err.user_message().contains("imagedisks9"));
        assert!(err.developer_message().contains("not authorized on ganymede"));
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_all_reports_in_order() {
        let store = Arc::new(MemoryStore::new("ganymede"));
        let runner = PipelineRunner::new(store.clone()).with_max_concurrent_jobs(0);
        assert_eq!(runner.max_concurrent_jobs(), 1);

        let shapes = vec![
            find_shape("server_nics").unwrap().clone(),
            find_shape("image_disks").unwrap().clone(),
        ];
        let report = runner
            .run_all(&shapes, &FilterExpression::all(), &RunId::new("5"))
            .await;

        assert!(report.is_success());
        let names: Vec<String> = report.succeeded().map(|(_, n)| n.to_string()).collect();
        assert_eq!(names, vec!["servernics5", "imagedisks5"]);
        assert_eq!(report.failed().count(), 0);
    }
}
