//! In-process executor for the filter, unwind and projection stages
//!
//! Used by the memory and file backends. The output stage is not handled
//! here: each backend performs its own atomic replace of the destination.

mod filter;
mod path;
mod projection;

use serde_json::Value;

use crate::pipeline::Stage;
use crate::store::error::{StoreError, StoreResult};
use projection::Projection;

/// Run every stage except the trailing output stage over the source documents
pub(crate) fn execute(documents: Vec<Value>, stages: &[Stage]) -> StoreResult<Vec<Value>> {
    let mut current = documents;
    for stage in stages {
        current = match stage {
            Stage::Match(filter) => {
                let predicate = filter::parse(filter.as_value())?;
                current
                    .into_iter()
                    .filter(|doc| predicate.matches(doc))
                    .collect()
            }
            Stage::Unwind { path } => unwind(current, path),
            Stage::Project { fields } => {
                let projection = Projection::compile(fields);
                current.iter().map(|doc| projection.apply(doc)).collect()
            }
            Stage::Out { .. } => {
                return Err(StoreError::InvalidPipeline(
                    "$out can only be the final stage in the pipeline".to_string(),
                ))
            }
        };
    }
    Ok(current)
}

// Missing, null and empty-array values drop the document. Scalars pass
// through as a single document.
fn unwind(documents: Vec<Value>, field: &str) -> Vec<Value> {
    let mut result = Vec::with_capacity(documents.len());
    for doc in documents {
        let elements = match path::lookup(&doc, field) {
            None | Some(Value::Null) => Some(Vec::new()),
            Some(Value::Array(items)) => Some(items.clone()),
            Some(_) => None,
        };

        match elements {
            Some(items) => {
                for item in items {
                    let mut expanded = doc.clone();
                    path::set(&mut expanded, field, item);
                    result.push(expanded);
                }
            }
            None => result.push(doc),
        }
    }
    result
}
