//! Filter expressions and the four-stage pipeline value

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::shape::IDENTITY_FIELD;
use crate::error::{AggregationError, ErrorCode, Result};

/// Store-native match predicate, passed through to the store untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterExpression(Value);

impl FilterExpression {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The always-true filter
    pub fn all() -> Self {
        Self(Value::Object(Map::new()))
    }

    /// Parse a filter from JSON text; blank input means all documents
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::all());
        }
        serde_json::from_str(text).map(Self).map_err(|e| {
            AggregationError::config_with_code(
                ErrorCode::CONFIG_INVALID_JSON,
                "Filter is not valid JSON",
            )
            .with_source(e)
        })
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

}

impl Default for FilterExpression {
    fn default() -> Self {
        Self::all()
    }
}

/// One aggregation stage
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Match(FilterExpression),
    Unwind { path: String },
    Project { fields: Vec<String> },
    Out { collection: String },
}

impl Stage {
    /// Store-native stage document
    pub fn to_document(&self) -> Value {
        match self {
            Self::Match(filter) => json!({ "$match": filter.as_value() }),
            Self::Unwind { path } => json!({ "$unwind": format!("${}", path) }),
            Self::Project { fields } => {
                let mut projection = Map::new();
                projection.insert(IDENTITY_FIELD.to_string(), json!(0));
                for field in fields {
                    projection.insert(field.clone(), json!(1));
                }
                json!({ "$project": projection })
            }
            Self::Out { collection } => json!({ "$out": collection }),
        }
    }
}

/// A concrete pipeline bound to its source collection
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    job: String,
    source: String,
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(job: impl Into<String>, source: impl Into<String>, stages: Vec<Stage>) -> Self {
        Self {
            job: job.into(),
            source: source.into(),
            stages,
        }
    }

    pub fn job(&self) -> &str {
        &self.job
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Destination collection of the trailing output stage
    pub fn output_collection(&self) -> Option<&str> {
        self.split_output().map(|(_, collection)| collection)
    }

    /// Stages before a single trailing output stage, plus its destination
    pub fn split_output(&self) -> Option<(&[Stage], &str)> {
        let (last, rest) = self.stages.split_last()?;
        let Stage::Out { collection } = last else {
            return None;
        };
        if rest.iter().any(|stage| matches!(stage, Stage::Out { .. })) {
            return None;
        }
        Some((rest, collection.as_str()))
    }

    /// Stage documents in store-native form
    pub fn to_documents(&self) -> Vec<Value> {
        self.stages.iter().map(Stage::to_document).collect()
    }
}
