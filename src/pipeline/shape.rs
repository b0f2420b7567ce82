//! Pipeline shape definition and structural validation

use serde::{Deserialize, Serialize};

use super::output_name::{self, OutputCollectionName, RunId};
use crate::error::{AggregationError, ErrorCode, Result};

/// Identity field suppressed by every projection
pub const IDENTITY_FIELD: &str = "_id";

/// Fixed description of one unwind/project/out job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineShape {
    /// Job key, e.g. `server_disks`
    pub name: String,
    /// Collection the documents are read from
    pub source_collection: String,
    /// Array field expanded into one document per element
    pub unwind_field: String,
    /// Fields kept in the output, in emission order
    pub projected_fields: Vec<String>,
    /// Output collection name with a `${run_id}` placeholder
    pub output_template: String,
}

impl PipelineShape {
    pub fn new(
        name: &str,
        source_collection: &str,
        unwind_field: &str,
        projected_fields: &[&str],
        output_template: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            source_collection: source_collection.to_string(),
            unwind_field: unwind_field.to_string(),
            projected_fields: projected_fields.iter().map(|f| f.to_string()).collect(),
            output_template: output_template.to_string(),
        }
    }

    /// Check the structural rules every shape must follow
    pub fn validate(&self) -> Result<()> {
        let label = if self.name.is_empty() {
            "<unnamed>"
        } else {
            self.name.as_str()
        };
        let fail = |code: u16, message: String| Err(AggregationError::shape(code, label, message));

        if self.name.trim().is_empty() {
            return fail(ErrorCode::SHAPE_EMPTY_FIELD, "job name is empty".to_string());
        }
        if self.source_collection.trim().is_empty() {
            return fail(
                ErrorCode::SHAPE_EMPTY_FIELD,
                "source collection is empty".to_string(),
            );
        }
        if self.unwind_field.trim().is_empty() {
            return fail(ErrorCode::SHAPE_EMPTY_FIELD, "unwind field is empty".to_string());
        }
        if let Err(message) = check_path(&self.unwind_field) {
            return fail(
                ErrorCode::SHAPE_INVALID_PATH,
                format!("unwind field '{}' {}", self.unwind_field, message),
            );
        }
        if self.projected_fields.is_empty() {
            return fail(
                ErrorCode::SHAPE_EMPTY_FIELD,
                "no projected fields".to_string(),
            );
        }

        for (index, field) in self.projected_fields.iter().enumerate() {
            if let Err(message) = check_path(field) {
                return fail(
                    ErrorCode::SHAPE_INVALID_PATH,
                    format!("projected field '{}' {}", field, message),
                );
            }
            if field == IDENTITY_FIELD || field.starts_with("_id.") {
                return fail(
                    ErrorCode::SHAPE_IDENTITY_PROJECTED,
                    format!("'{}' would project the identity field", field),
                );
            }
            for other in &self.projected_fields[..index] {
                if other == field {
                    return fail(
                        ErrorCode::SHAPE_PATH_COLLISION,
                        format!("projected field '{}' is listed twice", field),
                    );
                }
                if is_prefix_path(other, field) || is_prefix_path(field, other) {
                    return fail(
                        ErrorCode::SHAPE_PATH_COLLISION,
                        format!("projected fields '{}' and '{}' collide", other, field),
                    );
                }
            }
        }

        if let Err(message) = output_name::check_template(&self.output_template) {
            return fail(ErrorCode::SHAPE_INVALID_TEMPLATE, message);
        }

        Ok(())
    }

    /// Render the output collection name for a run
    pub fn output_name(&self, run_id: &RunId) -> OutputCollectionName {
        output_name::render(&self.output_template, run_id)
    }
}

fn check_path(path: &str) -> std::result::Result<(), &'static str> {
    if path.starts_with('$') {
        return Err("must not start with '$'");
    }
    if path.split('.').any(|segment| segment.is_empty()) {
        return Err("has an empty path segment");
    }
    if path.contains('\0') {
        return Err("contains a null byte");
    }
    Ok(())
}

fn is_prefix_path(prefix: &str, path: &str) -> bool {
    path.len() > prefix.len()
        && path.starts_with(prefix)
        && path.as_bytes()[prefix.len()] == b'.'
}
