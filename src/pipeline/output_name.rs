//! Output collection naming
//!
//! Templates carry `${run_id}` placeholders, e.g. `serverdisks${run_id}`.
//! Rendering is a pure string substitution; the store decides whether the
//! resulting name is acceptable.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Variable name recognised inside output templates
pub const RUN_ID_VARIABLE: &str = "run_id";

// Matches ${variable}
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]*)\}").expect("Invalid regex pattern"));

/// Caller-supplied token distinguishing one run's output from another's
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a run id from the current UTC time (`YYYYmmddHHMMSS`)
    pub fn generate() -> Self {
        Self(Utc::now().format("%Y%m%d%H%M%S").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RunId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RunId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Concrete name of a materialized output collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputCollectionName(String);

impl OutputCollectionName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for OutputCollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OutputCollectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Check that a template has at least one `${run_id}` and no other placeholder
pub fn check_template(template: &str) -> Result<(), String> {
    let mut found = false;
    for caps in PLACEHOLDER.captures_iter(template) {
        let variable = caps[1].trim();
        if variable != RUN_ID_VARIABLE {
            return Err(format!(
                "unknown placeholder '${{{}}}', only '${{{}}}' is supported",
                variable, RUN_ID_VARIABLE
            ));
        }
        found = true;
    }

    if found {
        Ok(())
    } else {
        Err(format!(
            "template '{}' has no '${{{}}}' placeholder",
            template, RUN_ID_VARIABLE
        ))
    }
}

/// Substitute the run id into every `${run_id}` placeholder
pub fn render(template: &str, run_id: &RunId) -> OutputCollectionName {
    let name = PLACEHOLDER.replace_all(template, |caps: &regex::Captures| {
        if caps[1].trim() == RUN_ID_VARIABLE {
            run_id.as_str().to_string()
        } else {
            caps[0].to_string()
        }
    });
    OutputCollectionName(name.into_owned())
}
