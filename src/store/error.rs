//! Error types for the document store layer

use std::fmt;
use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store error types
#[derive(Error, Debug)]
pub enum StoreError {
    /// Collection name violates the store's naming rules
    #[error("Invalid collection name '{name}': {reason}")]
    InvalidCollectionName { name: String, reason: String },

    /// Filter document could not be interpreted
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Pipeline stages are not executable as given
    #[error("Invalid pipeline: {0}")]
    InvalidPipeline(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Backend-specific failure
    #[error("Backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create an invalid collection name error
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCollectionName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid filter error
    pub fn invalid_filter<E: fmt::Display>(err: E) -> Self {
        Self::InvalidFilter(err.to_string())
    }

    /// Create a serialization error
    pub fn serialization<E: fmt::Display>(err: E) -> Self {
        Self::Serialization(err.to_string())
    }

    /// Create a backend error
    pub fn backend<E: fmt::Display>(err: E) -> Self {
        Self::Backend(err.to_string())
    }
}
