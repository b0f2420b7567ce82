use std::fmt::Display;
use thiserror::Error;

pub mod codes;

pub use codes::{describe_error_code, ErrorCode};

use crate::store::StoreError;

/// The unified error type for aggregation jobs
#[derive(Error, Debug)]
pub enum AggregationError {
    #[error("[E{code:04}] Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Shape configuration error: {message}")]
    ShapeConfiguration {
        code: u16,
        message: String,
        shape: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Invalid output identifier '{name}': {message}")]
    InvalidIdentifier {
        code: u16,
        message: String,
        name: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Store execution error: {message}")]
    StoreExecution {
        code: u16,
        message: String,
        collection: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] {message}")]
    Other {
        code: u16,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AggregationError {
    /// Create a configuration error with default code
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCode::CONFIG_GENERIC,
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with specific code
    pub fn config_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create a shape configuration error for a named shape
    pub fn shape(code: u16, shape: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ShapeConfiguration {
            code,
            message: message.into(),
            shape: Some(shape.into()),
            source: None,
        }
    }

    /// Create an invalid identifier error for a rendered collection name
    pub fn invalid_identifier(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            code: ErrorCode::IDENTIFIER_REJECTED,
            message: message.into(),
            name: name.into(),
            source: None,
        }
    }

    /// Create a store execution error with specific code
    pub fn store_with_code(
        code: u16,
        message: impl Into<String>,
        collection: Option<String>,
    ) -> Self {
        Self::StoreExecution {
            code,
            message: message.into(),
            collection,
            source: None,
        }
    }

    /// Create a generic other error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            code: ErrorCode::OTHER_GENERIC,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error to this error
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        match &mut self {
            Self::Config { source: src, .. }
            | Self::ShapeConfiguration { source: src, .. }
            | Self::InvalidIdentifier { source: src, .. }
            | Self::StoreExecution { source: src, .. }
            | Self::Other { source: src, .. } => {
                *src = Some(source.into());
            }
        }
        self
    }

    /// Add context to the error message
    pub fn with_context(mut self, context: impl Display) -> Self {
        match &mut self {
            Self::Config { message, .. }
            | Self::ShapeConfiguration { message, .. }
            | Self::InvalidIdentifier { message, .. }
            | Self::StoreExecution { message, .. }
            | Self::Other { message, .. } => {
                *message = format!("{}: {}", message, context);
            }
        }
        self
    }

    /// Attach the output collection a store error relates to
    pub fn with_collection(mut self, name: impl Into<String>) -> Self {
        if let Self::StoreExecution {
            collection: ref mut c,
            ..
        } = self
        {
            *c = Some(name.into());
        }
        self
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,
            Self::ShapeConfiguration { .. } => 3,
            Self::InvalidIdentifier { .. } => 4,
            Self::StoreExecution { .. } => 5,
            Self::Other { .. } => 1,
        }
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::Config { code, .. }
            | Self::ShapeConfiguration { code, .. }
            | Self::InvalidIdentifier { code, .. }
            | Self::StoreExecution { code, .. }
            | Self::Other { code, .. } => *code,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message, .. } => format!("Configuration problem: {}", message),
            Self::ShapeConfiguration { message, shape, .. } => match shape {
                Some(name) => format!("Aggregation job '{}' is misconfigured: {}", name, message),
                None => format!("Aggregation job configuration problem: {}", message),
            },
            Self::InvalidIdentifier { message, name, .. } => {
                format!("Output collection name '{}' is not valid: {}", name, message)
            }
            Self::StoreExecution {
                message,
                collection,
                ..
            } => match collection {
                Some(name) => format!("Aggregation into '{}' failed: {}", name, message),
                None => format!("Aggregation failed: {}", message),
            },
            Self::Other { message, .. } => message.clone(),
        }
    }

    /// Get a developer-friendly error message with full chain
    pub fn developer_message(&self) -> String {
        let mut msg = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            msg.push_str(&format!("\n  caused by: {}", err));
            source = err.source();
        }
        msg
    }
}

/// Type alias for Results using AggregationError
pub type Result<T> = std::result::Result<T, AggregationError>;

impl From<serde_yaml::Error> for AggregationError {
    fn from(err: serde_yaml::Error) -> Self {
        AggregationError::config_with_code(ErrorCode::CONFIG_INVALID_YAML, "Invalid YAML syntax")
            .with_source(err)
    }
}

impl From<serde_json::Error> for AggregationError {
    fn from(err: serde_json::Error) -> Self {
        AggregationError::config_with_code(ErrorCode::CONFIG_INVALID_JSON, "Invalid JSON syntax")
            .with_source(err)
    }
}

impl From<toml::de::Error> for AggregationError {
    fn from(err: toml::de::Error) -> Self {
        AggregationError::config_with_code(ErrorCode::CONFIG_INVALID_TOML, "Invalid TOML syntax")
            .with_source(err)
    }
}

// Store errors keep their original detail as the source
impl From<StoreError> for AggregationError {
    fn from(err: StoreError) -> Self {
        let code = match &err {
            StoreError::InvalidCollectionName { name, reason } => {
                return AggregationError::invalid_identifier(name.clone(), reason.clone());
            }
            StoreError::Io(_) => ErrorCode::STORE_IO_ERROR,
            StoreError::Serialization(_) => ErrorCode::STORE_SERIALIZATION_ERROR,
            StoreError::InvalidFilter(_) => ErrorCode::STORE_INVALID_FILTER,
            StoreError::InvalidPipeline(_) => ErrorCode::STORE_INVALID_PIPELINE,
            StoreError::Backend(_) => ErrorCode::STORE_BACKEND_ERROR,
        };
        AggregationError::store_with_code(code, err.to_string(), None).with_source(err)
    }
}
