//! DevNet Inspector
//!
//! Validated configuration model for the DevNet Inspector monitoring agent.
//! Builds an [`AgentConfig`] from untyped mappings, JSON or YAML, keeps it
//! valid through every mutation, and persists it back to disk.

use std::path::{Path, PathBuf};

pub mod cli;
pub mod config;
pub mod logging;

pub use config::{
    AgentConfig, ConfigFormat, Environment, FieldError, FieldErrorKind, LogLevel, Target,
    ValidationError,
};

/// Application-wide error types with context preservation
#[derive(Debug, thiserror::Error)]
pub enum InspectorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Unsupported config format: {} (expected a .json or .yaml extension)", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Persistence error ({context}): {source}")]
    Persistence {
        context: String,
        #[source]
        source: PersistenceSource,
    },
}

/// Underlying cause of a persistence failure
#[derive(Debug, thiserror::Error)]
pub enum PersistenceSource {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl InspectorError {
    /// Create an unsupported format error for `path`
    pub fn unsupported_format(path: impl AsRef<Path>) -> Self {
        Self::UnsupportedFormat {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create a persistence error wrapping its cause
    pub fn persistence(context: impl Into<String>, source: impl Into<PersistenceSource>) -> Self {
        Self::Persistence {
            context: context.into(),
            source: source.into(),
        }
    }

    /// The field errors, when this is a validation failure
    pub fn validation_errors(&self) -> Option<&ValidationError> {
        match self {
            InspectorError::Validation(err) => Some(err),
            _ => None,
        }
    }

    /// Process exit code for the CLI
    pub fn exit_code(&self) -> u8 {
        match self {
            InspectorError::Validation(_) => 2,
            InspectorError::UnsupportedFormat { .. } => 3,
            InspectorError::Persistence { .. } => 4,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            InspectorError::Validation(err) => {
                let mut fields: Vec<&str> = err
                    .errors()
                    .iter()
                    .map(|e| match e.root_field() {
                        "" => "configuration root",
                        field => field,
                    })
                    .collect();
                fields.dedup();
                format!("Invalid configuration: check {}", fields.join(", "))
            }
            InspectorError::UnsupportedFormat { path } => {
                format!(
                    "Cannot read or write {}: use a .json or .yaml file",
                    path.display()
                )
            }
            InspectorError::Persistence { context, source } => match source {
                PersistenceSource::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    format!("File not found ({})", context)
                }
                PersistenceSource::Io(e) => format!("File system error ({}): {}", context, e),
                PersistenceSource::Json(e) => format!("Malformed JSON ({}): {}", context, e),
                PersistenceSource::Yaml(e) => format!("Malformed YAML ({}): {}", context, e),
            },
        }
    }
}

/// Convenience type alias for Results
pub type InspectorResult<T> = Result<T, InspectorError>;
