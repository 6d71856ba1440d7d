//! Error types for schema loading and resolution
//!
//! Constraint violations found while validating a candidate document are
//! not errors: they are reported through [`crate::ValidationResult`].

use thiserror::Error;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema catalog errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Schema not found: {domain}/{document_type}{}", suggestion_suffix(.suggestion))]
    NotFound {
        domain: String,
        document_type: String,
        suggestion: Option<String>,
    },

    #[error("Unresolvable schema reference {reference}: {reason}")]
    Resolution { reference: String, reason: String },

    #[error("Malformed schema at {location}: {reason}")]
    Malformed { location: String, reason: String },

    #[error("Duplicate schema: {domain}/{document_type} is registered twice")]
    Duplicate { domain: String, document_type: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl SchemaError {
    pub(crate) fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn resolution(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Resolution {
            reference: reference.into(),
            reason: reason.into(),
        }
    }
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean {}?)", s),
        None => String::new(),
    }
}
