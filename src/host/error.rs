// SPDX-License-Identifier: MIT

//! Typed error handling for conditional-notify
//!
//! Validation and submission errors are local to the admin save path.
//! Evaluation never surfaces an error; see `conditions::evaluator`.

use thiserror::Error;

use super::form::{FieldId, FormId};

/// Top-level error type for conditional-notify
#[derive(Debug, Error)]
pub enum NotifyError {
    /// A rule references a field or value the form does not offer
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A save request is missing required rule sub-fields
    #[error("Malformed submission: {0}")]
    Submission(#[from] SubmissionError),

    /// Persisted metadata could not be read or written
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The anti-forgery token did not verify
    #[error("Request for action '{action}' failed token verification")]
    Forbidden { action: String },

    /// The host has no form with this id
    #[error("Form {0} not found")]
    FormNotFound(FormId),

    /// Configuration errors (missing env vars, unreadable files)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// Delivery through the host gateway failed
    #[error("Delivery error: {0}")]
    Delivery(String),
}

/// Why a rule failed validation against a form's fields
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("field {field} does not exist in the form")]
    UnknownField { field: FieldId },

    #[error("field {field} offers no choices to condition on")]
    NoChoices { field: FieldId },

    #[error("value '{value}' is not a choice of field {field}")]
    UnknownChoice { field: FieldId, value: String },
}

/// A save request that cannot be turned into rules
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("missing request parameter '{0}'")]
    MissingParameter(String),

    #[error("missing '{parameter}' for condition {index}")]
    MissingIndexedValue { parameter: String, index: String },

    #[error("invalid form id '{0}'")]
    InvalidFormId(String),
}

/// Failures of the persisted-metadata primitive
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("metadata for form {form} is corrupt: {source}")]
    Corrupt {
        form: FormId,
        source: serde_json::Error,
    },

    #[error("metadata backend unavailable: {0}")]
    Backend(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl NotifyError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a token verification error
    pub fn forbidden(action: impl Into<String>) -> Self {
        Self::Forbidden {
            action: action.into(),
        }
    }

    /// Create a delivery error
    pub fn delivery(message: impl Into<String>) -> Self {
        Self::Delivery(message.into())
    }

    /// Whether this error came from rule validation
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
