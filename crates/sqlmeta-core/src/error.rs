//! Error types.

use std::error::Error as StdError;
use std::fmt;

/// Errors raised by metadata resolution and field construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The name does not resolve to a registered or registerable model.
    ModelNotFound { model: String },
    /// The model resolves but has no such field or alias.
    FieldNotFound { model: String, field: String },
    /// A field declared by a model's schema hook is malformed.
    InvalidFieldEntry {
        model: String,
        field: String,
        reason: String,
    },
    /// The field exists but cannot contribute a join.
    NotJoinable { model: String, field: String },
    /// A field was constructed with unmet preconditions.
    Configuration(String),
}

impl Error {
    /// True for the two lookup misses callers routinely tolerate.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::ModelNotFound { .. } | Error::FieldNotFound { .. }
        )
    }

    pub(crate) fn invalid_entry(
        model: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidFieldEntry {
            model: model.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ModelNotFound { model } => write!(f, "model not found: {}", model),
            Error::FieldNotFound { model, field } => {
                write!(f, "field not found: {}.{}", model, field)
            }
            Error::InvalidFieldEntry {
                model,
                field,
                reason,
            } => write!(f, "invalid field entry {}.{}: {}", model, field, reason),
            Error::NotJoinable { model, field } => {
                write!(f, "field {}.{} cannot be joined", model, field)
            }
            Error::Configuration(msg) => write!(f, "configuration error: {}", msg),
        }
    }
}

impl StdError for Error {}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
