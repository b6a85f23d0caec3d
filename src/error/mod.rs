//! Error types.
//!
//! Schema-level [`Violation`]s are never raised on their own. A pass that
//! produces any of them raises exactly one [`ValidationError`] wrapped in
//! [`HookError::Validation`]. The remaining [`HookError`] variants are
//! integration defects and propagate as-is.

mod schema_error;
mod validation_error;

pub use schema_error::{Violation, Violations};
pub use validation_error::{InstanceRef, ValidationError, ValidationErrorItem, INVALID_SCHEMA};

/// A violation path that does not correspond to a location in the field value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// The segment at `depth` was missing while more segments remained.
    #[error("invalid path '{path}': segment {depth} does not exist")]
    InvalidPath { path: String, depth: usize },
}

/// A schema handle that could not run at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaDefect {
    /// The schema definition itself is unusable.
    #[error("malformed schema: {0}")]
    Malformed(String),
}

/// Errors surfaced by a validation pass.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    /// One or more changed fields violated their schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A violation path could not be walked in the field's value.
    #[error("field '{field}': {source}")]
    Path {
        field: String,
        #[source]
        source: PathError,
    },

    /// A field's schema handle failed to run.
    #[error("field '{field}': {source}")]
    Schema {
        field: String,
        #[source]
        source: SchemaDefect,
    },
}

impl HookError {
    /// Returns the aggregated failure if this is a validation abort.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            HookError::Validation(error) => Some(error),
            _ => None,
        }
    }

    /// Returns the aggregated failure, consuming the error.
    pub fn into_validation(self) -> Option<ValidationError> {
        match self {
            HookError::Validation(error) => Some(error),
            _ => None,
        }
    }
}

/// Errors raised while installing the hook.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    /// `install` was called without a host.
    #[error("the required host instance option is missing")]
    MissingHost,
}
