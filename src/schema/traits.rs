//! Traits for schema polymorphism.
//!
//! [`SchemaLike`] is implemented by every bundled schema type and lets them
//! nest inside each other. [`SchemaHandle`] is the narrower seam the hook
//! talks to: anything that can validate a whole field value, including
//! adapters over other schema libraries.

use serde_json::Value;

use crate::error::SchemaDefect;
use crate::path::JsonPath;
use crate::validation::{Normalized, ValidateOptions};

/// A schema that validates and coerces a JSON value at some path.
///
/// The `Send + Sync` bounds allow schemas to be shared across threads and
/// stored as `Box<dyn SchemaLike>` inside object and array schemas.
///
/// # Example
///
/// ```rust
/// use schemahook::{JsonPath, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("name", Schema::string().min_len(1))
///     .field("age", Schema::integer().positive());
///
/// let result = schema.validate(&json!({"name": "Ada", "age": "36"}), &JsonPath::root());
/// assert!(result.is_valid());
/// assert_eq!(result.value, json!({"name": "Ada", "age": 36}));
/// ```
pub trait SchemaLike: Send + Sync {
    /// Validates `value` located at `path` under the given options.
    ///
    /// The returned value is the coerced output even when violations are
    /// reported.
    fn validate_with(
        &self,
        value: &Value,
        path: &JsonPath,
        options: &ValidateOptions,
    ) -> Normalized;

    /// Validates with [`ValidateOptions::collect_all`].
    fn validate(&self, value: &Value, path: &JsonPath) -> Normalized {
        self.validate_with(value, path, &ValidateOptions::collect_all())
    }
}

impl<S: SchemaLike + ?Sized> SchemaLike for Box<S> {
    fn validate_with(
        &self,
        value: &Value,
        path: &JsonPath,
        options: &ValidateOptions,
    ) -> Normalized {
        (**self).validate_with(value, path, options)
    }
}

/// A per-field schema attached to a model field.
///
/// An `Err` means the schema could not run at all; ordinary rule failures are
/// reported through [`Normalized::errors`].
///
/// Every [`SchemaLike`] is a `SchemaHandle` validating from the root path.
/// Adapters for other schema libraries implement this trait directly.
pub trait SchemaHandle: Send + Sync {
    fn validate_value(
        &self,
        value: &Value,
        options: &ValidateOptions,
    ) -> Result<Normalized, SchemaDefect>;
}

impl<S: SchemaLike> SchemaHandle for S {
    fn validate_value(
        &self,
        value: &Value,
        options: &ValidateOptions,
    ) -> Result<Normalized, SchemaDefect> {
        Ok(self.validate_with(value, &JsonPath::root(), options))
    }
}
