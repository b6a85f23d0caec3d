//! Running one field's schema.

use serde_json::Value;
use tracing::debug;

use crate::error::{SchemaDefect, Violation};
use crate::schema::SchemaHandle;
use crate::validation::ValidateOptions;

/// The coerced value and the violations found for one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOutcome {
    /// The schema's normalized value, present even when `violations` is not empty.
    pub value: Value,
    /// Violations in the order the schema emitted them.
    pub violations: Vec<Violation>,
}

impl FieldOutcome {
    /// Returns `true` if the schema reported no violations.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Options every field validation uses: collect all violations and reject
/// unknown keys. Only default application is configurable.
pub fn field_options(apply_defaults: bool) -> ValidateOptions {
    ValidateOptions::collect_all().with_defaults(apply_defaults)
}

/// Validates one field value against its schema.
///
/// Rule failures come back in [`FieldOutcome::violations`]. An `Err` means
/// the schema could not run and is passed through untouched.
///
/// # Example
///
/// ```rust
/// use schemahook::{validate_field, Schema};
/// use serde_json::json;
///
/// let schema = Schema::integer().positive();
///
/// let outcome = validate_field(&schema, &json!("-3"), true).unwrap();
/// assert_eq!(outcome.value, json!(-3));
/// assert_eq!(outcome.violations.len(), 1);
/// ```
pub fn validate_field(
    schema: &dyn SchemaHandle,
    value: &Value,
    apply_defaults: bool,
) -> Result<FieldOutcome, SchemaDefect> {
    let normalized = schema.validate_value(value, &field_options(apply_defaults))?;
    debug!(violations = normalized.violation_count(), "schema validated");

    let (value, violations) = normalized.into_parts();
    Ok(FieldOutcome { value, violations })
}
