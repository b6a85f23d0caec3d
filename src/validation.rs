//! Options and results of a single schema validation call.
//!
//! [`ValidateOptions`] is passed down through every nested schema.
//! [`Normalized`] is what a schema hands back: the coerced value, always, plus
//! the violations found along the way, if any.

use serde_json::Value;
use stillwater::Validation;

use crate::error::{Violation, Violations};
use crate::ValidationResult;

/// Options controlling a schema validation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Stop at the first violation instead of collecting all of them.
    pub abort_early: bool,
    /// Accept object keys the schema does not declare.
    pub allow_unknown: bool,
    /// Fill declared defaults for missing object keys.
    pub apply_defaults: bool,
}

impl ValidateOptions {
    /// The options a validation pass always uses: collect every violation,
    /// reject unknown keys, apply defaults.
    pub fn collect_all() -> Self {
        Self {
            abort_early: false,
            allow_unknown: false,
            apply_defaults: true,
        }
    }

    /// Returns a copy with default application switched on or off.
    pub fn with_defaults(mut self, apply_defaults: bool) -> Self {
        self.apply_defaults = apply_defaults;
        self
    }
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self::collect_all()
    }
}

/// The result of validating one value.
///
/// `value` is the schema's normalized output. It is populated even when
/// `errors` is present, since schemas coerce what they can before failing on
/// the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub value: Value,
    pub errors: Option<Violations>,
}

impl Normalized {
    /// A clean result.
    pub fn valid(value: Value) -> Self {
        Self {
            value,
            errors: None,
        }
    }

    /// A result carrying the collected violations, clean if there are none.
    pub fn with_violations(value: Value, violations: Vec<Violation>) -> Self {
        Self {
            value,
            errors: Violations::from_vec(violations),
        }
    }

    /// A result with a single violation.
    pub fn invalid(value: Value, violation: Violation) -> Self {
        Self {
            value,
            errors: Some(Violations::single(violation)),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_none()
    }

    /// Number of violations.
    pub fn violation_count(&self) -> usize {
        self.errors.as_ref().map_or(0, Violations::len)
    }

    /// Splits into the coerced value and the violations as a plain vec.
    pub fn into_parts(self) -> (Value, Vec<Violation>) {
        let violations = self.errors.map(Violations::into_vec).unwrap_or_default();
        (self.value, violations)
    }

    /// Drops the coerced value on failure.
    pub fn into_validation(self) -> ValidationResult<Value> {
        match self.errors {
            None => Validation::Success(self.value),
            Some(errors) => Validation::Failure(errors),
        }
    }
}
