//! Integer schema validation.
//!
//! This module provides [`IntegerSchema`] for validating integer values with
//! constraints like minimum/maximum value and sign requirements. Numeric
//! strings are converted before the constraints run.

use serde_json::{Number, Value};
use std::ops::RangeInclusive;

use crate::error::Violation;
use crate::path::JsonPath;
use crate::validation::{Normalized, ValidateOptions};

use super::labelled;
use super::traits::SchemaLike;

/// A constraint applied to integer values.
#[derive(Clone)]
enum IntegerConstraint {
    Min { value: i64, message: Option<String> },
    Max { value: i64, message: Option<String> },
    Positive { message: Option<String> },
    NonNegative { message: Option<String> },
    Negative { message: Option<String> },
}

/// A schema for validating integer values.
///
/// `IntegerSchema` accepts JSON integers and strings holding an integer, and
/// normalizes both to a JSON number. All constraint violations are
/// accumulated unless the options ask to abort early.
///
/// # Example
///
/// ```rust
/// use schemahook::{JsonPath, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::integer().min(0).max(100);
///
/// let result = schema.validate(&json!("42"), &JsonPath::root());
/// assert!(result.is_valid());
/// assert_eq!(result.value, json!(42));
///
/// let result = schema.validate(&json!(-50), &JsonPath::from_field("score"));
/// assert_eq!(
///     result.errors.unwrap().first().message,
///     "\"score\" must be greater than or equal to 0"
/// );
/// ```
#[derive(Clone)]
pub struct IntegerSchema {
    constraints: Vec<IntegerConstraint>,
    type_error_message: Option<String>,
}

impl IntegerSchema {
    /// Creates a new integer schema with no constraints.
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
            type_error_message: None,
        }
    }

    /// Adds a minimum value constraint (inclusive).
    pub fn min(mut self, value: i64) -> Self {
        self.constraints.push(IntegerConstraint::Min {
            value,
            message: None,
        });
        self
    }

    /// Adds a maximum value constraint (inclusive).
    pub fn max(mut self, value: i64) -> Self {
        self.constraints.push(IntegerConstraint::Max {
            value,
            message: None,
        });
        self
    }

    /// Adds both minimum and maximum value constraints (inclusive range).
    ///
    /// This is a convenience method equivalent to calling `.min(start).max(end)`.
    pub fn range(self, range: RangeInclusive<i64>) -> Self {
        self.min(*range.start()).max(*range.end())
    }

    /// Adds a positive value constraint. The integer must be greater than 0.
    ///
    /// # Example
    ///
    /// ```rust
    /// use schemahook::{JsonPath, Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let schema = Schema::integer().positive();
    ///
    /// assert!(schema.validate(&json!(5), &JsonPath::root()).is_valid());
    /// assert!(!schema.validate(&json!(0), &JsonPath::root()).is_valid());
    /// ```
    pub fn positive(mut self) -> Self {
        self.constraints
            .push(IntegerConstraint::Positive { message: None });
        self
    }

    /// Adds a non-negative value constraint.
    pub fn non_negative(mut self) -> Self {
        self.constraints
            .push(IntegerConstraint::NonNegative { message: None });
        self
    }

    /// Adds a negative value constraint. The integer must be less than 0.
    pub fn negative(mut self) -> Self {
        self.constraints
            .push(IntegerConstraint::Negative { message: None });
        self
    }

    /// Sets the constraint text for the most recent constraint.
    ///
    /// If no constraints have been added yet, this sets the type error text.
    /// The text is prefixed with the quoted label like built-in messages are.
    ///
    /// # Example
    ///
    /// ```rust
    /// use schemahook::{JsonPath, Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let schema = Schema::integer().min(18).error("must be an adult age");
    ///
    /// let result = schema.validate(&json!(16), &JsonPath::from_field("age"));
    /// assert_eq!(result.errors.unwrap().first().message, "\"age\" must be an adult age");
    /// ```
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            match last {
                IntegerConstraint::Min { message: m, .. } => *m = Some(message.into()),
                IntegerConstraint::Max { message: m, .. } => *m = Some(message.into()),
                IntegerConstraint::Positive { message: m } => *m = Some(message.into()),
                IntegerConstraint::NonNegative { message: m } => *m = Some(message.into()),
                IntegerConstraint::Negative { message: m } => *m = Some(message.into()),
            }
        } else {
            self.type_error_message = Some(message.into());
        }
        self
    }

    fn type_violation(&self, path: &JsonPath, default: &str, code: &str, got: &Value) -> Violation {
        let text = self.type_error_message.as_deref().unwrap_or(default);
        Violation::new(path.clone(), labelled(path, text))
            .with_code(code)
            .with_value(got.clone())
    }
}

impl Default for IntegerSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for IntegerSchema {
    fn validate_with(
        &self,
        value: &Value,
        path: &JsonPath,
        options: &ValidateOptions,
    ) -> Normalized {
        let n = match to_number(value) {
            Some(Converted::Integer(n)) => n,
            Some(Converted::Fraction(f)) => {
                let coerced = Number::from_f64(f).map_or_else(|| value.clone(), Value::Number);
                let violation =
                    self.type_violation(path, "must be an integer", "number.integer", &coerced);
                return Normalized::invalid(coerced, violation);
            }
            Some(Converted::Unsafe) => {
                let violation =
                    self.type_violation(path, "must be a safe number", "number.unsafe", value);
                return Normalized::invalid(value.clone(), violation);
            }
            None => {
                let violation = self.type_violation(path, "must be a number", "number.base", value);
                return Normalized::invalid(value.clone(), violation);
            }
        };

        let coerced = Value::Number(n.into());
        let mut violations = Vec::new();
        for constraint in &self.constraints {
            if let Some(violation) = check_constraint(constraint, n, path) {
                violations.push(violation);
                if options.abort_early {
                    break;
                }
            }
        }

        Normalized::with_violations(coerced, violations)
    }
}

/// A value read as a number.
enum Converted {
    Integer(i64),
    Fraction(f64),
    Unsafe,
}

/// Reads JSON numbers and numeric strings.
fn to_number(value: &Value) -> Option<Converted> {
    match value {
        Value::Number(num) => {
            if let Some(n) = num.as_i64() {
                Some(Converted::Integer(n))
            } else if num.is_u64() {
                Some(Converted::Unsafe)
            } else {
                num.as_f64().map(Converted::Fraction)
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if let Ok(n) = trimmed.parse::<i64>() {
                Some(Converted::Integer(n))
            } else {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| {
                        if f.fract() != 0.0 {
                            Converted::Fraction(f)
                        } else if f >= i64::MIN as f64 && f < i64::MAX as f64 {
                            Converted::Integer(f as i64)
                        } else {
                            Converted::Unsafe
                        }
                    })
            }
        }
        _ => None,
    }
}

/// Checks a single constraint and returns a violation if it fails.
fn check_constraint(
    constraint: &IntegerConstraint,
    value: i64,
    path: &JsonPath,
) -> Option<Violation> {
    let (failed, default_text, code, message) = match constraint {
        IntegerConstraint::Min { value: min, message } => (
            value < *min,
            format!("must be greater than or equal to {}", min),
            "number.min",
            message,
        ),
        IntegerConstraint::Max { value: max, message } => (
            value > *max,
            format!("must be less than or equal to {}", max),
            "number.max",
            message,
        ),
        IntegerConstraint::Positive { message } => (
            value <= 0,
            "must be a positive number".to_string(),
            "number.positive",
            message,
        ),
        IntegerConstraint::NonNegative { message } => (
            value < 0,
            "must be greater than or equal to 0".to_string(),
            "number.min",
            message,
        ),
        IntegerConstraint::Negative { message } => (
            value >= 0,
            "must be a negative number".to_string(),
            "number.negative",
            message,
        ),
    };

    if !failed {
        return None;
    }

    let text = message.as_deref().unwrap_or(&default_text);
    Some(
        Violation::new(path.clone(), labelled(path, text))
            .with_code(code)
            .with_value(Value::Number(value.into())),
    )
}
