//! String schema validation.
//!
//! This module provides [`StringSchema`] for validating string values with
//! constraints like minimum/maximum length, regex patterns and email format,
//! plus trimming and case normalization.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::Violation;
use crate::path::JsonPath;
use crate::validation::{Normalized, ValidateOptions};

use super::labelled;
use super::traits::SchemaLike;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("email pattern compiles")
});

/// A constraint applied to string values.
#[derive(Clone)]
enum StringConstraint {
    MinLength {
        min: usize,
        message: Option<String>,
    },
    MaxLength {
        max: usize,
        message: Option<String>,
    },
    Length {
        len: usize,
        message: Option<String>,
    },
    Pattern {
        regex: Regex,
        message: Option<String>,
    },
    Email {
        message: Option<String>,
    },
}

/// Case conversion applied after trimming.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Case {
    Keep,
    Lower,
    Upper,
}

/// A schema for validating string values.
///
/// Normalization (trim, then case conversion) runs before any constraint, so
/// constraints see the normalized string and the normalized string is what
/// gets returned.
///
/// # Example
///
/// ```rust
/// use schemahook::{JsonPath, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::string().trim().lowercase().email();
///
/// let result = schema.validate(&json!("  Ada@Example.COM "), &JsonPath::root());
/// assert!(result.is_valid());
/// assert_eq!(result.value, json!("ada@example.com"));
/// ```
#[derive(Clone)]
pub struct StringSchema {
    constraints: Vec<StringConstraint>,
    type_error_message: Option<String>,
    trim: bool,
    case: Case,
}

impl StringSchema {
    /// Creates a new string schema with no constraints.
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
            type_error_message: None,
            trim: false,
            case: Case::Keep,
        }
    }

    /// Adds a minimum length constraint, in Unicode scalar values.
    pub fn min_len(mut self, min: usize) -> Self {
        self.constraints
            .push(StringConstraint::MinLength { min, message: None });
        self
    }

    /// Adds a maximum length constraint, in Unicode scalar values.
    pub fn max_len(mut self, max: usize) -> Self {
        self.constraints
            .push(StringConstraint::MaxLength { max, message: None });
        self
    }

    /// Requires exactly `len` characters.
    pub fn exact_len(mut self, len: usize) -> Self {
        self.constraints
            .push(StringConstraint::Length { len, message: None });
        self
    }

    /// Adds a regex pattern constraint.
    ///
    /// Returns an error if the regex pattern is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use schemahook::{JsonPath, Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let schema = Schema::string().pattern(r"^\d{5}$").unwrap();
    ///
    /// assert!(schema.validate(&json!("12345"), &JsonPath::root()).is_valid());
    ///
    /// let result = schema.validate(&json!("12"), &JsonPath::from_field("zip"));
    /// assert_eq!(
    ///     result.errors.unwrap().first().message,
    ///     "\"zip\" with value \"12\" fails to match the required pattern: /^\\d{5}$/"
    /// );
    /// ```
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        self.constraints.push(StringConstraint::Pattern {
            regex,
            message: None,
        });
        Ok(self)
    }

    /// Requires an email address shape (`local@domain.tld`).
    pub fn email(mut self) -> Self {
        self.constraints
            .push(StringConstraint::Email { message: None });
        self
    }

    /// Strips leading and trailing whitespace before validation.
    pub fn trim(mut self) -> Self {
        self.trim = true;
        self
    }

    /// Converts to lowercase before validation.
    pub fn lowercase(mut self) -> Self {
        self.case = Case::Lower;
        self
    }

    /// Converts to uppercase before validation.
    pub fn uppercase(mut self) -> Self {
        self.case = Case::Upper;
        self
    }

    /// Sets the constraint text for the most recent constraint.
    ///
    /// If no constraints have been added yet, this sets the type error text.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            match last {
                StringConstraint::MinLength { message: m, .. } => *m = Some(message.into()),
                StringConstraint::MaxLength { message: m, .. } => *m = Some(message.into()),
                StringConstraint::Length { message: m, .. } => *m = Some(message.into()),
                StringConstraint::Pattern { message: m, .. } => *m = Some(message.into()),
                StringConstraint::Email { message: m } => *m = Some(message.into()),
            }
        } else {
            self.type_error_message = Some(message.into());
        }
        self
    }

    fn normalize(&self, s: &str) -> String {
        let s = if self.trim { s.trim() } else { s };
        match self.case {
            Case::Keep => s.to_string(),
            Case::Lower => s.to_lowercase(),
            Case::Upper => s.to_uppercase(),
        }
    }
}

impl Default for StringSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for StringSchema {
    fn validate_with(
        &self,
        value: &Value,
        path: &JsonPath,
        options: &ValidateOptions,
    ) -> Normalized {
        let s = match value.as_str() {
            Some(s) => self.normalize(s),
            None => {
                let text = self
                    .type_error_message
                    .as_deref()
                    .unwrap_or("must be a string");
                return Normalized::invalid(
                    value.clone(),
                    Violation::new(path.clone(), labelled(path, text))
                        .with_code("string.base")
                        .with_value(value.clone()),
                );
            }
        };

        let mut violations = Vec::new();
        for constraint in &self.constraints {
            if let Some(violation) = check_constraint(constraint, &s, path) {
                violations.push(violation);
                if options.abort_early {
                    break;
                }
            }
        }

        Normalized::with_violations(Value::String(s), violations)
    }
}

/// Checks a single constraint and returns a violation if it fails.
fn check_constraint(
    constraint: &StringConstraint,
    value: &str,
    path: &JsonPath,
) -> Option<Violation> {
    let len = value.chars().count();
    let (failed, default_text, code, message) = match constraint {
        StringConstraint::MinLength { min, message } => (
            len < *min,
            format!("length must be at least {} characters long", min),
            "string.min",
            message,
        ),
        StringConstraint::MaxLength { max, message } => (
            len > *max,
            format!("length must be less than or equal to {} characters long", max),
            "string.max",
            message,
        ),
        StringConstraint::Length { len: want, message } => (
            len != *want,
            format!("length must be {} characters long", want),
            "string.length",
            message,
        ),
        StringConstraint::Pattern { regex, message } => (
            !regex.is_match(value),
            format!(
                "with value \"{}\" fails to match the required pattern: /{}/",
                value,
                regex.as_str()
            ),
            "string.pattern.base",
            message,
        ),
        StringConstraint::Email { message } => (
            !EMAIL.is_match(value),
            "must be a valid email".to_string(),
            "string.email",
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
            .with_value(Value::String(value.to_string())),
    )
}
