//! Schema violation types.
//!
//! This module provides [`Violation`] for a single rule failure reported by a
//! schema and [`Violations`] for the ordered, non-empty list a schema returns.

use std::fmt::{self, Display};

use serde_json::Value;
use stillwater::prelude::*;

use crate::path::JsonPath;

/// A single schema rule failure inside a field's value.
///
/// `Violation` captures:
/// - **path**: where inside the field's value the rule failed
/// - **message**: `"<label>" <constraint text>`
/// - **value**: the offending value, when the schema attached it
/// - **code**: machine-readable rule name (e.g. `number.positive`)
///
/// # Example
///
/// ```rust
/// use schemahook::{JsonPath, Violation};
/// use serde_json::json;
///
/// let violation = Violation::new(
///     JsonPath::root().push_field("zip"),
///     "\"zip\" length must be 5 characters long",
/// )
/// .with_code("string.length")
/// .with_value(json!("12"));
///
/// assert_eq!(violation.code, "string.length");
/// assert_eq!(violation.value, Some(json!("12")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// The path to the value that failed validation, relative to the field.
    pub path: JsonPath,
    /// Human-readable error message.
    pub message: String,
    /// The offending value, if the schema attached it.
    pub value: Option<Value>,
    /// Machine-readable rule name.
    pub code: String,
}

impl Violation {
    /// Creates a new violation with the given path and message.
    ///
    /// The code defaults to `any.invalid`.
    pub fn new(path: JsonPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            value: None,
            code: "any.invalid".to_string(),
        }
    }

    /// Sets the rule code and returns self for chaining.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Attaches the offending value and returns self for chaining.
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Violation {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Violation>();
    assert_sync::<Violation>();
};

/// A non-empty, ordered list of violations.
///
/// Order is the order the schema emitted them in.
///
/// ```rust
/// use schemahook::{JsonPath, Violation, Violations};
/// use stillwater::prelude::*;
///
/// let a = Violations::single(Violation::new(
///     JsonPath::from_field("name"),
///     "\"name\" is required",
/// ));
/// let b = Violations::single(Violation::new(
///     JsonPath::from_field("age"),
///     "\"age\" is required",
/// ));
///
/// let combined = a.combine(b);
/// assert_eq!(combined.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Violations(NonEmptyVec<Violation>);

impl Violations {
    /// Creates a `Violations` containing a single violation.
    pub fn single(violation: Violation) -> Self {
        Self(NonEmptyVec::singleton(violation))
    }

    /// Builds a `Violations` from a vec, or `None` when the vec is empty.
    pub fn from_vec(violations: Vec<Violation>) -> Option<Self> {
        NonEmptyVec::from_vec(violations).map(Self)
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the violations in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    /// Returns every violation at the given path.
    pub fn at_path(&self, path: &JsonPath) -> Vec<&Violation> {
        self.0.iter().filter(|v| &v.path == path).collect()
    }

    /// Returns every violation with the given code.
    pub fn with_code(&self, code: &str) -> Vec<&Violation> {
        self.0.iter().filter(|v| v.code == code).collect()
    }

    /// Returns the first violation.
    pub fn first(&self) -> &Violation {
        self.0.head()
    }

    /// Converts into a plain vec, preserving order.
    pub fn into_vec(self) -> Vec<Violation> {
        self.0.into_vec()
    }
}

impl Semigroup for Violations {
    fn combine(self, other: Self) -> Self {
        Violations(self.0.combine(other.0))
    }
}

impl Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} schema violation(s):", self.len())?;
        for (i, violation) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Violations>();
    assert_sync::<Violations>();
};
