//! The aggregated failure raised to the lifecycle owner.
//!
//! [`ValidationErrorItem`] is one translated violation; [`ValidationError`] is
//! the single composite error carrying every item produced by one pass.

use std::fmt::{self, Display};

use serde_json::Value;
use stillwater::prelude::*;

/// Kind tag carried by every item this crate produces.
pub const INVALID_SCHEMA: &str = "invalid schema";

/// Identifies the instance an item came from.
///
/// Items do not own or borrow the instance; this is a detached snapshot of
/// its identity for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceRef {
    /// The entity's type name (e.g. `Account`).
    pub type_name: String,
    /// The instance's key, when the host knows one.
    pub key: Option<String>,
}

impl InstanceRef {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            key: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

impl Display for InstanceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.key {
            Some(key) => write!(f, "{}({})", self.type_name, key),
            None => write!(f, "{}", self.type_name),
        }
    }
}

/// One field-level validation failure, ready for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrorItem {
    /// `Type.field.sub.path` followed by the schema's constraint text.
    pub message: String,
    /// Always [`INVALID_SCHEMA`].
    pub kind: &'static str,
    /// Dot-joined path: `field.sub.path`.
    pub path: String,
    /// The offending value; `None` when it is absent from the field's value.
    pub value: Option<Value>,
    /// The instance the field belongs to.
    pub instance: InstanceRef,
}

impl Display for ValidationErrorItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// The single composite failure of a validation pass.
///
/// Never empty: a pass that produced no items does not build one.
///
/// # Example
///
/// ```rust
/// use schemahook::{InstanceRef, ValidationError, ValidationErrorItem, INVALID_SCHEMA};
/// use serde_json::json;
///
/// assert!(ValidationError::from_items(Vec::new()).is_none());
///
/// let item = ValidationErrorItem {
///     message: "Account.age must be a positive number".to_string(),
///     kind: INVALID_SCHEMA,
///     path: "age".to_string(),
///     value: Some(json!(-3)),
///     instance: InstanceRef::new("Account"),
/// };
/// let error = ValidationError::from_items(vec![item]).unwrap();
/// assert_eq!(error.len(), 1);
/// assert_eq!(error.first().path, "age");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError(NonEmptyVec<ValidationErrorItem>);

impl ValidationError {
    /// Creates a failure holding a single item.
    pub fn single(item: ValidationErrorItem) -> Self {
        Self(NonEmptyVec::singleton(item))
    }

    /// Builds a failure from the accumulated items, or `None` if there are none.
    pub fn from_items(items: Vec<ValidationErrorItem>) -> Option<Self> {
        NonEmptyVec::from_vec(items).map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Items in field-visit order, then schema emission order.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationErrorItem> {
        self.0.iter()
    }

    pub fn first(&self) -> &ValidationErrorItem {
        self.0.head()
    }

    /// Returns every item whose path equals `path`.
    pub fn at_path(&self, path: &str) -> Vec<&ValidationErrorItem> {
        self.0.iter().filter(|item| item.path == path).collect()
    }

    /// Returns every item whose path is `field` or lies beneath it.
    pub fn for_field(&self, field: &str) -> Vec<&ValidationErrorItem> {
        self.0
            .iter()
            .filter(|item| {
                item.path == field
                    || item
                        .path
                        .strip_prefix(field)
                        .is_some_and(|rest| rest.starts_with('.'))
            })
            .collect()
    }

    pub fn into_vec(self) -> Vec<ValidationErrorItem> {
        self.0.into_vec()
    }
}

impl Semigroup for ValidationError {
    fn combine(self, other: Self) -> Self {
        ValidationError(self.0.combine(other.0))
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.len())?;
        for (i, item) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, item)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl IntoIterator for ValidationError {
    type Item = ValidationErrorItem;
    type IntoIter = std::vec::IntoIter<ValidationErrorItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidationError>();
    assert_sync::<ValidationError>();
};
