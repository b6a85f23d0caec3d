//! Paths into nested field values.
//!
//! This module provides [`JsonPath`] and [`PathSegment`] for locating a value
//! inside a structured field, and the resolver that walks a path back into a
//! value to recover the exact offending sub-value of a violation.

use std::fmt::{self, Display};

use serde_json::Value;

use crate::error::PathError;

/// A segment of a path.
///
/// Paths are built from segments that represent either field access or array indexing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A field/property access (e.g., `address`, `zip`)
    Field(String),
    /// An array index access (e.g., `[0]`, `[42]`)
    Index(usize),
}

impl PathSegment {
    /// Creates a new field segment.
    pub fn field(name: impl Into<String>) -> Self {
        PathSegment::Field(name.into())
    }

    /// Creates a new index segment.
    pub fn index(idx: usize) -> Self {
        PathSegment::Index(idx)
    }
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => write!(f, "{}", name),
            PathSegment::Index(idx) => write!(f, "{}", idx),
        }
    }
}

/// A path to a value inside a field's value.
///
/// The `Display` form (`tags[0].label`) is the human label used in schema
/// messages. [`JsonPath::dotted`] gives the dot-joined form (`tags.0.label`)
/// used for error paths.
///
/// # Example
///
/// ```rust
/// use schemahook::JsonPath;
///
/// let path = JsonPath::root()
///     .push_field("tags")
///     .push_index(0)
///     .push_field("label");
///
/// assert_eq!(path.to_string(), "tags[0].label");
/// assert_eq!(path.dotted(), "tags.0.label");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// Creates an empty path representing the root value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from a single field segment.
    pub fn from_field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Field(name.into())],
        }
    }

    /// Returns a new path with a field segment appended.
    ///
    /// This method does not modify the original path; it returns a new one.
    pub fn push_field(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Field(name.into()));
        Self { segments }
    }

    /// Returns a new path with an index segment appended.
    ///
    /// This method does not modify the original path; it returns a new one.
    pub fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Returns true if this is the root path (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Returns the last segment, or None if this is root.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Joins every segment with `.`, rendering indexes as plain numbers.
    pub fn dotted(&self) -> String {
        self.segments
            .iter()
            .map(|segment| segment.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Label used in schema messages: the display form, or `value` at the root.
    pub fn label(&self) -> String {
        if self.is_root() {
            "value".to_string()
        } else {
            self.to_string()
        }
    }

    /// Walks this path into `root`.
    ///
    /// The walk is index based and never consumes the path. A missing final
    /// segment is [`Lookup::Absent`]; a missing intermediate segment is
    /// [`Lookup::InvalidPath`]. An empty path resolves to `root` itself.
    ///
    /// # Example
    ///
    /// ```rust
    /// use schemahook::{JsonPath, Lookup};
    /// use serde_json::json;
    ///
    /// let value = json!({"address": {"zip": "12"}});
    ///
    /// let zip = JsonPath::root().push_field("address").push_field("zip");
    /// assert_eq!(zip.resolve(&value), Lookup::Found(&json!("12")));
    ///
    /// let city = JsonPath::root().push_field("address").push_field("city");
    /// assert_eq!(city.resolve(&value), Lookup::Absent);
    ///
    /// let deep = JsonPath::root().push_field("phone").push_field("area");
    /// assert_eq!(deep.resolve(&value), Lookup::InvalidPath { depth: 0 });
    /// ```
    pub fn resolve<'a>(&self, root: &'a Value) -> Lookup<'a> {
        let mut current = root;
        let last = self.segments.len().saturating_sub(1);

        for (depth, segment) in self.segments.iter().enumerate() {
            match step(current, segment) {
                Some(next) => current = next,
                None if depth == last => return Lookup::Absent,
                None => return Lookup::InvalidPath { depth },
            }
        }

        Lookup::Found(current)
    }
}

/// Descends one segment. Numeric field names index arrays and index segments
/// address object keys by their decimal form.
fn step<'a>(value: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    match (segment, value) {
        (PathSegment::Field(key), Value::Object(map)) => map.get(key),
        (PathSegment::Field(key), Value::Array(items)) => {
            key.parse::<usize>().ok().and_then(|idx| items.get(idx))
        }
        (PathSegment::Index(idx), Value::Array(items)) => items.get(*idx),
        (PathSegment::Index(idx), Value::Object(map)) => map.get(&idx.to_string()),
        _ => None,
    }
}

impl Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

impl FromIterator<PathSegment> for JsonPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

/// Outcome of walking a path into a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    /// The path led to a value.
    Found(&'a Value),
    /// Every segment but the last existed; the leaf itself is missing.
    Absent,
    /// The segment at `depth` was missing while more segments remained.
    InvalidPath { depth: usize },
}

impl<'a> Lookup<'a> {
    /// Converts the lookup into a `Result`, treating an absent leaf as `None`.
    pub fn into_result(self, path: &JsonPath) -> Result<Option<&'a Value>, PathError> {
        match self {
            Lookup::Found(value) => Ok(Some(value)),
            Lookup::Absent => Ok(None),
            Lookup::InvalidPath { depth } => Err(PathError::InvalidPath {
                path: path.dotted(),
                depth,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_root_path_is_empty() {
        let path = JsonPath::root();
        assert!(path.is_root());
        assert!(path.is_empty());
        assert_eq!(path.len(), 0);
        assert_eq!(path.to_string(), "");
        assert_eq!(path.dotted(), "");
        assert_eq!(path.label(), "value");
    }

    #[test]
    fn test_field_with_index() {
        let path = JsonPath::root().push_field("users").push_index(0);
        assert_eq!(path.to_string(), "users[0]");
        assert_eq!(path.dotted(), "users.0");
    }

    #[test]
    fn test_path_immutability() {
        let base = JsonPath::root().push_field("users");
        let path_a = base.push_index(0);
        let path_b = base.push_index(1);

        assert_eq!(base.to_string(), "users");
        assert_eq!(path_a.to_string(), "users[0]");
        assert_eq!(path_b.to_string(), "users[1]");
    }

    #[test]
    fn test_last_segment() {
        let path = JsonPath::root().push_field("users").push_index(0);
        assert_eq!(path.last(), Some(&PathSegment::Index(0)));
        assert_eq!(JsonPath::root().last(), None);
    }

    #[test]
    fn test_collect_from_segments() {
        let path: JsonPath = vec![PathSegment::field("a"), PathSegment::index(2)]
            .into_iter()
            .collect();
        assert_eq!(path, JsonPath::root().push_field("a").push_index(2));
    }

    #[test]
    fn test_resolve_empty_path_returns_root() {
        let value = json!({"a": 1});
        assert_eq!(JsonPath::root().resolve(&value), Lookup::Found(&value));
    }

    #[test]
    fn test_resolve_nested_value() {
        let value = json!({"a": {"b": [10, {"c": "deep"}]}});
        let path = JsonPath::root()
            .push_field("a")
            .push_field("b")
            .push_index(1)
            .push_field("c");
        assert_eq!(path.resolve(&value), Lookup::Found(&json!("deep")));
    }

    #[test]
    fn test_resolve_absent_leaf() {
        let value = json!({"a": {}});
        let path = JsonPath::root().push_field("a").push_field("missing");
        assert_eq!(path.resolve(&value), Lookup::Absent);
        assert_eq!(path.resolve(&value).into_result(&path), Ok(None));
    }

    #[test]
    fn test_resolve_invalid_intermediate() {
        let value = json!({"a": {}});
        let path = JsonPath::root()
            .push_field("a")
            .push_field("b")
            .push_field("c");
        assert_eq!(path.resolve(&value), Lookup::InvalidPath { depth: 1 });

        let err = path.resolve(&value).into_result(&path).unwrap_err();
        assert_eq!(
            err,
            PathError::InvalidPath {
                path: "a.b.c".to_string(),
                depth: 1
            }
        );
    }

    #[test]
    fn test_resolve_null_leaf_is_found() {
        let value = json!({"a": null});
        let path = JsonPath::root().push_field("a");
        assert_eq!(path.resolve(&value), Lookup::Found(&Value::Null));
    }

    #[test]
    fn test_resolve_through_scalar_is_invalid() {
        let value = json!({"a": "text"});
        let path = JsonPath::root().push_field("a").push_field("b").push_field("c");
        assert_eq!(path.resolve(&value), Lookup::InvalidPath { depth: 1 });
    }

    #[test]
    fn test_resolve_numeric_field_into_array() {
        let value = json!({"items": ["x", "y"]});
        let path = JsonPath::root().push_field("items").push_field("1");
        assert_eq!(path.resolve(&value), Lookup::Found(&json!("y")));
    }

    #[test]
    fn test_resolve_does_not_consume_path() {
        let value = json!({"a": {"b": 1}});
        let path = JsonPath::root().push_field("a").push_field("b");
        let _ = path.resolve(&value);
        let _ = path.resolve(&value);
        assert_eq!(path.len(), 2);
    }
}
