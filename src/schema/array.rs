//! Array schema validation.
//!
//! This module provides [`ArraySchema`] for validating arrays with an item
//! schema, length constraints, and uniqueness.

use serde_json::Value;

use crate::error::Violation;
use crate::path::JsonPath;
use crate::validation::{Normalized, ValidateOptions};

use super::labelled;
use super::traits::SchemaLike;

/// A constraint applied to array values.
enum ArrayConstraint {
    MinLength { min: usize, message: Option<String> },
    MaxLength { max: usize, message: Option<String> },
    Unique { message: Option<String> },
}

/// A schema for validating array values.
///
/// Items are validated and coerced in order with index paths (`tags[1]`).
///
/// # Example
///
/// ```rust
/// use schemahook::{JsonPath, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::array(Schema::string().trim().min_len(1)).max_len(3);
///
/// let result = schema.validate(&json!([" a ", "b"]), &JsonPath::root());
/// assert_eq!(result.value, json!(["a", "b"]));
///
/// let result = schema.validate(&json!(["a", " "]), &JsonPath::from_field("tags"));
/// let violations = result.errors.unwrap();
/// assert_eq!(violations.first().path.dotted(), "tags.1");
/// ```
pub struct ArraySchema<S> {
    item_schema: S,
    constraints: Vec<ArrayConstraint>,
    type_error_message: Option<String>,
}

impl<S: SchemaLike> ArraySchema<S> {
    /// Creates a new array schema with the given item schema.
    pub fn new(item_schema: S) -> Self {
        Self {
            item_schema,
            constraints: Vec::new(),
            type_error_message: None,
        }
    }

    /// The array must have at least `min` items.
    pub fn min_len(mut self, min: usize) -> Self {
        self.constraints
            .push(ArrayConstraint::MinLength { min, message: None });
        self
    }

    /// The array must have at most `max` items.
    pub fn max_len(mut self, max: usize) -> Self {
        self.constraints
            .push(ArrayConstraint::MaxLength { max, message: None });
        self
    }

    /// Shorthand for `min_len(1)`.
    pub fn non_empty(self) -> Self {
        self.min_len(1)
    }

    /// Rejects repeated items, reporting each repeat at its own index.
    ///
    /// Items are compared after coercion.
    pub fn unique(mut self) -> Self {
        self.constraints.push(ArrayConstraint::Unique { message: None });
        self
    }

    /// Sets the constraint text for the most recent constraint, or the type
    /// error text if there is none.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            match last {
                ArrayConstraint::MinLength { message: m, .. } => *m = Some(message.into()),
                ArrayConstraint::MaxLength { message: m, .. } => *m = Some(message.into()),
                ArrayConstraint::Unique { message: m } => *m = Some(message.into()),
            }
        } else {
            self.type_error_message = Some(message.into());
        }
        self
    }
}

impl<S: SchemaLike> SchemaLike for ArraySchema<S> {
    fn validate_with(
        &self,
        value: &Value,
        path: &JsonPath,
        options: &ValidateOptions,
    ) -> Normalized {
        let arr = match value.as_array() {
            Some(a) => a,
            None => {
                let text = self
                    .type_error_message
                    .as_deref()
                    .unwrap_or("must be an array");
                return Normalized::invalid(
                    value.clone(),
                    Violation::new(path.clone(), labelled(path, text))
                        .with_code("array.base")
                        .with_value(value.clone()),
                );
            }
        };

        let mut violations = Vec::new();
        let mut items = Vec::with_capacity(arr.len());

        for (index, item) in arr.iter().enumerate() {
            let item_path = path.push_index(index);
            let (coerced, errors) = self
                .item_schema
                .validate_with(item, &item_path, options)
                .into_parts();
            items.push(coerced);
            violations.extend(errors);
        }

        for constraint in &self.constraints {
            match constraint {
                ArrayConstraint::MinLength { min, message } if arr.len() < *min => {
                    let text = message
                        .clone()
                        .unwrap_or_else(|| format!("must contain at least {} items", min));
                    violations.push(
                        Violation::new(path.clone(), labelled(path, &text))
                            .with_code("array.min")
                            .with_value(value.clone()),
                    );
                }
                ArrayConstraint::MaxLength { max, message } if arr.len() > *max => {
                    let text = message.clone().unwrap_or_else(|| {
                        format!("must contain less than or equal to {} items", max)
                    });
                    violations.push(
                        Violation::new(path.clone(), labelled(path, &text))
                            .with_code("array.max")
                            .with_value(value.clone()),
                    );
                }
                ArrayConstraint::Unique { message } => {
                    for (index, item) in items.iter().enumerate() {
                        if items[..index].contains(item) {
                            let item_path = path.push_index(index);
                            let text = message.as_deref().unwrap_or("contains a duplicate value");
                            violations.push(
                                Violation::new(item_path.clone(), labelled(&item_path, text))
                                    .with_code("array.unique")
                                    .with_value(item.clone()),
                            );
                        }
                    }
                }
                _ => {}
            }
        }

        if options.abort_early && !violations.is_empty() {
            violations.truncate(1);
        }

        Normalized::with_violations(Value::Array(items), violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{IntegerSchema, StringSchema};
    use serde_json::json;

    fn codes(result: &Normalized) -> Vec<String> {
        result
            .errors
            .iter()
            .flat_map(|e| e.iter().map(|v| v.code.clone()))
            .collect()
    }

    #[test]
    fn test_rejects_non_array() {
        let schema = ArraySchema::new(StringSchema::new());
        let result = schema.validate(&json!("x"), &JsonPath::from_field("tags"));
        assert_eq!(codes(&result), vec!["array.base"]);
        assert_eq!(result.errors.unwrap().first().message, "\"tags\" must be an array");
    }

    #[test]
    fn test_coerces_items() {
        let schema = ArraySchema::new(IntegerSchema::new());
        let result = schema.validate(&json!(["1", 2, "3"]), &JsonPath::root());
        assert!(result.is_valid());
        assert_eq!(result.value, json!([1, 2, 3]));
    }

    #[test]
    fn test_item_violations_use_index_paths() {
        let schema = ArraySchema::new(IntegerSchema::new().positive());
        let result = schema.validate(&json!([1, -2, 3, -4]), &JsonPath::from_field("n"));
        let violations = result.errors.unwrap();
        let paths: Vec<_> = violations.iter().map(|v| v.path.dotted()).collect();
        assert_eq!(paths, vec!["n.1", "n.3"]);
        assert_eq!(violations.first().message, "\"n[1]\" must be a positive number");
    }

    #[test]
    fn test_length_constraints() {
        let schema = ArraySchema::new(IntegerSchema::new()).non_empty().max_len(2);

        assert_eq!(codes(&schema.validate(&json!([]), &JsonPath::root())), vec!["array.min"]);
        assert_eq!(
            codes(&schema.validate(&json!([1, 2, 3]), &JsonPath::root())),
            vec!["array.max"]
        );
    }

    #[test]
    fn test_unique_after_coercion() {
        let schema = ArraySchema::new(IntegerSchema::new()).unique();
        let result = schema.validate(&json!([1, "1", 2]), &JsonPath::root());
        let violations = result.errors.unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations.first().path.dotted(), "1");
        assert_eq!(violations.first().value, Some(json!(1)));
    }
}
