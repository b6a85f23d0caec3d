//! Object schema validation.
//!
//! This module provides [`ObjectSchema`] for validating JSON objects with
//! typed fields, optional fields, default values, and unknown-key handling.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::Violation;
use crate::path::JsonPath;
use crate::validation::{Normalized, ValidateOptions};

use super::labelled;
use super::traits::SchemaLike;

/// Definition of a field within an object schema.
struct FieldDef {
    schema: Box<dyn SchemaLike>,
    required: bool,
    default: Option<Value>,
}

/// How to handle keys not declared in the schema.
enum AdditionalProperties {
    /// Follow [`ValidateOptions::allow_unknown`].
    Inherit,
    /// Accept unknown keys as-is.
    Allow,
    /// Reject unknown keys.
    Deny,
    /// Validate unknown keys against a schema.
    Validate(Box<dyn SchemaLike>),
}

/// A schema for validating JSON objects.
///
/// Declared fields are checked in declaration order, then unknown keys in the
/// input's order. Unknown keys are rejected unless the schema or the options
/// allow them.
///
/// # Example
///
/// ```rust
/// use schemahook::{JsonPath, Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("zip", Schema::string().pattern(r"^\d{5}$").unwrap())
///     .default("country", Schema::string(), json!("US"));
///
/// let result = schema.validate(&json!({"zip": "12345"}), &JsonPath::root());
/// assert!(result.is_valid());
/// assert_eq!(result.value, json!({"zip": "12345", "country": "US"}));
///
/// let result = schema.validate(&json!({"zip": "12345", "floor": 3}), &JsonPath::root());
/// assert_eq!(result.errors.unwrap().first().message, "\"floor\" is not allowed");
/// ```
pub struct ObjectSchema {
    fields: IndexMap<String, FieldDef>,
    additional_properties: AdditionalProperties,
    type_error_message: Option<String>,
}

impl ObjectSchema {
    /// Creates a new object schema with no fields.
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
            additional_properties: AdditionalProperties::Inherit,
            type_error_message: None,
        }
    }

    /// Adds a required field to the schema.
    pub fn field<S>(mut self, name: impl Into<String>, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.fields.insert(
            name.into(),
            FieldDef {
                schema: Box::new(schema),
                required: true,
                default: None,
            },
        );
        self
    }

    /// Adds an optional field to the schema.
    pub fn optional<S>(mut self, name: impl Into<String>, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.fields.insert(
            name.into(),
            FieldDef {
                schema: Box::new(schema),
                required: false,
                default: None,
            },
        );
        self
    }

    /// Adds an optional field with a default value.
    ///
    /// When the key is missing and defaults are enabled, the default is
    /// inserted as-is. With defaults disabled the key simply stays missing.
    ///
    /// # Example
    ///
    /// ```rust
    /// use schemahook::{JsonPath, Schema, SchemaLike, ValidateOptions};
    /// use serde_json::json;
    ///
    /// let schema = Schema::object().default("role", Schema::string(), json!("user"));
    ///
    /// let result = schema.validate(&json!({}), &JsonPath::root());
    /// assert_eq!(result.value, json!({"role": "user"}));
    ///
    /// let options = ValidateOptions::collect_all().with_defaults(false);
    /// let result = schema.validate_with(&json!({}), &JsonPath::root(), &options);
    /// assert_eq!(result.value, json!({}));
    /// ```
    pub fn default<S>(mut self, name: impl Into<String>, schema: S, default: Value) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.fields.insert(
            name.into(),
            FieldDef {
                schema: Box::new(schema),
                required: false,
                default: Some(default),
            },
        );
        self
    }

    /// Configures how unknown keys are handled, overriding the options.
    ///
    /// Accepts `true` (allow), `false` (reject) or a schema that unknown
    /// values must satisfy.
    pub fn additional_properties<S>(mut self, setting: S) -> Self
    where
        S: Into<AdditionalPropertiesSetting>,
    {
        self.additional_properties = setting.into().0;
        self
    }

    /// Sets the constraint text used when the value is not an object.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_error_message = Some(message.into());
        self
    }

    fn allows_unknown(&self, options: &ValidateOptions) -> bool {
        match self.additional_properties {
            AdditionalProperties::Inherit => options.allow_unknown,
            AdditionalProperties::Allow => true,
            AdditionalProperties::Deny | AdditionalProperties::Validate(_) => false,
        }
    }
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for ObjectSchema {
    fn validate_with(
        &self,
        value: &Value,
        path: &JsonPath,
        options: &ValidateOptions,
    ) -> Normalized {
        let obj = match value.as_object() {
            Some(o) => o,
            None => {
                let text = self
                    .type_error_message
                    .as_deref()
                    .unwrap_or("must be of type object");
                return Normalized::invalid(
                    value.clone(),
                    Violation::new(path.clone(), labelled(path, text))
                        .with_code("object.base")
                        .with_value(value.clone()),
                );
            }
        };

        let mut violations = Vec::new();
        let mut validated = Map::new();

        for (name, field_def) in &self.fields {
            if options.abort_early && !violations.is_empty() {
                break;
            }
            let field_path = path.push_field(name);

            match obj.get(name) {
                Some(field_value) => {
                    let (coerced, errors) = field_def
                        .schema
                        .validate_with(field_value, &field_path, options)
                        .into_parts();
                    validated.insert(name.clone(), coerced);
                    violations.extend(errors);
                }
                None if field_def.required => {
                    let message = labelled(&field_path, "is required");
                    violations.push(Violation::new(field_path, message).with_code("any.required"));
                }
                None => {
                    if let (true, Some(default)) = (options.apply_defaults, &field_def.default) {
                        validated.insert(name.clone(), default.clone());
                    }
                }
            }
        }

        for (key, item) in obj {
            if self.fields.contains_key(key) {
                continue;
            }
            if options.abort_early && !violations.is_empty() {
                break;
            }
            let field_path = path.push_field(key);

            if let AdditionalProperties::Validate(schema) = &self.additional_properties {
                let (coerced, errors) = schema
                    .validate_with(item, &field_path, options)
                    .into_parts();
                validated.insert(key.clone(), coerced);
                violations.extend(errors);
            } else {
                if !self.allows_unknown(options) {
                    let message = labelled(&field_path, "is not allowed");
                    violations.push(
                        Violation::new(field_path, message)
                            .with_code("object.unknown")
                            .with_value(item.clone()),
                    );
                }
                validated.insert(key.clone(), item.clone());
            }
        }

        if options.abort_early && !violations.is_empty() {
            violations.truncate(1);
        }

        Normalized::with_violations(Value::Object(validated), violations)
    }
}

/// A type that can be converted into an unknown-key setting.
///
/// - `bool`: `true` allows, `false` rejects
/// - any schema: unknown values are validated against it
pub struct AdditionalPropertiesSetting(AdditionalProperties);

impl From<bool> for AdditionalPropertiesSetting {
    fn from(allow: bool) -> Self {
        if allow {
            AdditionalPropertiesSetting(AdditionalProperties::Allow)
        } else {
            AdditionalPropertiesSetting(AdditionalProperties::Deny)
        }
    }
}

impl<S: SchemaLike + 'static> From<S> for AdditionalPropertiesSetting {
    fn from(schema: S) -> Self {
        AdditionalPropertiesSetting(AdditionalProperties::Validate(Box::new(schema)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{IntegerSchema, StringSchema};
    use serde_json::json;

    fn paths(result: &Normalized) -> Vec<String> {
        result
            .errors
            .iter()
            .flat_map(|e| e.iter().map(|v| v.path.dotted()))
            .collect()
    }

    #[test]
    fn test_rejects_non_object() {
        let schema = ObjectSchema::new();

        let result = schema.validate(&json!("not an object"), &JsonPath::from_field("address"));
        let violations = result.errors.unwrap();
        assert_eq!(violations.first().code, "object.base");
        assert_eq!(
            violations.first().message,
            "\"address\" must be of type object"
        );
        assert_eq!(violations.first().value, Some(json!("not an object")));
    }

    #[test]
    fn test_required_field_has_no_attached_value() {
        let schema = ObjectSchema::new().field("name", StringSchema::new());

        let result = schema.validate(&json!({}), &JsonPath::root());
        let violations = result.errors.unwrap();
        assert_eq!(violations.first().code, "any.required");
        assert_eq!(violations.first().message, "\"name\" is required");
        assert!(violations.first().value.is_none());
    }

    #[test]
    fn test_optional_field() {
        let schema = ObjectSchema::new().optional("nickname", StringSchema::new());

        let result = schema.validate(&json!({}), &JsonPath::root());
        assert!(result.is_valid());
        assert_eq!(result.value, json!({}));

        let result = schema.validate(&json!({"nickname": 7}), &JsonPath::root());
        assert_eq!(paths(&result), vec!["nickname"]);
    }

    #[test]
    fn test_default_only_fills_missing_keys() {
        let schema = ObjectSchema::new().default("role", StringSchema::new(), json!("user"));

        let result = schema.validate(&json!({"role": "admin"}), &JsonPath::root());
        assert_eq!(result.value, json!({"role": "admin"}));
    }

    #[test]
    fn test_unknown_keys_follow_options() {
        let schema = ObjectSchema::new().field("name", StringSchema::new());
        let input = json!({"name": "Ada", "extra": 1});

        let result = schema.validate(&input, &JsonPath::root());
        assert_eq!(result.errors.unwrap().first().code, "object.unknown");

        let lenient = ValidateOptions {
            allow_unknown: true,
            ..ValidateOptions::collect_all()
        };
        let result = schema.validate_with(&input, &JsonPath::root(), &lenient);
        assert!(result.is_valid());
        assert_eq!(result.value, input);
    }

    #[test]
    fn test_explicit_setting_overrides_options() {
        let input = json!({"name": "Ada", "extra": 1});

        let open = ObjectSchema::new()
            .field("name", StringSchema::new())
            .additional_properties(true);
        assert!(open.validate(&input, &JsonPath::root()).is_valid());

        let closed = ObjectSchema::new()
            .field("name", StringSchema::new())
            .additional_properties(false);
        let lenient = ValidateOptions {
            allow_unknown: true,
            ..ValidateOptions::collect_all()
        };
        assert!(!closed.validate_with(&input, &JsonPath::root(), &lenient).is_valid());
    }

    #[test]
    fn test_additional_properties_schema() {
        let schema = ObjectSchema::new().additional_properties(IntegerSchema::new());

        let result = schema.validate(&json!({"a": "1", "b": "x"}), &JsonPath::root());
        assert_eq!(result.value, json!({"a": 1, "b": "x"}));
        assert_eq!(paths(&result), vec!["b"]);
    }

    #[test]
    fn test_accumulates_in_declaration_order() {
        let schema = ObjectSchema::new()
            .field("z", StringSchema::new())
            .field("a", IntegerSchema::new().positive())
            .field("m", StringSchema::new());

        let result = schema.validate(&json!({"a": -1, "q": true}), &JsonPath::root());
        assert_eq!(paths(&result), vec!["z", "a", "m", "q"]);
    }

    #[test]
    fn test_partial_coercion_alongside_violations() {
        let schema = ObjectSchema::new()
            .field("name", StringSchema::new().trim())
            .field("age", IntegerSchema::new().positive());

        let result = schema.validate(&json!({"name": " Ada ", "age": "-2"}), &JsonPath::root());
        assert_eq!(result.value, json!({"name": "Ada", "age": -2}));
        assert_eq!(paths(&result), vec!["age"]);
    }

    #[test]
    fn test_nested_paths_and_labels() {
        let inner = ObjectSchema::new().field("value", IntegerSchema::new().positive());
        let outer = ObjectSchema::new().field("middle", ObjectSchema::new().field("inner", inner));

        let result = outer.validate(
            &json!({"middle": {"inner": {"value": -5}}}),
            &JsonPath::root(),
        );
        let violations = result.errors.unwrap();
        assert_eq!(violations.first().path.dotted(), "middle.inner.value");
        assert_eq!(
            violations.first().message,
            "\"middle.inner.value\" must be a positive number"
        );
    }

    #[test]
    fn test_abort_early_returns_partial_output_and_one_violation() {
        let schema = ObjectSchema::new()
            .field("a", StringSchema::new().trim())
            .field("b", StringSchema::new())
            .field("c", StringSchema::new());
        let options = ValidateOptions {
            abort_early: true,
            ..ValidateOptions::collect_all()
        };

        let input = json!({"a": " x ", "b": 2, "c": 3, "d": 4});
        let result = schema.validate_with(&input, &JsonPath::root(), &options);
        assert_eq!(result.violation_count(), 1);
        assert_eq!(result.value, json!({"a": "x", "b": 2}));
    }
}
