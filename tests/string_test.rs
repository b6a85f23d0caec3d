//! Integration tests for string schema validation.

use schemahook::{JsonPath, Schema, SchemaLike, ValidateOptions, Violations};
use serde_json::{json, Value};

/// Helper to extract the success value from a Validation
fn unwrap_success<T, E: std::fmt::Debug>(v: stillwater::Validation<T, E>) -> T {
    v.into_result().unwrap()
}

/// Helper to extract the error value from a Validation
fn unwrap_failure<T, E>(v: stillwater::Validation<T, E>) -> E
where
    T: std::fmt::Debug,
{
    v.into_result().unwrap_err()
}

fn check(schema: &impl SchemaLike, value: Value) -> stillwater::Validation<Value, Violations> {
    schema.validate(&value, &JsonPath::root()).into_validation()
}

#[test]
fn test_schema_string_factory() {
    let result = check(&Schema::string(), json!("test"));
    assert_eq!(unwrap_success(result), json!("test"));
}

#[test]
fn test_rejects_non_strings() {
    let schema = Schema::string();

    for value in [json!(42), json!(null), json!(true), json!(["a"])] {
        let errors = unwrap_failure(check(&schema, value.clone()));
        assert_eq!(errors.first().code, "string.base");
        assert_eq!(errors.first().message, "\"value\" must be a string");
        assert_eq!(errors.first().value, Some(value));
    }
}

#[test]
fn test_length_boundaries() {
    let schema = Schema::string().min_len(5).max_len(10);

    assert!(schema.validate(&json!("hello"), &JsonPath::root()).is_valid());
    assert!(schema.validate(&json!("1234567890"), &JsonPath::root()).is_valid());

    let errors = unwrap_failure(check(&schema, json!("hi")));
    assert_eq!(errors.first().code, "string.min");
    assert_eq!(
        errors.first().message,
        "\"value\" length must be at least 5 characters long"
    );

    let errors = unwrap_failure(check(&schema, json!("this is too long")));
    assert_eq!(errors.first().code, "string.max");
}

#[test]
fn test_length_counts_characters() {
    let schema = Schema::string().exact_len(3);
    assert!(schema.validate(&json!("日本語"), &JsonPath::root()).is_valid());

    let errors = unwrap_failure(check(&schema, json!("ab")));
    assert_eq!(errors.first().code, "string.length");
    assert_eq!(errors.first().message, "\"value\" length must be 3 characters long");
}

#[test]
fn test_all_string_violations_reported() {
    let schema = Schema::string().min_len(5).pattern(r"^\d+$").unwrap();

    let errors = unwrap_failure(check(&schema, json!("ab")));
    let codes: Vec<&str> = errors.iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes, vec!["string.min", "string.pattern.base"]);
}

#[test]
fn test_abort_early_stops_at_first() {
    let schema = Schema::string().min_len(5).pattern(r"^\d+$").unwrap();
    let options = ValidateOptions {
        abort_early: true,
        ..ValidateOptions::collect_all()
    };

    let result = schema.validate_with(&json!("ab"), &JsonPath::root(), &options);
    assert_eq!(result.violation_count(), 1);
}

#[test]
fn test_pattern_message_quotes_value() {
    let schema = Schema::string().pattern(r"^\d{5}$").unwrap();

    let result = schema.validate(&json!("12"), &JsonPath::from_field("zip"));
    let errors = unwrap_failure(result.into_validation());
    assert_eq!(
        errors.first().message,
        "\"zip\" with value \"12\" fails to match the required pattern: /^\\d{5}$/"
    );
    assert_eq!(errors.first().value, Some(json!("12")));
}

#[test]
fn test_invalid_pattern_is_an_error() {
    assert!(Schema::string().pattern("(unclosed").is_err());
}

#[test]
fn test_email() {
    let schema = Schema::string().email();

    assert!(schema.validate(&json!("ada@example.com"), &JsonPath::root()).is_valid());
    assert!(schema.validate(&json!("a.b@c.co.uk"), &JsonPath::root()).is_valid());

    for bad in ["nope", "a@b", "a @b.io", "@b.io"] {
        let errors = unwrap_failure(check(&schema, json!(bad)));
        assert_eq!(errors.first().code, "string.email");
    }
}

#[test]
fn test_normalization_is_returned() {
    let schema = Schema::string().trim().lowercase().email();

    let result = check(&schema, json!("  Ada@Example.COM "));
    assert_eq!(unwrap_success(result), json!("ada@example.com"));

    let upper = Schema::string().uppercase();
    assert_eq!(unwrap_success(check(&upper, json!("nl"))), json!("NL"));
}

#[test]
fn test_normalized_value_kept_on_failure() {
    let schema = Schema::string().trim().min_len(3);
    let result = schema.validate(&json!("  a  "), &JsonPath::root());

    assert!(!result.is_valid());
    assert_eq!(result.value, json!("a"));
}

#[test]
fn test_custom_error_keeps_label() {
    let schema = Schema::string().min_len(8).error("is too short for a password");

    let errors = unwrap_failure(
        schema
            .validate(&json!("abc"), &JsonPath::from_field("password"))
            .into_validation(),
    );
    assert_eq!(errors.first().message, "\"password\" is too short for a password");
    assert_eq!(errors.first().code, "string.min");
}
