//! Turning schema violations into validation-error items.

use serde_json::Value;

use crate::error::{InstanceRef, PathError, ValidationErrorItem, Violation, INVALID_SCHEMA};

/// Returns the constraint text of a `"<label>" <constraint text>` message.
///
/// That is everything after the second `"`, so quotes inside the constraint
/// text (e.g. a quoted offending value) are kept. Messages with fewer than two
/// quotes have no suffix.
///
/// ```rust
/// use schemahook::message_suffix;
///
/// assert_eq!(message_suffix("\"age\" must be a positive number"), " must be a positive number");
/// assert_eq!(
///     message_suffix("\"zip\" with value \"12\" fails to match"),
///     " with value \"12\" fails to match"
/// );
/// assert_eq!(message_suffix("unlabelled failure"), "");
/// ```
pub fn message_suffix(message: &str) -> &str {
    message
        .match_indices('"')
        .nth(1)
        .map_or("", |(idx, _)| &message[idx + 1..])
}

/// Builds the item for one violation of field `field`.
///
/// The item path is `field` followed by the violation path, dot-joined. The
/// offending value is the one attached to the violation; if there is none it
/// is looked up in `original`, the field's value before coercion. A lookup
/// that breaks before the last segment is returned as an error.
///
/// # Example
///
/// ```rust
/// use schemahook::{translate, InstanceRef, JsonPath, Violation, INVALID_SCHEMA};
/// use serde_json::json;
///
/// let violation = Violation::new(
///     JsonPath::from_field("zip"),
///     "\"zip\" length must be 5 characters long",
/// );
/// let original = json!({"zip": "12"});
///
/// let item = translate("address", &InstanceRef::new("Account"), &violation, &original).unwrap();
/// assert_eq!(item.path, "address.zip");
/// assert_eq!(item.message, "Account.address.zip length must be 5 characters long");
/// assert_eq!(item.kind, INVALID_SCHEMA);
/// assert_eq!(item.value, Some(json!("12")));
/// ```
pub fn translate(
    field: &str,
    instance: &InstanceRef,
    violation: &Violation,
    original: &Value,
) -> Result<ValidationErrorItem, PathError> {
    let path = if violation.path.is_root() {
        field.to_string()
    } else {
        format!("{}.{}", field, violation.path.dotted())
    };

    let message = format!(
        "{}.{}{}",
        instance.type_name,
        path,
        message_suffix(&violation.message)
    );

    let value = match &violation.value {
        Some(value) => Some(value.clone()),
        None => violation
            .path
            .resolve(original)
            .into_result(&violation.path)?
            .cloned(),
    };

    Ok(ValidationErrorItem {
        message,
        kind: INVALID_SCHEMA,
        path,
        value,
        instance: instance.clone(),
    })
}
