//! The bundled schema library.
//!
//! Schemas validate a JSON value, coerce it where they can, and report every
//! violation with a path, a `"<label>" <constraint text>` message and, where
//! one exists, the offending value.
//!
//! # Example
//!
//! ```rust
//! use schemahook::{JsonPath, Schema, SchemaLike};
//! use serde_json::json;
//!
//! let schema = Schema::string().min_len(1).max_len(100);
//!
//! let result = schema.validate(&json!("hello"), &JsonPath::root());
//! assert!(result.is_valid());
//! ```

mod array;
mod numeric;
mod object;
mod string;
mod traits;

pub use array::ArraySchema;
pub use numeric::IntegerSchema;
pub use object::{AdditionalPropertiesSetting, ObjectSchema};
pub use string::StringSchema;
pub use traits::{SchemaHandle, SchemaLike};

use crate::path::JsonPath;

/// Formats a message as `"<label>" <text>`.
pub(crate) fn labelled(path: &JsonPath, text: &str) -> String {
    format!("\"{}\" {}", path.label(), text)
}

/// Entry point for creating validation schemas.
///
/// # Example
///
/// ```rust
/// use schemahook::Schema;
///
/// let account = Schema::object()
///     .field("email", Schema::string().trim().lowercase().email())
///     .field("age", Schema::integer().positive())
///     .optional("tags", Schema::array(Schema::string()).unique());
/// ```
pub struct Schema;

impl Schema {
    /// Creates a new string schema.
    pub fn string() -> StringSchema {
        StringSchema::new()
    }

    /// Creates a new integer schema. Numeric strings are converted.
    pub fn integer() -> IntegerSchema {
        IntegerSchema::new()
    }

    /// Creates a new object schema.
    pub fn object() -> ObjectSchema {
        ObjectSchema::new()
    }

    /// Creates a new array schema whose items must satisfy `item_schema`.
    pub fn array<S: SchemaLike>(item_schema: S) -> ArraySchema<S> {
        ArraySchema::new(item_schema)
    }
}
