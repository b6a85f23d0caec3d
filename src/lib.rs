//! # Schemahook
//!
//! Schema validation for the changed fields of persisted model instances.
//!
//! ## Overview
//!
//! A [`SchemaHook`] is installed on a [`Host`] as a lifecycle hook. Each time
//! an instance is validated, every changed field that carries a schema is
//! validated and coerced. The coerced value is written back to the instance,
//! and all violations across all fields are collected into a single
//! [`ValidationError`]. Its items read `<Model>.<path><constraint text>` and
//! carry the dotted path and the offending value.
//!
//! ## Core Types
//!
//! - [`Schema`]: Entry point for building field schemas
//! - [`SchemaHook`] / [`HookBuilder`]: The validation hook and its configuration
//! - [`Entity`] / [`ChangeTracker`]: What the hook needs from a host framework
//! - [`Model`] / [`Record`] / [`Host`]: A small in-memory host framework
//! - [`ValidationError`]: The aggregated failure of one validation pass
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use schemahook::{Host, Model, Schema, SchemaHook};
//! use serde_json::json;
//!
//! let host = Host::new();
//! SchemaHook::builder().host(&host).install().unwrap();
//!
//! let account = Arc::new(
//!     Model::define("Account")
//!         .field("name")
//!         .field_with_schema("age", Schema::integer().positive()),
//! );
//!
//! let mut record = account.build([("name", json!("Ada")), ("age", json!(-3))]);
//! let err = host.save(&mut record).unwrap_err();
//!
//! let failure = err.as_validation().unwrap();
//! assert_eq!(failure.first().path, "age");
//! assert_eq!(failure.first().message, "Account.age must be a positive number");
//! assert_eq!(failure.first().value, Some(json!(-3)));
//! ```

pub mod error;
pub mod field;
pub mod hook;
pub mod host;
pub mod path;
pub mod schema;
pub mod translate;
pub mod validation;

pub use error::{
    HookError, InstanceRef, PathError, SchemaDefect, SetupError, ValidationError,
    ValidationErrorItem, Violation, Violations, INVALID_SCHEMA,
};
pub use field::{validate_field, FieldOutcome};
pub use hook::{HookBuilder, SchemaHook};
pub use host::{
    ChangeTracker, Entity, Host, LifecycleHook, LifecyclePhase, Model, NativeChanges, Record,
    SnapshotDiff,
};
pub use path::{JsonPath, Lookup, PathSegment};
pub use schema::{
    AdditionalPropertiesSetting, ArraySchema, IntegerSchema, ObjectSchema, Schema, SchemaHandle,
    SchemaLike, StringSchema,
};
pub use translate::{message_suffix, translate};
pub use validation::{Normalized, ValidateOptions};

/// Type alias for schema-level results using [`Violations`].
pub type ValidationResult<T> = stillwater::Validation<T, Violations>;
