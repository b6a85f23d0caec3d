//! The validation hook.
//!
//! [`SchemaHook::on_validate`] validates every changed field that has a
//! schema, writes each coerced value back onto the instance, and raises a
//! single [`ValidationError`] listing every violation across all fields.

use indexmap::IndexSet;
use rayon::prelude::*;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::error::{HookError, SetupError, ValidationError};
use crate::field::validate_field;
use crate::host::{ChangeTracker, Entity, Host, LifecycleHook, LifecyclePhase, NativeChanges};
use crate::translate::translate;

/// Validates changed fields against their schemas.
///
/// Create one with [`SchemaHook::builder`].
pub struct SchemaHook {
    apply_defaults: bool,
    phase: LifecyclePhase,
    tracker: Arc<dyn ChangeTracker>,
}

impl SchemaHook {
    /// Starts configuring a hook.
    pub fn builder<'h>() -> HookBuilder<'h> {
        HookBuilder::new()
    }

    /// Whether schema defaults are applied during validation.
    pub fn apply_defaults(&self) -> bool {
        self.apply_defaults
    }

    /// The lifecycle phase the hook is registered for.
    pub fn phase(&self) -> LifecyclePhase {
        self.phase
    }

    /// Runs one validation pass over `instance`.
    ///
    /// Fields are visited in the order the change tracker reports them, each
    /// at most once. Fields without a schema are not read or written, and
    /// fields that hold no value are left absent. For the rest the schema's
    /// output replaces the field value whether or not it passed, and
    /// violations are collected across fields. If any were found they are
    /// raised together as [`HookError::Validation`], after all write-backs.
    ///
    /// A schema that cannot run, or a violation path that cannot be walked,
    /// stops the pass immediately with [`HookError::Schema`] or
    /// [`HookError::Path`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use schemahook::{Model, Schema, SchemaHook};
    /// use serde_json::json;
    ///
    /// let account = Arc::new(
    ///     Model::define("Account")
    ///         .field_with_schema("email", Schema::string().email())
    ///         .field_with_schema("age", Schema::integer().positive()),
    /// );
    /// let hook = SchemaHook::builder().build();
    ///
    /// let mut record = account.build([("email", json!("nope")), ("age", json!("36"))]);
    /// let err = hook.on_validate(&mut record).unwrap_err();
    ///
    /// let failure = err.as_validation().unwrap();
    /// assert_eq!(failure.len(), 1);
    /// assert_eq!(failure.first().path, "email");
    /// assert_eq!(failure.first().message, "Account.email must be a valid email");
    /// assert_eq!(record.get("age"), Some(&json!(36)));
    /// ```
    pub fn on_validate(&self, instance: &mut dyn Entity) -> Result<(), HookError> {
        let changed: IndexSet<String> = self
            .tracker
            .changed_field_names(instance)
            .into_iter()
            .collect();
        if changed.is_empty() {
            return Ok(());
        }

        debug!(model = instance.type_name(), changed = ?changed, "changed attributes");

        let owner = instance.instance_ref();
        let mut items = Vec::new();

        for field in &changed {
            let Some(schema) = instance.field_schema(field) else {
                continue;
            };
            let Some(original) = instance.get(field).cloned() else {
                trace!(field = %field, "attribute has no value, skipping");
                continue;
            };
            debug!(field = %field, "validating attribute against its schema");

            let outcome = validate_field(schema.as_ref(), &original, self.apply_defaults)
                .map_err(|source| HookError::Schema {
                    field: field.clone(),
                    source,
                })?;

            for violation in &outcome.violations {
                let item = translate(field, &owner, violation, &original).map_err(|source| {
                    HookError::Path {
                        field: field.clone(),
                        source,
                    }
                })?;
                items.push(item);
            }

            trace!(field = %field, value = %outcome.value, "writing back normalized value");
            instance.set(field, outcome.value);
        }

        match ValidationError::from_items(items) {
            Some(error) => {
                debug!(errors = error.len(), "validation failed");
                Err(error.into())
            }
            None => Ok(()),
        }
    }

    /// Runs [`on_validate`](Self::on_validate) over independent instances in
    /// parallel. Results are in input order.
    pub fn on_validate_all<E>(&self, instances: &mut [E]) -> Vec<Result<(), HookError>>
    where
        E: Entity + Send,
    {
        instances
            .par_iter_mut()
            .map(|instance| self.on_validate(instance))
            .collect()
    }
}

impl LifecycleHook for SchemaHook {
    fn call(&self, instance: &mut dyn Entity) -> Result<(), HookError> {
        self.on_validate(instance)
    }
}

impl fmt::Debug for SchemaHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaHook")
            .field("apply_defaults", &self.apply_defaults)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

/// Configures and installs a [`SchemaHook`].
///
/// # Example
///
/// ```rust
/// use schemahook::{Host, LifecyclePhase, SchemaHook, SetupError};
///
/// let host = Host::new();
/// let hook = SchemaHook::builder()
///     .host(&host)
///     .apply_defaults(false)
///     .install()
///     .unwrap();
/// assert!(!hook.apply_defaults());
/// assert_eq!(host.hook_count(LifecyclePhase::BeforeValidate), 1);
///
/// let err = SchemaHook::builder().install().unwrap_err();
/// assert_eq!(err, SetupError::MissingHost);
/// ```
pub struct HookBuilder<'h> {
    host: Option<&'h Host>,
    apply_defaults: bool,
    phase: LifecyclePhase,
    tracker: Arc<dyn ChangeTracker>,
}

impl<'h> HookBuilder<'h> {
    pub fn new() -> Self {
        Self {
            host: None,
            apply_defaults: true,
            phase: LifecyclePhase::BeforeValidate,
            tracker: Arc::new(NativeChanges),
        }
    }

    /// The host to register with. Required by [`install`](Self::install).
    pub fn host(mut self, host: &'h Host) -> Self {
        self.host = Some(host);
        self
    }

    /// Whether schema defaults fill in missing nested values. Defaults to `true`.
    pub fn apply_defaults(mut self, apply_defaults: bool) -> Self {
        self.apply_defaults = apply_defaults;
        self
    }

    /// The lifecycle phase to run in. Defaults to before-validate.
    pub fn phase(mut self, phase: LifecyclePhase) -> Self {
        self.phase = phase;
        self
    }

    /// How changed fields are detected. Defaults to [`NativeChanges`].
    pub fn tracker<T: ChangeTracker + 'static>(mut self, tracker: T) -> Self {
        self.tracker = Arc::new(tracker);
        self
    }

    /// Builds a hook without registering it anywhere.
    pub fn build(self) -> SchemaHook {
        SchemaHook {
            apply_defaults: self.apply_defaults,
            phase: self.phase,
            tracker: self.tracker,
        }
    }

    /// Builds the hook and registers it with the host.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::MissingHost`] if no host was given; nothing is
    /// registered in that case.
    pub fn install(self) -> Result<Arc<SchemaHook>, SetupError> {
        let host = self.host.ok_or(SetupError::MissingHost)?;
        let hook = Arc::new(self.build());
        host.add_hook(hook.phase, hook.clone());
        debug!(phase = %hook.phase, apply_defaults = hook.apply_defaults, "schema hook installed");
        Ok(hook)
    }
}

impl Default for HookBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Model, SnapshotDiff};
    use crate::schema::Schema;
    use serde_json::json;

    fn account() -> Arc<Model> {
        Arc::new(
            Model::define("Account")
                .field("nickname")
                .field_with_schema("age", Schema::integer().positive())
                .field_with_schema(
                    "profile",
                    Schema::object()
                        .field("bio", Schema::string())
                        .default("lang", Schema::string(), json!("en")),
                ),
        )
    }

    #[test]
    fn test_builder_defaults() {
        let hook = SchemaHook::builder().build();
        assert!(hook.apply_defaults());
        assert_eq!(hook.phase(), LifecyclePhase::BeforeValidate);
    }

    #[test]
    fn test_install_without_host_registers_nothing() {
        let host = Host::new();
        let err = SchemaHook::builder().install().unwrap_err();
        assert_eq!(err, SetupError::MissingHost);
        assert_eq!(host.hook_count(LifecyclePhase::BeforeValidate), 0);
    }

    #[test]
    fn test_install_in_after_phase() {
        let host = Host::new();
        SchemaHook::builder()
            .host(&host)
            .phase(LifecyclePhase::AfterValidate)
            .install()
            .unwrap();
        assert_eq!(host.hook_count(LifecyclePhase::AfterValidate), 1);
        assert_eq!(host.hook_count(LifecyclePhase::BeforeValidate), 0);
    }

    #[test]
    fn test_nothing_changed_is_a_no_op() {
        let mut record = account().load([("age", json!("-1"))]);
        SchemaHook::builder().build().on_validate(&mut record).unwrap();
        assert_eq!(record.get("age"), Some(&json!("-1")));
    }

    #[test]
    fn test_duplicate_changed_names_are_visited_once() {
        struct Twice;
        impl ChangeTracker for Twice {
            fn changed_field_names(&self, _instance: &dyn Entity) -> Vec<String> {
                vec!["age".to_string(), "age".to_string()]
            }
        }

        let mut record = account().load([("age", json!(-1))]);
        let err = SchemaHook::builder()
            .tracker(Twice)
            .build()
            .on_validate(&mut record)
            .unwrap_err();
        assert_eq!(err.as_validation().unwrap().len(), 1);
    }

    #[test]
    fn test_defaults_follow_builder_flag() {
        let mut with = account().build([("profile", json!({"bio": "hi"}))]);
        SchemaHook::builder().build().on_validate(&mut with).unwrap();
        assert_eq!(with.get("profile"), Some(&json!({"bio": "hi", "lang": "en"})));

        let mut without = account().build([("profile", json!({"bio": "hi"}))]);
        SchemaHook::builder()
            .apply_defaults(false)
            .build()
            .on_validate(&mut without)
            .unwrap();
        assert_eq!(without.get("profile"), Some(&json!({"bio": "hi"})));
    }

    #[test]
    fn test_field_without_value_is_left_absent() {
        struct Always;
        impl ChangeTracker for Always {
            fn changed_field_names(&self, _instance: &dyn Entity) -> Vec<String> {
                vec!["age".to_string()]
            }
        }

        let mut record = account().load([("nickname", json!("a"))]);
        SchemaHook::builder()
            .tracker(Always)
            .build()
            .on_validate(&mut record)
            .unwrap();
        assert_eq!(record.get("age"), None);
        assert!(!record.is_changed("age"));
    }

    #[test]
    fn test_snapshot_tracker() {
        let mut record = account().load([("age", json!(1)), ("nickname", json!("a"))]);
        record.set("age", json!("-5"));
        let err = SchemaHook::builder()
            .tracker(SnapshotDiff)
            .build()
            .on_validate(&mut record)
            .unwrap_err();
        let failure = err.into_validation().unwrap();
        assert_eq!(failure.first().path, "age");
        assert_eq!(record.get("age"), Some(&json!(-5)));
    }
}
