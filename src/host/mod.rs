//! The boundary with the entity framework.
//!
//! [`Entity`] is what a validation pass needs from a persisted instance and
//! [`ChangeTracker`] decides which of its fields count as changed. The
//! [`Model`], [`Record`] and [`Host`] types are a small in-memory framework
//! implementing both, for embedding and for tests.

mod lifecycle;
mod model;

pub use lifecycle::{Host, LifecycleHook, LifecyclePhase};
pub use model::{Model, Record};

use std::sync::Arc;

use serde_json::Value;

use crate::error::InstanceRef;
use crate::schema::SchemaHandle;

/// A model instance as seen by a validation pass.
pub trait Entity {
    /// The model's type name, used in error messages.
    fn type_name(&self) -> &str;

    /// Identity attached to every error item produced for this instance.
    fn instance_ref(&self) -> InstanceRef {
        InstanceRef::new(self.type_name())
    }

    /// Declared field names, in declaration order.
    fn field_names(&self) -> Vec<String>;

    /// Fields the instance itself reports as changed, in the order they changed.
    fn changed_fields(&self) -> Vec<String>;

    /// The value last loaded or saved for `field`.
    fn previous(&self, field: &str) -> Option<&Value>;

    fn get(&self, field: &str) -> Option<&Value>;

    fn set(&mut self, field: &str, value: Value);

    /// The schema attached to `field`, if the field exists and has one.
    fn field_schema(&self, field: &str) -> Option<Arc<dyn SchemaHandle>>;
}

/// Decides which fields of an instance changed since it was last loaded.
pub trait ChangeTracker: Send + Sync {
    /// Changed field names, in the order they should be validated.
    fn changed_field_names(&self, instance: &dyn Entity) -> Vec<String>;
}

/// Uses the instance's own change tracking.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeChanges;

impl ChangeTracker for NativeChanges {
    fn changed_field_names(&self, instance: &dyn Entity) -> Vec<String> {
        instance.changed_fields()
    }
}

/// Compares every declared field with its last loaded value.
///
/// For hosts that keep a snapshot but no change set. Fields come back in
/// declaration order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotDiff;

impl ChangeTracker for SnapshotDiff {
    fn changed_field_names(&self, instance: &dyn Entity) -> Vec<String> {
        instance
            .field_names()
            .into_iter()
            .filter(|field| instance.get(field) != instance.previous(field))
            .collect()
    }
}
