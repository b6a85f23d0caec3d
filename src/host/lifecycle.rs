//! Lifecycle hooks and the host that runs them.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::{Entity, Record};
use crate::error::HookError;

/// When a hook runs relative to the host's own validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecyclePhase {
    #[default]
    BeforeValidate,
    AfterValidate,
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecyclePhase::BeforeValidate => write!(f, "beforeValidate"),
            LifecyclePhase::AfterValidate => write!(f, "afterValidate"),
        }
    }
}

/// A callback run by the host during validation.
pub trait LifecycleHook: Send + Sync {
    fn call(&self, instance: &mut dyn Entity) -> Result<(), HookError>;
}

impl<F> LifecycleHook for F
where
    F: Fn(&mut dyn Entity) -> Result<(), HookError> + Send + Sync,
{
    fn call(&self, instance: &mut dyn Entity) -> Result<(), HookError> {
        self(instance)
    }
}

type HookList = Arc<RwLock<Vec<(LifecyclePhase, Arc<dyn LifecycleHook>)>>>;

/// The framework side of the integration: holds lifecycle hooks and runs
/// them when an instance is validated or saved.
///
/// Hooks may be added from any thread while other threads validate.
/// Cloning a `Host` shares its hook list.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use schemahook::{Entity, HookError, Host, LifecyclePhase, Model};
/// use serde_json::json;
///
/// let host = Host::new();
/// host.add_hook(
///     LifecyclePhase::BeforeValidate,
///     Arc::new(|instance: &mut dyn Entity| -> Result<(), HookError> {
///         instance.set("touched", json!(true));
///         Ok(())
///     }),
/// );
///
/// let model = Arc::new(Model::define("Note").field("touched"));
/// let mut record = model.build([("touched", json!(false))]);
/// host.save(&mut record).unwrap();
/// assert_eq!(record.get("touched"), Some(&json!(true)));
/// ```
#[derive(Clone, Default)]
pub struct Host {
    hooks: HookList,
}

impl Host {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `hook` to run in `phase`, after any hooks already there.
    pub fn add_hook(&self, phase: LifecyclePhase, hook: Arc<dyn LifecycleHook>) {
        debug!(%phase, "registering lifecycle hook");
        self.hooks.write().push((phase, hook));
    }

    pub fn hook_count(&self, phase: LifecyclePhase) -> usize {
        self.hooks.read().iter().filter(|(p, _)| *p == phase).count()
    }

    /// Runs the hooks registered for `phase` in registration order, stopping
    /// at the first error.
    pub fn run_hooks(
        &self,
        phase: LifecyclePhase,
        instance: &mut dyn Entity,
    ) -> Result<(), HookError> {
        // Snapshot so a hook may register further hooks without deadlocking.
        let hooks: Vec<Arc<dyn LifecycleHook>> = self
            .hooks
            .read()
            .iter()
            .filter(|(p, _)| *p == phase)
            .map(|(_, hook)| Arc::clone(hook))
            .collect();

        for hook in hooks {
            hook.call(instance)?;
        }
        Ok(())
    }

    /// Runs the before-validate hooks, then the after-validate hooks.
    pub fn validate(&self, instance: &mut dyn Entity) -> Result<(), HookError> {
        debug!(model = instance.type_name(), "validating instance");
        self.run_hooks(LifecyclePhase::BeforeValidate, instance)?;
        self.run_hooks(LifecyclePhase::AfterValidate, instance)
    }

    /// Validates `record` and commits it. A failed validation leaves the
    /// record uncommitted, with any values hooks wrote back.
    pub fn save(&self, record: &mut Record) -> Result<(), HookError> {
        self.validate(record)?;
        record.mark_saved();
        debug!(model = record.model().name(), "record saved");
        Ok(())
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("before_validate", &self.hook_count(LifecyclePhase::BeforeValidate))
            .field("after_validate", &self.hook_count(LifecyclePhase::AfterValidate))
            .finish()
    }
}
