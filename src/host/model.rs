use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use super::Entity;
use crate::error::InstanceRef;
use crate::schema::SchemaHandle;

/// A model definition: a name and its ordered fields, each with an optional
/// schema.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use schemahook::{Model, Schema};
/// use serde_json::json;
///
/// let account = Arc::new(
///     Model::define("Account")
///         .field("name")
///         .field_with_schema("age", Schema::integer().positive()),
/// );
///
/// let record = account.build([("name", json!("Ada")), ("age", json!(36))]);
/// assert_eq!(record.changed(), vec!["name", "age"]);
/// ```
pub struct Model {
    name: String,
    fields: IndexMap<String, Option<Arc<dyn SchemaHandle>>>,
}

impl Model {
    pub fn define(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Declares a field without a schema.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.insert(name.into(), None);
        self
    }

    /// Declares a field validated by `schema`.
    pub fn field_with_schema<S>(mut self, name: impl Into<String>, schema: S) -> Self
    where
        S: SchemaHandle + 'static,
    {
        self.fields.insert(name.into(), Some(Arc::new(schema)));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn schema_for(&self, name: &str) -> Option<Arc<dyn SchemaHandle>> {
        self.fields.get(name).and_then(|schema| schema.clone())
    }

    /// Creates a new, unsaved record. Every supplied field counts as changed.
    pub fn build<K, I>(self: &Arc<Self>, values: I) -> Record
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut record = Record::empty(Arc::clone(self));
        for (name, value) in values {
            let name = name.into();
            record.changed.insert(name.clone());
            record.values.insert(name, value);
        }
        record
    }

    /// Creates a record as if read from storage. Nothing counts as changed.
    pub fn load<K, I>(self: &Arc<Self>, values: I) -> Record
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut record = Record::empty(Arc::clone(self));
        record.values = values.into_iter().map(|(k, v)| (k.into(), v)).collect();
        record.snapshot = record.values.clone();
        record.persisted = true;
        record
    }
}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<_> = self
            .fields
            .iter()
            .map(|(name, schema)| (name.as_str(), schema.is_some()))
            .collect();
        f.debug_struct("Model")
            .field("name", &self.name)
            .field("fields", &fields)
            .finish()
    }
}

/// An instance of a [`Model`] with change tracking.
///
/// Setting a field to a different value marks it changed. The mark stays
/// until [`Record::mark_saved`], even if the value is set back.
#[derive(Debug, Clone)]
pub struct Record {
    model: Arc<Model>,
    key: Option<String>,
    values: IndexMap<String, Value>,
    snapshot: IndexMap<String, Value>,
    changed: IndexSet<String>,
    persisted: bool,
}

impl Record {
    fn empty(model: Arc<Model>) -> Self {
        Self {
            model,
            key: None,
            values: IndexMap::new(),
            snapshot: IndexMap::new(),
            changed: IndexSet::new(),
            persisted: false,
        }
    }

    /// Attaches a primary key, shown in error items.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn set(&mut self, field: &str, value: Value) {
        if self.values.get(field) != Some(&value) {
            self.changed.insert(field.to_string());
        }
        self.values.insert(field.to_string(), value);
    }

    /// Changed fields in the order they were first changed.
    pub fn changed(&self) -> Vec<&str> {
        self.changed.iter().map(String::as_str).collect()
    }

    pub fn is_changed(&self, field: &str) -> bool {
        self.changed.contains(field)
    }

    pub fn is_new(&self) -> bool {
        !self.persisted
    }

    /// Commits the current values as the new snapshot and clears the change set.
    pub fn mark_saved(&mut self) {
        self.snapshot = self.values.clone();
        self.changed.clear();
        self.persisted = true;
    }
}

impl Entity for Record {
    fn type_name(&self) -> &str {
        self.model.name()
    }

    fn instance_ref(&self) -> InstanceRef {
        let instance = InstanceRef::new(self.model.name());
        match &self.key {
            Some(key) => instance.with_key(key.clone()),
            None => instance,
        }
    }

    fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.model.field_names().map(str::to_string).collect();
        names.extend(
            self.values
                .keys()
                .filter(|name| !self.model.has_field(name))
                .cloned(),
        );
        names
    }

    fn changed_fields(&self) -> Vec<String> {
        self.changed.iter().cloned().collect()
    }

    fn previous(&self, field: &str) -> Option<&Value> {
        self.snapshot.get(field)
    }

    fn get(&self, field: &str) -> Option<&Value> {
        Record::get(self, field)
    }

    fn set(&mut self, field: &str, value: Value) {
        Record::set(self, field, value)
    }

    fn field_schema(&self, field: &str) -> Option<Arc<dyn SchemaHandle>> {
        self.model.schema_for(field)
    }
}
