//! Dynamic entity records.
//!
//! A [`Record`] is what the entity store hands back: an optional identifier
//! plus a name→value map. Records are schema-less at the type level; the
//! [`EntitySchema`](crate::schema::EntitySchema) they were fetched under
//! says what the names mean.

use std::collections::HashMap;

use crate::value::Value;

/// One durable entity instance.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Record {
    /// The store-assigned identifier; `None` until persisted.
    pub id: Option<Value>,
    /// Field values keyed by field name.
    pub values: HashMap<String, Value>,
}

impl Record {
    /// Creates an empty, unpersisted record.
    pub fn new() -> Self {
        Self {
            id: None,
            values: HashMap::new(),
        }
    }

    /// Creates an unpersisted record from a value map.
    pub fn with_values(values: HashMap<String, Value>) -> Self {
        Self { id: None, values }
    }

    /// Returns the value stored under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Stores a value under `name`, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Returns the identifier rendered as path text (e.g. `"7"`), if the
    /// record has been persisted.
    pub fn id_text(&self) -> Option<String> {
        self.id.as_ref().map(ToString::to_string)
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}
