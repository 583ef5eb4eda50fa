//! The entity-store interface and an in-memory reference implementation.
//!
//! [`EntityStore`] is the narrow seam between the editing controllers and
//! whatever holds durable records. Controllers issue at most one mutating
//! call per validated submission and never retry; transactional isolation is
//! the implementation's business.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use bindery_core::{BinderyError, BinderyResult};

use crate::record::Record;
use crate::schema::{EntityKind, EntitySchema};
use crate::value::Value;

/// Minimal async persistence interface consumed by the editing controllers.
///
/// `fetch_by_id` signals a missing record with [`BinderyError::NotFound`];
/// mutation failures surface as [`BinderyError::Persistence`].
#[async_trait::async_trait]
pub trait EntityStore: Send + Sync {
    /// Fetches one record by its path identifier.
    async fn fetch_by_id(&self, schema: &EntitySchema, id: &str) -> BinderyResult<Record>;

    /// Creates a new record from the given field values and returns it with
    /// its assigned identifier.
    async fn create(
        &self,
        schema: &EntitySchema,
        values: HashMap<String, Value>,
    ) -> BinderyResult<Record>;

    /// Overwrites the given fields of an existing record in place and
    /// returns the updated record.
    async fn save(
        &self,
        schema: &EntitySchema,
        record: &Record,
        values: HashMap<String, Value>,
    ) -> BinderyResult<Record>;

    /// Removes a record.
    async fn delete(&self, schema: &EntitySchema, record: &Record) -> BinderyResult<()>;
}

/// Thread-safe in-memory store for tests and demos.
///
/// Records live in per-schema tables keyed by an auto-incrementing integer
/// identifier. Missing fields with schema defaults are filled in on create,
/// the way a database would apply column defaults.
pub struct MemoryStore {
    tables: RwLock<HashMap<String, BTreeMap<i64, Record>>>,
    next_id: AtomicI64,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Returns the number of records held for `schema_name`.
    pub fn len(&self, schema_name: &str) -> usize {
        self.tables
            .read()
            .expect("store lock poisoned")
            .get(schema_name)
            .map_or(0, BTreeMap::len)
    }

    /// Returns `true` if no records are held for `schema_name`.
    pub fn is_empty(&self, schema_name: &str) -> bool {
        self.len(schema_name) == 0
    }

    fn parse_id(id: &str) -> Option<i64> {
        id.trim().parse().ok()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EntityStore for MemoryStore {
    async fn fetch_by_id(&self, schema: &EntitySchema, id: &str) -> BinderyResult<Record> {
        let key = Self::parse_id(id)
            .ok_or_else(|| BinderyError::NotFound(format!("{} {id}", schema.name)))?;
        self.tables
            .read()
            .expect("store lock poisoned")
            .get(schema.name)
            .and_then(|table| table.get(&key))
            .cloned()
            .ok_or_else(|| BinderyError::NotFound(format!("{} {id}", schema.name)))
    }

    async fn create(
        &self,
        schema: &EntitySchema,
        values: HashMap<String, Value>,
    ) -> BinderyResult<Record> {
        let mut record = Record::with_values(values);
        for field in &schema.fields {
            if field.kind == EntityKind::AutoId || record.values.contains_key(field.name) {
                continue;
            }
            let filled = field.default.clone().unwrap_or(Value::Null);
            record.set(field.name, filled);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        record.id = Some(Value::Int(id));
        self.tables
            .write()
            .expect("store lock poisoned")
            .entry(schema.name.to_string())
            .or_default()
            .insert(id, record.clone());
        Ok(record)
    }

    async fn save(
        &self,
        schema: &EntitySchema,
        record: &Record,
        values: HashMap<String, Value>,
    ) -> BinderyResult<Record> {
        let id = record
            .id
            .as_ref()
            .and_then(Value::as_int)
            .ok_or_else(|| BinderyError::Persistence("record has no identifier".to_string()))?;

        let mut tables = self.tables.write().expect("store lock poisoned");
        let stored = tables
            .get_mut(schema.name)
            .and_then(|table| table.get_mut(&id))
            .ok_or_else(|| BinderyError::NotFound(format!("{} {id}", schema.name)))?;
        for (name, value) in values {
            stored.values.insert(name, value);
        }
        Ok(stored.clone())
    }

    async fn delete(&self, schema: &EntitySchema, record: &Record) -> BinderyResult<()> {
        let id = record
            .id
            .as_ref()
            .and_then(Value::as_int)
            .ok_or_else(|| BinderyError::Persistence("record has no identifier".to_string()))?;

        let mut tables = self.tables.write().expect("store lock poisoned");
        let removed = tables
            .get_mut(schema.name)
            .and_then(|table| table.remove(&id));
        if removed.is_none() {
            return Err(BinderyError::NotFound(format!("{} {id}", schema.name)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::EntityField;

    fn book_schema() -> EntitySchema {
        EntitySchema::new(
            "book",
            vec![
                EntityField::new("id", EntityKind::AutoId).read_only(),
                EntityField::new("title", EntityKind::Text).max_length(200),
                EntityField::new("in_print", EntityKind::Boolean).default(true),
                EntityField::new("summary", EntityKind::LongText).optional(),
            ],
        )
    }

    fn title_values(title: &str) -> HashMap<String, Value> {
        let mut values = HashMap::new();
        values.insert("title".to_string(), Value::Text(title.into()));
        values
    }

    #[tokio::test]
    async fn test_create_assigns_ids_and_defaults() {
        let store = MemoryStore::new();
        let schema = book_schema();

        let record = store.create(&schema, title_values("Dune")).await.unwrap();
        assert_eq!(record.id, Some(Value::Int(1)));
        assert_eq!(record.get("title"), Some(&Value::Text("Dune".into())));
        // Missing fields pick up the schema default, or null.
        assert_eq!(record.get("in_print"), Some(&Value::Bool(true)));
        assert_eq!(record.get("summary"), Some(&Value::Null));

        let second = store.create(&schema, title_values("Emma")).await.unwrap();
        assert_eq!(second.id, Some(Value::Int(2)));
        assert_eq!(store.len("book"), 2);
    }

    #[tokio::test]
    async fn test_fetch_by_id() {
        let store = MemoryStore::new();
        let schema = book_schema();
        let created = store.create(&schema, title_values("Dune")).await.unwrap();

        let fetched = store
            .fetch_by_id(&schema, &created.id_text().unwrap())
            .await
            .unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_fetch_missing_is_not_found() {
        let store = MemoryStore::new();
        let schema = book_schema();
        let err = store.fetch_by_id(&schema, "99").await.unwrap_err();
        assert!(matches!(err, BinderyError::NotFound(_)));

        // Garbage identifiers are also just "not found", not a server error.
        let err = store.fetch_by_id(&schema, "not-a-number").await.unwrap_err();
        assert!(matches!(err, BinderyError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_save_merges_values() {
        let store = MemoryStore::new();
        let schema = book_schema();
        let record = store.create(&schema, title_values("Dune")).await.unwrap();

        let mut updates = HashMap::new();
        updates.insert("in_print".to_string(), Value::Bool(false));
        let saved = store.save(&schema, &record, updates).await.unwrap();
        assert_eq!(saved.get("in_print"), Some(&Value::Bool(false)));
        assert_eq!(saved.get("title"), Some(&Value::Text("Dune".into())));

        let fetched = store.fetch_by_id(&schema, "1").await.unwrap();
        assert_eq!(fetched.get("in_print"), Some(&Value::Bool(false)));
    }

    #[tokio::test]
    async fn test_save_unpersisted_record_fails() {
        let store = MemoryStore::new();
        let schema = book_schema();
        let err = store
            .save(&schema, &Record::new(), HashMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, BinderyError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let store = MemoryStore::new();
        let schema = book_schema();
        let record = store.create(&schema, title_values("Dune")).await.unwrap();

        store.delete(&schema, &record).await.unwrap();
        assert!(store.is_empty("book"));
        let err = store.fetch_by_id(&schema, "1").await.unwrap_err();
        assert!(matches!(err, BinderyError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_schemas_are_namespaced() {
        let store = MemoryStore::new();
        let books = book_schema();
        let loans = EntitySchema::new(
            "loan",
            vec![EntityField::new("due_back", EntityKind::Date)],
        );

        store.create(&books, title_values("Dune")).await.unwrap();
        assert_eq!(store.len("book"), 1);
        assert_eq!(store.len("loan"), 0);
        assert!(store.fetch_by_id(&loans, "1").await.is_err());
    }
}
