//! In-process document store.
//!
//! Used by tests and by the CLI when browsing a local seed file.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CatalogError, Direction, Document, DocumentStore, Fields, OrderBy};

#[derive(Debug, Clone)]
struct Stored {
    /// Insertion sequence; breaks ordering ties.
    seq: u64,
    fields: Fields,
}

/// Document store kept entirely in memory.
///
/// List reads order by the requested field. Documents without that field
/// sort after all documents that have it; ties keep insertion order.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Stored>>>,
    next_seq: AtomicU64,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn seq(&self) -> u64 {
        self.next_seq.fetch_add(1, AtomicOrdering::Relaxed)
    }

    /// Number of documents in a collection.
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }
}

/// Rank of a JSON type for cross-type comparisons.
const fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or_default();
            let b = b.as_f64().unwrap_or_default();
            a.total_cmp(&b)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn compare_by(order: &OrderBy, a: &Stored, b: &Stored) -> Ordering {
    let by_field = match (a.fields.get(&order.field), b.fields.get(&order.field)) {
        (Some(x), Some(y)) => match order.direction {
            Direction::Ascending => compare_values(x, y),
            Direction::Descending => compare_values(y, x),
        },
        _ => Ordering::Equal,
    };
    by_field.then(a.seq.cmp(&b.seq))
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list(&self, collection: &str, order: &OrderBy) -> Result<Vec<Document>, CatalogError> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        // Like a Firestore orderBy query, documents without the field are left out.
        let mut entries: Vec<(&String, &Stored)> = docs
            .iter()
            .filter(|(_, stored)| stored.fields.contains_key(&order.field))
            .collect();
        entries.sort_by(|(_, a), (_, b)| compare_by(order, a, b));

        Ok(entries
            .into_iter()
            .map(|(id, stored)| Document::new(id.clone(), stored.fields.clone()))
            .collect())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, CatalogError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|stored| Document::new(id.to_string(), stored.fields.clone())))
    }

    async fn create(&self, collection: &str, fields: Fields) -> Result<String, CatalogError> {
        let id = Uuid::new_v4().simple().to_string();
        let seq = self.seq();
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), Stored { seq, fields });
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), CatalogError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.get_mut(id) {
            Some(stored) => stored.fields = fields,
            None => {
                let seq = self.seq();
                docs.insert(id.to_string(), Stored { seq, fields });
            }
        }
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), CatalogError> {
        let mut collections = self.collections.write().await;
        let stored = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| CatalogError::NotFound(format!("{collection}/{id}")))?;
        stored.fields.extend(fields);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), CatalogError> {
        if let Some(docs) = self.collections.write().await.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }
}
