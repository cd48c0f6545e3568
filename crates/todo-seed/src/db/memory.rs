//! In-process [`DocumentStore`] for tests and dry runs.

use std::collections::HashMap;

use async_trait::async_trait;
use bson::Document;
use tokio::sync::Mutex;

use super::SeedError;
use super::store::{DocumentStore, UpsertOutcome};

#[derive(Debug, Default, Clone)]
struct MemoryCollection {
    docs: Vec<Document>,
    indexes: Vec<Document>,
}

/// Collections held in memory.
///
/// Collections are created implicitly on first write, like MongoDB. Every
/// call is appended to an operation journal, e.g. `"insert todo_lists"`.
pub struct MemoryStore {
    database: String,
    collections: Mutex<HashMap<String, MemoryCollection>>,
    journal: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collections: Mutex::new(HashMap::new()),
            journal: Mutex::new(Vec::new()),
        }
    }

    /// All documents of a collection, in insertion order.
    pub async fn documents(&self, collection: &str) -> Vec<Document> {
        self.collections
            .lock()
            .await
            .get(collection)
            .map(|c| c.docs.clone())
            .unwrap_or_default()
    }

    pub async fn collection_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.lock().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Operations performed so far, oldest first.
    pub async fn operations(&self) -> Vec<String> {
        self.journal.lock().await.clone()
    }

    async fn record(&self, op: &str, collection: &str) {
        self.journal.lock().await.push(format!("{op} {collection}"));
    }
}

fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, value)| doc.get(key) == Some(value))
}

/// MongoDB's default index name: `field_direction` pairs joined by `_`.
fn index_name(keys: &Document) -> String {
    keys.iter()
        .map(|(field, direction)| format!("{field}_{direction}"))
        .collect::<Vec<_>>()
        .join("_")
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn database_name(&self) -> &str {
        &self.database
    }

    async fn ensure_collection(&self, name: &str) -> Result<bool, SeedError> {
        self.record("ensure", name).await;
        let mut collections = self.collections.lock().await;
        if collections.contains_key(name) {
            return Ok(false);
        }
        collections.insert(name.to_string(), MemoryCollection::default());
        Ok(true)
    }

    async fn insert_one(&self, collection: &str, doc: Document) -> Result<(), SeedError> {
        self.record("insert", collection).await;
        self.collections
            .lock()
            .await
            .entry(collection.to_string())
            .or_default()
            .docs
            .push(doc);
        Ok(())
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, SeedError> {
        self.record("find", collection).await;
        Ok(self
            .collections
            .lock()
            .await
            .get(collection)
            .and_then(|c| c.docs.iter().find(|d| matches(d, &filter)).cloned()))
    }

    async fn upsert_one(
        &self,
        collection: &str,
        filter: Document,
        doc: Document,
    ) -> Result<UpsertOutcome, SeedError> {
        self.record("upsert", collection).await;
        let mut collections = self.collections.lock().await;
        let docs = &mut collections.entry(collection.to_string()).or_default().docs;

        match docs.iter_mut().find(|d| matches(d, &filter)) {
            Some(existing) => {
                *existing = doc;
                Ok(UpsertOutcome::Replaced)
            }
            None => {
                docs.push(doc);
                Ok(UpsertOutcome::Inserted)
            }
        }
    }

    async fn create_index(&self, collection: &str, keys: Document) -> Result<String, SeedError> {
        self.record("index", collection).await;
        let name = index_name(&keys);
        let mut collections = self.collections.lock().await;
        let indexes = &mut collections.entry(collection.to_string()).or_default().indexes;
        if !indexes.contains(&keys) {
            indexes.push(keys);
        }
        Ok(name)
    }

    async fn index_keys(&self, collection: &str) -> Result<Vec<Document>, SeedError> {
        Ok(self
            .collections
            .lock()
            .await
            .get(collection)
            .map(|c| c.indexes.clone())
            .unwrap_or_default())
    }

    async fn count(&self, collection: &str, filter: Document) -> Result<u64, SeedError> {
        Ok(self
            .collections
            .lock()
            .await
            .get(collection)
            .map(|c| c.docs.iter().filter(|d| matches(d, &filter)).count() as u64)
            .unwrap_or(0))
    }

    async fn drop_collection(&self, name: &str) -> Result<(), SeedError> {
        self.record("drop", name).await;
        self.collections.lock().await.remove(name);
        Ok(())
    }
}
