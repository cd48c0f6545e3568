//! Storage seam between the seeder and a document database.

use async_trait::async_trait;
use bson::Document;

use super::SeedError;

/// Result of an upsert-style write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Replaced,
}

/// The document operations a seeding run needs.
///
/// Filters are plain equality documents such as `{ "list_id": "list_test_001" }`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Name of the database this store writes to.
    fn database_name(&self) -> &str;

    /// Creates the collection if it does not exist. Returns `true` if it was created.
    async fn ensure_collection(&self, name: &str) -> Result<bool, SeedError>;

    async fn insert_one(&self, collection: &str, doc: Document) -> Result<(), SeedError>;

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, SeedError>;

    /// Replaces the first document matching `filter`, inserting `doc` if none matches.
    async fn upsert_one(
        &self,
        collection: &str,
        filter: Document,
        doc: Document,
    ) -> Result<UpsertOutcome, SeedError>;

    /// Creates a non-unique index with the given key document and returns its name.
    async fn create_index(&self, collection: &str, keys: Document) -> Result<String, SeedError>;

    /// Key documents of all secondary indexes, excluding the implicit `_id` index.
    async fn index_keys(&self, collection: &str) -> Result<Vec<Document>, SeedError>;

    async fn count(&self, collection: &str, filter: Document) -> Result<u64, SeedError>;

    async fn drop_collection(&self, name: &str) -> Result<(), SeedError>;
}
