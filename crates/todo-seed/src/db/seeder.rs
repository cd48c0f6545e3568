//! Database seeding utilities.

use std::ops::AddAssign;

use bson::{Document, doc};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use super::store::{DocumentStore, UpsertOutcome};
use crate::config::ConflictPolicy;
use crate::models::{ModelError, TodoItem, TodoList};
use crate::samples::SampleVariant;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] bson::ser::Error),
    #[error("Invalid document '{id}': {source}")]
    Invalid {
        id: String,
        #[source]
        source: ModelError,
    },
}

/// Per-collection write counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteTally {
    pub inserted: usize,
    pub replaced: usize,
    pub skipped: usize,
}

impl WriteTally {
    pub fn total(&self) -> usize {
        self.inserted + self.replaced + self.skipped
    }
}

impl AddAssign for WriteTally {
    fn add_assign(&mut self, other: Self) {
        self.inserted += other.inserted;
        self.replaced += other.replaced;
        self.skipped += other.skipped;
    }
}

/// Summary of a completed seeding run.
#[derive(Debug, Clone)]
pub struct SeedReport {
    pub database: String,
    pub policy: ConflictPolicy,
    /// Collections that did not exist before this run.
    pub collections_created: Vec<String>,
    pub lists: WriteTally,
    pub items: WriteTally,
    pub index_name: String,
}

enum WriteOutcome {
    Inserted,
    Replaced,
    Skipped,
}

/// Database seeder for the todo collections.
pub struct Seeder<S> {
    store: S,
    policy: ConflictPolicy,
    batch_size: usize,
}

impl<S: DocumentStore> Seeder<S> {
    /// Creates a new seeder over the given store, replacing existing documents on re-runs.
    pub fn new(store: S) -> Self {
        Self {
            store,
            policy: ConflictPolicy::default(),
            batch_size: 50,
        }
    }

    /// Sets how documents with an already-stored identifier are handled.
    pub fn with_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets how many documents are written between progress log lines.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.max(1);
        self
    }

    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    /// Seeds the sample list and item, then indexes `todo_items.list_id`.
    pub async fn run(&self, variant: SampleVariant) -> Result<SeedReport, SeedError> {
        self.run_with(variant, &[], &[]).await
    }

    /// Same steps as [`Seeder::run`], writing extra documents after the sample
    /// item and before the index.
    ///
    /// Steps run in a fixed order and the first error aborts the run. Writes
    /// already made are not rolled back.
    pub async fn run_with(
        &self,
        variant: SampleVariant,
        extra_lists: &[TodoList],
        extra_items: &[TodoItem],
    ) -> Result<SeedReport, SeedError> {
        info!(
            "Seeding database '{}' with {} sample ({} on conflict)",
            self.store.database_name(),
            variant,
            self.policy
        );

        let collections_created = self.ensure_collections().await?;

        let mut lists = self
            .seed_lists(&[variant.list(OffsetDateTime::now_utc())])
            .await?;
        let mut items = self
            .seed_items(&[variant.item(OffsetDateTime::now_utc())])
            .await?;

        if !extra_lists.is_empty() {
            lists += self.seed_lists(extra_lists).await?;
        }
        if !extra_items.is_empty() {
            items += self.seed_items(extra_items).await?;
        }

        let index_name = self.ensure_indexes().await?;

        Ok(SeedReport {
            database: self.store.database_name().to_string(),
            policy: self.policy,
            collections_created,
            lists,
            items,
            index_name,
        })
    }

    /// Makes sure both collections exist. Returns the ones that had to be created.
    pub async fn ensure_collections(&self) -> Result<Vec<String>, SeedError> {
        let mut created = Vec::new();
        for name in [TodoList::COLLECTION, TodoItem::COLLECTION] {
            if self.store.ensure_collection(name).await? {
                info!("Created collection '{}'", name);
                created.push(name.to_string());
            }
        }
        Ok(created)
    }

    /// Seeds todo lists into the database.
    pub async fn seed_lists(&self, lists: &[TodoList]) -> Result<WriteTally, SeedError> {
        info!("Seeding {} todo lists...", lists.len());

        let mut tally = WriteTally::default();
        for (i, list) in lists.iter().enumerate() {
            let mut list = list.clone();
            list.normalize().map_err(|source| SeedError::Invalid {
                id: list.list_id.clone(),
                source,
            })?;

            let doc = bson::to_document(&list)?;
            let outcome = self
                .write(TodoList::COLLECTION, TodoList::KEY_FIELD, &list.list_id, doc)
                .await?;
            tally.record(outcome);

            if (i + 1) % self.batch_size == 0 {
                info!("  Seeded {}/{} todo lists", i + 1, lists.len());
            }
        }

        info!("Seeded {} todo lists ({:?})", lists.len(), tally);
        Ok(tally)
    }

    /// Seeds todo items into the database.
    pub async fn seed_items(&self, items: &[TodoItem]) -> Result<WriteTally, SeedError> {
        info!("Seeding {} todo items...", items.len());

        let mut tally = WriteTally::default();
        for (i, item) in items.iter().enumerate() {
            let mut item = item.clone();
            item.normalize().map_err(|source| SeedError::Invalid {
                id: item.item_id.clone(),
                source,
            })?;

            let doc = bson::to_document(&item)?;
            let outcome = self
                .write(TodoItem::COLLECTION, TodoItem::KEY_FIELD, &item.item_id, doc)
                .await?;
            tally.record(outcome);

            if (i + 1) % self.batch_size == 0 {
                info!("  Seeded {}/{} todo items", i + 1, items.len());
            }
        }

        info!("Seeded {} todo items ({:?})", items.len(), tally);
        Ok(tally)
    }

    /// Creates the non-unique `{ list_id: 1 }` index on `todo_items`.
    pub async fn ensure_indexes(&self) -> Result<String, SeedError> {
        let name = self
            .store
            .create_index(TodoItem::COLLECTION, doc! { "list_id": 1 })
            .await?;
        info!("Ensured index '{}' on {}", name, TodoItem::COLLECTION);
        Ok(name)
    }

    /// Writes one document according to the conflict policy.
    async fn write(
        &self,
        collection: &str,
        key_field: &str,
        key: &str,
        doc: Document,
    ) -> Result<WriteOutcome, SeedError> {
        let filter = doc! { key_field: key };

        let outcome = match self.policy {
            ConflictPolicy::Append => {
                self.store.insert_one(collection, doc).await?;
                WriteOutcome::Inserted
            }
            ConflictPolicy::Skip => {
                if self.store.find_one(collection, filter).await?.is_some() {
                    WriteOutcome::Skipped
                } else {
                    self.store.insert_one(collection, doc).await?;
                    WriteOutcome::Inserted
                }
            }
            ConflictPolicy::Replace => match self.store.upsert_one(collection, filter, doc).await? {
                UpsertOutcome::Inserted => WriteOutcome::Inserted,
                UpsertOutcome::Replaced => WriteOutcome::Replaced,
            },
        };

        match outcome {
            WriteOutcome::Inserted => debug!("Inserted {}.{}={}", collection, key_field, key),
            WriteOutcome::Replaced => debug!("Replaced {}.{}={}", collection, key_field, key),
            WriteOutcome::Skipped => debug!("Skipped existing {}.{}={}", collection, key_field, key),
        }
        Ok(outcome)
    }

    /// Clears all seeded data.
    ///
    /// **WARNING**: This drops both collections, including any data the API wrote.
    pub async fn clear_all(&self) -> Result<(), SeedError> {
        warn!(
            "Dropping {} and {} in '{}'",
            TodoItem::COLLECTION,
            TodoList::COLLECTION,
            self.store.database_name()
        );

        self.store.drop_collection(TodoItem::COLLECTION).await?;
        self.store.drop_collection(TodoList::COLLECTION).await?;

        info!("All data cleared");
        Ok(())
    }

    /// Returns a reference to the store for advanced usage.
    pub fn store(&self) -> &S {
        &self.store
    }
}

impl WriteTally {
    fn record(&mut self, outcome: WriteOutcome) {
        match outcome {
            WriteOutcome::Inserted => self.inserted += 1,
            WriteOutcome::Replaced => self.replaced += 1,
            WriteOutcome::Skipped => self.skipped += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::{TodoPriority, TodoStatus};
    use time::macros::datetime;

    fn seeder() -> Seeder<MemoryStore> {
        Seeder::new(MemoryStore::new("todo_db"))
    }

    fn unix_millis(t: OffsetDateTime) -> i64 {
        (t.unix_timestamp_nanos() / 1_000_000) as i64
    }

    #[tokio::test]
    async fn test_empty_database_gets_one_document_each() {
        let seeder = seeder();
        let report = seeder.run(SampleVariant::Api).await.unwrap();

        assert_eq!(report.database, "todo_db");
        assert_eq!(report.collections_created, vec!["todo_lists", "todo_items"]);
        assert_eq!(report.lists.inserted, 1);
        assert_eq!(report.items.inserted, 1);

        let lists = seeder.store().documents("todo_lists").await;
        assert_eq!(lists.len(), 1);
        let list = &lists[0];
        assert_eq!(list.get_str("list_id").unwrap(), "list_test_001");
        assert_eq!(list.get_str("owner_id").unwrap(), "1");
        assert_eq!(list.get_str("title").unwrap(), "开发任务");
        assert_eq!(list.get_str("description").unwrap(), "API开发相关任务");

        let items = seeder.store().documents("todo_items").await;
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.get_str("item_id").unwrap(), "item_test_001");
        assert_eq!(item.get_str("list_id").unwrap(), "list_test_001");
        assert_eq!(item.get_str("title").unwrap(), "完成控制器代码");
        assert_eq!(item.get_str("description").unwrap(), "实现TODO项的CRUD接口");
        assert_eq!(item.get_str("status").unwrap(), "In Progress");
        assert_eq!(item.get_str("priority").unwrap(), "High");
    }

    #[tokio::test]
    async fn test_single_list_id_index() {
        let seeder = seeder();
        let report = seeder.run(SampleVariant::Api).await.unwrap();

        assert_eq!(report.index_name, "list_id_1");
        assert_eq!(
            seeder.store().index_keys("todo_items").await.unwrap(),
            vec![doc! { "list_id": 1 }]
        );
        assert!(seeder.store().index_keys("todo_lists").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_steps_run_in_order() {
        let seeder = seeder();
        seeder.run(SampleVariant::Scratch).await.unwrap();

        assert_eq!(
            seeder.store().operations().await,
            vec![
                "ensure todo_lists",
                "ensure todo_items",
                "upsert todo_lists",
                "upsert todo_items",
                "index todo_items",
            ]
        );
    }

    #[tokio::test]
    async fn test_tags_keep_order() {
        for (variant, expected) in [
            (SampleVariant::Api, vec!["开发", "紧急"]),
            (SampleVariant::Scratch, vec!["111", "2222"]),
        ] {
            let seeder = seeder();
            seeder.run(variant).await.unwrap();

            let items = seeder.store().documents("todo_items").await;
            let tags: Vec<&str> = items[0]
                .get_array("tags")
                .unwrap()
                .iter()
                .map(|t| t.as_str().unwrap())
                .collect();
            assert_eq!(tags, expected);
        }
    }

    #[tokio::test]
    async fn test_timestamps_taken_at_insert() {
        let seeder = seeder();
        let before = unix_millis(OffsetDateTime::now_utc());
        seeder.run(SampleVariant::Api).await.unwrap();
        let after = unix_millis(OffsetDateTime::now_utc());

        let lists = seeder.store().documents("todo_lists").await;
        let items = seeder.store().documents("todo_items").await;
        let item = &items[0];
        for doc in [&lists[0], item] {
            for field in ["created_at", "updated_at"] {
                let millis = doc.get_datetime(field).unwrap().timestamp_millis();
                assert!(
                    (before..=after).contains(&millis),
                    "{field} {millis} outside {before}..={after}"
                );
            }
        }

        let due = item.get_datetime("due_date").unwrap().timestamp_millis();
        assert_eq!(due, unix_millis(datetime!(2024-12-31 0:00 UTC)));
    }

    #[tokio::test]
    async fn test_rerun_with_append_duplicates() {
        let seeder = seeder().with_policy(ConflictPolicy::Append);
        seeder.run(SampleVariant::Api).await.unwrap();
        let report = seeder.run(SampleVariant::Api).await.unwrap();

        assert!(report.collections_created.is_empty());
        assert_eq!(report.lists.inserted, 1);
        let filter = doc! { "list_id": "list_test_001" };
        assert_eq!(seeder.store().count("todo_lists", filter).await.unwrap(), 2);
        assert_eq!(seeder.store().documents("todo_items").await.len(), 2);
        assert_eq!(seeder.store().index_keys("todo_items").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_rerun_with_replace_keeps_one() {
        let seeder = seeder();
        seeder.run(SampleVariant::Scratch).await.unwrap();
        let report = seeder.run(SampleVariant::Api).await.unwrap();

        assert_eq!(report.lists.replaced, 1);
        assert_eq!(report.items.replaced, 1);

        let lists = seeder.store().documents("todo_lists").await;
        assert_eq!(lists.len(), 1);
        // Second run's text wins
        assert_eq!(lists[0].get_str("title").unwrap(), "开发任务");
    }

    #[tokio::test]
    async fn test_rerun_with_skip_leaves_existing() {
        let seeder = seeder().with_policy(ConflictPolicy::Skip);
        seeder.run(SampleVariant::Scratch).await.unwrap();
        let report = seeder.run(SampleVariant::Api).await.unwrap();

        assert_eq!(report.lists.skipped, 1);
        assert_eq!(report.items.skipped, 1);
        assert_eq!(report.items.total(), 1);

        let items = seeder.store().documents("todo_items").await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].get_str("title").unwrap(), "sdf12312312");
    }

    #[tokio::test]
    async fn test_extra_documents_written_before_index() {
        let seeder = seeder().with_policy(ConflictPolicy::Append);
        let now = OffsetDateTime::now_utc();
        let list = TodoList {
            list_id: "list_0000beef".to_string(),
            owner_id: "7".to_string(),
            title: "Groceries".to_string(),
            description: String::new(),
            created_at: now,
            updated_at: now,
        };
        let item = TodoItem {
            item_id: "item_0000beef".to_string(),
            list_id: list.list_id.clone(),
            title: "Milk".to_string(),
            description: String::new(),
            due_date: now,
            status: TodoStatus::NotStarted,
            priority: TodoPriority::Low,
            tags: vec![],
            created_at: now,
            updated_at: now,
        };

        let report = seeder
            .run_with(SampleVariant::Api, &[list], &[item])
            .await
            .unwrap();

        assert_eq!(report.lists.inserted, 2);
        assert_eq!(report.items.inserted, 2);
        let ops = seeder.store().operations().await;
        assert_eq!(ops.last().map(String::as_str), Some("index todo_items"));
        assert_eq!(ops.iter().filter(|op| op.starts_with("insert")).count(), 4);
    }

    #[tokio::test]
    async fn test_invalid_document_aborts_remaining_steps() {
        let seeder = seeder();
        let now = OffsetDateTime::now_utc();
        let bad = TodoList {
            list_id: "list_bad".to_string(),
            owner_id: "1".to_string(),
            title: "  ".to_string(),
            description: String::new(),
            created_at: now,
            updated_at: now,
        };

        let err = seeder
            .run_with(SampleVariant::Api, &[bad], &[])
            .await
            .unwrap_err();

        assert!(matches!(err, SeedError::Invalid { ref id, .. } if id == "list_bad"));
        // The sample documents stay; the index step never ran
        assert_eq!(seeder.store().documents("todo_lists").await.len(), 1);
        assert!(seeder.store().index_keys("todo_items").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_all_drops_collections() {
        let seeder = seeder();
        seeder.run(SampleVariant::Api).await.unwrap();
        seeder.clear_all().await.unwrap();

        assert!(seeder.store().collection_names().await.is_empty());

        let report = seeder.run(SampleVariant::Api).await.unwrap();
        assert_eq!(report.collections_created.len(), 2);
    }
}
