//! [`DocumentStore`] backed by a live MongoDB deployment.

use async_trait::async_trait;
use bson::{Document, doc};
use futures_util::TryStreamExt;
use mongodb::error::{Error as MongoError, ErrorKind};
use mongodb::{Client, Collection, Database, IndexModel};
use tracing::{debug, info};

use super::SeedError;
use super::store::{DocumentStore, UpsertOutcome};

/// Server error code for creating a collection that already exists.
const NAMESPACE_EXISTS: i32 = 48;
/// Server error code for operating on a collection that does not exist.
const NAMESPACE_NOT_FOUND: i32 = 26;

fn has_code(err: &MongoError, code: i32) -> bool {
    matches!(err.kind.as_ref(), ErrorKind::Command(cmd) if cmd.code == code)
}

/// MongoDB-backed store bound to a single database.
pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    /// Connects to `uri`, verifies the server answers a ping, and selects `database`.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, SeedError> {
        let client = Client::with_uri_str(uri).await?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        info!("Connected to MongoDB, using database '{}'", database);
        Ok(Self::from_client(client, database))
    }

    /// Wraps an existing client.
    pub fn from_client(client: Client, database: &str) -> Self {
        let db = client.database(database);
        Self { client, db }
    }

    /// Drops the whole database. Used to clean up throwaway test databases.
    pub async fn drop_database(&self) -> Result<(), SeedError> {
        self.db.drop().await?;
        Ok(())
    }

    /// Returns a reference to the client for advanced usage.
    pub fn client(&self) -> &Client {
        &self.client
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn database_name(&self) -> &str {
        self.db.name()
    }

    async fn ensure_collection(&self, name: &str) -> Result<bool, SeedError> {
        let existing = self.db.list_collection_names().await?;
        if existing.iter().any(|c| c == name) {
            debug!("Collection '{}' already exists", name);
            return Ok(false);
        }

        match self.db.create_collection(name).await {
            Ok(()) => Ok(true),
            // Another seeder created it between the listing and the create
            Err(e) if has_code(&e, NAMESPACE_EXISTS) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn insert_one(&self, collection: &str, doc: Document) -> Result<(), SeedError> {
        self.collection(collection).insert_one(doc).await?;
        Ok(())
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, SeedError> {
        Ok(self.collection(collection).find_one(filter).await?)
    }

    async fn upsert_one(
        &self,
        collection: &str,
        filter: Document,
        doc: Document,
    ) -> Result<UpsertOutcome, SeedError> {
        let result = self
            .collection(collection)
            .replace_one(filter, doc)
            .upsert(true)
            .await?;

        if result.upserted_id.is_some() {
            Ok(UpsertOutcome::Inserted)
        } else {
            Ok(UpsertOutcome::Replaced)
        }
    }

    async fn create_index(&self, collection: &str, keys: Document) -> Result<String, SeedError> {
        let model = IndexModel::builder().keys(keys).build();
        let result = self.collection(collection).create_index(model).await?;
        Ok(result.index_name)
    }

    async fn index_keys(&self, collection: &str) -> Result<Vec<Document>, SeedError> {
        let mut cursor = match self.collection(collection).list_indexes().await {
            Ok(cursor) => cursor,
            Err(e) if has_code(&e, NAMESPACE_NOT_FOUND) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let id_index = doc! { "_id": 1 };
        let mut keys = Vec::new();
        while let Some(model) = cursor.try_next().await? {
            if model.keys != id_index {
                keys.push(model.keys);
            }
        }
        Ok(keys)
    }

    async fn count(&self, collection: &str, filter: Document) -> Result<u64, SeedError> {
        Ok(self.collection(collection).count_documents(filter).await?)
    }

    async fn drop_collection(&self, name: &str) -> Result<(), SeedError> {
        self.collection(name).drop().await?;
        Ok(())
    }
}
