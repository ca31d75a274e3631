//! MongoDB client and collection wrapper

use bson::{doc, Document};
use futures_util::TryStreamExt;
use mongodb::{
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, UpdateModifications},
    results::UpdateResult,
    Client, Collection, IndexModel,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

use crate::types::{FishdexError, Result};

/// Server error code for a unique index violation
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Trait for schemas that provide index definitions
pub trait IntoIndexes {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)>;
}

/// MongoDB client wrapper
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Connect and verify the database answers a ping
    pub async fn new(uri: &str, db_name: &str) -> Result<Self> {
        info!("Connecting to MongoDB at {}", uri);

        let client = Client::with_uri_str(with_timeouts(uri))
            .await
            .map_err(|e| FishdexError::Database(format!("Failed to connect to MongoDB: {}", e)))?;

        client
            .database(db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| FishdexError::Database(format!("MongoDB ping failed: {}", e)))?;

        info!("Connected to MongoDB database '{}'", db_name);

        Ok(Self {
            client,
            db_name: db_name.to_string(),
        })
    }

    /// Get a typed collection, creating its indexes
    pub async fn collection<T>(&self, name: &str) -> Result<MongoCollection<T>>
    where
        T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes,
    {
        MongoCollection::new(&self.client, &self.db_name, name).await
    }

    /// Close all pooled connections
    pub async fn shutdown(self) {
        info!("Closing MongoDB connections to '{}'", self.db_name);
        self.client.shutdown().await;
    }
}

/// Typed MongoDB collection with automatic indexing
#[derive(Debug, Clone)]
pub struct MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    inner: Collection<T>,
}

impl<T> MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes,
{
    /// Create a new collection and apply indexes
    pub async fn new(client: &Client, db_name: &str, collection_name: &str) -> Result<Self> {
        let collection = client.database(db_name).collection::<T>(collection_name);
        let mongo_collection = MongoCollection { inner: collection };

        mongo_collection.apply_indexes().await?;

        Ok(mongo_collection)
    }

    /// Apply schema-defined indexes
    async fn apply_indexes(&self) -> Result<()> {
        let schema_indices = T::into_indices();

        if schema_indices.is_empty() {
            return Ok(());
        }

        let indices: Vec<IndexModel> = schema_indices
            .into_iter()
            .map(|(keys, opts)| IndexModel::builder().keys(keys).options(opts).build())
            .collect();

        self.inner
            .create_indexes(indices)
            .await
            .map_err(|e| FishdexError::Database(format!("Failed to create indexes: {}", e)))?;

        Ok(())
    }

    /// Insert a document
    pub async fn insert_one(&self, item: T) -> Result<()> {
        self.inner
            .insert_one(item)
            .await
            .map_err(|e| FishdexError::Database(format!("Insert failed: {}", e)))?;

        Ok(())
    }

    /// Insert a document, returning `false` instead of an error when a unique
    /// key already exists
    pub async fn try_insert_one(&self, item: T) -> Result<bool> {
        match self.inner.insert_one(item).await {
            Ok(_) => Ok(true),
            Err(e) if is_duplicate_key(&e) => Ok(false),
            Err(e) => Err(FishdexError::Database(format!("Insert failed: {}", e))),
        }
    }

    /// Insert many documents in one round trip
    pub async fn insert_many(&self, items: Vec<T>) -> Result<u64> {
        if items.is_empty() {
            return Ok(0);
        }

        let result = self
            .inner
            .insert_many(items)
            .await
            .map_err(|e| FishdexError::Database(format!("Bulk insert failed: {}", e)))?;

        Ok(result.inserted_ids.len() as u64)
    }

    /// Find one document by filter
    pub async fn find_one(&self, filter: Document) -> Result<Option<T>> {
        self.inner
            .find_one(filter)
            .await
            .map_err(|e| FishdexError::Database(format!("Find failed: {}", e)))
    }

    /// Find documents by filter, optionally sorted and capped.
    ///
    /// A cursor error part way through fails the whole read.
    pub async fn find_many(
        &self,
        filter: Document,
        sort: Option<Document>,
        limit: Option<i64>,
    ) -> Result<Vec<T>> {
        let mut find = self.inner.find(filter);
        if let Some(sort) = sort {
            find = find.sort(sort);
        }
        if let Some(limit) = limit {
            find = find.limit(limit);
        }

        let cursor = find
            .await
            .map_err(|e| FishdexError::Database(format!("Find failed: {}", e)))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| FishdexError::Database(format!("Cursor read failed: {}", e)))
    }

    /// Delete one document, returning whether anything matched
    pub async fn delete_one(&self, filter: Document) -> Result<bool> {
        let result = self
            .inner
            .delete_one(filter)
            .await
            .map_err(|e| FishdexError::Database(format!("Delete failed: {}", e)))?;

        Ok(result.deleted_count > 0)
    }

    /// Count documents matching filter
    pub async fn count(&self, filter: Document) -> Result<u64> {
        self.inner
            .count_documents(filter)
            .await
            .map_err(|e| FishdexError::Database(format!("Count failed: {}", e)))
    }

    /// Update one document
    pub async fn update_one(
        &self,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> Result<UpdateResult> {
        self.inner
            .update_one(filter, update.into())
            .await
            .map_err(|e| FishdexError::Database(format!("Update failed: {}", e)))
    }
}

/// Whether a driver error is a unique index violation
fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY_CODE
    )
}

/// Append short selection/connect timeouts so an unreachable server fails
/// startup quickly instead of hanging
fn with_timeouts(uri: &str) -> String {
    const TIMEOUTS: &str = "serverSelectionTimeoutMS=3000&connectTimeoutMS=3000";

    if uri.contains('?') {
        return format!("{}&{}", uri, TIMEOUTS);
    }

    // Options must follow a slash after the host list
    let after_scheme = uri.split_once("://").map(|(_, rest)| rest).unwrap_or(uri);
    if after_scheme.contains('/') {
        format!("{}?{}", uri, TIMEOUTS)
    } else {
        format!("{}/?{}", uri, TIMEOUTS)
    }
}
