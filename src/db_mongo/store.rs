use futures::TryStreamExt;
use mongodb::{
    Client, Collection,
    bson::{Bson, Document},
};

use crate::error::DriverError;

pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// A named collection inside a named database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRef {
    pub database: String,
    pub collection: String,
}

impl CollectionRef {
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
        }
    }
}

/// Driver primitives the provisioner and the CRUD operations are written against.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    async fn list_database_names(&self) -> DriverResult<Vec<String>>;

    async fn list_collection_names(&self, database: &str) -> DriverResult<Vec<String>>;

    /// Run an administrative command against `database`.
    async fn run_command(&self, database: &str, command: Document) -> DriverResult<Document>;

    /// Insert a document and return the identifier the store assigned to it.
    async fn insert_one(&self, target: &CollectionRef, document: Document) -> DriverResult<Bson>;

    async fn find_one(
        &self,
        target: &CollectionRef,
        filter: Document,
    ) -> DriverResult<Option<Document>>;

    async fn find(&self, target: &CollectionRef, filter: Document) -> DriverResult<Vec<Document>>;

    /// Returns the number of documents modified.
    async fn update_one(
        &self,
        target: &CollectionRef,
        filter: Document,
        update: Document,
    ) -> DriverResult<u64>;

    /// Returns the number of documents deleted.
    async fn delete_one(&self, target: &CollectionRef, filter: Document) -> DriverResult<u64>;

    /// Returns the number of documents deleted.
    async fn delete_many(&self, target: &CollectionRef, filter: Document) -> DriverResult<u64>;
}

pub struct MongoStore {
    client: Client,
}

impl MongoStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn collection(&self, target: &CollectionRef) -> Collection<Document> {
        self.client
            .database(&target.database)
            .collection::<Document>(&target.collection)
    }
}

impl DocumentStore for MongoStore {
    async fn list_database_names(&self) -> DriverResult<Vec<String>> {
        Ok(self.client.list_database_names().await?)
    }

    async fn list_collection_names(&self, database: &str) -> DriverResult<Vec<String>> {
        Ok(self.client.database(database).list_collection_names().await?)
    }

    async fn run_command(&self, database: &str, command: Document) -> DriverResult<Document> {
        Ok(self.client.database(database).run_command(command).await?)
    }

    async fn insert_one(&self, target: &CollectionRef, document: Document) -> DriverResult<Bson> {
        let result = self.collection(target).insert_one(document).await?;
        Ok(result.inserted_id)
    }

    async fn find_one(
        &self,
        target: &CollectionRef,
        filter: Document,
    ) -> DriverResult<Option<Document>> {
        Ok(self.collection(target).find_one(filter).await?)
    }

    async fn find(&self, target: &CollectionRef, filter: Document) -> DriverResult<Vec<Document>> {
        let cursor = self.collection(target).find(filter).await?;
        Ok(cursor.try_collect::<Vec<Document>>().await?)
    }

    async fn update_one(
        &self,
        target: &CollectionRef,
        filter: Document,
        update: Document,
    ) -> DriverResult<u64> {
        let result = self.collection(target).update_one(filter, update).await?;
        Ok(result.modified_count)
    }

    async fn delete_one(&self, target: &CollectionRef, filter: Document) -> DriverResult<u64> {
        let result = self.collection(target).delete_one(filter).await?;
        Ok(result.deleted_count)
    }

    async fn delete_many(&self, target: &CollectionRef, filter: Document) -> DriverResult<u64> {
        let result = self.collection(target).delete_many(filter).await?;
        Ok(result.deleted_count)
    }
}
