//! In-memory [`DocumentStore`] for unit tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use mongodb::bson::{Bson, Document, oid::ObjectId};

use crate::db_mongo::store::{CollectionRef, DocumentStore, DriverResult};

type Collections = BTreeMap<String, Vec<Document>>;

#[derive(Default)]
pub struct MemoryStore {
    databases: Mutex<BTreeMap<String, Collections>>,
    commands: Mutex<Vec<(String, Document)>>,
    reject_commands: bool,
    reject_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every administrative command.
    pub fn reject_commands(mut self) -> Self {
        self.reject_commands = true;
        self
    }

    /// Fail every insert, update and delete.
    pub fn reject_writes(mut self) -> Self {
        self.reject_writes = true;
        self
    }

    pub fn seed_database(&self, name: &str) {
        self.databases
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default();
    }

    /// Administrative commands received so far, with the database each ran against.
    pub fn commands(&self) -> Vec<(String, Document)> {
        self.commands.lock().unwrap().clone()
    }

    pub fn count(&self, target: &CollectionRef) -> usize {
        self.databases
            .lock()
            .unwrap()
            .get(&target.database)
            .and_then(|collections| collections.get(&target.collection))
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn check_write(&self) -> DriverResult<()> {
        if self.reject_writes {
            return Err("write rejected".into());
        }
        Ok(())
    }

    /// Runs `f` on the collection if it exists. Only inserts create resources.
    fn with_collection<T>(
        &self,
        target: &CollectionRef,
        f: impl FnOnce(&mut Vec<Document>) -> T,
    ) -> Option<T> {
        let mut databases = self.databases.lock().unwrap();
        databases
            .get_mut(&target.database)
            .and_then(|collections| collections.get_mut(&target.collection))
            .map(f)
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

impl DocumentStore for MemoryStore {
    async fn list_database_names(&self) -> DriverResult<Vec<String>> {
        Ok(self.databases.lock().unwrap().keys().cloned().collect())
    }

    async fn list_collection_names(&self, database: &str) -> DriverResult<Vec<String>> {
        Ok(self
            .databases
            .lock()
            .unwrap()
            .get(database)
            .map(|collections| collections.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn run_command(&self, database: &str, command: Document) -> DriverResult<Document> {
        self.commands
            .lock()
            .unwrap()
            .push((database.to_string(), command.clone()));

        if self.reject_commands {
            return Err("command rejected".into());
        }

        let mut databases = self.databases.lock().unwrap();
        match command.get_str("customAction") {
            Ok("CreateDatabase") => {
                databases.entry(database.to_string()).or_default();
            }
            Ok("CreateCollection") => {
                let name = command.get_str("collection")?;
                databases
                    .entry(database.to_string())
                    .or_default()
                    .entry(name.to_string())
                    .or_default();
            }
            _ => return Err(format!("unsupported command {}", command).into()),
        }
        Ok(mongodb::bson::doc! { "ok": 1 })
    }

    async fn insert_one(&self, target: &CollectionRef, mut document: Document) -> DriverResult<Bson> {
        self.check_write()?;
        if !document.contains_key("_id") {
            document.insert("_id", ObjectId::new());
        }
        let id = document.get("_id").cloned().unwrap_or(Bson::Null);
        self.databases
            .lock()
            .unwrap()
            .entry(target.database.clone())
            .or_default()
            .entry(target.collection.clone())
            .or_default()
            .push(document);
        Ok(id)
    }

    async fn find_one(
        &self,
        target: &CollectionRef,
        filter: Document,
    ) -> DriverResult<Option<Document>> {
        Ok(self.with_collection(target, |documents| {
            documents.iter().find(|d| matches(d, &filter)).cloned()
        })
        .flatten())
    }

    async fn find(&self, target: &CollectionRef, filter: Document) -> DriverResult<Vec<Document>> {
        Ok(self.with_collection(target, |documents| {
            documents
                .iter()
                .filter(|d| matches(d, &filter))
                .cloned()
                .collect()
        })
        .unwrap_or_default())
    }

    async fn update_one(
        &self,
        target: &CollectionRef,
        filter: Document,
        update: Document,
    ) -> DriverResult<u64> {
        self.check_write()?;
        let set = update.get_document("$set")?.clone();
        Ok(self.with_collection(target, |documents| {
            match documents.iter_mut().find(|d| matches(d, &filter)) {
                Some(document) => {
                    for (key, value) in set {
                        document.insert(key, value);
                    }
                    1
                }
                None => 0,
            }
        })
        .unwrap_or(0))
    }

    async fn delete_one(&self, target: &CollectionRef, filter: Document) -> DriverResult<u64> {
        self.check_write()?;
        Ok(self.with_collection(target, |documents| {
            match documents.iter().position(|d| matches(d, &filter)) {
                Some(index) => {
                    documents.remove(index);
                    1
                }
                None => 0,
            }
        })
        .unwrap_or(0))
    }

    async fn delete_many(&self, target: &CollectionRef, filter: Document) -> DriverResult<u64> {
        self.check_write()?;
        Ok(self.with_collection(target, |documents| {
            let before = documents.len();
            documents.retain(|d| !matches(d, &filter));
            (before - documents.len()) as u64
        })
        .unwrap_or(0))
    }
}
