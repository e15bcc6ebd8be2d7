use mongodb::bson::{self, Bson, Document, doc, oid::ObjectId};
use rand::Rng;

use super::models::*;
use super::store::{CollectionRef, DocumentStore};
use crate::error::{Error, Result};

/// Parse a hex ObjectId as printed by the insert operations.
pub fn parse_document_id(id: &str) -> Result<Bson> {
    ObjectId::parse_str(id.trim())
        .map(Bson::ObjectId)
        .map_err(|_| Error::InvalidId(id.to_string()))
}

/// Identifiers are printed bare, without the extended JSON wrapper.
pub fn display_id(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn display_document(document: &Option<Document>) -> String {
    match document {
        Some(document) => {
            let json: serde_json::Value = Bson::Document(document.clone()).into_relaxed_extjson();
            json.to_string()
        }
        None => "None".to_string(),
    }
}

pub async fn insert_restaurant<S: DocumentStore>(
    store: &S,
    target: &CollectionRef,
    record: &RestaurantRecord,
) -> Result<Bson> {
    insert_record(store, target, RecordType::Restaurant, record.to_document()?).await
}

pub async fn insert_review<S: DocumentStore>(
    store: &S,
    target: &CollectionRef,
    record: &ReviewRecord,
) -> Result<Bson> {
    insert_record(store, target, RecordType::Review, record.to_document()?).await
}

async fn insert_record<S: DocumentStore>(
    store: &S,
    target: &CollectionRef,
    record_type: RecordType,
    document: Document,
) -> Result<Bson> {
    let id = store
        .insert_one(target, document)
        .await
        .map_err(Error::operation("insert_one"))?;

    println!(
        "Inserted {} document with _id {}",
        record_type.as_str(),
        display_id(&id)
    );
    Ok(id)
}

/// Insert `{sample_field: <50..=500>}` and return its `_id`.
pub async fn insert_sample_document<S: DocumentStore>(
    store: &S,
    target: &CollectionRef,
) -> Result<Bson> {
    let value: i32 = rand::thread_rng().gen_range(50..=500);
    let id = store
        .insert_one(target, doc! { SAMPLE_FIELD_NAME: value })
        .await
        .map_err(Error::operation("insert_one"))?;

    println!("Inserted document with _id {}", display_id(&id));
    Ok(id)
}

pub async fn read_document<S: DocumentStore>(
    store: &S,
    target: &CollectionRef,
    document_id: &Bson,
) -> Result<Option<Document>> {
    let document = store
        .find_one(target, doc! { "_id": document_id.clone() })
        .await
        .map_err(Error::operation("find_one"))?;

    println!(
        "Found a document with _id {}: {}",
        display_id(document_id),
        display_document(&document)
    );
    Ok(document)
}

/// Overwrite the sample field with `"Updated!"` and return the document as stored afterwards.
pub async fn update_document<S: DocumentStore>(
    store: &S,
    target: &CollectionRef,
    document_id: &Bson,
) -> Result<Option<Document>> {
    let filter = doc! { "_id": document_id.clone() };
    store
        .update_one(
            target,
            filter.clone(),
            doc! { "$set": { SAMPLE_FIELD_NAME: "Updated!" } },
        )
        .await
        .map_err(Error::operation("update_one"))?;

    let document = store
        .find_one(target, filter)
        .await
        .map_err(Error::operation("find_one"))?;

    println!(
        "Updated document with _id {}: {}",
        display_id(document_id),
        display_document(&document)
    );
    Ok(document)
}

pub async fn delete_document<S: DocumentStore>(
    store: &S,
    target: &CollectionRef,
    document_id: &Bson,
) -> Result<u64> {
    let deleted = store
        .delete_one(target, doc! { "_id": document_id.clone() })
        .await
        .map_err(Error::operation("delete_one"))?;

    println!("Deleted document with _id {}", display_id(document_id));
    Ok(deleted)
}

pub async fn find_restaurants<S: DocumentStore>(
    store: &S,
    target: &CollectionRef,
) -> Result<Vec<RestaurantRecord>> {
    let documents = store
        .find(target, doc! { "type": RecordType::Restaurant.as_str() })
        .await
        .map_err(Error::operation("find"))?;

    decode_all(documents)
}

pub async fn find_reviews_for<S: DocumentStore>(
    store: &S,
    target: &CollectionRef,
    restaurant_id: &Bson,
) -> Result<Vec<ReviewRecord>> {
    let documents = store
        .find(
            target,
            doc! { "type": RecordType::Review.as_str(), "restaurant": restaurant_id.clone() },
        )
        .await
        .map_err(Error::operation("find"))?;

    decode_all(documents)
}

fn decode_all<T: serde::de::DeserializeOwned>(documents: Vec<Document>) -> Result<Vec<T>> {
    documents
        .into_iter()
        .map(|document| {
            bson::from_document(document).map_err(|err| Error::Operation {
                op: "decode",
                source: Box::new(err),
            })
        })
        .collect()
}

/// Remove every document from the collection.
pub async fn delete_all<S: DocumentStore>(store: &S, target: &CollectionRef) -> Result<u64> {
    let deleted = store
        .delete_many(target, doc! {})
        .await
        .map_err(Error::operation("delete_many"))?;

    tracing::info!(
        database = %target.database,
        collection = %target.collection,
        deleted,
        "Cleared collection"
    );
    println!("Deleted {} documents from {}", deleted, target.collection);
    Ok(deleted)
}
