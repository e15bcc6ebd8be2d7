use mongodb::bson::doc;

use super::store::{CollectionRef, DocumentStore};
use crate::error::{Error, Result};

/// Create `db_name` with shared `throughput` and an unsharded `collection_name`
/// inside it, skipping whichever already exists.
///
/// The existence check and the create command are separate round-trips, so two
/// provisioners racing on a fresh account can both issue a create. The loser's
/// failure is returned as [`Error::Provisioning`] rather than swallowed.
pub async fn ensure_collection<S: DocumentStore>(
    store: &S,
    db_name: &str,
    collection_name: &str,
    throughput: i32,
) -> Result<CollectionRef> {
    let databases = store
        .list_database_names()
        .await
        .map_err(Error::provisioning("list databases"))?;

    if !databases.iter().any(|name| name == db_name) {
        store
            .run_command(
                db_name,
                doc! { "customAction": "CreateDatabase", "offerThroughput": throughput },
            )
            .await
            .map_err(Error::provisioning(format!("create database {}", db_name)))?;
        tracing::info!(database = db_name, throughput, "Created database with shared throughput");
        println!("Created db {} with shared throughput", db_name);
    }

    let collections = store
        .list_collection_names(db_name)
        .await
        .map_err(Error::provisioning(format!("list collections in {}", db_name)))?;

    if !collections.iter().any(|name| name == collection_name) {
        store
            .run_command(
                db_name,
                doc! { "customAction": "CreateCollection", "collection": collection_name },
            )
            .await
            .map_err(Error::provisioning(format!("create collection {}", collection_name)))?;
        tracing::info!(database = db_name, collection = collection_name, "Created collection");
        println!("Created collection {}", collection_name);
    }

    Ok(CollectionRef::new(db_name, collection_name))
}
