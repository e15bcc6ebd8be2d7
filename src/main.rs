pub mod config;
pub mod db_mongo;
pub mod error;
pub mod runner;

#[cfg(test)]
mod testing;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::db_mongo::provision::ensure_collection;
use crate::db_mongo::queries;
use crate::db_mongo::store::{CollectionRef, MongoStore};

/// CRUD walkthrough against Azure Cosmos DB API for MongoDB.
///
/// Provisioning uses Cosmos `customAction` commands, so `run` and `insert-sample`
/// need the Cosmos API when the database or collection does not exist yet.
#[derive(Parser)]
#[command(name = "restaurant-reviews", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Provision the database and collection, write restaurants and reviews, then query them
    Run,
    /// Delete every document in the collection
    Clean,
    /// Insert a document with a random sample_field
    InsertSample,
    /// Print the document with the given _id
    Read {
        #[arg(long)]
        id: String,
    },
    /// Set sample_field to "Updated!" on the document with the given _id
    Update {
        #[arg(long)]
        id: String,
    },
    /// Delete the document with the given _id
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    tracing::debug!(?config, "Loaded configuration");

    let client = match db_mongo::create_client(&config).await {
        Ok(client) => client,
        Err(err) => {
            if err.is_retryable() {
                tracing::warn!("Could not reach the server; nothing was written");
            }
            return Err(err.into());
        }
    };
    let store = MongoStore::new(client);
    let target = CollectionRef::new(&config.db_name, &config.collection_name);

    match cli.command {
        Command::Run => {
            let summary = runner::run(&store, &config).await?;
            tracing::info!(
                inserted_restaurants = summary.restaurant_ids.len(),
                inserted_reviews = summary.review_ids.len(),
                restaurants = summary.restaurants.len(),
                reviews = summary.reviews.len(),
                "Run finished"
            );
        }
        Command::Clean => {
            runner::clean(&store, &config).await?;
        }
        Command::InsertSample => {
            let target = ensure_collection(
                &store,
                &config.db_name,
                &config.collection_name,
                config.throughput,
            )
            .await?;
            queries::insert_sample_document(&store, &target).await?;
        }
        Command::Read { id } => {
            let id = queries::parse_document_id(&id)?;
            queries::read_document(&store, &target, &id).await?;
        }
        Command::Update { id } => {
            let id = queries::parse_document_id(&id)?;
            queries::update_document(&store, &target, &id).await?;
        }
        Command::Delete { id } => {
            let id = queries::parse_document_id(&id)?;
            queries::delete_document(&store, &target, &id).await?;
        }
    }

    Ok(())
}
