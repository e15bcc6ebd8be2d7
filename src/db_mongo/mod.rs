pub mod models;
pub mod provision;
pub mod queries;
pub mod store;

use mongodb::{Client, bson::doc, error::ErrorKind, options::ClientOptions};

use crate::config::Config;
use crate::error::{Error, Result};

const CONNECT_FAILED: &str =
    "Invalid API for MongoDB connection string or timed out when attempting to connect";

/// Create MongoDB connection and verify it with a single ping.
pub async fn create_client(config: &Config) -> Result<Client> {
    let mut options = ClientOptions::parse(&config.connection_string)
        .await
        .map_err(connection_error)?;
    if let Some(timeout) = config.server_selection_timeout {
        options.server_selection_timeout = Some(timeout);
    }

    let client = Client::with_options(options).map_err(connection_error)?;

    // Ping to verify connection
    client
        .database("admin")
        .run_command(doc! {"ping": 1})
        .await
        .map_err(connection_error)?;

    tracing::info!("Successfully connected to MongoDB");
    Ok(client)
}

fn connection_error(err: mongodb::error::Error) -> Error {
    let message = match *err.kind {
        ErrorKind::ServerSelection { .. } => CONNECT_FAILED.to_string(),
        ErrorKind::InvalidArgument { .. } => "Invalid API for MongoDB connection string".to_string(),
        _ => format!("Failed to connect to MongoDB: {}", err),
    };
    Error::Connection {
        message,
        source: Box::new(err),
    }
}
