use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};

/// Shared throughput (RU/s) given to a database created by the provisioner.
pub const DEFAULT_THROUGHPUT: i32 = 400;

#[derive(Clone)]
pub struct Config {
    pub connection_string: String,
    pub db_name: String,
    pub collection_name: String,
    /// Always positive.
    pub throughput: i32,
    /// Overrides the driver's server selection timeout when set.
    pub server_selection_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| {
            lookup(var)
                .filter(|value| !value.trim().is_empty())
                .ok_or(Error::MissingConfig { var })
        };

        let throughput = match lookup("DB_THROUGHPUT") {
            Some(value) => match value.trim().parse::<i32>() {
                Ok(throughput) if throughput > 0 => throughput,
                _ => {
                    return Err(Error::InvalidConfig {
                        var: "DB_THROUGHPUT",
                        value,
                    });
                }
            },
            None => DEFAULT_THROUGHPUT,
        };

        let server_selection_timeout = match lookup("SERVER_SELECTION_TIMEOUT_SECS") {
            Some(value) => Some(Duration::from_secs(value.trim().parse::<u64>().map_err(
                |_| Error::InvalidConfig {
                    var: "SERVER_SELECTION_TIMEOUT_SECS",
                    value,
                },
            )?)),
            None => None,
        };

        Ok(Config {
            connection_string: required("CONNECTION_STRING")?,
            db_name: required("DB_NAME")?,
            collection_name: required("COLLECTION_NAME")?,
            throughput,
            server_selection_timeout,
        })
    }
}

// The connection string carries the account key.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("connection_string", &"<redacted>")
            .field("db_name", &self.db_name)
            .field("collection_name", &self.collection_name)
            .field("throughput", &self.throughput)
            .field("server_selection_timeout", &self.server_selection_timeout)
            .finish()
    }
}
