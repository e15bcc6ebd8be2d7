use thiserror::Error;

/// Error type produced by a storage driver behind [`crate::db_mongo::store::DocumentStore`].
pub type DriverError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("environment variable {var} is not set")]
    MissingConfig { var: &'static str },

    #[error("environment variable {var} has an invalid value '{value}'")]
    InvalidConfig { var: &'static str, value: String },

    #[error("{message}")]
    Connection {
        message: String,
        #[source]
        source: DriverError,
    },

    #[error("failed to {action}")]
    Provisioning {
        action: String,
        #[source]
        source: DriverError,
    },

    #[error("{op} failed")]
    Operation {
        op: &'static str,
        #[source]
        source: DriverError,
    },

    #[error("'{0}' is not a valid document id")]
    InvalidId(String),

    #[error("failed to encode record")]
    Encode(#[from] mongodb::bson::ser::Error),
}

impl Error {
    /// Only a failed liveness check is worth retrying; everything else points at configuration.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Connection { .. })
    }

    pub(crate) fn operation(op: &'static str) -> impl FnOnce(DriverError) -> Error {
        move |source| Error::Operation { op, source }
    }

    pub(crate) fn provisioning(action: impl Into<String>) -> impl FnOnce(DriverError) -> Error {
        let action = action.into();
        move |source| Error::Provisioning { action, source }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
