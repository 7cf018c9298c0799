use std::path::PathBuf;
use thiserror::Error;

/// Closed set of failure kinds surfaced by the storage layers.
///
/// The HTTP layer branches on the variant, never on message text. Validation
/// failures (bad path or query input) are rejected in the handlers and never
/// become a `VehicleError`.
#[derive(Debug, Error)]
pub enum VehicleError {
    /// The vehicle file could not be opened, read or written.
    #[error("vehicle file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The vehicle file or the in-memory collection could not be (de)serialized.
    #[error("vehicle file {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A query matched zero records. The message carries the query parameters.
    #[error("{0}")]
    NotFound(String),
}

impl VehicleError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
