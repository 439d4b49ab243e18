//! Error types for untika library.

use std::io;
use thiserror::Error;

/// Result type alias for untika operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The HTTP client was not compiled into this build.
    #[error("Tika client is not available: {0}")]
    ClientUnavailable(String),

    /// The extraction service did not answer the reachability probe.
    #[error(
        "Apache Tika server is not reachable at '{url}' ({reason}). To run it locally \
         with Docker, execute: 'docker run -p 9998:9998 apache/tika:1.28.4'"
    )]
    ServiceUnreachable {
        /// Probed URL
        url: String,
        /// Status code or transport error
        reason: String,
    },

    /// The extraction service rejected a document.
    #[error("Tika server returned status {status}: {message}")]
    Service {
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The service answered with something that is not a Tika rmeta payload.
    #[error("Invalid service response: {0}")]
    InvalidResponse(String),

    /// Error during rendering (text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidResponse(err.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Error::Service {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => Error::Http(err.to_string()),
        }
    }
}
