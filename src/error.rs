//! Failures that end a connection.
//!
//! Protocol problems (bad version, unsupported method) are not errors: they
//! are answered with a response and the connection closes normally. The
//! variants here are the I/O failures after which the worker gives up on the
//! connection. None of them propagate past the connection's own task.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("error reading from request: {0}")]
    ReadRequest(#[source] std::io::Error),

    #[error("no request received within {0:?}")]
    ReadTimeout(Duration),

    #[error("error opening {path:?}: {source}")]
    OpenResource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error reading from file: {0}")]
    ReadResource(#[source] std::io::Error),

    #[error("error sending response: {0}")]
    WriteResponse(#[source] std::io::Error),

    #[error("connection closed while writing")]
    PeerClosed,
}

impl ConnectionError {
    /// Builds the not-found error for a request path that does not resolve
    /// to anything openable.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ConnectionError::OpenResource {
            path: path.into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such resource"),
        }
    }
}
