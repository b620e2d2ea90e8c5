//! Unified error type for the dashboard data layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("upstream returned {status} for {endpoint}: {message}")]
    Remote {
        status: u16,
        endpoint: String,
        message: String,
    },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// True when the failure came from the network itself rather than
    /// from what the upstream sent back.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}
