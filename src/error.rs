//! Error handling for the comparison engine

use thiserror::Error;

/// The main error type for comparison operations.
///
/// Malformed collaborator input and degenerate geometry are fatal: they
/// abort the whole comparison and are never retried. An empty document is
/// not an error (it diffs as all-inserted or all-deleted).
#[derive(Error, Debug)]
pub enum Error {
    #[error("contract violation: {0}")]
    Contract(String),
    #[error("geometry error: {0}")]
    Geometry(String),
    #[error("invalid argument: {0}")]
    Argument(String),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    pub fn contract<S: Into<String>>(msg: S) -> Self {
        Error::Contract(msg.into())
    }
    pub fn geometry<S: Into<String>>(msg: S) -> Self {
        Error::Geometry(msg.into())
    }
    pub fn argument<S: Into<String>>(msg: S) -> Self {
        Error::Argument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
