//! Error types for fishreader operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::NodeId;

/// Errors that can occur while loading a library or reading configuration.
///
/// Encoding ambiguity and empty input are not errors: the normalizer always
/// produces text, and an empty file loads as a book with zero chapters.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Configuration write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Node {0} is not a book")]
    NotABook(NodeId),
}

impl Error {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Read {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
