use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::source::SourceKey;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to read corpus file `{path}`")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to fetch corpus from `{url}`: {message}")]
    Http { url: String, message: String },
    #[error("corpus source `{key}` is unavailable: {reason}")]
    SourceUnavailable {
        key: SourceKey,
        #[source]
        reason: Box<CorpusError>,
    },
}

impl CorpusError {
    /// The key of the source that failed, when known.
    pub fn key(&self) -> Option<&SourceKey> {
        match self {
            CorpusError::SourceUnavailable { key, .. } => Some(key),
            _ => None,
        }
    }
}
