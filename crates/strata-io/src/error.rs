use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("i/o on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },
    #[error("cannot encode record: {source}")]
    Encode {
        #[source]
        source: bincode::Error,
    },
    #[error("invalid record in {}: {reason}", path.display())]
    InvalidRecord { path: PathBuf, reason: String },
}

impl IoError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IoError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        IoError::InvalidRecord {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
