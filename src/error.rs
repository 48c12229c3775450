use std::io;
use std::path::PathBuf;

/// Every failure the locator, persister and read-back path can produce.
///
/// The [`Teavet`](crate::Teavet) methods propagate these unchanged. Only the
/// process-wide facade in [`crate::facade`] turns them into process exits.
#[derive(thiserror::Error, Debug)]
pub enum TeavetError {
    #[error("unable to get working directory: {0}")]
    WorkingDirectory(#[source] io::Error),

    #[error("unable to create/append/open {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to marshal log record: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("unable to write to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("log file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("unable to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unable to parse log record in {path}: {source}")]
    Deserialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T, E = TeavetError> = std::result::Result<T, E>;
