use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to fetch {url}: HTTP {status}")]
    RemoteFetchFailed { status: u16, url: String },
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Invalid version string: {0}")]
    InvalidVersionString(String),

    #[error("Unrecognized EOL type for cycle {cycle}: {kind}")]
    UnrecognizedEolType { cycle: String, kind: String },

    #[error("Unable to parse EOL date for cycle {cycle}: {value}")]
    UnparseableEolDate { cycle: String, value: String },

    #[error("No valid versions found")]
    NoValidVersionsFound,
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Technology not found: {name}")]
    UnknownTechnology { name: String },

    #[error("Failed to decode lifecycle data: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}
