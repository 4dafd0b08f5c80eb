use std::path::PathBuf;

use thiserror::Error;

/// Failure talking to the remote translation endpoint.
///
/// Never fatal to the filter path: callers log the error and fall back to
/// the original, untranslated text.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("translation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("translation endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed translation response: {0}")]
    Malformed(String),
}

/// Persistence failure. Lookup failures degrade to a cache miss, insert
/// failures to returning the generated translation uncached.
#[derive(Debug, Error)]
#[error("translation store error: {0}")]
pub struct StoreError(#[from] pub rusqlite::Error);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
