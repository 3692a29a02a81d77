//! Flipdeck - Error types

use thiserror::Error;

/// Failure to obtain the raw deck text
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to read {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to start a card session
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("deck has no cards")]
    EmptyDataset,
}

/// Anything that keeps a session from starting
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Session(#[from] SessionError),
}
