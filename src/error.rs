use std::path::PathBuf;
use thiserror::Error;

/// The single failure kind a page fetch can produce.
///
/// Transport errors, non-2xx responses and undecodable bodies all collapse
/// into this type. It is `Clone` so the query can keep the last error around
/// for display while also handing it back to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct NetworkError {
    pub status: Option<u16>,
    pub message: String,
}

impl NetworkError {
    pub fn status(status: u16, body: &str) -> Self {
        let body = body.trim();
        let message = if body.is_empty() {
            format!("Failed to fetch users (status {status})")
        } else {
            format!("Failed to fetch users (status {status}): {body}")
        };
        Self {
            status: Some(status),
            message,
        }
    }

    pub fn transport(err: &reqwest::Error) -> Self {
        Self {
            status: err.status().map(|s| s.as_u16()),
            message: format!("Failed to fetch users: {err}"),
        }
    }
}

#[derive(Error, Debug)]
pub enum FeedError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write config file at {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, FeedError>;
