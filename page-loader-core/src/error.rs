use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Output path '{}' does not exist or is not a directory", .0.display())]
    InvalidDirectory(PathBuf),

    #[error("Request to {url} failed: {source}")]
    FetchError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Could not write '{}': {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("HTTP client setup failed: {0}")]
    ClientSetup(#[source] reqwest::Error),
}

impl MirrorError {
    pub(crate) fn fetch(url: &url::Url, source: reqwest::Error) -> Self {
        MirrorError::FetchError {
            url: url.to_string(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MirrorError::IoError {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, MirrorError>;
