//! Typed errors for fetching and job setup.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use thiserror::Error;

/// A single retrieval that did not yield a body. Every variant means the
/// remote resource is unavailable for this run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Problems detected before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("start {start} is after end {end}")]
    EmptyRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    #[error("step must be positive")]
    NonPositiveStep,
    #[error("invalid url template `{0}`")]
    BadTemplate(String),
    #[error("destination `{0}` does not exist")]
    MissingDestination(PathBuf),
    #[error("destination `{0}` is not a directory")]
    NotADirectory(PathBuf),
    #[error("destination `{path}` is not writable: {source}")]
    Unwritable {
        path: PathBuf,
        source: std::io::Error,
    },
}
