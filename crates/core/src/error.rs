// ABOUTME: Error types for the search pipeline and its collaborators.
// ABOUTME: Provides ScoutError with fetch, status, cache, and serialization variants.

use std::fmt;
use thiserror::Error;

/// Errors that can surface from the fetch, cache, and image collaborators.
///
/// None of these are fatal to a search: the pipeline maps them to an empty
/// or degraded result list.
#[derive(Debug, Error)]
pub enum ScoutError {
    /// A URL could not be parsed or resolved against the origin.
    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The transport failed before a response arrived.
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The server answered with a non-success status code.
    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    /// A cache backend could not read or write an entry.
    #[error("cache error for key {key}: {reason}")]
    Cache { key: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

impl ScoutError {
    /// Creates an InvalidUrl error.
    pub fn invalid_url(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        ScoutError::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a Fetch error from an underlying transport error.
    pub fn fetch(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        ScoutError::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a Status error.
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        ScoutError::Status {
            url: url.into(),
            status,
        }
    }

    /// Creates a Cache error.
    pub fn cache(key: impl Into<String>, reason: impl fmt::Display) -> Self {
        ScoutError::Cache {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true if the request never produced a usable response.
    pub fn is_fetch(&self) -> bool {
        matches!(self, ScoutError::Fetch { .. } | ScoutError::Status { .. })
    }
}
