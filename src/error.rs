//! Error types for the album sharing reconciler.
//!
//! Errors are grouped by concern: configuration, album tables and the remote
//! photo service. Each remote error is either scoped to one album (recorded
//! in that album's result, the run continues) or fatal to the whole run.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for album sharing operations.
#[derive(Debug, Error)]
pub enum AlbumShareError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Album table errors.
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// Remote photo service errors.
    #[error("Remote service error: {0}")]
    Remote(#[from] RemoteError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The service URL is malformed or uses an unsupported scheme.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL as supplied.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// No API key was supplied.
    #[error("Missing API key")]
    MissingApiKey,

    /// The API key cannot be sent as an HTTP header value.
    #[error("API key contains characters that are not valid in an HTTP header")]
    InvalidApiKey,

    /// The .env file exists but could not be loaded.
    #[error("Failed to load {path}: {message}")]
    DotEnv {
        /// Path to the .env file.
        path: PathBuf,
        /// Loader error message.
        message: String,
    },
}

/// Errors reading or writing album tables.
#[derive(Debug, Error)]
pub enum TableError {
    /// The input table does not exist.
    #[error("Input file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Required columns are absent from the header row.
    #[error(
        "Required columns not found: {} (found: {})",
        .missing.join(", "),
        .found.join(", ")
    )]
    MissingColumns {
        /// Required column names that were not present.
        missing: Vec<String>,
        /// Column names that were present.
        found: Vec<String>,
    },

    /// A data row could not be interpreted.
    #[error("Invalid row at line {line}: {message}")]
    InvalidRow {
        /// 1-based line number in the file.
        line: u64,
        /// Description of the problem.
        message: String,
    },

    /// The underlying CSV reader or writer failed.
    #[error("CSV error: {message}")]
    Csv {
        /// Description of the CSV error.
        message: String,
    },
}

/// Remote photo service errors.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Connectivity failure or timeout.
    #[error("Network error communicating with the photo service: {message}")]
    Transport {
        /// Description of the network error.
        message: String,
    },

    /// The API key was rejected.
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Description of the auth failure.
        message: String,
    },

    /// The service answered with a non-success status.
    #[error("API request failed: {status} - {message}")]
    ApiRequestFailed {
        /// HTTP status code.
        status: u16,
        /// Error message from the service.
        message: String,
    },

    /// The album identifier is unknown to the service.
    #[error("Album not found: {album_id}")]
    AlbumNotFound {
        /// The unknown album identifier.
        album_id: String,
    },

    /// The response body could not be decoded.
    #[error("Invalid response from the photo service: {message}")]
    InvalidResponse {
        /// Description of the response issue.
        message: String,
    },
}

/// Result type alias for album sharing operations.
pub type Result<T> = std::result::Result<T, AlbumShareError>;

impl AlbumShareError {
    /// Returns true if this error must abort the whole run.
    ///
    /// Authentication failures, bad configuration and unreadable input end the
    /// run. Transport, service and not-found errors only fail the album that
    /// raised them.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::Remote(
                RemoteError::Transport { .. }
                    | RemoteError::ApiRequestFailed { .. }
                    | RemoteError::AlbumNotFound { .. }
                    | RemoteError::InvalidResponse { .. }
            )
        )
    }

    /// Returns true if repeating the request could succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Remote(RemoteError::Transport { .. }))
    }

    /// Short reason recorded against a failed album.
    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::Remote(RemoteError::AlbumNotFound { .. }) => String::from("album not found"),
            Self::Remote(inner) => inner.to_string(),
            other => other.to_string(),
        }
    }
}

impl ConfigError {
    /// Creates an invalid URL error.
    #[must_use]
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

impl TableError {
    /// Creates a CSV error with the given message.
    #[must_use]
    pub fn csv(message: impl Into<String>) -> Self {
        Self::Csv {
            message: message.into(),
        }
    }
}

impl RemoteError {
    /// Creates an API request error.
    #[must_use]
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiRequestFailed {
            status,
            message: message.into(),
        }
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_album_scoped_errors_are_not_fatal() {
        let scoped = [
            AlbumShareError::from(RemoteError::network("timed out")),
            AlbumShareError::from(RemoteError::api_error(500, "boom")),
            AlbumShareError::from(RemoteError::AlbumNotFound {
                album_id: String::from("a1"),
            }),
            AlbumShareError::from(RemoteError::InvalidResponse {
                message: String::from("bad json"),
            }),
        ];
        for err in &scoped {
            assert!(!err.is_fatal(), "{err} should be album-scoped");
        }
    }

    #[test]
    fn test_run_level_errors_are_fatal() {
        let fatal = [
            AlbumShareError::from(RemoteError::Authentication {
                message: String::from("Invalid API key"),
            }),
            AlbumShareError::from(ConfigError::MissingApiKey),
            AlbumShareError::from(TableError::FileNotFound {
                path: PathBuf::from("missing.csv"),
            }),
        ];
        for err in &fatal {
            assert!(err.is_fatal(), "{err} should be fatal");
        }
    }

    #[test]
    fn test_only_transport_is_retryable() {
        assert!(AlbumShareError::from(RemoteError::network("reset")).is_retryable());
        assert!(!AlbumShareError::from(RemoteError::api_error(502, "bad gateway")).is_retryable());
    }

    #[test]
    fn test_album_not_found_reason() {
        let err = AlbumShareError::from(RemoteError::AlbumNotFound {
            album_id: String::from("abc"),
        });
        assert_eq!(err.reason(), "album not found");
    }

    #[test]
    fn test_missing_columns_message() {
        let err = TableError::MissingColumns {
            missing: vec![String::from("Role")],
            found: vec![String::from("AlbumName"), String::from("AlbumId")],
        };
        assert_eq!(
            err.to_string(),
            "Required columns not found: Role (found: AlbumName, AlbumId)"
        );
    }
}
