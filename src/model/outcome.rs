//! Per-album results and the batch summary they accumulate into.

use serde::Serialize;
use std::fmt;

use crate::error::AlbumShareError;

/// A single user operation the service refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserFailure {
    /// The user the operation was for.
    pub user: String,
    /// Why it failed.
    pub reason: String,
}

/// Outcome of reconciling one album.
#[derive(Debug, Clone, Serialize)]
pub struct OperationResult {
    /// Album identifier.
    pub album_id: String,
    /// Album name.
    pub album_name: String,
    /// Users the album was shared with.
    pub added: usize,
    /// Users whose role was changed.
    pub updated: usize,
    /// Users removed from the album.
    pub removed: usize,
    /// Requested users the service could not resolve.
    pub not_found: Vec<String>,
    /// User operations that failed.
    pub user_failures: Vec<UserFailure>,
    /// Whether the album reached its desired state.
    pub success: bool,
    /// Reason the album failed, if it did.
    pub error: Option<String>,
    /// Whether the failure was transient.
    pub retryable: bool,
    /// Whether changes were only planned.
    pub dry_run: bool,
}

impl OperationResult {
    /// Creates a successful result with no changes.
    #[must_use]
    pub fn new(album_id: impl Into<String>, album_name: impl Into<String>) -> Self {
        Self {
            album_id: album_id.into(),
            album_name: album_name.into(),
            added: 0,
            updated: 0,
            removed: 0,
            not_found: Vec::new(),
            user_failures: Vec::new(),
            success: true,
            error: None,
            retryable: false,
            dry_run: false,
        }
    }

    /// Creates a result for an album that could not be processed.
    #[must_use]
    pub fn failed(
        album_id: impl Into<String>,
        album_name: impl Into<String>,
        error: &AlbumShareError,
    ) -> Self {
        let mut result = Self::new(album_id, album_name);
        result.mark_failed(error);
        result
    }

    /// Marks the album failed, keeping whatever changes were already counted.
    pub fn mark_failed(&mut self, error: &AlbumShareError) {
        self.success = false;
        self.error = Some(error.reason());
        self.retryable = error.is_retryable();
    }

    /// Total number of user changes.
    #[must_use]
    pub const fn change_count(&self) -> usize {
        self.added + self.updated + self.removed
    }

    /// Human-readable failure reason, if the album failed.
    #[must_use]
    pub fn failure_reason(&self) -> Option<String> {
        if self.success {
            return None;
        }
        Some(self.error.clone().unwrap_or_else(|| {
            format!("{} user operation(s) failed", self.user_failures.len())
        }))
    }
}

/// Aggregate of every album processed in one run.
#[derive(Debug, Default, Serialize)]
pub struct BatchSummary {
    /// Albums processed.
    pub total_albums: usize,
    /// Albums that reached their desired state.
    pub succeeded: usize,
    /// Albums that failed.
    pub failed: usize,
    /// Users added across all albums.
    pub users_added: usize,
    /// Users whose role changed across all albums.
    pub users_updated: usize,
    /// Users removed across all albums.
    pub users_removed: usize,
    /// Unresolvable users, in the order they were reported.
    pub not_found: Vec<String>,
    /// Per-album results in processing order.
    pub results: Vec<OperationResult>,
}

impl BatchSummary {
    /// Adds one album result to the totals.
    pub fn record(&mut self, result: OperationResult) {
        self.total_albums += 1;
        if result.success {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
        self.users_added += result.added;
        self.users_updated += result.updated;
        self.users_removed += result.removed;
        self.not_found.extend(result.not_found.iter().cloned());
        self.results.push(result);
    }

    /// Returns true if no album failed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Results of the albums that failed.
    pub fn failed_albums(&self) -> impl Iterator<Item = &OperationResult> {
        self.results.iter().filter(|r| !r.success)
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total albums processed: {}", self.total_albums)?;
        writeln!(f, "  Succeeded: {}", self.succeeded)?;
        writeln!(f, "  Failed: {}", self.failed)?;
        writeln!(f, "  Users added: {}", self.users_added)?;
        writeln!(f, "  Users updated: {}", self.users_updated)?;
        writeln!(f, "  Users removed: {}", self.users_removed)?;

        if !self.not_found.is_empty() {
            writeln!(f, "Users not found:")?;
            for user in &self.not_found {
                writeln!(f, "  - {user}")?;
            }
        }

        let mut failures = self.failed_albums().peekable();
        if failures.peek().is_some() {
            writeln!(f, "Failed albums:")?;
            for result in failures {
                let reason = result.failure_reason().unwrap_or_default();
                writeln!(f, "  - {} ({}): {reason}", result.album_name, result.album_id)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteError;

    #[test]
    fn test_record_accumulates_totals() {
        let mut summary = BatchSummary::default();

        let mut first = OperationResult::new("a1", "Trip");
        first.added = 2;
        first.removed = 1;
        first.not_found = vec![String::from("ghost@example.com")];
        summary.record(first);

        let missing = AlbumShareError::from(RemoteError::AlbumNotFound {
            album_id: String::from("a2"),
        });
        summary.record(OperationResult::failed("a2", "Gone", &missing));

        assert_eq!(summary.total_albums, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.users_added, 2);
        assert_eq!(summary.users_removed, 1);
        assert_eq!(summary.not_found, vec![String::from("ghost@example.com")]);
        assert!(!summary.is_success());
    }

    #[test]
    fn test_summary_lists_failures_with_reason() {
        let mut summary = BatchSummary::default();
        let missing = AlbumShareError::from(RemoteError::AlbumNotFound {
            album_id: String::from("a2"),
        });
        summary.record(OperationResult::failed("a2", "Gone", &missing));

        let mut partial = OperationResult::new("a3", "Party");
        partial.success = false;
        partial.user_failures.push(UserFailure {
            user: String::from("x@example.com"),
            reason: String::from("500"),
        });
        summary.record(partial);

        let text = summary.to_string();
        assert!(text.contains("Gone (a2): album not found"));
        assert!(text.contains("Party (a3): 1 user operation(s) failed"));
    }

    #[test]
    fn test_marking_failed_keeps_counts() {
        let mut result = OperationResult::new("a1", "Trip");
        result.removed = 1;

        result.mark_failed(&AlbumShareError::from(RemoteError::network("timed out")));

        assert!(!result.success);
        assert!(result.retryable);
        assert_eq!(result.change_count(), 1);
        assert_eq!(result.failure_reason().as_deref(), Some("Network error communicating with the photo service: timed out"));
    }

    #[test]
    fn test_transport_failure_is_marked_retryable() {
        let err = AlbumShareError::from(RemoteError::network("connection reset"));
        let result = OperationResult::failed("a1", "Trip", &err);
        assert!(result.retryable);
        assert!(!result.success);
    }
}
