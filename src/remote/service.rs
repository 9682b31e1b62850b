//! Album service trait definition.
//!
//! This module defines the interface the reconciler and exporter drive. The
//! HTTP client implements it; tests use an in-memory implementation.

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::error::{AlbumShareError, RemoteError, Result};
use crate::model::{Album, UserFailure};
use crate::planner::MembershipDiff;

/// Users affected by one membership update.
#[derive(Debug, Default, Serialize)]
pub struct ApplyReport {
    /// Users the album was shared with.
    pub added: Vec<String>,
    /// Users whose role changed.
    pub updated: Vec<String>,
    /// Users removed from the album.
    pub removed: Vec<String>,
    /// Requested users the service could not resolve.
    pub not_found: Vec<String>,
    /// User operations the service refused.
    pub failures: Vec<UserFailure>,
    /// Error that stopped the album partway; the lists above hold what was
    /// applied before it.
    #[serde(skip)]
    pub error: Option<AlbumShareError>,
}

/// One user mutation, in the order mutations are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UserChange {
    Remove,
    Add,
    Update,
}

impl ApplyReport {
    /// Records a mutation that went through.
    pub(crate) fn record(&mut self, change: UserChange, user: &str) {
        let list = match change {
            UserChange::Remove => &mut self.removed,
            UserChange::Add => &mut self.added,
            UserChange::Update => &mut self.updated,
        };
        list.push(user.to_string());
    }

    /// Records a refused mutation, or stops the album on any other error.
    ///
    /// Returns false once the album is stopped.
    pub(crate) fn absorb(&mut self, user: &str, error: AlbumShareError) -> bool {
        if is_user_scoped(&error) {
            warn!("Operation for {user} failed: {error}");
            self.failures.push(UserFailure {
                user: user.to_string(),
                reason: error.reason(),
            });
            return true;
        }
        self.error = Some(error);
        false
    }
}

/// Every mutation a diff asks for: removals, then additions, then updates.
pub(crate) fn planned_changes(diff: &MembershipDiff) -> impl Iterator<Item = (UserChange, &str)> {
    let removals = diff.to_remove.iter().map(|user| (UserChange::Remove, user.as_str()));
    let additions = diff.to_add.iter().map(|user| (UserChange::Add, user.as_str()));
    let updates = diff.to_update.iter().map(|user| (UserChange::Update, user.as_str()));
    removals.chain(additions).chain(updates)
}

/// Whether an error concerns only the user operation that raised it.
fn is_user_scoped(error: &AlbumShareError) -> bool {
    matches!(
        error,
        AlbumShareError::Remote(
            RemoteError::ApiRequestFailed { .. } | RemoteError::InvalidResponse { .. }
        )
    )
}

/// Trait for photo services that hold album sharing state.
#[async_trait]
pub trait AlbumService: Send + Sync {
    /// Lists every album with the membership the listing carries.
    async fn list_albums(&self) -> Result<Vec<Album>>;

    /// Fetches the current membership and roles of one album.
    ///
    /// Fails with `AlbumNotFound` if the identifier is unknown.
    async fn get_album_members(&self, album_id: &str) -> Result<Album>;

    /// Applies a membership diff to one album.
    ///
    /// Unresolvable users are reported in [`ApplyReport::not_found`] and
    /// refused user operations in [`ApplyReport::failures`]; neither fails
    /// the call. An error that stops the album after some mutations went
    /// through is returned in [`ApplyReport::error`] alongside them.
    async fn set_album_members(&self, album_id: &str, diff: &MembershipDiff) -> Result<ApplyReport>;

    /// Classifies a diff's users as [`set_album_members`] would, without
    /// changing anything.
    ///
    /// [`set_album_members`]: AlbumService::set_album_members
    async fn plan_album_members(&self, album_id: &str, diff: &MembershipDiff) -> Result<ApplyReport>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AlbumRole;
    use std::collections::{BTreeMap, BTreeSet};

    fn set(users: &[&str]) -> BTreeSet<String> {
        users.iter().map(|u| (*u).to_string()).collect()
    }

    #[test]
    fn test_changes_are_ordered_removals_first() {
        let diff = MembershipDiff {
            to_add: set(&["a"]),
            to_remove: set(&["r"]),
            to_update_role: true,
            to_update: set(&["u"]),
            role: AlbumRole::Viewer,
            roles: BTreeMap::new(),
        };

        let changes: Vec<(UserChange, &str)> = planned_changes(&diff).collect();

        assert_eq!(
            changes,
            vec![
                (UserChange::Remove, "r"),
                (UserChange::Add, "a"),
                (UserChange::Update, "u"),
            ]
        );
    }

    #[test]
    fn test_transport_error_stops_the_album() {
        let mut report = ApplyReport::default();
        report.record(UserChange::Remove, "bob@example.com");

        assert!(report.absorb("ann@example.com", RemoteError::api_error(500, "boom").into()));
        assert!(!report.absorb("carl@example.com", RemoteError::network("reset").into()));

        assert_eq!(report.removed, vec![String::from("bob@example.com")]);
        assert_eq!(report.failures.len(), 1);
        assert!(report.error.as_ref().is_some_and(AlbumShareError::is_retryable));
    }
}
