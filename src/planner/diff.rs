//! Diff engine for comparing desired vs current album membership.
//!
//! This module computes the user additions, removals and role updates that
//! bring an album's sharing in line with one table row.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::debug;

use crate::model::{Album, AlbumRole, DesiredAlbumState, SharedRole};

/// Membership changes needed for one album.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipDiff {
    /// Users to share the album with.
    pub to_add: BTreeSet<String>,
    /// Users to remove from the album.
    pub to_remove: BTreeSet<String>,
    /// Whether the album-wide role changes.
    pub to_update_role: bool,
    /// Retained members whose role must change.
    pub to_update: BTreeSet<String>,
    /// Default role for added and updated users.
    pub role: AlbumRole,
    /// Role for each added or updated user.
    pub roles: BTreeMap<String, AlbumRole>,
}

/// Computes the diff between an album's current and desired membership.
#[must_use]
pub fn compute_diff(current: &Album, desired: &DesiredAlbumState) -> MembershipDiff {
    let current_users = current.users();
    let desired_users = desired.users();

    let to_add: BTreeSet<String> = desired_users.difference(&current_users).cloned().collect();
    let to_remove: BTreeSet<String> = current_users.difference(&desired_users).cloned().collect();

    let to_update_role = match (current.shared_role(), desired.shared_role()) {
        (SharedRole::Unshared, _) => false,
        (SharedRole::Uniform(from), SharedRole::Uniform(to)) => from != to,
        (SharedRole::Uniform(from), SharedRole::Unshared) => from != desired.role,
        (SharedRole::Mixed, _) | (_, SharedRole::Mixed) => true,
    };

    let to_update: BTreeSet<String> = if to_update_role {
        current
            .members
            .iter()
            .filter(|(user, role)| desired.members.get(*user).is_some_and(|wanted| wanted != *role))
            .map(|(user, _)| user.clone())
            .collect()
    } else {
        BTreeSet::new()
    };

    let roles: BTreeMap<String, AlbumRole> = desired
        .members
        .iter()
        .filter(|(user, _)| to_add.contains(*user) || to_update.contains(*user))
        .map(|(user, role)| (user.clone(), *role))
        .collect();

    let diff = MembershipDiff {
        to_add,
        to_remove,
        to_update_role,
        to_update,
        role: desired.role,
        roles,
    };

    debug!("Album {}: {diff}", current.id);
    diff
}

impl MembershipDiff {
    /// Returns true if there are any changes.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.to_add.is_empty() || !self.to_remove.is_empty() || !self.to_update.is_empty()
    }

    /// Role to grant an added or updated user.
    #[must_use]
    pub fn role_for(&self, user: &str) -> AlbumRole {
        self.roles.get(user).copied().unwrap_or(self.role)
    }
}

impl fmt::Display for MembershipDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to add, {} to update, {} to remove",
            self.to_add.len(),
            self.to_update.len(),
            self.to_remove.len()
        )?;
        if self.to_update_role {
            write!(f, " (role -> {})", self.role)?;
        }
        Ok(())
    }
}
