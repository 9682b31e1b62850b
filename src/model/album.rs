//! Album membership types.
//!
//! An [`Album`] is what the photo service currently holds; a
//! [`DesiredAlbumState`] is what the table asks for. User identifiers are
//! emails, compared case-insensitively.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Access level granted to the users an album is shared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlbumRole {
    /// Can view the album.
    Viewer,
    /// Can add and remove assets.
    Editor,
}

impl AlbumRole {
    /// Returns the wire and table representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Editor => "editor",
        }
    }
}

impl fmt::Display for AlbumRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlbumRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "viewer" => Ok(Self::Viewer),
            "editor" => Ok(Self::Editor),
            other => Err(format!("unknown role '{other}' (expected viewer or editor)")),
        }
    }
}

/// Album-wide role derived from the roles of the current members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharedRole {
    /// The album is not shared with anyone.
    Unshared,
    /// Every member holds the same role.
    Uniform(AlbumRole),
    /// Members hold different roles.
    Mixed,
}

/// Normalizes a user identifier for comparison.
#[must_use]
pub fn normalize_user(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Current state of an album on the photo service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    /// Stable album identifier.
    pub id: String,
    /// Display name, informational only.
    pub name: String,
    /// Members keyed by normalized email, with the role each one holds.
    pub members: BTreeMap<String, AlbumRole>,
}

impl Album {
    /// Creates an album with no members.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            members: BTreeMap::new(),
        }
    }

    /// Adds a member, returning the album.
    #[must_use]
    pub fn with_member(mut self, email: &str, role: AlbumRole) -> Self {
        self.insert_member(email, role);
        self
    }

    /// Adds or replaces a member. Empty identifiers are ignored.
    pub fn insert_member(&mut self, email: &str, role: AlbumRole) {
        let email = normalize_user(email);
        if !email.is_empty() {
            self.members.insert(email, role);
        }
    }

    /// The current membership set.
    #[must_use]
    pub fn users(&self) -> BTreeSet<String> {
        self.members.keys().cloned().collect()
    }

    /// The album-wide role.
    #[must_use]
    pub fn shared_role(&self) -> SharedRole {
        shared_role_of(self.members.values().copied())
    }
}

/// Membership an album should have, as requested by the table.
///
/// Several rows may name the same album; each row's role applies to the
/// users listed on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredAlbumState {
    /// Identifier of the target album.
    pub album_id: String,
    /// Album name from the table, informational only.
    pub album_name: String,
    /// Role of the first row naming the album.
    pub role: AlbumRole,
    /// Users the album should be shared with, and the role each should hold.
    pub members: BTreeMap<String, AlbumRole>,
}

impl DesiredAlbumState {
    /// Creates a desired state with no users.
    #[must_use]
    pub fn new(album_id: impl Into<String>, album_name: impl Into<String>, role: AlbumRole) -> Self {
        Self {
            album_id: album_id.into(),
            album_name: album_name.into(),
            role,
            members: BTreeMap::new(),
        }
    }

    /// Adds users with the album role, returning the desired state.
    #[must_use]
    pub fn with_users<'a>(mut self, users: impl IntoIterator<Item = &'a str>) -> Self {
        let role = self.role;
        for user in users {
            self.add_member(user, role);
        }
        self
    }

    /// Adds a user from a raw table cell with the given role.
    ///
    /// Returns false when the cell is empty or the user is already present;
    /// the first role seen for a user is kept.
    pub fn add_member(&mut self, raw: &str, role: AlbumRole) -> bool {
        let user = normalize_user(raw);
        if user.is_empty() || self.members.contains_key(&user) {
            return false;
        }
        self.members.insert(user, role);
        true
    }

    /// The desired membership set.
    #[must_use]
    pub fn users(&self) -> BTreeSet<String> {
        self.members.keys().cloned().collect()
    }

    /// The album-wide role the desired membership implies.
    #[must_use]
    pub fn shared_role(&self) -> SharedRole {
        shared_role_of(self.members.values().copied())
    }
}

fn shared_role_of(mut roles: impl Iterator<Item = AlbumRole>) -> SharedRole {
    let Some(first) = roles.next() else {
        return SharedRole::Unshared;
    };
    if roles.all(|role| role == first) {
        SharedRole::Uniform(first)
    } else {
        SharedRole::Mixed
    }
}
