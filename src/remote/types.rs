//! Photo service API types and data structures.
//!
//! This module defines the JSON bodies exchanged with the album endpoints.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::{Album, AlbumRole};

/// An album as returned by the list and detail endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumResponse {
    /// Album identifier.
    pub id: String,
    /// Album name.
    #[serde(default)]
    pub album_name: String,
    /// Users the album is shared with.
    #[serde(default)]
    pub album_users: Vec<AlbumUserResponse>,
}

/// A shared user entry on an album.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumUserResponse {
    /// The user.
    pub user: UserResponse,
    /// Role the user holds on the album, as the service spells it.
    pub role: String,
}

/// A user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    /// User identifier.
    pub id: String,
    /// User email.
    #[serde(default)]
    pub email: String,
}

/// Body for sharing an album with users.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUsersRequest {
    /// Users to add.
    pub album_users: Vec<AlbumUserAddRequest>,
}

/// One user to share an album with.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumUserAddRequest {
    /// User identifier.
    pub user_id: String,
    /// Role to grant.
    pub role: AlbumRole,
}

/// Body for changing a user's role on an album.
#[derive(Debug, Serialize)]
pub struct UpdateRoleRequest {
    /// New role.
    pub role: AlbumRole,
}

impl From<AlbumResponse> for Album {
    fn from(response: AlbumResponse) -> Self {
        let mut album = Self::new(response.id, response.album_name);
        for entry in &response.album_users {
            match entry.role.parse::<AlbumRole>() {
                Ok(role) => album.insert_member(&entry.user.email, role),
                Err(_) => warn!(
                    "Album {}: skipping {} with unsupported role '{}'",
                    album.id, entry.user.email, entry.role
                ),
            }
        }
        album
    }
}
