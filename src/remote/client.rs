//! Photo service API client implementation.
//!
//! This module provides the HTTP client for the album and user endpoints.
//! Every call is a single round trip with a bounded timeout; nothing is
//! retried. The user directory (email to user ID) is the one thing fetched
//! once and reused, since every mutation needs it.

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, trace, warn};

use crate::config::ClientConfig;
use crate::error::{AlbumShareError, ConfigError, RemoteError, Result};
use crate::model::{normalize_user, Album, AlbumRole};
use crate::planner::MembershipDiff;

use super::service::{planned_changes, AlbumService, ApplyReport, UserChange};
use super::types::{
    AddUsersRequest, AlbumResponse, AlbumUserAddRequest, UpdateRoleRequest, UserResponse,
};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-api-key";

/// Photo service API client.
#[derive(Debug)]
pub struct AlbumClient {
    /// HTTP client.
    client: Client,
    /// Normalized base URL.
    base_url: String,
    /// Email to user ID mapping, loaded on first use.
    user_directory: OnceCell<HashMap<String, String>>,
}

impl AlbumClient {
    /// Creates a new client from connection settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the
    /// HTTP client cannot be created.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut api_key =
            HeaderValue::from_str(&config.api_key).map_err(|_| ConfigError::InvalidApiKey)?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| RemoteError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            user_directory: OnceCell::new(),
        })
    }

    /// Lists every user account.
    ///
    /// # Errors
    ///
    /// Returns an error if the API call fails.
    pub async fn list_users(&self) -> Result<Vec<UserResponse>> {
        self.get_json("/api/users", None).await
    }

    /// Loads the user directory if it is not loaded yet.
    ///
    /// Returns the number of known users.
    ///
    /// # Errors
    ///
    /// Returns an error if the user list cannot be fetched.
    pub async fn load_user_directory(&self) -> Result<usize> {
        Ok(self.user_directory().await?.len())
    }

    /// Returns the email to user ID mapping, fetching it on first use.
    async fn user_directory(&self) -> Result<&HashMap<String, String>> {
        self.user_directory
            .get_or_try_init(|| async {
                let users = self.list_users().await?;
                let directory: HashMap<String, String> = users
                    .into_iter()
                    .filter(|user| !user.email.is_empty())
                    .map(|user| (normalize_user(&user.email), user.id))
                    .collect();
                info!("Loaded {} user email-ID mappings", directory.len());
                Ok::<_, AlbumShareError>(directory)
            })
            .await
    }

    /// Builds an absolute URL for an API path.
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sends a request and maps failure statuses to errors.
    ///
    /// `album_id` marks album-scoped reads, where a missing resource means
    /// the album itself is unknown.
    async fn send(&self, request: RequestBuilder, album_id: Option<&str>) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                RemoteError::network(format!("Request timed out: {e}"))
            } else {
                RemoteError::network(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(RemoteError::Authentication {
                message: String::from("Invalid API key"),
            }
            .into());
        }

        let body = response.text().await.unwrap_or_default();

        if let Some(album_id) = album_id {
            let missing = status == StatusCode::NOT_FOUND
                || (status == StatusCode::BAD_REQUEST && body.to_lowercase().contains("not found"));
            if missing {
                return Err(RemoteError::AlbumNotFound {
                    album_id: album_id.to_string(),
                }
                .into());
            }
        }

        Err(RemoteError::api_error(status.as_u16(), body).into())
    }

    /// Sends a GET request and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, album_id: Option<&str>) -> Result<T> {
        trace!("GET {path}");

        let response = self.send(self.client.get(self.url(path)), album_id).await?;

        response.json().await.map_err(|e| {
            RemoteError::InvalidResponse {
                message: format!("Failed to parse response: {e}"),
            }
            .into()
        })
    }

    /// Shares an album with one user.
    async fn add_user(&self, album_id: &str, user_id: &str, role: AlbumRole) -> Result<()> {
        let body = AddUsersRequest {
            album_users: vec![AlbumUserAddRequest {
                user_id: user_id.to_string(),
                role,
            }],
        };
        let request = self
            .client
            .put(self.url(&format!("/api/albums/{album_id}/users")))
            .json(&body);

        self.send(request, None).await?;
        Ok(())
    }

    /// Changes the role of one album member.
    async fn update_user_role(&self, album_id: &str, user_id: &str, role: AlbumRole) -> Result<()> {
        let request = self
            .client
            .put(self.url(&format!("/api/albums/{album_id}/user/{user_id}")))
            .json(&UpdateRoleRequest { role });

        self.send(request, None).await?;
        Ok(())
    }

    /// Removes one user from an album.
    async fn remove_user(&self, album_id: &str, user_id: &str) -> Result<()> {
        let request = self
            .client
            .delete(self.url(&format!("/api/albums/{album_id}/user/{user_id}")));

        self.send(request, None).await?;
        Ok(())
    }

    /// Resolves each user in the diff and, unless planning, sends its mutation.
    async fn apply(&self, album_id: &str, diff: &MembershipDiff, planning: bool) -> Result<ApplyReport> {
        let directory = self.user_directory().await?;
        let mut report = ApplyReport::default();

        for (change, email) in planned_changes(diff) {
            let Some(user_id) = directory.get(email) else {
                report.not_found.push(email.to_string());
                continue;
            };
            if planning {
                report.record(change, email);
                continue;
            }

            let role = diff.role_for(email);
            let outcome = match change {
                UserChange::Remove => {
                    debug!("Removing {email} from album {album_id}");
                    self.remove_user(album_id, user_id).await
                }
                UserChange::Add => {
                    debug!("Sharing album {album_id} with {email} as {role}");
                    self.add_user(album_id, user_id, role).await
                }
                UserChange::Update => {
                    debug!("Changing role of {email} on album {album_id} to {role}");
                    self.update_user_role(album_id, user_id, role).await
                }
            };

            match outcome {
                Ok(()) => report.record(change, email),
                Err(e) => {
                    if !report.absorb(email, e) {
                        warn!(
                            "Stopped album {album_id} after {} removed, {} added, {} updated",
                            report.removed.len(),
                            report.added.len(),
                            report.updated.len()
                        );
                        break;
                    }
                }
            }
        }

        Ok(report)
    }
}

#[async_trait]
impl AlbumService for AlbumClient {
    async fn list_albums(&self) -> Result<Vec<Album>> {
        debug!("Listing albums");

        let albums: Vec<AlbumResponse> = self.get_json("/api/albums", None).await?;

        debug!("Found {} albums", albums.len());
        Ok(albums.into_iter().map(Album::from).collect())
    }

    async fn get_album_members(&self, album_id: &str) -> Result<Album> {
        debug!("Getting album: {album_id}");

        let album: AlbumResponse = self
            .get_json(
                &format!("/api/albums/{album_id}?withoutAssets=true"),
                Some(album_id),
            )
            .await?;

        Ok(album.into())
    }

    async fn set_album_members(&self, album_id: &str, diff: &MembershipDiff) -> Result<ApplyReport> {
        self.apply(album_id, diff, false).await
    }

    async fn plan_album_members(&self, album_id: &str, diff: &MembershipDiff) -> Result<ApplyReport> {
        self.apply(album_id, diff, true).await
    }
}
