//! In-memory album service used by reconciler and exporter tests.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{AlbumShareError, RemoteError, Result};
use crate::model::{Album, UserFailure};
use crate::planner::MembershipDiff;

use super::service::{planned_changes, AlbumService, ApplyReport, UserChange};

/// Failure injected for one album.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Failure {
    Auth,
    Transport,
    Server,
}

impl Failure {
    fn to_error(self) -> AlbumShareError {
        match self {
            Self::Auth => RemoteError::Authentication {
                message: String::from("Invalid API key"),
            }
            .into(),
            Self::Transport => RemoteError::network("connection reset").into(),
            Self::Server => RemoteError::api_error(500, "internal error").into(),
        }
    }
}

/// Album service backed by a map, with injectable failures.
#[derive(Debug, Default)]
pub(crate) struct InMemoryAlbumService {
    albums: Mutex<BTreeMap<String, Album>>,
    known_users: BTreeSet<String>,
    rejected_users: BTreeSet<String>,
    failures: HashMap<String, Failure>,
    interruptions: HashMap<String, Failure>,
    set_calls: AtomicUsize,
}

impl InMemoryAlbumService {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_album(self, album: Album) -> Self {
        if let Ok(mut albums) = self.albums.lock() {
            albums.insert(album.id.clone(), album);
        }
        self
    }

    pub(crate) fn with_known_users(mut self, users: &[&str]) -> Self {
        self.known_users
            .extend(users.iter().map(|user| (*user).to_string()));
        self
    }

    pub(crate) fn rejecting_user(mut self, user: &str) -> Self {
        self.rejected_users.insert(user.to_string());
        self
    }

    pub(crate) fn failing_album(mut self, album_id: &str, failure: Failure) -> Self {
        self.failures.insert(album_id.to_string(), failure);
        self
    }

    /// Stops any album update when it reaches `user`.
    pub(crate) fn interrupting_at(mut self, user: &str, failure: Failure) -> Self {
        self.interruptions.insert(user.to_string(), failure);
        self
    }

    pub(crate) fn album(&self, album_id: &str) -> Option<Album> {
        self.albums.lock().ok()?.get(album_id).cloned()
    }

    pub(crate) fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    fn check(&self, album_id: &str) -> Result<()> {
        match self.failures.get(album_id) {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }

    /// Sorts one user operation into the report; returns true if it applies.
    fn admit(&self, report: &mut ApplyReport, user: &str) -> bool {
        if !self.known_users.contains(user) {
            report.not_found.push(user.to_string());
            return false;
        }
        if self.rejected_users.contains(user) {
            report.failures.push(UserFailure {
                user: user.to_string(),
                reason: String::from("API request failed: 500 - rejected"),
            });
            return false;
        }
        true
    }
}

#[async_trait]
impl AlbumService for InMemoryAlbumService {
    async fn list_albums(&self) -> Result<Vec<Album>> {
        let albums = self
            .albums
            .lock()
            .map_err(|e| RemoteError::network(e.to_string()))?;
        Ok(albums.values().cloned().collect())
    }

    async fn get_album_members(&self, album_id: &str) -> Result<Album> {
        self.check(album_id)?;
        self.album(album_id).ok_or_else(|| {
            RemoteError::AlbumNotFound {
                album_id: album_id.to_string(),
            }
            .into()
        })
    }

    async fn set_album_members(&self, album_id: &str, diff: &MembershipDiff) -> Result<ApplyReport> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        self.check(album_id)?;

        let mut albums = self
            .albums
            .lock()
            .map_err(|e| RemoteError::network(e.to_string()))?;
        let album = albums
            .get_mut(album_id)
            .ok_or_else(|| RemoteError::AlbumNotFound {
                album_id: album_id.to_string(),
            })?;

        let mut report = ApplyReport::default();

        for (change, user) in planned_changes(diff) {
            if let Some(failure) = self.interruptions.get(user) {
                report.error = Some(failure.to_error());
                break;
            }
            if !self.admit(&mut report, user) {
                continue;
            }
            match change {
                UserChange::Remove => album.members.remove(user),
                UserChange::Add | UserChange::Update => {
                    album.members.insert(user.to_string(), diff.role_for(user))
                }
            };
            report.record(change, user);
        }

        Ok(report)
    }

    async fn plan_album_members(&self, album_id: &str, diff: &MembershipDiff) -> Result<ApplyReport> {
        self.check(album_id)?;

        let mut report = ApplyReport::default();
        for (change, user) in planned_changes(diff) {
            if self.known_users.contains(user) {
                report.record(change, user);
            } else {
                report.not_found.push(user.to_string());
            }
        }

        Ok(report)
    }
}
