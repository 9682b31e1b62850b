//! Exports the current sharing state of every album.
//!
//! Each album becomes one row per role its members hold, carrying the role
//! and the member emails, in the same shape `share-albums` reads back.
//! Unshared albums get a single row with no role.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::model::{Album, AlbumRole};
use crate::remote::AlbumService;

/// Albums between progress messages.
const PROGRESS_INTERVAL: usize = 10;

/// One exported role group of an album.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    /// Album name.
    pub album_name: String,
    /// Album identifier.
    pub album_id: String,
    /// Role held by the users on this row, `None` when the album is not shared.
    pub role: Option<AlbumRole>,
    /// Member emails, sorted.
    pub users: Vec<String>,
    /// Why the membership could not be read, if it could not.
    pub error: Option<String>,
}

impl ExportRow {
    /// Builds the rows for an album's current membership, one per role.
    #[must_use]
    pub fn rows_for(album: &Album) -> Vec<Self> {
        let mut groups: BTreeMap<AlbumRole, Vec<String>> = BTreeMap::new();
        for (user, role) in &album.members {
            groups.entry(*role).or_default().push(user.clone());
        }

        if groups.is_empty() {
            return vec![Self::row(album, None, Vec::new())];
        }
        if groups.len() > 1 {
            debug!(
                "Album {} ({}) has mixed roles, exporting {} role groups",
                album.name,
                album.id,
                groups.len()
            );
        }

        groups
            .into_iter()
            .map(|(role, users)| Self::row(album, Some(role), users))
            .collect()
    }

    fn row(album: &Album, role: Option<AlbumRole>, users: Vec<String>) -> Self {
        Self {
            album_name: album.name.clone(),
            album_id: album.id.clone(),
            role,
            users,
            error: None,
        }
    }
}

/// Result of exporting every album.
#[derive(Debug, Default, Serialize)]
pub struct ExportReport {
    /// Albums listed.
    pub albums: usize,
    /// Rows in listing order; an album spans one row per role.
    pub rows: Vec<ExportRow>,
    /// Albums whose membership could not be read.
    pub failed: usize,
}

impl ExportReport {
    /// Largest member count of any row.
    #[must_use]
    pub fn max_users(&self) -> usize {
        self.rows.iter().map(|row| row.users.len()).max().unwrap_or(0)
    }
}

/// Reads the sharing state of every album.
pub struct StateExporter<'a, S: AlbumService + ?Sized> {
    service: &'a S,
}

impl<'a, S: AlbumService + ?Sized> StateExporter<'a, S> {
    /// Creates a new exporter.
    #[must_use]
    pub const fn new(service: &'a S) -> Self {
        Self { service }
    }

    /// Lists every album and reads its membership.
    ///
    /// # Errors
    ///
    /// Returns an error if the album listing fails or a fatal error occurs
    /// while reading an album.
    pub async fn export(&self) -> Result<ExportReport> {
        info!("Fetching albums...");
        let albums = self.service.list_albums().await?;
        let total = albums.len();
        info!("Processing {total} albums");

        let mut report = ExportReport {
            albums: total,
            ..ExportReport::default()
        };

        for (index, listed) in albums.iter().enumerate() {
            let position = index + 1;
            if position % PROGRESS_INTERVAL == 0 {
                info!("Processing album {position}/{total}");
            }

            let rows = match self.service.get_album_members(&listed.id).await {
                Ok(album) => ExportRow::rows_for(&album),
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    warn!("Could not read album {} ({}): {err}", listed.name, listed.id);
                    report.failed += 1;
                    vec![ExportRow {
                        album_name: listed.name.clone(),
                        album_id: listed.id.clone(),
                        role: None,
                        users: Vec::new(),
                        error: Some(err.reason()),
                    }]
                }
            };

            debug!("Album {}: {} rows", listed.id, rows.len());
            report.rows.extend(rows);
        }

        info!(
            "Exported {} albums into {} rows, maximum users in any row: {}",
            report.albums,
            report.rows.len(),
            report.max_users()
        );

        Ok(report)
    }
}
