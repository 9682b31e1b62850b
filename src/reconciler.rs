//! Reconciler for album sharing permissions.
//!
//! This module implements the loop that compares each desired album state
//! with the membership the photo service reports and applies the difference.
//! Albums are processed one at a time; a failure scoped to one album is
//! recorded in its result and the run continues.

use tracing::{debug, error, info, warn};

use crate::error::{AlbumShareError, Result};
use crate::model::{BatchSummary, DesiredAlbumState, OperationResult};
use crate::planner::compute_diff;
use crate::remote::{AlbumService, ApplyReport};

/// Reconciler for album sharing permissions.
pub struct Reconciler<'a, S: AlbumService + ?Sized> {
    /// Photo service.
    service: &'a S,
    /// Plan changes without applying them.
    dry_run: bool,
}

impl<'a, S: AlbumService + ?Sized> Reconciler<'a, S> {
    /// Creates a new reconciler.
    #[must_use]
    pub const fn new(service: &'a S) -> Self {
        Self {
            service,
            dry_run: false,
        }
    }

    /// Enables or disables dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Reconciles every desired album state, in order.
    ///
    /// # Errors
    ///
    /// Returns an error only if a fatal error (such as a rejected API key)
    /// occurs; album-scoped failures are recorded in the summary.
    pub async fn reconcile(&self, desired: &[DesiredAlbumState]) -> Result<BatchSummary> {
        info!(
            "Starting reconciliation of {} albums{}",
            desired.len(),
            if self.dry_run { " (dry run)" } else { "" }
        );

        let mut summary = BatchSummary::default();

        for (index, state) in desired.iter().enumerate() {
            info!(
                "Processing album {}/{}: {} ({})",
                index + 1,
                desired.len(),
                state.album_name,
                state.album_id
            );

            let result = match self.reconcile_album(state).await {
                Ok(result) => result,
                Err(err) if err.is_fatal() => {
                    error!("Aborting run: {err}");
                    return Err(err);
                }
                Err(err) => {
                    warn!("Album {} failed: {err}", state.album_id);
                    OperationResult::failed(&state.album_id, &state.album_name, &err)
                }
            };

            summary.record(result);
        }

        info!(
            "Reconciliation complete: {} succeeded, {} failed",
            summary.succeeded, summary.failed
        );

        Ok(summary)
    }

    /// Reconciles a single album.
    ///
    /// # Errors
    ///
    /// Returns an error if the album cannot be read or updated.
    pub async fn reconcile_album(&self, desired: &DesiredAlbumState) -> Result<OperationResult> {
        let current = self.service.get_album_members(&desired.album_id).await?;
        let diff = compute_diff(&current, desired);

        let name = if current.name.is_empty() {
            desired.album_name.as_str()
        } else {
            current.name.as_str()
        };
        let mut result = OperationResult::new(&desired.album_id, name);

        if !diff.has_changes() {
            debug!("Album {name} is already converged");
            return Ok(result);
        }

        if self.dry_run {
            info!("Would apply to {name}: {diff}");
            let plan = self
                .service
                .plan_album_members(&desired.album_id, &diff)
                .await?;
            result.dry_run = true;
            record_report(&mut result, plan);
            return Ok(result);
        }

        let report = self
            .service
            .set_album_members(&desired.album_id, &diff)
            .await?;
        if let Some(err) = record_report(&mut result, report) {
            if err.is_fatal() {
                return Err(err);
            }
            warn!(
                "Album {name} stopped after {} changes: {err}",
                result.change_count()
            );
            result.mark_failed(&err);
        }

        info!(
            "Album {name}: {} added, {} updated, {} removed",
            result.added, result.updated, result.removed
        );

        Ok(result)
    }
}

/// Copies an apply report's counts into the album result.
///
/// Returns the error that stopped the album, if any.
fn record_report(result: &mut OperationResult, report: ApplyReport) -> Option<AlbumShareError> {
    for user in &report.not_found {
        warn!("User not found: {user}");
    }

    result.added = report.added.len();
    result.updated = report.updated.len();
    result.removed = report.removed.len();
    result.not_found = report.not_found;
    result.success = report.failures.is_empty();
    result.user_failures = report.failures;
    report.error
}
