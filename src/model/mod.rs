//! Domain model for album sharing.
//!
//! This module holds the album membership types exchanged between the
//! remote client, the diff engine and the reconciler, plus the results the
//! reconciler accumulates.

mod album;
mod outcome;

pub use album::{normalize_user, Album, AlbumRole, DesiredAlbumState, SharedRole};
pub use outcome::{BatchSummary, OperationResult, UserFailure};
