//! Planning module for album membership changes.
//!
//! This module compares an album's current membership with the desired
//! membership from a table row and describes the changes to apply.

mod diff;

pub use diff::{compute_diff, MembershipDiff};
