// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # album-share
//!
//! Exports and synchronizes album sharing permissions on a self-hosted photo
//! service.
//!
//! ## Overview
//!
//! The sharing state of every album round-trips through a `;`-delimited table:
//!
//! - `list-all` writes one row per album with its role and member emails
//! - `share-albums` reads such a table and makes each album's membership
//!   match it, adding, removing and re-roling users as needed
//!
//! ## Architecture
//!
//! The system is built around **desired state reconciliation**:
//!
//! 1. **Desired State**: one table row per album
//! 2. **Current State**: queried from the photo service API
//! 3. **Reconciler**: computes the membership diff and applies it
//!
//! ## Modules
//!
//! - [`config`]: Connection settings and `.env` loading
//! - [`model`]: Album membership and run result types
//! - [`table`]: Album table reading and writing
//! - [`remote`]: Photo service API client
//! - [`planner`]: Membership diff computation
//! - [`reconciler`]: Reconciliation loop
//! - [`exporter`]: Album state export
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```text
//! AlbumName;AlbumId;Role;User 1;User 2
//! Summer 2024;5f1c...;viewer;ann@example.com;bob@example.com
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod config;
pub mod error;
pub mod exporter;
pub mod model;
pub mod planner;
pub mod reconciler;
pub mod remote;
pub mod table;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{load_dotenv, ClientConfig};
pub use error::{AlbumShareError, Result};
pub use exporter::{ExportReport, ExportRow, StateExporter};
pub use model::{Album, AlbumRole, BatchSummary, DesiredAlbumState, OperationResult};
pub use planner::{compute_diff, MembershipDiff};
pub use reconciler::Reconciler;
pub use remote::{AlbumClient, AlbumService, ApplyReport};
