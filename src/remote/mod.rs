//! Remote photo service integration.
//!
//! This module provides:
//! - The [`AlbumService`] trait the reconciler and exporter drive
//! - An HTTP client for the album sharing API
//! - Wire types for the API's JSON bodies

mod client;
#[cfg(test)]
pub(crate) mod memory;
mod service;
mod types;

pub use client::AlbumClient;
pub use service::{AlbumService, ApplyReport};
pub use types::{
    AddUsersRequest, AlbumResponse, AlbumUserAddRequest, AlbumUserResponse, UpdateRoleRequest,
    UserResponse,
};
