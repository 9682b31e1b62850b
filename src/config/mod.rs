//! Configuration module for the album sharing tool.
//!
//! This module handles:
//! - Normalizing and validating the service URL and API key
//! - Loading connection settings from a `.env` file

mod env;
mod settings;

pub use env::{load_dotenv, ENV_API_KEY, ENV_URL};
pub use settings::{normalize_base_url, ClientConfig, DEFAULT_TIMEOUT_SECS};
