//! Environment loading.
//!
//! Connection flags can come from the environment, optionally seeded by a
//! `.env` file in the working directory.

use std::path::Path;
use tracing::{debug, info};

use crate::error::{ConfigError, Result};

/// Environment variable holding the service URL.
pub const ENV_URL: &str = "ALBUM_SHARE_URL";

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "ALBUM_SHARE_API_KEY";

/// Loads a .env file from the given directory if present.
///
/// Variables already set in the process environment take precedence.
///
/// # Errors
///
/// Returns an error if the .env file exists but cannot be loaded.
pub fn load_dotenv(dir: impl AsRef<Path>) -> Result<()> {
    let env_path = dir.as_ref().join(".env");

    if env_path.exists() {
        info!("Loading environment from: {}", env_path.display());
        dotenvy::from_path(&env_path).map_err(|e| ConfigError::DotEnv {
            path: env_path.clone(),
            message: e.to_string(),
        })?;
    } else {
        debug!(".env file not found at: {}", env_path.display());
    }

    Ok(())
}
