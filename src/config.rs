use crate::error::Result;
use std::path::Path;
use tracing::{debug, warn};

pub const SUPABASE_URL_VAR: &str = "SUPABASE_URL";
pub const SUPABASE_KEY_VAR: &str = "SUPABASE_KEY";

/// Endpoint and credential for the row-insertion backend.
///
/// Values are read as-is; nothing is validated until the first insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendConfig {
    pub url: Option<String>,
    pub key: Option<String>,
}

impl BackendConfig {
    pub fn from_env() -> Self {
        Self {
            url: std::env::var(SUPABASE_URL_VAR).ok(),
            key: std::env::var(SUPABASE_KEY_VAR).ok(),
        }
    }
}

/// Merges a dotenv file into the process environment.
///
/// An explicit path must exist; the default `.env` lookup is allowed to miss.
pub fn load_env(env_file: Option<&Path>) -> Result<()> {
    match env_file {
        Some(path) => {
            dotenvy::from_path(path).map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
            debug!("Loaded environment from {}", path.display());
        }
        None => match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => debug!("No .env file found"),
            Err(e) => warn!("Ignoring unreadable .env file: {}", e),
        },
    }
    Ok(())
}
