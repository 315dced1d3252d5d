mod config;
pub mod database;
pub mod snapshot;

pub use config::{Config, DefaultsConfig, EngagementConfig, LoggingConfig};
pub use database::Database;
pub use snapshot::{load_state, save_state, PersistedState, RUNTIME_KEY, STORAGE_KEY};

use std::path::PathBuf;

use crate::error::StorageError;

/// Returns the data directory, creating it if needed.
///
/// `CAPYFLOW_DATA_DIR` wins when set. Otherwise `~/.config/capyflow/`, or
/// `~/.config/capyflow-dev/` with `CAPYFLOW_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var_os("CAPYFLOW_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("CAPYFLOW_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("capyflow-dev")
            } else {
                base_dir.join("capyflow")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
