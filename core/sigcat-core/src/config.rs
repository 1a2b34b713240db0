//! Settings loading and saving.
//!
//! Settings live in `<root>/config.json`. A missing file yields defaults; a
//! malformed one also yields defaults, with a warning, so a bad edit never
//! keeps the registry from starting.

use fs_err as fs;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, Result};
use crate::storage::StorageConfig;

pub const DEFAULT_RECENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Maximum number of profiles kept in the recent list.
    pub recent_capacity: usize,
    /// Whether `load_all` scans the user TLE directory.
    pub load_tle_files: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            recent_capacity: DEFAULT_RECENT_CAPACITY,
            load_tle_files: true,
        }
    }
}

/// Loads settings, returning defaults if the file is missing or malformed.
pub fn load_settings(storage: &StorageConfig) -> Settings {
    match try_load_settings(storage) {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(error = %err, "Using default settings");
            Settings::default()
        }
    }
}

/// Strict variant of [`load_settings`]: a malformed file is an error.
pub fn try_load_settings(storage: &StorageConfig) -> Result<Settings> {
    let path = storage.config_file();
    if !path.exists() {
        return Ok(Settings::default());
    }

    let content =
        fs::read_to_string(&path).map_err(|e| CatalogError::io("reading settings", e))?;
    serde_json::from_str(&content).map_err(|e| CatalogError::ConfigMalformed {
        path,
        details: e.to_string(),
    })
}

/// Saves settings to disk.
pub fn save_settings(storage: &StorageConfig, settings: &Settings) -> Result<()> {
    fs::create_dir_all(storage.root()).map_err(|e| CatalogError::io("creating root", e))?;
    let content = serde_json::to_string_pretty(settings)
        .map_err(|e| CatalogError::json("serializing settings", e))?;
    fs::write(storage.config_file(), content).map_err(|e| CatalogError::io("writing settings", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let storage = StorageConfig::with_root(temp.path().to_path_buf());
        assert_eq!(load_settings(&storage), Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let storage = StorageConfig::with_root(temp.path().to_path_buf());
        std::fs::write(storage.config_file(), r#"{"recent_capacity": 3}"#).unwrap();

        let settings = load_settings(&storage);
        assert_eq!(settings.recent_capacity, 3);
        assert!(settings.load_tle_files);
    }

    #[test]
    fn test_malformed_file() {
        let temp = TempDir::new().unwrap();
        let storage = StorageConfig::with_root(temp.path().to_path_buf());
        std::fs::write(storage.config_file(), "recent_capacity = 3").unwrap();

        assert!(matches!(
            try_load_settings(&storage),
            Err(CatalogError::ConfigMalformed { .. })
        ));
        assert_eq!(load_settings(&storage), Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let storage = StorageConfig::with_root(temp.path().join("nested"));
        let settings = Settings {
            recent_capacity: 4,
            load_tle_files: false,
        };

        save_settings(&storage, &settings).unwrap();
        assert_eq!(load_settings(&storage), settings);
    }
}
