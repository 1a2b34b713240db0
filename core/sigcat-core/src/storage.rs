//! Storage configuration and path management for sigcat.
//!
//! `StorageConfig` is the single place that decides where things live:
//!
//! ```text
//! ~/.sigcat/
//! ├── config.json          settings (see `config.rs`)
//! ├── system/<ctx>.json    read-only seed contexts (override: SIGCAT_SYSTEM_DIR)
//! ├── user/<ctx>.json      user-writable contexts
//! ├── user/tle/*.tle       imported orbital element sets
//! └── logs/                CLI log files
//! ```
//!
//! The root can be moved with `SIGCAT_HOME`. Tests use
//! `StorageConfig::with_root(temp_dir)` for isolation.

use std::path::{Path, PathBuf};

use crate::context::Scope;

pub const HOME_ENV: &str = "SIGCAT_HOME";
pub const SYSTEM_DIR_ENV: &str = "SIGCAT_SYSTEM_DIR";

/// Central configuration for all sigcat storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory for all sigcat data (default: ~/.sigcat)
    root: PathBuf,
    /// Directory holding the read-only system contexts (default: <root>/system)
    system_root: PathBuf,
    /// User TLE directory; `None` when unavailable
    tle_dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let root = std::env::var_os(HOME_ENV)
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".sigcat")))
            .unwrap_or_else(|| PathBuf::from(".sigcat"));

        let mut config = Self::with_root(root);
        if let Some(system) = std::env::var_os(SYSTEM_DIR_ENV) {
            config.system_root = PathBuf::from(system);
        }
        config
    }
}

impl StorageConfig {
    /// Creates a StorageConfig with a custom root directory.
    pub fn with_root(root: PathBuf) -> Self {
        let system_root = root.join("system");
        let tle_dir = Some(root.join("user").join("tle"));
        Self {
            root,
            system_root,
            tle_dir,
        }
    }

    /// Creates a StorageConfig with custom root and system directories.
    pub fn with_roots(root: PathBuf, system_root: PathBuf) -> Self {
        Self {
            system_root,
            ..Self::with_root(root)
        }
    }

    /// Marks the user TLE directory as unavailable.
    pub fn without_tle_dir(mut self) -> Self {
        self.tle_dir = None;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn system_root(&self) -> &Path {
        &self.system_root
    }

    /// Directory holding the user-writable contexts.
    pub fn user_root(&self) -> PathBuf {
        self.root.join("user")
    }

    /// Path to config.json (settings).
    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.json")
    }

    /// Path to logs/ directory.
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    /// Directory for a context scope.
    pub fn scope_dir(&self, scope: Scope) -> PathBuf {
        match scope {
            Scope::System => self.system_root.clone(),
            Scope::User => self.user_root(),
        }
    }

    /// Path to the file backing a context in a given scope.
    /// Example: ~/.sigcat/user/bookmarks.json
    pub fn context_file(&self, name: &str, scope: Scope) -> PathBuf {
        self.scope_dir(scope).join(format!("{}.json", name))
    }

    /// Resolves the user TLE directory, creating it on first use.
    ///
    /// Returns `None` when the directory is disabled or cannot be created;
    /// callers skip TLE file operations in that case.
    pub fn user_tle_dir(&self) -> Option<PathBuf> {
        let dir = self.tle_dir.as_ref()?;
        match fs_err::create_dir_all(dir) {
            Ok(()) => Some(dir.clone()),
            Err(err) => {
                tracing::warn!(error = %err, "User TLE directory unavailable");
                None
            }
        }
    }

    /// Ensures the root directory and standard subdirectories exist.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        fs_err::create_dir_all(&self.root)?;
        fs_err::create_dir_all(self.user_root())?;
        fs_err::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
