//! # sigcat-core
//!
//! Configuration and catalog registry for a signal-analysis workstation:
//! source profiles and devices, frequency bookmarks, observer locations,
//! TLE sources and satellites, spectrum units, UI state and the recent
//! profile list.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime dependency.
//! - **Single owner**: One [`Registry`] owns every collection; the optional
//!   process-wide slot in [`instance`] wraps it in a mutex.
//! - **Graceful degradation**: Missing files and malformed entries load as
//!   empty/skipped, not errors. Only startup and store writes fail hard.
//! - **Pluggable edges**: storage ([`ConfigStore`]), native sources
//!   ([`SourceBackend`]) and orbit parsing ([`OrbitParser`]) are traits.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sigcat_core::{BookmarkInfo, Registry, StorageConfig};
//!
//! let mut registry = Registry::open(StorageConfig::default())?;
//! registry.load_all();
//! registry.register_bookmark(BookmarkInfo::new("APRS", 144_800_000));
//! registry.sync()?;
//! ```

pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod instance;
pub mod object;
pub mod orbit;
pub mod patterns;
pub mod registry;
pub mod sources;
pub mod storage;

pub use catalog::*;
pub use config::{load_settings, save_settings, try_load_settings, Settings};
pub use context::{ConfigContext, ConfigDb, ConfigStore, JsonFileStore, MemoryStore, Scope};
pub use error::{CatalogError, Result};
pub use instance::{has_instance, install_instance, shutdown_instance, with_instance};
pub use object::Object;
pub use orbit::{Orbit, OrbitParser, TleParser};
pub use registry::Registry;
pub use sources::{
    BackendError, Device, NullBackend, SourceBackend, SourceConfig, StaticBackend, Subsystem,
    NULL_PROFILE_LABEL,
};
pub use storage::StorageConfig;
