//! Source backend interface, profiles and devices.
//!
//! The registry never talks to hardware itself. A [`SourceBackend`] owns the
//! native subsystems and enumerates what is available; [`discovery`] turns
//! those enumerations into registry inserts.

pub mod discovery;
mod stubs;
mod types;

pub use stubs::{NullBackend, StaticBackend};
pub use types::{BackendError, Device, SourceConfig, Subsystem, NULL_PROFILE_LABEL};

use crate::catalog::Site;

/// Native layer behind the registry.
///
/// Implementors should:
/// - Treat every walker callback's `false` return as "stop enumerating"
/// - Make `init_subsystem` failures descriptive; the registry treats them as fatal
pub trait SourceBackend: Send {
    /// Unique identifier (e.g., "null", "static")
    fn id(&self) -> &'static str;

    /// Version string reported by the native layer
    fn version(&self) -> String {
        "unknown".to_string()
    }

    /// Initialize one expensive subsystem. Called at most once per subsystem
    /// by a given registry.
    fn init_subsystem(&mut self, subsystem: Subsystem) -> Result<(), BackendError>;

    /// Visit every configured source profile.
    fn walk_source_configs(&self, visit: &mut dyn FnMut(SourceConfig) -> bool);

    /// Visit every locally available device.
    fn walk_devices(&self, visit: &mut dyn FnMut(Device) -> bool);

    /// Visit every profile announced by remote (network) devices.
    fn walk_remote_profiles(&self, visit: &mut dyn FnMut(&Device, SourceConfig) -> bool);

    /// Re-probe hardware so the next `walk_devices` sees hot-plugged devices.
    fn detect_devices(&mut self) {}

    /// Make a profile known to the native layer.
    fn register_source_config(&mut self, _config: &SourceConfig) -> Result<(), BackendError> {
        Ok(())
    }

    /// Forward the observer's home site to the native layer.
    fn set_qth(&mut self, _site: &Site) {}
}
