//! Backends without native hardware access.
//!
//! `NullBackend` is what the CLI runs on: every subsystem initializes and
//! nothing is enumerated. `StaticBackend` serves a fixed inventory and records
//! what the registry asked of it; clones share that state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::types::{BackendError, Device, SourceConfig, Subsystem};
use super::SourceBackend;
use crate::catalog::Site;

#[derive(Debug, Default)]
pub struct NullBackend;

impl NullBackend {
    pub fn new() -> Self {
        Self
    }
}

impl SourceBackend for NullBackend {
    fn id(&self) -> &'static str {
        "null"
    }

    fn version(&self) -> String {
        format!("null ({})", env!("CARGO_PKG_VERSION"))
    }

    fn init_subsystem(&mut self, _subsystem: Subsystem) -> Result<(), BackendError> {
        Ok(())
    }

    fn walk_source_configs(&self, _visit: &mut dyn FnMut(SourceConfig) -> bool) {}

    fn walk_devices(&self, _visit: &mut dyn FnMut(Device) -> bool) {}

    fn walk_remote_profiles(&self, _visit: &mut dyn FnMut(&Device, SourceConfig) -> bool) {}
}

#[derive(Debug, Default)]
struct Inventory {
    profiles: Vec<SourceConfig>,
    devices: Vec<Device>,
    remote_profiles: Vec<(Device, SourceConfig)>,
    init_calls: HashMap<Subsystem, usize>,
    failing: Option<Subsystem>,
    registered: Vec<SourceConfig>,
    detect_calls: usize,
    qth: Option<Site>,
}

#[derive(Debug, Clone, Default)]
pub struct StaticBackend {
    inner: Arc<Mutex<Inventory>>,
}

impl StaticBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inventory> {
        // Recover from poisoning - the inventory is plain data
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_profile(&self, config: SourceConfig) {
        self.lock().profiles.push(config);
    }

    pub fn add_device(&self, device: Device) {
        self.lock().devices.push(device);
    }

    pub fn clear_devices(&self) {
        self.lock().devices.clear();
    }

    pub fn add_remote_profile(&self, device: Device, config: SourceConfig) {
        self.lock().remote_profiles.push((device, config));
    }

    pub fn clear_remote_profiles(&self) {
        self.lock().remote_profiles.clear();
    }

    /// Makes `init_subsystem` fail for `subsystem`.
    pub fn fail_subsystem(&self, subsystem: Subsystem) {
        self.lock().failing = Some(subsystem);
    }

    pub fn init_calls(&self, subsystem: Subsystem) -> usize {
        self.lock().init_calls.get(&subsystem).copied().unwrap_or(0)
    }

    pub fn detect_calls(&self) -> usize {
        self.lock().detect_calls
    }

    /// Profiles passed to `register_source_config`, in call order.
    pub fn registered(&self) -> Vec<SourceConfig> {
        self.lock().registered.clone()
    }

    pub fn qth(&self) -> Option<Site> {
        self.lock().qth
    }
}

impl SourceBackend for StaticBackend {
    fn id(&self) -> &'static str {
        "static"
    }

    fn init_subsystem(&mut self, subsystem: Subsystem) -> Result<(), BackendError> {
        let mut inv = self.lock();
        *inv.init_calls.entry(subsystem).or_insert(0) += 1;
        if inv.failing == Some(subsystem) {
            return Err(BackendError::InitFailed {
                subsystem,
                reason: "configured to fail".to_string(),
            });
        }
        Ok(())
    }

    fn walk_source_configs(&self, visit: &mut dyn FnMut(SourceConfig) -> bool) {
        let profiles = self.lock().profiles.clone();
        for config in profiles {
            if !visit(config) {
                break;
            }
        }
    }

    fn walk_devices(&self, visit: &mut dyn FnMut(Device) -> bool) {
        let devices = self.lock().devices.clone();
        for (index, mut device) in devices.into_iter().enumerate() {
            device.index = index as u32;
            if !visit(device) {
                break;
            }
        }
    }

    fn walk_remote_profiles(&self, visit: &mut dyn FnMut(&Device, SourceConfig) -> bool) {
        let remote = self.lock().remote_profiles.clone();
        for (device, config) in remote {
            if !visit(&device, config) {
                break;
            }
        }
    }

    fn detect_devices(&mut self) {
        self.lock().detect_calls += 1;
    }

    fn register_source_config(&mut self, config: &SourceConfig) -> Result<(), BackendError> {
        if config.label.is_empty() {
            return Err(BackendError::Rejected {
                label: config.key().to_string(),
                reason: "profile has no label".to_string(),
            });
        }
        self.lock().registered.push(config.clone());
        Ok(())
    }

    fn set_qth(&mut self, site: &Site) {
        self.lock().qth = Some(*site);
    }
}
