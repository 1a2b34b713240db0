//! Push-style bridges from backend enumeration into registry collections.
//!
//! The backend calls back once per discovered item. Each callback is a single
//! insert: no deduplication and no ordering assumptions. Callers that want a
//! fresh view clear the target collection first.

use std::collections::{BTreeMap, HashMap};

use super::{Device, SourceBackend, SourceConfig};

pub type ProfileMap = BTreeMap<String, SourceConfig>;
pub type NetworkProfileMap = HashMap<String, SourceConfig>;

pub fn register_source_config(profiles: &mut ProfileMap, config: SourceConfig) {
    profiles.insert(config.key().to_string(), config);
}

pub fn register_source_device(devices: &mut Vec<Device>, device: Device) {
    devices.push(device);
}

pub fn register_network_profile(profiles: &mut NetworkProfileMap, config: SourceConfig) {
    profiles.insert(config.key().to_string(), config);
}

/// Adds every configured profile. Returns how many callbacks fired.
pub fn collect_source_configs(backend: &dyn SourceBackend, profiles: &mut ProfileMap) -> usize {
    let mut seen = 0;
    backend.walk_source_configs(&mut |config| {
        seen += 1;
        register_source_config(profiles, config);
        true
    });
    seen
}

/// Adds every available device. Returns how many callbacks fired.
pub fn collect_devices(backend: &dyn SourceBackend, devices: &mut Vec<Device>) -> usize {
    let mut seen = 0;
    backend.walk_devices(&mut |device| {
        seen += 1;
        register_source_device(devices, device);
        true
    });
    seen
}

/// Adds every profile announced by remote devices. Returns how many callbacks fired.
pub fn collect_network_profiles(
    backend: &dyn SourceBackend,
    profiles: &mut NetworkProfileMap,
) -> usize {
    let mut seen = 0;
    backend.walk_remote_profiles(&mut |_device, config| {
        seen += 1;
        register_network_profile(profiles, config);
        true
    });
    seen
}
