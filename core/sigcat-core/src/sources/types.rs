//! Source profiles, devices and backend errors.

use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

/// Label given to profiles reported without one.
pub const NULL_PROFILE_LABEL: &str = "(Null profile)";

/// Expensive backend subsystems initialized lazily by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsystem {
    Sources,
    Estimators,
    SpectrumSources,
    Inspectors,
}

impl Subsystem {
    pub fn id(&self) -> &'static str {
        match self {
            Self::Sources => "sources",
            Self::Estimators => "estimators",
            Self::SpectrumSources => "spectrum_sources",
            Self::Inspectors => "inspectors",
        }
    }
}

impl std::fmt::Display for Subsystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// A source configuration ("profile"): acquisition parameters under a label.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceConfig {
    pub label: String,
    pub driver: String,
    pub frequency: f64,
    pub sample_rate: u32,
    pub params: BTreeMap<String, String>,
}

impl SourceConfig {
    pub fn new(label: impl Into<String>, driver: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            driver: driver.into(),
            ..Self::default()
        }
    }

    /// Label used as the catalog key.
    pub fn key(&self) -> &str {
        if self.label.is_empty() {
            NULL_PROFILE_LABEL
        } else {
            &self.label
        }
    }
}

/// An enumerable signal source.
///
/// NOTE: identity is the (desc, driver, remote) triple; `index` and `params`
/// are enumeration details and do not take part in equality or hashing.
#[derive(Debug, Clone, Default)]
pub struct Device {
    pub desc: String,
    pub driver: String,
    pub remote: bool,
    pub index: u32,
    pub params: BTreeMap<String, String>,
}

impl Device {
    pub fn new(desc: impl Into<String>, driver: impl Into<String>, remote: bool) -> Self {
        Self {
            desc: desc.into(),
            driver: driver.into(),
            remote,
            ..Self::default()
        }
    }
}

impl PartialEq for Device {
    fn eq(&self, other: &Self) -> bool {
        self.desc == other.desc && self.driver == other.driver && self.remote == other.remote
    }
}

impl Eq for Device {}

impl Hash for Device {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.desc.hash(state);
        self.driver.hash(state);
        self.remote.hash(state);
    }
}

/// Errors reported by a source backend.
#[derive(Debug, Clone)]
pub enum BackendError {
    InitFailed { subsystem: Subsystem, reason: String },
    Rejected { label: String, reason: String },
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::InitFailed { subsystem, reason } => {
                write!(f, "Initialization of {} failed: {}", subsystem, reason)
            }
            BackendError::Rejected { label, reason } => {
                write!(f, "Profile {} rejected: {}", label, reason)
            }
        }
    }
}

impl std::error::Error for BackendError {}
