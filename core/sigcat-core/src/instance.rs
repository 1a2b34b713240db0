//! Process-wide registry slot.
//!
//! Hosts that want one shared registry go through [`with_instance`]; the
//! first call builds it from [`StorageConfig::default`] and loads every
//! catalog. A host that needs a custom store or backend calls
//! [`install_instance`] before anything else touches the slot.
//!
//! [`shutdown_instance`] syncs and drops the registry. A later
//! [`with_instance`] builds a fresh one.

use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;

use crate::error::{CatalogError, Result};
use crate::registry::Registry;
use crate::storage::StorageConfig;

static INSTANCE: Lazy<Mutex<Option<Registry>>> = Lazy::new(|| Mutex::new(None));

fn slot() -> MutexGuard<'static, Option<Registry>> {
    // Recover from poisoning - the registry holds plain data
    INSTANCE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Runs `f` on the process-wide registry, creating it on first use.
pub fn with_instance<R>(f: impl FnOnce(&mut Registry) -> R) -> Result<R> {
    let mut slot = slot();

    if slot.is_none() {
        let mut registry = Registry::open(StorageConfig::default()).map_err(|err| {
            tracing::error!(error = %err, "Failed to create registry");
            CatalogError::InstanceUnavailable(err.to_string())
        })?;
        registry.load_all();
        *slot = Some(registry);
    }

    let Some(registry) = slot.as_mut() else {
        return Err(CatalogError::InstanceUnavailable("slot is empty".to_string()));
    };
    Ok(f(registry))
}

/// Installs a prebuilt registry, loading it first if needed. Fails if one is
/// already in place.
pub fn install_instance(mut registry: Registry) -> Result<()> {
    let mut slot = slot();
    if slot.is_some() {
        return Err(CatalogError::InstanceAlreadyInstalled);
    }
    registry.load_all();
    *slot = Some(registry);
    Ok(())
}

pub fn has_instance() -> bool {
    slot().is_some()
}

/// Syncs and drops the process-wide registry, if any.
///
/// The slot is emptied even when the final sync fails.
pub fn shutdown_instance() -> Result<()> {
    let Some(mut registry) = slot().take() else {
        return Ok(());
    };
    registry.sync()?;
    tracing::debug!("Registry instance shut down");
    Ok(())
}
