//! Named configuration contexts and the stores behind them.
//!
//! A context is one persisted, ordered list of [`Object`]s identified by name
//! (`"bookmarks"`, `"user_locations"`, ...) and a [`Scope`]. System contexts
//! are read-only seeds shipped with the installation; user contexts are
//! writable.
//!
//! [`ConfigDb`] opens each context once, hands out mutable handles, and writes
//! back every *savable* context that was touched when flushed. Contexts with
//! `savable == false` are read-only mirrors: they can be edited in memory but
//! are never written.
//!
//! # Atomic Writes
//!
//! [`JsonFileStore`] writes through a temp file + rename so a crash never
//! leaves a half-written context behind.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use fs_err as fs;
use tempfile::NamedTempFile;

use crate::error::{CatalogError, Result};
use crate::object::Object;
use crate::storage::StorageConfig;

/// Where a context lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Installation-wide, read-only seed data.
    System,
    /// Per-user, writable data.
    User,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::System => write!(f, "system"),
            Scope::User => write!(f, "user"),
        }
    }
}

/// Persistence engine storing named lists of objects.
///
/// Implementors should:
/// - Return an empty list for contexts that were never written
/// - Replace the whole list on `write` (no partial updates)
pub trait ConfigStore: Send {
    fn read(&self, name: &str, scope: Scope) -> Result<Vec<Object>>;

    fn write(&self, name: &str, scope: Scope, items: &[Object]) -> Result<()>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// JSON File Store
// ═══════════════════════════════════════════════════════════════════════════════

/// One JSON array per context, laid out by [`StorageConfig::context_file`].
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    storage: StorageConfig,
}

impl JsonFileStore {
    pub fn new(storage: StorageConfig) -> Self {
        Self { storage }
    }
}

impl ConfigStore for JsonFileStore {
    fn read(&self, name: &str, scope: Scope) -> Result<Vec<Object>> {
        let path = self.storage.context_file(name, scope);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| CatalogError::io(format!("reading context {}", name), e))?;

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let values: Vec<serde_json::Value> = serde_json::from_str(&content)
            .map_err(|e| CatalogError::json(format!("parsing context {}", name), e))?;

        // One bad element must not cost the rest of the list
        let items = values
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(obj) => Some(obj),
                Err(err) => {
                    tracing::warn!(context = %name, %scope, index, error = %err, "Skipping undecodable entry");
                    None
                }
            })
            .collect();
        Ok(items)
    }

    fn write(&self, name: &str, scope: Scope, items: &[Object]) -> Result<()> {
        let path = self.storage.context_file(name, scope);
        let content = serde_json::to_string_pretty(items)
            .map_err(|e| CatalogError::json(format!("serializing context {}", name), e))?;
        write_atomic(&path, content.as_bytes())
            .map_err(|e| CatalogError::io(format!("writing context {}", name), e))
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let parent_dir = path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no parent")
    })?;
    fs::create_dir_all(parent_dir)?;

    let mut temp_file = NamedTempFile::new_in(parent_dir)?;
    temp_file.write_all(bytes)?;
    temp_file.flush()?;
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════════════
// In-Memory Store
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct MemoryInner {
    lists: HashMap<(String, Scope), Vec<Object>>,
    writes: usize,
}

/// Shared in-memory store. Clones see the same data, so a test can keep one
/// handle while the registry owns another.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        // Recover from poisoning - the data is plain lists
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Seeds a context without counting it as a write.
    pub fn seed(&self, name: &str, scope: Scope, items: Vec<Object>) {
        self.lock().lists.insert((name.to_string(), scope), items);
    }

    /// Current contents of a context.
    pub fn snapshot(&self, name: &str, scope: Scope) -> Vec<Object> {
        self.lock()
            .lists
            .get(&(name.to_string(), scope))
            .cloned()
            .unwrap_or_default()
    }

    /// Number of `write` calls received so far.
    pub fn writes(&self) -> usize {
        self.lock().writes
    }
}

impl ConfigStore for MemoryStore {
    fn read(&self, name: &str, scope: Scope) -> Result<Vec<Object>> {
        Ok(self.snapshot(name, scope))
    }

    fn write(&self, name: &str, scope: Scope, items: &[Object]) -> Result<()> {
        let mut inner = self.lock();
        inner.writes += 1;
        inner.lists.insert((name.to_string(), scope), items.to_vec());
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Contexts
// ═══════════════════════════════════════════════════════════════════════════════

/// Handle onto one persisted list of objects.
#[derive(Debug, Clone)]
pub struct ConfigContext {
    name: String,
    scope: Scope,
    savable: bool,
    items: Vec<Object>,
    dirty: bool,
    unreadable: bool,
}

impl ConfigContext {
    fn new(name: &str, scope: Scope, items: Vec<Object>) -> Self {
        Self {
            name: name.to_string(),
            scope,
            savable: scope == Scope::User,
            items,
            dirty: false,
            unreadable: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn is_savable(&self) -> bool {
        self.savable
    }

    /// Controls whether mutations are written back when flushed.
    pub fn set_save(&mut self, savable: bool) {
        self.savable = savable;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// True if the store failed to read this context. Such a context opens
    /// empty and is never written back, whatever its savable flag says.
    pub fn is_unreadable(&self) -> bool {
        self.unreadable
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Object> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Object> {
        self.items.iter()
    }

    pub fn items(&self) -> &[Object] {
        &self.items
    }

    pub fn append(&mut self, obj: Object) -> usize {
        self.items.push(obj);
        self.dirty = true;
        self.items.len() - 1
    }

    /// Removes the slot at `index`, shifting later slots down by one.
    pub fn remove(&mut self, index: usize) -> Result<Object> {
        self.check_slot(index)?;
        self.dirty = true;
        Ok(self.items.remove(index))
    }

    /// Overwrites the slot at `index`.
    pub fn put(&mut self, index: usize, obj: Object) -> Result<()> {
        self.check_slot(index)?;
        self.items[index] = obj;
        self.dirty = true;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.dirty = true;
    }

    fn check_slot(&self, index: usize) -> Result<()> {
        if index >= self.items.len() {
            return Err(CatalogError::SlotOutOfRange {
                context: self.name.clone(),
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }
}

/// Opens contexts on demand and flushes the modified ones.
///
/// Contexts are keyed by name and scope: `user/tle` and `system/tle` are two
/// independent lists.
pub struct ConfigDb {
    store: Box<dyn ConfigStore>,
    contexts: HashMap<(String, Scope), ConfigContext>,
}

impl ConfigDb {
    pub fn new(store: Box<dyn ConfigStore>) -> Self {
        Self {
            store,
            contexts: HashMap::new(),
        }
    }

    /// Returns the context, reading it from the store on first use.
    ///
    /// A context that cannot be read opens empty and is marked unreadable so
    /// that a later flush leaves the stored copy alone.
    pub fn open(&mut self, name: &str, scope: Scope) -> &mut ConfigContext {
        let store = &self.store;
        self.contexts
            .entry((name.to_string(), scope))
            .or_insert_with(|| match store.read(name, scope) {
                Ok(items) => {
                    tracing::debug!(context = %name, %scope, entries = items.len(), "Context opened");
                    ConfigContext::new(name, scope, items)
                }
                Err(err) => {
                    tracing::warn!(context = %name, %scope, error = %err, "Context unreadable, opening empty");
                    let mut ctx = ConfigContext::new(name, scope, Vec::new());
                    ctx.unreadable = true;
                    ctx
                }
            })
    }

    pub fn context(&self, name: &str, scope: Scope) -> Option<&ConfigContext> {
        self.contexts.get(&(name.to_string(), scope))
    }

    pub fn context_mut(&mut self, name: &str, scope: Scope) -> Option<&mut ConfigContext> {
        self.contexts.get_mut(&(name.to_string(), scope))
    }

    /// Writes one context back to the store if it is savable and modified.
    pub fn flush_context(&mut self, name: &str, scope: Scope) -> Result<()> {
        let Some(ctx) = self.contexts.get_mut(&(name.to_string(), scope)) else {
            return Ok(());
        };

        if !ctx.savable {
            return Err(CatalogError::ContextReadOnly(name.to_string()));
        }
        if ctx.unreadable {
            return Err(CatalogError::ContextUnreadable(name.to_string()));
        }

        if ctx.dirty {
            self.store.write(&ctx.name, ctx.scope, &ctx.items)?;
            ctx.dirty = false;
            tracing::debug!(context = %name, %scope, entries = ctx.items.len(), "Context flushed");
        }
        Ok(())
    }

    /// Writes every savable, modified context. Stops at the first failure.
    ///
    /// Unreadable contexts are skipped with a warning.
    pub fn flush(&mut self) -> Result<()> {
        let mut keys: Vec<(String, Scope)> = Vec::new();
        for (key, ctx) in &self.contexts {
            if !ctx.savable || !ctx.dirty {
                continue;
            }
            if ctx.unreadable {
                tracing::warn!(context = %ctx.name, scope = %ctx.scope, "Not overwriting unreadable context");
                continue;
            }
            keys.push(key.clone());
        }
        keys.sort_by(|a, b| a.0.cmp(&b.0));

        for (name, scope) in keys {
            self.flush_context(&name, scope)?;
        }
        Ok(())
    }
}
