//! Read-only tables of named objects: palettes, auto-gain curves and
//! frequency allocation tables.
//!
//! The registry does not interpret these; it only guarantees one entry per
//! `name`, keeping the first one seen.

use std::collections::HashSet;

use crate::context::{ConfigDb, Scope};
use crate::object::Object;

pub const PALETTES_CONTEXT: &str = "palettes";
pub const AUTOGAINS_CONTEXT: &str = "autogains";
pub const FATS_CONTEXT: &str = "frequency_allocations";

#[derive(Debug, Default)]
pub struct NamedObjects {
    items: Vec<Object>,
    names: HashSet<String>,
}

impl NamedObjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the entries of a system context, skipping unnamed ones and
    /// names already present.
    pub fn load(&mut self, db: &mut ConfigDb, context: &str) {
        let ctx = db.open(context, Scope::System);
        ctx.set_save(false);

        for (index, obj) in ctx.iter().enumerate() {
            let Some(name) = obj.get_str("name") else {
                tracing::debug!(context = %context, index, "Skipping unnamed entry");
                continue;
            };
            if !self.names.insert(name.to_string()) {
                tracing::debug!(context = %context, name, "Skipping duplicate entry");
                continue;
            }
            self.items.push(obj.clone());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn get(&self, name: &str) -> Option<&Object> {
        self.items.iter().find(|o| o.get_str("name") == Some(name))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Object> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
