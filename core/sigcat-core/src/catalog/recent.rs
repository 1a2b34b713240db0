//! Most-recently-used profile names, newest first.

use std::collections::VecDeque;

use crate::context::{ConfigDb, Scope};
use crate::object::Object;

pub const RECENT_CONTEXT: &str = "recent";

#[derive(Debug)]
pub struct RecentList {
    items: VecDeque<String>,
    capacity: usize,
}

impl RecentList {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn load(&mut self, db: &mut ConfigDb) {
        let ctx = db.open(RECENT_CONTEXT, Scope::User);
        ctx.set_save(true);

        for name in ctx.iter().filter_map(Object::value) {
            if self.items.len() == self.capacity {
                break;
            }
            if !self.items.iter().any(|n| n == name) {
                self.items.push_back(name.to_string());
            }
        }
    }

    /// Moves `name` to the front. Returns true if it was already listed.
    pub fn notify(&mut self, name: &str) -> bool {
        let existed = self.remove(name);
        self.items.push_front(name.to_string());
        self.items.truncate(self.capacity);
        existed
    }

    pub fn remove(&mut self, name: &str) -> bool {
        match self.items.iter().position(|n| n == name) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn sync(&self, db: &mut ConfigDb) {
        let ctx = db.open(RECENT_CONTEXT, Scope::User);
        ctx.clear();
        for name in &self.items {
            ctx.append(Object::field(name.as_str()));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
