//! Frequency bookmarks with storage slot tracking.
//!
//! Every bookmark remembers where it lives in the `bookmarks` context:
//!
//! - `entry == None`: created in this process, not stored yet
//! - `entry == Some(k)`: loaded from (or already written to) slot `k`
//!
//! Stored bookmarks are never rewritten in place. Changing one goes through
//! [`BookmarkCatalog::replace`], which drops the old slot and creates a new,
//! unstored bookmark. Sync therefore only appends.

use std::collections::BTreeMap;

use crate::context::{ConfigDb, Scope};
use crate::object::Object;

pub const BOOKMARKS_CONTEXT: &str = "bookmarks";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookmarkInfo {
    pub name: String,
    /// Display color, `#rrggbb`.
    pub color: String,
    pub frequency: i64,
    pub low_freq_cut: i32,
    pub high_freq_cut: i32,
    pub modulation: String,
}

impl BookmarkInfo {
    pub fn new(name: impl Into<String>, frequency: i64) -> Self {
        Self {
            name: name.into(),
            color: "#ffffff".to_string(),
            frequency,
            ..Self::default()
        }
    }

    /// Converts a stored record. `None` for records without a name or with an
    /// unparsable frequency.
    pub fn from_object(obj: &Object) -> Option<Self> {
        let name = obj.get_str("name")?;
        if name.is_empty() {
            return None;
        }

        // Frequencies are stored as floating point text ("1.4e8" is valid)
        let frequency = obj.get_parsed::<f64>("frequency").filter(|f| f.is_finite())?;

        Some(Self {
            name: name.to_string(),
            color: obj.get_str("color").unwrap_or_default().to_string(),
            frequency: frequency as i64,
            low_freq_cut: obj.get_parsed("low_freq_cut").unwrap_or(0),
            high_freq_cut: obj.get_parsed("high_freq_cut").unwrap_or(0),
            modulation: obj.get_str("modulation").unwrap_or_default().to_string(),
        })
    }

    pub fn to_object(&self) -> Object {
        let mut obj = Object::new_struct("");
        obj.set("name", &self.name);
        obj.set("frequency", self.frequency as f64);
        obj.set("color", &self.color);
        obj.set("low_freq_cut", self.low_freq_cut);
        obj.set("high_freq_cut", self.high_freq_cut);
        obj.set("modulation", &self.modulation);
        obj
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bookmark {
    pub info: BookmarkInfo,
    /// Storage slot in the `bookmarks` context, `None` if not stored yet.
    pub entry: Option<usize>,
}

impl Bookmark {
    pub fn is_stored(&self) -> bool {
        self.entry.is_some()
    }
}

#[derive(Debug, Default)]
pub struct BookmarkCatalog {
    bookmarks: BTreeMap<i64, Bookmark>,
}

impl BookmarkCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the `bookmarks` context; each record keeps its list position as slot.
    pub fn load(&mut self, db: &mut ConfigDb) {
        let ctx = db.open(BOOKMARKS_CONTEXT, Scope::User);
        ctx.set_save(true);

        for (slot, obj) in ctx.iter().enumerate() {
            match BookmarkInfo::from_object(obj) {
                Some(info) => {
                    self.bookmarks.insert(
                        info.frequency,
                        Bookmark {
                            info,
                            entry: Some(slot),
                        },
                    );
                }
                None => tracing::debug!(slot, "Skipping malformed bookmark"),
            }
        }
    }

    /// Adds a bookmark unless one already exists at its frequency.
    pub fn register(&mut self, info: BookmarkInfo) -> bool {
        if self.bookmarks.contains_key(&info.frequency) {
            return false;
        }
        self.bookmarks
            .insert(info.frequency, Bookmark { info, entry: None });
        true
    }

    /// Removes whatever sits at the bookmark's frequency, then adds it unstored.
    pub fn replace(&mut self, info: BookmarkInfo, db: &mut ConfigDb) {
        self.remove(info.frequency, db);
        self.bookmarks
            .insert(info.frequency, Bookmark { info, entry: None });
    }

    /// Removes the bookmark at `frequency`.
    ///
    /// A stored bookmark also loses its slot right away, and the change is
    /// written through to the store. Returns false if nothing was there.
    pub fn remove(&mut self, frequency: i64, db: &mut ConfigDb) -> bool {
        let Some(removed) = self.bookmarks.remove(&frequency) else {
            return false;
        };

        if let Some(slot) = removed.entry {
            let ctx = db.open(BOOKMARKS_CONTEXT, Scope::User);
            if let Err(err) = ctx.remove(slot) {
                tracing::warn!(slot, error = %err, "Bookmark slot already gone");
                return true;
            }

            // Later slots moved down by one
            for bm in self.bookmarks.values_mut() {
                if let Some(entry) = bm.entry.as_mut() {
                    if *entry > slot {
                        *entry -= 1;
                    }
                }
            }

            if let Err(err) = db.flush_context(BOOKMARKS_CONTEXT, Scope::User) {
                tracing::warn!(slot, error = %err, "Failed to write bookmark removal");
            }
        }
        true
    }

    /// Appends every unstored bookmark. Returns how many were written.
    pub fn sync(&mut self, db: &mut ConfigDb) -> usize {
        let ctx = db.open(BOOKMARKS_CONTEXT, Scope::User);
        let mut appended = 0;

        for bm in self.bookmarks.values_mut().filter(|bm| bm.entry.is_none()) {
            bm.entry = Some(ctx.append(bm.info.to_object()));
            appended += 1;
        }
        appended
    }

    pub fn get(&self, frequency: i64) -> Option<&Bookmark> {
        self.bookmarks.get(&frequency)
    }

    pub fn map(&self) -> &BTreeMap<i64, Bookmark> {
        &self.bookmarks
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bookmark> {
        self.bookmarks.values()
    }

    /// Bookmarks at or above `frequency`, in ascending order.
    pub fn from_frequency(&self, frequency: i64) -> impl Iterator<Item = &Bookmark> {
        self.bookmarks.range(frequency..).map(|(_, bm)| bm)
    }

    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }
}
