//! Positional UI state blobs.
//!
//! Entries are opaque objects addressed by index. An entry loaded from the
//! store is *borrowed*: it mirrors what is already stored and is not written
//! on sync. Putting an entry makes it owned until the next sync.

use crate::context::{ConfigDb, Scope};
use crate::object::Object;

pub const UI_CONTEXT: &str = "uiconfig";

#[derive(Debug, Clone)]
struct UiSlot {
    object: Object,
    borrowed: bool,
}

#[derive(Debug, Default)]
pub struct UiConfig {
    entries: Vec<Option<UiSlot>>,
}

impl UiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, db: &mut ConfigDb) {
        let ctx = db.open(UI_CONTEXT, Scope::User);
        ctx.set_save(true);

        self.entries = ctx
            .iter()
            .map(|obj| {
                Some(UiSlot {
                    object: obj.clone(),
                    borrowed: true,
                })
            })
            .collect();
    }

    /// Stores `obj` at `pos`, growing the sequence with holes if needed.
    pub fn put(&mut self, pos: usize, obj: Object) {
        if pos >= self.entries.len() {
            self.entries.resize(pos + 1, None);
        }
        self.entries[pos] = Some(UiSlot {
            object: obj,
            borrowed: false,
        });
    }

    /// Entry at `pos`. `None` for holes and out-of-range positions.
    pub fn get(&self, pos: usize) -> Option<&Object> {
        self.entries
            .get(pos)
            .and_then(Option::as_ref)
            .map(|slot| &slot.object)
    }

    /// Every position, with `None` for holes.
    pub fn iter(&self) -> impl Iterator<Item = Option<&Object>> {
        self.entries
            .iter()
            .map(|slot| slot.as_ref().map(|s| &s.object))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes owned entries at their positions. Returns how many were written.
    ///
    /// Holes below an owned entry are stored as empty objects, which read
    /// back as present entries after a reload.
    pub fn sync(&mut self, db: &mut ConfigDb) -> usize {
        let ctx = db.open(UI_CONTEXT, Scope::User);
        let mut written = 0;

        for (pos, slot) in self.entries.iter_mut().enumerate() {
            let Some(slot) = slot.as_mut().filter(|s| !s.borrowed) else {
                continue;
            };

            if pos < ctx.len() {
                if let Err(err) = ctx.put(pos, slot.object.clone()) {
                    tracing::warn!(pos, error = %err, "Failed to store UI entry");
                    continue;
                }
            } else {
                // Stored slot must equal position, so holes get placeholders
                while ctx.len() < pos {
                    ctx.append(Object::default());
                }
                ctx.append(slot.object.clone());
            }

            slot.borrowed = true;
            written += 1;
        }
        written
    }
}
