//! Where orbital element sets are downloaded from.
//!
//! System sources are read-only seeds; only user sources can be removed and
//! only they are written back.

use std::collections::BTreeMap;

use crate::context::{ConfigDb, Scope};
use crate::object::Object;

pub const TLE_CONTEXT: &str = "tle";
pub const USER_TLE_CONTEXT: &str = "user_tle";

const TLE_SOURCE_CLASS: &str = "tle_source";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TleSource {
    pub name: String,
    pub url: String,
    pub user: bool,
}

impl TleSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            user: false,
        }
    }

    pub fn from_object(obj: &Object, user: bool) -> Option<Self> {
        let name = obj.get_str("name").filter(|n| !n.is_empty())?;
        let url = obj.get_str("url")?;
        Some(Self {
            name: name.to_string(),
            url: url.to_string(),
            user,
        })
    }

    pub fn to_object(&self) -> Object {
        let mut obj = Object::new_struct(TLE_SOURCE_CLASS);
        obj.set("name", &self.name);
        obj.set("url", &self.url);
        obj
    }
}

#[derive(Debug, Default)]
pub struct TleSourceCatalog {
    sources: BTreeMap<String, TleSource>,
}

impl TleSourceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, db: &mut ConfigDb) {
        for (name, scope) in [(TLE_CONTEXT, Scope::System), (USER_TLE_CONTEXT, Scope::User)] {
            let user = scope == Scope::User;
            let ctx = db.open(name, scope);
            ctx.set_save(user);

            for (index, obj) in ctx.iter().enumerate() {
                match TleSource::from_object(obj, user) {
                    Some(src) => {
                        self.sources.insert(src.name.clone(), src);
                    }
                    None => tracing::debug!(context = %name, index, "Skipping malformed TLE source"),
                }
            }
        }
    }

    /// Adds a user source unless the name is taken.
    pub fn register(&mut self, src: TleSource) -> bool {
        if self.sources.contains_key(&src.name) {
            return false;
        }
        let src = TleSource { user: true, ..src };
        self.sources.insert(src.name.clone(), src);
        true
    }

    /// Removes a user source. System sources and unknown names are rejected.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.sources.get(name) {
            Some(src) if src.user => {
                self.sources.remove(name);
                true
            }
            _ => false,
        }
    }

    /// Rewrites `user_tle` with every user source.
    pub fn sync(&self, db: &mut ConfigDb) {
        let ctx = db.open(USER_TLE_CONTEXT, Scope::User);
        ctx.clear();
        for src in self.sources.values().filter(|s| s.user) {
            ctx.append(src.to_object());
        }
    }

    pub fn get(&self, name: &str) -> Option<&TleSource> {
        self.sources.get(name)
    }

    pub fn map(&self) -> &BTreeMap<String, TleSource> {
        &self.sources
    }

    pub fn iter(&self) -> impl Iterator<Item = &TleSource> {
        self.sources.values()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
