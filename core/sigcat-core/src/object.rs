//! Generic object tree exchanged with the configuration store.
//!
//! Every persisted collection is a list of [`Object`]s. An object is either a
//! scalar field, a struct (class tag plus named members) or a list. The tree is
//! a transport format only: loaders convert it into typed catalog entries and
//! never keep it around as application state.
//!
//! # On-disk shape
//!
//! ```json
//! [
//!   "a scalar field",
//!   { "class": "Location", "fields": { "name": "Home", "lat": "40.4" } },
//!   [ "nested", "list" ]
//! ]
//! ```
//!
//! Accessors return `Option` instead of failing: a missing or unparsable field
//! is how loaders decide to skip an entry.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Object {
    Field(String),
    Struct {
        #[serde(default, skip_serializing_if = "String::is_empty")]
        class: String,
        #[serde(default)]
        fields: BTreeMap<String, Object>,
    },
    List(Vec<Object>),
}

impl Default for Object {
    fn default() -> Self {
        Object::new_struct("")
    }
}

impl Object {
    pub fn field(value: impl Into<String>) -> Self {
        Object::Field(value.into())
    }

    pub fn new_struct(class: impl Into<String>) -> Self {
        Object::Struct {
            class: class.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn new_list() -> Self {
        Object::List(Vec::new())
    }

    pub fn is_field(&self) -> bool {
        matches!(self, Object::Field(_))
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, Object::Struct { .. })
    }

    /// Scalar value of a field object.
    pub fn value(&self) -> Option<&str> {
        match self {
            Object::Field(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Class tag of a struct object. Empty for untagged structs.
    pub fn class(&self) -> Option<&str> {
        match self {
            Object::Struct { class, .. } => Some(class.as_str()),
            _ => None,
        }
    }

    pub fn set_class(&mut self, tag: impl Into<String>) {
        if let Object::Struct { class, .. } = self {
            *class = tag.into();
        }
    }

    /// Returns a named member of a struct object.
    pub fn get(&self, name: &str) -> Option<&Object> {
        match self {
            Object::Struct { fields, .. } => fields.get(name),
            _ => None,
        }
    }

    /// Returns the scalar value of a named member.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Object::value)
    }

    /// Parses a named scalar member. `None` if missing or unparsable.
    pub fn get_parsed<T: FromStr>(&self, name: &str) -> Option<T> {
        self.get_str(name).and_then(|v| v.trim().parse().ok())
    }

    /// Stores `value` as a scalar member. No-op on non-struct objects.
    pub fn set(&mut self, name: &str, value: impl Display) {
        self.set_object(name, Object::Field(value.to_string()));
    }

    pub fn set_object(&mut self, name: &str, value: Object) {
        if let Object::Struct { fields, .. } = self {
            fields.insert(name.to_string(), value);
        }
    }

    /// Number of elements of a list, or members of a struct.
    pub fn len(&self) -> usize {
        match self {
            Object::Field(_) => 0,
            Object::Struct { fields, .. } => fields.len(),
            Object::List(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element at `index` of a list object.
    pub fn at(&self, index: usize) -> Option<&Object> {
        match self {
            Object::List(items) => items.get(index),
            _ => None,
        }
    }
}
