//! Geographic locations and the home site (QTH).
//!
//! System locations load first, user locations second, both keyed by name, so
//! a user location silently shadows a system one with the same name. Only user
//! locations are written back. The QTH lives in its own single-entry context.

use std::collections::BTreeMap;

use crate::context::{ConfigDb, Scope};
use crate::object::Object;

pub const LOCATIONS_CONTEXT: &str = "locations";
pub const USER_LOCATIONS_CONTEXT: &str = "user_locations";
pub const QTH_CONTEXT: &str = "qth";

const LOCATION_CLASS: &str = "Location";

/// Geodetic coordinates. Latitude and longitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Site {
    pub lat: f64,
    pub lon: f64,
    pub height_meters: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Location {
    pub name: String,
    pub country: String,
    pub site: Site,
    pub user_location: bool,
}

impl Location {
    pub fn new(name: impl Into<String>, country: impl Into<String>, site: Site) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            site,
            user_location: false,
        }
    }

    /// Converts a stored record. Name, latitude and longitude are required.
    pub fn from_object(obj: &Object, user_location: bool) -> Option<Self> {
        let name = obj.get_str("name").filter(|n| !n.is_empty())?;
        let lat = obj.get_parsed::<f64>("lat")?;
        let lon = obj.get_parsed::<f64>("lon")?;

        Some(Self {
            name: name.to_string(),
            country: obj.get_str("country").unwrap_or_default().to_string(),
            site: Site {
                lat,
                lon,
                height_meters: obj.get_parsed("alt").unwrap_or(0.0),
            },
            user_location,
        })
    }

    pub fn to_object(&self) -> Object {
        let mut obj = Object::new_struct(LOCATION_CLASS);
        obj.set("name", &self.name);
        obj.set("country", &self.country);
        obj.set("lat", self.site.lat);
        obj.set("lon", self.site.lon);
        obj.set("alt", self.site.height_meters);
        obj
    }
}

#[derive(Debug, Default)]
pub struct LocationCatalog {
    locations: BTreeMap<String, Location>,
    qth: Option<Location>,
}

impl LocationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, db: &mut ConfigDb) {
        self.load_scope(db, LOCATIONS_CONTEXT, Scope::System);
        self.load_scope(db, USER_LOCATIONS_CONTEXT, Scope::User);

        let qth_ctx = db.open(QTH_CONTEXT, Scope::User);
        qth_ctx.set_save(true);

        self.qth = qth_ctx
            .get(0)
            .filter(|obj| obj.class() == Some(LOCATION_CLASS))
            .and_then(|obj| Location::from_object(obj, true));
    }

    fn load_scope(&mut self, db: &mut ConfigDb, name: &str, scope: Scope) {
        let user = scope == Scope::User;
        let ctx = db.open(name, scope);
        ctx.set_save(user);

        for (index, obj) in ctx.iter().enumerate() {
            match Location::from_object(obj, user) {
                Some(loc) => {
                    self.locations.insert(loc.name.clone(), loc);
                }
                None => tracing::debug!(context = %name, index, "Skipping malformed location"),
            }
        }
    }

    /// Adds a user location unless the name is taken.
    pub fn register(&mut self, loc: Location) -> bool {
        if self.locations.contains_key(&loc.name) {
            return false;
        }
        let loc = Location {
            user_location: true,
            ..loc
        };
        self.locations.insert(loc.name.clone(), loc);
        true
    }

    pub fn qth(&self) -> Option<&Location> {
        self.qth.as_ref()
    }

    pub fn set_qth(&mut self, loc: Location) {
        self.qth = Some(loc);
    }

    /// Rewrites `user_locations` with every user location, and `qth` if set.
    pub fn sync(&self, db: &mut ConfigDb) {
        let ctx = db.open(USER_LOCATIONS_CONTEXT, Scope::User);
        ctx.clear();
        for loc in self.locations.values().filter(|l| l.user_location) {
            ctx.append(loc.to_object());
        }

        if let Some(qth) = &self.qth {
            let ctx = db.open(QTH_CONTEXT, Scope::User);
            ctx.clear();
            ctx.append(qth.to_object());
        }
    }

    pub fn get(&self, name: &str) -> Option<&Location> {
        self.locations.get(name)
    }

    pub fn map(&self) -> &BTreeMap<String, Location> {
        &self.locations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::MemoryStore;

    fn stored(name: &str, lat: f64, lon: f64) -> Object {
        Location::new(name, "ES", Site { lat, lon, height_meters: 650.0 }).to_object()
    }

    #[test]
    fn test_user_location_overrides_system() {
        let store = MemoryStore::new();
        store.seed(LOCATIONS_CONTEXT, Scope::System, vec![stored("Home", 0.0, 0.0)]);
        store.seed(USER_LOCATIONS_CONTEXT, Scope::User, vec![stored("Home", 1.0, 1.0)]);
        let mut db = ConfigDb::new(Box::new(store));

        let mut catalog = LocationCatalog::new();
        catalog.load(&mut db);

        assert_eq!(catalog.len(), 1);
        let home = catalog.get("Home").unwrap();
        assert_eq!(home.site.lat, 1.0);
        assert_eq!(home.site.lon, 1.0);
        assert!(home.user_location);
    }

    #[test]
    fn test_load_skips_incomplete_records() {
        let mut no_lat = Object::new_struct(LOCATION_CLASS);
        no_lat.set("name", "Nowhere");
        no_lat.set("lon", 3.0);

        let store = MemoryStore::new();
        store.seed(
            LOCATIONS_CONTEXT,
            Scope::System,
            vec![no_lat, Object::field("junk"), stored("Madrid", 40.4, -3.7)],
        );
        let mut db = ConfigDb::new(Box::new(store));

        let mut catalog = LocationCatalog::new();
        catalog.load(&mut db);

        assert_eq!(catalog.len(), 1);
        assert!(!catalog.get("Madrid").unwrap().user_location);
    }

    #[test]
    fn test_register_marks_user_and_rejects_duplicates() {
        let mut catalog = LocationCatalog::new();
        let loc = Location::new("Camp", "US", Site::default());

        assert!(catalog.register(loc.clone()));
        assert!(!catalog.register(loc));
        assert!(catalog.get("Camp").unwrap().user_location);
    }

    #[test]
    fn test_sync_writes_only_user_locations_and_qth() {
        let store = MemoryStore::new();
        store.seed(LOCATIONS_CONTEXT, Scope::System, vec![stored("Madrid", 40.4, -3.7)]);
        let mut db = ConfigDb::new(Box::new(store.clone()));

        let mut catalog = LocationCatalog::new();
        catalog.load(&mut db);
        catalog.register(Location::new("Camp", "US", Site::default()));
        catalog.set_qth(Location::new("Roof", "ES", Site { lat: 40.0, lon: -3.0, height_meters: 700.0 }));
        catalog.sync(&mut db);
        db.flush().unwrap();

        let user = store.snapshot(USER_LOCATIONS_CONTEXT, Scope::User);
        assert_eq!(user.len(), 1);
        assert_eq!(user[0].get_str("name"), Some("Camp"));

        let qth = store.snapshot(QTH_CONTEXT, Scope::User);
        assert_eq!(qth.len(), 1);
        assert_eq!(qth[0].class(), Some(LOCATION_CLASS));
        assert_eq!(qth[0].get_parsed::<f64>("alt"), Some(700.0));
    }

    #[test]
    fn test_qth_requires_location_class() {
        let mut untagged = Object::new_struct("");
        untagged.set("name", "Roof");
        untagged.set("lat", 1.0);
        untagged.set("lon", 1.0);

        let store = MemoryStore::new();
        store.seed(QTH_CONTEXT, Scope::User, vec![untagged]);
        let mut db = ConfigDb::new(Box::new(store));

        let mut catalog = LocationCatalog::new();
        catalog.load(&mut db);
        assert!(catalog.qth().is_none());
    }

    #[test]
    fn test_qth_loaded() {
        let store = MemoryStore::new();
        store.seed(QTH_CONTEXT, Scope::User, vec![stored("Roof", 40.0, -3.0)]);
        let mut db = ConfigDb::new(Box::new(store));

        let mut catalog = LocationCatalog::new();
        catalog.load(&mut db);
        assert_eq!(catalog.qth().map(|l| l.name.as_str()), Some("Roof"));
    }
}
