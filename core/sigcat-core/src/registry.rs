//! Registry - the single owner of every catalog and source collection.
//!
//! The registry is:
//! - **Synchronous**: all store and file I/O blocks the caller
//! - **Not thread-safe**: methods take `&mut self`; see [`crate::instance`]
//!   for the process-wide, mutex-guarded slot
//! - **Lazy**: backend subsystems are initialized on demand, each at most once
//!
//! ## Lifecycle
//!
//! ```rust,ignore
//! use sigcat_core::{Registry, StorageConfig};
//!
//! let mut registry = Registry::open(StorageConfig::default())?;
//! registry.load_all();
//! registry.register_bookmark(BookmarkInfo::new("NOAA 19", 137_100_000));
//! registry.sync()?;
//! ```
//!
//! Nothing is written until [`Registry::sync`], with one exception: removing a
//! stored bookmark writes the `bookmarks` context right away.
//!
//! Every mutating catalog call runs [`Registry::load_all`] first, so a new
//! entry is always checked against what is already stored. Read accessors
//! see only what has been loaded.

use std::collections::HashSet;

use crate::catalog::{
    Bookmark, BookmarkCatalog, BookmarkInfo, Location, LocationCatalog, NamedObjects, RecentList,
    SatelliteCatalog, SpectrumUnit, SpectrumUnits, TleSource, TleSourceCatalog, UiConfig,
    AUTOGAINS_CONTEXT, FATS_CONTEXT, PALETTES_CONTEXT,
};
use crate::config::{load_settings, Settings};
use crate::context::{ConfigDb, ConfigStore, JsonFileStore};
use crate::error::{CatalogError, Result};
use crate::object::Object;
use crate::orbit::{Orbit, OrbitParser, TleParser};
use crate::sources::discovery::{self, NetworkProfileMap, ProfileMap};
use crate::sources::{Device, NullBackend, SourceBackend, SourceConfig, Subsystem};
use crate::storage::StorageConfig;

pub struct Registry {
    storage: StorageConfig,
    settings: Settings,
    db: ConfigDb,
    backend: Box<dyn SourceBackend>,
    parser: Box<dyn OrbitParser>,

    initialized: HashSet<Subsystem>,
    loaded: bool,

    profiles: ProfileMap,
    network_profiles: NetworkProfileMap,
    devices: Vec<Device>,

    palettes: NamedObjects,
    autogains: NamedObjects,
    fats: NamedObjects,
    bookmarks: BookmarkCatalog,
    locations: LocationCatalog,
    tle_sources: TleSourceCatalog,
    satellites: SatelliteCatalog,
    spectrum_units: SpectrumUnits,
    ui: UiConfig,
    recent: RecentList,
}

impl Registry {
    /// Creates a registry over the given store and backend, reading settings
    /// from `storage`. Nothing is loaded yet.
    pub fn new(
        storage: StorageConfig,
        store: Box<dyn ConfigStore>,
        backend: Box<dyn SourceBackend>,
    ) -> Self {
        let settings = load_settings(&storage);
        Self::with_settings(storage, settings, store, backend)
    }

    pub fn with_settings(
        storage: StorageConfig,
        settings: Settings,
        store: Box<dyn ConfigStore>,
        backend: Box<dyn SourceBackend>,
    ) -> Self {
        tracing::debug!(
            root = %storage.root().display(),
            backend = backend.id(),
            "Creating registry"
        );

        Self {
            recent: RecentList::new(settings.recent_capacity),
            storage,
            settings,
            db: ConfigDb::new(store),
            backend,
            parser: Box::new(TleParser::new()),
            initialized: HashSet::new(),
            loaded: false,
            profiles: ProfileMap::new(),
            network_profiles: NetworkProfileMap::new(),
            devices: Vec::new(),
            palettes: NamedObjects::new(),
            autogains: NamedObjects::new(),
            fats: NamedObjects::new(),
            bookmarks: BookmarkCatalog::new(),
            locations: LocationCatalog::new(),
            tle_sources: TleSourceCatalog::new(),
            satellites: SatelliteCatalog::new(),
            spectrum_units: SpectrumUnits::with_builtins(),
            ui: UiConfig::new(),
        }
    }

    /// Registry on JSON files under `storage`, with no native backend.
    pub fn open(storage: StorageConfig) -> Result<Self> {
        storage
            .ensure_dirs()
            .map_err(|e| CatalogError::io("creating storage directories", e))?;
        let store = JsonFileStore::new(storage.clone());
        Ok(Self::new(storage, Box::new(store), Box::new(NullBackend::new())))
    }

    /// Replaces the orbit parser used for TLE imports and directory scans.
    pub fn with_parser(mut self, parser: Box<dyn OrbitParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Subsystems
    // ─────────────────────────────────────────────────────────────────────────────

    fn init_subsystem(&mut self, subsystem: Subsystem) -> Result<bool> {
        if self.initialized.contains(&subsystem) {
            return Ok(false);
        }

        self.backend.init_subsystem(subsystem).map_err(|err| {
            tracing::error!(%subsystem, error = %err, "Subsystem initialization failed");
            CatalogError::SubsystemInit {
                subsystem: subsystem.id(),
                details: err.to_string(),
            }
        })?;

        self.initialized.insert(subsystem);
        tracing::info!(%subsystem, "Subsystem initialized");
        Ok(true)
    }

    /// Initializes the source subsystem, then enumerates profiles and devices.
    pub fn init_sources(&mut self) -> Result<()> {
        if self.init_subsystem(Subsystem::Sources)? {
            self.profiles.clear();
            let seen = discovery::collect_source_configs(self.backend.as_ref(), &mut self.profiles);
            tracing::debug!(profiles = seen, "Source profiles enumerated");
            self.refresh_devices();
        }
        Ok(())
    }

    pub fn init_estimators(&mut self) -> Result<()> {
        self.init_subsystem(Subsystem::Estimators).map(|_| ())
    }

    pub fn init_spectrum_sources(&mut self) -> Result<()> {
        self.init_subsystem(Subsystem::SpectrumSources).map(|_| ())
    }

    pub fn init_inspectors(&mut self) -> Result<()> {
        self.init_subsystem(Subsystem::Inspectors).map(|_| ())
    }

    pub fn is_initialized(&self, subsystem: Subsystem) -> bool {
        self.initialized.contains(&subsystem)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Loading and Sync
    // ─────────────────────────────────────────────────────────────────────────────

    /// Runs every collection loader. Only the first call does anything.
    pub fn load_all(&mut self) {
        if self.loaded {
            return;
        }
        self.loaded = true;

        self.palettes.load(&mut self.db, PALETTES_CONTEXT);
        self.autogains.load(&mut self.db, AUTOGAINS_CONTEXT);
        self.fats.load(&mut self.db, FATS_CONTEXT);
        self.bookmarks.load(&mut self.db);
        self.locations.load(&mut self.db);
        self.tle_sources.load(&mut self.db);

        if self.settings.load_tle_files {
            if let Some(dir) = self.storage.user_tle_dir() {
                self.satellites.load_dir(&dir, self.parser.as_ref());
            }
        }

        self.ui.load(&mut self.db);
        self.recent.load(&mut self.db);

        tracing::info!(
            bookmarks = self.bookmarks.len(),
            locations = self.locations.len(),
            tle_sources = self.tle_sources.len(),
            satellites = self.satellites.len(),
            "Catalogs loaded"
        );
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Writes every modified collection back to the store.
    ///
    /// Loads first if [`Registry::load_all`] has not run, so stored entries
    /// are never replaced by an empty in-memory view.
    pub fn sync(&mut self) -> Result<()> {
        self.load_all();

        self.recent.sync(&mut self.db);
        self.ui.sync(&mut self.db);
        let appended = self.bookmarks.sync(&mut self.db);
        self.locations.sync(&mut self.db);
        self.tle_sources.sync(&mut self.db);

        self.db.flush()?;
        tracing::debug!(new_bookmarks = appended, "Registry synced");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Profiles and Devices
    // ─────────────────────────────────────────────────────────────────────────────

    /// Re-enumerates local devices from scratch.
    pub fn refresh_devices(&mut self) {
        self.devices.clear();
        let seen = discovery::collect_devices(self.backend.as_ref(), &mut self.devices);
        tracing::debug!(devices = seen, "Devices refreshed");
    }

    /// Re-enumerates profiles announced by remote devices from scratch.
    pub fn refresh_network_profiles(&mut self) {
        self.network_profiles.clear();
        let seen =
            discovery::collect_network_profiles(self.backend.as_ref(), &mut self.network_profiles);
        tracing::debug!(profiles = seen, "Network profiles refreshed");
    }

    /// Asks the backend to probe for hot-plugged hardware, then refreshes.
    pub fn detect_devices(&mut self) {
        self.backend.detect_devices();
        self.refresh_devices();
    }

    /// Registers a profile with the backend and stores it under its label.
    pub fn save_profile(&mut self, config: SourceConfig) -> Result<()> {
        self.backend
            .register_source_config(&config)
            .map_err(|e| CatalogError::Backend(e.to_string()))?;
        discovery::register_source_config(&mut self.profiles, config);
        Ok(())
    }

    pub fn profile(&self, label: &str) -> Option<&SourceConfig> {
        self.profiles.get(label)
    }

    pub fn profiles(&self) -> impl Iterator<Item = &SourceConfig> {
        self.profiles.values()
    }

    pub fn network_profile(&self, label: &str) -> Option<&SourceConfig> {
        self.network_profiles.get(label)
    }

    pub fn network_profiles(&self) -> impl Iterator<Item = &SourceConfig> {
        self.network_profiles.values()
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn device_at(&self, index: usize) -> Option<&Device> {
        self.devices.get(index)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Bookmarks
    // ─────────────────────────────────────────────────────────────────────────────

    /// Adds a bookmark. False if one already exists at that frequency.
    pub fn register_bookmark(&mut self, info: BookmarkInfo) -> bool {
        self.load_all();
        self.bookmarks.register(info)
    }

    pub fn replace_bookmark(&mut self, info: BookmarkInfo) {
        self.load_all();
        self.bookmarks.replace(info, &mut self.db);
    }

    pub fn remove_bookmark(&mut self, frequency: i64) -> bool {
        self.load_all();
        self.bookmarks.remove(frequency, &mut self.db)
    }

    pub fn bookmark(&self, frequency: i64) -> Option<&Bookmark> {
        self.bookmarks.get(frequency)
    }

    pub fn bookmarks(&self) -> impl Iterator<Item = &Bookmark> {
        self.bookmarks.iter()
    }

    pub fn bookmarks_from(&self, frequency: i64) -> impl Iterator<Item = &Bookmark> {
        self.bookmarks.from_frequency(frequency)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Locations
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn register_location(&mut self, location: Location) -> bool {
        self.load_all();
        self.locations.register(location)
    }

    pub fn location(&self, name: &str) -> Option<&Location> {
        self.locations.get(name)
    }

    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    pub fn have_qth(&self) -> bool {
        self.locations.qth().is_some()
    }

    pub fn qth(&self) -> Option<&Location> {
        self.locations.qth()
    }

    /// Sets the home site and forwards it to the backend.
    pub fn set_qth(&mut self, location: Location) {
        self.load_all();
        self.backend.set_qth(&location.site);
        tracing::info!(name = %location.name, "QTH set");
        self.locations.set_qth(location);
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // TLE Sources and Satellites
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn register_tle_source(&mut self, source: TleSource) -> bool {
        self.load_all();
        self.tle_sources.register(source)
    }

    pub fn remove_tle_source(&mut self, name: &str) -> bool {
        self.load_all();
        self.tle_sources.remove(name)
    }

    pub fn tle_source(&self, name: &str) -> Option<&TleSource> {
        self.tle_sources.get(name)
    }

    pub fn tle_sources(&self) -> impl Iterator<Item = &TleSource> {
        self.tle_sources.iter()
    }

    /// Imports a TLE set into the user TLE directory and the catalog.
    ///
    /// False if the text does not parse, the directory is unavailable or the
    /// file cannot be written; the catalog is unchanged in those cases.
    pub fn register_tle(&mut self, text: &str) -> bool {
        self.load_all();
        let dir = self.storage.user_tle_dir();
        match self
            .satellites
            .register_tle(text, dir, self.parser.as_ref())
        {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(error = %err, "TLE import failed");
                false
            }
        }
    }

    pub fn satellite(&self, name: &str) -> Option<&Orbit> {
        self.satellites.get(name)
    }

    pub fn satellites(&self) -> impl Iterator<Item = &Orbit> {
        self.satellites.iter()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Spectrum Units
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn register_spectrum_unit(&mut self, unit: SpectrumUnit) -> bool {
        self.spectrum_units.register(unit)
    }

    pub fn replace_spectrum_unit(&mut self, unit: SpectrumUnit) {
        self.spectrum_units.replace(unit);
    }

    pub fn remove_spectrum_unit(&mut self, name: &str) -> bool {
        self.spectrum_units.remove(name)
    }

    pub fn spectrum_unit(&self, name: &str) -> Option<&SpectrumUnit> {
        self.spectrum_units.get(name)
    }

    pub fn spectrum_units(&self) -> impl Iterator<Item = &SpectrumUnit> {
        self.spectrum_units.iter()
    }

    pub fn spectrum_units_from<'a>(
        &'a self,
        name: &str,
    ) -> impl Iterator<Item = &'a SpectrumUnit> + 'a {
        self.spectrum_units.from_name(name)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // UI Config, Recent List, Named Tables
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn put_ui_config(&mut self, pos: usize, obj: Object) {
        self.load_all();
        self.ui.put(pos, obj);
    }

    pub fn ui_config_at(&self, pos: usize) -> Option<&Object> {
        self.ui.get(pos)
    }

    pub fn ui_config(&self) -> impl Iterator<Item = Option<&Object>> {
        self.ui.iter()
    }

    /// Moves a profile name to the front of the recent list. True if it was
    /// already listed.
    pub fn notify_recent(&mut self, name: &str) -> bool {
        self.load_all();
        self.recent.notify(name)
    }

    pub fn remove_recent(&mut self, name: &str) -> bool {
        self.load_all();
        self.recent.remove(name)
    }

    pub fn clear_recent(&mut self) {
        self.load_all();
        self.recent.clear();
    }

    pub fn recent(&self) -> impl Iterator<Item = &str> {
        self.recent.iter()
    }

    pub fn palettes(&self) -> &NamedObjects {
        &self.palettes
    }

    pub fn autogains(&self) -> &NamedObjects {
        &self.autogains
    }

    pub fn frequency_allocations(&self) -> &NamedObjects {
        &self.fats
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Versions
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    pub fn backend_version(&self) -> String {
        self.backend.version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        Site, BOOKMARKS_CONTEXT, LOCATIONS_CONTEXT, TLE_CONTEXT, USER_LOCATIONS_CONTEXT,
        USER_TLE_CONTEXT,
    };
    use crate::context::{MemoryStore, Scope};
    use crate::orbit::fixtures::ISS_TLE;
    use crate::sources::StaticBackend;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        store: MemoryStore,
        backend: StaticBackend,
        registry: Registry,
    }

    fn fixture_with(seed: impl FnOnce(&MemoryStore, &StaticBackend)) -> Fixture {
        let temp = TempDir::new().unwrap();
        let store = MemoryStore::new();
        let backend = StaticBackend::new();
        seed(&store, &backend);

        let registry = Registry::with_settings(
            StorageConfig::with_root(temp.path().to_path_buf()),
            Settings::default(),
            Box::new(store.clone()),
            Box::new(backend.clone()),
        );
        Fixture {
            _temp: temp,
            store,
            backend,
            registry,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(|_, _| {})
    }

    fn location(name: &str, lat: f64, lon: f64) -> Object {
        Location::new(name, "", Site { lat, lon, height_meters: 0.0 }).to_object()
    }

    #[test]
    fn test_user_location_shadows_system() {
        let mut f = fixture_with(|store, _| {
            store.seed(LOCATIONS_CONTEXT, Scope::System, vec![location("Home", 0.0, 0.0)]);
            store.seed(USER_LOCATIONS_CONTEXT, Scope::User, vec![location("Home", 1.0, 1.0)]);
        });
        f.registry.load_all();

        assert_eq!(f.registry.locations().count(), 1);
        let home = f.registry.location("Home").unwrap();
        assert_eq!((home.site.lat, home.site.lon), (1.0, 1.0));
    }

    #[test]
    fn test_register_bookmark_twice() {
        let mut f = fixture();
        f.registry.load_all();

        assert!(f.registry.register_bookmark(BookmarkInfo::new("A", 100)));
        assert!(!f.registry.register_bookmark(BookmarkInfo::new("B", 100)));
        assert_eq!(f.registry.bookmarks().count(), 1);
        assert_eq!(f.registry.bookmark(100).unwrap().info.name, "A");
    }

    #[test]
    fn test_remove_unstored_bookmark_does_not_touch_store() {
        let mut f = fixture();
        f.registry.load_all();

        f.registry.register_bookmark(BookmarkInfo::new("A", 100));
        assert!(f.registry.remove_bookmark(100));
        assert_eq!(f.store.writes(), 0);
    }

    #[test]
    fn test_remove_stored_bookmark_is_written_through() {
        let mut f = fixture_with(|store, _| {
            store.seed(
                BOOKMARKS_CONTEXT,
                Scope::User,
                vec![
                    BookmarkInfo::new("A", 100).to_object(),
                    BookmarkInfo::new("B", 200).to_object(),
                    BookmarkInfo::new("C", 300).to_object(),
                ],
            );
        });
        f.registry.load_all();

        assert!(f.registry.remove_bookmark(200));
        let stored = f.store.snapshot(BOOKMARKS_CONTEXT, Scope::User);
        let names: Vec<_> = stored.iter().filter_map(|o| o.get_str("name")).collect();
        assert_eq!(names, ["A", "C"]);
        assert_eq!(f.registry.bookmark(300).unwrap().entry, Some(1));

        f.registry.register_bookmark(BookmarkInfo::new("D", 400));
        f.registry.sync().unwrap();
        f.registry.sync().unwrap();

        let stored = f.store.snapshot(BOOKMARKS_CONTEXT, Scope::User);
        let names: Vec<_> = stored.iter().filter_map(|o| o.get_str("name")).collect();
        assert_eq!(names, ["A", "C", "D"]);
    }

    #[test]
    fn test_replace_bookmark_purges_old_slot() {
        let mut f = fixture_with(|store, _| {
            store.seed(
                BOOKMARKS_CONTEXT,
                Scope::User,
                vec![BookmarkInfo::new("Old", 100).to_object()],
            );
        });
        f.registry.load_all();

        f.registry.replace_bookmark(BookmarkInfo::new("New", 100));
        assert!(f.store.snapshot(BOOKMARKS_CONTEXT, Scope::User).is_empty());
        assert_eq!(f.registry.bookmark(100).unwrap().entry, None);

        f.registry.sync().unwrap();
        let stored = f.store.snapshot(BOOKMARKS_CONTEXT, Scope::User);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].get_str("name"), Some("New"));
    }

    #[test]
    fn test_bookmarks_from_frequency() {
        let mut f = fixture();
        for (name, freq) in [("a", 100), ("b", 200), ("c", 300)] {
            f.registry.register_bookmark(BookmarkInfo::new(name, freq));
        }

        let names: Vec<_> = f
            .registry
            .bookmarks_from(150)
            .map(|bm| bm.info.name.as_str())
            .collect();
        assert_eq!(names, ["b", "c"]);
    }

    #[test]
    fn test_tle_source_lifecycle() {
        let mut f = fixture_with(|store, _| {
            store.seed(
                TLE_CONTEXT,
                Scope::System,
                vec![TleSource::new("Amateur", "https://celestrak.org/amateur.txt").to_object()],
            );
        });
        f.registry.load_all();

        assert!(!f.registry.remove_tle_source("Amateur"));
        assert!(f.registry.register_tle_source(TleSource::new("Mine", "https://example.org")));
        assert!(!f.registry.register_tle_source(TleSource::new("Mine", "https://example.org")));
        assert!(f.registry.remove_tle_source("Mine"));
        assert!(!f.registry.remove_tle_source("Mine"));
    }

    #[test]
    fn test_spectrum_unit_round_trip() {
        let mut f = fixture();
        assert!(f.registry.register_spectrum_unit(SpectrumUnit::new("X", 2.0, -10.0)));
        let unit = f.registry.spectrum_unit("X").unwrap();
        assert_eq!((unit.db_per_unit, unit.zero_point), (2.0, -10.0));

        assert!(!f.registry.register_spectrum_unit(SpectrumUnit::new("X", 5.0, 5.0)));
        let unit = f.registry.spectrum_unit("X").unwrap();
        assert_eq!((unit.db_per_unit, unit.zero_point), (2.0, -10.0));

        assert!(f.registry.remove_spectrum_unit("X"));
        assert!(f.registry.spectrum_unit("X").is_none());
        assert!(f.registry.spectrum_unit("dBFS").is_some());
    }

    #[test]
    fn test_recent_order() {
        let mut f = fixture();
        f.registry.notify_recent("a");
        f.registry.notify_recent("b");
        assert!(f.registry.notify_recent("a"));
        assert_eq!(f.registry.recent().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn test_register_tle_without_dir_fails() {
        let temp = TempDir::new().unwrap();
        let mut registry = Registry::with_settings(
            StorageConfig::with_root(temp.path().to_path_buf()).without_tle_dir(),
            Settings::default(),
            Box::new(MemoryStore::new()),
            Box::new(NullBackend::new()),
        );

        assert!(!registry.register_tle(ISS_TLE));
        assert_eq!(registry.satellites().count(), 0);
    }

    #[test]
    fn test_register_tle_then_reload_from_dir() {
        let temp = TempDir::new().unwrap();
        let storage = StorageConfig::with_root(temp.path().to_path_buf());

        let mut first = Registry::with_settings(
            storage.clone(),
            Settings::default(),
            Box::new(MemoryStore::new()),
            Box::new(NullBackend::new()),
        );
        assert!(first.register_tle(ISS_TLE));
        assert!(first.satellite("ISS (ZARYA)").is_some());

        let mut second = Registry::with_settings(
            storage,
            Settings::default(),
            Box::new(MemoryStore::new()),
            Box::new(NullBackend::new()),
        );
        second.load_all();
        assert_eq!(second.satellite("ISS (ZARYA)").unwrap().catalog_number, 25544);
    }

    #[test]
    fn test_init_sources_runs_once_and_enumerates() {
        let mut f = fixture_with(|_, backend| {
            backend.add_profile(SourceConfig::new("rtl", "rtlsdr"));
            backend.add_profile(SourceConfig::new("", "file"));
            backend.add_device(Device::new("RTL2838", "rtlsdr", false));
        });

        f.registry.init_sources().unwrap();
        f.registry.init_sources().unwrap();

        assert_eq!(f.backend.init_calls(Subsystem::Sources), 1);
        assert!(f.registry.profile("rtl").is_some());
        assert!(f.registry.profile(crate::sources::NULL_PROFILE_LABEL).is_some());
        assert_eq!(f.registry.devices().len(), 1);
        assert_eq!(f.registry.device_at(0).unwrap().desc, "RTL2838");
    }

    #[test]
    fn test_failed_init_is_fatal_and_not_recorded() {
        let mut f = fixture_with(|_, backend| backend.fail_subsystem(Subsystem::Inspectors));

        let err = f.registry.init_inspectors().unwrap_err();
        assert!(matches!(
            err,
            CatalogError::SubsystemInit { subsystem: "inspectors", .. }
        ));
        assert!(!f.registry.is_initialized(Subsystem::Inspectors));

        f.registry.init_estimators().unwrap();
        f.registry.init_spectrum_sources().unwrap();
        assert!(f.registry.is_initialized(Subsystem::Estimators));
        assert!(f.registry.is_initialized(Subsystem::SpectrumSources));
    }

    #[test]
    fn test_refresh_devices_starts_from_scratch() {
        let mut f = fixture_with(|_, backend| {
            backend.add_device(Device::new("Airspy", "airspy", false));
        });
        f.registry.refresh_devices();
        assert_eq!(f.registry.devices().len(), 1);

        f.backend.clear_devices();
        f.registry.detect_devices();
        assert!(f.registry.devices().is_empty());
        assert_eq!(f.backend.detect_calls(), 1);
    }

    #[test]
    fn test_refresh_network_profiles() {
        let mut f = fixture_with(|_, backend| {
            backend.add_remote_profile(
                Device::new("remote rx", "tcp", true),
                SourceConfig::new("remote:rtl", "tcp"),
            );
        });
        f.registry.refresh_network_profiles();
        assert!(f.registry.network_profile("remote:rtl").is_some());

        f.backend.clear_remote_profiles();
        f.registry.refresh_network_profiles();
        assert_eq!(f.registry.network_profiles().count(), 0);
    }

    #[test]
    fn test_save_profile_registers_with_backend() {
        let mut f = fixture();

        f.registry.save_profile(SourceConfig::new("hackrf", "hackrf")).unwrap();
        assert!(f.registry.profile("hackrf").is_some());
        assert_eq!(f.backend.registered().len(), 1);

        let err = f.registry.save_profile(SourceConfig::new("", "file")).unwrap_err();
        assert!(matches!(err, CatalogError::Backend(_)));
    }

    #[test]
    fn test_set_qth_forwards_site() {
        let mut f = fixture();
        let site = Site {
            lat: 40.4,
            lon: -3.7,
            height_meters: 650.0,
        };
        assert!(!f.registry.have_qth());

        f.registry.set_qth(Location::new("Madrid", "ES", site));
        assert!(f.registry.have_qth());
        assert_eq!(f.backend.qth(), Some(site));
    }

    #[test]
    fn test_load_all_runs_once() {
        let mut f = fixture_with(|store, _| {
            store.seed(
                BOOKMARKS_CONTEXT,
                Scope::User,
                vec![BookmarkInfo::new("A", 100).to_object()],
            );
        });
        f.registry.load_all();
        f.registry.remove_bookmark(100);
        f.registry.load_all();

        assert!(f.registry.is_loaded());
        assert_eq!(f.registry.bookmarks().count(), 0);
    }

    #[test]
    fn test_sync_before_load_keeps_stored_entries() {
        let mut f = fixture_with(|store, _| {
            store.seed(
                USER_LOCATIONS_CONTEXT,
                Scope::User,
                vec![location("Camp", 1.0, 2.0)],
            );
        });

        f.registry.sync().unwrap();
        assert_eq!(f.store.snapshot(USER_LOCATIONS_CONTEXT, Scope::User).len(), 1);
    }

    #[test]
    fn test_mutations_on_unloaded_registry_see_stored_entries() {
        let mut f = fixture_with(|store, _| {
            store.seed(
                BOOKMARKS_CONTEXT,
                Scope::User,
                vec![BookmarkInfo::new("Old", 100).to_object()],
            );
            store.seed(
                USER_LOCATIONS_CONTEXT,
                Scope::User,
                vec![location("Camp", 1.0, 2.0)],
            );
            store.seed(
                USER_TLE_CONTEXT,
                Scope::User,
                vec![TleSource::new("Mine", "https://example.org/a.txt").to_object()],
            );
        });
        assert!(!f.registry.is_loaded());

        assert!(!f.registry.register_bookmark(BookmarkInfo::new("New", 100)));
        assert!(f.registry.is_loaded());
        assert!(!f.registry.register_location(Location::new(
            "Camp",
            "",
            Site::default()
        )));
        assert!(!f
            .registry
            .register_tle_source(TleSource::new("Mine", "https://example.org/b.txt")));

        f.registry.sync().unwrap();
        assert_eq!(f.registry.bookmark(100).unwrap().info.name, "Old");
        let stored = f.store.snapshot(BOOKMARKS_CONTEXT, Scope::User);
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].get_str("name"), Some("Old"));
    }

    #[test]
    fn test_ui_config_position_survives_reload() {
        let mut f = fixture();
        let mut panel = Object::new_struct("panel");
        panel.set("visible", true);
        f.registry.put_ui_config(2, panel);
        f.registry.sync().unwrap();

        let mut reloaded = Registry::with_settings(
            StorageConfig::with_root(f._temp.path().to_path_buf()),
            Settings::default(),
            Box::new(f.store.clone()),
            Box::new(NullBackend::new()),
        );
        reloaded.load_all();
        assert_eq!(reloaded.ui_config_at(2).and_then(Object::class), Some("panel"));
        assert_eq!(reloaded.ui_config_at(0), Some(&Object::default()));
    }

    #[test]
    fn test_versions() {
        let f = fixture();
        assert_eq!(f.registry.version(), env!("CARGO_PKG_VERSION"));
        assert_eq!(f.registry.backend_version(), "unknown");
    }
}
