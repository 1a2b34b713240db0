use sigcat_core::{
    BookmarkInfo, JsonFileStore, Location, NullBackend, Registry, Scope, Settings, Site,
    StorageConfig, TleSource, BOOKMARKS_CONTEXT, QTH_CONTEXT, RECENT_CONTEXT,
    USER_LOCATIONS_CONTEXT,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ISS_TLE: &str = "ISS (ZARYA)
1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537
";

fn system_fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/system")
}

/// Registry on JSON files: user data in `root`, system contexts from fixtures.
fn open_registry(root: &Path) -> Registry {
    let storage = StorageConfig::with_roots(root.to_path_buf(), system_fixtures());
    storage.ensure_dirs().unwrap();
    let mut registry = Registry::with_settings(
        storage.clone(),
        Settings::default(),
        Box::new(JsonFileStore::new(storage)),
        Box::new(NullBackend::new()),
    );
    registry.load_all();
    registry
}

fn user_context(root: &Path, name: &str) -> serde_json::Value {
    let path = StorageConfig::with_root(root.to_path_buf()).context_file(name, Scope::User);
    let text = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_loads_system_fixtures() {
    let temp = TempDir::new().unwrap();
    let registry = open_registry(temp.path());

    assert_eq!(registry.locations().count(), 2);
    let madrid = registry.location("Madrid").unwrap();
    assert_eq!(madrid.site.height_meters, 657.0);
    assert!(!madrid.user_location);

    assert_eq!(registry.tle_sources().count(), 2);
    assert_eq!(registry.palettes().len(), 2);
}

#[test]
fn test_user_data_survives_restart() {
    let temp = TempDir::new().unwrap();

    {
        let mut registry = open_registry(temp.path());
        assert!(registry.register_bookmark(BookmarkInfo::new("APRS", 144_800_000)));
        assert!(registry.register_bookmark(BookmarkInfo::new("ISS downlink", 145_800_000)));
        assert!(registry.register_location(Location::new(
            "Roof",
            "ES",
            Site {
                lat: 1.0,
                lon: 1.0,
                height_meters: 10.0,
            },
        )));
        let roof = registry.location("Roof").unwrap().clone();
        registry.set_qth(roof);
        assert!(registry.register_tle_source(TleSource::new("Mine", "https://example.org/mine.txt")));
        registry.notify_recent("rtl-sdr");
        registry.notify_recent("hackrf");
        registry.sync().unwrap();
    }

    let registry = open_registry(temp.path());

    let names: Vec<_> = registry.bookmarks().map(|bm| bm.info.name.as_str()).collect();
    assert_eq!(names, ["APRS", "ISS downlink"]);
    assert!(registry.bookmarks().all(|bm| bm.is_stored()));

    let roof = registry.location("Roof").unwrap();
    assert_eq!((roof.site.lat, roof.site.lon), (1.0, 1.0));
    assert!(roof.user_location);

    assert_eq!(registry.qth().map(|l| l.name.as_str()), Some("Roof"));
    assert!(registry.tle_source("Mine").unwrap().user);
    assert_eq!(registry.recent().collect::<Vec<_>>(), ["hackrf", "rtl-sdr"]);

    let user_locations = user_context(temp.path(), USER_LOCATIONS_CONTEXT);
    assert_eq!(user_locations.as_array().unwrap().len(), 1);
    let qth = user_context(temp.path(), QTH_CONTEXT);
    assert_eq!(qth[0]["class"], "Location");
    let recent = user_context(temp.path(), RECENT_CONTEXT);
    assert_eq!(recent, serde_json::json!(["hackrf", "rtl-sdr"]));
}

#[test]
fn test_user_location_file_shadows_system_fixture() {
    let temp = TempDir::new().unwrap();
    let storage = StorageConfig::with_roots(temp.path().to_path_buf(), system_fixtures());
    storage.ensure_dirs().unwrap();
    std::fs::write(
        storage.context_file(USER_LOCATIONS_CONTEXT, Scope::User),
        r#"[{"class": "Location", "fields": {"name": "Home", "lat": "1", "lon": "1"}}]"#,
    )
    .unwrap();

    let registry = open_registry(temp.path());
    assert_eq!(registry.locations().count(), 2);
    let home = registry.location("Home").unwrap();
    assert_eq!((home.site.lat, home.site.lon), (1.0, 1.0));
    assert!(home.user_location);
}

#[test]
fn test_system_contexts_never_written() {
    let temp = TempDir::new().unwrap();
    let before = std::fs::read_to_string(system_fixtures().join("tle.json")).unwrap();

    let mut registry = open_registry(temp.path());
    assert!(!registry.remove_tle_source("Weather"));
    registry.sync().unwrap();

    let after = std::fs::read_to_string(system_fixtures().join("tle.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_bookmark_removal_written_immediately() {
    let temp = TempDir::new().unwrap();

    {
        let mut registry = open_registry(temp.path());
        for (name, freq) in [("a", 100), ("b", 200), ("c", 300)] {
            registry.register_bookmark(BookmarkInfo::new(name, freq));
        }
        registry.sync().unwrap();
    }

    let mut registry = open_registry(temp.path());
    assert!(registry.remove_bookmark(200));

    // No sync: the removal is already on disk
    let stored = user_context(temp.path(), BOOKMARKS_CONTEXT);
    let names: Vec<_> = stored
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["fields"]["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["a", "c"]);

    registry.sync().unwrap();
    let registry = open_registry(temp.path());
    assert_eq!(registry.bookmarks().count(), 2);
    assert!(registry.bookmark(200).is_none());
}

#[test]
fn test_imported_tle_reloads_from_directory() {
    let temp = TempDir::new().unwrap();

    {
        let mut registry = open_registry(temp.path());
        assert!(registry.register_tle(ISS_TLE));
        assert!(!registry.register_tle("garbage"));
    }

    let tle_file = temp.path().join("user").join("tle").join("ISS_(ZARYA).tle");
    assert!(tle_file.exists());

    let registry = open_registry(temp.path());
    let iss = registry.satellite("ISS (ZARYA)").unwrap();
    assert_eq!(iss.catalog_number, 25544);
    assert_eq!(registry.satellites().count(), 1);
}

#[test]
fn test_corrupt_user_context_is_left_on_disk() {
    let temp = TempDir::new().unwrap();
    let storage = StorageConfig::with_roots(temp.path().to_path_buf(), system_fixtures());
    storage.ensure_dirs().unwrap();
    let path = storage.context_file(BOOKMARKS_CONTEXT, Scope::User);
    std::fs::write(&path, "{ not json").unwrap();

    let mut registry = open_registry(temp.path());
    assert_eq!(registry.bookmarks().count(), 0);

    registry.register_bookmark(BookmarkInfo::new("fresh", 1_000));
    registry.notify_recent("rtl-sdr");
    registry.sync().unwrap();

    // The unreadable file survives; other contexts are still written
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    let recent = user_context(temp.path(), RECENT_CONTEXT);
    assert_eq!(recent, serde_json::json!(["rtl-sdr"]));
}

#[test]
fn test_undecodable_user_entry_does_not_cost_the_rest() {
    let temp = TempDir::new().unwrap();
    let storage = StorageConfig::with_roots(temp.path().to_path_buf(), system_fixtures());
    storage.ensure_dirs().unwrap();
    std::fs::write(
        storage.context_file(USER_LOCATIONS_CONTEXT, Scope::User),
        r#"[
            {"class": "Location", "fields": {"name": "Good", "lat": "1", "lon": "2"}},
            {"class": "Location", "fields": {"name": "Bad", "lat": 40.4, "lon": "2"}}
        ]"#,
    )
    .unwrap();

    let mut registry = open_registry(temp.path());
    assert!(registry.location("Good").unwrap().user_location);
    assert!(registry.location("Bad").is_none());

    registry.sync().unwrap();

    let stored = user_context(temp.path(), USER_LOCATIONS_CONTEXT);
    let names: Vec<_> = stored
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["fields"]["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Good"]);

    let registry = open_registry(temp.path());
    assert!(registry.location("Good").is_some());
}
