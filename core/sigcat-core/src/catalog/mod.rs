//! In-memory catalogs and their load/sync policies.
//!
//! Each catalog owns one keyed collection and knows which contexts feed it:
//!
//! | Catalog | Contexts | Policy |
//! |---|---|---|
//! | [`BookmarkCatalog`] | `bookmarks` | slot-tracked, append-only sync |
//! | [`LocationCatalog`] | `locations` → `user_locations`, `qth` | two-scope, user overrides |
//! | [`TleSourceCatalog`] | `tle` → `user_tle` | two-scope, user overrides |
//! | [`SatelliteCatalog`] | user TLE directory | one file per satellite |
//! | [`SpectrumUnits`] | none (built-ins + runtime) | keyed by name |
//! | [`UiConfig`] | `uiconfig` | positional, skip borrowed |
//! | [`RecentList`] | `recent` | bounded MRU |
//! | [`NamedObjects`] | `palettes`, `autogains`, `frequency_allocations` | dedup by `name` |
//!
//! Loaders never fail as a whole: an entry that does not convert is skipped
//! and logged at debug level.

mod bookmarks;
mod locations;
mod named;
mod recent;
mod satellites;
mod spectrum;
mod tle_sources;
mod ui;

pub use bookmarks::{Bookmark, BookmarkCatalog, BookmarkInfo, BOOKMARKS_CONTEXT};
pub use locations::{
    Location, LocationCatalog, Site, LOCATIONS_CONTEXT, QTH_CONTEXT, USER_LOCATIONS_CONTEXT,
};
pub use named::{NamedObjects, AUTOGAINS_CONTEXT, FATS_CONTEXT, PALETTES_CONTEXT};
pub use recent::{RecentList, RECENT_CONTEXT};
pub use satellites::{normalize_tle_name, SatelliteCatalog};
pub use spectrum::{SpectrumUnit, SpectrumUnits};
pub use tle_sources::{TleSource, TleSourceCatalog, TLE_CONTEXT, USER_TLE_CONTEXT};
pub use ui::{UiConfig, UI_CONTEXT};
