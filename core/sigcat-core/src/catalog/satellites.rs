//! Satellites known by their orbital elements.
//!
//! Each satellite lives in its own `<name>.tle` file in the user TLE
//! directory. Startup scans that directory; importing new element sets
//! writes the file first and only then updates the catalog.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use fs_err as fs;
use walkdir::WalkDir;

use crate::error::{CatalogError, Result};
use crate::orbit::{Orbit, OrbitParser};
use crate::patterns::RE_TLE_NAME_UNSAFE;

const TLE_EXTENSION: &str = "tle";

/// File stem for a satellite name: trimmed, unsafe characters replaced by `_`.
pub fn normalize_tle_name(name: &str) -> String {
    RE_TLE_NAME_UNSAFE.replace_all(name.trim(), "_").into_owned()
}

fn is_tle_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(TLE_EXTENSION))
}

#[derive(Debug, Default)]
pub struct SatelliteCatalog {
    orbits: BTreeMap<String, Orbit>,
}

impl SatelliteCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses every `*.tle` file directly inside `dir`. Returns how many
    /// loaded; unreadable or unparsable files are skipped.
    pub fn load_dir(&mut self, dir: &Path, parser: &dyn OrbitParser) -> usize {
        let mut loaded = 0;

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_tle_file(e.path()))
        {
            match parser.parse_file(entry.path()) {
                Ok(orbit) => {
                    self.orbits.insert(orbit.name.clone(), orbit);
                    loaded += 1;
                }
                Err(err) => {
                    tracing::debug!(path = %entry.path().display(), error = %err, "Skipping TLE file")
                }
            }
        }

        tracing::debug!(dir = %dir.display(), loaded, "TLE directory scanned");
        loaded
    }

    /// Parses `text`, saves it as `<tle_dir>/<normalized name>.tle` and
    /// inserts the orbit. Nothing changes unless the file was written.
    pub fn register_tle(
        &mut self,
        text: &str,
        tle_dir: Option<PathBuf>,
        parser: &dyn OrbitParser,
    ) -> Result<&Orbit> {
        let orbit = parser.parse_text(text)?;
        let dir = tle_dir.ok_or(CatalogError::TleDirUnavailable)?;

        let path = dir.join(format!("{}.{}", normalize_tle_name(&orbit.name), TLE_EXTENSION));
        fs::write(&path, text)
            .map_err(|e| CatalogError::io(format!("writing {}", path.display()), e))?;

        tracing::info!(satellite = %orbit.name, path = %path.display(), "TLE registered");

        Ok(match self.orbits.entry(orbit.name.clone()) {
            Entry::Occupied(mut slot) => {
                slot.insert(orbit);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(orbit),
        })
    }

    pub fn get(&self, name: &str) -> Option<&Orbit> {
        self.orbits.get(name)
    }

    pub fn map(&self) -> &BTreeMap<String, Orbit> {
        &self.orbits
    }

    pub fn iter(&self) -> impl Iterator<Item = &Orbit> {
        self.orbits.values()
    }

    pub fn len(&self) -> usize {
        self.orbits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orbits.is_empty()
    }
}
