//! Units for spectrum display, as a linear map onto decibels.

use std::collections::BTreeMap;

/// `dB = db_per_unit * value + zero_point`
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumUnit {
    pub name: String,
    pub db_per_unit: f32,
    pub zero_point: f32,
}

impl SpectrumUnit {
    pub fn new(name: impl Into<String>, db_per_unit: f32, zero_point: f32) -> Self {
        Self {
            name: name.into(),
            db_per_unit,
            zero_point,
        }
    }

    pub fn to_db(&self, value: f32) -> f32 {
        self.db_per_unit * value + self.zero_point
    }

    pub fn from_db(&self, db: f32) -> f32 {
        (db - self.zero_point) / self.db_per_unit
    }
}

#[derive(Debug, Default)]
pub struct SpectrumUnits {
    units: BTreeMap<String, SpectrumUnit>,
}

impl SpectrumUnits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the standard units.
    pub fn with_builtins() -> Self {
        let mut units = Self::new();
        for unit in [
            SpectrumUnit::new("dBFS", 1.0, 0.0),
            SpectrumUnit::new("dBK", 1.0, -228.6),
            SpectrumUnit::new("dBW/Hz", 1.0, 0.0),
            SpectrumUnit::new("dBm/Hz", 1.0, -30.0),
            SpectrumUnit::new("dBJy", 1.0, 0.0),
            // AB magnitudes: 0 mag is 3631 Jy
            SpectrumUnit::new("mag (AB)", -4.0, -2.5 * 3631f32.log10()),
        ] {
            units.register(unit);
        }
        units
    }

    /// Adds a unit unless the name is taken.
    pub fn register(&mut self, unit: SpectrumUnit) -> bool {
        if self.units.contains_key(&unit.name) {
            return false;
        }
        self.units.insert(unit.name.clone(), unit);
        true
    }

    pub fn replace(&mut self, unit: SpectrumUnit) {
        self.units.insert(unit.name.clone(), unit);
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.units.remove(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&SpectrumUnit> {
        self.units.get(name)
    }

    /// Units whose name sorts at or after `name`.
    pub fn from_name<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a SpectrumUnit> + 'a {
        self.units.range(name.to_string()..).map(|(_, u)| u)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpectrumUnit> {
        self.units.values()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
