//! Unit categories
//!
//! The fixed set of categories offered to the user and the units valid within each.

use serde::{Deserialize, Serialize};

/// A named group of mutually convertible units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitCategory {
    Length,
    Weight,
    Temperature,
    Speed,
    Time,
    Area,
    Volume,
}

// ============================================================================
// Unit Lists (display order)
// ============================================================================

const LENGTH_UNITS: &[&str] = &[
    "Meters",
    "Kilometers",
    "Miles",
    "Feet",
    "Inches",
    "Yards",
    "Centimeters",
    "Millimeters",
];

const WEIGHT_UNITS: &[&str] = &["Kilograms", "Grams", "Pounds", "Ounces", "Tonnes"];

const TEMPERATURE_UNITS: &[&str] = &["Celsius", "Fahrenheit", "Kelvin"];

const SPEED_UNITS: &[&str] = &["Meters per second", "Kilometers per hour", "Miles per hour"];

const TIME_UNITS: &[&str] = &["Seconds", "Minutes", "Hours", "Days", "Weeks"];

const AREA_UNITS: &[&str] = &[
    "Square meters",
    "Square kilometers",
    "Square feet",
    "Acres",
    "Hectares",
    "Square miles",
];

const VOLUME_UNITS: &[&str] = &["Liters", "Milliliters", "Gallons", "Cubic meters"];

impl UnitCategory {
    /// All categories in display order
    pub const ALL: [UnitCategory; 7] = [
        UnitCategory::Length,
        UnitCategory::Weight,
        UnitCategory::Temperature,
        UnitCategory::Speed,
        UnitCategory::Time,
        UnitCategory::Area,
        UnitCategory::Volume,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            UnitCategory::Length => "Length",
            UnitCategory::Weight => "Weight",
            UnitCategory::Temperature => "Temperature",
            UnitCategory::Speed => "Speed",
            UnitCategory::Time => "Time",
            UnitCategory::Area => "Area",
            UnitCategory::Volume => "Volume",
        }
    }

    /// Parse a category name, ignoring case and surrounding whitespace
    pub fn from_name(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(trimmed))
    }

    /// Units valid within this category, in display order
    pub fn units(&self) -> &'static [&'static str] {
        match self {
            UnitCategory::Length => LENGTH_UNITS,
            UnitCategory::Weight => WEIGHT_UNITS,
            UnitCategory::Temperature => TEMPERATURE_UNITS,
            UnitCategory::Speed => SPEED_UNITS,
            UnitCategory::Time => TIME_UNITS,
            UnitCategory::Area => AREA_UNITS,
            UnitCategory::Volume => VOLUME_UNITS,
        }
    }

    /// Look up a unit of this category, returning its canonical spelling
    ///
    /// Matching ignores case and surrounding whitespace, so "square METERS"
    /// yields "Square meters".
    pub fn find_unit(&self, unit: &str) -> Option<&'static str> {
        let trimmed = unit.trim();
        self.units()
            .iter()
            .copied()
            .find(|u| u.eq_ignore_ascii_case(trimmed))
    }

    pub fn contains(&self, unit: &str) -> bool {
        self.find_unit(unit).is_some()
    }
}

impl std::fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Determine which category a unit belongs to
pub fn category_of(unit: &str) -> Option<UnitCategory> {
    UnitCategory::ALL.into_iter().find(|c| c.contains(unit))
}
