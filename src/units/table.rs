//! Direct conversion table
//!
//! Static rules keyed by an ordered unit pair. Only tabulated pairs convert;
//! there is no chaining through intermediate units, so Feet -> Yards is a
//! miss even though both Feet -> Meters and Meters -> Yards exist.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Ordered (from, to) unit pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversionKey<'a> {
    pub from: &'a str,
    pub to: &'a str,
}

impl<'a> ConversionKey<'a> {
    pub fn new(from: &'a str, to: &'a str) -> Self {
        Self { from, to }
    }
}

/// How a tabulated pair converts a value
#[derive(Debug, Clone, Copy)]
pub enum ConversionRule {
    /// Linear: value * factor
    Factor(f64),
    /// Affine or nonlinear mapping (temperatures)
    Function(fn(f64) -> f64),
}

impl ConversionRule {
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            ConversionRule::Factor(factor) => value * factor,
            ConversionRule::Function(f) => f(value),
        }
    }
}

// ============================================================================
// Conversion Constants
// ============================================================================

/// Kilometers per mile (also used for mph -> km/h)
pub const KM_PER_MILE: f64 = 1.60934;
/// Meters per foot
pub const M_PER_FOOT: f64 = 0.3048;
/// Meters per yard
pub const M_PER_YARD: f64 = 0.9144;
/// Pounds per kilogram
pub const LB_PER_KG: f64 = 2.20462;
/// Grams per ounce
pub const G_PER_OZ: f64 = 28.3495;
/// Kilometers per hour per meter per second
pub const KMH_PER_MPS: f64 = 3.6;
/// Square meters per square foot
pub const SQ_M_PER_SQ_FT: f64 = 0.092903;
/// Square meters per acre
pub const SQ_M_PER_ACRE: f64 = 4046.86;
/// Square meters per hectare
pub const SQ_M_PER_HECTARE: f64 = 10_000.0;
/// Square kilometers per square mile
pub const SQ_KM_PER_SQ_MILE: f64 = 2.58999;
/// US gallons per liter
pub const GAL_PER_LITER: f64 = 0.264172;
/// Offset between Kelvin and Celsius
pub const KELVIN_OFFSET: f64 = 273.15;

fn celsius_to_fahrenheit(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

fn fahrenheit_to_celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

fn celsius_to_kelvin(c: f64) -> f64 {
    c + KELVIN_OFFSET
}

fn kelvin_to_celsius(k: f64) -> f64 {
    k - KELVIN_OFFSET
}

use ConversionRule::{Factor, Function};

const RULES: &[(&str, &str, ConversionRule)] = &[
    // Length
    ("Meters", "Kilometers", Factor(0.001)),
    ("Kilometers", "Meters", Factor(1000.0)),
    ("Miles", "Kilometers", Factor(KM_PER_MILE)),
    ("Kilometers", "Miles", Factor(1.0 / KM_PER_MILE)),
    ("Feet", "Meters", Factor(M_PER_FOOT)),
    ("Meters", "Feet", Factor(1.0 / M_PER_FOOT)),
    ("Inches", "Feet", Factor(1.0 / 12.0)),
    ("Feet", "Inches", Factor(12.0)),
    ("Yards", "Meters", Factor(M_PER_YARD)),
    ("Meters", "Yards", Factor(1.0 / M_PER_YARD)),
    // Weight
    ("Kilograms", "Grams", Factor(1000.0)),
    ("Grams", "Kilograms", Factor(1.0 / 1000.0)),
    ("Kilograms", "Pounds", Factor(LB_PER_KG)),
    ("Pounds", "Kilograms", Factor(1.0 / LB_PER_KG)),
    ("Ounces", "Grams", Factor(G_PER_OZ)),
    ("Grams", "Ounces", Factor(1.0 / G_PER_OZ)),
    // Temperature
    ("Celsius", "Fahrenheit", Function(celsius_to_fahrenheit)),
    ("Fahrenheit", "Celsius", Function(fahrenheit_to_celsius)),
    ("Celsius", "Kelvin", Function(celsius_to_kelvin)),
    ("Kelvin", "Celsius", Function(kelvin_to_celsius)),
    // Speed
    ("Meters per second", "Kilometers per hour", Factor(KMH_PER_MPS)),
    ("Kilometers per hour", "Meters per second", Factor(1.0 / KMH_PER_MPS)),
    ("Miles per hour", "Kilometers per hour", Factor(KM_PER_MILE)),
    ("Kilometers per hour", "Miles per hour", Factor(1.0 / KM_PER_MILE)),
    // Time
    ("Seconds", "Minutes", Factor(1.0 / 60.0)),
    ("Minutes", "Seconds", Factor(60.0)),
    ("Minutes", "Hours", Factor(1.0 / 60.0)),
    ("Hours", "Minutes", Factor(60.0)),
    ("Hours", "Days", Factor(1.0 / 24.0)),
    ("Days", "Hours", Factor(24.0)),
    ("Weeks", "Days", Factor(7.0)),
    ("Days", "Weeks", Factor(1.0 / 7.0)),
    // Area
    ("Square meters", "Square kilometers", Factor(1.0 / 1e6)),
    ("Square kilometers", "Square meters", Factor(1e6)),
    ("Square feet", "Square meters", Factor(SQ_M_PER_SQ_FT)),
    ("Square meters", "Square feet", Factor(1.0 / SQ_M_PER_SQ_FT)),
    ("Acres", "Square meters", Factor(SQ_M_PER_ACRE)),
    ("Square meters", "Acres", Factor(1.0 / SQ_M_PER_ACRE)),
    ("Hectares", "Square meters", Factor(SQ_M_PER_HECTARE)),
    ("Square meters", "Hectares", Factor(1.0 / SQ_M_PER_HECTARE)),
    ("Square miles", "Square kilometers", Factor(SQ_KM_PER_SQ_MILE)),
    ("Square kilometers", "Square miles", Factor(1.0 / SQ_KM_PER_SQ_MILE)),
    // Volume
    ("Liters", "Milliliters", Factor(1000.0)),
    ("Milliliters", "Liters", Factor(1.0 / 1000.0)),
    ("Liters", "Gallons", Factor(GAL_PER_LITER)),
    ("Gallons", "Liters", Factor(1.0 / GAL_PER_LITER)),
    ("Liters", "Cubic meters", Factor(0.001)),
    ("Cubic meters", "Liters", Factor(1000.0)),
];

fn table() -> &'static HashMap<ConversionKey<'static>, ConversionRule> {
    static TABLE: OnceLock<HashMap<ConversionKey<'static>, ConversionRule>> = OnceLock::new();
    TABLE.get_or_init(|| {
        RULES
            .iter()
            .map(|&(from, to, rule)| (ConversionKey::new(from, to), rule))
            .collect()
    })
}

/// Find the rule for an ordered unit pair
///
/// Unit names must use the canonical spelling from the catalog.
pub fn rule(from: &str, to: &str) -> Option<ConversionRule> {
    table().get(&ConversionKey::new(from, to)).copied()
}

/// Convert `value` using the direct rule for (from, to)
///
/// Returns None on a table miss. Callers reject `from == to` before
/// resolving; identical units are never tabulated.
pub fn resolve(value: f64, from: &str, to: &str) -> Option<f64> {
    rule(from, to).map(|r| r.apply(value))
}

/// All tabulated pairs, in declaration order
pub fn entries() -> impl Iterator<Item = (ConversionKey<'static>, ConversionRule)> {
    RULES
        .iter()
        .map(|&(from, to, rule)| (ConversionKey::new(from, to), rule))
}

pub fn len() -> usize {
    table().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::catalog::category_of;

    fn assert_close(actual: f64, expected: f64) {
        let tolerance = 1e-9 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() < tolerance,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_temperature_rules() {
        assert_close(resolve(0.0, "Celsius", "Fahrenheit").unwrap(), 32.0);
        assert_close(resolve(100.0, "Celsius", "Fahrenheit").unwrap(), 212.0);
        assert_close(resolve(212.0, "Fahrenheit", "Celsius").unwrap(), 100.0);
        assert_close(resolve(0.0, "Celsius", "Kelvin").unwrap(), 273.15);
        assert_close(resolve(273.15, "Kelvin", "Celsius").unwrap(), 0.0);
    }

    #[test]
    fn test_scalar_rules() {
        assert_close(resolve(1500.0, "Meters", "Kilometers").unwrap(), 1.5);
        assert_close(resolve(10.0, "Miles", "Kilometers").unwrap(), 16.0934);
        assert_close(resolve(3.0, "Feet", "Inches").unwrap(), 36.0);
        assert_close(resolve(2.0, "Weeks", "Days").unwrap(), 14.0);
        assert_close(resolve(10.0, "Meters per second", "Kilometers per hour").unwrap(), 36.0);
        assert_close(resolve(2.0, "Hectares", "Square meters").unwrap(), 20_000.0);
    }

    #[test]
    fn test_no_transitive_path() {
        for value in [0.0, 1.0, 3.0, 1234.5] {
            assert_eq!(resolve(value, "Feet", "Yards"), None);
        }
        assert!(rule("Inches", "Yards").is_none());
        assert!(rule("Tonnes", "Grams").is_none());
        assert!(rule("Kelvin", "Fahrenheit").is_none());
    }

    #[test]
    fn test_identity_not_tabulated() {
        for (key, _) in entries() {
            assert_ne!(key.from, key.to);
        }
    }

    #[test]
    fn test_key_order_matters() {
        assert!(rule("Ounces", "Grams").is_some());
        assert!(rule("Grams", "Ounces").is_some());
        assert!(rule("Pounds", "Ounces").is_none());
    }

    #[test]
    fn test_lookup_with_borrowed_names() {
        let from = String::from("Kilograms");
        let to = String::from("Grams");
        assert_close(resolve(2.5, &from, &to).unwrap(), 2500.0);
    }

    #[test]
    fn test_factor_round_trips() {
        let mut checked = 0;
        for (key, rule) in entries() {
            let ConversionRule::Factor(forward) = rule else {
                continue;
            };
            let Some(ConversionRule::Factor(back)) = super::rule(key.to, key.from) else {
                panic!("no inverse factor for {} -> {}", key.from, key.to);
            };
            for value in [0.0, 1.0, 12.5, 98_765.4321] {
                assert_close(value * forward * back, value);
            }
            checked += 1;
        }
        assert_eq!(checked, 44);
    }

    #[test]
    fn test_function_round_trips() {
        for value in [0.0, 37.0, 451.0] {
            let f = resolve(value, "Celsius", "Fahrenheit").unwrap();
            assert_close(resolve(f, "Fahrenheit", "Celsius").unwrap(), value);
            let k = resolve(value, "Celsius", "Kelvin").unwrap();
            assert_close(resolve(k, "Kelvin", "Celsius").unwrap(), value);
        }
    }

    #[test]
    fn test_pairs_stay_within_category() {
        for (key, _) in entries() {
            let from = category_of(key.from);
            assert!(from.is_some(), "unknown unit {}", key.from);
            assert_eq!(from, category_of(key.to), "{} -> {}", key.from, key.to);
        }
    }

    #[test]
    fn test_table_size() {
        assert_eq!(len(), 48);
        assert_eq!(entries().count(), len());
    }
}
