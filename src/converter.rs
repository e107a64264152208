//! Conversion orchestration
//!
//! Validates a request, tries the direct table, and falls back to text
//! generation on a miss.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::fallback::{self, FallbackError, TextGenerator};
use crate::units::{table, UnitCategory};

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Please select different units.")]
    SameUnit,

    #[error("Value must be a non-negative number, got {0}")]
    InvalidValue(f64),

    #[error("Unknown unit category '{0}'")]
    UnknownCategory(String),

    #[error("'{unit}' is not a {category} unit")]
    UnknownUnit { category: UnitCategory, unit: String },

    #[error("Conversion failed. Please try again. ({0})")]
    Fallback(#[from] FallbackError),
}

/// One user conversion request
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub value: f64,
    pub category: UnitCategory,
    pub from_unit: String,
    pub to_unit: String,
}

impl ConversionRequest {
    pub fn new(
        value: f64,
        category: UnitCategory,
        from_unit: impl Into<String>,
        to_unit: impl Into<String>,
    ) -> Self {
        Self {
            value,
            category,
            from_unit: from_unit.into(),
            to_unit: to_unit.into(),
        }
    }

    /// Build a request from a category name, as entered by a user
    pub fn parse(
        value: f64,
        category: &str,
        from_unit: impl Into<String>,
        to_unit: impl Into<String>,
    ) -> Result<Self, ConversionError> {
        let category = UnitCategory::from_name(category)
            .ok_or_else(|| ConversionError::UnknownCategory(category.to_string()))?;
        Ok(Self::new(value, category, from_unit, to_unit))
    }
}

/// Where a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Table,
    Generated,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConversionResult {
    /// Direct table hit
    Table { value: f64, unit: &'static str },
    /// Raw text from the generation service
    Generated { text: String, unit: &'static str },
}

impl ConversionResult {
    pub fn source(&self) -> ResultSource {
        match self {
            ConversionResult::Table { .. } => ResultSource::Table,
            ConversionResult::Generated { .. } => ResultSource::Generated,
        }
    }

    /// User-facing label for the result
    pub fn label(&self) -> &'static str {
        match self {
            ConversionResult::Table { .. } => "Manual Conversion",
            ConversionResult::Generated { .. } => "AI Conversion",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            ConversionResult::Table { unit, .. } | ConversionResult::Generated { unit, .. } => unit,
        }
    }
}

impl fmt::Display for ConversionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionResult::Table { value, unit } => write!(f, "{:.2} {}", value, unit),
            ConversionResult::Generated { text, unit } => write!(f, "{} {}", text, unit),
        }
    }
}

/// Table-first converter with a text-generation fallback
pub struct UnitConverter<G> {
    generator: G,
}

impl<G: TextGenerator> UnitConverter<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Convert a request
    ///
    /// Identical units are rejected without consulting the table or the
    /// fallback. A fallback failure is returned as an error, never as an
    /// empty success.
    pub fn convert(&self, request: &ConversionRequest) -> Result<ConversionResult, ConversionError> {
        if !request.value.is_finite() || request.value < 0.0 {
            return Err(ConversionError::InvalidValue(request.value));
        }

        let from = self.canonical_unit(request.category, &request.from_unit)?;
        let to = self.canonical_unit(request.category, &request.to_unit)?;

        if from == to {
            return Err(ConversionError::SameUnit);
        }

        if let Some(value) = table::resolve(request.value, from, to) {
            tracing::debug!("Table conversion: {} {} -> {} {}", request.value, from, value, to);
            return Ok(ConversionResult::Table { value, unit: to });
        }

        tracing::warn!(
            "No table entry for '{}' -> '{}'. Falling back to text generation.",
            from,
            to
        );

        match fallback::convert(&self.generator, request.value, from, to) {
            Ok(text) => Ok(ConversionResult::Generated { text, unit: to }),
            Err(e) => {
                tracing::error!("Fallback conversion {} -> {} failed: {}", from, to, e);
                Err(e.into())
            }
        }
    }

    fn canonical_unit(
        &self,
        category: UnitCategory,
        unit: &str,
    ) -> Result<&'static str, ConversionError> {
        category
            .find_unit(unit)
            .ok_or_else(|| ConversionError::UnknownUnit {
                category,
                unit: unit.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records prompts and replays a fixed outcome
    struct Recorder {
        prompts: Mutex<Vec<String>>,
        reply: Option<&'static str>,
    }

    impl Recorder {
        fn replying(reply: &'static str) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                reply: Some(reply),
            }
        }

        fn failing() -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                reply: None,
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    impl TextGenerator for Recorder {
        fn generate(&self, prompt: &str) -> Result<String, FallbackError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match self.reply {
                Some(text) => Ok(text.to_string()),
                None => Err(FallbackError::Api {
                    status: 503,
                    body: "unavailable".to_string(),
                }),
            }
        }
    }

    fn request(category: UnitCategory, value: f64, from: &str, to: &str) -> ConversionRequest {
        ConversionRequest::new(value, category, from, to)
    }

    #[test]
    fn test_table_hit_skips_fallback() {
        let converter = UnitConverter::new(Recorder::replying("999"));
        let result = converter
            .convert(&request(UnitCategory::Temperature, 100.0, "Celsius", "Fahrenheit"))
            .unwrap();

        assert_eq!(result.source(), ResultSource::Table);
        assert_eq!(result.to_string(), "212.00 Fahrenheit");
        assert!(converter.generator().prompts().is_empty());
    }

    #[test]
    fn test_table_hit_rounds_to_two_decimals() {
        let converter = UnitConverter::new(Recorder::replying("unused"));
        let result = converter
            .convert(&request(UnitCategory::Length, 1.0, "Meters", "Feet"))
            .unwrap();
        assert_eq!(result.to_string(), "3.28 Feet");
        assert_eq!(result.label(), "Manual Conversion");
    }

    #[test]
    fn test_same_unit_rejected_before_resolution() {
        let converter = UnitConverter::new(Recorder::replying("1"));
        let err = converter
            .convert(&request(UnitCategory::Length, 5.0, "Meters", "meters"))
            .unwrap_err();

        assert!(matches!(err, ConversionError::SameUnit));
        assert_eq!(err.to_string(), "Please select different units.");
        assert!(converter.generator().prompts().is_empty());
    }

    #[test]
    fn test_miss_invokes_fallback_once() {
        let converter = UnitConverter::new(Recorder::replying(" 1.6667 "));
        let result = converter
            .convert(&request(UnitCategory::Length, 5.0, "Feet", "Yards"))
            .unwrap();

        let prompts = converter.generator().prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Convert 5.0 Feet to Yards"));

        assert_eq!(result.source(), ResultSource::Generated);
        assert_eq!(result.label(), "AI Conversion");
        assert_eq!(result.to_string(), "1.6667 Yards");
    }

    #[test]
    fn test_fallback_failure_is_reported() {
        let converter = UnitConverter::new(Recorder::failing());
        let err = converter
            .convert(&request(UnitCategory::Weight, 2.0, "Tonnes", "Pounds"))
            .unwrap_err();

        assert!(matches!(err, ConversionError::Fallback(_)));
        assert!(err.to_string().starts_with("Conversion failed. Please try again."));
        assert_eq!(converter.generator().prompts().len(), 1);
    }

    #[test]
    fn test_blank_fallback_answer_is_failure() {
        let converter = UnitConverter::new(Recorder::replying("   "));
        let err = converter
            .convert(&request(UnitCategory::Weight, 2.0, "Tonnes", "Pounds"))
            .unwrap_err();
        assert!(matches!(err, ConversionError::Fallback(FallbackError::EmptyResponse)));
    }

    #[test]
    fn test_invalid_values() {
        let converter = UnitConverter::new(Recorder::replying("1"));
        for value in [-1.0, f64::NAN, f64::INFINITY] {
            let err = converter
                .convert(&request(UnitCategory::Time, value, "Hours", "Days"))
                .unwrap_err();
            assert!(matches!(err, ConversionError::InvalidValue(_)));
        }
    }

    #[test]
    fn test_zero_is_valid() {
        let converter = UnitConverter::new(Recorder::replying("1"));
        let result = converter
            .convert(&request(UnitCategory::Temperature, 0.0, "Celsius", "Kelvin"))
            .unwrap();
        assert_eq!(result, ConversionResult::Table { value: 273.15, unit: "Kelvin" });
    }

    #[test]
    fn test_unit_outside_category() {
        let converter = UnitConverter::new(Recorder::replying("1"));
        let err = converter
            .convert(&request(UnitCategory::Length, 1.0, "Meters", "Grams"))
            .unwrap_err();
        assert!(matches!(err, ConversionError::UnknownUnit { .. }));
        assert_eq!(err.to_string(), "'Grams' is not a Length unit");
    }

    #[test]
    fn test_units_are_canonicalized() {
        let converter = UnitConverter::new(Recorder::replying("1"));
        let result = converter
            .convert(&request(UnitCategory::Speed, 10.0, "meters PER second", " kilometers per hour "))
            .unwrap();
        assert_eq!(result.to_string(), "36.00 Kilometers per hour");
    }

    #[test]
    fn test_parse_request() {
        let request = ConversionRequest::parse(3.0, "area", "Acres", "Hectares").unwrap();
        assert_eq!(request.category, UnitCategory::Area);

        let err = ConversionRequest::parse(3.0, "Energy", "Joules", "Calories").unwrap_err();
        assert!(matches!(err, ConversionError::UnknownCategory(_)));
    }
}
