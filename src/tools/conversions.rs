//! Conversion MCP Tools
//!
//! Tool bodies for listing units and converting values. Each returns a
//! serializable response; the MCP layer only handles transport.

use serde::Serialize;

use crate::converter::{ConversionError, ConversionRequest, ConversionResult, ResultSource, UnitConverter};
use crate::fallback::TextGenerator;
use crate::units::{table, UnitCategory};

/// A category with its units, for list_unit_categories
#[derive(Debug, Serialize)]
pub struct CategoryUnits {
    pub category: UnitCategory,
    pub units: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct ListCategoriesResponse {
    pub categories: Vec<CategoryUnits>,
    pub table_rules: usize,
}

/// Response for a successful conversion
#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub source: ResultSource,
    pub label: &'static str,
    /// Numeric value (table hits only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Raw model answer (fallback hits only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub unit: &'static str,
    pub display: String,
}

/// Response for a refused or failed conversion
#[derive(Debug, Serialize)]
pub struct ConvertErrorResponse {
    pub error: String,
    pub kind: &'static str,
}

impl From<ConversionResult> for ConvertResponse {
    fn from(result: ConversionResult) -> Self {
        let display = result.to_string();
        let source = result.source();
        let label = result.label();
        match result {
            ConversionResult::Table { value, unit } => Self {
                source,
                label,
                value: Some(value),
                text: None,
                unit,
                display,
            },
            ConversionResult::Generated { text, unit } => Self {
                source,
                label,
                value: None,
                text: Some(text),
                unit,
                display,
            },
        }
    }
}

impl From<&ConversionError> for ConvertErrorResponse {
    fn from(err: &ConversionError) -> Self {
        let kind = match err {
            ConversionError::SameUnit => "same_unit",
            ConversionError::InvalidValue(_) => "invalid_value",
            ConversionError::UnknownCategory(_) => "unknown_category",
            ConversionError::UnknownUnit { .. } => "unknown_unit",
            ConversionError::Fallback(_) => "conversion_failed",
        };
        Self {
            error: err.to_string(),
            kind,
        }
    }
}

pub fn list_unit_categories() -> ListCategoriesResponse {
    let categories = UnitCategory::ALL
        .into_iter()
        .map(|category| CategoryUnits {
            category,
            units: category.units().to_vec(),
        })
        .collect();

    ListCategoriesResponse {
        categories,
        table_rules: table::len(),
    }
}

/// Units of one category, by name
pub fn list_units(category: &str) -> Result<CategoryUnits, ConversionError> {
    let category = UnitCategory::from_name(category)
        .ok_or_else(|| ConversionError::UnknownCategory(category.to_string()))?;
    Ok(CategoryUnits {
        category,
        units: category.units().to_vec(),
    })
}

/// Convert a value between two units of a category
///
/// Refusals and failures come back as `Err` carrying a user-facing message.
pub fn convert_units<G: TextGenerator>(
    converter: &UnitConverter<G>,
    category: &str,
    from_unit: &str,
    to_unit: &str,
    value: f64,
) -> Result<ConvertResponse, ConvertErrorResponse> {
    let request = ConversionRequest::parse(value, category, from_unit, to_unit)
        .map_err(|e| ConvertErrorResponse::from(&e))?;

    converter
        .convert(&request)
        .map(ConvertResponse::from)
        .map_err(|e| ConvertErrorResponse::from(&e))
}
