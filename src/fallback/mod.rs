//! Text-generation fallback
//!
//! Used only when the direct table has no rule for a unit pair. The model is
//! asked for a bare number and its answer is passed through untouched apart
//! from trimming.

pub mod gemini;

use thiserror::Error;

pub use gemini::GeminiClient;

#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Model returned no text")]
    EmptyResponse,
}

/// A service that answers a single plain-text prompt
pub trait TextGenerator {
    /// Send `prompt` as the entire input and return the raw response text
    fn generate(&self, prompt: &str) -> Result<String, FallbackError>;
}

/// Build the instruction sent for a conversion
///
/// Whole values keep one decimal place (`5.0`), so the model always sees a
/// decimal quantity.
pub fn build_prompt(value: f64, from_unit: &str, to_unit: &str) -> String {
    let value = if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    };
    format!(
        "Convert {} {} to {}. Provide only the numerical result.",
        value, from_unit, to_unit
    )
}

/// Ask `generator` to convert `value`, returning its trimmed answer
///
/// One attempt only. A blank answer counts as a failure.
pub fn convert<G>(
    generator: &G,
    value: f64,
    from_unit: &str,
    to_unit: &str,
) -> Result<String, FallbackError>
where
    G: TextGenerator + ?Sized,
{
    let prompt = build_prompt(value, from_unit, to_unit);
    let text = generator.generate(&prompt)?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(FallbackError::EmptyResponse);
    }
    Ok(trimmed.to_string())
}
