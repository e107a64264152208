//! Converter Status Tool
//!
//! Runtime status of the conversion service plus the usage guide served to
//! MCP clients.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::units::table;

/// Usage instructions for AI assistants
pub const CONVERSION_INSTRUCTIONS: &str = r#"
# Unit Converter Instructions

## Workflow
1. Call `list_unit_categories` (or `list_units` for one category) to see the valid unit names.
2. Call `convert_units` with `category`, `from_unit`, `to_unit` and a non-negative `value`.
3. Report the `display` field to the user, prefixed with `label`.

## Rules
- Both units must belong to the chosen category. Names are case-insensitive.
- `from_unit` and `to_unit` must differ. Identical units are refused with
  "Please select different units." and nothing is converted.
- Values must be zero or positive.

## Result Sources
- `table`: a direct conversion rule exists. The value is exact and shown
  rounded to 2 decimals.
- `generated`: no direct rule exists, so the question was sent once to a
  text-generation model. The answer is returned as-is and is not verified.
  Treat it as an estimate.

## Coverage
Direct rules cover common pairs only. There is no chaining through a third
unit: Feet -> Yards, Inches -> Yards, Kelvin -> Fahrenheit and any Tonnes,
Centimeters or Millimeters conversion go to the model.

## Failures
If the model cannot be reached the tool returns
"Conversion failed. Please try again." together with the cause. Nothing is
retried automatically.
"#;

/// Runtime status of the converter service
#[derive(Debug, Clone, Serialize)]
pub struct ConverterStatus {
    pub build: BuildInfo,

    /// Conversion setup
    pub fallback_model: String,
    pub table_rules: usize,

    /// Process information
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    started_at: DateTime<Utc>,
    fallback_model: String,
}

impl StatusTracker {
    pub fn new(fallback_model: impl Into<String>) -> Self {
        Self {
            start_time: Instant::now(),
            started_at: Utc::now(),
            fallback_model: fallback_model.into(),
        }
    }

    pub fn get_status(&self) -> ConverterStatus {
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        ConverterStatus {
            build: BuildInfo::current(),
            fallback_model: self.fallback_model.clone(),
            table_rules: table::len(),
            started_at: self.started_at,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
