//! Build metadata embedded by `build.rs`

use serde::Serialize;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const BUILD_NUMBER: u64 = match option_env!("UCONV_BUILD_NUMBER") {
    Some(raw) => parse_build_number(raw),
    None => 0,
};

const BUILD_TIMESTAMP: &str = match option_env!("UCONV_BUILD_TIMESTAMP") {
    Some(raw) => raw,
    None => "unknown",
};

/// Decimal parse usable in const context; anything malformed counts as build 0
const fn parse_build_number(raw: &str) -> u64 {
    let digits = raw.as_bytes();
    let mut number = 0u64;
    let mut i = 0;
    while i < digits.len() {
        let d = digits[i];
        if !d.is_ascii_digit() {
            return 0;
        }
        number = number * 10 + (d - b'0') as u64;
        i += 1;
    }
    number
}

/// Version and build stamp, reported by the status tool
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: VERSION,
            build_number: BUILD_NUMBER,
            build_timestamp: BUILD_TIMESTAMP,
        }
    }

    pub fn banner(&self) -> String {
        format!(
            "Unit Converter (uconv) v{} build {} ({})",
            self.version, self.build_number, self.build_timestamp
        )
    }
}

/// Print the startup banner to stderr
pub fn print_startup_banner() {
    eprintln!("{}", BuildInfo::current().banner());
}
