//! Unit Converter (uconv) Library
//!
//! Table-driven unit conversion with a text-generation fallback.

pub mod build_info;
pub mod config;
pub mod converter;
pub mod fallback;
pub mod mcp;
pub mod tools;
pub mod units;
