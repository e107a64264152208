//! MCP Tools implementation
//!
//! Contains the tool implementations for the conversion service.

pub mod conversions;
pub mod status;
