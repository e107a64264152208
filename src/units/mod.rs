//! Unit catalog and direct conversion table

pub mod catalog;
pub mod table;

pub use catalog::{category_of, UnitCategory};
pub use table::{resolve, ConversionKey, ConversionRule};
