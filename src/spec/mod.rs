//! The RuleV2 wire/storage format and its parameter helpers.

pub mod definition;
pub mod params;

pub use definition::*;
pub use params::*;
