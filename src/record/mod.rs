//! Record builder module
//!
//! Turns one parsed line into a nested key/value tree, then into the
//! normalized row that gets persisted.
//!
//! # Overview
//!
//! Headers may carry dotted paths (`name.firstName`). `build_nested` explodes
//! those paths into nested objects; [`NormalizedRow::from_nested`] applies the
//! mandatory-field rules and splits the tree into the four persisted columns.

mod nested;
mod row;

pub use nested::build_nested;
pub use row::NormalizedRow;
