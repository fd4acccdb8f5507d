//! Serializers for an ezsimd registry.
//!
//! Two formats are supported:
//! - **JSON** ([`json`]): Lossless, loadable back with [`json::from_json`]
//! - **Support matrix** ([`matrix`]): A plain text table for reading

pub mod json;
pub mod matrix;
