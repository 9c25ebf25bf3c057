//! Shared utilities for the historionomy loader crates.
//!
//! This crate provides the Polars `AnyValue` conversions used when datasets
//! are rendered into SQL parameters.

pub mod values;

pub use values::{any_to_bool, any_to_f64, any_to_i64, any_to_text, format_numeric};
