//! Library side of the historionomy loader CLI: configuration, the per-mode
//! run loop and logging setup.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod types;
