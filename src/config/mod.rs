//! Benchmark configuration types and loader.

pub mod defaults;
pub mod legacy;
pub mod loader;
pub mod types;

pub use types::*;
