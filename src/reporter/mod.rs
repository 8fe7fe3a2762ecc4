pub mod json_reporter;
pub mod memory;

use crate::error::Result;
use crate::models::{AccuracyResult, StressLevelResult, TtlResult};

pub use json_reporter::JsonFileSink;
pub use memory::MemorySink;

/// Destination for finished results, keyed by result identifier.
pub trait ResultSink: Send + Sync {
    fn write_ttl(&self, result: &TtlResult) -> Result<()>;

    fn write_stress(&self, id: &str, levels: &[StressLevelResult]) -> Result<()>;

    fn write_accuracy(&self, result: &AccuracyResult) -> Result<()>;
}
