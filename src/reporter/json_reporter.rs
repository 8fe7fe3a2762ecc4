use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::ResultSink;
use crate::error::Result;
use crate::models::{AccuracyResult, StressLevelResult, TtlResult};

/// Writes one pretty-printed JSON document per result:
/// `ttl_<id>.json`, `stress_<id>.json` and `correct_<id>.json`.
/// Existing files are overwritten.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    dir: PathBuf,
}

impl JsonFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn ttl_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("ttl_{}.json", id))
    }

    pub fn stress_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("stress_{}.json", id))
    }

    pub fn accuracy_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("correct_{}.json", id))
    }

    fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(value)?;
        fs::write(path, json)?;
        tracing::debug!(path = %path.display(), "result written");
        Ok(())
    }
}

impl ResultSink for JsonFileSink {
    fn write_ttl(&self, result: &TtlResult) -> Result<()> {
        self.write_json(&self.ttl_path(&result.id), result)
    }

    fn write_stress(&self, id: &str, levels: &[StressLevelResult]) -> Result<()> {
        self.write_json(&self.stress_path(id), levels)
    }

    fn write_accuracy(&self, result: &AccuracyResult) -> Result<()> {
        self.write_json(&self.accuracy_path(&result.name), result)
    }
}
