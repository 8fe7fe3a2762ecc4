use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::ResultSink;
use crate::error::Result;
use crate::models::{AccuracyResult, StressLevelResult, TtlResult};

/// Keeps results in memory, keyed like the JSON files. Later writes replace
/// earlier ones with the same key.
#[derive(Debug, Default)]
pub struct MemorySink {
    ttl: RwLock<BTreeMap<String, TtlResult>>,
    stress: RwLock<BTreeMap<String, Vec<StressLevelResult>>>,
    accuracy: RwLock<BTreeMap<String, AccuracyResult>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ttl(&self, id: &str) -> Option<TtlResult> {
        self.ttl.read().get(id).cloned()
    }

    pub fn stress(&self, id: &str) -> Option<Vec<StressLevelResult>> {
        self.stress.read().get(id).cloned()
    }

    pub fn accuracy(&self, id: &str) -> Option<AccuracyResult> {
        self.accuracy.read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.ttl.read().len() + self.stress.read().len() + self.accuracy.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultSink for MemorySink {
    fn write_ttl(&self, result: &TtlResult) -> Result<()> {
        self.ttl.write().insert(result.id.clone(), result.clone());
        Ok(())
    }

    fn write_stress(&self, id: &str, levels: &[StressLevelResult]) -> Result<()> {
        self.stress.write().insert(id.to_string(), levels.to_vec());
        Ok(())
    }

    fn write_accuracy(&self, result: &AccuracyResult) -> Result<()> {
        self.accuracy
            .write()
            .insert(result.name.clone(), result.clone());
        Ok(())
    }
}
