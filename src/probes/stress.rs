use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use super::{elapsed_ms, warm_up, Pauses, StressParams};
use crate::error::{BenchError, Result};
use crate::executor::{ExecutionOutcome, Workload};
use crate::models::{StressLevelResult, TimingSample};

/// Why an escalation stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// At least one task failed at `level`; that level is not recorded.
    LevelFailed { level: u32, failures: usize },
    /// The next level would exceed the ceiling (or overflow).
    CeilingReached { next_level: Option<u32> },
}

/// Everything an escalation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StressOutcome {
    /// Passing levels in probing order
    pub levels: Vec<StressLevelResult>,
    pub stop: StopReason,
}

/// Collects per-task durations and the failure count of one level.
///
/// Shared by all tasks of the level; every write goes through the mutex.
struct LevelAggregator {
    state: Mutex<LevelState>,
}

struct LevelState {
    durations_ms: Vec<i64>,
    failures: usize,
}

impl LevelAggregator {
    fn new(level: u32) -> Self {
        Self {
            state: Mutex::new(LevelState {
                durations_ms: vec![0; level as usize],
                failures: 0,
            }),
        }
    }

    fn record(&self, index: usize, duration_ms: i64, outcome: &ExecutionOutcome) {
        let mut state = self.state.lock();
        state.durations_ms[index] = duration_ms;
        if !outcome.is_success() {
            state.failures += 1;
        }
    }

    fn record_failure(&self) {
        self.state.lock().failures += 1;
    }

    fn finish(&self) -> (TimingSample, usize) {
        let state = self.state.lock();
        (TimingSample::from(state.durations_ms.clone()), state.failures)
    }
}

/// Finds the largest concurrency level that completes without a failure by
/// multiplying the level by `growth_factor` after every passing level.
#[derive(Debug, Clone)]
pub struct StressEscalator {
    params: StressParams,
    pauses: Pauses,
}

impl StressEscalator {
    /// Fails with a configuration error when the level cannot grow:
    /// `init_level` of zero or `growth_factor` below 2.
    pub fn new(params: StressParams, pauses: Pauses) -> Result<Self> {
        if params.init_level == 0 {
            return Err(BenchError::Config(
                "stress init_level must be greater than 0".to_string(),
            ));
        }
        if params.growth_factor < 2 {
            return Err(BenchError::Config(format!(
                "stress growth_factor must be at least 2, got {}",
                params.growth_factor
            )));
        }
        Ok(Self { params, pauses })
    }

    pub async fn run(&self, id: &str, workload: Arc<dyn Workload>) -> StressOutcome {
        tracing::info!(
            id,
            init = self.params.init_level,
            max = self.params.max_level,
            factor = self.params.growth_factor,
            "stress start"
        );

        let mut levels = Vec::new();
        let mut level = self.params.init_level;

        let stop = loop {
            if level > self.params.max_level {
                break StopReason::CeilingReached {
                    next_level: Some(level),
                };
            }

            warm_up(id, workload.as_ref(), self.params.warmup, &self.pauses).await;

            let start = Instant::now();
            let (sample, failures) = self.probe_level(&workload, level).await;
            let total_duration_ms = elapsed_ms(start);

            tracing::info!(id, level, failures, "stress level: {}/{} failed executions", failures, level);
            if failures > 0 {
                break StopReason::LevelFailed { level, failures };
            }

            tracing::info!(id, attempts = level, duration_ms = total_duration_ms, "stress level passed");
            levels.push(StressLevelResult {
                id: id.to_string(),
                attempts: level,
                total_duration_ms,
                per_task_durations_ms: sample.into_vec(),
            });

            self.pauses.break_time().await;

            match level.checked_mul(self.params.growth_factor) {
                Some(next) => level = next,
                None => break StopReason::CeilingReached { next_level: None },
            }
        };

        tracing::info!(id, passed_levels = levels.len(), ?stop, "stress done");
        StressOutcome { levels, stop }
    }

    /// Fan out `level` concurrent runs and wait for every one of them.
    async fn probe_level(&self, workload: &Arc<dyn Workload>, level: u32) -> (TimingSample, usize) {
        let aggregator = Arc::new(LevelAggregator::new(level));

        let mut handles = Vec::with_capacity(level as usize);
        for index in 0..level as usize {
            let workload = Arc::clone(workload);
            let aggregator = Arc::clone(&aggregator);
            handles.push(tokio::spawn(async move {
                let start = Instant::now();
                let outcome = workload.run().await;
                aggregator.record(index, elapsed_ms(start), &outcome);
            }));
        }

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "stress task panicked");
                aggregator.record_failure();
            }
        }

        aggregator.finish()
    }
}
