//! Benchmark probes: steady-state latency, stress escalation and accuracy.

pub mod accuracy;
pub mod stress;
pub mod ttl;

use std::time::{Duration, Instant};

use crate::executor::Workload;

pub use accuracy::AccuracyVerifier;
pub use stress::{StopReason, StressEscalator, StressOutcome};
pub use ttl::TtlProbe;

/// Parameters of a TTL probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlParams {
    pub warmup: u32,
    pub trials: u32,
}

/// Parameters of a stress escalation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StressParams {
    /// Warm-up runs before every level
    pub warmup: u32,
    pub init_level: u32,
    pub max_level: u32,
    pub growth_factor: u32,
}

/// Unconditional sleeps between runs. Zero durations skip the sleep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pauses {
    /// After every warm-up run and every timed TTL trial
    pub cool_down: Duration,
    /// Between stress levels and between queries
    pub break_time: Duration,
}

impl Pauses {
    pub async fn cool_down(&self) {
        sleep(self.cool_down).await;
    }

    pub async fn break_time(&self) {
        sleep(self.break_time).await;
    }
}

async fn sleep(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

/// Invoke `workload` `count` times, discarding outcomes. Failures are logged only.
pub(crate) async fn warm_up(id: &str, workload: &dyn Workload, count: u32, pauses: &Pauses) {
    for round in 0..count {
        let outcome = workload.run().await;
        if let Some(error) = outcome.error() {
            tracing::debug!(id, round, error, "warm-up run failed, ignored");
        }
        pauses.cool_down().await;
    }
}

pub(crate) fn elapsed_ms(start: Instant) -> i64 {
    start.elapsed().as_millis() as i64
}
