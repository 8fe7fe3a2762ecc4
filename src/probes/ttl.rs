use std::time::Instant;

use super::{elapsed_ms, warm_up, Pauses, TtlParams};
use crate::error::{BenchError, Result};
use crate::executor::{ExecutionOutcome, Workload};
use crate::models::{TimingSample, TtlResult};

/// Measures steady-state latency: warm-up, then `trials` timed runs averaged
/// with truncating division.
#[derive(Debug, Clone)]
pub struct TtlProbe {
    params: TtlParams,
    pauses: Pauses,
}

impl TtlProbe {
    /// Fails with a configuration error when `trials` is zero.
    pub fn new(params: TtlParams, pauses: Pauses) -> Result<Self> {
        if params.trials == 0 {
            return Err(BenchError::Config(
                "TTL trial count must be greater than 0".to_string(),
            ));
        }
        Ok(Self { params, pauses })
    }

    /// Run the probe. Any failed timed trial aborts it without a result.
    pub async fn run(&self, id: &str, workload: &dyn Workload) -> Result<TtlResult> {
        tracing::info!(id, warmup = self.params.warmup, trials = self.params.trials, "TTL start");
        warm_up(id, workload, self.params.warmup, &self.pauses).await;

        let mut sample = TimingSample::with_capacity(self.params.trials as usize);
        for trial in 0..self.params.trials {
            let start = Instant::now();
            let outcome = workload.run().await;
            let duration_ms = elapsed_ms(start);

            if let ExecutionOutcome::Failure(message) = outcome {
                tracing::error!(id, trial, error = %message, "TTL trial failed, aborting probe");
                return Err(BenchError::Execution {
                    id: id.to_string(),
                    trial,
                    message,
                });
            }

            sample.push(duration_ms);
            self.pauses.cool_down().await;
        }

        // trials > 0 is enforced in new()
        let average_duration_ms = sample.average_ms().unwrap_or_default();
        tracing::info!(id, average_ms = average_duration_ms, "TTL done");

        Ok(TtlResult {
            id: id.to_string(),
            average_duration_ms,
            samples: sample.into_vec(),
        })
    }
}
