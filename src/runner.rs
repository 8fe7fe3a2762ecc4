use std::path::Path;
use std::sync::Arc;

use clap::ValueEnum;

use crate::config::BenchConfig;
use crate::database::Database;
use crate::error::Result;
use crate::executor::{Executor, Workload};
use crate::probes::{AccuracyVerifier, Pauses, StressEscalator, TtlProbe};
use crate::query::{load_groups, load_queries, QueryGroup, QueryTask};
use crate::reporter::ResultSink;

/// Which probe to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Steady-state latency
    Ttl,
    /// Concurrency escalation until failure
    Stress,
    /// Row-set equivalence against the paired test query
    Acc,
}

/// How queries are grouped into workloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shape {
    /// One workload per `.sql` file
    Single,
    /// One workload per sub-directory, its files executed concurrently
    #[value(alias = "parallel")]
    Para,
}

#[derive(Debug, Clone, Copy)]
enum TimedProbe {
    Ttl,
    Stress,
}

/// Totals of one invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub attempted: usize,
    /// Probes that produced a result
    pub succeeded: usize,
    /// Probes that aborted with an error
    pub failed: usize,
    /// Accuracy results with `success = false`
    pub mismatched: usize,
}

/// Drives one probe over every selected query or group and hands each
/// result to the sink.
pub struct Runner {
    executor: Executor,
    sink: Arc<dyn ResultSink>,
    ttl: TtlProbe,
    stress: StressEscalator,
    accuracy: AccuracyVerifier,
    pauses: Pauses,
    filter: Option<String>,
}

impl Runner {
    pub fn new(config: &BenchConfig, db: Arc<dyn Database>, sink: Arc<dyn ResultSink>) -> Result<Self> {
        let pauses = config.pauses();
        Ok(Self {
            executor: Executor::new(Arc::clone(&db)),
            sink,
            ttl: TtlProbe::new(config.ttl_params(), pauses)?,
            stress: StressEscalator::new(config.stress_params(), pauses)?,
            accuracy: AccuracyVerifier::new(db, config.paths.sql_test_dir()),
            pauses,
            filter: None,
        })
    }

    /// Only run queries or groups whose name contains `filter` (case-insensitive).
    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter.map(|f| f.to_lowercase());
        self
    }

    fn selected(&self, name: &str) -> bool {
        match self.filter {
            Some(ref filter) => name.to_lowercase().contains(filter),
            None => true,
        }
    }

    pub async fn run(&self, mode: Mode, shape: Shape, sql_dir: &Path) -> Result<RunSummary> {
        let probe = match mode {
            Mode::Ttl => TimedProbe::Ttl,
            Mode::Stress => TimedProbe::Stress,
            Mode::Acc => {
                if shape == Shape::Para {
                    tracing::warn!("accuracy mode always runs per query; ignoring para");
                }
                return self.run_accuracy(sql_dir).await;
            }
        };

        let units = match shape {
            Shape::Single => self
                .select_queries(sql_dir)?
                .into_iter()
                .map(|task| {
                    let id = task.base_name().to_string();
                    let workload: Arc<dyn Workload> = Arc::new(self.executor.single(Arc::new(task)));
                    (id, workload)
                })
                .collect(),
            Shape::Para => self
                .select_groups(sql_dir)?
                .into_iter()
                .map(|group| {
                    let id = group.id();
                    let workload: Arc<dyn Workload> = Arc::new(self.executor.group(group.tasks));
                    (id, workload)
                })
                .collect(),
        };

        Ok(self.run_timed(probe, units).await)
    }

    pub fn select_queries(&self, sql_dir: &Path) -> Result<Vec<QueryTask>> {
        let mut queries = load_queries(sql_dir)?;
        queries.retain(|q| self.selected(q.name()));
        Ok(queries)
    }

    pub fn select_groups(&self, sql_dir: &Path) -> Result<Vec<QueryGroup>> {
        let mut groups = load_groups(sql_dir)?;
        groups.retain(|g| self.selected(&g.name));
        Ok(groups)
    }

    async fn run_timed(&self, probe: TimedProbe, units: Vec<(String, Arc<dyn Workload>)>) -> RunSummary {
        let mut summary = RunSummary::default();
        let total = units.len();

        for (idx, (id, workload)) in units.into_iter().enumerate() {
            tracing::info!("[{}/{}] {} {:?}", idx + 1, total, id, probe);
            summary.attempted += 1;

            let written = match probe {
                TimedProbe::Ttl => match self.ttl.run(&id, workload.as_ref()).await {
                    Ok(result) => self.sink.write_ttl(&result),
                    Err(e) => Err(e),
                },
                TimedProbe::Stress => {
                    let outcome = self.stress.run(&id, workload).await;
                    self.sink.write_stress(&id, &outcome.levels)
                }
            };

            match written {
                Ok(()) => summary.succeeded += 1,
                Err(e) => {
                    tracing::error!(id = %id, error = %e, "probe failed");
                    summary.failed += 1;
                }
            }

            if idx + 1 < total {
                self.pauses.break_time().await;
            }
        }

        summary
    }

    async fn run_accuracy(&self, sql_dir: &Path) -> Result<RunSummary> {
        let queries = self.select_queries(sql_dir)?;
        let mut summary = RunSummary::default();
        let total = queries.len();

        for (idx, query) in queries.iter().enumerate() {
            tracing::info!("[{}/{}] {} Accuracy", idx + 1, total, query.name());
            summary.attempted += 1;

            let outcome = match self.accuracy.verify(query).await {
                Ok(result) => {
                    if !result.success {
                        summary.mismatched += 1;
                    }
                    self.sink.write_accuracy(&result)
                }
                Err(e) => Err(e),
            };

            match outcome {
                Ok(()) => summary.succeeded += 1,
                Err(e) => {
                    tracing::error!(query = query.name(), error = %e, "accuracy check failed");
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }
}
