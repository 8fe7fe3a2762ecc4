//! sqlbench
//!
//! Latency (TTL), stress-escalation and accuracy benchmarks for directories
//! of `.sql` files executed against MySQL.

pub mod config;
pub mod database;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod preflight;
pub mod probes;
pub mod query;
pub mod reporter;
pub mod runner;

pub use config::BenchConfig;
pub use database::{Database, MySqlDatabase, Session};
pub use error::{BenchError, DbError, Result};
pub use executor::{ExecutionOutcome, Executor, Workload};
pub use models::{AccuracyResult, StressLevelResult, TimingSample, TtlResult};
pub use probes::{
    AccuracyVerifier, Pauses, StopReason, StressEscalator, StressOutcome, StressParams, TtlParams,
    TtlProbe,
};
pub use query::{QueryGroup, QueryTask};
pub use reporter::{JsonFileSink, MemorySink, ResultSink};
pub use runner::{Mode, RunSummary, Runner, Shape};
