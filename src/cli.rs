use clap::Parser;

use sqlbench::{Mode, Shape};

/// CLI configuration for the benchmark tool.
#[derive(Parser, Debug, Clone)]
#[command(name = "sqlbench", about = "Latency, stress and accuracy benchmarks for SQL query files")]
pub struct Cli {
    /// Configuration file (TOML, or a legacy `config.json`)
    #[arg(long, default_value = "sqlbench.toml", env = "SQLBENCH_CONFIG")]
    pub config: String,

    /// Benchmark mode
    #[arg(long, value_enum, default_value_t = Mode::Ttl)]
    pub mode: Mode,

    /// Execution shape: one workload per file, or one per sub-directory run concurrently
    #[arg(long = "exe", value_enum, default_value_t = Shape::Single)]
    pub shape: Shape,

    /// Run only queries (or groups) whose name contains this substring
    #[arg(long)]
    pub filter: Option<String>,

    /// Override the configured log level
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the queries or groups that would run and exit
    #[arg(long, default_value_t = false)]
    pub list: bool,
}
