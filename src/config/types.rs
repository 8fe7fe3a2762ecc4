use super::defaults::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::probes::{Pauses, StressParams, TtlParams};

/// Main benchmark configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchConfig {
    #[serde(default)]
    pub bench: BenchSettings,
    #[serde(default)]
    pub stress: StressSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub paths: PathSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Warm-up, trial and pause tunables shared by every probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchSettings {
    /// Untimed invocations before measuring (per TTL probe and per stress level)
    #[serde(default = "default_warmup")]
    pub warmup: u32,

    /// Timed invocations per TTL probe
    #[serde(default = "default_ttl_trials")]
    pub ttl_trials: u32,

    /// Pause after every warm-up run and every TTL trial
    #[serde(default = "default_cool_down_secs")]
    pub cool_down_secs: u64,

    /// Pause between stress levels and between queries
    #[serde(default = "default_break_time_secs")]
    pub break_time_secs: u64,
}

impl Default for BenchSettings {
    fn default() -> Self {
        Self {
            warmup: default_warmup(),
            ttl_trials: default_ttl_trials(),
            cool_down_secs: default_cool_down_secs(),
            break_time_secs: default_break_time_secs(),
        }
    }
}

/// Geometric escalation bounds for stress mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StressSettings {
    #[serde(default = "default_init_level")]
    pub init_level: u32,
    #[serde(default = "default_max_level")]
    pub max_level: u32,
    #[serde(default = "default_growth_factor")]
    pub growth_factor: u32,
}

impl Default for StressSettings {
    fn default() -> Self {
        Self {
            init_level: default_init_level(),
            max_level: default_max_level(),
            growth_factor: default_growth_factor(),
        }
    }
}

/// MySQL connection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default = "default_db_user")]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_db_name")]
    pub name: String,

    /// Pool size; stress levels above this wait for a free connection
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long a task may wait for a pooled connection. A task that times
    /// out here counts as a failed execution, so a stress level wider than
    /// `max_connections` can fail on this wait alone.
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            port: default_db_port(),
            user: default_db_user(),
            password: String::new(),
            name: default_db_name(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
        }
    }
}

impl DatabaseSettings {
    /// Connection URL without the password, safe to log.
    pub fn redacted_url(&self) -> String {
        format!("mysql://{}@{}:{}/{}", self.user, self.host, self.port, self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Directory of `.sql` files (or of sub-directories for concurrent groups)
    #[serde(default = "default_sql_dir")]
    pub sql_dir: String,

    /// Directory holding the paired "test" query for each baseline file
    #[serde(default = "default_sql_test_dir")]
    pub sql_test_dir: String,

    #[serde(default = "default_results_dir")]
    pub results_dir: String,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            sql_dir: default_sql_dir(),
            sql_test_dir: default_sql_test_dir(),
            results_dir: default_results_dir(),
        }
    }
}

impl PathSettings {
    pub fn sql_dir(&self) -> PathBuf {
        PathBuf::from(&self.sql_dir)
    }

    pub fn sql_test_dir(&self) -> PathBuf {
        PathBuf::from(&self.sql_test_dir)
    }

    pub fn results_dir(&self) -> PathBuf {
        PathBuf::from(&self.results_dir)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// "compact" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Optional log file; console logging is always on
    #[serde(default)]
    pub file: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl BenchConfig {
    pub fn ttl_params(&self) -> TtlParams {
        TtlParams {
            warmup: self.bench.warmup,
            trials: self.bench.ttl_trials,
        }
    }

    pub fn stress_params(&self) -> StressParams {
        StressParams {
            warmup: self.bench.warmup,
            init_level: self.stress.init_level,
            max_level: self.stress.max_level,
            growth_factor: self.stress.growth_factor,
        }
    }

    pub fn pauses(&self) -> Pauses {
        Pauses {
            cool_down: Duration::from_secs(self.bench.cool_down_secs),
            break_time: Duration::from_secs(self.bench.break_time_secs),
        }
    }
}
