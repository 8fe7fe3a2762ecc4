use serde::Deserialize;

use super::defaults::*;
use super::types::{
    BenchConfig, BenchSettings, DatabaseSettings, LoggingSettings, PathSettings, StressSettings,
};
use crate::error::{BenchError, Result};

/// Flat `config.json` layout with upper-case keys, as written for the first
/// version of the harness. Converted into [`BenchConfig`] on load.
#[derive(Debug, Deserialize)]
pub struct LegacyJsonConfig {
    #[serde(rename = "MAX_STRESS", default = "default_max_level")]
    pub max_stress: u32,
    #[serde(rename = "TEST_TTL_TIMES", default = "default_ttl_trials")]
    pub test_ttl_times: u32,
    #[serde(rename = "INIT_STRESS_TEST", default = "default_init_level")]
    pub init_stress_test: u32,
    #[serde(rename = "X_STRESS", default = "default_growth_factor")]
    pub x_stress: u32,
    #[serde(rename = "WARMING_TIME", default = "default_warmup")]
    pub warming_time: u32,
    #[serde(rename = "COOL_DOWN_SECOND", default = "default_cool_down_secs")]
    pub cool_down_second: u64,
    #[serde(rename = "BREAK_TIME_SECOND", default = "default_break_time_secs")]
    pub break_time_second: u64,
    #[serde(rename = "DB_USER", default = "default_db_user")]
    pub db_user: String,
    #[serde(rename = "DB_PASSWORD", default)]
    pub db_password: String,
    #[serde(rename = "DB_HOST", default = "default_db_host")]
    pub db_host: String,
    // Stored as a string in the old files
    #[serde(rename = "DB_PORT", default)]
    pub db_port: Option<String>,
    #[serde(rename = "DB_NAME", default = "default_db_name")]
    pub db_name: String,
    #[serde(rename = "SQL_DIR", default = "default_sql_dir")]
    pub sql_dir: String,
    #[serde(rename = "SQL_TEST_DIR", default = "default_sql_test_dir")]
    pub sql_test_dir: String,
    #[serde(rename = "RESULT_TEST", default = "default_results_dir")]
    pub result_test: String,
}

impl LegacyJsonConfig {
    pub fn into_config(self) -> Result<BenchConfig> {
        let port = match self.db_port.as_deref().map(str::trim) {
            None | Some("") => default_db_port(),
            Some(raw) => raw
                .parse()
                .map_err(|_| BenchError::Config(format!("Invalid DB_PORT value: {}", raw)))?,
        };

        Ok(BenchConfig {
            bench: BenchSettings {
                warmup: self.warming_time,
                ttl_trials: self.test_ttl_times,
                cool_down_secs: self.cool_down_second,
                break_time_secs: self.break_time_second,
            },
            stress: StressSettings {
                init_level: self.init_stress_test,
                max_level: self.max_stress,
                growth_factor: self.x_stress,
            },
            database: DatabaseSettings {
                host: self.db_host,
                port,
                user: self.db_user,
                password: self.db_password,
                name: self.db_name,
                ..DatabaseSettings::default()
            },
            paths: PathSettings {
                sql_dir: self.sql_dir,
                sql_test_dir: self.sql_test_dir,
                results_dir: self.result_test,
            },
            logging: LoggingSettings::default(),
        })
    }
}
