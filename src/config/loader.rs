use super::legacy::LegacyJsonConfig;
use super::types::BenchConfig;
use crate::error::{BenchError, Result};
use std::env;
use std::fs;
use std::path::Path;

const VALID_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
const VALID_FORMATS: [&str; 2] = ["compact", "json"];

impl BenchConfig {
    /// Load configuration from a TOML file, or from a legacy `config.json`
    /// when the extension is `.json`.
    ///
    /// Note: Environment overrides are applied separately via `apply_env_overrides()`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            BenchError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_legacy_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| BenchError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn from_legacy_json(content: &str) -> Result<Self> {
        let legacy: LegacyJsonConfig = serde_json::from_str(content)
            .map_err(|e| BenchError::Config(format!("Failed to parse config file: {}", e)))?;
        legacy.into_config()
    }

    /// Override connection and output settings from `SQLBENCH_*` variables.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = env::var("SQLBENCH_DB_HOST") {
            self.database.host = host;
        }

        if let Ok(port_str) = env::var("SQLBENCH_DB_PORT") {
            self.database.port = port_str.parse().map_err(|_| {
                BenchError::Config(format!("Invalid SQLBENCH_DB_PORT value: {}", port_str))
            })?;
        }

        if let Ok(user) = env::var("SQLBENCH_DB_USER") {
            self.database.user = user;
        }

        if let Ok(password) = env::var("SQLBENCH_DB_PASSWORD") {
            self.database.password = password;
        }

        if let Ok(name) = env::var("SQLBENCH_DB_NAME") {
            self.database.name = name;
        }

        if let Ok(dir) = env::var("SQLBENCH_RESULTS_DIR") {
            self.paths.results_dir = dir;
        }

        Ok(())
    }

    /// Validate configuration. Call after applying environment and CLI overrides.
    pub fn finalize(&mut self) -> Result<()> {
        self.logging.level = self.logging.level.to_lowercase();
        self.logging.format = self.logging.format.to_lowercase();
        self.validate()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        if self.bench.ttl_trials == 0 {
            return Err(BenchError::Config("ttl_trials cannot be 0".to_string()));
        }

        if self.stress.init_level == 0 {
            return Err(BenchError::Config("stress init_level cannot be 0".to_string()));
        }

        // A factor of 1 would probe the same level forever
        if self.stress.growth_factor < 2 {
            return Err(BenchError::Config(format!(
                "stress growth_factor must be at least 2, got {}",
                self.stress.growth_factor
            )));
        }

        if self.database.max_connections == 0 {
            return Err(BenchError::Config("database max_connections cannot be 0".to_string()));
        }

        if self.paths.sql_dir.trim().is_empty() {
            return Err(BenchError::Config("sql_dir cannot be empty".to_string()));
        }

        if !VALID_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(BenchError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                VALID_LEVELS.join(", ")
            )));
        }

        if !VALID_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(BenchError::Config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                VALID_FORMATS.join(", ")
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BenchConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_trials_rejected() {
        let mut config = BenchConfig::default();
        config.bench.ttl_trials = 0;
        assert!(matches!(config.validate(), Err(BenchError::Config(_))));
    }

    #[test]
    fn test_growth_factor_of_one_rejected() {
        let mut config = BenchConfig::default();
        config.stress.growth_factor = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = BenchConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_sections_override_defaults() {
        let config = BenchConfig::from_toml(
            r#"
            [bench]
            warmup = 1
            ttl_trials = 4

            [stress]
            init_level = 2
            max_level = 16

            [database]
            host = "db.internal"
            "#,
        )
        .unwrap();

        assert_eq!(config.bench.warmup, 1);
        assert_eq!(config.bench.ttl_trials, 4);
        assert_eq!(config.bench.cool_down_secs, 1);
        assert_eq!(config.stress.init_level, 2);
        assert_eq!(config.stress.max_level, 16);
        assert_eq!(config.stress.growth_factor, 2);
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.paths.results_dir, "results");
    }

    #[test]
    fn test_legacy_json_keys() {
        let config = BenchConfig::from_legacy_json(
            r#"{
                "MAX_STRESS": 64,
                "TEST_TTL_TIMES": 5,
                "INIT_STRESS_TEST": 2,
                "X_STRESS": 2,
                "WARMING_TIME": 1,
                "COOL_DOWN_SECOND": 0,
                "BREAK_TIME_SECOND": 3,
                "DB_USER": "bench",
                "DB_PASSWORD": "secret",
                "DB_HOST": "10.0.0.5",
                "DB_PORT": "3307",
                "DB_NAME": "tpch",
                "SQL_DIR": "queries",
                "RESULT_TEST": "out"
            }"#,
        )
        .unwrap();

        assert_eq!(config.stress.max_level, 64);
        assert_eq!(config.bench.ttl_trials, 5);
        assert_eq!(config.bench.break_time_secs, 3);
        assert_eq!(config.database.port, 3307);
        assert_eq!(config.database.name, "tpch");
        assert_eq!(config.paths.sql_dir, "queries");
        assert_eq!(config.paths.sql_test_dir, "sql_test");
        assert_eq!(config.paths.results_dir, "out");
    }

    #[test]
    fn test_pool_settings_from_toml() {
        let config = BenchConfig::from_toml(
            r#"
            [database]
            max_connections = 16
            acquire_timeout_secs = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.database.max_connections, 16);
        assert_eq!(config.database.acquire_timeout_secs, 30);

        // Legacy files have no pool keys
        let legacy = BenchConfig::from_legacy_json("{}").unwrap();
        assert_eq!(legacy.database.acquire_timeout_secs, 600);
        assert_eq!(legacy.database.max_connections, 128);
    }

    #[test]
    fn test_legacy_json_bad_port() {
        let result = BenchConfig::from_legacy_json(r#"{ "DB_PORT": "not-a-port" }"#);
        assert!(matches!(result, Err(BenchError::Config(_))));
    }

    #[test]
    fn test_derived_params() {
        let mut config = BenchConfig::default();
        config.bench.cool_down_secs = 2;
        config.bench.break_time_secs = 7;
        config.stress.init_level = 4;

        let pauses = config.pauses();
        assert_eq!(pauses.cool_down.as_secs(), 2);
        assert_eq!(pauses.break_time.as_secs(), 7);
        assert_eq!(config.stress_params().init_level, 4);
        assert_eq!(config.ttl_params().trials, config.bench.ttl_trials);
    }
}
