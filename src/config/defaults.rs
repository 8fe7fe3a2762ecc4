// Default value functions
pub fn default_warmup() -> u32 {
    3
}

pub fn default_ttl_trials() -> u32 {
    10
}

pub fn default_cool_down_secs() -> u64 {
    1
}

pub fn default_break_time_secs() -> u64 {
    5
}

pub fn default_init_level() -> u32 {
    1
}

pub fn default_max_level() -> u32 {
    1024
}

pub fn default_growth_factor() -> u32 {
    2
}

pub fn default_db_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_db_port() -> u16 {
    3306
}

pub fn default_db_user() -> String {
    "root".to_string()
}

pub fn default_db_name() -> String {
    "test".to_string()
}

pub fn default_max_connections() -> u32 {
    128 // Wider stress levels queue for a connection
}

pub fn default_acquire_timeout_secs() -> u64 {
    600
}

pub fn default_sql_dir() -> String {
    "sql".to_string()
}

pub fn default_sql_test_dir() -> String {
    "sql_test".to_string()
}

pub fn default_results_dir() -> String {
    "results".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_log_format() -> String {
    "compact".to_string()
}
