use std::fs;
use std::time::Instant;

use crate::config::BenchConfig;
use crate::database::Database;
use crate::runner::Mode;

/// Result of a single pre-flight check.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

impl CheckResult {
    fn pass(name: &str, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Pass,
            detail: detail.into(),
        }
    }

    fn warn(name: &str, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warn,
            detail: detail.into(),
        }
    }

    fn fail(name: &str, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Fail,
            detail: detail.into(),
        }
    }

    fn icon(&self) -> &str {
        match self.status {
            CheckStatus::Pass => "✅",
            CheckStatus::Warn => "⚠️ ",
            CheckStatus::Fail => "❌",
        }
    }
}

/// Run every check and print them. Returns the checks so callers can decide;
/// see [`all_passed`].
pub async fn run_preflight_checks(db: &dyn Database, config: &BenchConfig, mode: Mode) -> Vec<CheckResult> {
    println!("Pre-flight Checks");
    println!("─────────────────────────────────────────────────");

    let mut checks = vec![
        check_sql_dir(config),
        check_results_dir(config),
    ];
    if mode == Mode::Acc {
        checks.push(check_test_dir(config));
    }
    checks.push(check_sql_connectivity(db).await);

    for check in &checks {
        println!("  {} {:<20} {}", check.icon(), check.name, check.detail);
    }
    println!();

    checks
}

/// True when no check failed (warnings are OK).
pub fn all_passed(checks: &[CheckResult]) -> bool {
    checks.iter().all(|c| c.status != CheckStatus::Fail)
}

fn check_sql_dir(config: &BenchConfig) -> CheckResult {
    let dir = config.paths.sql_dir();
    if dir.is_dir() {
        CheckResult::pass("SQL directory", dir.display().to_string())
    } else {
        CheckResult::fail("SQL directory", format!("{} is not a directory", dir.display()))
    }
}

fn check_test_dir(config: &BenchConfig) -> CheckResult {
    let dir = config.paths.sql_test_dir();
    if dir.is_dir() {
        CheckResult::pass("Test SQL directory", dir.display().to_string())
    } else {
        // Each missing pair fails individually; the run itself can proceed
        CheckResult::warn("Test SQL directory", format!("{} is not a directory", dir.display()))
    }
}

fn check_results_dir(config: &BenchConfig) -> CheckResult {
    let dir = config.paths.results_dir();
    match fs::create_dir_all(&dir) {
        Ok(()) => CheckResult::pass("Results directory", dir.display().to_string()),
        Err(e) => CheckResult::fail("Results directory", format!("{}: {}", dir.display(), e)),
    }
}

async fn check_sql_connectivity(db: &dyn Database) -> CheckResult {
    let start = Instant::now();
    match db.ping().await {
        Ok(()) => CheckResult::pass(
            "SQL connectivity",
            format!("SELECT 1 in {}ms", start.elapsed().as_millis()),
        ),
        Err(e) => CheckResult::fail("SQL connectivity", e.to_string()),
    }
}
