use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;

mod cli;

use cli::Cli;
use sqlbench::query::{load_groups, load_queries};
use sqlbench::{preflight, BenchConfig, Database, JsonFileSink, MySqlDatabase, Runner, Shape};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("sqlbench: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = BenchConfig::from_file(&cli.config)?;
    config.apply_env_overrides()?;
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    config.finalize()?;

    sqlbench::logging::init_logging(&config.logging)?;

    let sql_dir = config.paths.sql_dir();

    if cli.list {
        match cli.shape {
            Shape::Single => {
                println!("Queries in {}:", sql_dir.display());
                for query in load_queries(&sql_dir)? {
                    println!("  {:<28} {}", query.base_name(), query.name());
                }
            }
            Shape::Para => {
                println!("Groups in {}:", sql_dir.display());
                for group in load_groups(&sql_dir)? {
                    println!("  {:<28} {} queries", group.id(), group.tasks.len());
                }
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    println!("╔════════════════════════════════════════════════╗");
    println!("║            sqlbench v{:<26}║", env!("CARGO_PKG_VERSION"));
    println!("╚════════════════════════════════════════════════╝");
    println!();
    println!("  Database:    {}", config.database.redacted_url());
    println!("  Mode:        {:?} ({:?})", cli.mode, cli.shape);
    println!("  Warmup:      {}", config.bench.warmup);
    println!("  TTL trials:  {}", config.bench.ttl_trials);
    println!(
        "  Stress:      {} → {} (x{})",
        config.stress.init_level, config.stress.max_level, config.stress.growth_factor
    );
    if let Some(ref f) = cli.filter {
        println!("  Filter:      {}", f);
    }
    println!();

    tracing::info!(url = %config.database.redacted_url(), "Connecting");
    let db = MySqlDatabase::connect(&config.database)
        .await
        .with_context(|| format!("failed to connect to {}", config.database.redacted_url()))?;
    tracing::info!("Successfully connected");

    let checks = preflight::run_preflight_checks(&db, &config, cli.mode).await;
    if !preflight::all_passed(&checks) {
        db.close().await;
        return Ok(ExitCode::FAILURE);
    }

    let shared: Arc<dyn Database> = Arc::new(db.clone());
    let sink = Arc::new(JsonFileSink::new(config.paths.results_dir()));
    let runner = Runner::new(&config, shared, sink)?.with_filter(cli.filter.clone());

    let overall_start = Instant::now();
    let summary = runner.run(cli.mode, cli.shape, &sql_dir).await?;
    let overall_elapsed = overall_start.elapsed();

    println!("\n════════════════════════════════════════════════");
    println!(
        "  Completed {} probes in {:.2}s",
        summary.attempted,
        overall_elapsed.as_secs_f64()
    );
    println!("  Passed: {}  Failed: {}", summary.succeeded, summary.failed);
    if summary.mismatched > 0 {
        println!("  Accuracy mismatches: {}", summary.mismatched);
    }
    println!("  Results:     {}", config.paths.results_dir().display());
    println!("════════════════════════════════════════════════\n");

    db.close().await;
    tracing::info!("Test done");

    if summary.attempted == 0 {
        eprintln!("No queries matched selection. Use --list to see what would run.");
        return Ok(ExitCode::FAILURE);
    }
    if summary.failed > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
