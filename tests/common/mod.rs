// Shared fixtures for integration tests: an in-memory database that
// understands the statements the engine issues.
#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use sqlbench::{Database, DbError, Session};

pub type Row = Vec<String>;

pub fn rows(values: &[&str]) -> Vec<Row> {
    values.iter().map(|v| vec![v.to_string()]).collect()
}

#[derive(Default)]
struct FakeState {
    /// Source query text -> result rows
    results: HashMap<String, Vec<Row>>,
    /// Query text -> artificial latency
    delays: HashMap<String, Duration>,
    failing_queries: HashSet<String>,
    /// Temp tables whose COUNT(*) must fail
    failing_counts: HashSet<String>,
    executed: Vec<String>,
    created: Vec<String>,
    dropped: Vec<String>,
    unions_computed: usize,
    sessions_opened: usize,
}

/// In-memory stand-in for MySQL.
#[derive(Clone, Default)]
pub struct FakeDatabase {
    state: Arc<Mutex<FakeState>>,
}

impl FakeDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(self, sql: &str, result: Vec<Row>) -> Self {
        self.state.lock().results.insert(sql.trim().to_string(), result);
        self
    }

    pub fn with_delay(self, sql: &str, delay: Duration) -> Self {
        self.state.lock().delays.insert(sql.trim().to_string(), delay);
        self
    }

    pub fn failing_query(self, sql: &str) -> Self {
        self.state.lock().failing_queries.insert(sql.trim().to_string());
        self
    }

    pub fn failing_count_on(self, table: &str) -> Self {
        self.state.lock().failing_counts.insert(table.to_string());
        self
    }

    pub fn executed(&self) -> Vec<String> {
        self.state.lock().executed.clone()
    }

    pub fn created_tables(&self) -> Vec<String> {
        self.state.lock().created.clone()
    }

    pub fn dropped_tables(&self) -> Vec<String> {
        self.state.lock().dropped.clone()
    }

    pub fn unions_computed(&self) -> usize {
        self.state.lock().unions_computed
    }

    pub fn sessions_opened(&self) -> usize {
        self.state.lock().sessions_opened
    }

    fn lookup(&self, sql: &str) -> Result<Vec<Row>, DbError> {
        let state = self.state.lock();
        if state.failing_queries.contains(sql) {
            return Err(DbError::new(format!("injected failure for: {}", sql)));
        }
        state
            .results
            .get(sql)
            .cloned()
            .ok_or_else(|| DbError::new(format!("You have an error in your SQL syntax near '{}'", sql)))
    }
}

#[async_trait]
impl Database for FakeDatabase {
    async fn run_query(&self, sql: &str) -> Result<u64, DbError> {
        let sql = sql.trim();
        let delay = {
            let mut state = self.state.lock();
            state.executed.push(sql.to_string());
            state.delays.get(sql).copied()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if sql == "SELECT 1" {
            return Ok(1);
        }
        self.lookup(sql).map(|rows| rows.len() as u64)
    }

    async fn session(&self) -> Result<Box<dyn Session>, DbError> {
        self.state.lock().sessions_opened += 1;
        Ok(Box::new(FakeSession {
            db: self.clone(),
            temp_tables: HashMap::new(),
        }))
    }
}

/// Temp tables live per session, like MySQL.
struct FakeSession {
    db: FakeDatabase,
    temp_tables: HashMap<String, Vec<Row>>,
}

impl FakeSession {
    fn table(&self, name: &str) -> Result<&Vec<Row>, DbError> {
        self.temp_tables
            .get(name.trim())
            .ok_or_else(|| DbError::new(format!("Table '{}' doesn't exist", name.trim())))
    }
}

#[async_trait]
impl Session for FakeSession {
    async fn execute(&mut self, sql: &str) -> Result<u64, DbError> {
        if let Some(rest) = sql.strip_prefix("CREATE TEMPORARY TABLE ") {
            let (name, query) = rest
                .split_once(" AS ")
                .ok_or_else(|| DbError::new("malformed CREATE TEMPORARY TABLE"))?;
            let result = self.db.lookup(query.trim())?;
            let affected = result.len() as u64;
            self.temp_tables.insert(name.to_string(), result);
            self.db.state.lock().created.push(name.to_string());
            return Ok(affected);
        }

        if let Some(name) = sql.strip_prefix("DROP TEMPORARY TABLE IF EXISTS ") {
            self.temp_tables.remove(name.trim());
            self.db.state.lock().dropped.push(name.trim().to_string());
            return Ok(0);
        }

        Err(DbError::new(format!("unsupported statement: {}", sql)))
    }

    async fn fetch_count(&mut self, sql: &str) -> Result<i64, DbError> {
        let target = sql
            .strip_prefix("SELECT COUNT(*) FROM ")
            .ok_or_else(|| DbError::new(format!("unsupported count: {}", sql)))?;

        if let Some(union) = target.strip_prefix("(SELECT * FROM ") {
            let union = union
                .strip_suffix(") AS union_rows")
                .ok_or_else(|| DbError::new("malformed union count"))?;
            let (left, right) = union
                .split_once(" UNION SELECT * FROM ")
                .ok_or_else(|| DbError::new("malformed union count"))?;
            let distinct: BTreeSet<&Row> = self.table(left)?.iter().chain(self.table(right)?.iter()).collect();
            let count = distinct.len() as i64;
            self.db.state.lock().unions_computed += 1;
            return Ok(count);
        }

        if self.db.state.lock().failing_counts.contains(target.trim()) {
            return Err(DbError::new(format!("injected count failure on {}", target)));
        }
        Ok(self.table(target)?.len() as i64)
    }
}
