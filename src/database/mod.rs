//! Database collaborator seams.
//!
//! The engine only needs two capabilities: run arbitrary SQL and drain the
//! rows, and hold one connection long enough to create, count and drop
//! temporary relations (which are connection-scoped).

pub mod mysql;

use async_trait::async_trait;

use crate::error::DbError;

pub use mysql::MySqlDatabase;

/// Shared handle used concurrently by every task of a run.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute `sql` and drain every returned row. Returns the drained row count.
    async fn run_query(&self, sql: &str) -> Result<u64, DbError>;

    /// Check out one dedicated connection.
    async fn session(&self) -> Result<Box<dyn Session>, DbError>;

    /// Cheap connectivity probe used before a run.
    async fn ping(&self) -> Result<(), DbError> {
        self.run_query("SELECT 1").await.map(|_| ())
    }
}

/// A single connection; statements run in order on the same server session.
#[async_trait]
pub trait Session: Send {
    /// Execute a statement that returns no rows (DDL). Returns rows affected.
    async fn execute(&mut self, sql: &str) -> Result<u64, DbError>;

    /// Execute a query returning a single integer in the first column of the first row.
    async fn fetch_count(&mut self, sql: &str) -> Result<i64, DbError>;
}
