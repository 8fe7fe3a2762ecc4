use std::path::PathBuf;
use std::sync::Arc;

use crate::database::{Database, Session};
use crate::error::Result;
use crate::models::AccuracyResult;
use crate::query::{load_test_pair, QueryTask};

/// A query result materialized as a connection-scoped temporary table.
///
/// Must be handed back through [`TempTable::release`] on the session that
/// created it; dropping the guard without releasing only logs.
struct TempTable {
    name: String,
    released: bool,
}

impl TempTable {
    async fn create(session: &mut dyn Session, task: &QueryTask) -> Result<Self> {
        let name = task.temp_table_name();
        session
            .execute(&format!("CREATE TEMPORARY TABLE {} AS \n{}", name, task.sql()))
            .await?;
        tracing::debug!(table = %name, query = task.name(), "temp table created");
        Ok(Self {
            name,
            released: false,
        })
    }

    async fn count(&self, session: &mut dyn Session) -> Result<i64> {
        let count = session
            .fetch_count(&format!("SELECT COUNT(*) FROM {}", self.name))
            .await?;
        Ok(count)
    }

    async fn release(mut self, session: &mut dyn Session) {
        self.released = true;
        match session
            .execute(&format!("DROP TEMPORARY TABLE IF EXISTS {}", self.name))
            .await
        {
            Ok(_) => tracing::debug!(table = %self.name, "temp table dropped"),
            Err(e) => tracing::warn!(table = %self.name, error = %e, "failed to drop temp table"),
        }
    }
}

impl Drop for TempTable {
    fn drop(&mut self) {
        if !self.released {
            tracing::error!(table = %self.name, "temp table guard dropped without release");
        }
    }
}

/// Decides whether a query returns the same row set as its paired test query
/// by comparing `COUNT(*)` of both temp tables and of their `UNION`.
///
/// Row data never leaves the database.
#[derive(Clone)]
pub struct AccuracyVerifier {
    db: Arc<dyn Database>,
    test_dir: PathBuf,
}

impl AccuracyVerifier {
    pub fn new(db: Arc<dyn Database>, test_dir: impl Into<PathBuf>) -> Self {
        Self {
            db,
            test_dir: test_dir.into(),
        }
    }

    /// Verify `baseline` against `<test_dir>/<baseline name>`.
    pub async fn verify(&self, baseline: &QueryTask) -> Result<AccuracyResult> {
        let test = load_test_pair(baseline, &self.test_dir)?;
        self.verify_pair(baseline, &test).await
    }

    /// Verify two already loaded queries. Database errors propagate; a
    /// mismatch is reported through `success = false`.
    ///
    /// Both temp tables are dropped on every path once created.
    pub async fn verify_pair(&self, baseline: &QueryTask, test: &QueryTask) -> Result<AccuracyResult> {
        let mut session = self.db.session().await?;
        let session = session.as_mut();

        let baseline_table = TempTable::create(session, baseline).await?;
        let result = Self::compare_with_baseline(session, &baseline_table, baseline, test).await;
        baseline_table.release(session).await;

        let result = result?;
        tracing::info!(
            query = baseline.name(),
            count = result.baseline_count,
            test_count = result.test_count,
            union_count = ?result.union_count,
            success = result.success,
            "accuracy checked"
        );
        Ok(result)
    }

    async fn compare_with_baseline(
        session: &mut dyn Session,
        baseline_table: &TempTable,
        baseline: &QueryTask,
        test: &QueryTask,
    ) -> Result<AccuracyResult> {
        let baseline_count = baseline_table.count(session).await?;

        let test_table = TempTable::create(session, test).await?;
        let result = Self::compare_tables(session, baseline_table, &test_table, baseline_count).await;
        test_table.release(session).await;

        let (test_count, union_count) = result?;
        Ok(AccuracyResult::new(
            baseline.base_name(),
            baseline_count,
            test_count,
            union_count,
        ))
    }

    /// Returns the test row count and, only when it equals the baseline
    /// count, the distinct union count.
    async fn compare_tables(
        session: &mut dyn Session,
        baseline_table: &TempTable,
        test_table: &TempTable,
        baseline_count: i64,
    ) -> Result<(i64, Option<i64>)> {
        let test_count = test_table.count(session).await?;
        if test_count != baseline_count {
            return Ok((test_count, None));
        }

        let union_count = session
            .fetch_count(&format!(
                "SELECT COUNT(*) FROM (SELECT * FROM {} UNION SELECT * FROM {}) AS union_rows",
                test_table.name, baseline_table.name
            ))
            .await?;
        Ok((test_count, Some(union_count)))
    }
}
