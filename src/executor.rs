use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::database::Database;
use crate::query::QueryTask;

/// Result of one execution. Failures carry the database message for logs;
/// callers only branch on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    Success,
    Failure(String),
}

impl ExecutionOutcome {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Failure(message) => Some(message),
        }
    }
}

/// Something a probe can invoke repeatedly: one query, a group of queries,
/// or any closure returning an [`ExecutionOutcome`].
pub trait Workload: Send + Sync {
    fn run(&self) -> BoxFuture<'_, ExecutionOutcome>;
}

impl<F, Fut> Workload for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = ExecutionOutcome> + Send + 'static,
{
    fn run(&self) -> BoxFuture<'_, ExecutionOutcome> {
        Box::pin(self())
    }
}

/// Runs query tasks against a shared database handle.
#[derive(Clone)]
pub struct Executor {
    db: Arc<dyn Database>,
}

impl Executor {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }

    /// Execute one task and drain its rows.
    pub async fn run_one(&self, task: &QueryTask) -> ExecutionOutcome {
        match self.db.run_query(task.sql()).await {
            Ok(rows) => {
                tracing::trace!(query = task.name(), rows, "query drained");
                ExecutionOutcome::Success
            }
            Err(e) => {
                tracing::warn!(query = task.name(), error = %e, "query failed");
                ExecutionOutcome::failure(format!("{}: {}", task.name(), e))
            }
        }
    }

    /// Execute every task concurrently and wait for all of them, even after
    /// a failure. Fails if any task failed.
    pub async fn run_many(&self, tasks: &[Arc<QueryTask>]) -> ExecutionOutcome {
        let mut handles = Vec::with_capacity(tasks.len());
        for task in tasks {
            let executor = self.clone();
            let task = Arc::clone(task);
            handles.push(tokio::spawn(async move { executor.run_one(&task).await }));
        }

        let total = handles.len();
        let mut failed = 0usize;
        let mut first_error = None;
        for handle in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => ExecutionOutcome::failure(format!("Join error: {}", e)),
            };
            if let ExecutionOutcome::Failure(message) = outcome {
                failed += 1;
                first_error.get_or_insert(message);
            }
        }

        match first_error {
            None => ExecutionOutcome::Success,
            Some(message) => ExecutionOutcome::failure(format!(
                "{}/{} queries failed, first: {}",
                failed, total, message
            )),
        }
    }

    /// Workload executing a single task per invocation.
    pub fn single(&self, task: Arc<QueryTask>) -> impl Workload + 'static {
        let executor = self.clone();
        move || {
            let executor = executor.clone();
            let task = Arc::clone(&task);
            async move { executor.run_one(&task).await }
        }
    }

    /// Workload executing a whole group concurrently per invocation.
    pub fn group(&self, tasks: Vec<Arc<QueryTask>>) -> impl Workload + 'static {
        let executor = self.clone();
        let tasks = Arc::new(tasks);
        move || {
            let executor = executor.clone();
            let tasks = Arc::clone(&tasks);
            async move { executor.run_many(&tasks).await }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        assert!(ExecutionOutcome::Success.is_success());
        assert_eq!(ExecutionOutcome::Success.error(), None);

        let failed = ExecutionOutcome::failure("syntax error");
        assert!(!failed.is_success());
        assert_eq!(failed.error(), Some("syntax error"));
    }

    #[tokio::test]
    async fn test_closure_is_a_workload() {
        let workload = || async { ExecutionOutcome::Success };
        assert!(workload.run().await.is_success());
    }
}
