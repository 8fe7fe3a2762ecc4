use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::{BenchError, Result};

const SQL_EXTENSION: &str = "sql";
const TEMP_TABLE_PREFIX: &str = "table_";
const TEST_QUERY_PREFIX: &str = "test_";
const GROUP_ID_SUFFIX: &str = "_par";

/// A named piece of SQL loaded from disk. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTask {
    name: String,
    sql: String,
}

impl QueryTask {
    pub fn new(name: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql: sql.into(),
        }
    }

    /// File name as found on disk, e.g. `q01.sql`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Identifier used for result files: the name up to its first `.`.
    pub fn base_name(&self) -> &str {
        self.name.split('.').next().unwrap_or(&self.name)
    }

    /// Name of the temporary relation this query materializes into.
    pub fn temp_table_name(&self) -> String {
        format!("{}{}", TEMP_TABLE_PREFIX, self.base_name())
    }
}

/// Sub-directory of queries executed together as one concurrent unit.
#[derive(Debug, Clone)]
pub struct QueryGroup {
    pub name: String,
    pub tasks: Vec<Arc<QueryTask>>,
}

impl QueryGroup {
    /// Result identifier for the group, `<dir>_par`.
    pub fn id(&self) -> String {
        format!("{}{}", self.name, GROUP_ID_SUFFIX)
    }
}

/// Load every `.sql` file directly under `dir`, ordered by file name.
///
/// Each query's base name keys its result files and temp table, so two files
/// sharing one (`q1.sql` and `q1.v2.sql`) are rejected.
pub fn load_queries(dir: &Path) -> Result<Vec<QueryTask>> {
    let queries = read_sql_files(dir)?;

    let mut seen: HashMap<&str, &str> = HashMap::with_capacity(queries.len());
    for query in &queries {
        if let Some(first) = seen.insert(query.base_name(), query.name()) {
            return Err(BenchError::QuerySource(format!(
                "{} and {} in {} share the identifier '{}'",
                first,
                query.name(),
                dir.display(),
                query.base_name()
            )));
        }
    }
    Ok(queries)
}

fn read_sql_files(dir: &Path) -> Result<Vec<QueryTask>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        BenchError::QuerySource(format!("Failed to read directory {}: {}", dir.display(), e))
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_sql = path
            .extension()
            .map(|ext| ext == SQL_EXTENSION)
            .unwrap_or(false);
        if is_sql && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut queries = Vec::with_capacity(paths.len());
    for path in paths {
        let sql = fs::read_to_string(&path).map_err(|e| {
            BenchError::QuerySource(format!("Failed to read file {}: {}", path.display(), e))
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        queries.push(QueryTask::new(name, sql));
    }
    Ok(queries)
}

/// Load each sub-directory of `dir` as a [`QueryGroup`], ordered by name.
pub fn load_groups(dir: &Path) -> Result<Vec<QueryGroup>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        BenchError::QuerySource(format!("Failed to read directory {}: {}", dir.display(), e))
    })?;

    let mut dirs = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();

    dirs.into_iter()
        .map(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let tasks = read_sql_files(&path)?.into_iter().map(Arc::new).collect();
            Ok(QueryGroup { name, tasks })
        })
        .collect()
}

/// Read the paired "test" query for `task` from `test_dir`.
///
/// The pair is named `test_<name>` so its temporary relation never collides
/// with the baseline's.
pub fn load_test_pair(task: &QueryTask, test_dir: &Path) -> Result<QueryTask> {
    let path = test_dir.join(task.name());
    let sql = fs::read_to_string(&path).map_err(|e| {
        BenchError::QuerySource(format!(
            "Failed to read test query {}: {}",
            path.display(),
            e
        ))
    })?;
    Ok(QueryTask::new(
        format!("{}{}", TEST_QUERY_PREFIX, task.name()),
        sql,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_base_name_stops_at_first_dot() {
        let task = QueryTask::new("q01.warm.sql", "SELECT 1");
        assert_eq!(task.base_name(), "q01");
        assert_eq!(task.temp_table_name(), "table_q01");
    }

    #[test]
    fn test_base_name_without_extension() {
        let task = QueryTask::new("orders", "SELECT 1");
        assert_eq!(task.base_name(), "orders");
    }

    #[test]
    fn test_load_queries_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.sql"), "SELECT 2").unwrap();
        fs::write(dir.path().join("a.sql"), "SELECT 1").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();
        fs::create_dir(dir.path().join("nested.sql")).unwrap();

        let queries = load_queries(dir.path()).unwrap();
        let names: Vec<_> = queries.iter().map(|q| q.name()).collect();
        assert_eq!(names, vec!["a.sql", "b.sql"]);
        assert_eq!(queries[0].sql(), "SELECT 1");
    }

    #[test]
    fn test_load_queries_rejects_shared_base_name() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("q1.sql"), "SELECT 1").unwrap();
        fs::write(dir.path().join("q1.v2.sql"), "SELECT 2").unwrap();

        match load_queries(dir.path()) {
            Err(BenchError::QuerySource(message)) => {
                assert!(message.contains("q1.sql"), "{}", message);
                assert!(message.contains("q1.v2.sql"), "{}", message);
            }
            other => panic!("expected query source error, got {:?}", other),
        }
    }

    #[test]
    fn test_group_files_may_share_base_name() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("mix")).unwrap();
        fs::write(dir.path().join("mix/q1.sql"), "SELECT 1").unwrap();
        fs::write(dir.path().join("mix/q1.v2.sql"), "SELECT 2").unwrap();

        let groups = load_groups(dir.path()).unwrap();
        assert_eq!(groups[0].tasks.len(), 2);
    }

    #[test]
    fn test_load_queries_missing_dir() {
        let dir = TempDir::new().unwrap();
        let result = load_queries(&dir.path().join("absent"));
        assert!(matches!(result, Err(BenchError::QuerySource(_))));
    }

    #[test]
    fn test_load_groups_uses_subdirectories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("reports")).unwrap();
        fs::write(dir.path().join("reports/r1.sql"), "SELECT 1").unwrap();
        fs::write(dir.path().join("reports/r2.sql"), "SELECT 2").unwrap();
        fs::write(dir.path().join("top.sql"), "SELECT 3").unwrap();

        let groups = load_groups(dir.path()).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id(), "reports_par");
        assert_eq!(groups[0].tasks.len(), 2);
    }

    #[test]
    fn test_pair_gets_distinct_temp_table() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("q7.sql"), "SELECT id FROM t").unwrap();

        let baseline = QueryTask::new("q7.sql", "SELECT id FROM t WHERE 1 = 1");
        let pair = load_test_pair(&baseline, dir.path()).unwrap();
        assert_eq!(pair.name(), "test_q7.sql");
        assert_eq!(pair.temp_table_name(), "table_test_q7");
        assert_ne!(pair.temp_table_name(), baseline.temp_table_name());
    }
}
