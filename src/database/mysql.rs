use std::time::Duration;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlPool, MySqlPoolOptions};
use sqlx::pool::PoolConnection;
use sqlx::{MySql, Row};

use super::{Database, Session};
use crate::config::DatabaseSettings;
use crate::error::DbError;

/// MySQL pool backed by sqlx.
///
/// Statements are sent through the text protocol (`raw_sql`) so query files
/// may contain anything the server accepts, including DDL that cannot be
/// prepared.
#[derive(Clone)]
pub struct MySqlDatabase {
    pool: MySqlPool,
}

impl MySqlDatabase {
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, DbError> {
        let options = MySqlConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.user)
            .password(&settings.password)
            .database(&settings.name);

        let pool = MySqlPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl Database for MySqlDatabase {
    async fn run_query(&self, sql: &str) -> Result<u64, DbError> {
        let mut rows = sqlx::raw_sql(sql).fetch(&self.pool);
        let mut drained = 0u64;
        while rows.try_next().await?.is_some() {
            drained += 1;
        }
        Ok(drained)
    }

    async fn session(&self) -> Result<Box<dyn Session>, DbError> {
        let conn = self.pool.acquire().await?;
        Ok(Box::new(MySqlSession { conn }))
    }
}

struct MySqlSession {
    conn: PoolConnection<MySql>,
}

#[async_trait]
impl Session for MySqlSession {
    async fn execute(&mut self, sql: &str) -> Result<u64, DbError> {
        let conn: &mut MySqlConnection = &mut self.conn;
        let done = sqlx::Executor::execute(conn, sqlx::raw_sql(sql)).await?;
        Ok(done.rows_affected())
    }

    async fn fetch_count(&mut self, sql: &str) -> Result<i64, DbError> {
        let conn: &mut MySqlConnection = &mut self.conn;
        let row = sqlx::Executor::fetch_one(conn, sqlx::raw_sql(sql)).await?;
        Ok(row.try_get::<i64, _>(0)?)
    }
}
