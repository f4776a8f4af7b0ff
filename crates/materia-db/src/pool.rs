//! Connection pool management.

use std::path::PathBuf;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::{
    customer::CustomerRepository, order::OrderRepository, payment::PaymentRepository,
    product::ProductRepository, report::ReportRepository,
};

/// Database configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite file. `None` runs fully in memory.
    pub database_path: Option<PathBuf>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub run_migrations: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            database_path: Some(PathBuf::from("materia.db")),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            run_migrations: true,
        }
    }
}

impl DbConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: Some(path.into()),
            ..Default::default()
        }
    }

    /// In-memory database for tests. A single pooled connection is kept
    /// alive for the pool's lifetime so the data survives between queries.
    pub fn in_memory() -> Self {
        Self {
            database_path: None,
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        }
    }
}

/// Handle to the SQLite database and its repositories.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if missing) and migrate the database.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        let options = match &config.database_path {
            Some(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .foreign_keys(true),
            None => SqliteConnectOptions::new()
                .in_memory(true)
                .foreign_keys(true),
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(None)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        if config.run_migrations {
            migrations::run(&pool).await?;
        }

        match &config.database_path {
            Some(path) => info!(path = %path.display(), "database ready"),
            None => info!("in-memory database ready"),
        }

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.pool.clone())
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    pub fn payments(&self) -> PaymentRepository {
        PaymentRepository::new(self.pool.clone())
    }

    pub fn reports(&self) -> ReportRepository {
        ReportRepository::new(self.pool.clone())
    }

    /// Cheap liveness probe for the health endpoint.
    pub async fn health_check(&self) -> DbResult<()> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
