//! PostgreSQL storage layer.
//!
//! `Database` wraps a single shared `PgPool`. It is constructed once at
//! process start and handed to the router through application state; nothing
//! else in the crate opens connections. Domain queries are split into
//! per-entity submodules:
//!
//! - [`members`] — member rows, lookup by email, per-member statistics
//! - [`tasks`] — task CRUD with assignee/creator joins and completion logging
//! - [`articles`] — article CRUD, filtered listing, view counter
//! - [`robots`] — robot project CRUD and filtered listing
//! - [`contributions`] — append-only contribution log

mod articles;
mod contributions;
mod members;
pub mod models;
pub mod query_builder;
mod robots;
mod tasks;

pub use articles::{ArticleFilter, ArticleUpdate};
pub use contributions::ContributionType;
pub use members::MemberUpdate;
pub use robots::{RobotFilter, RobotUpdate};
pub use tasks::{TaskFilter, TaskUpdate};

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Errors surfaced by the storage layer.
///
/// Unique-key conflicts get their own variant so handlers can map them to a
/// client error instead of a generic failure.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate value: {0}")]
    UniqueViolation(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Classify a sqlx error, turning Postgres unique violations (23505)
    /// into `UniqueViolation` with the given client-facing message.
    pub fn classify(err: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.code().as_deref() == Some("23505") {
                return DatabaseError::UniqueViolation(conflict_message.to_string());
            }
        }
        DatabaseError::Sqlx(err)
    }
}

/// Handle to the relational store: one pool, opened at startup, closed at
/// shutdown. Cloning is cheap (the pool is internally reference-counted).
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL using the provided database URL.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        connect_timeout_secs: u64,
    ) -> Result<Self, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(connect_timeout_secs))
            .connect(database_url)
            .await?;

        info!("Connected to PostgreSQL database");
        Ok(Database { pool })
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Health check: execute `SELECT 1` to verify database connectivity.
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    /// Drain the pool on shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}
