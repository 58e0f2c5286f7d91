//! PostgreSQL implementations of the collaborator contracts.
//!
//! All SQL text is fixed at compile time. Only values are bound as
//! parameters; table and column names never come from request input.

mod accounts;
mod dashboard;
mod records;

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::store::{HealthCheck, StoreError};

/// Pool-backed store shared by all routes.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Builds a lazily connecting pool; no connection is opened until first use.
pub fn connect_lazy(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let options = match &config.url {
        Some(url) => url.parse::<PgConnectOptions>()?,
        None => PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name),
    };

    Ok(PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_lazy_with(options))
}

/// Opens one connection to report whether the database is reachable.
pub async fn probe(pool: &PgPool) {
    match pool.acquire().await {
        Ok(_) => tracing::info!("Connected to PostgreSQL database"),
        Err(e) => tracing::error!("Error connecting to database: {e}"),
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(db_err) => StoreError::Rejected(db_err.message().to_string()),
            other => StoreError::Internal(other.to_string()),
        }
    }
}

#[async_trait]
impl HealthCheck for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
