//! Storage engine: owns the connection pool and schema lifecycle, hands out
//! one [`Session`] per unit of work.

mod schema;
mod session;

pub use schema::{create_all, drop_all, ensure_database_exists};
pub use session::{PendingOp, Session};

use crate::config::{Environment, StorageConfig};
use crate::error::{ConfigError, StorageError};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Handle to the relational store. Cheap to clone; clones share the pool and
/// the lifecycle state. Starts uninitialized; [`DbStorage::reload`] makes it ready.
#[derive(Clone)]
pub struct DbStorage {
    inner: Arc<Inner>,
}

struct Inner {
    pool: PgPool,
    env: Environment,
    ready: AtomicBool,
    reset_done: AtomicBool,
}

impl DbStorage {
    /// Build the engine with a lazily connected pool. No I/O happens here.
    pub fn new(config: &StorageConfig) -> Result<Self, ConfigError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_lazy_with(config.connect_options()?);
        Ok(Self::from_pool(pool, config.env))
    }

    pub fn from_pool(pool: PgPool, env: Environment) -> Self {
        Self {
            inner: Arc::new(Inner {
                pool,
                env,
                ready: AtomicBool::new(false),
                reset_done: AtomicBool::new(false),
            }),
        }
    }

    /// Create missing tables and mark the engine ready. In the test
    /// environment the first call drops every table beforehand; later calls
    /// leave data alone.
    pub async fn reload(&self) -> Result<(), StorageError> {
        let pool = &self.inner.pool;
        if self.inner.env == Environment::Test && !self.inner.reset_done.swap(true, Ordering::SeqCst) {
            tracing::info!("test environment: dropping all tables");
            drop_all(pool).await?;
        }
        create_all(pool).await?;
        self.inner.ready.store(true, Ordering::SeqCst);
        tracing::info!("storage ready");
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.inner.ready.load(Ordering::SeqCst)
    }

    /// Open a fresh unit of work.
    pub fn session(&self) -> Result<Session, StorageError> {
        if !self.is_ready() {
            return Err(StorageError::Uninitialized);
        }
        Ok(Session::new(self.inner.pool.clone()))
    }

    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Close every pooled connection. Call once at process exit.
    pub async fn shutdown(&self) {
        self.inner.pool.close().await;
        tracing::info!("storage closed");
    }
}
