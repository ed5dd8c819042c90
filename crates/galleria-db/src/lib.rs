//! # galleria-db
//!
//! Storage layer for galleria.
//!
//! This crate provides:
//! - Connection pool management
//! - A PostgreSQL [`MediaRepository`] with keyset pagination and tag intersection
//! - An in-memory [`MediaRepository`] for tests and local runs
//!
//! ## Example
//!
//! ```rust,ignore
//! use galleria_db::{Database, MediaRepository, PageQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/galleria").await?;
//!     let rows = db.media.fetch_page(&PageQuery { fetch_limit: 21, ..Default::default() }).await?;
//!     println!("{} rows", rows.len());
//!     Ok(())
//! }
//! ```
pub mod media;
pub mod memory;
pub mod pool;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use galleria_core::*;
pub use sqlx;

pub use media::PgMediaRepository;
pub use memory::{InMemoryMediaRepository, RepoOp};
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};

/// Combined database context.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Read-only media and tag repository.
    pub media: PgMediaRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            media: PgMediaRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
