//! # jhonote-db
//!
//! PostgreSQL persistence for JHONOTE.
//!
//! This crate provides:
//! - Connection pool management
//! - [`PgNoteStore`], the production [`jhonote_core::NoteStore`]
//! - Embedded migrations behind the `migrations` feature
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use jhonote_core::{NewNote, NoteRepository};
//! use jhonote_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/jhonote").await?;
//!     let repo = NoteRepository::new(Arc::new(db.notes.clone()));
//!
//!     let note = repo.create("user-1", NewNote::new("Buy milk")).await?;
//!     println!("Created note: {}", note.id);
//!     Ok(())
//! }
//! ```

pub mod notes;
pub mod pool;
pub mod test_fixtures;

pub use jhonote_core::{Error, Result};
pub use notes::PgNoteStore;
pub use pool::{
    create_pool, create_pool_with_config, log_pool_metrics, PoolConfig, DEFAULT_MAX_CONNECTIONS,
};

/// Translate sqlx failures, separating "store unreachable" from other
/// database errors.
pub fn map_sqlx_error(e: sqlx::Error) -> Error {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            Error::StoreUnavailable(e.to_string())
        }
        other => Error::Database(other),
    }
}

/// Pool plus the note store built on it.
#[derive(Clone)]
pub struct Database {
    pub pool: sqlx::Pool<sqlx::Postgres>,
    pub notes: PgNoteStore,
}

impl Database {
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            notes: PgNoteStore::new(pool.clone()),
            pool,
        }
    }

    /// Connect with default pool settings.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

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

    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
