//! # bz-db-sqlite Implementation
//!
//! This crate implements the data mapping between the SQLite relational model
//! and the `bz-core` domain models. One `SqliteStore` implements every store
//! port; the binary opens it at startup and closes it on shutdown.

mod ads;
mod contents;
mod messages;
mod ranks;
mod schema;
mod users;


use std::str::FromStr;
use std::time::Duration;

use bz_core::error::{AppError, Result};
use bz_core::models::Rating;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `url` and applies the schema.
    ///
    /// `sqlite::memory:` databases are pinned to a single connection that is
    /// never recycled, since each new connection would see an empty database.
    pub async fn new(url: &str) -> Result<Self> {
        let in_memory = url.contains(":memory:");

        let mut options = SqliteConnectOptions::from_str(url)
            .map_err(db_err)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));
        if !in_memory {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new().max_connections(8)
        }
        .connect_with(options)
        .await
        .map_err(db_err)?;

        sqlx::raw_sql(schema::SCHEMA)
            .execute(&pool)
            .await
            .map_err(db_err)?;

        log::info!("sqlite store ready at {}", url);
        Ok(Self { pool })
    }

    /// Starts a transaction that holds the write lock from its first statement.
    ///
    /// A deferred transaction that reads before writing cannot upgrade once
    /// another WAL writer has committed; `BEGIN IMMEDIATE` queues on
    /// `busy_timeout` instead.
    async fn begin_write(&self) -> Result<Transaction<'static, Sqlite>> {
        self.pool.begin_with("BEGIN IMMEDIATE").await.map_err(db_err)
    }

    /// Waits for in-flight queries and closes every connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

// Helper for UUID conversion
fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

fn blob_to_uuid(blob: &[u8]) -> Result<Uuid> {
    Uuid::from_slice(blob).map_err(|e| AppError::Internal(format!("malformed id column: {e}")))
}

fn rating_to_i64(rating: Rating) -> Result<i64> {
    i64::try_from(rating.tenths())
        .map_err(|_| AppError::Internal(format!("rating {rating} exceeds storage range")))
}

// The CHECK constraint keeps stored ratings non-negative.
fn i64_to_rating(tenths: i64) -> Rating {
    Rating::from_tenths(u64::try_from(tenths).unwrap_or(0))
}

/// SQLite primary result codes for a writer that lost a lock race.
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Maps driver errors onto the domain taxonomy.
fn db_err(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        // Extended codes carry the primary code in the low byte.
        let primary = db
            .code()
            .and_then(|code| code.parse::<i32>().ok())
            .map(|code| code & 0xff);
        if matches!(primary, Some(SQLITE_BUSY) | Some(SQLITE_LOCKED)) {
            return AppError::Concurrency(db.message().to_string());
        }
        if db.is_unique_violation() {
            return AppError::Conflict(db.message().to_string());
        }
    }
    log::error!("sqlite error: {}", err);
    AppError::Internal(err.to_string())
}
