//! Catalog storage using SQLite
//!
//! The catalog is the database the playback-side tools read. This module owns
//! the connection, creates the schema on first contact, and carries the
//! queries the importer needs. Writes go through `Statement` values so dry
//! runs can render exactly what a real run would execute.

mod schema;
mod statement;

pub use schema::SCHEMA_SQL;
pub use statement::{insert_episode, insert_series, SqlValue, Statement};

use std::path::Path;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use tracing::{debug, info};

use crate::error::Result;
use crate::models::SeriesRecord;

/// Catalog database handle
#[derive(Clone)]
pub struct CatalogDb {
    pool: SqlitePool,
}

impl CatalogDb {
    /// Open the catalog read-write, creating the file and schema if missing.
    pub async fn open(db_path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            // Rows must be durable before their sidecars move.
            .synchronous(SqliteSynchronous::Full);

        debug!("Opening catalog database at {:?}", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        if !db.is_initialized().await? {
            db.init_schema().await?;
        }
        Ok(db)
    }

    /// Open the catalog read-only. Dry runs go through here so no byte of the
    /// database can change.
    pub async fn open_read_only(db_path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .read_only(true)
            .journal_mode(SqliteJournalMode::Wal);

        debug!("Opening catalog database read-only at {:?}", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Initialize the catalog schema
    pub async fn init_schema(&self) -> Result<()> {
        info!("Initializing catalog schema");
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    /// Check if the schema exists yet
    pub async fn is_initialized(&self) -> Result<bool> {
        let result: Option<(i32,)> =
            sqlx::query_as("SELECT 1 FROM sqlite_master WHERE type='table' AND name='Episodes'")
                .fetch_optional(&self.pool)
                .await?;
        Ok(result.is_some())
    }

    /// Highest series Id currently in the catalog, 0 when empty.
    pub async fn max_series_id(&self) -> Result<i64> {
        let id: Option<i64> = sqlx::query_scalar("SELECT Id FROM Series ORDER BY Id DESC LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(id.unwrap_or(0))
    }

    /// Ids of every series row matching the identity tuple, lowest first.
    ///
    /// A record without a poster matches only rows where the column IS NULL.
    /// StartTime is not part of series identity.
    pub async fn find_series(&self, series: &SeriesRecord) -> Result<Vec<i64>> {
        let sql = format!(
            "SELECT Id FROM Series \
             WHERE Metadata_SeriesId = ? \
             AND Metadata_Title = ? \
             AND Metadata_Category = ? \
             AND Metadata_ImageUrl = ? \
             AND Metadata_PosterUrl {} \
             AND Metadata_IsNew = ? \
             AND Metadata_Url = ? \
             ORDER BY Id",
            if series.poster_url.is_some() {
                "= ?"
            } else {
                "IS NULL"
            }
        );

        let mut query = sqlx::query_scalar::<_, i64>(&sql)
            .bind(series.series_id.as_str())
            .bind(series.title.as_str())
            .bind(series.category.code())
            .bind(series.image_url.as_str());
        if let Some(poster) = &series.poster_url {
            query = query.bind(poster.as_str());
        }
        let ids = query
            .bind(series.is_new as i64)
            .bind(series.url.as_str())
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    /// Execute one statement with its bound values.
    pub async fn execute(&self, statement: &Statement) -> Result<()> {
        let mut query = sqlx::query(statement.sql);
        for arg in &statement.args {
            query = match arg {
                SqlValue::Null => query.bind(None::<String>),
                SqlValue::Integer(i) => query.bind(*i),
                SqlValue::Text(s) => query.bind(s.as_str()),
            };
        }
        query.execute(&self.pool).await?;
        Ok(())
    }

    /// Underlying pool, for direct reads in tests and collaborators.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
