// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All statements run on tokio-rusqlite's single background thread; clones of
//! a [`Database`] share it. A translation upsert is one statement, so two
//! writers racing on the same (message, identity) pair end last-writer-wins.

use hermeneis_core::HermeneisError;
use tracing::debug;

/// Schema DDL compiled into the binary. Applied when no schema file is given.
pub const BUILTIN_SCHEMA: &str = include_str!("../schema/hermeneis.sql");

/// Convert a tokio-rusqlite error into HermeneisError::Storage.
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> HermeneisError {
    HermeneisError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the message store.
///
/// Cloning is cheap; clones share the same background connection thread.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open the database at `path` in WAL mode with the built-in schema.
    pub async fn open(path: &str) -> Result<Self, HermeneisError> {
        Self::open_with_schema(path, BUILTIN_SCHEMA, true).await
    }

    /// Open the database at `path`, apply connection PRAGMAs, then `schema`.
    ///
    /// `schema` must be idempotent DDL; it runs on every open.
    pub async fn open_with_schema(
        path: &str,
        schema: &str,
        wal_mode: bool,
    ) -> Result<Self, HermeneisError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| HermeneisError::Storage {
                source: Box::new(e),
            })?;

        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            if wal_mode {
                // journal_mode returns a row, so it cannot go through execute_batch.
                let _mode: String =
                    conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
            }
            conn.execute_batch(
                "PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;
                 PRAGMA synchronous = NORMAL;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        let db = Self { conn };
        db.apply_schema(schema).await?;
        debug!(path, wal_mode, "database opened");
        Ok(db)
    }

    /// Run a batch of idempotent DDL against the open connection.
    pub async fn apply_schema(&self, schema: &str) -> Result<(), HermeneisError> {
        let schema = schema.to_string();
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch(&schema)?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    /// The underlying async connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the connection.
    pub async fn close(self) -> Result<(), HermeneisError> {
        self.checkpoint().await?;
        self.conn
            .close()
            .await
            .map_err(|e| HermeneisError::Storage {
                source: Box::new(e),
            })?;
        debug!("database closed");
        Ok(())
    }

    /// Flush the WAL into the main database file.
    pub async fn checkpoint(&self) -> Result<(), HermeneisError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}
