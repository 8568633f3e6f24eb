// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for integration testing against a real SQLite store.
//!
//! `TestHarness` creates a temporary directory holding a seeded message
//! store and any files a test needs (settings, schema), and exposes a
//! `SqliteStorage` pointed at it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use hermeneis_config::model::StorageConfig;
use hermeneis_core::types::{ChannelId, Message, MessageId};
use hermeneis_core::{HermeneisError, PluginAdapter, StorageAdapter};
use hermeneis_storage::queries::{channels, messages};
use hermeneis_storage::{Database, SqliteStorage};

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    channels: Vec<(String, Vec<(i64, String)>)>,
    initialize: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            channels: Vec::new(),
            initialize: true,
        }
    }

    /// Seed a channel with `(message_id, text)` pairs.
    pub fn channel(mut self, name: &str, messages: &[(i64, &str)]) -> Self {
        self.channels.push((
            name.to_string(),
            messages
                .iter()
                .map(|(id, text)| (*id, text.to_string()))
                .collect(),
        ));
        self
    }

    /// Leave the storage adapter closed after seeding.
    ///
    /// Use this when the code under test owns the storage lifecycle.
    pub fn uninitialized(mut self) -> Self {
        self.initialize = false;
        self
    }

    /// Build the harness: create the store, seed it, and optionally open it.
    pub async fn build(self) -> Result<TestHarness, HermeneisError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| HermeneisError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");
        let db_path_str = db_path.to_string_lossy().to_string();

        let db = Database::open(&db_path_str).await?;
        let mut channel_ids = Vec::new();
        for (name, seeded) in &self.channels {
            let channel_id = channels::insert_channel(&db, name).await?;
            for (id, text) in seeded {
                messages::insert_message(
                    &db,
                    &Message {
                        id: MessageId(*id),
                        channel_id,
                        text: text.clone(),
                    },
                )
                .await?;
            }
            channel_ids.push((name.clone(), channel_id));
        }
        db.close().await?;

        let storage_config = StorageConfig {
            database_path: db_path_str,
            schema_path: None,
            wal_mode: true,
        };
        let storage = Arc::new(SqliteStorage::new(storage_config.clone()));
        if self.initialize {
            storage.initialize().await?;
        }

        tracing::debug!(path = %db_path.display(), channels = channel_ids.len(), "test harness ready");

        Ok(TestHarness {
            temp_dir,
            storage_config,
            storage,
            channel_ids,
        })
    }
}

/// A temporary, seeded message store.
pub struct TestHarness {
    temp_dir: tempfile::TempDir,
    storage_config: StorageConfig,
    storage: Arc<SqliteStorage>,
    channel_ids: Vec<(String, ChannelId)>,
}

impl TestHarness {
    /// Start building a new test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// The storage adapter as the trait object production code receives.
    pub fn storage(&self) -> Arc<dyn StorageAdapter> {
        self.storage.clone()
    }

    /// The concrete SQLite adapter.
    pub fn sqlite(&self) -> Arc<SqliteStorage> {
        self.storage.clone()
    }

    /// Storage settings pointing at the harness database.
    pub fn storage_config(&self) -> StorageConfig {
        self.storage_config.clone()
    }

    /// Path of the temporary directory.
    pub fn dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Id assigned to a seeded channel.
    pub fn channel_id(&self, name: &str) -> Option<ChannelId> {
        self.channel_ids
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| *id)
    }

    /// Write `content` to `name` inside the temp directory and return its path.
    pub fn write_file(&self, name: &str, content: &str) -> Result<PathBuf, HermeneisError> {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, content).map_err(|e| HermeneisError::Internal(e.to_string()))?;
        Ok(path)
    }

    /// Total rows in `message_translation`, read through a separate connection.
    pub async fn translation_row_count(&self) -> i64 {
        self.count("SELECT COUNT(*) FROM message_translation").await
    }

    /// Total rows in `translation_parameters`, read through a separate connection.
    pub async fn parameter_row_count(&self) -> i64 {
        self.count("SELECT COUNT(*) FROM translation_parameters").await
    }

    /// Runs a single-value COUNT query; any failure reads as -1.
    async fn count(&self, sql: &'static str) -> i64 {
        let Ok(db) =
            Database::open_with_schema(&self.storage_config.database_path, "", false).await
        else {
            return -1;
        };
        db.connection()
            .call(move |conn| -> Result<i64, rusqlite::Error> {
                conn.query_row(sql, [], |row| row.get(0))
            })
            .await
            .unwrap_or(-1)
    }

    /// Close the storage adapter if it is open.
    pub async fn close(&self) -> Result<(), HermeneisError> {
        self.storage.shutdown().await
    }
}
