// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{debug, warn};

use hermeneis_config::model::StorageConfig;
use hermeneis_core::types::{
    Channel, ChannelId, Message, MessageId, NewParameterIdentity, ParameterIdentity,
    ParameterIdentityId, Translation, TranslationId,
};
use hermeneis_core::{AdapterType, HealthStatus, HermeneisError, PluginAdapter, StorageAdapter};

use crate::database::{Database, BUILTIN_SCHEMA};
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is opened by
/// [`StorageAdapter::initialize`] and released by [`StorageAdapter::close`];
/// a closed adapter can be initialized again.
pub struct SqliteStorage {
    config: StorageConfig,
    db: Mutex<Option<Database>>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    ///
    /// [`initialize`]: StorageAdapter::initialize
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: Mutex::new(None),
        }
    }

    /// Returns a handle to the open Database, or an error if not initialized.
    pub fn db(&self) -> Result<Database, HermeneisError> {
        self.slot()?.clone().ok_or_else(|| HermeneisError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<Database>>, HermeneisError> {
        self.db
            .lock()
            .map_err(|_| HermeneisError::Internal("storage lock poisoned".to_string()))
    }

    /// Reads the schema file named in the config, or falls back to the built-in DDL.
    fn schema(&self) -> Result<String, HermeneisError> {
        match &self.config.schema_path {
            Some(path) => std::fs::read_to_string(path).map_err(|e| HermeneisError::Storage {
                source: format!("cannot read schema file `{path}`: {e}").into(),
            }),
            None => Ok(BUILTIN_SCHEMA.to_string()),
        }
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, HermeneisError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HermeneisError> {
        let open = self.slot()?.is_some();
        if open {
            self.close().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), HermeneisError> {
        if self.slot()?.is_some() {
            return Err(HermeneisError::Storage {
                source: "storage already initialized".into(),
            });
        }
        let schema = self.schema()?;
        let db =
            Database::open_with_schema(&self.config.database_path, &schema, self.config.wal_mode)
                .await?;

        // A concurrent initialize may have filled the slot while we were opening.
        let raced = {
            let mut slot = self.slot()?;
            if slot.is_some() {
                Some(db)
            } else {
                *slot = Some(db);
                None
            }
        };
        if let Some(db) = raced {
            if let Err(e) = db.close().await {
                warn!(error = %e, "failed to close redundant database handle");
            }
            return Err(HermeneisError::Storage {
                source: "storage already initialized".into(),
            });
        }
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), HermeneisError> {
        let db = self.slot()?.take().ok_or_else(|| HermeneisError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })?;
        db.close().await?;
        debug!("SQLite storage closed");
        Ok(())
    }

    // --- Channels and messages ---

    async fn find_channel(&self, name: &str) -> Result<Option<Channel>, HermeneisError> {
        queries::channels::find_channel_by_name(&self.db()?, name).await
    }

    async fn channel_has_messages(&self, channel: ChannelId) -> Result<bool, HermeneisError> {
        queries::channels::channel_has_messages(&self.db()?, channel).await
    }

    async fn list_messages(&self, channel: ChannelId) -> Result<Vec<Message>, HermeneisError> {
        queries::messages::get_messages_for_channel(&self.db()?, channel).await
    }

    // --- Parameter identities ---

    async fn get_or_create_parameters(
        &self,
        params: &NewParameterIdentity,
    ) -> Result<ParameterIdentity, HermeneisError> {
        queries::parameters::get_or_create(&self.db()?, params).await
    }

    // --- Translations ---

    async fn has_translation(
        &self,
        message: MessageId,
        parameters: ParameterIdentityId,
    ) -> Result<bool, HermeneisError> {
        queries::translations::has_translation(&self.db()?, message, parameters).await
    }

    async fn upsert_translation(
        &self,
        message: MessageId,
        parameters: ParameterIdentityId,
        text: &str,
    ) -> Result<TranslationId, HermeneisError> {
        queries::translations::upsert_translation(&self.db()?, message, parameters, text).await
    }

    async fn get_translation(
        &self,
        message: MessageId,
        parameters: ParameterIdentityId,
    ) -> Result<Option<Translation>, HermeneisError> {
        queries::translations::get_translation(&self.db()?, message, parameters).await
    }

    async fn count_translations(
        &self,
        parameters: ParameterIdentityId,
    ) -> Result<u64, HermeneisError> {
        queries::translations::count_for_parameters(&self.db()?, parameters).await
    }
}
