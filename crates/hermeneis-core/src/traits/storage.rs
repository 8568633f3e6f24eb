// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for persistence backends (SQLite, etc.).

use async_trait::async_trait;

use crate::error::HermeneisError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    Channel, ChannelId, Message, MessageId, NewParameterIdentity, ParameterIdentity,
    ParameterIdentityId, Translation, TranslationId,
};

/// Adapter for the message store.
///
/// The storage adapter exclusively owns persistence of channels, messages,
/// parameter identities and translations. Everything else reaches those rows
/// through this trait.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Opens the backend and ensures the schema exists.
    async fn initialize(&self) -> Result<(), HermeneisError>;

    /// Flushes pending writes and releases the connection.
    async fn close(&self) -> Result<(), HermeneisError>;

    // --- Channels and messages (read-only) ---

    /// Looks up a channel by its unique name.
    async fn find_channel(&self, name: &str) -> Result<Option<Channel>, HermeneisError>;

    /// Returns true if the channel has at least one message.
    async fn channel_has_messages(&self, channel: ChannelId) -> Result<bool, HermeneisError>;

    /// Returns every message of a channel in stable retrieval order.
    async fn list_messages(&self, channel: ChannelId) -> Result<Vec<Message>, HermeneisError>;

    // --- Parameter identities ---

    /// Returns the identity for the exact tuple, creating it on first sight.
    async fn get_or_create_parameters(
        &self,
        params: &NewParameterIdentity,
    ) -> Result<ParameterIdentity, HermeneisError>;

    // --- Translations ---

    /// Existence check for a (message, identity) pair.
    async fn has_translation(
        &self,
        message: MessageId,
        parameters: ParameterIdentityId,
    ) -> Result<bool, HermeneisError>;

    /// Inserts or replaces in place the translation for a (message, identity) pair.
    async fn upsert_translation(
        &self,
        message: MessageId,
        parameters: ParameterIdentityId,
        text: &str,
    ) -> Result<TranslationId, HermeneisError>;

    /// Fetches the translation for a (message, identity) pair.
    async fn get_translation(
        &self,
        message: MessageId,
        parameters: ParameterIdentityId,
    ) -> Result<Option<Translation>, HermeneisError>;

    /// Number of translations stored under one identity.
    async fn count_translations(
        &self,
        parameters: ParameterIdentityId,
    ) -> Result<u64, HermeneisError>;
}
