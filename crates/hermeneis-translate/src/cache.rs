// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation cache keyed on (message, parameter identity).
//!
//! Staleness is modeled entirely by the identity: a configuration change
//! produces a new identity under which every message reads as untranslated.

use std::sync::Arc;

use hermeneis_core::{
    HermeneisError, MessageId, ParameterIdentityId, StorageAdapter, Translation, TranslationId,
};
use tracing::debug;

#[derive(Clone)]
pub struct TranslationCache {
    storage: Arc<dyn StorageAdapter>,
}

impl TranslationCache {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }

    /// Existence check only; the stored text is not inspected.
    pub async fn has_translation(
        &self,
        message: MessageId,
        parameters: ParameterIdentityId,
    ) -> Result<bool, HermeneisError> {
        self.storage.has_translation(message, parameters).await
    }

    /// Store `text`, replacing any earlier translation for the pair and
    /// refreshing its timestamp.
    pub async fn upsert(
        &self,
        message: MessageId,
        parameters: ParameterIdentityId,
        text: &str,
    ) -> Result<TranslationId, HermeneisError> {
        let id = self
            .storage
            .upsert_translation(message, parameters, text)
            .await?;
        debug!(%message, %parameters, translation_id = %id, "translation stored");
        Ok(id)
    }

    pub async fn get(
        &self,
        message: MessageId,
        parameters: ParameterIdentityId,
    ) -> Result<Option<Translation>, HermeneisError> {
        self.storage.get_translation(message, parameters).await
    }

    /// Number of translations stored under `parameters`.
    pub async fn count(&self, parameters: ParameterIdentityId) -> Result<u64, HermeneisError> {
        self.storage.count_translations(parameters).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hermeneis_core::NewParameterIdentity;
    use hermeneis_test_utils::TestHarness;

    async fn setup() -> (TestHarness, TranslationCache, ParameterIdentityId) {
        let harness = TestHarness::builder()
            .channel("hydra", &[(1, "Привет"), (3, "Как дела?")])
            .build()
            .await
            .unwrap();
        let identity = harness
            .storage()
            .get_or_create_parameters(&NewParameterIdentity {
                tool_name: "hermeneis".into(),
                tool_commit: None,
                model: "gpt-3.5-turbo".into(),
                config_sha256: "00".repeat(32),
                config_text: "cfg".into(),
            })
            .await
            .unwrap();
        let cache = TranslationCache::new(harness.storage());
        (harness, cache, identity.id)
    }

    #[tokio::test]
    async fn upsert_then_has_translation() {
        let (harness, cache, params) = setup().await;
        assert!(!cache.has_translation(MessageId(1), params).await.unwrap());

        cache.upsert(MessageId(1), params, "Hello").await.unwrap();

        assert!(cache.has_translation(MessageId(1), params).await.unwrap());
        assert!(!cache.has_translation(MessageId(3), params).await.unwrap());
        harness.close().await.unwrap();
    }

    #[tokio::test]
    async fn second_upsert_replaces_in_place() {
        let (harness, cache, params) = setup().await;
        let first = cache.upsert(MessageId(1), params, "Hello").await.unwrap();
        let second = cache.upsert(MessageId(1), params, "Hi").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(cache.count(params).await.unwrap(), 1);
        let stored = cache.get(MessageId(1), params).await.unwrap().unwrap();
        assert_eq!(stored.text, "Hi");
        harness.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        let (harness, cache, params) = setup().await;
        assert!(cache.get(MessageId(3), params).await.unwrap().is_none());
        harness.close().await.unwrap();
    }
}
