// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dry-run cost projection over a channel's messages.
//!
//! Walks messages exactly like a batch run would (same retrieval order, same
//! short-message rule, same limit semantics, same prompt), but counts tokens
//! instead of calling the provider. Nothing is written to the store and the
//! translation cache is not consulted: the projection is the cost of
//! translating the channel from scratch.

use std::sync::Arc;

use hermeneis_config::PersonalityConfig;
use hermeneis_core::{HermeneisError, StorageAdapter, TokenCounter, TranslationPrompt};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::pricing::{calculate_cost, ModelPricing};

/// Result of a dry-run estimate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEstimate {
    /// Messages examined, including skipped short ones.
    pub messages_scanned: u64,
    /// Messages whose prompts were counted.
    pub messages_counted: u64,
    /// Sum of prompt tokens over counted messages.
    pub total_tokens: u64,
    /// Projected cost in USD.
    pub estimated_cost: f64,
    /// Rates the cost was computed with.
    pub pricing: ModelPricing,
}

/// Projects token usage and cost for a channel without calling the provider.
///
/// The storage adapter must already be initialized; the estimator neither
/// opens nor closes it.
pub struct CostEstimator {
    storage: Arc<dyn StorageAdapter>,
    counter: Arc<dyn TokenCounter>,
    personality: PersonalityConfig,
    pricing: ModelPricing,
}

impl CostEstimator {
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        counter: Arc<dyn TokenCounter>,
        personality: PersonalityConfig,
        pricing: ModelPricing,
    ) -> Self {
        Self {
            storage,
            counter,
            personality,
            pricing,
        }
    }

    /// Estimate tokens and cost for up to `limit` translatable messages of `channel`.
    ///
    /// Messages of at most one character are scanned but neither counted nor
    /// charged against the limit. An unknown channel is an error.
    #[instrument(skip(self), fields(model = %self.personality.model))]
    pub async fn estimate(&self, channel: &str, limit: usize) -> Result<CostEstimate, HermeneisError> {
        let found = self
            .storage
            .find_channel(channel)
            .await?
            .ok_or_else(|| HermeneisError::ChannelNotFound(channel.to_string()))?;
        let messages = self.storage.list_messages(found.id).await?;

        let mut scanned = 0u64;
        let mut counted = 0usize;
        let mut total_tokens = 0u64;

        for message in &messages {
            if counted >= limit {
                break;
            }
            scanned += 1;
            if !message.is_translatable() {
                debug!(message_id = %message.id, "skipping short message");
                continue;
            }
            let prompt = TranslationPrompt::build(
                &self.personality.system,
                &self.personality.user,
                &message.text,
            );
            let tokens = self.counter.count_prompt(&prompt) as u64;
            debug!(message_id = %message.id, tokens, "counted prompt");
            total_tokens += tokens;
            counted += 1;
        }

        let estimated_cost = calculate_cost(total_tokens, &self.pricing);
        info!(
            channel,
            scanned,
            counted,
            total_tokens,
            estimated_cost,
            "cost estimate complete"
        );

        Ok(CostEstimate {
            messages_scanned: scanned,
            messages_counted: counted as u64,
            total_tokens,
            estimated_cost,
            pricing: self.pricing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::get_pricing;
    use hermeneis_test_utils::{CharCounter, TestHarness};

    fn personality() -> PersonalityConfig {
        PersonalityConfig {
            system: "sys".to_string(),
            user: "Translate: ".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.5,
            max_tokens: 100,
            log: "hermeneis.log".to_string(),
        }
    }

    async fn hydra() -> TestHarness {
        TestHarness::builder()
            .channel("hydra", &[(1, "Привет"), (2, "x"), (3, "Как дела?")])
            .build()
            .await
            .unwrap()
    }

    fn estimator(harness: &TestHarness) -> CostEstimator {
        CostEstimator::new(
            harness.storage(),
            Arc::new(CharCounter),
            personality(),
            get_pricing("gpt-3.5-turbo"),
        )
    }

    fn prompt_chars(text: &str) -> u64 {
        ("sys".chars().count() + "Translate: ".chars().count() + text.chars().count()) as u64
    }

    #[tokio::test]
    async fn hydra_estimate_counts_only_translatable_messages() {
        let harness = hydra().await;
        let estimate = estimator(&harness).estimate("hydra", 10).await.unwrap();

        let tokens = prompt_chars("Привет") + prompt_chars("Как дела?");
        assert_eq!(estimate.messages_scanned, 3);
        assert_eq!(estimate.messages_counted, 2);
        assert_eq!(estimate.total_tokens, tokens);

        let expected = (tokens as f64 * 0.0005 + tokens as f64 * 0.0015) / 1000.0;
        assert!(
            (estimate.estimated_cost - expected).abs() < 1e-12,
            "expected {expected}, got {}",
            estimate.estimated_cost
        );
        harness.close().await.unwrap();
    }

    #[tokio::test]
    async fn limit_counts_priced_messages_not_skips() {
        let harness = hydra().await;
        let estimate = estimator(&harness).estimate("hydra", 1).await.unwrap();

        assert_eq!(estimate.messages_counted, 1);
        assert_eq!(estimate.messages_scanned, 1);
        assert_eq!(estimate.total_tokens, prompt_chars("Привет"));
        harness.close().await.unwrap();
    }

    #[tokio::test]
    async fn zero_limit_scans_nothing() {
        let harness = hydra().await;
        let estimate = estimator(&harness).estimate("hydra", 0).await.unwrap();
        assert_eq!(estimate.messages_scanned, 0);
        assert_eq!(estimate.total_tokens, 0);
        assert_eq!(estimate.estimated_cost, 0.0);
        harness.close().await.unwrap();
    }

    #[tokio::test]
    async fn unknown_channel_is_an_error() {
        let harness = hydra().await;
        let err = estimator(&harness).estimate("medusa", 10).await.unwrap_err();
        assert!(matches!(err, HermeneisError::ChannelNotFound(ref name) if name == "medusa"));
        harness.close().await.unwrap();
    }

    #[tokio::test]
    async fn estimate_does_not_write_translations() {
        let harness = hydra().await;
        estimator(&harness).estimate("hydra", 10).await.unwrap();
        assert_eq!(harness.translation_row_count().await, 0);
        harness.close().await.unwrap();
    }
}
