// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Batch translation driver.
//!
//! A [`TranslationDriver`] walks one channel's messages in retrieval order,
//! skips short and already-translated messages, asks the provider for the
//! rest, and stores each translation as soon as it arrives.
//!
//! A run moves through `Idle -> Preparing -> Iterating` and ends in exactly
//! one of `Completed`, `Interrupted` or `Aborted`. The store is opened while
//! preparing and closed at every terminal state.

use std::fmt;
use std::sync::Arc;

use hermeneis_config::PersonalityConfig;
use hermeneis_core::{
    BuildIdentity, HermeneisError, Message, ParameterIdentity, ProviderAdapter, ProviderRequest,
    StorageAdapter, TranslationPrompt,
};
use serde::Serialize;
use strum::Display;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::cache::TranslationCache;
use crate::fingerprint::ConfigSnapshot;
use crate::identity::ParameterRegistry;

/// Lifecycle state of a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum RunState {
    Idle,
    Preparing,
    Iterating,
    Completed,
    Interrupted,
    Aborted,
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// Messages exhausted or the limit reached.
    Completed,
    /// Cancellation observed; committed translations are kept.
    Interrupted,
    /// Preparation or the store failed.
    Aborted(HermeneisError),
}

impl RunOutcome {
    pub fn state(&self) -> RunState {
        match self {
            RunOutcome::Completed => RunState::Completed,
            RunOutcome::Interrupted => RunState::Interrupted,
            RunOutcome::Aborted(_) => RunState::Aborted,
        }
    }
}

/// Per-run message counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunCounters {
    /// Messages examined, skips included.
    pub scanned: u64,
    /// Messages that triggered a provider call.
    pub attempted: u64,
    pub translated: u64,
    pub failed: u64,
    pub skipped_short: u64,
    pub skipped_cached: u64,
}

/// Result of one driver run.
#[derive(Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Identity the run translated under, once registered.
    pub identity: Option<ParameterIdentity>,
    pub counters: RunCounters,
}

impl RunReport {
    /// Process exit code for this outcome: 0, 130 on interrupt, 1 on abort.
    pub fn exit_code(&self) -> i32 {
        match self.outcome {
            RunOutcome::Completed => 0,
            RunOutcome::Interrupted => 130,
            RunOutcome::Aborted(_) => 1,
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.counters;
        write!(
            f,
            "{}: scanned {}, attempted {}, translated {}, failed {}, skipped {} short and {} cached",
            self.outcome.state(),
            c.scanned,
            c.attempted,
            c.translated,
            c.failed,
            c.skipped_short,
            c.skipped_cached
        )?;
        if let RunOutcome::Aborted(e) = &self.outcome {
            write!(f, " ({e})")?;
        }
        Ok(())
    }
}

/// Drives one batch translation run over a channel.
pub struct TranslationDriver {
    storage: Arc<dyn StorageAdapter>,
    provider: Arc<dyn ProviderAdapter>,
    registry: ParameterRegistry,
    cache: TranslationCache,
    personality: PersonalityConfig,
    snapshot: ConfigSnapshot,
    cancel: CancellationToken,
    state: RunState,
}

impl TranslationDriver {
    /// Creates an idle driver.
    ///
    /// `snapshot` must hold the bytes `personality` was parsed from. The
    /// storage adapter is expected closed; the driver opens it.
    pub fn new(
        storage: Arc<dyn StorageAdapter>,
        provider: Arc<dyn ProviderAdapter>,
        build: Arc<dyn BuildIdentity>,
        personality: PersonalityConfig,
        snapshot: ConfigSnapshot,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            registry: ParameterRegistry::new(storage.clone(), build),
            cache: TranslationCache::new(storage.clone()),
            storage,
            provider,
            personality,
            snapshot,
            cancel,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Translate up to `limit` messages of `channel`.
    ///
    /// `limit` counts provider calls, not skipped messages. A driver runs
    /// once; later calls abort without touching the store.
    #[instrument(skip(self), fields(model = %self.personality.model))]
    pub async fn run(&mut self, channel: &str, limit: usize) -> RunReport {
        let mut counters = RunCounters::default();
        if self.state != RunState::Idle {
            return RunReport {
                outcome: RunOutcome::Aborted(HermeneisError::Internal(format!(
                    "driver already {}",
                    self.state
                ))),
                identity: None,
                counters,
            };
        }

        self.transition(RunState::Preparing);
        if let Err(e) = self.storage.initialize().await {
            error!(error = %e, "cannot open message store");
            self.transition(RunState::Aborted);
            return RunReport {
                outcome: RunOutcome::Aborted(e),
                identity: None,
                counters,
            };
        }

        let (outcome, identity) = match self.prepare(channel).await {
            Ok((identity, messages)) => {
                self.transition(RunState::Iterating);
                let outcome = self
                    .iterate(&identity, &messages, limit, &mut counters)
                    .await;
                (outcome, Some(identity))
            }
            Err(e) => {
                error!(error = %e, "run preparation failed");
                (RunOutcome::Aborted(e), None)
            }
        };

        self.transition(outcome.state());
        if let Err(e) = self.storage.close().await {
            error!(error = %e, "failed to close message store");
        }

        info!(
            channel,
            scanned = counters.scanned,
            attempted = counters.attempted,
            translated = counters.translated,
            failed = counters.failed,
            skipped_short = counters.skipped_short,
            skipped_cached = counters.skipped_cached,
            "run finished: {}",
            outcome.state()
        );

        RunReport {
            outcome,
            identity,
            counters,
        }
    }

    async fn prepare(
        &self,
        channel: &str,
    ) -> Result<(ParameterIdentity, Vec<Message>), HermeneisError> {
        let identity = self
            .registry
            .get_or_create(&self.personality.model, &self.snapshot)
            .await?;

        let found = self
            .storage
            .find_channel(channel)
            .await?
            .ok_or_else(|| HermeneisError::ChannelNotFound(channel.to_string()))?;

        if !self.storage.channel_has_messages(found.id).await? {
            info!(channel, "channel has no messages");
            return Ok((identity, Vec::new()));
        }

        let messages = self.storage.list_messages(found.id).await?;
        debug!(channel, count = messages.len(), "messages fetched");
        Ok((identity, messages))
    }

    async fn iterate(
        &self,
        identity: &ParameterIdentity,
        messages: &[Message],
        limit: usize,
        counters: &mut RunCounters,
    ) -> RunOutcome {
        for message in messages {
            if counters.attempted >= limit as u64 {
                info!(limit, "processing limit reached");
                break;
            }
            if self.cancel.is_cancelled() {
                return RunOutcome::Interrupted;
            }
            counters.scanned += 1;

            if !message.is_translatable() {
                debug!(message_id = %message.id, "skipping short message");
                counters.skipped_short += 1;
                continue;
            }

            match self.cache.has_translation(message.id, identity.id).await {
                Ok(true) => {
                    debug!(message_id = %message.id, "already translated");
                    counters.skipped_cached += 1;
                    continue;
                }
                Ok(false) => {}
                Err(e) => return RunOutcome::Aborted(e),
            }

            counters.attempted += 1;
            let prompt = TranslationPrompt::build(
                &self.personality.system,
                &self.personality.user,
                &message.text,
            );
            let request = ProviderRequest::from_prompt(
                &self.personality.model,
                prompt,
                self.personality.max_tokens,
                self.personality.temperature,
            );

            let result = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    info!(message_id = %message.id, "interrupted during provider call, result discarded");
                    return RunOutcome::Interrupted;
                }
                result = self.provider.complete(request) => result,
            };

            match result {
                Ok(response) => {
                    if let Err(e) = self
                        .cache
                        .upsert(message.id, identity.id, &response.text)
                        .await
                    {
                        return RunOutcome::Aborted(e);
                    }
                    counters.translated += 1;
                    info!(
                        message_id = %message.id,
                        input_tokens = response.usage.input_tokens,
                        output_tokens = response.usage.output_tokens,
                        "message translated"
                    );
                }
                Err(e) if e.is_provider_failure() => {
                    counters.failed += 1;
                    warn!(message_id = %message.id, error = %e, "translation failed, continuing");
                }
                Err(e) => {
                    counters.failed += 1;
                    error!(message_id = %message.id, error = %e, "translation failed, continuing");
                }
            }
        }
        RunOutcome::Completed
    }

    fn transition(&mut self, next: RunState) {
        debug!(from = %self.state, to = %next, "driver state");
        self.state = next;
    }
}
