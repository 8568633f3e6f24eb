// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock LLM provider adapter for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with scripted replies,
//! enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use hermeneis_core::traits::adapter::PluginAdapter;
use hermeneis_core::traits::provider::ProviderAdapter;
use hermeneis_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage,
};
use hermeneis_core::HermeneisError;

/// One scripted reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Return this text.
    Text(String),
    /// Fail the call with a provider error carrying this message.
    Fail(String),
}

impl MockReply {
    pub fn text(s: impl Into<String>) -> Self {
        MockReply::Text(s.into())
    }

    pub fn fail(s: impl Into<String>) -> Self {
        MockReply::Fail(s.into())
    }
}

/// When, relative to which call, the mock cancels a token.
#[derive(Debug, Clone)]
enum CancelTrigger {
    /// Cancel after call `n` (1-based) has produced its reply.
    AfterCall(usize, CancellationToken),
    /// Cancel while call `n` is in flight; that call never completes.
    DuringCall(usize, CancellationToken),
}

/// A mock LLM provider that returns scripted replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty, the reply
/// is `"EN: "` followed by the request's user text.
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    calls: Arc<Mutex<Vec<ProviderRequest>>>,
    trigger: Option<CancelTrigger>,
}

impl MockProvider {
    /// Create a new mock provider with an empty reply queue.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            trigger: None,
        }
    }

    /// Create a mock provider pre-loaded with successful responses.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self::with_replies(responses.into_iter().map(MockReply::Text).collect())
    }

    /// Create a mock provider pre-loaded with scripted replies.
    pub fn with_replies(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            ..Self::new()
        }
    }

    /// Cancel `token` right after call `n` (1-based) returns its reply.
    pub fn cancel_after_call(mut self, n: usize, token: CancellationToken) -> Self {
        self.trigger = Some(CancelTrigger::AfterCall(n, token));
        self
    }

    /// Cancel `token` while call `n` (1-based) is in flight and never answer it.
    pub fn cancel_during_call(mut self, n: usize, token: CancellationToken) -> Self {
        self.trigger = Some(CancelTrigger::DuringCall(n, token));
        self
    }

    /// Add a reply to the end of the queue.
    pub async fn add_reply(&self, reply: MockReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// Every request received so far, in call order.
    pub async fn calls(&self) -> Vec<ProviderRequest> {
        self.calls.lock().await.clone()
    }

    /// Number of calls received so far.
    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, HermeneisError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HermeneisError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, HermeneisError> {
        let call_number = {
            let mut calls = self.calls.lock().await;
            calls.push(request.clone());
            calls.len()
        };

        if let Some(CancelTrigger::DuringCall(n, token)) = &self.trigger
            && *n == call_number
        {
            token.cancel();
            std::future::pending::<()>().await;
        }

        let reply = self
            .replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| MockReply::Text(format!("EN: {}", request.user)));

        if let Some(CancelTrigger::AfterCall(n, token)) = &self.trigger
            && *n == call_number
        {
            token.cancel();
        }

        match reply {
            MockReply::Text(text) => Ok(ProviderResponse {
                id: format!("mock-resp-{call_number}"),
                text,
                model: request.model,
                stop_reason: Some("stop".to_string()),
                usage: TokenUsage {
                    input_tokens: 10,
                    output_tokens: 20,
                },
            }),
            MockReply::Fail(message) => Err(HermeneisError::Provider {
                message,
                source: None,
            }),
        }
    }
}
