// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI Chat Completions provider adapter for Hermeneis.
//!
//! This crate implements [`ProviderAdapter`] for the OpenAI Chat Completions
//! API. Each request carries exactly two messages: the fixed system
//! instruction and the user prompt.

pub mod client;
pub mod types;

use async_trait::async_trait;
use hermeneis_config::model::OpenAiConfig;
use hermeneis_core::error::HermeneisError;
use hermeneis_core::traits::{PluginAdapter, ProviderAdapter};
use hermeneis_core::types::{
    AdapterType, HealthStatus, ProviderRequest, ProviderResponse, TokenUsage,
};
use secrecy::SecretString;
use tracing::{debug, info};

use crate::client::OpenAiClient;
use crate::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

/// OpenAI provider implementing [`ProviderAdapter`].
pub struct OpenAiProvider {
    client: OpenAiClient,
}

impl OpenAiProvider {
    /// Creates a provider from the `openai` settings section and an API key.
    ///
    /// The key is loaded by the caller (env file, then process environment).
    pub fn new(api_key: &SecretString, config: &OpenAiConfig) -> Result<Self, HermeneisError> {
        let client = OpenAiClient::new(api_key, config)?;
        info!(endpoint = client.endpoint(), "OpenAI provider initialized");
        Ok(Self { client })
    }

    fn to_chat_request(request: &ProviderRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: request.model.clone(),
            messages: vec![
                ChatMessage::system(request.system.clone()),
                ChatMessage::user(request.user.clone()),
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

/// Extracts the first choice's text. A response without text is a failure.
fn to_provider_response(response: ChatCompletionResponse) -> Result<ProviderResponse, HermeneisError> {
    let usage = response
        .usage
        .map(|u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        })
        .unwrap_or_default();

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| HermeneisError::Provider {
            message: "response contained no choices".into(),
            source: None,
        })?;

    let text = match choice.message.content {
        Some(text) if !text.is_empty() => text,
        _ => {
            return Err(HermeneisError::Provider {
                message: format!(
                    "response contained no text (finish_reason: {})",
                    choice.finish_reason.as_deref().unwrap_or("none")
                ),
                source: None,
            });
        }
    };

    Ok(ProviderResponse {
        id: response.id,
        text,
        model: response.model,
        stop_reason: choice.finish_reason,
        usage,
    })
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, HermeneisError> {
        // No API call here: a health check should not spend tokens.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), HermeneisError> {
        debug!("OpenAI provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, HermeneisError> {
        let chat_request = Self::to_chat_request(&request);
        let response = self.client.complete(&chat_request).await?;
        let response = to_provider_response(response)?;
        debug!(
            id = %response.id,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "completion received"
        );
        Ok(response)
    }
}
