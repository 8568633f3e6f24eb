// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across adapter traits and the Hermeneis crates.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Numeric identity of a channel row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChannelId(pub i64);

/// Numeric identity of a message row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(pub i64);

/// Numeric identity of a registered translation parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParameterIdentityId(pub i64);

/// Numeric identity of a stored translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TranslationId(pub i64);

macro_rules! display_inner {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        })*
    };
}

display_inner!(ChannelId, MessageId, ParameterIdentityId, TranslationId);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
}

/// A named source of messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    pub name: String,
}

/// One unit of text belonging to a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub channel_id: ChannelId,
    /// Raw text as stored; may be empty.
    pub text: String,
}

impl Message {
    /// Messages of at most one character are never sent to the provider.
    ///
    /// Length is counted in Unicode scalar values, not bytes.
    pub fn is_translatable(&self) -> bool {
        self.text.chars().nth(1).is_some()
    }
}

/// The tuple that identifies how a translation was produced, before it has
/// been assigned a row identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewParameterIdentity {
    /// Name of the tool that produced the translation.
    pub tool_name: String,
    /// Source revision of the tool, if it could be resolved.
    pub tool_commit: Option<String>,
    /// Model identifier sent to the provider.
    pub model: String,
    /// Hex-encoded SHA-256 of the configuration file bytes.
    pub config_sha256: String,
    /// Verbatim configuration file contents.
    pub config_text: String,
}

/// A registered translation parameter set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterIdentity {
    pub id: ParameterIdentityId,
    pub tool_name: String,
    pub tool_commit: Option<String>,
    pub model: String,
    pub config_sha256: String,
    pub config_text: String,
}

/// A cached translation for one (message, parameter identity) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub id: TranslationId,
    pub message_id: MessageId,
    pub parameters_id: ParameterIdentityId,
    pub text: String,
    /// ISO 8601 UTC timestamp of the last write.
    pub timestamp: String,
}

/// The two-part prompt sent for every translation.
///
/// Batch runs, cost estimates and the interactive shell all build their
/// prompts through [`TranslationPrompt::build`] so the three paths cannot
/// drift apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationPrompt {
    /// Fixed system instruction.
    pub system: String,
    /// User prompt prefix followed by the raw message text.
    pub user: String,
}

impl TranslationPrompt {
    pub fn build(system: &str, user_prefix: &str, text: &str) -> Self {
        let mut user = String::with_capacity(user_prefix.len() + text.len());
        user.push_str(user_prefix);
        user.push_str(text);
        Self {
            system: system.to_string(),
            user,
        }
    }
}

/// Token usage reported by a provider for a single call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A completion request to an LLM provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ProviderRequest {
    /// Builds a request from a translation prompt and sampling parameters.
    pub fn from_prompt(
        model: &str,
        prompt: TranslationPrompt,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            model: model.to_string(),
            system: prompt.system,
            user: prompt.user,
            max_tokens,
            temperature,
        }
    }
}

/// A completed response from an LLM provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub id: String,
    pub text: String,
    pub model: String,
    pub stop_reason: Option<String>,
    pub usage: TokenUsage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn message(text: &str) -> Message {
        Message {
            id: MessageId(1),
            channel_id: ChannelId(1),
            text: text.to_string(),
        }
    }

    #[test]
    fn short_messages_are_not_translatable() {
        assert!(!message("").is_translatable());
        assert!(!message("x").is_translatable());
        assert!(!message("я").is_translatable());
        assert!(message("да").is_translatable());
        assert!(message("  ").is_translatable());
    }

    #[test]
    fn prompt_concatenates_prefix_and_text() {
        let prompt = TranslationPrompt::build("You translate.", "Translate: ", "Привет");
        assert_eq!(prompt.system, "You translate.");
        assert_eq!(prompt.user, "Translate: Привет");
    }

    #[test]
    fn request_from_prompt_carries_sampling_parameters() {
        let prompt = TranslationPrompt::build("sys", "usr ", "text");
        let req = ProviderRequest::from_prompt("gpt-3.5-turbo", prompt, 256, 0.2);
        assert_eq!(req.model, "gpt-3.5-turbo");
        assert_eq!(req.system, "sys");
        assert_eq!(req.user, "usr text");
        assert_eq!(req.max_tokens, 256);
        assert!((req.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn ids_display_as_plain_numbers() {
        assert_eq!(MessageId(42).to_string(), "42");
        assert_eq!(ParameterIdentityId(7).to_string(), "7");
    }

    proptest! {
        #[test]
        fn prompt_user_text_is_prefix_then_raw(prefix in ".*", text in ".*") {
            let prompt = TranslationPrompt::build("s", &prefix, &text);
            prop_assert!(prompt.user.starts_with(&prefix));
            prop_assert!(prompt.user.ends_with(&text));
            prop_assert_eq!(prompt.user.len(), prefix.len() + text.len());
        }
    }
}
