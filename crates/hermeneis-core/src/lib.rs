// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Hermeneis.
//!
//! This crate provides the foundational trait definitions, error types, and
//! domain types used throughout the workspace. Storage and provider
//! adapters implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

pub use error::HermeneisError;
pub use types::{
    AdapterType, Channel, ChannelId, HealthStatus, Message, MessageId, NewParameterIdentity,
    ParameterIdentity, ParameterIdentityId, ProviderRequest, ProviderResponse, TokenUsage,
    Translation, TranslationId, TranslationPrompt,
};

pub use traits::{
    BuildIdentity, FixedBuildIdentity, PluginAdapter, ProviderAdapter, StorageAdapter,
    TokenCounter,
};
