// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Hermeneis translation framework.

use thiserror::Error;

/// The primary error type used across all Hermeneis adapter traits and core operations.
#[derive(Debug, Error)]
pub enum HermeneisError {
    /// Configuration errors (unreadable settings file, invalid values, missing secrets).
    #[error("configuration error: {0}")]
    Config(String),

    /// The store rejected the registration of a translation parameter identity
    /// for a reason other than the uniqueness constraint.
    #[error("failed to persist translation parameters: {source}")]
    ConfigurationPersistence {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Storage backend errors (connection, schema, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// LLM provider errors (API failure, rejected request, malformed response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The requested channel does not exist in the store.
    #[error("channel not found: {0}")]
    ChannelNotFound(String),

    /// Tokenizer could not be constructed for the configured model.
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HermeneisError {
    /// Wraps any error as a storage failure.
    pub fn storage<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        HermeneisError::Storage {
            source: Box::new(source),
        }
    }

    /// Returns true for errors that only affect a single provider call.
    ///
    /// The batch driver swallows these at the message level.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            HermeneisError::Provider { .. } | HermeneisError::Timeout { .. }
        )
    }
}
