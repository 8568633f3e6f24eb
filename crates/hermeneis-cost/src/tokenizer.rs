// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model-specific token counting via tiktoken-rs.

use hermeneis_core::{HermeneisError, TokenCounter, TranslationPrompt};
use tiktoken_rs::CoreBPE;
use tracing::{debug, warn};

/// Tokens added around each chat message (role and separators).
const TOKENS_PER_MESSAGE: usize = 3;

/// Tokens that prime the assistant reply.
const REPLY_PRIMING_TOKENS: usize = 3;

/// Counts tokens with the BPE encoding of a specific OpenAI model.
pub struct TiktokenCounter {
    bpe: CoreBPE,
    model: String,
}

impl TiktokenCounter {
    /// Build a counter for `model`.
    ///
    /// Models tiktoken does not recognise fall back to `cl100k_base`.
    pub fn for_model(model: &str) -> Result<Self, HermeneisError> {
        let bpe = match tiktoken_rs::get_bpe_from_model(model) {
            Ok(bpe) => {
                debug!(model, "tokenizer resolved from model name");
                bpe
            }
            Err(e) => {
                warn!(model, error = %e, "unknown model for tokenizer, using cl100k_base");
                tiktoken_rs::cl100k_base().map_err(|e| {
                    HermeneisError::Tokenizer(format!("failed to load cl100k_base: {e}"))
                })?
            }
        };
        Ok(Self {
            bpe,
            model: model.to_string(),
        })
    }

    /// Model this counter was built for.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl TokenCounter for TiktokenCounter {
    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    /// Both prompt parts plus chat framing for a two-message request.
    fn count_prompt(&self, prompt: &TranslationPrompt) -> usize {
        self.count_tokens(&prompt.system)
            + self.count_tokens(&prompt.user)
            + 2 * TOKENS_PER_MESSAGE
            + REPLY_PRIMING_TOKENS
    }
}
