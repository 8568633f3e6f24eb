// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token counting used for dry-run cost estimates.

use crate::types::TranslationPrompt;

/// Counts tokens the way a specific model's tokenizer would.
pub trait TokenCounter: Send + Sync {
    /// Number of tokens in a single piece of text.
    fn count_tokens(&self, text: &str) -> usize;

    /// Number of tokens for a full two-part prompt.
    ///
    /// The default sums both parts. Chat tokenizers override this to add
    /// per-message framing overhead.
    fn count_prompt(&self, prompt: &TranslationPrompt) -> usize {
        self.count_tokens(&prompt.system) + self.count_tokens(&prompt.user)
    }
}
