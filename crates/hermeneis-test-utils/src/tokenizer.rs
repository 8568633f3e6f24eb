// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use hermeneis_core::TokenCounter;

/// Stub tokenizer: one token per Unicode scalar value.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharCounter;

impl TokenCounter for CharCounter {
    fn count_tokens(&self, text: &str) -> usize {
        text.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hermeneis_core::TranslationPrompt;

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(CharCounter.count_tokens("Привет"), 6);
        assert_eq!(CharCounter.count_tokens(""), 0);
    }

    #[test]
    fn prompt_is_sum_of_parts() {
        let prompt = TranslationPrompt::build("ab", "cd", "ef");
        assert_eq!(CharCounter.count_prompt(&prompt), 6);
    }
}
