// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hermeneis manual` command implementation.
//!
//! A readline prompt that translates each entered line with the configured
//! personality. Nothing is cached or persisted.

use std::path::Path;

use colored::Colorize;
use hermeneis_config::HermeneisConfig;
use hermeneis_core::{HermeneisError, ProviderAdapter, ProviderRequest, TranslationPrompt};
use hermeneis_openai::OpenAiProvider;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, warn};

/// Runs the interactive translation prompt until `/quit`, Ctrl+C or Ctrl+D.
pub async fn run_shell(config: &HermeneisConfig, env_file: &Path) -> Result<(), HermeneisError> {
    let api_key = hermeneis_config::load_secret(env_file, &config.openai.api_key_var)
        .inspect_err(|_| {
            eprintln!(
                "error: OpenAI API key required. Set {} in {} or the environment.",
                config.openai.api_key_var,
                env_file.display()
            );
        })?;
    let provider = OpenAiProvider::new(&api_key, &config.openai)?;

    let mut rl = DefaultEditor::new()
        .map_err(|e| HermeneisError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "hermeneis manual".bold().green());
    println!(
        "Model {}. Type {} to exit.\n",
        config.personality.model.cyan(),
        "/quit".yellow()
    );

    let prompt = format!("{}> ", "ru".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "/quit" || trimmed == "/exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                match translate_line(&provider, config, trimmed).await {
                    Ok(Some(text)) => println!("{}> {text}\n", "en".blue()),
                    Ok(None) => {
                        println!("{}", "interrupted".yellow());
                        break;
                    }
                    Err(e) => eprintln!("{}: {e}", "error".red()),
                }
            }
            // Ctrl+C
            Err(ReadlineError::Interrupted) => break,
            // Ctrl+D
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    Ok(())
}

/// Translates one line; `None` when Ctrl+C arrives before the reply.
async fn translate_line(
    provider: &dyn ProviderAdapter,
    config: &HermeneisConfig,
    text: &str,
) -> Result<Option<String>, HermeneisError> {
    let personality = &config.personality;
    let request = build_request(config, text);
    debug!(model = %personality.model, chars = text.chars().count(), "translating line");

    tokio::select! {
        biased;
        _ = tokio::signal::ctrl_c() => {
            warn!("translation interrupted");
            Ok(None)
        }
        response = provider.complete(request) => Ok(Some(response?.text)),
    }
}

fn build_request(config: &HermeneisConfig, text: &str) -> ProviderRequest {
    let personality = &config.personality;
    ProviderRequest::from_prompt(
        &personality.model,
        TranslationPrompt::build(&personality.system, &personality.user, text),
        personality.max_tokens,
        personality.temperature,
    )
}
