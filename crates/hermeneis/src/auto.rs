// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hermeneis auto` command implementation.

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use hermeneis_config::HermeneisConfig;
use hermeneis_openai::OpenAiProvider;
use hermeneis_storage::SqliteStorage;
use hermeneis_translate::{
    install_signal_handler, ConfigSnapshot, GitRevision, RunOutcome, RunReport, TranslationDriver,
};
use tracing::info;

/// Runs a batch translation over `channel` and returns the exit status.
pub async fn run_auto(
    config: HermeneisConfig,
    snapshot: ConfigSnapshot,
    channel: &str,
    limit: usize,
    env_file: &Path,
) -> u8 {
    let api_key = match hermeneis_config::load_secret(env_file, &config.openai.api_key_var) {
        Ok(key) => key,
        Err(e) => {
            hermeneis_config::render_errors(&[e]);
            return 1;
        }
    };
    let provider = match OpenAiProvider::new(&api_key, &config.openai) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            eprintln!("{}: {e}", "error".red());
            return 1;
        }
    };

    info!(
        channel,
        limit,
        store = %config.storage.database_path,
        "starting batch translation"
    );
    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    let mut driver = TranslationDriver::new(
        storage,
        provider,
        Arc::new(GitRevision::new()),
        config.personality,
        snapshot,
        install_signal_handler(),
    );

    let report = driver.run(channel, limit).await;
    print_report(channel, &report);
    report.exit_code().clamp(0, 255) as u8
}

fn print_report(channel: &str, report: &RunReport) {
    let c = &report.counters;
    let headline = match &report.outcome {
        RunOutcome::Completed => "completed".green().bold(),
        RunOutcome::Interrupted => "interrupted".yellow().bold(),
        RunOutcome::Aborted(_) => "aborted".red().bold(),
    };
    println!("{headline} {}", format!("channel `{channel}`").dimmed());
    if let Some(identity) = &report.identity {
        println!(
            "  parameters  #{} ({}, {})",
            identity.id,
            identity.model,
            &identity.config_sha256[..identity.config_sha256.len().min(12)]
        );
    }
    println!("  scanned     {}", c.scanned);
    println!("  translated  {} of {} attempted", c.translated, c.attempted);
    if c.failed > 0 {
        println!("  failed      {}", c.failed.to_string().red());
    }
    println!(
        "  skipped     {} short, {} already translated",
        c.skipped_short, c.skipped_cached
    );
    if let RunOutcome::Aborted(e) = &report.outcome {
        eprintln!("{}: {e}", "error".red());
    }
}
