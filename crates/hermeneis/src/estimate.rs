// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hermeneis estimate` command implementation.
//!
//! Opens the store, projects the cost of translating a channel from scratch
//! and closes the store again. No API key is needed.

use std::sync::Arc;

use colored::Colorize;
use hermeneis_config::HermeneisConfig;
use hermeneis_core::{HermeneisError, StorageAdapter};
use hermeneis_cost::{resolve_pricing, CostEstimate, CostEstimator, TiktokenCounter};
use hermeneis_storage::SqliteStorage;
use tracing::error;

/// Runs a dry-run estimate over `channel` and returns the exit status.
pub async fn run_estimate(config: &HermeneisConfig, channel: &str, limit: usize) -> u8 {
    match estimate(config, channel, limit).await {
        Ok(estimate) => {
            print_estimate(channel, &config.personality.model, &estimate);
            0
        }
        Err(e) => {
            eprintln!("{}: {e}", "error".red());
            1
        }
    }
}

async fn estimate(
    config: &HermeneisConfig,
    channel: &str,
    limit: usize,
) -> Result<CostEstimate, HermeneisError> {
    let model = &config.personality.model;
    let counter = Arc::new(TiktokenCounter::for_model(model)?);
    let pricing = resolve_pricing(model, &config.pricing);

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;

    let estimator = CostEstimator::new(
        storage.clone(),
        counter,
        config.personality.clone(),
        pricing,
    );
    let result = estimator.estimate(channel, limit).await;

    if let Err(e) = storage.close().await {
        error!(error = %e, "failed to close message store");
    }
    result
}

fn print_estimate(channel: &str, model: &str, estimate: &CostEstimate) {
    println!(
        "{} {}",
        "estimate".cyan().bold(),
        format!("channel `{channel}`, model {model}").dimmed()
    );
    println!("  scanned     {}", estimate.messages_scanned);
    println!("  priced      {}", estimate.messages_counted);
    println!("  tokens      {}", estimate.total_tokens);
    println!(
        "  cost        {}",
        format!("${:.6}", estimate.estimated_cost).bold()
    );
    println!(
        "  {}",
        format!(
            "at ${}/1K input, ${}/1K output",
            estimate.pricing.input_per_thousand, estimate.pricing.output_per_thousand
        )
        .dimmed()
    );
}
