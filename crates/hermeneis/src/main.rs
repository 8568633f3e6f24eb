// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hermeneis - Russian to English message translation with an LLM.
//!
//! This is the binary entry point. `manual` translates lines typed at a
//! prompt, `auto` translates a stored channel in batch, and `estimate`
//! projects what `auto` would cost.

mod auto;
mod estimate;
mod logging;
mod shell;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use hermeneis_config::HermeneisConfig;
use hermeneis_translate::ConfigSnapshot;

/// Exit status for startup failures and aborted runs.
const EXIT_FAILURE: u8 = 1;

/// Hermeneis - Russian to English message translation with an LLM.
#[derive(Parser, Debug)]
#[command(name = "hermeneis", version, about, long_about = None)]
struct Cli {
    /// Settings file.
    #[arg(long, global = true, default_value = "config.yml")]
    config: PathBuf,

    /// Env file holding the API key.
    #[arg(long, global = true, default_value = ".env")]
    env: PathBuf,

    /// Log progress to the console.
    #[arg(long, global = true)]
    verbose: bool,

    /// Log everything to the console.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate lines typed at a prompt.
    Manual,
    /// Translate a channel's stored messages.
    #[command(alias = "auto-sqlite")]
    Auto(BatchArgs),
    /// Project tokens and cost of translating a channel, without calling the API.
    Estimate(BatchArgs),
}

/// Options shared by the store-backed subcommands.
#[derive(Args, Debug, Clone)]
struct BatchArgs {
    /// Channel whose messages are translated.
    #[arg(long)]
    channel: String,

    /// SQLite message store; overrides `storage.database_path`.
    #[arg(long)]
    db: Option<String>,

    /// Maximum number of messages sent to the API.
    #[arg(long, default_value_t = 10)]
    limit: usize,

    /// DDL applied when the store is opened; overrides `storage.schema_path`.
    #[arg(long)]
    schema: Option<String>,
}

impl BatchArgs {
    /// Point the storage settings at the store named on the command line.
    fn apply(&self, config: &mut HermeneisConfig) {
        if let Some(db) = &self.db {
            config.storage.database_path = db.clone();
        }
        if let Some(schema) = &self.schema {
            config.storage.schema_path = Some(schema.clone());
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("{}: failed to start runtime: {e}", "error".red());
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    ExitCode::from(runtime.block_on(run(cli)))
}

async fn run(cli: Cli) -> u8 {
    // One read: the parsed settings and the persisted fingerprint share bytes.
    let snapshot = match ConfigSnapshot::read(&cli.config) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("{}: {e}", "error".red());
            return EXIT_FAILURE;
        }
    };
    let mut config = match hermeneis_config::load_and_validate_source(
        &cli.config.display().to_string(),
        &snapshot.text,
    ) {
        Ok(config) => config,
        Err(errors) => {
            hermeneis_config::render_errors(&errors);
            return EXIT_FAILURE;
        }
    };

    let _log_guard = logging::init(
        logging::console_level(cli.verbose, cli.debug),
        &config.personality.log,
    );
    tracing::info!(
        config = %cli.config.display(),
        model = %config.personality.model,
        sha256 = %snapshot.sha256,
        "configuration loaded"
    );

    match cli.command {
        Commands::Manual => match shell::run_shell(&config, &cli.env).await {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                EXIT_FAILURE
            }
        },
        Commands::Auto(args) => {
            args.apply(&mut config);
            auto::run_auto(config, snapshot, &args.channel, args.limit, &cli.env).await
        }
        Commands::Estimate(args) => {
            args.apply(&mut config);
            estimate::run_estimate(&config, &args.channel, args.limit).await
        }
    }
}
