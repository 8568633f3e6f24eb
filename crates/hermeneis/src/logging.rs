// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tracing setup: a console layer sized by `--verbose`/`--debug` and a
//! debug-level file layer writing to `personality.log`.
//!
//! The subscriber is installed as the scoped default for the lifetime of the
//! returned guard. The binary runs on a current-thread runtime, so every task
//! sees it.

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Console verbosity: `info` by default, `debug` with `--verbose`,
/// `trace` with `--debug`.
pub fn console_level(verbose: bool, debug: bool) -> &'static str {
    if debug {
        "trace"
    } else if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Installs the subscriber until the returned guard is dropped.
///
/// `RUST_LOG` overrides the console level. A log file that cannot be opened
/// is reported on stderr and the run continues with console output only.
#[must_use = "logging stops when the guard is dropped"]
pub fn init(console_level: &str, log_path: &str) -> DefaultGuard {
    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("hermeneis={console_level},warn"))
    });
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(console_filter);

    let file = match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(file) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(file_filter()),
        ),
        Err(e) => {
            eprintln!("warning: cannot open log file `{log_path}`: {e}");
            None
        }
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .set_default()
}

/// Debug output from this workspace's crates, warnings from dependencies.
fn file_filter() -> EnvFilter {
    EnvFilter::new("hermeneis=debug,warn")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_to_console_levels() {
        assert_eq!(console_level(false, false), "info");
        assert_eq!(console_level(true, false), "debug");
        assert_eq!(console_level(false, true), "trace");
        assert_eq!(console_level(true, true), "trace");
    }

    #[test]
    fn file_receives_events_only_while_guard_is_held() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("hermeneis.log");
        let log_path = log.to_str().unwrap();

        let guard = init("info", log_path);
        tracing::debug!(target: "hermeneis", "inside scope");
        drop(guard);
        tracing::debug!(target: "hermeneis", "outside scope");

        let written = std::fs::read_to_string(&log).unwrap();
        assert!(written.contains("inside scope"), "log: {written}");
        assert!(!written.contains("outside scope"), "log: {written}");
    }

    #[test]
    fn file_skips_dependency_debug_output() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("hermeneis.log");

        let _guard = init("info", log.to_str().unwrap());
        tracing::debug!(target: "hyper::proto", "dependency chatter");
        tracing::warn!(target: "hyper::proto", "dependency warning");

        let written = std::fs::read_to_string(&log).unwrap();
        assert!(!written.contains("dependency chatter"), "log: {written}");
        assert!(written.contains("dependency warning"), "log: {written}");
    }

    #[test]
    fn unopenable_log_file_still_returns_a_guard() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no-such-dir").join("hermeneis.log");
        let _guard = init("info", missing.to_str().unwrap());
        tracing::info!(target: "hermeneis", "console only");
        assert!(!missing.exists());
    }
}
