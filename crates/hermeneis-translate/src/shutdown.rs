// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator interrupt handling.
//!
//! SIGINT (Ctrl+C) and, on Unix, SIGTERM cancel a [`CancellationToken`] that
//! the batch driver races against each provider call.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Installs handlers for SIGINT and SIGTERM.
///
/// Returns a token cancelled when either signal arrives. Must be called from
/// within a Tokio runtime.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        wait_for_signal().await;
        token_clone.cancel();
        debug!("interrupt handler completed");
    });

    token
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let ctrl_c = tokio::signal::ctrl_c();
    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = ctrl_c => info!("received SIGINT (Ctrl+C), stopping after the current message"),
                _ = sigterm.recv() => info!("received SIGTERM, stopping after the current message"),
            }
        }
        Err(e) => {
            warn!(error = %e, "cannot install SIGTERM handler, only Ctrl+C will interrupt");
            if ctrl_c.await.is_ok() {
                info!("received SIGINT (Ctrl+C), stopping after the current message");
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("received Ctrl+C, stopping after the current message");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn token_starts_uncancelled() {
        let token = install_signal_handler();
        assert!(!token.is_cancelled());
        token.cancel();
        assert!(token.is_cancelled());
    }
}
