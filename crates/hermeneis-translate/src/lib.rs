// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation orchestration for Hermeneis.
//!
//! - [`fingerprint`] reads a configuration file once and digests it
//! - [`identity`] turns tool, revision, model and configuration into a
//!   persisted parameter identity
//! - [`cache`] answers "already translated under this identity?"
//! - [`driver`] runs the batch state machine over a channel
//! - [`shutdown`] turns operator interrupts into cancellation

pub mod cache;
pub mod driver;
pub mod fingerprint;
pub mod identity;
pub mod shutdown;

pub use cache::TranslationCache;
pub use driver::{RunCounters, RunOutcome, RunReport, RunState, TranslationDriver};
pub use fingerprint::{sha256_hex, ConfigSnapshot};
pub use identity::{parameter_tuple, GitRevision, ParameterRegistry, TOOL_NAME};
pub use shutdown::install_signal_handler;
