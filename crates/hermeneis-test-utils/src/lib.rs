// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Hermeneis integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockProvider`] - Mock LLM provider with scripted replies and call recording
//! - [`CharCounter`] - Stub tokenizer counting one token per character
//! - [`TestHarness`] - Temporary message store seeded with channels and messages

pub mod harness;
pub mod mock_provider;
pub mod tokenizer;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_provider::{MockProvider, MockReply};
pub use tokenizer::CharCounter;
