// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions at the seams between the core and its collaborators.
//!
//! Async adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod build;
pub mod provider;
pub mod storage;
pub mod tokenizer;

pub use adapter::PluginAdapter;
pub use build::{BuildIdentity, FixedBuildIdentity};
pub use provider::ProviderAdapter;
pub use storage::StorageAdapter;
pub use tokenizer::TokenCounter;
