// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token counting, pricing, and dry-run cost estimates for Hermeneis.
//!
//! This crate provides:
//! - **Pricing**: Per-thousand-token rates for OpenAI chat models, overridable from config
//! - **Tokenizer**: A tiktoken-backed [`TokenCounter`](hermeneis_core::TokenCounter)
//! - **Estimator**: A channel-wide projection that never calls the provider or writes

pub mod estimator;
pub mod pricing;
pub mod tokenizer;

pub use estimator::{CostEstimate, CostEstimator};
pub use pricing::{calculate_cost, get_pricing, resolve_pricing, ModelPricing};
pub use tokenizer::TiktokenCounter;
