// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model pricing tables and cost calculation.
//!
//! Rates are USD per thousand tokens for OpenAI chat models:
//!
//! gpt-4o-mini:    input=$0.00015, output=$0.0006
//! gpt-4o:         input=$0.005,   output=$0.015
//! gpt-4-turbo:    input=$0.01,    output=$0.03
//! gpt-4:          input=$0.03,    output=$0.06
//! gpt-3.5-turbo:  input=$0.0005,  output=$0.0015

use hermeneis_config::model::PricingConfig;
use serde::Serialize;
use tracing::debug;

/// Per-model pricing in USD per thousand tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelPricing {
    /// Cost per thousand input tokens.
    pub input_per_thousand: f64,
    /// Cost per thousand output tokens.
    pub output_per_thousand: f64,
}

/// Look up pricing for a given model identifier.
///
/// Matches on prefixes, most specific first. Falls back to gpt-3.5-turbo
/// pricing for unknown models so an estimate is always produced.
pub fn get_pricing(model: &str) -> ModelPricing {
    let lower = model.to_lowercase();

    let (input, output) = if lower.starts_with("gpt-4o-mini") {
        (0.00015, 0.0006)
    } else if lower.starts_with("gpt-4o") {
        (0.005, 0.015)
    } else if lower.starts_with("gpt-4-turbo") {
        (0.01, 0.03)
    } else if lower.starts_with("gpt-4") {
        (0.03, 0.06)
    } else {
        // gpt-3.5-turbo and unknown models.
        (0.0005, 0.0015)
    };

    ModelPricing {
        input_per_thousand: input,
        output_per_thousand: output,
    }
}

/// Table pricing for `model` with any configured overrides applied per rate.
pub fn resolve_pricing(model: &str, overrides: &PricingConfig) -> ModelPricing {
    let mut pricing = get_pricing(model);
    if let Some(input) = overrides.input_per_thousand {
        pricing.input_per_thousand = input;
    }
    if let Some(output) = overrides.output_per_thousand {
        pricing.output_per_thousand = output;
    }
    debug!(
        model,
        input = pricing.input_per_thousand,
        output = pricing.output_per_thousand,
        "pricing resolved"
    );
    pricing
}

/// Calculate the projected cost in USD for a prompt token total.
///
/// The same token count is charged at both the input and the output rate:
/// `tokens * input / 1000 + tokens * output / 1000`.
pub fn calculate_cost(total_tokens: u64, pricing: &ModelPricing) -> f64 {
    let tokens = total_tokens as f64;
    tokens * pricing.input_per_thousand / 1000.0 + tokens * pricing.output_per_thousand / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn gpt35_pricing() {
        let p = get_pricing("gpt-3.5-turbo");
        assert!(close(p.input_per_thousand, 0.0005));
        assert!(close(p.output_per_thousand, 0.0015));
    }

    #[test]
    fn mini_is_not_priced_as_gpt4o() {
        let p = get_pricing("gpt-4o-mini-2024-07-18");
        assert!(close(p.input_per_thousand, 0.00015));
        let p = get_pricing("gpt-4o-2024-08-06");
        assert!(close(p.input_per_thousand, 0.005));
    }

    #[test]
    fn gpt4_variants() {
        assert!(close(get_pricing("gpt-4-turbo").output_per_thousand, 0.03));
        assert!(close(get_pricing("gpt-4-0613").output_per_thousand, 0.06));
        assert!(close(get_pricing("GPT-4").input_per_thousand, 0.03));
    }

    #[test]
    fn unknown_model_falls_back_to_gpt35() {
        assert_eq!(get_pricing("some-local-model"), get_pricing("gpt-3.5-turbo"));
    }

    #[test]
    fn overrides_apply_per_rate() {
        let overrides = PricingConfig {
            input_per_thousand: Some(0.001),
            output_per_thousand: None,
        };
        let p = resolve_pricing("gpt-4", &overrides);
        assert!(close(p.input_per_thousand, 0.001));
        assert!(close(p.output_per_thousand, 0.06));
    }

    #[test]
    fn cost_charges_tokens_at_both_rates() {
        let pricing = get_pricing("gpt-3.5-turbo");
        let cost = calculate_cost(2000, &pricing);
        // 2000 * 0.0005 / 1000 + 2000 * 0.0015 / 1000 = 0.001 + 0.003
        assert!(close(cost, 0.004), "got {cost}");
    }

    #[test]
    fn zero_tokens_zero_cost() {
        let pricing = get_pricing("gpt-4");
        assert!(close(calculate_cost(0, &pricing), 0.0));
    }
}
