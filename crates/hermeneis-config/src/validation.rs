// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as numeric ranges and non-empty prompts.

use crate::diagnostic::ConfigError;
use crate::model::HermeneisConfig;

/// Highest temperature accepted by the chat completion API.
const MAX_TEMPERATURE: f32 = 2.0;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &HermeneisConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let personality = &config.personality;

    for (key, value) in [
        ("personality.system", &personality.system),
        ("personality.user", &personality.user),
        ("personality.model", &personality.model),
        ("personality.log", &personality.log),
    ] {
        if value.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        }
    }

    let temperature = personality.temperature;
    if !temperature.is_finite() || !(0.0..=MAX_TEMPERATURE).contains(&temperature) {
        errors.push(ConfigError::Validation {
            message: format!(
                "personality.temperature must be between 0 and {MAX_TEMPERATURE}, got {temperature}"
            ),
        });
    }

    if personality.max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "personality.max_tokens must be at least 1".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if let Some(schema) = &config.storage.schema_path
        && schema.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "storage.schema_path must not be empty when set".to_string(),
        });
    }

    if !config.openai.base_url.starts_with("http://")
        && !config.openai.base_url.starts_with("https://")
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "openai.base_url `{}` must start with http:// or https://",
                config.openai.base_url
            ),
        });
    }

    if config.openai.timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "openai.timeout_secs must be at least 1".to_string(),
        });
    }

    for (key, price) in [
        ("pricing.input_per_thousand", config.pricing.input_per_thousand),
        ("pricing.output_per_thousand", config.pricing.output_per_thousand),
    ] {
        if let Some(price) = price
            && (!price.is_finite() || price < 0.0)
        {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be non-negative, got {price}"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
