// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Hermeneis.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// Top-level Hermeneis configuration.
///
/// Loaded from a YAML settings file with environment variable overrides.
/// Only `personality` is required; the other sections default to sensible values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HermeneisConfig {
    /// Translation prompt and sampling settings.
    pub personality: PersonalityConfig,

    /// Message store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// OpenAI API client settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Pricing overrides for dry-run cost estimates.
    #[serde(default)]
    pub pricing: PricingConfig,
}

/// The translation "personality": prompts, model and sampling parameters.
///
/// Every field is required. Numeric fields accept YAML numbers as well as
/// numeric strings (`temperature: "0.5"`), and are parsed once here.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PersonalityConfig {
    /// Fixed system instruction sent with every translation.
    pub system: String,

    /// Prefix prepended to the raw message text in the user turn.
    pub user: String,

    /// Model identifier (e.g., "gpt-3.5-turbo").
    pub model: String,

    /// Sampling temperature, 0.0 to 2.0.
    #[serde(deserialize_with = "number_or_string")]
    pub temperature: f32,

    /// Maximum tokens to generate per translation.
    #[serde(deserialize_with = "number_or_string")]
    pub max_tokens: u32,

    /// Path of the log file that receives debug-level output.
    pub log: String,
}

/// Message store configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Path to a schema DDL file. `None` applies the built-in schema.
    #[serde(default)]
    pub schema_path: Option<String>,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            schema_path: None,
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    "hermeneis.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// OpenAI API client configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// Base URL of the API, without the `/chat/completions` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Name of the variable holding the API key in the env file.
    #[serde(default = "default_api_key_var")]
    pub api_key_var: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries on transient HTTP errors (429, 5xx).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_var: default_api_key_var(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_api_key_var() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_retries() -> u32 {
    1
}

/// Pricing overrides in USD per thousand tokens.
///
/// When unset, the built-in per-model table is used.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PricingConfig {
    #[serde(default)]
    pub input_per_thousand: Option<f64>,

    #[serde(default)]
    pub output_per_thousand: Option<f64>,
}

/// Deserializes a number that may also be written as a numeric string.
fn number_or_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + TryFromNumber,
    <T as FromStr>::Err: fmt::Display,
{
    struct NumberOrString<T>(PhantomData<T>);

    impl<'de, T> Visitor<'de> for NumberOrString<T>
    where
        T: FromStr + TryFromNumber,
        <T as FromStr>::Err: fmt::Display,
    {
        type Value = T;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number or a numeric string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
            v.trim().parse::<T>().map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<T, E> {
            T::try_from_u64(v).ok_or_else(|| E::custom(format!("{v} is out of range")))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<T, E> {
            T::try_from_i64(v).ok_or_else(|| E::custom(format!("{v} is out of range")))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<T, E> {
            T::try_from_f64(v).ok_or_else(|| E::custom(format!("{v} is not a valid value")))
        }
    }

    deserializer.deserialize_any(NumberOrString(PhantomData))
}

/// Lossless conversions from the numeric shapes a config document can hold.
trait TryFromNumber: Sized {
    fn try_from_u64(v: u64) -> Option<Self>;
    fn try_from_i64(v: i64) -> Option<Self>;
    fn try_from_f64(v: f64) -> Option<Self>;
}

impl TryFromNumber for f32 {
    fn try_from_u64(v: u64) -> Option<Self> {
        Some(v as f32)
    }

    fn try_from_i64(v: i64) -> Option<Self> {
        Some(v as f32)
    }

    fn try_from_f64(v: f64) -> Option<Self> {
        Some(v as f32)
    }
}

impl TryFromNumber for u32 {
    fn try_from_u64(v: u64) -> Option<Self> {
        u32::try_from(v).ok()
    }

    fn try_from_i64(v: i64) -> Option<Self> {
        u32::try_from(v).ok()
    }

    fn try_from_f64(v: f64) -> Option<Self> {
        (v.fract() == 0.0 && v >= 0.0 && v <= f64::from(u32::MAX)).then_some(v as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = r#"
personality:
  system: You are a translator.
  user: "Translate to English: "
  model: gpt-3.5-turbo
  temperature: 0.5
  max_tokens: 100
  log: logs/hermeneis.log
"#;

    fn parse(yaml: &str) -> Result<HermeneisConfig, figment::Error> {
        use figment::providers::{Format, Yaml};
        figment::Figment::new().merge(Yaml::string(yaml)).extract()
    }

    #[test]
    fn numeric_fields_accept_numbers() {
        let config = parse(BASE).unwrap();
        assert!((config.personality.temperature - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.personality.max_tokens, 100);
    }

    #[test]
    fn numeric_fields_accept_numeric_strings() {
        let yaml = BASE
            .replace("temperature: 0.5", "temperature: \"0.5\"")
            .replace("max_tokens: 100", "max_tokens: \"100\"");
        let config = parse(&yaml).unwrap();
        assert!((config.personality.temperature - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.personality.max_tokens, 100);
    }

    #[test]
    fn non_numeric_string_is_rejected() {
        let yaml = BASE.replace("max_tokens: 100", "max_tokens: lots");
        assert!(parse(&yaml).is_err());
    }

    #[test]
    fn negative_max_tokens_is_rejected() {
        let yaml = BASE.replace("max_tokens: 100", "max_tokens: -5");
        assert!(parse(&yaml).is_err());
    }

    #[test]
    fn optional_sections_default() {
        let config = parse(BASE).unwrap();
        assert_eq!(config.storage, StorageConfig::default());
        assert_eq!(config.openai.base_url, "https://api.openai.com/v1");
        assert_eq!(config.openai.api_key_var, "OPENAI_API_KEY");
        assert!(config.pricing.input_per_thousand.is_none());
    }

    #[test]
    fn missing_personality_field_is_rejected() {
        let yaml = BASE.replace("  model: gpt-3.5-turbo\n", "");
        let err = parse(&yaml).unwrap_err();
        assert!(err.to_string().contains("model"), "got: {err}");
    }
}
