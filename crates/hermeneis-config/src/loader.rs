// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! The YAML settings file is the base layer; `HERMENEIS_*` environment
//! variables override individual `storage`, `openai` and `pricing` keys.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};

use crate::model::HermeneisConfig;

/// Load configuration from YAML content with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. The YAML document
/// 2. `HERMENEIS_*` environment variables
pub fn load_config_from_yaml(yaml_content: &str) -> Result<HermeneisConfig, figment::Error> {
    build_figment(yaml_content).extract()
}

/// Load configuration from YAML content only (no environment lookup).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(yaml_content: &str) -> Result<HermeneisConfig, figment::Error> {
    Figment::new().merge(Yaml::string(yaml_content)).extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment(yaml_content: &str) -> Figment {
    Figment::new()
        .merge(Yaml::string(yaml_content))
        .merge(env_provider())
}

/// Prefix of environment variables that override settings keys.
pub const ENV_PREFIX: &str = "HERMENEIS_";

/// Sections whose keys may be overridden from the environment.
///
/// `personality` is absent: its values shape every translation, and the
/// parameter identity only fingerprints the settings file.
const OVERRIDABLE_SECTIONS: [&str; 3] = ["storage", "openai", "pricing"];

/// Names of set `HERMENEIS_PERSONALITY_*` variables, which are rejected.
pub fn personality_env_overrides() -> Vec<String> {
    let prefix = format!("{ENV_PREFIX}PERSONALITY_");
    let mut names: Vec<String> = std::env::vars_os()
        .filter_map(|(name, _)| name.into_string().ok())
        .filter(|name| name.to_ascii_uppercase().starts_with(&prefix))
        .collect();
    names.sort();
    names
}

/// Maps `storage_database_path` to `storage.database_path`.
///
/// Figment hands over the case-preserved variable name without the prefix.
/// Only the section separator becomes a dot: key names contain underscores
/// (`max_tokens`), so `Env::split("_")` cannot be used.
fn map_env_key(key: &str) -> Option<String> {
    let key = key.to_ascii_lowercase();
    OVERRIDABLE_SECTIONS.iter().find_map(|section| {
        key.strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
            .filter(|field| !field.is_empty())
            .map(|field| format!("{section}.{field}"))
    })
}

/// Create the environment variable provider for overridable sections.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX)
        .filter(|key| map_env_key(key.as_str()).is_some())
        .map(|key| match map_env_key(key.as_str()) {
            Some(mapped) => mapped.into(),
            None => key.as_str().to_string().into(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
personality:
  system: sys
  user: usr
  model: gpt-3.5-turbo
  temperature: 0.1
  max_tokens: 64
  log: hermeneis.log
"#;

    #[test]
    fn env_override_maps_underscored_keys() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("HERMENEIS_OPENAI_MAX_RETRIES", "7");
            jail.set_env("HERMENEIS_STORAGE_DATABASE_PATH", "/tmp/override.db");
            jail.set_env("HERMENEIS_PRICING_INPUT_PER_THOUSAND", "0.25");
            let config = load_config_from_yaml(YAML)?;
            assert_eq!(config.openai.max_retries, 7);
            assert_eq!(config.storage.database_path, "/tmp/override.db");
            assert_eq!(config.pricing.input_per_thousand, Some(0.25));
            Ok(())
        });
    }

    #[test]
    fn personality_is_not_taken_from_environment() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("HERMENEIS_PERSONALITY_SYSTEM", "You translate Russian to French.");
            let config = load_config_from_yaml(YAML)?;
            assert_eq!(config.personality.system, "sys");
            assert_eq!(
                personality_env_overrides(),
                vec!["HERMENEIS_PERSONALITY_SYSTEM".to_string()]
            );
            Ok(())
        });
    }

    #[test]
    fn env_keys_map_to_sections_regardless_of_case() {
        assert_eq!(map_env_key("STORAGE_DATABASE_PATH").as_deref(), Some("storage.database_path"));
        assert_eq!(map_env_key("openai_base_url").as_deref(), Some("openai.base_url"));
        assert_eq!(map_env_key("PERSONALITY_MAX_TOKENS"), None);
        assert_eq!(map_env_key("STORAGE_"), None);
        assert_eq!(map_env_key("STORAGEX_PATH"), None);
    }

    #[test]
    fn str_loader_ignores_environment() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("HERMENEIS_PERSONALITY_MODEL", "gpt-4");
            let config = load_config_from_str(YAML)?;
            assert_eq!(config.personality.model, "gpt-3.5-turbo");
            Ok(())
        });
    }
}
