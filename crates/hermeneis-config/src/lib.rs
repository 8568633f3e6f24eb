// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for Hermeneis.
//!
//! Provides YAML settings parsing with strict validation (`deny_unknown_fields`),
//! environment variable overrides, env-file secret loading, and Elm-style
//! diagnostic error rendering with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use hermeneis_config::load_and_validate;
//!
//! let config = load_and_validate(std::path::Path::new("config.yml")).expect("config errors");
//! println!("model: {}", config.personality.model);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod secrets;
pub mod validation;

use std::path::Path;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config_from_str, load_config_from_yaml};
pub use model::{HermeneisConfig, PersonalityConfig};
pub use secrets::load_secret;

/// Load the settings file at `path`, apply env overrides, and validate.
///
/// This is the high-level entry point that:
/// 1. Reads the YAML file (a missing or unreadable file is an error)
/// 2. Merges `HERMENEIS_*` env overrides via Figment, rejecting any that
///    target `personality`
/// 3. On success: runs post-deserialization validation
/// 4. On Figment error: converts to rich miette diagnostics with typo suggestions
pub fn load_and_validate(path: &Path) -> Result<HermeneisConfig, Vec<ConfigError>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        vec![ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        }]
    })?;
    load_and_validate_source(&path.display().to_string(), &content)
}

/// Parse and validate settings that were already read, with env overrides.
///
/// `name` labels the source in diagnostics. Callers that also fingerprint
/// the settings file use this so the digest and the parsed values come
/// from the same bytes.
pub fn load_and_validate_source(
    name: &str,
    content: &str,
) -> Result<HermeneisConfig, Vec<ConfigError>> {
    let rejected = loader::personality_env_overrides();
    if !rejected.is_empty() {
        return Err(rejected
            .into_iter()
            .map(|var| ConfigError::Validation {
                message: format!(
                    "{var} is set, but personality settings can only come from the settings file"
                ),
            })
            .collect());
    }

    match loader::load_config_from_yaml(content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let source = (name.to_string(), content.to_string());
            Err(diagnostic::figment_to_config_errors(err, &source))
        }
    }
}

/// Load configuration from a YAML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(yaml_content: &str) -> Result<HermeneisConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(yaml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let source = ("<inline>".to_string(), yaml_content.to_string());
            Err(diagnostic::figment_to_config_errors(err, &source))
        }
    }
}
