// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with fuzzy match suggestions.
//!
//! Converts Figment deserialization errors into rich miette diagnostics
//! with source spans, valid key listings, and "did you mean?" suggestions
//! using Jaro-Winkler string similarity.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use hermeneis_core::HermeneisError;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration error with rich diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("cannot read configuration file `{path}`: {message}")]
    #[diagnostic(code(hermeneis::config::io))]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error text.
        message: String,
    },

    /// An unknown key was found in the configuration.
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(hermeneis::config::unknown_key),
        help("{}", format_unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        /// The unrecognized key name.
        key: String,
        /// Suggested correction via fuzzy matching, if any.
        suggestion: Option<String>,
        /// List of valid keys for the section.
        valid_keys: String,
        /// Source span for the offending key.
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        /// The source file content for context display.
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A configuration value has the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(code(hermeneis::config::invalid_type), help("expected {expected}"))]
    InvalidType {
        /// The key with the wrong type.
        key: String,
        /// Description of the type mismatch.
        detail: String,
        /// What type was expected.
        expected: String,
    },

    /// A required configuration key is missing.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(hermeneis::config::missing_key),
        help("add `{key}: <value>` to your settings file")
    )]
    MissingKey {
        /// The missing key name.
        key: String,
    },

    /// A required secret was not found in the env file or the environment.
    #[error("missing secret `{name}`")]
    #[diagnostic(
        code(hermeneis::config::missing_secret),
        help("add `{name}=<value>` to the env file or export it")
    )]
    MissingSecret {
        /// Variable name of the secret.
        name: String,
    },

    /// A validation error for a config value.
    #[error("validation error: {message}")]
    #[diagnostic(code(hermeneis::config::validation))]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// Catch-all for other configuration errors.
    #[error("configuration error: {0}")]
    #[diagnostic(code(hermeneis::config::other))]
    Other(String),
}

impl From<ConfigError> for HermeneisError {
    fn from(err: ConfigError) -> Self {
        HermeneisError::Config(err.to_string())
    }
}

/// Format the help message for unknown key errors.
fn format_unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Convert a `figment::Error` into a list of `ConfigError` diagnostics.
///
/// `source` is the (name, content) of the YAML document, used to attach
/// source spans to unknown-key errors.
pub fn figment_to_config_errors(err: figment::Error, source: &(String, String)) -> Vec<ConfigError> {
    use figment::error::Kind;

    let mut errors = Vec::new();

    for error in err {
        let config_error = match &error.kind {
            Kind::UnknownField(field, expected) => {
                let valid_keys: Vec<&str> = expected.to_vec();
                let suggestion = suggest_key(field, &valid_keys);
                let section: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();
                let (name, content) = source;
                let (span, src) = match find_key_offset(content, &section, field) {
                    Some(offset) => (
                        Some(SourceSpan::new(offset.into(), field.len())),
                        Some(NamedSource::new(name, content.clone())),
                    ),
                    None => (None, None),
                };

                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion,
                    valid_keys: valid_keys.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => {
                let mut path: Vec<String> = error.path.iter().map(|s| s.to_string()).collect();
                path.push(field.clone().into_owned());
                ConfigError::MissingKey {
                    key: path.join("."),
                }
            }
            Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                key: error.path.join("."),
                detail: format!("found {actual}, expected {expected}"),
                expected: expected.to_string(),
            },
            Kind::Message(message) => ConfigError::InvalidType {
                key: error.path.join("."),
                detail: message.clone(),
                expected: "a valid value".to_string(),
            },
            _ => ConfigError::Other(format!("{error}")),
        };

        errors.push(config_error);
    }

    errors
}

/// Find the byte offset of a key in YAML content, relative to a section path.
///
/// For `path = ["personality"]` and `field = "modle"`, finds the
/// `personality:` header then searches for `modle:` after it. For top-level
/// fields, searches from the start.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let mut search_start = 0;
    if let Some(section) = path.first() {
        let header = format!("{section}:");
        let mut offset = 0;
        let mut found = None;
        for line in content.split_inclusive('\n') {
            if line.trim_end().starts_with(&header) {
                found = Some(offset + line.len());
                break;
            }
            offset += line.len();
        }
        search_start = found?;
    }

    let mut byte_offset = search_start;
    for line in content[search_start..].split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(after) = trimmed.strip_prefix(field)
            && after.starts_with(':')
        {
            return Some(byte_offset + (line.len() - trimmed.len()));
        }
        byte_offset += line.len();
    }

    None
}

/// Suggest a similar key name using Jaro-Winkler string similarity.
///
/// Returns the best match above the similarity threshold, or `None` if
/// no valid key is close enough to the unknown key.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    let mut best_score = SUGGESTION_THRESHOLD;
    let mut best_match = None;

    for &key in valid_keys {
        let score = strsim::jaro_winkler(unknown, key);
        if score > best_score {
            best_score = score;
            best_match = Some(key.to_string());
        }
    }

    best_match
}

/// Render a list of `ConfigError`s to stderr using miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        let diagnostic: &dyn Diagnostic = error;
        if handler.render_report(&mut buf, diagnostic).is_ok() {
            eprint!("{buf}");
        } else {
            eprintln!("Error: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggest_modle_for_model() {
        let valid = &["system", "user", "model", "temperature", "max_tokens", "log"];
        assert_eq!(suggest_key("modle", valid), Some("model".to_string()));
    }

    #[test]
    fn suggest_max_token_for_max_tokens() {
        let valid = &["system", "user", "model", "temperature", "max_tokens", "log"];
        assert_eq!(suggest_key("max_token", valid), Some("max_tokens".to_string()));
    }

    #[test]
    fn no_suggestion_for_distant_typo() {
        let valid = &["system", "user", "model"];
        assert_eq!(suggest_key("zzzzzz", valid), None);
    }

    #[test]
    fn find_key_offset_in_section() {
        let content = "storage:\n  modle: x\npersonality:\n  system: s\n  modle: gpt\n";
        let path = vec!["personality".to_string()];
        let o = find_key_offset(content, &path, "modle").unwrap();
        assert_eq!(&content[o..o + 5], "modle");
        assert!(o > content.find("personality").unwrap());
    }

    #[test]
    fn find_key_offset_requires_colon() {
        let content = "personality:\n  models_list: a\n";
        let path = vec!["personality".to_string()];
        assert_eq!(find_key_offset(content, &path, "model"), None);
    }

    #[test]
    fn config_error_converts_to_hermeneis_error() {
        let err: HermeneisError = ConfigError::MissingSecret {
            name: "OPENAI_API_KEY".into(),
        }
        .into();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
}
