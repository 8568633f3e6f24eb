// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret loading from an env file.
//!
//! The env file is parsed in place; nothing is written into the process
//! environment.

use std::path::Path;

use secrecy::SecretString;
use tracing::debug;

use crate::diagnostic::ConfigError;

/// Look up `name` in the env file at `env_file`, then in the process environment.
///
/// A missing env file is not an error on its own; the key just has to come
/// from the environment instead.
pub fn load_secret(env_file: &Path, name: &str) -> Result<SecretString, ConfigError> {
    if env_file.exists() {
        let entries = dotenvy::from_path_iter(env_file).map_err(|e| ConfigError::Io {
            path: env_file.display().to_string(),
            message: e.to_string(),
        })?;
        for entry in entries {
            let (key, value) = entry.map_err(|e| ConfigError::Other(format!(
                "malformed env file `{}`: {e}",
                env_file.display()
            )))?;
            if key == name && !value.trim().is_empty() {
                debug!(name, path = %env_file.display(), "secret loaded from env file");
                return Ok(SecretString::from(value));
            }
        }
    }

    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            debug!(name, "secret loaded from process environment");
            Ok(SecretString::from(value))
        }
        _ => Err(ConfigError::MissingSecret {
            name: name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn reads_key_from_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "OTHER=1\nHERMENEIS_TEST_KEY_A=sk-from-file\n").unwrap();

        let secret = load_secret(&path, "HERMENEIS_TEST_KEY_A").unwrap();
        assert_eq!(secret.expose_secret(), "sk-from-file");
    }

    #[test]
    fn missing_key_everywhere_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "OTHER=1\n").unwrap();

        let err = load_secret(&path, "HERMENEIS_TEST_KEY_SURELY_UNSET").unwrap_err();
        assert!(
            matches!(err, ConfigError::MissingSecret { ref name } if name == "HERMENEIS_TEST_KEY_SURELY_UNSET")
        );
    }

    #[test]
    fn empty_value_counts_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "HERMENEIS_TEST_KEY_EMPTY=\n").unwrap();

        assert!(load_secret(&path, "HERMENEIS_TEST_KEY_EMPTY").is_err());
    }
}
