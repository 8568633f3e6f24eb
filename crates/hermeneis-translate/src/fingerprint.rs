// SPDX-FileCopyrightText: 2026 Hermeneis Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SHA-256 fingerprints of configuration files.
//!
//! The digest and the verbatim text stored alongside it always come from a
//! single read of the file, so they cannot disagree.

use std::path::Path;

use hermeneis_core::HermeneisError;
use ring::digest::{digest, SHA256};

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(digest(&SHA256, bytes).as_ref())
}

/// The bytes of a configuration file as read once, with their digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSnapshot {
    /// Verbatim file contents.
    pub text: String,
    /// Hex SHA-256 of `text`'s bytes.
    pub sha256: String,
}

impl ConfigSnapshot {
    /// Read `path` once and fingerprint the bytes read.
    ///
    /// The file must be UTF-8 because its text is persisted next to the digest.
    pub fn read(path: &Path) -> Result<Self, HermeneisError> {
        let bytes = std::fs::read(path).map_err(|e| {
            HermeneisError::Config(format!("cannot read `{}`: {e}", path.display()))
        })?;
        Self::from_bytes(bytes).map_err(|e| {
            HermeneisError::Config(format!("`{}` is not valid UTF-8: {e}", path.display()))
        })
    }

    /// Fingerprint bytes already in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, std::string::FromUtf8Error> {
        let sha256 = sha256_hex(&bytes);
        let text = String::from_utf8(bytes)?;
        Ok(Self { text, sha256 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_digests() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn one_byte_change_changes_digest() {
        let a = ConfigSnapshot::from_bytes(b"temperature: 0.5\n".to_vec()).unwrap();
        let b = ConfigSnapshot::from_bytes(b"temperature: 0.6\n".to_vec()).unwrap();
        assert_ne!(a.sha256, b.sha256);
        assert_eq!(a.sha256.len(), 64);
    }

    #[test]
    fn read_matches_in_memory_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        let content = "personality:\n  model: gpt-3.5-turbo\n  user: \"Переведи: \"\n";
        std::fs::write(&path, content).unwrap();

        let snapshot = ConfigSnapshot::read(&path).unwrap();
        assert_eq!(snapshot.text, content);
        assert_eq!(snapshot.sha256, sha256_hex(content.as_bytes()));
    }

    #[test]
    fn missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigSnapshot::read(&dir.path().join("nope.yml")).unwrap_err();
        assert!(matches!(err, HermeneisError::Config(ref m) if m.contains("nope.yml")));
    }

    #[test]
    fn non_utf8_is_rejected() {
        assert!(ConfigSnapshot::from_bytes(vec![0xff, 0xfe, 0x00]).is_err());
    }
}
