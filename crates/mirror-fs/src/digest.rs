//! Content digests
//!
//! A [`ContentDigest`] is the first 128 bits of the SHA-256 of a file's bytes,
//! rendered as 32 lowercase hex characters. It is only used to detect changed
//! content between source and replica, never for integrity against tampering.

use std::fmt;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::{Error, Result};

/// Number of digest bytes kept from the SHA-256 output.
const DIGEST_LEN: usize = 16;

/// 128-bit content digest of a file's full byte content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; DIGEST_LEN]);

impl ContentDigest {
    /// Compute the digest of raw bytes.
    pub fn of(content: &[u8]) -> Self {
        let hash = Sha256::digest(content);
        let mut bytes = [0u8; DIGEST_LEN];
        bytes.copy_from_slice(&hash[..DIGEST_LEN]);
        Self(bytes)
    }

    /// Compute the digest of a file's contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn of_file(path: &Path) -> Result<Self> {
        let content = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        Ok(Self::of(&content))
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Hex rendering of the digest.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_32_hex_chars() {
        let digest = ContentDigest::of(b"hello world");
        let hex = digest.to_hex();
        assert_eq!(hex.len(), 32);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn hex_renders_raw_bytes_in_order() {
        let digest = ContentDigest::of(b"hello world");
        let from_bytes: String = digest.as_bytes().iter().map(|b| format!("{b:02x}")).collect();
        assert_eq!(digest.as_bytes().len(), 16);
        assert_eq!(from_bytes, digest.to_hex());
    }

    #[test]
    fn digest_is_deterministic() {
        assert_eq!(ContentDigest::of(b"test"), ContentDigest::of(b"test"));
    }

    #[test]
    fn different_content_different_digest() {
        assert_ne!(ContentDigest::of(b"aaa"), ContentDigest::of(b"bbb"));
    }

    #[test]
    fn digest_known_values() {
        assert_eq!(
            ContentDigest::of(b"hello world").to_hex(),
            "b94d27b9934d3e08a52e52d7da7dabfa"
        );
        assert_eq!(
            ContentDigest::of(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb924"
        );
    }

    #[test]
    fn line_endings_are_significant() {
        assert_ne!(ContentDigest::of(b"a\nb\n"), ContentDigest::of(b"a\r\nb\r\n"));
    }

    #[test]
    fn file_digest_matches_content_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.txt");
        std::fs::write(&path, "hello world").unwrap();

        let file_digest = ContentDigest::of_file(&path).unwrap();
        assert_eq!(file_digest, ContentDigest::of(b"hello world"));
    }

    #[test]
    fn file_digest_of_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContentDigest::of_file(&dir.path().join("missing")).unwrap_err();
        assert!(err.is_not_found());
    }
}
