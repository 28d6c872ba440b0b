//! Checksum file parsing and comparison: no I/O.
//!
//! Accepted `.dgst` layouts:
//! - OpenSSL: `SHA3-256(node-2.0.6.1-linux-amd64)= 9f86d0...`
//! - coreutils: `9f86d0...  node-2.0.6.1-linux-amd64`
//! - bare hex: `9f86d0...` (assumed SHA-256)

use crate::domain::error::DigestError;

/// Hash function named by a digest file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Sha256,
    Sha3_256,
}

impl DigestAlgorithm {
    fn from_label(label: &str) -> Result<Self, DigestError> {
        match label.trim().to_ascii_uppercase().as_str() {
            "SHA256" | "SHA2-256" | "SHA-256" => Ok(Self::Sha256),
            "SHA3-256" => Ok(Self::Sha3_256),
            other => Err(DigestError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// The checksum a downloaded file is expected to have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedDigest {
    pub algorithm: DigestAlgorithm,
    pub hex: String,
}

impl ExpectedDigest {
    /// Parse the first meaningful line of a `.dgst` file.
    ///
    /// # Errors
    ///
    /// `DigestError::Malformed` if no hex digest can be found,
    /// `DigestError::UnsupportedAlgorithm` for anything but SHA-256 / SHA3-256.
    pub fn parse(file: &str, content: &str) -> Result<Self, DigestError> {
        let malformed = || DigestError::Malformed(file.to_string());
        let line = content
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .ok_or_else(malformed)?;

        if let Some((head, hex)) = line.split_once("= ") {
            let algo = head.split('(').next().ok_or_else(malformed)?;
            let hex = hex.trim();
            if !is_hex(hex) {
                return Err(malformed());
            }
            return Ok(Self {
                algorithm: DigestAlgorithm::from_label(algo)?,
                hex: hex.to_ascii_lowercase(),
            });
        }

        let hex = line.split_whitespace().next().ok_or_else(malformed)?;
        if !is_hex(hex) {
            return Err(malformed());
        }
        Ok(Self {
            algorithm: DigestAlgorithm::Sha256,
            hex: hex.to_ascii_lowercase(),
        })
    }

    /// Compare against the hex digest actually computed for `file`.
    ///
    /// # Errors
    ///
    /// Returns `DigestError::Mismatch` when the digests differ.
    pub fn verify(&self, file: &str, actual_hex: &str) -> Result<(), DigestError> {
        if self.hex.eq_ignore_ascii_case(actual_hex) {
            return Ok(());
        }
        Err(DigestError::Mismatch {
            file: file.to_string(),
            expected: self.hex.clone(),
            actual: actual_hex.to_ascii_lowercase(),
        })
    }
}

fn is_hex(s: &str) -> bool {
    s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Encode bytes as lowercase hex.
#[must_use]
pub fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write as _;
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}
