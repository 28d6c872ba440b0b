//! Host platform detection.
//!
//! Pure mapping from Rust's `std::env::consts` names to the `os-arch` tags
//! used by the release host (`linux-amd64`, `darwin-arm64`, ...).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::PlatformError;

/// Operating system family of a release artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Linux,
    Darwin,
}

/// CPU architecture of a release artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    Amd64,
    Arm64,
}

/// A supported `os-arch` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub os: Os,
    pub arch: Arch,
}

impl Platform {
    /// Detect the platform of the running host.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Unsupported` for any pair without published binaries.
    pub fn detect() -> Result<Self, PlatformError> {
        Self::from_consts(std::env::consts::OS, std::env::consts::ARCH)
    }

    /// Map `std::env::consts::{OS, ARCH}` values to a platform.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Unsupported` for unknown OS or architecture names.
    pub fn from_consts(os: &str, arch: &str) -> Result<Self, PlatformError> {
        let unsupported = || PlatformError::Unsupported {
            os: os.to_string(),
            arch: arch.to_string(),
        };
        let os_kind = match os {
            "linux" => Os::Linux,
            "macos" | "darwin" => Os::Darwin,
            _ => return Err(unsupported()),
        };
        let arch_kind = match arch {
            "x86_64" | "amd64" => Arch::Amd64,
            "aarch64" | "arm64" => Arch::Arm64,
            _ => return Err(unsupported()),
        };
        Ok(Self {
            os: os_kind,
            arch: arch_kind,
        })
    }

    /// The tag matched against manifest entries, e.g. `linux-amd64`.
    #[must_use]
    pub fn release_tag(&self) -> String {
        self.to_string()
    }

    /// Whether the host is expected to run systemd.
    #[must_use]
    pub fn supports_systemd(&self) -> bool {
        self.os == Os::Linux
    }

    /// Fail unless this platform can host a systemd unit.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::NoSystemd` on non-Linux hosts.
    pub fn require_systemd(&self) -> Result<(), PlatformError> {
        if self.supports_systemd() {
            Ok(())
        } else {
            Err(PlatformError::NoSystemd(self.to_string()))
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Os::Linux => "linux",
            Os::Darwin => "darwin",
        })
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
        })
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}
