//! Release manifest parsing and artifact selection.
//!
//! The release host publishes a plaintext listing with one artifact filename
//! per line. Artifacts for a platform are found by substring match on the
//! `os-arch` tag; each executable may be accompanied by a `.dgst` file and
//! one or more `.dgst.sig.N` signature files.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::ManifestError;

/// Prefix of the node executable in the release listing.
pub const NODE_PREFIX: &str = "node-";

/// Prefix of the client executable in the client release listing.
pub const CLIENT_PREFIX: &str = "qclient-";

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // compile-time constant pattern
    Regex::new(r"^[A-Za-z]+-(\d+(?:\.\d+)*)-").expect("valid version pattern")
});

/// What kind of file a manifest entry names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// An executable.
    Binary,
    /// A `.dgst` checksum file.
    Digest,
    /// A signature over a digest (`.sig`, `.sig.1`, ...).
    Signature,
}

/// A single entry of the release manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
}

impl Artifact {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[must_use]
    pub fn kind(&self) -> ArtifactKind {
        if is_signature_name(&self.name) {
            ArtifactKind::Signature
        } else if self.name.ends_with(".dgst") {
            ArtifactKind::Digest
        } else {
            ArtifactKind::Binary
        }
    }

    /// Name of the `.dgst` companion this binary would have.
    #[must_use]
    pub fn digest_name(&self) -> String {
        format!("{}.dgst", self.name)
    }

    /// Parse the release version out of `node-<version>-<os>-<arch>`.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::BadVersion` when the name carries no version.
    pub fn version(&self) -> Result<ReleaseVersion, ManifestError> {
        let caps = VERSION_RE
            .captures(&self.name)
            .ok_or_else(|| ManifestError::BadVersion(self.name.clone()))?;
        ReleaseVersion::parse(&caps[1]).ok_or_else(|| ManifestError::BadVersion(self.name.clone()))
    }
}

/// `*.sig` or `*.sig.<N>`.
fn is_signature_name(name: &str) -> bool {
    if name.ends_with(".sig") {
        return true;
    }
    name.rsplit_once(".sig.")
        .is_some_and(|(_, n)| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

/// Parsed release listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseManifest {
    artifacts: Vec<Artifact>,
}

impl ReleaseManifest {
    /// Parse the plaintext listing. Blank lines and anything that is not a
    /// bare filename (contains `/` or inner whitespace) are dropped.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let artifacts = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .filter(|l| !l.contains('/') && !l.contains(char::is_whitespace))
            .map(Artifact::new)
            .collect();
        Self { artifacts }
    }

    /// Keep only the entries whose name contains `tag` (e.g. `linux-amd64`).
    #[must_use]
    pub fn for_platform(&self, tag: &str) -> Self {
        Self {
            artifacts: self
                .artifacts
                .iter()
                .filter(|a| a.name.contains(tag))
                .cloned()
                .collect(),
        }
    }

    #[must_use]
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Entries belonging to the executable starting with `prefix`, i.e. the
    /// binary itself plus its digest and signature files.
    #[must_use]
    pub fn with_prefix(&self, prefix: &str) -> Vec<&Artifact> {
        self.artifacts
            .iter()
            .filter(|a| a.name.starts_with(prefix))
            .collect()
    }

    /// The single executable whose name starts with `prefix`.
    ///
    /// # Errors
    ///
    /// `ManifestError::NoBinary` when none match, `ManifestError::Ambiguous`
    /// when more than one does.
    pub fn binary(&self, prefix: &str) -> Result<&Artifact, ManifestError> {
        let matches: Vec<&Artifact> = self
            .artifacts
            .iter()
            .filter(|a| a.name.starts_with(prefix) && a.kind() == ArtifactKind::Binary)
            .collect();
        match matches.as_slice() {
            [] => Err(ManifestError::NoBinary(prefix.trim_end_matches('-').to_string())),
            [one] => Ok(one),
            many => Err(ManifestError::Ambiguous {
                prefix: prefix.trim_end_matches('-').to_string(),
                found: many
                    .iter()
                    .map(|a| a.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}

/// Join the artifact host and a filename with exactly one `/`.
#[must_use]
pub fn artifact_url(base: &str, name: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), name.trim_start_matches('/'))
}

/// A dotted numeric release version of arbitrary length (`2.0.6.1`).
#[derive(Debug, Clone)]
pub struct ReleaseVersion(Vec<u64>);

impl ReleaseVersion {
    /// Parse `a.b.c...`; returns `None` for empty or non-numeric components.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let parts = s
            .trim()
            .trim_start_matches('v')
            .split('.')
            .map(|p| p.parse::<u64>().ok())
            .collect::<Option<Vec<_>>>()?;
        if parts.is_empty() {
            return None;
        }
        Some(Self(parts))
    }
}

impl Ord for ReleaseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        for i in 0..len {
            let a = self.0.get(i).copied().unwrap_or(0);
            let b = other.0.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => {}
                non_eq => return non_eq,
            }
        }
        Ordering::Equal
    }
}

impl PartialEq for ReleaseVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ReleaseVersion {}

impl PartialOrd for ReleaseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self
            .0
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(".");
        f.write_str(&s)
    }
}
