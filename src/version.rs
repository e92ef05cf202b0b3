//! Semantic version bumping for published skills.

use std::{fmt, str::FromStr};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Version used when there is no usable previous version.
pub const INITIAL_VERSION: &str = "1.0.0";

/// Semantic-version increment category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishBump {
    /// Breaking change.
    Major,
    /// New functionality.
    Minor,
    /// Fixes only.
    #[default]
    Patch,
}

/// A `major.minor.patch` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SemVer {
    /// Major component.
    pub major: u64,
    /// Minor component.
    pub minor: u64,
    /// Patch component.
    pub patch: u64,
}

/// Rejected version string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSemVerError;

impl fmt::Display for ParseSemVerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected three dot-separated integers")
    }
}

impl FromStr for SemVer {
    type Err = ParseSemVerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.split('.').map(|part| part.parse::<u64>());
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(Ok(major)), Some(Ok(minor)), Some(Ok(patch)), None) => Ok(Self {
                major,
                minor,
                patch,
            }),
            _ => Err(ParseSemVerError),
        }
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl SemVer {
    /// Apply a bump, returning `None` if a component would overflow.
    pub fn bumped(self, kind: PublishBump) -> Option<Self> {
        Some(match kind {
            PublishBump::Major => Self {
                major: self.major.checked_add(1)?,
                minor: 0,
                patch: 0,
            },
            PublishBump::Minor => Self {
                minor: self.minor.checked_add(1)?,
                patch: 0,
                ..self
            },
            PublishBump::Patch => Self {
                patch: self.patch.checked_add(1)?,
                ..self
            },
        })
    }
}

/// Compute the version following `current`, or `None` when it cannot be parsed.
pub fn bump_version(current: &str, kind: PublishBump) -> Option<String> {
    let version = current.parse::<SemVer>().ok()?;
    version.bumped(kind).map(|next| next.to_string())
}

/// Target version for a publish: the bump of `previous`, or [`INITIAL_VERSION`].
pub fn next_version(previous: Option<&str>, kind: PublishBump) -> String {
    previous
        .and_then(|previous| bump_version(previous, kind))
        .unwrap_or_else(|| INITIAL_VERSION.to_string())
}
