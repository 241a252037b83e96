//! Version ordering for installed components.
//!
//! SDK and runtime directories are named after their version
//! (`8.0.100`, `9.0.0-preview.1.24080.9`, ...). [`VersionKey`] turns such a
//! name into a totally ordered key so that installations can be ranked.
//!
//! ```
//! use dotnet_locator::version::VersionKey;
//!
//! assert!(VersionKey::parse("8.0.200") > VersionKey::parse("8.0.100"));
//! assert!(VersionKey::parse("8.0.100") > VersionKey::parse("8.0.100-rc.2"));
//! assert!(VersionKey::parse("not a version") < VersionKey::parse("0.0.0-x"));
//! ```

use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

static RE_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\.(\d+)\.(\d+)(?:-(.+))?$").expect("version pattern is valid")
});

/// Coarse ranking bucket for a version string.
///
/// Declaration order is ranking order: later variants rank higher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    /// The string did not match the version grammar.
    Invalid,
    /// Prerelease with an unrecognized label.
    Other,
    Alpha,
    Preview,
    Beta,
    /// Release candidate.
    Rc,
    /// No prerelease suffix.
    Release,
}

impl Rank {
    /// Classify a prerelease label by its case-insensitive prefix.
    fn from_prerelease(label: &str) -> Self {
        let label = label.to_ascii_lowercase();
        if label.starts_with("rc") {
            Rank::Rc
        } else if label.starts_with("beta") {
            Rank::Beta
        } else if label.starts_with("preview") {
            Rank::Preview
        } else if label.starts_with("alpha") {
            Rank::Alpha
        } else {
            Rank::Other
        }
    }
}

/// Comparable key derived from a `major.minor.patch(-prerelease)?` string.
///
/// Field order matters: the derived ordering compares `major`, `minor`,
/// `patch` and then `rank`. Two prereleases in the same tier compare equal
/// no matter what follows the tier label (`rc.1` == `rc.2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionKey {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub rank: Rank,
}

impl VersionKey {
    /// Key assigned to strings that are not versions. Sorts below every valid key.
    pub const MIN: VersionKey = VersionKey {
        major: 0,
        minor: 0,
        patch: 0,
        rank: Rank::Invalid,
    };

    /// Parse a version string. Never fails; invalid input yields [`VersionKey::MIN`].
    pub fn parse(version: &str) -> Self {
        Self::try_parse(version).unwrap_or(Self::MIN)
    }

    fn try_parse(version: &str) -> Option<Self> {
        let caps = RE_VERSION.captures(version.trim())?;
        let number = |i: usize| caps.get(i)?.as_str().parse::<u64>().ok();
        let rank = match caps.get(4) {
            Some(label) => Rank::from_prerelease(label.as_str()),
            None => Rank::Release,
        };
        Some(Self {
            major: number(1)?,
            minor: number(2)?,
            patch: number(3)?,
            rank,
        })
    }

    /// Whether the key came from a string matching the version grammar.
    pub fn is_valid(&self) -> bool {
        self.rank != Rank::Invalid
    }

    /// Whether the version carries a prerelease suffix.
    pub fn is_prerelease(&self) -> bool {
        !matches!(self.rank, Rank::Release | Rank::Invalid)
    }
}

/// Check whether a string matches the version grammar.
pub fn is_valid(version: &str) -> bool {
    VersionKey::parse(version).is_valid()
}

/// Compare two version strings by their keys.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    VersionKey::parse(a).cmp(&VersionKey::parse(b))
}
