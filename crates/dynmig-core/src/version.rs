//! Workspace schema versions.
//!
//! A [`Version`] is the `major.minor.build` triple recorded in a workspace
//! file's root `Version` attribute and in migration rule bounds. Files carry
//! a fourth revision component (`0.6.3.20048`), which is parsed and dropped:
//! two files that differ only in revision migrate identically.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A three-component schema version, ordered lexicographically on
/// (major, minor, build).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
}

impl Version {
    /// The version assigned to documents that declare none.
    pub const ZERO: Version = Version::new(0, 0, 0);

    pub const fn new(major: u32, minor: u32, build: u32) -> Self {
        Version { major, minor, build }
    }

    /// Parses a dotted version string with two to four numeric components.
    ///
    /// A missing build component is zero; a revision component is accepted
    /// and discarded.
    pub fn parse(text: &str) -> Result<Version, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidVersion {
            text: text.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = text.trim().split('.').collect();
        if !(2..=4).contains(&parts.len()) {
            return Err(invalid("expected 2 to 4 dotted components"));
        }

        let mut numbers = [0u32; 4];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part
                .trim()
                .parse::<u32>()
                .map_err(|e| invalid(&format!("component '{}': {}", part, e)))?;
        }

        Ok(Version::new(numbers[0], numbers[1], numbers[2]))
    }
}

/// Normalizes a declared version string.
///
/// `None` and the empty string yield [`Version::ZERO`]; anything else goes
/// through [`Version::parse`], which drops the revision.
pub fn normalize_version_string(text: Option<&str>) -> Result<Version, CoreError> {
    match text {
        None => Ok(Version::ZERO),
        Some(t) if t.trim().is_empty() => Ok(Version::ZERO),
        Some(t) => Version::parse(t),
    }
}

/// Orders two versions on (major, minor, build). Revisions never exist on a
/// [`Version`], so they can never take part in the comparison.
pub fn compare_version(a: &Version, b: &Version) -> Ordering {
    a.cmp(b)
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)
    }
}

impl FromStr for Version {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Version::parse(&value)
    }
}

impl From<Version> for String {
    fn from(v: Version) -> Self {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_components() {
        assert_eq!(Version::parse("0.6.3").unwrap(), Version::new(0, 6, 3));
    }

    #[test]
    fn drops_revision() {
        let with_rev = Version::parse("0.6.3.20048").unwrap();
        assert_eq!(with_rev, Version::new(0, 6, 3));
        assert_eq!(with_rev, Version::parse("0.6.3").unwrap());
    }

    #[test]
    fn two_components_default_build_to_zero() {
        assert_eq!(Version::parse("1.2").unwrap(), Version::new(1, 2, 0));
    }

    #[test]
    fn rejects_single_component() {
        assert!(matches!(
            Version::parse("7"),
            Err(CoreError::InvalidVersion { .. })
        ));
    }

    #[test]
    fn rejects_non_numeric() {
        assert!(Version::parse("0.x.1").is_err());
        assert!(Version::parse("0.6.-1").is_err());
        assert!(Version::parse("1.2.3.4.5").is_err());
    }

    #[test]
    fn normalize_empty_and_missing_yield_zero() {
        assert_eq!(normalize_version_string(None).unwrap(), Version::ZERO);
        assert_eq!(normalize_version_string(Some("")).unwrap(), Version::ZERO);
        assert_eq!(Version::ZERO, Version::new(0, 0, 0));
    }

    #[test]
    fn normalize_equates_revisions() {
        let a = normalize_version_string(Some("0.6.3.20048")).unwrap();
        let b = normalize_version_string(Some("0.6.3")).unwrap();
        assert_eq!(compare_version(&a, &b), Ordering::Equal);
    }

    #[test]
    fn ordering_is_lexicographic() {
        let v = |s| Version::parse(s).unwrap();
        assert!(v("0.6.5") < v("0.7.0"));
        assert!(v("0.10.0") > v("0.9.9"));
        assert!(v("1.0.0") > v("0.99.99"));
        assert_eq!(compare_version(&v("0.7.0.1"), &v("0.7.0.9")), Ordering::Equal);
    }

    #[test]
    fn display_has_three_components() {
        assert_eq!(Version::parse("0.7.0.0").unwrap().to_string(), "0.7.0");
    }

    #[test]
    fn serde_roundtrip_as_string() {
        let v = Version::new(0, 6, 3);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "\"0.6.3\"");
        let back: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
