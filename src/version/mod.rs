// src/version/mod.rs

//! Version handling and constraint expressions for recipe requirements
//!
//! Versions are dotted strings whose segments may carry an alphabetic
//! suffix (`1.78.0`, `1.1.1o`). Constraints come in three forms:
//!
//! - exact pin: `1.78.0` or `=1.78.0`
//! - lower bound: `>=1.1.1`
//! - bounded range: `[>=1.1 <3.0]`, `>=1.1 <3.0` or `>=1.1, <3.0`
//!
//! The engine never checks whether a constraint can be satisfied; that is
//! left to whatever fetches dependencies. `satisfies` is provided for
//! those collaborators.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// A parsed dotted version
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Segment {
    number: u64,
    suffix: String,
}

impl Segment {
    fn parse(s: &str) -> Self {
        let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (digits, suffix) = s.split_at(split);
        Self {
            number: digits.parse().unwrap_or(0),
            suffix: suffix.to_string(),
        }
    }
}

impl Version {
    /// Parse a version string
    ///
    /// Examples:
    /// - "1.78.0" → [1, 78, 0]
    /// - "1.1.1o" → [1, 1, 1o]
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::ParseError("Empty version".to_string()));
        }
        if s.chars().any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '=' | '[' | ']' | ',')) {
            return Err(Error::ParseError(format!("Invalid version '{}'", s)));
        }
        if !s.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(Error::ParseError(format!(
                "Version '{}' must start with a digit",
                s
            )));
        }

        Ok(Self {
            raw: s.to_string(),
            segments: s.split('.').map(Segment::parse).collect(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Compare two versions segment by segment
    ///
    /// Missing trailing segments count as zero, so `1.2` == `1.2.0`.
    pub fn compare(&self, other: &Version) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        let zero = Segment {
            number: 0,
            suffix: String::new(),
        };

        for i in 0..len {
            let a = self.segments.get(i).unwrap_or(&zero);
            let b = other.segments.get(i).unwrap_or(&zero);
            match a.number.cmp(&b.number) {
                Ordering::Equal => {}
                ord => return ord,
            }
            match a.suffix.cmp(&b.suffix) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }

        Ordering::Equal
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Version constraint attached to a requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionConstraint {
    /// Exactly this version
    Exact(Version),
    /// This version or newer
    AtLeast(Version),
    /// At least `min`, strictly below `max`
    Range { min: Version, max: Version },
}

impl VersionConstraint {
    /// Parse a version constraint string
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let inner = match s.strip_prefix('[') {
            Some(rest) => rest.strip_suffix(']').ok_or_else(|| {
                Error::ParseError(format!("Unterminated version range '{}'", s))
            })?,
            None => s,
        };

        let parts: Vec<&str> = inner
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();

        match parts.as_slice() {
            [] => Err(Error::ParseError("Empty version constraint".to_string())),
            [single] => {
                if let Some(rest) = single.strip_prefix(">=") {
                    Ok(Self::AtLeast(Version::parse(rest)?))
                } else if let Some(rest) = single.strip_prefix('=') {
                    Ok(Self::Exact(Version::parse(rest)?))
                } else {
                    Ok(Self::Exact(Version::parse(single)?))
                }
            }
            [lower, upper] => {
                let min = lower.strip_prefix(">=").ok_or_else(|| {
                    Error::ParseError(format!("Range '{}' must start with >=", s))
                })?;
                let max = upper.strip_prefix('<').ok_or_else(|| {
                    Error::ParseError(format!("Range '{}' must end with <", s))
                })?;
                let min = Version::parse(min)?;
                let max = Version::parse(max)?;
                if min >= max {
                    return Err(Error::ParseError(format!("Empty version range '{}'", s)));
                }
                Ok(Self::Range { min, max })
            }
            _ => Err(Error::ParseError(format!("Invalid version constraint '{}'", s))),
        }
    }

    /// Check if a version satisfies this constraint
    pub fn satisfies(&self, version: &Version) -> bool {
        match self {
            Self::Exact(v) => version == v,
            Self::AtLeast(v) => version >= v,
            Self::Range { min, max } => version >= min && version < max,
        }
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(v) => write!(f, "{}", v),
            Self::AtLeast(v) => write!(f, "[>={}]", v),
            Self::Range { min, max } => write!(f, "[>={} <{}]", min, max),
        }
    }
}

impl Serialize for VersionConstraint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionConstraint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_version_compare_numeric() {
        assert!(v("1.78.0") > v("1.9.0"));
        assert_eq!(v("1.2"), v("1.2.0"));
    }

    #[test]
    fn test_version_compare_letter_suffix() {
        // OpenSSL style letter releases
        assert!(v("1.1.1o") > v("1.1.1n"));
        assert!(v("1.1.1o") > v("1.1.1"));
        assert!(v("1.1.1o") < v("1.1.2"));
    }

    #[test]
    fn test_version_parse_rejects_garbage() {
        assert!(Version::parse("").is_err());
        assert!(Version::parse("latest").is_err());
        assert!(Version::parse("1.0 2.0").is_err());
    }

    #[test]
    fn test_constraint_exact() {
        let c = VersionConstraint::parse("1.78.0").unwrap();
        assert_eq!(c, VersionConstraint::Exact(v("1.78.0")));
        assert!(c.satisfies(&v("1.78.0")));
        assert!(!c.satisfies(&v("1.79.0")));
        assert_eq!(VersionConstraint::parse("=1.78.0").unwrap(), c);
    }

    #[test]
    fn test_constraint_lower_bound() {
        let c = VersionConstraint::parse(">=1.1.1").unwrap();
        assert!(c.satisfies(&v("1.1.1o")));
        assert!(c.satisfies(&v("3.0.0")));
        assert!(!c.satisfies(&v("1.0.2")));
        assert_eq!(c.to_string(), "[>=1.1.1]");
    }

    #[test]
    fn test_constraint_range_forms() {
        let bracketed = VersionConstraint::parse("[>=1.1 <3.0]").unwrap();
        let bare = VersionConstraint::parse(">=1.1 <3.0").unwrap();
        let comma = VersionConstraint::parse(">=1.1, <3.0").unwrap();
        assert_eq!(bracketed, bare);
        assert_eq!(bracketed, comma);

        assert!(bracketed.satisfies(&v("1.1.1o")));
        assert!(!bracketed.satisfies(&v("3.0")));
        assert_eq!(bracketed.to_string(), "[>=1.1 <3.0]");
    }

    #[test]
    fn test_constraint_invalid() {
        assert!(VersionConstraint::parse("").is_err());
        assert!(VersionConstraint::parse("[>=1.0").is_err());
        assert!(VersionConstraint::parse("<2.0 >=1.0").is_err());
        assert!(VersionConstraint::parse("[>=2.0 <1.0]").is_err());
        assert!(VersionConstraint::parse(">=1 <2 <3").is_err());
    }
}
