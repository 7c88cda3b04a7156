// src/version/mod.rs

//! Version handling for bucket manifests
//!
//! Manifest versions are loosely structured: dotted numbers, optional
//! pre-release words (`1.2.0-beta3`), build suffixes (`2.40.1.windows.1`)
//! and the occasional `nightly`. Valid semver strings are compared with
//! `semver`; everything else falls back to segment-wise comparison.

use crate::error::{Error, Result};
use semver::Version;
use std::cmp::Ordering;
use std::fmt;

/// One comparable piece of a version string
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Run of ASCII digits, leading zeros stripped
    Number(String),
    /// Run of anything else, lowercased
    Text(String),
}

impl Segment {
    fn compare(&self, other: &Segment) -> Ordering {
        match (self, other) {
            // Length first so arbitrarily long numbers never overflow
            (Segment::Number(a), Segment::Number(b)) => {
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            (Segment::Text(a), Segment::Text(b)) => a.cmp(b),
            (Segment::Number(_), Segment::Text(_)) => Ordering::Greater,
            (Segment::Text(_), Segment::Number(_)) => Ordering::Less,
        }
    }
}

/// A parsed manifest version
#[derive(Debug, Clone)]
pub struct ManifestVersion {
    raw: String,
    segments: Vec<Segment>,
}

impl ManifestVersion {
    /// Parse a manifest version string
    ///
    /// Examples:
    /// - "1.2.3" → [1, 2, 3]
    /// - "2.40.1.windows.1" → [2, 40, 1, windows, 1]
    /// - "1.0-beta3" → [1, 0, beta, 3]
    pub fn parse(s: &str) -> Result<Self> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(Error::InvalidVersion("empty version string".to_string()));
        }

        let mut segments = Vec::new();
        for token in raw.split(['.', '-', '_', '+']).filter(|t| !t.is_empty()) {
            split_token(token, &mut segments);
        }

        if segments.is_empty() {
            return Err(Error::InvalidVersion(format!(
                "no version components in '{}'",
                raw
            )));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// Whether this is a rolling `nightly` build
    pub fn is_nightly(&self) -> bool {
        self.raw.eq_ignore_ascii_case("nightly")
            || self.raw.to_ascii_lowercase().starts_with("nightly-")
    }

    /// Compare two manifest versions
    pub fn compare(&self, other: &ManifestVersion) -> Ordering {
        if self.raw == other.raw {
            return Ordering::Equal;
        }

        // Nightly builds always track the newest upstream state
        match (self.is_nightly(), other.is_nightly()) {
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            _ => {}
        }

        if let (Ok(a), Ok(b)) = (Version::parse(&self.raw), Version::parse(&other.raw)) {
            return a.cmp(&b);
        }

        for (a, b) in self.segments.iter().zip(other.segments.iter()) {
            match a.compare(b) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }

        // Common prefix is equal. A trailing word marks a pre-release
        // ("1.0-beta" < "1.0"), a trailing number a later release.
        let shared = self.segments.len().min(other.segments.len());
        match (self.segments.get(shared), other.segments.get(shared)) {
            (None, None) => Ordering::Equal,
            (Some(Segment::Text(_)), None) => Ordering::Less,
            (Some(Segment::Number(_)), None) => Ordering::Greater,
            (None, Some(Segment::Text(_))) => Ordering::Greater,
            (None, Some(Segment::Number(_))) => Ordering::Less,
            (Some(_), Some(_)) => Ordering::Equal,
        }
    }
}

/// Split a separator-free token like "3beta2" into digit and text runs
fn split_token(token: &str, segments: &mut Vec<Segment>) {
    let mut current = String::new();
    let mut in_digits = false;

    for c in token.chars() {
        let is_digit = c.is_ascii_digit();
        if !current.is_empty() && is_digit != in_digits {
            segments.push(make_segment(&current, in_digits));
            current.clear();
        }
        in_digits = is_digit;
        current.push(c);
    }

    if !current.is_empty() {
        segments.push(make_segment(&current, in_digits));
    }
}

fn make_segment(run: &str, digits: bool) -> Segment {
    if digits {
        let trimmed = run.trim_start_matches('0');
        Segment::Number(if trimmed.is_empty() { "0" } else { trimmed }.to_string())
    } else {
        Segment::Text(run.to_ascii_lowercase())
    }
}

impl fmt::Display for ManifestVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl PartialEq for ManifestVersion {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for ManifestVersion {}

impl Ord for ManifestVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl PartialOrd for ManifestVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two version strings, `None` if either does not parse
pub fn compare_versions(a: &str, b: &str) -> Option<Ordering> {
    let a = ManifestVersion::parse(a).ok()?;
    let b = ManifestVersion::parse(b).ok()?;
    Some(a.compare(&b))
}
