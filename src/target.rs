//! Target identifiers and the target-string grammar.
//!
//! Accepted forms:
//!
//! ```text
//! //path/to/pkg:name   fully qualified
//! //:name              rule in the root package
//! :name                rule in the base package
//! ```
//!
//! A bare `name` is not a target; callers treat it as a file path.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A fully qualified target: owning package path plus short name.
/// Immutable once built; every constructor validates both halves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetIdentifier {
    /// Slash-separated package directory, `""` for the root package.
    package: String,
    /// Short name, never empty, never containing `/` or `:`.
    name: String,
}

impl TargetIdentifier {
    /// Build an identifier from its two halves.
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedTarget` if the package path has empty, `.` or
    /// `..` segments, or the name is empty or contains `/` or `:`.
    pub fn new(package: &str, name: &str) -> Result<Self, Error> {
        let raw = format!("//{package}:{name}");
        validate_package_path(&raw, package)?;
        validate_short_name(&raw, name)?;
        return Ok(Self {
            package: package.to_string(),
            name: name.to_string(),
        });
    }

    /// Package directory relative to the source root.
    pub fn package(&self) -> &str {
        return &self.package;
    }

    /// Short name within the package.
    pub fn name(&self) -> &str {
        return &self.name;
    }

    /// Canonical `//package:name` form, stable for graph keys and diagnostics.
    pub fn as_reference(&self) -> String {
        return self.to_string();
    }
}

impl fmt::Display for TargetIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "//{}:{}", self.package, self.name);
    }
}

impl FromStr for TargetIdentifier {
    type Err = Error;

    /// Parse a fully qualified target. Package-relative `:name` forms need a
    /// base package and go through [`parse`] instead.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.starts_with("//") {
            return Err(Error::MalformedTarget {
                raw: s.to_string(),
                reason: "a fully qualified target must start with `//`",
            });
        }
        return parse(s, "");
    }
}

impl TryFrom<String> for TargetIdentifier {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        return value.parse();
    }
}

impl From<TargetIdentifier> for String {
    fn from(value: TargetIdentifier) -> Self {
        return value.to_string();
    }
}

/// Whether a raw declared input uses target syntax rather than path syntax.
/// Purely syntactic: a file literally named `:foo` is still a target.
pub fn is_target_syntax(raw: &str) -> bool {
    return raw.starts_with("//") || raw.starts_with(':');
}

/// Parse a target string, resolving `:name` against `base_package`.
/// Fully qualified forms ignore `base_package` entirely; short forms hold it
/// to the same package-path rules as `//package`.
///
/// Only the grammar is checked here; whether a rule by that name exists is
/// the resolver's concern.
///
/// # Errors
///
/// Returns `Error::MalformedTarget` naming `raw` if it matches neither form,
/// lacks a `:`, has an invalid package path (including an invalid
/// `base_package` for `:name`), or has an invalid short name.
pub fn parse(raw: &str, base_package: &str) -> Result<TargetIdentifier, Error> {
    if let Some(rest) = raw.strip_prefix("//") {
        let Some((package, name)) = rest.split_once(':') else {
            return Err(Error::MalformedTarget {
                raw: raw.to_string(),
                reason: "missing `:` before the short name",
            });
        };
        validate_package_path(raw, package)?;
        validate_short_name(raw, name)?;
        return Ok(TargetIdentifier {
            package: package.to_string(),
            name: name.to_string(),
        });
    }

    if let Some(name) = raw.strip_prefix(':') {
        validate_package_path(raw, base_package)?;
        validate_short_name(raw, name)?;
        return Ok(TargetIdentifier {
            package: base_package.to_string(),
            name: name.to_string(),
        });
    }

    return Err(Error::MalformedTarget {
        raw: raw.to_string(),
        reason: "expected `//package:name` or `:name`",
    });
}

/// Check a package path: empty (root) or `/`-joined non-empty segments,
/// none of them `.` or `..`.
fn validate_package_path(raw: &str, package: &str) -> Result<(), Error> {
    if package.is_empty() {
        return Ok(());
    }
    for segment in package.split('/') {
        let reason = match segment {
            "" => "package path has an empty segment or a leading/trailing `/`",
            "." => "package path may not contain `.` segments",
            ".." => "package path may not contain `..` segments",
            _ => continue,
        };
        return Err(Error::MalformedTarget {
            raw: raw.to_string(),
            reason,
        });
    }
    return Ok(());
}

/// Check a short name: non-empty, no `/`, no `:`.
fn validate_short_name(raw: &str, name: &str) -> Result<(), Error> {
    let reason = if name.is_empty() {
        "short name is empty"
    } else if name.contains('/') {
        "short name may not contain `/`"
    } else if name.contains(':') {
        "short name may not contain `:`"
    } else {
        return Ok(());
    };
    return Err(Error::MalformedTarget {
        raw: raw.to_string(),
        reason,
    });
}
