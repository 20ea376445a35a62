//! Rule manifest: a TOML list of rules and their raw declared inputs.
//!
//! ```toml
//! [[rule]]
//! target = "//src/com/facebook:Main"
//! inputs = ["A.java", ":works", "//src/com/facebook/demo:demo"]
//! ```

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;

use crate::catalogue::KnownTargets;
use crate::error::Error;
use crate::target::TargetIdentifier;

/// Default manifest file name, relative to the project root.
pub const DEFAULT_MANIFEST: &str = "rules.toml";

/// One declared rule.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RuleDecl {
    /// Raw inputs exactly as written, in declaration order.
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Fully qualified target of the rule.
    pub target: TargetIdentifier,
}

/// The manifest as a whole. Constructed only via `RuleManifest::parse()` or
/// `RuleManifest::read()`, both of which reject duplicate targets.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleManifest {
    /// Declared rules in file order.
    #[serde(default, rename = "rule")]
    pub rules: Vec<RuleDecl>,
}

impl RuleManifest {
    /// Parse a manifest from TOML content.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the content is not valid TOML or a target
    /// is malformed, or `Error::DuplicateRule` if a target repeats.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let manifest: Self = toml::from_str(content)?;
        enforce_unique_targets(&manifest.rules)?;
        return Ok(manifest);
    }

    /// Read and parse a manifest from disk.
    ///
    /// # Errors
    ///
    /// Returns `Error::ManifestNotFound` if the file doesn't exist,
    /// `Error::Io` for other read failures, or any error of `parse`.
    pub fn read(path: &Path) -> Result<Self, Error> {
        let content = match std::fs::read_to_string(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ManifestNotFound { path: path.to_path_buf() });
            },
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        let manifest = Self::parse(&content)?;
        tracing::info!(path = %path.display(), rules = manifest.rules.len(), "loaded rule manifest");
        return Ok(manifest);
    }

    /// The build universe declared by this manifest.
    pub fn known_targets(&self) -> KnownTargets {
        return self.rules.iter().map(|r| r.target.clone()).collect();
    }
}

/// Reject a manifest that declares a target more than once.
///
/// # Errors
///
/// Returns `Error::DuplicateRule` naming the first repeated target.
fn enforce_unique_targets(rules: &[RuleDecl]) -> Result<(), Error> {
    let mut seen = BTreeSet::new();
    for rule in rules {
        if !seen.insert(&rule.target) {
            return Err(Error::DuplicateRule { target: rule.target.clone() });
        }
    }
    return Ok(());
}
