//! Resolved rule inputs: either a plain file or another rule's output.
use std::fmt;

use serde::Serialize;

use crate::target::TargetIdentifier;

/// A source file, addressed by its source-root-relative path. The path has
/// already passed the parent-segment and package-boundary checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FileReference {
    /// Slash-separated path relative to the source root.
    pub path: String,
}

/// A resolved input. Consumers match exhaustively rather than probing for
/// the variant they expect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceReference {
    /// Plain file in the rule's own package.
    File(FileReference),
    /// Output of another rule.
    Target {
        /// The rule producing the input.
        target: TargetIdentifier,
    },
}

impl SourceReference {
    /// Canonical string form used for display, logging, and hashing:
    /// `pkg/file.ext` for files, `//pkg:name` for targets.
    pub fn as_reference(&self) -> String {
        return match self {
            SourceReference::File(file) => file.path.clone(),
            SourceReference::Target { target } => target.as_reference(),
        };
    }

    /// The referenced rule, if this input is another rule's output.
    pub const fn target(&self) -> Option<&TargetIdentifier> {
        return match self {
            SourceReference::File(_) => None,
            SourceReference::Target { target } => Some(target),
        };
    }
}

impl fmt::Display for SourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return match self {
            SourceReference::File(file) => f.write_str(&file.path),
            SourceReference::Target { target } => write!(f, "{target}"),
        };
    }
}
