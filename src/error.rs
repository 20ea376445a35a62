//! Crate-level error types for srcref diagnostics.
use std::path::PathBuf;

use crate::target::TargetIdentifier;

/// All errors in srcref carry enough context to produce an actionable
/// diagnostic: the offending string, the rule being defined, and where
/// applicable the package that actually owns the path.
#[allow(clippy::error_impl_error, reason = "crate-wide error type")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A rule manifest declares the same target more than once.
    #[error("duplicate rule: {target} is declared more than once")]
    DuplicateRule {
        /// Target declared twice.
        target: TargetIdentifier,
    },

    /// An input path cannot be placed under the rule's package at all.
    #[error("\"{attempted_path}\" in target \"{target}\" is not a valid input path: {reason}")]
    InvalidPath {
        /// Raw input as written in the build definition.
        attempted_path: String,
        /// Why the path was rejected.
        reason: &'static str,
        /// Rule whose input was being resolved.
        target: TargetIdentifier,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization of command output failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// A target string violates the target grammar.
    #[error("malformed build target `{raw}`: {reason}")]
    MalformedTarget {
        /// The string as written.
        raw: String,
        /// Which grammar rule was violated.
        reason: &'static str,
    },

    /// Expected rule manifest does not exist on disk.
    #[error("rule manifest not found: {}", path.display())]
    ManifestNotFound {
        /// Path to the missing manifest.
        path: PathBuf,
    },

    /// A queried directory has no owning package. Indicates a malformed or
    /// incompletely indexed source tree.
    #[error("no package owns directory `{directory}`")]
    NoOwningPackage {
        /// Root-relative directory that was queried.
        directory: String,
    },

    /// A resolved path belongs to a package other than the referencing rule's.
    #[error(
        "\"{attempted_path}\" in target \"{target}\" crosses a package boundary into //{owner}. \
         Find the nearest build file in the directory containing this file and refer to \
         the rule referencing the desired file."
    )]
    PackageBoundary {
        /// Root-relative candidate path.
        attempted_path: String,
        /// Package that actually owns the path.
        owner: String,
        /// Rule whose input was being resolved.
        target: TargetIdentifier,
    },

    /// An input path contains a `..` segment.
    #[error("\"{attempted_path}\" in target \"{target}\" refers to a parent directory.")]
    ParentTraversal {
        /// Unnormalized concatenation of the package directory and the raw input.
        attempted_path: String,
        /// Rule whose input was being resolved.
        target: TargetIdentifier,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// A syntactically valid target names no rule in the build universe.
    #[error("Unable to find build target '{attempted}' while parsing definition of {context}")]
    UnknownTarget {
        /// The target that could not be found.
        attempted: TargetIdentifier,
        /// Rule being defined when the reference was made.
        context: TargetIdentifier,
    },

    /// Directory walk failed while building the package index.
    #[error("walk: {0}")]
    Walk(
        /// The wrapped walkdir error.
        #[from]
        walkdir::Error,
    ),
}

impl Error {
    /// Short machine-friendly name of the failure, used in `check` output.
    pub const fn kind(&self) -> &'static str {
        return match self {
            Error::DuplicateRule { .. } => "duplicate rule",
            Error::InvalidPath { .. } => "invalid path",
            Error::Io(_) => "io",
            Error::Json(_) => "json",
            Error::MalformedTarget { .. } => "malformed target",
            Error::ManifestNotFound { .. } => "manifest not found",
            Error::NoOwningPackage { .. } => "no owning package",
            Error::PackageBoundary { .. } => "package boundary",
            Error::ParentTraversal { .. } => "parent directory",
            Error::TomlDe(_) => "invalid toml",
            Error::UnknownTarget { .. } => "unknown target",
            Error::Walk(_) => "walk",
        };
    }
}
