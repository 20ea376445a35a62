//! Resolution of a rule's declared inputs into typed source references.
//!
//! Every raw input is classified by syntax alone: `//...` and `:...` are
//! targets, anything else is a path relative to the rule's package. Paths
//! must not contain `..` and must be owned by the rule's own package.

use std::collections::BTreeSet;

use crate::catalogue::TargetCatalogue;
use crate::error::Error;
use crate::package_index::PackageBoundaryIndex;
use crate::paths;
use crate::source_ref::{FileReference, SourceReference};
use crate::target::{self, TargetIdentifier};

/// Receives the dependencies a rule picks up while its inputs resolve.
/// Adding the same dependency twice is not an error.
pub trait DependencySink {
    /// Record that the rule under construction depends on `target`.
    fn add_dependency(&mut self, target: TargetIdentifier);
}

impl DependencySink for Vec<TargetIdentifier> {
    fn add_dependency(&mut self, target: TargetIdentifier) {
        self.push(target);
    }
}

impl DependencySink for BTreeSet<TargetIdentifier> {
    fn add_dependency(&mut self, target: TargetIdentifier) {
        self.insert(target);
    }
}

/// Outcome of resolving one input: the typed reference plus the
/// dependencies the caller must merge into the rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Dependencies recorded by this input (empty for files).
    pub dependencies: Vec<TargetIdentifier>,
    /// The resolved input.
    pub reference: SourceReference,
}

/// Per-rule resolution context: the rule being defined, the package index,
/// and the catalogue of defined targets. Holds no mutable state, so one
/// context per rule may run concurrently with others.
#[derive(Clone, Copy)]
pub struct SourceReferenceResolver<'a> {
    /// Defined targets, for existence checks on target references.
    catalogue: &'a dyn TargetCatalogue,
    /// Package boundaries of the source tree.
    index: &'a PackageBoundaryIndex,
    /// The rule whose inputs are being resolved; its package is the base.
    target: &'a TargetIdentifier,
}

impl<'a> SourceReferenceResolver<'a> {
    /// Context for resolving the inputs of `target`.
    pub fn new(
        target: &'a TargetIdentifier,
        index: &'a PackageBoundaryIndex,
        catalogue: &'a dyn TargetCatalogue,
    ) -> Self {
        return Self { catalogue, index, target };
    }

    /// The rule being defined.
    pub const fn target(&self) -> &TargetIdentifier {
        return self.target;
    }

    /// Resolve a file-path input relative to the rule's package directory.
    /// Returns the source-root-relative path. Existence on disk is not
    /// checked; only the boundary is.
    ///
    /// # Errors
    ///
    /// Returns `Error::ParentTraversal` if `raw` has a `..` segment anywhere,
    /// `Error::InvalidPath` if it is empty or absolute,
    /// `Error::NoOwningPackage` if the containing directory is unowned,
    /// or `Error::PackageBoundary` if another package owns it.
    pub fn resolve_path(&self, raw: &str) -> Result<String, Error> {
        let package = self.target.package();

        if paths::has_parent_segment(raw) {
            return Err(self.reject(Error::ParentTraversal {
                target: self.target.clone(),
                attempted_path: paths::join(package, raw),
            }));
        }
        if raw.starts_with('/') || raw.starts_with('\\') {
            return Err(self.reject(Error::InvalidPath {
                target: self.target.clone(),
                attempted_path: raw.to_string(),
                reason: "absolute paths are not allowed",
            }));
        }
        let relative = paths::normalize(raw);
        if relative.is_empty() {
            return Err(self.reject(Error::InvalidPath {
                target: self.target.clone(),
                attempted_path: raw.to_string(),
                reason: "path is empty",
            }));
        }

        let candidate = paths::join(package, &relative);
        let owner = self.index.owning_package_of(paths::parent(&candidate)).map_err(|e| self.reject(e))?;
        if owner != package {
            return Err(self.reject(Error::PackageBoundary {
                target: self.target.clone(),
                attempted_path: candidate,
                owner: owner.to_string(),
            }));
        }

        return Ok(candidate);
    }

    /// Classify and resolve one declared input. Target syntax is parsed
    /// against the rule's package and must name a defined rule; everything
    /// else goes through [`Self::resolve_path`].
    ///
    /// # Errors
    ///
    /// Returns `Error::MalformedTarget` or `Error::UnknownTarget` for target
    /// syntax, or any error of [`Self::resolve_path`] for paths.
    pub fn resolve_source_or_target(&self, raw: &str) -> Result<Resolution, Error> {
        tracing::debug!(rule = %self.target, raw, "resolving input");

        if !target::is_target_syntax(raw) {
            let path = self.resolve_path(raw)?;
            return Ok(Resolution {
                dependencies: Vec::new(),
                reference: SourceReference::File(FileReference { path }),
            });
        }

        let id = target::parse(raw, self.target.package()).map_err(|e| self.reject(e))?;
        if !self.catalogue.is_known_target(&id) {
            return Err(self.reject(Error::UnknownTarget {
                attempted: id,
                context: self.target.clone(),
            }));
        }

        return Ok(Resolution {
            dependencies: vec![id.clone()],
            reference: SourceReference::Target { target: id },
        });
    }

    /// Resolve one input and push its dependencies into `sink`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::resolve_source_or_target`]; on error nothing reaches
    /// the sink.
    pub fn resolve_into<S: DependencySink + ?Sized>(
        &self,
        raw: &str,
        sink: &mut S,
    ) -> Result<SourceReference, Error> {
        let resolution = self.resolve_source_or_target(raw)?;
        for dependency in resolution.dependencies {
            sink.add_dependency(dependency);
        }
        return Ok(resolution.reference);
    }

    /// Log a rejection and hand the error back.
    fn reject(&self, error: Error) -> Error {
        tracing::debug!(rule = %self.target, kind = error.kind(), "input rejected");
        return error;
    }
}

/// Inputs of one rule under construction: references in declaration order
/// and the merged, de-duplicated dependency set.
#[derive(Debug, Clone)]
pub struct RuleInputs {
    /// Dependencies merged from every target input.
    dependencies: BTreeSet<TargetIdentifier>,
    /// Resolved inputs in declaration order.
    inputs: Vec<SourceReference>,
    /// The rule these inputs belong to.
    target: TargetIdentifier,
}

impl RuleInputs {
    /// Empty input set for `target`.
    pub const fn new(target: TargetIdentifier) -> Self {
        return Self {
            dependencies: BTreeSet::new(),
            inputs: Vec::new(),
            target,
        };
    }

    /// Resolve every raw input of a rule in order. The first bad input
    /// aborts the rule.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`SourceReferenceResolver::resolve_source_or_target`].
    pub fn resolve_all<I, S>(resolver: &SourceReferenceResolver<'_>, raws: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rule = Self::new(resolver.target().clone());
        for raw in raws {
            let resolution = resolver.resolve_source_or_target(raw.as_ref())?;
            rule.merge(resolution);
        }
        return Ok(rule);
    }

    /// Fold one resolution into the rule.
    pub fn merge(&mut self, resolution: Resolution) {
        for dependency in resolution.dependencies {
            self.add_dependency(dependency);
        }
        self.inputs.push(resolution.reference);
    }

    /// The rule these inputs belong to.
    pub const fn target(&self) -> &TargetIdentifier {
        return &self.target;
    }

    /// Resolved inputs in declaration order.
    pub fn inputs(&self) -> &[SourceReference] {
        return &self.inputs;
    }

    /// Dependencies in sorted order.
    pub fn dependencies(&self) -> impl Iterator<Item = &TargetIdentifier> {
        return self.dependencies.iter();
    }
}

impl DependencySink for RuleInputs {
    fn add_dependency(&mut self, target: TargetIdentifier) {
        self.dependencies.insert(target);
    }
}
