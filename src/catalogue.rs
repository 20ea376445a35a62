//! The build universe: which targets are defined.

use std::collections::BTreeSet;

use crate::package_index::PackageBoundaryIndex;
use crate::target::TargetIdentifier;

/// Answers whether a target names a defined rule. Shared read-only across
/// concurrent rule constructions, hence `Sync`.
pub trait TargetCatalogue: Sync {
    /// Whether `target` is defined in the build universe being parsed.
    fn is_known_target(&self, target: &TargetIdentifier) -> bool;
}

/// An explicit set of defined rules.
#[derive(Debug, Clone, Default)]
pub struct KnownTargets {
    /// Defined targets, ordered for deterministic listing.
    targets: BTreeSet<TargetIdentifier>,
}

impl KnownTargets {
    /// Empty universe.
    pub fn new() -> Self {
        return Self::default();
    }

    /// Record a defined rule. Returns `false` if it was already present.
    pub fn insert(&mut self, target: TargetIdentifier) -> bool {
        return self.targets.insert(target);
    }

    /// Defined targets in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &TargetIdentifier> {
        return self.targets.iter();
    }

    /// Number of defined targets.
    pub fn len(&self) -> usize {
        return self.targets.len();
    }

    /// Whether no targets are defined.
    pub fn is_empty(&self) -> bool {
        return self.targets.is_empty();
    }
}

impl FromIterator<TargetIdentifier> for KnownTargets {
    fn from_iter<I: IntoIterator<Item = TargetIdentifier>>(iter: I) -> Self {
        return Self { targets: iter.into_iter().collect() };
    }
}

impl TargetCatalogue for KnownTargets {
    fn is_known_target(&self, target: &TargetIdentifier) -> bool {
        return self.targets.contains(target);
    }
}

/// Package-level check: a target is considered defined when its package
/// directory holds a build file. Used when the individual rules are not
/// known, e.g. before the package's build file has been evaluated.
impl TargetCatalogue for PackageBoundaryIndex {
    fn is_known_target(&self, target: &TargetIdentifier) -> bool {
        return self.is_package_root(target.package());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests")]
mod tests {
    use super::*;

    #[test]
    fn known_targets_is_exact() {
        let known: KnownTargets = ["//a:x", "//a/b:y"].iter().map(|s| s.parse::<TargetIdentifier>().unwrap()).collect();
        assert!(known.is_known_target(&"//a:x".parse().unwrap()));
        assert!(!known.is_known_target(&"//a:y".parse().unwrap()));
        assert_eq!(known.len(), 2);
    }

    #[test]
    fn insert_reports_duplicates() {
        let mut known = KnownTargets::new();
        assert!(known.insert("//a:x".parse().unwrap()));
        assert!(!known.insert("//a:x".parse().unwrap()));
    }

    #[test]
    fn index_knows_targets_in_existing_packages() {
        let index = PackageBoundaryIndex::from_package_roots(["src/com/facebook"]);
        assert!(index.is_known_target(&"//src/com/facebook:anything".parse().unwrap()));
        assert!(!index.is_known_target(&"//does/not:exist".parse().unwrap()));
    }
}
