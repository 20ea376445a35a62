//! Package-boundary index: which package owns a directory.
//!
//! A package is a directory holding the build-file marker plus everything
//! beneath it up to the next nested marker. The index is built by one walk
//! of the source tree and is read-only afterwards, so it can be shared
//! across threads without synchronization.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Error;
use crate::paths;

/// Maps directories to their owning package (nearest ancestor, inclusive,
/// that is a package root).
#[derive(Debug, Clone, Default)]
pub struct PackageBoundaryIndex {
    /// Every package root, slash-separated and root-relative.
    package_roots: BTreeSet<String>,
    /// Owner of each owned directory seen during the walk.
    owners: HashMap<String, String>,
}

impl PackageBoundaryIndex {
    /// Walk `root` once and record every package root and the owner of
    /// every directory visited. Directories named in `config.ignore` are
    /// neither visited nor descended into.
    ///
    /// # Errors
    ///
    /// Returns `Error::Walk` if a directory cannot be read.
    pub fn construct(root: &Path, config: &Config) -> Result<Self, Error> {
        let mut index = Self::default();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| return e.depth() == 0 || !is_ignored_dir(e, config));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_dir() {
                continue;
            }
            let Some(dir) = entry.path().strip_prefix(root).ok().and_then(paths::to_slash) else {
                tracing::warn!(path = %entry.path().display(), "skipping directory with a non-UTF-8 path");
                continue;
            };

            let has_marker = entry.path().join(&config.build_file_name).is_file();
            if has_marker || (dir.is_empty() && config.root_is_package) {
                tracing::debug!(package = %dir, "found package root");
                index.package_roots.insert(dir.clone());
                index.owners.insert(dir.clone(), dir);
                continue;
            }

            // Walk order is pre-order, so the parent is already recorded if owned.
            if let Some(owner) = index.owners.get(paths::parent(&dir)).cloned() {
                index.owners.insert(dir, owner);
            }
        }

        tracing::info!(
            root = %root.display(),
            packages = index.package_roots.len(),
            directories = index.owners.len(),
            "indexed package boundaries"
        );
        return Ok(index);
    }

    /// Build an index from a known set of package roots without touching
    /// the filesystem. Include `""` to make the source root a package.
    pub fn from_package_roots<I, S>(roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let package_roots: BTreeSet<String> =
            roots.into_iter().map(|r| paths::normalize(r.as_ref())).collect();
        let owners = package_roots.iter().map(|r| (r.clone(), r.clone())).collect();
        return Self { package_roots, owners };
    }

    /// The package that owns `directory`: the nearest ancestor, itself
    /// included, that is a package root. Directories never visited during
    /// construction are answered by longest-prefix search over the package
    /// roots, so no filesystem access happens here.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoOwningPackage` if no ancestor is a package root, or
    /// if the directory contains a `..` segment and so lies outside the tree.
    pub fn owning_package_of(&self, directory: &str) -> Result<&str, Error> {
        let directory = paths::normalize(directory);
        if paths::has_parent_segment(&directory) {
            return Err(Error::NoOwningPackage { directory });
        }

        if let Some(owner) = self.owners.get(&directory) {
            return Ok(owner.as_str());
        }

        return paths::ancestors(&directory)
            .find_map(|candidate| return self.package_roots.get(candidate))
            .map(String::as_str)
            .ok_or_else(|| return Error::NoOwningPackage { directory: directory.clone() });
    }

    /// Whether `directory` itself holds a package marker.
    pub fn is_package_root(&self, directory: &str) -> bool {
        return self.package_roots.contains(&paths::normalize(directory));
    }

    /// All package roots in sorted order.
    pub fn package_roots(&self) -> impl Iterator<Item = &str> {
        return self.package_roots.iter().map(String::as_str);
    }

    /// Number of package roots.
    pub fn package_count(&self) -> usize {
        return self.package_roots.len();
    }
}

/// Whether a walk entry is a directory the config prunes.
fn is_ignored_dir(entry: &walkdir::DirEntry, config: &Config) -> bool {
    return entry.file_type().is_dir()
        && entry.file_name().to_str().is_some_and(|name| return config.is_ignored(name));
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests")]
mod tests {
    use super::*;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    #[test]
    fn nearest_marker_wins() {
        let index = PackageBoundaryIndex::from_package_roots(["pkg", "pkg/sub"]);
        assert_eq!(index.owning_package_of("pkg").unwrap(), "pkg");
        assert_eq!(index.owning_package_of("pkg/sub").unwrap(), "pkg/sub");
        assert_eq!(index.owning_package_of("pkg/subdir").unwrap(), "pkg");
        assert_eq!(index.owning_package_of("pkg/sub/deeper/still").unwrap(), "pkg/sub");
    }

    #[test]
    fn unowned_directory_propagates_to_any_depth() {
        let index = PackageBoundaryIndex::from_package_roots(["r"]);
        let owner_of_root = index.owning_package_of("r").unwrap();
        for dir in ["r/a", "r/a/b", "r/a/b/c/d/e/f"] {
            assert_eq!(index.owning_package_of(dir).unwrap(), owner_of_root);
        }
    }

    #[test]
    fn owner_of_owner_is_itself() {
        let index = PackageBoundaryIndex::from_package_roots(["", "a", "a/b/c"]);
        for dir in ["", "x/y", "a", "a/b", "a/b/c/d"] {
            let owner = index.owning_package_of(dir).unwrap().to_string();
            assert_eq!(index.owning_package_of(&owner).unwrap(), owner);
        }
    }

    #[test]
    fn no_qualifying_ancestor_is_an_error() {
        let index = PackageBoundaryIndex::from_package_roots(["pkg"]);
        let err = index.owning_package_of("other/dir").unwrap_err();
        assert!(matches!(err, Error::NoOwningPackage { directory } if directory == "other/dir"));
    }

    #[test]
    fn parent_segments_never_resolve() {
        let index = PackageBoundaryIndex::from_package_roots(["", "a"]);
        assert!(index.owning_package_of("a/../b").is_err());
    }

    #[test]
    fn lookup_normalizes_the_query() {
        let index = PackageBoundaryIndex::from_package_roots(["pkg/sub"]);
        assert_eq!(index.owning_package_of("./pkg//sub/").unwrap(), "pkg/sub");
    }

    #[test]
    fn construct_walks_the_tree_once() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(root, "src/com/facebook/BUCK");
        touch(root, "src/com/facebook/A.java");
        touch(root, "src/com/facebook/demo/BUCK");
        touch(root, "src/com/facebook/demo/B.java");
        touch(root, "src/com/facebook/nobuild/C.java");

        let index = PackageBoundaryIndex::construct(root, &Config::default()).unwrap();
        let roots: Vec<&str> = index.package_roots().collect();
        assert_eq!(roots, vec!["", "src/com/facebook", "src/com/facebook/demo"]);
        assert_eq!(index.owning_package_of("src/com/facebook/nobuild").unwrap(), "src/com/facebook");
        assert_eq!(index.owning_package_of("src/com").unwrap(), "");
        // Never created on disk: answered by prefix search.
        assert_eq!(index.owning_package_of("src/com/facebook/demo/gen/x").unwrap(), "src/com/facebook/demo");
    }

    #[test]
    fn construct_without_implicit_root_package() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "pkg/BUCK");
        touch(dir.path(), "loose/file.txt");
        let config = Config { root_is_package: false, ..Config::default() };

        let index = PackageBoundaryIndex::construct(dir.path(), &config).unwrap();
        assert_eq!(index.package_count(), 1);
        assert!(index.is_package_root("pkg"));
        assert!(matches!(index.owning_package_of("loose"), Err(Error::NoOwningPackage { .. })));
    }

    #[test]
    fn ignored_directories_are_pruned() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "buck-out/gen/BUCK");
        touch(dir.path(), "lib/BUCK");
        let index = PackageBoundaryIndex::construct(dir.path(), &Config::default()).unwrap();
        assert!(!index.is_package_root("buck-out/gen"));
        assert!(index.is_package_root("lib"));
    }

    #[test]
    fn custom_marker_name() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a/BUILD");
        touch(dir.path(), "b/BUCK");
        let config = Config { build_file_name: "BUILD".to_string(), ..Config::default() };
        let index = PackageBoundaryIndex::construct(dir.path(), &config).unwrap();
        assert!(index.is_package_root("a"));
        assert!(!index.is_package_root("b"));
    }
}
