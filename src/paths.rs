//! Slash-separated, root-relative path helpers.
//!
//! Package paths and file references are plain strings with `/` separators
//! regardless of host platform, so they can serve as stable graph keys.

use std::path::{Component, Path};

/// Join a package directory and a relative path. The root package is the
/// empty string, so joining onto it yields `rel` unchanged.
pub fn join(base: &str, rel: &str) -> String {
    if base.is_empty() {
        return rel.to_string();
    }
    if rel.is_empty() {
        return base.to_string();
    }
    return format!("{base}/{rel}");
}

/// Directory portion of a root-relative path, `""` for top-level entries.
pub fn parent(path: &str) -> &str {
    return path.rsplit_once('/').map_or("", |(dir, _)| dir);
}

/// Drop empty and `.` segments. `..` segments are preserved verbatim; callers
/// that care reject them before normalizing.
pub fn normalize(path: &str) -> String {
    return path
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/");
}

/// Whether any segment of `path` is a literal `..`.
pub fn has_parent_segment(path: &str) -> bool {
    return path.split(['/', '\\']).any(|segment| segment == "..");
}

/// Ancestors of a normalized path, nearest first, ending with the root `""`.
pub fn ancestors(path: &str) -> impl Iterator<Item = &str> {
    let mut next = Some(path);
    return std::iter::from_fn(move || {
        let current = next?;
        next = if current.is_empty() { None } else { Some(parent(current)) };
        return Some(current);
    });
}

/// Convert a filesystem path relative to the project root into slash form.
/// Returns `None` when the path contains components that have no
/// root-relative meaning (`..`, a drive prefix, the root itself).
pub fn to_slash(path: &Path) -> Option<String> {
    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(name) => segments.push(name.to_str()?),
            Component::CurDir => {},
            Component::ParentDir | Component::Prefix(_) | Component::RootDir => return None,
        }
    }
    return Some(segments.join("/"));
}
