use std::fmt::Write as _;

use crate::error::Error;
use crate::target::TargetIdentifier;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic: what happened,
/// then how to fix it.
pub fn render_error(e: &Error) -> String {
    return match e {
        Error::ParentTraversal { target, attempted_path } => render_parent_traversal(target, attempted_path),
        Error::PackageBoundary { target, attempted_path, owner } => {
            render_package_boundary(target, attempted_path, owner)
        },
        Error::UnknownTarget { attempted, context } => render_unknown_target(attempted, context),
        Error::MalformedTarget { raw, reason } => render_malformed_target(raw, reason),
        Error::NoOwningPackage { directory } => render_no_owning_package(directory),
        Error::DuplicateRule { .. }
        | Error::InvalidPath { .. }
        | Error::Io(_)
        | Error::Json(_)
        | Error::ManifestNotFound { .. }
        | Error::TomlDe(_)
        | Error::Walk(_) => render_generic(e),
    };
}

/// Diagnostics for failures outside input resolution. The resolution
/// variants render through their own functions.
fn render_generic(e: &Error) -> String {
    return match e {
        Error::InvalidPath { target, attempted_path, reason } => format!("\
# Error: Invalid Input Path

`{attempted_path}` in `{target}`: {reason}.

## Fix

Write input paths relative to the directory containing the build file.
"),

        Error::DuplicateRule { target } => format!("\
# Error: Duplicate Rule

`{target}` is declared more than once in the rule manifest.

## Fix

Remove or rename one of the declarations.
"),

        Error::ManifestNotFound { path } => format!("\
# Error: Rule Manifest Not Found

`{}` does not exist.

## Fix

Pass the manifest path explicitly:

    srcref check path/to/rules.toml
", path.display()),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),
        Error::Walk(e) => format!("\
# Error: Directory Walk

{e}
"),
        Error::TomlDe(e) => format!("\
# Error: Invalid TOML

{e}
"),
        Error::Json(e) => format!("\
# Error: JSON Output

{e}
"),
        Error::MalformedTarget { .. }
        | Error::NoOwningPackage { .. }
        | Error::PackageBoundary { .. }
        | Error::ParentTraversal { .. }
        | Error::UnknownTarget { .. } => render_error(e),
    };
}

fn render_parent_traversal(target: &TargetIdentifier, attempted_path: &str) -> String {
    return format!(
        "\
# Error: Parent Directory Reference

`{attempted_path}` in target `{target}` refers to a parent directory.

Inputs may not contain `..`, even when the result stays inside the
source tree.

## Fix

Reference the file through the rule that owns it, or move the file into
the package of `{target}`.
"
    );
}

fn render_package_boundary(target: &TargetIdentifier, attempted_path: &str, owner: &str) -> String {
    return format!(
        "\
# Error: Package Boundary Crossed

`{attempted_path}` in target `{target}` belongs to package `//{owner}`.

A rule may only read files owned by its own package: the nearest
directory above the file that holds a build file.

## Fix

Find the nearest build file in the directory containing this file and
depend on the rule that exports it:

    //{owner}:<rule>
"
    );
}

fn render_unknown_target(attempted: &TargetIdentifier, context: &TargetIdentifier) -> String {
    return format!(
        "\
# Error: Unknown Build Target

Unable to find build target `{attempted}` while parsing definition of
`{context}`.

## Fix

Check the spelling, or define `{}` in the build file of `//{}`.
",
        attempted.name(),
        attempted.package()
    );
}

fn render_malformed_target(raw: &str, reason: &str) -> String {
    let mut out = format!(
        "\
# Error: Malformed Build Target

`{raw}`: {reason}.

## Accepted forms

"
    );
    for form in ["//path/to/package:name", "//:name", ":name"] {
        let _ = writeln!(out, "- `{form}`");
    }
    return out;
}

fn render_no_owning_package(directory: &str) -> String {
    return format!(
        "\
# Error: No Owning Package

No package owns `{directory}`: neither it nor any parent directory holds
a build file.

## Fix

Add a build file to `{directory}` or one of its parents, or set
`root_is_package = true` in `.srcref.toml`.
"
    );
}
