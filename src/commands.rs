use std::path::Path;
use std::process::ExitCode;

use serde::Serialize;

use crate::catalogue::{KnownTargets, TargetCatalogue};
use crate::config::Config;
use crate::diagnostics;
use crate::error::Error;
use crate::manifest::RuleManifest;
use crate::package_index::PackageBoundaryIndex;
use crate::resolver::{RuleInputs, SourceReferenceResolver};
use crate::source_ref::SourceReference;
use crate::target::{self, TargetIdentifier};

// ── CLI commands ──────────────────────────────────────────────────────

/// List every package root under `root`.
///
/// # Errors
///
/// Returns errors from config loading or the directory walk.
pub fn cmd_packages(root: &Path) -> Result<(), Error> {
    let index = load_index(root)?;
    for package in index.package_roots() {
        println!("{}", package_label(package));
    }
    return Ok(());
}

/// Print the owning package of each directory.
///
/// # Errors
///
/// Returns errors from indexing, or `Error::NoOwningPackage` for the first
/// directory no package owns.
pub fn cmd_owner(root: &Path, directories: &[String]) -> Result<(), Error> {
    let index = load_index(root)?;
    for directory in directories {
        let owner = index.owning_package_of(directory)?;
        println!("{directory} -> {}", package_label(owner));
    }
    return Ok(());
}

/// Print the canonical form of a target string.
///
/// # Errors
///
/// Returns `Error::MalformedTarget` if the string violates the grammar.
pub fn cmd_parse(raw: &str, base: &str) -> Result<(), Error> {
    let id = target::parse(raw, base)?;
    println!("{id}");
    return Ok(());
}

/// Resolve the inputs of a single rule and print the references and
/// recorded dependencies. Without `known` targets, a target counts as
/// defined when its package has a build file.
/// Exit code: 0 when every input resolves, 2 otherwise. A failing input is
/// reported as a diagnostic and nothing else is printed for the rule.
///
/// # Errors
///
/// Returns errors from parsing `rule` or `known`, config loading, the
/// directory walk, or JSON output. Input resolution failures are reported,
/// not returned.
pub fn cmd_resolve(
    root: &Path,
    rule: &str,
    known: &[String],
    inputs: &[String],
    json: bool,
) -> Result<ExitCode, Error> {
    let rule: TargetIdentifier = rule.parse()?;
    let index = load_index(root)?;

    let explicit: KnownTargets = known.iter().map(|k| k.parse::<TargetIdentifier>()).collect::<Result<_, Error>>()?;
    let catalogue: &dyn TargetCatalogue = if explicit.is_empty() { &index } else { &explicit };

    let resolver = SourceReferenceResolver::new(&rule, &index, catalogue);
    let resolved = match RuleInputs::resolve_all(&resolver, inputs) {
        Ok(resolved) => resolved,
        Err(e) => {
            diagnostics::print_error(&e);
            return Ok(ExitCode::from(2));
        },
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&RuleReport::resolved(inputs, &resolved))?);
        return Ok(ExitCode::SUCCESS);
    }

    for (raw, reference) in inputs.iter().zip(resolved.inputs()) {
        println!("{raw} -> {reference}");
    }
    for dependency in resolved.dependencies() {
        println!("{rule} depends on {dependency}");
    }
    return Ok(ExitCode::SUCCESS);
}

/// Resolve every rule in a manifest. A bad input aborts only its own rule.
/// Exit code: 0 when every rule resolves, 2 otherwise.
///
/// # Errors
///
/// Returns errors from manifest reading, indexing, or JSON output. Input
/// resolution failures are reported, not returned.
pub fn cmd_check(root: &Path, manifest_path: &Path, json: bool) -> Result<ExitCode, Error> {
    let manifest = RuleManifest::read(&root.join(manifest_path))?;
    let index = load_index(root)?;
    let known = manifest.known_targets();

    let mut reports = Vec::with_capacity(manifest.rules.len());
    for rule in &manifest.rules {
        let resolver = SourceReferenceResolver::new(&rule.target, &index, &known);
        reports.push(check_rule(&resolver, &rule.inputs));
    }

    let broken = reports.iter().filter(|r| r.error.is_some()).count();

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            if let Some(failure) = &report.error {
                println!("BROKEN  {} {} ({})", report.target, failure.input, failure.kind);
            }
        }
        if broken > 0 {
            println!("{broken} of {} rules broken", reports.len());
        } else {
            println!("All {} rules resolved", reports.len());
        }
    }

    if broken > 0 {
        return Ok(ExitCode::from(2));
    }
    return Ok(ExitCode::SUCCESS);
}

// ── Helpers ───────────────────────────────────────────────────────────

/// Load config and build the package index for `root`.
///
/// # Errors
///
/// Returns errors from config loading or the directory walk.
fn load_index(root: &Path) -> Result<PackageBoundaryIndex, Error> {
    let config = Config::load(root)?;
    return PackageBoundaryIndex::construct(root, &config);
}

/// Display form of a package path: `//` for the root.
fn package_label(package: &str) -> String {
    return format!("//{package}");
}

/// Resolve one rule's inputs, stopping at the first failure.
fn check_rule(resolver: &SourceReferenceResolver<'_>, inputs: &[String]) -> RuleReport {
    let mut rule = RuleInputs::new(resolver.target().clone());
    for raw in inputs {
        match resolver.resolve_source_or_target(raw) {
            Ok(resolution) => rule.merge(resolution),
            Err(e) => {
                return RuleReport {
                    dependencies: Vec::new(),
                    error: Some(Failure {
                        input: raw.clone(),
                        kind: e.kind(),
                        message: e.to_string(),
                    }),
                    inputs: Vec::new(),
                    target: resolver.target().clone(),
                };
            },
        }
    }
    return RuleReport::resolved(inputs, &rule);
}

// ── Reports ───────────────────────────────────────────────────────────

/// Outcome of resolving one rule, as printed by `check --json`.
#[derive(Serialize)]
struct RuleReport {
    /// Sorted, de-duplicated dependencies.
    dependencies: Vec<TargetIdentifier>,
    /// The failure that aborted the rule, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<Failure>,
    /// Resolved inputs in declaration order.
    inputs: Vec<InputReport>,
    /// The rule.
    target: TargetIdentifier,
}

impl RuleReport {
    /// Report for a rule whose inputs all resolved.
    fn resolved(raws: &[String], rule: &RuleInputs) -> Self {
        return Self {
            dependencies: rule.dependencies().cloned().collect(),
            error: None,
            inputs: raws
                .iter()
                .zip(rule.inputs())
                .map(|(raw, reference)| InputReport { raw: raw.clone(), reference: reference.clone() })
                .collect(),
            target: rule.target().clone(),
        };
    }
}

/// One resolved input next to the string it came from.
#[derive(Serialize)]
struct InputReport {
    /// Input as declared.
    raw: String,
    /// Typed reference it resolved to.
    reference: SourceReference,
}

/// Why a rule failed to resolve.
#[derive(Serialize)]
struct Failure {
    /// Input that failed.
    input: String,
    /// Short failure kind.
    kind: &'static str,
    /// Full message.
    message: String,
}
