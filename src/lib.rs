//! Target resolution for build definitions.
//!
//! Turns the raw strings a build rule declares as inputs into typed
//! references: plain files in the rule's own package, or other rules'
//! outputs. Along the way it enforces that no rule reads a file owned by
//! another package and that no input climbs out through `..`.
//!
//! ```no_run
//! use srcref::catalogue::KnownTargets;
//! use srcref::package_index::PackageBoundaryIndex;
//! use srcref::resolver::SourceReferenceResolver;
//! use srcref::target::TargetIdentifier;
//!
//! # fn main() -> Result<(), srcref::error::Error> {
//! let index = PackageBoundaryIndex::from_package_roots(["", "pkg", "pkg/sub"]);
//! let known: KnownTargets = ["//pkg:lib".parse::<TargetIdentifier>()?].into_iter().collect();
//! let rule: TargetIdentifier = "//pkg:main".parse()?;
//!
//! let resolver = SourceReferenceResolver::new(&rule, &index, &known);
//! assert_eq!(resolver.resolve_path("subdir/C.ext")?, "pkg/subdir/C.ext");
//! assert!(resolver.resolve_path("sub/B.ext").is_err());
//!
//! let mut deps: Vec<TargetIdentifier> = Vec::new();
//! let input = resolver.resolve_into(":lib", &mut deps)?;
//! assert_eq!(input.as_reference(), "//pkg:lib");
//! # Ok(())
//! # }
//! ```

pub mod catalogue;
pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod package_index;
pub mod paths;
pub mod resolver;
pub mod source_ref;
pub mod target;
