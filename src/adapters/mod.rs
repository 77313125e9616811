//! Project-kind adapters for the supported metadata file kinds
//!
//! Each document kind the tool understands has its own submodule with the
//! kind-specific stamping logic. The kinds form a closed set, selected by a
//! detection predicate rather than inheritance:
//!
//! - SDK-style project (sdk_project.rs) - `.csproj` whose root carries the
//!   modern `Sdk` attribute; version fields live in `PropertyGroup` elements
//! - Legacy project (legacy_project.rs) - `.csproj` without the `Sdk`
//!   attribute; version fields live in assembly attributes inside companion
//!   `.cs` sources
//! - Package manifest (package_manifest.rs) - `.nuspec` with a fixed
//!   `package`/`metadata` schema
//!
//! Adapters share the contract `process(path, request) -> bool`: a failing
//! file (missing, unreadable, unparsable, nothing to stamp) reports `false`
//! and is logged, never propagated as an error.

pub mod legacy_project;
pub mod package_manifest;
pub mod sdk_project;

use std::path::Path;

use log::warn;

use crate::error::Result;
use crate::version::DerivedVersionSet;
use crate::xml::XmlDoc;

/// Shared, read-only inputs for one stamping run.
///
/// Computed once per invocation; every adapter borrows the same set.
#[derive(Debug, Clone, Copy)]
pub struct StampRequest<'a> {
    pub versions: &'a DerivedVersionSet,
    /// Release mode: primary version fields omit the revision segment.
    pub release: bool,
}

impl StampRequest<'_> {
    /// The value for primary version fields (the project `Version` element
    /// and the package-manifest `version` element).
    pub fn primary(&self) -> &str {
        if self.release {
            &self.versions.release
        } else {
            &self.versions.package
        }
    }
}

/// The closed set of document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    SdkProject,
    LegacyProject,
    PackageManifest,
}

/// Process one file, detecting its kind and dispatching to the adapter.
///
/// Returns `true` when the file (or, for a legacy project, at least one
/// companion source under its directory) was stamped and written back.
pub fn process_file(path: &Path, request: StampRequest<'_>) -> bool {
    if has_extension(path, "nuspec") {
        return package_manifest::process(path, request);
    }

    // Everything else is loaded as a project manifest; the root attribute
    // decides between the SDK-style and legacy handling.
    let mut doc = match XmlDoc::load(path) {
        Ok(doc) => doc,
        Err(err) => {
            warn!("skipping {}: {}", path.display(), err);
            return false;
        }
    };

    match is_sdk_project(&mut doc) {
        Ok(true) => sdk_project::process(doc, path, request),
        Ok(false) => legacy_project::process(path, request),
        Err(err) => {
            warn!("skipping {}: {}", path.display(), err);
            false
        }
    }
}

/// Detect the kind of an on-disk file without processing it.
pub fn detect_kind(path: &Path) -> Result<ProjectKind> {
    if has_extension(path, "nuspec") {
        return Ok(ProjectKind::PackageManifest);
    }
    let mut doc = XmlDoc::load(path)?;
    if is_sdk_project(&mut doc)? {
        Ok(ProjectKind::SdkProject)
    } else {
        Ok(ProjectKind::LegacyProject)
    }
}

/// Case-insensitive extension check.
pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// A project is SDK-style when its root carries an `Sdk` attribute naming
/// the modern toolchain (`Microsoft.NET.Sdk` or a dotted sub-SDK of it).
fn is_sdk_project(doc: &mut XmlDoc) -> Result<bool> {
    let root = doc.root()?;
    let sdk = doc.name("Sdk");
    Ok(match doc.attribute(root, sdk) {
        Some(value) => {
            let value = value.trim().to_ascii_lowercase();
            value == "microsoft.net.sdk" || value.starts_with("microsoft.net.sdk.")
        }
        None => false,
    })
}
