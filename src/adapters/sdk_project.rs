//! SDK-style project adapter
//!
//! Reconciles the three version elements of a modern `.csproj` in a fixed
//! order (for reproducible diffs; the end state does not depend on it):
//!
//! 1. `Version` - the primary field: the package rendering, or the
//!    suffix-augmented triplet in Release mode
//! 2. `FileVersion` - the numeric file rendering
//! 3. `AssemblyVersion` - the numeric rendering with the fourth segment
//!    forced to zero
//!
//! Matches are collected under every `PropertyGroup` in the document. When a
//! field is missing, the new element goes into the first existing
//! `PropertyGroup`; a document with none gets a single new group, shared by
//! all three fields.

use std::path::Path;

use log::{debug, warn};
use xot::{NameId, Node};

use crate::adapters::StampRequest;
use crate::error::Result;
use crate::xml::{reconcile_element, XmlDoc};

/// Stamp a loaded SDK-style project document and write it back to `path`.
pub fn process(doc: XmlDoc, path: &Path, request: StampRequest<'_>) -> bool {
    match stamp(doc, path, request) {
        Ok(()) => {
            debug!("stamped SDK-style project {}", path.display());
            true
        }
        Err(err) => {
            warn!("skipping {}: {}", path.display(), err);
            false
        }
    }
}

fn stamp(mut doc: XmlDoc, path: &Path, request: StampRequest<'_>) -> Result<()> {
    let root = doc.root()?;
    let group_name = doc.name("PropertyGroup");

    // Reconciliation order is fixed: Version, FileVersion, AssemblyVersion.
    let fields = [
        ("Version", request.primary()),
        ("FileVersion", request.versions.file.as_str()),
        ("AssemblyVersion", request.versions.assembly.as_str()),
    ];

    let mut created_group: Option<Node> = None;
    for (field, value) in fields {
        let name = doc.name(field);
        let matches = grouped_elements(&doc, root, group_name, name);
        reconcile_element(&mut doc, &matches, name, value, |doc| {
            ensure_property_group(doc, root, group_name, &mut created_group)
        })?;
    }

    doc.save(path)
}

/// All elements named `name` nested under any `PropertyGroup` below `root`,
/// in document order and without duplicates from nested groups.
fn grouped_elements(doc: &XmlDoc, root: Node, group_name: NameId, name: NameId) -> Vec<Node> {
    let mut matches = Vec::new();
    for group in doc.elements_named(root, group_name) {
        for node in doc.elements_named(group, name) {
            if !matches.contains(&node) {
                matches.push(node);
            }
        }
    }
    matches
}

/// The container for missing version elements: the first existing
/// `PropertyGroup`, or a single newly created one cached across fields.
fn ensure_property_group(
    doc: &mut XmlDoc,
    root: Node,
    group_name: NameId,
    created: &mut Option<Node>,
) -> Result<Node> {
    if let Some(group) = *created {
        return Ok(group);
    }
    let group = match doc.elements_named(root, group_name).first().copied() {
        Some(existing) => existing,
        None => doc.append_element(root, group_name)?,
    };
    *created = Some(group);
    Ok(group)
}
