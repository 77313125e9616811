//! Legacy project adapter
//!
//! Projects without the SDK root attribute keep their version metadata in
//! source-level assembly attributes rather than the manifest. The project's
//! directory tree is walked for `.cs` files and every line matching one of
//! two fixed attribute patterns is rewritten in place:
//!
//! - `[assembly: AssemblyVersion("...")]` gets the assembly rendering
//! - `[assembly: AssemblyFileVersion("...")]` gets the file rendering
//!
//! Optional `global::` and `System.Reflection.` qualifiers and the
//! `Attribute` name suffix are tolerated. Non-matching lines, including
//! their line terminators, pass through byte-unchanged. Files are
//! independent units of work and are processed in parallel; the adapter
//! reports success only when at least one line matched somewhere in the
//! tree.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use log::{debug, warn};
use rayon::prelude::*;
use regex::Regex;
use walkdir::WalkDir;

use crate::adapters::{has_extension, StampRequest};
use crate::error::Result;

static ASSEMBLY_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*\[\s*assembly\s*:\s*(?:global::)?(?:System\.Reflection\.)?AssemblyVersion(?:Attribute)?\(\s*"[^"]*"\s*\)\s*\]\s*$"#,
    )
    .expect("invalid assembly version pattern")
});

static ASSEMBLY_FILE_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*\[\s*assembly\s*:\s*(?:global::)?(?:System\.Reflection\.)?AssemblyFileVersion(?:Attribute)?\(\s*"[^"]*"\s*\)\s*\]\s*$"#,
    )
    .expect("invalid assembly file version pattern")
});

/// Rewrite the assembly attributes of every `.cs` file under the project's
/// directory. Returns `true` iff at least one attribute line was rewritten.
pub fn process(project_path: &Path, request: StampRequest<'_>) -> bool {
    let directory = match project_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let sources: Vec<PathBuf> = WalkDir::new(&directory)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && has_extension(entry.path(), "cs"))
        .map(|entry| entry.into_path())
        .collect();

    // Each file is a disjoint unit of work; rewrite them in parallel and
    // fold the per-file results.
    let found = sources
        .par_iter()
        .map(|source| match rewrite_source(source, request) {
            Ok(found) => found,
            Err(err) => {
                warn!("skipping {}: {}", source.display(), err);
                false
            }
        })
        .reduce(|| false, |a, b| a || b);

    if found {
        debug!("stamped legacy project {}", project_path.display());
    } else {
        warn!(
            "no assembly attributes found under {}",
            directory.display()
        );
    }
    found
}

/// Rewrite one source file; returns `true` when a matching line was found
/// (and the file therefore written back).
fn rewrite_source(path: &Path, request: StampRequest<'_>) -> Result<bool> {
    let content = fs::read_to_string(path)?;

    let mut output = String::with_capacity(content.len());
    let mut found = false;

    for raw in content.split_inclusive('\n') {
        let line = raw.trim_end_matches('\n').trim_end_matches('\r');
        let terminator = &raw[line.len()..];

        if ASSEMBLY_VERSION_RE.is_match(line) {
            found = true;
            output.push_str(&format!(
                "[assembly: global::System.Reflection.AssemblyVersion(\"{}\")]",
                request.versions.assembly
            ));
            output.push_str(terminator);
        } else if ASSEMBLY_FILE_VERSION_RE.is_match(line) {
            found = true;
            output.push_str(&format!(
                "[assembly: global::System.Reflection.AssemblyFileVersion(\"{}\")]",
                request.versions.file
            ));
            output.push_str(terminator);
        } else {
            output.push_str(raw);
        }
    }

    if found {
        fs::write(path, output)?;
    }
    Ok(found)
}
