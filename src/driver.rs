//! # Run Driver
//!
//! The driving sequence for one invocation: derive the version set once,
//! expand and deduplicate the requested paths, process each in order, and
//! classify the overall outcome into a process exit code.
//!
//! ## Cross-file linkage
//!
//! Processing a `.csproj` successfully also attempts the same-stem
//! `.nuspec`, and vice versa. A missing companion is silently skipped; a
//! file only counts once in the flattened processed set. The run fails only
//! when that set ends up empty.
//!
//! ## Exit codes
//!
//! - 0: success (at least one file processed)
//! - 1: no arguments / no version token (reported by the CLI layer)
//! - 2: the version string fails the grammar
//! - 3: auto-discovery found nothing processable
//! - 4: explicit paths were given but none processed

use std::path::{Path, PathBuf};

use log::{debug, error, warn};
use walkdir::WalkDir;

use crate::adapters::{self, has_extension, StampRequest};
use crate::error::Error;
use crate::version::{DerivedVersionSet, VersionComponents};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_NO_ARGUMENTS: u8 = 1;
pub const EXIT_INVALID_VERSION: u8 = 2;
pub const EXIT_NOTHING_DISCOVERED: u8 = 3;
pub const EXIT_NOTHING_PROCESSED: u8 = 4;

/// One parsed invocation: a version token, candidate paths, release mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub version: String,
    pub paths: Vec<PathBuf>,
    pub release: bool,
}

/// The overall result of a run, one variant per exit condition the driver
/// can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    InvalidVersion,
    NothingDiscovered,
    NothingProcessed,
}

impl RunOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::Success => EXIT_SUCCESS,
            RunOutcome::InvalidVersion => EXIT_INVALID_VERSION,
            RunOutcome::NothingDiscovered => EXIT_NOTHING_DISCOVERED,
            RunOutcome::NothingProcessed => EXIT_NOTHING_PROCESSED,
        }
    }
}

/// Execute one full run.
pub fn run(request: &RunRequest) -> RunOutcome {
    let components = match VersionComponents::parse(&request.version) {
        Some(components) => components,
        None => {
            error!(
                "{}",
                Error::VersionFormat {
                    input: request.version.clone(),
                }
            );
            return RunOutcome::InvalidVersion;
        }
    };

    // Derived once, shared read-only across every file.
    let versions = DerivedVersionSet::derive(&components, false);
    let stamp = StampRequest {
        versions: &versions,
        release: request.release,
    };

    let explicit = !request.paths.is_empty();
    let paths = if explicit {
        dedup(expand_directories(&request.paths))
    } else {
        discover_projects()
    };

    let processed = process_paths(&paths, stamp);
    debug!("processed {} file(s)", processed.len());

    if !processed.is_empty() {
        RunOutcome::Success
    } else if explicit {
        RunOutcome::NothingProcessed
    } else {
        RunOutcome::NothingDiscovered
    }
}

/// Process every path in order, pairing project manifests with their
/// same-stem package manifests. Returns the flattened set of successfully
/// processed paths.
pub fn process_paths(paths: &[PathBuf], request: StampRequest<'_>) -> Vec<PathBuf> {
    let mut processed: Vec<PathBuf> = Vec::new();

    for path in paths {
        if processed.contains(path) {
            continue;
        }

        if adapters::process_file(path, request) {
            processed.push(path.clone());

            if let Some(companion) = companion_of(path) {
                if !companion.is_file() {
                    debug!("no companion for {}", path.display());
                } else if !processed.contains(&companion)
                    && adapters::process_file(&companion, request)
                {
                    processed.push(companion);
                }
            }
        }
    }

    processed
}

/// The sibling metadata file sharing this path's stem: `.nuspec` for a
/// `.csproj` and vice versa. Other extensions have no companion.
fn companion_of(path: &Path) -> Option<PathBuf> {
    if has_extension(path, "csproj") {
        Some(path.with_extension("nuspec"))
    } else if has_extension(path, "nuspec") {
        Some(path.with_extension("csproj"))
    } else {
        None
    }
}

/// Expand directory paths to every `.csproj` beneath them, recursively;
/// file paths pass through unchanged.
fn expand_directories(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut expanded = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| {
                    entry.file_type().is_file() && has_extension(entry.path(), "csproj")
                })
            {
                expanded.push(entry.into_path());
            }
        } else {
            expanded.push(path.clone());
        }
    }
    expanded
}

/// Flat `*.csproj` discovery in the current directory, used when no paths
/// are given.
fn discover_projects() -> Vec<PathBuf> {
    match glob::glob("*.csproj") {
        Ok(entries) => entries.filter_map(|entry| entry.ok()).collect(),
        Err(err) => {
            warn!("project discovery failed: {}", Error::Glob(err));
            Vec::new()
        }
    }
}

/// Order-preserving exact deduplication.
fn dedup(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut unique: Vec<PathBuf> = Vec::with_capacity(paths.len());
    for path in paths {
        if !unique.contains(&path) {
            unique.push(path);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions(input: &str) -> DerivedVersionSet {
        DerivedVersionSet::derive(&VersionComponents::parse(input).unwrap(), false)
    }

    fn request(versions: &DerivedVersionSet) -> StampRequest<'_> {
        StampRequest {
            versions,
            release: false,
        }
    }

    #[test]
    fn test_dedup_preserves_first_seen_order() {
        let paths = vec![
            PathBuf::from("a.csproj"),
            PathBuf::from("b.csproj"),
            PathBuf::from("a.csproj"),
        ];
        assert_eq!(
            dedup(paths),
            vec![PathBuf::from("a.csproj"), PathBuf::from("b.csproj")]
        );
    }

    #[test]
    fn test_companion_pairing() {
        assert_eq!(
            companion_of(Path::new("dir/proj.csproj")),
            Some(PathBuf::from("dir/proj.nuspec"))
        );
        assert_eq!(
            companion_of(Path::new("pkg.nuspec")),
            Some(PathBuf::from("pkg.csproj"))
        );
        assert_eq!(companion_of(Path::new("readme.txt")), None);
    }

    #[test]
    fn test_process_paths_stamps_project_and_companion() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("demo.csproj");
        let package = dir.path().join("demo.nuspec");
        std::fs::write(&project, r#"<Project Sdk="Microsoft.NET.Sdk"></Project>"#).unwrap();
        std::fs::write(&package, "<package><metadata></metadata></package>").unwrap();

        let set = versions("2.5.1");
        let processed = process_paths(&[project.clone()], request(&set));
        assert_eq!(processed, vec![project.clone(), package.clone()]);

        assert!(std::fs::read_to_string(&project)
            .unwrap()
            .contains("<Version>2.5.1.0</Version>"));
        assert!(std::fs::read_to_string(&package)
            .unwrap()
            .contains("<version>2.5.1.0</version>"));
    }

    #[test]
    fn test_process_paths_explicit_pair_counts_each_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("demo.csproj");
        let package = dir.path().join("demo.nuspec");
        std::fs::write(&project, r#"<Project Sdk="Microsoft.NET.Sdk"></Project>"#).unwrap();
        std::fs::write(&package, "<package><metadata></metadata></package>").unwrap();

        let set = versions("1.0.0");
        // Both orders: the second path is already stamped as the first's
        // companion and must not be stamped again.
        let processed = process_paths(&[project.clone(), package.clone()], request(&set));
        assert_eq!(processed, vec![project.clone(), package.clone()]);

        let processed = process_paths(&[package.clone(), project.clone()], request(&set));
        assert_eq!(processed, vec![package, project]);
    }

    #[test]
    fn test_process_paths_missing_companion_is_skipped_silently() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("demo.csproj");
        std::fs::write(&project, r#"<Project Sdk="Microsoft.NET.Sdk"></Project>"#).unwrap();

        let set = versions("1.0.0");
        let processed = process_paths(&[project.clone()], request(&set));
        assert_eq!(processed, vec![project]);
    }

    #[test]
    fn test_process_paths_missing_file_yields_empty_set() {
        let set = versions("1.0.0");
        let processed = process_paths(&[PathBuf::from("missing.csproj")], request(&set));
        assert!(processed.is_empty());
    }

    #[test]
    fn test_expand_directories_finds_nested_projects() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("src").join("app");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("app.csproj"), "<Project></Project>").unwrap();
        std::fs::write(nested.join("notes.txt"), "x").unwrap();
        std::fs::write(dir.path().join("top.csproj"), "<Project></Project>").unwrap();

        let expanded = expand_directories(&[dir.path().to_path_buf()]);
        assert_eq!(expanded.len(), 2);
        assert!(expanded.iter().all(|p| has_extension(p, "csproj")));
    }

    #[test]
    fn test_run_rejects_invalid_version_before_touching_files() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("demo.csproj");
        let original = r#"<Project Sdk="Microsoft.NET.Sdk"></Project>"#;
        std::fs::write(&project, original).unwrap();

        let outcome = run(&RunRequest {
            version: "abc".to_string(),
            paths: vec![project.clone()],
            release: false,
        });
        assert_eq!(outcome, RunOutcome::InvalidVersion);
        assert_eq!(std::fs::read_to_string(&project).unwrap(), original);
    }

    #[test]
    fn test_run_reports_nothing_processed_for_explicit_missing_path() {
        let outcome = run(&RunRequest {
            version: "1.0.0".to_string(),
            paths: vec![PathBuf::from("missing.csproj")],
            release: false,
        });
        assert_eq!(outcome, RunOutcome::NothingProcessed);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(RunOutcome::Success.exit_code(), EXIT_SUCCESS);
        assert_eq!(RunOutcome::InvalidVersion.exit_code(), EXIT_INVALID_VERSION);
        assert_eq!(
            RunOutcome::NothingDiscovered.exit_code(),
            EXIT_NOTHING_DISCOVERED
        );
        assert_eq!(
            RunOutcome::NothingProcessed.exit_code(),
            EXIT_NOTHING_PROCESSED
        );
    }
}
