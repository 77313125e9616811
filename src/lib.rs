//! # verstamp Library
//!
//! Core functionality for stamping derived version numbers into .NET
//! project and package metadata files. It is used by the `verstamp`
//! command-line tool but can also be driven directly by build tooling.
//!
//! ## Quick Example
//!
//! ```
//! use verstamp::version::{DerivedVersionSet, VersionComponents};
//!
//! let components = VersionComponents::parse("2.5.1-beta2").unwrap();
//! let set = DerivedVersionSet::derive(&components, false);
//!
//! assert_eq!(set.release, "2.5.1-beta2");
//! assert_eq!(set.package, "2.5.1.0-beta2");
//! assert_eq!(set.file, "2.5.1.0");
//! assert_eq!(set.assembly, "2.5.1.0");
//! ```
//!
//! ## Core Concepts
//!
//! - **Version engine (`version`)**: parses one version token and derives
//!   the four textual renderings the file kinds consume (release, package,
//!   file, assembly).
//! - **Reconciliation (`xml`)**: the generic routine collapsing
//!   zero-or-more version-bearing XML elements to exactly one with the
//!   desired value, creating the container when absent.
//! - **Adapters (`adapters`)**: one handler per document kind (SDK-style
//!   project, legacy project with assembly attributes in sources, package
//!   manifest), selected by a detection predicate.
//! - **Driver (`driver`)**: path deduplication and expansion,
//!   project/package companion pairing, and exit-code classification.
//!
//! ## Execution Flow
//!
//! 1.  Parse the version token into components; abort the run on mismatch.
//! 2.  Derive the version set once; it is shared read-only by every file.
//! 3.  Expand and deduplicate the candidate paths (or auto-discover).
//! 4.  Process each path through its adapter, pairing companions.
//! 5.  Classify the processed set into an exit code.

pub mod adapters;
pub mod driver;
pub mod error;
pub mod version;
pub mod xml;
