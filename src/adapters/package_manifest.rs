//! Package manifest (.nuspec) adapter
//!
//! A package manifest has a fixed schema: a `package` root with a `metadata`
//! child holding the single `version` element. The metadata container is
//! created and appended to the root only when absent, and the version field
//! takes the package rendering (suffix and revision included), or the
//! suffix-augmented triplet in Release mode.

use std::path::Path;

use log::{debug, warn};

use crate::adapters::StampRequest;
use crate::error::{Error, Result};
use crate::xml::{reconcile_element, XmlDoc};

/// Stamp one package manifest. Returns `true` when the file was written
/// back; a missing, unreadable, or off-schema file reports `false`.
pub fn process(path: &Path, request: StampRequest<'_>) -> bool {
    match stamp(path, request) {
        Ok(()) => {
            debug!("stamped package manifest {}", path.display());
            true
        }
        Err(err) => {
            warn!("skipping {}: {}", path.display(), err);
            false
        }
    }
}

fn stamp(path: &Path, request: StampRequest<'_>) -> Result<()> {
    let mut doc = XmlDoc::load(path)?;
    let root = doc.root()?;

    let package_name = doc.name("package");
    if doc.element_name(root) != Some(package_name) {
        return Err(Error::Xml {
            message: format!("{}: root element is not <package>", path.display()),
        });
    }

    let metadata_name = doc.name("metadata");
    let metadata = match doc.elements_named(root, metadata_name).first().copied() {
        Some(existing) => existing,
        None => doc.append_element(root, metadata_name)?,
    };

    let version_name = doc.name("version");
    let matches = doc.elements_named(metadata, version_name);
    reconcile_element(&mut doc, &matches, version_name, request.primary(), |_| Ok(metadata))?;

    doc.save(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::{DerivedVersionSet, VersionComponents};

    fn derive(input: &str) -> DerivedVersionSet {
        DerivedVersionSet::derive(&VersionComponents::parse(input).unwrap(), false)
    }

    fn stamp_str(xml: &str, version: &str, release: bool) -> String {
        let versions = derive(version);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pkg.nuspec");
        std::fs::write(&path, xml).unwrap();
        assert!(process(&path, StampRequest { versions: &versions, release }));
        std::fs::read_to_string(&path).unwrap()
    }

    #[test]
    fn test_version_takes_package_rendering_with_suffix() {
        let xml = stamp_str(
            "<package><metadata><id>Demo</id><version>old</version></metadata></package>",
            "2.5.1-beta2",
            false,
        );
        assert!(xml.contains("<version>2.5.1.0-beta2</version>"));
        assert!(xml.contains("<id>Demo</id>"));
    }

    #[test]
    fn test_release_mode_drops_revision_keeps_suffix() {
        let xml = stamp_str(
            "<package><metadata><version>old</version></metadata></package>",
            "2.5.1-beta2",
            true,
        );
        assert!(xml.contains("<version>2.5.1-beta2</version>"));
    }

    #[test]
    fn test_missing_metadata_container_is_created_once() {
        let xml = stamp_str("<package></package>", "1.0.0", false);
        assert_eq!(
            xml,
            "<package><metadata><version>1.0.0.0</version></metadata></package>"
        );
    }

    #[test]
    fn test_existing_metadata_is_not_duplicated() {
        // Regression for the duplicate-append of the original tool: a found
        // metadata container stays put and stays single.
        let xml = stamp_str(
            "<package><metadata><id>Demo</id></metadata></package>",
            "1.0.0",
            false,
        );
        assert_eq!(xml.matches("<metadata>").count(), 1);
        assert!(xml.contains("<version>1.0.0.0</version>"));
    }

    #[test]
    fn test_wrong_root_element_fails_the_file() {
        let versions = derive("1.0.0");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pkg.nuspec");
        std::fs::write(&path, "<Project></Project>").unwrap();
        assert!(!process(&path, StampRequest { versions: &versions, release: false }));
        // Nothing written.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<Project></Project>");
    }

    #[test]
    fn test_missing_file_reports_false() {
        let versions = derive("1.0.0");
        let path = Path::new("definitely/not/here.nuspec");
        assert!(!process(path, StampRequest { versions: &versions, release: false }));
    }
}
