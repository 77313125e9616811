//! # XML Documents and Field Reconciliation
//!
//! A thin wrapper around the `xot` XML tree plus the generic reconciliation
//! routine shared by the XML-backed adapters.
//!
//! Documents are parsed with whitespace text nodes intact and serialized
//! without an XML declaration, so formatting the tool does not touch
//! round-trips unchanged.
//!
//! ## Reconciliation
//!
//! [`reconcile_element`] enforces the core post-condition: exactly one
//! element with a given name exists under the scoping container, holding
//! exactly the desired value. The first pre-existing match is kept as the
//! canonical target, every other match is removed, and when there is no
//! match at all the caller-supplied container accessor is invoked to obtain
//! (or create) the parent for a fresh element. The container is an explicit
//! parameter rather than captured mutable state, so adapters can share one
//! lazily created container across several fields. The operation is
//! idempotent.

use std::fs;
use std::path::Path;

use xot::{NameId, Node, Xot};

use crate::error::{Error, Result};

/// One loaded XML document, owned exclusively by the processing of one file.
pub struct XmlDoc {
    xot: Xot,
    document: Node,
}

impl XmlDoc {
    /// Parse a document from a string, preserving whitespace text nodes.
    pub fn parse(content: &str) -> Result<XmlDoc> {
        let mut xot = Xot::new();
        let document = xot.parse(content).map_err(Error::xml)?;
        Ok(XmlDoc { xot, document })
    }

    /// Load a document from disk.
    pub fn load(path: &Path) -> Result<XmlDoc> {
        let content = fs::read_to_string(path)?;
        XmlDoc::parse(&content)
    }

    /// The document element (root).
    pub fn root(&self) -> Result<Node> {
        self.xot.document_element(self.document).map_err(Error::xml)
    }

    /// Intern an element or attribute name.
    pub fn name(&mut self, name: &str) -> NameId {
        self.xot.add_name(name)
    }

    /// The local name of an element node, if it is one.
    pub fn element_name(&self, node: Node) -> Option<NameId> {
        self.xot.element(node).map(|element| element.name())
    }

    /// An attribute value on an element node.
    pub fn attribute(&self, node: Node, name: NameId) -> Option<String> {
        self.xot.attributes(node).get(name).cloned()
    }

    /// Every element named `name` in the subtree rooted at `scope`, in
    /// document order. `scope` itself is not considered a match.
    pub fn elements_named(&self, scope: Node, name: NameId) -> Vec<Node> {
        self.xot
            .descendants(scope)
            .filter(|node| *node != scope && self.element_name(*node) == Some(name))
            .collect()
    }

    /// Create a new element named `name` and append it to `parent`.
    pub fn append_element(&mut self, parent: Node, name: NameId) -> Result<Node> {
        let element = self.xot.new_element(name);
        self.xot.append(parent, element).map_err(Error::xml)?;
        Ok(element)
    }

    /// Replace the content of `element` with a single text node.
    pub fn set_text(&mut self, element: Node, value: &str) -> Result<()> {
        let children: Vec<Node> = self.xot.children(element).collect();
        for child in children {
            self.xot.remove(child).map_err(Error::xml)?;
        }
        let text = self.xot.new_text(value);
        self.xot.append(element, text).map_err(Error::xml)?;
        Ok(())
    }

    /// Remove a node (and its subtree) from the document.
    pub fn remove(&mut self, node: Node) -> Result<()> {
        self.xot.remove(node).map_err(Error::xml)
    }

    /// Serialize the whole document, without an XML declaration.
    pub fn to_xml(&self) -> Result<String> {
        self.xot.to_string(self.document).map_err(Error::xml)
    }

    /// Write the document back to disk.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_xml()?)?;
        Ok(())
    }
}

/// Collapse `matches` to exactly one element named `name` holding `value`.
///
/// The first match becomes the canonical element; all later matches are
/// removed. With no matches, `container` is asked for the parent to append a
/// fresh element to. Running this twice with the same value yields the same
/// document.
pub fn reconcile_element(
    doc: &mut XmlDoc,
    matches: &[Node],
    name: NameId,
    value: &str,
    container: impl FnOnce(&mut XmlDoc) -> Result<Node>,
) -> Result<()> {
    match matches.split_first() {
        Some((canonical, duplicates)) => {
            doc.set_text(*canonical, value)?;
            for duplicate in duplicates {
                doc.remove(*duplicate)?;
            }
        }
        None => {
            let parent = container(doc)?;
            let element = doc.append_element(parent, name)?;
            doc.set_text(element, value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reconcile `element` under the first `container` child of the root,
    /// creating that container on demand.
    fn reconcile(doc: &mut XmlDoc, container: &str, element: &str, value: &str) {
        let root = doc.root().unwrap();
        let container_name = doc.name(container);
        let element_name = doc.name(element);

        let mut matches = Vec::new();
        for scope in doc.elements_named(root, container_name) {
            for node in doc.elements_named(scope, element_name) {
                if !matches.contains(&node) {
                    matches.push(node);
                }
            }
        }

        reconcile_element(doc, &matches, element_name, value, |doc| {
            match doc.elements_named(root, container_name).first() {
                Some(existing) => Ok(*existing),
                None => doc.append_element(root, container_name),
            }
        })
        .unwrap();
    }

    #[test]
    fn test_reconcile_updates_existing_element() {
        let mut doc =
            XmlDoc::parse("<Project><PropertyGroup><Version>0.1.0</Version></PropertyGroup></Project>")
                .unwrap();
        reconcile(&mut doc, "PropertyGroup", "Version", "2.0.0");
        assert_eq!(
            doc.to_xml().unwrap(),
            "<Project><PropertyGroup><Version>2.0.0</Version></PropertyGroup></Project>"
        );
    }

    #[test]
    fn test_reconcile_collapses_duplicates() {
        let mut doc = XmlDoc::parse(
            "<Project><PropertyGroup><Version>a</Version><Version>b</Version></PropertyGroup>\
             <PropertyGroup><Version>c</Version></PropertyGroup></Project>",
        )
        .unwrap();
        reconcile(&mut doc, "PropertyGroup", "Version", "1.2.3");
        let xml = doc.to_xml().unwrap();
        assert_eq!(xml.matches("<Version>").count(), 1);
        assert!(xml.contains("<Version>1.2.3</Version>"));
        // The emptied second group stays behind; only the elements go.
        assert_eq!(xml.matches("<PropertyGroup>").count(), 2);
    }

    #[test]
    fn test_reconcile_creates_container_and_element() {
        let mut doc = XmlDoc::parse("<Project></Project>").unwrap();
        reconcile(&mut doc, "PropertyGroup", "Version", "1.2.3");
        assert_eq!(
            doc.to_xml().unwrap(),
            "<Project><PropertyGroup><Version>1.2.3</Version></PropertyGroup></Project>"
        );
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut doc = XmlDoc::parse(
            "<Project><PropertyGroup><Version>a</Version><Version>b</Version></PropertyGroup></Project>",
        )
        .unwrap();
        reconcile(&mut doc, "PropertyGroup", "Version", "1.2.3");
        let once = doc.to_xml().unwrap();
        reconcile(&mut doc, "PropertyGroup", "Version", "1.2.3");
        let twice = doc.to_xml().unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_untouched_formatting_survives_round_trip() {
        let original = "<Project>\n  <ItemGroup>\n    <Compile Include=\"a.cs\"/>\n  </ItemGroup>\n</Project>";
        let doc = XmlDoc::parse(original).unwrap();
        assert_eq!(doc.to_xml().unwrap(), original);
    }

    #[test]
    fn test_parse_rejects_malformed_document() {
        assert!(XmlDoc::parse("<Project><unclosed>").is_err());
        assert!(XmlDoc::parse("not xml at all").is_err());
    }
}
