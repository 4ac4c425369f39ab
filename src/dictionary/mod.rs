//! Geometry dictionary: an immutable, typed index over an identifier
//! dictionary file.
//!
//! The dictionary is built once from the parsed element tree and then only
//! queried. Lookups are attribute-equality queries over the top-level node
//! collections, returned in document order.

mod build;
pub mod error;
pub mod types;

pub use error::DictionaryError;
pub use types::*;

use std::path::Path;

use tracing::{debug, info};

use crate::parser::{self, XmlElement};

/// Name of the root element of an identifier dictionary
pub const ROOT_ELEMENT: &str = "IdDictionary";

/// A borrowed top-level node of any kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Region(&'a RegionNode),
    Subregion(&'a SubregionNode),
    Field(&'a FieldNode),
}

impl<'a> NodeRef<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Region(_) => NodeKind::Region,
            NodeRef::Subregion(_) => NodeKind::Subregion,
            NodeRef::Field(_) => NodeKind::Field,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        match *self {
            NodeRef::Region(n) => n.attributes.get(name),
            NodeRef::Subregion(n) => n.attributes.get(name),
            NodeRef::Field(n) => n.attributes.get(name),
        }
    }
}

/// Loaded identifier dictionary
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryDictionary {
    /// `name` attribute of the root element
    pub name: Option<String>,
    /// `version` attribute of the root element
    pub version: Option<String>,
    regions: Vec<RegionNode>,
    subregions: Vec<SubregionNode>,
    fields: Vec<FieldNode>,
}

impl GeometryDictionary {
    /// Load a dictionary from an XML file
    pub fn from_file(path: &Path) -> Result<Self, DictionaryError> {
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), bytes = content.len(), "read dictionary file");
        Self::from_str(&content)
    }

    /// Load a dictionary from XML source
    pub fn from_str(source: &str) -> Result<Self, DictionaryError> {
        let document = parser::parse(source)?;
        Self::from_element(&document.root)
    }

    /// Build the typed dictionary from a parsed root element.
    ///
    /// Fails when the root is not an `IdDictionary`, when any of the
    /// `region`, `subregion` or `field` kinds is absent at the top level, or
    /// when a node of a known kind has missing or unparseable attributes.
    pub fn from_element(root: &XmlElement) -> Result<Self, DictionaryError> {
        if root.name != ROOT_ELEMENT {
            return Err(DictionaryError::malformed(
                format!(
                    "root element is <{}>, expected <{}>",
                    root.name, ROOT_ELEMENT
                ),
                Some(root.span.clone()),
            ));
        }

        let mut regions = Vec::new();
        let mut subregions = Vec::new();
        let mut fields = Vec::new();

        for child in &root.children {
            match child.name.as_str() {
                "region" => regions.push(build::region(child)?),
                "subregion" => subregions.push(build::subregion(child)?),
                "field" => fields.push(build::field(child)?),
                other => debug!(element = other, "skipping top-level element"),
            }
        }

        if regions.is_empty() {
            return Err(DictionaryError::missing_kind(NodeKind::Region));
        }
        if subregions.is_empty() {
            return Err(DictionaryError::missing_kind(NodeKind::Subregion));
        }
        if fields.is_empty() {
            return Err(DictionaryError::missing_kind(NodeKind::Field));
        }

        let dictionary = Self {
            name: root.attribute("name").map(str::to_string),
            version: root.attribute("version").map(str::to_string),
            regions,
            subregions,
            fields,
        };
        info!(
            name = dictionary.name.as_deref().unwrap_or("<unnamed>"),
            regions = dictionary.regions.len(),
            subregions = dictionary.subregions.len(),
            fields = dictionary.fields.len(),
            "loaded geometry dictionary"
        );
        Ok(dictionary)
    }

    /// Every top-level node of `kind` whose `attribute` equals `value`.
    ///
    /// Only top-level kinds are searched; nested kinds (`range`, `label`,
    /// `reference`) never match here and yield an empty result. An empty
    /// result is a normal outcome.
    pub fn find_by_attribute(&self, kind: NodeKind, attribute: &str, value: &str) -> Vec<NodeRef<'_>> {
        match kind {
            NodeKind::Region => select_by_attribute(&self.regions, attribute, value)
                .into_iter()
                .map(NodeRef::Region)
                .collect(),
            NodeKind::Subregion => select_by_attribute(&self.subregions, attribute, value)
                .into_iter()
                .map(NodeRef::Subregion)
                .collect(),
            NodeKind::Field => select_by_attribute(&self.fields, attribute, value)
                .into_iter()
                .map(NodeRef::Field)
                .collect(),
            NodeKind::Range | NodeKind::Label | NodeKind::Reference => Vec::new(),
        }
    }

    /// Regions belonging to a region group
    pub fn regions(&self, group: &str) -> Vec<&RegionNode> {
        select_by_attribute(&self.regions, "group", group)
    }

    /// Subregions with the given name
    pub fn subregions(&self, name: &str) -> Vec<&SubregionNode> {
        select_by_attribute(&self.subregions, "name", name)
    }

    /// Sampling fields with the given name
    pub fn samplings(&self, name: &str) -> Vec<&FieldNode> {
        select_by_attribute(&self.fields, "name", name)
    }

    pub fn all_regions(&self) -> &[RegionNode] {
        &self.regions
    }

    pub fn all_subregions(&self) -> &[SubregionNode] {
        &self.subregions
    }

    pub fn all_fields(&self) -> &[FieldNode] {
        &self.fields
    }
}
