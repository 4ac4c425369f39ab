//! Typed dictionary nodes

use std::fmt;

use crate::parser::ast::{Span, XmlAttribute};

/// The node kinds an identifier dictionary is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Region,
    Subregion,
    Field,
    Range,
    Label,
    Reference,
}

impl NodeKind {
    /// Element name used in dictionary files
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Region => "region",
            NodeKind::Subregion => "subregion",
            NodeKind::Field => "field",
            NodeKind::Range => "range",
            NodeKind::Label => "label",
            NodeKind::Reference => "reference",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Original attribute text of a node, in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[XmlAttribute]> for Attributes {
    fn from(attrs: &[XmlAttribute]) -> Self {
        Self(
            attrs
                .iter()
                .map(|a| (a.name.clone(), a.value.clone()))
                .collect(),
        )
    }
}

/// Common surface of every typed node: its kind and its attribute text.
///
/// Attribute lookups always return the text as written in the dictionary,
/// so equality queries compare original tokens rather than reformatted
/// numbers.
pub trait DictionaryNode {
    const KIND: NodeKind;

    fn attributes(&self) -> &Attributes;

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes().get(name)
    }
}

/// Constraint carried by a `<range>` node
#[derive(Debug, Clone, PartialEq)]
pub enum RangeConstraint {
    /// `value="3"`
    Value(String),
    /// `values="-2 2"`
    Values(Vec<String>),
    /// `minvalue` and/or `maxvalue`
    Bounds { min: Option<i64>, max: Option<i64> },
    /// No value attributes at all
    Unconstrained,
}

impl RangeConstraint {
    /// The single expected value token, if this is a `value` constraint
    pub fn value_token(&self) -> Option<&str> {
        match self {
            RangeConstraint::Value(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Whether an integer index satisfies this constraint
    pub fn admits(&self, index: i64) -> bool {
        let token_matches = |token: &str| token.trim().parse::<i64>().ok() == Some(index);
        match self {
            RangeConstraint::Value(v) => token_matches(v),
            RangeConstraint::Values(vs) => vs.iter().any(|v| token_matches(v)),
            RangeConstraint::Bounds { min, max } => {
                min.map_or(true, |m| index >= m) && max.map_or(true, |m| index <= m)
            }
            RangeConstraint::Unconstrained => true,
        }
    }
}

impl fmt::Display for RangeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeConstraint::Value(v) => write!(f, "{}", v),
            RangeConstraint::Values(vs) => write!(f, "{{{}}}", vs.join(", ")),
            RangeConstraint::Bounds { min, max } => {
                let bound = |b: &Option<i64>| b.map(|v| v.to_string()).unwrap_or_default();
                write!(f, "[{}..{}]", bound(min), bound(max))
            }
            RangeConstraint::Unconstrained => write!(f, "*"),
        }
    }
}

/// `<range field=".." .../>` nested in a region or subregion
#[derive(Debug, Clone, PartialEq)]
pub struct RangeNode {
    pub field: String,
    pub constraint: RangeConstraint,
    pub wraparound: bool,
    pub attributes: Attributes,
    pub span: Span,
}

impl DictionaryNode for RangeNode {
    const KIND: NodeKind = NodeKind::Range;

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// `<reference subregion=".."/>` nested in a region
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceNode {
    pub subregion: String,
    pub attributes: Attributes,
}

impl DictionaryNode for ReferenceNode {
    const KIND: NodeKind = NodeKind::Reference;

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// `<region group=".." eta0=".." deta=".." phi0=".." dphi="..">`
///
/// The four axis attributes are optional on the node (most regions of a full
/// calorimeter dictionary have none); they are required once a region is
/// used for coordinate resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionNode {
    pub group: String,
    pub name: Option<String>,
    pub eta0: Option<f64>,
    pub phi0: Option<f64>,
    pub deta: Option<f64>,
    pub dphi: Option<f64>,
    pub ranges: Vec<RangeNode>,
    pub references: Vec<ReferenceNode>,
    pub attributes: Attributes,
    pub span: Span,
}

impl RegionNode {
    /// Ranges constraining the given field, in document order
    pub fn ranges_for<'a, 'f>(&'a self, field: &'f str) -> impl Iterator<Item = &'a RangeNode> + 'f
    where
        'a: 'f,
    {
        self.ranges.iter().filter(move |r| r.field == field)
    }

    /// First range constraining the given field
    pub fn range(&self, field: &str) -> Option<&RangeNode> {
        self.ranges.iter().find(|r| r.field == field)
    }

    /// Whether this region references the named subregion
    pub fn references_subregion(&self, name: &str) -> bool {
        self.references.iter().any(|r| r.subregion == name)
    }
}

impl DictionaryNode for RegionNode {
    const KIND: NodeKind = NodeKind::Region;

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// `<subregion name="..">`
#[derive(Debug, Clone, PartialEq)]
pub struct SubregionNode {
    pub name: String,
    pub ranges: Vec<RangeNode>,
    pub attributes: Attributes,
    pub span: Span,
}

impl DictionaryNode for SubregionNode {
    const KIND: NodeKind = NodeKind::Subregion;

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// `<label name=".." value=".."/>` nested in a field
#[derive(Debug, Clone, PartialEq)]
pub struct LabelNode {
    pub name: String,
    pub value: Option<i64>,
    pub attributes: Attributes,
}

impl DictionaryNode for LabelNode {
    const KIND: NodeKind = NodeKind::Label;

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// `<field name="..">`, used for sampling layers
#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
    pub name: String,
    pub labels: Vec<LabelNode>,
    pub attributes: Attributes,
    pub span: Span,
}

impl FieldNode {
    /// Label values declared on this field
    pub fn label_values(&self) -> impl Iterator<Item = i64> + '_ {
        self.labels.iter().filter_map(|l| l.value)
    }
}

impl DictionaryNode for FieldNode {
    const KIND: NodeKind = NodeKind::Field;

    fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// Select every node whose attribute equals `value`, preserving order
pub fn select_by_attribute<'a, N: DictionaryNode>(
    nodes: &'a [N],
    attribute: &str,
    value: &str,
) -> Vec<&'a N> {
    nodes
        .iter()
        .filter(|n| n.attribute(attribute) == Some(value))
        .collect()
}
