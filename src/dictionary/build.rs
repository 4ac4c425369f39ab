//! Conversion from the generic element tree to typed dictionary nodes
//!
//! All attribute validation and number parsing happens here, once, so later
//! stages only ever see well-typed values.

use std::str::FromStr;

use tracing::debug;

use crate::parser::ast::XmlElement;

use super::error::DictionaryError;
use super::types::*;

/// Required string attribute
fn required(element: &XmlElement, kind: NodeKind, name: &str) -> Result<String, DictionaryError> {
    element
        .attribute(name)
        .map(str::to_string)
        .ok_or_else(|| DictionaryError::missing_attribute(kind, name, element.span.clone()))
}

/// Optional attribute parsed as a number
fn numeric<T: FromStr>(
    element: &XmlElement,
    kind: NodeKind,
    name: &str,
) -> Result<Option<T>, DictionaryError> {
    match element.attribute(name) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            DictionaryError::invalid_number(kind, name, raw, element.span.clone())
        }),
    }
}

pub(crate) fn range(element: &XmlElement) -> Result<RangeNode, DictionaryError> {
    let kind = NodeKind::Range;
    let field = required(element, kind, "field")?;

    let constraint = if let Some(value) = element.attribute("value") {
        RangeConstraint::Value(value.to_string())
    } else if let Some(values) = element.attribute("values") {
        RangeConstraint::Values(values.split_whitespace().map(str::to_string).collect())
    } else {
        let min = numeric::<i64>(element, kind, "minvalue")?;
        let max = numeric::<i64>(element, kind, "maxvalue")?;
        if min.is_none() && max.is_none() {
            RangeConstraint::Unconstrained
        } else {
            RangeConstraint::Bounds { min, max }
        }
    };

    let wraparound = element
        .attribute("wraparound")
        .is_some_and(|w| w.eq_ignore_ascii_case("true"));

    Ok(RangeNode {
        field,
        constraint,
        wraparound,
        attributes: element.attributes.as_slice().into(),
        span: element.span.clone(),
    })
}

pub(crate) fn region(element: &XmlElement) -> Result<RegionNode, DictionaryError> {
    let kind = NodeKind::Region;
    let mut ranges = Vec::new();
    let mut references = Vec::new();

    for child in &element.children {
        match child.name.as_str() {
            "range" => ranges.push(range(child)?),
            "reference" => references.push(ReferenceNode {
                subregion: required(child, NodeKind::Reference, "subregion")?,
                attributes: child.attributes.as_slice().into(),
            }),
            other => debug!(element = other, "ignoring unsupported region child"),
        }
    }

    Ok(RegionNode {
        group: required(element, kind, "group")?,
        name: element.attribute("name").map(str::to_string),
        eta0: numeric(element, kind, "eta0")?,
        phi0: numeric(element, kind, "phi0")?,
        deta: numeric(element, kind, "deta")?,
        dphi: numeric(element, kind, "dphi")?,
        ranges,
        references,
        attributes: element.attributes.as_slice().into(),
        span: element.span.clone(),
    })
}

pub(crate) fn subregion(element: &XmlElement) -> Result<SubregionNode, DictionaryError> {
    let ranges = element
        .children_named("range")
        .map(range)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SubregionNode {
        name: required(element, NodeKind::Subregion, "name")?,
        ranges,
        attributes: element.attributes.as_slice().into(),
        span: element.span.clone(),
    })
}

pub(crate) fn field(element: &XmlElement) -> Result<FieldNode, DictionaryError> {
    let labels = element
        .children_named("label")
        .map(|label| -> Result<LabelNode, DictionaryError> {
            Ok(LabelNode {
                name: required(label, NodeKind::Label, "name")?,
                value: numeric(label, NodeKind::Label, "value")?,
                attributes: label.attributes.as_slice().into(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FieldNode {
        name: required(element, NodeKind::Field, "name")?,
        labels,
        attributes: element.attributes.as_slice().into(),
        span: element.span.clone(),
    })
}
