//! Region lookup by raw region index

use crate::dictionary::{
    DictionaryError, DictionaryNode, GeometryDictionary, NodeKind, RangeNode, RegionNode,
};

use super::error::ResolveError;

/// Origin and step for both axes of a region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisGeometry {
    pub eta0: f64,
    pub phi0: f64,
    pub deta: f64,
    pub dphi: f64,
}

/// A dictionary region that carries a complete coordinate transform
#[derive(Debug, Clone, PartialEq)]
pub struct RegionDefinition<'d> {
    pub node: &'d RegionNode,
    pub axes: AxisGeometry,
}

impl<'d> RegionDefinition<'d> {
    /// Requires all four of `eta0`, `phi0`, `deta`, `dphi` on the node
    pub fn from_node(node: &'d RegionNode) -> Result<Self, DictionaryError> {
        let require = |value: Option<f64>, attribute: &str| {
            value.ok_or_else(|| {
                DictionaryError::missing_attribute(NodeKind::Region, attribute, node.span.clone())
            })
        };

        Ok(Self {
            node,
            axes: AxisGeometry {
                eta0: require(node.eta0, "eta0")?,
                phi0: require(node.phi0, "phi0")?,
                deta: require(node.deta, "deta")?,
                dphi: require(node.dphi, "dphi")?,
            },
        })
    }

    /// Region name, or its group when unnamed
    pub fn label(&self) -> &str {
        self.node.name.as_deref().unwrap_or(&self.node.group)
    }

    /// First range constraining `field`
    pub fn range(&self, field: &str) -> Option<&'d RangeNode> {
        self.node.range(field)
    }

    /// Whether this region's first `field` constraint is exactly `token`
    pub fn matches(&self, field: &str, token: &str) -> bool {
        self.range(field)
            .and_then(|r| r.constraint.value_token())
            .is_some_and(|v| v == token)
    }
}

/// Candidate regions of one flavor, searched by region index
#[derive(Debug, Clone)]
pub struct RegionResolver<'d> {
    group: String,
    field: String,
    regions: Vec<RegionDefinition<'d>>,
}

impl<'d> RegionResolver<'d> {
    /// Index every region of `group`; `field` names the range that carries
    /// the region index.
    pub fn new(
        dictionary: &'d GeometryDictionary,
        group: &str,
        field: &str,
    ) -> Result<Self, ResolveError> {
        let nodes = dictionary.regions(group);
        if nodes.is_empty() {
            return Err(ResolveError::missing_definition(NodeKind::Region, group));
        }

        let regions = nodes
            .into_iter()
            .map(RegionDefinition::from_node)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            group: group.to_string(),
            field: field.to_string(),
            regions,
        })
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn regions(&self) -> &[RegionDefinition<'d>] {
        &self.regions
    }

    /// First region whose index constraint equals `token`, in dictionary order
    pub fn find(&self, token: &str) -> Option<&RegionDefinition<'d>> {
        self.regions.iter().find(|r| r.matches(&self.field, token))
    }

    /// Exactly one region for `token`; `line` is reported on failure
    pub fn resolve(&self, token: &str, line: usize) -> Result<&RegionDefinition<'d>, ResolveError> {
        let mut matches = self.regions.iter().filter(|r| r.matches(&self.field, token));
        let first = matches
            .next()
            .ok_or_else(|| ResolveError::unresolved(&self.group, token, line))?;

        let extra = matches.count();
        if extra > 0 {
            return Err(ResolveError::AmbiguousRegion {
                group: self.group.clone(),
                index: token.to_string(),
                count: extra + 1,
                line,
            });
        }
        Ok(first)
    }
}

impl DictionaryNode for RegionDefinition<'_> {
    const KIND: NodeKind = NodeKind::Region;

    fn attributes(&self) -> &crate::dictionary::Attributes {
        &self.node.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DICT: &str = r#"<IdDictionary>
  <field name="GTsampling"/>
  <subregion name="GTower"/>
  <region group="Reg_GTower" name="GT_0" eta0="0.0" deta="0.2" phi0="0.0" dphi="0.2">
    <range field="calo" value="7"/>
    <range field="GTregion" value="0"/>
  </region>
  <region group="Reg_GTower" name="GT_1" eta0="2.4" deta="0.1" phi0="0.0" dphi="0.4">
    <range field="GTregion" value="1"/>
  </region>
  <region group="Reg_GTower" name="GT_1b" eta0="3.2" deta="0.4" phi0="0.0" dphi="0.4">
    <range field="GTregion" value="01"/>
  </region>
  <region group="Reg_Dup" eta0="0" deta="1" phi0="0" dphi="1">
    <range field="DTregion" value="5"/>
  </region>
  <region group="Reg_Dup" eta0="1" deta="1" phi0="0" dphi="1">
    <range field="DTregion" value="5"/>
  </region>
  <region group="Reg_Bare">
    <range field="BTregion" value="0"/>
  </region>
</IdDictionary>"#;

    fn dictionary() -> GeometryDictionary {
        GeometryDictionary::from_str(DICT).expect("Should load")
    }

    #[test]
    fn test_find_by_region_index() {
        let dict = dictionary();
        let resolver = RegionResolver::new(&dict, "Reg_GTower", "GTregion").unwrap();
        assert_eq!(resolver.group(), "Reg_GTower");
        assert_eq!(resolver.regions().len(), 3);

        let region = resolver.find("1").expect("Region 1 exists");
        assert_eq!(region.label(), "GT_1");
        assert_eq!(region.axes.eta0, 2.4);
        assert_eq!(region.axes.deta, 0.1);
    }

    #[test]
    fn test_index_compared_as_text() {
        let dict = dictionary();
        let resolver = RegionResolver::new(&dict, "Reg_GTower", "GTregion").unwrap();
        assert_eq!(resolver.find("01").map(|r| r.label()), Some("GT_1b"));
        assert_eq!(resolver.find("1").map(|r| r.label()), Some("GT_1"));
        assert!(resolver.find("1.0").is_none());
    }

    #[test]
    fn test_other_fields_ignored() {
        let dict = dictionary();
        let resolver = RegionResolver::new(&dict, "Reg_GTower", "GTregion").unwrap();
        // "7" is the calo field value, not a region index
        assert!(resolver.find("7").is_none());
    }

    #[test]
    fn test_unresolved_region() {
        let dict = dictionary();
        let resolver = RegionResolver::new(&dict, "Reg_GTower", "GTregion").unwrap();
        let err = resolver.resolve("9", 12).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::UnresolvedRegion { ref index, line: 12, .. } if index == "9"
        ));
    }

    #[test]
    fn test_ambiguous_region() {
        let dict = dictionary();
        let resolver = RegionResolver::new(&dict, "Reg_Dup", "DTregion").unwrap();
        // find keeps first-match semantics
        assert_eq!(resolver.find("5").map(|r| r.axes.eta0), Some(0.0));
        let err = resolver.resolve("5", 3).unwrap_err();
        assert!(matches!(err, ResolveError::AmbiguousRegion { count: 2, .. }));
    }

    #[test]
    fn test_missing_group() {
        let dict = dictionary();
        let err = RegionResolver::new(&dict, "Reg_XTower", "XTregion").unwrap_err();
        assert!(matches!(err, ResolveError::MissingDefinition { .. }));
    }

    #[test]
    fn test_region_without_axes_rejected() {
        let dict = dictionary();
        let err = RegionResolver::new(&dict, "Reg_Bare", "BTregion").unwrap_err();
        assert!(err.to_string().contains("eta0"));
    }

    #[test]
    fn test_definition_exposes_original_attributes() {
        let dict = dictionary();
        let resolver = RegionResolver::new(&dict, "Reg_GTower", "GTregion").unwrap();
        assert_eq!(resolver.regions()[0].attribute("deta"), Some("0.2"));
    }
}
