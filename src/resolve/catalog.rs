//! Catalog building: resolve every record of a flavor against the dictionary

use std::path::Path;

use tracing::{debug, info, trace, warn};

use crate::dictionary::{FieldNode, GeometryDictionary, NodeKind, SubregionNode};

use super::config::{CatalogConfig, FlavorConfig};
use super::coords::map_indices;
use super::error::ResolveError;
use super::region::{RegionDefinition, RegionResolver};
use super::table::{parse_table, read_table};
use super::types::{Catalog, RawElementRecord, ResolvedElement};

/// Everything the dictionary defines for one flavor, looked up once
#[derive(Debug, Clone)]
pub struct FlavorIndex<'d> {
    pub flavor: FlavorConfig,
    pub regions: RegionResolver<'d>,
    pub subregion: &'d SubregionNode,
    pub sampling: &'d FieldNode,
}

/// Result of building one flavor's catalog
#[derive(Debug)]
pub struct FlavorOutcome {
    pub flavor: String,
    pub result: Result<Catalog, ResolveError>,
}

impl FlavorOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Builds resolved catalogs from raw index records
#[derive(Debug, Clone)]
pub struct TowerCatalogBuilder<'d> {
    dictionary: &'d GeometryDictionary,
    config: CatalogConfig,
}

impl<'d> TowerCatalogBuilder<'d> {
    pub fn new(dictionary: &'d GeometryDictionary, config: CatalogConfig) -> Self {
        Self { dictionary, config }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Look up the flavor's regions, subregion and sampling field.
    ///
    /// All three must exist, and every region of the group must carry a
    /// complete axis definition.
    pub fn index_flavor(&self, flavor: &FlavorConfig) -> Result<FlavorIndex<'d>, ResolveError> {
        let regions = RegionResolver::new(self.dictionary, &flavor.region_group, &flavor.region_field)?;

        let subregion = self
            .dictionary
            .subregions(&flavor.subregion)
            .into_iter()
            .next()
            .ok_or_else(|| ResolveError::missing_definition(NodeKind::Subregion, &flavor.subregion))?;

        let sampling = self
            .dictionary
            .samplings(&flavor.sampling)
            .into_iter()
            .next()
            .ok_or_else(|| ResolveError::missing_definition(NodeKind::Field, &flavor.sampling))?;

        debug!(
            flavor = %flavor.name,
            group = regions.group(),
            regions = regions.regions().len(),
            samplings = sampling.labels.len(),
            "indexed flavor"
        );

        Ok(FlavorIndex {
            flavor: flavor.clone(),
            regions,
            subregion,
            sampling,
        })
    }

    /// Resolve a single record against an indexed flavor
    pub fn resolve_record(
        &self,
        index: &FlavorIndex<'d>,
        record: &RawElementRecord,
    ) -> Result<ResolvedElement, ResolveError> {
        let region = index.regions.resolve(&record.region_token, record.line)?;
        if self.config.strict {
            check_indices(index, region, record)?;
        }

        let position = map_indices(
            record.ieta,
            record.iphi,
            &region.axes,
            record.sign,
            self.config.anchor,
        );
        trace!(
            id = %record.identifier,
            region = region.label(),
            eta = position.eta,
            phi = position.phi,
            "resolved element"
        );

        Ok(ResolvedElement {
            identifier: record.identifier.clone(),
            eta: position.eta,
            phi: position.phi,
            region: record.region_index,
            sampling: record.sampling,
            deta: position.deta,
            dphi: position.dphi,
        })
    }

    /// Resolve all records in order; the first failure aborts the flavor
    pub fn build_from_records(
        &self,
        flavor: &FlavorConfig,
        records: &[RawElementRecord],
    ) -> Result<Catalog, ResolveError> {
        let index = self.index_flavor(flavor)?;
        let elements = records
            .iter()
            .map(|record| self.resolve_record(&index, record))
            .collect::<Result<Vec<_>, _>>()?;

        let catalog = Catalog {
            flavor: flavor.name.clone(),
            anchor: self.config.anchor,
            elements,
        };
        log_summary(&catalog);
        Ok(catalog)
    }

    /// Build from table source text
    pub fn build_from_str(&self, flavor: &FlavorConfig, source: &str) -> Result<Catalog, ResolveError> {
        let records = parse_table(source)?;
        self.build_from_records(flavor, &records)
    }

    /// Build from a table file
    pub fn build_from_file(&self, flavor: &FlavorConfig, path: &Path) -> Result<Catalog, ResolveError> {
        let records = read_table(path)?;
        self.build_from_records(flavor, &records)
    }

    /// Build every flavor from its configured table, in order.
    ///
    /// A failing flavor does not stop the others.
    pub fn build_all(&self, flavors: &[FlavorConfig]) -> Vec<FlavorOutcome> {
        flavors
            .iter()
            .map(|flavor| {
                let result = self.build_from_file(flavor, &flavor.table);
                if let Err(e) = &result {
                    warn!(flavor = %flavor.name, error = %e, "flavor failed");
                }
                FlavorOutcome {
                    flavor: flavor.name.clone(),
                    result,
                }
            })
            .collect()
    }
}

/// Strict checks: the region belongs to the flavor's subregion, axis indices
/// lie within the region's declared ranges and the sampling layer is among
/// the sampling field's labels
fn check_indices(
    index: &FlavorIndex<'_>,
    region: &RegionDefinition<'_>,
    record: &RawElementRecord,
) -> Result<(), ResolveError> {
    // Regions without references are not tied to a subregion
    let node = region.node;
    if !node.references.is_empty() && !node.references_subregion(&index.subregion.name) {
        return Err(ResolveError::SubregionMismatch {
            region: region.label().to_string(),
            subregion: index.subregion.name.clone(),
            line: record.line,
        });
    }

    let axes = [
        (&index.flavor.eta_field, record.ieta),
        (&index.flavor.phi_field, record.iphi),
    ];
    for (field, value) in axes {
        if let Some(range) = region.range(field) {
            if !range.constraint.admits(value) {
                return Err(ResolveError::IndexOutOfRange {
                    field: field.clone(),
                    index: value,
                    expected: range.constraint.to_string(),
                    region: region.label().to_string(),
                    line: record.line,
                });
            }
        }
    }

    // A field without valued labels does not restrict sampling
    let mut labels = index.sampling.label_values().peekable();
    if labels.peek().is_some() && !labels.any(|v| v == record.sampling) {
        return Err(ResolveError::UnknownSampling {
            field: index.sampling.name.clone(),
            sampling: record.sampling,
            line: record.line,
        });
    }
    Ok(())
}

fn log_summary(catalog: &Catalog) {
    let bounds = catalog
        .bounds()
        .map(|b| format!("eta [{:.4}, {:.4}] phi [{:.4}, {:.4}]", b.x, b.right(), b.y, b.top()))
        .unwrap_or_else(|| "empty".to_string());
    info!(
        flavor = %catalog.flavor,
        elements = catalog.len(),
        regions = ?catalog.distinct_regions(),
        samplings = ?catalog.distinct_samplings(),
        bounds = %bounds,
        "built catalog"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::coords::AnchorMode;

    const DICT: &str = r#"<IdDictionary name="test">
  <field name="GTsampling">
    <label name="EM" value="0"/>
    <label name="Had" value="1"/>
  </field>
  <field name="JTsampling"/>
  <subregion name="GTower"/>
  <subregion name="JTower"/>
  <region group="Reg_GTower" name="GT_0" eta0="0.0" deta="0.2" phi0="0.0" dphi="0.2">
    <range field="GTregion" value="0"/>
    <range field="GTeta" minvalue="0" maxvalue="11"/>
    <range field="GTphi" minvalue="0" maxvalue="31"/>
  </region>
  <region group="Reg_GTower" name="GT_1" eta0="2.4" deta="0.1" phi0="0.0" dphi="0.4">
    <range field="GTregion" value="1"/>
  </region>
  <region group="Reg_JTower" name="JT_0" eta0="0.0" deta="0.1" phi0="0.0" dphi="0.1">
    <range field="JTregion" value="0"/>
    <reference subregion="JTower"/>
  </region>
  <region group="Reg_JTower" name="JT_1" eta0="2.5" deta="0.2" phi0="0.0" dphi="0.2">
    <range field="JTregion" value="1"/>
    <reference subregion="GTower"/>
  </region>
</IdDictionary>"#;

    fn dictionary() -> GeometryDictionary {
        GeometryDictionary::from_str(DICT).expect("Should load")
    }

    fn g() -> FlavorConfig {
        FlavorConfig::new("G", "gTowerInfo.txt")
    }

    #[test]
    fn test_build_edge_catalog() {
        let dict = dictionary();
        let builder = TowerCatalogBuilder::new(&dict, CatalogConfig::default());
        let catalog = builder
            .build_from_str(&g(), "header\n0xa 1 0 0 3 0\n0xb -1 0 0 3 0\n0xc 1 1 1 2 1\n")
            .expect("Should build");

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.flavor, "G");
        assert!((catalog.elements[0].eta - 0.6).abs() < 1e-12);
        assert!((catalog.elements[1].eta - (-0.8)).abs() < 1e-12);
        assert!((catalog.elements[2].eta - 2.6).abs() < 1e-12);
        assert!((catalog.elements[2].phi - 0.4).abs() < 1e-12);
        assert_eq!(catalog.elements[2].deta, 0.1);
        assert_eq!(catalog.elements[2].dphi, 0.4);
        assert_eq!(catalog.elements[2].region, 1);
        assert_eq!(catalog.elements[2].sampling, 1);
    }

    #[test]
    fn test_build_center_catalog() {
        let dict = dictionary();
        let builder = TowerCatalogBuilder::new(&dict, CatalogConfig::new().with_anchor(AnchorMode::Center));
        let catalog = builder.build_from_str(&g(), "header\n0xa 1 0 0 3 0\n").unwrap();
        assert!((catalog.elements[0].eta - 0.7).abs() < 1e-12);
        assert!((catalog.elements[0].phi - 0.1).abs() < 1e-12);
        assert_eq!(catalog.anchor, AnchorMode::Center);
    }

    #[test]
    fn test_order_preserved() {
        let dict = dictionary();
        let builder = TowerCatalogBuilder::new(&dict, CatalogConfig::default());
        let catalog = builder
            .build_from_str(&g(), "header\n0x3 1 1 0 0 0\n0x1 1 0 0 0 0\n0x2 -1 1 0 0 0\n")
            .unwrap();
        let ids: Vec<_> = catalog.iter().map(|e| e.identifier.as_str()).collect();
        assert_eq!(ids, vec!["0x3", "0x1", "0x2"]);
    }

    #[test]
    fn test_malformed_row_aborts_flavor() {
        let dict = dictionary();
        let builder = TowerCatalogBuilder::new(&dict, CatalogConfig::default());
        let err = builder
            .build_from_str(&g(), "header\n0xa 1 0 0 3 0\n0xb 1 0 0 3\n")
            .unwrap_err();
        assert!(matches!(err, ResolveError::MalformedRecord { line: 3, .. }));
    }

    #[test]
    fn test_unresolved_region_aborts_flavor() {
        let dict = dictionary();
        let builder = TowerCatalogBuilder::new(&dict, CatalogConfig::default());
        let err = builder.build_from_str(&g(), "header\n0xa 1 7 0 3 0\n").unwrap_err();
        assert!(matches!(err, ResolveError::UnresolvedRegion { line: 2, .. }));
    }

    #[test]
    fn test_missing_subregion_and_sampling() {
        let dict = dictionary();
        let builder = TowerCatalogBuilder::new(&dict, CatalogConfig::default());

        let err = builder
            .index_flavor(&g().with_subregion("XTower"))
            .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::MissingDefinition { kind: NodeKind::Subregion, .. }
        ));

        let err = builder
            .index_flavor(&g().with_sampling("XTsampling"))
            .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::MissingDefinition { kind: NodeKind::Field, .. }
        ));
    }

    #[test]
    fn test_strict_index_out_of_range() {
        let dict = dictionary();
        let source = "header\n0xa 1 0 0 12 0\n";

        let lenient = TowerCatalogBuilder::new(&dict, CatalogConfig::default());
        assert!(lenient.build_from_str(&g(), source).is_ok());

        let strict = TowerCatalogBuilder::new(&dict, CatalogConfig::new().with_strict(true));
        let err = strict.build_from_str(&g(), source).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::IndexOutOfRange { index: 12, ref field, .. } if field == "GTeta"
        ));
        assert!(err.to_string().contains("[0..11]"));
    }

    #[test]
    fn test_strict_unknown_sampling() {
        let dict = dictionary();
        let strict = TowerCatalogBuilder::new(&dict, CatalogConfig::new().with_strict(true));
        let err = strict.build_from_str(&g(), "header\n0xa 1 0 2 0 0\n").unwrap_err();
        assert!(matches!(err, ResolveError::UnknownSampling { sampling: 2, .. }));
    }

    #[test]
    fn test_strict_unlabelled_sampling_field_admits_all() {
        let dict = dictionary();
        let strict = TowerCatalogBuilder::new(&dict, CatalogConfig::new().with_strict(true));
        let j = FlavorConfig::new("J", "jTowerInfo.txt");
        assert!(strict.build_from_str(&j, "header\n0xa 1 0 5 0 0\n").is_ok());
    }

    #[test]
    fn test_strict_region_must_reference_flavor_subregion() {
        let dict = dictionary();
        let j = FlavorConfig::new("J", "jTowerInfo.txt");
        let source = "header\n0xa 1 0 0 0 0\n0xb 1 1 0 0 0\n";

        let lenient = TowerCatalogBuilder::new(&dict, CatalogConfig::default());
        assert_eq!(lenient.build_from_str(&j, source).unwrap().len(), 2);

        let strict = TowerCatalogBuilder::new(&dict, CatalogConfig::new().with_strict(true));
        let err = strict.build_from_str(&j, source).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::SubregionMismatch { ref region, ref subregion, line: 3 }
                if region == "JT_1" && subregion == "JTower"
        ));
        assert_eq!(err.line(), Some(3));

        // JT_0 references JTower, so the first row alone passes
        assert!(strict.build_from_str(&j, "header\n0xa 1 0 0 0 0\n").is_ok());
    }

    #[test]
    fn test_strict_unreferencing_region_passes() {
        let dict = dictionary();
        let strict = TowerCatalogBuilder::new(&dict, CatalogConfig::new().with_strict(true));
        // GT_0 carries no <reference> element
        assert!(strict.build_from_str(&g(), "header\n0xa 1 0 0 0 0\n").is_ok());
    }

    #[test]
    fn test_build_all_keeps_going() {
        let dict = dictionary();
        let builder = TowerCatalogBuilder::new(&dict, CatalogConfig::default());
        let flavors = vec![
            FlavorConfig::new("G", "/nonexistent/gTowerInfo.txt"),
            FlavorConfig::new("X", "/nonexistent/xTowerInfo.txt"),
        ];
        let outcomes = builder.build_all(&flavors);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].flavor, "G");
        assert!(matches!(outcomes[0].result, Err(ResolveError::Io(_))));
        assert!(!outcomes[1].is_ok());
    }
}
