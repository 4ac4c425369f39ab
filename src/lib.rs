//! Tower Geometry - resolve calorimeter trigger towers into eta/phi coordinates
//!
//! This library loads an identifier dictionary (the XML description of a
//! detector's regions, subregions and sampling fields), reads raw tower
//! index tables, and maps every tower's integer indices to physical
//! coordinates through its region's affine transform.
//!
//! # Example
//!
//! ```rust
//! use tower_geometry::{CatalogConfig, FlavorConfig, GeometryDictionary, TowerCatalogBuilder};
//!
//! let dictionary = GeometryDictionary::from_str(r#"
//!     <IdDictionary>
//!       <field name="GTsampling"/>
//!       <subregion name="GTower"/>
//!       <region group="Reg_GTower" eta0="0.0" deta="0.2" phi0="0.0" dphi="0.2">
//!         <range field="GTregion" value="0"/>
//!       </region>
//!     </IdDictionary>
//! "#).unwrap();
//!
//! let builder = TowerCatalogBuilder::new(&dictionary, CatalogConfig::default());
//! let flavor = FlavorConfig::new("G", "gTowerInfo.txt");
//! let catalog = builder
//!     .build_from_str(&flavor, "id sign region sampling ieta iphi\n0x1 -1 0 0 3 0\n")
//!     .unwrap();
//!
//! assert!((catalog.elements[0].eta + 0.8).abs() < 1e-12);
//! ```

pub mod dictionary;
pub mod error;
pub mod output;
pub mod parser;
pub mod resolve;
pub mod settings;

pub use dictionary::{DictionaryError, GeometryDictionary};
pub use error::ParseError;
pub use output::{format_catalog, OutputConfig};
pub use resolve::{
    AnchorMode, Catalog, CatalogConfig, FlavorConfig, FlavorOutcome, ResolveError,
    ResolvedElement, TowerCatalogBuilder,
};
pub use settings::{ConfigError, Settings};

use thiserror::Error;
use tracing::info;

/// Errors that abort a whole run
#[derive(Debug, Error)]
pub enum RunError {
    /// Settings could not be loaded
    #[error("settings error: {0}")]
    Config(#[from] ConfigError),

    /// Dictionary could not be loaded
    #[error("dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),
}

/// Per-flavor results of a run, in configuration order
#[derive(Debug)]
pub struct RunReport {
    pub outcomes: Vec<FlavorOutcome>,
}

impl RunReport {
    /// Whether every flavor resolved
    pub fn all_ok(&self) -> bool {
        self.outcomes.iter().all(FlavorOutcome::is_ok)
    }

    /// Successfully built catalogs
    pub fn catalogs(&self) -> impl Iterator<Item = &Catalog> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Failed flavors with their errors
    pub fn failures(&self) -> impl Iterator<Item = (&str, &ResolveError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.flavor.as_str(), e)))
    }
}

/// Load the configured dictionary and resolve every flavor
///
/// A dictionary failure aborts the run. Flavor failures are reported in
/// the returned [`RunReport`] and do not stop other flavors.
pub fn run(settings: &Settings) -> Result<RunReport, RunError> {
    let dictionary = GeometryDictionary::from_file(&settings.dictionary)?;
    Ok(run_with_dictionary(&dictionary, settings))
}

/// Resolve every configured flavor against an already loaded dictionary
pub fn run_with_dictionary(dictionary: &GeometryDictionary, settings: &Settings) -> RunReport {
    let builder = TowerCatalogBuilder::new(dictionary, settings.catalog.clone());
    let outcomes = builder.build_all(&settings.flavors);
    let report = RunReport { outcomes };
    info!(
        flavors = report.outcomes.len(),
        failed = report.failures().count(),
        anchor = %settings.catalog.anchor,
        "run complete"
    );
    report
}
