//! Configuration for catalog building

use std::path::PathBuf;

use super::coords::AnchorMode;

/// Dictionary names and input table for one element flavor.
///
/// Every name derives from the flavor prefix `P`: region group `Reg_PTower`,
/// region field `PTregion`, subregion `PTower`, sampling field `PTsampling`
/// and axis fields `PTeta` / `PTphi`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlavorConfig {
    /// Flavor prefix, e.g. "G"
    pub name: String,

    /// Raw index table
    pub table: PathBuf,

    /// Region group attribute value
    pub region_group: String,

    /// Range field carrying the region index
    pub region_field: String,

    /// Subregion that must exist for the flavor
    pub subregion: String,

    /// Field whose labels enumerate sampling layers
    pub sampling: String,

    /// Range field bounding the eta index
    pub eta_field: String,

    /// Range field bounding the phi index
    pub phi_field: String,
}

impl FlavorConfig {
    /// Create a flavor with the conventional names for `prefix`
    pub fn new(prefix: impl Into<String>, table: impl Into<PathBuf>) -> Self {
        let name = prefix.into();
        Self {
            region_group: format!("Reg_{}Tower", name),
            region_field: format!("{}Tregion", name),
            subregion: format!("{}Tower", name),
            sampling: format!("{}Tsampling", name),
            eta_field: format!("{}Teta", name),
            phi_field: format!("{}Tphi", name),
            table: table.into(),
            name,
        }
    }

    /// Set the region group
    pub fn with_region_group(mut self, group: impl Into<String>) -> Self {
        self.region_group = group.into();
        self
    }

    /// Set the region index field
    pub fn with_region_field(mut self, field: impl Into<String>) -> Self {
        self.region_field = field.into();
        self
    }

    /// Set the required subregion name
    pub fn with_subregion(mut self, name: impl Into<String>) -> Self {
        self.subregion = name.into();
        self
    }

    /// Set the sampling field name
    pub fn with_sampling(mut self, name: impl Into<String>) -> Self {
        self.sampling = name.into();
        self
    }

    /// Set the eta and phi range fields
    pub fn with_axis_fields(mut self, eta: impl Into<String>, phi: impl Into<String>) -> Self {
        self.eta_field = eta.into();
        self.phi_field = phi.into();
        self
    }

    /// Set the index table path
    pub fn with_table(mut self, table: impl Into<PathBuf>) -> Self {
        self.table = table.into();
        self
    }
}

/// Options shared by every flavor of a catalog run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogConfig {
    /// Edge or center coordinates
    pub anchor: AnchorMode,

    /// Check indices against range constraints and sampling labels
    pub strict: bool,
}

impl CatalogConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the anchor mode
    pub fn with_anchor(mut self, anchor: AnchorMode) -> Self {
        self.anchor = anchor;
        self
    }

    /// Enable or disable strict index checks
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}
