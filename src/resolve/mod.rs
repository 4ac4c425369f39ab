//! Tower resolution: raw index records to physical eta/phi coordinates.
//!
//! Resolution runs per flavor:
//!
//! 1. **Index**: collect the flavor's regions (`Reg_PTower` group), and look
//!    up its subregion and sampling field.
//! 2. **Read**: parse the raw index table into typed records.
//! 3. **Resolve**: match each record's region index against the regions'
//!    `PTregion` range, then map its indices through that region's axes.
//!
//! The first failing record aborts the flavor; no partial catalog is built.

pub mod catalog;
pub mod config;
pub mod coords;
pub mod error;
pub mod lint;
pub mod region;
pub mod table;
pub mod types;

pub use catalog::{FlavorIndex, FlavorOutcome, TowerCatalogBuilder};
pub use config::{CatalogConfig, FlavorConfig};
pub use coords::{index_to_coordinate, map_indices, AnchorMode, MappedPosition};
pub use error::ResolveError;
pub use region::{AxisGeometry, RegionDefinition, RegionResolver};
pub use table::{parse_table, read_table};
pub use types::*;
