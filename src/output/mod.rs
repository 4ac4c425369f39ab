//! Text output for resolved catalogs
//!
//! Each catalog becomes a `# flavor` header line followed by one
//! separator-delimited row per element, in catalog order.

pub mod config;
pub mod text;

pub use config::OutputConfig;
pub use text::{format_catalog, format_row};
