//! Text table generation from resolved catalogs

use crate::resolve::{Catalog, ResolvedElement};

use super::OutputConfig;

/// Render one catalog as a header line plus one row per element
pub fn format_catalog(catalog: &Catalog, config: &OutputConfig) -> String {
    let mut out = String::new();
    if config.header {
        out.push_str(&format!(
            "# flavor {} ({} elements)\n",
            catalog.flavor,
            catalog.len()
        ));
    }
    for element in catalog.iter() {
        out.push_str(&format_row(element, config));
        out.push('\n');
    }
    out
}

/// `id eta phi region sampling deta dphi`
pub fn format_row(element: &ResolvedElement, config: &OutputConfig) -> String {
    let p = config.precision;
    [
        element.identifier.clone(),
        format!("{:.*}", p, element.eta),
        format!("{:.*}", p, element.phi),
        element.region.to_string(),
        element.sampling.to_string(),
        format!("{:.*}", p, element.deta),
        format!("{:.*}", p, element.dphi),
    ]
    .join(&config.separator)
}
