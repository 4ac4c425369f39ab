//! Tiling checks for resolved catalogs.
//!
//! Runs after resolution to look for mechanical defects: elements of the same
//! sampling layer whose footprints overlap, footprints with a non-positive
//! step, and identifiers that occur more than once.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::types::{Catalog, Footprint, ResolvedElement};

/// Overlap smaller than this on either axis is treated as a shared edge
pub const TOLERANCE: f64 = 1e-9;

/// A lint warning about a catalog defect
#[derive(Debug)]
pub struct LintWarning {
    pub category: LintCategory,
    pub message: String,
}

/// Category of lint defect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintCategory {
    Overlap,
    Degenerate,
    Duplicate,
}

impl fmt::Display for LintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintCategory::Overlap => write!(f, "overlap"),
            LintCategory::Degenerate => write!(f, "degenerate"),
            LintCategory::Duplicate => write!(f, "duplicate"),
        }
    }
}

/// Run all lint checks on a resolved catalog.
pub fn check(catalog: &Catalog) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    check_degenerate(catalog, &mut warnings);
    check_duplicates(catalog, &mut warnings);
    check_overlaps(catalog, &mut warnings);
    warnings
}

fn check_degenerate(catalog: &Catalog, warnings: &mut Vec<LintWarning>) {
    for elem in catalog.iter() {
        if elem.deta <= 0.0 || elem.dphi <= 0.0 {
            warnings.push(LintWarning {
                category: LintCategory::Degenerate,
                message: format!(
                    "element {} has non-positive size {}x{}",
                    elem.identifier, elem.deta, elem.dphi
                ),
            });
        }
    }
}

fn check_duplicates(catalog: &Catalog, warnings: &mut Vec<LintWarning>) {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for elem in catalog.iter() {
        *seen.entry(elem.identifier.as_str()).or_default() += 1;
    }

    let mut repeated: Vec<_> = seen.into_iter().filter(|(_, n)| *n > 1).collect();
    repeated.sort();
    for (id, count) in repeated {
        warnings.push(LintWarning {
            category: LintCategory::Duplicate,
            message: format!("identifier {} appears {} times", id, count),
        });
    }
}

// Sweep along eta per sampling layer; footprints sorted by left edge only
// need comparing while the next left edge is before the current right edge.
fn check_overlaps(catalog: &Catalog, warnings: &mut Vec<LintWarning>) {
    let mut layers: BTreeMap<i64, Vec<(&ResolvedElement, Footprint)>> = BTreeMap::new();
    for elem in catalog.iter() {
        layers
            .entry(elem.sampling)
            .or_default()
            .push((elem, elem.footprint(catalog.anchor)));
    }

    for (sampling, mut elems) in layers {
        elems.sort_by(|(_, fa), (_, fb)| fa.x.total_cmp(&fb.x));
        for (i, (a, fa)) in elems.iter().enumerate() {
            for (b, fb) in &elems[i + 1..] {
                if fb.x >= fa.right() - TOLERANCE {
                    break;
                }
                if fa.overlaps(fb, TOLERANCE) {
                    let overlap_w = fa.right().min(fb.right()) - fa.x.max(fb.x);
                    let overlap_h = fa.top().min(fb.top()) - fa.y.max(fb.y);
                    warnings.push(LintWarning {
                        category: LintCategory::Overlap,
                        message: format!(
                            "elements {} and {} overlap by {:.4}x{:.4} in sampling {}",
                            a.identifier, b.identifier, overlap_w, overlap_h, sampling
                        ),
                    });
                }
            }
        }
    }
}
