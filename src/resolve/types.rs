//! Core types for tower resolution

use std::collections::BTreeSet;

use super::coords::AnchorMode;

/// Which half of eta space an element occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignFlag {
    Positive,
    Negative,
}

impl SignFlag {
    /// Reduce a raw integer flag to its sign; zero carries no sign
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw.signum() {
            1 => Some(SignFlag::Positive),
            -1 => Some(SignFlag::Negative),
            _ => None,
        }
    }

    /// `+1.0` or `-1.0`
    pub fn value(&self) -> f64 {
        match self {
            SignFlag::Positive => 1.0,
            SignFlag::Negative => -1.0,
        }
    }
}

/// One row of a raw index table, validated and typed
#[derive(Debug, Clone, PartialEq)]
pub struct RawElementRecord {
    /// Hex identifier, passed through unchanged
    pub identifier: String,
    pub sign: SignFlag,
    /// Region index exactly as written; matched textually against the dictionary
    pub region_token: String,
    pub region_index: i64,
    pub sampling: i64,
    pub ieta: i64,
    pub iphi: i64,
    /// 1-based line number in the source table
    pub line: usize,
}

/// Axis-aligned eta/phi rectangle anchored at its lower-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Footprint {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (largest eta)
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Top edge (largest phi)
    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    /// Check if this footprint overlaps another by more than `tolerance`
    /// on both axes. Shared edges do not count as overlap.
    pub fn overlaps(&self, other: &Footprint, tolerance: f64) -> bool {
        self.x < other.right() - tolerance
            && self.right() > other.x + tolerance
            && self.y < other.top() - tolerance
            && self.top() > other.y + tolerance
    }

    /// Smallest footprint containing both
    pub fn union(&self, other: &Footprint) -> Footprint {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let top = self.top().max(other.top());
        Footprint::new(x, y, right - x, top - y)
    }
}

/// A tower with physical coordinates, ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedElement {
    pub identifier: String,
    /// Axis-0 (eta) coordinate
    pub eta: f64,
    /// Axis-1 (phi) coordinate
    pub phi: f64,
    pub region: i64,
    pub sampling: i64,
    /// Axis-0 step of the owning region
    pub deta: f64,
    /// Axis-1 step of the owning region
    pub dphi: f64,
}

impl ResolvedElement {
    /// Area covered by the element. Edge coordinates are the lower-left
    /// corner; center coordinates sit half a step in from it on both axes.
    pub fn footprint(&self, anchor: AnchorMode) -> Footprint {
        let (x, y) = match anchor {
            AnchorMode::Edge => (self.eta, self.phi),
            AnchorMode::Center => (self.eta - self.deta / 2.0, self.phi - self.dphi / 2.0),
        };
        Footprint::new(x, y, self.deta, self.dphi)
    }
}

/// Resolved elements of one flavor, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub flavor: String,
    pub anchor: AnchorMode,
    pub elements: Vec<ResolvedElement>,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedElement> {
        self.elements.iter()
    }

    /// Distinct region indices, ascending
    pub fn distinct_regions(&self) -> Vec<i64> {
        self.iter()
            .map(|e| e.region)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct sampling layers, ascending
    pub fn distinct_samplings(&self) -> Vec<i64> {
        self.iter()
            .map(|e| e.sampling)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Union of all footprints, `None` for an empty catalog
    pub fn bounds(&self) -> Option<Footprint> {
        self.iter()
            .map(|e| e.footprint(self.anchor))
            .reduce(|acc, f| acc.union(&f))
    }
}
