//! Index-to-coordinate transform and sign correction.
//!
//! Each axis maps an integer index through `index * step + origin`, using the
//! origin and step of the element's region. Elements in the negative eta half
//! are then mirrored across zero.
//!
//! ## Anchor modes
//!
//! Two conventions exist for how the computed point relates to the tower's
//! footprint, and they are not interchangeable:
//!
//! - **Edge**: the point is the footprint's lower-left corner. Mirroring a
//!   corner across zero lands on the wrong side of the cell, so negative
//!   elements are shifted by one full eta step before negation:
//!   `eta' = (eta + ((1 - sign) / 2) * deta) * sign`.
//! - **Center**: the point is the cell center. Both axes get half a step
//!   added, then eta is multiplied by the sign.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::region::AxisGeometry;
use super::types::SignFlag;

/// How an index-derived coordinate relates to the element footprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorMode {
    /// Coordinates are lower-left corners
    #[default]
    Edge,
    /// Coordinates are cell centers
    Center,
}

impl fmt::Display for AnchorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorMode::Edge => write!(f, "edge"),
            AnchorMode::Center => write!(f, "center"),
        }
    }
}

impl FromStr for AnchorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "edge" => Ok(AnchorMode::Edge),
            "center" | "centre" => Ok(AnchorMode::Center),
            other => Err(format!(
                "unknown anchor mode '{}' (expected 'edge' or 'center')",
                other
            )),
        }
    }
}

/// Coordinates of one element plus the pass-through steps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappedPosition {
    pub eta: f64,
    pub phi: f64,
    pub deta: f64,
    pub dphi: f64,
}

/// Base affine transform for one axis
pub fn index_to_coordinate(index: i64, origin: f64, step: f64) -> f64 {
    index as f64 * step + origin
}

/// Map an index pair through a region's axes, applying the sign correction
/// for the chosen anchor mode.
pub fn map_indices(
    ieta: i64,
    iphi: i64,
    axes: &AxisGeometry,
    sign: SignFlag,
    mode: AnchorMode,
) -> MappedPosition {
    let s = sign.value();
    let mut eta = index_to_coordinate(ieta, axes.eta0, axes.deta);
    let mut phi = index_to_coordinate(iphi, axes.phi0, axes.dphi);

    match mode {
        AnchorMode::Edge => {
            eta += ((-s + 1.0) / 2.0) * axes.deta;
            eta *= s;
        }
        AnchorMode::Center => {
            eta += axes.deta / 2.0;
            phi += axes.dphi / 2.0;
            eta *= s;
        }
    }

    MappedPosition {
        eta,
        phi,
        deta: axes.deta,
        dphi: axes.dphi,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axes(eta0: f64, deta: f64) -> AxisGeometry {
        AxisGeometry {
            eta0,
            phi0: 0.0,
            deta,
            dphi: 0.1,
        }
    }

    #[test]
    fn test_index_to_coordinate() {
        assert!((index_to_coordinate(3, 0.0, 0.2) - 0.6).abs() < 1e-12);
        assert!((index_to_coordinate(0, 2.5, 0.1) - 2.5).abs() < 1e-12);
        assert!((index_to_coordinate(2, 3.2, 0.4) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_positive_edge() {
        let pos = map_indices(3, 0, &axes(0.0, 0.2), SignFlag::Positive, AnchorMode::Edge);
        assert!((pos.eta - 0.6).abs() < 1e-12);
        assert_eq!(pos.phi, 0.0);
    }

    #[test]
    fn test_negative_edge_shifts_one_step() {
        let pos = map_indices(3, 0, &axes(0.0, 0.2), SignFlag::Negative, AnchorMode::Edge);
        assert!((pos.eta - (-0.8)).abs() < 1e-12);
    }

    #[test]
    fn test_positive_center() {
        let pos = map_indices(3, 2, &axes(0.0, 0.2), SignFlag::Positive, AnchorMode::Center);
        assert!((pos.eta - 0.7).abs() < 1e-12);
        assert!((pos.phi - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_negative_center_is_plain_mirror() {
        let pos = map_indices(3, 2, &axes(0.0, 0.2), SignFlag::Negative, AnchorMode::Center);
        assert!((pos.eta - (-0.7)).abs() < 1e-12);
        // phi is never mirrored
        assert!((pos.phi - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_edge_mirrored_pair_tiles() {
        let a = axes(2.5, 0.1);
        for ieta in 0..8 {
            let pos = map_indices(ieta, 5, &a, SignFlag::Positive, AnchorMode::Edge);
            let neg = map_indices(ieta, 5, &a, SignFlag::Negative, AnchorMode::Edge);
            assert_eq!(neg.eta, -(pos.eta + a.deta));
            // The mirrored footprint's right edge meets the reflected left edge
            assert!((neg.eta + neg.deta + pos.eta).abs() < 1e-12);
        }
    }

    #[test]
    fn test_steps_pass_through() {
        let pos = map_indices(1, 1, &axes(0.0, 0.2), SignFlag::Negative, AnchorMode::Edge);
        assert_eq!(pos.deta, 0.2);
        assert_eq!(pos.dphi, 0.1);
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let a = axes(1.3, 0.0875);
        let first = map_indices(7, 13, &a, SignFlag::Negative, AnchorMode::Edge);
        let second = map_indices(7, 13, &a, SignFlag::Negative, AnchorMode::Edge);
        assert_eq!(first.eta.to_bits(), second.eta.to_bits());
        assert_eq!(first.phi.to_bits(), second.phi.to_bits());
    }

    #[test]
    fn test_anchor_mode_parsing() {
        assert_eq!("edge".parse::<AnchorMode>(), Ok(AnchorMode::Edge));
        assert_eq!("Center".parse::<AnchorMode>(), Ok(AnchorMode::Center));
        assert!("corner".parse::<AnchorMode>().is_err());
        assert_eq!(AnchorMode::default(), AnchorMode::Edge);
        assert_eq!(AnchorMode::Center.to_string(), "center");
    }
}
