//! Tunables for link generation.

use crate::mesh_error::MeshLinkError;
use serde::{Deserialize, Serialize};

/// Optional configuration for link generation.
///
/// The defaults reproduce the behaviour model builders expect; they are only
/// worth changing for grids in unusual length units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkGenerationOptions {
    /// Margin added around the default area of effect, as a fraction of the
    /// point set's width (x) and height (y).
    pub area_margin_fraction: f64,
    /// Search distance for lateral (boundary) contacts, in model length units.
    pub lateral_search_distance: f64,
    /// Search tolerance passed with embedded one-to-one contacts.
    pub single_contact_tolerance: f64,
    /// Chainages within this distance of a branch end count as "at" that end.
    pub chainage_tolerance: f64,
    /// Quadtree depth is `ceil(quadtree_level_factor * log2(cell_count))`.
    pub quadtree_level_factor: f64,
    /// Padding value in kernel face-node arrays.
    pub face_fill_value: i32,
}

impl Default for LinkGenerationOptions {
    fn default() -> Self {
        Self {
            area_margin_fraction: 0.02,
            lateral_search_distance: 5000.0,
            single_contact_tolerance: 0.0,
            chainage_tolerance: 1e-6,
            quadtree_level_factor: 0.4,
            face_fill_value: -999,
        }
    }
}

impl LinkGenerationOptions {
    /// Reject negative or non-finite values.
    pub fn validate(&self) -> Result<(), MeshLinkError> {
        let fields = [
            ("area_margin_fraction", self.area_margin_fraction),
            ("lateral_search_distance", self.lateral_search_distance),
            ("single_contact_tolerance", self.single_contact_tolerance),
            ("chainage_tolerance", self.chainage_tolerance),
            ("quadtree_level_factor", self.quadtree_level_factor),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(MeshLinkError::InvalidOptions(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if self.face_fill_value >= 0 {
            return Err(MeshLinkError::InvalidOptions(format!(
                "face_fill_value must be negative, got {}",
                self.face_fill_value
            )));
        }
        Ok(())
    }
}
