//! Simple polygons (single closed ring, no holes).
//!
//! Used for the user's selection polygon, the synthesized area of effect and
//! exact cell containment in the spatial cell matcher.

use super::coordinate::{Coordinate, Envelope};
use crate::mesh_error::MeshLinkError;
use serde::{Deserialize, Serialize};

/// Relative tolerance for on-edge tests, scaled by the edge length.
const EDGE_EPS: f64 = 1e-12;

/// A closed ring of coordinates; the first coordinate is repeated as the last.
///
/// Deserialization goes through [`Polygon::new`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolygonRaw")]
pub struct Polygon {
    ring: Vec<Coordinate>,
}

#[derive(Deserialize)]
struct PolygonRaw {
    ring: Vec<Coordinate>,
}

impl TryFrom<PolygonRaw> for Polygon {
    type Error = MeshLinkError;

    fn try_from(raw: PolygonRaw) -> Result<Self, Self::Error> {
        Polygon::new(raw.ring)
    }
}

impl Polygon {
    /// Build a polygon from a ring, closing it if needed.
    ///
    /// Requires at least three distinct positions and finite coordinates.
    pub fn new(mut ring: Vec<Coordinate>) -> Result<Self, MeshLinkError> {
        if let Some(bad) = ring.iter().find(|c| !c.is_finite()) {
            return Err(MeshLinkError::InvalidGeometry(format!(
                "polygon vertex {bad} is not finite"
            )));
        }
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() < 3 {
            return Err(MeshLinkError::InvalidGeometry(format!(
                "polygon needs at least 3 vertices, got {}",
                ring.len()
            )));
        }
        ring.push(ring[0]);
        Ok(Self { ring })
    }

    /// Rectangle as a closed 5-point ring. Degenerate envelopes are kept as-is.
    pub fn rectangle(env: &Envelope) -> Self {
        let [a, b, c, d] = env.corners();
        Self {
            ring: vec![a, b, c, d, a],
        }
    }

    /// The closed ring (first coordinate repeated as last).
    #[inline]
    pub fn ring(&self) -> &[Coordinate] {
        &self.ring
    }

    /// Vertices without the closing duplicate.
    #[inline]
    pub fn vertices(&self) -> &[Coordinate] {
        &self.ring[..self.ring.len() - 1]
    }

    pub fn envelope(&self) -> Envelope {
        // The ring always holds at least one coordinate.
        let first = Envelope::of_point(self.ring[0]);
        self.ring[1..]
            .iter()
            .fold(first, |env, c| env.expanded_to_include(*c))
    }

    /// Closed containment: interior or boundary.
    ///
    /// For a point geometry this is equivalent to "intersects".
    pub fn covers(&self, p: Coordinate) -> bool {
        if !self.envelope().covers(p) {
            return false;
        }
        if self.ring.windows(2).any(|w| on_segment(w[0], w[1], p)) {
            return true;
        }
        self.crossing_number(p) % 2 == 1
    }

    fn crossing_number(&self, p: Coordinate) -> usize {
        self.ring
            .windows(2)
            .filter(|w| {
                let (a, b) = (w[0], w[1]);
                if (a.y > p.y) == (b.y > p.y) {
                    return false;
                }
                let x_at = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                p.x < x_at
            })
            .count()
    }
}

fn on_segment(a: Coordinate, b: Coordinate, p: Coordinate) -> bool {
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    let len = a.distance(&b);
    if cross.abs() > EDGE_EPS * len.max(1.0) * len.max(1.0) {
        return false;
    }
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}
