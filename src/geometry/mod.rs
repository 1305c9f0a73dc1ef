//! Planar geometry primitives for mesh-links.
//!
//! Coordinates, envelopes and simple polygons; just enough geometry for
//! area-of-effect resolution and exact cell containment.

pub mod coordinate;
pub mod polygon;

pub use coordinate::{Coordinate, Envelope};
pub use polygon::Polygon;
