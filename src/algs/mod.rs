//! Link generation stages.
//!
//! Each stage is usable on its own; [`crate::generator`] chains them.

pub mod adapter;
pub mod area;
pub mod cell_matcher;
pub mod contacts;
pub mod eligibility;
pub mod materialize;

pub use area::resolve_area;
pub use cell_matcher::SpatialCellIndex;
pub use eligibility::{NodeMask, compute_mask};
pub use materialize::build_links;
