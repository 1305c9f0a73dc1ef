#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-links
//!
//! mesh-links couples a one-dimensional branch network (channels, pipes,
//! sewers discretized into calculation points) to a two-dimensional
//! unstructured surface grid. It produces the 1D–2D links that coupled
//! hydrodynamic solvers use to exchange flow between the two domains.
//!
//! ## Pipeline
//! - Node eligibility: a mask over the 1D points, driven by the link
//!   generating mode, sewer metadata and an optional selection polygon.
//! - Area of effect: the selection polygon, or the points' bounding box grown
//!   by a small margin.
//! - Contacts: an external geometric kernel, reached through the
//!   [`kernel::MeshKernel`] trait, computes raw (1D node, 2D face) contacts
//!   inside a scoped [`kernel::KernelSession`].
//! - Cell matching: in one-to-many mode the kernel reports faces of its own
//!   mesh; a quadtree over the domain cells maps them back.
//! - Materialization: [`link::Link1D2D`] records from point to cell centroid.
//!
//! ## Failure model
//! Generation never returns an error. Rejected inputs, kernel failures and
//! unmatched cells shrink the output and are logged through the `log` facade;
//! [`generator::generate_links_with_report`] also returns them as a
//! [`generator::GenerationReport`].
//!
//! ## Usage
//! ```ignore
//! use mesh_links::prelude::*;
//!
//! let links = generate_links(
//!     &mut kernel,
//!     None,
//!     LinkGeneratingType::EmbeddedOneToOne,
//!     &grid,
//!     &[],
//!     &discretization,
//!     None,
//! );
//! ```

pub mod algs;
pub mod generator;
pub mod geometry;
pub mod grid;
pub mod kernel;
pub mod link;
pub mod mesh_error;
pub mod network;
pub mod options;
pub mod spatial;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::generator::{
        GenerationReport, LinkGenerator, Rejection, generate_links, generate_links_with_report,
    };
    pub use crate::geometry::{Coordinate, Envelope, Polygon};
    pub use crate::grid::{CellIndex, GridCell, UnstructuredGrid};
    pub use crate::kernel::{KernelFaceIndex, KernelSession, MeshKernel};
    pub use crate::link::{
        Link1D2D, LinkGeneratingType, LinkStorageType, LinksGeometry, merge_links,
    };
    pub use crate::mesh_error::MeshLinkError;
    pub use crate::network::{
        Branch, BranchIndex, BranchKind, CompartmentKind, Discretization, DiscretizationPoint,
        Gully, PointIndex, SewerConnection, WaterType,
    };
    pub use crate::options::LinkGenerationOptions;
}
