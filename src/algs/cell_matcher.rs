//! Spatial cell matcher: recover domain cells for kernel-native faces.
//!
//! In one-to-many mode the kernel reports faces of a mesh it built itself, so
//! its face indices say nothing about the domain grid. The matcher locates the
//! domain cell containing each reported face centre: a quadtree over cell
//! envelopes narrows the candidates, and exact polygon containment decides.

use crate::algs::adapter::kernel_face_centroid;
use crate::geometry::{Coordinate, Polygon};
use crate::grid::{CellIndex, UnstructuredGrid};
use crate::kernel::{KernelFaceIndex, Mesh2d};
use crate::network::PointIndex;
use crate::spatial::QuadTree;

/// Quadtree of a domain grid's cells.
#[derive(Debug)]
pub struct SpatialCellIndex<'g> {
    grid: &'g UnstructuredGrid,
    tree: QuadTree,
}

impl<'g> SpatialCellIndex<'g> {
    /// Index every cell of `grid` by its envelope. `None` for an empty grid.
    pub fn build(grid: &'g UnstructuredGrid, level_factor: f64) -> Option<Self> {
        let extents = grid.extents()?;
        let levels = QuadTree::levels_for(grid.cell_count(), level_factor);
        let mut tree = QuadTree::new(extents, levels);
        for (idx, cell) in grid.cells().iter().enumerate() {
            if let Some(env) = grid.cell_envelope(cell) {
                tree.insert(idx, env);
            }
        }
        Some(Self { grid, tree })
    }

    /// First cell (in index order) whose exact outline covers `p`.
    pub fn find_cell(&self, p: Coordinate) -> Option<CellIndex> {
        let mut candidates = self.tree.query_point(p);
        candidates.sort_unstable();
        candidates.into_iter().map(CellIndex).find(|&idx| {
            self.grid
                .cell(idx)
                .and_then(|cell| self.grid.cell_polygon(cell).ok())
                .is_some_and(|poly: Polygon| poly.covers(p))
        })
    }

    #[inline]
    pub fn grid(&self) -> &'g UnstructuredGrid {
        self.grid
    }
}

/// Outcome of re-matching kernel contacts onto the domain grid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchedContacts {
    pub contacts: Vec<(PointIndex, CellIndex)>,
    /// Face centres no domain cell covers.
    pub unmatched: Vec<Coordinate>,
    /// Reported faces the kernel mesh does not have.
    pub missing_faces: Vec<KernelFaceIndex>,
}

/// Map `(point, kernel face)` contacts onto domain cells.
///
/// Contacts whose face centre lies in no domain cell are dropped and logged;
/// matching continues with the rest.
pub fn match_contacts(
    index: &SpatialCellIndex<'_>,
    kernel_mesh: &Mesh2d,
    raw: &[(PointIndex, KernelFaceIndex)],
) -> MatchedContacts {
    let mut out = MatchedContacts::default();
    for &(point, face) in raw {
        let Some(centre) = kernel_face_centroid(kernel_mesh, face) else {
            log::error!("kernel face {face} of contact with 1D point {point} does not exist in the kernel mesh");
            out.missing_faces.push(face);
            continue;
        };
        match index.find_cell(centre) {
            Some(cell) => out.contacts.push((point, cell)),
            None => {
                log::error!("no grid cell found containing kernel face centre {centre} (1D point {point})");
                out.unmatched.push(centre);
            }
        }
    }
    out
}
