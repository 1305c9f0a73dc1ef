//! Two-dimensional unstructured surface grid.
//!
//! Vertices are shared; each cell is an ordered list of vertex indices plus a
//! precomputed centroid. Edges are optional and derived from the cells when
//! absent.

use crate::geometry::{Coordinate, Envelope, Polygon};
use crate::mesh_error::MeshLinkError;
use hashbrown::HashSet;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a cell in the domain grid's cell collection.
///
/// Never interchangeable with [`crate::kernel::KernelFaceIndex`]: the kernel
/// may report faces of a mesh it synthesized itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct CellIndex(pub usize);

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A polygonal grid cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    /// Ordered vertex indices into [`UnstructuredGrid::vertices`].
    pub vertices: Vec<usize>,
    pub centroid: Coordinate,
}

/// Domain 2D grid.
///
/// Every cell and edge refers to an existing vertex; deserialization goes
/// through [`UnstructuredGrid::from_parts`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UnstructuredGridRaw")]
pub struct UnstructuredGrid {
    vertices: Vec<Coordinate>,
    edges: Vec<[usize; 2]>,
    cells: Vec<GridCell>,
}

#[derive(Deserialize)]
struct UnstructuredGridRaw {
    vertices: Vec<Coordinate>,
    #[serde(default)]
    edges: Vec<[usize; 2]>,
    cells: Vec<GridCell>,
}

impl TryFrom<UnstructuredGridRaw> for UnstructuredGrid {
    type Error = MeshLinkError;

    fn try_from(raw: UnstructuredGridRaw) -> Result<Self, Self::Error> {
        UnstructuredGrid::from_parts(raw.vertices, raw.edges, raw.cells)
    }
}

impl UnstructuredGrid {
    /// Build a grid from vertices and cell vertex lists; centroids are the
    /// vertex average and edges are derived from the cell boundaries.
    pub fn from_cells(
        vertices: Vec<Coordinate>,
        cell_vertices: Vec<Vec<usize>>,
    ) -> Result<Self, MeshLinkError> {
        let mut cells = Vec::with_capacity(cell_vertices.len());
        for (idx, verts) in cell_vertices.into_iter().enumerate() {
            check_cell(idx, &verts, vertices.len())?;
            let coords: Vec<Coordinate> = verts.iter().map(|&v| vertices[v]).collect();
            let centroid = Coordinate::mean(&coords).ok_or_else(|| {
                MeshLinkError::InvalidGeometry(format!("cell {idx} has no vertices"))
            })?;
            cells.push(GridCell {
                vertices: verts,
                centroid,
            });
        }
        let edges = derive_edges(&cells);
        Ok(Self {
            vertices,
            edges,
            cells,
        })
    }

    /// Build a grid from fully specified parts (e.g. as read from a file).
    ///
    /// An empty `edges` list is replaced by edges derived from the cells.
    pub fn from_parts(
        vertices: Vec<Coordinate>,
        edges: Vec<[usize; 2]>,
        cells: Vec<GridCell>,
    ) -> Result<Self, MeshLinkError> {
        for (idx, cell) in cells.iter().enumerate() {
            check_cell(idx, &cell.vertices, vertices.len())?;
        }
        if let Some(edge) = edges
            .iter()
            .find(|e| e[0] >= vertices.len() || e[1] >= vertices.len())
        {
            return Err(MeshLinkError::InvalidGeometry(format!(
                "edge {:?} refers to a vertex outside 0..{}",
                edge,
                vertices.len()
            )));
        }
        let edges = if edges.is_empty() {
            derive_edges(&cells)
        } else {
            edges
        };
        Ok(Self {
            vertices,
            edges,
            cells,
        })
    }

    /// Regular `nx` by `ny` grid of rectangular cells, row-major from `origin`
    /// (cell `(i, j)` has index `j * nx + i`).
    pub fn rectilinear(
        nx: usize,
        ny: usize,
        origin: Coordinate,
        dx: f64,
        dy: f64,
    ) -> Result<Self, MeshLinkError> {
        if nx == 0 || ny == 0 {
            return Err(MeshLinkError::InvalidGeometry(
                "rectilinear grid needs at least one cell in each direction".into(),
            ));
        }
        if !(dx > 0.0 && dy > 0.0) {
            return Err(MeshLinkError::InvalidGeometry(format!(
                "cell size must be positive, got dx={dx}, dy={dy}"
            )));
        }
        let vertex = |i: usize, j: usize| j * (nx + 1) + i;
        let vertices = (0..=ny)
            .cartesian_product(0..=nx)
            .map(|(j, i)| Coordinate::new(origin.x + i as f64 * dx, origin.y + j as f64 * dy))
            .collect();
        let cells = (0..ny)
            .cartesian_product(0..nx)
            .map(|(j, i)| {
                vec![
                    vertex(i, j),
                    vertex(i + 1, j),
                    vertex(i + 1, j + 1),
                    vertex(i, j + 1),
                ]
            })
            .collect();
        Self::from_cells(vertices, cells)
    }

    #[inline]
    pub fn vertices(&self) -> &[Coordinate] {
        &self.vertices
    }

    #[inline]
    pub fn edges(&self) -> &[[usize; 2]] {
        &self.edges
    }

    #[inline]
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    #[inline]
    pub fn cell(&self, index: CellIndex) -> Option<&GridCell> {
        self.cells.get(index.0)
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Largest number of vertices of any cell.
    pub fn max_cell_vertices(&self) -> usize {
        self.cells.iter().map(|c| c.vertices.len()).max().unwrap_or(0)
    }

    /// Vertex coordinates of a cell, in order.
    pub fn cell_coordinates(&self, cell: &GridCell) -> Vec<Coordinate> {
        cell.vertices.iter().map(|&v| self.vertices[v]).collect()
    }

    /// Envelope of a cell's vertices.
    pub fn cell_envelope(&self, cell: &GridCell) -> Option<Envelope> {
        Envelope::from_coordinates(cell.vertices.iter().map(|&v| &self.vertices[v]))
    }

    /// Exact cell outline.
    pub fn cell_polygon(&self, cell: &GridCell) -> Result<Polygon, MeshLinkError> {
        Polygon::new(self.cell_coordinates(cell))
    }

    /// Envelope of all vertices, or `None` for an empty grid.
    pub fn extents(&self) -> Option<Envelope> {
        Envelope::from_coordinates(&self.vertices)
    }
}

fn check_cell(idx: usize, verts: &[usize], vertex_count: usize) -> Result<(), MeshLinkError> {
    if verts.len() < 3 {
        return Err(MeshLinkError::InvalidGeometry(format!(
            "cell {idx} has {} vertices, expected at least 3",
            verts.len()
        )));
    }
    if let Some(&vertex) = verts.iter().find(|&&v| v >= vertex_count) {
        return Err(MeshLinkError::VertexOutOfRange {
            cell: idx,
            vertex,
            vertex_count,
        });
    }
    Ok(())
}

/// Unique undirected cell-boundary edges in first-seen order.
fn derive_edges(cells: &[GridCell]) -> Vec<[usize; 2]> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for cell in cells {
        for (&a, &b) in cell.vertices.iter().circular_tuple_windows() {
            if seen.insert((a.min(b), a.max(b))) {
                edges.push([a, b]);
            }
        }
    }
    edges
}
