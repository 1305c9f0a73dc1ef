//! Conversion between domain meshes and kernel primitive arrays.
//!
//! The 1D mesh gets one node per discretization point (same order) and an edge
//! between consecutive points of the same branch. The 2D mesh keeps the
//! domain's vertex and cell order, so for every mode except one-to-many the
//! kernel's face indices are domain cell indices (see [`domain_cell`]).

use crate::geometry::{Coordinate, Polygon};
use crate::grid::{CellIndex, UnstructuredGrid};
use crate::kernel::{GeometryList, KernelFaceIndex, Mesh1d, Mesh2d};
use crate::mesh_error::MeshLinkError;
use crate::network::Discretization;
use itertools::Itertools;

fn to_i32(value: usize, what: &str) -> Result<i32, MeshLinkError> {
    i32::try_from(value)
        .map_err(|_| MeshLinkError::InvalidGeometry(format!("{what} {value} exceeds kernel index range")))
}

/// 1D kernel mesh for a discretization.
pub fn mesh1d_from_discretization(
    discretization: &Discretization,
) -> Result<Mesh1d, MeshLinkError> {
    let points = discretization.points();
    let mut edge_nodes = Vec::new();
    for ((i, a), (j, b)) in points.iter().enumerate().tuple_windows() {
        if a.branch == b.branch {
            edge_nodes.push(to_i32(i, "1D node")?);
            edge_nodes.push(to_i32(j, "1D node")?);
        }
    }
    Ok(Mesh1d {
        node_x: points.iter().map(|p| p.coordinate.x).collect(),
        node_y: points.iter().map(|p| p.coordinate.y).collect(),
        edge_nodes,
    })
}

/// 2D kernel mesh for a domain grid; face-node blocks are padded with
/// `fill_value` up to the widest cell.
pub fn mesh2d_from_grid(grid: &UnstructuredGrid, fill_value: i32) -> Result<Mesh2d, MeshLinkError> {
    let max_face_nodes = grid.max_cell_vertices();
    let mut face_nodes = Vec::with_capacity(grid.cell_count() * max_face_nodes);
    let mut nodes_per_face = Vec::with_capacity(grid.cell_count());
    for cell in grid.cells() {
        for &v in &cell.vertices {
            face_nodes.push(to_i32(v, "2D node")?);
        }
        face_nodes.extend(std::iter::repeat_n(
            fill_value,
            max_face_nodes - cell.vertices.len(),
        ));
        nodes_per_face.push(to_i32(cell.vertices.len(), "face size")?);
    }
    let mut edge_nodes = Vec::with_capacity(grid.edges().len() * 2);
    for [a, b] in grid.edges() {
        edge_nodes.push(to_i32(*a, "2D node")?);
        edge_nodes.push(to_i32(*b, "2D node")?);
    }
    Ok(Mesh2d {
        node_x: grid.vertices().iter().map(|c| c.x).collect(),
        node_y: grid.vertices().iter().map(|c| c.y).collect(),
        edge_nodes,
        face_nodes,
        nodes_per_face,
        max_face_nodes,
        face_x: grid.cells().iter().map(|c| c.centroid.x).collect(),
        face_y: grid.cells().iter().map(|c| c.centroid.y).collect(),
        fill_value,
    })
}

/// Polygon ring as a kernel geometry list.
pub fn polygon_to_geometry(polygon: &Polygon) -> GeometryList {
    coordinates_to_geometry(polygon.ring())
}

pub fn coordinates_to_geometry(coords: &[Coordinate]) -> GeometryList {
    GeometryList {
        x: coords.iter().map(|c| c.x).collect(),
        y: coords.iter().map(|c| c.y).collect(),
    }
}

/// Domain cell for a face of the mesh built by [`mesh2d_from_grid`].
///
/// Only valid when the kernel still holds the mesh that was set; kernel-native
/// meshes go through the spatial cell matcher instead.
#[inline]
pub fn domain_cell(face: KernelFaceIndex) -> CellIndex {
    CellIndex(face.0)
}

/// World-coordinate centre of a kernel face.
///
/// Uses the kernel's face centre when it has one, otherwise the average of the
/// face's vertices (padding slots skipped). `None` for unknown faces.
pub fn kernel_face_centroid(mesh: &Mesh2d, face: KernelFaceIndex) -> Option<Coordinate> {
    if let (Some(&x), Some(&y)) = (mesh.face_x.get(face.0), mesh.face_y.get(face.0)) {
        let c = Coordinate::new(x, y);
        if c.is_finite() {
            return Some(c);
        }
    }
    let block = mesh.face_block(face)?;
    let coords: Vec<Coordinate> = block
        .iter()
        .filter(|&&v| v != mesh.fill_value && v >= 0)
        .filter_map(|&v| {
            let v = v as usize;
            Some(Coordinate::new(*mesh.node_x.get(v)?, *mesh.node_y.get(v)?))
        })
        .collect();
    Coordinate::mean(&coords)
}
