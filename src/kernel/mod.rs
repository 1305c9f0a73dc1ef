//! Boundary to the external geometric kernel.
//!
//! The kernel is an opaque mesh-processing library: it ingests a 1D and a 2D
//! mesh as primitive arrays, computes contacts between them and hands back
//! index pairs. Every operation reports an integer status where `0` means
//! success. All calls go through [`MeshKernel`] so a test double can stand in
//! for the native library, and all sessions go through [`KernelSession`],
//! which deallocates the kernel state when dropped.

mod session;

pub use session::{KernelSession, MaskBuffer};

use crate::mesh_error::MeshLinkError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status code returned by successful kernel calls.
pub const STATUS_OK: i32 = 0;

/// Index of a face in a mesh held by the kernel.
///
/// In one-to-many mode this refers to a mesh the kernel synthesized, not to
/// the domain grid; see [`crate::algs::cell_matcher`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct KernelFaceIndex(pub usize);

impl fmt::Display for KernelFaceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 1D mesh as primitive arrays.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh1d {
    pub node_x: Vec<f64>,
    pub node_y: Vec<f64>,
    /// Flattened `(from, to)` node pairs.
    pub edge_nodes: Vec<i32>,
}

impl Mesh1d {
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.node_x.len()
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edge_nodes.len() / 2
    }
}

/// 2D mesh as primitive arrays.
///
/// `face_nodes` holds `max_face_nodes` slots per face; unused slots carry
/// `fill_value`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh2d {
    pub node_x: Vec<f64>,
    pub node_y: Vec<f64>,
    /// Flattened `(from, to)` node pairs.
    pub edge_nodes: Vec<i32>,
    pub face_nodes: Vec<i32>,
    pub nodes_per_face: Vec<i32>,
    pub max_face_nodes: usize,
    /// Face mass centres, when the kernel provides them.
    pub face_x: Vec<f64>,
    pub face_y: Vec<f64>,
    pub fill_value: i32,
}

impl Mesh2d {
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.node_x.len()
    }

    #[inline]
    pub fn num_faces(&self) -> usize {
        self.nodes_per_face.len()
    }

    /// The `max_face_nodes` slots of one face, padding included.
    pub fn face_block(&self, face: KernelFaceIndex) -> Option<&[i32]> {
        let start = face.0.checked_mul(self.max_face_nodes)?;
        self.face_nodes.get(start..start + self.max_face_nodes)
    }
}

/// Raw contacts reported by the kernel: parallel arrays of 1D node index and
/// 2D face index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Contacts {
    pub mesh1d_indices: Vec<i32>,
    pub mesh2d_indices: Vec<i32>,
}

impl Contacts {
    #[inline]
    pub fn len(&self) -> usize {
        self.mesh1d_indices.len().min(self.mesh2d_indices.len())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A polyline/polygon or point cloud as parallel coordinate arrays.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeometryList {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl GeometryList {
    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Operations of the external geometric kernel.
///
/// Every method returns a status code; [`STATUS_OK`] means success.
/// `mask` holds one `0`/`1` flag per 1D mesh node.
pub trait MeshKernel {
    fn allocate_state(&mut self, session_id: &mut i32) -> i32;
    fn set_mesh1d(&mut self, session_id: i32, mesh: &Mesh1d) -> i32;
    fn set_mesh2d(&mut self, session_id: i32, mesh: &Mesh2d) -> i32;
    /// At most one contact per masked 1D node, restricted to `polygon`.
    fn compute_single_contacts(
        &mut self,
        session_id: i32,
        mask: &[i32],
        polygon: &GeometryList,
        search_tolerance: f64,
    ) -> i32;
    /// All faces crossed by the 1D mesh near each masked node.
    fn compute_multiple_contacts(&mut self, session_id: i32, mask: &[i32]) -> i32;
    /// Contacts from masked nodes to boundary faces within `search_distance`.
    fn compute_boundary_contacts(
        &mut self,
        session_id: i32,
        mask: &[i32],
        polygon: &GeometryList,
        search_distance: f64,
    ) -> i32;
    /// Contacts from the faces containing `points` to the nearest masked node.
    fn compute_contacts_with_points(
        &mut self,
        session_id: i32,
        mask: &[i32],
        points: &GeometryList,
    ) -> i32;
    fn get_contacts(&mut self, session_id: i32, contacts: &mut Contacts) -> i32;
    fn get_mesh2d(&mut self, session_id: i32, mesh: &mut Mesh2d) -> i32;
    fn deallocate_state(&mut self, session_id: i32) -> i32;
}

/// Map a kernel status code to a `Result`.
pub(crate) fn check_status(operation: &'static str, code: i32) -> Result<(), MeshLinkError> {
    if code == STATUS_OK {
        Ok(())
    } else {
        Err(MeshLinkError::KernelStatus { operation, code })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_eq_size;

    assert_eq_size!(KernelFaceIndex, usize);

    #[test]
    fn face_block_respects_padding() {
        let mesh = Mesh2d {
            face_nodes: vec![0, 1, 2, -999, 1, 3, 4, 2],
            nodes_per_face: vec![3, 4],
            max_face_nodes: 4,
            fill_value: -999,
            ..Default::default()
        };
        assert_eq!(mesh.face_block(KernelFaceIndex(0)), Some(&[0, 1, 2, -999][..]));
        assert_eq!(mesh.face_block(KernelFaceIndex(1)), Some(&[1, 3, 4, 2][..]));
        assert_eq!(mesh.face_block(KernelFaceIndex(2)), None);
    }

    #[test]
    fn check_status_maps_nonzero_codes() {
        assert!(check_status("allocate_state", 0).is_ok());
        assert_eq!(
            check_status("get_contacts", 3),
            Err(MeshLinkError::KernelStatus {
                operation: "get_contacts",
                code: 3
            })
        );
    }
}
