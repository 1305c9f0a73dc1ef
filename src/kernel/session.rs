//! Scoped kernel resources: the session state and the marshalled node mask.

use super::{Contacts, GeometryList, Mesh1d, Mesh2d, MeshKernel, check_status};
use crate::algs::eligibility::NodeMask;
use crate::mesh_error::MeshLinkError;

/// An allocated kernel state, deallocated on drop.
///
/// Holds the kernel exclusively for its lifetime, so calls for one session can
/// never interleave with another.
pub struct KernelSession<'k, K: MeshKernel + ?Sized> {
    kernel: &'k mut K,
    id: i32,
}

impl<'k, K: MeshKernel + ?Sized> KernelSession<'k, K> {
    /// Allocate a new kernel state.
    pub fn open(kernel: &'k mut K) -> Result<Self, MeshLinkError> {
        let mut id = -1;
        check_status("allocate_state", kernel.allocate_state(&mut id))?;
        log::debug!("kernel session {id} allocated");
        Ok(Self { kernel, id })
    }

    #[inline]
    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn set_mesh1d(&mut self, mesh: &Mesh1d) -> Result<(), MeshLinkError> {
        check_status("set_mesh1d", self.kernel.set_mesh1d(self.id, mesh))
    }

    pub fn set_mesh2d(&mut self, mesh: &Mesh2d) -> Result<(), MeshLinkError> {
        check_status("set_mesh2d", self.kernel.set_mesh2d(self.id, mesh))
    }

    pub fn compute_single_contacts(
        &mut self,
        mask: &MaskBuffer,
        polygon: &GeometryList,
        search_tolerance: f64,
    ) -> Result<(), MeshLinkError> {
        let code = self.kernel.compute_single_contacts(
            self.id,
            mask.as_slice(),
            polygon,
            search_tolerance,
        );
        check_status("compute_single_contacts", code)
    }

    pub fn compute_multiple_contacts(&mut self, mask: &MaskBuffer) -> Result<(), MeshLinkError> {
        let code = self
            .kernel
            .compute_multiple_contacts(self.id, mask.as_slice());
        check_status("compute_multiple_contacts", code)
    }

    pub fn compute_boundary_contacts(
        &mut self,
        mask: &MaskBuffer,
        polygon: &GeometryList,
        search_distance: f64,
    ) -> Result<(), MeshLinkError> {
        let code = self.kernel.compute_boundary_contacts(
            self.id,
            mask.as_slice(),
            polygon,
            search_distance,
        );
        check_status("compute_boundary_contacts", code)
    }

    pub fn compute_contacts_with_points(
        &mut self,
        mask: &MaskBuffer,
        points: &GeometryList,
    ) -> Result<(), MeshLinkError> {
        let code = self
            .kernel
            .compute_contacts_with_points(self.id, mask.as_slice(), points);
        check_status("compute_contacts_with_points", code)
    }

    pub fn contacts(&mut self) -> Result<Contacts, MeshLinkError> {
        let mut contacts = Contacts::default();
        check_status(
            "get_contacts",
            self.kernel.get_contacts(self.id, &mut contacts),
        )?;
        Ok(contacts)
    }

    /// The kernel's current 2D mesh, which may differ from the one set.
    pub fn mesh2d(&mut self) -> Result<Mesh2d, MeshLinkError> {
        let mut mesh = Mesh2d::default();
        check_status("get_mesh2d", self.kernel.get_mesh2d(self.id, &mut mesh))?;
        Ok(mesh)
    }
}

impl<K: MeshKernel + ?Sized> Drop for KernelSession<'_, K> {
    fn drop(&mut self) {
        let code = self.kernel.deallocate_state(self.id);
        if code != super::STATUS_OK {
            log::warn!("kernel session {} deallocation returned status {code}", self.id);
        } else {
            log::debug!("kernel session {} deallocated", self.id);
        }
    }
}

/// Node mask marshalled for the kernel: one contiguous `i32` flag per node.
///
/// The allocation does not move while the buffer lives and is released when
/// the buffer goes out of scope.
#[derive(Debug)]
pub struct MaskBuffer {
    flags: Box<[i32]>,
}

impl MaskBuffer {
    pub fn new(mask: &NodeMask) -> Self {
        let flags = mask.iter().map(|&eligible| i32::from(eligible)).collect();
        Self { flags }
    }

    #[inline]
    pub fn as_slice(&self) -> &[i32] {
        &self.flags
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}
