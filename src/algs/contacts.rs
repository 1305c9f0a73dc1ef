//! Contact computation against the external kernel.
//!
//! Picks the kernel operation for a link generating mode, marshals the node
//! mask for the duration of the call and absorbs every failure: a failed or
//! aborted call yields `false`, a failed retrieval an empty contact set.

use crate::algs::adapter::{coordinates_to_geometry, polygon_to_geometry};
use crate::algs::eligibility::NodeMask;
use crate::geometry::{Coordinate, Polygon};
use crate::kernel::{KernelFaceIndex, KernelSession, MaskBuffer, MeshKernel};
use crate::link::LinkGeneratingType;
use crate::mesh_error::MeshLinkError;
use crate::network::PointIndex;
use crate::options::LinkGenerationOptions;
use std::panic::{self, AssertUnwindSafe};

/// Everything the kernel needs besides the meshes already set on the session.
#[derive(Clone, Copy, Debug)]
pub struct ContactRequest<'a> {
    pub mode: LinkGeneratingType,
    pub mask: &'a NodeMask,
    pub area: &'a Polygon,
    /// Gully locations; only used in gully-sewer mode.
    pub auxiliary_points: &'a [Coordinate],
    pub options: &'a LinkGenerationOptions,
}

/// Points that intersect the area of effect.
pub fn points_in_area(points: &[Coordinate], area: &Polygon) -> Vec<Coordinate> {
    points.iter().copied().filter(|p| area.covers(*p)).collect()
}

/// Run the mode's contact computation. Returns `false` on any failure,
/// including a panic inside the kernel call.
pub fn compute_contacts<K: MeshKernel + ?Sized>(
    session: &mut KernelSession<'_, K>,
    request: &ContactRequest<'_>,
) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(|| dispatch(session, request))) {
        Ok(Ok(())) => true,
        Ok(Err(err)) => {
            log::warn!("{:?} contact computation failed: {err}", request.mode);
            false
        }
        Err(_) => {
            log::warn!(
                "{:?} contact computation aborted: {}",
                request.mode,
                MeshLinkError::KernelAborted("compute_contacts")
            );
            false
        }
    }
}

fn dispatch<K: MeshKernel + ?Sized>(
    session: &mut KernelSession<'_, K>,
    request: &ContactRequest<'_>,
) -> Result<(), MeshLinkError> {
    // Released when this frame exits, unwinding included.
    let mask = MaskBuffer::new(request.mask);
    log::debug!(
        "computing {:?} contacts for {} of {} 1D nodes",
        request.mode,
        request.mask.count_eligible(),
        mask.len()
    );
    match request.mode {
        LinkGeneratingType::EmbeddedOneToOne => session.compute_single_contacts(
            &mask,
            &polygon_to_geometry(request.area),
            request.options.single_contact_tolerance,
        ),
        LinkGeneratingType::EmbeddedOneToMany => session.compute_multiple_contacts(&mask),
        LinkGeneratingType::Lateral => session.compute_boundary_contacts(
            &mask,
            &polygon_to_geometry(request.area),
            request.options.lateral_search_distance,
        ),
        LinkGeneratingType::GullySewer => {
            let points = points_in_area(request.auxiliary_points, request.area);
            session.compute_contacts_with_points(&mask, &coordinates_to_geometry(&points))
        }
    }
}

/// Fetch the computed contacts; an empty set if the kernel fails.
///
/// Pairs with negative indices are dropped.
pub fn retrieve_contacts<K: MeshKernel + ?Sized>(
    session: &mut KernelSession<'_, K>,
) -> Vec<(PointIndex, KernelFaceIndex)> {
    let contacts = match session.contacts() {
        Ok(contacts) => contacts,
        Err(err) => {
            log::warn!("retrieving contacts failed, continuing without contacts: {err}");
            return Vec::new();
        }
    };
    contacts
        .mesh1d_indices
        .iter()
        .zip(&contacts.mesh2d_indices)
        .filter_map(|(&from, &to)| {
            let from = usize::try_from(from).ok()?;
            let to = usize::try_from(to).ok()?;
            Some((PointIndex(from), KernelFaceIndex(to)))
        })
        .collect()
}
