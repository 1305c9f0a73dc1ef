//! Link generation entry points.
//!
//! One call runs the whole chain: eligibility mask, validity gate, area of
//! effect, kernel session (meshes, contacts, and for one-to-many the kernel's
//! own mesh), spatial re-matching where needed, and link materialization.
//! Nothing is kept between calls. Failures degrade the output; they never
//! reach the caller as errors.

use crate::algs::adapter::{domain_cell, mesh1d_from_discretization, mesh2d_from_grid};
use crate::algs::area::resolve_area;
use crate::algs::cell_matcher::{SpatialCellIndex, match_contacts};
use crate::algs::contacts::{ContactRequest, compute_contacts, points_in_area, retrieve_contacts};
use crate::algs::eligibility::{EligibilityRules, NodeMask, compute_mask};
use crate::algs::materialize::build_links;
use crate::geometry::{Coordinate, Polygon};
use crate::grid::{CellIndex, UnstructuredGrid};
use crate::kernel::{KernelFaceIndex, KernelSession, MeshKernel};
use crate::link::{Link1D2D, LinkGeneratingType};
use crate::mesh_error::MeshLinkError;
use crate::network::{Discretization, Gully, PointIndex};
use crate::options::LinkGenerationOptions;
use hashbrown::HashSet;

/// Why a generation run produced no links without consulting the kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Fewer than two eligible 1D points.
    TooFewEligiblePoints { eligible: usize },
    /// Gully-sewer mode without gullies (in the area of effect).
    NoGullies,
    /// No area of effect could be derived (no selection, no 1D points).
    NoAreaOfEffect,
}

/// Non-fatal problems met while generating links.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationReport {
    /// The kernel was never called.
    pub rejection: Option<Rejection>,
    /// A kernel step failed; the run continued with fewer or no contacts.
    pub kernel_failure: Option<MeshLinkError>,
    /// Number of raw contacts the kernel reported.
    pub raw_contacts: usize,
    /// Kernel face centres no domain cell contains (one-to-many only).
    pub unmatched: Vec<Coordinate>,
    /// Kernel faces reported in contacts but absent from the kernel mesh.
    pub missing_faces: Vec<KernelFaceIndex>,
    /// Contacts dropped because their 1D point was not eligible.
    pub ineligible_contacts: usize,
}

impl GenerationReport {
    /// Whether anything worth surfacing to the user happened.
    pub fn has_errors(&self) -> bool {
        self.kernel_failure.is_some() || !self.unmatched.is_empty() || !self.missing_faces.is_empty()
    }
}

/// Configured link generator.
///
/// ```ignore
/// let links = LinkGenerator::new(LinkGeneratingType::EmbeddedOneToOne)
///     .generated_by_user(true)
///     .generate(&mut kernel, &grid, &discretization);
/// ```
#[derive(Clone, Debug)]
pub struct LinkGenerator<'a> {
    mode: LinkGeneratingType,
    selection: Option<&'a Polygon>,
    gullies: &'a [Gully],
    excluded: Option<HashSet<PointIndex>>,
    generated_by_user: bool,
    options: LinkGenerationOptions,
}

impl<'a> LinkGenerator<'a> {
    pub fn new(mode: LinkGeneratingType) -> Self {
        Self {
            mode,
            selection: None,
            gullies: &[],
            excluded: None,
            generated_by_user: false,
            options: LinkGenerationOptions::default(),
        }
    }

    /// Restrict generation to a user-drawn polygon.
    pub fn selection(mut self, polygon: Option<&'a Polygon>) -> Self {
        self.selection = polygon;
        self
    }

    pub fn gullies(mut self, gullies: &'a [Gully]) -> Self {
        self.gullies = gullies;
        self
    }

    /// 1D points that must not be linked in the embedded modes.
    pub fn exclude<I: IntoIterator<Item = PointIndex>>(mut self, points: I) -> Self {
        self.excluded = Some(points.into_iter().collect());
        self
    }

    pub fn generated_by_user(mut self, by_user: bool) -> Self {
        self.generated_by_user = by_user;
        self
    }

    /// Use custom options; they are validated here.
    pub fn with_options(mut self, options: LinkGenerationOptions) -> Result<Self, MeshLinkError> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    #[inline]
    pub fn mode(&self) -> LinkGeneratingType {
        self.mode
    }

    /// Generate links; problems are logged and dropped.
    pub fn generate<K: MeshKernel + ?Sized>(
        &self,
        kernel: &mut K,
        grid: &UnstructuredGrid,
        discretization: &Discretization,
    ) -> Vec<Link1D2D> {
        self.generate_with_report(kernel, grid, discretization).0
    }

    /// Generate links and report what went wrong along the way.
    pub fn generate_with_report<K: MeshKernel + ?Sized>(
        &self,
        kernel: &mut K,
        grid: &UnstructuredGrid,
        discretization: &Discretization,
    ) -> (Vec<Link1D2D>, GenerationReport) {
        let mut report = GenerationReport::default();
        let rules = EligibilityRules {
            excluded: self.excluded.as_ref(),
            area_of_effect: self.selection,
            generated_by_user: self.generated_by_user,
            chainage_tolerance: self.options.chainage_tolerance,
        };
        let mask = compute_mask(discretization, self.mode, &rules);

        if let Some(rejection) = self.gate(&mask) {
            log::debug!("{:?} link generation rejected: {rejection:?}", self.mode);
            report.rejection = Some(rejection);
            return (Vec::new(), report);
        }

        let candidates: Vec<Coordinate> = discretization.coordinates().collect();
        let Some(area) = resolve_area(self.selection, &candidates, self.options.area_margin_fraction)
        else {
            report.rejection = Some(Rejection::NoAreaOfEffect);
            return (Vec::new(), report);
        };

        let gully_points: Vec<Coordinate> = self.gullies.iter().map(|g| g.coordinate).collect();
        if self.mode == LinkGeneratingType::GullySewer && points_in_area(&gully_points, &area).is_empty()
        {
            log::debug!("no gullies inside the area of effect");
            report.rejection = Some(Rejection::NoGullies);
            return (Vec::new(), report);
        }

        let request = ContactRequest {
            mode: self.mode,
            mask: &mask,
            area: &area,
            auxiliary_points: &gully_points,
            options: &self.options,
        };
        let contacts = match self.run_kernel(kernel, grid, discretization, &request, &mut report) {
            Ok(contacts) => contacts,
            Err(err) => {
                log::warn!("{:?} link generation failed in the kernel: {err}", self.mode);
                report.kernel_failure = Some(err);
                return (Vec::new(), report);
            }
        };

        let contacts: Vec<(PointIndex, CellIndex)> = contacts
            .into_iter()
            .filter(|(point, _)| {
                let eligible = mask.is_eligible(*point);
                if !eligible {
                    report.ineligible_contacts += 1;
                }
                eligible
            })
            .collect();
        if report.ineligible_contacts > 0 {
            log::warn!(
                "dropped {} kernel contacts on ineligible 1D points",
                report.ineligible_contacts
            );
        }

        let links = build_links(&contacts, discretization, grid, self.mode);
        log::debug!("generated {} {:?} links", links.len(), self.mode);
        (links, report)
    }

    fn gate(&self, mask: &NodeMask) -> Option<Rejection> {
        match self.mode {
            LinkGeneratingType::GullySewer if self.gullies.is_empty() => Some(Rejection::NoGullies),
            LinkGeneratingType::GullySewer => None,
            _ => {
                let eligible = mask.count_eligible();
                (eligible < 2).then_some(Rejection::TooFewEligiblePoints { eligible })
            }
        }
    }

    /// Session scope: the kernel state is released when this returns, on
    /// every path.
    fn run_kernel<K: MeshKernel + ?Sized>(
        &self,
        kernel: &mut K,
        grid: &UnstructuredGrid,
        discretization: &Discretization,
        request: &ContactRequest<'_>,
        report: &mut GenerationReport,
    ) -> Result<Vec<(PointIndex, CellIndex)>, MeshLinkError> {
        let mesh1d = mesh1d_from_discretization(discretization)?;
        let mesh2d = mesh2d_from_grid(grid, self.options.face_fill_value)?;

        let mut session = KernelSession::open(kernel)?;
        session.set_mesh1d(&mesh1d)?;
        session.set_mesh2d(&mesh2d)?;
        if !compute_contacts(&mut session, request) {
            return Err(MeshLinkError::ContactsFailed(self.mode));
        }
        let raw: Vec<(PointIndex, KernelFaceIndex)> = retrieve_contacts(&mut session);
        report.raw_contacts = raw.len();

        if self.mode != LinkGeneratingType::EmbeddedOneToMany {
            return Ok(raw
                .into_iter()
                .map(|(point, face)| (point, domain_cell(face)))
                .collect());
        }

        let kernel_mesh = session.mesh2d()?;
        drop(session);
        let Some(index) = SpatialCellIndex::build(grid, self.options.quadtree_level_factor) else {
            return Ok(Vec::new());
        };
        let matched = match_contacts(&index, &kernel_mesh, &raw);
        report.unmatched = matched.unmatched;
        report.missing_faces = matched.missing_faces;
        Ok(matched.contacts)
    }
}

/// Generate 1D–2D links with default options.
///
/// `selection` restricts generation to a polygon, `gullies` feed gully-sewer
/// mode, and `excluded` lists 1D points that must not be linked in the
/// embedded modes. Always returns a (possibly empty) list.
pub fn generate_links<K: MeshKernel + ?Sized>(
    kernel: &mut K,
    selection: Option<&Polygon>,
    mode: LinkGeneratingType,
    grid: &UnstructuredGrid,
    gullies: &[Gully],
    discretization: &Discretization,
    excluded: Option<&[PointIndex]>,
) -> Vec<Link1D2D> {
    generate_links_with_report(kernel, selection, mode, grid, gullies, discretization, excluded).0
}

/// [`generate_links`] plus the report of non-fatal problems.
pub fn generate_links_with_report<K: MeshKernel + ?Sized>(
    kernel: &mut K,
    selection: Option<&Polygon>,
    mode: LinkGeneratingType,
    grid: &UnstructuredGrid,
    gullies: &[Gully],
    discretization: &Discretization,
    excluded: Option<&[PointIndex]>,
) -> (Vec<Link1D2D>, GenerationReport) {
    let mut generator = LinkGenerator::new(mode).selection(selection).gullies(gullies);
    if let Some(points) = excluded {
        generator = generator.exclude(points.iter().copied());
    }
    generator.generate_with_report(kernel, grid, discretization)
}
