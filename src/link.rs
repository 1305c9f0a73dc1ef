//! Link records produced by the engine and the mode that selects how they are
//! generated.

use crate::geometry::Coordinate;
use crate::grid::CellIndex;
use crate::mesh_error::MeshLinkError;
use crate::network::PointIndex;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How 1D–2D links are generated. Governs every filtering and kernel decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkGeneratingType {
    /// Boundary links from channels to the nearest grid boundary faces.
    Lateral,
    /// At most one cell per 1D point.
    EmbeddedOneToOne,
    /// Every cell the 1D network passes through.
    EmbeddedOneToMany,
    /// Links from the cells containing gullies to the sewer system.
    GullySewer,
}

impl LinkGeneratingType {
    pub const ALL: [LinkGeneratingType; 4] = [
        LinkGeneratingType::Lateral,
        LinkGeneratingType::EmbeddedOneToOne,
        LinkGeneratingType::EmbeddedOneToMany,
        LinkGeneratingType::GullySewer,
    ];

    /// Storage tag of links generated in this mode.
    pub fn storage_type(self) -> LinkStorageType {
        match self {
            LinkGeneratingType::Lateral => LinkStorageType::Lateral,
            LinkGeneratingType::EmbeddedOneToOne | LinkGeneratingType::EmbeddedOneToMany => {
                LinkStorageType::Embedded
            }
            LinkGeneratingType::GullySewer => LinkStorageType::GullySewer,
        }
    }
}

impl TryFrom<i32> for LinkGeneratingType {
    type Error = MeshLinkError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or_else(|| MeshLinkError::UnsupportedMode(value.to_string()))
    }
}

impl FromStr for LinkGeneratingType {
    type Err = MeshLinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lateral" => Ok(LinkGeneratingType::Lateral),
            "embeddedonetoone" | "embedded_one_to_one" | "1to1" => {
                Ok(LinkGeneratingType::EmbeddedOneToOne)
            }
            "embeddedonetomany" | "embedded_one_to_many" | "1ton" => {
                Ok(LinkGeneratingType::EmbeddedOneToMany)
            }
            "gullysewer" | "gully_sewer" => Ok(LinkGeneratingType::GullySewer),
            _ => Err(MeshLinkError::UnsupportedMode(s.to_string())),
        }
    }
}

/// Link type as stored in model files (UGrid contact type codes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum LinkStorageType {
    Embedded = 3,
    Lateral = 4,
    GullySewer = 7,
}

impl LinkStorageType {
    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for LinkStorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LinkStorageType::Embedded => "Embedded",
            LinkStorageType::Lateral => "Lateral",
            LinkStorageType::GullySewer => "Gully sewer",
        };
        f.write_str(name)
    }
}

/// A 1D–2D link: discretization point to domain grid cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Link1D2D {
    pub point: PointIndex,
    pub cell: CellIndex,
    /// Straight line from the point's coordinate to the cell centroid.
    pub geometry: [Coordinate; 2],
    pub link_type: LinkStorageType,
}

impl Link1D2D {
    #[inline]
    pub fn key(&self) -> (PointIndex, CellIndex) {
        (self.point, self.cell)
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.geometry[0].distance(&self.geometry[1])
    }
}

/// Links flattened into parallel arrays for solver and file exchange.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LinksGeometry {
    pub link_id: Vec<String>,
    pub mesh1d_from: Vec<i32>,
    pub mesh2d_to: Vec<i32>,
    pub link_type: Vec<i32>,
}

impl LinksGeometry {
    /// Flatten links; ids are `"{point}_{cell}"`.
    ///
    /// Fails when an index does not fit the `i32` arrays.
    pub fn from_links(links: &[Link1D2D]) -> Result<Self, MeshLinkError> {
        let mut out = LinksGeometry::default();
        for link in links {
            let from = i32::try_from(link.point.0).map_err(|_| {
                MeshLinkError::InvalidGeometry(format!("point index {} exceeds i32", link.point))
            })?;
            let to = i32::try_from(link.cell.0).map_err(|_| {
                MeshLinkError::InvalidGeometry(format!("cell index {} exceeds i32", link.cell))
            })?;
            out.link_id.push(format!("{}_{}", link.point, link.cell));
            out.mesh1d_from.push(from);
            out.mesh2d_to.push(to);
            out.link_type.push(link.link_type.code());
        }
        Ok(out)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.link_id.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.link_id.is_empty()
    }
}

/// Append the `generated` links whose (point, cell) pair is not yet in
/// `existing`; returns how many were added.
///
/// The engine never deduplicates; this is the caller-side merge.
pub fn merge_links(existing: &mut Vec<Link1D2D>, generated: Vec<Link1D2D>) -> usize {
    let mut seen: HashSet<(PointIndex, CellIndex)> = existing.iter().map(Link1D2D::key).collect();
    let before = existing.len();
    existing.extend(generated.into_iter().filter(|l| seen.insert(l.key())));
    existing.len() - before
}
