//! One-dimensional branch network as seen by the link engine.
//!
//! The engine only reads the network: discretization points (branch, chainage,
//! coordinate), the branch they lie on, and for sewer connections the water
//! type and the kind of compartment at each end. Whether a branch is a sewer
//! connection is a tag on the branch value, resolved once when the network is
//! built.

use crate::geometry::Coordinate;
use crate::mesh_error::MeshLinkError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a discretization point in [`Discretization::points`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct PointIndex(pub usize);

impl fmt::Display for PointIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index of a branch in [`Discretization::branches`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct BranchIndex(pub usize);

/// Water carried by a sewer connection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaterType {
    #[default]
    None,
    Combined,
    Storm,
    DryWeather,
}

/// Kind of compartment at the end of a sewer connection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompartmentKind {
    #[default]
    Manhole,
    /// Discharge point of the sewer system.
    Outlet,
}

/// Sewer-specific metadata of a branch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SewerConnection {
    pub water_type: WaterType,
    pub source: CompartmentKind,
    pub target: CompartmentKind,
}

/// What a branch is, as far as link eligibility is concerned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BranchKind {
    /// Open channel or any other non-sewer branch.
    #[default]
    Channel,
    SewerConnection(SewerConnection),
}

impl BranchKind {
    #[inline]
    pub fn sewer(&self) -> Option<&SewerConnection> {
        match self {
            BranchKind::SewerConnection(sewer) => Some(sewer),
            BranchKind::Channel => None,
        }
    }
}

/// A branch of the 1D network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    /// Length along which chainages are measured.
    pub length: f64,
    pub kind: BranchKind,
}

impl Branch {
    pub fn channel(name: impl Into<String>, length: f64) -> Self {
        Self {
            name: name.into(),
            length,
            kind: BranchKind::Channel,
        }
    }

    pub fn sewer(name: impl Into<String>, length: f64, connection: SewerConnection) -> Self {
        Self {
            name: name.into(),
            length,
            kind: BranchKind::SewerConnection(connection),
        }
    }
}

/// A 1D calculation point on a branch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiscretizationPoint {
    pub branch: BranchIndex,
    /// Distance along the branch.
    pub chainage: f64,
    pub coordinate: Coordinate,
}

/// Branches plus the ordered discretization points on them.
///
/// Points of one branch are expected to be consecutive and ordered by
/// chainage; the geometry adapter connects consecutive points of the same
/// branch with an edge. Deserialized documents are checked like
/// [`Discretization::new`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DiscretizationRaw")]
pub struct Discretization {
    branches: Vec<Branch>,
    points: Vec<DiscretizationPoint>,
}

#[derive(Deserialize)]
struct DiscretizationRaw {
    branches: Vec<Branch>,
    points: Vec<DiscretizationPoint>,
}

impl TryFrom<DiscretizationRaw> for Discretization {
    type Error = MeshLinkError;

    fn try_from(raw: DiscretizationRaw) -> Result<Self, Self::Error> {
        Discretization::new(raw.branches, raw.points)
    }
}

impl Discretization {
    /// Build a discretization, checking every point's branch reference.
    pub fn new(
        branches: Vec<Branch>,
        points: Vec<DiscretizationPoint>,
    ) -> Result<Self, MeshLinkError> {
        for (i, p) in points.iter().enumerate() {
            if p.branch.0 >= branches.len() {
                return Err(MeshLinkError::UnknownBranch {
                    point: i,
                    branch: p.branch.0,
                });
            }
            if !p.coordinate.is_finite() {
                return Err(MeshLinkError::InvalidGeometry(format!(
                    "discretization point {i} has non-finite coordinate {}",
                    p.coordinate
                )));
            }
        }
        Ok(Self { branches, points })
    }

    #[inline]
    pub fn points(&self) -> &[DiscretizationPoint] {
        &self.points
    }

    #[inline]
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, index: PointIndex) -> Option<&DiscretizationPoint> {
        self.points.get(index.0)
    }

    /// Branch a point lies on. References are validated in [`Discretization::new`].
    pub fn branch_of(&self, point: &DiscretizationPoint) -> &Branch {
        &self.branches[point.branch.0]
    }

    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.points.iter().map(|p| p.coordinate)
    }
}

/// A stormwater inlet, used only when generating gully-sewer links.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gully {
    pub name: String,
    pub coordinate: Coordinate,
}

impl Gully {
    pub fn new(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: name.into(),
            coordinate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_dangling_branch_reference() {
        let err = Discretization::new(
            vec![Branch::channel("b0", 10.0)],
            vec![DiscretizationPoint {
                branch: BranchIndex(3),
                chainage: 0.0,
                coordinate: Coordinate::new(0.0, 0.0),
            }],
        )
        .unwrap_err();
        assert_eq!(err, MeshLinkError::UnknownBranch { point: 0, branch: 3 });
    }

    #[test]
    fn branch_of_resolves_kind() {
        let sewer = SewerConnection {
            water_type: WaterType::Storm,
            ..Default::default()
        };
        let disc = Discretization::new(
            vec![Branch::channel("c", 5.0), Branch::sewer("s", 5.0, sewer)],
            vec![DiscretizationPoint {
                branch: BranchIndex(1),
                chainage: 2.5,
                coordinate: Coordinate::new(1.0, 1.0),
            }],
        )
        .unwrap();
        let branch = disc.branch_of(&disc.points()[0]);
        assert_eq!(branch.kind.sewer(), Some(&sewer));
        assert_eq!(disc.point(PointIndex(0)).map(|p| p.chainage), Some(2.5));
        assert!(disc.point(PointIndex(1)).is_none());
    }
}
