//! Link materialization: index pairs to link records.

use crate::grid::{CellIndex, UnstructuredGrid};
use crate::link::{Link1D2D, LinkGeneratingType};
use crate::network::{Discretization, PointIndex};

/// Build one link per `(point, cell)` pair, in input order.
///
/// Each link runs from the point's coordinate to the cell's centroid and is
/// tagged with the mode's storage type. Pairs referring to unknown points or
/// cells are skipped with a warning. No deduplication.
pub fn build_links(
    contacts: &[(PointIndex, CellIndex)],
    discretization: &Discretization,
    grid: &UnstructuredGrid,
    mode: LinkGeneratingType,
) -> Vec<Link1D2D> {
    let link_type = mode.storage_type();
    contacts
        .iter()
        .filter_map(|&(point, cell)| {
            let (Some(p), Some(c)) = (discretization.point(point), grid.cell(cell)) else {
                log::warn!("skipping contact ({point}, {cell}): index out of range");
                return None;
            };
            Some(Link1D2D {
                point,
                cell,
                geometry: [p.coordinate, c.centroid],
                link_type,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Coordinate;
    use crate::link::LinkStorageType;
    use crate::network::{Branch, BranchIndex, DiscretizationPoint};

    #[test]
    fn links_run_from_point_to_centroid() {
        let grid = UnstructuredGrid::rectilinear(2, 1, Coordinate::new(0.0, 0.0), 2.0, 2.0).unwrap();
        let disc = Discretization::new(
            vec![Branch::channel("c", 4.0)],
            vec![
                DiscretizationPoint {
                    branch: BranchIndex(0),
                    chainage: 0.0,
                    coordinate: Coordinate::new(0.5, 0.5),
                },
                DiscretizationPoint {
                    branch: BranchIndex(0),
                    chainage: 3.0,
                    coordinate: Coordinate::new(3.5, 0.5),
                },
            ],
        )
        .unwrap();
        let contacts = [
            (PointIndex(1), CellIndex(1)),
            (PointIndex(0), CellIndex(0)),
            (PointIndex(0), CellIndex(0)),
            (PointIndex(7), CellIndex(0)),
            (PointIndex(0), CellIndex(9)),
        ];
        let links = build_links(&contacts, &disc, &grid, LinkGeneratingType::Lateral);
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].point, PointIndex(1));
        assert_eq!(
            links[0].geometry,
            [Coordinate::new(3.5, 0.5), Coordinate::new(3.0, 1.0)]
        );
        assert_eq!(links[1], links[2]);
        assert!(links.iter().all(|l| l.link_type == LinkStorageType::Lateral));
    }

    #[test]
    fn no_contacts_no_links() {
        let links = build_links(
            &[],
            &Discretization::default(),
            &UnstructuredGrid::default(),
            LinkGeneratingType::GullySewer,
        );
        assert!(links.is_empty());
    }
}
