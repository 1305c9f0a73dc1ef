//! Node eligibility: which discretization points may take part in linking.
//!
//! The rules depend on the link generating mode, on the sewer metadata of the
//! point's branch and on an optional area of effect. Computing the mask never
//! fails; missing data simply makes a point eligible or ineligible.

use crate::geometry::Polygon;
use crate::link::LinkGeneratingType;
use crate::network::{
    Branch, CompartmentKind, Discretization, DiscretizationPoint, PointIndex, SewerConnection,
    WaterType,
};
use hashbrown::HashSet;
use std::ops::Deref;

/// One eligibility flag per discretization point.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeMask(Vec<bool>);

impl NodeMask {
    #[inline]
    pub fn is_eligible(&self, point: PointIndex) -> bool {
        self.0.get(point.0).copied().unwrap_or(false)
    }

    /// Number of eligible points.
    pub fn count_eligible(&self) -> usize {
        self.0.iter().filter(|&&b| b).count()
    }

    /// Indices of eligible points, ascending.
    pub fn eligible(&self) -> impl Iterator<Item = PointIndex> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| b.then_some(PointIndex(i)))
    }
}

impl Deref for NodeMask {
    type Target = [bool];

    fn deref(&self) -> &[bool] {
        &self.0
    }
}

impl From<Vec<bool>> for NodeMask {
    fn from(flags: Vec<bool>) -> Self {
        NodeMask(flags)
    }
}

/// Inputs of the eligibility filter besides the points and the mode.
#[derive(Clone, Copy, Debug, Default)]
pub struct EligibilityRules<'a> {
    /// Points that may not be linked in the embedded modes.
    pub excluded: Option<&'a HashSet<PointIndex>>,
    /// Points outside this polygon are never eligible.
    pub area_of_effect: Option<&'a Polygon>,
    /// The user explicitly asked for generation (allows untyped sewers in
    /// gully mode).
    pub generated_by_user: bool,
    /// Distance within which a chainage counts as being at a branch end.
    pub chainage_tolerance: f64,
}

/// Compute the eligibility mask for every point of `discretization`.
pub fn compute_mask(
    discretization: &Discretization,
    mode: LinkGeneratingType,
    rules: &EligibilityRules<'_>,
) -> NodeMask {
    let excluded = rules.excluded.filter(|set| !set.is_empty());
    let flags = discretization
        .points()
        .iter()
        .enumerate()
        .map(|(i, point)| {
            if let Some(area) = rules.area_of_effect {
                if !area.covers(point.coordinate) {
                    return false;
                }
            }
            let branch = discretization.branch_of(point);
            match mode {
                LinkGeneratingType::Lateral => branch.kind.sewer().is_none(),
                LinkGeneratingType::EmbeddedOneToOne | LinkGeneratingType::EmbeddedOneToMany => {
                    match branch.kind.sewer() {
                        Some(sewer) => {
                            embedded_sewer_eligible(sewer, point, branch, rules.chainage_tolerance)
                        }
                        None => excluded.is_none_or(|set| !set.contains(&PointIndex(i))),
                    }
                }
                LinkGeneratingType::GullySewer => match branch.kind.sewer() {
                    Some(sewer) => gully_sewer_eligible(sewer, rules.generated_by_user),
                    None => true,
                },
            }
        })
        .collect();
    NodeMask(flags)
}

fn embedded_sewer_eligible(
    sewer: &SewerConnection,
    point: &DiscretizationPoint,
    branch: &Branch,
    tolerance: f64,
) -> bool {
    let linkable_water = matches!(
        sewer.water_type,
        WaterType::None | WaterType::Combined | WaterType::Storm
    );
    linkable_water && !at_outlet(sewer, point, branch, tolerance)
}

/// The point sits on the end of the branch that connects to an outlet.
fn at_outlet(
    sewer: &SewerConnection,
    point: &DiscretizationPoint,
    branch: &Branch,
    tolerance: f64,
) -> bool {
    let at_source = point.chainage.abs() <= tolerance;
    let at_target = (point.chainage - branch.length).abs() <= tolerance;
    (at_source && sewer.source == CompartmentKind::Outlet)
        || (at_target && sewer.target == CompartmentKind::Outlet)
}

fn gully_sewer_eligible(sewer: &SewerConnection, generated_by_user: bool) -> bool {
    match sewer.water_type {
        WaterType::Combined | WaterType::Storm => true,
        WaterType::None => generated_by_user,
        WaterType::DryWeather => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Coordinate;
    use crate::network::{Branch, BranchIndex};

    fn point(branch: usize, chainage: f64, x: f64) -> DiscretizationPoint {
        DiscretizationPoint {
            branch: BranchIndex(branch),
            chainage,
            coordinate: Coordinate::new(x, 0.0),
        }
    }

    fn rules<'a>() -> EligibilityRules<'a> {
        EligibilityRules {
            chainage_tolerance: 1e-6,
            ..Default::default()
        }
    }

    fn sewer(water_type: WaterType, target: CompartmentKind) -> Branch {
        Branch::sewer(
            "pipe",
            10.0,
            SewerConnection {
                water_type,
                source: CompartmentKind::Manhole,
                target,
            },
        )
    }

    #[test]
    fn lateral_excludes_sewers() {
        let disc = Discretization::new(
            vec![
                Branch::channel("c", 10.0),
                sewer(WaterType::Storm, CompartmentKind::Manhole),
            ],
            vec![point(0, 0.0, 0.0), point(1, 5.0, 1.0)],
        )
        .unwrap();
        let mask = compute_mask(&disc, LinkGeneratingType::Lateral, &rules());
        assert_eq!(&*mask, &[true, false]);
    }

    #[test]
    fn embedded_outlet_end_is_ineligible() {
        let disc = Discretization::new(
            vec![
                sewer(WaterType::None, CompartmentKind::Outlet),
                sewer(WaterType::Combined, CompartmentKind::Outlet),
                sewer(WaterType::DryWeather, CompartmentKind::Manhole),
            ],
            vec![
                point(0, 10.0, 0.0),
                point(1, 5.0, 1.0),
                point(1, 10.0, 2.0),
                point(2, 5.0, 3.0),
            ],
        )
        .unwrap();
        for mode in [
            LinkGeneratingType::EmbeddedOneToOne,
            LinkGeneratingType::EmbeddedOneToMany,
        ] {
            let mask = compute_mask(&disc, mode, &rules());
            assert_eq!(&*mask, &[false, true, false, false]);
        }
    }

    #[test]
    fn outlet_end_follows_chainage_direction() {
        let outlet_source = Branch::sewer(
            "pipe",
            10.0,
            SewerConnection {
                water_type: WaterType::Combined,
                source: CompartmentKind::Outlet,
                target: CompartmentKind::Manhole,
            },
        );
        let disc = Discretization::new(
            vec![outlet_source, sewer(WaterType::Combined, CompartmentKind::Outlet)],
            vec![
                point(0, 0.0, 0.0),
                point(0, 5.0, 1.0),
                point(0, 10.0, 2.0),
                point(1, 0.0, 3.0),
                point(1, 10.0, 4.0),
            ],
        )
        .unwrap();
        let mask = compute_mask(&disc, LinkGeneratingType::EmbeddedOneToOne, &rules());
        assert_eq!(&*mask, &[false, true, true, true, false]);
    }

    #[test]
    fn embedded_honours_exclusions_for_channels_only() {
        let disc = Discretization::new(
            vec![
                Branch::channel("c", 10.0),
                sewer(WaterType::Storm, CompartmentKind::Manhole),
            ],
            vec![point(0, 0.0, 0.0), point(0, 10.0, 1.0), point(1, 5.0, 2.0)],
        )
        .unwrap();
        let excluded: HashSet<PointIndex> = [PointIndex(1), PointIndex(2)].into_iter().collect();
        let rules = EligibilityRules {
            excluded: Some(&excluded),
            ..rules()
        };
        let mask = compute_mask(&disc, LinkGeneratingType::EmbeddedOneToOne, &rules);
        assert_eq!(&*mask, &[true, false, true]);
        assert_eq!(mask.count_eligible(), 2);
        assert_eq!(mask.eligible().collect::<Vec<_>>(), vec![PointIndex(0), PointIndex(2)]);
    }

    #[test]
    fn gully_mode_needs_user_for_untyped_sewers() {
        let disc = Discretization::new(
            vec![
                Branch::channel("c", 10.0),
                sewer(WaterType::None, CompartmentKind::Manhole),
                sewer(WaterType::Combined, CompartmentKind::Manhole),
                sewer(WaterType::DryWeather, CompartmentKind::Manhole),
            ],
            vec![point(0, 0.0, 0.0), point(1, 1.0, 1.0), point(2, 1.0, 2.0), point(3, 1.0, 3.0)],
        )
        .unwrap();
        let mask = compute_mask(&disc, LinkGeneratingType::GullySewer, &rules());
        assert_eq!(&*mask, &[true, false, true, false]);

        let by_user = EligibilityRules {
            generated_by_user: true,
            ..rules()
        };
        let mask = compute_mask(&disc, LinkGeneratingType::GullySewer, &by_user);
        assert_eq!(&*mask, &[true, true, true, false]);
    }

    #[test]
    fn area_of_effect_overrides_mode() {
        let disc = Discretization::new(
            vec![Branch::channel("c", 10.0)],
            vec![point(0, 0.0, 0.0), point(0, 5.0, 5.0), point(0, 10.0, 10.0)],
        )
        .unwrap();
        let area = Polygon::new(vec![
            Coordinate::new(-1.0, -1.0),
            Coordinate::new(6.0, -1.0),
            Coordinate::new(6.0, 1.0),
            Coordinate::new(-1.0, 1.0),
        ])
        .unwrap();
        let rules = EligibilityRules {
            area_of_effect: Some(&area),
            ..rules()
        };
        for mode in LinkGeneratingType::ALL {
            let mask = compute_mask(&disc, mode, &rules);
            assert_eq!(&*mask, &[true, true, false], "{mode:?}");
        }
    }
}
