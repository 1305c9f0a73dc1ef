//! Area of effect: the polygon that bounds where links may be generated.

use crate::geometry::{Coordinate, Envelope, Polygon};

/// Resolve the area of effect.
///
/// A user polygon is returned unchanged. Otherwise the bounding box of
/// `candidates` is grown by `margin_fraction` of its width on the x axis and
/// of its height on the y axis, so points on the original boundary are
/// strictly inside. A zero-width or zero-height box stays degenerate.
///
/// Returns `None` when there is no user polygon and no candidate.
pub fn resolve_area<'a, I>(
    user_polygon: Option<&Polygon>,
    candidates: I,
    margin_fraction: f64,
) -> Option<Polygon>
where
    I: IntoIterator<Item = &'a Coordinate>,
{
    if let Some(polygon) = user_polygon {
        return Some(polygon.clone());
    }
    let env = Envelope::from_coordinates(candidates)?;
    let grown = env.expanded_by(env.width() * margin_fraction, env.height() * margin_fraction);
    Some(Polygon::rectangle(&grown))
}
