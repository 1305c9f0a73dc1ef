//! Planar coordinates and axis-aligned envelopes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in the model's planar coordinate system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both ordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(&self, other: &Coordinate) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Arithmetic mean of `coords`, or `None` when the slice is empty.
    pub fn mean(coords: &[Coordinate]) -> Option<Coordinate> {
        if coords.is_empty() {
            return None;
        }
        let (sx, sy) = coords
            .iter()
            .fold((0.0, 0.0), |(sx, sy), c| (sx + c.x, sy + c.y));
        let n = coords.len() as f64;
        Some(Coordinate::new(sx / n, sy / n))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Coordinate::new(x, y)
    }
}

/// Axis-aligned bounding rectangle. Always non-empty; a single point yields a
/// zero-size envelope.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Envelope {
    /// Envelope around a single coordinate.
    pub fn of_point(c: Coordinate) -> Self {
        Self {
            min_x: c.x,
            min_y: c.y,
            max_x: c.x,
            max_y: c.y,
        }
    }

    /// Envelope of all `coords`, or `None` if there are none.
    pub fn from_coordinates<'a, I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        let mut iter = coords.into_iter();
        let first = Envelope::of_point(*iter.next()?);
        Some(iter.fold(first, |env, c| env.expanded_to_include(*c)))
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[inline]
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            0.5 * (self.min_x + self.max_x),
            0.5 * (self.min_y + self.max_y),
        )
    }

    #[must_use]
    pub fn expanded_to_include(mut self, c: Coordinate) -> Self {
        self.min_x = self.min_x.min(c.x);
        self.min_y = self.min_y.min(c.y);
        self.max_x = self.max_x.max(c.x);
        self.max_y = self.max_y.max(c.y);
        self
    }

    /// Grow the envelope by `dx` on both x sides and `dy` on both y sides.
    #[must_use]
    pub fn expanded_by(self, dx: f64, dy: f64) -> Self {
        Self {
            min_x: self.min_x - dx,
            min_y: self.min_y - dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }

    /// Closed containment test (boundary counts as inside).
    #[inline]
    pub fn covers(&self, c: Coordinate) -> bool {
        c.x >= self.min_x && c.x <= self.max_x && c.y >= self.min_y && c.y <= self.max_y
    }

    /// `other` lies entirely within `self`.
    #[inline]
    pub fn contains(&self, other: &Envelope) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    /// Corners in counter-clockwise order starting at the lower-left corner.
    pub fn corners(&self) -> [Coordinate; 4] {
        [
            Coordinate::new(self.min_x, self.min_y),
            Coordinate::new(self.max_x, self.min_y),
            Coordinate::new(self.max_x, self.max_y),
            Coordinate::new(self.min_x, self.max_y),
        ]
    }

    /// Split into four equal quadrants: SW, SE, NW, NE.
    pub fn quadrants(&self) -> [Envelope; 4] {
        let c = self.center();
        [
            Envelope {
                min_x: self.min_x,
                min_y: self.min_y,
                max_x: c.x,
                max_y: c.y,
            },
            Envelope {
                min_x: c.x,
                min_y: self.min_y,
                max_x: self.max_x,
                max_y: c.y,
            },
            Envelope {
                min_x: self.min_x,
                min_y: c.y,
                max_x: c.x,
                max_y: self.max_y,
            },
            Envelope {
                min_x: c.x,
                min_y: c.y,
                max_x: self.max_x,
                max_y: self.max_y,
            },
        ]
    }
}
