use nalgebra::{self as na, point};

use crate::P2;

/// Axis-aligned rectangle spanning `min..max` on both axes. Used for
/// quadtree node areas and the exported node rectangles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    min: P2,
    center: P2,
    max: P2,
}

impl Bounds {
    /// Create new bounds from the min and max corners
    pub fn new(min: P2, max: P2) -> Self {
        Self {
            min,
            center: na::center(&min, &max),
            max,
        }
    }

    /// Get the min corner
    pub fn min(&self) -> P2 {
        self.min
    }

    /// Get the max corner
    pub fn max(&self) -> P2 {
        self.max
    }

    /// Get the center point
    pub fn center(&self) -> P2 {
        self.center
    }

    /// Check if a point is inside the bounds, edges included
    pub fn contains(&self, point: &P2) -> bool {
        *point >= self.min && *point <= self.max
    }

    /// Quarter the bounds at the center into [sw, nw, se, ne]
    pub fn quarter(&self) -> [Self; 4] {
        let &Self { min, center, max } = self;
        [
            Self::new(min, center),
            Self::new(point![min.x, center.y], point![center.x, max.y]),
            Self::new(point![center.x, min.y], point![max.x, center.y]),
            Self::new(center, max),
        ]
    }

    /// Shortest euclidean distance from a point to the bounds, zero inside
    pub fn min_dist(&self, point: &P2) -> f64 {
        let dx = (self.min.x - point.x).max(point.x - self.max.x).max(0.0);
        let dy = (self.min.y - point.y).max(point.y - self.max.y).max(0.0);
        (dx * dx + dy * dy).sqrt()
    }

    /// Check whether any point inside the bounds could lie strictly closer
    /// to `point` than `dist`
    pub fn may_contain_closer(&self, point: &P2, dist: f64) -> bool {
        self.min_dist(point) < dist
    }

    /// Quartering only shrinks a node whose center clears both corners
    pub(crate) fn is_splittable(&self) -> bool {
        self.center != self.min && self.center != self.max
    }
}
