use nalgebra::point;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    record::{FieldSelect, MalformedRecordError, Record},
    Bounds, P2,
};

/// The running min/max of a single axis.
///
/// `Empty` is distinct from any numeric range, so a scan over no data never
/// masquerades as a degenerate `[0, 0]` range.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AxisRange {
    /// No values observed yet
    #[default]
    Empty,
    /// At least one value observed; `min <= max` holds after every update
    Bounded { min: f64, max: f64 },
}

impl AxisRange {
    /// Widen the range to cover `value`
    pub fn update(&mut self, value: f64) {
        match self {
            Self::Empty => {
                *self = Self::Bounded {
                    min: value,
                    max: value,
                }
            }
            Self::Bounded { min, max } => {
                if value < *min {
                    *min = value;
                }
                if value > *max {
                    *max = value;
                }
            }
        }
    }

    /// Widen the range to cover everything `other` covers
    pub fn merge(&mut self, other: &Self) {
        if let Self::Bounded { min, max } = other {
            self.update(*min);
            self.update(*max);
        }
    }

    /// The smallest value observed, if any
    pub fn min(&self) -> Option<f64> {
        match self {
            Self::Empty => None,
            Self::Bounded { min, .. } => Some(*min),
        }
    }

    /// The largest value observed, if any
    pub fn max(&self) -> Option<f64> {
        match self {
            Self::Empty => None,
            Self::Bounded { max, .. } => Some(*max),
        }
    }
}

/// Axis-aligned bounding range covering every point seen so far.
///
/// Created empty, widened once per point, and read out once the input is
/// exhausted. An extent that saw no points stays [`Extent::is_empty`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Extent {
    pub x: AxisRange,
    pub y: AxisRange,
}

impl Extent {
    /// Create an extent covering nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the extent of a set of points
    pub fn of_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a P2>,
    {
        let mut extent = Self::new();
        for point in points {
            extent.expand(*point);
        }
        extent
    }

    /// Check if no points have been covered yet
    pub fn is_empty(&self) -> bool {
        self.x == AxisRange::Empty
    }

    /// Widen the extent to cover `point`
    pub fn expand(&mut self, point: P2) {
        self.x.update(point.x);
        self.y.update(point.y);
    }

    /// Widen the extent to cover everything `other` covers
    pub fn merge(&mut self, other: &Self) {
        self.x.merge(&other.x);
        self.y.merge(&other.y);
    }

    /// The rectangle spanning the extent, or `None` if no points were seen
    pub fn to_bounds(&self) -> Option<Bounds> {
        match (self.x, self.y) {
            (
                AxisRange::Bounded {
                    min: x_min,
                    max: x_max,
                },
                AxisRange::Bounded {
                    min: y_min,
                    max: y_max,
                },
            ) => Some(Bounds::new(point![x_min, y_min], point![x_max, y_max])),
            _ => None,
        }
    }
}

/// Scan a sequence of records once, accumulating the extent of the two
/// fields named by `select`.
///
/// Single forward pass, constant auxiliary space; the sequence is consumed
/// exactly once, in order. An empty sequence yields the empty [`Extent`].
/// A field that cannot be read as a finite number aborts the scan with a
/// [`MalformedRecordError`] carrying the record's 1-based position; the
/// partial extent accumulated up to that record is discarded.
pub fn scan_extent<I>(records: I, select: FieldSelect) -> Result<Extent, MalformedRecordError>
where
    I: IntoIterator,
    I::Item: Record,
{
    let mut extent = Extent::new();
    for (i, record) in records.into_iter().enumerate() {
        extent.expand(select.point_of(&record, i + 1)?);
    }
    Ok(extent)
}
