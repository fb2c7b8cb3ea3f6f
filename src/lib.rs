//! Streaming bounding-extent scanning and quadtree indexing for 2d point
//! records.
//!
//! [`scan_extent`] folds a sequence of tabular records into the axis-aligned
//! [`Extent`] covering the selected coordinate fields. The extent can then
//! back a [`QuadTree`] over the same points, which supports exact lookup and
//! k-nearest-neighbor queries, and whose node rectangles can be dumped for
//! external plotting tools via [`export`].

use nalgebra::Point2;

pub mod bounds;
pub mod export;
pub mod extent;
pub mod quadtree;
pub mod record;
mod util;

pub use bounds::Bounds;
pub use extent::{scan_extent, AxisRange, Extent};
pub use quadtree::QuadTree;
pub use record::{FieldSelect, MalformedRecordError, Record};

/// 2d point in the plane
pub type P2 = Point2<f64>;

/// Trait for getting a 2d point position of data stored in the [`QuadTree`]
pub trait Point {
    /// Get 2d point position
    fn point(&self) -> P2;
}

impl Point for P2 {
    fn point(&self) -> P2 {
        *self
    }
}
