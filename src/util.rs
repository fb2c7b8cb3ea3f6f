use crate::{bounds::Bounds, P2};

/// Index into [`Bounds::quarter`] of the quadrant holding `point`.
/// Routing splits at the center; values on a midline go east/north.
pub(crate) fn quadrant_index(bounds: &Bounds, point: &P2) -> usize {
    let center = bounds.center();
    let east = (point.x >= center.x) as usize;
    let north = (point.y >= center.y) as usize;
    east * 2 + north
}
