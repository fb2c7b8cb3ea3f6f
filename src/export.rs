//! Plain-text coordinate dumps of a [`QuadTree`], in the whitespace-separated
//! format consumed by external plotting tools: one `x_min x_max y_min y_max`
//! line per node rectangle, one `x y` line per stored point.

use std::io::{self, Write};

use crate::{quadtree::QuadTree, Point};

/// Write one `x_min x_max y_min y_max` line per quadtree node
pub fn write_node_bounds<T, W>(tree: &QuadTree<T>, writer: &mut W) -> io::Result<()>
where
    T: Point + Clone,
    W: Write,
{
    let mut bounds = Vec::new();
    tree.node_bounds(&mut bounds);
    for b in &bounds {
        writeln!(
            writer,
            "{} {} {} {}",
            b.min().x,
            b.max().x,
            b.min().y,
            b.max().y
        )?;
    }
    Ok(())
}

/// Write one `x y` line per stored item
pub fn write_points<T, W>(tree: &QuadTree<T>, writer: &mut W) -> io::Result<()>
where
    T: Point + Clone,
    W: Write,
{
    let mut items = Vec::new();
    tree.items(&mut items);
    for item in &items {
        let point = item.point();
        writeln!(writer, "{} {}", point.x, point.y)?;
    }
    Ok(())
}
