use std::{cmp::Ordering, collections::BinaryHeap};

use nalgebra as na;

use crate::{bounds::Bounds, extent::Extent, util::quadrant_index, Point, P2};

/// A quadtree spatial index over 2d points, supporting exact lookup and
/// k-nearest-neighbor queries.
#[derive(Debug)]
pub struct QuadTree<T> {
    root: Node<T>,
    node_capacity: usize,
    len: usize,
}

impl<T: Point + Clone> QuadTree<T> {
    /// Create a new empty quadtree
    ///
    /// ## Arguments
    /// - `bounds`: The area covered by the quadtree
    /// - `node_capacity`: The maximum number of items a node can hold before subdividing
    pub fn new(bounds: Bounds, node_capacity: usize) -> Self {
        Self {
            root: Node::Empty { bounds },
            node_capacity,
            len: 0,
        }
    }

    /// Build a tree covering exactly the extent of `items`
    ///
    /// **Returns** `None` when `items` is empty, since an empty extent
    /// spans no area to build over
    pub fn from_items(items: &[T], node_capacity: usize) -> Option<Self> {
        let mut extent = Extent::new();
        for item in items {
            extent.expand(item.point());
        }
        let bounds = extent.to_bounds()?;
        let mut tree = Self::new(bounds, node_capacity);
        for item in items {
            tree.insert(item);
        }
        Some(tree)
    }

    /// Insert a point into the quadtree
    ///
    /// **Returns** a boolean value indicating if the item was inserted successfully
    pub fn insert(&mut self, item: &T) -> bool {
        let inserted = self.root.insert(item, self.node_capacity);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Get the item stored exactly at `point`, if any
    pub fn get(&self, point: &P2) -> Option<T> {
        self.root.get(point)
    }

    /// The `k` items nearest to `query`, ordered closest first.
    /// Fewer than `k` items are returned when the tree holds fewer.
    pub fn nearest(&self, query: &P2, k: usize) -> Vec<T> {
        let mut heap = BinaryHeap::with_capacity(k.saturating_add(1));
        if k > 0 {
            self.root.nearest(query, k, &mut heap);
        }
        heap.into_sorted_vec().into_iter().map(|c| c.item).collect()
    }

    /// Collect the bounds of every node into a passed mutable vector,
    /// parents before children
    pub fn node_bounds(&self, results: &mut Vec<Bounds>) {
        self.root.node_bounds(results);
    }

    /// Collect every stored item into a passed mutable vector
    pub fn items(&self, results: &mut Vec<T>) {
        self.root.items(results);
    }

    /// Number of items stored in the tree
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the tree stores no items
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the bounds covered by the quadtree
    pub fn bounds(&self) -> &Bounds {
        self.root.bounds()
    }
}

/// A nearest-neighbor candidate, ordered by distance so the heap keeps the
/// worst of the current k on top
struct Candidate<T> {
    dist: f64,
    item: T,
}

impl<T> PartialEq for Candidate<T> {
    fn eq(&self, other: &Self) -> bool {
        self.dist == other.dist
    }
}

impl<T> Eq for Candidate<T> {}

impl<T> PartialOrd for Candidate<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Candidate<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist.total_cmp(&other.dist)
    }
}

/// QuadTree node enum
///
/// ## Variants
/// - `Internal`: Contains children nodes and represents a subdivided area.
/// - `External`: Contains data and represents a leaf node.
/// - `Empty`: Represents an empty area without any data.
#[derive(Debug)]
enum Node<T> {
    Internal {
        bounds: Bounds,
        children: [Box<Self>; 4],
    },
    External {
        bounds: Bounds,
        data: Vec<T>,
    },
    Empty {
        bounds: Bounds,
    },
}

impl<T: Point + Clone> Node<T> {
    fn insert(&mut self, item: &T, capacity: usize) -> bool {
        let point = item.point();

        if !self.bounds().contains(&point) {
            return false;
        }

        match self {
            &mut Self::Empty { bounds } => {
                let mut data = Vec::with_capacity(capacity);
                data.push(item.clone());
                *self = Self::External { bounds, data };
                true
            }
            &mut Self::External {
                bounds,
                ref mut data,
            } => {
                // an unsplittable node keeps filling up past capacity
                if data.len() < capacity || !bounds.is_splittable() {
                    data.push(item.clone());
                    return true;
                }

                let data = std::mem::take(data);
                let children = self.subdivide();
                *self = Self::Internal { bounds, children };

                for existing_item in &data {
                    self.insert(existing_item, capacity);
                }

                self.insert(item, capacity)
            }
            Self::Internal { bounds, children } => {
                children[quadrant_index(bounds, &point)].insert(item, capacity)
            }
        }
    }

    fn get(&self, point: &P2) -> Option<T> {
        match self {
            Self::External { data, .. } => {
                for item in data {
                    if item.point() == *point {
                        return Some(item.clone());
                    }
                }
                None
            }
            Self::Internal { bounds, children } => {
                children[quadrant_index(bounds, point)].get(point)
            }
            Self::Empty { .. } => None,
        }
    }

    fn nearest(&self, query: &P2, k: usize, heap: &mut BinaryHeap<Candidate<T>>) {
        match self {
            Self::External { data, .. } => {
                for item in data {
                    let dist = na::distance(query, &item.point());
                    if heap.len() < k {
                        heap.push(Candidate {
                            dist,
                            item: item.clone(),
                        });
                    } else if dist < heap.peek().map_or(f64::INFINITY, |c| c.dist) {
                        heap.pop();
                        heap.push(Candidate {
                            dist,
                            item: item.clone(),
                        });
                    }
                }
            }
            Self::Internal { children, .. } => {
                for child in children.iter() {
                    let worst = heap.peek().map_or(f64::INFINITY, |c| c.dist);
                    // skip subtrees that cannot beat the current k candidates
                    if heap.len() < k || child.bounds().may_contain_closer(query, worst) {
                        child.nearest(query, k, heap);
                    }
                }
            }
            Self::Empty { .. } => (),
        }
    }

    fn node_bounds(&self, results: &mut Vec<Bounds>) {
        results.push(*self.bounds());
        if let Self::Internal { children, .. } = self {
            for child in children {
                child.node_bounds(results);
            }
        }
    }

    fn items(&self, results: &mut Vec<T>) {
        match self {
            Self::External { data, .. } => results.extend(data.iter().cloned()),
            Self::Internal { children, .. } => {
                for child in children {
                    child.items(results);
                }
            }
            Self::Empty { .. } => (),
        }
    }

    fn bounds(&self) -> &Bounds {
        match self {
            Self::Empty { bounds } => bounds,
            Self::External { bounds, .. } => bounds,
            Self::Internal { bounds, .. } => bounds,
        }
    }

    fn subdivide(&self) -> [Box<Self>; 4] {
        let quarters = self.bounds().quarter();
        quarters.map(|bounds| Box::new(Self::Empty { bounds }))
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::point;

    use crate::util::tests::make_bounds;

    use super::*;

    #[test]
    fn insert_single_item() {
        let mut qt = QuadTree::new(make_bounds(0.0, 0.0, 100.0, 100.0), 1);
        let item = point![25.0, 25.0];
        assert!(qt.insert(&item), "Should insert item successfully");
        assert_eq!(qt.len(), 1, "Length should track the insert");
    }

    #[test]
    fn insert_item_out_of_bounds() {
        let mut qt = QuadTree::new(make_bounds(0.0, 0.0, 100.0, 100.0), 1);
        let item = point![150.0, 150.0];
        assert!(!qt.insert(&item), "Should not insert item outside bounds");
        assert!(qt.is_empty(), "Length should not count the rejected item");
    }

    #[test]
    fn insert_multiple_items_subdivision() {
        let mut qt = QuadTree::new(make_bounds(0.0, 0.0, 100.0, 100.0), 2);
        let item1 = point![20.0, 20.0];
        let item2 = point![40.0, 40.0];
        let item3 = point![60.0, 60.0];

        qt.insert(&item1);
        qt.insert(&item2);
        qt.insert(&item3);

        match qt.root {
            Node::Internal { children, .. } => {
                assert_eq!(
                    children.len(),
                    4,
                    "Should have four children after subdivision"
                );
            }
            _ => panic!("QuadTree should have subdivided into an internal node"),
        }
    }

    #[test]
    fn get_exact_point() {
        let mut qt = QuadTree::new(make_bounds(0.0, 0.0, 100.0, 100.0), 1);
        let items = [point![10.0, 10.0], point![80.0, 30.0], point![30.0, 80.0]];
        for item in &items {
            qt.insert(item);
        }
        assert_eq!(
            qt.get(&point![80.0, 30.0]),
            Some(point![80.0, 30.0]),
            "Should find a stored point"
        );
        assert_eq!(
            qt.get(&point![80.0, 31.0]),
            None,
            "Should not find an absent point"
        );
    }

    #[test]
    fn from_items_empty_input() {
        let items: Vec<P2> = vec![];
        assert!(
            QuadTree::from_items(&items, 4).is_none(),
            "No items means no extent to build over"
        );
    }

    #[test]
    fn from_items_covers_the_extent() {
        let items = vec![
            point![8.0, 3.0],
            point![5.0, 9.0],
            point![5.0, 3.0],
            point![1.0, 7.0],
        ];
        let qt = QuadTree::from_items(&items, 2).unwrap();
        assert_eq!(
            qt.bounds().min(),
            point![1.0, 3.0],
            "Tree bounds should start at the extent min"
        );
        assert_eq!(
            qt.bounds().max(),
            point![8.0, 9.0],
            "Tree bounds should end at the extent max"
        );
        assert_eq!(qt.len(), 4, "Every item should land inside the bounds");
        for item in &items {
            assert!(
                qt.get(item).is_some(),
                "Items on the extent edges should be stored too"
            );
        }
    }

    #[test]
    fn duplicate_points_beyond_capacity() {
        let mut qt = QuadTree::new(make_bounds(0.0, 0.0, 100.0, 100.0), 1);
        let item = point![50.0, 50.0];
        for _ in 0..5 {
            assert!(qt.insert(&item), "Duplicates should keep inserting");
        }
        assert_eq!(qt.len(), 5, "All duplicates should be stored");
        assert_eq!(
            qt.nearest(&point![50.0, 50.0], 10).len(),
            5,
            "All duplicates should be found"
        );
    }

    #[test]
    fn nearest_zero_k() {
        let mut qt = QuadTree::new(make_bounds(0.0, 0.0, 100.0, 100.0), 1);
        qt.insert(&point![10.0, 10.0]);
        assert!(
            qt.nearest(&point![10.0, 10.0], 0).is_empty(),
            "k = 0 should return nothing"
        );
    }

    #[test]
    fn nearest_orders_closest_first() {
        let mut qt = QuadTree::new(make_bounds(0.0, 0.0, 100.0, 100.0), 1);
        let items = [
            point![10.0, 10.0],
            point![20.0, 20.0],
            point![90.0, 90.0],
            point![15.0, 10.0],
        ];
        for item in &items {
            qt.insert(item);
        }

        let found = qt.nearest(&point![11.0, 10.0], 3);
        assert_eq!(found.len(), 3, "Should return exactly k items");
        assert_eq!(found[0], point![10.0, 10.0], "Closest item should be first");
        assert_eq!(found[1], point![15.0, 10.0], "Then the next closest");
        assert_eq!(found[2], point![20.0, 20.0], "Then the next closest");
    }

    #[test]
    fn nearest_with_k_larger_than_tree() {
        let mut qt = QuadTree::new(make_bounds(0.0, 0.0, 100.0, 100.0), 2);
        qt.insert(&point![30.0, 30.0]);
        qt.insert(&point![60.0, 60.0]);
        let found = qt.nearest(&point![0.0, 0.0], 10);
        assert_eq!(found.len(), 2, "Should return every stored item");
        assert_eq!(
            found,
            vec![point![30.0, 30.0], point![60.0, 60.0]],
            "Items should still be ordered by distance"
        );
    }

    #[test]
    fn nearest_matches_naive_search() {
        let items: Vec<P2> = (0..10)
            .flat_map(|i| (0..10).map(move |j| point![i as f64 * 9.7, j as f64 * 8.3]))
            .collect();
        let qt = QuadTree::from_items(&items, 4).unwrap();

        let query = point![41.0, 37.0];
        let k = 7;
        let found = qt.nearest(&query, k);

        let mut naive = items.clone();
        naive.sort_by(|a, b| na::distance(&query, a).total_cmp(&na::distance(&query, b)));
        naive.truncate(k);

        assert_eq!(
            found.len(),
            k,
            "Pruned search should still find k candidates"
        );
        for (f, n) in found.iter().zip(&naive) {
            assert_eq!(
                na::distance(&query, f),
                na::distance(&query, n),
                "Pruned search should match the naive k nearest distances"
            );
        }
    }

    #[test]
    fn node_bounds_before_and_after_subdivision() {
        let mut qt = QuadTree::new(make_bounds(0.0, 0.0, 100.0, 100.0), 1);
        let mut bounds = Vec::new();
        qt.node_bounds(&mut bounds);
        assert_eq!(bounds.len(), 1, "An empty tree is a single node");

        qt.insert(&point![25.0, 25.0]);
        qt.insert(&point![75.0, 75.0]);
        let mut bounds = Vec::new();
        qt.node_bounds(&mut bounds);
        assert_eq!(
            bounds.len(),
            5,
            "A subdivided root contributes itself and four children"
        );
        assert_eq!(
            bounds[0],
            make_bounds(0.0, 0.0, 100.0, 100.0),
            "The root bounds should come first"
        );
    }

    #[test]
    fn items_returns_everything_inserted() {
        let inserted = [point![10.0, 10.0], point![90.0, 10.0], point![50.0, 90.0]];
        let qt = QuadTree::from_items(&inserted, 1).unwrap();
        let mut items = Vec::new();
        qt.items(&mut items);
        items.sort_by(|a, b| a.x.total_cmp(&b.x));
        assert_eq!(
            items,
            vec![point![10.0, 10.0], point![50.0, 90.0], point![90.0, 10.0]],
            "Every inserted item should be collected exactly once"
        );
    }
}
