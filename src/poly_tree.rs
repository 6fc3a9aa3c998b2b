//! Nested output.
//!
//! A [`PolyTree`] records which output contours lie inside which. The root
//! has no polygon; its children are outer contours, their children are holes,
//! the holes' children are islands, and so on.

use std::fmt;

use crate::geom::{Point64, PointD};
use crate::paths::{area, area_d};

/// A node in a [`PolyTree`].
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct PolyPathIdx(usize);

#[derive(Clone)]
struct PolyPathVec<T> {
    inner: Vec<T>,
}

impl_typed_vec!(PolyPathVec, PolyPathIdx, "pp");

#[derive(Clone, Debug)]
struct PolyPathNode<P> {
    polygon: Vec<P>,
    parent: Option<PolyPathIdx>,
    children: Vec<PolyPathIdx>,
}

/// A tree of contours, nested by containment.
#[derive(Clone, Debug)]
pub struct PolyTree<P> {
    nodes: PolyPathVec<PolyPathNode<P>>,
}

/// A poly-tree with integer coordinates.
pub type PolyTree64 = PolyTree<Point64>;
/// A poly-tree with floating-point coordinates.
pub type PolyTreeD = PolyTree<PointD>;

impl<P> Default for PolyTree<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> PolyTree<P> {
    /// An empty tree, containing just the root.
    pub fn new() -> Self {
        let mut nodes = PolyPathVec::default();
        nodes.push(PolyPathNode {
            polygon: Vec::new(),
            parent: None,
            children: Vec::new(),
        });
        PolyTree { nodes }
    }

    /// The root node. It has no polygon.
    pub fn root(&self) -> PolyPathIdx {
        PolyPathIdx(0)
    }

    /// Removes everything but the root.
    pub fn clear(&mut self) {
        let root = self.root();
        self.nodes.inner.truncate(1);
        self.nodes[root].children.clear();
    }

    /// The number of contours in the tree, not counting the root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Does the tree have no contours?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The contour at a node.
    pub fn polygon(&self, idx: PolyPathIdx) -> &[P] {
        &self.nodes[idx].polygon
    }

    /// The contours directly inside a node.
    pub fn children(&self, idx: PolyPathIdx) -> &[PolyPathIdx] {
        &self.nodes[idx].children
    }

    /// The `i`th child of a node.
    pub fn child(&self, idx: PolyPathIdx, i: usize) -> Option<PolyPathIdx> {
        self.nodes[idx].children.get(i).copied()
    }

    /// The node this one is nested in, or `None` for the root.
    pub fn parent(&self, idx: PolyPathIdx) -> Option<PolyPathIdx> {
        self.nodes[idx].parent
    }

    /// How deeply a node is nested. The root is at level 0, outer contours
    /// at level 1.
    pub fn level(&self, idx: PolyPathIdx) -> usize {
        let mut level = 0;
        let mut p = self.nodes[idx].parent;
        while let Some(parent) = p {
            level += 1;
            p = self.nodes[parent].parent;
        }
        level
    }

    /// Is this node a hole, i.e. at an even level other than the root's?
    pub fn is_hole(&self, idx: PolyPathIdx) -> bool {
        let level = self.level(idx);
        level != 0 && level % 2 == 0
    }

    pub(crate) fn add_child(&mut self, parent: PolyPathIdx, polygon: Vec<P>) -> PolyPathIdx {
        let child = self.nodes.push(PolyPathNode {
            polygon,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(child);
        child
    }

    /// Converts every contour, keeping the shape of the tree.
    pub fn map<Q>(&self, mut f: impl FnMut(&[P]) -> Vec<Q>) -> PolyTree<Q> {
        let inner = self
            .nodes
            .inner
            .iter()
            .map(|node| PolyPathNode {
                polygon: f(&node.polygon),
                parent: node.parent,
                children: node.children.clone(),
            })
            .collect();
        PolyTree {
            nodes: PolyPathVec::from_vec(inner),
        }
    }

    /// Flattens the tree, listing each contour before the contours inside it.
    pub fn to_paths(&self) -> Vec<Vec<P>>
    where
        P: Clone,
    {
        let mut out = Vec::with_capacity(self.len());
        let mut stack: Vec<PolyPathIdx> =
            self.children(self.root()).iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            out.push(self.nodes[idx].polygon.clone());
            stack.extend(self.nodes[idx].children.iter().rev().copied());
        }
        out
    }

    fn write_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        idx: PolyPathIdx,
        pos: usize,
        level: usize,
    ) -> fmt::Result {
        let count = self.nodes[idx].children.len();
        let plural = if count == 1 { "" } else { "s" };
        let padding = level * 2;
        if level % 2 == 0 {
            writeln!(
                f,
                "{:padding$}+- hole ({pos}) contains {count} nested polygon{plural}.",
                ""
            )?;
        } else {
            writeln!(f, "{:padding$}+- polygon ({pos}) contains {count} hole{plural}.", "")?;
        }
        for (i, &child) in self.nodes[idx].children.iter().enumerate() {
            if !self.nodes[child].children.is_empty() {
                self.write_node(f, child, i, level + 1)?;
            }
        }
        Ok(())
    }
}

impl<P> fmt::Display for PolyTree<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let top = self.children(self.root());
        let plural = if top.len() == 1 { "" } else { "s" };
        writeln!(f, "Polytree with {} polygon{plural}.", top.len())?;
        for (i, &child) in top.iter().enumerate() {
            if !self.nodes[child].children.is_empty() {
                self.write_node(f, child, i, 1)?;
            }
        }
        Ok(())
    }
}

impl PolyTree64 {
    /// The total signed area of a node and everything nested in it.
    ///
    /// Holes have the opposite orientation to their parents, so they
    /// subtract.
    pub fn area(&self, idx: PolyPathIdx) -> f64 {
        area(&self.nodes[idx].polygon)
            + self.nodes[idx]
                .children
                .iter()
                .map(|&c| self.area(c))
                .sum::<f64>()
    }

    /// Does every contour contain all of its children's vertices?
    pub fn fully_contains_children(&self) -> bool {
        self.nodes.indices().skip(1).all(|idx| {
            let parent = &self.nodes[idx].polygon;
            self.nodes[idx].children.iter().all(|&child| {
                self.nodes[child].polygon.iter().all(|&pt| {
                    crate::geom::point_in_polygon(pt, parent)
                        != crate::geom::PointInPolygonResult::IsOutside
                })
            })
        })
    }
}

impl PolyTreeD {
    /// The total signed area of a node and everything nested in it.
    pub fn area(&self, idx: PolyPathIdx) -> f64 {
        area_d(&self.nodes[idx].polygon)
            + self.nodes[idx]
                .children
                .iter()
                .map(|&c| self.area(c))
                .sum::<f64>()
    }
}

/// Flattens a poly-tree into a list of paths.
pub fn polytree_to_paths<P: Clone>(tree: &PolyTree<P>) -> Vec<Vec<P>> {
    tree.to_paths()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::make_path64;

    fn nested() -> PolyTree64 {
        let mut tree = PolyTree64::new();
        let root = tree.root();
        let outer = tree.add_child(root, make_path64(&[0, 0, 100, 0, 100, 100, 0, 100]));
        let hole = tree.add_child(outer, make_path64(&[10, 10, 10, 90, 90, 90, 90, 10]));
        tree.add_child(hole, make_path64(&[20, 20, 80, 20, 80, 80, 20, 80]));
        tree.add_child(root, make_path64(&[200, 0, 300, 0, 300, 100, 200, 100]));
        tree
    }

    #[test]
    fn levels_and_holes() {
        let tree = nested();
        let root = tree.root();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.level(root), 0);
        assert!(!tree.is_hole(root));

        let outer = tree.child(root, 0).unwrap();
        let hole = tree.child(outer, 0).unwrap();
        let island = tree.child(hole, 0).unwrap();
        assert_eq!(tree.level(outer), 1);
        assert!(!tree.is_hole(outer));
        assert!(tree.is_hole(hole));
        assert!(!tree.is_hole(island));
        assert_eq!(tree.parent(island), Some(hole));
        assert!(tree.fully_contains_children());
    }

    #[test]
    fn area_subtracts_holes() {
        let tree = nested();
        let outer = tree.child(tree.root(), 0).unwrap();
        assert_eq!(tree.area(outer), 10000.0 - 6400.0 + 3600.0);
    }

    #[test]
    fn flatten_and_clear() {
        let mut tree = nested();
        let paths = polytree_to_paths(&tree);
        assert_eq!(paths.len(), 4);
        assert_eq!(paths[1][0], Point64::new(10, 10));
        assert_eq!(paths[3][0], Point64::new(200, 0));

        tree.clear();
        assert!(tree.is_empty());
        assert!(tree.children(tree.root()).is_empty());
    }

    #[test]
    fn display() {
        let tree = nested();
        assert_eq!(
            tree.to_string(),
            "Polytree with 2 polygons.\n  +- polygon (0) contains 1 hole.\n    +- hole (0) contains 1 nested polygon.\n"
        );
    }
}
