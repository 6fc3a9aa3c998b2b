//! Turning finished output records into paths.

use tracing::debug;

use crate::paths::{bounds, Path64, Paths64};
use crate::poly_tree::PolyTree64;

use super::{OutPtIdx, OutRecIdx, SweepState};

impl SweepState<'_> {
    /// Reads a ring into a path, dropping consecutive duplicates.
    ///
    /// Closed rings with fewer than three points, or that are just a sliver
    /// of a triangle, give nothing.
    fn build_path(&self, op: Option<OutPtIdx>, reverse: bool, is_open: bool) -> Option<Path64> {
        let pts = &self.outpts;
        let mut op = op?;
        if pts[op].next == op || (!is_open && pts[op].next == pts[op].prev) {
            return None;
        }

        let mut op2 = if reverse {
            pts[op].prev
        } else {
            op = pts[op].next;
            pts[op].next
        };
        let mut last_pt = pts[op].pt;
        let mut path = vec![last_pt];
        while op2 != op {
            if pts[op2].pt != last_pt {
                last_pt = pts[op2].pt;
                path.push(last_pt);
            }
            op2 = if reverse { pts[op2].prev } else { pts[op2].next };
        }

        if path.len() == 3 && !is_open && self.is_very_small_triangle(op2) {
            return None;
        }
        Some(path)
    }

    /// Collects every live record, returning `(closed, open)` paths.
    pub(crate) fn build_paths(&mut self) -> (Paths64, Paths64) {
        let reverse = self.opts.reverse_solution;
        let mut closed = Vec::with_capacity(self.outrecs.len());
        let mut open = Vec::new();

        // Cleaning can split records, so the arena may grow as we go.
        let mut i = 0;
        while i < self.outrecs.len() {
            let or = OutRecIdx(i);
            i += 1;
            if self.outrecs[or].pts.is_none() {
                continue;
            }
            if self.outrecs[or].is_open {
                open.extend(self.build_path(self.outrecs[or].pts, reverse, true));
            } else {
                self.clean_collinear(or);
                closed.extend(self.build_path(self.outrecs[or].pts, reverse, false));
            }
        }
        debug!(closed = closed.len(), open = open.len(), "built paths");
        (closed, open)
    }

    /// Makes sure a closed record has its cleaned path and bounds cached.
    /// Returns false if nothing is left of it.
    fn check_bounds(&mut self, or: OutRecIdx) -> bool {
        if self.outrecs[or].pts.is_none() {
            return false;
        }
        if !self.outrecs[or].bounds.is_empty() {
            return true;
        }
        self.clean_collinear(or);
        let Some(path) = self.build_path(self.outrecs[or].pts, self.opts.reverse_solution, false)
        else {
            return false;
        };
        self.outrecs[or].bounds = bounds(&path);
        self.outrecs[or].path = path;
        true
    }

    /// Is `outrec` absent from `test_owner`'s chain of owners?
    fn is_valid_owner(&self, outrec: OutRecIdx, test_owner: OutRecIdx) -> bool {
        let mut t = Some(test_owner);
        while let Some(o) = t {
            if o == outrec {
                return false;
            }
            t = self.outrecs[o].owner;
        }
        true
    }

    fn inside(&self, inner: OutRecIdx, outer: OutRecIdx) -> bool {
        match (self.outrecs[inner].pts, self.outrecs[outer].pts) {
            (Some(p1), Some(p2)) => self.path1_inside_path2(p1, p2),
            _ => false,
        }
    }

    /// Looks for `outrec`'s owner among records split off from its current
    /// owner.
    fn check_split_owner(&mut self, outrec: OutRecIdx, splits: &[OutRecIdx]) -> bool {
        for &s in splits {
            let Some(split) = self.find_live(Some(s)) else {
                continue;
            };
            if split == outrec || self.outrecs[split].recursive_split == Some(outrec) {
                continue;
            }
            // Guards against revisiting through cyclic split lists.
            self.outrecs[split].recursive_split = Some(outrec);

            if !self.outrecs[split].splits.is_empty() {
                let nested = self.outrecs[split].splits.clone();
                if self.check_split_owner(outrec, &nested) {
                    return true;
                }
            }

            if self.is_valid_owner(outrec, split)
                && self.check_bounds(split)
                && self.outrecs[split]
                    .bounds
                    .contains_rect(&self.outrecs[outrec].bounds)
                && self.inside(outrec, split)
            {
                self.outrecs[outrec].owner = Some(split);
                return true;
            }
        }
        false
    }

    /// Places `outrec` in the tree, below the nearest owner that really
    /// contains it. Owners are placed first.
    fn recursive_check_owners(&mut self, outrec: OutRecIdx, tree: &mut PolyTree64) {
        if self.outrecs[outrec].polypath.is_some() || self.outrecs[outrec].bounds.is_empty() {
            return;
        }

        while let Some(owner) = self.outrecs[outrec].owner {
            if !self.outrecs[owner].splits.is_empty() {
                let splits = self.outrecs[owner].splits.clone();
                if self.check_split_owner(outrec, &splits) {
                    break;
                }
            }
            if self.outrecs[owner].pts.is_some()
                && self.check_bounds(owner)
                && self.inside(outrec, owner)
            {
                break;
            }
            self.outrecs[outrec].owner = self.outrecs[owner].owner;
        }

        let parent = match self.outrecs[outrec].owner {
            Some(owner) => {
                if self.outrecs[owner].polypath.is_none() {
                    self.recursive_check_owners(owner, tree);
                }
                self.outrecs[owner].polypath.unwrap_or(tree.root())
            }
            None => tree.root(),
        };
        let path = self.outrecs[outrec].path.clone();
        self.outrecs[outrec].polypath = Some(tree.add_child(parent, path));
    }

    /// Builds a poly-tree from the closed records, returning the open paths.
    pub(crate) fn build_tree(&mut self, tree: &mut PolyTree64) -> Paths64 {
        tree.clear();
        let reverse = self.opts.reverse_solution;
        let mut open = Vec::new();

        let mut i = 0;
        while i < self.outrecs.len() {
            let or = OutRecIdx(i);
            i += 1;
            let Some(pts) = self.outrecs[or].pts else {
                continue;
            };
            if self.outrecs[or].is_open {
                open.extend(self.build_path(Some(pts), reverse, true));
                continue;
            }
            if self.check_bounds(or) {
                self.recursive_check_owners(or, tree);
            }
        }
        debug!(polygons = tree.len(), open = open.len(), "built poly-tree");
        open
    }
}
