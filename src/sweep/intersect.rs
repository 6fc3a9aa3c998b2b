//! Edge intersections.
//!
//! At the top of each scanbeam, every edge's `x` is recomputed at the new
//! scanline. Any pair of edges whose order changed must have crossed inside
//! the scanbeam. Those pairs are found by merge-sorting a copy of the AEL
//! (the SEL) on the new `x` values: every inversion the sort removes is an
//! intersection.

use tracing::trace;

use crate::geom::{closest_point_on_segment, segment_intersect_point, Point64};
use crate::{ClipType, FillRule, PathType};

use super::contribution::{is_crossing_min, is_unit_wind_count, oriented_count};
use super::{ActiveIdx, IntersectNode, JoinWith, OutPtIdx, SweepState};

impl SweepState<'_> {
    pub(super) fn do_intersections(&mut self, top_y: i64) {
        if self.build_intersect_list(top_y) {
            trace!(top_y, count = self.intersect_list.len(), "intersections");
            self.process_intersect_list();
        }
        self.intersect_list.clear();
    }

    /// Copies the AEL into the SEL, moving every edge's `cur_x` up to `top_y`.
    fn adjust_curr_x_and_copy_to_sel(&mut self, top_y: i64) {
        let mut ae = self.ael_head;
        self.sel = ae;
        while let Some(e) = ae {
            let prev = self.actives[e].prev_in_ael;
            let next = self.actives[e].next_in_ael;
            let cur_x = match (self.actives[e].join_with, prev) {
                // Joined edges move together.
                (JoinWith::Left, Some(p)) => self.actives[p].cur_x,
                _ => self.actives[e].top_x(top_y),
            };
            let a = &mut self.actives[e];
            a.prev_in_sel = prev;
            a.next_in_sel = next;
            a.jump = next;
            a.cur_x = cur_x;
            ae = next;
        }
    }

    fn extract_from_sel(&mut self, ae: ActiveIdx) -> Option<ActiveIdx> {
        let res = self.actives[ae].next_in_sel;
        let prev = self.actives[ae].prev_in_sel;
        if let Some(r) = res {
            self.actives[r].prev_in_sel = prev;
        }
        if let Some(p) = prev {
            self.actives[p].next_in_sel = res;
        }
        res
    }

    /// Moves `ae1` into the SEL just before `ae2`.
    fn insert_before_in_sel(&mut self, ae1: ActiveIdx, ae2: ActiveIdx) {
        let prev = self.actives[ae2].prev_in_sel;
        self.actives[ae1].prev_in_sel = prev;
        if let Some(p) = prev {
            self.actives[p].next_in_sel = Some(ae1);
        }
        self.actives[ae1].next_in_sel = Some(ae2);
        self.actives[ae2].prev_in_sel = Some(ae1);
    }

    /// Merge-sorts the SEL by `cur_x`, recording an intersection for every
    /// pair of edges the sort swaps. Returns true if there were any.
    ///
    /// Each edge's `jump` points at the start of the next run to merge.
    fn build_intersect_list(&mut self, top_y: i64) -> bool {
        let Some(head) = self.ael_head else {
            return false;
        };
        if self.actives[head].next_in_ael.is_none() {
            return false;
        }
        self.adjust_curr_x_and_copy_to_sel(top_y);

        let mut left = self.sel;
        while left.is_some_and(|l| self.actives[l].jump.is_some()) {
            let mut prev_base: Option<ActiveIdx> = None;
            while let Some(l0) = left {
                let Some(r0) = self.actives[l0].jump else {
                    break;
                };
                let mut curr_base = l0;
                let mut right = Some(r0);
                let mut l_end = Some(r0);
                let r_end = self.actives[r0].jump;
                self.actives[l0].jump = r_end;

                while left != l_end && right != r_end {
                    let (Some(l), Some(r)) = (left, right) else {
                        break;
                    };
                    if self.actives[r].cur_x < self.actives[l].cur_x {
                        // `r` crosses every edge from `l` up to its SEL
                        // predecessor.
                        let mut tmp = self.actives[r].prev_in_sel;
                        while let Some(t) = tmp {
                            self.add_new_intersect_node(t, r, top_y);
                            if t == l {
                                break;
                            }
                            tmp = self.actives[t].prev_in_sel;
                        }

                        right = self.extract_from_sel(r);
                        l_end = right;
                        self.insert_before_in_sel(r, l);
                        if l == curr_base {
                            curr_base = r;
                            self.actives[r].jump = r_end;
                            match prev_base {
                                None => self.sel = Some(r),
                                Some(pb) => self.actives[pb].jump = Some(r),
                            }
                        }
                    } else {
                        left = self.actives[l].next_in_sel;
                    }
                }
                prev_base = Some(curr_base);
                left = r_end;
            }
            left = self.sel;
        }
        !self.intersect_list.is_empty()
    }

    /// Records the crossing of two edges in the current scanbeam.
    ///
    /// Rounding can put the computed crossing outside the scanbeam. It's
    /// then pulled back onto the steeper edge, or onto the nearer scanline.
    fn add_new_intersect_node(&mut self, ae1: ActiveIdx, ae2: ActiveIdx, top_y: i64) {
        let e1 = &self.actives[ae1];
        let e2 = &self.actives[ae2];
        let mut ip = segment_intersect_point(e1.bot, e1.top, e2.bot, e2.top)
            .unwrap_or(Point64::new(e1.cur_x, top_y));

        if ip.y > self.current_bot_y || ip.y < top_y {
            let abs_dx1 = e1.dx.abs();
            let abs_dx2 = e2.dx.abs();
            if abs_dx1 > 100.0 && abs_dx2 > 100.0 {
                ip = if abs_dx1 > abs_dx2 {
                    closest_point_on_segment(ip, e1.bot, e1.top)
                } else {
                    closest_point_on_segment(ip, e2.bot, e2.top)
                };
            } else if abs_dx1 > 100.0 {
                ip = closest_point_on_segment(ip, e1.bot, e1.top);
            } else if abs_dx2 > 100.0 {
                ip = closest_point_on_segment(ip, e2.bot, e2.top);
            } else {
                ip.y = if ip.y < top_y { top_y } else { self.current_bot_y };
                ip.x = if abs_dx1 < abs_dx2 {
                    e1.top_x(ip.y)
                } else {
                    e2.top_x(ip.y)
                };
            }
        }
        self.intersect_list.push(IntersectNode {
            pt: ip,
            edge1: ae1,
            edge2: ae2,
        });
    }

    fn edges_adjacent_in_ael(&self, node: &IntersectNode) -> bool {
        let e1 = &self.actives[node.edge1];
        e1.next_in_ael == Some(node.edge2) || e1.prev_in_ael == Some(node.edge2)
    }

    /// Processes intersections bottom-up, swapping each pair of edges in the
    /// AEL.
    ///
    /// Edges must be adjacent when they're swapped. The sort order usually
    /// guarantees that, and when it doesn't, a later intersection with
    /// adjacent edges is brought forward.
    fn process_intersect_list(&mut self) {
        self.intersect_list.sort_by(|a, b| {
            b.pt.y.cmp(&a.pt.y).then(a.pt.x.cmp(&b.pt.x))
        });

        for i in 0..self.intersect_list.len() {
            if !self.edges_adjacent_in_ael(&self.intersect_list[i]) {
                let len = self.intersect_list.len();
                if let Some(j) =
                    (i + 1..len).find(|&j| self.edges_adjacent_in_ael(&self.intersect_list[j]))
                {
                    self.intersect_list.swap(i, j);
                }
            }

            let node = self.intersect_list[i];
            self.intersect_edges(node.edge1, node.edge2, node.pt);
            self.swap_positions_in_ael(node.edge1, node.edge2);
            self.actives[node.edge1].cur_x = node.pt.x;
            self.actives[node.edge2].cur_x = node.pt.x;
            self.check_join_left(node.edge2, node.pt, true);
            self.check_join_right(node.edge1, node.pt, true);
        }
    }

    /// Updates winding counts and output where two edges cross at `pt`.
    ///
    /// `ae1` is to the left of `ae2` before the crossing.
    pub(super) fn intersect_edges(
        &mut self,
        ae1: ActiveIdx,
        ae2: ActiveIdx,
        pt: Point64,
    ) -> Option<OutPtIdx> {
        if self.opts.has_open_paths
            && (self.actives[ae1].is_open() || self.actives[ae2].is_open())
        {
            return self.intersect_open_edge(ae1, ae2, pt);
        }

        // Closed paths from here on.
        if self.is_joined(ae1) {
            self.split(ae1, pt);
        }
        if self.is_joined(ae2) {
            self.split(ae2, pt);
        }

        let fill_rule = self.fill_rule;
        let even_odd = fill_rule == FillRule::EvenOdd;
        if self.actives[ae1].polytype() == self.actives[ae2].polytype() {
            if even_odd {
                let wc1 = self.actives[ae1].wind_count;
                self.actives[ae1].wind_count = self.actives[ae2].wind_count;
                self.actives[ae2].wind_count = wc1;
            } else {
                let dx1 = self.actives[ae1].wind_dx;
                let dx2 = self.actives[ae2].wind_dx;
                let e1 = &mut self.actives[ae1];
                if e1.wind_count + dx2 == 0 {
                    e1.wind_count = -e1.wind_count;
                } else {
                    e1.wind_count += dx2;
                }
                let e2 = &mut self.actives[ae2];
                if e2.wind_count - dx1 == 0 {
                    e2.wind_count = -e2.wind_count;
                } else {
                    e2.wind_count -= dx1;
                }
            }
        } else {
            let dx1 = self.actives[ae1].wind_dx;
            let dx2 = self.actives[ae2].wind_dx;
            let e1 = &mut self.actives[ae1];
            e1.wind_count2 = if even_odd {
                (e1.wind_count2 == 0) as i32
            } else {
                e1.wind_count2 + dx2
            };
            let e2 = &mut self.actives[ae2];
            e2.wind_count2 = if even_odd {
                (e2.wind_count2 == 0) as i32
            } else {
                e2.wind_count2 - dx1
            };
        }

        let wc1 = oriented_count(fill_rule, self.actives[ae1].wind_count);
        let wc2 = oriented_count(fill_rule, self.actives[ae2].wind_count);
        let wc1_is_0_or_1 = wc1 == 0 || wc1 == 1;
        let wc2_is_0_or_1 = wc2 == 0 || wc2 == 1;

        let hot1 = self.is_hot(ae1);
        let hot2 = self.is_hot(ae2);
        if (!hot1 && !wc1_is_0_or_1) || (!hot2 && !wc2_is_0_or_1) {
            return None;
        }

        let same_polytype = self.actives[ae1].polytype() == self.actives[ae2].polytype();
        if hot1 && hot2 {
            if !wc1_is_0_or_1
                || !wc2_is_0_or_1
                || (!same_polytype && self.clip_type != ClipType::Xor)
            {
                self.add_local_max_poly(ae1, ae2, pt)
            } else if self.is_front(ae1) || self.actives[ae1].outrec == self.actives[ae2].outrec {
                // Splitting here keeps polygons that only touch at a vertex
                // apart.
                let result = self.add_local_max_poly(ae1, ae2, pt);
                self.add_local_min_poly(ae1, ae2, pt, false);
                result
            } else {
                // Can't treat this as a maximum then a minimum.
                let result = self.add_out_pt(ae1, pt);
                self.add_out_pt(ae2, pt);
                self.swap_outrecs(ae1, ae2);
                result
            }
        } else if hot1 {
            let result = self.add_out_pt(ae1, pt);
            self.swap_outrecs(ae1, ae2);
            result
        } else if hot2 {
            let result = self.add_out_pt(ae2, pt);
            self.swap_outrecs(ae1, ae2);
            result
        } else {
            // Neither edge is hot.
            let e1_wc2 = oriented_count(fill_rule, self.actives[ae1].wind_count2);
            let e2_wc2 = oriented_count(fill_rule, self.actives[ae2].wind_count2);
            if !same_polytype {
                return Some(self.add_local_min_poly(ae1, ae2, pt, false));
            }
            if wc1 != 1 || wc2 != 1 {
                return None;
            }
            let start = is_crossing_min(self.clip_type, self.actives[ae1].polytype(), e1_wc2, e2_wc2);
            start.then(|| self.add_local_min_poly(ae1, ae2, pt, false))
        }
    }

    /// Crossings involving an open path. Only the open edge's output changes.
    fn intersect_open_edge(
        &mut self,
        ae1: ActiveIdx,
        ae2: ActiveIdx,
        pt: Point64,
    ) -> Option<OutPtIdx> {
        if self.actives[ae1].is_open() && self.actives[ae2].is_open() {
            return None;
        }
        // Make ae1 the open edge.
        let (ae1, ae2) = if self.actives[ae2].is_open() {
            (ae2, ae1)
        } else {
            (ae1, ae2)
        };
        if self.is_joined(ae2) {
            self.split(ae2, pt);
        }

        if self.clip_type == ClipType::Union {
            if !self.is_hot(ae2) {
                return None;
            }
        } else if self.actives[ae2].polytype() == PathType::Subject {
            return None;
        }
        if !is_unit_wind_count(self.fill_rule, self.actives[ae2].wind_count) {
            return None;
        }

        // Toggle the open edge's contribution.
        if self.is_hot(ae1) {
            let result = self.add_out_pt(ae1, pt);
            self.detach_open_end(ae1);
            return result;
        }

        let local_min_vertex = self.actives[ae1].local_min.vertex;
        if pt == self.vertices[local_min_vertex].pt && !self.is_open_end_vertex(local_min_vertex) {
            // A horizontal can pass under an open path at its local minimum.
            // If the other bound of that minimum is hot, share its output.
            if let Some(ae3) = self.find_edge_with_matching_loc_min(ae1) {
                if let Some(or3) = self.actives[ae3].outrec {
                    self.actives[ae1].outrec = Some(or3);
                    if self.actives[ae1].wind_dx > 0 {
                        self.outrecs[or3].front_edge = Some(ae1);
                        self.outrecs[or3].back_edge = Some(ae3);
                    } else {
                        self.outrecs[or3].front_edge = Some(ae3);
                        self.outrecs[or3].back_edge = Some(ae1);
                    }
                    return None;
                }
            }
        }
        Some(self.start_open_path(ae1, pt))
    }
}
