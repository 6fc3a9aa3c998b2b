//! Horizontal edges.
//!
//! A horizontal edge has no extent in `y`, so it can't be handled between
//! scanlines. Instead each one is processed on its own scanline, sweeping
//! left or right along the AEL and crossing every edge it meets. Runs of
//! horizontal output are remembered so that overlapping runs from different
//! rings can be joined once the sweep is done.

use crate::geom::Point64;
use crate::vertex::{VertexFlags, VertexIdx};

use super::{ActiveIdx, HorzJoin, HorzSegment, OutPtIdx, SweepState};

impl SweepState<'_> {
    /// The last vertex of the horizontal run starting at `ae`'s top, if that
    /// vertex is a local maximum.
    fn curr_y_maxima_vertex(&self, ae: ActiveIdx) -> Option<VertexIdx> {
        let e = &self.actives[ae];
        let mut v = e.vertex_top;
        loop {
            let next = if e.wind_dx > 0 {
                self.vertices[v].next
            } else {
                self.vertices[v].prev
            };
            if self.vertices[next].pt.y != self.vertices[v].pt.y {
                break;
            }
            v = next;
        }
        self.vertices[v]
            .flags
            .contains(VertexFlags::LOCAL_MAX)
            .then_some(v)
    }

    /// Like [`Self::curr_y_maxima_vertex`], but stops early at the end of an
    /// open path.
    fn curr_y_maxima_vertex_open(&self, ae: ActiveIdx) -> Option<VertexIdx> {
        let e = &self.actives[ae];
        let mut v = e.vertex_top;
        loop {
            let next = if e.wind_dx > 0 {
                self.vertices[v].next
            } else {
                self.vertices[v].prev
            };
            let flags = self.vertices[v].flags;
            if self.vertices[next].pt.y != self.vertices[v].pt.y
                || flags.contains(VertexFlags::OPEN_END)
                || flags.contains(VertexFlags::LOCAL_MAX)
            {
                break;
            }
            v = next;
        }
        self.vertices[v]
            .flags
            .contains(VertexFlags::LOCAL_MAX)
            .then_some(v)
    }

    /// Works out which way a horizontal edge heads, returning
    /// `(left_to_right, left_x, right_x)`.
    fn reset_horz_direction(
        &self,
        horz: ActiveIdx,
        vertex_max: Option<VertexIdx>,
    ) -> (bool, i64, i64) {
        let h = &self.actives[horz];
        if h.bot.x == h.top.x {
            // A zero-length horizontal: head towards its maxima pair.
            let mut ae = h.next_in_ael;
            while let Some(e) = ae {
                if Some(self.actives[e].vertex_top) == vertex_max {
                    break;
                }
                ae = self.actives[e].next_in_ael;
            }
            return (ae.is_some(), h.cur_x, h.cur_x);
        }
        if h.cur_x < h.top.x {
            (true, h.cur_x, h.top.x)
        } else {
            (false, h.top.x, h.cur_x)
        }
    }

    /// Extends a horizontal edge over any following horizontal edges of its
    /// bound.
    ///
    /// Spikes that double back are always removed. Collinear continuations
    /// are only merged when collinear points aren't being preserved.
    pub(super) fn trim_horz(&mut self, horz: ActiveIdx) {
        let preserve_collinear = self.opts.preserve_collinear;
        let mut was_trimmed = false;
        let mut pt = self.vertices[self.next_vertex(horz)].pt;
        while pt.y == self.actives[horz].top.y {
            let h = &self.actives[horz];
            if preserve_collinear && (pt.x < h.top.x) != (h.bot.x < h.top.x) {
                break;
            }
            let next = self.next_vertex(horz);
            self.actives[horz].vertex_top = next;
            self.actives[horz].top = pt;
            was_trimmed = true;
            if self.is_maxima(horz) {
                break;
            }
            pt = self.vertices[self.next_vertex(horz)].pt;
        }
        if was_trimmed {
            self.actives[horz].set_dx();
        }
    }

    fn add_to_horz_seg_list(&mut self, op: Option<OutPtIdx>) {
        let Some(op) = op else {
            return;
        };
        if self.outrecs[self.outpts[op].outrec].is_open {
            return;
        }
        self.horz_seg_list.push(HorzSegment {
            left_op: op,
            right_op: None,
            left_to_right: true,
        });
    }

    /// The most recent point added by a hot edge.
    fn last_op(&self, hot_edge: ActiveIdx) -> Option<OutPtIdx> {
        let or = self.actives[hot_edge].outrec?;
        let pts = self.outrecs[or].pts?;
        if self.outrecs[or].front_edge == Some(hot_edge) {
            Some(pts)
        } else {
            Some(self.outpts[pts].next)
        }
    }

    /// Processes a horizontal edge (and any horizontals that follow it in the
    /// same bound) on the current scanline.
    ///
    /// A horizontal only changes its neighbors at its two ends. In between,
    /// every edge it passes is crossed. Those edges sit on the horizontal's
    /// scanline, so their `cur_x` is already current.
    pub(super) fn do_horizontal(&mut self, horz: ActiveIdx) {
        let horz_is_open = self.actives[horz].is_open();
        let y = self.actives[horz].bot.y;

        let vertex_max = if horz_is_open {
            self.curr_y_maxima_vertex_open(horz)
        } else {
            self.curr_y_maxima_vertex(horz)
        };

        // Remove spikes, and merge consecutive horizontals unless collinear
        // points are being kept.
        if vertex_max.is_some() && !horz_is_open && vertex_max != Some(self.actives[horz].vertex_top)
        {
            self.trim_horz(horz);
        }

        let (mut is_left_to_right, mut left_x, mut right_x) =
            self.reset_horz_direction(horz, vertex_max);

        if self.is_hot(horz) {
            let pt = Point64::new(self.actives[horz].cur_x, y);
            let op = self.add_out_pt(horz, pt);
            self.add_to_horz_seg_list(op);
        }

        loop {
            let mut ae = if is_left_to_right {
                self.actives[horz].next_in_ael
            } else {
                self.actives[horz].prev_in_ael
            };

            while let Some(e) = ae {
                if Some(self.actives[e].vertex_top) == vertex_max {
                    // The maxima pair: finish both edges.
                    if self.is_hot(horz) && self.is_joined(e) {
                        let top = self.actives[e].top;
                        self.split(e, top);
                    }
                    if self.is_hot(horz) {
                        while Some(self.actives[horz].vertex_top) != vertex_max {
                            let top = self.actives[horz].top;
                            self.add_out_pt(horz, top);
                            self.update_edge_into_ael(horz);
                        }
                        let top = self.actives[horz].top;
                        if is_left_to_right {
                            self.add_local_max_poly(horz, e, top);
                        } else {
                            self.add_local_max_poly(e, horz, top);
                        }
                    }
                    self.delete_from_ael(e);
                    self.delete_from_ael(horz);
                    return;
                }

                // A horizontal maximum keeps going until it meets its pair.
                // Otherwise, check whether we've gone past the end.
                if vertex_max != Some(self.actives[horz].vertex_top) || self.is_open_end(horz) {
                    let ae_cur_x = self.actives[e].cur_x;
                    if (is_left_to_right && ae_cur_x > right_x)
                        || (!is_left_to_right && ae_cur_x < left_x)
                    {
                        break;
                    }

                    if ae_cur_x == self.actives[horz].top.x && !self.actives[e].is_horizontal() {
                        let pt = self.vertices[self.next_vertex(horz)].pt;
                        let ae_x = self.actives[e].top_x(pt.y);
                        let other = &self.actives[e];
                        if other.is_open()
                            && other.polytype() != self.actives[horz].polytype()
                            && !self.is_hot(e)
                        {
                            // Only stop for open edges once they're past the
                            // horizontal's end, so they can still be clipped.
                            if (is_left_to_right && ae_x > pt.x)
                                || (!is_left_to_right && ae_x < pt.x)
                            {
                                break;
                            }
                        } else if (is_left_to_right && ae_x >= pt.x)
                            || (!is_left_to_right && ae_x <= pt.x)
                        {
                            // Stop at edges that leave the horizontal's end on
                            // the far side of its next edge.
                            break;
                        }
                    }
                }

                let pt = Point64::new(self.actives[e].cur_x, y);
                if is_left_to_right {
                    self.intersect_edges(horz, e, pt);
                    self.swap_positions_in_ael(horz, e);
                    self.check_join_left(e, pt, false);
                    self.actives[horz].cur_x = self.actives[e].cur_x;
                    ae = self.actives[horz].next_in_ael;
                } else {
                    self.intersect_edges(e, horz, pt);
                    self.swap_positions_in_ael(e, horz);
                    self.check_join_right(e, pt, false);
                    self.actives[horz].cur_x = self.actives[e].cur_x;
                    ae = self.actives[horz].prev_in_ael;
                }

                if self.is_hot(horz) {
                    let op = self.last_op(horz);
                    self.add_to_horz_seg_list(op);
                }
            }

            // The end of this horizontal. Open paths may stop here.
            if horz_is_open && self.is_open_end(horz) {
                if self.is_hot(horz) {
                    let top = self.actives[horz].top;
                    self.add_out_pt(horz, top);
                    self.detach_open_end(horz);
                }
                self.delete_from_ael(horz);
                return;
            }

            // Is there another horizontal in this bound?
            if self.vertices[self.next_vertex(horz)].pt.y != self.actives[horz].top.y {
                break;
            }
            if self.is_hot(horz) {
                let top = self.actives[horz].top;
                self.add_out_pt(horz, top);
            }
            self.update_edge_into_ael(horz);
            (is_left_to_right, left_x, right_x) = self.reset_horz_direction(horz, vertex_max);
        }

        if self.is_hot(horz) {
            let top = self.actives[horz].top;
            let op = self.add_out_pt(horz, top);
            self.add_to_horz_seg_list(op);
        }
        // The end of an intermediate horizontal.
        self.update_edge_into_ael(horz);
    }

    /// Expands a segment's left point to cover the whole horizontal run
    /// containing it. Returns false if the run has no extent, or if another
    /// segment already starts at the same point.
    fn update_horz_segment(&mut self, seg: usize) -> bool {
        let op = self.horz_seg_list[seg].left_op;
        let outrec = self.find_live(Some(self.outpts[op].outrec));
        let outrec_has_edges = outrec.is_some_and(|or| self.outrecs[or].front_edge.is_some());
        let curr_y = self.outpts[op].pt.y;
        let mut op_p = op;
        let mut op_n = op;

        let pts = &self.outpts;
        if let Some(op_a) = outrec
            .filter(|_| outrec_has_edges)
            .and_then(|or| self.outrecs[or].pts)
        {
            // The ring is still open between op_a and op_z.
            let op_z = pts[op_a].next;
            while op_p != op_z && pts[pts[op_p].prev].pt.y == curr_y {
                op_p = pts[op_p].prev;
            }
            while op_n != op_a && pts[pts[op_n].next].pt.y == curr_y {
                op_n = pts[op_n].next;
            }
        } else {
            while pts[op_p].prev != op_n && pts[pts[op_p].prev].pt.y == curr_y {
                op_p = pts[op_p].prev;
            }
            while pts[op_n].next != op_p && pts[pts[op_n].next].pt.y == curr_y {
                op_n = pts[op_n].next;
            }
        }

        let (p_x, n_x) = (pts[op_p].pt.x, pts[op_n].pt.x);
        let hs = &mut self.horz_seg_list[seg];
        if p_x == n_x {
            hs.right_op = None;
            return false;
        }
        if p_x < n_x {
            hs.left_op = op_p;
            hs.right_op = Some(op_n);
            hs.left_to_right = true;
        } else {
            hs.left_op = op_n;
            hs.right_op = Some(op_p);
            hs.left_to_right = false;
        }

        let left_op = hs.left_op;
        if self.outpts[left_op].horz {
            self.horz_seg_list[seg].right_op = None;
            return false;
        }
        self.outpts[left_op].horz = true;
        true
    }

    /// Pairs up overlapping horizontal runs that head in opposite
    /// directions, recording a join for each pair.
    pub(super) fn convert_horz_segs_to_joins(&mut self) {
        let mut k = 0;
        for i in 0..self.horz_seg_list.len() {
            if self.update_horz_segment(i) {
                k += 1;
            }
        }
        if k < 2 {
            return;
        }

        // Valid segments first, ordered by their left end.
        let outpts = &self.outpts;
        self.horz_seg_list.sort_by(|a, b| match (a.right_op, b.right_op) {
            (None, None) => std::cmp::Ordering::Equal,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (Some(_), None) => std::cmp::Ordering::Less,
            (Some(_), Some(_)) => outpts[a.left_op].pt.x.cmp(&outpts[b.left_op].pt.x),
        });

        for i in 0..k - 1 {
            for j in i + 1..k {
                let hs1 = self.horz_seg_list[i];
                let hs2 = self.horz_seg_list[j];
                let (Some(r1), Some(r2)) = (hs1.right_op, hs2.right_op) else {
                    continue;
                };
                let pts = &self.outpts;
                if pts[hs2.left_op].pt.x >= pts[r1].pt.x
                    || hs2.left_to_right == hs1.left_to_right
                    || pts[r2].pt.x <= pts[hs1.left_op].pt.x
                {
                    continue;
                }

                let curr_y = pts[hs1.left_op].pt.y;
                let mut l1 = hs1.left_op;
                let mut l2 = hs2.left_op;
                let join = if hs1.left_to_right {
                    while pts[pts[l1].next].pt.y == curr_y && pts[pts[l1].next].pt.x <= pts[l2].pt.x
                    {
                        l1 = pts[l1].next;
                    }
                    while pts[pts[l2].prev].pt.y == curr_y && pts[pts[l2].prev].pt.x <= pts[l1].pt.x
                    {
                        l2 = pts[l2].prev;
                    }
                    self.horz_seg_list[i].left_op = l1;
                    self.horz_seg_list[j].left_op = l2;
                    HorzJoin {
                        op1: self.duplicate_op(l1, true),
                        op2: self.duplicate_op(l2, false),
                    }
                } else {
                    while pts[pts[l1].prev].pt.y == curr_y && pts[pts[l1].prev].pt.x <= pts[l2].pt.x
                    {
                        l1 = pts[l1].prev;
                    }
                    while pts[pts[l2].next].pt.y == curr_y && pts[pts[l2].next].pt.x <= pts[l1].pt.x
                    {
                        l2 = pts[l2].next;
                    }
                    self.horz_seg_list[i].left_op = l1;
                    self.horz_seg_list[j].left_op = l2;
                    HorzJoin {
                        op1: self.duplicate_op(l2, true),
                        op2: self.duplicate_op(l1, false),
                    }
                };
                self.horz_join_list.push(join);
            }
        }
    }

    /// Applies the joins found by [`Self::convert_horz_segs_to_joins`].
    ///
    /// Joining two points of the same ring splits it in two.
    pub(super) fn process_horz_joins(&mut self) {
        let joins = std::mem::take(&mut self.horz_join_list);
        for j in joins {
            let or1 = self.find_live(Some(self.outpts[j.op1].outrec));
            let or2 = self.find_live(Some(self.outpts[j.op2].outrec));
            let (Some(or1), Some(or2)) = (or1, or2) else {
                continue;
            };

            let op1b = self.outpts[j.op1].next;
            let op2b = self.outpts[j.op2].prev;
            self.outpts[j.op1].next = j.op2;
            self.outpts[j.op2].prev = j.op1;
            self.outpts[op1b].prev = op2b;
            self.outpts[op2b].next = op1b;

            if or1 == or2 {
                // Really a split.
                let or2 = self.new_outrec();
                self.outrecs[or2].pts = Some(op1b);
                self.fix_outrec_pts(or2);

                // or1's points may have moved to or2.
                if let Some(pts1) = self.outrecs[or1].pts {
                    if self.outpts[pts1].outrec == or2 {
                        self.outrecs[or1].pts = Some(j.op1);
                        self.outpts[j.op1].outrec = or1;
                    }
                }

                if self.opts.using_polytree {
                    let (Some(pts1), Some(pts2)) = (self.outrecs[or1].pts, self.outrecs[or2].pts)
                    else {
                        continue;
                    };
                    if self.path1_inside_path2(pts1, pts2) {
                        self.outrecs[or1].pts = Some(pts2);
                        self.outrecs[or2].pts = Some(pts1);
                        self.fix_outrec_pts(or1);
                        self.fix_outrec_pts(or2);
                        self.outrecs[or2].owner = Some(or1);
                    } else if self.path1_inside_path2(pts2, pts1) {
                        self.outrecs[or2].owner = Some(or1);
                    } else {
                        self.outrecs[or2].owner = self.outrecs[or1].owner;
                    }
                    self.outrecs[or1].splits.push(or2);
                } else {
                    self.outrecs[or2].owner = Some(or1);
                }
            } else {
                self.outrecs[or2].pts = None;
                if self.opts.using_polytree {
                    self.set_owner(or2, or1);
                    self.move_splits(or2, or1);
                } else {
                    self.outrecs[or2].owner = Some(or1);
                }
            }
        }
    }
}
