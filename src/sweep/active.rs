//! Active edges: geometry, the active edge list, and winding counts.

use crate::geom::{cross_product, cross_product_sign, Point64};
use crate::vertex::{VertexFlags, VertexIdx};
use crate::{FillRule, PathType};

use super::{Active, ActiveIdx, SweepState};

/// The slope of a segment as `dx/dy`.
///
/// Horizontal segments get an infinite slope: negative when heading right and
/// positive when heading left.
pub(crate) fn get_dx(pt1: Point64, pt2: Point64) -> f64 {
    let dy = (pt2.y - pt1.y) as f64;
    if dy != 0.0 {
        (pt2.x - pt1.x) as f64 / dy
    } else if pt2.x > pt1.x {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    }
}

impl Active {
    pub fn set_dx(&mut self) {
        self.dx = get_dx(self.bot, self.top);
    }

    pub fn is_horizontal(&self) -> bool {
        self.top.y == self.bot.y
    }

    pub fn is_heading_right_horz(&self) -> bool {
        self.dx == f64::NEG_INFINITY
    }

    pub fn is_heading_left_horz(&self) -> bool {
        self.dx == f64::INFINITY
    }

    pub fn polytype(&self) -> PathType {
        self.local_min.polytype
    }

    pub fn is_open(&self) -> bool {
        self.local_min.is_open
    }

    /// The `x` coordinate of this edge at height `y`.
    pub fn top_x(&self, y: i64) -> i64 {
        if y == self.top.y || self.top.x == self.bot.x {
            self.top.x
        } else if y == self.bot.y {
            self.bot.x
        } else {
            self.bot.x + (self.dx * (y - self.bot.y) as f64).round_ties_even() as i64
        }
    }
}

impl SweepState<'_> {
    pub(super) fn is_hot(&self, ae: ActiveIdx) -> bool {
        self.actives[ae].outrec.is_some()
    }

    /// Is `ae` the front edge of its output record?
    pub(super) fn is_front(&self, ae: ActiveIdx) -> bool {
        self.actives[ae]
            .outrec
            .is_some_and(|or| self.outrecs[or].front_edge == Some(ae))
    }

    pub(super) fn is_joined(&self, ae: ActiveIdx) -> bool {
        self.actives[ae].join_with != super::JoinWith::None
    }

    pub(super) fn is_maxima(&self, ae: ActiveIdx) -> bool {
        self.vertices[self.actives[ae].vertex_top]
            .flags
            .contains(VertexFlags::LOCAL_MAX)
    }

    pub(super) fn is_open_end_vertex(&self, v: VertexIdx) -> bool {
        let flags = self.vertices[v].flags;
        flags.contains(VertexFlags::OPEN_START) || flags.contains(VertexFlags::OPEN_END)
    }

    /// Is `ae` an open path edge that ends at its top vertex?
    pub(super) fn is_open_end(&self, ae: ActiveIdx) -> bool {
        let e = &self.actives[ae];
        e.is_open() && self.is_open_end_vertex(e.vertex_top)
    }

    /// The vertex after this edge's top, following the edge's direction.
    pub(super) fn next_vertex(&self, ae: ActiveIdx) -> VertexIdx {
        let e = &self.actives[ae];
        let v = &self.vertices[e.vertex_top];
        if e.wind_dx > 0 {
            v.next
        } else {
            v.prev
        }
    }

    /// The vertex two steps behind this edge's top.
    fn prev_prev_vertex(&self, ae: ActiveIdx) -> VertexIdx {
        let e = &self.actives[ae];
        let v = &self.vertices[e.vertex_top];
        if e.wind_dx > 0 {
            self.vertices[v.prev].prev
        } else {
            self.vertices[v.next].next
        }
    }

    /// The edge that shares `ae`'s top vertex, if it's to the right of `ae`.
    pub(super) fn get_maxima_pair(&self, ae: ActiveIdx) -> Option<ActiveIdx> {
        let vertex_top = self.actives[ae].vertex_top;
        let mut ae2 = self.actives[ae].next_in_ael;
        while let Some(e) = ae2 {
            if self.actives[e].vertex_top == vertex_top {
                return Some(e);
            }
            ae2 = self.actives[e].next_in_ael;
        }
        None
    }

    /// The nearest hot closed edge to the left of `ae`.
    pub(super) fn get_prev_hot_edge(&self, ae: ActiveIdx) -> Option<ActiveIdx> {
        let mut prev = self.actives[ae].prev_in_ael;
        while let Some(p) = prev {
            if !self.actives[p].is_open() && self.is_hot(p) {
                return Some(p);
            }
            prev = self.actives[p].prev_in_ael;
        }
        None
    }

    /// Searches outwards from `ae` for the other bound of its local minimum,
    /// giving up at the first non-horizontal edge with a different bottom.
    pub(super) fn find_edge_with_matching_loc_min(&self, ae: ActiveIdx) -> Option<ActiveIdx> {
        let e = &self.actives[ae];
        let mut result = e.next_in_ael;
        while let Some(r) = result {
            let other = &self.actives[r];
            if other.local_min == e.local_min {
                return Some(r);
            }
            if !other.is_horizontal() && e.bot != other.bot {
                break;
            }
            result = other.next_in_ael;
        }
        let mut result = e.prev_in_ael;
        while let Some(r) = result {
            let other = &self.actives[r];
            if other.local_min == e.local_min {
                return Some(r);
            }
            if !other.is_horizontal() && e.bot != other.bot {
                return None;
            }
            result = other.prev_in_ael;
        }
        None
    }

    /// Should `newcomer` be inserted to the right of `resident`?
    ///
    /// Both edges cross the current scanline. Ties at the same `x` are broken
    /// by slope, then by where the edges go next, then by how they arrived.
    pub(super) fn is_valid_ael_order(&self, resident: ActiveIdx, newcomer: ActiveIdx) -> bool {
        let res = &self.actives[resident];
        let new = &self.actives[newcomer];
        if new.cur_x != res.cur_x {
            return new.cur_x > res.cur_x;
        }

        // Which side of the resident's top is the newcomer heading?
        let d = cross_product_sign(res.top, new.bot, new.top);
        if d != 0 {
            return d < 0;
        }

        // The edges are collinear. Look past the end of the shorter one.
        if !self.is_maxima(resident) && res.top.y > new.top.y {
            let next = self.vertices[self.next_vertex(resident)].pt;
            return cross_product(new.bot, res.top, next) <= 0.0;
        }
        if !self.is_maxima(newcomer) && new.top.y > res.top.y {
            let next = self.vertices[self.next_vertex(newcomer)].pt;
            return cross_product(new.bot, new.top, next) >= 0.0;
        }

        let y = new.bot.y;
        let newcomer_is_left = new.is_left_bound;
        if res.bot.y != y || self.vertices[res.local_min.vertex].pt.y != y {
            return newcomer_is_left;
        }
        // Both edges start at a local minimum on this scanline.
        if res.is_left_bound != newcomer_is_left {
            return newcomer_is_left;
        }
        let res_prev_prev = self.vertices[self.prev_prev_vertex(resident)].pt;
        if cross_product_sign(res_prev_prev, res.bot, res.top) == 0 {
            return true;
        }
        let new_prev_prev = self.vertices[self.prev_prev_vertex(newcomer)].pt;
        (cross_product(res_prev_prev, new.bot, new_prev_prev) > 0.0) == newcomer_is_left
    }

    pub(super) fn insert_left_edge(&mut self, ae: ActiveIdx) {
        let Some(head) = self.ael_head else {
            self.actives[ae].prev_in_ael = None;
            self.actives[ae].next_in_ael = None;
            self.ael_head = Some(ae);
            return;
        };
        if !self.is_valid_ael_order(head, ae) {
            self.actives[ae].prev_in_ael = None;
            self.actives[ae].next_in_ael = Some(head);
            self.actives[head].prev_in_ael = Some(ae);
            self.ael_head = Some(ae);
            return;
        }

        let mut ae2 = head;
        while let Some(next) = self.actives[ae2].next_in_ael {
            if !self.is_valid_ael_order(next, ae) {
                break;
            }
            ae2 = next;
        }
        // Don't separate joined edges.
        if self.actives[ae2].join_with == super::JoinWith::Right {
            if let Some(next) = self.actives[ae2].next_in_ael {
                ae2 = next;
            }
        }
        let next = self.actives[ae2].next_in_ael;
        self.actives[ae].next_in_ael = next;
        if let Some(n) = next {
            self.actives[n].prev_in_ael = Some(ae);
        }
        self.actives[ae].prev_in_ael = Some(ae2);
        self.actives[ae2].next_in_ael = Some(ae);
    }

    /// Inserts `ae2` immediately to the right of `ae`.
    pub(super) fn insert_right_edge(&mut self, ae: ActiveIdx, ae2: ActiveIdx) {
        let next = self.actives[ae].next_in_ael;
        self.actives[ae2].next_in_ael = next;
        if let Some(n) = next {
            self.actives[n].prev_in_ael = Some(ae2);
        }
        self.actives[ae2].prev_in_ael = Some(ae);
        self.actives[ae].next_in_ael = Some(ae2);
    }

    pub(super) fn delete_from_ael(&mut self, ae: ActiveIdx) {
        let prev = self.actives[ae].prev_in_ael;
        let next = self.actives[ae].next_in_ael;
        if prev.is_none() && next.is_none() && self.ael_head != Some(ae) {
            // Already deleted.
            return;
        }
        match prev {
            Some(p) => self.actives[p].next_in_ael = next,
            None => self.ael_head = next,
        }
        if let Some(n) = next {
            self.actives[n].prev_in_ael = prev;
        }
        self.actives[ae].prev_in_ael = None;
        self.actives[ae].next_in_ael = None;
    }

    /// Swaps two edges, where `ae1` is immediately to the left of `ae2`.
    pub(super) fn swap_positions_in_ael(&mut self, ae1: ActiveIdx, ae2: ActiveIdx) {
        let next = self.actives[ae2].next_in_ael;
        if let Some(n) = next {
            self.actives[n].prev_in_ael = Some(ae1);
        }
        let prev = self.actives[ae1].prev_in_ael;
        if let Some(p) = prev {
            self.actives[p].next_in_ael = Some(ae2);
        }
        self.actives[ae2].prev_in_ael = prev;
        self.actives[ae2].next_in_ael = Some(ae1);
        self.actives[ae1].prev_in_ael = Some(ae2);
        self.actives[ae1].next_in_ael = next;
        if prev.is_none() {
            self.ael_head = Some(ae2);
        }
    }

    pub(super) fn set_wind_count_for_closed_path_edge(&mut self, ae: ActiveIdx) {
        let pt = self.actives[ae].polytype();
        let wind_dx = self.actives[ae].wind_dx;

        // The nearest closed edge of the same path type, to the left.
        let mut ae2 = self.actives[ae].prev_in_ael;
        while let Some(e) = ae2 {
            if self.actives[e].polytype() == pt && !self.actives[e].is_open() {
                break;
            }
            ae2 = self.actives[e].prev_in_ael;
        }

        let mut wind_count2 = 0;
        let wind_count;
        let mut cursor = match ae2 {
            None => {
                wind_count = wind_dx;
                self.ael_head
            }
            Some(e2) if self.fill_rule == FillRule::EvenOdd => {
                wind_count = wind_dx;
                wind_count2 = self.actives[e2].wind_count2;
                self.actives[e2].next_in_ael
            }
            Some(e2) => {
                let e2 = &self.actives[e2];
                // When e2's winding count has the same sign as its direction,
                // the region to its right is filled and `ae` is inside it.
                wind_count = if e2.wind_count * e2.wind_dx < 0 {
                    if e2.wind_count.abs() > 1 {
                        // Outside e2's polygon, but inside another.
                        if e2.wind_dx * wind_dx < 0 {
                            e2.wind_count
                        } else {
                            e2.wind_count + wind_dx
                        }
                    } else {
                        wind_dx
                    }
                } else if e2.wind_dx * wind_dx < 0 {
                    e2.wind_count
                } else {
                    e2.wind_count + wind_dx
                };
                wind_count2 = e2.wind_count2;
                e2.next_in_ael
            }
        };

        // Accumulate the other path type's winding count up to `ae`.
        let even_odd = self.fill_rule == FillRule::EvenOdd;
        while let Some(e) = cursor {
            if e == ae {
                break;
            }
            let other = &self.actives[e];
            if other.polytype() != pt && !other.is_open() {
                if even_odd {
                    wind_count2 = if wind_count2 == 0 { 1 } else { 0 };
                } else {
                    wind_count2 += other.wind_dx;
                }
            }
            cursor = other.next_in_ael;
        }

        self.actives[ae].wind_count = wind_count;
        self.actives[ae].wind_count2 = wind_count2;
    }

    /// Open edges don't wind; they just count the closed edges to their left.
    pub(super) fn set_wind_count_for_open_path_edge(&mut self, ae: ActiveIdx) {
        let mut cnt1 = 0;
        let mut cnt2 = 0;
        let mut cursor = self.ael_head;
        let even_odd = self.fill_rule == FillRule::EvenOdd;
        while let Some(e) = cursor {
            if e == ae {
                break;
            }
            let other = &self.actives[e];
            let step = if even_odd { 1 } else { other.wind_dx };
            if other.polytype() == PathType::Clip {
                cnt2 += step;
            } else if !other.is_open() {
                cnt1 += step;
            }
            cursor = other.next_in_ael;
        }
        if even_odd {
            cnt1 &= 1;
            cnt2 &= 1;
        }
        self.actives[ae].wind_count = cnt1;
        self.actives[ae].wind_count2 = cnt2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex::{LocalMinima, VertexIdx};

    fn edge(bot: (i64, i64), top: (i64, i64)) -> Active {
        let mut ae = Active {
            bot: bot.into(),
            top: top.into(),
            cur_x: bot.0,
            dx: 0.0,
            wind_dx: 1,
            wind_count: 0,
            wind_count2: 0,
            outrec: None,
            prev_in_ael: None,
            next_in_ael: None,
            prev_in_sel: None,
            next_in_sel: None,
            jump: None,
            vertex_top: VertexIdx(0),
            local_min: LocalMinima {
                vertex: VertexIdx(0),
                polytype: PathType::Subject,
                is_open: false,
            },
            is_left_bound: true,
            join_with: super::super::JoinWith::None,
        };
        ae.set_dx();
        ae
    }

    #[test]
    fn dx() {
        assert_eq!(get_dx(Point64::new(0, 0), Point64::new(10, 10)), 1.0);
        assert_eq!(get_dx(Point64::new(0, 10), Point64::new(5, 0)), -0.5);
        assert_eq!(get_dx(Point64::new(0, 0), Point64::new(10, 0)), f64::NEG_INFINITY);
        assert_eq!(get_dx(Point64::new(10, 0), Point64::new(0, 0)), f64::INFINITY);
    }

    #[test]
    fn horizontal_heading() {
        let right = edge((0, 5), (10, 5));
        assert!(right.is_horizontal());
        assert!(right.is_heading_right_horz());
        assert!(!right.is_heading_left_horz());

        let left = edge((10, 5), (0, 5));
        assert!(left.is_heading_left_horz());
    }

    #[test]
    fn top_x() {
        let ae = edge((0, 100), (100, 0));
        assert_eq!(ae.top_x(100), 0);
        assert_eq!(ae.top_x(0), 100);
        assert_eq!(ae.top_x(50), 50);

        // Rounds half to even.
        let ae = edge((0, 4), (1, 0));
        assert_eq!(ae.top_x(2), 0);
        let ae = edge((0, 4), (3, 0));
        assert_eq!(ae.top_x(2), 2);

        let vertical = edge((7, 10), (7, -10));
        assert_eq!(vertical.top_x(3), 7);
    }
}
