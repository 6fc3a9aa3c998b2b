//! Clipping against an axis-aligned rectangle.
//!
//! This is much faster than a general Boolean intersection. Each path is
//! walked once, tracking which side of the rectangle it is on and adding
//! rectangle corners whenever it travels around the outside. Where a clipped
//! polygon touches the same rectangle edge more than once, its output ring
//! may need to be split into several rings (or different rings rejoined);
//! that happens in a final pass over the points lying on each edge.
//!
//! Unlike the sweep, there's no fill rule: each path is clipped on its own,
//! and self-intersections in the input survive in the output.

use arrayvec::ArrayVec;
use tracing::trace;

use crate::geom::{
    cross_product, is_collinear, point_in_polygon, round_half_away, segment_intersect_point,
    Point64, PointInPolygonResult, Rect64, RectD,
};
use crate::paths::{bounds, check_precision, scale_paths64, scale_paths_d, Path64, Paths64, PathD, PathsD};
use crate::Error;

/// Where a point is relative to the rectangle.
///
/// The four sides are numbered clockwise (on screen), matching the order of
/// the corners in [`Rect64::as_path`]: side `i` runs from corner `i` to
/// corner `i + 1`, except that the left side runs from corner 3 to corner 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Location {
    Left,
    Top,
    Right,
    Bottom,
    Inside,
}

impl Location {
    fn side(i: usize) -> Location {
        match i % 4 {
            0 => Location::Left,
            1 => Location::Top,
            2 => Location::Right,
            _ => Location::Bottom,
        }
    }

    fn adjacent(self, clockwise: bool) -> Location {
        Location::side(self as usize + if clockwise { 1 } else { 3 })
    }

    fn heading_clockwise_to(self, other: Location) -> bool {
        (self as usize + 1) % 4 == other as usize
    }

    fn is_opposite(self, other: Location) -> bool {
        (self as i32 - other as i32).abs() == 2
    }
}

/// Locates `pt`. The flag is false if `pt` lies on the rectangle's boundary,
/// in which case the location is the side it lies on.
fn locate(rect: &Rect64, pt: Point64) -> (Location, bool) {
    let in_y = pt.y >= rect.top && pt.y <= rect.bottom;
    let in_x = pt.x >= rect.left && pt.x <= rect.right;
    if pt.x == rect.left && in_y {
        (Location::Left, false)
    } else if pt.x == rect.right && in_y {
        (Location::Right, false)
    } else if pt.y == rect.top && in_x {
        (Location::Top, false)
    } else if pt.y == rect.bottom && in_x {
        (Location::Bottom, false)
    } else if pt.x < rect.left {
        (Location::Left, true)
    } else if pt.x > rect.right {
        (Location::Right, true)
    } else if pt.y < rect.top {
        (Location::Top, true)
    } else if pt.y > rect.bottom {
        (Location::Bottom, true)
    } else {
        (Location::Inside, true)
    }
}

fn is_clockwise(prev: Location, curr: Location, prev_pt: Point64, curr_pt: Point64, mid: Point64) -> bool {
    if prev.is_opposite(curr) {
        cross_product(prev_pt, mid, curr_pt) < 0.0
    } else {
        prev.heading_clockwise_to(curr)
    }
}

/// Is `pt` strictly between `a` and `b` along the axis of the segment
/// `a`-`b` (which is axis-aligned, or nearly)?
fn between(pt: Point64, a: Point64, b: Point64) -> bool {
    if a.y == b.y {
        (pt.x > a.x) == (pt.x < b.x)
    } else {
        (pt.y > a.y) == (pt.y < b.y)
    }
}

/// Where segment `p1`-`p2` meets segment `p3`-`p4`, counting touching end
/// points. Collinear segments don't meet.
fn segment_crossing(p1: Point64, p2: Point64, p3: Point64, p4: Point64) -> Option<Point64> {
    let res1 = cross_product(p1, p3, p4);
    let res2 = cross_product(p2, p3, p4);
    if res1 == 0.0 {
        if res2 == 0.0 {
            return None;
        }
        return (p1 == p3 || p1 == p4 || between(p1, p3, p4)).then_some(p1);
    }
    if res2 == 0.0 {
        return (p2 == p3 || p2 == p4 || between(p2, p3, p4)).then_some(p2);
    }
    if (res1 > 0.0) == (res2 > 0.0) {
        return None;
    }

    let res3 = cross_product(p3, p1, p2);
    let res4 = cross_product(p4, p1, p2);
    if res3 == 0.0 {
        return (p3 == p1 || p3 == p2 || between(p3, p1, p2)).then_some(p3);
    }
    if res4 == 0.0 {
        return (p4 == p1 || p4 == p2 || between(p4, p1, p2)).then_some(p4);
    }
    if (res3 > 0.0) == (res4 > 0.0) {
        return None;
    }
    segment_intersect_point(p1, p2, p3, p4)
}

/// Where segment `p`-`p2` crosses the rectangle, preferring the side `loc`.
/// On success `loc` is updated to the side that was crossed.
fn rect_crossing(rect_path: &[Point64; 4], p: Point64, p2: Point64, loc: &mut Location) -> Option<Point64> {
    use Location::*;

    let [tl, tr, br, bl] = *rect_path;
    let hit = |a: Point64, b: Point64, side: Location| segment_crossing(p, p2, a, b).map(|ip| (ip, side));
    let hit_if = |cond: bool, a: Point64, b: Point64, side: Location| if cond { hit(a, b, side) } else { None };

    let (ip, side) = match *loc {
        Left => hit(tl, bl, Left)
            .or_else(|| hit_if(p.y < tl.y, tl, tr, Top))
            .or_else(|| hit(br, bl, Bottom)),
        Right => hit(tr, br, Right)
            .or_else(|| hit_if(p.y < tl.y, tl, tr, Top))
            .or_else(|| hit(br, bl, Bottom)),
        Top => hit(tl, tr, Top)
            .or_else(|| hit_if(p.x < tl.x, tl, bl, Left))
            .or_else(|| hit_if(p.x > tr.x, tr, br, Right)),
        Bottom => hit(br, bl, Bottom)
            .or_else(|| hit_if(p.x < bl.x, tl, bl, Left))
            .or_else(|| hit_if(p.x > br.x, tr, br, Right)),
        Inside => hit(tl, bl, Left)
            .or_else(|| hit(tl, tr, Top))
            .or_else(|| hit(tr, br, Right))
            .or_else(|| hit(br, bl, Bottom)),
    }?;
    *loc = side;
    Some(ip)
}

/// The sides of the rectangle that `pt` lies on, in increasing order. A
/// corner is on two sides.
fn sides_of_pt(pt: Point64, rect: &Rect64) -> ArrayVec<usize, 2> {
    let mut ret = ArrayVec::new();
    if pt.x == rect.left {
        ret.push(Location::Left as usize);
    }
    if pt.y == rect.top {
        ret.push(Location::Top as usize);
    }
    if pt.x == rect.right && pt.x != rect.left {
        ret.push(Location::Right as usize);
    }
    if pt.y == rect.bottom && pt.y != rect.top {
        ret.push(Location::Bottom as usize);
    }
    ret
}

/// Does travelling from `pt1` to `pt2` go clockwise along side `side`?
fn heading_clockwise_along(pt1: Point64, pt2: Point64, side: usize) -> bool {
    match side {
        0 => pt2.y < pt1.y,
        1 => pt2.x > pt1.x,
        2 => pt2.y > pt1.y,
        _ => pt2.x < pt1.x,
    }
}

fn has_horz_overlap(left1: Point64, right1: Point64, left2: Point64, right2: Point64) -> bool {
    left1.x < right2.x && right1.x > left2.x
}

fn has_vert_overlap(top1: Point64, bottom1: Point64, top2: Point64, bottom2: Point64) -> bool {
    top1.y < bottom2.y && bottom1.y > top2.y
}

fn start_locs_are_clockwise(start_locs: &[Location]) -> bool {
    let mut result = 0;
    for w in start_locs.windows(2) {
        match w[1] as i32 - w[0] as i32 {
            -1 | 3 => result -= 1,
            1 | -3 => result += 1,
            _ => {}
        }
    }
    result > 0
}

/// Are (nearly) all of `inner`'s vertices inside `outer`?
fn path1_contains_path2(outer: &[Point64], inner: &[Point64]) -> bool {
    // Rounding can put a vertex or two on the wrong side, so this is a vote.
    let mut io_count = 0i32;
    for &pt in inner {
        match point_in_polygon(pt, outer) {
            PointInPolygonResult::IsInside => io_count -= 1,
            PointInPolygonResult::IsOutside => io_count += 1,
            PointInPolygonResult::IsOn => {}
        }
        if io_count.abs() > 1 {
            break;
        }
    }
    io_count <= 0
}

fn scale_rect(rect: &RectD, scale: f64) -> Rect64 {
    Rect64::new(
        round_half_away(rect.left * scale),
        round_half_away(rect.top * scale),
        round_half_away(rect.right * scale),
        round_half_away(rect.bottom * scale),
    )
}

#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
struct OutPt2Idx(usize);

#[derive(Clone)]
struct OutPt2Vec<T> {
    inner: Vec<T>,
}

impl_typed_vec!(OutPt2Vec, OutPt2Idx, "rp");

/// A point in an output ring.
#[derive(Clone, Debug)]
struct OutPt2 {
    pt: Point64,
    next: OutPt2Idx,
    prev: OutPt2Idx,
    /// Index into `results`.
    owner: usize,
    /// Which of the eight edge lists this point is registered in.
    edge: Option<usize>,
}

/// Clips closed paths to a rectangle.
#[derive(Clone, Debug)]
pub struct RectClip64 {
    rect: Rect64,
    mid: Point64,
    rect_path: [Point64; 4],
    path_bounds: Rect64,
    pts: OutPt2Vec<OutPt2>,
    /// One entry per output ring, pointing at its most recent point.
    results: Vec<Option<OutPt2Idx>>,
    /// For each side, the points on that side whose incoming segment runs
    /// clockwise (even entries) or anticlockwise (odd entries).
    edges: [Vec<Option<OutPt2Idx>>; 8],
}

impl RectClip64 {
    /// A clipper for the rectangle `rect`.
    pub fn new(rect: Rect64) -> Self {
        RectClip64 {
            rect,
            mid: rect.mid_point(),
            rect_path: [
                Point64::new(rect.left, rect.top),
                Point64::new(rect.right, rect.top),
                Point64::new(rect.right, rect.bottom),
                Point64::new(rect.left, rect.bottom),
            ],
            path_bounds: Rect64::default(),
            pts: OutPt2Vec::default(),
            results: Vec::new(),
            edges: Default::default(),
        }
    }

    /// The clipping rectangle.
    pub fn rect(&self) -> Rect64 {
        self.rect
    }

    fn reset(&mut self) {
        self.pts.clear();
        self.results.clear();
        for e in &mut self.edges {
            e.clear();
        }
    }

    /// Appends `pt` to the current ring, or starts a new one.
    fn add(&mut self, pt: Point64, start_new_path: bool) -> OutPt2Idx {
        let curr = self.results.len();
        match self.results.last().copied().flatten() {
            Some(prev_op) if curr > 0 && !start_new_path => {
                if self.pts[prev_op].pt == pt {
                    return prev_op;
                }
                let next = self.pts[prev_op].next;
                let op = self.pts.push(OutPt2 {
                    pt,
                    next,
                    prev: prev_op,
                    owner: curr - 1,
                    edge: None,
                });
                self.pts[next].prev = op;
                self.pts[prev_op].next = op;
                self.results[curr - 1] = Some(op);
                op
            }
            _ => {
                let op = self.pts.next_idx();
                self.pts.push(OutPt2 {
                    pt,
                    next: op,
                    prev: op,
                    owner: curr,
                    edge: None,
                });
                self.results.push(Some(op));
                op
            }
        }
    }

    /// Adds the corner between two adjacent sides.
    fn add_corner(&mut self, prev: Location, curr: Location) {
        let corner = if prev.heading_clockwise_to(curr) {
            prev as usize
        } else {
            curr as usize
        };
        self.add(self.rect_path[corner], false);
    }

    /// Adds the next corner going around from `loc`, and moves `loc` on.
    fn add_corner_step(&mut self, loc: &mut Location, clockwise: bool) {
        if clockwise {
            self.add(self.rect_path[*loc as usize], false);
            *loc = loc.adjacent(true);
        } else {
            *loc = loc.adjacent(false);
            self.add(self.rect_path[*loc as usize], false);
        }
    }

    /// Advances `i` to the first point that leaves `loc`, updating `loc`.
    /// Points inside the rectangle are added as they're passed.
    fn next_location(&mut self, path: &[Point64], loc: &mut Location, i: &mut usize) {
        let r = self.rect;
        let high = path.len() - 1;
        match *loc {
            Location::Left => {
                while *i <= high && path[*i].x <= r.left {
                    *i += 1;
                }
                if *i > high {
                    return;
                }
                let p = path[*i];
                *loc = if p.x >= r.right {
                    Location::Right
                } else if p.y <= r.top {
                    Location::Top
                } else if p.y >= r.bottom {
                    Location::Bottom
                } else {
                    Location::Inside
                };
            }
            Location::Top => {
                while *i <= high && path[*i].y <= r.top {
                    *i += 1;
                }
                if *i > high {
                    return;
                }
                let p = path[*i];
                *loc = if p.y >= r.bottom {
                    Location::Bottom
                } else if p.x <= r.left {
                    Location::Left
                } else if p.x >= r.right {
                    Location::Right
                } else {
                    Location::Inside
                };
            }
            Location::Right => {
                while *i <= high && path[*i].x >= r.right {
                    *i += 1;
                }
                if *i > high {
                    return;
                }
                let p = path[*i];
                *loc = if p.x <= r.left {
                    Location::Left
                } else if p.y <= r.top {
                    Location::Top
                } else if p.y >= r.bottom {
                    Location::Bottom
                } else {
                    Location::Inside
                };
            }
            Location::Bottom => {
                while *i <= high && path[*i].y >= r.bottom {
                    *i += 1;
                }
                if *i > high {
                    return;
                }
                let p = path[*i];
                *loc = if p.y <= r.top {
                    Location::Top
                } else if p.x <= r.left {
                    Location::Left
                } else if p.x >= r.right {
                    Location::Right
                } else {
                    Location::Inside
                };
            }
            Location::Inside => {
                while *i <= high {
                    let p = path[*i];
                    *loc = if p.x < r.left {
                        Location::Left
                    } else if p.x > r.right {
                        Location::Right
                    } else if p.y > r.bottom {
                        Location::Bottom
                    } else if p.y < r.top {
                        Location::Top
                    } else {
                        self.add(p, false);
                        *i += 1;
                        continue;
                    };
                    break;
                }
            }
        }
    }

    /// Walks a closed path, building output rings.
    fn execute_internal(&mut self, path: &[Point64]) {
        if path.len() < 3 || self.rect.is_empty() {
            return;
        }
        let mut start_locs: Vec<Location> = Vec::new();
        let mut first_cross = Location::Inside;
        let mut crossing_loc = Location::Inside;
        let high = path.len() - 1;

        let (mut loc, off_boundary) = locate(&self.rect, path[high]);
        if !off_boundary {
            let Some(prev) = path[..high]
                .iter()
                .rev()
                .map(|&pt| locate(&self.rect, pt))
                .find_map(|(l, off)| off.then_some(l))
            else {
                // Every vertex is on the boundary.
                for &pt in path {
                    self.add(pt, false);
                }
                return;
            };
            if prev == Location::Inside {
                loc = Location::Inside;
            }
        }
        let starting_loc = loc;

        let mut i = 0;
        while i <= high {
            let mut prev = loc;
            let prev_cross_loc = crossing_loc;
            self.next_location(path, &mut loc, &mut i);
            if i > high {
                break;
            }
            let prev_pt = if i == 0 { path[high] } else { path[i - 1] };
            crossing_loc = loc;

            let Some(ip) = rect_crossing(&self.rect_path, path[i], prev_pt, &mut crossing_loc) else {
                // Still outside.
                if prev_cross_loc == Location::Inside {
                    let cw = is_clockwise(prev, loc, prev_pt, path[i], self.mid);
                    loop {
                        start_locs.push(prev);
                        prev = prev.adjacent(cw);
                        if prev == loc {
                            break;
                        }
                    }
                    crossing_loc = prev_cross_loc;
                } else if prev != Location::Inside && prev != loc {
                    let cw = is_clockwise(prev, loc, prev_pt, path[i], self.mid);
                    loop {
                        self.add_corner_step(&mut prev, cw);
                        if prev == loc {
                            break;
                        }
                    }
                }
                i += 1;
                continue;
            };

            if loc == Location::Inside {
                // Entering.
                if first_cross == Location::Inside {
                    first_cross = crossing_loc;
                    start_locs.push(prev);
                } else if prev != crossing_loc {
                    let cw = is_clockwise(prev, crossing_loc, prev_pt, path[i], self.mid);
                    loop {
                        self.add_corner_step(&mut prev, cw);
                        if prev == crossing_loc {
                            break;
                        }
                    }
                }
            } else if prev != Location::Inside {
                // Passing right through: `ip` is where the segment leaves,
                // so find where it came in.
                loc = prev;
                let ip2 = rect_crossing(&self.rect_path, prev_pt, path[i], &mut loc).unwrap_or(ip);
                if prev_cross_loc != Location::Inside && prev_cross_loc != loc {
                    self.add_corner(prev_cross_loc, loc);
                }
                if first_cross == Location::Inside {
                    first_cross = loc;
                    start_locs.push(prev);
                }
                loc = crossing_loc;
                self.add(ip2, false);
                if ip == ip2 {
                    // path[i] is on the rectangle.
                    loc = locate(&self.rect, path[i]).0;
                    self.add_corner(crossing_loc, loc);
                    crossing_loc = loc;
                    continue;
                }
            } else {
                // Leaving.
                loc = crossing_loc;
                if first_cross == Location::Inside {
                    first_cross = crossing_loc;
                }
            }
            self.add(ip, false);
        }

        if first_cross == Location::Inside {
            // The path never crosses the rectangle, but it might surround it.
            if starting_loc != Location::Inside
                && self.path_bounds.contains_rect(&self.rect)
                && path1_contains_path2(path, &self.rect_path)
            {
                let cw = start_locs_are_clockwise(&start_locs);
                for j in 0..4 {
                    let k = if cw { j } else { 3 - j };
                    let op = self.add(self.rect_path[k], false);
                    self.add_to_edge(k * 2, op);
                }
            }
        } else if loc != Location::Inside && (loc != first_cross || start_locs.len() > 2) {
            if !start_locs.is_empty() {
                let mut prev = loc;
                for &loc2 in &start_locs {
                    if prev == loc2 {
                        continue;
                    }
                    let cw = prev.heading_clockwise_to(loc2);
                    self.add_corner_step(&mut prev, cw);
                    prev = loc2;
                }
                loc = prev;
            }
            if loc != first_cross {
                let cw = loc.heading_clockwise_to(first_cross);
                self.add_corner_step(&mut loc, cw);
            }
        }
    }

    fn unlink(&mut self, op: OutPt2Idx) -> Option<OutPt2Idx> {
        let OutPt2 { next, prev, .. } = self.pts[op];
        if next == op {
            return None;
        }
        self.pts[prev].next = next;
        self.pts[next].prev = prev;
        Some(next)
    }

    fn unlink_back(&mut self, op: OutPt2Idx) -> Option<OutPt2Idx> {
        let prev = self.pts[op].prev;
        self.unlink(op).map(|_| prev)
    }

    fn add_to_edge(&mut self, edge: usize, op: OutPt2Idx) {
        if self.pts[op].edge.is_some() {
            return;
        }
        self.pts[op].edge = Some(edge);
        self.edges[edge].push(Some(op));
    }

    fn uncouple_edge(&mut self, op: OutPt2Idx) {
        let Some(edge) = self.pts[op].edge.take() else {
            return;
        };
        if let Some(slot) = self.edges[edge].iter_mut().find(|s| **s == Some(op)) {
            *slot = None;
        }
    }

    fn set_new_owner(&mut self, op: OutPt2Idx, owner: usize) {
        let mut cur = op;
        loop {
            self.pts[cur].owner = owner;
            cur = self.pts[cur].next;
            if cur == op {
                break;
            }
        }
    }

    /// Drops collinear points, then registers every point that lies on the
    /// rectangle in the edge lists.
    fn check_edges(&mut self) {
        for i in 0..self.results.len() {
            let Some(mut op) = self.results[i] else {
                continue;
            };
            let mut op2 = Some(op);
            while let Some(cur) = op2 {
                let OutPt2 { prev, next, pt, .. } = self.pts[cur];
                if is_collinear(self.pts[prev].pt, pt, self.pts[next].pt) {
                    op2 = self.unlink_back(cur);
                    if cur == op {
                        match op2 {
                            Some(o) => op = self.pts[o].prev,
                            None => break,
                        }
                    }
                } else {
                    op2 = Some(next);
                }
                if op2 == Some(op) {
                    break;
                }
            }
            if op2.is_none() {
                self.results[i] = None;
                continue;
            }
            self.results[i] = op2;

            let mut sides1 = sides_of_pt(self.pts[self.pts[op].prev].pt, &self.rect);
            let mut cur = op;
            loop {
                let sides2 = sides_of_pt(self.pts[cur].pt, &self.rect);
                if !sides2.is_empty() && self.pts[cur].edge.is_none() {
                    let prev_pt = self.pts[self.pts[cur].prev].pt;
                    let pt = self.pts[cur].pt;
                    for &side in sides2.iter().filter(|s| sides1.contains(s)) {
                        let list = if heading_clockwise_along(prev_pt, pt, side) {
                            side * 2
                        } else {
                            side * 2 + 1
                        };
                        self.add_to_edge(list, cur);
                    }
                }
                sides1 = sides2;
                cur = self.pts[cur].next;
                if cur == op {
                    break;
                }
            }
        }
    }

    fn is_degenerate(&self, op: OutPt2Idx) -> bool {
        self.pts[op].next == self.pts[op].prev
    }

    /// Splits rings that double back along side `idx`, and rejoins distinct
    /// rings that meet there.
    fn tidy_edge_pair(&mut self, idx: usize) {
        let (cw, ccw) = (idx * 2, idx * 2 + 1);
        if self.edges[ccw].is_empty() {
            return;
        }
        let is_horz = idx == 1 || idx == 3;
        let cw_is_toward_larger = idx == 1 || idx == 2;
        let (mut i, mut j) = (0, 0);

        while i < self.edges[cw].len() {
            let Some(c) = self.edges[cw][i].filter(|&p| !self.is_degenerate(p)) else {
                self.edges[cw][i] = None;
                i += 1;
                j = 0;
                continue;
            };
            let j_lim = self.edges[ccw].len();
            while j < j_lim && self.edges[ccw][j].map_or(true, |p| self.is_degenerate(p)) {
                j += 1;
            }
            let Some(q) = self.edges[ccw].get(j).copied().flatten() else {
                i += 1;
                j = 0;
                continue;
            };

            let (p1, p1a, p2, p2a) = if cw_is_toward_larger {
                (self.pts[c].prev, c, q, self.pts[q].prev)
            } else {
                (c, self.pts[c].prev, self.pts[q].prev, q)
            };
            let (a, b) = (self.pts[p1].pt, self.pts[p1a].pt);
            let (c2, d) = (self.pts[p2].pt, self.pts[p2a].pt);
            let overlap = if is_horz {
                has_horz_overlap(a, b, c2, d)
            } else {
                has_vert_overlap(a, b, c2, d)
            };
            if !overlap {
                j += 1;
                continue;
            }

            let is_rejoining = self.pts[c].owner != self.pts[q].owner;
            if is_rejoining {
                let old = self.pts[p2].owner;
                self.results[old] = None;
                self.set_new_owner(p2, self.pts[p1].owner);
            }

            if cw_is_toward_larger {
                self.pts[p1].next = p2;
                self.pts[p2].prev = p1;
                self.pts[p1a].prev = p2a;
                self.pts[p2a].next = p1a;
            } else {
                self.pts[p1].prev = p2;
                self.pts[p2].next = p1;
                self.pts[p1a].next = p2a;
                self.pts[p2a].prev = p1a;
            }

            if !is_rejoining {
                let new_idx = self.results.len();
                self.results.push(Some(p1a));
                self.set_new_owner(p1a, new_idx);
            }

            let (op, op2) = if cw_is_toward_larger { (p2, p1a) } else { (p1, p2a) };
            let (op_owner, op2_owner) = (self.pts[op].owner, self.pts[op2].owner);
            self.results[op_owner] = Some(op);
            self.results[op2_owner] = Some(op2);

            let is_larger = |s: &Self, o: OutPt2Idx| {
                let (pt, prev) = (s.pts[o].pt, s.pts[s.pts[o].prev].pt);
                if is_horz {
                    pt.x > prev.x
                } else {
                    pt.y > prev.y
                }
            };
            let op_is_larger = is_larger(self, op);
            let op2_is_larger = is_larger(self, op2);
            let collapsed = |s: &Self, o: OutPt2Idx| {
                s.is_degenerate(o) || s.pts[o].pt == s.pts[s.pts[o].prev].pt
            };

            if collapsed(self, op) {
                if op2_is_larger == cw_is_toward_larger {
                    self.edges[cw][i] = Some(op2);
                    self.edges[ccw][j] = None;
                    j += 1;
                } else {
                    self.edges[ccw][j] = Some(op2);
                    self.edges[cw][i] = None;
                    i += 1;
                }
            } else if collapsed(self, op2) {
                if op_is_larger == cw_is_toward_larger {
                    self.edges[cw][i] = Some(op);
                    self.edges[ccw][j] = None;
                    j += 1;
                } else {
                    self.edges[ccw][j] = Some(op);
                    self.edges[cw][i] = None;
                    i += 1;
                }
            } else if op_is_larger == op2_is_larger {
                if op_is_larger == cw_is_toward_larger {
                    self.edges[cw][i] = Some(op);
                    self.uncouple_edge(op2);
                    self.add_to_edge(cw, op2);
                    self.edges[ccw][j] = None;
                    j += 1;
                } else {
                    self.edges[cw][i] = None;
                    i += 1;
                    self.edges[ccw][j] = Some(op2);
                    self.uncouple_edge(op);
                    self.add_to_edge(ccw, op);
                    j = 0;
                }
            } else {
                if op_is_larger == cw_is_toward_larger {
                    self.edges[cw][i] = Some(op);
                } else {
                    self.edges[ccw][j] = Some(op);
                }
                if op2_is_larger == cw_is_toward_larger {
                    self.edges[cw][i] = Some(op2);
                } else {
                    self.edges[ccw][j] = Some(op2);
                }
            }
        }
    }

    /// Reads out a closed ring, dropping collinear points.
    fn closed_path(&mut self, op: Option<OutPt2Idx>) -> Path64 {
        let Some(mut op) = op else {
            return Vec::new();
        };
        if self.is_degenerate(op) {
            return Vec::new();
        }
        let mut op2 = Some(self.pts[op].next);
        while let Some(cur) = op2 {
            if cur == op {
                break;
            }
            let OutPt2 { prev, next, pt, .. } = self.pts[cur];
            if is_collinear(self.pts[prev].pt, pt, self.pts[next].pt) {
                op = prev;
                op2 = self.unlink(cur);
            } else {
                op2 = Some(next);
            }
        }
        if op2.is_none() {
            return Vec::new();
        }
        self.ring_from(op)
    }

    fn ring_from(&self, start: OutPt2Idx) -> Path64 {
        let mut result = vec![self.pts[start].pt];
        let mut cur = self.pts[start].next;
        while cur != start {
            result.push(self.pts[cur].pt);
            cur = self.pts[cur].next;
        }
        result
    }

    /// Clips closed paths.
    ///
    /// Paths entirely inside the rectangle are returned unchanged, and
    /// paths with fewer than three points are dropped.
    pub fn execute(&mut self, paths: &[Path64]) -> Paths64 {
        let mut result = Vec::new();
        if self.rect.is_empty() {
            return result;
        }
        for path in paths {
            if path.len() < 3 {
                continue;
            }
            self.path_bounds = bounds(path);
            if !self.rect.intersects(&self.path_bounds) {
                continue;
            }
            if self.rect.contains_rect(&self.path_bounds) {
                result.push(path.clone());
                continue;
            }

            self.execute_internal(path);
            self.check_edges();
            for side in 0..4 {
                self.tidy_edge_pair(side);
            }
            for k in 0..self.results.len() {
                let ring = self.closed_path(self.results[k]);
                if !ring.is_empty() {
                    result.push(ring);
                }
            }
            self.reset();
        }
        trace!(paths = paths.len(), out = result.len(), "rect clip");
        result
    }
}

/// Clips open paths to a rectangle.
#[derive(Clone, Debug)]
pub struct RectClipLines64 {
    inner: RectClip64,
}

impl RectClipLines64 {
    /// A clipper for the rectangle `rect`.
    pub fn new(rect: Rect64) -> Self {
        RectClipLines64 {
            inner: RectClip64::new(rect),
        }
    }

    fn execute_internal(&mut self, path: &[Point64]) {
        let c = &mut self.inner;
        c.reset();
        if path.len() < 2 || c.rect.is_empty() {
            return;
        }
        let high = path.len() - 1;
        let mut i = 1;
        let (mut loc, off_boundary) = locate(&c.rect, path[0]);
        if !off_boundary {
            let Some(prev) = path[1..]
                .iter()
                .map(|&pt| locate(&c.rect, pt))
                .find_map(|(l, off)| off.then_some(l))
            else {
                for &pt in path {
                    c.add(pt, false);
                }
                return;
            };
            if prev == Location::Inside {
                loc = Location::Inside;
            }
        }
        if loc == Location::Inside {
            c.add(path[0], false);
        }

        while i <= high {
            let prev = loc;
            c.next_location(path, &mut loc, &mut i);
            if i > high {
                break;
            }
            let prev_pt = path[i - 1];
            let mut crossing_loc = loc;
            let Some(ip) = rect_crossing(&c.rect_path, path[i], prev_pt, &mut crossing_loc) else {
                i += 1;
                continue;
            };

            if loc == Location::Inside {
                // Entering.
                c.add(ip, true);
            } else if prev != Location::Inside {
                // Passing right through.
                crossing_loc = prev;
                let ip2 = rect_crossing(&c.rect_path, prev_pt, path[i], &mut crossing_loc).unwrap_or(ip);
                c.add(ip2, true);
                c.add(ip, false);
            } else {
                // Leaving.
                c.add(ip, false);
            }
        }
    }

    fn open_path(&self, op: Option<OutPt2Idx>) -> Path64 {
        let Some(op) = op else {
            return Vec::new();
        };
        let c = &self.inner;
        if c.pts[op].next == op {
            return Vec::new();
        }
        // `op` is the last point added, so the line starts after it.
        c.ring_from(c.pts[op].next)
    }

    /// Clips open paths. Each input path may come out in several pieces.
    pub fn execute(&mut self, paths: &[Path64]) -> Paths64 {
        let mut result = Vec::new();
        if self.inner.rect.is_empty() {
            return result;
        }
        for path in paths {
            if path.len() < 2 {
                continue;
            }
            self.inner.path_bounds = bounds(path);
            if !self.inner.rect.intersects(&self.inner.path_bounds) {
                continue;
            }
            self.execute_internal(path);
            for &op in &self.inner.results {
                let line = self.open_path(op);
                if !line.is_empty() {
                    result.push(line);
                }
            }
            self.inner.reset();
        }
        trace!(paths = paths.len(), out = result.len(), "rect clip lines");
        result
    }
}

/// Clips closed integer paths to `rect`.
pub fn rect_clip(rect: Rect64, paths: &[Path64]) -> Paths64 {
    if rect.is_empty() || paths.is_empty() {
        return Vec::new();
    }
    RectClip64::new(rect).execute(paths)
}

/// Clips open integer paths to `rect`.
pub fn rect_clip_lines(rect: Rect64, paths: &[Path64]) -> Paths64 {
    if rect.is_empty() || paths.is_empty() {
        return Vec::new();
    }
    RectClipLines64::new(rect).execute(paths)
}

/// Clips closed floating-point paths to `rect`, keeping `precision` decimal
/// digits.
pub fn rect_clip_d(rect: &RectD, paths: &[PathD], precision: i32) -> Result<PathsD, Error> {
    check_precision(precision)?;
    if rect.is_empty() || paths.is_empty() {
        return Ok(Vec::new());
    }
    let scale = 10f64.powi(precision);
    let out = RectClip64::new(scale_rect(rect, scale)).execute(&scale_paths64(paths, scale)?);
    scale_paths_d(&out, 1.0 / scale)
}

/// Clips open floating-point paths to `rect`, keeping `precision` decimal
/// digits.
pub fn rect_clip_lines_d(rect: &RectD, paths: &[PathD], precision: i32) -> Result<PathsD, Error> {
    check_precision(precision)?;
    if rect.is_empty() || paths.is_empty() {
        return Ok(Vec::new());
    }
    let scale = 10f64.powi(precision);
    let out = RectClipLines64::new(scale_rect(rect, scale)).execute(&scale_paths64(paths, scale)?);
    scale_paths_d(&out, 1.0 / scale)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::paths::{area, area_paths, make_path64, make_path_d};

    fn same_ring(a: &[Point64], b: &[Point64]) -> bool {
        a.len() == b.len()
            && (0..b.len()).any(|s| a.iter().enumerate().all(|(i, p)| b[(i + s) % b.len()] == *p))
    }

    #[test]
    fn surrounding_path_gives_the_rect() {
        let rect = Rect64::new(1222, 1323, 3247, 3348);
        let subject = make_path64(&[375, 1680, 1915, 4716, 5943, 586, 3987, 152]);
        let out = rect_clip(rect, &[subject]);
        assert_eq!(out.len(), 1);
        let want = make_path64(&[1222, 1323, 1222, 3348, 3247, 3348, 3247, 1323]);
        assert!(same_ring(&want, &out[0]), "{out:?}");
    }

    #[test]
    fn inside_and_outside() {
        let rect = Rect64::new(0, 0, 100, 100);
        let inside = make_path64(&[10, 10, 20, 10, 20, 20]);
        let outside = make_path64(&[200, 200, 300, 200, 300, 300]);
        let out = rect_clip(rect, &[inside.clone(), outside]);
        assert_eq!(out, vec![inside]);
    }

    #[test]
    fn overlapping_square() {
        let rect = Rect64::new(50, 50, 150, 150);
        let out = rect_clip(rect, &[make_path64(&[0, 0, 100, 0, 100, 100, 0, 100])]);
        assert_eq!(out.len(), 1);
        assert_eq!(area(&out[0]), 2500.0);
        assert!(out[0].iter().all(|p| p.x >= 50 && p.y >= 50));
    }

    #[test]
    fn crossing_band() {
        // A wide band passing straight through the rectangle.
        let rect = Rect64::new(0, 0, 100, 100);
        let band = make_path64(&[-50, 40, 150, 40, 150, 60, -50, 60]);
        let out = rect_clip(rect, &[band]);
        assert_eq!(out.len(), 1);
        assert_eq!(area(&out[0]), 2000.0);
    }

    #[test]
    fn u_shape_splits_in_two() {
        // A "U" whose arms poke up into the rectangle from below.
        let rect = Rect64::new(0, 0, 100, 50);
        let u = make_path64(&[
            10, 20, 30, 20, 30, 80, 70, 80, 70, 20, 90, 20, 90, 100, 10, 100,
        ]);
        let out = rect_clip(rect, &[u]);
        assert_eq!(out.len(), 2);
        assert_eq!(area_paths(&out), 2.0 * 20.0 * 30.0);
    }

    #[test]
    fn empty_rect() {
        let out = rect_clip(Rect64::new(0, 0, 0, 100), &[make_path64(&[0, 0, 10, 0, 10, 10])]);
        assert!(out.is_empty());
    }

    #[test]
    fn lines() {
        let rect = Rect64::new(0, 0, 100, 100);
        let through = make_path64(&[-50, 50, 150, 50]);
        let out = rect_clip_lines(rect, &[through]);
        assert_eq!(out, vec![make_path64(&[0, 50, 100, 50])]);

        // In, out and back in again.
        let zigzag = make_path64(&[50, 50, 50, 150, 80, 150, 80, 50]);
        let out = rect_clip_lines(rect, &[zigzag]);
        assert_eq!(
            out,
            vec![make_path64(&[50, 50, 50, 100]), make_path64(&[80, 100, 80, 50])]
        );

        let outside = make_path64(&[200, 0, 200, 100]);
        assert!(rect_clip_lines(rect, &[outside]).is_empty());
    }

    #[test]
    fn floating_point() {
        let rect = RectD::new(0.5, 0.5, 1.5, 1.5);
        let sq = make_path_d(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]);
        let out = rect_clip_d(&rect, &[sq.clone()], 2).unwrap();
        assert_eq!(out.len(), 1);
        assert!((crate::paths::area_d(&out[0]) - 0.25).abs() < 1e-9);

        let line = make_path_d(&[0.0, 1.0, 2.0, 1.0]);
        let out = rect_clip_lines_d(&rect, &[line], 2).unwrap();
        assert_eq!(out, vec![make_path_d(&[0.5, 1.0, 1.5, 1.0])]);

        assert_matches!(
            rect_clip_d(&rect, &[sq], 20),
            Err(Error::PrecisionOutOfRange { precision: 20 })
        );
    }
}
