//! Growing and shrinking paths.
//!
//! [`ClipperOffset`] moves every edge of a path outwards (or inwards, for a
//! negative delta) and fills the gaps at the vertices with one of the
//! [`JoinType`]s. Open paths are turned into closed outlines, capped at both
//! ends according to an [`EndType`]. The raw offset outlines overlap each
//! other wherever the path turns sharply, so they are finally merged with a
//! Union.

use std::f64::consts::PI;

use tracing::debug;

use crate::geom::{cross_product_d, dot_product_d, is_almost_zero, Point64, PointD, Rect64};
use crate::paths::{area, check_precision, ellipse64, strip_duplicates, Path64, Paths64, PathsD};
use crate::poly_tree::PolyTree64;
use crate::{ClipType, Clipper64, ClipperConfig, Error, FillRule};

const TOLERANCE: f64 = 1e-12;
/// Default arc tolerance, as a fraction of the offset distance.
const ARC_CONST: f64 = 0.002;

/// How two offset edges are joined at a convex vertex.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum JoinType {
    /// Cut off the corner at distance `delta` from the vertex.
    Square,
    /// Cut off the corner straight between the two offset edges.
    Bevel,
    /// Follow a circular arc around the vertex.
    Round,
    /// Extend the edges until they meet, unless that's further than the
    /// miter limit allows, in which case fall back to [`JoinType::Square`].
    Miter,
}

/// How a path is closed off.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EndType {
    /// The path is a closed polygon.
    Polygon,
    /// The path is open, but its ends are joined as if it were closed, so
    /// the outline has both an outer and an inner boundary.
    Joined,
    /// Open path, cut off squarely at the end points.
    Butt,
    /// Open path, extended by `delta` past the end points.
    Square,
    /// Open path with semicircular caps.
    Round,
}

/// Options for a [`ClipperOffset`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OffsetConfig {
    /// The furthest a miter join may reach, as a multiple of `delta`.
    /// Values of 1 or less mean 2.
    pub miter_limit: f64,
    /// The largest distance a rounded join may stray from a true arc. Zero
    /// (or anything below 0.01) means `delta / 500`.
    pub arc_tolerance: f64,
    /// Passed on to the final Union.
    pub preserve_collinear: bool,
    /// Passed on to the final Union.
    pub reverse_solution: bool,
}

impl Default for OffsetConfig {
    fn default() -> Self {
        OffsetConfig {
            miter_limit: 2.0,
            arc_tolerance: 0.0,
            preserve_collinear: false,
            reverse_solution: false,
        }
    }
}

/// Paths that share a join and an end type.
#[derive(Clone, Debug)]
struct Group {
    paths: Paths64,
    join_type: JoinType,
    end_type: EndType,
    /// The path with the bottom-most (then left-most) vertex, if any path
    /// has one.
    lowest_path: Option<usize>,
    /// Is the lowest path oriented negatively? If so, every offset in the
    /// group is mirrored.
    paths_reversed: bool,
}

impl Group {
    fn new(paths: &[Path64], join_type: JoinType, end_type: EndType) -> Group {
        let is_joined = matches!(end_type, EndType::Polygon | EndType::Joined);
        let paths: Paths64 = paths
            .iter()
            .map(|p| strip_duplicates(p, is_joined))
            .collect();
        let (lowest_path, paths_reversed) = if end_type == EndType::Polygon {
            let lowest = lowest_path_idx(&paths);
            (lowest, lowest.is_some_and(|i| area(&paths[i]) < 0.0))
        } else {
            (None, false)
        };
        Group {
            paths,
            join_type,
            end_type,
            lowest_path,
            paths_reversed,
        }
    }
}

fn lowest_path_idx(paths: &[Path64]) -> Option<usize> {
    let mut result = None;
    let mut bot = Point64::new(i64::MAX, i64::MIN);
    for (i, path) in paths.iter().enumerate() {
        for &pt in path {
            if pt.y < bot.y || (pt.y == bot.y && pt.x >= bot.x) {
                continue;
            }
            result = Some(i);
            bot = pt;
        }
    }
    result
}

/// A per-vertex offset distance, called with the path, its edge normals, the
/// index of the current vertex and the index of the previous one.
type DeltaFn<'a> = dyn FnMut(&[Point64], &[PointD], usize, usize) -> f64 + 'a;

/// Offsets closed and open paths.
///
/// ```
/// use polysweep::{make_path64, ClipperOffset, EndType, JoinType};
///
/// let mut co = ClipperOffset::new();
/// co.add_path(&make_path64(&[0, 0, 100, 0, 100, 100, 0, 100]), JoinType::Miter, EndType::Polygon);
/// let grown = co.execute(10.0).unwrap();
/// assert_eq!(polysweep::area(&grown[0]), 120.0 * 120.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ClipperOffset {
    config: OffsetConfig,
    groups: Vec<Group>,
}

impl ClipperOffset {
    /// An offsetter with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// An offsetter with a custom configuration.
    pub fn with_config(config: OffsetConfig) -> Self {
        ClipperOffset {
            config,
            groups: Vec::new(),
        }
    }

    /// The current configuration.
    pub fn config(&self) -> &OffsetConfig {
        &self.config
    }

    /// Adds a single path.
    pub fn add_path(&mut self, path: &[Point64], join_type: JoinType, end_type: EndType) {
        self.add_paths(&[path.to_vec()], join_type, end_type);
    }

    /// Adds a group of paths.
    ///
    /// Closed paths in a group are offset consistently: if the group's
    /// outermost path is negatively oriented, the whole group is treated as
    /// if it were reversed.
    pub fn add_paths(&mut self, paths: &[Path64], join_type: JoinType, end_type: EndType) {
        if paths.is_empty() {
            return;
        }
        self.groups.push(Group::new(paths, join_type, end_type));
    }

    /// Forgets all the paths added so far.
    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// Offsets everything by `delta`.
    ///
    /// Closed paths grow for positive `delta` and shrink for negative.
    /// Open paths always grow by `|delta|`.
    pub fn execute(&self, delta: f64) -> Result<Paths64, Error> {
        Ok(self.union(self.raw_offset(delta, None))?.closed)
    }

    /// Like [`ClipperOffset::execute`], but nests the output in a
    /// poly-tree.
    pub fn execute_tree(&self, delta: f64) -> Result<PolyTree64, Error> {
        let raw = self.raw_offset(delta, None);
        let mut c = self.union_clipper(raw);
        Ok(c.execute_tree(ClipType::Union, self.fill_rule())?.0)
    }

    /// Offsets everything, asking `delta_fn` for the distance at each
    /// vertex.
    ///
    /// For negatively oriented closed groups the sign of the returned
    /// distance is flipped, so that positive values always grow.
    pub fn execute_with<F>(&self, mut delta_fn: F) -> Result<Paths64, Error>
    where
        F: FnMut(&[Point64], &[PointD], usize, usize) -> f64,
    {
        Ok(self.union(self.raw_offset(1.0, Some(&mut delta_fn)))?.closed)
    }

    /// Builds the unmerged outlines.
    fn raw_offset<'f>(&self, delta: f64, delta_fn: Option<&'f mut DeltaFn<'f>>) -> Paths64 {
        let capacity = self
            .groups
            .iter()
            .map(|g| {
                if g.end_type == EndType::Joined {
                    2 * g.paths.len()
                } else {
                    g.paths.len()
                }
            })
            .sum();
        let mut solution = Vec::with_capacity(capacity);

        if delta.abs() < 0.5 && delta_fn.is_none() {
            for group in &self.groups {
                solution.extend(group.paths.iter().cloned());
            }
            return solution;
        }

        let mut state = OffsetState {
            config: &self.config,
            delta_fn,
            delta,
            group_delta: 0.0,
            mit_lim_sqr: if self.config.miter_limit <= 1.0 {
                2.0
            } else {
                2.0 / (self.config.miter_limit * self.config.miter_limit)
            },
            steps_per_rad: 0.0,
            step_sin: 0.0,
            step_cos: 0.0,
            join_type: JoinType::Square,
            end_type: EndType::Polygon,
            normals: Vec::new(),
            path_out: Vec::new(),
            solution,
        };
        for group in &self.groups {
            state.do_group_offset(group);
        }
        debug!(groups = self.groups.len(), paths = state.solution.len(), delta, "offset outlines built");
        state.solution
    }

    /// Outlines of positively oriented paths have positive winding, unless
    /// the first closed group was found to be reversed.
    fn fill_rule(&self) -> FillRule {
        if self.paths_reversed() {
            FillRule::Negative
        } else {
            FillRule::Positive
        }
    }

    fn paths_reversed(&self) -> bool {
        self.groups
            .iter()
            .find(|g| g.end_type == EndType::Polygon)
            .is_some_and(|g| g.paths_reversed)
    }

    fn union_clipper(&self, raw: Paths64) -> Clipper64 {
        let mut c = Clipper64::with_config(ClipperConfig {
            preserve_collinear: self.config.preserve_collinear,
            reverse_solution: self.config.reverse_solution != self.paths_reversed(),
            ..ClipperConfig::default()
        });
        c.add_subject(&raw);
        c
    }

    fn union(&self, raw: Paths64) -> Result<crate::Solution64, Error> {
        if self.groups.is_empty() {
            return Ok(crate::Solution64::default());
        }
        self.union_clipper(raw).execute(ClipType::Union, self.fill_rule())
    }
}

/// Scratch state for one offsetting run.
struct OffsetState<'a, 'f> {
    config: &'a OffsetConfig,
    delta_fn: Option<&'f mut DeltaFn<'f>>,
    delta: f64,
    /// The signed distance for the group (or, with a delta function, the
    /// vertex) being processed.
    group_delta: f64,
    mit_lim_sqr: f64,
    steps_per_rad: f64,
    step_sin: f64,
    step_cos: f64,
    join_type: JoinType,
    end_type: EndType,
    normals: Vec<PointD>,
    path_out: Path64,
    solution: Paths64,
}

fn unit_normal(pt1: Point64, pt2: Point64) -> PointD {
    let dx = (pt2.x - pt1.x) as f64;
    let dy = (pt2.y - pt1.y) as f64;
    if dx == 0.0 && dy == 0.0 {
        return PointD::default();
    }
    let f = 1.0 / (dx * dx + dy * dy).sqrt();
    PointD::new(dy * f, -dx * f)
}

fn normalize(v: PointD) -> PointD {
    let h = v.hypot();
    if h.abs() < 0.001 {
        return PointD::default();
    }
    PointD::new(v.x / h, v.y / h)
}

fn translate(pt: PointD, dx: f64, dy: f64) -> PointD {
    PointD::new(pt.x + dx, pt.y + dy)
}

fn reflect(pt: PointD, pivot: PointD) -> PointD {
    PointD::new(pivot.x + (pivot.x - pt.x), pivot.y + (pivot.y - pt.y))
}

/// Where the line through `a1`, `a2` meets the line through `b1`, `b2`.
/// Parallel lines give the origin.
fn line_intersection(a1: PointD, a2: PointD, b1: PointD, b2: PointD) -> PointD {
    if is_almost_zero(a1.x - a2.x) {
        if is_almost_zero(b1.x - b2.x) {
            return PointD::default();
        }
        let m2 = (b2.y - b1.y) / (b2.x - b1.x);
        let c2 = b1.y - m2 * b1.x;
        return PointD::new(a1.x, m2 * a1.x + c2);
    }
    if is_almost_zero(b1.x - b2.x) {
        let m1 = (a2.y - a1.y) / (a2.x - a1.x);
        let c1 = a1.y - m1 * a1.x;
        return PointD::new(b1.x, m1 * b1.x + c1);
    }
    let m1 = (a2.y - a1.y) / (a2.x - a1.x);
    let c1 = a1.y - m1 * a1.x;
    let m2 = (b2.y - b1.y) / (b2.x - b1.x);
    let c2 = b1.y - m2 * b1.x;
    if is_almost_zero(m1 - m2) {
        return PointD::default();
    }
    let x = (c2 - c1) / (m1 - m2);
    PointD::new(x, m1 * x + c1)
}

impl OffsetState<'_, '_> {
    fn set_arc_steps(&mut self) {
        let abs_delta = self.group_delta.abs();
        let arc_tol = if self.config.arc_tolerance > 0.01 {
            self.config.arc_tolerance
        } else {
            abs_delta * ARC_CONST
        };
        let steps_per_360 = PI / (1.0 - arc_tol / abs_delta).acos();
        (self.step_sin, self.step_cos) = (2.0 * PI / steps_per_360).sin_cos();
        if self.group_delta < 0.0 {
            self.step_sin = -self.step_sin;
        }
        self.steps_per_rad = steps_per_360 / (2.0 * PI);
    }

    /// Asks the delta function (if there is one) for the distance at `j`.
    fn update_delta(&mut self, path: &[Point64], j: usize, k: usize, reversed: bool) {
        if let Some(f) = self.delta_fn.as_mut() {
            let d = f(path, &self.normals, j, k);
            self.group_delta = if reversed { -d } else { d };
        }
    }

    fn do_group_offset(&mut self, group: &Group) {
        if group.end_type == EndType::Polygon {
            if group.lowest_path.is_none() {
                self.delta = self.delta.abs();
            }
            self.group_delta = if group.paths_reversed {
                -self.delta
            } else {
                self.delta
            };
        } else {
            self.group_delta = self.delta.abs();
        }

        self.join_type = group.join_type;
        if group.join_type == JoinType::Round || group.end_type == EndType::Round {
            self.set_arc_steps();
        }

        for path in &group.paths {
            self.end_type = group.end_type;
            match path.len() {
                0 => continue,
                1 => {
                    self.update_delta(path, 0, 0, group.paths_reversed);
                    let pt = path[0];
                    let out = if group.end_type == EndType::Round {
                        let abs_delta = self.group_delta.abs();
                        let steps = (self.steps_per_rad * 2.0 * PI).ceil() as usize;
                        ellipse64(pt, abs_delta, abs_delta, steps)
                    } else {
                        let d = self.group_delta.ceil() as i64;
                        Rect64::new(pt.x - d, pt.y - d, pt.x + d, pt.y + d).as_path()
                    };
                    self.solution.push(out);
                    continue;
                }
                2 if group.end_type == EndType::Joined => {
                    self.end_type = if group.join_type == JoinType::Round {
                        EndType::Round
                    } else {
                        EndType::Square
                    };
                }
                _ => {}
            }

            self.build_normals(path);
            match self.end_type {
                EndType::Polygon => self.offset_polygon(path, group.paths_reversed),
                EndType::Joined => self.offset_open_joined(path, group.paths_reversed),
                _ => self.offset_open_path(path, group.paths_reversed),
            }
        }
    }

    fn build_normals(&mut self, path: &[Point64]) {
        self.normals.clear();
        self.normals
            .extend(path.windows(2).map(|w| unit_normal(w[0], w[1])));
        if let (Some(&last), Some(&first)) = (path.last(), path.first()) {
            self.normals.push(unit_normal(last, first));
        }
    }

    fn offset_polygon(&mut self, path: &[Point64], reversed: bool) {
        self.path_out = Vec::with_capacity(path.len());
        let mut k = path.len() - 1;
        for j in 0..path.len() {
            self.offset_point(path, j, &mut k, reversed);
        }
        self.solution.push(std::mem::take(&mut self.path_out));
    }

    fn offset_open_joined(&mut self, path: &[Point64], reversed: bool) {
        self.offset_polygon(path, reversed);
        let rev: Path64 = path.iter().rev().copied().collect();
        self.build_normals(&rev);
        self.offset_polygon(&rev, reversed);
    }

    fn do_cap(&mut self, path: &[Point64], i: usize) {
        if self.group_delta.abs() < TOLERANCE {
            self.path_out.push(path[i]);
            return;
        }
        match self.end_type {
            EndType::Butt => self.do_bevel(path, i, i),
            EndType::Round => self.do_round(path, i, i, PI),
            _ => self.do_square(path, i, i),
        }
    }

    fn offset_open_path(&mut self, path: &[Point64], reversed: bool) {
        self.path_out = Vec::with_capacity(2 * path.len());
        let high = path.len() - 1;

        self.update_delta(path, 0, 0, false);
        self.do_cap(path, 0);

        let mut k = 0;
        for j in 1..high {
            self.offset_point(path, j, &mut k, reversed);
        }

        // Walk back along the other side, with the normals flipped.
        for i in (1..=high).rev() {
            self.normals[i] = self.normals[i - 1].negate();
        }
        self.normals[0] = self.normals[high];

        self.update_delta(path, high, high, false);
        self.do_cap(path, high);

        let mut k = high;
        for j in (1..high).rev() {
            self.offset_point(path, j, &mut k, reversed);
        }
        self.solution.push(std::mem::take(&mut self.path_out));
    }

    fn offset_point(&mut self, path: &[Point64], j: usize, k: &mut usize, reversed: bool) {
        if path[j] == path[*k] {
            *k = j;
            return;
        }

        let nj = self.normals[j];
        let nk = self.normals[*k];
        let sin_a = cross_product_d(nj, nk).clamp(-1.0, 1.0);
        let cos_a = dot_product_d(nj, nk);

        self.update_delta(path, j, *k, reversed);
        if self.group_delta.abs() < TOLERANCE {
            self.path_out.push(path[j]);
            return;
        }

        if cos_a > -0.999 && sin_a * self.group_delta < 0.0 {
            // Concave. Going through the vertex itself lets the final
            // Union clean up any reversal.
            self.path_out.push(self.perpendic(path[j], nk));
            self.path_out.push(path[j]);
            self.path_out.push(self.perpendic(path[j], nj));
        } else if cos_a > 0.999 && self.join_type != JoinType::Round {
            // Almost straight.
            self.do_miter(path, j, *k, cos_a);
        } else {
            match self.join_type {
                JoinType::Miter if cos_a > self.mit_lim_sqr - 1.0 => {
                    self.do_miter(path, j, *k, cos_a)
                }
                JoinType::Round => self.do_round(path, j, *k, sin_a.atan2(cos_a)),
                JoinType::Bevel => self.do_bevel(path, j, *k),
                JoinType::Miter | JoinType::Square => self.do_square(path, j, *k),
            }
        }
        *k = j;
    }

    fn perpendic_d(&self, pt: Point64, norm: PointD) -> PointD {
        PointD::new(
            pt.x as f64 + norm.x * self.group_delta,
            pt.y as f64 + norm.y * self.group_delta,
        )
    }

    fn perpendic(&self, pt: Point64, norm: PointD) -> Point64 {
        self.perpendic_d(pt, norm).into()
    }

    fn do_miter(&mut self, path: &[Point64], j: usize, k: usize, cos_a: f64) {
        let q = self.group_delta / (cos_a + 1.0);
        let (nj, nk) = (self.normals[j], self.normals[k]);
        self.path_out.push(Point64::from_f64(
            path[j].x as f64 + (nk.x + nj.x) * q,
            path[j].y as f64 + (nk.y + nj.y) * q,
        ));
    }

    fn do_bevel(&mut self, path: &[Point64], j: usize, k: usize) {
        let pt = PointD::from(path[j]);
        let (pt1, pt2) = if j == k {
            let abs_delta = self.group_delta.abs();
            let n = self.normals[j];
            (
                translate(pt, -abs_delta * n.x, -abs_delta * n.y),
                translate(pt, abs_delta * n.x, abs_delta * n.y),
            )
        } else {
            (
                self.perpendic_d(path[j], self.normals[k]),
                self.perpendic_d(path[j], self.normals[j]),
            )
        };
        self.path_out.push(pt1.into());
        self.path_out.push(pt2.into());
    }

    fn do_square(&mut self, path: &[Point64], j: usize, k: usize) {
        let (nj, nk) = (self.normals[j], self.normals[k]);
        let vec = if j == k {
            PointD::new(nj.y, -nj.x)
        } else {
            normalize(PointD::new(-nk.y, nk.x) + PointD::new(nj.y, -nj.x))
        };
        let gd = self.group_delta;
        let abs_delta = gd.abs();

        // The vertex pushed `delta` outwards along the bisector, and a line
        // through it perpendicular to the bisector.
        let pt_q = translate(PointD::from(path[j]), abs_delta * vec.x, abs_delta * vec.y);
        let pt1 = translate(pt_q, gd * vec.y, gd * -vec.x);
        let pt2 = translate(pt_q, gd * -vec.y, gd * vec.x);
        let pt3 = self.perpendic_d(path[k], nk);
        if j == k {
            let pt4 = PointD::new(pt3.x + vec.x * gd, pt3.y + vec.y * gd);
            let pt = line_intersection(pt1, pt2, pt3, pt4);
            self.path_out.push(reflect(pt, pt_q).into());
            self.path_out.push(pt.into());
        } else {
            let pt4 = self.perpendic_d(path[j], nk);
            let pt = line_intersection(pt1, pt2, pt3, pt4);
            self.path_out.push(pt.into());
            self.path_out.push(reflect(pt, pt_q).into());
        }
    }

    fn do_round(&mut self, path: &[Point64], j: usize, k: usize, angle: f64) {
        if self.delta_fn.is_some() {
            // The distance changes from vertex to vertex.
            self.set_arc_steps();
        }
        let pt = path[j];
        let mut offset = PointD::new(
            self.normals[k].x * self.group_delta,
            self.normals[k].y * self.group_delta,
        );
        if j == k {
            offset = offset.negate();
        }
        self.path_out
            .push(Point64::from_f64(pt.x as f64 + offset.x, pt.y as f64 + offset.y));
        let steps = (self.steps_per_rad * angle.abs()).ceil() as usize;
        for _ in 1..steps {
            offset = PointD::new(
                offset.x * self.step_cos - self.step_sin * offset.y,
                offset.x * self.step_sin + offset.y * self.step_cos,
            );
            self.path_out
                .push(Point64::from_f64(pt.x as f64 + offset.x, pt.y as f64 + offset.y));
        }
        self.path_out.push(self.perpendic(pt, self.normals[j]));
    }
}

/// Offsets integer paths by `delta`.
pub fn inflate_paths(
    paths: &[Path64],
    delta: f64,
    join_type: JoinType,
    end_type: EndType,
    miter_limit: f64,
) -> Result<Paths64, Error> {
    let mut co = ClipperOffset::with_config(OffsetConfig {
        miter_limit,
        ..OffsetConfig::default()
    });
    co.add_paths(paths, join_type, end_type);
    co.execute(delta)
}

/// Offsets floating-point paths by `delta`, keeping `precision` decimal
/// digits.
pub fn inflate_paths_d(
    paths: &[crate::PathD],
    delta: f64,
    join_type: JoinType,
    end_type: EndType,
    miter_limit: f64,
    precision: i32,
) -> Result<PathsD, Error> {
    check_precision(precision)?;
    let scale = 10f64.powi(precision);
    let scaled = crate::paths::scale_paths64(paths, scale)?;
    let mut co = ClipperOffset::with_config(OffsetConfig {
        miter_limit,
        ..OffsetConfig::default()
    });
    co.add_paths(&scaled, join_type, end_type);
    let out = co.execute(delta * scale)?;
    crate::paths::scale_paths_d(&out, 1.0 / scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::{area_paths, make_path64, make_path_d};

    fn square() -> Path64 {
        make_path64(&[0, 0, 100, 0, 100, 100, 0, 100])
    }

    fn offset(path: Path64, delta: f64, join: JoinType, end: EndType) -> Paths64 {
        let mut co = ClipperOffset::new();
        co.add_path(&path, join, end);
        co.execute(delta).unwrap()
    }

    #[test]
    fn square_joins() {
        let out = offset(square(), 40.0, JoinType::Square, EndType::Polygon);
        assert_eq!(out.len(), 1);
        let mut got = out[0].clone();
        got.sort_by_key(|p| (p.x, p.y));
        insta::assert_debug_snapshot!(got, @r"
        [
            (-40, -17),
            (-40, 117),
            (-17, -40),
            (-17, 140),
            (117, -40),
            (117, 140),
            (140, -17),
            (140, 117),
        ]
        ");
    }

    #[test]
    fn miter_joins() {
        let out = offset(square(), 10.0, JoinType::Miter, EndType::Polygon);
        assert_eq!(area_paths(&out), 14400.0);
        let out = offset(square(), -10.0, JoinType::Miter, EndType::Polygon);
        assert_eq!(area_paths(&out), 6400.0);
    }

    #[test]
    fn bevel_joins() {
        let out = offset(square(), 10.0, JoinType::Bevel, EndType::Polygon);
        // Four 10x10 corners, each with half cut away.
        assert_eq!(area_paths(&out), 14400.0 - 4.0 * 50.0);
    }

    #[test]
    fn round_joins() {
        let out = offset(square(), 10.0, JoinType::Round, EndType::Polygon);
        let want = 10000.0 + 4.0 * 1000.0 + PI * 100.0;
        let got = area_paths(&out);
        assert!((got - want).abs() < 5.0, "{got} vs {want}");
    }

    #[test]
    fn shrinking_to_nothing() {
        let out = offset(square(), -60.0, JoinType::Miter, EndType::Polygon);
        assert!(out.is_empty());
    }

    #[test]
    fn reversed_polygon_still_grows() {
        let mut rev = square();
        rev.reverse();
        let out = offset(rev, 10.0, JoinType::Miter, EndType::Polygon);
        assert_eq!(area_paths(&out).abs(), 14400.0);
    }

    #[test]
    fn tiny_delta_is_a_no_op() {
        let out = offset(square(), 0.1, JoinType::Miter, EndType::Polygon);
        assert_eq!(area_paths(&out), 10000.0);
    }

    #[test]
    fn open_path_caps() {
        let line = make_path64(&[0, 0, 100, 0]);
        let butt = offset(line.clone(), 10.0, JoinType::Miter, EndType::Butt);
        assert_eq!(area_paths(&butt).abs(), 2000.0);
        let square = offset(line.clone(), 10.0, JoinType::Miter, EndType::Square);
        assert_eq!(area_paths(&square).abs(), 2400.0);
        let round = offset(line, 10.0, JoinType::Round, EndType::Round);
        let want = 2000.0 + PI * 100.0;
        assert!((area_paths(&round).abs() - want).abs() < 5.0);
    }

    #[test]
    fn joined_open_path() {
        // An open "U" whose ends are joined makes a ring with a hole.
        let u = make_path64(&[0, 0, 0, 100, 100, 100, 100, 0]);
        let out = offset(u, 5.0, JoinType::Miter, EndType::Joined);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn single_points() {
        let pt = make_path64(&[50, 50]);
        let sq = offset(pt.clone(), 10.0, JoinType::Square, EndType::Square);
        assert_eq!(area_paths(&sq).abs(), 400.0);
        let circle = offset(pt, 10.0, JoinType::Round, EndType::Round);
        assert!((area_paths(&circle).abs() - PI * 100.0).abs() < 5.0);
    }

    #[test]
    fn variable_delta() {
        let mut co = ClipperOffset::new();
        co.add_path(&square(), JoinType::Miter, EndType::Polygon);
        let constant = co.execute(10.0).unwrap();
        let via_fn = co.execute_with(|_, _, _, _| 10.0).unwrap();
        assert_eq!(area_paths(&constant), area_paths(&via_fn));
    }

    #[test]
    fn tree_output() {
        let mut co = ClipperOffset::new();
        co.add_paths(
            &[square(), make_path64(&[30, 30, 30, 70, 70, 70, 70, 30])],
            JoinType::Miter,
            EndType::Polygon,
        );
        let tree = co.execute_tree(5.0).unwrap();
        let outer = tree.child(tree.root(), 0).unwrap();
        assert_eq!(tree.children(outer).len(), 1);
        assert_eq!(tree.area(outer), 110.0 * 110.0 - 30.0 * 30.0);
    }

    #[test]
    fn float_inflate() {
        let sq = make_path_d(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]);
        let out = inflate_paths_d(&[sq], 0.1, JoinType::Miter, EndType::Polygon, 2.0, 2).unwrap();
        assert!((crate::paths::area_paths_d(&out) - 1.44).abs() < 1e-9);
        assert!(inflate_paths_d(&[], 1.0, JoinType::Miter, EndType::Polygon, 2.0, 10).is_err());
    }
}
