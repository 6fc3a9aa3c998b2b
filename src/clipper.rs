//! The Boolean driver.
//!
//! [`Clipper64`] collects subject and clip paths, runs the sweep and turns
//! its output records into paths or a [`PolyTree64`]. [`ClipperD`] does the
//! same for floating-point paths, scaling them to integers by
//! `10^precision` on the way in and back on the way out.

use tracing::{debug, warn};

use crate::geom::{Point64, PointD};
use crate::paths::{check_precision, Path64, PathD, Paths64, PathsD};
use crate::poly_tree::{PolyTree64, PolyTreeD};
use crate::sweep::{SweepOptions, SweepState};
use crate::vertex::{sort_local_minima, ReusableData};
use crate::{ClipType, Error, FillRule, PathType};

/// Options for a [`Clipper64`] or [`ClipperD`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ClipperConfig {
    /// Decimal digits kept by [`ClipperD`]. Must be in `[-8, 8]`. Ignored by
    /// [`Clipper64`].
    pub precision: i32,
    /// Keep vertices that lie on a straight line between their neighbors.
    pub preserve_collinear: bool,
    /// Emit closed paths with negative area instead of positive.
    pub reverse_solution: bool,
}

impl Default for ClipperConfig {
    fn default() -> Self {
        ClipperConfig {
            precision: 2,
            preserve_collinear: true,
            reverse_solution: false,
        }
    }
}

/// The output of [`Clipper64::execute`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Solution64 {
    /// Closed contours.
    pub closed: Paths64,
    /// Clipped open paths.
    pub open: Paths64,
}

/// The output of [`ClipperD::execute`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SolutionD {
    /// Closed contours.
    pub closed: PathsD,
    /// Clipped open paths.
    pub open: PathsD,
}

/// Boolean operations on integer paths.
///
/// ```
/// use polysweep::{make_path64, ClipType, Clipper64, FillRule};
///
/// let mut clipper = Clipper64::new();
/// clipper.add_subject(&[make_path64(&[0, 0, 100, 0, 100, 100, 0, 100])]);
/// clipper.add_clip(&[make_path64(&[50, 50, 150, 50, 150, 150, 50, 150])]);
/// let solution = clipper.execute(ClipType::Intersection, FillRule::NonZero).unwrap();
/// assert_eq!(solution.closed.len(), 1);
/// assert_eq!(polysweep::area(&solution.closed[0]), 2500.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Clipper64 {
    config: ClipperConfig,
    data: ReusableData,
}

impl Clipper64 {
    /// A clipper with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipper with a custom configuration.
    pub fn with_config(config: ClipperConfig) -> Self {
        Clipper64 {
            config,
            data: ReusableData::new(),
        }
    }

    /// The current configuration.
    pub fn config(&self) -> &ClipperConfig {
        &self.config
    }

    /// Adds closed subject paths.
    pub fn add_subject(&mut self, paths: &[Path64]) {
        self.add_paths(paths, PathType::Subject, false);
    }

    /// Adds open subject paths. Open clip paths aren't supported.
    pub fn add_open_subject(&mut self, paths: &[Path64]) {
        self.add_paths(paths, PathType::Subject, true);
    }

    /// Adds closed clip paths.
    pub fn add_clip(&mut self, paths: &[Path64]) {
        self.add_paths(paths, PathType::Clip, false);
    }

    /// Adds paths of either type.
    pub fn add_paths(&mut self, paths: &[Path64], polytype: PathType, is_open: bool) {
        self.data.add_paths(paths, polytype, is_open);
    }

    /// Adds paths that were ingested ahead of time.
    ///
    /// Preparing a [`ReusableData`] once saves re-ingesting the same paths
    /// for every operation they take part in.
    pub fn add_reusable_data(&mut self, data: &ReusableData) {
        self.data.append(data);
    }

    /// Forgets all the paths added so far.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    fn sweep<T>(
        &mut self,
        clip_type: ClipType,
        fill_rule: FillRule,
        using_polytree: bool,
        build: impl FnOnce(&mut SweepState<'_>) -> T,
    ) -> Result<T, Error> {
        sort_local_minima(&mut self.data.minima, &self.data.vertices);
        let opts = SweepOptions {
            preserve_collinear: self.config.preserve_collinear,
            reverse_solution: self.config.reverse_solution,
            has_open_paths: self.data.has_open_paths,
            using_polytree,
        };
        let mut state = SweepState::new(&self.data.vertices, &self.data.minima, opts);
        state.execute_internal(clip_type, fill_rule);
        if !state.succeeded {
            warn!(?clip_type, ?fill_rule, "discarding output of failed sweep");
            return Err(Error::SweepFailed);
        }
        Ok(build(&mut state))
    }

    /// Runs a Boolean operation on everything added so far.
    ///
    /// The added paths are kept, so the clipper can be executed again with
    /// a different operation or fill rule.
    pub fn execute(&mut self, clip_type: ClipType, fill_rule: FillRule) -> Result<Solution64, Error> {
        let (closed, open) = self.sweep(clip_type, fill_rule, false, |s| s.build_paths())?;
        debug!(closed = closed.len(), open = open.len(), "boolean op finished");
        Ok(Solution64 { closed, open })
    }

    /// Like [`Clipper64::execute`], but nests the closed output in a
    /// poly-tree. Open output is returned alongside it.
    pub fn execute_tree(
        &mut self,
        clip_type: ClipType,
        fill_rule: FillRule,
    ) -> Result<(PolyTree64, Paths64), Error> {
        self.sweep(clip_type, fill_rule, true, |s| {
            let mut tree = PolyTree64::new();
            let open = s.build_tree(&mut tree);
            (tree, open)
        })
    }
}

/// Boolean operations on floating-point paths.
///
/// Coordinates are multiplied by `10^precision` and rounded to integers, so
/// anything finer than `10^-precision` is lost.
#[derive(Clone, Debug)]
pub struct ClipperD {
    inner: Clipper64,
    scale: f64,
    inv_scale: f64,
}

impl ClipperD {
    /// A clipper keeping `precision` decimal digits, with the other options
    /// at their defaults.
    pub fn new(precision: i32) -> Result<Self, Error> {
        Self::with_config(ClipperConfig {
            precision,
            ..ClipperConfig::default()
        })
    }

    /// A clipper with a custom configuration.
    pub fn with_config(config: ClipperConfig) -> Result<Self, Error> {
        check_precision(config.precision)?;
        let scale = 10f64.powi(config.precision);
        Ok(ClipperD {
            inner: Clipper64::with_config(config),
            scale,
            inv_scale: 1.0 / scale,
        })
    }

    /// The current configuration.
    pub fn config(&self) -> &ClipperConfig {
        self.inner.config()
    }

    fn to_int(&self, paths: &[PathD]) -> Paths64 {
        paths
            .iter()
            .map(|path| path.iter().map(|&p| Point64::from_scaled(p, self.scale)).collect())
            .collect()
    }

    fn to_float(&self, path: &[Point64]) -> PathD {
        path.iter()
            .map(|&p| PointD::from_scaled(p, self.inv_scale))
            .collect()
    }

    /// Adds closed subject paths.
    pub fn add_subject(&mut self, paths: &[PathD]) {
        self.add_paths(paths, PathType::Subject, false);
    }

    /// Adds open subject paths.
    pub fn add_open_subject(&mut self, paths: &[PathD]) {
        self.add_paths(paths, PathType::Subject, true);
    }

    /// Adds closed clip paths.
    pub fn add_clip(&mut self, paths: &[PathD]) {
        self.add_paths(paths, PathType::Clip, false);
    }

    /// Adds paths of either type.
    pub fn add_paths(&mut self, paths: &[PathD], polytype: PathType, is_open: bool) {
        let paths = self.to_int(paths);
        self.inner.add_paths(&paths, polytype, is_open);
    }

    /// Adds integer paths that were ingested ahead of time. They must
    /// already be scaled by `10^precision`.
    pub fn add_reusable_data(&mut self, data: &ReusableData) {
        self.inner.add_reusable_data(data);
    }

    /// Forgets all the paths added so far.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Runs a Boolean operation on everything added so far.
    pub fn execute(&mut self, clip_type: ClipType, fill_rule: FillRule) -> Result<SolutionD, Error> {
        let sol = self.inner.execute(clip_type, fill_rule)?;
        Ok(SolutionD {
            closed: sol.closed.iter().map(|p| self.to_float(p)).collect(),
            open: sol.open.iter().map(|p| self.to_float(p)).collect(),
        })
    }

    /// Like [`ClipperD::execute`], but nests the closed output in a
    /// poly-tree.
    pub fn execute_tree(
        &mut self,
        clip_type: ClipType,
        fill_rule: FillRule,
    ) -> Result<(PolyTreeD, PathsD), Error> {
        let (tree, open) = self.inner.execute_tree(clip_type, fill_rule)?;
        let tree = tree.map(|p| self.to_float(p));
        let open = open.iter().map(|p| self.to_float(p)).collect();
        Ok((tree, open))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::paths::{area, area_paths, make_path64, make_path_d};

    /// Is `b` the same ring as `a`, possibly starting at a different point?
    fn same_ring(a: &[Point64], b: &[Point64]) -> bool {
        if a.len() != b.len() {
            return false;
        }
        if a.is_empty() {
            return true;
        }
        (0..b.len()).any(|shift| a.iter().enumerate().all(|(i, p)| b[(i + shift) % b.len()] == *p))
    }

    fn assert_rings(actual: &[Path64], expected: &[Path64]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?}");
        for e in expected {
            assert!(actual.iter().any(|a| same_ring(e, a)), "missing {e:?} in {actual:?}");
        }
    }

    fn squares() -> Clipper64 {
        let mut c = Clipper64::new();
        c.add_subject(&[make_path64(&[0, 0, 100, 0, 100, 100, 0, 100])]);
        c.add_clip(&[make_path64(&[50, 50, 150, 50, 150, 150, 50, 150])]);
        c
    }

    #[test]
    fn union_of_squares() {
        let sol = squares().execute(ClipType::Union, FillRule::NonZero).unwrap();
        assert_rings(
            &sol.closed,
            &[make_path64(&[
                100, 50, 150, 50, 150, 150, 50, 150, 50, 100, 0, 100, 0, 0, 100, 0,
            ])],
        );
        assert!(sol.open.is_empty());
    }

    #[test]
    fn intersection_of_squares() {
        let sol = squares().execute(ClipType::Intersection, FillRule::NonZero).unwrap();
        assert_rings(&sol.closed, &[make_path64(&[100, 100, 50, 100, 50, 50, 100, 50])]);
    }

    #[test]
    fn difference_of_squares() {
        let sol = squares().execute(ClipType::Difference, FillRule::NonZero).unwrap();
        assert_rings(
            &sol.closed,
            &[make_path64(&[100, 50, 50, 50, 50, 100, 0, 100, 0, 0, 100, 0])],
        );
    }

    #[test]
    fn xor_of_squares() {
        let sol = squares().execute(ClipType::Xor, FillRule::NonZero).unwrap();
        assert_rings(
            &sol.closed,
            &[
                make_path64(&[150, 150, 50, 150, 50, 100, 100, 100, 100, 50, 150, 50]),
                make_path64(&[100, 50, 50, 50, 50, 100, 0, 100, 0, 0, 100, 0]),
            ],
        );
    }

    #[test]
    fn clipper_is_reusable() {
        let mut c = squares();
        let union = c.execute(ClipType::Union, FillRule::NonZero).unwrap();
        let inter = c.execute(ClipType::Intersection, FillRule::NonZero).unwrap();
        let union_again = c.execute(ClipType::Union, FillRule::NonZero).unwrap();
        assert_eq!(union, union_again);
        assert_eq!(area_paths(&union.closed), 17500.0);
        assert_eq!(area_paths(&inter.closed), 2500.0);
    }

    #[test]
    fn no_clip_is_empty() {
        let sol = squares().execute(ClipType::NoClip, FillRule::NonZero).unwrap();
        assert_eq!(sol, Solution64::default());
    }

    #[test]
    fn empty_input() {
        let mut c = Clipper64::new();
        let sol = c.execute(ClipType::Union, FillRule::EvenOdd).unwrap();
        assert!(sol.closed.is_empty());
    }

    #[test]
    fn even_odd_self_overlap() {
        // Two overlapping squares in the same subject: even-odd leaves the
        // overlap out, non-zero fills it in.
        let mut c = Clipper64::new();
        c.add_subject(&[
            make_path64(&[0, 0, 100, 0, 100, 100, 0, 100]),
            make_path64(&[50, 50, 150, 50, 150, 150, 50, 150]),
        ]);
        let eo = c.execute(ClipType::Union, FillRule::EvenOdd).unwrap();
        assert_eq!(area_paths(&eo.closed), 15000.0);
        let nz = c.execute(ClipType::Union, FillRule::NonZero).unwrap();
        assert_eq!(area_paths(&nz.closed), 17500.0);
    }

    #[test]
    fn positive_and_negative_fill() {
        let mut c = Clipper64::new();
        // Opposite orientations.
        c.add_subject(&[
            make_path64(&[0, 0, 100, 0, 100, 100, 0, 100]),
            make_path64(&[200, 0, 200, 100, 300, 100, 300, 0]),
        ]);
        let pos = c.execute(ClipType::Union, FillRule::Positive).unwrap();
        let neg = c.execute(ClipType::Union, FillRule::Negative).unwrap();
        assert_eq!(pos.closed.len(), 1);
        assert_eq!(neg.closed.len(), 1);
        assert_eq!(pos.closed[0].iter().map(|p| p.x).max(), Some(100));
        assert_eq!(neg.closed[0].iter().map(|p| p.x).min(), Some(200));
    }

    #[test]
    fn output_orientation() {
        let mut c = squares();
        let sol = c.execute(ClipType::Union, FillRule::NonZero).unwrap();
        assert!(sol.closed.iter().all(|p| area(p) > 0.0));

        let mut c = Clipper64::with_config(ClipperConfig {
            reverse_solution: true,
            ..ClipperConfig::default()
        });
        c.add_subject(&[make_path64(&[0, 0, 100, 0, 100, 100, 0, 100])]);
        let sol = c.execute(ClipType::Union, FillRule::NonZero).unwrap();
        assert!(sol.closed.iter().all(|p| area(p) < 0.0));
    }

    #[test]
    fn collinear_points() {
        let square_with_midpoints =
            make_path64(&[0, 0, 100, 0, 100, 50, 100, 100, 0, 100, 0, 50]);
        let mut c = Clipper64::new();
        c.add_subject(&[square_with_midpoints.clone()]);
        let kept = c.execute(ClipType::Union, FillRule::NonZero).unwrap();
        assert_eq!(kept.closed[0].len(), 6);

        let mut c = Clipper64::with_config(ClipperConfig {
            preserve_collinear: false,
            ..ClipperConfig::default()
        });
        c.add_subject(&[square_with_midpoints]);
        let cleaned = c.execute(ClipType::Union, FillRule::NonZero).unwrap();
        assert_eq!(cleaned.closed[0].len(), 4);
    }

    #[test]
    fn open_subject() {
        let mut c = Clipper64::new();
        c.add_open_subject(&[make_path64(&[-50, 20, 150, 80])]);
        c.add_clip(&[make_path64(&[0, 0, 100, 0, 100, 100, 0, 100])]);
        let inside = c.execute(ClipType::Intersection, FillRule::NonZero).unwrap();
        assert!(inside.closed.is_empty());
        assert_eq!(inside.open.len(), 1);
        let mut xs: Vec<_> = inside.open[0].iter().map(|p| p.x).collect();
        xs.sort();
        assert_eq!(xs, vec![0, 100]);

        let outside = c.execute(ClipType::Difference, FillRule::NonZero).unwrap();
        assert_eq!(outside.open.len(), 2);
    }

    #[test]
    fn reusable_data() {
        let mut data = ReusableData::new();
        data.add_paths(
            &[make_path64(&[0, 0, 100, 0, 100, 100, 0, 100])],
            PathType::Subject,
            false,
        );
        let mut c = Clipper64::new();
        c.add_reusable_data(&data);
        c.add_clip(&[make_path64(&[50, 50, 150, 50, 150, 150, 50, 150])]);
        let via_data = c.execute(ClipType::Union, FillRule::NonZero).unwrap();
        let direct = squares().execute(ClipType::Union, FillRule::NonZero).unwrap();
        assert_eq!(area_paths(&via_data.closed), area_paths(&direct.closed));

        // Seeding after other paths shifts the vertex indices.
        let mut c = Clipper64::new();
        c.add_clip(&[make_path64(&[50, 50, 150, 50, 150, 150, 50, 150])]);
        c.add_reusable_data(&data);
        let shifted = c.execute(ClipType::Difference, FillRule::NonZero).unwrap();
        assert_eq!(area_paths(&shifted.closed), 7500.0);
    }

    #[test]
    fn tree_nesting() {
        let mut c = Clipper64::new();
        c.add_subject(&[
            make_path64(&[0, 0, 100, 0, 100, 100, 0, 100]),
            make_path64(&[20, 20, 20, 80, 80, 80, 80, 20]),
            make_path64(&[40, 40, 60, 40, 60, 60, 40, 60]),
        ]);
        let (tree, open) = c.execute_tree(ClipType::Union, FillRule::NonZero).unwrap();
        assert!(open.is_empty());
        assert_eq!(tree.len(), 3);
        let outer = tree.child(tree.root(), 0).unwrap();
        let hole = tree.child(outer, 0).unwrap();
        let island = tree.child(hole, 0).unwrap();
        assert!(tree.is_hole(hole));
        assert!(!tree.is_hole(island));
        assert_eq!(tree.area(outer), 10000.0 - 3600.0 + 400.0);
        assert!(tree.fully_contains_children());
    }

    fn assert_tree_matches_flat(c: &mut Clipper64, clip_type: ClipType, fill_rule: FillRule) {
        let flat = c.execute(clip_type, fill_rule).unwrap().closed;
        let (tree, _) = c.execute_tree(clip_type, fill_rule).unwrap();
        let nested = tree.to_paths();
        assert_eq!(nested.len(), flat.len(), "{nested:?}");
        assert_eq!(area_paths(&nested), area_paths(&flat));
        for (i, p) in nested.iter().enumerate() {
            assert!(!nested[i + 1..].iter().any(|q| same_ring(p, q)), "{p:?} appears twice");
        }
    }

    #[test]
    fn tree_after_ring_splits() {
        // Repeated points and edges that double back split and merge output
        // records many times, leaving chains of dead owners.
        let mut c = Clipper64::new();
        c.add_subject(&[
            make_path64(&[1, 2, 2, 2, 2, 3, 6, 3, 6, 2, 4, 2, 4, 2, 0, 2, 0, 0, 4, 0, 4, 3, 1, 3]),
            make_path64(&[6, 7, 2, 7, 2, 4, 5, 4, 5, 4, 2, 4, 2, 7, 6, 7, 6, 2, 6, 2]),
            make_path64(&[0, 5, 3, 5, 3, 6, 0, 6]),
        ]);
        c.add_clip(&[
            make_path64(&[1, 1, 5, 1, 5, 5, 1, 5]),
            make_path64(&[3, 0, 3, 7, 4, 7, 4, 0]),
        ]);
        for clip_type in [ClipType::Union, ClipType::Intersection, ClipType::Difference, ClipType::Xor] {
            for fill_rule in [FillRule::EvenOdd, FillRule::NonZero] {
                assert_tree_matches_flat(&mut c, clip_type, fill_rule);
            }
        }
    }

    #[test]
    fn float_driver() {
        let mut c = ClipperD::new(2).unwrap();
        c.add_subject(&[make_path_d(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0])]);
        c.add_clip(&[make_path_d(&[0.5, 0.5, 1.5, 0.5, 1.5, 1.5, 0.5, 1.5])]);
        let sol = c.execute(ClipType::Intersection, FillRule::NonZero).unwrap();
        assert_eq!(sol.closed.len(), 1);
        assert!((crate::paths::area_d(&sol.closed[0]) - 0.25).abs() < 1e-9);

        // Detail below the precision is rounded away.
        let mut c = ClipperD::new(0).unwrap();
        c.add_subject(&[make_path_d(&[0.0, 0.0, 1.4, 0.0, 1.4, 1.4, 0.0, 1.4])]);
        let sol = c.execute(ClipType::Union, FillRule::NonZero).unwrap();
        assert_eq!(crate::paths::area_d(&sol.closed[0]), 1.0);
    }

    #[test]
    fn float_tree() {
        let mut c = ClipperD::new(3).unwrap();
        c.add_subject(&[
            make_path_d(&[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]),
            make_path_d(&[0.25, 0.25, 0.25, 0.75, 0.75, 0.75, 0.75, 0.25]),
        ]);
        let (tree, _) = c.execute_tree(ClipType::Union, FillRule::EvenOdd).unwrap();
        let outer = tree.child(tree.root(), 0).unwrap();
        assert!((tree.area(outer) - 0.75).abs() < 1e-9);
    }

    #[test]
    fn precision_is_validated() {
        assert_matches!(ClipperD::new(9), Err(Error::PrecisionOutOfRange { precision: 9 }));
        assert_matches!(ClipperD::new(-9), Err(Error::PrecisionOutOfRange { precision: -9 }));
        assert!(ClipperD::new(8).is_ok());
    }
}
