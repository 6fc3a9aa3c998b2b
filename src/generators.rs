//! Synthetic inputs for benchmarks and tests.

use crate::{Path64, Paths64, Point64};

/// A `count` by `count` grid of squares.
///
/// The first square's top-left corner is at `origin`, each square is `size`
/// wide, and neighbouring squares are `pitch` apart. A non-zero `slant` turns
/// the squares into parallelograms by pushing each right-hand side down.
fn grid(origin: Point64, size: i64, pitch: i64, slant: i64, count: usize) -> Paths64 {
    let mut ret = Vec::with_capacity(count * count);
    for i in 0..count as i64 {
        let x = origin.x + i * pitch;
        for j in 0..count as i64 {
            let y = origin.y + j * pitch;
            ret.push(vec![
                Point64::new(x, y),
                Point64::new(x + size, y + slant),
                Point64::new(x + size, y + size + slant),
                Point64::new(x, y + size),
            ]);
        }
    }
    ret
}

/// Two overlapping grids of squares, for use as subject and clip.
///
/// The first grid is `n` by `n`. The second is `n - 1` by `n - 1` and is
/// offset so that each of its squares overlaps the corners of four squares in
/// the first, like a checkerboard.
pub fn checkerboard(n: usize) -> (Paths64, Paths64) {
    (
        grid(Point64::new(0, 0), 30, 40, 0, n),
        grid(Point64::new(20, 20), 30, 40, 0, n.saturating_sub(1)),
    )
}

/// Like [`checkerboard`], but with no horizontal edges.
///
/// Horizontal edges take a separate path through the sweep, so it's worth
/// benchmarking both.
pub fn slanted_checkerboard(n: usize) -> (Paths64, Paths64) {
    (
        grid(Point64::new(0, 0), 30, 40, 1, n),
        grid(Point64::new(20, 20), 30, 40, 1, n.saturating_sub(1)),
    )
}

/// Long skinny parallelograms: the first set leans one way and the second
/// leans the other, so every member of one set crosses every member of the
/// other.
pub fn slanties(n: usize) -> (Paths64, Paths64) {
    let h = 20 * n as i64;
    let mut even = Vec::with_capacity(n);
    let mut odd = Vec::with_capacity(n);
    for i in 0..n as i64 {
        let x = 20 * i;
        even.push(vec![
            Point64::new(x, 0),
            Point64::new(x + 10, 0),
            Point64::new(x + h + 10, h),
            Point64::new(x + h, h),
        ]);
        odd.push(vec![
            Point64::new(x + h, 0),
            Point64::new(x + h + 10, 0),
            Point64::new(x + 10, h),
            Point64::new(x, h),
        ]);
    }
    (even, odd)
}

/// A self-intersecting star with `points` tips, drawn by joining every
/// `skip`th vertex of a regular polygon.
///
/// With `skip = 2` and five points this is the usual pentagram, whose centre
/// has winding number two.
pub fn star(center: Point64, radius: f64, points: usize, skip: usize) -> Path64 {
    let step = std::f64::consts::TAU * skip as f64 / points as f64;
    (0..points)
        .map(|i| {
            let (s, c) = (i as f64 * step).sin_cos();
            Point64::from_f64(center.x as f64 + radius * c, center.y as f64 + radius * s)
        })
        .collect()
}

/// `count` random-looking polygons with `vertices` vertices each, all
/// inside a `size` by `size` box.
///
/// The output only depends on `seed`.
pub fn random_polygons(seed: u64, count: usize, vertices: usize, size: i64) -> Paths64 {
    // xorshift64*
    let mut state = seed.max(1);
    let mut next = move || {
        state ^= state >> 12;
        state ^= state << 25;
        state ^= state >> 27;
        state.wrapping_mul(0x2545_f491_4f6c_dd1d)
    };
    (0..count)
        .map(|_| {
            (0..vertices)
                .map(|_| {
                    let x = (next() % size.max(1) as u64) as i64;
                    let y = (next() % size.max(1) as u64) as i64;
                    Point64::new(x, y)
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{paths::area_paths, union_subjects, FillRule};

    #[test]
    fn checkerboard_sizes() {
        let (a, b) = checkerboard(3);
        assert_eq!(a.len(), 9);
        assert_eq!(b.len(), 4);
        assert_eq!(area_paths(&a), 9.0 * 900.0);
    }

    #[test]
    fn pentagram_winds_twice() {
        let s = star(Point64::new(0, 0), 100.0, 5, 2);
        let nonzero = area_paths(&union_subjects(&[s.clone()], FillRule::NonZero).unwrap());
        let evenodd = area_paths(&union_subjects(&[s], FillRule::EvenOdd).unwrap());
        assert!(nonzero > evenodd);
    }

    #[test]
    fn random_polygons_are_deterministic() {
        assert_eq!(random_polygons(7, 3, 5, 100), random_polygons(7, 3, 5, 100));
        assert_ne!(random_polygons(7, 3, 5, 100), random_polygons(8, 3, 5, 100));
    }
}
