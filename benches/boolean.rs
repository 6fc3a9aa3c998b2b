use criterion::{black_box, criterion_group, criterion_main, Criterion};

use polysweep::{
    boolean_op,
    generators::{checkerboard, random_polygons, slanted_checkerboard, slanties},
    union_subjects, ClipType, FillRule, Paths64,
};

fn xor(c: &mut Criterion) {
    let (even, odd) = checkerboard(10);
    c.bench_function("xor checkerboard", |b| {
        b.iter(|| black_box(boolean_op(ClipType::Xor, &even, &odd, FillRule::EvenOdd)))
    });

    let (even, odd) = slanted_checkerboard(10);
    c.bench_function("xor slanted checkerboard", |b| {
        b.iter(|| black_box(boolean_op(ClipType::Xor, &even, &odd, FillRule::EvenOdd)))
    });

    let to_float_arrays = |paths: &Paths64| -> Vec<Vec<[f64; 2]>> {
        paths
            .iter()
            .map(|p| p.iter().map(|pt| [pt.x as f64, pt.y as f64]).collect())
            .collect()
    };
    let (even, odd) = checkerboard(10);
    let (even, odd) = (to_float_arrays(&even), to_float_arrays(&odd));
    c.bench_function("xor checkerboard i_overlay", |b| {
        b.iter(|| {
            use i_overlay::float::single::SingleFloatOverlay;
            black_box(even.overlay(
                &odd,
                i_overlay::core::overlay_rule::OverlayRule::Xor,
                i_overlay::core::fill_rule::FillRule::EvenOdd,
            ))
        });
    });
}

fn intersections(c: &mut Criterion) {
    // Every even strip crosses every odd one.
    let (even, odd) = slanties(50);
    c.bench_function("intersect slanties", |b| {
        b.iter(|| black_box(boolean_op(ClipType::Intersection, &even, &odd, FillRule::NonZero)))
    });
}

fn self_union(c: &mut Criterion) {
    let polys = random_polygons(1, 20, 20, 10_000);
    c.bench_function("union random polygons", |b| {
        b.iter(|| black_box(union_subjects(&polys, FillRule::NonZero)))
    });
}

criterion_group!(benches, xor, intersections, self_union);
criterion_main!(benches);
