use criterion::{black_box, criterion_group, criterion_main, Criterion};

use polysweep::{
    generators::{checkerboard, star},
    inflate_paths, rect_clip, EndType, JoinType, Point64, Rect64,
};

fn inflate(c: &mut Criterion) {
    let (squares, _) = checkerboard(10);
    for (name, join) in [
        ("square", JoinType::Square),
        ("round", JoinType::Round),
        ("miter", JoinType::Miter),
    ] {
        c.bench_function(&format!("inflate checkerboard {name}"), |b| {
            b.iter(|| black_box(inflate_paths(&squares, 5.0, join, EndType::Polygon, 2.0)))
        });
    }

    let stars = vec![star(Point64::new(0, 0), 1000.0, 101, 50)];
    c.bench_function("inflate star round", |b| {
        b.iter(|| black_box(inflate_paths(&stars, 10.0, JoinType::Round, EndType::Polygon, 2.0)))
    });
}

fn clip_to_rect(c: &mut Criterion) {
    let stars = vec![star(Point64::new(0, 0), 1000.0, 101, 50)];
    let rect = Rect64::new(-500, -500, 500, 500);
    c.bench_function("rect clip star", |b| b.iter(|| black_box(rect_clip(rect, &stars))));
}

criterion_group!(benches, inflate, clip_to_rect);
criterion_main!(benches);
