#![no_main]

use arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;
use polysweep::{arbitrary as gen, rect_clip, rect_clip_lines, Point64, Rect64};

fn check_rect_clip(mut u: Unstructured) -> Result<(), arbitrary::Error> {
    let paths = gen::paths64(1000, 4, 12, &mut u)?;
    let a = gen::point64(1000, &mut u)?;
    let b = gen::point64(1000, &mut u)?;
    let rect = Rect64::new(a.x.min(b.x), a.y.min(b.y), a.x.max(b.x), a.y.max(b.y));

    let on_or_inside = |p: &Point64| p.x >= rect.left && p.x <= rect.right && p.y >= rect.top && p.y <= rect.bottom;
    for path in rect_clip(rect, &paths) {
        assert!(path.iter().all(on_or_inside));
    }
    for line in rect_clip_lines(rect, &paths) {
        assert!(line.iter().all(on_or_inside));
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let _ = check_rect_clip(Unstructured::new(data));
});
