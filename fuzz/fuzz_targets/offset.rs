#![no_main]

use arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;
use polysweep::{arbitrary as gen, ClipperOffset, Error};

fn check_offset(mut u: Unstructured) -> Result<(), arbitrary::Error> {
    let paths = gen::paths64(1000, 4, 10, &mut u)?;
    let join = gen::join_type(&mut u)?;
    let end = gen::end_type(&mut u)?;
    let delta = gen::coord_in_range(-200, 200, &mut u)? as f64 / 4.0;

    let mut co = ClipperOffset::new();
    co.add_paths(&paths, join, end);
    match co.execute(delta) {
        Ok(out) => assert!(out.iter().all(|p| p.len() >= 3)),
        Err(e) => assert_eq!(e, Error::SweepFailed),
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let _ = check_offset(Unstructured::new(data));
});
