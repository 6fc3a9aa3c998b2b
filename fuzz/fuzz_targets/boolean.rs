#![no_main]

use arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;
use polysweep::{arbitrary as gen, boolean_op, paths::area_paths, Error};

fn check_boolean(mut u: Unstructured) -> Result<(), arbitrary::Error> {
    let subjects = gen::paths64(1000, 5, 12, &mut u)?;
    let clips = gen::paths64(1000, 5, 12, &mut u)?;
    let op = gen::clip_type(&mut u)?;
    let fill_rule = gen::fill_rule(&mut u)?;

    match boolean_op(op, &subjects, &clips, fill_rule) {
        Ok(out) => {
            assert!(out.iter().all(|p| p.len() >= 3));
            // Holes are nested in outers, so they can't outweigh them.
            assert!(area_paths(&out) >= 0.0);
        }
        Err(e) => assert_eq!(e, Error::SweepFailed),
    }
    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let _ = check_boolean(Unstructured::new(data));
});
