#![no_main]

use chatkit_core::{Frame, compute_displacement};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: ([f64; 4], Option<[f64; 4]>, f64)| {
    let (t, p, vertical_offset) = input;
    let tracked = Frame::new(t[0], t[1], t[2], t[3]);
    let panel = p.map(|p| Frame::new(p[0], p[1], p[2], p[3]));

    // Arbitrary floats include NaN and infinities; the result must still be
    // a usable offset.
    let d = compute_displacement(Some(&tracked), panel.as_ref(), vertical_offset);
    assert!(d >= 0.0, "negative or NaN displacement: {d}");

    if panel.is_none() {
        assert_eq!(d, 0.0);
    }
});
