//! Property-based invariant tests for the displacement calculation.
//!
//! ## Invariants
//!
//! 1. Non-negativity: the result is always `>= 0`.
//! 2. Non-overlap: a tracked bottom at or above the panel's effective top yields `0`.
//! 3. Overlap: otherwise the result equals the exact overlap.
//! 4. Monotonicity: raising the panel never decreases the displacement.

use chatkit_core::{Frame, compute_displacement};
use proptest::prelude::*;

// ── Strategies ────────────────────────────────────────────────────────────

fn arb_coord() -> impl Strategy<Value = f64> {
    (-2000i32..=4000).prop_map(|v| f64::from(v) / 2.0)
}

fn arb_extent() -> impl Strategy<Value = f64> {
    (0i32..=2000).prop_map(|v| f64::from(v) / 2.0)
}

fn arb_frame() -> impl Strategy<Value = Frame> {
    (arb_coord(), arb_coord(), arb_extent(), arb_extent())
        .prop_map(|(x, y, w, h)| Frame::new(x, y, w, h))
}

fn arb_offset() -> impl Strategy<Value = f64> {
    (0i32..=400).prop_map(|v| f64::from(v) / 4.0)
}

// ── 1. Non-negativity ─────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn displacement_is_never_negative(
        tracked in prop::option::of(arb_frame()),
        panel in prop::option::of(arb_frame()),
        offset in arb_offset(),
    ) {
        let d = compute_displacement(tracked.as_ref(), panel.as_ref(), offset);
        prop_assert!(d >= 0.0, "d={d}");
    }
}

// ── 2/3. Non-overlap and exact overlap ────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn displacement_matches_overlap(
        tracked in arb_frame(),
        panel in arb_frame(),
        offset in arb_offset(),
    ) {
        let d = compute_displacement(Some(&tracked), Some(&panel), offset);
        let tracked_bottom = tracked.y + tracked.height;
        let panel_top = panel.y - offset;
        if tracked_bottom <= panel_top {
            prop_assert_eq!(d, 0.0);
        } else {
            prop_assert!((d - (tracked_bottom - panel_top)).abs() < 1e-9, "d={d}");
        }
    }
}

// ── 4. Monotonicity ───────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn raising_panel_never_reduces_displacement(
        tracked in arb_frame(),
        panel in arb_frame(),
        lift in arb_extent(),
    ) {
        let lower = compute_displacement(Some(&tracked), Some(&panel), 0.0);
        let raised_panel = Frame::new(panel.x, panel.y - lift, panel.width, panel.height);
        let higher = compute_displacement(Some(&tracked), Some(&raised_panel), 0.0);
        prop_assert!(higher >= lower, "lower={lower} higher={higher}");
    }
}
