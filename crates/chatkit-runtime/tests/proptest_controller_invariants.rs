//! Property-based invariant tests for the controller state machine.
//!
//! ## Invariants
//!
//! 1. Non-negativity: `compensation_offset >= 0` after any event sequence.
//! 2. Initial height: once captured, `initial_tracked_height` never changes.
//! 3. Coalescing: a schedule request is produced iff the offset changed, and
//!    the scheduler commits exactly those changes.
//! 4. Subscriptions: after a background signal, no panel listener is live.
//! 5. Determinism: the same event sequence yields the same final state.
//! 6. Host agreement: the last commit always equals the effective offset,
//!    across enable toggles.

use std::rc::Rc;

use chatkit_core::{Frame, LayoutEvent, LifecycleState, PanelTransitionEvent, Platform};
use chatkit_runtime::{
    CompensationScheduler, ControllerConfig, ControllerEvent, ControllerState, HeadlessPlatform,
    KeyboardCompatibleController,
};
use proptest::prelude::*;
use web_time::Duration;

// ── Strategies ────────────────────────────────────────────────────────────

fn arb_frame() -> impl Strategy<Value = Frame> {
    (0u16..=1200, 0u16..=1200, 0u16..=600)
        .prop_map(|(y, w, h)| Frame::new(0.0, f64::from(y), f64::from(w), f64::from(h)))
}

fn arb_panel_event() -> impl Strategy<Value = PanelTransitionEvent> {
    (
        prop::option::of(arb_frame()),
        prop::option::of((0u64..=400, prop::sample::select(vec!["keyboard", "linear", ""]))),
    )
        .prop_map(|(end, timing)| {
            let event = match end {
                Some(frame) => PanelTransitionEvent::opened(frame),
                None => PanelTransitionEvent::closed(),
            };
            match timing {
                Some((ms, easing)) => event.with_timing(Duration::from_millis(ms), easing),
                None => event,
            }
        })
}

fn arb_lifecycle() -> impl Strategy<Value = LifecycleState> {
    prop_oneof![
        Just(LifecycleState::Foreground),
        Just(LifecycleState::Background),
        Just(LifecycleState::Inactive),
    ]
}

fn arb_event() -> impl Strategy<Value = ControllerEvent> {
    prop_oneof![
        3 => arb_frame().prop_map(|f| ControllerEvent::Layout(LayoutEvent::new(f))),
        3 => arb_panel_event().prop_map(ControllerEvent::PanelTransition),
        1 => Just(ControllerEvent::PanelShown),
        1 => Just(ControllerEvent::PanelHidden),
        1 => arb_lifecycle().prop_map(ControllerEvent::Lifecycle),
    ]
}

fn arb_vertical_offset() -> impl Strategy<Value = f64> {
    (0u16..=200).prop_map(|v| f64::from(v) / 2.0)
}

// ── 1–3. Pure transition function ─────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn state_machine_invariants_hold(
        events in prop::collection::vec(arb_event(), 0..40),
        vertical_offset in arb_vertical_offset(),
    ) {
        let mut state = ControllerState::new(LifecycleState::Foreground);
        let mut scheduler = CompensationScheduler::default();
        let mut captured: Option<f64> = None;

        for event in &events {
            let before = state.compensation_offset;
            let transition = state.apply(event, vertical_offset);
            state = transition.state;

            prop_assert!(state.compensation_offset >= 0.0);

            if captured.is_some() {
                prop_assert_eq!(state.initial_tracked_height, captured);
            }
            captured = state.initial_tracked_height;

            let changed = state.compensation_offset != before;
            prop_assert_eq!(transition.schedule.is_some(), changed);
            if let Some(request) = transition.schedule {
                prop_assert!(scheduler.schedule_request(&request).is_some());
            }
            prop_assert_eq!(scheduler.committed().offset, state.compensation_offset);
        }
    }

    #[test]
    fn replay_is_deterministic(
        events in prop::collection::vec(arb_event(), 0..40),
        vertical_offset in arb_vertical_offset(),
    ) {
        let run = || {
            events.iter().fold(ControllerState::default(), |state, event| {
                state.apply(event, vertical_offset).state
            })
        };
        prop_assert_eq!(run(), run());
    }
}

// ── 4. Subscriptions through the controller ───────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn background_leaves_no_live_listeners(
        signals in prop::collection::vec(arb_lifecycle(), 1..20),
        android in any::<bool>(),
    ) {
        let platform = if android { Platform::Android } else { Platform::Ios };
        let host = Rc::new(HeadlessPlatform::new(platform));
        let controller =
            KeyboardCompatibleController::mount(host.clone(), ControllerConfig::new(platform));
        let full = controller.active_subscription_count();

        for signal in signals {
            controller.on_lifecycle(signal);
            if signal.is_foreground() {
                prop_assert_eq!(controller.active_subscription_count(), full);
            } else {
                prop_assert_eq!(controller.active_subscription_count(), 0);
                prop_assert_eq!(host.live_listener_count(), 0);
            }
        }

        drop(controller);
        prop_assert_eq!(host.live_listener_count(), 0);
    }
}

// ── 6. Commits follow the enabled flag ────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn last_commit_is_effective_offset(
        steps in prop::collection::vec(
            prop_oneof![
                4 => arb_event().prop_map(Ok),
                1 => any::<bool>().prop_map(Err),
            ],
            0..40,
        ),
    ) {
        let host = Rc::new(HeadlessPlatform::new(Platform::Ios));
        let controller =
            KeyboardCompatibleController::mount(host, ControllerConfig::new(Platform::Ios));

        for step in steps {
            match step {
                Ok(event) => {
                    controller.dispatch(event);
                }
                Err(enabled) => prop_assert!(controller.set_enabled(enabled)),
            }
            prop_assert_eq!(controller.last_commit().offset, controller.effective_offset());
        }
    }
}
