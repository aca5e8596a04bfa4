#![no_main]

use std::rc::Rc;

use arbitrary::Arbitrary;
use chatkit_core::{Frame, PanelEventKind, PanelTransitionEvent, Platform};
use chatkit_runtime::{
    BehaviorVariant, ControllerConfig, HeadlessPlatform, KeyboardCompatibleController,
};
use libfuzzer_sys::fuzz_target;
use web_time::Duration;

#[derive(Debug, Arbitrary)]
enum Op {
    Layout { y: u16, height: u16 },
    Show { y: u16, ms: Option<u16>, easing: u8 },
    Hide,
    RawShown,
    RawHidden,
    AppState(u8),
    Dismiss,
    Toggle(bool),
    Drain,
}

#[derive(Debug, Arbitrary)]
struct Input {
    android: bool,
    behavior: u8,
    vertical_offset: u8,
    ops: Vec<Op>,
}

const EASINGS: [&str; 4] = ["keyboard", "linear", "wobble", ""];
const APP_STATES: [&str; 4] = ["active", "background", "inactive", "unknown"];
const BEHAVIORS: [BehaviorVariant; 4] = [
    BehaviorVariant::Resize,
    BehaviorVariant::Reposition,
    BehaviorVariant::Pad,
    BehaviorVariant::Passthrough,
];

fuzz_target!(|input: Input| {
    let platform = if input.android { Platform::Android } else { Platform::Ios };
    let host = Rc::new(HeadlessPlatform::new(platform));
    let config = ControllerConfig::new(platform)
        .behavior(BEHAVIORS[usize::from(input.behavior) % BEHAVIORS.len()])
        .vertical_offset(f64::from(input.vertical_offset));
    let controller = KeyboardCompatibleController::mount(host.clone(), config);
    let mut futures = Vec::new();
    let mut initial_height = None;

    for op in input.ops.into_iter().take(256) {
        match op {
            Op::Layout { y, height } => {
                controller.on_layout(Frame::new(0.0, f64::from(y), 320.0, f64::from(height)));
            }
            Op::Show { y, ms, easing } => {
                let frame = Frame::new(0.0, f64::from(y), 320.0, 300.0);
                let mut event = PanelTransitionEvent::opened(frame);
                if let Some(ms) = ms {
                    event = event.with_timing(
                        Duration::from_millis(u64::from(ms)),
                        EASINGS[usize::from(easing) % EASINGS.len()],
                    );
                }
                host.show(&event);
            }
            Op::Hide => host.hide(),
            Op::RawShown => {
                host.emit(PanelEventKind::DidShow, &PanelTransitionEvent::closed());
            }
            Op::RawHidden => {
                host.emit(PanelEventKind::DidHide, &PanelTransitionEvent::closed());
            }
            Op::AppState(i) => {
                controller.on_app_state(APP_STATES[usize::from(i) % APP_STATES.len()]);
            }
            Op::Dismiss => futures.push(controller.request_dismiss()),
            Op::Toggle(enabled) => {
                assert!(controller.set_enabled(enabled));
            }
            Op::Drain => {
                for commit in controller.drain_commits() {
                    assert!(commit.offset >= 0.0);
                    if let Some(t) = commit.transition {
                        assert!(t.duration >= Duration::from_millis(10));
                    }
                }
            }
        }

        let state = controller.state();
        assert!(state.compensation_offset >= 0.0);
        assert_eq!(controller.last_commit().offset, controller.effective_offset());
        if let Some(h) = initial_height {
            assert_eq!(state.initial_tracked_height, Some(h));
        }
        initial_height = state.initial_tracked_height;
        if !state.lifecycle.is_foreground() {
            assert_eq!(controller.active_subscription_count(), 0);
        }
    }

    drop(controller);
    assert_eq!(host.live_listener_count(), 0);
    drop(futures);
});
