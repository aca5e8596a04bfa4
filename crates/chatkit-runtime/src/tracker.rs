#![forbid(unsafe_code)]

//! Controller state and its transition function.
//!
//! [`ControllerState`] is advanced only by [`ControllerState::apply`], which
//! consumes the previous state and one [`ControllerEvent`] and returns the
//! next state plus an optional [`ScheduleRequest`] for the compensation
//! scheduler. Nothing else writes the state, which keeps the whole machine
//! testable as a pure function.
//!
//! # Invariants
//!
//! 1. `compensation_offset >= 0`.
//! 2. `compensation_offset` is only written by recomputation from
//!    `(tracked_frame, latest_panel_event, vertical_offset)`.
//! 3. `initial_tracked_height` is set by the first layout event and never
//!    overwritten.
//! 4. A schedule request is produced iff a recomputation changed
//!    `compensation_offset`.

use chatkit_core::{
    Frame, LayoutEvent, LifecycleState, PanelTransitionEvent, compute_displacement,
};
use web_time::Duration;

/// One input to the controller state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// The tracked view's geometry changed.
    Layout(LayoutEvent),
    /// A panel show/hide/resize transition with frame data.
    PanelTransition(PanelTransitionEvent),
    /// The panel finished appearing.
    PanelShown,
    /// The panel finished disappearing.
    PanelHidden,
    /// The application lifecycle changed.
    Lifecycle(LifecycleState),
}

impl ControllerEvent {
    /// Short label for logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Layout(_) => "layout",
            Self::PanelTransition(_) => "panel_transition",
            Self::PanelShown => "panel_shown",
            Self::PanelHidden => "panel_hidden",
            Self::Lifecycle(_) => "lifecycle",
        }
    }
}

/// Request handed to the scheduler when the offset changes.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRequest {
    /// Newly computed compensation offset.
    pub offset: f64,
    /// Timing metadata from the triggering panel event.
    pub duration: Option<Duration>,
    /// Easing name from the triggering panel event.
    pub easing: Option<String>,
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// State after the event.
    pub state: ControllerState,
    /// Work for the scheduler, if the offset changed.
    pub schedule: Option<ScheduleRequest>,
}

/// Everything the controller knows about the tracked view and the panel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControllerState {
    /// Latest frame of the tracked view, once laid out.
    pub tracked_frame: Option<Frame>,
    /// Height captured from the first layout event.
    pub initial_tracked_height: Option<f64>,
    /// Current displacement keeping the view clear of the panel.
    pub compensation_offset: f64,
    /// Whether the panel is on screen.
    pub panel_open: bool,
    /// Last lifecycle state observed.
    pub lifecycle: LifecycleState,
    /// Latest panel transition, used for recomputation on layout.
    pub latest_panel_event: Option<PanelTransitionEvent>,
}

impl ControllerState {
    /// Fresh state for a view mounted in `lifecycle`.
    #[must_use]
    pub fn new(lifecycle: LifecycleState) -> Self {
        Self {
            lifecycle,
            ..Self::default()
        }
    }

    /// Advance the state machine by one event.
    #[must_use]
    pub fn apply(mut self, event: &ControllerEvent, vertical_offset: f64) -> Transition {
        let schedule = match event {
            ControllerEvent::Layout(layout) => {
                self.tracked_frame = Some(layout.frame);
                if self.initial_tracked_height.is_none() {
                    self.initial_tracked_height = Some(layout.frame.height);
                }
                self.recompute(vertical_offset)
            }
            ControllerEvent::PanelTransition(panel) => {
                self.panel_open = panel.ends_open();
                self.latest_panel_event = Some(panel.clone());
                self.recompute(vertical_offset)
            }
            ControllerEvent::PanelShown => {
                self.panel_open = true;
                None
            }
            ControllerEvent::PanelHidden => {
                self.panel_open = false;
                None
            }
            ControllerEvent::Lifecycle(next) => {
                self.lifecycle = *next;
                None
            }
        };
        Transition {
            state: self,
            schedule,
        }
    }

    /// Offset actually applied to layout given the `enabled` flag.
    #[must_use]
    pub fn effective_offset(&self, enabled: bool) -> f64 {
        if enabled { self.compensation_offset } else { 0.0 }
    }

    fn recompute(&mut self, vertical_offset: f64) -> Option<ScheduleRequest> {
        let panel = self.latest_panel_event.as_ref();
        let offset = compute_displacement(
            self.tracked_frame.as_ref(),
            panel.and_then(|p| p.end_frame.as_ref()),
            vertical_offset,
        );
        if offset == self.compensation_offset {
            return None;
        }
        self.compensation_offset = offset;
        Some(ScheduleRequest {
            offset,
            duration: panel.and_then(|p| p.duration),
            easing: panel.and_then(|p| p.easing.clone()),
        })
    }
}
