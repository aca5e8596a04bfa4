#![forbid(unsafe_code)]

//! Core: geometry, host panel events, and easing curves.
//!
//! # Role in chatkit
//! `chatkit-core` is the input layer. It defines the frames, panel
//! transition notifications and lifecycle states that a host platform
//! delivers, plus the pure displacement calculation the controller is
//! built on.
//!
//! # How it fits in the system
//! The runtime (`chatkit-runtime`) consumes these types to drive the
//! panel-avoiding controller. Nothing in this crate holds state or talks to
//! a platform, so everything here is deterministic and cheap to test.

pub mod easing;
pub mod event;
pub mod geometry;

pub use easing::{EasingCurve, EasingFn, LayoutTransition};
pub use event::{LayoutEvent, LifecycleState, PanelEventKind, PanelTransitionEvent, Platform};
pub use geometry::{Frame, compute_displacement};
