#![forbid(unsafe_code)]

//! Runtime: the panel-avoiding controller and everything it drives.
//!
//! # Role in chatkit
//! `chatkit-runtime` turns host panel notifications into layout commits for
//! one tracked view. It owns listener attachment across app lifecycle
//! changes, coalesces offset changes into animated commits, and coordinates
//! "close the panel, then continue" requests.
//!
//! # Primary responsibilities
//! - **KeyboardCompatibleController**: mount, feed layout and lifecycle
//!   events, render style overrides.
//! - **PanelPlatform**: the host capability for attaching listeners and
//!   closing the panel. [`HeadlessPlatform`] drives it from tests.
//! - **CompensationScheduler**: commits offsets with the platform's timing.
//! - **DismissCoordinator**: resolves dismiss futures on the next close.
//!
//! # How it fits in the system
//! Geometry, events and easing come from `chatkit-core`. The `chatkit`
//! facade re-exports this crate and adds a unified error type.

pub mod behavior;
pub mod config;
pub mod context;
pub mod controller;
pub mod dismiss;
pub mod instrument;
pub mod lifecycle;
pub mod listener;
pub mod scheduler;
pub mod tracker;

pub use behavior::{
    BehaviorVariant, LayoutStrategy, Pad, Passthrough, RenderedLayout, Reposition, Resize,
    ViewStyle,
};
pub use config::{ConfigError, ControllerConfig, DEFAULT_VERTICAL_OFFSET};
pub use context::KeyboardContext;
pub use controller::KeyboardCompatibleController;
pub use dismiss::{DismissCoordinator, DismissError, DismissFuture};
pub use lifecycle::{LifecycleSubscriptionManager, ListenerFactory};
pub use listener::{
    HeadlessPlatform, ListenerHandle, ListenerId, PanelEventBus, PanelHandler, PanelPlatform,
};
pub use scheduler::{CompensationScheduler, DEFAULT_MIN_ANIMATION_DURATION, LayoutCommit};
pub use tracker::{ControllerEvent, ControllerState, ScheduleRequest, Transition};
