#![forbid(unsafe_code)]

//! chatkit public facade crate.
//!
//! Re-exports the controller that keeps a chat view clear of the on-screen
//! keyboard, along with the geometry and event types hosts feed it, and a
//! prelude for day-to-day usage.
//!
//! ```rust,ignore
//! use chatkit::prelude::*;
//!
//! let host = Rc::new(HeadlessPlatform::new(Platform::Ios));
//! let controller = KeyboardCompatibleController::mount(host.clone(), ControllerConfig::default());
//! controller.on_layout(Frame::new(0.0, 500.0, 320.0, 100.0));
//! let layout = controller.render();
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use chatkit_core::{
    EasingCurve, Frame, LayoutEvent, LayoutTransition, LifecycleState, PanelEventKind,
    PanelTransitionEvent, Platform, compute_displacement,
};

// --- Runtime re-exports ----------------------------------------------------

pub use chatkit_runtime::{
    BehaviorVariant, ConfigError, ControllerConfig, ControllerEvent, ControllerState,
    DismissError, DismissFuture, HeadlessPlatform, KeyboardCompatibleController, KeyboardContext,
    LayoutCommit, LayoutStrategy, ListenerHandle, PanelHandler, PanelPlatform, RenderedLayout,
    ViewStyle,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for chatkit.
#[derive(Debug)]
pub enum Error {
    /// A dismiss wait was cut short.
    Dismiss(DismissError),
    /// Controller configuration could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dismiss(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Dismiss(err) => Some(err),
            Self::Config(err) => Some(err),
        }
    }
}

impl From<DismissError> for Error {
    fn from(err: DismissError) -> Self {
        Self::Dismiss(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for chatkit APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        BehaviorVariant, ControllerConfig, Error, Frame, HeadlessPlatform,
        KeyboardCompatibleController, KeyboardContext, LifecycleState, PanelPlatform,
        PanelTransitionEvent, Platform, RenderedLayout, Result,
    };

    pub use crate::{core, runtime};

    pub use std::rc::Rc;
}

pub use chatkit_core as core;
pub use chatkit_runtime as runtime;
