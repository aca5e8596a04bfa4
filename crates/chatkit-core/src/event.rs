#![forbid(unsafe_code)]

//! Host event types.
//!
//! These are the notifications a host platform delivers to the controller:
//! panel transitions, layout changes of the tracked view, and application
//! lifecycle changes. All types derive `Clone` and `PartialEq` for use in
//! tests and pattern matching.

use web_time::Duration;

use crate::geometry::Frame;

/// Host platform flavour.
///
/// Decides which panel notifications are available and the default layout
/// behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Platform {
    /// Delivers a single "will change frame" notification per transition.
    #[default]
    Ios,
    /// Delivers separate "did show" and "did hide" notifications.
    Android,
}

impl Platform {
    /// Panel notification kinds that carry frame data on this platform.
    #[must_use]
    pub const fn transition_kinds(self) -> &'static [PanelEventKind] {
        match self {
            Self::Ios => &[PanelEventKind::WillChangeFrame],
            Self::Android => &[PanelEventKind::DidHide, PanelEventKind::DidShow],
        }
    }
}

/// Kind of panel notification a listener can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelEventKind {
    /// The panel is about to move or resize (show, hide or frame change).
    WillChangeFrame,
    /// The panel finished appearing.
    DidShow,
    /// The panel finished disappearing.
    DidHide,
}

impl PanelEventKind {
    /// Host-side notification name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WillChangeFrame => "keyboardWillChangeFrame",
            Self::DidShow => "keyboardDidShow",
            Self::DidHide => "keyboardDidHide",
        }
    }
}

/// One show/hide/resize transition of the virtual input panel.
///
/// `end_frame` is authoritative for overlap; `None` means the panel ends
/// fully closed. Timing fields drive animation pacing and may be absent.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PanelTransitionEvent {
    /// Panel frame before the transition.
    pub start_frame: Option<Frame>,
    /// Panel frame after the transition.
    pub end_frame: Option<Frame>,
    /// Transition duration reported by the host.
    pub duration: Option<Duration>,
    /// Host easing curve name, e.g. `"keyboard"` or `"easeInEaseOut"`.
    pub easing: Option<String>,
}

impl PanelTransitionEvent {
    /// A transition that ends with the panel at `end_frame`.
    #[must_use]
    pub fn opened(end_frame: Frame) -> Self {
        Self {
            end_frame: Some(end_frame),
            ..Self::default()
        }
    }

    /// A transition that ends with the panel fully closed.
    #[must_use]
    pub fn closed() -> Self {
        Self::default()
    }

    /// Attach timing metadata.
    #[must_use]
    pub fn with_timing(mut self, duration: Duration, easing: impl Into<String>) -> Self {
        self.duration = Some(duration);
        self.easing = Some(easing.into());
        self
    }

    /// Attach the frame the panel started from.
    #[must_use]
    pub fn with_start_frame(mut self, start_frame: Frame) -> Self {
        self.start_frame = Some(start_frame);
        self
    }

    /// Whether the panel is on screen once this transition completes.
    #[must_use]
    pub const fn ends_open(&self) -> bool {
        self.end_frame.is_some()
    }
}

/// The tracked view's geometry changed (resize, reflow, rotation).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutEvent {
    /// New frame of the tracked view.
    pub frame: Frame,
}

impl LayoutEvent {
    /// Create a layout event.
    #[must_use]
    pub const fn new(frame: Frame) -> Self {
        Self { frame }
    }
}

/// Application lifecycle state reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LifecycleState {
    /// App is visible and receiving input.
    #[default]
    Foreground,
    /// App is not visible.
    Background,
    /// App is visible but not receiving input (e.g. during a system overlay).
    Inactive,
}

impl LifecycleState {
    /// Parse a host app-state string (`"active"`, `"background"`, `"inactive"`).
    ///
    /// Unknown strings return `None`.
    #[must_use]
    pub fn parse(state: &str) -> Option<Self> {
        match state {
            "active" | "foreground" => Some(Self::Foreground),
            "background" => Some(Self::Background),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }

    /// Whether the app is in the foreground.
    #[must_use]
    pub const fn is_foreground(self) -> bool {
        matches!(self, Self::Foreground)
    }
}
