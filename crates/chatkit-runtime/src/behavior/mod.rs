//! Layout behaviors for the tracked view.
//!
//! A [`LayoutStrategy`] turns controller state into a [`RenderedLayout`]:
//! the style overrides the host applies to the tracked view and, for some
//! behaviors, to an inner content region. Strategies are pure; they never
//! read or write controller state beyond the reference they are given.
//!
//! # Standalone structs vs. convenience enum
//!
//! Each behavior has a standalone struct ([`Resize`], [`Reposition`],
//! [`Pad`], [`Passthrough`]) implementing [`LayoutStrategy`] directly.
//! [`BehaviorVariant`] selects among them from configuration and delegates
//! to the same logic.

mod pad;
mod passthrough;
mod reposition;
mod resize;

pub use pad::Pad;
pub use passthrough::Passthrough;
pub use reposition::Reposition;
pub use resize::Resize;

use chatkit_core::Platform;

use crate::tracker::ControllerState;

/// Style overrides for one view.
///
/// `None` fields leave the host's own styling untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewStyle {
    /// Fixed height.
    pub height: Option<f64>,
    /// Flex factor; `Some(0.0)` disables flex sizing.
    pub flex: Option<f64>,
    /// Bottom padding.
    pub padding_bottom: Option<f64>,
    /// Bottom inset (distance from the container's bottom edge).
    pub bottom: Option<f64>,
}

impl ViewStyle {
    /// Whether no override is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Output of a layout strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedLayout {
    /// Behavior that produced this layout.
    pub behavior: BehaviorVariant,
    /// Overrides for the tracked view itself.
    pub container: ViewStyle,
    /// Overrides for the inner content region, when the behavior uses one.
    pub content: Option<ViewStyle>,
}

impl RenderedLayout {
    /// Height the tracked view ends up with, given its natural height.
    #[must_use]
    pub fn resolved_height(&self, natural: f64) -> f64 {
        self.container.height.unwrap_or(natural)
    }

    /// Whether any override is applied.
    #[must_use]
    pub fn is_adjusted(&self) -> bool {
        !self.container.is_empty() || self.content.is_some_and(|c| !c.is_empty())
    }
}

/// Renders the tracked view from controller state.
pub trait LayoutStrategy {
    /// Produce style overrides. `enabled == false` forces a zero offset.
    fn render(&self, state: &ControllerState, enabled: bool) -> RenderedLayout;

    /// Human-readable strategy name for logs/debugging.
    fn name(&self) -> &str;
}

/// Built-in behavior selection.
///
/// Fixed for the lifetime of a mounted controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config-files", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config-files", serde(rename_all = "lowercase"))]
pub enum BehaviorVariant {
    /// Shrink the view's height by the offset.
    #[cfg_attr(feature = "config-files", serde(alias = "height"))]
    Resize,
    /// Shift an inner content region up by the offset.
    #[cfg_attr(feature = "config-files", serde(alias = "position"))]
    Reposition,
    /// Add bottom padding equal to the offset.
    #[cfg_attr(feature = "config-files", serde(alias = "padding"))]
    Pad,
    /// Track the offset but leave layout alone.
    #[cfg_attr(feature = "config-files", serde(alias = "none"))]
    Passthrough,
}

impl BehaviorVariant {
    /// Default behavior for a platform.
    #[must_use]
    pub const fn default_for(platform: Platform) -> Self {
        match platform {
            Platform::Ios => Self::Pad,
            Platform::Android => Self::Reposition,
        }
    }

    /// Parse a behavior name, accepting host aliases.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "resize" | "height" => Some(Self::Resize),
            "reposition" | "position" => Some(Self::Reposition),
            "pad" | "padding" => Some(Self::Pad),
            "passthrough" | "none" => Some(Self::Passthrough),
            _ => None,
        }
    }
}

impl LayoutStrategy for BehaviorVariant {
    fn render(&self, state: &ControllerState, enabled: bool) -> RenderedLayout {
        match self {
            Self::Resize => Resize.render(state, enabled),
            Self::Reposition => Reposition.render(state, enabled),
            Self::Pad => Pad.render(state, enabled),
            Self::Passthrough => Passthrough.render(state, enabled),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Resize => "resize",
            Self::Reposition => "reposition",
            Self::Pad => "pad",
            Self::Passthrough => "passthrough",
        }
    }
}
