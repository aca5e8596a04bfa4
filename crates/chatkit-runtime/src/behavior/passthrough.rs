use crate::tracker::ControllerState;

use super::{BehaviorVariant, LayoutStrategy, RenderedLayout, ViewStyle};

/// Leaves layout alone; the caller reads the offset and lays out manually.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl LayoutStrategy for Passthrough {
    fn render(&self, _state: &ControllerState, _enabled: bool) -> RenderedLayout {
        RenderedLayout {
            behavior: BehaviorVariant::Passthrough,
            container: ViewStyle::default(),
            content: None,
        }
    }

    fn name(&self) -> &str {
        "passthrough"
    }
}
