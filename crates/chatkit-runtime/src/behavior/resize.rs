use crate::tracker::ControllerState;

use super::{BehaviorVariant, LayoutStrategy, RenderedLayout, ViewStyle};

/// Shrinks the tracked view to `initial_tracked_height - offset`.
///
/// Height and flex are only overridden while an offset is applied and a
/// frame is known; otherwise the view keeps its natural size, which is what
/// lets it grow back once the panel closes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resize;

impl LayoutStrategy for Resize {
    fn render(&self, state: &ControllerState, enabled: bool) -> RenderedLayout {
        let offset = state.effective_offset(enabled);
        let container = match (state.tracked_frame, state.initial_tracked_height) {
            (Some(_), Some(initial)) if offset > 0.0 => ViewStyle {
                height: Some((initial - offset).max(0.0)),
                flex: Some(0.0),
                ..ViewStyle::default()
            },
            _ => ViewStyle::default(),
        };
        RenderedLayout {
            behavior: BehaviorVariant::Resize,
            container,
            content: None,
        }
    }

    fn name(&self) -> &str {
        "resize"
    }
}
