use crate::tracker::ControllerState;

use super::{BehaviorVariant, LayoutStrategy, RenderedLayout, ViewStyle};

/// Sets the tracked view's bottom padding to the offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pad;

impl LayoutStrategy for Pad {
    fn render(&self, state: &ControllerState, enabled: bool) -> RenderedLayout {
        RenderedLayout {
            behavior: BehaviorVariant::Pad,
            container: ViewStyle {
                padding_bottom: Some(state.effective_offset(enabled)),
                ..ViewStyle::default()
            },
            content: None,
        }
    }

    fn name(&self) -> &str {
        "pad"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_tracks_offset() {
        let state = ControllerState {
            compensation_offset: 30.0,
            ..ControllerState::default()
        };
        assert_eq!(Pad.render(&state, true).container.padding_bottom, Some(30.0));
        assert_eq!(Pad.render(&state, false).container.padding_bottom, Some(0.0));
    }
}
