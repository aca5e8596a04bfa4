use crate::tracker::ControllerState;

use super::{BehaviorVariant, LayoutStrategy, RenderedLayout, ViewStyle};

/// Lifts an inner content region by the offset; the outer frame is untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reposition;

impl LayoutStrategy for Reposition {
    fn render(&self, state: &ControllerState, enabled: bool) -> RenderedLayout {
        RenderedLayout {
            behavior: BehaviorVariant::Reposition,
            container: ViewStyle::default(),
            content: Some(ViewStyle {
                bottom: Some(state.effective_offset(enabled)),
                ..ViewStyle::default()
            }),
        }
    }

    fn name(&self) -> &str {
        "reposition"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_bottom_tracks_offset() {
        let state = ControllerState {
            compensation_offset: 42.0,
            ..ControllerState::default()
        };
        let layout = Reposition.render(&state, true);
        assert!(layout.container.is_empty());
        assert_eq!(layout.content.and_then(|c| c.bottom), Some(42.0));

        let disabled = Reposition.render(&state, false);
        assert_eq!(disabled.content.and_then(|c| c.bottom), Some(0.0));
    }
}
