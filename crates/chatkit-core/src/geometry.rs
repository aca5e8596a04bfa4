#![forbid(unsafe_code)]

//! Geometric primitives and the panel displacement calculation.

/// A screen-space rectangle in logical units.
///
/// Origin is the top-left corner of the screen; `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width in logical units.
    pub width: f64,
    /// Height in logical units.
    pub height: f64,
}

impl Frame {
    /// Create a new frame.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top edge (alias for y).
    #[inline]
    pub const fn top(&self) -> f64 {
        self.y
    }

    /// Bottom edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Right edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Check if the frame has zero or negative area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Same frame with the height replaced.
    #[must_use]
    pub const fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }
}

/// Vertical displacement needed so the tracked view no longer overlaps the panel.
///
/// `vertical_offset` moves the panel's effective top edge upward, which keeps
/// fixed chrome (an input toolbar, say) visible above the panel.
///
/// Returns `0.0` when either frame is absent or when the two do not overlap.
/// The result is never negative; a NaN overlap collapses to `0.0`.
#[must_use]
pub fn compute_displacement(
    tracked: Option<&Frame>,
    panel_end: Option<&Frame>,
    vertical_offset: f64,
) -> f64 {
    let (Some(tracked), Some(panel)) = (tracked, panel_end) else {
        return 0.0;
    };

    let panel_top = panel.y - vertical_offset;
    let overlap = tracked.bottom() - panel_top;
    // f64::max returns the non-NaN operand.
    overlap.max(0.0)
}

#[cfg(test)]
mod tests {
    use super::{Frame, compute_displacement};

    #[test]
    fn frame_edges() {
        let frame = Frame::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(frame.top(), 20.0);
        assert_eq!(frame.bottom(), 60.0);
        assert_eq!(frame.right(), 40.0);
        assert!(!frame.is_empty());
        assert!(Frame::new(0.0, 0.0, 0.0, 10.0).is_empty());
    }

    #[test]
    fn overlap_scenario() {
        let tracked = Frame::new(0.0, 500.0, 300.0, 100.0);
        let panel = Frame::new(0.0, 550.0, 300.0, 300.0);
        assert_eq!(compute_displacement(Some(&tracked), Some(&panel), 0.0), 50.0);
    }

    #[test]
    fn vertical_offset_raises_panel_edge() {
        let tracked = Frame::new(0.0, 500.0, 300.0, 100.0);
        let panel = Frame::new(0.0, 550.0, 300.0, 300.0);
        assert_eq!(
            compute_displacement(Some(&tracked), Some(&panel), 66.5),
            116.5
        );
    }

    #[test]
    fn missing_frames_yield_zero() {
        let frame = Frame::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(compute_displacement(None, Some(&frame), 0.0), 0.0);
        assert_eq!(compute_displacement(Some(&frame), None, 0.0), 0.0);
        assert_eq!(compute_displacement(None, None, 12.0), 0.0);
    }

    #[test]
    fn non_overlapping_is_zero() {
        let tracked = Frame::new(0.0, 0.0, 300.0, 100.0);
        let panel = Frame::new(0.0, 550.0, 300.0, 300.0);
        assert_eq!(compute_displacement(Some(&tracked), Some(&panel), 0.0), 0.0);
    }

    #[test]
    fn nan_collapses_to_zero() {
        let tracked = Frame::new(0.0, f64::NAN, 300.0, 100.0);
        let panel = Frame::new(0.0, 550.0, 300.0, 300.0);
        assert_eq!(compute_displacement(Some(&tracked), Some(&panel), 0.0), 0.0);
    }
}
