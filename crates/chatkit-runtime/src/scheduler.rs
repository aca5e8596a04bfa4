#![forbid(unsafe_code)]

//! Compensation scheduling.
//!
//! The scheduler turns a freshly computed offset into a [`LayoutCommit`]:
//! an atomic value the host applies to its layout, optionally animated.
//!
//! # Rules
//!
//! - Duration and easing both present: the commit animates over
//!   `max(duration, min_duration)`. Unknown easing names fall back to the
//!   keyboard curve. Hosts silently drop layout animations shorter than the
//!   floor, hence the clamp.
//! - Either missing (or an empty easing name): the commit is instant.
//! - An offset equal to the last committed one produces no commit.
//!
//! Commits queue up until the host drains them, like subscription messages
//! in a runtime loop.

use chatkit_core::{EasingCurve, LayoutTransition};
use web_time::Duration;

use crate::instrument;
use crate::tracker::ScheduleRequest;

/// Shortest animation the layout animator accepts.
pub const DEFAULT_MIN_ANIMATION_DURATION: Duration = Duration::from_millis(10);

/// A single state commit of the compensation offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCommit {
    /// Monotonic commit number; `0` is the implicit initial state.
    pub sequence: u64,
    /// Offset to apply.
    pub offset: f64,
    /// Animation for this commit, `None` for an instant jump.
    pub transition: Option<LayoutTransition>,
}

impl Default for LayoutCommit {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl LayoutCommit {
    const INITIAL: Self = Self {
        sequence: 0,
        offset: 0.0,
        transition: None,
    };

    /// Whether this commit animates.
    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.transition.is_some()
    }
}

/// Coalescing, animation-aware committer of compensation offsets.
#[derive(Debug, Clone)]
pub struct CompensationScheduler {
    min_duration: Duration,
    committed: LayoutCommit,
    outbox: Vec<LayoutCommit>,
}

impl Default for CompensationScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_ANIMATION_DURATION)
    }
}

impl CompensationScheduler {
    /// Create a scheduler with the given animation floor.
    #[must_use]
    pub fn new(min_duration: Duration) -> Self {
        Self {
            min_duration,
            committed: LayoutCommit::INITIAL,
            outbox: Vec::new(),
        }
    }

    /// Commit `new_offset`, animated when timing metadata allows.
    ///
    /// Returns the commit, or `None` when the offset is already committed.
    pub fn schedule(
        &mut self,
        new_offset: f64,
        duration: Option<Duration>,
        easing: Option<&str>,
    ) -> Option<LayoutCommit> {
        let new_offset = new_offset.max(0.0);
        if new_offset == self.committed.offset {
            return None;
        }

        let transition = match (duration, easing) {
            (Some(duration), Some(name)) if !name.is_empty() => Some(LayoutTransition::new(
                duration.max(self.min_duration),
                EasingCurve::resolve(name),
            )),
            _ => None,
        };

        let commit = LayoutCommit {
            sequence: self.committed.sequence + 1,
            offset: new_offset,
            transition,
        };
        // Whole-value replacement; readers never see a partial commit.
        self.committed = commit;
        self.outbox.push(commit);

        instrument::record_commit(
            commit.sequence,
            commit.offset,
            commit.transition.map(|t| t.duration.as_millis()),
        );
        Some(commit)
    }

    /// Schedule from a tracker request.
    pub fn schedule_request(&mut self, request: &ScheduleRequest) -> Option<LayoutCommit> {
        self.schedule(request.offset, request.duration, request.easing.as_deref())
    }

    /// Last committed value.
    #[must_use]
    pub fn committed(&self) -> LayoutCommit {
        self.committed
    }

    /// Number of commits made so far.
    #[must_use]
    pub fn commit_count(&self) -> u64 {
        self.committed.sequence
    }

    /// Animation floor in effect.
    #[must_use]
    pub fn min_duration(&self) -> Duration {
        self.min_duration
    }

    /// Take all commits not yet seen by the host, oldest first.
    pub fn drain_commits(&mut self) -> Vec<LayoutCommit> {
        std::mem::take(&mut self.outbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instant_commit_without_timing() {
        let mut s = CompensationScheduler::default();
        let commit = s.schedule(50.0, None, None).expect("commit");
        assert_eq!(commit.offset, 50.0);
        assert_eq!(commit.sequence, 1);
        assert!(!commit.is_animated());
    }

    #[test]
    fn missing_easing_is_instant() {
        let mut s = CompensationScheduler::default();
        let commit = s
            .schedule(50.0, Some(Duration::from_millis(250)), None)
            .expect("commit");
        assert!(!commit.is_animated());

        let commit = s
            .schedule(60.0, Some(Duration::from_millis(250)), Some(""))
            .expect("commit");
        assert!(!commit.is_animated());
    }

    #[test]
    fn animated_commit_uses_named_curve() {
        let mut s = CompensationScheduler::default();
        let commit = s
            .schedule(50.0, Some(Duration::from_millis(250)), Some("easeInEaseOut"))
            .expect("commit");
        let transition = commit.transition.expect("animated");
        assert_eq!(transition.duration, Duration::from_millis(250));
        assert_eq!(transition.easing, EasingCurve::EaseInEaseOut);
    }

    #[test]
    fn short_duration_is_floored() {
        let mut s = CompensationScheduler::default();
        let commit = s
            .schedule(50.0, Some(Duration::from_millis(5)), Some("keyboard"))
            .expect("commit");
        assert_eq!(
            commit.transition.map(|t| t.duration),
            Some(Duration::from_millis(10))
        );
    }

    #[test]
    fn unknown_curve_falls_back() {
        let mut s = CompensationScheduler::default();
        let commit = s
            .schedule(50.0, Some(Duration::from_millis(100)), Some("wobble"))
            .expect("commit");
        assert_eq!(
            commit.transition.map(|t| t.easing),
            Some(EasingCurve::Keyboard)
        );
    }

    #[test]
    fn same_offset_twice_commits_once() {
        let mut s = CompensationScheduler::default();
        assert!(s.schedule(50.0, None, None).is_some());
        assert!(s.schedule(50.0, None, None).is_none());
        assert_eq!(s.commit_count(), 1);
        assert_eq!(s.drain_commits().len(), 1);
    }

    #[test]
    fn zero_on_fresh_scheduler_is_noop() {
        let mut s = CompensationScheduler::default();
        assert!(s.schedule(0.0, None, None).is_none());
        assert!(s.schedule(-3.0, None, None).is_none());
    }

    #[test]
    fn drain_empties_outbox() {
        let mut s = CompensationScheduler::new(Duration::from_millis(16));
        s.schedule(10.0, None, None);
        s.schedule(20.0, None, None);
        let drained = s.drain_commits();
        assert_eq!(
            drained.iter().map(|c| c.offset).collect::<Vec<_>>(),
            vec![10.0, 20.0]
        );
        assert!(s.drain_commits().is_empty());
        assert_eq!(s.committed().offset, 20.0);
        assert_eq!(s.min_duration(), Duration::from_millis(16));
    }
}
