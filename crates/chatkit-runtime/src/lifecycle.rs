#![forbid(unsafe_code)]

//! Lifecycle-scoped listener management.
//!
//! Panel listeners are only useful while the app is in the foreground.
//! [`LifecycleSubscriptionManager`] attaches the listener set when the app
//! enters the foreground and releases it when the app leaves.
//!
//! # Invariants
//!
//! 1. Handles are held only while the recorded state is
//!    [`LifecycleState::Foreground`]; leaving the foreground always empties
//!    the set.
//! 2. Entering the foreground with handles already held is a no-op, so the
//!    set never holds duplicates.
//! 3. After [`teardown`](LifecycleSubscriptionManager::teardown) no listener
//!    is ever attached again, whatever signal arrives.

use std::fmt;

use chatkit_core::LifecycleState;

use crate::listener::ListenerHandle;

/// Produces a fresh listener set each time the app is foregrounded.
pub type ListenerFactory = Box<dyn Fn() -> Vec<ListenerHandle>>;

/// Attaches and releases panel listeners across lifecycle transitions.
pub struct LifecycleSubscriptionManager {
    state: LifecycleState,
    mounted: bool,
    handles: Vec<ListenerHandle>,
    factory: ListenerFactory,
}

impl fmt::Debug for LifecycleSubscriptionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleSubscriptionManager")
            .field("state", &self.state)
            .field("mounted", &self.mounted)
            .field("handles", &self.handles)
            .finish_non_exhaustive()
    }
}

impl LifecycleSubscriptionManager {
    /// Create a mounted manager, attaching immediately if `initial` is
    /// foreground.
    #[must_use]
    pub fn new(initial: LifecycleState, factory: ListenerFactory) -> Self {
        let mut manager = Self {
            state: initial,
            mounted: true,
            handles: Vec::new(),
            factory,
        };
        if initial.is_foreground() {
            manager.attach();
        }
        manager
    }

    /// Apply a lifecycle signal.
    pub fn transition(&mut self, next: LifecycleState) {
        if next.is_foreground() {
            self.on_foreground();
        } else {
            self.leave_foreground(next);
        }
    }

    /// The app entered the foreground.
    ///
    /// Returns `true` if listeners were attached by this call.
    pub fn on_foreground(&mut self) -> bool {
        if !self.mounted {
            tracing::debug!(
                target: "chatkit.listener",
                "foreground signal after unmount ignored"
            );
            return false;
        }
        self.state = LifecycleState::Foreground;
        if !self.handles.is_empty() {
            return false;
        }
        self.attach();
        true
    }

    /// The app left the foreground.
    pub fn on_background(&mut self) {
        self.leave_foreground(LifecycleState::Background);
    }

    /// Release everything and refuse further attachment.
    pub fn teardown(&mut self) {
        self.mounted = false;
        self.release_all();
    }

    /// Last lifecycle state observed.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Number of listeners currently held.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.handles.len()
    }

    /// Whether the owning view is still mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn leave_foreground(&mut self, next: LifecycleState) {
        self.state = next;
        self.release_all();
    }

    fn attach(&mut self) {
        self.handles = (self.factory)();
        tracing::debug!(
            target: "chatkit.listener",
            count = self.handles.len(),
            "panel listeners attached"
        );
    }

    fn release_all(&mut self) {
        if self.handles.is_empty() {
            return;
        }
        let count = self.handles.len();
        for handle in self.handles.drain(..) {
            handle.release();
        }
        tracing::debug!(
            target: "chatkit.listener",
            count,
            "panel listeners released"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::{HeadlessPlatform, PanelHandler, PanelPlatform};
    use chatkit_core::{PanelEventKind, PanelTransitionEvent, Platform};
    use std::rc::Rc;

    fn manager_on(
        host: &Rc<HeadlessPlatform>,
        initial: LifecycleState,
    ) -> LifecycleSubscriptionManager {
        let host = Rc::clone(host);
        LifecycleSubscriptionManager::new(
            initial,
            Box::new(move || {
                let noop: PanelHandler = Rc::new(|_event: &PanelTransitionEvent| {});
                vec![
                    host.attach(PanelEventKind::DidShow, Rc::clone(&noop)),
                    host.attach(PanelEventKind::DidHide, noop),
                ]
            }),
        )
    }

    #[test]
    fn attaches_on_mount_when_foreground() {
        let host = Rc::new(HeadlessPlatform::new(Platform::Ios));
        let manager = manager_on(&host, LifecycleState::Foreground);
        assert_eq!(manager.active_count(), 2);
        assert_eq!(host.live_listener_count(), 2);
    }

    #[test]
    fn no_attach_on_mount_when_backgrounded() {
        let host = Rc::new(HeadlessPlatform::new(Platform::Ios));
        let manager = manager_on(&host, LifecycleState::Background);
        assert_eq!(manager.active_count(), 0);
        assert_eq!(host.live_listener_count(), 0);
    }

    #[test]
    fn background_releases_and_foreground_restores() {
        let host = Rc::new(HeadlessPlatform::new(Platform::Ios));
        let mut manager = manager_on(&host, LifecycleState::Foreground);
        let initial = manager.active_count();

        manager.on_background();
        assert_eq!(manager.active_count(), 0);
        assert_eq!(host.live_listener_count(), 0);
        assert_eq!(manager.state(), LifecycleState::Background);

        assert!(manager.on_foreground());
        assert_eq!(manager.active_count(), initial);
        assert_eq!(host.live_listener_count(), initial);
    }

    #[test]
    fn background_is_idempotent() {
        let host = Rc::new(HeadlessPlatform::new(Platform::Ios));
        let mut manager = manager_on(&host, LifecycleState::Foreground);
        manager.on_background();
        manager.on_background();
        manager.transition(LifecycleState::Inactive);
        assert_eq!(manager.active_count(), 0);
        assert_eq!(manager.state(), LifecycleState::Inactive);
    }

    #[test]
    fn repeated_foreground_does_not_duplicate() {
        let host = Rc::new(HeadlessPlatform::new(Platform::Ios));
        let mut manager = manager_on(&host, LifecycleState::Foreground);
        assert!(!manager.on_foreground());
        assert_eq!(manager.active_count(), 2);
        assert_eq!(host.live_listener_count(), 2);
    }

    #[test]
    fn foreground_after_teardown_is_skipped() {
        let host = Rc::new(HeadlessPlatform::new(Platform::Ios));
        let mut manager = manager_on(&host, LifecycleState::Foreground);
        manager.teardown();
        assert!(!manager.is_mounted());
        assert_eq!(host.live_listener_count(), 0);

        assert!(!manager.on_foreground());
        assert_eq!(manager.active_count(), 0);
        assert_eq!(host.live_listener_count(), 0);
    }
}
