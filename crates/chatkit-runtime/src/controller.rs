#![forbid(unsafe_code)]

//! The panel-avoiding controller.
//!
//! [`KeyboardCompatibleController`] owns one tracked view's compensation
//! state. It wires the pieces of this crate together:
//!
//! ```text
//! platform notification ─► ControllerEvent ─► ControllerState::apply
//!                                                   │
//!                                     ScheduleRequest (offset changed)
//!                                                   ▼
//!                                     CompensationScheduler ─► LayoutCommit
//! ```
//!
//! Panel listeners are attached through a [`LifecycleSubscriptionManager`]
//! so they exist only while the app is foregrounded. Dismiss requests are
//! handled by a [`DismissCoordinator`] with its own close listener.
//!
//! # Ownership
//!
//! The controller holds the only strong reference to its core. Every
//! listener callback and every [`KeyboardContext`] holds a weak one, so
//! dropping the controller tears everything down and late notifications
//! fall on the floor.
//!
//! # Failure Modes
//!
//! - **Event after unmount**: dropped and counted in
//!   [`events_dropped_total`](crate::instrument::events_dropped_total).
//! - **Re-entrant notification**: a platform that delivers a notification
//!   synchronously from inside a controller call sees the event dropped
//!   with a warning rather than a borrow panic. Accessors called from that
//!   point return defaults, and dismiss requests fail with
//!   [`DismissError::Reentrant`].
//! - **Close while backgrounded**: never delivered. Caught on the next
//!   foreground only if the host answers [`PanelPlatform::panel_visible`].

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use chatkit_core::{Frame, LayoutEvent, LifecycleState, PanelEventKind, PanelTransitionEvent};

use crate::behavior::{BehaviorVariant, LayoutStrategy, RenderedLayout};
use crate::config::ControllerConfig;
use crate::context::KeyboardContext;
use crate::dismiss::{DismissCoordinator, DismissError, DismissFuture};
use crate::instrument;
use crate::lifecycle::{ListenerFactory, LifecycleSubscriptionManager};
use crate::listener::{ListenerHandle, PanelHandler, PanelPlatform};
use crate::scheduler::{CompensationScheduler, LayoutCommit};
use crate::tracker::{ControllerEvent, ControllerState};

struct ControllerInner {
    state: ControllerState,
    enabled: bool,
    listeners: LifecycleSubscriptionManager,
    scheduler: CompensationScheduler,
    dismiss: DismissCoordinator,
    torn_down: bool,
}

/// Shared core behind a controller and its contexts.
pub(crate) struct ControllerCore {
    this: Weak<ControllerCore>,
    platform: Rc<dyn PanelPlatform>,
    config: ControllerConfig,
    behavior: BehaviorVariant,
    inner: RefCell<ControllerInner>,
}

impl ControllerCore {
    fn dispatch(&self, event: ControllerEvent) -> bool {
        let Ok(mut inner) = self.inner.try_borrow_mut() else {
            tracing::warn!(
                target: "chatkit.keyboard",
                event = event.label(),
                "re-entrant notification dropped"
            );
            instrument::record_event_dropped(event.label());
            return false;
        };
        if inner.torn_down {
            instrument::record_event_dropped(event.label());
            return false;
        }

        let resumed = matches!(event, ControllerEvent::Lifecycle(LifecycleState::Foreground))
            && !inner.state.lifecycle.is_foreground();
        if let ControllerEvent::Lifecycle(next) = &event {
            inner.listeners.transition(*next);
        }
        self.apply_locked(&mut inner, &event);

        // Notifications sent while backgrounded never arrive; catch up on a
        // close the host reports.
        if resumed && inner.state.panel_open && self.platform.panel_visible() == Some(false) {
            tracing::debug!(target: "chatkit.keyboard", "panel closed while in background");
            let closed = ControllerEvent::PanelTransition(PanelTransitionEvent::closed());
            self.apply_locked(&mut inner, &closed);
        }
        true
    }

    fn apply_locked(&self, inner: &mut ControllerInner, event: &ControllerEvent) {
        let previous = std::mem::take(&mut inner.state);
        let transition = previous.apply(event, self.config.vertical_offset);
        inner.state = transition.state;
        tracing::trace!(
            target: "chatkit.keyboard",
            event = event.label(),
            offset = inner.state.compensation_offset,
            panel_open = inner.state.panel_open,
            "event applied"
        );
        if let Some(request) = transition.schedule {
            // The host applies commits as-is, so they carry the effective
            // offset.
            let offset = inner.state.effective_offset(inner.enabled);
            inner
                .scheduler
                .schedule(offset, request.duration, request.easing.as_deref());
        }
    }

    fn set_enabled(&self, enabled: bool) -> bool {
        let Ok(mut inner) = self.inner.try_borrow_mut() else {
            tracing::warn!(target: "chatkit.keyboard", enabled, "re-entrant enable toggle dropped");
            return false;
        };
        if inner.enabled != enabled {
            inner.enabled = enabled;
            let offset = inner.state.effective_offset(enabled);
            inner.scheduler.schedule(offset, None, None);
            tracing::debug!(target: "chatkit.keyboard", enabled, "compensation toggled");
        }
        true
    }

    /// Run `read` against the inner state, or `None` while a notification is
    /// being handled.
    fn read<R>(&self, read: impl FnOnce(&ControllerInner) -> R) -> Option<R> {
        match self.inner.try_borrow() {
            Ok(inner) => Some(read(&inner)),
            Err(_) => {
                tracing::warn!(target: "chatkit.keyboard", "controller read during notification");
                None
            }
        }
    }

    pub(crate) fn request_dismiss(&self) -> DismissFuture {
        let future = {
            let Ok(mut inner) = self.inner.try_borrow_mut() else {
                tracing::warn!(
                    target: "chatkit.keyboard",
                    "dismiss requested from inside a notification"
                );
                return DismissFuture::failed(DismissError::Reentrant);
            };
            if inner.torn_down {
                return DismissFuture::torn_down();
            }
            if !inner.state.panel_open {
                return DismissFuture::resolved();
            }
            let this = self.this.clone();
            inner.dismiss.register(|| {
                let handler: PanelHandler = Rc::new(move |_event: &PanelTransitionEvent| {
                    if let Some(core) = this.upgrade() {
                        core.on_panel_closed();
                    }
                });
                self.platform.attach(PanelEventKind::DidHide, handler)
            })
        };
        // Issued without a borrow held: the host may report the close
        // synchronously.
        self.platform.dismiss_panel();
        future
    }

    fn on_panel_closed(&self) {
        match self.inner.try_borrow_mut() {
            Ok(mut inner) if !inner.torn_down => {
                inner.dismiss.on_panel_closed();
            }
            Ok(_) => instrument::record_event_dropped("dismiss_close"),
            Err(_) => {
                tracing::warn!(target: "chatkit.keyboard", "re-entrant close dropped");
                instrument::record_event_dropped("dismiss_close");
            }
        }
    }

    pub(crate) fn is_panel_open(&self) -> bool {
        self.inner
            .try_borrow()
            .is_ok_and(|inner| !inner.torn_down && inner.state.panel_open)
    }

    fn teardown(&self) {
        let Ok(mut inner) = self.inner.try_borrow_mut() else {
            tracing::warn!(target: "chatkit.keyboard", "unmount during notification skipped");
            return;
        };
        if inner.torn_down {
            return;
        }
        inner.torn_down = true;
        inner.listeners.teardown();
        inner.dismiss.teardown();
        tracing::debug!(target: "chatkit.keyboard", "controller unmounted");
    }
}

fn forward(this: &Weak<ControllerCore>, event: ControllerEvent) {
    match this.upgrade() {
        Some(core) => {
            core.dispatch(event);
        }
        None => instrument::record_event_dropped(event.label()),
    }
}

/// Listener set for one foreground period: the platform's transition
/// notifications plus the shown/hidden flags.
fn listener_factory(this: Weak<ControllerCore>, platform: Rc<dyn PanelPlatform>) -> ListenerFactory {
    Box::new(move || {
        let mut handles: Vec<ListenerHandle> = platform
            .platform()
            .transition_kinds()
            .iter()
            .map(|&kind| {
                let this = this.clone();
                let handler: PanelHandler = Rc::new(move |event: &PanelTransitionEvent| {
                    forward(&this, ControllerEvent::PanelTransition(event.clone()));
                });
                platform.attach(kind, handler)
            })
            .collect();

        let hidden = this.clone();
        handles.push(platform.attach(
            PanelEventKind::DidHide,
            Rc::new(move |_event: &PanelTransitionEvent| {
                forward(&hidden, ControllerEvent::PanelHidden);
            }),
        ));
        let shown = this.clone();
        handles.push(platform.attach(
            PanelEventKind::DidShow,
            Rc::new(move |_event: &PanelTransitionEvent| {
                forward(&shown, ControllerEvent::PanelShown);
            }),
        ));
        handles
    })
}

/// Keeps one tracked view clear of the on-screen panel.
///
/// Dropping the controller unmounts it.
pub struct KeyboardCompatibleController {
    core: Rc<ControllerCore>,
}

impl fmt::Debug for KeyboardCompatibleController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("KeyboardCompatibleController");
        out.field("behavior", &self.core.behavior);
        match self.core.inner.try_borrow() {
            Ok(inner) => out
                .field("state", &inner.state)
                .field("enabled", &inner.enabled)
                .field("listeners", &inner.listeners.active_count())
                .field("torn_down", &inner.torn_down),
            Err(_) => out.field("state", &"<borrowed>"),
        };
        out.finish_non_exhaustive()
    }
}

impl KeyboardCompatibleController {
    /// Mount a controller on `platform`.
    ///
    /// Invalid configuration values are replaced by defaults. If
    /// `config.platform` disagrees with the host, the host wins.
    pub fn mount(platform: Rc<dyn PanelPlatform>, config: ControllerConfig) -> Self {
        for problem in config.validate() {
            tracing::warn!(target: "chatkit.keyboard", %problem, "config value replaced");
        }
        let mut config = config.sanitized();
        let host = platform.platform();
        if config.platform != host {
            tracing::warn!(
                target: "chatkit.keyboard",
                configured = ?config.platform,
                host = ?host,
                "configured platform differs from host"
            );
            config.platform = host;
        }
        let behavior = config.resolved_behavior();

        let core = Rc::new_cyclic(|this: &Weak<ControllerCore>| {
            let listeners = LifecycleSubscriptionManager::new(
                config.initial_lifecycle,
                listener_factory(this.clone(), Rc::clone(&platform)),
            );
            ControllerCore {
                this: this.clone(),
                platform: Rc::clone(&platform),
                behavior,
                inner: RefCell::new(ControllerInner {
                    state: ControllerState::new(config.initial_lifecycle),
                    enabled: config.enabled,
                    listeners,
                    scheduler: CompensationScheduler::new(config.min_animation_duration_value()),
                    dismiss: DismissCoordinator::new(),
                    torn_down: false,
                }),
                config,
            }
        });

        tracing::debug!(
            target: "chatkit.keyboard",
            behavior = behavior.name(),
            platform = ?host,
            vertical_offset = core.config.vertical_offset,
            "controller mounted"
        );
        Self { core }
    }

    /// Feed one event into the state machine.
    ///
    /// Returns `false` if the event was dropped.
    pub fn dispatch(&self, event: ControllerEvent) -> bool {
        self.core.dispatch(event)
    }

    /// The tracked view was laid out at `frame`.
    pub fn on_layout(&self, frame: Frame) -> bool {
        self.dispatch(ControllerEvent::Layout(LayoutEvent::new(frame)))
    }

    /// Apply a lifecycle transition.
    pub fn on_lifecycle(&self, state: LifecycleState) -> bool {
        self.dispatch(ControllerEvent::Lifecycle(state))
    }

    /// The app entered the foreground.
    pub fn on_foreground(&self) -> bool {
        self.on_lifecycle(LifecycleState::Foreground)
    }

    /// The app left the foreground.
    pub fn on_background(&self) -> bool {
        self.on_lifecycle(LifecycleState::Background)
    }

    /// Apply a host app-state string such as `"active"` or `"background"`.
    ///
    /// Unknown states are ignored.
    pub fn on_app_state(&self, state: &str) -> bool {
        match LifecycleState::parse(state) {
            Some(state) => self.on_lifecycle(state),
            None => {
                tracing::debug!(target: "chatkit.keyboard", state, "unknown app state ignored");
                false
            }
        }
    }

    /// Close the panel and resolve once it is closed.
    ///
    /// Resolves immediately when the panel is already closed.
    pub fn request_dismiss(&self) -> DismissFuture {
        self.core.request_dismiss()
    }

    /// Style overrides for the tracked view.
    ///
    /// Read from inside a host notification, this renders the unadjusted
    /// layout.
    #[must_use]
    pub fn render(&self) -> RenderedLayout {
        let behavior = self.core.behavior;
        self.core
            .read(|inner| behavior.render(&inner.state, inner.enabled))
            .unwrap_or_else(|| behavior.render(&ControllerState::default(), false))
    }

    /// A handle descendants can use to reach this controller.
    #[must_use]
    pub fn context(&self) -> KeyboardContext {
        KeyboardContext::new(Rc::downgrade(&self.core))
    }

    /// Snapshot of the controller state.
    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.core
            .read(|inner| inner.state.clone())
            .unwrap_or_default()
    }

    /// Tracked displacement, regardless of the enabled flag.
    #[must_use]
    pub fn compensation_offset(&self) -> f64 {
        self.core
            .read(|inner| inner.state.compensation_offset)
            .unwrap_or_default()
    }

    /// Displacement actually applied to layout.
    #[must_use]
    pub fn effective_offset(&self) -> f64 {
        self.core
            .read(|inner| inner.state.effective_offset(inner.enabled))
            .unwrap_or_default()
    }

    /// Whether the panel is on screen.
    #[must_use]
    pub fn is_panel_open(&self) -> bool {
        self.core.is_panel_open()
    }

    /// Number of panel listeners currently attached for the view.
    ///
    /// Excludes a dismiss close listener.
    #[must_use]
    pub fn active_subscription_count(&self) -> usize {
        self.core
            .read(|inner| inner.listeners.active_count())
            .unwrap_or_default()
    }

    /// Layout behavior in effect.
    #[must_use]
    pub fn behavior(&self) -> BehaviorVariant {
        self.core.behavior
    }

    /// Configuration the controller was mounted with, after sanitizing.
    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.core.config
    }

    /// Enable or disable compensation. Tracking continues either way.
    ///
    /// A change pushes an instant commit of the new effective offset.
    /// Returns `false` if the toggle was dropped because a host notification
    /// was in progress.
    pub fn set_enabled(&self, enabled: bool) -> bool {
        self.core.set_enabled(enabled)
    }

    /// Whether compensation is applied.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.core.read(|inner| inner.enabled).unwrap_or_default()
    }

    /// Take commits the host has not applied yet, oldest first.
    ///
    /// Empty while a host notification is in progress; the commits stay
    /// queued for the next call.
    pub fn drain_commits(&self) -> Vec<LayoutCommit> {
        self.core
            .inner
            .try_borrow_mut()
            .map(|mut inner| inner.scheduler.drain_commits())
            .unwrap_or_default()
    }

    /// Most recent commit.
    #[must_use]
    pub fn last_commit(&self) -> LayoutCommit {
        self.core
            .read(|inner| inner.scheduler.committed())
            .unwrap_or_default()
    }

    /// Dismiss requests still waiting for the panel to close.
    #[must_use]
    pub fn pending_dismissals(&self) -> usize {
        self.core
            .read(|inner| inner.dismiss.pending())
            .unwrap_or_default()
    }

    /// Unmount now. Equivalent to dropping the controller.
    pub fn unmount(self) {
        drop(self);
    }
}

impl Drop for KeyboardCompatibleController {
    fn drop(&mut self) {
        self.core.teardown();
    }
}
