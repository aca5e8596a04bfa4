#![forbid(unsafe_code)]

//! Platform listener capability.
//!
//! Host platforms expose panel notifications through callback registration
//! with ad hoc removal handles. This module abstracts that as the
//! [`PanelPlatform`] capability: `attach(kind, handler)` returns a
//! [`ListenerHandle`], and the handle releases the listener when it is
//! dropped or passed to [`ListenerHandle::release`].
//!
//! # Design
//!
//! [`PanelEventBus`] stores listeners as weak references. The strong
//! reference lives inside the handle, so dropping the handle makes the
//! listener unreachable immediately; the dead entry is pruned on the next
//! emission or count.
//!
//! # Failure Modes
//!
//! - **Re-entrant emit**: handlers may emit or attach from inside a callback.
//!   The live set is snapshotted before any handler runs, so listeners
//!   attached during an emission only see later emissions.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use chatkit_core::{Frame, PanelEventKind, PanelTransitionEvent, Platform};

use crate::instrument;

/// Unique identifier of an attached listener.
pub type ListenerId = u64;

/// Callback invoked with each panel notification of the attached kind.
pub type PanelHandler = Rc<dyn Fn(&PanelTransitionEvent)>;

type HandlerWeak = Weak<dyn Fn(&PanelTransitionEvent)>;

/// Host capability for panel notifications and commands.
pub trait PanelPlatform {
    /// Which platform flavour this host behaves like.
    fn platform(&self) -> Platform;

    /// Attach `handler` to notifications of `kind`.
    ///
    /// The listener stays attached for as long as the returned handle lives.
    fn attach(&self, kind: PanelEventKind, handler: PanelHandler) -> ListenerHandle;

    /// Ask the host to close the panel.
    ///
    /// The close is observed later through a [`PanelEventKind::DidHide`]
    /// notification.
    fn dismiss_panel(&self);

    /// Whether the panel is on screen right now, if the host can tell.
    ///
    /// Queried when the app returns to the foreground, since notifications
    /// sent while backgrounded are never delivered.
    fn panel_visible(&self) -> Option<bool> {
        None
    }
}

/// RAII guard for an attached listener.
///
/// Dropping the handle detaches the listener: the strong `Rc` held here is
/// the only one, so the platform's weak reference fails to upgrade from
/// then on.
pub struct ListenerHandle {
    id: ListenerId,
    kind: PanelEventKind,
    _guard: PanelHandler,
}

impl ListenerHandle {
    /// Wrap a handler whose platform-side registration is weak.
    ///
    /// Platform implementations call this from [`PanelPlatform::attach`].
    #[must_use]
    pub fn new(id: ListenerId, kind: PanelEventKind, handler: PanelHandler) -> Self {
        instrument::record_listener_attach(kind.as_str(), id);
        Self {
            id,
            kind,
            _guard: handler,
        }
    }

    /// Identifier assigned by the platform.
    #[must_use]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Notification kind this listener is attached to.
    #[must_use]
    pub fn kind(&self) -> PanelEventKind {
        self.kind
    }

    /// Detach the listener now.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        instrument::record_listener_release(self.kind.as_str(), self.id);
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

struct BusEntry {
    kind: PanelEventKind,
    handler: HandlerWeak,
}

struct BusInner {
    next_id: ListenerId,
    entries: Vec<BusEntry>,
}

/// In-process panel notification bus.
///
/// Cloning a bus creates a new handle to the same listener list.
#[derive(Clone)]
pub struct PanelEventBus {
    inner: Rc<RefCell<BusInner>>,
}

impl Default for PanelEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PanelEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelEventBus")
            .field("live_listeners", &self.live_listener_count())
            .finish()
    }
}

impl PanelEventBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(BusInner {
                next_id: 1,
                entries: Vec::new(),
            })),
        }
    }

    /// Attach a listener. See [`PanelPlatform::attach`].
    pub fn subscribe(&self, kind: PanelEventKind, handler: PanelHandler) -> ListenerHandle {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.entries.push(BusEntry {
                kind,
                handler: Rc::downgrade(&handler),
            });
            id
        };
        ListenerHandle::new(id, kind, handler)
    }

    /// Deliver `event` to every live listener of `kind`, in attach order.
    ///
    /// Returns the number of listeners invoked.
    pub fn emit(&self, kind: PanelEventKind, event: &PanelTransitionEvent) -> usize {
        // Collect live callbacks first so no borrow is held while they run.
        let callbacks: Vec<PanelHandler> = {
            let mut inner = self.inner.borrow_mut();
            inner.entries.retain(|e| e.handler.strong_count() > 0);
            inner
                .entries
                .iter()
                .filter(|e| e.kind == kind)
                .filter_map(|e| e.handler.upgrade())
                .collect()
        };

        tracing::trace!(
            target: "chatkit.listener",
            kind = kind.as_str(),
            listeners = callbacks.len(),
            "panel notification"
        );

        for cb in &callbacks {
            cb(event);
        }
        callbacks.len()
    }

    /// Number of attached listeners whose handles are still alive.
    #[must_use]
    pub fn live_listener_count(&self) -> usize {
        self.inner
            .borrow()
            .entries
            .iter()
            .filter(|e| e.handler.strong_count() > 0)
            .count()
    }

    /// Number of live listeners for one notification kind.
    #[must_use]
    pub fn live_listener_count_for(&self, kind: PanelEventKind) -> usize {
        self.inner
            .borrow()
            .entries
            .iter()
            .filter(|e| e.kind == kind && e.handler.strong_count() > 0)
            .count()
    }
}

/// A platform with no native backend.
///
/// Panel notifications are driven by the caller through [`show`](Self::show),
/// [`hide`](Self::hide) and [`emit`](Self::emit); close commands are only
/// counted. Useful for tests and host simulators.
#[derive(Debug)]
pub struct HeadlessPlatform {
    platform: Platform,
    bus: PanelEventBus,
    dismiss_requests: Cell<u32>,
    visible: Cell<bool>,
}

impl HeadlessPlatform {
    /// Create a headless host behaving like `platform`.
    #[must_use]
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            bus: PanelEventBus::new(),
            dismiss_requests: Cell::new(0),
            visible: Cell::new(false),
        }
    }

    /// The underlying notification bus.
    #[must_use]
    pub fn bus(&self) -> &PanelEventBus {
        &self.bus
    }

    /// Number of close commands received so far.
    #[must_use]
    pub fn dismiss_requests(&self) -> u32 {
        self.dismiss_requests.get()
    }

    /// Deliver a raw notification.
    pub fn emit(&self, kind: PanelEventKind, event: &PanelTransitionEvent) -> usize {
        self.bus.emit(kind, event)
    }

    /// Emit the notification sequence of the panel opening at `event.end_frame`.
    pub fn show(&self, event: &PanelTransitionEvent) {
        self.visible.set(event.ends_open());
        if self.platform == Platform::Ios {
            self.bus.emit(PanelEventKind::WillChangeFrame, event);
        }
        self.bus.emit(PanelEventKind::DidShow, event);
    }

    /// Emit the panel opening at `end_frame` with no timing metadata.
    pub fn show_at(&self, end_frame: Frame) {
        self.show(&PanelTransitionEvent::opened(end_frame));
    }

    /// Emit the notification sequence of the panel closing.
    pub fn hide(&self) {
        self.visible.set(false);
        let event = PanelTransitionEvent::closed();
        if self.platform == Platform::Ios {
            self.bus.emit(PanelEventKind::WillChangeFrame, &event);
        }
        self.bus.emit(PanelEventKind::DidHide, &event);
    }

    /// Whether the last [`show`](Self::show)/[`hide`](Self::hide) left the
    /// panel on screen. Raw [`emit`](Self::emit) calls do not change it.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// Number of live listeners on this host.
    #[must_use]
    pub fn live_listener_count(&self) -> usize {
        self.bus.live_listener_count()
    }
}

impl PanelPlatform for HeadlessPlatform {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn attach(&self, kind: PanelEventKind, handler: PanelHandler) -> ListenerHandle {
        self.bus.subscribe(kind, handler)
    }

    fn dismiss_panel(&self) {
        self.dismiss_requests.set(self.dismiss_requests.get() + 1);
        tracing::debug!(target: "chatkit.listener", "panel close requested");
    }

    fn panel_visible(&self) -> Option<bool> {
        Some(self.visible.get())
    }
}
