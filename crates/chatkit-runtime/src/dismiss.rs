#![forbid(unsafe_code)]

//! Dismiss-and-wait coordination.
//!
//! [`DismissCoordinator`] backs the "close the panel and tell me when it is
//! gone" operation. Each request gets its own one-shot channel; a single
//! close listener is attached while at least one request is waiting and is
//! released as soon as it fires.
//!
//! # Invariants
//!
//! 1. A request made while the panel is closed resolves immediately.
//! 2. A waiting request resolves on the first close observed after it was
//!    made, exactly once. Open notifications never resolve it.
//! 3. The close listener is held only while requests are waiting.
//! 4. On teardown, waiting futures resolve to [`DismissError::TornDown`].

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::channel::oneshot;
use web_time::Instant;

use crate::instrument;
use crate::listener::ListenerHandle;

/// Why a dismiss wait did not complete normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissError {
    /// The controller was unmounted before the panel closed.
    TornDown,
    /// Requested while the controller was busy handling a host
    /// notification; nothing was registered.
    Reentrant,
}

impl fmt::Display for DismissError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TornDown => write!(f, "controller torn down before the panel closed"),
            Self::Reentrant => write!(f, "dismiss requested while a notification was in progress"),
        }
    }
}

impl std::error::Error for DismissError {}

enum DismissState {
    Ready(Option<Result<(), DismissError>>),
    Waiting(oneshot::Receiver<()>),
}

/// Future returned by a dismiss request.
///
/// Resolves to `Ok(())` once the panel is closed.
#[must_use = "futures do nothing unless polled"]
pub struct DismissFuture {
    state: DismissState,
}

impl DismissFuture {
    /// A future that is already resolved.
    pub fn resolved() -> Self {
        Self {
            state: DismissState::Ready(Some(Ok(()))),
        }
    }

    /// A future that already failed with [`DismissError::TornDown`].
    pub fn torn_down() -> Self {
        Self::failed(DismissError::TornDown)
    }

    /// A future that already failed with `error`.
    pub fn failed(error: DismissError) -> Self {
        Self {
            state: DismissState::Ready(Some(Err(error))),
        }
    }

    fn waiting(receiver: oneshot::Receiver<()>) -> Self {
        Self {
            state: DismissState::Waiting(receiver),
        }
    }

    /// Whether the outcome was known at creation time.
    #[must_use]
    pub fn is_immediate(&self) -> bool {
        matches!(self.state, DismissState::Ready(_))
    }
}

impl Future for DismissFuture {
    type Output = Result<(), DismissError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.state {
            DismissState::Ready(outcome) => Poll::Ready(outcome.take().unwrap_or(Ok(()))),
            DismissState::Waiting(receiver) => receiver
                .poll_unpin(cx)
                .map(|r| r.map_err(|_canceled| DismissError::TornDown)),
        }
    }
}

impl fmt::Debug for DismissFuture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.state {
            DismissState::Ready(_) => "ready",
            DismissState::Waiting(_) => "waiting",
        };
        f.debug_struct("DismissFuture").field("state", &state).finish()
    }
}

/// Tracks outstanding dismiss requests and their close listener.
#[derive(Debug, Default)]
pub struct DismissCoordinator {
    waiters: Vec<oneshot::Sender<()>>,
    listener: Option<ListenerHandle>,
    waiting_since: Option<Instant>,
}

impl DismissCoordinator {
    /// Create an idle coordinator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a waiter for the next close.
    ///
    /// `attach_close_listener` is called only when no listener is held yet.
    /// The caller is responsible for issuing the platform close command.
    pub fn register(
        &mut self,
        attach_close_listener: impl FnOnce() -> ListenerHandle,
    ) -> DismissFuture {
        let (sender, receiver) = oneshot::channel();
        self.waiters.push(sender);
        if self.listener.is_none() {
            self.listener = Some(attach_close_listener());
            self.waiting_since = Some(Instant::now());
        }
        DismissFuture::waiting(receiver)
    }

    /// The panel closed: resolve every waiter and drop the listener.
    ///
    /// Returns the number of waiters resolved.
    pub fn on_panel_closed(&mut self) -> usize {
        if let Some(listener) = self.listener.take() {
            listener.release();
        }
        let waiters = std::mem::take(&mut self.waiters);
        let count = waiters.len();
        for waiter in waiters {
            // A dropped receiver just means nobody is awaiting any more.
            let _ = waiter.send(());
        }
        if count > 0 {
            let waited_us = self
                .waiting_since
                .take()
                .map_or(0, |t| t.elapsed().as_micros() as u64);
            instrument::record_dismiss_resolved(count, waited_us);
        }
        count
    }

    /// Drop the listener and cancel every waiter.
    pub fn teardown(&mut self) {
        self.listener = None;
        self.waiting_since = None;
        // Dropping the senders cancels the receivers.
        self.waiters.clear();
    }

    /// Number of requests still waiting for a close.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.waiters.len()
    }

    /// Whether a close listener is currently attached.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listener.is_some()
    }
}
