#![forbid(unsafe_code)]

//! Controller observability: counters and structured log events.
//!
//! This module provides:
//!
//! - **Monotonic counters** for listener churn, layout commits, dismiss
//!   resolutions and events dropped after teardown.
//! - **Tracing events** under the `chatkit.listener` and `chatkit.keyboard`
//!   targets with structured fields, so hosts can filter with
//!   `RUST_LOG=chatkit.keyboard=debug`.
//!
//! Counters are process-wide and only ever increase; compare deltas.

use std::sync::atomic::{AtomicU64, Ordering};

// ---------------------------------------------------------------------------
// Monotonic counters
// ---------------------------------------------------------------------------

static LISTENERS_ATTACHED_TOTAL: AtomicU64 = AtomicU64::new(0);
static LISTENERS_RELEASED_TOTAL: AtomicU64 = AtomicU64::new(0);
static COMMITS_TOTAL: AtomicU64 = AtomicU64::new(0);
static ANIMATED_COMMITS_TOTAL: AtomicU64 = AtomicU64::new(0);
static DISMISS_RESOLVED_TOTAL: AtomicU64 = AtomicU64::new(0);
static EVENTS_DROPPED_TOTAL: AtomicU64 = AtomicU64::new(0);

/// Total listeners attached (monotonic counter).
#[must_use]
pub fn listeners_attached_total() -> u64 {
    LISTENERS_ATTACHED_TOTAL.load(Ordering::Relaxed)
}

/// Total listeners released (monotonic counter).
#[must_use]
pub fn listeners_released_total() -> u64 {
    LISTENERS_RELEASED_TOTAL.load(Ordering::Relaxed)
}

/// Total layout commits, animated or not (monotonic counter).
#[must_use]
pub fn commits_total() -> u64 {
    COMMITS_TOTAL.load(Ordering::Relaxed)
}

/// Total layout commits that carried an animation (monotonic counter).
#[must_use]
pub fn animated_commits_total() -> u64 {
    ANIMATED_COMMITS_TOTAL.load(Ordering::Relaxed)
}

/// Total dismiss waits resolved by a close notification (monotonic counter).
#[must_use]
pub fn dismiss_resolved_total() -> u64 {
    DISMISS_RESOLVED_TOTAL.load(Ordering::Relaxed)
}

/// Total events discarded because the controller was torn down.
#[must_use]
pub fn events_dropped_total() -> u64 {
    EVENTS_DROPPED_TOTAL.load(Ordering::Relaxed)
}

// ---------------------------------------------------------------------------
// Listener instrumentation
// ---------------------------------------------------------------------------

pub(crate) fn record_listener_attach(kind: &str, id: u64) {
    LISTENERS_ATTACHED_TOTAL.fetch_add(1, Ordering::Relaxed);
    tracing::debug!(
        target: "chatkit.listener",
        kind = %kind,
        listener_id = id,
        "listener attached"
    );
}

pub(crate) fn record_listener_release(kind: &str, id: u64) {
    LISTENERS_RELEASED_TOTAL.fetch_add(1, Ordering::Relaxed);
    tracing::debug!(
        target: "chatkit.listener",
        kind = %kind,
        listener_id = id,
        "listener released"
    );
}

// ---------------------------------------------------------------------------
// Controller instrumentation
// ---------------------------------------------------------------------------

pub(crate) fn record_commit(sequence: u64, offset: f64, animated_ms: Option<u128>) {
    COMMITS_TOTAL.fetch_add(1, Ordering::Relaxed);
    if animated_ms.is_some() {
        ANIMATED_COMMITS_TOTAL.fetch_add(1, Ordering::Relaxed);
    }
    tracing::debug!(
        target: "chatkit.keyboard",
        sequence,
        offset,
        animated_ms = ?animated_ms,
        "compensation committed"
    );
}

pub(crate) fn record_dismiss_resolved(waiters: usize, waited_us: u64) {
    DISMISS_RESOLVED_TOTAL.fetch_add(waiters as u64, Ordering::Relaxed);
    tracing::debug!(
        target: "chatkit.keyboard",
        waiters,
        waited_us,
        "dismiss resolved"
    );
}

pub(crate) fn record_event_dropped(event: &str) {
    EVENTS_DROPPED_TOTAL.fetch_add(1, Ordering::Relaxed);
    tracing::trace!(
        target: "chatkit.keyboard",
        event = %event,
        "event discarded"
    );
}
