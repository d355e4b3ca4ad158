//! Viewport Intersection Monitor - observation sessions over laid-out regions.
//!
//! A session watches one component index. After each layout pass the
//! pipeline calls [`run_observations`], which tests every session's target
//! against the viewport and queues a record whenever the status changed since
//! the last one reported. [`deliver_pending`] runs those callbacks in a later
//! pipeline step, so callbacks never fire while the session is being created
//! and never while layout state is borrowed.
//!
//! Failures are absorbed: a detached target or an environment without
//! observation yields an inert handle and a diagnostic, never an error.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use super::config::ObservationConfig;
use super::geometry::is_intersecting;
use crate::diagnostics::{self, Diagnostic};
use crate::engine::is_allocated;
use crate::layout::{Bounds, ComputedLayout};

type ChangeCallback = Rc<dyn Fn(bool)>;

struct Session {
    target: usize,
    config: ObservationConfig,
    on_change: ChangeCallback,
    /// None until the first evaluation, which always reports.
    last_reported: Option<bool>,
}

struct ChangeRecord {
    session: u64,
    target: usize,
    intersecting: bool,
}

thread_local! {
    static SESSIONS: RefCell<BTreeMap<u64, Session>> = const { RefCell::new(BTreeMap::new()) };
    static PENDING: RefCell<Vec<ChangeRecord>> = const { RefCell::new(Vec::new()) };
    static NEXT_SESSION_ID: Cell<u64> = const { Cell::new(1) };
    static SUPPORTED: Cell<bool> = const { Cell::new(true) };
    static BEGUN: Cell<usize> = const { Cell::new(0) };
    static ENDED: Cell<usize> = const { Cell::new(0) };
}

// =============================================================================
// Handle
// =============================================================================

/// Handle to one observation session.
///
/// Ending is idempotent, and dropping the handle ends the session. An inert
/// handle (returned when observation could not start) ends as a no-op.
pub struct ObserverHandle {
    session: Cell<Option<u64>>,
    target: usize,
    started: bool,
}

impl ObserverHandle {
    fn inert(target: usize) -> Self {
        Self {
            session: Cell::new(None),
            target,
            started: false,
        }
    }

    /// Stop observing. No callback for this session runs afterwards.
    pub fn end(&self) {
        let Some(id) = self.session.take() else {
            return;
        };
        let removed = SESSIONS.with(|sessions| sessions.borrow_mut().remove(&id));
        if removed.is_some() {
            ENDED.with(|count| count.set(count.get() + 1));
            tracing::debug!(target_index = self.target, session = id, "observation ended");
        }
    }

    /// Whether the session is still running.
    pub fn is_active(&self) -> bool {
        match self.session.get() {
            Some(id) => SESSIONS.with(|sessions| sessions.borrow().contains_key(&id)),
            None => false,
        }
    }

    /// Whether this handle never started a session.
    pub fn is_inert(&self) -> bool {
        !self.started
    }

    /// Component index being observed.
    pub fn target(&self) -> usize {
        self.target
    }

    fn session_id(&self) -> Option<u64> {
        self.session.get()
    }
}

impl Drop for ObserverHandle {
    fn drop(&mut self) {
        self.end();
    }
}

impl std::fmt::Debug for ObserverHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverHandle")
            .field("session", &self.session.get())
            .field("target", &self.target)
            .finish()
    }
}

// =============================================================================
// Sessions
// =============================================================================

/// Start observing `target`.
///
/// `on_change` receives `true` when the target becomes intersecting and
/// `false` when it stops; it is never invoked synchronously from here.
pub fn begin(
    target: usize,
    config: ObservationConfig,
    on_change: impl Fn(bool) + 'static,
) -> ObserverHandle {
    if !SUPPORTED.with(Cell::get) {
        diagnostics::emit(Diagnostic::UnsupportedEnvironment { target });
        return ObserverHandle::inert(target);
    }
    if !is_allocated(target) {
        diagnostics::emit(Diagnostic::InvalidTarget { target });
        return ObserverHandle::inert(target);
    }

    let id = NEXT_SESSION_ID.with(|next| {
        let id = next.get();
        next.set(id + 1);
        id
    });

    SESSIONS.with(|sessions| {
        sessions.borrow_mut().insert(
            id,
            Session {
                target,
                config,
                on_change: Rc::new(on_change),
                last_reported: None,
            },
        );
    });
    BEGUN.with(|count| count.set(count.get() + 1));

    tracing::debug!(
        target_index = target,
        session = id,
        threshold = config.threshold(),
        root_margin = %config.root_margin(),
        "observation began"
    );

    ObserverHandle {
        session: Cell::new(Some(id)),
        target,
        started: true,
    }
}

/// Evaluate every session against `viewport` and queue changed statuses.
///
/// Targets that are detached or were not laid out count as not intersecting.
pub fn run_observations(layout: &ComputedLayout, viewport: Bounds) {
    let records: Vec<ChangeRecord> = SESSIONS.with(|sessions| {
        let mut sessions = sessions.borrow_mut();
        let mut records = Vec::new();

        for (&id, session) in sessions.iter_mut() {
            let intersecting = is_allocated(session.target)
                && layout
                    .bounds(session.target)
                    .is_some_and(|bounds| is_intersecting(bounds, viewport, &session.config));

            if session.last_reported != Some(intersecting) {
                session.last_reported = Some(intersecting);
                records.push(ChangeRecord {
                    session: id,
                    target: session.target,
                    intersecting,
                });
            }
        }
        records
    });

    if !records.is_empty() {
        PENDING.with(|pending| pending.borrow_mut().extend(records));
    }
}

/// Deliver queued records. Records for sessions ended since queuing are dropped.
///
/// Returns the number of callbacks invoked.
pub fn deliver_pending() -> usize {
    let records = PENDING.with(|pending| std::mem::take(&mut *pending.borrow_mut()));
    let mut delivered = 0;

    for record in records {
        // Looked up per record: an earlier callback may end later sessions
        let callback = SESSIONS.with(|sessions| {
            sessions
                .borrow()
                .get(&record.session)
                .map(|session| session.on_change.clone())
        });

        match callback {
            Some(callback) => {
                callback(record.intersecting);
                delivered += 1;
            }
            None => diagnostics::emit(Diagnostic::PrematureCallback {
                target: record.target,
            }),
        }
    }

    delivered
}

/// Number of records waiting for delivery.
pub fn pending_count() -> usize {
    PENDING.with(|pending| pending.borrow().len())
}

// =============================================================================
// Environment
// =============================================================================

/// Declare whether the environment can observe at all.
pub fn set_observation_supported(supported: bool) {
    SUPPORTED.with(|flag| flag.set(supported));
}

pub fn is_observation_supported() -> bool {
    SUPPORTED.with(Cell::get)
}

// =============================================================================
// Introspection
// =============================================================================

/// Number of sessions currently running.
pub fn active_session_count() -> usize {
    SESSIONS.with(|sessions| sessions.borrow().len())
}

/// Total sessions started since the last reset.
pub fn sessions_begun() -> usize {
    BEGUN.with(Cell::get)
}

/// Total sessions ended since the last reset.
pub fn sessions_ended() -> usize {
    ENDED.with(Cell::get)
}

/// Configuration a running session was started with.
pub fn session_config(handle: &ObserverHandle) -> Option<ObservationConfig> {
    let id = handle.session_id()?;
    SESSIONS.with(|sessions| sessions.borrow().get(&id).map(|session| session.config))
}

/// Reset all monitor state (for testing).
pub fn reset_monitor() {
    SESSIONS.with(|sessions| sessions.borrow_mut().clear());
    PENDING.with(|pending| pending.borrow_mut().clear());
    NEXT_SESSION_ID.with(|next| next.set(1));
    SUPPORTED.with(|flag| flag.set(true));
    BEGUN.with(|count| count.set(0));
    ENDED.with(|count| count.set(0));
}
