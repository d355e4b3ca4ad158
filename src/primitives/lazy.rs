//! Lazy Section - visibility-gated mounting.
//!
//! A lazy section reserves a placeholder region and defers building its
//! children until the placeholder first intersects the viewport. After that
//! it stops observing and the children stay, whatever scrolling follows.
//!
//! ```text
//!            begin                  first intersecting record
//!   Idle ─────────────▶ Observing ─────────────────────────────▶ Revealed
//!    ▲                      │
//!    └──── teardown ────────┘   (teardown from any state is final)
//! ```
//!
//! Guarantees:
//! - children are built at most once, and never before the first
//!   intersecting record is delivered
//! - the observation session ends exactly once: on reveal or on teardown,
//!   whichever comes first
//! - a record delivered after teardown is absorbed
//! - configuration changes restart observation only while not yet revealed
//!
//! The gate is owned by a thread-wide table keyed by placeholder index, so
//! dropping a [`LazyGate`] handle does not unmount anything. Teardown happens
//! through [`LazyGate::teardown`], its cleanup, or when the placeholder is
//! released together with a parent.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

use spark_signals::{Signal, effect, signal};

use crate::diagnostics::{self, Diagnostic};
use crate::engine::arrays::{core, sizing, visual};
use crate::engine::{
    allocate_index, get_current_parent_index, is_allocated, on_destroy, pop_parent_context,
    push_parent_context, release_index,
};
use crate::observe::{self, ObservationConfig, ObserverHandle};
use crate::pipeline::clock;
use crate::types::{ComponentType, Dimension};

use super::types::{Children, Cleanup, LazyProps};

/// Class carried by every lazy placeholder.
pub const LAZY_SECTION_CLASS: &str = "lazy-section";

/// Lifecycle of a lazy section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Not observing: observation could not start yet, or the gate is torn down.
    Idle,
    /// Waiting for the first intersecting record.
    Observing,
    /// Children built. Terminal until teardown.
    Revealed,
}

// =============================================================================
// Gate internals
// =============================================================================

struct GateInner {
    index: usize,
    state: Cell<GateState>,
    torn_down: Cell<bool>,
    triggered: Cell<bool>,
    config: Cell<ObservationConfig>,
    handle: RefCell<Option<ObserverHandle>>,
    /// Set when `begin` came back inert for a detached placeholder.
    retry: Cell<bool>,
    children: RefCell<Option<Children>>,
    child_cleanup: RefCell<Option<Cleanup>>,
    revealed: Signal<bool>,
    revealed_at: Cell<Option<Duration>>,
    transition: Duration,
    config_binding: RefCell<Option<Cleanup>>,
}

thread_local! {
    static GATES: RefCell<BTreeMap<usize, Rc<GateInner>>> = const { RefCell::new(BTreeMap::new()) };
}

impl GateInner {
    /// Start a session for the current config. Stays Idle when the
    /// monitor hands back an inert handle.
    fn observe(self: &Rc<Self>) {
        let weak: Weak<GateInner> = Rc::downgrade(self);
        let index = self.index;
        let handle = observe::begin(index, self.config.get(), move |intersecting| {
            match weak.upgrade() {
                Some(gate) => gate.on_change(intersecting),
                None => diagnostics::emit(Diagnostic::PrematureCallback { target: index }),
            }
        });

        let state = if handle.is_inert() {
            GateState::Idle
        } else {
            GateState::Observing
        };
        // Unsupported environments never observe; only detached targets retry
        self.retry.set(handle.is_inert() && observe::is_observation_supported());
        self.state.set(state);
        *self.handle.borrow_mut() = Some(handle);
    }

    /// End the current session, if any. Ending is idempotent at the monitor,
    /// taking the handle makes it single-shot here too.
    fn stop_observing(&self) {
        let handle = self.handle.borrow_mut().take();
        if let Some(handle) = handle {
            handle.end();
        }
    }

    fn on_change(&self, intersecting: bool) {
        if self.torn_down.get() {
            diagnostics::emit(Diagnostic::PrematureCallback { target: self.index });
            return;
        }
        if !intersecting || self.state.get() != GateState::Observing {
            return;
        }

        self.state.set(GateState::Revealed);
        self.triggered.set(true);
        self.revealed_at.set(Some(clock::now()));
        self.stop_observing();

        tracing::debug!(index = self.index, "lazy section revealed");

        let children = self.children.borrow_mut().take();
        if let Some(children) = children {
            push_parent_context(self.index);
            let cleanup = children();
            pop_parent_context();
            *self.child_cleanup.borrow_mut() = Some(cleanup);
        }

        self.revealed.set(true);
    }

    fn set_config(self: &Rc<Self>, config: ObservationConfig) {
        if self.torn_down.get() || self.state.get() == GateState::Revealed {
            return;
        }
        if self.config.get() == config {
            return;
        }

        tracing::debug!(
            index = self.index,
            threshold = config.threshold(),
            root_margin = %config.root_margin(),
            "lazy section restarting observation"
        );

        self.stop_observing();
        self.config.set(config);
        self.observe();
    }

    /// Per-frame work: retry observation for Idle gates and drive the fade.
    fn frame(self: &Rc<Self>, now: Duration) {
        if self.torn_down.get() {
            return;
        }
        match self.state.get() {
            GateState::Idle => {
                if self.retry.get() && is_allocated(self.index) {
                    self.stop_observing();
                    self.observe();
                }
            }
            GateState::Observing => {}
            GateState::Revealed => {
                let Some(at) = self.revealed_at.get() else {
                    return;
                };
                visual::set_opacity(self.index, fade_progress(now.saturating_sub(at), self.transition));
            }
        }
    }

    /// Stop everything. Does not release the placeholder index.
    fn shutdown(&self) {
        if self.torn_down.replace(true) {
            return;
        }
        self.state.set(GateState::Idle);
        self.stop_observing();
        self.children.borrow_mut().take();

        let binding = self.config_binding.borrow_mut().take();
        if let Some(stop) = binding {
            stop();
        }
        let cleanup = self.child_cleanup.borrow_mut().take();
        if let Some(cleanup) = cleanup {
            cleanup();
        }

        GATES.with(|gates| {
            let mut gates = gates.borrow_mut();
            if gates.get(&self.index).is_some_and(|g| std::ptr::eq(Rc::as_ptr(g), self)) {
                gates.remove(&self.index);
            }
        });

        tracing::debug!(index = self.index, "lazy section torn down");
    }
}

/// Eased fade progress (ease-out cubic), 1 once `transition` has elapsed.
fn fade_progress(elapsed: Duration, transition: Duration) -> f32 {
    if transition.is_zero() {
        return 1.0;
    }
    let t = (elapsed.as_secs_f32() / transition.as_secs_f32()).clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

// =============================================================================
// Public handle
// =============================================================================

/// Handle to a mounted lazy section.
///
/// Cloning shares the same gate. Dropping a handle leaves the section mounted.
#[derive(Clone)]
pub struct LazyGate {
    inner: Rc<GateInner>,
}

impl LazyGate {
    pub fn state(&self) -> GateState {
        self.inner.state.get()
    }

    /// Whether the children were ever built.
    pub fn has_triggered(&self) -> bool {
        self.inner.triggered.get()
    }

    /// Signal flipped to `true` once, right after the children are built.
    pub fn revealed(&self) -> Signal<bool> {
        self.inner.revealed.clone()
    }

    /// Replace the observation configuration.
    ///
    /// Before reveal an unchanged config is a no-op and a changed one ends
    /// the running session and begins a new one. After reveal or teardown
    /// nothing happens.
    pub fn set_config(&self, config: ObservationConfig) {
        self.inner.set_config(config);
    }

    pub fn config(&self) -> ObservationConfig {
        self.inner.config.get()
    }

    /// Placeholder index.
    pub fn index(&self) -> usize {
        self.inner.index
    }

    /// Whether the section is still mounted.
    pub fn is_alive(&self) -> bool {
        !self.inner.torn_down.get()
    }

    /// Unmount: end observation, clean up children, release the placeholder.
    ///
    /// Idempotent.
    pub fn teardown(&self) {
        if self.inner.torn_down.get() {
            return;
        }
        self.inner.shutdown();
        release_index(self.inner.index);
    }

    pub fn into_cleanup(self) -> Cleanup {
        Box::new(move || self.teardown())
    }
}

impl From<LazyGate> for Cleanup {
    fn from(gate: LazyGate) -> Self {
        gate.into_cleanup()
    }
}

impl std::fmt::Debug for LazyGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyGate")
            .field("index", &self.inner.index)
            .field("state", &self.inner.state.get())
            .field("triggered", &self.inner.triggered.get())
            .finish()
    }
}

// =============================================================================
// Component
// =============================================================================

/// Mount a lazy section under the current parent context.
///
/// The placeholder reserves `placeholder_height` rows and paints a shimmer
/// until the first intersecting record arrives; then the children are built
/// inside it and it fades in over `transition`.
pub fn lazy_section(props: LazyProps) -> LazyGate {
    let LazyProps {
        id,
        config,
        visual_class,
        placeholder_height,
        transition,
        children,
    } = props;

    let index = allocate_index(id.as_deref());
    core::set_component_type(index, ComponentType::Placeholder);
    if let Some(parent) = get_current_parent_index() {
        core::set_parent_index(index, Some(parent));
    }
    core::set_mounted_at(index, clock::now());
    visual::set_opacity(index, 0.0);

    let revealed = signal(false);

    // Classes and reserved height follow the revealed signal
    let revealed_for_class = revealed.clone();
    core::set_class_list_getter(index, move || {
        let phase = if revealed_for_class.get() { "lazy-revealed" } else { "lazy-pending" };
        if visual_class.is_empty() {
            format!("{LAZY_SECTION_CLASS} {phase}")
        } else {
            format!("{LAZY_SECTION_CLASS} {phase} {visual_class}")
        }
    });
    let revealed_for_height = revealed.clone();
    sizing::set_min_height_getter(index, move || {
        if revealed_for_height.get() {
            Dimension::Auto
        } else {
            placeholder_height
        }
    });

    let inner = Rc::new(GateInner {
        index,
        state: Cell::new(GateState::Idle),
        torn_down: Cell::new(false),
        triggered: Cell::new(false),
        config: Cell::new(config.get()),
        handle: RefCell::new(None),
        retry: Cell::new(false),
        children: RefCell::new(Some(children)),
        child_cleanup: RefCell::new(None),
        revealed,
        revealed_at: Cell::new(None),
        transition,
        config_binding: RefCell::new(None),
    });

    GATES.with(|gates| {
        gates.borrow_mut().insert(index, inner.clone());
    });

    // Released along with a parent: same teardown, index already going away
    let weak = Rc::downgrade(&inner);
    on_destroy(index, move || {
        if let Some(gate) = weak.upgrade() {
            gate.shutdown();
        }
    });

    inner.observe();

    if config.is_reactive() {
        let weak = Rc::downgrade(&inner);
        let stop = effect(move || {
            let next = config.get();
            if let Some(gate) = weak.upgrade() {
                gate.set_config(next);
            }
        });
        *inner.config_binding.borrow_mut() = Some(Box::new(stop));
    }

    tracing::debug!(index, state = ?inner.state.get(), "lazy section mounted");

    LazyGate { inner }
}

/// Run per-frame gate work: retry Idle gates, advance reveal fades.
pub fn on_frame(now: Duration) {
    let gates: Vec<Rc<GateInner>> = GATES.with(|gates| gates.borrow().values().cloned().collect());
    for gate in gates {
        gate.frame(now);
    }
}

/// Whether `index` is a lazy placeholder still waiting to reveal.
pub fn is_pending_placeholder(index: usize) -> bool {
    GATES.with(|gates| {
        gates
            .borrow()
            .get(&index)
            .is_some_and(|gate| gate.state.get() != GateState::Revealed)
    })
}

/// Number of mounted lazy sections.
pub fn gate_count() -> usize {
    GATES.with(|gates| gates.borrow().len())
}

/// Drop every gate without running teardown (for testing).
pub fn reset_gates() {
    let gates = GATES.with(|gates| std::mem::take(&mut *gates.borrow_mut()));
    drop(gates);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{clear_diagnostic_hook, set_diagnostic_hook};
    use crate::engine::{get_allocated_count, reset_registry};
    use crate::layout::{Bounds, compute_layout};
    use crate::observe::{
        active_session_count, deliver_pending, reset_monitor, run_observations, session_config,
        sessions_begun, sessions_ended, set_observation_supported,
    };
    use crate::primitives::{BoxProps, TextProps, box_primitive, text};

    fn setup() {
        reset_gates();
        reset_registry();
        reset_monitor();
        clear_diagnostic_hook();
        clock::set_now(Duration::ZERO);
    }

    /// One frame's observation work against a viewport at `scroll`.
    fn drive(scroll: f32) {
        deliver_pending();
        on_frame(clock::now());
        let layout = compute_layout(80);
        run_observations(&layout, Bounds::new(0.0, scroll, 80.0, 24.0));
        deliver_pending();
    }

    fn counted_children(built: Rc<Cell<usize>>, cleaned: Rc<Cell<usize>>) -> LazyProps {
        LazyProps::new(move || {
            built.set(built.get() + 1);
            text(TextProps {
                content: "Projects".into(),
                ..Default::default()
            });
            Box::new(move || cleaned.set(cleaned.get() + 1))
        })
    }

    fn zero_margin() -> ObservationConfig {
        ObservationConfig::new(0.1, "0").unwrap()
    }

    /// Page with a tall spacer, then a lazy section far below the fold.
    fn page_with_offscreen_gate(props: LazyProps) -> LazyGate {
        let gate = Rc::new(RefCell::new(None));
        let gate_slot = gate.clone();
        box_primitive(BoxProps {
            children: Some(Box::new(move || {
                box_primitive(BoxProps {
                    height: Some(Dimension::Cells(100).into()),
                    ..Default::default()
                });
                *gate_slot.borrow_mut() = Some(lazy_section(props));
            })),
            ..Default::default()
        });
        gate.borrow_mut().take().unwrap()
    }

    #[test]
    fn test_children_not_built_before_reveal() {
        setup();
        let built = Rc::new(Cell::new(0));
        let mut props = counted_children(built.clone(), Rc::new(Cell::new(0)));
        props.config = zero_margin().into();

        let gate = page_with_offscreen_gate(props);
        assert_eq!(gate.state(), GateState::Observing);

        drive(0.0);
        drive(10.0);
        assert_eq!(built.get(), 0);
        assert!(!gate.has_triggered());
        assert!(!gate.revealed().get());
    }

    #[test]
    fn test_reveals_at_most_once() {
        setup();
        let built = Rc::new(Cell::new(0));
        let mut props = counted_children(built.clone(), Rc::new(Cell::new(0)));
        props.config = zero_margin().into();
        let gate = page_with_offscreen_gate(props);

        // Scroll in, out and back in again
        for scroll in [0.0, 95.0, 0.0, 95.0, 200.0] {
            drive(scroll);
        }

        assert_eq!(built.get(), 1);
        assert_eq!(gate.state(), GateState::Revealed);
        assert!(gate.has_triggered());
        assert!(gate.revealed().get());
        // Observation stopped on reveal
        assert_eq!(active_session_count(), 0);
        assert_eq!(sessions_ended(), 1);
    }

    #[test]
    fn test_children_attach_under_placeholder() {
        setup();
        let mut props = counted_children(Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));
        props.config = zero_margin().into();
        let gate = page_with_offscreen_gate(props);

        drive(95.0);
        let child = crate::engine::get_children(gate.index());
        assert_eq!(child.len(), 1);
        assert_eq!(core::get_component_type(child[0]), ComponentType::Text);
    }

    #[test]
    fn test_teardown_before_reveal_ends_session_once() {
        setup();
        let built = Rc::new(Cell::new(0));
        let mut props = counted_children(built.clone(), Rc::new(Cell::new(0)));
        props.config = zero_margin().into();
        let gate = page_with_offscreen_gate(props);

        // Record queued for an intersecting target, not yet delivered
        let layout = compute_layout(80);
        run_observations(&layout, Bounds::new(0.0, 95.0, 80.0, 24.0));

        gate.teardown();
        gate.teardown();
        assert_eq!(sessions_ended(), 1);
        assert!(!gate.is_alive());
        assert_eq!(gate.state(), GateState::Idle);

        // The late record is absorbed; nothing gets built
        deliver_pending();
        assert_eq!(built.get(), 0);
        assert!(!is_allocated(gate.index()));
    }

    #[test]
    fn test_teardown_after_reveal_cleans_children() {
        setup();
        let cleaned = Rc::new(Cell::new(0));
        let mut props = counted_children(Rc::new(Cell::new(0)), cleaned.clone());
        props.config = zero_margin().into();
        let gate = page_with_offscreen_gate(props);

        drive(95.0);
        let before = get_allocated_count();
        gate.clone().into_cleanup()();
        assert_eq!(cleaned.get(), 1);
        // Placeholder and its text child are gone
        assert_eq!(get_allocated_count(), before - 2);
        // Teardown is final, and the cleanup ran once
        gate.teardown();
        assert_eq!(cleaned.get(), 1);
        assert_eq!(sessions_ended(), 1);
    }

    #[test]
    fn test_released_with_parent() {
        setup();
        let built = Rc::new(Cell::new(0));
        let gate_slot = Rc::new(RefCell::new(None));
        let slot = gate_slot.clone();
        let built_for_props = built.clone();

        let cleanup = box_primitive(BoxProps {
            children: Some(Box::new(move || {
                let props = counted_children(built_for_props, Rc::new(Cell::new(0)));
                *slot.borrow_mut() = Some(lazy_section(props));
            })),
            ..Default::default()
        });
        let gate: LazyGate = gate_slot.borrow_mut().take().unwrap();
        assert_eq!(active_session_count(), 1);

        cleanup();
        assert!(!gate.is_alive());
        assert_eq!(active_session_count(), 0);
        assert_eq!(gate_count(), 0);

        drive(0.0);
        assert_eq!(built.get(), 0);
    }

    #[test]
    fn test_set_config_restarts_before_reveal() {
        setup();
        let mut props = counted_children(Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));
        props.config = zero_margin().into();
        let gate = page_with_offscreen_gate(props);

        // Unchanged config: no restart
        gate.set_config(zero_margin());
        assert_eq!(sessions_begun(), 1);

        let wider = ObservationConfig::new(0.5, "200px").unwrap();
        gate.set_config(wider);
        assert_eq!(sessions_begun(), 2);
        assert_eq!(sessions_ended(), 1);
        assert_eq!(active_session_count(), 1);
        assert_eq!(gate.config(), wider);
        let handle_config = gate.inner.handle.borrow().as_ref().and_then(session_config);
        assert_eq!(handle_config, Some(wider));
    }

    #[test]
    fn test_set_config_after_reveal_is_inert() {
        setup();
        let mut props = counted_children(Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));
        props.config = zero_margin().into();
        let gate = page_with_offscreen_gate(props);
        drive(95.0);
        assert_eq!(gate.state(), GateState::Revealed);

        let begun = sessions_begun();
        gate.set_config(ObservationConfig::new(0.9, "0").unwrap());
        assert_eq!(sessions_begun(), begun);
        assert_eq!(gate.config(), zero_margin());
        assert_eq!(gate.state(), GateState::Revealed);
    }

    #[test]
    fn test_reactive_config_signal() {
        setup();
        let config = signal(zero_margin());
        let mut props = counted_children(Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));
        props.config = config.clone().into();
        let gate = page_with_offscreen_gate(props);
        assert_eq!(sessions_begun(), 1);

        let next = ObservationConfig::new(0.3, "10%").unwrap();
        config.set(next);
        assert_eq!(gate.config(), next);
        assert_eq!(sessions_begun(), 2);
        assert_eq!(active_session_count(), 1);
    }

    #[test]
    fn test_margin_reveals_early() {
        setup();
        let mut props = counted_children(Rc::new(Cell::new(0)), Rc::new(Cell::new(0)));
        // 400px below the fold is 25 rows
        props.config = ObservationConfig::new(0.0, "400px").unwrap().into();
        let gate = page_with_offscreen_gate(props);

        // Placeholder starts at row 100; the expanded viewport ends 49 rows
        // below the scroll offset
        drive(50.0);
        assert_eq!(gate.state(), GateState::Observing);
        drive(52.0);
        assert_eq!(gate.state(), GateState::Revealed);
    }

    #[test]
    fn test_unsupported_environment_stays_idle() {
        setup();
        set_observation_supported(false);
        let built = Rc::new(Cell::new(0));
        let gate = lazy_section(counted_children(built.clone(), Rc::new(Cell::new(0))));

        assert_eq!(gate.state(), GateState::Idle);
        drive(0.0);
        assert_eq!(gate.state(), GateState::Idle);
        assert_eq!(built.get(), 0);

        // A gate mounted without observation never reveals
        set_observation_supported(true);
        drive(0.0);
        drive(0.0);
        assert_eq!(gate.state(), GateState::Idle);
        assert_eq!(built.get(), 0);
        assert_eq!(sessions_begun(), 0);
    }

    #[test]
    fn test_fade_in_after_reveal() {
        setup();
        let gate = lazy_section(LazyProps {
            config: zero_margin().into(),
            ..LazyProps::new(|| Box::new(|| {}))
        });
        assert_eq!(visual::get_opacity(gate.index()), 0.0);

        clock::set_now(Duration::from_millis(1000));
        drive(0.0);
        assert_eq!(gate.state(), GateState::Revealed);

        clock::set_now(Duration::from_millis(1150));
        on_frame(clock::now());
        let halfway = visual::get_opacity(gate.index());
        assert!(halfway > 0.5 && halfway < 1.0);

        clock::set_now(Duration::from_millis(1300));
        on_frame(clock::now());
        assert_eq!(visual::get_opacity(gate.index()), 1.0);
    }

    #[test]
    fn test_placeholder_classes_and_height() {
        setup();
        let gate = lazy_section(LazyProps {
            visual_class: "projects".into(),
            placeholder_height: Dimension::Cells(6),
            config: zero_margin().into(),
            ..LazyProps::new(|| Box::new(|| {}))
        });

        let index = gate.index();
        assert_eq!(core::get_class_list(index), "lazy-section lazy-pending projects");
        assert_eq!(sizing::get_min_height(index), Dimension::Cells(6));
        assert!(is_pending_placeholder(index));

        drive(0.0);
        assert_eq!(core::get_class_list(index), "lazy-section lazy-revealed projects");
        assert_eq!(sizing::get_min_height(index), Dimension::Auto);
        assert!(!is_pending_placeholder(index));
    }

    #[test]
    fn test_late_record_after_teardown_reports_diagnostic() {
        setup();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        set_diagnostic_hook(move |d| sink.borrow_mut().push(d.clone()));

        let gate = lazy_section(LazyProps {
            config: zero_margin().into(),
            ..LazyProps::new(|| Box::new(|| {}))
        });
        let index = gate.index();
        let layout = compute_layout(80);
        run_observations(&layout, Bounds::new(0.0, 0.0, 80.0, 24.0));
        gate.teardown();
        deliver_pending();

        assert!(seen.borrow().contains(&Diagnostic::PrematureCallback { target: index }));
        clear_diagnostic_hook();
    }
}
