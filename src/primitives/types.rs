//! Primitive types - Props and cleanup.
//!
//! These types define the interface for component props.
//! Props support static values, signals, and getters for reactivity.

use std::rc::Rc;
use std::time::Duration;

use spark_signals::Signal;

use crate::observe::ObservationConfig;
use crate::scene::Scene;
use crate::types::{Attr, BorderStyle, Dimension, FlexDirection, Rgba, TextAlign};

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by components.
///
/// Call this to unmount the component and release resources.
pub type Cleanup = Box<dyn FnOnce()>;

/// Deferred subtree builder. Runs with the owning component as parent
/// context and returns the subtree's cleanup.
pub type Children = Box<dyn FnOnce() -> Cleanup>;

// =============================================================================
// Prop Value - Reactive property wrapper
// =============================================================================

/// A property value that can be static, a signal, or a getter.
///
/// Bound into the parallel arrays as a getter, so the reactive connection
/// is preserved: the painter reads the live value every frame.
#[derive(Clone)]
pub enum PropValue<T: Clone + PartialEq + 'static> {
    /// Static value (not reactive).
    Static(T),
    /// Reactive signal (changes propagate automatically).
    Signal(Signal<T>),
    /// Getter function (called each time value is needed).
    Getter(Rc<dyn Fn() -> T>),
}

impl<T: Clone + PartialEq + 'static> PropValue<T> {
    /// Get the current value (for immediate reads).
    pub fn get(&self) -> T {
        match self {
            PropValue::Static(v) => v.clone(),
            PropValue::Signal(s) => s.get(),
            PropValue::Getter(f) => f(),
        }
    }

    /// Whether the value can change after binding.
    pub fn is_reactive(&self) -> bool {
        !matches!(self, PropValue::Static(_))
    }

    /// Bind into an array: static values are written once, anything
    /// reactive is installed as a getter.
    pub(crate) fn bind(
        self,
        index: usize,
        set_value: fn(usize, T),
        set_getter: impl FnOnce(usize, Rc<dyn Fn() -> T>),
    ) {
        match self {
            PropValue::Static(v) => set_value(index, v),
            PropValue::Signal(s) => set_getter(index, Rc::new(move || s.get())),
            PropValue::Getter(g) => set_getter(index, g),
        }
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for PropValue<T> {
    fn default() -> Self {
        PropValue::Static(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> From<T> for PropValue<T> {
    fn from(value: T) -> Self {
        PropValue::Static(value)
    }
}

impl<T: Clone + PartialEq + 'static> From<Signal<T>> for PropValue<T> {
    fn from(signal: Signal<T>) -> Self {
        PropValue::Signal(signal)
    }
}

impl From<u16> for PropValue<Dimension> {
    fn from(value: u16) -> Self {
        PropValue::Static(Dimension::from(value))
    }
}

impl From<&str> for PropValue<String> {
    fn from(value: &str) -> Self {
        PropValue::Static(value.to_string())
    }
}

// =============================================================================
// Box Props
// =============================================================================

/// Properties for the Box component.
///
/// # Example
///
/// ```ignore
/// use folio_tui::primitives::{box_primitive, text, BoxProps, TextProps};
///
/// let cleanup = box_primitive(BoxProps {
///     padding: Some(1),
///     border: Some(BorderStyle::Rounded),
///     children: Some(Box::new(|| {
///         text(TextProps { content: "About me".into(), ..Default::default() });
///     })),
///     ..Default::default()
/// });
/// ```
#[derive(Default)]
pub struct BoxProps {
    /// Optional component ID for lookup.
    pub id: Option<String>,
    /// Whether the component is visible (default: true).
    pub visible: Option<PropValue<bool>>,
    /// Space-separated classes matched against active style sheets.
    pub class: Option<PropValue<String>>,

    pub direction: Option<FlexDirection>,
    pub width: Option<PropValue<Dimension>>,
    pub height: Option<PropValue<Dimension>>,
    pub min_height: Option<PropValue<Dimension>>,
    pub padding: Option<u16>,
    pub gap: Option<u16>,

    pub border: Option<BorderStyle>,
    pub border_color: Option<Rgba>,
    pub fg: Option<PropValue<Rgba>>,
    pub bg: Option<PropValue<Rgba>>,
    pub opacity: Option<f32>,

    /// Child components, built with this box as parent context.
    pub children: Option<Box<dyn FnOnce()>>,
}

// =============================================================================
// Text Props
// =============================================================================

/// Properties for the Text component.
#[derive(Default)]
pub struct TextProps {
    pub id: Option<String>,
    pub visible: Option<PropValue<bool>>,
    pub class: Option<PropValue<String>>,
    /// Text to display (required).
    pub content: PropValue<String>,
    pub fg: Option<PropValue<Rgba>>,
    pub attrs: Option<Attr>,
    pub align: Option<TextAlign>,
}

// =============================================================================
// Canvas Props
// =============================================================================

/// Properties for the Canvas component - a fixed-height host for a scene.
#[derive(Default)]
pub struct CanvasProps {
    pub id: Option<String>,
    pub class: Option<PropValue<String>>,
    /// Rows reserved for the scene.
    pub height: u16,
    /// Scene stepped and rasterized into this canvas every frame.
    pub scene: Option<Scene>,
}

// =============================================================================
// Lazy Props
// =============================================================================

/// Default fade-in length after a lazy section reveals.
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(300);

/// Default rows reserved by a lazy section before it reveals.
pub const DEFAULT_PLACEHOLDER_HEIGHT: u16 = 12;

/// Properties for a visibility-gated lazy section.
pub struct LazyProps {
    pub id: Option<String>,
    /// Observation threshold and root margin. Signals and getters are
    /// re-applied while the section has not revealed yet.
    pub config: PropValue<ObservationConfig>,
    /// Extra class on the placeholder, next to `lazy-section`.
    pub visual_class: String,
    /// Space reserved for the placeholder until the children exist.
    pub placeholder_height: Dimension,
    /// Opacity fade length after reveal.
    pub transition: Duration,
    /// Built at most once, on first intersection.
    pub children: Children,
}

impl LazyProps {
    /// Props with default configuration around `children`.
    pub fn new(children: impl FnOnce() -> Cleanup + 'static) -> Self {
        Self {
            id: None,
            config: PropValue::Static(ObservationConfig::default()),
            visual_class: String::new(),
            placeholder_height: Dimension::Cells(DEFAULT_PLACEHOLDER_HEIGHT),
            transition: DEFAULT_TRANSITION,
            children: Box::new(children),
        }
    }
}
