//! Primitives - Component building blocks.
//!
//! - [`box_primitive`] - Container with flexbox layout, borders, and background
//! - [`text`] - Text display with wrapping
//! - [`canvas`] - Fixed-height host for an animated scene
//! - [`lazy_section`] - Placeholder that builds its children on first visibility
//!
//! # Architecture
//!
//! Components are indices into parallel arrays (ECS pattern). Each component:
//! 1. Allocates an index from the registry
//! 2. Binds props into the arrays (getters keep signals connected)
//! 3. Builds its children with itself as parent context
//! 4. Returns a cleanup function
//!
//! Props can be:
//! - Static values: `height: Dimension::Cells(4).into()`
//! - Signals: `height: my_signal.into()` (stays connected)
//! - Getters: `PropValue::Getter(Rc::new(|| compute_height()))`
//!
//! Pass signals directly; extracting the value before binding breaks reactivity.

mod box_primitive;
mod canvas;
pub mod lazy;
mod text;
mod types;

pub use box_primitive::box_primitive;
pub use canvas::canvas;
pub use lazy::{GateState, LAZY_SECTION_CLASS, LazyGate, lazy_section};
pub use text::text;
pub use types::*;
