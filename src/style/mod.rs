//! Styles - reference-counted style blocks and the animations they carry.
//!
//! - [`registry`]: scoped style lifecycle (acquire on mount, release on cleanup)
//! - [`css`]: parser for the animation subset of CSS
//! - [`easing`]: timing functions
//! - [`animation`]: resolve an element's animated opacity and offset

pub mod animation;
pub mod css;
pub mod easing;
pub mod registry;

pub use animation::{AnimatedStyle, resolve_animation, resolve_with_sheets};
pub use css::{AnimationSpec, FillMode, Iterations, Keyframes, MediaQuery, StyleSheet};
pub use easing::Easing;
pub use registry::{
    StyleGuard, StyleRegistry, acquire_style, active_sheets, active_style_ids, is_style_active,
    release_style, reset_styles, scoped_style, style_css_text, style_ref_count,
};
