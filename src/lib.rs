//! # folio-tui
//!
//! A portfolio page for the terminal, built on
//! [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity.
//!
//! ## Architecture
//!
//! Components are indices into columnar arrays (ECS-style) rather than
//! objects. Each frame runs one fixed pipeline:
//! ```text
//! deliver observations → gate work → scene steps → layout → paint → observe
//! ```
//! and the finished frame is published through a signal that the single
//! render effect diffs onto the terminal.
//!
//! Three pieces carry the page:
//!
//! - the viewport intersection monitor ([`observe`]) reports when a target
//!   enters or leaves the root-margin-expanded viewport
//! - lazy sections ([`primitives::lazy_section`]) reserve a placeholder and
//!   build their content on the first intersecting record, exactly once
//! - scoped styles ([`style`]) keep a section's animation block in the
//!   document while at least one holder is mounted
//!
//! ## Modules
//!
//! - [`types`] - Core types (Dimension, Rgba, ComponentType, etc.)
//! - [`engine`] - Component registry and parallel arrays
//! - [`layout`] - Taffy layout bridge and text measurement
//! - [`observe`] - Viewport intersection monitor
//! - [`primitives`] - Box, text, canvas and lazy section
//! - [`style`] - Reference-counted style blocks and CSS animations
//! - [`scene`] - Animated 3D scenes rasterized into cells
//! - [`form`] - Contact form with simulated submission
//! - [`pipeline`] - Clock, painter, page runtime and mount
//! - [`renderer`] - Differential terminal renderer
//! - [`site`] - The portfolio sections
//! - [`config`] - JSON site configuration

pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod form;
pub mod layout;
pub mod observe;
pub mod pipeline;
pub mod primitives;
pub mod renderer;
pub mod scene;
pub mod site;
pub mod style;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{GateConfig, GateOverride, SectionContent, SiteConfig, SiteContent};
pub use error::{Error, Result};

pub use engine::{
    allocate_index, get_allocated_indices, get_current_parent_index, get_id, get_index,
    is_allocated, on_destroy, pop_parent_context, push_parent_context, release_index,
    reset_registry,
};

pub use layout::{Bounds, ComputedLayout, compute_layout, measure_text_height, string_width, wrap_text};

pub use observe::{ObservationConfig, ObserverHandle, RootMargin};

pub use primitives::{
    BoxProps, CanvasProps, Cleanup, GateState, LazyGate, LazyProps, PropValue, TextProps,
    box_primitive, canvas, lazy_section, text,
};

pub use style::{StyleGuard, acquire_style, release_style, scoped_style, style_ref_count};

pub use form::{ContactForm, Field, FormError, SimulatedSubmitter, SubmitStatus, Submitter};

pub use pipeline::{
    FrameBuffer, MountHandle, Page, mount, run, set_terminal_size, terminal_height, terminal_width,
    tick,
};

pub use renderer::DiffRenderer;

pub use site::{FormController, SiteHandle, build_site};
