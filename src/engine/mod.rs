//! Engine - Component registry and parallel arrays.
//!
//! The engine manages the core data structures:
//! - Registry: Index allocation, ID mapping, parent context, destroy callbacks
//! - Arrays: Parallel columns for component state
//!
//! # Architecture
//!
//! Components are NOT objects. They are indices into parallel arrays:
//!
//! ```text
//! Index 0: Box         (parent=None, padding=1, visible=true, ...)
//! Index 1: Text        (parent=0,    content="About", fg=orchid, ...)
//! Index 2: Placeholder (parent=0,    min_height=6, opacity=0.0, ...)
//! ```

mod registry;
pub mod arrays;

pub use registry::*;
