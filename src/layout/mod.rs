//! Layout Module
//!
//! Flexbox layout computation for the scrolling document using Taffy.
//!
//! # Architecture
//!
//! The bridge:
//!
//! 1. Converts sizing arrays → Taffy styles
//! 2. Builds the Taffy tree from parent relationships
//! 3. Provides a measure function for wrapped text
//! 4. Extracts absolute positions back to a [`ComputedLayout`]
//!
//! Height is never constrained: the document grows downward and the
//! viewport scrolls over it.

mod types;
mod text_measure;
mod taffy_bridge;

pub use types::*;
pub use text_measure::*;
pub use taffy_bridge::compute_layout;
