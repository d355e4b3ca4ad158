//! Terminal renderer - the "blind" output layer.
//!
//! The renderer knows only about cells. It doesn't understand components,
//! layout, or reactivity. It takes a painted FrameBuffer and writes the
//! cells that changed since the previous frame as crossterm commands.

pub mod diff;

pub use crate::pipeline::frame::FrameBuffer;
pub use diff::DiffRenderer;
