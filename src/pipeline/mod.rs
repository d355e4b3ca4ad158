//! Frame Pipeline
//!
//! Connects the component system to the terminal output.
//!
//! # Pipeline Architecture
//!
//! ```text
//! observations → gate frame work → scenes → layout → paint → observations
//!                                                      ↓
//!                                      frame signal → render effect
//! ```
//!
//! ## Data Flow
//!
//! 1. **Page::frame** - runs one frame against the [`clock`], returns a FrameBuffer
//! 2. **frame signal** - tick publishes the buffer
//! 3. **render effect** - watches the signal, calls the blind renderer
//!
//! Observation callbacks run only at the start of a frame, never inside the
//! evaluation pass that queued them.

pub mod clock;
pub mod frame;
pub mod mount;
pub mod page;
pub mod terminal;

// Re-exports
pub use frame::{FrameBuffer, paint};
pub use mount::{KeyHandler, MountHandle, apply_default_key, mount, run, tick};
pub use page::{FrameHook, Page};
pub use terminal::{
    detect_terminal_size, set_terminal_size, terminal_height, terminal_height_signal, terminal_width,
    terminal_width_signal, viewport_px_width,
};
