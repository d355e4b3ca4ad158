//! Terminal state signals.
//!
//! The terminal size is the root signal of the page: the layout width, the
//! viewport height and the media queries of every style block follow it.

use std::cell::RefCell;

use spark_signals::{Signal, signal};

use crate::observe::CELL_WIDTH_PX;

// =============================================================================
// Terminal Size Signals
// =============================================================================

thread_local! {
    static TERMINAL_WIDTH: RefCell<Signal<u16>> = RefCell::new(signal(80));
    static TERMINAL_HEIGHT: RefCell<Signal<u16>> = RefCell::new(signal(24));
}

/// Get the current terminal width.
pub fn terminal_width() -> u16 {
    TERMINAL_WIDTH.with(|w| w.borrow().get())
}

/// Get the current terminal height.
pub fn terminal_height() -> u16 {
    TERMINAL_HEIGHT.with(|h| h.borrow().get())
}

/// Set the terminal size (called on resize events).
pub fn set_terminal_size(width: u16, height: u16) {
    TERMINAL_WIDTH.with(|w| w.borrow().set(width.max(1)));
    TERMINAL_HEIGHT.with(|h| h.borrow().set(height.max(1)));
}

/// Get the terminal width signal for reactive tracking.
pub fn terminal_width_signal() -> Signal<u16> {
    TERMINAL_WIDTH.with(|w| w.borrow().clone())
}

/// Get the terminal height signal for reactive tracking.
pub fn terminal_height_signal() -> Signal<u16> {
    TERMINAL_HEIGHT.with(|h| h.borrow().clone())
}

/// Terminal width in CSS pixels, for media queries.
pub fn viewport_px_width() -> f32 {
    terminal_width() as f32 * CELL_WIDTH_PX
}

// =============================================================================
// Terminal Detection
// =============================================================================

/// Detect and set the actual terminal size from the environment.
///
/// Uses crossterm to query the terminal dimensions.
pub fn detect_terminal_size() {
    match crossterm::terminal::size() {
        Ok((width, height)) => set_terminal_size(width, height),
        Err(error) => tracing::debug!(%error, "terminal size unavailable, keeping current"),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_size() {
        set_terminal_size(120, 40);
        assert_eq!(terminal_width(), 120);
        assert_eq!(terminal_height(), 40);
        assert_eq!(viewport_px_width(), 960.0);
    }

    #[test]
    fn test_zero_size_is_clamped() {
        set_terminal_size(0, 0);
        assert_eq!(terminal_width(), 1);
        assert_eq!(terminal_height(), 1);
        set_terminal_size(80, 24);
    }
}
