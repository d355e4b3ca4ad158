//! Frame clock.
//!
//! Everything time-based (reveal transitions, css animations, scene steps,
//! the simulated form submission) reads this clock instead of the wall
//! clock, so a frame is painted against one consistent instant and tests
//! can drive time by hand.

use std::cell::Cell;
use std::time::Duration;

thread_local! {
    static NOW: Cell<Duration> = const { Cell::new(Duration::ZERO) };
}

/// Time of the current frame, measured from mount.
pub fn now() -> Duration {
    NOW.with(Cell::get)
}

/// Advance (or reset) the frame clock.
pub fn set_now(now: Duration) {
    NOW.with(|clock| clock.set(now));
}
