//! Viewport intersection observation.
//!
//! - [`margin`]: CSS root margin parsing and expansion
//! - [`config`]: per-session threshold and margin
//! - [`geometry`]: intersection ratio and visibility test
//! - [`monitor`]: session lifecycle and two-phase change delivery

pub mod config;
pub mod geometry;
pub mod margin;
pub mod monitor;

pub use config::{DEFAULT_ROOT_MARGIN, DEFAULT_THRESHOLD, ObservationConfig};
pub use geometry::{Intersection, intersect, is_intersecting};
pub use margin::{CELL_HEIGHT_PX, CELL_WIDTH_PX, MarginLength, RootMargin};
pub use monitor::{
    ObserverHandle, active_session_count, begin, deliver_pending, is_observation_supported,
    pending_count, reset_monitor, run_observations, session_config, sessions_begun,
    sessions_ended, set_observation_supported,
};
