//! Intersection geometry.
//!
//! A target intersects when it touches the margin-expanded root; it counts as
//! visible for a session when its visible fraction also reaches the session
//! threshold. Zero-area targets that touch the root are fully visible.

use super::config::ObservationConfig;
use crate::layout::Bounds;

/// Result of testing one target against one root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Target touches the expanded root (edge contact counts).
    pub intersects: bool,
    /// Visible area / target area, in [0, 1].
    pub ratio: f32,
}

/// Test `target` against `root` grown by the config's margin.
pub fn intersect(target: Bounds, root: Bounds, config: &ObservationConfig) -> Intersection {
    let expanded = config.root_margin().expand(root);

    let Some(visible) = target.intersect(&expanded) else {
        return Intersection {
            intersects: false,
            ratio: 0.0,
        };
    };

    let target_area = target.area();
    let ratio = if target_area == 0.0 {
        1.0
    } else {
        (visible.area() / target_area).clamp(0.0, 1.0)
    };

    Intersection {
        intersects: true,
        ratio,
    }
}

/// Whether `target` counts as intersecting under `config`.
pub fn is_intersecting(target: Bounds, root: Bounds, config: &ObservationConfig) -> bool {
    let hit = intersect(target, root, config);
    hit.intersects && hit.ratio >= config.threshold()
}
