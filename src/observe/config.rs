//! Observation configuration - threshold and root margin for one session.

use super::margin::RootMargin;
use crate::error::{Error, Result};

/// Default visible fraction required before a target counts as intersecting.
pub const DEFAULT_THRESHOLD: f32 = 0.1;

/// Default root margin, as CSS.
pub const DEFAULT_ROOT_MARGIN: &str = "50px";

/// Threshold and root margin for one observation session.
///
/// Immutable once handed to a session; changing configuration means ending
/// the session and beginning another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationConfig {
    threshold: f32,
    root_margin: RootMargin,
}

impl ObservationConfig {
    /// Validate and build a configuration.
    pub fn new(threshold: f32, root_margin: &str) -> Result<Self> {
        let root_margin = root_margin.parse()?;
        Self::with_margin(threshold, root_margin)
    }

    /// Build from an already parsed margin.
    pub fn with_margin(threshold: f32, root_margin: RootMargin) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(Error::InvalidThreshold(threshold));
        }
        Ok(Self {
            threshold,
            root_margin,
        })
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn root_margin(&self) -> RootMargin {
        self.root_margin
    }
}

impl Default for ObservationConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            root_margin: RootMargin::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_constants() {
        let config = ObservationConfig::default();
        assert_eq!(config.threshold(), DEFAULT_THRESHOLD);
        assert_eq!(config.root_margin(), DEFAULT_ROOT_MARGIN.parse().unwrap());
    }

    #[test]
    fn test_threshold_bounds() {
        assert!(ObservationConfig::new(0.0, "0").is_ok());
        assert!(ObservationConfig::new(1.0, "0").is_ok());
        assert!(matches!(
            ObservationConfig::new(1.5, "0"),
            Err(Error::InvalidThreshold(_))
        ));
        assert!(ObservationConfig::new(-0.1, "0").is_err());
        assert!(ObservationConfig::new(f32::NAN, "0").is_err());
    }

    #[test]
    fn test_invalid_margin_rejected() {
        assert!(matches!(
            ObservationConfig::new(0.5, "wide"),
            Err(Error::InvalidRootMargin(_))
        ));
    }
}
