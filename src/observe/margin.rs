//! Root margin - CSS margin shorthand that grows or shrinks the viewport
//! before intersection is tested.
//!
//! Accepted syntax matches the browser's: one to four whitespace-separated
//! lengths in `px` or `%` (a bare `0` is allowed), expanded like `margin`:
//!
//! ```text
//! "50px"              → all four sides
//! "10px 20px"         → top/bottom, left/right
//! "10px 20px 30px"    → top, left/right, bottom
//! "1px 2px 3px 4px"   → top, right, bottom, left
//! ```
//!
//! Pixels convert to cells through the fixed terminal cell size; percentages
//! resolve against the root's height (top/bottom) or width (left/right).

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::layout::Bounds;

/// Width of one terminal cell in CSS pixels.
pub const CELL_WIDTH_PX: f32 = 8.0;

/// Height of one terminal cell in CSS pixels.
pub const CELL_HEIGHT_PX: f32 = 16.0;

/// One side of a root margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarginLength {
    Px(f32),
    Percent(f32),
}

impl MarginLength {
    fn parse(token: &str) -> Option<Self> {
        if token == "0" {
            return Some(MarginLength::Px(0.0));
        }
        if let Some(value) = token.strip_suffix("px") {
            return value.parse::<f32>().ok().filter(|v| v.is_finite()).map(MarginLength::Px);
        }
        if let Some(value) = token.strip_suffix('%') {
            return value.parse::<f32>().ok().filter(|v| v.is_finite()).map(MarginLength::Percent);
        }
        None
    }

    /// Resolve to cells. `cell_px` is the cell size along this axis,
    /// `root_extent` the root's size along it in cells.
    fn to_cells(self, cell_px: f32, root_extent: f32) -> f32 {
        match self {
            MarginLength::Px(px) => px / cell_px,
            MarginLength::Percent(p) => root_extent * p / 100.0,
        }
    }
}

impl fmt::Display for MarginLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarginLength::Px(v) => write!(f, "{}px", v),
            MarginLength::Percent(v) => write!(f, "{}%", v),
        }
    }
}

/// Margin applied around the root before intersection testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootMargin {
    pub top: MarginLength,
    pub right: MarginLength,
    pub bottom: MarginLength,
    pub left: MarginLength,
}

impl RootMargin {
    /// No margin.
    pub const ZERO: Self = Self::uniform(MarginLength::Px(0.0));

    pub const fn uniform(length: MarginLength) -> Self {
        Self {
            top: length,
            right: length,
            bottom: length,
            left: length,
        }
    }

    /// Grow (positive) or shrink (negative) `root` by this margin.
    pub fn expand(&self, root: Bounds) -> Bounds {
        let top = self.top.to_cells(CELL_HEIGHT_PX, root.height);
        let bottom = self.bottom.to_cells(CELL_HEIGHT_PX, root.height);
        let left = self.left.to_cells(CELL_WIDTH_PX, root.width);
        let right = self.right.to_cells(CELL_WIDTH_PX, root.width);

        Bounds::new(
            root.x - left,
            root.y - top,
            (root.width + left + right).max(0.0),
            (root.height + top + bottom).max(0.0),
        )
    }
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::uniform(MarginLength::Px(50.0))
    }
}

impl FromStr for RootMargin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidRootMargin(s.to_string());

        let parts = s
            .split_whitespace()
            .map(|token| MarginLength::parse(token).ok_or_else(invalid))
            .collect::<Result<Vec<_>>>()?;

        let (top, right, bottom, left) = match parts.as_slice() {
            [all] => (*all, *all, *all, *all),
            [vertical, horizontal] => (*vertical, *horizontal, *vertical, *horizontal),
            [top, horizontal, bottom] => (*top, *horizontal, *bottom, *horizontal),
            [top, right, bottom, left] => (*top, *right, *bottom, *left),
            _ => return Err(invalid()),
        };

        Ok(Self { top, right, bottom, left })
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_value() {
        let m: RootMargin = "50px".parse().unwrap();
        assert_eq!(m, RootMargin::uniform(MarginLength::Px(50.0)));
        assert_eq!(m, RootMargin::default());
    }

    #[test]
    fn test_parse_shorthand_expansion() {
        let m: RootMargin = "10px 20%".parse().unwrap();
        assert_eq!(m.top, MarginLength::Px(10.0));
        assert_eq!(m.bottom, MarginLength::Px(10.0));
        assert_eq!(m.left, MarginLength::Percent(20.0));
        assert_eq!(m.right, MarginLength::Percent(20.0));

        let m: RootMargin = "1px 2px 3px".parse().unwrap();
        assert_eq!(m.right, MarginLength::Px(2.0));
        assert_eq!(m.left, MarginLength::Px(2.0));
        assert_eq!(m.bottom, MarginLength::Px(3.0));

        let m: RootMargin = "0 -4px 3px 4%".parse().unwrap();
        assert_eq!(m.top, MarginLength::Px(0.0));
        assert_eq!(m.right, MarginLength::Px(-4.0));
        assert_eq!(m.left, MarginLength::Percent(4.0));
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!("".parse::<RootMargin>().is_err());
        assert!("50".parse::<RootMargin>().is_err());
        assert!("50em".parse::<RootMargin>().is_err());
        assert!("1px 2px 3px 4px 5px".parse::<RootMargin>().is_err());
        assert!("NaNpx".parse::<RootMargin>().is_err());
    }

    #[test]
    fn test_expand_converts_pixels_to_cells() {
        let m: RootMargin = "32px 16px".parse().unwrap();
        let root = Bounds::new(0.0, 10.0, 80.0, 24.0);
        let grown = m.expand(root);

        // 32px tall = 2 rows, 16px wide = 2 columns
        assert_eq!(grown, Bounds::new(-2.0, 8.0, 84.0, 28.0));
    }

    #[test]
    fn test_expand_percent_and_negative() {
        let root = Bounds::new(0.0, 0.0, 80.0, 20.0);

        let m: RootMargin = "50%".parse().unwrap();
        assert_eq!(m.expand(root), Bounds::new(-40.0, -10.0, 160.0, 40.0));

        let m: RootMargin = "-160px 0".parse().unwrap();
        assert_eq!(m.expand(root), Bounds::new(0.0, 10.0, 80.0, 0.0));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let m: RootMargin = "10px 5%".parse().unwrap();
        let again: RootMargin = m.to_string().parse().unwrap();
        assert_eq!(m, again);
    }
}
