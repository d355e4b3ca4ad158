//! Layout output types.

/// Axis-aligned rectangle in document cells.
///
/// Floating point so margin expansion and fractional viewports compose
/// without rounding drift.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Intersection of two rectangles.
    ///
    /// Edge-adjacent rectangles intersect with zero area; `None` means they
    /// are strictly apart.
    pub fn intersect(&self, other: &Bounds) -> Option<Bounds> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right < left || bottom < top {
            return None;
        }
        Some(Bounds::new(left, top, right - left, bottom - top))
    }
}

/// Computed layout for all components, indexed by component index.
///
/// Positions are absolute document coordinates (not parent-relative).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedLayout {
    pub x: Vec<u16>,
    pub y: Vec<u16>,
    pub width: Vec<u16>,
    pub height: Vec<u16>,
    /// 1 if the index took part in this layout pass.
    pub laid_out: Vec<u8>,
    pub content_width: u16,
    pub content_height: u16,
}

impl ComputedLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layout with room for `size` indices, all unset.
    pub fn with_capacity(size: usize) -> Self {
        Self {
            x: vec![0; size],
            y: vec![0; size],
            width: vec![0; size],
            height: vec![0; size],
            laid_out: vec![0; size],
            content_width: 0,
            content_height: 0,
        }
    }

    /// Absolute rectangle of an index, if it took part in layout.
    pub fn bounds(&self, index: usize) -> Option<Bounds> {
        if self.laid_out.get(index).copied().unwrap_or(0) == 0 {
            return None;
        }
        Some(Bounds::new(
            self.x[index] as f32,
            self.y[index] as f32,
            self.width[index] as f32,
            self.height[index] as f32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect_overlap() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersect(&b), Some(Bounds::new(5.0, 5.0, 5.0, 5.0)));
    }

    #[test]
    fn test_intersect_edge_adjacent_is_zero_area() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(0.0, 10.0, 10.0, 5.0);
        let hit = a.intersect(&b).unwrap();
        assert_eq!(hit.area(), 0.0);
    }

    #[test]
    fn test_intersect_apart() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(0.0, 11.0, 10.0, 5.0);
        assert_eq!(a.intersect(&b), None);
    }

    #[test]
    fn test_bounds_requires_laid_out() {
        let mut layout = ComputedLayout::with_capacity(2);
        assert_eq!(layout.bounds(0), None);
        assert_eq!(layout.bounds(9), None);

        layout.laid_out[1] = 1;
        layout.y[1] = 4;
        layout.width[1] = 20;
        layout.height[1] = 3;
        assert_eq!(layout.bounds(1), Some(Bounds::new(0.0, 4.0, 20.0, 3.0)));
    }
}
