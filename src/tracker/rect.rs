use crate::tracker::position::Position;

/// Axis-aligned bounding box as produced by a detector.
///
/// Stored as the detector's own corners (TLBR) so that pixel conversion works
/// on exactly the values the detector reported.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// Left edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
    /// Right edge
    pub x2: f32,
    /// Bottom edge
    pub y2: f32,
}

impl Rect {
    /// Create a Rect from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    ///
    /// Inverted corners are kept as given so that [`Rect::is_well_formed`]
    /// can reject them later.
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a Rect from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn from_tlwh(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self::from_tlbr(left, top, left + width, top + height)
    }

    /// Create a Rect from its center and dimensions (XYWH format).
    #[inline]
    pub fn from_xywh(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::from_tlbr(
            cx - width / 2.0,
            cy - height / 2.0,
            cx + width / 2.0,
            cy + height / 2.0,
        )
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    /// Get the exact center point of the bounding box.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (
            self.x1 / 2.0 + self.x2 / 2.0,
            self.y1 / 2.0 + self.y2 / 2.0,
        )
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Finite corners and none inverted.
    pub fn is_well_formed(&self) -> bool {
        self.to_tlbr().iter().all(|v| v.is_finite()) && self.x2 >= self.x1 && self.y2 >= self.y1
    }

    /// Integer centroid of the box, `None` for a malformed box.
    ///
    /// Corners are truncated to whole pixels first and the midpoint is floored,
    /// so `(210, 50, 230, 70)` maps to `(220, 60)`.
    pub fn centroid(&self) -> Option<Position> {
        if !self.is_well_formed() {
            return None;
        }
        // Saturate to pixel range, then widen so the sum cannot overflow.
        let [x1, y1, x2, y2] = self.to_tlbr().map(|v| i64::from(v as i32));
        let cx = (x1 + x2).div_euclid(2);
        let cy = (y1 + y2).div_euclid(2);
        Some(Position::new(
            i32::try_from(cx).ok()?,
            i32::try_from(cy).ok()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats() {
        let rect = Rect::from_tlbr(10.0, 20.0, 40.0, 60.0);
        assert_eq!(Rect::from_tlwh(10.0, 20.0, 30.0, 40.0), rect);
        assert_eq!(Rect::from_xywh(25.0, 40.0, 30.0, 40.0), rect);
        assert_eq!(rect.to_tlbr(), [10.0, 20.0, 40.0, 60.0]);
        assert_eq!(rect.center(), (25.0, 40.0));
        assert_eq!(rect.area(), 1200.0);
    }

    #[test]
    fn test_centroid() {
        let rect = Rect::from_tlbr(210.0, 50.0, 230.0, 70.0);
        assert_eq!(rect.centroid(), Some(Position::new(220, 60)));
    }

    #[test]
    fn test_centroid_truncates_then_floors() {
        // 10.9 -> 10, 21.7 -> 21, midpoint 15.5 -> 15
        let rect = Rect::from_tlbr(10.9, 0.0, 21.7, 3.0);
        assert_eq!(rect.centroid(), Some(Position::new(15, 1)));
    }

    #[test]
    fn test_centroid_uses_reported_corners() {
        // 1.9999999 must truncate to 1, not be rebuilt as 2.0 from a width.
        let rect = Rect::from_tlbr(0.2202, 0.2202, 1.9999999, 1.9999999);
        assert_eq!(rect.centroid(), Some(Position::new(0, 0)));
    }

    #[test]
    fn test_huge_finite_box_is_well_formed() {
        let rect = Rect::from_tlbr(-3e38, -3e38, 3e38, 3e38);
        assert!(rect.is_well_formed());
        assert_eq!(rect.centroid(), Some(Position::new(-1, -1)));
    }

    #[test]
    fn test_degenerate_box_has_centroid() {
        let rect = Rect::from_tlbr(5.0, 5.0, 5.0, 5.0);
        assert_eq!(rect.centroid(), Some(Position::new(5, 5)));
    }

    #[test]
    fn test_inverted_box_rejected() {
        let rect = Rect::from_tlbr(230.0, 50.0, 210.0, 70.0);
        assert!(!rect.is_well_formed());
        assert_eq!(rect.centroid(), None);
    }

    #[test]
    fn test_non_finite_box_rejected() {
        assert_eq!(Rect::from_tlbr(f32::NAN, 0.0, 10.0, 10.0).centroid(), None);
        assert_eq!(
            Rect::from_tlbr(0.0, 0.0, f32::INFINITY, 10.0).centroid(),
            None
        );
    }
}
