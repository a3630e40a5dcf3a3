/// Static horizontal band of the frame in which targets are accepted.
///
/// Centroids left of `left_limit` or right of `right_limit` (sidelines,
/// benches) are discarded. Both limits are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionGate {
    left_limit: i32,
    right_limit: i32,
}

impl RegionGate {
    #[inline]
    pub fn new(left_limit: i32, right_limit: i32) -> Self {
        Self {
            left_limit,
            right_limit,
        }
    }

    /// Derive the band from the frame width as `floor(fraction * width)` on each side.
    pub fn from_frame_width(width: u32, left_fraction: f64, right_fraction: f64) -> Self {
        let w = f64::from(width);
        Self::new(
            (left_fraction * w).floor() as i32,
            (right_fraction * w).floor() as i32,
        )
    }

    #[inline]
    pub fn admits(&self, centroid_x: i32) -> bool {
        self.left_limit <= centroid_x && centroid_x <= self.right_limit
    }

    #[inline]
    pub fn left_limit(&self) -> i32 {
        self.left_limit
    }

    #[inline]
    pub fn right_limit(&self) -> i32 {
        self.right_limit
    }
}
