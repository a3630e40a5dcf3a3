//! Per-frame detector output consumed by the tracker.

use crate::tracker::position::Position;
use crate::tracker::rect::Rect;

/// One candidate object found in a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Bounding box, built from TLBR corners (x1, y1, x2, y2)
    pub bbox: Rect,
    /// Detection confidence score
    pub score: f32,
}

impl Detection {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32, score: f32) -> Self {
        Self {
            bbox: Rect::from_tlbr(x1, y1, x2, y2),
            score,
        }
    }

    pub fn from_rect(bbox: Rect, score: f32) -> Self {
        Self { bbox, score }
    }

    /// Integer centroid, `None` when the box is malformed.
    #[inline]
    pub fn centroid(&self) -> Option<Position> {
        self.bbox.centroid()
    }
}
