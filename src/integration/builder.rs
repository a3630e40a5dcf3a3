//! Detection construction from the box layouts detectors commonly emit.

use crate::tracker::{Detection, Rect};

/// Builds a [`Detection`] from whichever box layout a backend reports.
///
/// Malformed boxes are passed through untouched; the tracker skips them per
/// frame instead of failing the whole frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetectionBuilder {
    bbox: Rect,
    score: f32,
}

impl DetectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Corners (x1, y1, x2, y2), kept exactly as reported.
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.bbox = Rect::from_tlbr(x1, y1, x2, y2);
        self
    }

    /// Center and size, as most YOLO heads report.
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.bbox = Rect::from_xywh(cx, cy, w, h);
        self
    }

    /// Left, top, width, height.
    pub fn tlwh(mut self, left: f32, top: f32, w: f32, h: f32) -> Self {
        self.bbox = Rect::from_tlwh(left, top, w, h);
        self
    }

    pub fn score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    pub fn build(self) -> Detection {
        Detection::from_rect(self.bbox, self.score)
    }
}
