//! Trait for object detection inference backends.

use super::DetectionBuilder;
use crate::tracker::Detection;

/// Source of per-frame ball detections.
///
/// Implement this trait to feed any detection model into a
/// [`TrackerPipeline`](super::TrackerPipeline). Detections must be returned in
/// the model's own output order; the tracker relies on that order when
/// picking a target.
///
/// # Example
///
/// ```ignore
/// use balltrail::{DetectionSource, Detection};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, input: &[u8], width: u32, height: u32) -> Result<Vec<Detection>, Self::Error> {
///         // Run inference and return detections
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run inference on raw image data and return detections.
    ///
    /// # Arguments
    /// * `input` - Raw image bytes (format depends on implementation)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    fn detect(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<Detection>, Self::Error>;
}

/// Helper trait for converting model-specific outputs to `Detection`.
pub trait IntoDetections {
    /// Convert the output into a vector of detections.
    fn into_detections(self) -> Vec<Detection>;
}

impl IntoDetections for Vec<Detection> {
    fn into_detections(self) -> Vec<Detection> {
        self
    }
}

/// Corner boxes with scores, `[x1, y1, x2, y2, score]`.
impl IntoDetections for Vec<[f32; 5]> {
    fn into_detections(self) -> Vec<Detection> {
        self.into_iter()
            .map(|[x1, y1, x2, y2, score]| {
                DetectionBuilder::new()
                    .tlbr(x1, y1, x2, y2)
                    .score(score)
                    .build()
            })
            .collect()
    }
}
