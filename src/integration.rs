//! Integration module for connecting detection backends and recorded
//! detections with the tracker.

mod builder;
mod detector;
mod pipeline;
pub mod replay;

pub use builder::DetectionBuilder;
pub use detector::{DetectionSource, IntoDetections};
pub use pipeline::{Frame, TrackerPipeline};
pub use replay::{ReplayFrame, ReplayReader, replay};
