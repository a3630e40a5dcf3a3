//! Single-ball trajectory tracking for per-frame object detections.
//!
//! Detections for each frame pass through a static region gate, one target is
//! selected, its centroid is kept in a bounded history for trail drawing, and
//! exactly one annotation record is emitted per frame.

pub mod error;
pub mod integration;
pub mod tracker;

pub use error::{Error, Result};
pub use integration::{DetectionBuilder, DetectionSource, Frame, IntoDetections, TrackerPipeline};
pub use tracker::{
    CsvRecordSink, Detection, FrameOutcome, FrameRecord, HistoryBuffer, Overlay, Position,
    RecordEmitter, RecordSink, Rect, RegionGate, Segment, Selection, SelectionPolicy,
    SessionConfig, TrackingSession, TurnFilter,
};
