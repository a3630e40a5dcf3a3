//! TrackerPipeline for combining detection with tracking.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

use crate::error::{Error, Result};
use crate::tracker::{FrameOutcome, Overlay, RecordSink, SessionConfig, TrackingSession};

use super::DetectionSource;

/// One decoded video frame handed to the detector.
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Bundles a detection backend with a [`TrackingSession`].
///
/// Frames are processed strictly one after another: detect, gate, select,
/// record. A change in frame size starts a new segment on the session.
pub struct TrackerPipeline<D: DetectionSource, S: RecordSink> {
    detector: D,
    session: TrackingSession<S>,
}

impl<D: DetectionSource, S: RecordSink> TrackerPipeline<D, S> {
    /// Create a new pipeline for frames of the given size.
    pub fn new(
        detector: D,
        config: SessionConfig,
        frame_width: u32,
        frame_height: u32,
        sink: S,
    ) -> Result<Self> {
        Ok(Self {
            detector,
            session: TrackingSession::new(config, frame_width, frame_height, sink)?,
        })
    }

    /// Create a new pipeline with the default session configuration.
    pub fn with_default_config(
        detector: D,
        frame_width: u32,
        frame_height: u32,
        sink: S,
    ) -> Result<Self> {
        Self::new(
            detector,
            SessionConfig::default(),
            frame_width,
            frame_height,
            sink,
        )
    }

    /// Process a single frame.
    ///
    /// A detector failure leaves the frame without a record, so it is fatal
    /// like a sink failure: later frames fail with [`Error::SessionFailed`]
    /// instead of being recorded under a shifted index.
    pub fn process_frame(&mut self, input: &[u8], width: u32, height: u32) -> Result<FrameOutcome> {
        if self.session.is_failed() {
            // Yields SessionFailed without running the detector.
            return self.session.process_frame(&[]);
        }
        let detections = match self.detector.detect(input, width, height) {
            Ok(detections) => detections,
            Err(e) => {
                self.session.mark_failed();
                return Err(Error::Detector(Box::new(e)));
            }
        };
        self.session.ensure_frame_size(width, height);
        self.session.process_frame(&detections)
    }

    /// Process frames until the input ends or `stop` is raised, then flush.
    ///
    /// `stop` is checked between frames, so the frame in flight always
    /// completes. `on_frame` receives the outcome and overlay of each frame.
    pub fn run<I, F>(mut self, frames: I, stop: &AtomicBool, mut on_frame: F) -> Result<S>
    where
        I: IntoIterator<Item = Frame>,
        F: FnMut(&FrameOutcome, &Overlay),
    {
        for frame in frames {
            if stop.load(Ordering::Relaxed) {
                info!(
                    frames = self.session.frames_processed(),
                    "stop requested, ending session"
                );
                break;
            }
            let outcome = self.process_frame(&frame.data, frame.width, frame.height)?;
            on_frame(&outcome, &self.session.overlay(&outcome));
        }
        self.session.finish()
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the tracking session.
    pub fn session(&self) -> &TrackingSession<S> {
        &self.session
    }

    /// Flush the record stream and return the sink.
    pub fn finish(self) -> Result<S> {
        self.session.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{Detection, FrameRecord, Position};

    struct MockDetector {
        frames: Vec<Vec<Detection>>,
        calls: usize,
        fail_at: Option<usize>,
    }

    impl MockDetector {
        fn new(frames: Vec<Vec<Detection>>) -> Self {
            Self {
                frames,
                calls: 0,
                fail_at: None,
            }
        }
    }

    impl DetectionSource for MockDetector {
        type Error = std::io::Error;

        fn detect(
            &mut self,
            _input: &[u8],
            _width: u32,
            _height: u32,
        ) -> std::result::Result<Vec<Detection>, Self::Error> {
            let call = self.calls;
            self.calls += 1;
            if self.fail_at == Some(call) {
                return Err(std::io::Error::other("inference failed"));
            }
            self.frames.get(call).cloned().ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "no more frames")
            })
        }
    }

    fn frame(width: u32, height: u32) -> Frame {
        Frame {
            data: Vec::new(),
            width,
            height,
        }
    }

    #[test]
    fn test_tracker_pipeline() {
        let detector = MockDetector::new(vec![
            vec![Detection::new(210.0, 50.0, 230.0, 70.0, 0.9)],
            vec![],
        ]);
        let mut pipeline =
            TrackerPipeline::with_default_config(detector, 1000, 600, Vec::new()).unwrap();

        let first = pipeline.process_frame(&[], 1000, 600).unwrap();
        assert_eq!(first.record, FrameRecord::new(0, Some(Position::new(220, 60))));
        let second = pipeline.process_frame(&[], 1000, 600).unwrap();
        assert_eq!(second.record, FrameRecord::new(1, None));
        assert_eq!(pipeline.detector().calls, 2);
    }

    #[test]
    fn test_detector_error_stops_pipeline() {
        let det = Detection::new(210.0, 50.0, 230.0, 70.0, 0.9);
        // Frame 1 fails, frame 2 would succeed.
        let mut detector = MockDetector::new(vec![vec![det], vec![], vec![det]]);
        detector.fail_at = Some(1);
        let mut pipeline =
            TrackerPipeline::with_default_config(detector, 1000, 600, Vec::new()).unwrap();

        pipeline.process_frame(&[], 1000, 600).unwrap();
        let err = pipeline.process_frame(&[], 1000, 600).unwrap_err();
        assert!(matches!(err, Error::Detector(_)));
        assert!(pipeline.session().is_failed());

        let err = pipeline.process_frame(&[], 1000, 600).unwrap_err();
        assert!(matches!(err, Error::SessionFailed { frame_idx: 1 }));
        assert_eq!(pipeline.detector().calls, 2);

        let records = pipeline.finish().unwrap();
        assert_eq!(
            records,
            vec![FrameRecord::new(0, Some(Position::new(220, 60)))]
        );
    }

    #[test]
    fn test_frame_size_change_resets_history() {
        let det = Detection::new(210.0, 50.0, 230.0, 70.0, 0.9);
        let detector = MockDetector::new(vec![vec![det], vec![det]]);
        let mut pipeline =
            TrackerPipeline::with_default_config(detector, 1000, 600, Vec::new()).unwrap();

        pipeline.process_frame(&[], 1000, 600).unwrap();
        assert_eq!(pipeline.session().history().len(), 1);

        // x=220 is outside [256, 1024] for a 1280 wide frame.
        let out = pipeline.process_frame(&[], 1280, 720).unwrap();
        assert_eq!(out.record, FrameRecord::new(1, None));
        assert!(pipeline.session().history().is_empty());
    }

    #[test]
    fn test_run_reports_overlays() {
        let detector = MockDetector::new(vec![
            vec![Detection::new(210.0, 50.0, 230.0, 70.0, 0.9)],
            vec![Detection::new(250.0, 50.0, 270.0, 70.0, 0.9)],
            vec![],
        ]);
        let pipeline =
            TrackerPipeline::with_default_config(detector, 1000, 600, Vec::new()).unwrap();

        let stop = AtomicBool::new(false);
        let mut trail_lengths = Vec::new();
        let records = pipeline
            .run(
                (0..3).map(|_| frame(1000, 600)),
                &stop,
                |_, overlay| trail_lengths.push(overlay.trail.len()),
            )
            .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(trail_lengths, vec![0, 1, 1]);
    }

    #[test]
    fn test_run_honours_stop() {
        let detector = MockDetector::new(vec![vec![]; 5]);
        let pipeline =
            TrackerPipeline::with_default_config(detector, 1000, 600, Vec::new()).unwrap();

        let stop = AtomicBool::new(false);
        let mut seen = 0;
        let records = pipeline
            .run((0..5).map(|_| frame(1000, 600)), &stop, |_, _| {
                seen += 1;
                if seen == 2 {
                    stop.store(true, Ordering::Relaxed);
                }
            })
            .unwrap();

        let idx: Vec<_> = records.iter().map(|r| r.frame_idx).collect();
        assert_eq!(idx, vec![0, 1]);
    }
}
