//! Tracking session: owns all per-video state and drives one frame at a time.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::tracker::detection::Detection;
use crate::tracker::history::HistoryBuffer;
use crate::tracker::position::Position;
use crate::tracker::record::{FrameRecord, RecordEmitter, RecordSink};
use crate::tracker::region::RegionGate;
use crate::tracker::selector::{Selection, SelectionPolicy};
use crate::tracker::smoothness::TurnFilter;
use crate::tracker::trail::{self, Segment};

/// Configuration for a [`TrackingSession`]. Fixed for the session lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of accepted positions kept for the trail
    pub history_capacity: usize,
    /// Left edge of the accepted band as a fraction of frame width
    pub left_fraction: f64,
    /// Right edge of the accepted band as a fraction of frame width
    pub right_fraction: f64,
    pub policy: SelectionPolicy,
    /// Maximum trail turn per frame; `None` disables the turn filter
    pub max_turn_degrees: Option<f64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_capacity: 10,
            left_fraction: 0.2,
            right_fraction: 0.8,
            policy: SelectionPolicy::FirstPassing,
            max_turn_degrees: None,
        }
    }
}

impl SessionConfig {
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn with_region(mut self, left_fraction: f64, right_fraction: f64) -> Self {
        self.left_fraction = left_fraction;
        self.right_fraction = right_fraction;
        self
    }

    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enable the turn filter, or disable it with `None`.
    pub fn with_max_turn_degrees(mut self, degrees: impl Into<Option<f64>>) -> Self {
        self.max_turn_degrees = degrees.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.history_capacity == 0 {
            return Err(Error::InvalidConfig(
                "history capacity must be at least 1".into(),
            ));
        }
        let in_unit = |f: f64| f.is_finite() && (0.0..=1.0).contains(&f);
        if !in_unit(self.left_fraction) || !in_unit(self.right_fraction) {
            return Err(Error::InvalidConfig(format!(
                "region fractions must lie in [0, 1], got {} and {}",
                self.left_fraction, self.right_fraction
            )));
        }
        if self.left_fraction > self.right_fraction {
            return Err(Error::InvalidConfig(format!(
                "left region fraction {} exceeds right fraction {}",
                self.left_fraction, self.right_fraction
            )));
        }
        if let Some(deg) = self.max_turn_degrees {
            if !deg.is_finite() || deg <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "max turn must be a positive angle, got {deg}"
                )));
            }
        }
        Ok(())
    }
}

/// Result of processing one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutcome {
    pub record: FrameRecord,
    pub selection: Option<Selection>,
}

/// Everything a renderer needs to draw for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub trail: Vec<Segment>,
    /// Accepted box and its centroid marker
    pub target: Option<Selection>,
    /// Left and right region boundaries, spanning the frame height
    pub region_lines: [Segment; 2],
}

/// Per-video tracking state.
///
/// Owns the history buffer, the region gate and the record emitter. Frames
/// must be fed in order through [`TrackingSession::process_frame`]; each call
/// emits exactly one record.
pub struct TrackingSession<S: RecordSink> {
    config: SessionConfig,
    frame_width: u32,
    frame_height: u32,
    region: RegionGate,
    turn_filter: Option<TurnFilter>,
    history: HistoryBuffer,
    emitter: RecordEmitter<S>,
    /// Frame at which the session failed, if it did
    failed_at: Option<u64>,
}

impl<S: RecordSink> TrackingSession<S> {
    pub fn new(
        config: SessionConfig,
        frame_width: u32,
        frame_height: u32,
        sink: S,
    ) -> Result<Self> {
        config.validate()?;
        let region =
            RegionGate::from_frame_width(frame_width, config.left_fraction, config.right_fraction);
        info!(
            frame_width,
            frame_height,
            left_limit = region.left_limit(),
            right_limit = region.right_limit(),
            history_capacity = config.history_capacity,
            policy = ?config.policy,
            "tracking session started"
        );

        Ok(Self {
            frame_width,
            frame_height,
            region,
            turn_filter: config.max_turn_degrees.map(TurnFilter::new),
            history: HistoryBuffer::with_capacity(config.history_capacity),
            emitter: RecordEmitter::new(sink),
            failed_at: None,
            config,
        })
    }

    /// Process the detections of the next frame.
    ///
    /// Selects at most one target, records it in the history and emits the
    /// frame record. A sink failure is fatal: it is returned as an error and
    /// every later call fails with [`Error::SessionFailed`].
    pub fn process_frame(&mut self, detections: &[Detection]) -> Result<FrameOutcome> {
        if let Some(frame_idx) = self.failed_at {
            return Err(Error::SessionFailed { frame_idx });
        }
        let frame_idx = self.emitter.next_frame();

        let malformed = detections
            .iter()
            .filter(|d| !d.bbox.is_well_formed())
            .count();
        if malformed > 0 {
            warn!(frame_idx, malformed, "ignoring malformed detections");
        }

        let region = &self.region;
        let history = &self.history;
        let turn_filter = self.turn_filter.as_ref();
        let selection = self.config.policy.select(detections, |p| {
            region.admits(p.x) && turn_filter.is_none_or(|f| f.accepts(history, p))
        });

        let centroid = selection.map(|s| s.position);
        let record = match self.emitter.emit(frame_idx, centroid) {
            Ok(record) => record,
            Err(e) => {
                self.mark_failed();
                return Err(e);
            }
        };
        if let Some(position) = centroid {
            self.history.push(position);
        }

        debug!(
            frame_idx,
            candidates = detections.len(),
            accepted = ?centroid,
            "frame processed"
        );

        Ok(FrameOutcome { record, selection })
    }

    /// Stop accepting frames. The frame that was due is never recorded.
    pub fn mark_failed(&mut self) {
        let frame_idx = self.emitter.next_frame();
        error!(frame_idx, "tracking session failed");
        self.failed_at.get_or_insert(frame_idx);
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        self.failed_at.is_some()
    }

    /// Start a new video segment with the given frame size.
    ///
    /// Clears the history and recomputes the region. Frame numbering carries
    /// on so the record stream stays gap-free.
    pub fn reset(&mut self, frame_width: u32, frame_height: u32) {
        self.frame_width = frame_width;
        self.frame_height = frame_height;
        self.region = RegionGate::from_frame_width(
            frame_width,
            self.config.left_fraction,
            self.config.right_fraction,
        );
        self.history.reset();
        info!(
            frame_width,
            frame_height,
            next_frame = self.emitter.next_frame(),
            "tracking session reset"
        );
    }

    /// Reset if the incoming frame size differs from the current one.
    ///
    /// Returns whether a reset happened.
    pub fn ensure_frame_size(&mut self, frame_width: u32, frame_height: u32) -> bool {
        if (frame_width, frame_height) == self.frame_size() {
            return false;
        }
        warn!(
            old_width = self.frame_width,
            old_height = self.frame_height,
            frame_width,
            frame_height,
            "frame size changed, starting a new segment"
        );
        self.reset(frame_width, frame_height);
        true
    }

    /// Drawing data for the frame that produced `outcome`.
    pub fn overlay(&self, outcome: &FrameOutcome) -> Overlay {
        let height = i32::try_from(self.frame_height).unwrap_or(i32::MAX);
        let boundary = |x: i32| Segment {
            from: Position::new(x, 0),
            to: Position::new(x, height),
        };

        Overlay {
            trail: trail::segments(&self.history).collect(),
            target: outcome.selection,
            region_lines: [
                boundary(self.region.left_limit()),
                boundary(self.region.right_limit()),
            ],
        }
    }

    /// Flush the record stream and return the sink.
    pub fn finish(self) -> Result<S> {
        let frames = self.emitter.next_frame();
        let sink = self.emitter.finish()?;
        info!(frames, "tracking session finished");
        Ok(sink)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn region(&self) -> &RegionGate {
        &self.region
    }

    /// Frame size the region was derived from.
    pub fn frame_size(&self) -> (u32, u32) {
        (self.frame_width, self.frame_height)
    }

    /// Number of frames processed so far.
    pub fn frames_processed(&self) -> u64 {
        self.emitter.next_frame()
    }
}
