//! Replaying recorded detections through a tracking session.
//!
//! A dump holds one JSON object per line, one line per video frame:
//!
//! ```text
//! {"width":1280,"height":720,"detections":[{"x1":600,"y1":300,"x2":620,"y2":320,"score":0.8}]}
//! ```
//!
//! Boxes may also be given as `{"cx","cy","w","h"}` or
//! `{"left","top","width","height"}`. Blank lines are skipped and do not
//! count as frames.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tracing::info;

use super::DetectionBuilder;
use crate::error::{Error, Result};
use crate::tracker::{Detection, RecordSink, SessionConfig, TrackingSession};

/// One recorded box, in any of the layouts detectors emit.
///
/// The layout is recognised by its field names. `score` defaults to 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplayDetection {
    Corners {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        #[serde(default)]
        score: f32,
    },
    Center {
        cx: f32,
        cy: f32,
        w: f32,
        h: f32,
        #[serde(default)]
        score: f32,
    },
    TopLeft {
        left: f32,
        top: f32,
        width: f32,
        height: f32,
        #[serde(default)]
        score: f32,
    },
}

impl From<ReplayDetection> for Detection {
    fn from(d: ReplayDetection) -> Self {
        let builder = DetectionBuilder::new();
        match d {
            ReplayDetection::Corners {
                x1,
                y1,
                x2,
                y2,
                score,
            } => builder.tlbr(x1, y1, x2, y2).score(score),
            ReplayDetection::Center {
                cx,
                cy,
                w,
                h,
                score,
            } => builder.xywh(cx, cy, w, h).score(score),
            ReplayDetection::TopLeft {
                left,
                top,
                width,
                height,
                score,
            } => builder.tlwh(left, top, width, height).score(score),
        }
        .build()
    }
}

/// Detector output recorded for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayFrame {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub detections: Vec<ReplayDetection>,
}

impl ReplayFrame {
    pub fn detections(&self) -> Vec<Detection> {
        self.detections.iter().copied().map(Detection::from).collect()
    }
}

/// Iterator over the frames of a JSON-lines dump.
pub struct ReplayReader<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> ReplayReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for ReplayReader<R> {
    type Item = Result<ReplayFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }
            return Some(serde_json::from_str(&line).map_err(|source| Error::Replay {
                line: self.line_no,
                source,
            }));
        }
    }
}

/// Run a recorded dump through a fresh session and return the flushed sink.
///
/// The session is sized from the first frame. Processing stops at the end of
/// the dump, after `max_frames` frames, or once `stop` is raised.
pub fn replay<R, S>(
    reader: R,
    config: SessionConfig,
    sink: S,
    stop: &AtomicBool,
    max_frames: Option<u64>,
) -> Result<S>
where
    R: BufRead,
    S: RecordSink,
{
    config.validate()?;
    let mut frames = ReplayReader::new(reader);

    let Some(first) = frames.next().transpose()? else {
        info!("replay input is empty");
        return Ok(sink);
    };

    let mut session = TrackingSession::new(config, first.width, first.height, sink)?;
    let mut next = Some(first);
    while let Some(frame) = next {
        if stop.load(Ordering::Relaxed) {
            info!("stop requested, ending replay");
            break;
        }
        if max_frames.is_some_and(|max| session.frames_processed() >= max) {
            break;
        }
        session.ensure_frame_size(frame.width, frame.height);
        session.process_frame(&frame.detections())?;
        next = frames.next().transpose()?;
    }

    session.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{FrameRecord, Position};

    const DUMP: &str = r#"{"width":1000,"height":600,"detections":[{"x1":210,"y1":50,"x2":230,"y2":70,"score":0.9}]}
{"width":1000,"height":600,"detections":[{"x1":10,"y1":50,"x2":30,"y2":70}]}

{"width":1000,"height":600}
"#;

    #[test]
    fn test_reader_skips_blank_lines() {
        let frames: Vec<_> = ReplayReader::new(DUMP.as_bytes())
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(frames.len(), 3);
        assert!(matches!(
            frames[1].detections[0],
            ReplayDetection::Corners { score, .. } if score == 0.0
        ));
        assert!(frames[2].detections.is_empty());
    }

    #[test]
    fn test_box_layouts() {
        let line = r#"{"width":1000,"height":600,"detections":[
            {"x1":210,"y1":50,"x2":230,"y2":70,"score":0.9},
            {"cx":220,"cy":60,"w":20,"h":20},
            {"left":210,"top":50,"width":20,"height":20,"score":0.5}]}"#;
        let frame: ReplayFrame = serde_json::from_str(line).unwrap();
        let dets = frame.detections();
        assert_eq!(dets.len(), 3);
        assert!(matches!(frame.detections[1], ReplayDetection::Center { .. }));
        assert!(matches!(frame.detections[2], ReplayDetection::TopLeft { .. }));
        for det in &dets {
            assert_eq!(det.centroid(), Some(Position::new(220, 60)));
        }
        assert_eq!(dets[2].score, 0.5);
    }

    #[test]
    fn test_reader_reports_line_number() {
        let input = "{\"width\":10,\"height\":10}\n\nnot json\n";
        let err = ReplayReader::new(input.as_bytes())
            .find_map(|r| r.err())
            .unwrap();
        assert!(matches!(err, Error::Replay { line: 3, .. }));
    }

    #[test]
    fn test_replay() {
        let stop = AtomicBool::new(false);
        let records = replay(
            DUMP.as_bytes(),
            SessionConfig::default(),
            Vec::new(),
            &stop,
            None,
        )
        .unwrap();
        assert_eq!(
            records,
            vec![
                FrameRecord::new(0, Some(Position::new(220, 60))),
                FrameRecord::new(1, None),
                FrameRecord::new(2, None),
            ]
        );
    }

    #[test]
    fn test_replay_max_frames() {
        let stop = AtomicBool::new(false);
        let records = replay(
            DUMP.as_bytes(),
            SessionConfig::default(),
            Vec::new(),
            &stop,
            Some(2),
        )
        .unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_replay_empty_input() {
        let stop = AtomicBool::new(false);
        let records = replay(
            "".as_bytes(),
            SessionConfig::default(),
            Vec::new(),
            &stop,
            None,
        )
        .unwrap();
        assert!(records.is_empty());
    }
}
