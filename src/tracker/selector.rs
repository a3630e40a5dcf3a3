//! Per-frame single-target selection.

use serde::{Deserialize, Serialize};

use crate::tracker::detection::Detection;
use crate::tracker::position::Position;
use crate::tracker::rect::Rect;

/// How one target is chosen among the candidates that pass the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// The first passing candidate in upstream order wins, regardless of
    /// score or size. Remaining candidates in the frame are not looked at.
    #[default]
    FirstPassing,
    /// The passing candidate with the highest score wins. Equal scores keep
    /// the earlier candidate.
    HighestConfidence,
}

/// The accepted candidate of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    /// Index of the candidate in the frame's detection list
    pub index: usize,
    pub bbox: Rect,
    /// Integer centroid of `bbox`
    pub position: Position,
}

impl SelectionPolicy {
    /// Pick at most one detection.
    ///
    /// A candidate passes when its box is well formed and `passes` accepts its
    /// centroid. Malformed boxes are skipped, never an error.
    pub fn select<F>(&self, detections: &[Detection], mut passes: F) -> Option<Selection>
    where
        F: FnMut(Position) -> bool,
    {
        let mut candidates = detections.iter().enumerate().filter_map(|(index, det)| {
            let position = det.centroid()?;
            passes(position).then_some((
                Selection {
                    index,
                    bbox: det.bbox,
                    position,
                },
                det.score,
            ))
        });

        match self {
            SelectionPolicy::FirstPassing => candidates.next().map(|(sel, _)| sel),
            SelectionPolicy::HighestConfidence => candidates
                .fold(None, |best: Option<(Selection, f32)>, (sel, score)| match best {
                    Some((_, best_score)) if score.is_nan() || score <= best_score => best,
                    _ => Some((sel, score)),
                })
                .map(|(sel, _)| sel),
        }
    }
}
