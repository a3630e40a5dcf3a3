//! Optional trajectory smoothness check.
//!
//! Not part of the default selection path: a session only consults a
//! [`TurnFilter`] when `max_turn_degrees` is configured.

use nalgebra::Vector2;

use crate::tracker::history::HistoryBuffer;
use crate::tracker::position::Position;

/// Rejects candidates that would bend the trail sharper than a fixed angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnFilter {
    pub max_turn_degrees: f64,
}

impl TurnFilter {
    pub fn new(max_turn_degrees: f64) -> Self {
        Self { max_turn_degrees }
    }

    /// Angle in degrees between the last travelled direction and the step to `candidate`.
    ///
    /// `None` when the history has fewer than two points or either step has zero length.
    pub fn turn_degrees(&self, history: &HistoryBuffer, candidate: Position) -> Option<f64> {
        let (older, newer) = history.last_two()?;
        let travelled = step(older, newer);
        let next = step(newer, candidate);
        if travelled.norm_squared() == 0.0 || next.norm_squared() == 0.0 {
            return None;
        }
        Some(travelled.angle(&next).to_degrees())
    }

    pub fn accepts(&self, history: &HistoryBuffer, candidate: Position) -> bool {
        self.turn_degrees(history, candidate)
            .is_none_or(|turn| turn <= self.max_turn_degrees)
    }
}

fn step(from: Position, to: Position) -> Vector2<f64> {
    Vector2::new(
        f64::from(to.x) - f64::from(from.x),
        f64::from(to.y) - f64::from(from.y),
    )
}

/// Acute angle in degrees between two lines given by their slopes.
///
/// Perpendicular lines (`m1 == -1 / m2`) give exactly 90.
pub fn angle_between_slopes(m1: f64, m2: f64) -> f64 {
    if m1 == -1.0 / m2 {
        return 90.0;
    }
    ((m2 - m1) / (1.0 + m1 * m2)).abs().atan().to_degrees()
}
