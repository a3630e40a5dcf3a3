use crate::tracker::history::HistoryBuffer;
use crate::tracker::position::Position;

/// A line segment between two consecutive trail points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub from: Position,
    pub to: Position,
}

/// Trail segments over the current history, oldest first.
///
/// Lazy and derived purely from `history`; calling it again restarts from the
/// first segment. Fewer than two points yield nothing.
pub fn segments(history: &HistoryBuffer) -> impl Iterator<Item = Segment> + '_ {
    history
        .iter()
        .zip(history.iter().skip(1))
        .map(|(&from, &to)| Segment { from, to })
}
