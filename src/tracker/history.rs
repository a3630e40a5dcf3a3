//! Bounded FIFO of recently accepted target positions.

use std::collections::VecDeque;

use crate::tracker::position::Position;

/// Fixed-capacity history of accepted positions, oldest first.
///
/// Pushing beyond capacity evicts the oldest entry, so the buffer always holds
/// at most the last `capacity` positions in push order.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    positions: VecDeque<Position>,
    capacity: usize,
}

impl HistoryBuffer {
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a position, evicting the oldest one on overflow.
    ///
    /// Returns the evicted position, if any.
    pub fn push(&mut self, position: Position) -> Option<Position> {
        self.positions.push_back(position);
        if self.positions.len() > self.capacity {
            self.positions.pop_front()
        } else {
            None
        }
    }

    /// Snapshot of the current contents, oldest to newest.
    pub fn contents(&self) -> Vec<Position> {
        self.positions.iter().copied().collect()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter()
    }

    /// Most recent position.
    #[inline]
    pub fn last(&self) -> Option<Position> {
        self.positions.back().copied()
    }

    /// The two most recent positions as `(older, newer)`.
    pub fn last_two(&self) -> Option<(Position, Position)> {
        let len = self.positions.len();
        if len < 2 {
            return None;
        }
        Some((self.positions[len - 2], self.positions[len - 1]))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn reset(&mut self) {
        self.positions.clear()
    }
}
