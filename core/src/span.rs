//! Spans over an opaque linear medium.

use crate::Direction;
use std::fmt::{self, Debug};
use std::hash::Hash;

/// An offset into the annotated medium.
///
/// Offsets are opaque; the engine only needs to copy, order and hash them.
pub trait Offset: Copy + Ord + Hash + Debug {}

impl<T: Copy + Ord + Hash + Debug> Offset for T {}

/// A half-open range `[start, end)` in absolute (left-to-right) orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span<O> {
    pub start: O,
    pub end: O,
}

impl<O: Offset> Span<O> {
    /// Create a span. Offsets given out of order are swapped.
    pub fn new(start: O, end: O) -> Self {
        if end < start {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    /// An empty span sitting at `at`.
    pub fn empty(at: O) -> Self {
        Self { start: at, end: at }
    }

    /// Build an absolute span from endpoints given in traversal order.
    pub fn from_direction(first: O, last: O, dir: Direction) -> Self {
        match dir {
            Direction::LeftToRight => Self::new(first, last),
            Direction::RightToLeft => Self::new(last, first),
        }
    }

    /// The endpoint reached first when walking in `dir`.
    pub fn start_in(&self, dir: Direction) -> O {
        match dir {
            Direction::LeftToRight => self.start,
            Direction::RightToLeft => self.end,
        }
    }

    /// The endpoint reached last when walking in `dir`.
    pub fn end_in(&self, dir: Direction) -> O {
        match dir {
            Direction::LeftToRight => self.end,
            Direction::RightToLeft => self.start,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if `other` lies entirely inside this span.
    pub fn contains(&self, other: &Span<O>) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn overlaps(&self, other: &Span<O>) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The smallest span covering both.
    pub fn cover(&self, other: &Span<O>) -> Span<O> {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl<O: Offset + fmt::Display> fmt::Display for Span<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
