//! Traversal direction.

use std::cmp::Ordering;
use std::fmt;

/// The order in which a pattern walks its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    LeftToRight,
    RightToLeft,
}

impl Direction {
    /// The opposite direction.
    pub fn reverse(self) -> Self {
        match self {
            Direction::LeftToRight => Direction::RightToLeft,
            Direction::RightToLeft => Direction::LeftToRight,
        }
    }

    pub fn is_left_to_right(self) -> bool {
        self == Direction::LeftToRight
    }

    /// Compare two offsets in traversal order.
    ///
    /// `Less` means `a` is reached before `b` when walking in this direction.
    pub fn compare<O: Ord>(self, a: &O, b: &O) -> Ordering {
        match self {
            Direction::LeftToRight => a.cmp(b),
            Direction::RightToLeft => b.cmp(a),
        }
    }

    /// Returns true if `a` is reached no earlier than `b` in this direction.
    pub fn at_or_after<O: Ord>(self, a: &O, b: &O) -> bool {
        self.compare(a, b) != Ordering::Less
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::LeftToRight => write!(f, "left-to-right"),
            Direction::RightToLeft => write!(f, "right-to-left"),
        }
    }
}
