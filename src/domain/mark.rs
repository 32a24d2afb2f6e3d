//! Player marks and board cells.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The symbol a player places on the board.
///
/// Serialized as the bare strings `"X"` and `"O"`, which is what the
/// authority sends in `joinedRoom` and `gameUpdate` payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    /// Moves first. Always assigned to the session creator.
    X,
    /// Moves second.
    O,
}

impl Mark {
    /// Returns the other player's mark.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }

    /// Returns `true` if this mark moves first.
    #[must_use]
    pub const fn moves_first(self) -> bool {
        matches!(self, Self::X)
    }

    /// Returns the mark as a static string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::O => "O",
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single square of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    /// Nobody has played here yet.
    #[default]
    Empty,
    /// Taken by the given mark.
    Occupied(Mark),
}

impl Cell {
    /// Returns `true` if the cell is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the occupying mark, if any.
    #[must_use]
    pub const fn mark(self) -> Option<Mark> {
        match self {
            Self::Empty => None,
            Self::Occupied(mark) => Some(mark),
        }
    }
}

impl From<Option<Mark>> for Cell {
    fn from(value: Option<Mark>) -> Self {
        value.map_or(Self::Empty, Self::Occupied)
    }
}
