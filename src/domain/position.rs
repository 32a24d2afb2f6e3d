//! Validated board coordinates.
//!
//! [`Position`] is a newtype over the row-major index of a cell so that a
//! raw integer from user input or the wire can never address a cell outside
//! the 3×3 grid.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// Index of a board cell, `0..=8`, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct Position(u8);

impl Position {
    /// Returns the row-major index of this position.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Row of the position, `0..=2`.
    #[must_use]
    pub const fn row(self) -> usize {
        self.index() / 3
    }

    /// Column of the position, `0..=2`.
    #[must_use]
    pub const fn column(self) -> usize {
        self.index() % 3
    }

    /// Iterates over all nine positions in row-major order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..CELL_COUNT as u8).map(Self)
    }
}

impl TryFrom<usize> for Position {
    type Error = ClientError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        u8::try_from(index)
            .ok()
            .filter(|_| index < CELL_COUNT)
            .map(Self)
            .ok_or(ClientError::InvalidPosition(index))
    }
}

impl From<Position> for usize {
    fn from(position: Position) -> Self {
        position.index()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
