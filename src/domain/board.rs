//! Cached board and outcome as last reported by the authority.
//!
//! The client never computes moves into the board itself: a [`Board`] is
//! only ever built from a remote update and replaced wholesale by the next
//! one.

use std::collections::BTreeSet;

use super::mark::{Cell, Mark};
use super::position::{CELL_COUNT, Position};
use crate::error::ClientError;

/// Nine cells in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// Creates an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cell at `position`.
    #[must_use]
    pub fn cell(&self, position: Position) -> Cell {
        self.cells
            .get(position.index())
            .copied()
            .unwrap_or_default()
    }

    /// Returns `true` if nobody has played at `position`.
    #[must_use]
    pub fn is_empty_at(&self, position: Position) -> bool {
        self.cell(position).is_empty()
    }

    /// Returns `true` if every cell is occupied.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    /// Returns all cells in row-major order.
    #[must_use]
    pub const fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }
}

impl TryFrom<Vec<Option<Mark>>> for Board {
    type Error = ClientError;

    fn try_from(raw: Vec<Option<Mark>>) -> Result<Self, Self::Error> {
        let len = raw.len();
        let marks: [Option<Mark>; CELL_COUNT] = raw.try_into().map_err(|_| {
            ClientError::MalformedPayload(format!("board must have {CELL_COUNT} cells, got {len}"))
        })?;
        Ok(Self {
            cells: marks.map(Cell::from),
        })
    }
}

/// Three distinct positions completing a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinningLine([Position; 3]);

impl WinningLine {
    /// Returns the three positions.
    #[must_use]
    pub const fn positions(&self) -> &[Position; 3] {
        &self.0
    }

    /// Returns `true` if `position` is part of the line.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.0.contains(&position)
    }
}

impl TryFrom<Vec<usize>> for WinningLine {
    type Error = ClientError;

    fn try_from(raw: Vec<usize>) -> Result<Self, Self::Error> {
        let malformed = || ClientError::MalformedPayload(format!("invalid winning line {raw:?}"));
        let [a, b, c]: [usize; 3] = raw.clone().try_into().map_err(|_| malformed())?;
        let positions = [
            Position::try_from(a).map_err(|_| malformed())?,
            Position::try_from(b).map_err(|_| malformed())?,
            Position::try_from(c).map_err(|_| malformed())?,
        ];
        let distinct: BTreeSet<Position> = positions.iter().copied().collect();
        if distinct.len() != 3 {
            return Err(malformed());
        }
        Ok(Self(positions))
    }
}

/// Result of the game as carried by the latest remote update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Outcome {
    winner: Option<Mark>,
    winning_line: Option<WinningLine>,
}

impl Outcome {
    /// Builds an outcome. A line without a winner carries no meaning and is
    /// dropped.
    #[must_use]
    pub fn new(winner: Option<Mark>, winning_line: Option<WinningLine>) -> Self {
        Self {
            winner,
            winning_line: winner.and(winning_line),
        }
    }

    /// The winning mark, if the authority declared one.
    #[must_use]
    pub const fn winner(&self) -> Option<Mark> {
        self.winner
    }

    /// Cells to highlight.
    #[must_use]
    pub const fn winning_line(&self) -> Option<&WinningLine> {
        self.winning_line.as_ref()
    }

    /// Returns `true` if a winner is recorded.
    #[must_use]
    pub const fn is_decided(&self) -> bool {
        self.winner.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn pos(i: usize) -> Position {
        let Ok(p) = Position::try_from(i) else {
            panic!("invalid test position {i}");
        };
        p
    }

    fn full_board() -> Vec<Option<Mark>> {
        use Mark::{O, X};
        vec![
            Some(X), Some(O), Some(X),
            Some(X), Some(O), Some(O),
            Some(O), Some(X), Some(X),
        ]
    }

    #[test]
    fn new_board_is_empty() {
        let board = Board::new();
        assert!(Position::all().all(|p| board.is_empty_at(p)));
        assert!(!board.is_full());
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn board_from_wire_cells() {
        let mut raw = vec![None; 9];
        if let Some(slot) = raw.get_mut(4) {
            *slot = Some(Mark::X);
        }
        let Ok(board) = Board::try_from(raw) else {
            panic!("nine cells should parse");
        };
        assert_eq!(board.cell(pos(4)), Cell::Occupied(Mark::X));
        assert!(board.is_empty_at(pos(0)));
        assert_eq!(board.occupied_count(), 1);
    }

    #[test]
    fn board_rejects_wrong_length() {
        assert!(Board::try_from(vec![None; 8]).is_err());
        assert!(Board::try_from(vec![None; 10]).is_err());
    }

    #[test]
    fn full_board_detected() {
        let Ok(board) = Board::try_from(full_board()) else {
            panic!("valid board");
        };
        assert!(board.is_full());
    }

    #[test]
    fn winning_line_validation() {
        let Ok(line) = WinningLine::try_from(vec![0, 4, 8]) else {
            panic!("diagonal is a valid line");
        };
        assert!(line.contains(pos(4)));
        assert!(!line.contains(pos(5)));
        assert!(WinningLine::try_from(vec![0, 4]).is_err());
        assert!(WinningLine::try_from(vec![0, 4, 9]).is_err());
        assert!(WinningLine::try_from(vec![4, 4, 8]).is_err());
    }

    #[test]
    fn outcome_drops_line_without_winner() {
        let Ok(line) = WinningLine::try_from(vec![2, 4, 6]) else {
            panic!("valid line");
        };
        let outcome = Outcome::new(None, Some(line));
        assert!(outcome.winning_line().is_none());
        assert!(!outcome.is_decided());

        let outcome = Outcome::new(Some(Mark::O), Some(line));
        assert_eq!(outcome.winner(), Some(Mark::O));
        assert_eq!(outcome.winning_line(), Some(&line));
    }
}
