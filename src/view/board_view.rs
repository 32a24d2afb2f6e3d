//! Render model for the terminal board.

use std::fmt;

use crate::domain::{Board, Cell, Mark, Position, RoomCode, Session, WinningLine};
use crate::service::{SessionController, Status};

/// One rendered cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellView {
    /// Where the cell sits.
    pub position: Position,
    /// What occupies it.
    pub cell: Cell,
    /// Part of the winning line.
    pub highlighted: bool,
}

/// Everything the terminal shows for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    /// The nine cells in position order.
    pub cells: Vec<CellView>,
    /// Status line.
    pub status: Status,
    /// Room code, once known.
    pub room_code: Option<RoomCode>,
    /// This client's symbol, if assigned.
    pub player_symbol: Option<Mark>,
}

impl BoardView {
    /// Builds the view from session facts. Pure; no side effects.
    #[must_use]
    pub fn build(
        board: &Board,
        winning_line: Option<&WinningLine>,
        session: &Session,
        status: Status,
    ) -> Self {
        let cells = Position::all()
            .map(|position| CellView {
                position,
                cell: board.cell(position),
                highlighted: winning_line.is_some_and(|line| line.contains(position)),
            })
            .collect();
        Self {
            cells,
            status,
            room_code: session.room_code.clone(),
            player_symbol: session.player_symbol,
        }
    }

    /// Builds the view from the controller's current state.
    #[must_use]
    pub fn of<C>(controller: &SessionController<C>) -> Self {
        Self::build(
            controller.board(),
            controller.winning_line(),
            controller.store().session(),
            controller.status(),
        )
    }

    /// Positions of highlighted cells.
    #[must_use]
    pub fn highlighted(&self) -> Vec<Position> {
        self.cells
            .iter()
            .filter(|c| c.highlighted)
            .map(|c| c.position)
            .collect()
    }

    /// "You are: X", "You are: O" or "You are: Spectator".
    #[must_use]
    pub fn role_line(&self) -> String {
        let role = self.player_symbol.map_or("Spectator", Mark::as_str);
        format!("You are: {role}")
    }
}

impl fmt::Display for CellView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Empty cells show the 1-based number the player types.
        let glyph = match self.cell {
            Cell::Occupied(mark) => mark.as_str().to_string(),
            Cell::Empty => (self.position.index() + 1).to_string(),
        };
        if self.highlighted {
            write!(f, "*{glyph}*")
        } else {
            write!(f, " {glyph} ")
        }
    }
}

impl fmt::Display for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = &self.room_code {
            writeln!(f, "Room: {code}")?;
        }
        writeln!(f, "{}", self.role_line())?;
        writeln!(f)?;
        for (row, cells) in self.cells.chunks(3).enumerate() {
            if row > 0 {
                writeln!(f, "---+---+---")?;
            }
            let line = cells.iter().map(ToString::to_string).collect::<Vec<_>>().join("|");
            writeln!(f, "{line}")?;
        }
        writeln!(f)?;
        write!(f, "{}", self.status)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Outcome;

    fn board(cells: &str) -> Board {
        let raw = cells
            .chars()
            .map(|c| match c {
                'X' => Some(Mark::X),
                'O' => Some(Mark::O),
                _ => None,
            })
            .collect::<Vec<_>>();
        let Ok(board) = Board::try_from(raw) else {
            panic!("test board must have nine cells");
        };
        board
    }

    fn pos(i: usize) -> Position {
        let Ok(p) = Position::try_from(i) else {
            panic!("invalid test position {i}");
        };
        p
    }

    #[test]
    fn unestablished_view_is_spectator() {
        let session = Session::default();
        let view = BoardView::build(&Board::new(), None, &session, Status::Waiting);
        assert_eq!(view.cells.len(), 9);
        assert_eq!(view.role_line(), "You are: Spectator");
        assert!(view.highlighted().is_empty());

        let text = view.to_string();
        assert!(!text.contains("Room:"));
        assert!(text.contains(" 1 | 2 | 3 "));
        assert!(text.ends_with("Waiting for game to start..."));
    }

    #[test]
    fn winning_cells_are_highlighted() {
        let Ok(code) = RoomCode::parse("AB12") else {
            panic!("valid code");
        };
        let session = Session {
            room_code: Some(code),
            player_symbol: Some(Mark::O),
            is_my_turn: true,
        };
        let Ok(line) = WinningLine::try_from(vec![0, 4, 8]) else {
            panic!("valid line");
        };
        let outcome = Outcome::new(Some(Mark::X), Some(line));
        let status = Status::derive(&board("XO..X.O.X"), &outcome, &session);
        let view = BoardView::build(&board("XO..X.O.X"), outcome.winning_line(), &session, status);

        assert_eq!(view.highlighted(), vec![pos(0), pos(4), pos(8)]);
        assert_eq!(view.role_line(), "You are: O");

        let text = view.to_string();
        assert!(text.starts_with("Room: AB12\n"));
        assert!(text.contains("*X*| O | 3 "));
        assert!(text.contains(" 4 |*X*| 6 "));
        assert!(text.ends_with("Winner: X"));
    }
}
