//! Player-facing status line.

use std::fmt;

use crate::domain::{Board, Mark, Outcome, Session};

/// What the status line says. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The authority declared a winner.
    Winner(Mark),
    /// Every cell is taken and nobody won.
    Draw,
    /// Established and this client moves next.
    YourTurn,
    /// Established and the opponent moves next.
    OpponentsTurn,
    /// No session yet.
    Waiting,
}

impl Status {
    /// Derives the status; first matching rule wins: winner, full board,
    /// turn flag once established, otherwise waiting.
    #[must_use]
    pub fn derive(board: &Board, outcome: &Outcome, session: &Session) -> Self {
        if let Some(mark) = outcome.winner() {
            Self::Winner(mark)
        } else if board.is_full() {
            Self::Draw
        } else if session.is_established() {
            if session.is_my_turn {
                Self::YourTurn
            } else {
                Self::OpponentsTurn
            }
        } else {
            Self::Waiting
        }
    }

    /// Returns `true` for `Winner` and `Draw`.
    #[must_use]
    pub const fn is_game_over(self) -> bool {
        matches!(self, Self::Winner(_) | Self::Draw)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Winner(mark) => write!(f, "Winner: {mark}"),
            Self::Draw => f.write_str("Game is a draw!"),
            Self::YourTurn => f.write_str("Your turn"),
            Self::OpponentsTurn => f.write_str("Opponent's turn"),
            Self::Waiting => f.write_str("Waiting for game to start..."),
        }
    }
}
