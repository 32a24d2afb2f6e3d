//! Terminal gestures.

use crate::domain::{CELL_COUNT, Position};

/// Help text listing every gesture.
pub const HELP: &str = "\
Commands:
  create         start a new room (you play X)
  join <code>    join an existing room
  1-9            place your mark (also: move <1-9>)
  copy           print the room code
  new            leave and start over
  help           show this help
  quit           exit";

/// One parsed line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Start a new room.
    Create,
    /// Join the room named by the raw argument (may be blank).
    Join(String),
    /// Activate a cell.
    Move(Position),
    /// Print the room code.
    Copy,
    /// Full session reset.
    New,
    /// Show help.
    Help,
    /// Exit.
    Quit,
}

/// Input lines that are not gestures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// Nothing but whitespace.
    #[error("empty input")]
    Empty,
    /// Cell number outside 1-9.
    #[error("no such cell: {0} (use 1-9)")]
    BadCell(String),
    /// Anything else.
    #[error("unknown command: {0} (type 'help')")]
    Unknown(String),
}

impl Intent {
    /// Parses one line. Words are case-insensitive; the join code is kept
    /// verbatim so the controller can trim and reject it.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] for blank lines, bad cell numbers and
    /// unknown words.
    pub fn parse(line: &str) -> Result<Self, InputError> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));

        match word.to_ascii_lowercase().as_str() {
            "" => Err(InputError::Empty),
            "create" => Ok(Self::Create),
            "join" => Ok(Self::Join(rest.to_string())),
            "move" => parse_cell(rest).map(Self::Move),
            "copy" => Ok(Self::Copy),
            "new" => Ok(Self::New),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            _ if word.chars().all(|c| c.is_ascii_digit()) => parse_cell(word).map(Self::Move),
            _ => Err(InputError::Unknown(line.to_string())),
        }
    }
}

/// Maps a 1-based cell number to a position.
fn parse_cell(raw: &str) -> Result<Position, InputError> {
    raw.parse::<usize>()
        .ok()
        .filter(|n| (1..=CELL_COUNT).contains(n))
        .and_then(|n| Position::try_from(n - 1).ok())
        .ok_or_else(|| InputError::BadCell(raw.to_string()))
}
