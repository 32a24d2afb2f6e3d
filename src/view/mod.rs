//! Presentation surface: turns controller state into text and text into
//! intents. Holds no session state of its own.

pub mod board_view;
pub mod input;

pub use board_view::{BoardView, CellView};
pub use input::{HELP, InputError, Intent};
