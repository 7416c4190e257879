//! Game-state and timing engine for two mini-games: a tile matching game and
//! a "find the item under the cup" game.
//!
//! Everything in [`engine`] runs on a virtual millisecond clock so a front end
//! (the gtk one behind the `gui` feature, or a test) decides how fast time
//! passes by calling `advance`.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;

#[cfg(feature = "gui")]
pub mod ui;

pub use catalog::Item;
pub use engine::cups::{CupGame, CupPhase};
pub use engine::display::StatusDisplay;
pub use engine::memory::{MemoryGame, MemoryPhase};
pub use engine::state::Difficulty;
