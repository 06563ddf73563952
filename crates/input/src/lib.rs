//! Terminal input module (engine-facing).
//!
//! This module is intentionally independent of any UI framework. It maps
//! `crossterm` key events into [`crate::types::GameAction`] and provides the
//! cursor/selection driver that turns select actions into swap requests
//! (select a cell, then select an adjacent cell to swap - the terminal
//! counterpart of the reference's tap-to-select interaction).

pub mod cursor;
pub mod map;

pub use tui_reef_types as types;

pub use cursor::{Cursor, SelectOutcome};
pub use map::{handle_key_event, should_quit};
