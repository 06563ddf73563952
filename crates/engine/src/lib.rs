//! Engine module - higher-level operations on top of core
//!
//! Core answers "what happens if I swap these two cells"; this crate answers
//! "which swaps are worth making". It hosts the swap simulation and hint
//! search used by the UI hint key, the stuck-grid check, and remote-control
//! clients.

pub mod hint;

pub use tui_reef_core as core;
pub use tui_reef_types as types;

pub use hint::{find_first_hint, find_hints, has_any_move, swap_creates_match, Hint};
