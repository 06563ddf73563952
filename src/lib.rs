//! TUI Reef (workspace facade crate).
//!
//! This package keeps the public `tui_reef::{core,adapter,term,input,engine,types}`
//! API stable while the implementation lives in dedicated crates under `crates/`.

pub use tui_reef_adapter as adapter;
pub use tui_reef_core as core;
pub use tui_reef_engine as engine;
pub use tui_reef_input as input;
pub use tui_reef_term as term;
pub use tui_reef_types as types;
