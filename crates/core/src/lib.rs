//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the match-3 rules, progression logic, and session
//! state management. It has **zero dependencies** on UI, networking, or I/O,
//! making it:
//!
//! - **Deterministic**: Same seed produces identical grids, refills, and level
//!   rolls (for replays and remote-control testing)
//! - **Testable**: Comprehensive unit tests for all game rules
//! - **Portable**: Can run in any environment (terminal, GUI, headless)
//!
//! # Module Structure
//!
//! - [`grid`]: the playfield with match detection, clearing, gravity, refill
//! - [`session`]: session controller - swap protocol, cascade loop, timer
//! - [`level`]: per-level goal and time-budget generation
//! - [`achievements`]: tiered cross-level collection milestones
//! - [`catalog`]: element presentation metadata lookups
//! - [`rng`]: seeded LCG behind every random draw
//! - [`snapshot`]: plain-data state for presentation layers
//!
//! # Game Rules
//!
//! This implementation follows the reference mobile game:
//!
//! - **Match groups**: every 3-window of equal elements in a row or column,
//!   so longer runs yield overlapping groups
//! - **Scoring**: 10 points per group per cascade round
//! - **Cascades**: clear, gravity, refill, re-scan until the grid settles
//! - **Goals**: per-level element targets, clamped, monotonic
//! - **Achievements**: lifetime counts, one tier advance per update
//! - **Timer**: 1-second ticks; the outcome is evaluated only at expiry
//!
//! # Example
//!
//! ```
//! use tui_reef_core::{Session, SwapResult};
//! use tui_reef_core::types::Pos;
//!
//! // Create and start a session
//! let mut session = Session::new(12345);
//! let snapshot = session.start_level(1);
//! assert_eq!(snapshot.time_left, 115);
//!
//! // Submit a swap; a seeded grid decides whether it matches
//! match session.submit_swap(Pos::new(0, 0), Pos::new(1, 0)).unwrap() {
//!     SwapResult::Rejected(reason) => println!("rejected: {}", reason.code()),
//!     SwapResult::NoMatch => println!("kept, nothing matched"),
//!     SwapResult::Cascaded(rounds) => println!("{} cascade rounds", rounds.len()),
//! }
//! ```

pub mod achievements;
pub mod catalog;
pub mod grid;
pub mod level;
pub mod rng;
pub mod session;
pub mod snapshot;

pub use tui_reef_types as types;

// Re-export commonly used types for convenience
pub use achievements::{starting_achievements, update_achievements, Achievement, Tier};
pub use grid::{CellState, Grid, MatchGroup};
pub use level::{generate_level, goal_count, time_limit_s, Goal, LevelPlan};
pub use rng::SimpleRng;
pub use session::{CascadeRound, Phase, Session, SwapResult, TickResult};
pub use snapshot::SessionSnapshot;
