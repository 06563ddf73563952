//! Session snapshots - plain data handed to presentation layers
//!
//! A snapshot is everything a renderer or remote observer needs for one
//! frame. It shares no state with the live session; the session writes into a
//! caller-owned snapshot (`snapshot_into`) so render loops can reuse the
//! allocation frame over frame.

use arrayvec::ArrayVec;

use crate::achievements::Achievement;
use crate::grid::Grid;
use crate::level::Goal;
use crate::types::{ElementCounts, Outcome, MAX_GOALS};

/// Full observable session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub level: u32,
    pub score: u32,
    pub time_left: u32,
    pub playing: bool,
    pub paused: bool,
    /// Set once the session has ended
    pub outcome: Option<Outcome>,
    pub grid: Grid,
    pub goals: ArrayVec<Goal, MAX_GOALS>,
    pub achievements: Vec<Achievement>,
    pub lifetime_collected: ElementCounts,
    pub seed: u32,
}

impl SessionSnapshot {
    pub fn playable(&self) -> bool {
        self.playing && !self.paused && self.outcome.is_none()
    }

    /// Whether every goal has reached its target
    pub fn all_goals_completed(&self) -> bool {
        self.goals.iter().all(|g| g.completed)
    }
}
