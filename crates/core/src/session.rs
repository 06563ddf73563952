//! Session controller - owns one play session and drives the cascade loop
//!
//! The session is the single owner of grid, goals, achievements, score, and
//! timer. Engine operations never run outside it; presentation layers see
//! only snapshots and per-round cascade logs.
//!
//! # State machine
//!
//! `Idle -> Playing <-> Paused -> Ended(outcome)`
//!
//! - `start_level` moves Idle (or any later phase) to Playing.
//! - `tick` runs the 1-second timer while Playing; at zero the outcome is
//!   evaluated: Won iff every goal completed, else Lost.
//! - The session never picks the next step itself: after Ended the caller
//!   chooses `advance_level` (Won only) or `replay_level`.
//!
//! # Swap protocol
//!
//! Out-of-bounds coordinates are an error; everything else that stops a swap
//! (paused, busy, empty cell, non-adjacent) is a rejection no-op. An accepted
//! swap always persists, even when it produces no match - the reference never
//! reverts a fruitless swap.
//!
//! # Cascades
//!
//! An accepted swap resolves synchronously: match, clear, credit goals and
//! achievements, gravity, refill, repeat until the grid settles. Each round is
//! logged so a caller can animate the chain at its own pace. A timer tick
//! arriving mid-cascade defers session-end evaluation until the loop finishes.

use arrayvec::ArrayVec;

use crate::achievements::{starting_achievements, update_achievements, Achievement};
use crate::grid::{Grid, MatchGroup};
use crate::level::{generate_level, Goal};
use crate::rng::SimpleRng;
use crate::snapshot::SessionSnapshot;
use crate::types::{
    ElementCounts, Outcome, Pos, RejectReason, SessionError, ELEMENT_COUNT, GRID_HEIGHT,
    GRID_WIDTH, MAX_CASCADE_ROUNDS, MAX_GOALS, SCORE_PER_GROUP, TICK_SECONDS,
};

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Playing,
    Paused,
    Ended(Outcome),
}

/// One resolved round of the cascade chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeRound {
    /// Match groups found this round, rows before columns in scan order
    pub groups: Vec<MatchGroup>,
    /// Score awarded this round (10 per group, regardless of group size)
    pub score_delta: u32,
    /// Units attributed per element this round
    pub tally: ElementCounts,
    /// Settled grid after this round's gravity and refill
    pub grid_after: Grid,
}

/// What became of a structurally valid swap request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapResult {
    /// Not executed; session state unchanged
    Rejected(RejectReason),
    /// Executed and kept, but no match resulted - no score, no progress
    NoMatch,
    /// Executed; one round per cascade iteration, in order
    Cascaded(Vec<CascadeRound>),
}

/// Result of advancing the session timer by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// Timer not running (idle, paused, or already ended)
    Inactive,
    Running {
        time_left: u32,
    },
    Ended(Outcome),
}

/// A complete play session
#[derive(Debug, Clone)]
pub struct Session {
    level_number: u32,
    score: u32,
    time_left: u32,
    phase: Phase,
    /// Set while the cascade loop is resolving
    busy: bool,
    /// A tick hit zero while busy; evaluate the outcome after the cascade
    pending_expiry: bool,
    grid: Grid,
    goals: ArrayVec<Goal, MAX_GOALS>,
    achievements: Vec<Achievement>,
    /// Lifetime per-element collection counts, session-scoped
    lifetime: ElementCounts,
    rng: SimpleRng,
    grid_width: u8,
    grid_height: u8,
}

impl Session {
    /// Create an idle session with the given RNG seed and default 7x9 grid
    pub fn new(seed: u32) -> Self {
        Self {
            level_number: 1,
            score: 0,
            time_left: 0,
            phase: Phase::Idle,
            busy: false,
            pending_expiry: false,
            grid: Grid::new(GRID_WIDTH, GRID_HEIGHT),
            goals: ArrayVec::new(),
            achievements: starting_achievements(),
            lifetime: [0; ELEMENT_COUNT],
            rng: SimpleRng::new(seed),
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
        }
    }

    /// Use a non-default grid size for subsequently started levels
    ///
    /// Panics on dimensions below 3x3 (programming error).
    pub fn with_grid_size(mut self, width: u8, height: u8) -> Self {
        self.grid = Grid::new(width, height);
        self.grid_width = width;
        self.grid_height = height;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn level_number(&self) -> u32 {
        self.level_number
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn busy(&self) -> bool {
        self.busy
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Read-only achievement progress
    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    pub fn lifetime_collected(&self) -> &ElementCounts {
        &self.lifetime
    }

    /// Replace the active grid (test and tooling hook)
    ///
    /// Subsequent levels keep the replacement's dimensions.
    pub fn set_grid(&mut self, grid: Grid) {
        self.grid_width = grid.width();
        self.grid_height = grid.height();
        self.grid = grid;
    }

    /// Replace the active goal set (test and tooling hook)
    ///
    /// Anything beyond `MAX_GOALS` entries is ignored.
    pub fn set_goals(&mut self, goals: &[Goal]) {
        self.goals.clear();
        for goal in goals.iter().take(MAX_GOALS) {
            self.goals.push(*goal);
        }
    }

    /// Start the given level: roll goals and time budget, generate a grid
    ///
    /// Score, achievements, and lifetime counts persist across levels, as in
    /// the reference. Level numbers below 1 clamp to 1.
    pub fn start_level(&mut self, number: u32) -> SessionSnapshot {
        let plan = generate_level(number, self.grid_width, self.grid_height, &mut self.rng);
        self.level_number = plan.number;
        self.goals = plan.goals;
        self.time_left = plan.time_limit_s;
        self.grid = Grid::generate(plan.grid_width, plan.grid_height, &mut self.rng);
        self.phase = Phase::Playing;
        self.busy = false;
        self.pending_expiry = false;
        self.snapshot()
    }

    /// Submit a swap of two cell coordinates
    ///
    /// Out-of-bounds coordinates fail without touching state. Structurally
    /// valid requests either get rejected (no-op) or executed; an executed
    /// swap stays on the grid whether or not it matched.
    pub fn submit_swap(&mut self, a: Pos, b: Pos) -> Result<SwapResult, SessionError> {
        for pos in [a, b] {
            if !self.grid.contains(pos) {
                return Err(SessionError::InvalidCoordinate { x: pos.x, y: pos.y });
            }
        }

        let reject = match self.phase {
            Phase::Idle | Phase::Ended(_) => Some(RejectReason::NotPlaying),
            Phase::Paused => Some(RejectReason::Paused),
            Phase::Playing if self.busy => Some(RejectReason::CascadeBusy),
            Phase::Playing => None,
        };
        if let Some(reason) = reject {
            return Ok(SwapResult::Rejected(reason));
        }

        if self.grid.element(a.x, a.y).is_none() || self.grid.element(b.x, b.y).is_none() {
            return Ok(SwapResult::Rejected(RejectReason::EmptyCell));
        }
        if !a.is_adjacent(b) {
            return Ok(SwapResult::Rejected(RejectReason::NotAdjacent));
        }

        self.grid.swap(a, b);
        let rounds = self.resolve_cascades();
        if rounds.is_empty() {
            Ok(SwapResult::NoMatch)
        } else {
            Ok(SwapResult::Cascaded(rounds))
        }
    }

    /// Run the cascade chain to quiescence
    ///
    /// Bounded by `MAX_CASCADE_ROUNDS` only as a backstop against malformed
    /// grids; a healthy chain always settles on its own.
    fn resolve_cascades(&mut self) -> Vec<CascadeRound> {
        self.busy = true;
        let mut rounds = Vec::new();

        for _ in 0..MAX_CASCADE_ROUNDS {
            let groups = self.grid.find_matches();
            if groups.is_empty() {
                break;
            }

            let score_delta = SCORE_PER_GROUP * groups.len() as u32;
            self.score += score_delta;

            let mut tally: ElementCounts = [0; ELEMENT_COUNT];
            for group in &groups {
                tally[group.element.index()] += group.cells.len() as u32;
            }

            self.grid.clear_matches(&groups);

            for goal in &mut self.goals {
                let units = tally[goal.element.index()];
                if units > 0 {
                    goal.record(units);
                }
            }

            for (total, n) in self.lifetime.iter_mut().zip(tally.iter()) {
                *total += n;
            }
            update_achievements(&mut self.achievements, &self.lifetime);

            self.grid.apply_gravity();
            self.grid.refill(&mut self.rng);

            rounds.push(CascadeRound {
                groups,
                score_delta,
                tally,
                grid_after: self.grid.clone(),
            });
        }

        self.busy = false;
        if self.pending_expiry {
            self.pending_expiry = false;
            self.finish_level();
        }
        rounds
    }

    /// Advance the timer by one tick (1-second granularity)
    ///
    /// Reaching zero while Playing evaluates the outcome. A tick landing
    /// mid-cascade defers that evaluation until the cascade settles.
    pub fn tick(&mut self) -> TickResult {
        if self.phase != Phase::Playing {
            return TickResult::Inactive;
        }

        self.time_left = self.time_left.saturating_sub(TICK_SECONDS);
        if self.time_left > 0 {
            return TickResult::Running {
                time_left: self.time_left,
            };
        }

        if self.busy {
            self.pending_expiry = true;
            return TickResult::Running { time_left: 0 };
        }

        TickResult::Ended(self.finish_level())
    }

    fn finish_level(&mut self) -> Outcome {
        let outcome = if self.goals.iter().all(|g| g.completed) {
            Outcome::Won
        } else {
            Outcome::Lost
        };
        self.phase = Phase::Ended(outcome);
        outcome
    }

    /// Suspend or resume the timer; cascade state is untouched
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            Phase::Playing => Phase::Paused,
            Phase::Paused => Phase::Playing,
            other => other,
        };
    }

    /// Move on to the next level; only offered after a win
    pub fn advance_level(&mut self) -> bool {
        if self.phase == Phase::Ended(Outcome::Won) {
            self.start_level(self.level_number + 1);
            true
        } else {
            false
        }
    }

    /// Restart the current level (available any time after the first start)
    pub fn replay_level(&mut self) -> bool {
        if self.phase == Phase::Idle {
            return false;
        }
        self.start_level(self.level_number);
        true
    }

    /// Write the observable state into a caller-owned snapshot
    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        out.level = self.level_number;
        out.score = self.score;
        out.time_left = self.time_left;
        out.playing = matches!(self.phase, Phase::Playing | Phase::Paused);
        out.paused = self.phase == Phase::Paused;
        out.outcome = match self.phase {
            Phase::Ended(outcome) => Some(outcome),
            _ => None,
        };
        out.grid.clone_from(&self.grid);
        out.goals.clear();
        out.goals.extend(self.goals.iter().copied());
        out.achievements.clone_from(&self.achievements);
        out.lifetime_collected = self.lifetime;
        out.seed = self.rng.state();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            level: self.level_number,
            score: self.score,
            time_left: self.time_left,
            playing: matches!(self.phase, Phase::Playing | Phase::Paused),
            paused: self.phase == Phase::Paused,
            outcome: match self.phase {
                Phase::Ended(outcome) => Some(outcome),
                _ => None,
            },
            grid: self.grid.clone(),
            goals: self.goals.clone(),
            achievements: self.achievements.clone(),
            lifetime_collected: self.lifetime,
            seed: self.rng.state(),
        }
    }
}
