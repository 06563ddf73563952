//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the application.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core logic, UI rendering, remote-control protocol).
//!
//! # Grid Dimensions
//!
//! Standard reef playfield dimensions:
//!
//! - **Width**: 7 columns (indexed 0-6)
//! - **Height**: 9 rows (indexed 0-8)
//!
//! Any rectangular grid of at least 3x3 is accepted by the engine; 3 is the
//! minimum in which a match can form. The 7x9 default matches the reference
//! mobile layout.
//!
//! # Game Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_SECONDS` | 1 | Session timer granularity |
//! | `MATCH_LEN` | 3 | Cells per match group |
//! | `SCORE_PER_GROUP` | 10 | Score awarded per match group per round |
//! | `MAX_GOALS` | 3 | Level goal count plateau |
//! | `MAX_CASCADE_ROUNDS` | 1000 | Defensive cascade iteration cap |
//! | `BASE_TIME_LIMIT_S` | 120 | Level 0 time budget |
//! | `TIME_LIMIT_FLOOR_S` | 60 | Minimum time budget |
//!
//! # Examples
//!
//! ```
//! use tui_reef_types::{Element, GameAction, Pos, GRID_WIDTH, GRID_HEIGHT};
//!
//! // Parse an element from its protocol key (case-insensitive)
//! let e = Element::from_str("fish_green").unwrap();
//! assert_eq!(e, Element::GreenFish);
//! assert_eq!(e.as_str(), "fish_green");
//!
//! // Positions know about 4-adjacency
//! let a = Pos::new(2, 0);
//! let b = Pos::new(2, 1);
//! assert!(a.is_adjacent(b));
//! assert!(!a.is_adjacent(Pos::new(3, 1)));
//!
//! // Parse a UI action
//! let action = GameAction::from_str("select").unwrap();
//! assert_eq!(action, GameAction::Select);
//!
//! // Default grid dimensions
//! assert_eq!(GRID_WIDTH, 7);
//! assert_eq!(GRID_HEIGHT, 9);
//! ```

/// Default grid width in cells (7 columns)
pub const GRID_WIDTH: u8 = 7;

/// Default grid height in cells (9 rows)
pub const GRID_HEIGHT: u8 = 9;

/// Smallest grid dimension in which a 3-run can form
pub const MIN_GRID_DIM: u8 = 3;

/// Session timer granularity in seconds
pub const TICK_SECONDS: u32 = 1;

/// Number of cells in a match group
pub const MATCH_LEN: usize = 3;

/// Score awarded per match group per cascade round
pub const SCORE_PER_GROUP: u32 = 10;

/// Maximum number of goals a level can carry
pub const MAX_GOALS: usize = 3;

/// A level gains one goal every this many levels (plateau at `MAX_GOALS`)
pub const GOALS_GROWTH_LEVELS: u32 = 3;

/// Goal target random base (inclusive lower bound)
pub const GOAL_TARGET_MIN: u32 = 5;

/// Goal target random span (`rand(0..span) + min` yields 5..=14)
pub const GOAL_TARGET_SPAN: u32 = 10;

/// Per-level bonus added to each goal target
pub const GOAL_TARGET_LEVEL_BONUS: u32 = 2;

/// Level 1-and-below time budget in seconds
pub const BASE_TIME_LIMIT_S: u32 = 120;

/// Time budget floor in seconds
pub const TIME_LIMIT_FLOOR_S: u32 = 60;

/// Seconds removed from the time budget per level
pub const TIME_LIMIT_STEP_S: u32 = 5;

/// Defensive cap on cascade rounds per swap.
///
/// The cascade chain is unbounded by design; this bound only exists to turn a
/// non-terminating cascade on a malformed grid into a hard stop.
pub const MAX_CASCADE_ROUNDS: u32 = 1000;

/// Number of tiers per achievement in the reference set
pub const ACHIEVEMENT_TIERS: usize = 3;

/// The four reef element kinds
///
/// The palette is closed: every cell occupant, goal, and achievement binds to
/// one of these four. Protocol keys keep the reference naming:
/// - **GreenFish**: `fish_green`
/// - **RedFish**: `fish_red` (the clownfish)
/// - **BlueFish**: `fish_blue`
/// - **Bab**: `bab`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    GreenFish,
    RedFish,
    BlueFish,
    Bab,
}

/// Number of element variants in the palette
pub const ELEMENT_COUNT: usize = 4;

/// Per-element counters indexed by [`Element::index`]
pub type ElementCounts = [u32; ELEMENT_COUNT];

impl Element {
    /// All elements in palette order
    pub const ALL: [Element; ELEMENT_COUNT] = [
        Element::GreenFish,
        Element::RedFish,
        Element::BlueFish,
        Element::Bab,
    ];

    /// Stable index into palette-ordered tables
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_reef_types::Element;
    ///
    /// assert_eq!(Element::GreenFish.index(), 0);
    /// assert_eq!(Element::Bab.index(), 3);
    /// ```
    pub fn index(self) -> usize {
        match self {
            Element::GreenFish => 0,
            Element::RedFish => 1,
            Element::BlueFish => 2,
            Element::Bab => 3,
        }
    }

    /// Parse element from its protocol key (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_reef_types::Element;
    ///
    /// assert_eq!(Element::from_str("fish_red"), Some(Element::RedFish));
    /// assert_eq!(Element::from_str("BAB"), Some(Element::Bab));
    /// assert_eq!(Element::from_str("shark"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fish_green" => Some(Element::GreenFish),
            "fish_red" => Some(Element::RedFish),
            "fish_blue" => Some(Element::BlueFish),
            "bab" => Some(Element::Bab),
            _ => None,
        }
    }

    /// Convert to the protocol key
    pub fn as_str(&self) -> &'static str {
        match self {
            Element::GreenFish => "fish_green",
            Element::RedFish => "fish_red",
            Element::BlueFish => "fish_blue",
            Element::Bab => "bab",
        }
    }
}

/// A cell coordinate on the grid
///
/// `x` is the column (0 = leftmost), `y` is the row (0 = topmost). Gravity
/// pulls occupants toward the highest `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: u8,
    pub y: u8,
}

impl Pos {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Whether `other` is exactly one step away in a cardinal direction
    /// (Manhattan distance 1)
    pub fn is_adjacent(self, other: Pos) -> bool {
        let dx = (self.x as i16 - other.x as i16).unsigned_abs();
        let dy = (self.y as i16 - other.y as i16).unsigned_abs();
        dx + dy == 1
    }
}

/// UI actions that drive a play session
///
/// These actions are used by both keyboard input and the remote-control
/// protocol's action mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move the cursor one cell up
    MoveUp,
    /// Move the cursor one cell down
    MoveDown,
    /// Move the cursor one cell left
    MoveLeft,
    /// Move the cursor one cell right
    MoveRight,
    /// Select the cell under the cursor (second adjacent select swaps)
    Select,
    /// Highlight a swap that would produce a match
    Hint,
    /// Toggle pause state
    Pause,
    /// Restart the current level
    Restart,
    /// Advance to the next level (after a win)
    NextLevel,
}

impl GameAction {
    /// Parse action from string (for the control protocol)
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_reef_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("nextLevel"), Some(GameAction::NextLevel));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveup" => Some(GameAction::MoveUp),
            "movedown" => Some(GameAction::MoveDown),
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "select" => Some(GameAction::Select),
            "hint" => Some(GameAction::Hint),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            "nextlevel" => Some(GameAction::NextLevel),
            _ => None,
        }
    }

    /// Convert to camelCase string for the control protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveUp => "moveUp",
            GameAction::MoveDown => "moveDown",
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::Select => "select",
            GameAction::Hint => "hint",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
            GameAction::NextLevel => "nextLevel",
        }
    }
}

/// Terminal result of a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every goal reached its target before the timer expired
    Won,
    /// The timer expired with at least one goal unmet
    Lost,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Won => "won",
            Outcome::Lost => "lost",
        }
    }
}

/// Why a structurally valid swap request was not executed
///
/// Rejections are no-ops, not errors: session state is unchanged and the
/// caller may simply try another swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No level is active
    NotPlaying,
    /// The session is paused; swaps are ignored defensively
    Paused,
    /// A cascade is still resolving
    CascadeBusy,
    /// One of the two cells is empty
    EmptyCell,
    /// The two cells are not 4-directionally adjacent
    NotAdjacent,
}

impl RejectReason {
    pub fn code(self) -> &'static str {
        match self {
            RejectReason::NotPlaying => "not_playing",
            RejectReason::Paused => "paused",
            RejectReason::CascadeBusy => "cascade_busy",
            RejectReason::EmptyCell => "empty_cell",
            RejectReason::NotAdjacent => "not_adjacent",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            RejectReason::NotPlaying => "no level is currently being played",
            RejectReason::Paused => "session is paused",
            RejectReason::CascadeBusy => "a cascade is still resolving",
            RejectReason::EmptyCell => "swap involves an empty cell",
            RejectReason::NotAdjacent => "cells are not adjacent",
        }
    }
}

/// Session-level failure conditions
///
/// Unlike [`RejectReason`], these indicate the caller handed the session
/// something malformed. State is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// A swap coordinate lies outside the grid
    InvalidCoordinate { x: u8, y: u8 },
}

impl SessionError {
    pub fn code(self) -> &'static str {
        match self {
            SessionError::InvalidCoordinate { .. } => "invalid_coordinate",
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::InvalidCoordinate { x, y } => {
                write!(f, "coordinate ({}, {}) is outside the grid", x, y)
            }
        }
    }
}

impl std::error::Error for SessionError {}
