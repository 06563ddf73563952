//! Cursor and selection state for keyboard play.
//!
//! The reference game is tap-driven: tap a cell to select it, tap an adjacent
//! cell to swap, tap a far cell to move the selection, tap the selected cell
//! to deselect. This driver reproduces those semantics for a keyboard cursor;
//! it owns no game state and only emits swap requests for the session to
//! validate.

use crate::types::{GameAction, Pos};

/// What a select action resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The cursor cell became the selection
    Selected(Pos),
    /// The selected cell was selected again and is no longer selected
    Deselected,
    /// Selection and cursor cell are adjacent: ask the session to swap them
    SwapRequested { a: Pos, b: Pos },
}

/// Keyboard cursor with reference-style selection semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pos: Pos,
    selected: Option<Pos>,
    grid_width: u8,
    grid_height: u8,
}

impl Cursor {
    pub fn new(grid_width: u8, grid_height: u8) -> Self {
        Self {
            pos: Pos::new(0, 0),
            selected: None,
            grid_width,
            grid_height,
        }
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn selected(&self) -> Option<Pos> {
        self.selected
    }

    /// Adjust for a new grid size (level change); clears the selection
    pub fn resize(&mut self, grid_width: u8, grid_height: u8) {
        self.grid_width = grid_width;
        self.grid_height = grid_height;
        self.pos = Pos::new(
            self.pos.x.min(grid_width.saturating_sub(1)),
            self.pos.y.min(grid_height.saturating_sub(1)),
        );
        self.selected = None;
    }

    /// Drop any pending selection (after a resolved or rejected swap)
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Apply a movement action; cursor clamps at the grid edges
    pub fn apply_move(&mut self, action: GameAction) {
        match action {
            GameAction::MoveLeft => self.pos.x = self.pos.x.saturating_sub(1),
            GameAction::MoveRight => {
                self.pos.x = (self.pos.x + 1).min(self.grid_width.saturating_sub(1))
            }
            GameAction::MoveUp => self.pos.y = self.pos.y.saturating_sub(1),
            GameAction::MoveDown => {
                self.pos.y = (self.pos.y + 1).min(self.grid_height.saturating_sub(1))
            }
            _ => {}
        }
    }

    /// Resolve a select action at the current cursor position
    ///
    /// Mirrors the reference cell-press handling: no selection selects,
    /// re-selecting deselects, an adjacent selection requests a swap, and a
    /// non-adjacent selection moves the selection to the cursor.
    pub fn select(&mut self) -> SelectOutcome {
        match self.selected {
            None => {
                self.selected = Some(self.pos);
                SelectOutcome::Selected(self.pos)
            }
            Some(selected) if selected == self.pos => {
                self.selected = None;
                SelectOutcome::Deselected
            }
            Some(selected) if selected.is_adjacent(self.pos) => {
                // The session decides whether the swap is legal; either way
                // the selection is consumed.
                self.selected = None;
                SelectOutcome::SwapRequested {
                    a: selected,
                    b: self.pos,
                }
            }
            Some(_) => {
                self.selected = Some(self.pos);
                SelectOutcome::Selected(self.pos)
            }
        }
    }
}
