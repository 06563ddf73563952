//! Hint search - find swaps that would produce a match
//!
//! The search tries every 4-adjacent swap once (each cell against its right
//! and down neighbor) on a scratch copy of the grid, in the same scan order
//! the grid reports matches in. Deterministic: the same grid always produces
//! the same hint list.

use crate::core::Grid;
use crate::types::{Element, Pos};

/// A swap that would produce at least one match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hint {
    pub a: Pos,
    pub b: Pos,
    /// Element of the first group the swap would form
    pub element: Element,
}

/// Whether swapping `a` and `b` would leave at least one match on the grid
///
/// Runs on a scratch copy; the input grid is untouched. Swaps involving an
/// empty cell never match (the session would reject them anyway).
pub fn swap_creates_match(grid: &Grid, a: Pos, b: Pos) -> Option<Element> {
    if grid.element(a.x, a.y).is_none() || grid.element(b.x, b.y).is_none() {
        return None;
    }

    let mut scratch = grid.clone();
    scratch.swap(a, b);
    scratch.find_matches().first().map(|group| group.element)
}

/// All distinct adjacent swaps that would produce a match, in scan order
pub fn find_hints(grid: &Grid) -> Vec<Hint> {
    let mut hints = Vec::new();

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let a = Pos::new(x, y);

            // Each unordered pair is tried exactly once: right and down.
            if x + 1 < grid.width() {
                let b = Pos::new(x + 1, y);
                if let Some(element) = swap_creates_match(grid, a, b) {
                    hints.push(Hint { a, b, element });
                }
            }
            if y + 1 < grid.height() {
                let b = Pos::new(x, y + 1);
                if let Some(element) = swap_creates_match(grid, a, b) {
                    hints.push(Hint { a, b, element });
                }
            }
        }
    }

    hints
}

/// First productive swap, if any
pub fn find_first_hint(grid: &Grid) -> Option<Hint> {
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let a = Pos::new(x, y);

            if x + 1 < grid.width() {
                let b = Pos::new(x + 1, y);
                if let Some(element) = swap_creates_match(grid, a, b) {
                    return Some(Hint { a, b, element });
                }
            }
            if y + 1 < grid.height() {
                let b = Pos::new(x, y + 1);
                if let Some(element) = swap_creates_match(grid, a, b) {
                    return Some(Hint { a, b, element });
                }
            }
        }
    }
    None
}

/// Whether any adjacent swap can still produce a match
pub fn has_any_move(grid: &Grid) -> bool {
    find_first_hint(grid).is_some()
}
