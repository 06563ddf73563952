//! Grid module - manages the match-3 playfield
//!
//! The grid is a `width x height` field where each cell is empty or holds an
//! element, plus a transient "matched" flag used by the current clear cycle.
//! Uses a flat array for better cache locality; a cell's position is its array
//! index, so position/content can never disagree.
//! Coordinates: (x, y) where x is the column (left to right) and y is the row
//! (top to bottom). Gravity pulls occupants toward the highest y.

use crate::rng::SimpleRng;
use crate::types::{Element, Pos, MATCH_LEN, MIN_GRID_DIM};

/// One cell of the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellState {
    /// Occupant, or `None` while the cell is holed out mid-cascade
    pub element: Option<Element>,
    /// Set when the cell was cleared by the current round's match groups
    pub matched: bool,
}

/// Three contiguous same-element cells in one row or column
///
/// Groups come from a sliding 3-window scan, so a longer run yields several
/// overlapping groups rather than one long group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchGroup {
    pub element: Element,
    pub cells: [Pos; MATCH_LEN],
}

/// The playfield - flat array storage, row-major order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u8,
    height: u8,
    cells: Vec<CellState>,
}

impl Grid {
    /// Create a new empty grid
    ///
    /// Panics if either dimension is below 3: a grid that cannot hold a
    /// 3-run is a programming error, not a runtime condition.
    pub fn new(width: u8, height: u8) -> Self {
        assert!(
            width >= MIN_GRID_DIM && height >= MIN_GRID_DIM,
            "grid dimensions must be at least {}x{}, got {}x{}",
            MIN_GRID_DIM,
            MIN_GRID_DIM,
            width,
            height
        );
        Self {
            width,
            height,
            cells: vec![CellState::default(); width as usize * height as usize],
        }
    }

    /// Create a grid with every cell independently random
    ///
    /// No match resolution happens here: a freshly generated grid may already
    /// contain 3-runs, exactly like the reference. They stay inert until the
    /// first accepted swap starts a cascade.
    pub fn generate(width: u8, height: u8, rng: &mut SimpleRng) -> Self {
        let mut grid = Self::new(width, height);
        for cell in &mut grid.cells {
            cell.element = Some(rng.next_element());
        }
        grid
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: u8, y: u8) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Whether the position lies on the grid
    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Get cell at position, `None` if out of bounds
    pub fn get(&self, x: u8, y: u8) -> Option<CellState> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Occupant at position (`None` for out of bounds or empty cell)
    pub fn element(&self, x: u8, y: u8) -> Option<Element> {
        self.get(x, y).and_then(|c| c.element)
    }

    /// Set a cell's occupant, returns false if out of bounds
    pub fn set_element(&mut self, x: u8, y: u8, element: Option<Element>) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i].element = element;
                true
            }
            None => false,
        }
    }

    /// Swap the occupants of two cells
    ///
    /// Only the occupants move; matched flags stay with their cells.
    /// Out-of-bounds positions are a programming error here - callers
    /// validate coordinates first.
    pub fn swap(&mut self, a: Pos, b: Pos) {
        let ia = self.index(a.x, a.y).expect("swap position out of bounds");
        let ib = self.index(b.x, b.y).expect("swap position out of bounds");
        let tmp = self.cells[ia].element;
        self.cells[ia].element = self.cells[ib].element;
        self.cells[ib].element = tmp;
    }

    /// Find every 3-window match group on the grid
    ///
    /// Scan order is fixed: all row groups first (top row to bottom row, left
    /// to right within a row), then all column groups (top to bottom, left to
    /// right within a scan row). Empty cells never match.
    pub fn find_matches(&self) -> Vec<MatchGroup> {
        let mut matches = Vec::new();

        // Horizontal windows.
        for y in 0..self.height {
            for x in 0..self.width.saturating_sub((MATCH_LEN - 1) as u8) {
                if let Some(element) = self.window_element([
                    Pos::new(x, y),
                    Pos::new(x + 1, y),
                    Pos::new(x + 2, y),
                ]) {
                    matches.push(MatchGroup {
                        element,
                        cells: [Pos::new(x, y), Pos::new(x + 1, y), Pos::new(x + 2, y)],
                    });
                }
            }
        }

        // Vertical windows.
        for y in 0..self.height.saturating_sub((MATCH_LEN - 1) as u8) {
            for x in 0..self.width {
                if let Some(element) = self.window_element([
                    Pos::new(x, y),
                    Pos::new(x, y + 1),
                    Pos::new(x, y + 2),
                ]) {
                    matches.push(MatchGroup {
                        element,
                        cells: [Pos::new(x, y), Pos::new(x, y + 1), Pos::new(x, y + 2)],
                    });
                }
            }
        }

        matches
    }

    /// The shared element of a 3-window, if all three cells hold the same one
    fn window_element(&self, window: [Pos; MATCH_LEN]) -> Option<Element> {
        let first = self.element(window[0].x, window[0].y)?;
        for pos in &window[1..] {
            if self.element(pos.x, pos.y) != Some(first) {
                return None;
            }
        }
        Some(first)
    }

    /// Empty out every cell referenced by the given groups and flag it matched
    ///
    /// Idempotent: clearing an already-empty cell just re-flags it.
    pub fn clear_matches(&mut self, groups: &[MatchGroup]) {
        for group in groups {
            for pos in &group.cells {
                if let Some(i) = self.index(pos.x, pos.y) {
                    self.cells[i].element = None;
                    self.cells[i].matched = true;
                }
            }
        }
    }

    /// Compact every column downward, preserving relative vertical order
    ///
    /// Columns are independent. Vacated cells become empty and every cell's
    /// matched flag is reset, mirroring the reference drop step.
    pub fn apply_gravity(&mut self) {
        for x in 0..self.width {
            let mut write_y = self.height as i16 - 1;

            for y in (0..self.height).rev() {
                let i = self.index(x, y).unwrap();
                if let Some(element) = self.cells[i].element {
                    let w = self.index(x, write_y as u8).unwrap();
                    self.cells[w].element = Some(element);
                    write_y -= 1;
                }
            }

            // Everything above the compacted occupants is now empty.
            for y in 0..=write_y {
                let i = self.index(x, y as u8).unwrap();
                self.cells[i].element = None;
            }
        }

        for cell in &mut self.cells {
            cell.matched = false;
        }
    }

    /// Fill every empty cell with a fresh random element
    ///
    /// Does not re-check for resulting matches; the cascade loop owns that.
    pub fn refill(&mut self, rng: &mut SimpleRng) {
        for cell in &mut self.cells {
            if cell.element.is_none() {
                cell.element = Some(rng.next_element());
                cell.matched = false;
            }
        }
    }

    /// Number of empty cells
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|c| c.element.is_none()).count()
    }

    /// A settled grid has no empty cells and no match groups
    pub fn is_settled(&self) -> bool {
        self.count_empty() == 0 && self.find_matches().is_empty()
    }

    /// Build a grid from rows of occupants (for tests and tools)
    ///
    /// Panics when the rows are ragged or below the minimum dimensions.
    pub fn from_rows(rows: Vec<Vec<Option<Element>>>) -> Self {
        let height = rows.len();
        assert!(height >= MIN_GRID_DIM as usize, "too few rows");
        let width = rows[0].len();
        assert!(
            rows.iter().all(|r| r.len() == width),
            "rows must be rectangular"
        );

        let mut grid = Self::new(width as u8, height as u8);
        for (y, row) in rows.iter().enumerate() {
            for (x, element) in row.iter().enumerate() {
                grid.set_element(x as u8, y as u8, *element);
            }
        }
        grid
    }

    /// Convert to rows of occupants (for tests and display)
    pub fn to_rows(&self) -> Vec<Vec<Option<Element>>> {
        (0..self.height)
            .map(|y| (0..self.width).map(|x| self.element(x, y)).collect())
            .collect()
    }
}
