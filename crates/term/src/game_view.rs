//! GameView: maps a `SessionSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::catalog;
use crate::core::SessionSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Element, Outcome, Pos};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Transient UI state layered over the session snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UiOverlay {
    pub cursor: Option<Pos>,
    pub selected: Option<Pos>,
    pub hint: Option<(Pos, Pos)>,
    /// Connected remote-control clients, if the adapter is running.
    pub adapter_clients: Option<u16>,
}

/// Render `seconds` as `m:ss`, like the reference header timer.
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// A lightweight terminal renderer for the reef game.
pub struct GameView {
    /// Grid cell width in terminal columns.
    cell_w: u16,
    /// Grid cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self { cell_w, cell_h }
    }

    /// Render the session into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only pay a resize
    /// when the terminal size changes.
    pub fn render_into(&self, snap: &SessionSnapshot, ui: &UiOverlay, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let grid_w = snap.grid.width() as u16;
        let grid_h = snap.grid.height() as u16;
        let board_px_w = grid_w * self.cell_w;
        let board_px_h = grid_h * self.cell_h;
        let frame_w = board_px_w + 2;
        let frame_h = board_px_h + 2;

        let start_x = 1u16;
        let start_y = 1u16;

        let border = CellStyle {
            fg: Rgb::new(200, 200, 200),
            bg: Rgb::new(0, 0, 0),
            bold: false,
            dim: false,
        };

        self.draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        for y in 0..grid_h {
            for x in 0..grid_w {
                let pos = Pos::new(x as u8, y as u8);
                let cell = snap.grid.get(pos.x, pos.y).unwrap_or_default();
                let style = self.cell_style(cell.element, cell.matched, pos, ui);
                let ch = match cell.element {
                    Some(_) => '█',
                    None => '·',
                };
                self.fill_cell_rect(fb, start_x, start_y, x, y, ch, style);
            }
        }

        // Cursor brackets sit over whatever the cell drew.
        if let Some(cursor) = ui.cursor {
            self.draw_cursor_marks(fb, start_x, start_y, cursor, snap);
        }

        self.draw_side_panel(fb, snap, ui, viewport, start_x, start_y, frame_w);
        self.draw_footer(fb, snap, viewport);

        if snap.paused {
            self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "PAUSED");
        } else {
            match snap.outcome {
                Some(Outcome::Won) => {
                    self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "LEVEL COMPLETE!")
                }
                Some(Outcome::Lost) => {
                    self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "TIME'S UP")
                }
                None => {}
            }
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &SessionSnapshot, ui: &UiOverlay, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, ui, viewport, &mut fb);
        fb
    }

    fn cell_style(&self, element: Option<Element>, matched: bool, pos: Pos, ui: &UiOverlay) -> CellStyle {
        let fg = match element {
            Some(e) => element_color(e),
            None => Rgb::new(90, 90, 100),
        };

        let mut bg = Rgb::new(20, 30, 50);
        if matched {
            bg = Rgb::new(40, 120, 60);
        }
        if let Some((a, b)) = ui.hint {
            if pos == a || pos == b {
                bg = Rgb::new(110, 70, 140);
            }
        }
        if ui.selected == Some(pos) {
            bg = Rgb::new(150, 120, 30);
        }

        CellStyle {
            fg,
            bg,
            bold: ui.selected == Some(pos),
            dim: element.is_none(),
        }
    }

    fn draw_cursor_marks(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        cursor: Pos,
        snap: &SessionSnapshot,
    ) {
        if cursor.x as u16 >= snap.grid.width() as u16 || cursor.y as u16 >= snap.grid.height() as u16 {
            return;
        }
        let px = start_x + 1 + cursor.x as u16 * self.cell_w;
        let py = start_y + 1 + cursor.y as u16 * self.cell_h;

        let element = snap.grid.element(cursor.x, cursor.y);
        let style = CellStyle {
            fg: Rgb::new(255, 255, 255),
            bg: match element {
                Some(e) => element_color_dimmed(e),
                None => Rgb::new(20, 30, 50),
            },
            bold: true,
            dim: false,
        };
        fb.put_char(px, py, '[', style);
        if self.cell_w > 1 {
            fb.put_char(px + self.cell_w - 1, py, ']', style);
        }
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn fill_cell_rect(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = start_x + 1 + cell_x * self.cell_w;
        let py = start_y + 1 + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &SessionSnapshot,
        ui: &UiOverlay,
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 14 {
            return;
        }

        let label = CellStyle {
            fg: Rgb::new(220, 220, 220),
            bg: Rgb::new(0, 0, 0),
            bold: true,
            dim: false,
        };
        let value = CellStyle {
            fg: Rgb::new(200, 200, 200),
            bg: Rgb::new(0, 0, 0),
            bold: false,
            dim: false,
        };
        let done = CellStyle {
            fg: Rgb::new(110, 220, 130),
            bg: Rgb::new(0, 0, 0),
            bold: false,
            dim: false,
        };
        let muted = CellStyle { dim: true, ..value };

        let mut y = start_y;
        fb.put_str(panel_x, y, "LEVEL", label);
        fb.put_u32(panel_x + 6, y, snap.level, value);
        y = y.saturating_add(1);

        fb.put_str(panel_x, y, "SCORE", label);
        fb.put_u32(panel_x + 6, y, snap.score, value);
        y = y.saturating_add(1);

        fb.put_str(panel_x, y, "TIME", label);
        fb.put_str(panel_x + 6, y, &format_time(snap.time_left), value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "GOALS", label);
        y = y.saturating_add(1);
        for goal in &snap.goals {
            if y >= viewport.height {
                break;
            }
            let name_style = CellStyle {
                fg: element_color(goal.element),
                ..value
            };
            fb.put_str(panel_x, y, catalog::display_name(Some(goal.element)), name_style);
            let nums_x = panel_x + 12;
            fb.put_u32(nums_x, y, goal.collected, value);
            fb.put_char(nums_x + digits(goal.collected), y, '/', value);
            fb.put_u32(nums_x + digits(goal.collected) + 1, y, goal.target, value);
            if goal.completed {
                fb.put_char(panel_x + panel_w.saturating_sub(2), y, '✓', done);
            }
            y = y.saturating_add(1);
        }
        y = y.saturating_add(1);

        fb.put_str(panel_x, y, "ACHIEVEMENTS", label);
        y = y.saturating_add(1);
        for achievement in &snap.achievements {
            if y >= viewport.height {
                break;
            }
            if !achievement.unlocked {
                fb.put_str(panel_x, y, achievement.name, muted);
                fb.put_char(panel_x + panel_w.saturating_sub(2), y, '×', muted);
            } else if achievement.mastered() {
                fb.put_str(panel_x, y, achievement.name, done);
                fb.put_char(panel_x + panel_w.saturating_sub(2), y, '★', done);
            } else {
                fb.put_str(panel_x, y, achievement.name, value);
                let tier_x = panel_x + panel_w.saturating_sub(4);
                fb.put_u32(tier_x, y, achievement.current_tier as u32 + 1, value);
                fb.put_char(tier_x + 1, y, '/', value);
                fb.put_u32(tier_x + 2, y, achievement.tiers.len() as u32, value);
            }
            y = y.saturating_add(1);
        }

        if let Some(clients) = ui.adapter_clients {
            y = y.saturating_add(1);
            if y < viewport.height {
                fb.put_str(panel_x, y, "REMOTE", label);
                fb.put_u32(panel_x + 7, y, clients as u32, value);
            }
        }
    }

    fn draw_footer(&self, fb: &mut FrameBuffer, snap: &SessionSnapshot, viewport: Viewport) {
        if viewport.height < 2 {
            return;
        }
        let style = CellStyle {
            fg: Rgb::new(140, 140, 150),
            bg: Rgb::new(0, 0, 0),
            bold: false,
            dim: true,
        };
        let help = match snap.outcome {
            Some(Outcome::Won) => "n next level  r replay  q quit",
            Some(Outcome::Lost) => "r retry  q quit",
            None => "arrows move  space select  g hint  p pause  r restart  q quit",
        };
        fb.put_str(1, viewport.height - 1, help, style);
    }

    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        text: &str,
    ) {
        let style = CellStyle {
            fg: Rgb::new(250, 210, 80),
            bg: Rgb::new(0, 0, 0),
            bold: true,
            dim: false,
        };
        let text_x = start_x + frame_w.saturating_sub(text.len() as u16) / 2;
        let text_y = start_y + frame_h / 2;
        fb.put_str(text_x, text_y, text, style);
    }
}

fn element_color(element: Element) -> Rgb {
    match element {
        Element::GreenFish => Rgb::new(100, 220, 120),
        Element::RedFish => Rgb::new(240, 140, 60),
        Element::BlueFish => Rgb::new(90, 150, 240),
        Element::Bab => Rgb::new(220, 220, 90),
    }
}

fn element_color_dimmed(element: Element) -> Rgb {
    let c = element_color(element);
    Rgb::new(c.r / 2, c.g / 2, c.b / 2)
}

fn digits(value: u32) -> u16 {
    let mut n = 1;
    let mut v = value;
    while v >= 10 {
        v /= 10;
        n += 1;
    }
    n
}
