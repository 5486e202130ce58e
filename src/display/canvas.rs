/// Character-cell frame buffer.
///
/// The game draws in canvas pixels (800×640); the canvas samples that space
/// into however many terminal cells are available and writes the whole
/// grid out in one pass.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};

use crate::assets::{Sprite, Tile, TileMap};
use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::entities::Rect;

pub const C_BACKGROUND: Color = Color::Black;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bg: C_BACKGROUND,
    };
}

/// Glyph and colours a tile is drawn with.
fn tile_cell(tile: Tile) -> Cell {
    match tile {
        Tile::Grass => Cell { ch: '"', fg: Color::Green, bg: Color::DarkGreen },
        Tile::Asphalt => Cell { ch: ' ', fg: Color::Grey, bg: Color::DarkGrey },
        Tile::LaneMarking => Cell { ch: '|', fg: Color::White, bg: Color::DarkGrey },
        Tile::Kerb => Cell { ch: '▒', fg: Color::Red, bg: Color::White },
    }
}

#[derive(Clone, Debug)]
pub struct Canvas {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        Canvas {
            cols,
            rows,
            cells: vec![Cell::BLANK; cols as usize * rows as usize],
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(row as usize * self.cols as usize + col as usize)
    }

    fn cell_mut(&mut self, col: i32, row: i32) -> Option<&mut Cell> {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return None;
        }
        self.cells
            .get_mut(row as usize * self.cols as usize + col as usize)
    }

    /// Cell column containing canvas pixel `px`.
    pub fn col_for(&self, px: f32) -> i32 {
        (px * self.cols as f32 / SCREEN_WIDTH).floor() as i32
    }

    /// Cell row containing canvas pixel `py`.
    pub fn row_for(&self, py: f32) -> i32 {
        (py * self.rows as f32 / SCREEN_HEIGHT).floor() as i32
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    /// Fill every cell from the tile under its centre pixel. Cells over a
    /// blank tile are left untouched.
    pub fn draw_map(&mut self, map: &TileMap) {
        let px_per_col = SCREEN_WIDTH / self.cols.max(1) as f32;
        let px_per_row = SCREEN_HEIGHT / self.rows.max(1) as f32;
        for row in 0..self.rows as i32 {
            for col in 0..self.cols as i32 {
                let px = (col as f32 + 0.5) * px_per_col;
                let py = (row as f32 + 0.5) * px_per_row;
                if let Some(tile) = map.tile_at_pixel(px, py) {
                    if let Some(cell) = self.cell_mut(col, row) {
                        *cell = tile_cell(tile);
                    }
                }
            }
        }
    }

    /// Stretch `sprite` over the cells covered by `dest`. Transparent
    /// sprite cells keep whatever is underneath; opaque ones keep the
    /// underlying background colour.
    pub fn blit(&mut self, sprite: &Sprite, dest: Rect, fg: Color) {
        if sprite.width() == 0 || sprite.height() == 0 {
            return;
        }
        let c0 = self.col_for(dest.x);
        let r0 = self.row_for(dest.y);
        let box_cols = (self.col_for(dest.x + dest.w) - c0).max(1);
        let box_rows = (self.row_for(dest.y + dest.h) - r0).max(1);

        for dr in 0..box_rows {
            for dc in 0..box_cols {
                let sc = dc as usize * sprite.width() / box_cols as usize;
                let sr = dr as usize * sprite.height() / box_rows as usize;
                let ch = sprite.at(sc, sr);
                if ch == ' ' {
                    continue;
                }
                if let Some(cell) = self.cell_mut(c0 + dc, r0 + dr) {
                    cell.ch = ch;
                    cell.fg = fg;
                }
            }
        }
    }

    /// Write `text` left to right from (`col`, `row`), clipped to the grid.
    pub fn text(&mut self, col: i32, row: i32, text: &str, fg: Color) {
        for (i, ch) in text.chars().enumerate() {
            if let Some(cell) = self.cell_mut(col + i as i32, row) {
                cell.ch = ch;
                cell.fg = fg;
            }
        }
    }

    /// Write `text` centred on `row`.
    pub fn text_centered(&mut self, row: i32, text: &str, fg: Color) {
        let len = text.chars().count() as i32;
        let col = (self.cols as i32 - len) / 2;
        self.text(col.max(0), row, text, fg);
    }

    // ── Output ────────────────────────────────────────────────────────────────

    /// Queue the whole grid row by row, switching colours only where they
    /// change, then flush.
    pub fn flush<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let mut fg = None;
        let mut bg = None;
        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, row))?;
            let start = row as usize * self.cols as usize;
            let mut run = String::new();
            for cell in &self.cells[start..start + self.cols as usize] {
                if fg != Some(cell.fg) || bg != Some(cell.bg) {
                    if !run.is_empty() {
                        out.queue(Print(&run))?;
                        run.clear();
                    }
                    out.queue(style::SetForegroundColor(cell.fg))?;
                    out.queue(style::SetBackgroundColor(cell.bg))?;
                    fg = Some(cell.fg);
                    bg = Some(cell.bg);
                }
                run.push(cell.ch);
            }
            if !run.is_empty() {
                out.queue(Print(&run))?;
            }
        }
        out.queue(style::ResetColor)?;
        out.flush()?;
        Ok(())
    }
}
