/// Rendering layer — all terminal I/O lives here.
///
/// Game code only ever sees the `Surface` trait: a logical canvas that can be
/// cleared and filled with solid rectangles.  `TerminalSurface` scales that
/// canvas onto the terminal grid with crossterm.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use crate::geometry::Rect;

// ── Colour palette ────────────────────────────────────────────────────────────

pub const C_PLAYER: Color = Color::Blue;
pub const C_BULLET: Color = Color::Yellow;
pub const C_PLATFORM: Color = Color::Green;
pub const C_ENEMY: Color = Color::Red;
const C_HINT: Color = Color::DarkGrey;

const BLOCK: &str = "█";

/// A 2D drawing target with a fixed logical size.
pub trait Surface {
    /// Logical canvas size as (width, height).
    fn size(&self) -> (f32, f32);

    fn clear(&mut self) -> std::io::Result<()>;

    fn fill_rect(&mut self, rect: Rect, color: Color) -> std::io::Result<()>;

    /// Make everything drawn since the last `clear` visible.
    fn present(&mut self) -> std::io::Result<()>;
}

/// Cell range covered by a rectangle: columns `[col, col_end)`,
/// rows `[row, row_end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellSpan {
    pub col: u16,
    pub col_end: u16,
    pub row: u16,
    pub row_end: u16,
}

pub struct TerminalSurface<W: Write> {
    out: W,
    canvas_width: f32,
    canvas_height: f32,
    cols: u16,
    rows: u16,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, canvas_width: f32, canvas_height: f32, cols: u16, rows: u16) -> Self {
        TerminalSurface { out, canvas_width, canvas_height, cols, rows }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    /// Rows available to the playfield; the last row holds the controls hint.
    fn play_rows(&self) -> u16 {
        self.rows.saturating_sub(1)
    }

    /// Map a logical rectangle onto terminal cells.  `None` when nothing of it
    /// is visible.  Any visible rectangle covers at least one cell, so thin
    /// things like bullets never vanish.
    pub fn to_cells(&self, rect: Rect) -> Option<CellSpan> {
        let rows = self.play_rows();
        if self.cols == 0 || rows == 0 {
            return None;
        }
        if rect.right() <= 0.0
            || rect.bottom() <= 0.0
            || rect.x >= self.canvas_width
            || rect.y >= self.canvas_height
        {
            return None;
        }

        let sx = self.cols as f32 / self.canvas_width;
        let sy = rows as f32 / self.canvas_height;
        let (col, col_end) = span(rect.x * sx, rect.right() * sx, self.cols);
        let (row, row_end) = span(rect.y * sy, rect.bottom() * sy, rows);
        Some(CellSpan { col, col_end, row, row_end })
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn span(start: f32, end: f32, limit: u16) -> (u16, u16) {
    let lo = (start.floor().max(0.0) as u16).min(limit - 1);
    let hi = (end.ceil().max(0.0) as u16).min(limit);
    (lo, hi.max(lo + 1))
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn size(&self) -> (f32, f32) {
        (self.canvas_width, self.canvas_height)
    }

    fn clear(&mut self) -> std::io::Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> std::io::Result<()> {
        let Some(cells) = self.to_cells(rect) else {
            return Ok(());
        };
        let line = BLOCK.repeat((cells.col_end - cells.col) as usize);
        self.out.queue(style::SetForegroundColor(color))?;
        for row in cells.row..cells.row_end {
            self.out.queue(cursor::MoveTo(cells.col, row))?;
            self.out.queue(Print(&line))?;
        }
        Ok(())
    }

    fn present(&mut self) -> std::io::Result<()> {
        let hint_row = self.rows.saturating_sub(1);
        self.out.queue(cursor::MoveTo(0, hint_row))?;
        self.out.queue(style::SetForegroundColor(C_HINT))?;
        self.out.queue(Print("← → : Move   ↑ : Jump   SPACE : Shoot   Q : Quit"))?;

        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, hint_row))?;
        self.out.flush()?;
        Ok(())
    }
}
