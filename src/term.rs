//! Terminal front-end
//!
//! All terminal I/O lives here. The sink only translates a `Frame` into
//! terminal commands and the input source only translates key and mouse
//! events into `FrameInput`. No game logic is performed.

use std::io::{self, Write};
use std::sync::mpsc;
use std::thread;

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    style::{self, Color, Print},
    terminal,
};
use glam::Vec2;

use crate::consts::FLAME_MIN_LEN;
use crate::driver::{Frame, FrameInput, InputSource, RenderSink};
use crate::sim::{GamePhase, Rect};
use crate::{lerp, rotate_screen};

// ── Palette ──────────────────────────────────────────────────────────────────

const C_GATE: Color = Color::Green;
const C_FLAME_CORE: Color = Color::Yellow;
const C_FLAME_TIP: Color = Color::Red;
const C_HUD: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;
const C_OVER: Color = Color::Red;

const CH_GATE: char = '▓';
const CH_SHIP: char = '█';
const CH_FLAME: char = '*';

// ── Input ────────────────────────────────────────────────────────────────────

/// Map one terminal event to frame input. Only presses count.
pub fn map_event(event: &Event) -> FrameInput {
    match event {
        Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            modifiers,
            ..
        }) => match code {
            KeyCode::Char(' ') | KeyCode::Up => FrameInput {
                flap: true,
                ..Default::default()
            },
            KeyCode::Char('r') | KeyCode::Char('R') => FrameInput {
                restart: true,
                ..Default::default()
            },
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => FrameInput {
                quit: true,
                ..Default::default()
            },
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => FrameInput {
                quit: true,
                ..Default::default()
            },
            _ => FrameInput::default(),
        },
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            ..
        }) => FrameInput {
            flap: true,
            ..Default::default()
        },
        _ => FrameInput::default(),
    }
}

/// Input source fed by a dedicated blocking reader thread, so the frame loop
/// never blocks on terminal I/O.
pub struct TerminalInput {
    rx: mpsc::Receiver<Event>,
}

impl TerminalInput {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel::<Event>();
        thread::spawn(move || {
            while let Ok(ev) = event::read() {
                if tx.send(ev).is_err() {
                    // Receiver dropped, program exiting
                    break;
                }
            }
        });
        Self { rx }
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self) -> io::Result<FrameInput> {
        Ok(self
            .rx
            .try_iter()
            .fold(FrameInput::default(), |acc, ev| acc.merge(map_event(&ev))))
    }
}

// ── Session ──────────────────────────────────────────────────────────────────

/// Raw mode, alternate screen and mouse capture for as long as it lives
pub struct TerminalSession {
    out: io::Stdout,
}

impl TerminalSession {
    pub fn enter() -> io::Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;
        out.execute(EnableMouseCapture)?;
        Ok(Self { out })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        // Always restore the terminal
        let _ = self.out.execute(DisableMouseCapture);
        let _ = self.out.execute(cursor::Show);
        let _ = self.out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

// ── Rasteriser ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
}

impl Cell {
    const BLANK: Cell = Cell {
        ch: ' ',
        color: Color::Reset,
    };
}

/// A character grid: row 0 is the HUD, the rest is the playfield
#[derive(Debug, Clone)]
pub struct Canvas {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
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

    pub fn get(&self, col: u16, row: u16) -> Cell {
        self.cells[row as usize * self.cols as usize + col as usize]
    }

    fn set(&mut self, col: u16, row: u16, cell: Cell) {
        if col < self.cols && row < self.rows {
            self.cells[row as usize * self.cols as usize + col as usize] = cell;
        }
    }

    fn text(&mut self, col: u16, row: u16, s: &str, color: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(col.saturating_add(i as u16), row, Cell { ch, color });
        }
    }

    fn field_rows(&self) -> u16 {
        self.rows.saturating_sub(1)
    }

    /// Playfield pixel at the center of a field cell
    fn sample_point(&self, frame: &Frame<'_>, col: u16, field_row: u16) -> (i32, i32) {
        let x = (col as f32 + 0.5) * frame.width as f32 / self.cols as f32;
        let y = (field_row as f32 + 0.5) * frame.height as f32 / self.field_rows() as f32;
        (x as i32, y as i32)
    }

    /// Field cell containing a playfield point, if on screen
    fn cell_at(&self, frame: &Frame<'_>, p: Vec2) -> Option<(u16, u16)> {
        if p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let col = (p.x * self.cols as f32 / frame.width as f32) as u16;
        let row = (p.y * self.field_rows() as f32 / frame.height as f32) as u16;
        (col < self.cols && row < self.field_rows()).then_some((col, row + 1))
    }

    /// Rasterise a whole frame onto a `cols` x `rows` grid
    pub fn paint(frame: &Frame<'_>, cols: u16, rows: u16) -> Self {
        let mut canvas = Self::new(cols, rows);
        if cols == 0 || rows < 2 {
            return canvas;
        }

        for field_row in 0..canvas.field_rows() {
            for col in 0..cols {
                let (x, y) = canvas.sample_point(frame, col, field_row);
                if let Some(cell) = field_cell(frame, x, y) {
                    canvas.set(col, field_row + 1, cell);
                }
            }
        }

        canvas.paint_flame(frame);
        canvas.paint_hud(frame);
        canvas
    }

    fn paint_flame(&mut self, frame: &Frame<'_>) {
        let Some(thrust) = frame.thrust else {
            return;
        };
        // Flame points out the back of the ship and shrinks as thrust runs out
        let dir = rotate_screen(Vec2::NEG_X, frame.ship_angle);
        let length = lerp(FLAME_MIN_LEN, thrust.length, thrust.fraction);
        let step = frame.width as f32 / self.cols as f32 * 0.5;
        let mut t = 0.0;
        while t <= length {
            let p = thrust.nozzle + dir * t;
            if let Some((col, row)) = self.cell_at(frame, p) {
                if self.get(col, row).ch != CH_SHIP {
                    let color = if t < length * 0.5 {
                        C_FLAME_CORE
                    } else {
                        C_FLAME_TIP
                    };
                    self.set(col, row, Cell { ch: CH_FLAME, color });
                }
            }
            t += step.max(1.0);
        }
    }

    fn paint_hud(&mut self, frame: &Frame<'_>) {
        let run = &frame.run;
        self.text(1, 0, &format!("Score {}  Best {}", run.score, run.best), C_HUD);

        let (hint, color) = match run.phase() {
            GamePhase::Idle => ("SPACE to flap", C_HINT),
            GamePhase::Active => ("", C_HINT),
            GamePhase::Over => ("CRASHED  SPACE retry  R reset", C_OVER),
        };
        let len = hint.chars().count() as u16;
        self.text(self.cols.saturating_sub(len + 1), 0, hint, color);
    }
}

fn contains(rect: &Rect, x: i32, y: i32) -> bool {
    x >= rect.left() && x < rect.right() && y >= rect.top() && y < rect.bottom()
}

/// Ship pixels win over gates so a crash is visible where it happened
fn field_cell(frame: &Frame<'_>, x: i32, y: i32) -> Option<Cell> {
    let ship = frame.ship_rect;
    if contains(&ship, x, y) {
        let (lx, ly) = ((x - ship.x) as u32, (y - ship.y) as u32);
        if lx < frame.ship_mask.width()
            && ly < frame.ship_mask.height()
            && frame.ship_mask.get(lx, ly)
        {
            let [r, g, b, _] = frame.ship_sprite.pixel(lx, ly);
            return Some(Cell {
                ch: CH_SHIP,
                color: Color::Rgb { r, g, b },
            });
        }
    }

    frame
        .gate_rects
        .iter()
        .any(|r| contains(r, x, y))
        .then_some(Cell {
            ch: CH_GATE,
            color: C_GATE,
        })
}

// ── Sink ─────────────────────────────────────────────────────────────────────

/// Render sink that draws each frame to a terminal writer
pub struct TerminalSink<W: Write> {
    out: W,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Largest grid that fits the terminal, keeping cells about twice as
    /// tall as they are wide
    fn grid_size(frame: &Frame<'_>) -> io::Result<(u16, u16)> {
        let (term_cols, term_rows) = terminal::size()?;
        let field_rows = term_rows.saturating_sub(1).max(1);
        let cols = (field_rows as u32 * 2 * frame.width as u32 / frame.height.max(1) as u32)
            .clamp(1, term_cols.max(1) as u32) as u16;
        Ok((cols, field_rows + 1))
    }

    fn flush_canvas(&mut self, canvas: &Canvas) -> io::Result<()> {
        self.out
            .queue(terminal::Clear(terminal::ClearType::All))?;
        for row in 0..canvas.rows() {
            self.out.queue(cursor::MoveTo(0, row))?;
            let mut color = Color::Reset;
            self.out.queue(style::SetForegroundColor(color))?;
            let mut run = String::new();
            for col in 0..canvas.cols() {
                let cell = canvas.get(col, row);
                if cell.color != color && cell.ch != ' ' {
                    self.out.queue(Print(&run))?;
                    run.clear();
                    color = cell.color;
                    self.out.queue(style::SetForegroundColor(color))?;
                }
                run.push(cell.ch);
            }
            self.out.queue(Print(&run))?;
        }
        self.out.queue(style::ResetColor)?;
        self.out.flush()
    }
}

impl<W: Write> RenderSink for TerminalSink<W> {
    fn present(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let (cols, rows) = Self::grid_size(frame)?;
        let canvas = Canvas::paint(frame, cols, rows);
        self.flush_canvas(&canvas)
    }
}
