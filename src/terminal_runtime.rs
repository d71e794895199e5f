use std::io;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use tracing::debug;

use crate::canvas::TerminalCanvas;
use crate::renderer::{self, StatusInfo};

/// Columns and rows taken by the border and status line around the canvas.
const CHROME_COLUMNS: u16 = 2;
const CHROME_ROWS: u16 = 3;

/// Canvas size in pixels that fits a `columns` x `rows` terminal next to the
/// border and status line. Each cell holds one pixel column and two pixel rows.
#[must_use]
pub fn canvas_size_for(columns: u16, rows: u16) -> (u32, u32) {
    let width = u32::from(columns.saturating_sub(CHROME_COLUMNS));
    let height = u32::from(rows.saturating_sub(CHROME_ROWS)) * 2;
    (width, height)
}

/// The game's hold on the terminal for one run.
///
/// Opening it switches to raw mode and the alternate screen with mouse
/// capture; dropping it gives the terminal back. It also remembers the view
/// mode and where the canvas was last drawn, so clicks can be hit-tested.
pub struct GameScreen {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    fullscreen: bool,
    canvas_area: Rect,
}

impl GameScreen {
    pub fn open() -> io::Result<Self> {
        terminal::enable_raw_mode()?;

        let mut stdout = io::stdout();
        let terminal = execute!(stdout, EnterAlternateScreen, EnableMouseCapture, Hide)
            .and_then(|()| Terminal::new(CrosstermBackend::new(stdout)));

        match terminal {
            Ok(terminal) => Ok(Self {
                terminal,
                fullscreen: false,
                canvas_area: Rect::default(),
            }),
            Err(error) => {
                let _ = restore_terminal();
                Err(error)
            }
        }
    }

    /// Switches between the bare canvas and the boxed view with status line.
    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
        debug!(fullscreen = self.fullscreen, "view changed");
    }

    /// Draws one frame of `canvas` with the current view mode.
    pub fn draw(&mut self, canvas: &TerminalCanvas, info: StatusInfo) -> io::Result<()> {
        let fullscreen = self.fullscreen;
        let mut canvas_area = self.canvas_area;
        self.terminal.draw(|frame| {
            canvas_area = renderer::render(frame, canvas, info, fullscreen);
        })?;
        self.canvas_area = canvas_area;
        Ok(())
    }

    /// Cells covered by the canvas in the last drawn frame.
    #[must_use]
    pub fn canvas_area(&self) -> Rect {
        self.canvas_area
    }
}

impl Drop for GameScreen {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

/// Leaves raw mode, mouse capture and the alternate screen.
///
/// Safe to call twice, as happens when the panic hook runs before drop.
pub fn restore_terminal() -> io::Result<()> {
    let raw_mode = terminal::disable_raw_mode();
    let mut stdout = io::stdout();
    execute!(stdout, DisableMouseCapture, Show, LeaveAlternateScreen)?;
    raw_mode
}
