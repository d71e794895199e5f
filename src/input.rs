use std::io;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::layout::{Position, Rect};

use crate::grid::Direction;

/// Discrete commands consumed by the game loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Command {
    Direction(Direction),
    TogglePause,
    ToggleFullscreen,
    /// Ends any run in progress and starts a new one.
    Restart,
    Quit,
}

/// Maps a key press to a command.
#[must_use]
pub fn command_for_key(key: KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let command = match key.code {
        KeyCode::Left | KeyCode::Char('a' | 'A') => Command::Direction(Direction::Left),
        KeyCode::Up | KeyCode::Char('w' | 'W') => Command::Direction(Direction::Up),
        KeyCode::Right | KeyCode::Char('d' | 'D') => Command::Direction(Direction::Right),
        KeyCode::Down | KeyCode::Char('s' | 'S') => Command::Direction(Direction::Down),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Command::Quit,
        KeyCode::Char('p' | 'P' | ' ') => Command::TogglePause,
        KeyCode::Char('f' | 'F') => Command::ToggleFullscreen,
        KeyCode::Enter => Command::Restart,
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Command::Quit,
        _ => return None,
    };

    Some(command)
}

/// Maps a pointer event to a command: a left click on the canvas restarts.
///
/// `canvas_area` is where the canvas was last drawn, in terminal cells.
/// Clicks on the border, the status line or empty space do nothing.
#[must_use]
pub fn command_for_mouse(mouse: MouseEvent, canvas_area: Rect) -> Option<Command> {
    let on_canvas = canvas_area.contains(Position::new(mouse.column, mouse.row));
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if on_canvas => Some(Command::Restart),
        _ => None,
    }
}

/// Polls the terminal for input without blocking the frame loop.
#[derive(Debug, Default)]
pub struct InputHandler;

impl InputHandler {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Returns every command already queued by the terminal, in arrival order.
    ///
    /// Waits at most `timeout` for the first event. Mouse clicks are matched
    /// against `canvas_area`.
    pub fn drain(&mut self, timeout: Duration, canvas_area: Rect) -> io::Result<Vec<Command>> {
        let mut commands = Vec::new();
        let mut wait = timeout;

        while event::poll(wait)? {
            wait = Duration::ZERO;
            let command = match event::read()? {
                Event::Key(key) => command_for_key(key),
                Event::Mouse(mouse) => command_for_mouse(mouse, canvas_area),
                _ => None,
            };
            commands.extend(command);
        }

        Ok(commands)
    }
}
