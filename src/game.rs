use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, trace, warn};

use crate::config::{
    INITIAL_LOOP_TIME_MS, MESSAGE_COLOR, MIN_LOOP_TIME_MS, PAUSED_MESSAGE, WELCOME_COLOR,
    WELCOME_MESSAGE,
};
use crate::food::Food;
use crate::grid::GridSize;
use crate::input::Command;
use crate::scheduler::{FrameHandle, FrameQueue, FrameScheduler};
use crate::snake::Snake;
use crate::surface::{Presenter, Surface};

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Status {
    /// Welcome screen; nothing has been played yet.
    Idle,
    Running,
    Paused,
    Ended,
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EndCause {
    WallCollision,
    SelfCollision,
    /// Every cell food may be placed on is covered by the snake.
    NoRoomForFood,
    /// Ended from outside, e.g. by a restart.
    Stopped,
}

/// Per-run values, reset in full by [`Game::new_game`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Session {
    pub score: u32,
    /// Minimum milliseconds between two simulation steps.
    pub loop_time_ms: u64,
    pub last_tick_ms: u64,
    /// Set when the previous step saw digested food at the tail.
    pub grow_next: bool,
    pub status: Status,
    pub end_cause: Option<EndCause>,
}

impl Session {
    fn new(status: Status) -> Self {
        Self {
            score: 0,
            loop_time_ms: INITIAL_LOOP_TIME_MS,
            last_tick_ms: 0,
            grow_next: false,
            status,
            end_cause: None,
        }
    }
}

/// Runs the snake simulation on a drawing surface, one scheduled frame at a time.
///
/// The game owns its surface and frame scheduler. Each delivered frame
/// reschedules the next one; a simulation step only happens once more than
/// `loop_time_ms` has passed since the previous step.
pub struct Game<S, F> {
    pub snake: Snake,
    pub food: Food,
    session: Session,
    grid: GridSize,
    presenter: Presenter,
    surface: S,
    frames: F,
    frame: Option<FrameHandle>,
    rng: StdRng,
}

impl<S: Surface, F: FrameScheduler> Game<S, F> {
    /// Creates an idle game showing the welcome message.
    ///
    /// `seed` drives food placement, so equal seeds replay equal games.
    pub fn new(surface: S, frames: F, presenter: Presenter, grid: GridSize, seed: u64) -> Self {
        let mut game = Self {
            snake: Snake::new(),
            food: Food::default(),
            session: Session::new(Status::Idle),
            grid,
            presenter,
            surface,
            frames,
            frame: None,
            rng: StdRng::seed_from_u64(seed),
        };

        game.presenter
            .overlay_message(&mut game.surface, &WELCOME_MESSAGE, WELCOME_COLOR);
        game
    }

    /// Requests the first frame of the loop.
    pub fn start(&mut self) {
        if let Some(previous) = self.frame.take() {
            self.frames.cancel(previous);
        }
        self.frame = Some(self.frames.schedule_next_frame());
    }

    /// Handles one delivered frame at time `now_ms`.
    ///
    /// Frames other than the one currently outstanding are ignored, so a
    /// frame cancelled by pause or game over can never step the simulation.
    pub fn on_frame(&mut self, handle: FrameHandle, now_ms: u64) {
        if self.frame != Some(handle) || self.session.status != Status::Running {
            trace!(?handle, "ignoring stale frame");
            return;
        }

        self.frame = Some(self.frames.schedule_next_frame());

        if now_ms.saturating_sub(self.session.last_tick_ms) > self.session.loop_time_ms {
            self.step();
            self.session.last_tick_ms = now_ms;
        }
    }

    /// Applies one input command.
    ///
    /// Returns the command back when it is not the game's to handle
    /// (fullscreen and quit belong to the runtime).
    pub fn handle(&mut self, command: Command) -> Option<Command> {
        match command {
            Command::Direction(direction) => self.snake.set_direction(direction),
            Command::TogglePause => self.toggle_pause(),
            Command::Restart => self.restart(),
            Command::ToggleFullscreen | Command::Quit => return Some(command),
        }
        None
    }

    /// Pauses the welcome screen or a running game, or resumes a paused one.
    ///
    /// Resuming always lands in `Running`, so pausing from the welcome
    /// screen and toggling again starts play with the current snake.
    pub fn toggle_pause(&mut self) {
        match self.session.status {
            Status::Idle | Status::Running => {
                self.session.status = Status::Paused;
                if let Some(frame) = self.frame.take() {
                    self.frames.cancel(frame);
                }
                self.presenter
                    .overlay_message(&mut self.surface, &[PAUSED_MESSAGE], MESSAGE_COLOR);
                info!(score = self.session.score, "game paused");
            }
            Status::Paused => {
                self.session.status = Status::Running;
                self.presenter.clear(&mut self.surface);
                self.start();
                info!("game resumed");
            }
            Status::Ended => {}
        }
    }

    /// Throws away the current run and starts a fresh one.
    pub fn new_game(&mut self) {
        self.session = Session::new(Status::Running);
        self.snake = Snake::new();
        self.food = Food::default();
        info!(
            width = self.grid.width,
            height = self.grid.height,
            "new game"
        );
        self.start();
    }

    /// Ends the current run. Calling it again once ended does nothing.
    pub fn end_game(&mut self) {
        self.finish(EndCause::Stopped);
    }

    /// Ends whatever is in progress and starts a new game.
    pub fn restart(&mut self) {
        self.end_game();
        self.new_game();
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.session.status
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.session.score
    }

    #[must_use]
    pub fn loop_time_ms(&self) -> u64 {
        self.session.loop_time_ms
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.frames
    }

    /// One simulation step: draw, move, collide, digest, eat.
    fn step(&mut self) {
        self.presenter.clear(&mut self.surface);
        self.snake.draw(&self.presenter, &mut self.surface);

        if let Err(error) = self.food.place(&mut self.rng, self.grid, &self.snake) {
            warn!(%error, "cannot place food");
            self.finish(EndCause::NoRoomForFood);
            return;
        }
        self.food.draw(&self.presenter, &mut self.surface);

        self.snake.move_forward();

        if self.snake.has_hit_wall(self.grid) {
            self.finish(EndCause::WallCollision);
            return;
        }
        if self.snake.has_hit_self() {
            self.finish(EndCause::SelfCollision);
            return;
        }

        if self.session.grow_next {
            self.session.grow_next = false;
            self.snake.grow();
        }
        self.session.grow_next = self.snake.is_food_swallowed();

        if self.snake.has_hit_food(&self.food) {
            self.snake.feed(&self.food);
            self.food = Food::default();
            self.session.score += 1;

            if self.session.loop_time_ms > MIN_LOOP_TIME_MS {
                self.session.loop_time_ms -= 1;
            }
            debug!(
                score = self.session.score,
                loop_time_ms = self.session.loop_time_ms,
                "food eaten"
            );
        }
    }

    fn finish(&mut self, cause: EndCause) {
        if self.session.status == Status::Ended {
            return;
        }

        self.session.status = Status::Ended;
        self.session.end_cause = Some(cause);
        if let Some(frame) = self.frame.take() {
            self.frames.cancel(frame);
        }

        let message = format!("Final score: {}", self.session.score);
        self.presenter
            .overlay_message(&mut self.surface, &[message.as_str()], MESSAGE_COLOR);
        info!(score = self.session.score, ?cause, "game over");
    }
}

impl<S: Surface> Game<S, FrameQueue> {
    /// Delivers the outstanding frame, if any. Returns true when one was due.
    pub fn pump(&mut self, now_ms: u64) -> bool {
        match self.frames.take_due() {
            Some(handle) => {
                self.on_frame(handle, now_ms);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::canvas::TerminalCanvas;
    use crate::food::Food;
    use crate::grid::{Cell, Direction, GridSize};
    use crate::input::Command;
    use crate::scheduler::{FrameQueue, FrameScheduler};
    use crate::snake::Snake;
    use crate::surface::Presenter;

    use super::{EndCause, Game, Status};

    const STEP_MS: u64 = 100;

    fn game(width: u16, height: u16) -> Game<TerminalCanvas, FrameQueue> {
        Game::new(
            TerminalCanvas::new(u32::from(width), u32::from(height)),
            FrameQueue::new(),
            Presenter::new(1, 0.1),
            GridSize { width, height },
            11,
        )
    }

    fn running(width: u16, height: u16) -> (Game<TerminalCanvas, FrameQueue>, u64) {
        let mut game = game(width, height);
        game.new_game();
        (game, STEP_MS)
    }

    /// Delivers one frame late enough to step the simulation.
    fn step(game: &mut Game<TerminalCanvas, FrameQueue>, now: &mut u64) {
        *now += STEP_MS;
        assert!(game.pump(*now), "a frame should be outstanding");
    }

    fn has_text(game: &Game<TerminalCanvas, FrameQueue>, text: &str) -> bool {
        game.surface().texts().iter().any(|run| run.text == text)
    }

    #[test]
    fn new_game_is_idle_behind_welcome_message() {
        let mut game = game(20, 20);

        assert_eq!(game.status(), Status::Idle);
        assert!(has_text(&game, "Snake Game: Click to Play!"));
        assert!(!game.pump(STEP_MS));
    }

    #[test]
    fn snake_moves_one_cell_per_step() {
        let (mut game, mut now) = running(20, 20);

        step(&mut game, &mut now);

        assert_eq!(game.snake.head(), Cell::new(5, 1));
        assert_eq!(game.snake.len(), 4);
        assert!(game.food.is_set());
    }

    #[test]
    fn frames_inside_loop_time_do_not_step() {
        let (mut game, _) = running(20, 20);

        assert!(game.pump(50));
        assert_eq!(game.snake.head(), Cell::new(4, 1));

        assert!(game.pump(71));
        assert_eq!(game.snake.head(), Cell::new(5, 1));

        // Exactly loop_time after the last step is still too early.
        assert!(game.pump(141));
        assert_eq!(game.snake.head(), Cell::new(5, 1));
        assert!(game.pump(142));
        assert_eq!(game.snake.head(), Cell::new(6, 1));
    }

    #[test]
    fn eating_scores_and_speeds_up_but_growth_waits_for_the_tail() {
        let (mut game, mut now) = running(20, 20);
        game.food = Food::at(Cell::new(5, 1));

        step(&mut game, &mut now);
        assert_eq!(game.score(), 1);
        assert_eq!(game.loop_time_ms(), 69);
        assert_eq!(game.snake.len(), 4);

        // Three more moves carry the meal to the tail; the fourth adds it.
        for _ in 0..3 {
            step(&mut game, &mut now);
            assert_eq!(game.snake.len(), 4);
        }
        step(&mut game, &mut now);
        assert_eq!(game.snake.len(), 5);
        assert_eq!(game.snake.tail(), Cell::new(5, 1));

        step(&mut game, &mut now);
        assert_eq!(game.snake.len(), 5);
    }

    #[test]
    fn wall_collision_beats_food_on_the_same_cell() {
        let (mut game, mut now) = running(8, 8);
        game.snake = Snake::from_segments(
            vec![Cell::new(7, 1), Cell::new(6, 1), Cell::new(5, 1)],
            Direction::Right,
        );
        game.food = Food::at(Cell::new(8, 1));

        step(&mut game, &mut now);

        assert_eq!(game.status(), Status::Ended);
        assert_eq!(game.session().end_cause, Some(EndCause::WallCollision));
        assert_eq!(game.score(), 0);
        assert_eq!(game.loop_time_ms(), 70);
        assert!(has_text(&game, "Final score: 0"));
        assert_eq!(game.scheduler_mut().pending(), None);
    }

    #[test]
    fn self_collision_ends_the_game() {
        let (mut game, mut now) = running(10, 10);
        game.snake = Snake::from_segments(
            vec![
                Cell::new(2, 2),
                Cell::new(1, 2),
                Cell::new(1, 3),
                Cell::new(2, 3),
                Cell::new(3, 3),
                Cell::new(3, 2),
            ],
            Direction::Down,
        );

        step(&mut game, &mut now);

        assert_eq!(game.status(), Status::Ended);
        assert_eq!(game.session().end_cause, Some(EndCause::SelfCollision));
    }

    #[test]
    fn speed_ramp_stops_at_ten() {
        let (mut game, mut now) = running(200, 8);

        for eaten in 1..=65u64 {
            let ahead = game.snake.head() + Direction::Right;
            game.food = Food::at(ahead);
            step(&mut game, &mut now);

            assert_eq!(game.score(), u32::try_from(eaten).unwrap());
            assert_eq!(game.loop_time_ms(), 70u64.saturating_sub(eaten).max(10));
        }
        assert_eq!(game.status(), Status::Running);
    }

    #[test]
    fn pause_cancels_the_frame_and_resume_reschedules() {
        let (mut game, mut now) = running(20, 20);
        step(&mut game, &mut now);

        game.handle(Command::TogglePause);
        assert_eq!(game.status(), Status::Paused);
        assert!(has_text(&game, "Game Paused"));
        assert!(!game.pump(now + STEP_MS));

        game.handle(Command::TogglePause);
        assert_eq!(game.status(), Status::Running);
        assert!(game.surface().texts().is_empty());
        step(&mut game, &mut now);
        assert_eq!(game.snake.head(), Cell::new(6, 1));
    }

    #[test]
    fn pause_from_idle_shows_overlay_and_resume_starts_play() {
        let mut game = game(20, 20);

        game.toggle_pause();
        assert_eq!(game.status(), Status::Paused);
        assert!(has_text(&game, "Game Paused"));
        assert_eq!(game.scheduler_mut().pending(), None);

        game.toggle_pause();
        assert_eq!(game.status(), Status::Running);
        assert!(!has_text(&game, "Game Paused"));
        assert!(game.scheduler_mut().pending().is_some());

        assert!(game.pump(STEP_MS));
        assert_eq!(game.snake.head(), Cell::new(5, 1));
    }

    #[test]
    fn pause_is_ignored_once_ended() {
        let (mut game, _) = running(20, 20);
        game.end_game();

        game.toggle_pause();

        assert_eq!(game.status(), Status::Ended);
        assert!(!has_text(&game, "Game Paused"));
        assert_eq!(game.scheduler_mut().pending(), None);
    }

    #[test]
    fn end_game_is_idempotent() {
        let (mut game, _) = running(20, 20);

        game.end_game();
        game.end_game();

        assert_eq!(game.status(), Status::Ended);
        let finals = game
            .surface()
            .texts()
            .iter()
            .filter(|run| run.text.starts_with("Final score"))
            .count();
        assert_eq!(finals, 1);
    }

    #[test]
    fn cancelled_frame_never_steps() {
        let (mut game, _) = running(20, 20);
        let cancelled = game.scheduler_mut().take_due().expect("frame scheduled");
        game.start();

        game.on_frame(cancelled, STEP_MS);

        assert_eq!(game.snake.head(), Cell::new(4, 1));
        assert!(game.scheduler_mut().pending().is_some());
    }

    #[test]
    fn restart_resets_the_session() {
        let (mut game, mut now) = running(20, 20);
        for _ in 0..7 {
            let ahead = game.snake.head() + Direction::Right;
            game.food = Food::at(ahead);
            step(&mut game, &mut now);
        }
        game.end_game();
        assert_eq!(game.score(), 7);

        game.handle(Command::Restart);

        assert_eq!(game.status(), Status::Running);
        assert_eq!(game.score(), 0);
        assert_eq!(game.loop_time_ms(), 70);
        assert_eq!(game.session().last_tick_ms, 0);
        assert_eq!(game.snake.len(), 4);
        assert_eq!(game.snake.head(), Cell::new(4, 1));
        assert_eq!(game.snake.pending_growth(), 0);
        assert!(!game.food.is_set());
        assert!(game.scheduler_mut().pending().is_some());
    }

    #[test]
    fn fullscreen_and_quit_are_handed_back() {
        let mut game = game(20, 20);

        assert_eq!(
            game.handle(Command::ToggleFullscreen),
            Some(Command::ToggleFullscreen)
        );
        assert_eq!(game.handle(Command::Quit), Some(Command::Quit));
        assert_eq!(game.handle(Command::Direction(Direction::Down)), None);
        assert_eq!(game.snake.direction(), Direction::Down);
    }

    #[test]
    fn no_room_for_food_ends_the_game() {
        let (mut game, mut now) = running(5, 5);
        game.snake = Snake::from_segments(
            vec![Cell::new(2, 2), Cell::new(1, 2), Cell::new(0, 2)],
            Direction::Up,
        );

        step(&mut game, &mut now);

        assert_eq!(game.status(), Status::Ended);
        assert_eq!(game.session().end_cause, Some(EndCause::NoRoomForFood));
    }

    #[test]
    fn scheduler_keeps_a_single_outstanding_frame() {
        let (mut game, _) = running(20, 20);
        let first = game.scheduler_mut().pending().expect("frame scheduled");

        game.start();

        let second = game.scheduler_mut().pending().expect("frame scheduled");
        assert_ne!(first, second);
        game.scheduler_mut().cancel(second);
        assert!(!game.pump(STEP_MS));
    }
}
