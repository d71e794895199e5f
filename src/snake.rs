use std::collections::VecDeque;

use crate::config::{INITIAL_SNAKE_LENGTH, INITIAL_SNAKE_ROW, SNAKE_FILL, SNAKE_STROKE};
use crate::food::Food;
use crate::grid::{Cell, Direction, GridSize};
use crate::surface::{Presenter, Surface};

/// Snake body, heading and the food still travelling through it.
///
/// Eaten food does not lengthen the snake straight away. Each eaten cell
/// waits in `eaten` until the tail reaches it, and only then becomes a new
/// segment.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Cell>,
    direction: Direction,
    eaten: VecDeque<Cell>,
}

impl Default for Snake {
    fn default() -> Self {
        Self::new()
    }
}

impl Snake {
    /// Creates the starting snake: four segments on row 1, head at x = 4,
    /// heading right.
    #[must_use]
    pub fn new() -> Self {
        let body = (1..=INITIAL_SNAKE_LENGTH)
            .rev()
            .map(|x| Cell::new(x, INITIAL_SNAKE_ROW))
            .collect();

        Self {
            body,
            direction: Direction::Right,
            eaten: VecDeque::new(),
        }
    }

    /// Creates a snake from explicit body segments (front is head).
    #[must_use]
    pub fn from_segments(segments: Vec<Cell>, direction: Direction) -> Self {
        Self {
            body: VecDeque::from(segments),
            direction,
            eaten: VecDeque::new(),
        }
    }

    /// Moves one cell: the tail slot is rotated to the front and overwritten
    /// with the next head, so the length never changes here.
    pub fn move_forward(&mut self) {
        let next_head = self.head() + self.direction;
        self.body.rotate_right(1);
        self.body[0] = next_head;
    }

    /// Turns the snake unless `direction` would reverse it onto itself.
    pub fn set_direction(&mut self, direction: Direction) {
        if direction.is_reversal_of(self.direction) {
            return;
        }
        self.direction = direction;
    }

    /// Turns the oldest digested food into a new tail segment.
    pub fn grow(&mut self) {
        debug_assert!(!self.eaten.is_empty(), "grow called with nothing eaten");
        if let Some(cell) = self.eaten.pop_back() {
            self.body.push_back(cell);
        }
    }

    /// Starts digesting the food the head has reached.
    pub fn feed(&mut self, food: &Food) {
        if let Some(cell) = food.cell() {
            self.eaten.push_front(cell);
        }
    }

    /// Returns true when the head has left the grid.
    #[must_use]
    pub fn has_hit_wall(&self, bounds: GridSize) -> bool {
        !bounds.contains(self.head())
    }

    #[must_use]
    pub fn has_hit_food(&self, food: &Food) -> bool {
        food.cell() == Some(self.head())
    }

    /// Returns true when the oldest eaten food has reached the tail.
    #[must_use]
    pub fn is_food_swallowed(&self) -> bool {
        match (self.eaten.back(), self.body.back()) {
            (Some(oldest), Some(tail)) => oldest == tail,
            _ => false,
        }
    }

    /// Returns true if the head overlaps any non-head segment.
    #[must_use]
    pub fn has_hit_self(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|segment| *segment == head)
    }

    pub fn draw<S: Surface + ?Sized>(&self, presenter: &Presenter, surface: &mut S) {
        for segment in &self.body {
            presenter.draw_tile(surface, *segment, SNAKE_FILL, Some(SNAKE_STROKE));
        }
    }

    /// Returns the current head position.
    #[must_use]
    pub fn head(&self) -> Cell {
        *self
            .body
            .front()
            .expect("snake body must always contain at least one segment")
    }

    #[must_use]
    pub fn tail(&self) -> Cell {
        *self
            .body
            .back()
            .expect("snake body must always contain at least one segment")
    }

    /// Returns true if any segment occupies `cell`.
    #[must_use]
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Number of eaten cells that have not become segments yet.
    #[must_use]
    pub fn pending_growth(&self) -> usize {
        self.eaten.len()
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }
}
