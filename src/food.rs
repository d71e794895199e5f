use rand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::config::{FOOD_BUFFER, FOOD_FILL, FOOD_PLACEMENT_ATTEMPTS, FOOD_STROKE};
use crate::grid::{Cell, GridSize};
use crate::snake::Snake;
use crate::surface::{Presenter, Surface};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum PlacementError {
    #[error("no free cell left in the food region of a {width}x{height} grid")]
    NoFreeCell { width: u16, height: u16 },
}

/// The single piece of food on the board, or none while it is unset.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Food {
    cell: Option<Cell>,
}

impl Food {
    /// Creates food already sitting at `cell`.
    #[must_use]
    pub fn at(cell: Cell) -> Self {
        Self { cell: Some(cell) }
    }

    #[must_use]
    pub fn cell(&self) -> Option<Cell> {
        self.cell
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.cell.is_some()
    }

    /// Makes sure the food sits on a cell the snake does not cover.
    ///
    /// A set cell that is clear of the snake is kept. Otherwise a cell is
    /// drawn at random from the region two cells in from every wall; after
    /// [`FOOD_PLACEMENT_ATTEMPTS`] misses the region is scanned row by row
    /// and the first free cell wins.
    pub fn place<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        bounds: GridSize,
        snake: &Snake,
    ) -> Result<Cell, PlacementError> {
        if let Some(cell) = self.cell.filter(|cell| !snake.occupies(*cell)) {
            return Ok(cell);
        }
        self.cell = None;

        let cell = random_free_cell(rng, bounds, snake)
            .or_else(|| {
                debug!(
                    attempts = FOOD_PLACEMENT_ATTEMPTS,
                    "random food placement missed, scanning for a free cell"
                );
                first_free_cell(bounds, snake)
            })
            .ok_or(PlacementError::NoFreeCell {
                width: bounds.width,
                height: bounds.height,
            })?;

        self.cell = Some(cell);
        Ok(cell)
    }

    pub fn draw<S: Surface + ?Sized>(&self, presenter: &Presenter, surface: &mut S) {
        if let Some(cell) = self.cell {
            presenter.draw_tile(surface, cell, FOOD_FILL, Some(FOOD_STROKE));
        }
    }
}

/// Half-open `(x_range, y_range)` food may be placed in.
fn food_region(bounds: GridSize) -> (std::ops::Range<i32>, std::ops::Range<i32>) {
    (
        FOOD_BUFFER..i32::from(bounds.width) - FOOD_BUFFER,
        FOOD_BUFFER..i32::from(bounds.height) - FOOD_BUFFER,
    )
}

fn random_free_cell<R: Rng + ?Sized>(rng: &mut R, bounds: GridSize, snake: &Snake) -> Option<Cell> {
    let (columns, rows) = food_region(bounds);
    if columns.is_empty() || rows.is_empty() {
        return None;
    }

    (0..FOOD_PLACEMENT_ATTEMPTS)
        .map(|_| Cell::new(rng.gen_range(columns.clone()), rng.gen_range(rows.clone())))
        .find(|cell| !snake.occupies(*cell))
}

fn first_free_cell(bounds: GridSize, snake: &Snake) -> Option<Cell> {
    let (columns, rows) = food_region(bounds);
    rows.flat_map(|y| columns.clone().map(move |x| Cell::new(x, y)))
        .find(|cell| !snake.occupies(*cell))
}
