use std::ops::Add;

use thiserror::Error;

use crate::config::{MIN_GRID_EDGE, TILE_UNITS};

/// Grid position in logical cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add<Direction> for Cell {
    type Output = Cell;

    fn add(self, direction: Direction) -> Cell {
        let (dx, dy) = direction.unit_vector();
        Cell {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Canonical movement directions.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the one-cell step for this direction. `y` grows downwards.
    #[must_use]
    pub fn unit_vector(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Returns true when the two unit vectors cancel out.
    #[must_use]
    pub fn is_reversal_of(self, other: Self) -> bool {
        let (ax, ay) = self.unit_vector();
        let (bx, by) = other.unit_vector();
        ax + bx == 0 && ay + by == 0
    }
}

/// Reasons a canvas cannot host a playable grid.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum GridError {
    #[error("tile size must be at least one pixel")]
    ZeroTileSize,
    #[error("grid of {width}x{height} cells is smaller than the {min}x{min} minimum")]
    TooSmall { width: u32, height: u32, min: u16 },
}

/// Logical grid dimensions in cells.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Derives the grid from canvas pixel dimensions and the tile edge length.
    pub fn from_surface(
        pixel_width: u32,
        pixel_height: u32,
        tile_size: u32,
    ) -> Result<Self, GridError> {
        if tile_size == 0 {
            return Err(GridError::ZeroTileSize);
        }

        let width = pixel_width / tile_size;
        let height = pixel_height / tile_size;
        let min = u32::from(MIN_GRID_EDGE);
        if width < min || height < min {
            return Err(GridError::TooSmall {
                width,
                height,
                min: MIN_GRID_EDGE,
            });
        }

        Ok(Self {
            width: u16::try_from(width).unwrap_or(u16::MAX),
            height: u16::try_from(height).unwrap_or(u16::MAX),
        })
    }

    /// Returns true when `cell` lies inside `[0, width) x [0, height)`.
    #[must_use]
    pub fn contains(self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && cell.x < i32::from(self.width)
            && cell.y < i32::from(self.height)
    }

    /// Returns the total number of cells in the grid.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// Tile edge length in pixels for a display pixel density.
#[must_use]
pub fn tile_size(pixel_density: f32) -> u32 {
    let scaled = (TILE_UNITS * pixel_density).round();
    if scaled.is_finite() && scaled >= 1.0 {
        scaled as u32
    } else {
        1
    }
}
