use std::time::Duration;

use crate::surface::Rgba;

/// Tile edge length in canvas units before pixel-density scaling.
pub const TILE_UNITS: f32 = 10.0;

/// Pixel density used when none is given on the command line.
///
/// One terminal half-block is one canvas pixel, so `0.1` maps every grid
/// cell onto exactly one half-block.
pub const DEFAULT_PIXEL_DENSITY: f32 = 0.1;

/// Segment count of a freshly constructed snake.
pub const INITIAL_SNAKE_LENGTH: i32 = 4;

/// Row the starting snake is laid out on.
pub const INITIAL_SNAKE_ROW: i32 = 1;

/// Step interval at the start of every game, in milliseconds.
pub const INITIAL_LOOP_TIME_MS: u64 = 70;

/// Fastest step interval the speed ramp may reach, in milliseconds.
pub const MIN_LOOP_TIME_MS: u64 = 10;

/// Distance kept between freshly placed food and the walls.
pub const FOOD_BUFFER: i32 = 2;

/// Random draws attempted before food placement falls back to a scan.
pub const FOOD_PLACEMENT_ATTEMPTS: usize = 64;

/// Smallest playable grid edge: room for the starting snake and a
/// non-empty food region inside the buffer.
pub const MIN_GRID_EDGE: u16 = 5;

/// Display refresh cadence that drives scheduled frames.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Overlay font size in canvas units before density scaling.
pub const OVERLAY_FONT_UNITS: f32 = 18.0;

/// Distance between overlay lines in canvas units before density scaling.
pub const OVERLAY_LINE_UNITS: f32 = 25.0;

/// Tiles smaller than this are drawn without a border.
pub const MIN_STROKED_TILE_PX: u32 = 3;

pub const CANVAS_BACKGROUND: Rgba = Rgba::opaque(255, 255, 255);
pub const OVERLAY_BACKDROP: Rgba = Rgba::new(255, 255, 255, 178);
pub const SNAKE_FILL: Rgba = Rgba::opaque(0, 128, 0);
pub const SNAKE_STROKE: Rgba = Rgba::opaque(255, 255, 255);
pub const FOOD_FILL: Rgba = Rgba::opaque(0, 0, 255);
pub const FOOD_STROKE: Rgba = Rgba::opaque(255, 255, 255);
pub const MESSAGE_COLOR: Rgba = Rgba::opaque(0, 0, 0);
pub const WELCOME_COLOR: Rgba = Rgba::opaque(0, 128, 0);

pub const WELCOME_MESSAGE: [&str; 3] = [
    "Snake Game: Click to Play!",
    "arrows change direction",
    "p/space: pause, f: fullscreen",
];

pub const PAUSED_MESSAGE: &str = "Game Paused";
