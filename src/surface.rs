use crate::config::{
    CANVAS_BACKGROUND, MIN_STROKED_TILE_PX, OVERLAY_BACKDROP, OVERLAY_FONT_UNITS,
    OVERLAY_LINE_UNITS,
};
use crate::grid::Cell;

/// Straight-alpha color used on the drawing surface.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, u8::MAX)
    }

    /// Composites `self` over `below`, returning an opaque color.
    #[must_use]
    pub fn over(self, below: Rgba) -> Rgba {
        let alpha = u16::from(self.a);
        let mix = |top: u8, bottom: u8| {
            let value = (u16::from(top) * alpha + u16::from(bottom) * (255 - alpha) + 127) / 255;
            u8::try_from(value).unwrap_or(u8::MAX)
        };

        Rgba::opaque(
            mix(self.r, below.r),
            mix(self.g, below.g),
            mix(self.b, below.b),
        )
    }
}

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Font request for text drawn on the surface.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Font {
    pub size_px: u32,
    pub bold: bool,
}

/// Raster drawing surface the game paints on.
///
/// Text is anchored on its centre point.
pub trait Surface {
    /// Canvas width and height in pixels.
    fn size(&self) -> (u32, u32);

    /// Erases everything drawn so far.
    fn clear(&mut self);

    fn fill_rect(&mut self, rect: PixelRect, color: Rgba);

    /// Outlines `rect` with a one-pixel border.
    fn stroke_rect(&mut self, rect: PixelRect, color: Rgba);

    fn fill_text(&mut self, text: &str, x: u32, y: u32, color: Rgba, font: Font);
}

/// Draws tiles and message overlays in grid terms on a [`Surface`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presenter {
    tile_size: u32,
    pixel_density: f32,
}

impl Presenter {
    #[must_use]
    pub fn new(tile_size: u32, pixel_density: f32) -> Self {
        Self {
            tile_size: tile_size.max(1),
            pixel_density,
        }
    }

    #[must_use]
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Paints the whole canvas with the background color.
    pub fn clear<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.clear();
        let (width, height) = surface.size();
        surface.fill_rect(
            PixelRect {
                x: 0,
                y: 0,
                width,
                height,
            },
            CANVAS_BACKGROUND,
        );
    }

    /// Draws one grid cell as a filled tile with an optional border.
    ///
    /// Cells left of or above the canvas have no pixel position and are skipped.
    pub fn draw_tile<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        cell: Cell,
        fill: Rgba,
        stroke: Option<Rgba>,
    ) {
        let (Ok(column), Ok(row)) = (u32::try_from(cell.x), u32::try_from(cell.y)) else {
            return;
        };

        let rect = PixelRect {
            x: column * self.tile_size,
            y: row * self.tile_size,
            width: self.tile_size,
            height: self.tile_size,
        };
        surface.fill_rect(rect, fill);

        if self.tile_size < MIN_STROKED_TILE_PX {
            return;
        }
        if let Some(stroke) = stroke {
            surface.stroke_rect(rect, stroke);
        }
    }

    /// Dims the canvas and prints `lines` centred on it, one below the other.
    pub fn overlay_message<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        lines: &[&str],
        color: Rgba,
    ) {
        let (width, height) = surface.size();
        surface.fill_rect(
            PixelRect {
                x: 0,
                y: 0,
                width,
                height,
            },
            OVERLAY_BACKDROP,
        );

        let font = Font {
            size_px: self.scaled(OVERLAY_FONT_UNITS),
            bold: true,
        };
        let line_spacing = self.scaled(OVERLAY_LINE_UNITS);

        let mut y = height / 2;
        for line in lines {
            surface.fill_text(line, width / 2, y, color, font);
            y = y.saturating_add(line_spacing);
        }
    }

    fn scaled(&self, units: f32) -> u32 {
        let value = (units * self.pixel_density).round();
        if value.is_finite() && value >= 1.0 {
            value as u32
        } else {
            1
        }
    }
}
