use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use crate::surface::{Font, PixelRect, Rgba, Surface};

/// Upper half-block glyph: fg paints the upper pixel, bg the lower one.
pub const GLYPH_HALF_UPPER: &str = "▀";

const BLANK: Rgba = Rgba::opaque(0, 0, 0);

/// Text placed on the canvas, centred on `(x, y)`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: u32,
    pub y: u32,
    pub color: Rgba,
    pub bold: bool,
}

/// Pixel raster shown in the terminal two pixels per cell.
///
/// Every terminal cell renders one column and two rows of pixels with
/// [`GLYPH_HALF_UPPER`], which keeps pixels square on common fonts. Text is
/// kept apart from the raster and printed over it when rendered.
#[derive(Debug, Clone)]
pub struct TerminalCanvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
    texts: Vec<TextRun>,
}

impl TerminalCanvas {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let len = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);
        Self {
            width,
            height,
            pixels: vec![BLANK; len],
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.index(x, y).map(|index| self.pixels[index])
    }

    #[must_use]
    pub fn texts(&self) -> &[TextRun] {
        &self.texts
    }

    /// Terminal columns and rows needed to show the whole canvas.
    #[must_use]
    pub fn cell_size(&self) -> (u16, u16) {
        let columns = u16::try_from(self.width).unwrap_or(u16::MAX);
        let rows = u16::try_from(self.height.div_ceil(2)).unwrap_or(u16::MAX);
        (columns, rows)
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        usize::try_from(u64::from(y) * u64::from(self.width) + u64::from(x)).ok()
    }

    fn paint(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(index) = self.index(x, y) {
            let below = self.pixels[index];
            self.pixels[index] = color.over(below);
        }
    }

    /// Clips `rect` to the canvas, returning its exclusive right and bottom edges.
    fn clip(&self, rect: PixelRect) -> Option<(u32, u32)> {
        let right = rect.x.saturating_add(rect.width).min(self.width);
        let bottom = rect.y.saturating_add(rect.height).min(self.height);
        (rect.x < right && rect.y < bottom).then_some((right, bottom))
    }
}

impl Surface for TerminalCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.pixels.fill(BLANK);
        self.texts.clear();
    }

    fn fill_rect(&mut self, rect: PixelRect, color: Rgba) {
        let Some((right, bottom)) = self.clip(rect) else {
            return;
        };

        for y in rect.y..bottom {
            for x in rect.x..right {
                self.paint(x, y, color);
            }
        }

        if color.a == u8::MAX {
            self.texts.retain(|run| {
                !(rect.x..right).contains(&run.x) || !(rect.y..bottom).contains(&run.y)
            });
        }
    }

    fn stroke_rect(&mut self, rect: PixelRect, color: Rgba) {
        let Some((right, bottom)) = self.clip(rect) else {
            return;
        };
        let last_x = rect.x + rect.width - 1;
        let last_y = rect.y + rect.height - 1;

        for y in rect.y..bottom {
            for x in rect.x..right {
                if x == rect.x || y == rect.y || x == last_x || y == last_y {
                    self.paint(x, y, color);
                }
            }
        }
    }

    fn fill_text(&mut self, text: &str, x: u32, y: u32, color: Rgba, font: Font) {
        self.texts.push(TextRun {
            text: text.to_owned(),
            x,
            y,
            color,
            bold: font.bold,
        });
    }
}

impl Widget for &TerminalCanvas {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for column in 0..area.width {
                let px = u32::from(column);
                let py = u32::from(row) * 2;
                let Some(upper) = self.pixel(px, py) else {
                    continue;
                };

                let lower = self.pixel(px, py + 1).map_or(Color::Reset, to_color);
                if let Some(cell) = buf.cell_mut((area.x + column, area.y + row)) {
                    cell.set_symbol(GLYPH_HALF_UPPER)
                        .set_fg(to_color(upper))
                        .set_bg(lower);
                }
            }
        }

        for run in &self.texts {
            render_text(run, self, area, buf);
        }
    }
}

fn render_text(run: &TextRun, canvas: &TerminalCanvas, area: Rect, buf: &mut Buffer) {
    let Ok(row) = u16::try_from(run.y / 2) else {
        return;
    };
    if row >= area.height {
        return;
    }

    let half_width = u32::try_from(run.text.width() / 2).unwrap_or(u32::MAX);
    let Ok(column) = u16::try_from(run.x.saturating_sub(half_width)) else {
        return;
    };
    if column >= area.width {
        return;
    }

    let mut style = Style::new().fg(to_color(run.color));
    if let Some(behind) = canvas.pixel(run.x, run.y) {
        style = style.bg(to_color(behind));
    }
    if run.bold {
        style = style.add_modifier(Modifier::BOLD);
    }

    buf.set_stringn(
        area.x + column,
        area.y + row,
        &run.text,
        usize::from(area.width - column),
        style,
    );
}

fn to_color(rgba: Rgba) -> Color {
    Color::Rgb(rgba.r, rgba.g, rgba.b)
}
