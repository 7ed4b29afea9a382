// src/font.rs
//! Text rendering for the icon glyph.
//!
//! The renderer only needs two things from a font: the ink bounds of a string
//! and a way to stamp it onto a canvas. [`FontBackend`] captures that, and
//! [`BitmapFont`] is the built-in fixed-size fallback used when no scalable
//! font is available.

use crate::utils::blend_over;
use image::{Rgba, RgbaImage};

/// Ink bounds relative to the draw origin. `right` and `bottom` are exclusive.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl BoundingBox {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    fn include(self, x: i32, y: i32) -> Self {
        BoundingBox {
            left: self.left.min(x),
            top: self.top.min(y),
            right: self.right.max(x + 1),
            bottom: self.bottom.max(y + 1),
        }
    }
}

pub trait FontBackend {
    /// Bounding box of `text` as it would be drawn at origin `(0, 0)`.
    fn measure_text(&self, text: &str, font_size: u32) -> BoundingBox;

    /// Draw `text` with its cell origin at `origin`, clipped to the canvas.
    fn draw_text(
        &self,
        canvas: &mut RgbaImage,
        origin: (i32, i32),
        text: &str,
        color: Rgba<u8>,
        font_size: u32,
    );
}

const CELL_WIDTH: i32 = 17;
const CELL_HEIGHT: usize = 16;

type Bitmap = [&'static str; CELL_HEIGHT];

// The counter keeps the ink at least four pixels from the glyph centre, so
// the renderer's overdraw never closes it.
const DE: Bitmap = [
    ".................",
    "....###########..",
    "....##.......##..",
    "....##.......##..",
    "....##.......##..",
    "....##.......##..",
    "....##.......##..",
    "....##.......##..",
    "...##........##..",
    "...##........##..",
    "...##........##..",
    "...##........##..",
    ".###############.",
    ".##...........##.",
    ".#.............#.",
    ".................",
];

const REPLACEMENT: Bitmap = [
    ".................",
    ".###############.",
    ".#.............#.",
    ".#.............#.",
    ".#.............#.",
    ".#.............#.",
    ".#.............#.",
    ".#.............#.",
    ".#.............#.",
    ".#.............#.",
    ".#.............#.",
    ".#.............#.",
    ".#.............#.",
    ".#.............#.",
    ".###############.",
    ".................",
];

/// Fixed-size bitmap font. `font_size` is accepted for interface parity but
/// the cell never scales; visual weight comes from overdraw in the renderer.
pub struct BitmapFont {
    glyphs: &'static [(char, Bitmap)],
    replacement: Bitmap,
}

impl BitmapFont {
    pub fn fallback() -> Self {
        BitmapFont {
            glyphs: &[('Д', DE)],
            replacement: REPLACEMENT,
        }
    }

    fn bitmap(&self, ch: char) -> &Bitmap {
        self.glyphs
            .iter()
            .find(|(c, _)| *c == ch)
            .map(|(_, bitmap)| bitmap)
            .unwrap_or(&self.replacement)
    }

    /// Ink pixels of `text` laid out from origin `(0, 0)`.
    fn ink<'a>(&'a self, text: &'a str) -> impl Iterator<Item = (i32, i32)> + 'a {
        text.chars().enumerate().flat_map(move |(i, ch)| {
            let pen_x = i as i32 * CELL_WIDTH;
            self.bitmap(ch).iter().enumerate().flat_map(move |(y, row)| {
                row.bytes()
                    .enumerate()
                    .filter(|&(_, b)| b == b'#')
                    .map(move |(x, _)| (pen_x + x as i32, y as i32))
            })
        })
    }
}

impl FontBackend for BitmapFont {
    fn measure_text(&self, text: &str, _font_size: u32) -> BoundingBox {
        let mut ink = self.ink(text);
        let Some((x, y)) = ink.next() else {
            return BoundingBox::default();
        };
        let first = BoundingBox {
            left: x,
            top: y,
            right: x + 1,
            bottom: y + 1,
        };
        ink.fold(first, |bbox, (x, y)| bbox.include(x, y))
    }

    fn draw_text(
        &self,
        canvas: &mut RgbaImage,
        origin: (i32, i32),
        text: &str,
        color: Rgba<u8>,
        _font_size: u32,
    ) {
        let (width, height) = (canvas.width() as i32, canvas.height() as i32);
        for (x, y) in self.ink(text) {
            let px = origin.0 + x;
            let py = origin.1 + y;
            if px < 0 || py < 0 || px >= width || py >= height {
                continue;
            }
            let pixel = canvas.get_pixel_mut(px as u32, py as u32);
            *pixel = blend_over(*pixel, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INK: Rgba<u8> = Rgba([91, 33, 182, 255]);
    const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);

    #[test]
    fn test_bitmaps_are_well_formed() {
        for bitmap in [&DE, &REPLACEMENT] {
            assert!(bitmap.iter().all(|row| row.len() == CELL_WIDTH as usize));
            assert!(bitmap.iter().all(|row| row.bytes().all(|b| b == b'#' || b == b'.')));
        }
    }

    #[test]
    fn test_measure_de_has_bearing() {
        let font = BitmapFont::fallback();
        let bbox = font.measure_text("Д", 40);

        assert_eq!(
            bbox,
            BoundingBox {
                left: 1,
                top: 1,
                right: 16,
                bottom: 15
            }
        );
        assert_eq!(bbox.width(), 15);
        assert_eq!(bbox.height(), 14);
    }

    #[test]
    fn test_de_counter_survives_overdraw() {
        let font = BitmapFont::fallback();
        let bbox = font.measure_text("Д", 40);

        for size in [192, 512] {
            // cell pixel that lands on the icon centre once the ink is centred
            let cx = size / 2 - ((size - bbox.width()).div_euclid(2) - bbox.left);
            let cy = size / 2 - ((size - bbox.height()).div_euclid(2) - bbox.top);

            for (x, y) in font.ink("Д") {
                let distance = (x - cx).abs().max((y - cy).abs());
                assert!(
                    distance >= 4,
                    "{}px: ink at ({}, {}) is {} from centre ({}, {})",
                    size,
                    x,
                    y,
                    distance,
                    cx,
                    cy
                );
            }
        }
    }

    #[test]
    fn test_font_size_is_advisory() {
        let font = BitmapFont::fallback();

        assert_eq!(font.measure_text("Д", 10), font.measure_text("Д", 102));
    }

    #[test]
    fn test_measure_empty_and_unknown() {
        let font = BitmapFont::fallback();

        assert_eq!(font.measure_text("", 12), BoundingBox::default());
        assert_eq!(
            font.measure_text("?", 12),
            BoundingBox {
                left: 1,
                top: 1,
                right: 16,
                bottom: 15
            }
        );
    }

    #[test]
    fn test_measure_advances_per_char() {
        let font = BitmapFont::fallback();
        let bbox = font.measure_text("ДД", 12);

        assert_eq!(bbox.left, 1);
        assert_eq!(bbox.right, CELL_WIDTH + 16);
    }

    #[test]
    fn test_draw_text_places_ink() {
        let font = BitmapFont::fallback();
        let mut canvas = RgbaImage::from_pixel(17, 16, PAPER);

        font.draw_text(&mut canvas, (0, 0), "Д", INK, 12);

        // top bar
        for x in 4..15 {
            assert_eq!(*canvas.get_pixel(x, 1), INK);
        }
        // inside the counter and outside the ink
        assert_eq!(*canvas.get_pixel(9, 8), PAPER);
        assert_eq!(*canvas.get_pixel(0, 0), PAPER);

        let painted = canvas.pixels().filter(|&&p| p == INK).count();
        assert_eq!(painted, font.ink("Д").count());
    }

    #[test]
    fn test_draw_text_clips_to_canvas() {
        let font = BitmapFont::fallback();
        let mut canvas = RgbaImage::from_pixel(4, 4, PAPER);

        font.draw_text(&mut canvas, (-5, -5), "Д", INK, 12);
        // cell (5, 5) is on the left leg, cell (8, 8) is in the counter
        assert_eq!(*canvas.get_pixel(0, 0), INK);
        assert_eq!(*canvas.get_pixel(3, 3), PAPER);

        font.draw_text(&mut canvas, (100, 100), "Д", INK, 12);
    }
}
