// src/icon.rs
use crate::error::{RenderError, Result};
use crate::font::{BitmapFont, FontBackend};
use crate::utils::{blend_over, disc_mask};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, ImageEncoder, Rgba, RgbaImage};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

pub const BACKGROUND_COLOR: Rgba<u8> = Rgba([91, 33, 182, 255]);
pub const CIRCLE_COLOR: Rgba<u8> = Rgba([255, 255, 255, 230]);
pub const SAFE_ZONE_FRACTION: f64 = 0.8;
pub const DEFAULT_GLYPH: char = 'Д';

/// Largest accepted edge length. Peak use is the RGBA canvas plus a one-byte
/// coverage mask per pixel, 320 MiB at this size.
pub const MAX_SIZE: u32 = 8192;

/// Overdraw reaches this many pixels either side of the glyph position.
const BOLD_SPREAD: i32 = 2;

/// Everything needed to produce one icon file.
#[derive(Debug, Clone, PartialEq)]
pub struct IconSpec {
    pub size: u32,
    pub background_color: Rgba<u8>,
    pub safe_zone_fraction: f64,
    pub circle_color: Rgba<u8>,
    pub glyph: char,
    pub output_path: PathBuf,
}

impl IconSpec {
    pub fn new(size: u32, output_path: impl Into<PathBuf>) -> Self {
        IconSpec {
            size,
            background_color: BACKGROUND_COLOR,
            safe_zone_fraction: SAFE_ZONE_FRACTION,
            circle_color: CIRCLE_COLOR,
            glyph: DEFAULT_GLYPH,
            output_path: output_path.into(),
        }
    }

    pub fn with_glyph(mut self, glyph: char) -> Self {
        self.glyph = glyph;
        self
    }

    /// The glyph is drawn in the background's RGB at full opacity.
    pub fn glyph_color(&self) -> Rgba<u8> {
        let [r, g, b, _] = self.background_color.0;
        Rgba([r, g, b, 255])
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(RenderError::InvalidSpec("size must be positive".into()));
        }
        if self.size > MAX_SIZE {
            return Err(RenderError::InvalidSpec(format!(
                "size {} exceeds the {}px canvas limit",
                self.size, MAX_SIZE
            )));
        }
        let fraction = self.safe_zone_fraction;
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(RenderError::InvalidSpec(format!(
                "safe zone fraction {} is outside (0, 1]",
                fraction
            )));
        }
        Ok(())
    }

    pub fn layout(&self) -> IconLayout {
        IconLayout::new(self.size, self.safe_zone_fraction)
    }
}

/// Integer geometry derived from the edge length and safe-zone fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconLayout {
    pub size: u32,
    pub center: u32,
    pub safe_zone: u32,
    /// Inset of the safe zone from each edge. Informational only: the radius
    /// formula already keeps the disc inside the safe zone.
    pub margin: u32,
    pub circle_radius: u32,
    /// Nominal glyph size; advisory for fixed-size fonts.
    pub glyph_size: u32,
}

impl IconLayout {
    pub fn new(size: u32, safe_zone_fraction: f64) -> Self {
        let safe_zone = (size as f64 * safe_zone_fraction).floor() as u32;
        IconLayout {
            size,
            center: size / 2,
            safe_zone,
            margin: (size - safe_zone) / 2,
            circle_radius: safe_zone / 3,
            glyph_size: safe_zone / 4,
        }
    }
}

/// Rasterize `spec` onto a fresh canvas using `font` for the glyph.
pub fn render_image<F: FontBackend>(spec: &IconSpec, font: &F) -> Result<RgbaImage> {
    spec.validate()?;
    let layout = spec.layout();
    debug!(
        "{}px layout: safe zone {}, margin {}, radius {}, glyph size {}",
        layout.size, layout.safe_zone, layout.margin, layout.circle_radius, layout.glyph_size
    );

    let mut img = RgbaImage::from_pixel(spec.size, spec.size, spec.background_color);

    // Safe-zone disc, alpha blended over the background
    let mask = disc_mask(layout.size, layout.center, layout.circle_radius);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        if mask[[y as usize, x as usize]] {
            *pixel = blend_over(*pixel, spec.circle_color);
        }
    }

    // Centre the glyph's ink, not its cell
    let text = spec.glyph.to_string();
    let bbox = font.measure_text(&text, layout.glyph_size);
    let size = layout.size as i32;
    let text_x = (size - bbox.width()).div_euclid(2) - bbox.left;
    let text_y = (size - bbox.height()).div_euclid(2) - bbox.top;

    // Poor man's bold: overdraw on a 5x5 grid of offsets
    let color = spec.glyph_color();
    for dx in -BOLD_SPREAD..=BOLD_SPREAD {
        for dy in -BOLD_SPREAD..=BOLD_SPREAD {
            font.draw_text(
                &mut img,
                (text_x + dx, text_y + dy),
                &text,
                color,
                layout.glyph_size,
            );
        }
    }

    Ok(img)
}

/// Encode as an RGBA PNG with maximum compression.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new_with_quality(&mut bytes, CompressionType::Best, FilterType::Adaptive)
        .write_image(img.as_raw(), img.width(), img.height(), ColorType::Rgba8)?;
    Ok(bytes)
}

/// Encode fully in memory, then create or truncate `path`.
pub fn write_png(img: &RgbaImage, path: &Path) -> Result<()> {
    let bytes = encode_png(img)?;
    fs::write(path, &bytes).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

pub fn render_with<F: FontBackend>(spec: &IconSpec, font: &F) -> Result<()> {
    let img = render_image(spec, font)?;
    write_png(&img, &spec.output_path)
}

pub fn render(spec: &IconSpec) -> Result<()> {
    render_with(spec, &BitmapFont::fallback())
}
