use std::path::Path;

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use rusttype::{point, Font, Scale};

use crate::error::MapError;
use crate::layer::{Layer, Rotation};

/// A halo drawn around glyphs so text reads on any background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub color: Rgba<u8>,
    pub width: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Text height in pixels
    pub size: f32,
    pub fill: Rgba<u8>,
    pub outline: Option<Outline>,
}

/// Horizontal placement of a text box relative to its anchor point. The
/// anchor is always the vertical middle of the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// Renders strings into transparent sprites.
pub trait Lettering {
    fn render(&self, text: &str, style: &TextStyle) -> RgbaImage;
}

/// Lettering backed by a TrueType/OpenType font.
pub struct FontLettering {
    font: Font<'static>,
}

impl FontLettering {
    pub fn load(path: &Path) -> Result<Self, MapError> {
        let data = std::fs::read(path).map_err(|source| MapError::FontLoad {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(data, path)
    }

    /// `origin` is only used for error reporting
    pub fn from_bytes(data: Vec<u8>, origin: &Path) -> Result<Self, MapError> {
        let font = Font::try_from_vec(data).ok_or_else(|| MapError::FontParse {
            path: origin.to_path_buf(),
        })?;
        Ok(FontLettering { font })
    }

    fn text_width(&self, text: &str, scale: Scale) -> f32 {
        self.font
            .layout(text, scale, point(0.0, 0.0))
            .map(|glyph| glyph.position().x + glyph.unpositioned().h_metrics().advance_width)
            .fold(0.0, f32::max)
    }
}

impl Lettering for FontLettering {
    fn render(&self, text: &str, style: &TextStyle) -> RgbaImage {
        let scale = Scale::uniform(style.size);
        let metrics = self.font.v_metrics(scale);
        let pad = style.outline.map(|o| o.width.max(0)).unwrap_or(0);

        let width = self.text_width(text, scale).ceil() as u32 + 2 * pad as u32 + 1;
        let height = (metrics.ascent - metrics.descent).ceil() as u32 + 2 * pad as u32 + 1;
        let mut sprite = RgbaImage::new(width, height);

        if let Some(outline) = style.outline {
            // Stamp the text around itself to build the halo
            for dy in -outline.width..=outline.width {
                for dx in -outline.width..=outline.width {
                    if dx != 0 || dy != 0 {
                        draw_text_mut(&mut sprite, outline.color, pad + dx, pad + dy, scale, &self.font, text);
                    }
                }
            }
        }
        draw_text_mut(&mut sprite, style.fill, pad, pad, scale, &self.font, text);
        sprite
    }
}

/// Draws every character as a solid block. Needs no font file, so it stands
/// in for real lettering in tests and benchmarks.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockLettering;

impl Lettering for BlockLettering {
    fn render(&self, text: &str, style: &TextStyle) -> RgbaImage {
        let pad = style.outline.map(|o| o.width.max(0) as u32).unwrap_or(0);
        let char_width = (style.size * 0.5).max(1.0) as u32;
        let width = text.chars().count() as u32 * char_width + 2 * pad;
        let height = style.size.max(1.0) as u32 + 2 * pad;

        let mut sprite = RgbaImage::new(width.max(1), height);
        for (x, y, pixel) in sprite.enumerate_pixels_mut() {
            let inside = x >= pad && x < width - pad && y >= pad && y < height - pad;
            *pixel = match (inside, style.outline) {
                (true, _) => style.fill,
                (false, Some(outline)) => outline.color,
                (false, None) => Rgba([0, 0, 0, 0]),
            };
        }
        sprite
    }
}

/// Renders `text` and blends it onto `layer`. `at` is given in the unrotated
/// frame; the whole box is then turned by `rotation`.
pub fn stamp_text(
    layer: &mut Layer,
    lettering: &dyn Lettering,
    text: &str,
    style: &TextStyle,
    at: (f64, f64),
    align: Align,
    rotation: &Rotation,
) {
    if text.is_empty() {
        return;
    }
    let sprite = lettering.render(text, style);
    let local_center = match align {
        Align::Left => (at.0 + sprite.width() as f64 / 2.0, at.1),
        Align::Center => at,
    };
    layer.stamp(&sprite, rotation.apply(local_center), rotation.angle);
}
