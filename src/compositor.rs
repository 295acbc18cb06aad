//! Final assembly of the rendered layers.
//!
//! The native composite is the single source of truth: the screen view is a
//! resized copy of it and export writes it out unchanged, so what is saved is
//! what is shown.

use std::path::Path;

use image::imageops::{overlay, resize, FilterType};
use image::{ImageFormat, RgbaImage};

use crate::error::MapError;
use crate::layer::Layer;
use crate::palette;

/// Which optional overlays are visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayState {
    pub show_labels: bool,
    pub show_name: bool,
}

impl DisplayState {
    pub fn toggle_labels(&mut self) {
        self.show_labels = !self.show_labels;
    }

    pub fn toggle_name(&mut self) {
        self.show_name = !self.show_name;
    }
}

/// Side length of the on-screen view in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    size: u32,
}

impl Viewport {
    pub fn new(size: u32) -> Self {
        Viewport { size: size.max(1) }
    }

    pub fn size(&self) -> u32 {
        self.size
    }
}

/// Every finished layer of a map. Landmarks and both borders already carry
/// their drop shadows.
#[derive(Debug, Clone, PartialEq)]
pub struct MapLayers {
    pub terrain: Layer,
    pub landmarks: Layer,
    pub border: Layer,
    pub named_border: Layer,
}

impl MapLayers {
    pub fn size(&self) -> u32 {
        self.terrain.size()
    }
}

/// The map at native resolution on a white background.
pub fn composite(layers: &MapLayers, display: DisplayState) -> RgbaImage {
    let size = layers.size();
    let mut out = RgbaImage::from_pixel(size, size, palette::PAPER);

    overlay(&mut out, layers.terrain.image(), 0, 0);
    if display.show_labels {
        overlay(&mut out, layers.landmarks.image(), 0, 0);
    }
    let border = if display.show_name { &layers.named_border } else { &layers.border };
    overlay(&mut out, border.image(), 0, 0);

    out
}

/// The native composite scaled to the viewport.
pub fn screen_composite(layers: &MapLayers, display: DisplayState, viewport: Viewport) -> RgbaImage {
    let native = composite(layers, display);
    if viewport.size() == native.width() {
        return native;
    }
    resize(&native, viewport.size(), viewport.size(), FilterType::Triangle)
}

/// Writes the native composite to `path` as PNG.
pub fn export(layers: &MapLayers, display: DisplayState, path: &Path) -> Result<(), MapError> {
    composite(layers, display).save_with_format(path, ImageFormat::Png)?;
    tracing::info!(path = %path.display(), "exported map");
    Ok(())
}
