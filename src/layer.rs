//! Drawing surfaces.
//!
//! A [`Layer`] is a square RGBA raster that blends every primitive onto
//! itself with source-over alpha. Filled shapes touch each pixel at most once
//! (pixel centres, half-open edges) so translucent fills stay uniform where
//! shapes share an edge.

use image::imageops::overlay;
use image::{GrayImage, Luma, Pixel, Rgba, RgbaImage};
use imageproc::drawing::BresenhamLineIter;
use imageproc::filter::gaussian_blur_f32;
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// A blurred, offset copy of a layer's coverage drawn beneath it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub offset: (i64, i64),
    /// Blur radius in pixels (gaussian sigma is half of this)
    pub blur: f32,
    pub color: Rgba<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub pivot: (f64, f64),
    pub angle: f64,
}

impl Rotation {
    pub fn none() -> Self {
        Rotation { pivot: (0.0, 0.0), angle: 0.0 }
    }

    pub fn about(pivot: (f64, f64), angle: f64) -> Self {
        Rotation { pivot, angle }
    }

    pub fn apply(&self, point: (f64, f64)) -> (f64, f64) {
        let (sin, cos) = self.angle.sin_cos();
        let dx = point.0 - self.pivot.0;
        let dy = point.1 - self.pivot.1;
        (
            self.pivot.0 + dx * cos - dy * sin,
            self.pivot.1 + dx * sin + dy * cos,
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    image: RgbaImage,
}

impl Layer {
    pub fn new(size: u32) -> Self {
        Layer { image: RgbaImage::from_pixel(size, size, TRANSPARENT) }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Layer { image }
    }

    pub fn size(&self) -> u32 {
        self.image.width()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|p| p[3] == 0)
    }

    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = TRANSPARENT;
        }
    }

    /// Blends `color` over the pixel at `(x, y)`; out-of-range is ignored.
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }
        self.image.get_pixel_mut(x as u32, y as u32).blend(&color);
    }

    pub fn point(&mut self, x: f64, y: f64, color: Rgba<u8>) {
        self.blend_pixel(x.floor() as i64, y.floor() as i64, color);
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba<u8>) {
        let x0 = x.round() as i64;
        let y0 = y.round() as i64;
        let x1 = (x + width).round() as i64;
        let y1 = (y + height).round() as i64;
        for py in y0.max(0)..y1.min(self.image.height() as i64) {
            for px in x0.max(0)..x1.min(self.image.width() as i64) {
                self.blend_pixel(px, py, color);
            }
        }
    }

    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgba<u8>) {
        let start = (from.0 as f32, from.1 as f32);
        let end = (to.0 as f32, to.1 as f32);
        for (x, y) in BresenhamLineIter::new(start, end) {
            self.blend_pixel(x as i64, y as i64, color);
        }
    }

    pub fn fill_ellipse(&mut self, center: (f64, f64), rx: f64, ry: f64, color: Rgba<u8>) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let (cx, cy) = center;
        let top = (cy - ry).floor().max(0.0) as i64;
        let bottom = ((cy + ry).ceil() as i64).min(self.image.height() as i64);
        for py in top..bottom {
            let dy = (py as f64 + 0.5 - cy) / ry;
            if dy.abs() > 1.0 {
                continue;
            }
            let half = rx * (1.0 - dy * dy).sqrt();
            let (start, end) = pixel_span(cx - half, cx + half);
            for px in start..end {
                self.blend_pixel(px, py, color);
            }
        }
    }

    pub fn fill_circle(&mut self, center: (f64, f64), diameter: f64, color: Rgba<u8>) {
        self.fill_ellipse(center, diameter / 2.0, diameter / 2.0, color);
    }

    pub fn fill_convex(&mut self, points: &[(f64, f64)], color: Rgba<u8>) {
        if points.len() < 3 {
            return;
        }
        let min_y = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let max_y = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        let top = (min_y - 0.5).ceil().max(0.0) as i64;
        let bottom = ((max_y - 0.5).ceil() as i64).min(self.image.height() as i64);

        for py in top..bottom {
            let scan = py as f64 + 0.5;
            let mut left = f64::INFINITY;
            let mut right = f64::NEG_INFINITY;
            for (k, a) in points.iter().enumerate() {
                let b = points[(k + 1) % points.len()];
                let (lo, hi) = if a.1 <= b.1 { (*a, b) } else { (b, *a) };
                // Half-open in y so shared vertices are counted once
                if scan < lo.1 || scan >= hi.1 {
                    continue;
                }
                let t = (scan - lo.1) / (hi.1 - lo.1);
                let x = lo.0 + t * (hi.0 - lo.0);
                left = left.min(x);
                right = right.max(x);
            }
            if left < right {
                let (start, end) = pixel_span(left, right);
                for px in start..end {
                    self.blend_pixel(px, py, color);
                }
            }
        }
    }

    /// Strokes the outline of a rectangle with a band `weight` pixels wide,
    /// centred on its edges, after applying `rotation`.
    pub fn stroke_rect(
        &mut self,
        rect: (f64, f64, f64, f64),
        weight: f64,
        color: Rgba<u8>,
        rotation: &Rotation,
    ) {
        let (x, y, w, h) = rect;
        let half = weight.max(1.0) / 2.0;

        let outer = [
            (x - half, y - half),
            (x + w + half, y - half),
            (x + w + half, y + h + half),
            (x - half, y + h + half),
        ];
        // A band wider than the rectangle collapses the hole to its centre
        let inset_x = half.min(w / 2.0);
        let inset_y = half.min(h / 2.0);
        let inner = [
            (x + inset_x, y + inset_y),
            (x + w - inset_x, y + inset_y),
            (x + w - inset_x, y + h - inset_y),
            (x + inset_x, y + h - inset_y),
        ];

        let outer = outer.map(|p| rotation.apply(p));
        let inner = inner.map(|p| rotation.apply(p));
        for side in 0..4 {
            let next = (side + 1) % 4;
            self.fill_convex(&[outer[side], outer[next], inner[next], inner[side]], color);
        }
    }

    /// Blends a sprite so its centre lands on `center`, rotated by `angle`
    /// radians about that centre.
    pub fn stamp(&mut self, sprite: &RgbaImage, center: (f64, f64), angle: f64) {
        let rotated;
        let source = if angle.abs() < 1e-6 {
            sprite
        } else {
            rotated = rotate_padded(sprite, angle);
            &rotated
        };

        let left = (center.0 - source.width() as f64 / 2.0).round() as i64;
        let top = (center.1 - source.height() as f64 / 2.0).round() as i64;
        for (x, y, pixel) in source.enumerate_pixels() {
            if pixel[3] > 0 {
                self.blend_pixel(left + x as i64, top + y as i64, *pixel);
            }
        }
    }

    /// A new layer holding this one's shadow with this layer drawn on top.
    pub fn with_shadow(&self, shadow: &Shadow) -> Layer {
        let (width, height) = self.image.dimensions();
        let coverage = GrayImage::from_fn(width, height, |x, y| Luma([self.image.get_pixel(x, y)[3]]));
        let sigma = shadow.blur / 2.0;
        let blurred = if sigma > 0.0 { gaussian_blur_f32(&coverage, sigma) } else { coverage };

        let mut out = RgbaImage::from_pixel(width, height, TRANSPARENT);
        for (x, y, coverage) in blurred.enumerate_pixels() {
            if coverage[0] == 0 {
                continue;
            }
            let sx = x as i64 + shadow.offset.0;
            let sy = y as i64 + shadow.offset.1;
            if sx < 0 || sy < 0 || sx >= width as i64 || sy >= height as i64 {
                continue;
            }
            let alpha = (coverage[0] as u32 * shadow.color[3] as u32 / 255) as u8;
            out.put_pixel(
                sx as u32,
                sy as u32,
                Rgba([shadow.color[0], shadow.color[1], shadow.color[2], alpha]),
            );
        }
        overlay(&mut out, &self.image, 0, 0);
        Layer { image: out }
    }
}

fn pixel_span(left: f64, right: f64) -> (i64, i64) {
    ((left - 0.5).ceil() as i64, (right - 0.5).ceil() as i64)
}

/// Rotates a sprite on a canvas large enough to hold every rotated corner.
fn rotate_padded(sprite: &RgbaImage, angle: f64) -> RgbaImage {
    let (width, height) = sprite.dimensions();
    let diagonal = ((width as f64).hypot(height as f64)).ceil() as u32 + 2;
    let mut padded = RgbaImage::from_pixel(diagonal, diagonal, TRANSPARENT);
    overlay(
        &mut padded,
        sprite,
        ((diagonal - width) / 2) as i64,
        ((diagonal - height) / 2) as i64,
    );
    rotate_about_center(&padded, angle as f32, Interpolation::Bilinear, TRANSPARENT)
}
