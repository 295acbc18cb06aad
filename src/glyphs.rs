//! Rare, subtle dot-matrix decorations stamped onto the terrain.

use image::Rgba;
use rand::Rng;

use crate::config::GenerationConfig;
use crate::layer::Layer;

/// Rows of a dot-matrix pattern; [`DOT`] marks a filled position.
pub type Glyph = &'static [&'static str];

pub const DOT: char = 'X';

const BASE_GLYPHS: [Glyph; 6] = [
    &["XX", "XX"],
    &["X X", " X", "X X"],
    &["XXX", "XXX", "XXX"],
    &[" X ", "X X", " X"],
    &["  X", " X X", "X   X", " X X", "  X"],
    &["XXXXXX", "X    X", "X    X", "XXXXXX"],
];

const EXTRA_GLYPHS: [Glyph; 4] = [
    &["XX", "XX"],
    &["X X", " X", "X X"],
    &["  X", " X X", "X   X", " X X", "  X"],
    &["XXX", "X X", "X X", "X X", "X X", "X X", "XXX"],
];

const BONUS_GLYPHS: [Glyph; 4] = [
    &["XX", "XX"],
    &["X X", " X", "X X"],
    &["X  ", "X  ", "XXX"],
    &[" X ", "X X", " X"],
];

const RARE_GLYPHS: [(&str, Glyph); 4] = [
    ("key", &[" XXX", "X   X", "X   X", " XXX", "  X", "  X", "  XX", "  X", "  XX"]),
    ("pin", &[" XXX", "XXX X", "XXXXX", "XXXXX", " XXX", "  X", "  X", "  X", "  X", "  X"]),
    ("arrow", &["X", "XX", "XXX", "XXXX", "XXXXX", "XXXXXX", "XXXXXXX", "XXX", "XX", "X"]),
    ("cross", &[" X    X", "XXX  XXX", " XXXXXX", "  XXXX", "  XXXX", " XXXXXX", "XXX  XXX", " X    X "]),
];

const RARER_GLYPHS: [(&str, Glyph); 4] = [
    ("ghost", &["  XXX  ", " X X X ", " XXXXX ", " XXXXX ", " X X X "]),
    ("circle", &["  XXXX", " X    X", "X    X X", "X X    X", "XX     X", "X X X  X", " X X  X ", "  XXXX  "]),
    ("banner", &["  XX  XX", "XX  XX X", "X      X", "X      X", "X XX  XX", "XX  XX"]),
    (
        "pentagram",
        &[
            "     XXXXX",
            "   XX  X  XX",
            "  X    X    X",
            " X    X X    X",
            " X    X X    X",
            "XXXXXXXXXXXXXXX",
            "X XX X   X XX X",
            "X   XX   XX   X",
            "X   XX   XX   X",
            "X   X XXX X   X",
            " X  X X X X  X",
            " X XXX   XXX X",
            "  XX       XX",
            "   XX     XX",
            "     XXXXX",
        ],
    ),
];

const EXTRA_CHANCE: f64 = 0.5;
const BONUS_CHANCE: f64 = 0.25;
const RARE_CHANCE: f64 = 0.25;
const RARER_CHANCE: f64 = 0.05;

/// Glyphs land on grid cells within this fraction of the map on each side.
const PLACEMENT_MARGIN: f64 = 0.1;

/// Calls `visit(column, row)` for every dot in `glyph`.
pub fn for_each_dot(glyph: Glyph, mut visit: impl FnMut(usize, usize)) {
    for (row, line) in glyph.iter().enumerate() {
        for (column, ch) in line.chars().enumerate() {
            if ch == DOT {
                visit(column, row);
            }
        }
    }
}

/// A glyph as stamped: pattern and the grid cell of its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedGlyph {
    pub glyph: Glyph,
    pub cell: (u32, u32),
}

pub struct GlyphStamper;

impl GlyphStamper {
    /// Rolls which glyphs appear. Checks run in a fixed order so the draw
    /// sequence is stable for a given stream.
    pub fn select<R: Rng>(rng: &mut R) -> Vec<Glyph> {
        let mut glyphs: Vec<Glyph> = BASE_GLYPHS.to_vec();

        if rng.gen::<f64>() < EXTRA_CHANCE {
            glyphs.extend(EXTRA_GLYPHS);
        }
        if rng.gen::<f64>() < BONUS_CHANCE {
            glyphs.extend(BONUS_GLYPHS);
        }
        for (_, glyph) in RARE_GLYPHS {
            if rng.gen::<f64>() < RARE_CHANCE {
                glyphs.push(glyph);
            }
        }
        for (name, glyph) in RARER_GLYPHS {
            if rng.gen::<f64>() < RARER_CHANCE {
                tracing::debug!(glyph = name, "rarer glyph included");
                glyphs.push(glyph);
            }
        }

        glyphs
    }

    /// Selects and stamps glyphs onto `layer`.
    pub fn stamp<R: Rng>(config: &GenerationConfig, layer: &mut Layer, rng: &mut R) -> Vec<PlacedGlyph> {
        let glyphs = Self::select(rng);
        let cell = config.map_grid_size();
        let resolution = config.map_resolution() as f64;
        let low = resolution * PLACEMENT_MARGIN;
        let high = resolution * (1.0 - PLACEMENT_MARGIN);

        let mut placed = Vec::with_capacity(glyphs.len());
        for glyph in glyphs {
            let col = rng.gen_range(low..high).floor() as u32;
            let row = rng.gen_range(low..high).floor() as u32;
            let origin = (cell * col as f64, cell * row as f64);

            // Every position draws its jitter, dot or not
            for (j, line) in glyph.iter().enumerate() {
                for (k, ch) in line.chars().enumerate() {
                    let scale = rng.gen_range(0.975..1.025);
                    let shade = rng.gen_range(170.0..190.0) as u8;
                    let alpha = rng.gen_range(30.0..45.0) as u8;
                    if ch == DOT {
                        let size = cell * scale;
                        layer.fill_circle(
                            (origin.0 + k as f64 * size, origin.1 + j as f64 * size),
                            size,
                            Rgba([shade, shade, shade, alpha]),
                        );
                    }
                }
            }

            placed.push(PlacedGlyph { glyph, cell: (col, row) });
        }

        placed
    }
}
