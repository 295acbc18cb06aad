use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::config::{DetailLevel, GenerationConfig};

/// Raw values below this become open sea.
pub const SEA_FLOOR_CUTOFF: f64 = 1.5;
/// Raw values above this become the highest ground.
pub const PEAK_CUTOFF: f64 = 3.5;
pub const MAX_CLASS: f64 = 4.0;
/// Samples at or above this count as land when placing landmarks.
pub const LANDMARK_LAND_THRESHOLD: f64 = 1.5;
/// Samples above this are textured as land, the rest as sea.
pub const LAND_TEXTURE_THRESHOLD: f64 = 2.0;

const NOISE_OCTAVES: usize = 4;

/// A clamped terrain sample in `[0, 4]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct TerrainClass(f64);

impl TerrainClass {
    /// Applies the sea floor and peak cutoffs to a raw sample.
    pub fn from_raw(raw: f64) -> Self {
        if raw < SEA_FLOOR_CUTOFF {
            TerrainClass(0.0)
        } else if raw > PEAK_CUTOFF {
            TerrainClass(MAX_CLASS)
        } else {
            TerrainClass(raw)
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Palette index, 0 (deep sea) to 4 (high land).
    pub fn index(self) -> usize {
        (self.0.floor() as usize).min(MAX_CLASS as usize)
    }

    pub fn is_land(self) -> bool {
        self.0 > LAND_TEXTURE_THRESHOLD
    }

    pub fn supports_land_landmark(self) -> bool {
        self.0 >= LANDMARK_LAND_THRESHOLD
    }

    /// Land whose fractional elevation falls below `band` grows forest.
    pub fn has_forest(self, band: f64) -> bool {
        self.is_land() && self.0.fract() < band
    }
}

/// Maps normalised map coordinates to terrain classes.
pub struct NoiseField {
    noise: Fbm<Perlin>,
    island_level: f64,
    sea_level: f64,
    detail: f64,
}

impl NoiseField {
    pub fn new(config: &GenerationConfig) -> Self {
        Self::with_params(
            config.noise_seed_value(),
            config.island_level(),
            config.sea_level(),
            config.detail_level(),
        )
    }

    pub fn with_params(noise_seed: u32, island_level: f64, sea_level: f64, detail_level: DetailLevel) -> Self {
        let noise = Fbm::<Perlin>::new(noise_seed)
            .set_octaves(NOISE_OCTAVES)
            .set_frequency(1.0)
            .set_lacunarity(2.0)
            .set_persistence(0.5);

        NoiseField {
            noise,
            island_level,
            sea_level,
            detail: detail_level.levels() as f64,
        }
    }

    /// Coherent noise remapped to roughly `[0, 1]`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let value = self.noise.get([x, y]);
        (value * 0.5 + 0.5).clamp(0.0, 1.0)
    }

    /// Unclamped elevation at `(i, j)`.
    pub fn raw(&self, i: f64, j: f64) -> f64 {
        let dx = i - 0.5;
        let dy = j - 0.5;
        let island_modifier = 1.0 - self.island_level * (dx * dx + dy * dy).sqrt();
        let n = self.sample(i * self.detail, j * self.detail);
        island_modifier * self.detail * n + self.sea_level
    }

    pub fn classify(&self, i: f64, j: f64) -> TerrainClass {
        TerrainClass::from_raw(self.raw(i, j))
    }
}
