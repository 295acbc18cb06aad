//! Per-run generation parameters.
//!
//! Everything that varies between maps is derived once from a master seed,
//! in a fixed draw order, so that the same master seed always produces the
//! same map. Individual traits can be overridden through the builder without
//! shifting the draws of the others.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::compositor::DisplayState;
use crate::error::MapError;
use crate::palette::{ColorScheme, COLOR_SCHEMES};
use crate::scenarios::{choose_scenario, Scenario, NAME_POOL_SIZE};

pub const DEFAULT_MAP_SIZE: u32 = 1440;
/// Pixels per grid cell when no resolution is given.
pub const DEFAULT_CELL_PIXELS: u32 = 8;
pub const MAX_SEA_LEVEL: f64 = 1.25;
pub const MAX_ISLAND_LEVEL: f64 = 2.0;

const SEED_VALUE_RANGE: f64 = 123_456.0;
const NOISE_SEED_RANGE: f64 = 456_789.0;
const INITIAL_FLAG_CHANCE: f64 = 0.2;

/// Number of noise "octaves" sampled across the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DetailLevel {
    Low,
    Normal,
    High,
}

impl DetailLevel {
    pub fn levels(self) -> u32 {
        match self {
            DetailLevel::Low => 5,
            DetailLevel::Normal => 6,
            DetailLevel::High => 7,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DetailLevel::Low => "Low",
            DetailLevel::Normal => "Normal",
            DetailLevel::High => "High",
        }
    }

    pub fn from_levels(levels: u32) -> Option<Self> {
        match levels {
            5 => Some(DetailLevel::Low),
            6 => Some(DetailLevel::Normal),
            7 => Some(DetailLevel::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RngStream {
    Landmarks = 1,
    Terrain = 2,
    Glyphs = 3,
    WaitMessages = 4,
}

/// Summary of a map's derived traits, for cataloguing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Features {
    #[serde(rename = "Color Scheme")]
    pub color_scheme: String,
    #[serde(rename = "Landmarks")]
    pub landmarks: usize,
    #[serde(rename = "Sea Level")]
    pub sea_level: u32,
    #[serde(rename = "Islandosity")]
    pub islandosity: u32,
    #[serde(rename = "Detail Level")]
    pub detail_level: String,
}

impl Features {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    master_seed: u64,
    seed_value: u32,
    noise_seed_value: u32,
    map_size: u32,
    map_resolution: u32,
    map_grid_size: f64,
    landmark_count: usize,
    sea_level: f64,
    island_level: f64,
    detail_level: DetailLevel,
    rotation: f64,
    color_scheme: ColorScheme,
    scenario: Scenario,
    initial_display: DisplayState,
}

impl GenerationConfig {
    /// Derives every trait from `master_seed` at the default resolution.
    pub fn from_master_seed(master_seed: u64) -> Self {
        let traits = DerivedTraits::roll(master_seed, None);
        Self::assemble(
            master_seed,
            traits,
            DEFAULT_MAP_SIZE,
            DEFAULT_MAP_SIZE / DEFAULT_CELL_PIXELS,
        )
    }

    pub fn builder(master_seed: u64) -> GenerationConfigBuilder {
        GenerationConfigBuilder::new(master_seed)
    }

    fn assemble(master_seed: u64, traits: DerivedTraits, map_size: u32, map_resolution: u32) -> Self {
        Self {
            master_seed,
            seed_value: traits.seed_value,
            noise_seed_value: traits.noise_seed_value,
            map_size,
            map_resolution,
            map_grid_size: map_size as f64 / map_resolution as f64,
            landmark_count: traits.landmark_count.min(NAME_POOL_SIZE),
            sea_level: traits.sea_level,
            island_level: traits.island_level,
            detail_level: traits.detail_level,
            rotation: traits.rotation,
            color_scheme: traits.color_scheme,
            scenario: traits.scenario,
            initial_display: traits.initial_display,
        }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn seed_value(&self) -> u32 {
        self.seed_value
    }

    pub fn noise_seed_value(&self) -> u32 {
        self.noise_seed_value
    }

    pub fn map_size(&self) -> u32 {
        self.map_size
    }

    pub fn map_resolution(&self) -> u32 {
        self.map_resolution
    }

    /// Side length of one grid cell, in pixels.
    pub fn map_grid_size(&self) -> f64 {
        self.map_grid_size
    }

    pub fn landmark_count(&self) -> usize {
        self.landmark_count
    }

    pub fn sea_level(&self) -> f64 {
        self.sea_level
    }

    pub fn island_level(&self) -> f64 {
        self.island_level
    }

    pub fn detail_level(&self) -> DetailLevel {
        self.detail_level
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn color_scheme(&self) -> &ColorScheme {
        &self.color_scheme
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn title(&self) -> &str {
        &self.scenario.title
    }

    pub fn initial_display(&self) -> DisplayState {
        self.initial_display
    }

    pub fn px(&self, value: f64) -> f64 {
        self.map_size as f64 * value
    }

    /// A fresh generator for one consumer. All streams share the run seed.
    pub fn rng(&self, stream: RngStream) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed_value as u64);
        rng.set_stream(stream as u64);
        rng
    }

    pub fn features(&self) -> Features {
        Features {
            color_scheme: self.color_scheme.name.to_string(),
            landmarks: self.landmark_count,
            sea_level: (self.sea_level * 10.0) as u32,
            islandosity: (self.island_level * 10.0) as u32,
            detail_level: self.detail_level.label().to_string(),
        }
    }
}

/// Traits rolled from the master seed, in draw order.
struct DerivedTraits {
    seed_value: u32,
    noise_seed_value: u32,
    initial_display: DisplayState,
    rotation: f64,
    landmark_count: usize,
    sea_level: f64,
    island_level: f64,
    detail_level: DetailLevel,
    scenario: Scenario,
    color_scheme: ColorScheme,
}

impl DerivedTraits {
    /// `island_override` steers scenario availability when the caller fixes
    /// the island level; the draw sequence is the same either way.
    fn roll(master_seed: u64, island_override: Option<f64>) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(master_seed);

        let seed_value = (rng.gen::<f64>() * SEED_VALUE_RANGE) as u32;
        let noise_seed_value = (rng.gen::<f64>() * NOISE_SEED_RANGE) as u32;

        let show_labels = rng.gen::<f64>() < INITIAL_FLAG_CHANCE;
        let show_name = rng.gen::<f64>() < INITIAL_FLAG_CHANCE;

        let rotation = (-1.0 + rng.gen::<f64>() * 2.0) / 48.0;
        let landmark_count = 4 + (rng.gen::<f64>() * 5.0) as usize;
        let sea_level = rng.gen::<f64>() * MAX_SEA_LEVEL;
        let rolled_island = round_to_hundredths(rng.gen::<f64>() * MAX_ISLAND_LEVEL);
        let island_level = island_override.unwrap_or(rolled_island);

        let detail_level = if rng.gen::<f64>() < 0.5 {
            DetailLevel::Normal
        } else if rng.gen::<f64>() < 0.5 {
            DetailLevel::Low
        } else {
            DetailLevel::High
        };

        let scenario = choose_scenario(island_level, &mut rng);
        let color_scheme = COLOR_SCHEMES[rng.gen_range(0..COLOR_SCHEMES.len())];

        Self {
            seed_value,
            noise_seed_value,
            initial_display: DisplayState { show_labels, show_name },
            rotation,
            landmark_count,
            sea_level,
            island_level,
            detail_level,
            scenario,
            color_scheme,
        }
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Builder for overriding individual traits while deriving the rest from the
/// master seed.
#[derive(Debug, Clone)]
pub struct GenerationConfigBuilder {
    master_seed: u64,
    seed_value: Option<u32>,
    noise_seed_value: Option<u32>,
    map_size: u32,
    map_resolution: Option<u32>,
    landmark_count: Option<usize>,
    sea_level: Option<f64>,
    island_level: Option<f64>,
    detail_level: Option<DetailLevel>,
    display: Option<DisplayState>,
}

impl GenerationConfigBuilder {
    pub fn new(master_seed: u64) -> Self {
        Self {
            master_seed,
            seed_value: None,
            noise_seed_value: None,
            map_size: DEFAULT_MAP_SIZE,
            map_resolution: None,
            landmark_count: None,
            sea_level: None,
            island_level: None,
            detail_level: None,
            display: None,
        }
    }

    pub fn seed_value(mut self, seed: u32) -> Self {
        self.seed_value = Some(seed);
        self
    }

    pub fn noise_seed_value(mut self, seed: u32) -> Self {
        self.noise_seed_value = Some(seed);
        self
    }

    pub fn map_size(mut self, size: u32) -> Self {
        self.map_size = size;
        self
    }

    pub fn map_resolution(mut self, resolution: u32) -> Self {
        self.map_resolution = Some(resolution);
        self
    }

    /// Clamped to the name pool size
    pub fn landmark_count(mut self, count: usize) -> Self {
        self.landmark_count = Some(count);
        self
    }

    pub fn sea_level(mut self, level: f64) -> Self {
        self.sea_level = Some(level);
        self
    }

    pub fn island_level(mut self, level: f64) -> Self {
        self.island_level = Some(level);
        self
    }

    pub fn detail_level(mut self, level: DetailLevel) -> Self {
        self.detail_level = Some(level);
        self
    }

    pub fn display(mut self, display: DisplayState) -> Self {
        self.display = Some(display);
        self
    }

    pub fn build(self) -> Result<GenerationConfig, MapError> {
        if self.map_size == 0 {
            return Err(MapError::InvalidConfig("map size must be positive".to_string()));
        }
        let map_resolution = self
            .map_resolution
            .unwrap_or_else(|| (self.map_size / DEFAULT_CELL_PIXELS).max(1));
        if map_resolution == 0 || map_resolution > self.map_size {
            return Err(MapError::InvalidConfig(format!(
                "resolution {} must be between 1 and the map size {}",
                map_resolution, self.map_size
            )));
        }
        if self.map_size % map_resolution != 0 {
            return Err(MapError::InvalidConfig(format!(
                "map size {} is not a multiple of resolution {}",
                self.map_size, map_resolution
            )));
        }
        for (name, value) in [("sea level", self.sea_level), ("island level", self.island_level)] {
            if matches!(value, Some(v) if !v.is_finite()) {
                return Err(MapError::InvalidConfig(format!("{} must be a finite number", name)));
            }
        }

        let island_level = self.island_level.map(|v| v.clamp(0.0, MAX_ISLAND_LEVEL));
        let mut traits = DerivedTraits::roll(self.master_seed, island_level);

        if let Some(seed) = self.seed_value {
            traits.seed_value = seed;
        }
        if let Some(seed) = self.noise_seed_value {
            traits.noise_seed_value = seed;
        }
        if let Some(count) = self.landmark_count {
            traits.landmark_count = count;
        }
        if let Some(level) = self.sea_level {
            traits.sea_level = level.clamp(0.0, MAX_SEA_LEVEL);
        }
        if let Some(level) = self.detail_level {
            traits.detail_level = level;
        }
        if let Some(display) = self.display {
            traits.initial_display = display;
        }

        Ok(GenerationConfig::assemble(self.master_seed, traits, self.map_size, map_resolution))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_seed_is_reproducible() {
        let a = GenerationConfig::from_master_seed(1234);
        let b = GenerationConfig::from_master_seed(1234);
        assert_eq!(a.seed_value(), b.seed_value());
        assert_eq!(a.noise_seed_value(), b.noise_seed_value());
        assert_eq!(a.scenario(), b.scenario());
        assert_eq!(a.features(), b.features());
        assert_eq!(a.rotation(), b.rotation());
    }

    #[test]
    fn test_derived_ranges() {
        for seed in 0..64 {
            let config = GenerationConfig::from_master_seed(seed);
            assert!((4..=8).contains(&config.landmark_count()));
            assert!((0.0..MAX_SEA_LEVEL).contains(&config.sea_level()));
            assert!((0.0..=MAX_ISLAND_LEVEL).contains(&config.island_level()));
            assert!(config.rotation().abs() <= 1.0 / 48.0);
            assert!((config.seed_value() as f64) < SEED_VALUE_RANGE);
            assert!((config.noise_seed_value() as f64) < NOISE_SEED_RANGE);
            assert!((5..=7).contains(&config.detail_level().levels()));
        }
    }

    #[test]
    fn test_grid_size_derived_once() {
        let config = GenerationConfig::from_master_seed(5);
        assert_eq!(config.map_size(), 1440);
        assert_eq!(config.map_resolution(), 180);
        assert_eq!(config.map_grid_size(), 8.0);
        assert_eq!(config.px(0.5), 720.0);
    }

    #[test]
    fn test_builder_overrides_keep_other_traits() {
        let base = GenerationConfig::from_master_seed(77);
        let custom = GenerationConfig::builder(77)
            .sea_level(0.6)
            .landmark_count(5)
            .detail_level(DetailLevel::High)
            .build()
            .unwrap();

        assert_eq!(custom.sea_level(), 0.6);
        assert_eq!(custom.landmark_count(), 5);
        assert_eq!(custom.detail_level(), DetailLevel::High);
        assert_eq!(custom.seed_value(), base.seed_value());
        assert_eq!(custom.noise_seed_value(), base.noise_seed_value());
        assert_eq!(custom.color_scheme(), base.color_scheme());
    }

    #[test]
    fn test_landmark_count_clamped_to_pool() {
        let config = GenerationConfig::builder(1).landmark_count(40).build().unwrap();
        assert_eq!(config.landmark_count(), NAME_POOL_SIZE);
    }

    #[test]
    fn test_builder_rejects_bad_grid() {
        assert!(GenerationConfig::builder(1).map_size(0).build().is_err());
        assert!(GenerationConfig::builder(1).map_size(100).map_resolution(0).build().is_err());
        assert!(GenerationConfig::builder(1).map_size(100).map_resolution(30).build().is_err());
        assert!(GenerationConfig::builder(1).map_size(100).map_resolution(200).build().is_err());
        assert!(GenerationConfig::builder(1).sea_level(f64::NAN).build().is_err());
    }

    #[test]
    fn test_builder_default_resolution() {
        let config = GenerationConfig::builder(1).map_size(720).build().unwrap();
        assert_eq!(config.map_resolution(), 90);
        assert_eq!(config.map_grid_size(), 8.0);
    }

    #[test]
    fn test_rng_streams_differ() {
        let config = GenerationConfig::from_master_seed(9);
        let a: u64 = config.rng(RngStream::Landmarks).gen();
        let b: u64 = config.rng(RngStream::Terrain).gen();
        let again: u64 = config.rng(RngStream::Landmarks).gen();
        assert_ne!(a, b);
        assert_eq!(a, again);
    }

    #[test]
    fn test_features_record() {
        let config = GenerationConfig::builder(3)
            .sea_level(0.64)
            .island_level(1.27)
            .landmark_count(6)
            .detail_level(DetailLevel::Low)
            .build()
            .unwrap();
        let features = config.features();
        assert_eq!(features.sea_level, 6);
        assert_eq!(features.islandosity, 12);
        assert_eq!(features.landmarks, 6);
        assert_eq!(features.detail_level, "Low");

        let json = features.to_json();
        assert!(json.contains("\"Color Scheme\""));
        assert!(json.contains("\"Islandosity\": 12"));
    }
}
