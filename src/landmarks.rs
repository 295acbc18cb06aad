//! Named landmarks spread down the map.
//!
//! Ten candidate slots are laid out evenly along the horizontal axis. The
//! configured number of them is occupied; each occupied slot becomes a land or
//! sea landmark depending on the terrain beneath it, gets an icon and takes a
//! name from the run's [`NameBank`].

use image::Rgba;
use rand::Rng;

use crate::config::GenerationConfig;
use crate::glyphs::{for_each_dot, Glyph};
use crate::layer::{Layer, Rotation, Shadow};
use crate::lettering::{stamp_text, Align, Lettering, Outline, TextStyle};
use crate::names::{AllocatedName, LandmarkKind, NameBank};
use crate::noise_field::{NoiseField, TerrainClass};
use crate::palette::{self, rgba};

pub const SLOT_COUNT: usize = 10;

const LAND_ICONS: [Glyph; 6] = [
    &["XXXX", "X  X", "X  X", "XXXX"],
    &[" XX", "X  X", "X  X", " XX"],
    &["X X", " X", "X X"],
    &["XXXX", "X XX", "XX X", "XXX"],
    &["X X", " X X", "X X", " X X"],
    &[" XX", "X  X", "X  X", "XXXX"],
];

const SEA_ICONS: [Glyph; 3] = [
    &[" XX", "X  X", "X  X", " XX"],
    &["X X", " X", "X X"],
    &["XXX", "X X", "XXX"],
];

/// Drops sideways only; the shadow sits level with the landmark.
pub const LANDMARK_SHADOW: Shadow = Shadow {
    offset: (2, 0),
    blur: 4.0,
    color: rgba(0x333333, 255),
};

const BAND_TOP: f64 = 0.2;
const BAND_BOTTOM: f64 = 0.65;
const SLOT_JITTER: f64 = 0.025;
const SPREAD_START: f64 = 0.1;
const SPREAD_END: f64 = 0.9;
const LABEL_TILT: f64 = 0.08;

/// Label height in grid cells.
const LABEL_CELLS: f64 = 5.0;
/// Distance from a text baseline up to the middle of its lowercase letters,
/// as a fraction of the text size.
const BASELINE_TO_MIDDLE: f64 = 0.35;

/// One placed landmark.
#[derive(Debug, Clone, PartialEq)]
pub struct Landmark {
    /// Index of the slot among the ten candidates
    pub slot: usize,
    pub weight: u8,
    pub kind: LandmarkKind,
    /// Normalised icon anchor
    pub position: (f64, f64),
    pub class: TerrainClass,
    pub name: Option<AllocatedName>,
}

/// Occupancy weights for the ten slots: up to two weight-2 slots, weight-1
/// slots up to `count`, then empty slots spliced in at random positions.
pub fn build_slots<R: Rng>(count: usize, rng: &mut R) -> Vec<u8> {
    let count = count.min(SLOT_COUNT);
    let mut slots: Vec<u8> = (0..count).map(|k| if k < 2 { 2 } else { 1 }).collect();
    while slots.len() < SLOT_COUNT {
        let at = (rng.gen::<f64>() * slots.len() as f64) as usize;
        slots.insert(at, 0);
    }
    slots
}

/// Linear remap of `value` from `[from_low, from_high]` to `[to_low, to_high]`.
fn remap(value: f64, from_low: f64, from_high: f64, to_low: f64, to_high: f64) -> f64 {
    to_low + (value - from_low) / (from_high - from_low) * (to_high - to_low)
}

pub struct LandmarkPlacer<'a> {
    config: &'a GenerationConfig,
    field: &'a NoiseField,
    lettering: &'a dyn Lettering,
}

impl<'a> LandmarkPlacer<'a> {
    pub fn new(config: &'a GenerationConfig, field: &'a NoiseField, lettering: &'a dyn Lettering) -> Self {
        LandmarkPlacer { config, field, lettering }
    }

    /// Draws every landmark onto a fresh layer with the run's names and
    /// returns the shadowed layer.
    pub fn render<R: Rng>(&self, rng: &mut R) -> (Layer, Vec<Landmark>) {
        let mut layer = Layer::new(self.config.map_size());
        let mut names = NameBank::from_scenario(self.config.scenario());
        let landmarks = self.place(&mut layer, &mut names, rng);
        (layer.with_shadow(&LANDMARK_SHADOW), landmarks)
    }

    pub fn place<R: Rng>(&self, layer: &mut Layer, names: &mut NameBank, rng: &mut R) -> Vec<Landmark> {
        let slots = build_slots(self.config.landmark_count(), rng);
        let mut landmarks = Vec::new();

        for (slot, &weight) in slots.iter().enumerate() {
            // Both coordinates are drawn for every slot, occupied or not
            let y = rng.gen_range(BAND_TOP..BAND_BOTTOM);
            let x = weight as f64 * rng.gen_range(-SLOT_JITTER..SLOT_JITTER)
                + remap(slot as f64, 0.0, (SLOT_COUNT + 1) as f64, SPREAD_START, SPREAD_END);
            if weight == 0 {
                continue;
            }

            let class = self.field.classify(x, y);
            let kind = if class.supports_land_landmark() {
                LandmarkKind::Land
            } else {
                LandmarkKind::Sea
            };
            let anchor = (self.config.px(x), self.config.px(y));
            let name = self.draw_landmark(layer, names, kind, anchor, rng);

            tracing::debug!(
                slot,
                ?kind,
                class = class.value(),
                name = name.as_ref().map(|n| n.name.as_str()).unwrap_or(""),
                "placed landmark"
            );
            landmarks.push(Landmark { slot, weight, kind, position: (x, y), class, name });
        }

        landmarks
    }

    fn draw_landmark<R: Rng>(
        &self,
        layer: &mut Layer,
        names: &mut NameBank,
        kind: LandmarkKind,
        anchor: (f64, f64),
        rng: &mut R,
    ) -> Option<AllocatedName> {
        let icon = match kind {
            LandmarkKind::Land => LAND_ICONS[rng.gen_range(0..LAND_ICONS.len())],
            LandmarkKind::Sea => SEA_ICONS[rng.gen_range(0..SEA_ICONS.len())],
        };
        let alpha = rng.gen_range(60.0..90.0) as u8;
        self.draw_icon(layer, icon, anchor, palette::with_alpha(palette::INK, alpha));

        let Some(name) = names.take(kind, rng) else {
            tracing::warn!(?kind, "name pool exhausted, landmark left unlabelled");
            return None;
        };

        let cell = self.config.map_grid_size();
        let size = cell * LABEL_CELLS;
        let baseline = match kind {
            LandmarkKind::Land => (5.0 * cell, 3.5 * cell),
            LandmarkKind::Sea => (3.0 * cell, 1.5 * cell),
        };
        let style = TextStyle {
            size: size as f32,
            fill: palette::PAPER,
            outline: Some(Outline {
                color: palette::INK,
                width: (cell * 0.375).round().max(1.0) as i32,
            }),
        };
        let at = (anchor.0 + baseline.0, anchor.1 + baseline.1 - size * BASELINE_TO_MIDDLE);
        let rotation = Rotation::about(anchor, rng.gen_range(-LABEL_TILT..LABEL_TILT));
        stamp_text(layer, self.lettering, &name.name, &style, at, Align::Left, &rotation);

        Some(name)
    }

    fn draw_icon(&self, layer: &mut Layer, icon: Glyph, anchor: (f64, f64), color: Rgba<u8>) {
        let cell = self.config.map_grid_size();
        for_each_dot(icon, |col, row| {
            layer.fill_rect(anchor.0 + col as f64 * cell, anchor.1 + row as f64 * cell, cell, cell, color);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RngStream;
    use crate::lettering::BlockLettering;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashSet;

    fn config(seed: u64, count: usize) -> GenerationConfig {
        GenerationConfig::builder(seed)
            .map_size(320)
            .map_resolution(40)
            .landmark_count(count)
            .build()
            .unwrap()
    }

    #[test]
    fn test_landmark_shadow_falls_to_the_right() {
        let mut layer = Layer::new(40);
        layer.fill_rect(10.0, 10.0, 4.0, 4.0, palette::INK);
        let shadowed = layer.with_shadow(&LANDMARK_SHADOW);
        let alpha = |x, y| shadowed.image().get_pixel(x, y)[3];

        assert!(alpha(15, 11) > alpha(8, 11));
        assert!(alpha(11, 8).abs_diff(alpha(11, 15)) <= 1);
    }

    #[test]
    fn test_build_slots_shape() {
        for count in 0..=8 {
            let slots = build_slots(count, &mut ChaCha8Rng::seed_from_u64(count as u64));
            assert_eq!(slots.len(), SLOT_COUNT);
            assert_eq!(slots.iter().filter(|&&w| w != 0).count(), count);
            assert_eq!(slots.iter().filter(|&&w| w == 2).count(), count.min(2));
        }
    }

    #[test]
    fn test_build_slots_keeps_order_of_occupied() {
        let slots = build_slots(5, &mut ChaCha8Rng::seed_from_u64(3));
        let occupied: Vec<u8> = slots.into_iter().filter(|&w| w != 0).collect();
        assert_eq!(occupied, vec![2, 2, 1, 1, 1]);
    }

    #[test]
    fn test_remap() {
        assert_eq!(remap(0.0, 0.0, 11.0, 0.1, 0.9), 0.1);
        assert!((remap(11.0, 0.0, 11.0, 0.1, 0.9) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_one_landmark_per_occupied_slot() {
        for count in [0, 1, 4, 8] {
            let config = config(11, count);
            let field = NoiseField::new(&config);
            let placer = LandmarkPlacer::new(&config, &field, &BlockLettering);
            let (_, landmarks) = placer.render(&mut config.rng(RngStream::Landmarks));
            assert_eq!(landmarks.len(), count);
        }
    }

    #[test]
    fn test_names_are_unique_and_match_kind() {
        for seed in 0..10 {
            let config = config(seed, 8);
            let field = NoiseField::new(&config);
            let placer = LandmarkPlacer::new(&config, &field, &BlockLettering);
            let (layer, landmarks) = placer.render(&mut config.rng(RngStream::Landmarks));

            let mut used = HashSet::new();
            for landmark in &landmarks {
                let name = landmark.name.as_ref().unwrap();
                assert_eq!(name.kind, landmark.kind);
                assert!(used.insert((name.kind, name.pool_index)));
                assert_eq!(landmark.kind == LandmarkKind::Land, landmark.class.supports_land_landmark());
            }
            assert!(!layer.is_blank());
        }
    }

    #[test]
    fn test_positions_follow_slots() {
        let config = config(5, 8);
        let field = NoiseField::new(&config);
        let placer = LandmarkPlacer::new(&config, &field, &BlockLettering);
        let (_, landmarks) = placer.render(&mut config.rng(RngStream::Landmarks));

        for pair in landmarks.windows(2) {
            assert!(pair[0].slot < pair[1].slot);
        }
        for landmark in &landmarks {
            let (x, y) = landmark.position;
            assert!((BAND_TOP..BAND_BOTTOM).contains(&y));
            let nominal = remap(landmark.slot as f64, 0.0, 11.0, 0.1, 0.9);
            assert!((x - nominal).abs() <= SLOT_JITTER * landmark.weight as f64);
            assert_eq!(landmark.class, field.classify(x, y));
        }
    }

    #[test]
    fn test_render_is_reproducible() {
        let config = config(77, 6);
        let field = NoiseField::new(&config);
        let placer = LandmarkPlacer::new(&config, &field, &BlockLettering);
        let a = placer.render(&mut config.rng(RngStream::Landmarks));
        let b = placer.render(&mut config.rng(RngStream::Landmarks));
        assert_eq!(a, b);
    }

    #[test]
    fn test_exhausted_pool_leaves_label_off() {
        let config = config(2, 4);
        let field = NoiseField::new(&config);
        let placer = LandmarkPlacer::new(&config, &field, &BlockLettering);
        let mut names = NameBank::from_scenario(config.scenario());
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for kind in [LandmarkKind::Land, LandmarkKind::Sea] {
            while names.take(kind, &mut rng).is_some() {}
        }

        let mut layer = Layer::new(config.map_size());
        let landmarks = placer.place(&mut layer, &mut names, &mut config.rng(RngStream::Landmarks));
        assert_eq!(landmarks.len(), 4);
        assert!(landmarks.iter().all(|l| l.name.is_none()));
    }
}
