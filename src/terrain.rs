use rand::Rng;

use crate::config::GenerationConfig;
use crate::layer::Layer;
use crate::noise_field::{NoiseField, TerrainClass};
use crate::palette::{self, with_alpha};

/// Terrain covers `[INNER_MARGIN, 1 - INNER_MARGIN)` on both axes, leaving
/// the rim for the border.
pub const INNER_MARGIN: f64 = 0.05;
/// Land whose fractional elevation is below this grows forest clumps.
pub const FOREST_BAND: f64 = 0.25;

const STIPPLE_SPACING: f64 = 4.0;
const RIPPLE_STEP: usize = 2;
const RIPPLE_REACH: f64 = 8.0;

/// Classes of every rendered cell, column-major like the render order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerrainGrid {
    cells_per_axis: u32,
    classes: Vec<TerrainClass>,
}

impl TerrainGrid {
    pub fn cells_per_axis(&self) -> u32 {
        self.cells_per_axis
    }

    pub fn classes(&self) -> &[TerrainClass] {
        &self.classes
    }

    /// Class of the cell at column `col`, row `row`.
    pub fn get(&self, col: u32, row: u32) -> Option<TerrainClass> {
        if col >= self.cells_per_axis || row >= self.cells_per_axis {
            return None;
        }
        self.classes.get((col * self.cells_per_axis + row) as usize).copied()
    }

    pub fn count(&self, predicate: impl Fn(TerrainClass) -> bool) -> usize {
        self.classes.iter().filter(|&&class| predicate(class)).count()
    }
}

pub struct TerrainRenderer;

impl TerrainRenderer {
    /// Cells per axis inside the margins.
    pub fn cells_per_axis(config: &GenerationConfig) -> u32 {
        let span = (1.0 - 2.0 * INNER_MARGIN) * config.map_resolution() as f64;
        (span - 1e-9).ceil().max(0.0) as u32
    }

    /// Normalised coordinate of cell `index` along either axis.
    pub fn cell_origin(config: &GenerationConfig, index: u32) -> f64 {
        INNER_MARGIN + index as f64 / config.map_resolution() as f64
    }

    /// Classifies the grid without drawing anything.
    pub fn classify(config: &GenerationConfig, field: &NoiseField) -> TerrainGrid {
        let cells_per_axis = Self::cells_per_axis(config);
        let mut classes = Vec::with_capacity((cells_per_axis * cells_per_axis) as usize);
        for col in 0..cells_per_axis {
            let i = Self::cell_origin(config, col);
            for row in 0..cells_per_axis {
                classes.push(field.classify(i, Self::cell_origin(config, row)));
            }
        }
        TerrainGrid { cells_per_axis, classes }
    }

    /// Paints base colours and textures for every cell onto `layer`.
    pub fn render<R: Rng>(
        config: &GenerationConfig,
        field: &NoiseField,
        layer: &mut Layer,
        rng: &mut R,
    ) -> TerrainGrid {
        let grid = Self::classify(config, field);
        let cell = config.map_grid_size();
        let scheme = config.color_scheme();

        for col in 0..grid.cells_per_axis {
            let x = config.px(Self::cell_origin(config, col));
            for row in 0..grid.cells_per_axis {
                let y = config.px(Self::cell_origin(config, row));
                let class = grid.classes[(col * grid.cells_per_axis + row) as usize];

                layer.fill_rect(x, y, cell, cell, scheme.terrain_color(class.index()));
                Self::texture(layer, class, (x, y), cell, rng);
            }
        }

        grid
    }

    /// Draws the texture for one cell of `class` with its corner at `origin`:
    /// stipple and possibly forest on land, ripples on sea.
    pub fn texture<R: Rng>(layer: &mut Layer, class: TerrainClass, origin: (f64, f64), cell: f64, rng: &mut R) {
        let (x, y) = origin;
        if class.is_land() {
            Self::stipple(layer, x, y, cell, rng);
        }
        if class.has_forest(FOREST_BAND) {
            Self::forest_clump(layer, x, y, cell, rng);
        }
        if !class.is_land() {
            Self::ripples(layer, x, y, cell, rng);
        }
    }

    /// Fine dot texture on land: a dark dot with a lighter partner two
    /// pixels to its left.
    fn stipple<R: Rng>(layer: &mut Layer, x: f64, y: f64, cell: f64, rng: &mut R) {
        let mut k = x;
        while k < x + cell {
            let mut l = y;
            while l < y + cell {
                let mut l_pos = l;
                if (k as i64) % 3 == 0 {
                    l_pos += rng.gen_range(0.0..2.0);
                }
                layer.point(k, l_pos, palette::STIPPLE_DARK);
                layer.point(k - 2.0, l_pos + rng.gen_range(-1.0..1.0), palette::STIPPLE_LIGHT);
                l += STIPPLE_SPACING;
            }
            k += STIPPLE_SPACING;
        }
    }

    fn forest_clump<R: Rng>(layer: &mut Layer, x: f64, y: f64, cell: f64, rng: &mut R) {
        let alpha = 64.0 + rng.gen_range(-16.0..16.0);
        let size = cell * rng.gen_range(0.7..1.1);
        let center = (
            x + rng.gen_range(-1.0..1.0) / 2.0,
            y + rng.gen_range(-1.0..1.0) / 2.0,
        );
        layer.fill_circle(center, size, with_alpha(palette::FOREST, alpha as u8));
    }

    /// Short wave strokes along the top of a sea cell, a light crest over a
    /// faint shadow.
    fn ripples<R: Rng>(layer: &mut Layer, x: f64, y: f64, cell: f64, rng: &mut R) {
        for l in (0..cell.max(0.0) as usize).step_by(RIPPLE_STEP) {
            let l = l as f64;
            let offset = rng.gen_range(0.0..RIPPLE_REACH);
            layer.line(
                (x - offset, y + (l * 8.0).sin()),
                (x + offset, y + (l * 4.0).cos()),
                palette::RIPPLE_LIGHT,
            );
            layer.line(
                (x - offset, y - (l * 8.0).sin()),
                (x + offset, y - (l * 4.0).cos()),
                palette::RIPPLE_SHADOW,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DetailLevel, RngStream};
    use image::Rgba;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn small_config(seed: u64) -> GenerationConfig {
        GenerationConfig::builder(seed)
            .map_size(160)
            .map_resolution(20)
            .sea_level(0.6)
            .island_level(1.0)
            .detail_level(DetailLevel::Normal)
            .build()
            .unwrap()
    }

    #[test]
    fn test_cells_inside_margins() {
        let config = GenerationConfig::from_master_seed(1);
        assert_eq!(TerrainRenderer::cells_per_axis(&config), 162);
        assert_eq!(TerrainRenderer::cell_origin(&config, 0), 0.05);
        let last = TerrainRenderer::cell_origin(&config, 161);
        assert!(last < 0.95);

        let small = small_config(1);
        assert_eq!(TerrainRenderer::cells_per_axis(&small), 18);
    }

    #[test]
    fn test_render_is_reproducible() {
        let config = small_config(21);
        let field = NoiseField::new(&config);

        let mut a = Layer::new(config.map_size());
        let mut b = Layer::new(config.map_size());
        let grid_a = TerrainRenderer::render(&config, &field, &mut a, &mut config.rng(RngStream::Terrain));
        let grid_b = TerrainRenderer::render(&config, &field, &mut b, &mut config.rng(RngStream::Terrain));

        assert_eq!(grid_a, grid_b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_render_matches_classification() {
        let config = small_config(3);
        let field = NoiseField::new(&config);
        let mut layer = Layer::new(config.map_size());
        let grid = TerrainRenderer::render(&config, &field, &mut layer, &mut config.rng(RngStream::Terrain));

        assert_eq!(grid, TerrainRenderer::classify(&config, &field));
        assert_eq!(grid.classes().len(), 18 * 18);
        assert_eq!(grid.get(0, 0), Some(field.classify(0.05, 0.05)));
        assert_eq!(grid.get(18, 0), None);
    }

    #[test]
    fn test_margins_stay_clear() {
        let config = small_config(9);
        let field = NoiseField::new(&config);
        let mut layer = Layer::new(config.map_size());
        TerrainRenderer::render(&config, &field, &mut layer, &mut config.rng(RngStream::Terrain));

        // Textures may spill a few pixels past the grid; the corners stay empty
        assert_eq!(layer.image().get_pixel(0, 0)[3], 0);
        assert_eq!(layer.image().get_pixel(159, 159)[3], 0);
        // Cell interiors are painted
        assert!(layer.image().get_pixel(80, 80)[3] > 0);
    }

    fn textured(raw: f64) -> Layer {
        let mut layer = Layer::new(40);
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        TerrainRenderer::texture(&mut layer, TerrainClass::from_raw(raw), (20.0, 20.0), 8.0, &mut rng);
        layer
    }

    fn painted_rows(layer: &Layer) -> Vec<u32> {
        let mut rows: Vec<u32> = layer.image().enumerate_pixels().filter(|(_, _, p)| p[3] > 0).map(|(_, y, _)| y).collect();
        rows.dedup();
        rows
    }

    fn is_stipple_dot(pixel: &Rgba<u8>) -> bool {
        pixel.0[0..3] == [0, 0, 0] && pixel[3].abs_diff(palette::STIPPLE_DARK[3]) <= 1
    }

    fn has_crest(layer: &Layer) -> bool {
        layer.image().pixels().any(|p| p[3] > 0 && p[0] > 200)
    }

    #[test]
    fn test_land_outside_forest_band_is_stippled_only() {
        // 2.5 is land with a fractional part above the forest band
        let layer = textured(2.5);
        assert!(is_stipple_dot(layer.image().get_pixel(20, 20)));
        assert!(is_stipple_dot(layer.image().get_pixel(20, 24)));
        assert!(painted_rows(&layer).iter().any(|&y| y >= 24));
        assert!(!has_crest(&layer));
    }

    #[test]
    fn test_forest_band_adds_clump_over_stipple() {
        let layer = textured(3.1);
        let corner = layer.image().get_pixel(20, 20);
        assert!(!is_stipple_dot(corner));
        assert!(corner[3] > palette::STIPPLE_DARK[3]);
        assert!(painted_rows(&layer).iter().any(|&y| y >= 24));
        assert!(!has_crest(&layer));
    }

    #[test]
    fn test_sea_gets_ripples_along_cell_top_only() {
        for raw in [0.0, 1.7, 2.0] {
            let layer = textured(raw);
            assert!(has_crest(&layer));
            let rows = painted_rows(&layer);
            assert!(rows.iter().all(|&y| (18..=22).contains(&y)), "rows {:?}", rows);
        }
    }

    #[test]
    fn test_render_textures_follow_grid_classes() {
        let config = small_config(3);
        let field = NoiseField::new(&config);
        let mut layer = Layer::new(config.map_size());
        let grid = TerrainRenderer::render(&config, &field, &mut layer, &mut config.rng(RngStream::Terrain));
        let scheme = config.color_scheme();

        let mut checked = 0;
        for col in 1..grid.cells_per_axis() - 1 {
            for row in 1..grid.cells_per_axis() - 1 {
                let class = grid.get(col, row).unwrap();
                let surrounded = (col - 1..=col + 1)
                    .flat_map(|c| (row - 1..=row + 1).map(move |r| (c, r)))
                    .all(|(c, r)| grid.get(c, r).map(|n| n.is_land()) == Some(class.is_land()));
                if !surrounded {
                    continue;
                }
                let x = config.px(TerrainRenderer::cell_origin(&config, col)) as u32;
                let y = config.px(TerrainRenderer::cell_origin(&config, row)) as u32;
                let base = scheme.terrain_color(class.index());
                let middle = [*layer.image().get_pixel(x + 4, y + 4), *layer.image().get_pixel(x + 4, y + 5)];
                if class.is_land() {
                    // Stipple lands on one of these rows depending on jitter
                    assert!(middle.iter().any(|p| *p != base), "land cell ({}, {}) is bare", col, row);
                } else {
                    // Ripples stay on the cell's top edge
                    assert_eq!(middle, [base, base], "sea cell ({}, {}) is textured inside", col, row);
                }
                checked += 1;
            }
        }
        assert!(checked > 0);
    }

    #[test]
    fn test_grid_count() {
        let config = small_config(4);
        let grid = TerrainRenderer::classify(&config, &NoiseField::new(&config));
        let land = grid.count(|c| c.is_land());
        let sea = grid.count(|c| !c.is_land());
        assert_eq!(land + sea, grid.classes().len());
    }
}
