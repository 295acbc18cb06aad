use crate::config::GenerationConfig;
use crate::layer::{Layer, Rotation, Shadow};
use crate::lettering::{stamp_text, Align, Lettering, TextStyle};
use crate::palette::{self, rgba, with_alpha};

/// Shadow cast by the frame onto the map beneath it, shifted along x only.
pub const BORDER_SHADOW: Shadow = Shadow {
    offset: (8, 0),
    blur: 32.0,
    color: rgba(0x000000, 255),
};

/// Measurements below are fractions of the map side. The title strip and
/// lettering were laid out on a 1440 px map and scale with it.
const REFERENCE_SIZE: f64 = 1440.0;
const CREAM_WEIGHT: f64 = 0.12;
const STRIP_OFFSET: f64 = 112.0 / REFERENCE_SIZE;
const STRIP_HEIGHT: f64 = 16.0 / REFERENCE_SIZE;
const RULE_WEIGHT: f64 = 0.003;
const RULE_INSET: f64 = 0.06;
const RULE_WIDTH: f64 = 0.88;
const NAMED_RULE_HEIGHT: f64 = 0.80;
const SHADE_WEIGHT: f64 = 0.07;
const SHADE_ALPHA: u8 = 42;
const EDGE_WEIGHT: f64 = 0.05;
const TITLE_SIZE: f64 = 48.0 / REFERENCE_SIZE;
const TITLE_OFFSET: f64 = 134.0 / REFERENCE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
    /// Frame with a widened bottom edge carrying the map title
    Named,
    Unnamed,
}

pub struct BorderRenderer<'a> {
    config: &'a GenerationConfig,
    lettering: &'a dyn Lettering,
}

impl<'a> BorderRenderer<'a> {
    pub fn new(config: &'a GenerationConfig, lettering: &'a dyn Lettering) -> Self {
        BorderRenderer { config, lettering }
    }

    pub fn render(&self, style: BorderStyle) -> Layer {
        let size = self.config.map_size() as f64;
        let px = |fraction: f64| fraction * size;
        let rotation = Rotation::about((size / 2.0, size / 2.0), self.config.rotation());
        let mut layer = Layer::new(self.config.map_size());

        let frame = (0.0, 0.0, size, size);
        layer.stroke_rect(frame, px(CREAM_WEIGHT), palette::BORDER_CREAM, &rotation);

        // Unnamed maps push the strip off the bottom edge under the outer bands
        let strip_top = match style {
            BorderStyle::Named => size - px(STRIP_OFFSET),
            BorderStyle::Unnamed => size,
        };
        layer.stroke_rect(
            (0.0, strip_top, size, px(STRIP_HEIGHT)),
            px(CREAM_WEIGHT),
            palette::BORDER_CREAM,
            &rotation,
        );

        let rule_height = match style {
            BorderStyle::Named => NAMED_RULE_HEIGHT,
            BorderStyle::Unnamed => RULE_WIDTH,
        };
        layer.stroke_rect(
            (px(RULE_INSET), px(RULE_INSET), px(RULE_WIDTH), px(rule_height)),
            px(RULE_WEIGHT),
            palette::INK,
            &rotation,
        );

        layer.stroke_rect(frame, px(SHADE_WEIGHT), with_alpha(palette::INK, SHADE_ALPHA), &rotation);
        layer.stroke_rect(frame, px(EDGE_WEIGHT), palette::INK, &rotation);

        if style == BorderStyle::Named {
            let title = TextStyle {
                size: px(TITLE_SIZE) as f32,
                fill: palette::INK,
                outline: None,
            };
            stamp_text(
                &mut layer,
                self.lettering,
                self.config.title(),
                &title,
                (size / 2.0, size - px(TITLE_OFFSET)),
                Align::Center,
                &rotation,
            );
        }

        layer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lettering::BlockLettering;

    fn config() -> GenerationConfig {
        GenerationConfig::builder(8).map_size(400).map_resolution(50).build().unwrap()
    }

    #[test]
    fn test_border_shadow_shifts_horizontally() {
        let mut layer = Layer::new(200);
        layer.fill_rect(90.0, 90.0, 20.0, 20.0, palette::INK);
        let shadowed = layer.with_shadow(&BORDER_SHADOW);
        let alpha = |x, y| shadowed.image().get_pixel(x, y)[3];

        assert!(alpha(120, 100) > alpha(80, 100));
        assert!(alpha(100, 80).abs_diff(alpha(100, 119)) <= 2);
    }

    #[test]
    fn test_frame_edges_are_black_and_centre_clear() {
        let config = config();
        let layer = BorderRenderer::new(&config, &BlockLettering).render(BorderStyle::Unnamed);

        assert_eq!(*layer.image().get_pixel(2, 2), palette::INK);
        assert_eq!(*layer.image().get_pixel(397, 397), palette::INK);
        assert_eq!(layer.image().get_pixel(200, 200)[3], 0);
    }

    #[test]
    fn test_named_border_carries_title_strip() {
        let config = config();
        let renderer = BorderRenderer::new(&config, &BlockLettering);
        let named = renderer.render(BorderStyle::Named);
        let unnamed = renderer.render(BorderStyle::Unnamed);

        assert!(named.image().get_pixel(200, 363)[3] > 0);
        assert_eq!(unnamed.image().get_pixel(200, 363)[3], 0);
        assert_ne!(named, unnamed);
    }

    #[test]
    fn test_render_is_deterministic() {
        let config = config();
        let renderer = BorderRenderer::new(&config, &BlockLettering);
        assert_eq!(renderer.render(BorderStyle::Named), renderer.render(BorderStyle::Named));
    }
}
