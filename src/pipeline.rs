//! Staged map generation.
//!
//! A map is drawn in four stages so a host can report progress between them.
//! Each stage reads from its own RNG stream, so running them one at a time or
//! all at once yields the same map.

use std::path::Path;
use std::time::Instant;

use image::RgbaImage;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::border::{BorderRenderer, BorderStyle, BORDER_SHADOW};
use crate::compositor::{self, DisplayState, MapLayers, Viewport};
use crate::config::{GenerationConfig, RngStream};
use crate::error::MapError;
use crate::glyphs::{GlyphStamper, PlacedGlyph};
use crate::landmarks::{Landmark, LandmarkPlacer};
use crate::layer::Layer;
use crate::lettering::Lettering;
use crate::noise_field::NoiseField;
use crate::scenarios::WAIT_MESSAGES;
use crate::terrain::{TerrainGrid, TerrainRenderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    NamedBorder,
    Border,
    Landmarks,
    /// Terrain colours, textures and glyphs
    Terrain,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::NamedBorder, Stage::Border, Stage::Landmarks, Stage::Terrain];

    pub fn label(self) -> &'static str {
        match self {
            Stage::NamedBorder => "named border",
            Stage::Border => "border",
            Stage::Landmarks => "landmarks",
            Stage::Terrain => "terrain",
        }
    }
}

/// Reported to the progress callback before a stage runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageProgress {
    pub stage: Stage,
    /// Zero-based position of the stage
    pub index: usize,
    pub total: usize,
    pub wait_message: &'static str,
}

/// Fonts used while drawing.
#[derive(Clone, Copy)]
pub struct Typefaces<'a> {
    pub title: &'a dyn Lettering,
    pub label: &'a dyn Lettering,
}

impl<'a> Typefaces<'a> {
    /// Uses one lettering for both roles.
    pub fn uniform(lettering: &'a dyn Lettering) -> Self {
        Typefaces { title: lettering, label: lettering }
    }
}

pub struct MapPipeline<'a> {
    config: &'a GenerationConfig,
    typefaces: Typefaces<'a>,
    field: NoiseField,
    wait_rng: ChaCha8Rng,
    completed: usize,
    layers: MapLayers,
    landmarks: Vec<Landmark>,
    terrain: TerrainGrid,
    glyphs: Vec<PlacedGlyph>,
}

impl<'a> MapPipeline<'a> {
    pub fn new(config: &'a GenerationConfig, typefaces: Typefaces<'a>) -> Self {
        let blank = Layer::new(config.map_size());
        MapPipeline {
            config,
            typefaces,
            field: NoiseField::new(config),
            wait_rng: config.rng(RngStream::WaitMessages),
            completed: 0,
            layers: MapLayers {
                terrain: blank.clone(),
                landmarks: blank.clone(),
                border: blank.clone(),
                named_border: blank,
            },
            landmarks: Vec::new(),
            terrain: TerrainGrid::default(),
            glyphs: Vec::new(),
        }
    }

    /// The stage `advance` will run next, or `None` once all have run.
    pub fn next_stage(&self) -> Option<Stage> {
        Stage::ALL.get(self.completed).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.next_stage().is_none()
    }

    /// Picks a message to show while the next stage runs.
    pub fn wait_message(&mut self) -> &'static str {
        WAIT_MESSAGES[self.wait_rng.gen_range(0..WAIT_MESSAGES.len())]
    }

    /// Runs the next stage and returns it.
    pub fn advance(&mut self) -> Option<Stage> {
        let stage = self.next_stage()?;
        let started = Instant::now();

        match stage {
            Stage::NamedBorder => self.layers.named_border = self.border(BorderStyle::Named),
            Stage::Border => self.layers.border = self.border(BorderStyle::Unnamed),
            Stage::Landmarks => {
                let placer = LandmarkPlacer::new(self.config, &self.field, self.typefaces.label);
                let (layer, landmarks) = placer.render(&mut self.config.rng(RngStream::Landmarks));
                self.layers.landmarks = layer;
                self.landmarks = landmarks;
            }
            Stage::Terrain => {
                let mut layer = Layer::new(self.config.map_size());
                self.terrain = TerrainRenderer::render(
                    self.config,
                    &self.field,
                    &mut layer,
                    &mut self.config.rng(RngStream::Terrain),
                );
                self.glyphs = GlyphStamper::stamp(self.config, &mut layer, &mut self.config.rng(RngStream::Glyphs));
                self.layers.terrain = layer;
            }
        }

        self.completed += 1;
        tracing::info!(
            stage = stage.label(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "stage complete"
        );
        Some(stage)
    }

    fn border(&self, style: BorderStyle) -> Layer {
        BorderRenderer::new(self.config, self.typefaces.title)
            .render(style)
            .with_shadow(&BORDER_SHADOW)
    }

    /// Runs the remaining stages, reporting each one before it starts.
    pub fn run(mut self, mut progress: impl FnMut(StageProgress)) -> FantasyMap {
        while let Some(stage) = self.next_stage() {
            let wait_message = self.wait_message();
            progress(StageProgress {
                stage,
                index: self.completed,
                total: Stage::ALL.len(),
                wait_message,
            });
            self.advance();
        }
        self.into_map()
    }

    /// Runs the remaining stages silently.
    pub fn finish(self) -> FantasyMap {
        self.run(|_| {})
    }

    fn into_map(self) -> FantasyMap {
        tracing::info!(
            title = self.config.title(),
            landmarks = self.landmarks.len(),
            glyphs = self.glyphs.len(),
            "map complete"
        );
        FantasyMap {
            config: self.config.clone(),
            layers: self.layers,
            landmarks: self.landmarks,
            terrain: self.terrain,
            glyphs: self.glyphs,
        }
    }
}

/// A fully generated map.
#[derive(Debug, Clone)]
pub struct FantasyMap {
    config: GenerationConfig,
    layers: MapLayers,
    landmarks: Vec<Landmark>,
    terrain: TerrainGrid,
    glyphs: Vec<PlacedGlyph>,
}

impl FantasyMap {
    pub fn generate(config: &GenerationConfig, typefaces: Typefaces<'_>) -> Self {
        MapPipeline::new(config, typefaces).finish()
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn layers(&self) -> &MapLayers {
        &self.layers
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn terrain(&self) -> &TerrainGrid {
        &self.terrain
    }

    pub fn glyphs(&self) -> &[PlacedGlyph] {
        &self.glyphs
    }

    pub fn composite(&self, display: DisplayState) -> RgbaImage {
        compositor::composite(&self.layers, display)
    }

    pub fn screen(&self, display: DisplayState, viewport: Viewport) -> RgbaImage {
        compositor::screen_composite(&self.layers, display, viewport)
    }

    pub fn export(&self, display: DisplayState, path: &Path) -> Result<(), MapError> {
        compositor::export(&self.layers, display, path)
    }
}
