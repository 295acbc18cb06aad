//! Procedural fantasy maps.
//!
//! A [`GenerationConfig`] derived from a master seed drives a [`MapPipeline`]
//! that draws the terrain, landmarks and two border variants onto separate
//! layers. A [`Session`] then composites those layers for display and export.

pub mod border;
pub mod compositor;
pub mod config;
pub mod error;
pub mod glyphs;
pub mod landmarks;
pub mod layer;
pub mod lettering;
pub mod names;
pub mod noise_field;
pub mod palette;
pub mod pipeline;
pub mod scenarios;
pub mod session;
pub mod terrain;

pub use compositor::{DisplayState, MapLayers, Viewport};
pub use config::{DetailLevel, Features, GenerationConfig, GenerationConfigBuilder};
pub use error::MapError;
pub use landmarks::Landmark;
pub use lettering::{BlockLettering, FontLettering, Lettering};
pub use names::{AllocatedName, LandmarkKind, NameBank};
pub use noise_field::{NoiseField, TerrainClass};
pub use pipeline::{FantasyMap, MapPipeline, Stage, StageProgress, Typefaces};
pub use session::{Command, Session};
