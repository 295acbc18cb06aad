use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::compositor::{DisplayState, Viewport};
use crate::error::MapError;
use crate::pipeline::FantasyMap;

/// Largest preview allowed, as a multiple of the map size.
pub const MAX_VIEWPORT_SCALE: u32 = 4;

/// Runtime controls available once a map is generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ToggleLabels,
    ToggleName,
    Export(PathBuf),
    Resize(u32),
    Quit,
}

impl Command {
    /// Parses one line of interactive input: `l`, `n`, `s [path]`, `r <px>`
    /// or `q`. Exports without a path go to `default_export`.
    pub fn parse(line: &str, default_export: &Path) -> Option<Command> {
        let mut words = line.split_whitespace();
        let command = match words.next()?.to_ascii_lowercase().as_str() {
            "l" => Command::ToggleLabels,
            "n" => Command::ToggleName,
            "s" => Command::Export(words.next().map(PathBuf::from).unwrap_or_else(|| default_export.to_path_buf())),
            "r" => Command::Resize(words.next()?.parse().ok()?),
            "q" => Command::Quit,
            _ => return None,
        };
        if words.next().is_some() {
            return None;
        }
        Some(command)
    }
}

/// A generated map plus the viewer state around it. Nothing here changes the
/// map itself.
pub struct Session {
    map: FantasyMap,
    display: DisplayState,
    viewport: Viewport,
}

impl Session {
    pub fn new(map: FantasyMap, viewport: Viewport) -> Self {
        let display = map.config().initial_display();
        let largest = max_viewport(&map);
        let viewport = Viewport::new(viewport.size().min(largest));
        Session { map, display, viewport }
    }

    pub fn map(&self) -> &FantasyMap {
        &self.map
    }

    pub fn display(&self) -> DisplayState {
        self.display
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The current view at viewport size.
    pub fn frame(&self) -> RgbaImage {
        self.map.screen(self.display, self.viewport)
    }

    /// Saves the current view at full resolution.
    pub fn export(&self, path: &Path) -> Result<(), MapError> {
        self.map.export(self.display, path)
    }

    /// Applies a command. Returns `false` once the session should end.
    pub fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::ToggleLabels => self.display.toggle_labels(),
            Command::ToggleName => self.display.toggle_name(),
            Command::Export(path) => {
                if let Err(err) = self.export(&path) {
                    tracing::warn!(path = %path.display(), error = %err, "export failed");
                }
            }
            Command::Resize(size) if size > max_viewport(&self.map) => {
                tracing::warn!(size, largest = max_viewport(&self.map), "preview size refused");
            }
            Command::Resize(size) => self.viewport = Viewport::new(size),
            Command::Quit => return false,
        }
        tracing::debug!(display = ?self.display, viewport = self.viewport.size(), "session updated");
        true
    }
}

fn max_viewport(map: &FantasyMap) -> u32 {
    map.config().map_size().saturating_mul(MAX_VIEWPORT_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::lettering::BlockLettering;
    use crate::pipeline::Typefaces;

    fn session() -> Session {
        let config = GenerationConfig::builder(6)
            .map_size(160)
            .map_resolution(20)
            .display(DisplayState::default())
            .build()
            .unwrap();
        let map = FantasyMap::generate(&config, Typefaces::uniform(&BlockLettering));
        Session::new(map, Viewport::new(80))
    }

    #[test]
    fn test_parse_commands() {
        let fallback = Path::new("Map.png");
        assert_eq!(Command::parse("l", fallback), Some(Command::ToggleLabels));
        assert_eq!(Command::parse(" N ", fallback), Some(Command::ToggleName));
        assert_eq!(Command::parse("s", fallback), Some(Command::Export(PathBuf::from("Map.png"))));
        assert_eq!(Command::parse("s out.png", fallback), Some(Command::Export(PathBuf::from("out.png"))));
        assert_eq!(Command::parse("r 512", fallback), Some(Command::Resize(512)));
        assert_eq!(Command::parse("q", fallback), Some(Command::Quit));
        assert_eq!(Command::parse("r", fallback), None);
        assert_eq!(Command::parse("r big", fallback), None);
        assert_eq!(Command::parse("l extra", fallback), None);
        assert_eq!(Command::parse("", fallback), None);
        assert_eq!(Command::parse("x", fallback), None);
    }

    #[test]
    fn test_starts_with_configured_display() {
        let session = session();
        assert_eq!(session.display(), DisplayState::default());
        assert_eq!(session.frame().dimensions(), (80, 80));
    }

    #[test]
    fn test_toggles_and_resize() {
        let mut session = session();
        assert!(session.handle(Command::ToggleLabels));
        assert!(session.handle(Command::ToggleName));
        assert_eq!(session.display(), DisplayState { show_labels: true, show_name: true });

        assert!(session.handle(Command::Resize(40)));
        assert_eq!(session.frame().dimensions(), (40, 40));
        assert!(!session.handle(Command::Quit));
    }

    #[test]
    fn test_oversized_resize_is_refused() {
        let mut session = session();
        let command = Command::parse("r 4294967295", Path::new("Map.png")).unwrap();

        assert!(session.handle(command));
        assert_eq!(session.viewport().size(), 80);
        assert_eq!(session.frame().dimensions(), (80, 80));

        assert!(session.handle(Command::Resize(640)));
        assert_eq!(session.viewport().size(), 640);
        assert!(session.handle(Command::Resize(641)));
        assert_eq!(session.viewport().size(), 640);
    }

    #[test]
    fn test_initial_viewport_is_capped() {
        let config = GenerationConfig::builder(6).map_size(160).map_resolution(20).build().unwrap();
        let map = FantasyMap::generate(&config, Typefaces::uniform(&BlockLettering));
        let session = Session::new(map, Viewport::new(u32::MAX));
        assert_eq!(session.viewport().size(), 640);
    }

    #[test]
    fn test_toggle_name_only_touches_border_region() {
        let mut session = session();
        let before = session.map().composite(session.display());
        session.handle(Command::ToggleName);
        let after = session.map().composite(session.display());

        assert_ne!(before, after);
        // The top quarter of the frame is the same in both variants
        for y in 0..40 {
            for x in 0..160 {
                assert_eq!(before.get_pixel(x, y), after.get_pixel(x, y));
            }
        }
    }

    #[test]
    fn test_failed_export_keeps_state() {
        let mut session = session();
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("missing").join("map.png");
        let layers = session.map().layers().clone();

        assert!(session.export(&bad).is_err());
        assert!(session.handle(Command::Export(bad)));
        assert_eq!(session.map().layers(), &layers);
        assert_eq!(session.display(), DisplayState::default());
    }

    #[test]
    fn test_export_equals_native_frame() {
        let mut session = session();
        session.handle(Command::ToggleLabels);
        session.handle(Command::Resize(160));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");

        assert!(session.handle(Command::Export(path.clone())));
        let saved = image::open(&path).unwrap().to_rgba8();
        assert_eq!(saved, session.frame());
    }
}
