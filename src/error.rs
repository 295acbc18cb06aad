use std::path::PathBuf;

/// Errors raised while configuring, generating or exporting a map.
#[derive(Debug)]
pub enum MapError {
    /// Builder input that cannot produce a valid grid
    InvalidConfig(String),
    /// A font file could not be read
    FontLoad { path: PathBuf, source: std::io::Error },
    /// A font file was read but is not a usable font
    FontParse { path: PathBuf },
    /// Encoding or writing the exported image failed
    Export(image::ImageError),
    Io(std::io::Error),
}

impl From<image::ImageError> for MapError {
    fn from(err: image::ImageError) -> Self {
        Self::Export(err)
    }
}

impl From<std::io::Error> for MapError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            Self::FontLoad { path, source } => {
                write!(f, "Failed to load font {}: {}", path.display(), source)
            }
            Self::FontParse { path } => {
                write!(f, "File {} is not a usable TrueType/OpenType font", path.display())
            }
            Self::Export(e) => write!(f, "Failed to export map: {}", e),
            Self::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FontLoad { source, .. } => Some(source),
            Self::Export(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mentions_path() {
        let err = MapError::FontParse { path: PathBuf::from("fonts/missing.ttf") };
        assert!(err.to_string().contains("fonts/missing.ttf"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: MapError = io.into();
        assert!(matches!(err, MapError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
