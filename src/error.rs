use std::path::PathBuf;

use crate::map::LayerKind;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Coarse grouping of [`EngineError`] variants.
///
/// Configuration and lookup failures at load time are fatal; range errors are
/// rejected before any cell is touched.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Lookup,
    Range,
    Platform,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    // ── Configuration ────────────────────────────────────────────────────
    #[error("{layer} layer has {actual} cells, expected {expected}")]
    SizeMismatch {
        layer: LayerKind,
        expected: usize,
        actual: usize,
    },

    #[error("atlas width {width}px is not a multiple of the {tile_size}px tile size")]
    AtlasLayout { width: u32, tile_size: u32 },

    #[error("tile size {0} must be a non-zero power of two")]
    InvalidTileSize(u32),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {path:?}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to parse {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    // ── Lookup ───────────────────────────────────────────────────────────
    #[error("texture '{0}' not found")]
    TextureNotFound(String),

    #[error("level layer '{0}' not found")]
    LayerNotFound(String),

    // ── Range ────────────────────────────────────────────────────────────
    #[error("light index {index} out of range for a grid of {len} cells")]
    LightIndexOutOfRange { index: usize, len: usize },

    // ── Platform ─────────────────────────────────────────────────────────
    #[error("display error: {0}")]
    Display(String),

    #[error("failed to spawn simulation thread: {0}")]
    Thread(#[source] std::io::Error),
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::SizeMismatch { .. }
            | EngineError::AtlasLayout { .. }
            | EngineError::InvalidTileSize(_)
            | EngineError::Io { .. }
            | EngineError::Image { .. }
            | EngineError::Json { .. } => ErrorKind::Configuration,
            EngineError::TextureNotFound(_) | EngineError::LayerNotFound(_) => ErrorKind::Lookup,
            EngineError::LightIndexOutOfRange { .. } => ErrorKind::Range,
            EngineError::Display(_) | EngineError::Thread(_) => ErrorKind::Platform,
        }
    }
}
