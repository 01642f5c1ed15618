// =============================================================================
// TEXTURES — Named RGBA images and the tile atlas the casters sample from
// =============================================================================

use std::collections::HashMap;
use std::path::Path;

use image::{Rgba, RgbaImage};
use log::{info, warn};

use crate::error::{EngineError, Result};

// ── TextureHandle ─────────────────────────────────────────────────────────────

/// Stable reference to an image in a [`TextureStore`].
///
/// Handles are never reused; a removed texture leaves its handle dangling and
/// every lookup through it returns `None`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(u32);

impl TextureHandle {
    pub fn index(self) -> u32 {
        self.0
    }
}

// ── TextureStore ──────────────────────────────────────────────────────────────

#[derive(Default, Clone, Debug)]
pub struct TextureStore {
    images: Vec<Option<RgbaImage>>,
    names: HashMap<String, TextureHandle>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `image` under `name`. Re-inserting a name replaces the image
    /// but keeps the existing handle.
    pub fn insert(&mut self, name: impl Into<String>, image: RgbaImage) -> TextureHandle {
        let name = name.into();
        if let Some(&handle) = self.names.get(&name) {
            self.images[handle.0 as usize] = Some(image);
            return handle;
        }
        let handle = TextureHandle(self.images.len() as u32);
        self.images.push(Some(image));
        self.names.insert(name, handle);
        handle
    }

    /// Decode the image at `path` and register it under `name`.
    ///
    /// # Errors
    /// [`EngineError::Image`] if the file cannot be read or decoded.
    pub fn load(&mut self, name: impl Into<String>, path: impl AsRef<Path>) -> Result<TextureHandle> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| EngineError::Image { path: path.to_path_buf(), source })?
            .to_rgba8();
        Ok(self.insert(name, image))
    }

    /// Recursively load every `.png` under `dir`, named by file stem.
    ///
    /// Names already present are skipped with a warning, so explicitly loaded
    /// textures win over folder contents. Returns how many were added.
    pub fn load_folder(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        let mut added = 0;

        for entry in walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let file_path = entry.path();
            if file_path.extension().and_then(|s| s.to_str()) != Some("png") {
                continue;
            }
            let name = match file_path.file_stem().and_then(|s| s.to_str()) {
                Some(n) if !n.is_empty() => n.to_string(),
                _ => continue,
            };
            if self.names.contains_key(&name) {
                warn!("texture '{name}' from {file_path:?} already loaded; skipping");
                continue;
            }
            self.load(name, file_path)?;
            added += 1;
        }

        info!("loaded {added} textures from {dir:?}");
        Ok(added)
    }

    pub fn handle(&self, name: &str) -> Option<TextureHandle> {
        self.names.get(name).copied()
    }

    /// Handle for `name`, or [`EngineError::TextureNotFound`].
    pub fn require(&self, name: &str) -> Result<TextureHandle> {
        self.handle(name)
            .ok_or_else(|| EngineError::TextureNotFound(name.to_string()))
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&RgbaImage> {
        self.images.get(handle.0 as usize).and_then(Option::as_ref)
    }

    pub fn by_name(&self, name: &str) -> Option<&RgbaImage> {
        self.handle(name).and_then(|h| self.get(h))
    }

    /// Drop the image registered under `name`. Returns `false` if unknown.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.names.remove(name) {
            Some(handle) => {
                self.images[handle.0 as usize] = None;
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Number of live textures.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }
}

// ── TileAtlas ─────────────────────────────────────────────────────────────────

/// Square tiles of `tile_size` pixels laid out row-major in one image.
///
/// Tile id `n` lives at column `n % cols`, row `n / cols`.
#[derive(Clone, Debug)]
pub struct TileAtlas {
    image: RgbaImage,
    tile_size: u32,
    cols: u32,
    rows: u32,
}

impl TileAtlas {
    /// # Errors
    /// - [`EngineError::InvalidTileSize`] unless `tile_size` is a non-zero
    ///   power of two (the casters wrap texel coordinates with a mask).
    /// - [`EngineError::AtlasLayout`] if the image width is not a multiple of
    ///   `tile_size`.
    pub fn new(image: RgbaImage, tile_size: u32) -> Result<Self> {
        if !tile_size.is_power_of_two() {
            return Err(EngineError::InvalidTileSize(tile_size));
        }
        if image.width() == 0 || image.width() % tile_size != 0 {
            return Err(EngineError::AtlasLayout { width: image.width(), tile_size });
        }
        let cols = image.width() / tile_size;
        let rows = image.height() / tile_size;
        Ok(Self { image, tile_size, cols, rows })
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Number of complete tiles in the image.
    pub fn tile_count(&self) -> u32 {
        self.cols * self.rows
    }

    /// Texel `(u, v)` of tile `tile`; coordinates wrap into the tile.
    /// `None` for tile ids past the end of the atlas.
    #[inline]
    pub fn texel(&self, tile: u32, u: u32, v: u32) -> Option<Rgba<u8>> {
        if tile >= self.tile_count() {
            return None;
        }
        let mask = self.tile_size - 1;
        let x = (tile % self.cols) * self.tile_size + (u & mask);
        let y = (tile / self.cols) * self.tile_size + (v & mask);
        Some(*self.image.get_pixel(x, y))
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, c: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(c))
    }

    #[test]
    fn insert_same_name_keeps_handle() {
        let mut store = TextureStore::new();
        let a = store.insert("lamp", solid(2, 2, [1, 2, 3, 255]));
        let b = store.insert("lamp", solid(4, 4, [9, 9, 9, 255]));
        assert_eq!(a, b);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(a).map(|i| i.width()), Some(4));
    }

    #[test]
    fn removed_handle_resolves_to_none() {
        let mut store = TextureStore::new();
        let h = store.insert("mask", solid(1, 1, [0; 4]));
        assert!(store.remove("mask"));
        assert!(!store.remove("mask"));
        assert!(store.get(h).is_none());
        assert!(matches!(store.require("mask"), Err(EngineError::TextureNotFound(_))));
    }

    #[test]
    fn atlas_rejects_non_power_of_two_tiles() {
        let err = TileAtlas::new(solid(48, 24, [0; 4]), 24).unwrap_err();
        assert!(matches!(err, EngineError::InvalidTileSize(24)));
    }

    #[test]
    fn atlas_rejects_ragged_width() {
        let err = TileAtlas::new(solid(40, 32, [0; 4]), 32).unwrap_err();
        assert!(matches!(err, EngineError::AtlasLayout { width: 40, tile_size: 32 }));
    }

    #[test]
    fn texel_addresses_row_major_tiles_and_wraps() {
        let mut img = solid(8, 8, [0, 0, 0, 255]);
        // Tile 3 is the bottom-right 4×4 block of a 2×2 layout.
        img.put_pixel(5, 6, Rgba([200, 0, 0, 255]));
        let atlas = TileAtlas::new(img, 4).unwrap();
        assert_eq!(atlas.tile_count(), 4);
        assert_eq!(atlas.texel(3, 1, 2), Some(Rgba([200, 0, 0, 255])));
        assert_eq!(atlas.texel(3, 5, 6), Some(Rgba([200, 0, 0, 255])));
        assert_eq!(atlas.texel(4, 0, 0), None);
    }
}
