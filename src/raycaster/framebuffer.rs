use image::{Rgba, RgbaImage};

/// CPU-side RGBA8 render target at the internal resolution.
///
/// All writes are clipped; out-of-bounds coordinates are ignored.
#[derive(Clone, Debug)]
pub struct Framebuffer {
    image: RgbaImage,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { image: RgbaImage::new(width, height) }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn clear(&mut self, color: Rgba<u8>) {
        for p in self.image.pixels_mut() {
            *p = color;
        }
    }

    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba<u8>) {
        if x < 0 || y < 0 || x >= self.width() as i32 || y >= self.height() as i32 {
            return;
        }
        self.image.put_pixel(x as u32, y as u32, color);
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.image.get_pixel_checked(x, y).copied()
    }

    /// Tightly packed RGBA8 rows, ready for a texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// Scale the colour channels of `color` by `brightness` (clamped to `[0, 1]`).
/// Alpha is kept.
#[inline]
pub fn shade(color: Rgba<u8>, brightness: f32) -> Rgba<u8> {
    let b = brightness.clamp(0.0, 1.0);
    let Rgba([r, g, bl, a]) = color;
    Rgba([
        (r as f32 * b) as u8,
        (g as f32 * b) as u8,
        (bl as f32 * b) as u8,
        a,
    ])
}
