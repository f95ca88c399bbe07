use crate::foundation::error::{BlendError, BlendResult};

/// Number of pixels processed per step by the wide kernel.
///
/// Sixteen RGBA8 pixels fill one 512-bit register. Image storage is allocated in blocks of this
/// many pixels so that every image base address is aligned to [`BLOCK_BYTES`].
pub const BLOCK_PIXELS: usize = 16;

/// Bytes per wide block.
pub const BLOCK_BYTES: usize = BLOCK_PIXELS * 4;

/// One straight-alpha RGBA8 pixel. Layout is fixed: red, green, blue, alpha, no padding.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    bytemuck::Pod,
    bytemuck::Zeroable,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(from = "[u8; 4]", into = "[u8; 4]")]
#[repr(C)]
pub struct Pixel {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
    /// Coverage of a foreground pixel. Never rewritten on a background pixel.
    pub alpha: u8,
}

impl Pixel {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Construct a pixel from its four channels.
    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Channels in memory order.
    pub const fn to_array(self) -> [u8; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }

    /// Same color with `alpha` replaced.
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self { alpha, ..self }
    }
}

impl From<[u8; 4]> for Pixel {
    fn from(v: [u8; 4]) -> Self {
        Self::rgba(v[0], v[1], v[2], v[3])
    }
}

impl From<Pixel> for [u8; 4] {
    fn from(p: Pixel) -> Self {
        p.to_array()
    }
}

/// Integer pixel coordinate in an image's space.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Position {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

impl Position {
    /// Construct a position.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C, align(64))]
struct PixelBlock([Pixel; BLOCK_PIXELS]);

/// Row-major RGBA8 image with a 64-byte aligned base address and no row padding.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelImage {
    width: u32,
    height: u32,
    len: usize,
    blocks: Vec<PixelBlock>,
}

impl PixelImage {
    /// Zero-filled (transparent black) image.
    pub fn new(width: u32, height: u32) -> BlendResult<Self> {
        Self::filled(width, height, Pixel::TRANSPARENT)
    }

    /// Image with every pixel set to `pixel`.
    pub fn filled(width: u32, height: u32, pixel: Pixel) -> BlendResult<Self> {
        let len = pixel_count(width, height)?;
        let mut blocks = vec![PixelBlock([pixel; BLOCK_PIXELS]); len.div_ceil(BLOCK_PIXELS)];
        // Padding past `len` stays zeroed so equality only depends on visible pixels.
        let flat: &mut [Pixel] = bytemuck::cast_slice_mut(&mut blocks);
        flat[len..].fill(Pixel::TRANSPARENT);
        Ok(Self {
            width,
            height,
            len,
            blocks,
        })
    }

    /// Copy `pixels` (row-major, `width * height` entries) into a new image.
    pub fn from_pixels(width: u32, height: u32, pixels: &[Pixel]) -> BlendResult<Self> {
        let mut out = Self::new(width, height)?;
        if pixels.len() != out.len {
            return Err(BlendError::invalid_argument(format!(
                "pixel buffer holds {} pixels, expected {}x{} = {}",
                pixels.len(),
                width,
                height,
                out.len
            )));
        }
        out.pixels_mut().copy_from_slice(pixels);
        Ok(out)
    }

    /// Copy tightly packed RGBA8 bytes into a new image.
    pub fn from_rgba8(width: u32, height: u32, rgba: &[u8]) -> BlendResult<Self> {
        if !rgba.len().is_multiple_of(4) {
            return Err(BlendError::invalid_argument(format!(
                "rgba8 buffer length {} is not a multiple of 4",
                rgba.len()
            )));
        }
        Self::from_pixels(width, height, bytemuck::cast_slice(rgba))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[Pixel] {
        &bytemuck::cast_slice::<PixelBlock, Pixel>(&self.blocks)[..self.len]
    }

    /// All pixels, row-major, mutable.
    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        let len = self.len;
        &mut bytemuck::cast_slice_mut::<PixelBlock, Pixel>(&mut self.blocks)[..len]
    }

    /// Pixels of row `y`.
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: u32) -> &[Pixel] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.pixels()[start..start + w]
    }

    /// Pixels of row `y`, mutable.
    ///
    /// Panics if `y >= height`.
    pub fn row_mut(&mut self, y: u32) -> &mut [Pixel] {
        let w = self.width as usize;
        let start = y as usize * w;
        &mut self.pixels_mut()[start..start + w]
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    pub fn get(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels()[y as usize * self.width as usize + x as usize])
    }

    /// Tightly packed RGBA8 bytes.
    pub fn as_rgba8(&self) -> &[u8] {
        bytemuck::cast_slice(self.pixels())
    }

    /// Owned copy of the RGBA8 bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.as_rgba8().to_vec()
    }
}

impl std::fmt::Debug for PixelImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// A foreground image together with its offset into a background's coordinate space.
#[derive(Clone, Copy, Debug)]
pub struct PlacedImage<'a> {
    /// Foreground pixels.
    pub image: &'a PixelImage,
    /// Top-left corner inside the background.
    pub pos: Position,
}

impl<'a> PlacedImage<'a> {
    /// Place `image` with its top-left corner at `pos`.
    pub fn new(image: &'a PixelImage, pos: Position) -> Self {
        Self { image, pos }
    }

    /// Foreground width.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Foreground height.
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

fn pixel_count(width: u32, height: u32) -> BlendResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .filter(|n| n.checked_mul(4).is_some())
        .ok_or_else(|| {
            BlendError::invalid_argument(format!("image size {width}x{height} overflows"))
        })
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
