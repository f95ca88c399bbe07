//! Lane helpers for the wide kernel, on top of `fearless_simd`.
//!
//! A block of [`BLOCK_PIXELS`] packed RGBA8 pixels is one `u8x64`. The blend splits it into two
//! halves of eight pixels and widens each half to `u16x32`, so every channel product has room
//! for 16 bits. The halo evaluates one `f32x16` lane per pixel and merges its alpha back into a
//! block through `u32x16` lanes, one per pixel.
//!
//! The constant tables are built by `const fn` from [`BLOCK_PIXELS`] and never change.

use fearless_simd::*;

use crate::foundation::core::{BLOCK_BYTES, BLOCK_PIXELS, Pixel};

const _: () = assert!(BLOCK_BYTES == 64, "a block is one u8x64");

/// Bit offset of the alpha byte inside a pixel read as a native-endian `u32`.
pub(crate) const ALPHA_SHIFT: u32 = if cfg!(target_endian = "little") { 24 } else { 0 };

/// `0xFF` on every alpha byte of a block, zero on red, green and blue.
pub(crate) const ALPHA_BYTES: [u8; BLOCK_BYTES] = alpha_byte_table();

/// Column of each pixel inside a block: `0.0, 1.0, ..., BLOCK_PIXELS - 1`.
pub(crate) const COLUMN_OFFSETS: [f32; BLOCK_PIXELS] = column_offset_table();

const fn alpha_byte_table() -> [u8; BLOCK_BYTES] {
    let mut t = [0u8; BLOCK_BYTES];
    let mut p = 0;
    while p < BLOCK_PIXELS {
        t[4 * p + 3] = u8::MAX;
        p += 1;
    }
    t
}

const fn column_offset_table() -> [f32; BLOCK_PIXELS] {
    let mut t = [0f32; BLOCK_PIXELS];
    let mut i = 0;
    while i < BLOCK_PIXELS {
        t[i] = i as f32;
        i += 1;
    }
    t
}

#[inline(always)]
pub(crate) fn load_block<S: Simd>(simd: S, pixels: &[Pixel; BLOCK_PIXELS]) -> u8x64<S> {
    let bytes: &[u8; BLOCK_BYTES] = bytemuck::cast_ref(pixels);
    u8x64::from_slice(simd, bytes)
}

#[inline(always)]
pub(crate) fn store_block<S: Simd>(block: u8x64<S>, pixels: &mut [Pixel; BLOCK_PIXELS]) {
    let bytes: &mut [u8; BLOCK_BYTES] = bytemuck::cast_mut(pixels);
    bytes.copy_from_slice(block.as_slice());
}

/// Every pixel of the block set to `pixel`.
#[inline(always)]
pub(crate) fn splat_pixel<S: Simd>(simd: S, pixel: Pixel) -> u8x64<S> {
    u32x16::splat(simd, u32::from_ne_bytes(pixel.to_array())).reinterpret_u8()
}

/// Mask selecting the alpha byte of every pixel.
#[inline(always)]
pub(crate) fn alpha_byte_mask<S: Simd>(simd: S) -> mask8x64<S> {
    u8x64::from_slice(simd, &ALPHA_BYTES).simd_eq(u8::MAX)
}

/// Split a block into its two halves, each zero-extended to 16 bits per channel.
#[inline(always)]
pub(crate) fn widen_halves<S: Simd>(simd: S, block: u8x64<S>) -> (u16x32<S>, u16x32<S>) {
    let (lo, hi) = simd.split_u8x64(block);
    (simd.widen_u8x32(lo), simd.widen_u8x32(hi))
}

/// Inverse of [`widen_halves`]: keep the low byte of every lane and rejoin the halves.
#[inline(always)]
pub(crate) fn narrow_halves<S: Simd>(simd: S, lo: u16x32<S>, hi: u16x32<S>) -> u8x64<S> {
    simd.combine_u8x32(simd.narrow_u16x32(lo), simd.narrow_u16x32(hi))
}

/// `start + COLUMN_OFFSETS`: one lane per pixel column of a block.
#[inline(always)]
pub(crate) fn column_ramp<S: Simd>(simd: S, start: f32) -> f32x16<S> {
    f32x16::from_slice(simd, &COLUMN_OFFSETS) + start
}

/// A block of `rgb` pixels whose alpha bytes are the low bytes of `alpha`, one lane per pixel.
///
/// `rgb` must have zero alpha bytes.
#[inline(always)]
pub(crate) fn with_alpha_lanes<S: Simd>(rgb: u32x16<S>, alpha: u32x16<S>) -> u8x64<S> {
    (((alpha & 0xFF_u32) << ALPHA_SHIFT) | rgb).reinterpret_u8()
}

/// Per-pixel operations on a block of packed RGBA8 pixels.
pub(crate) trait PixelBlockExt<S> {
    /// Copy each pixel's alpha byte into all four of its bytes.
    fn splat_alpha(self) -> Self;
}

impl<S: Simd> PixelBlockExt<S> for u8x64<S> {
    #[inline(always)]
    fn splat_alpha(self) -> Self {
        let alpha = self.reinterpret_u32().shr(ALPHA_SHIFT) & 0xFF_u32;
        (alpha * 0x0101_0101_u32).reinterpret_u8()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blend/lanes.rs"]
mod tests;
