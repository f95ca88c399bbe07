//! Block compositing: 16 pixels per step, scalar tail.
//!
//! Per block, each half (8 pixels) is widened to 16-bit lanes next to the foreground alpha
//! broadcast over its pixel's four lanes. Every lane is weighted, summed and shifted down, then
//! the halves are narrowed and rejoined. A final select keeps the background's alpha bytes and
//! every pixel under a fully transparent foreground.
//!
//! Entry points pick a [`Level`] once per call and run the whole region under it.

use fearless_simd::dispatch;
use fearless_simd::*;

use crate::blend::lanes::{
    PixelBlockExt, alpha_byte_mask, load_block, narrow_halves, store_block, widen_halves,
};
use crate::blend::{check_placement, for_each_row, scalar};
use crate::foundation::core::{BLOCK_PIXELS, Pixel, PixelImage, PlacedImage};
use crate::foundation::error::BlendResult;

/// Blend a block of foreground pixels onto a block of background pixels in place.
///
/// Produces exactly what [`scalar::combine`] produces for each pixel pair. Detects the SIMD
/// level on every call; whole rows should go through [`blend_region`].
#[inline]
pub fn combine_block(bg: &mut [Pixel; BLOCK_PIXELS], fg: &[Pixel; BLOCK_PIXELS]) {
    dispatch!(Level::new(), simd => {
        let out = blend_block(simd, load_block(simd, bg), load_block(simd, fg));
        store_block(out, bg);
    });
}

#[inline(always)]
pub(crate) fn blend_block<S: Simd>(simd: S, bg: u8x64<S>, fg: u8x64<S>) -> u8x64<S> {
    let alpha = fg.splat_alpha();
    let (bg_lo, bg_hi) = widen_halves(simd, bg);
    let (fg_lo, fg_hi) = widen_halves(simd, fg);
    let (alpha_lo, alpha_hi) = widen_halves(simd, alpha);

    let mixed = narrow_halves(
        simd,
        mix_half(bg_lo, fg_lo, alpha_lo),
        mix_half(bg_hi, fg_hi, alpha_hi),
    );

    let keep = alpha_byte_mask(simd).or(alpha.simd_eq(0u8));
    keep.select(bg, mixed)
}

#[inline(always)]
fn mix_half<S: Simd>(bg: u16x32<S>, fg: u16x32<S>, alpha: u16x32<S>) -> u16x32<S> {
    // At most 255 * 255 per lane.
    (bg * (255 - alpha) + fg * alpha).shr(8)
}

/// Blend two equally long rows: whole blocks first, then the remainder pixel by pixel.
#[inline(always)]
pub(crate) fn blend_row<S: Simd>(simd: S, bg_row: &mut [Pixel], fg_row: &[Pixel]) {
    let (bg_blocks, bg_tail) = bg_row.as_chunks_mut::<BLOCK_PIXELS>();
    let (fg_blocks, fg_tail) = fg_row.as_chunks::<BLOCK_PIXELS>();
    for (bg, fg) in bg_blocks.iter_mut().zip(fg_blocks) {
        let out = blend_block(simd, load_block(simd, bg), load_block(simd, fg));
        store_block(out, bg);
    }
    scalar::blend_row(bg_tail, fg_tail);
}

/// Composite `foreground` onto `background` a block at a time, at the best level this CPU has.
///
/// Same contract and same bytes as [`scalar::blend_region`]. Any foreground width is accepted;
/// pixels past the last whole block of a row go through the scalar path.
pub fn blend_region(background: &mut PixelImage, foreground: &PlacedImage<'_>) -> BlendResult<()> {
    blend_region_with_level(Level::new(), background, foreground)
}

/// [`blend_region`] pinned to `level`.
#[tracing::instrument(
    level = "trace",
    skip_all,
    fields(
        x = foreground.pos.x,
        y = foreground.pos.y,
        w = foreground.width(),
        h = foreground.height(),
        simd = ?level
    )
)]
pub fn blend_region_with_level(
    level: Level,
    background: &mut PixelImage,
    foreground: &PlacedImage<'_>,
) -> BlendResult<()> {
    check_placement(background, foreground)?;
    dispatch!(level, simd => {
        for_each_row(background, foreground, |bg, fg| blend_row(simd, bg, fg));
    });
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/blend/wide.rs"]
mod tests;
