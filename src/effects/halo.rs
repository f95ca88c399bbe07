//! Procedural circular glow.
//!
//! For a pixel at offset `(dx, dy)` from the center, `base = r² - (dx² + dy²)`. Pixels with a
//! negative base are outside the circle and never touched. Inside, the glow alpha is
//! `255 * base * (color.alpha / 255) / r²` for [`HaloFalloff::Normalized`], or the same value
//! without the `/ r²` for [`HaloFalloff::Unnormalized`]. The unnormalized value overshoots 255 and
//! is truncated to its low byte, which turns the falloff into concentric bands.

use fearless_simd::dispatch;
use fearless_simd::*;

use crate::blend::lanes::{column_ramp, load_block, splat_pixel, store_block, with_alpha_lanes};
use crate::blend::{scalar::combine, wide::blend_block};
use crate::foundation::core::{BLOCK_PIXELS, Pixel, PixelImage, Position};
use crate::foundation::error::{BlendError, BlendResult};

/// How the glow alpha falls off from the center.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HaloFalloff {
    /// Smooth falloff: peak alpha at the center, zero on the rim.
    #[default]
    Normalized,
    /// Banded falloff: the alpha wraps around every 256 steps and draws rings.
    Unnormalized,
}

/// A glow of a solid color centered on a background pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Halo {
    /// Center pixel in background coordinates.
    pub center: Position,
    /// Radius in pixels.
    pub radius: u32,
    /// Glow color. Its alpha scales the overall intensity.
    pub color: Pixel,
    /// Falloff formula.
    #[serde(default)]
    pub falloff: HaloFalloff,
}

impl Halo {
    /// Normalized halo.
    pub fn new(center: Position, radius: u32, color: Pixel) -> Self {
        Self {
            center,
            radius,
            color,
            falloff: HaloFalloff::Normalized,
        }
    }

    /// Same halo with a different falloff.
    pub fn with_falloff(self, falloff: HaloFalloff) -> Self {
        Self { falloff, ..self }
    }

    /// Glow alpha at absolute offset `(dx, dy)` from the center, or `None` outside the circle.
    ///
    /// The `255` factors of the formula cancel, leaving `base * color.alpha / r²` (normalized) or
    /// `base * color.alpha` truncated to a byte (unnormalized).
    pub fn alpha_at(&self, dx: u32, dy: u32) -> Option<u8> {
        let r2 = square(self.radius);
        let base = r2.checked_sub(square(dx).saturating_add(square(dy)))?;
        let alpha = u64::from(self.color.alpha);
        Some(match self.falloff {
            HaloFalloff::Normalized if r2 == 0 => 0,
            HaloFalloff::Normalized => {
                (u128::from(base) * u128::from(alpha) / u128::from(r2)) as u8
            }
            HaloFalloff::Unnormalized => base.wrapping_mul(alpha) as u8,
        })
    }
}

fn square(v: u32) -> u64 {
    u64::from(v) * u64::from(v)
}

/// Reject a halo whose bounding square is not fully inside `background`.
fn check_halo(background: &PixelImage, halo: &Halo) -> BlendResult<()> {
    let r = halo.radius;
    let fits = |c: u32, limit: u32| {
        c.checked_sub(r).is_some() && c.checked_add(r).is_some_and(|end| end < limit)
    };

    if !fits(halo.center.x, background.width()) || !fits(halo.center.y, background.height()) {
        tracing::debug!(
            cx = halo.center.x,
            cy = halo.center.y,
            r,
            bg_w = background.width(),
            bg_h = background.height(),
            "halo rejected"
        );
        return Err(BlendError::out_of_bounds(format!(
            "halo of radius {} at ({}, {}) exceeds background {}x{}",
            r,
            halo.center.x,
            halo.center.y,
            background.width(),
            background.height()
        )));
    }
    Ok(())
}

/// Rows of the halo's bounding square as `(dy, row slice)`; the slice starts at `center.x - r`.
#[inline(always)]
fn for_each_halo_row(
    background: &mut PixelImage,
    halo: &Halo,
    mut f: impl FnMut(u32, &mut [Pixel]),
) {
    let r = halo.radius;
    let x0 = (halo.center.x - r) as usize;
    let side = 2 * r as usize + 1;
    let y0 = halo.center.y - r;
    for y in 0..=2 * r {
        let row = &mut background.row_mut(y0 + y)[x0..x0 + side];
        f(y, row);
    }
}

/// Blend `row` (bounding-square columns `x_start..`) with the glow, one pixel at a time.
fn halo_row_scalar(row: &mut [Pixel], x_start: u32, y: u32, halo: &Halo) {
    let dy = y.abs_diff(halo.radius);
    for (x, px) in (x_start..).zip(row.iter_mut()) {
        if let Some(alpha) = halo.alpha_at(x.abs_diff(halo.radius), dy) {
            combine(px, halo.color.with_alpha(alpha));
        }
    }
}

/// Add a glow to `background`, evaluating every pixel in exact integer arithmetic.
///
/// Fails with [`BlendError::OutOfBounds`] and writes nothing when `center ± radius` leaves the
/// image on either axis.
#[tracing::instrument(
    level = "trace",
    skip_all,
    fields(cx = halo.center.x, cy = halo.center.y, r = halo.radius, falloff = ?halo.falloff)
)]
pub fn add_halo_scalar(background: &mut PixelImage, halo: &Halo) -> BlendResult<()> {
    check_halo(background, halo)?;
    for_each_halo_row(background, halo, |y, row| halo_row_scalar(row, 0, y, halo));
    Ok(())
}

/// Add a glow to `background`, evaluating [`BLOCK_PIXELS`] pixels per step at the best SIMD
/// level this CPU has.
///
/// Same contract as [`add_halo_scalar`]. Normalized alphas are computed in `f32` and rounded to
/// nearest rather than truncated, so individual pixels may differ from the scalar result by one
/// alpha step. Unnormalized alphas are exact for any radius below 4096. Columns past the last
/// whole block of a row use the scalar path.
pub fn add_halo_wide(background: &mut PixelImage, halo: &Halo) -> BlendResult<()> {
    add_halo_wide_with_level(Level::new(), background, halo)
}

/// [`add_halo_wide`] pinned to `level`.
#[tracing::instrument(
    level = "trace",
    skip_all,
    fields(
        cx = halo.center.x,
        cy = halo.center.y,
        r = halo.radius,
        falloff = ?halo.falloff,
        simd = ?level
    )
)]
pub fn add_halo_wide_with_level(
    level: Level,
    background: &mut PixelImage,
    halo: &Halo,
) -> BlendResult<()> {
    check_halo(background, halo)?;
    if halo.radius == 0 {
        return Ok(());
    }

    dispatch!(level, simd => {
        let lanes = HaloLanes::new(simd, halo);
        for_each_halo_row(background, halo, |y, row| lanes.blend_row(row, y, halo));
    });
    Ok(())
}

/// Per-call constants of the wide halo.
struct HaloLanes<S: Simd> {
    simd: S,
    radius: f32,
    radius_sq: f32,
    alpha: u8,
    normalized: bool,
    /// Halo color with a zero alpha byte, one `u32` lane per pixel.
    rgb: u32x16<S>,
}

impl<S: Simd> HaloLanes<S> {
    #[inline(always)]
    fn new(simd: S, halo: &Halo) -> Self {
        let radius = halo.radius as f32;
        Self {
            simd,
            radius,
            radius_sq: radius * radius,
            alpha: halo.color.alpha,
            normalized: halo.falloff == HaloFalloff::Normalized,
            rgb: splat_pixel(simd, halo.color.with_alpha(0)).reinterpret_u32(),
        }
    }

    /// Glow alpha of bounding-square columns `x..x + BLOCK_PIXELS` on a row `dy_sq` away from
    /// the center, in the low byte of each lane. Zero outside the circle.
    #[inline(always)]
    fn glow_alpha(&self, x: u32, dy_sq: f32) -> u32x16<S> {
        let dx = column_ramp(self.simd, x as f32) - self.radius;
        let base = (self.radius_sq - (dx * dx + dy_sq)).max(0.0f32);
        if self.normalized {
            (base * f32::from(self.alpha) / self.radius_sq + 0.5f32)
                .floor()
                .cvt_u32()
        } else {
            // `base` is a whole number below 2^24 here, so the product is exact before it wraps.
            base.cvt_u32() * u32::from(self.alpha)
        }
    }

    /// Foreground block for bounding-square columns `x..x + BLOCK_PIXELS`: the halo color with
    /// each pixel's alpha byte replaced by its glow alpha.
    #[inline(always)]
    fn glow_block(&self, x: u32, dy_sq: f32) -> u8x64<S> {
        with_alpha_lanes(self.rgb, self.glow_alpha(x, dy_sq))
    }

    /// Blend one bounding-square row (`y` counted from its top) a block at a time.
    #[inline(always)]
    fn blend_row(&self, row: &mut [Pixel], y: u32, halo: &Halo) {
        let dy = y as f32 - self.radius;
        let dy_sq = dy * dy;

        let (blocks, tail) = row.as_chunks_mut::<BLOCK_PIXELS>();
        let mut x = 0u32;
        for block in blocks.iter_mut() {
            let bg = load_block(self.simd, block);
            store_block(blend_block(self.simd, bg, self.glow_block(x, dy_sq)), block);
            x += BLOCK_PIXELS as u32;
        }
        halo_row_scalar(tail, x, y, halo);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/halo.rs"]
mod tests;
