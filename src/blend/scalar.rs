//! Reference per-pixel compositing. The wide kernel must match this byte for byte.

use crate::blend::{check_placement, for_each_row};
use crate::foundation::core::{Pixel, PixelImage, PlacedImage};
use crate::foundation::error::BlendResult;

/// Blend `fg` onto `bg` in place.
///
/// Each color channel becomes `(bg * (255 - a) + fg * a) >> 8`, with `a = fg.alpha`. The shift
/// stands in for a division by 255, so an opaque 255 channel lands on 254. `bg.alpha` is never
/// written, and a fully transparent `fg` leaves `bg` untouched.
#[inline]
pub fn combine(bg: &mut Pixel, fg: Pixel) {
    if fg.alpha == 0 {
        return;
    }
    let a = u16::from(fg.alpha);
    let inv = 255 - a;
    bg.red = mix_channel(bg.red, fg.red, a, inv);
    bg.green = mix_channel(bg.green, fg.green, a, inv);
    bg.blue = mix_channel(bg.blue, fg.blue, a, inv);
}

#[inline(always)]
fn mix_channel(bg: u8, fg: u8, a: u16, inv: u16) -> u8 {
    // At most 255 * 255, so the sum fits in 16 bits.
    ((u16::from(bg) * inv + u16::from(fg) * a) >> 8) as u8
}

/// Blend two equally long rows pixel by pixel.
pub(crate) fn blend_row(bg_row: &mut [Pixel], fg_row: &[Pixel]) {
    for (bg, fg) in bg_row.iter_mut().zip(fg_row) {
        combine(bg, *fg);
    }
}

/// Composite `foreground` onto `background` one pixel at a time.
///
/// Fails with [`crate::BlendError::OutOfBounds`] and leaves `background` untouched when the
/// foreground rectangle does not fit.
#[tracing::instrument(
    level = "trace",
    skip_all,
    fields(
        x = foreground.pos.x,
        y = foreground.pos.y,
        w = foreground.width(),
        h = foreground.height()
    )
)]
pub fn blend_region(background: &mut PixelImage, foreground: &PlacedImage<'_>) -> BlendResult<()> {
    check_placement(background, foreground)?;
    for_each_row(background, foreground, blend_row);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/blend/scalar.rs"]
mod tests;
