//! Alpha compositing of a placed foreground onto a background.
//!
//! [`scalar`] is the reference implementation. [`wide`] processes [`BLOCK_PIXELS`] pixels per
//! step and produces identical bytes.
//!
//! [`BLOCK_PIXELS`]: crate::foundation::core::BLOCK_PIXELS

pub(crate) mod lanes;
pub mod scalar;
pub mod wide;

use crate::foundation::core::{Pixel, PixelImage, PlacedImage};
use crate::foundation::error::{BlendError, BlendResult};

/// Reject a foreground whose rectangle is not fully inside `background`.
pub(crate) fn check_placement(
    background: &PixelImage,
    foreground: &PlacedImage<'_>,
) -> BlendResult<()> {
    let fits = |pos: u32, len: u32, limit: u32| {
        pos.checked_add(len).is_some_and(|end| end <= limit)
    };

    if !fits(foreground.pos.x, foreground.width(), background.width())
        || !fits(foreground.pos.y, foreground.height(), background.height())
    {
        tracing::debug!(
            x = foreground.pos.x,
            y = foreground.pos.y,
            w = foreground.width(),
            h = foreground.height(),
            bg_w = background.width(),
            bg_h = background.height(),
            "foreground rejected"
        );
        return Err(BlendError::out_of_bounds(format!(
            "foreground {}x{} at ({}, {}) exceeds background {}x{}",
            foreground.width(),
            foreground.height(),
            foreground.pos.x,
            foreground.pos.y,
            background.width(),
            background.height()
        )));
    }
    Ok(())
}

/// Call `f` with each background row slice under the foreground and the matching foreground row.
///
/// The placement must already have been checked.
#[inline(always)]
pub(crate) fn for_each_row(
    background: &mut PixelImage,
    foreground: &PlacedImage<'_>,
    mut f: impl FnMut(&mut [Pixel], &[Pixel]),
) {
    let x0 = foreground.pos.x as usize;
    let w = foreground.width() as usize;
    for y in 0..foreground.height() {
        let bg_row = &mut background.row_mut(foreground.pos.y + y)[x0..x0 + w];
        f(bg_row, foreground.image.row(y));
    }
}
