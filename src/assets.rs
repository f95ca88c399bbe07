//! Image loading and saving around the compositing core.

/// Encoded image files to and from [`crate::PixelImage`].
pub mod decode;

pub use decode::{decode_image, load_image, save_png};
