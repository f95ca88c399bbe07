//! Alpha compositing and procedural glow for straight-alpha RGBA8 images.
//!
//! Two kernels implement the same operations:
//!
//! - [`KernelKind::Scalar`]: per-pixel reference
//! - [`KernelKind::Wide`]: 16-pixel blocks with a scalar tail
//!
//! Blend a placed foreground with [`Compositor::blend_region`], add a circular glow with
//! [`Compositor::add_halo`], or describe a whole composite as a [`SceneConfig`] and hand it to
//! [`render_scene`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Image files in and out.
pub mod assets;
/// Region compositing kernels.
pub mod blend;
/// Kernel selection and the [`Compositor`] trait.
pub mod compositor;
/// Procedural effects.
pub mod effects;
/// Shared types and errors.
pub mod foundation;
/// JSON scenes.
pub mod scene;

pub use assets::{decode_image, load_image, save_png};
pub use compositor::{Compositor, KernelKind, ScalarCompositor, WideCompositor, create_compositor};
pub use effects::halo::{
    Halo, HaloFalloff, add_halo_scalar, add_halo_wide, add_halo_wide_with_level,
};
pub use fearless_simd::Level;
pub use foundation::core::{BLOCK_BYTES, BLOCK_PIXELS, Pixel, PixelImage, PlacedImage, Position};
pub use foundation::error::{BlendError, BlendResult};
pub use scene::{ForegroundConfig, SceneConfig, render_scene};
