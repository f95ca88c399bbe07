/// Pixel and image types shared by every kernel.
pub mod core;
/// Crate error type.
pub mod error;
