use std::path::Path;

use anyhow::Context;

use crate::foundation::core::PixelImage;
use crate::foundation::error::BlendResult;

/// Decode an encoded image (any format the `image` crate reads) into straight-alpha RGBA8.
pub fn decode_image(bytes: &[u8]) -> BlendResult<PixelImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelImage::from_rgba8(width, height, rgba.as_raw())
}

/// Read and decode the image file at `path`.
pub fn load_image(path: &Path) -> BlendResult<PixelImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    let img = decode_image(&bytes).with_context(|| format!("load image '{}'", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        "loaded image"
    );
    Ok(img)
}

/// Write `img` as an RGBA8 PNG, creating parent directories as needed.
pub fn save_png(img: &PixelImage, path: &Path) -> BlendResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        path,
        img.as_rgba8(),
        img.width(),
        img.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
