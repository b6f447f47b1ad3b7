/// Image decoding for the demos

use std::path::Path;

use anyhow::{Context, Result, ensure};
use image::{GrayImage, RgbaImage};
use lens_flare_engine::lensflare::render::{TextureDesc, TextureFormat, TextureUsage};

/// Decode `path` to RGBA8 and describe it as a sampled texture
pub fn load_rgba_texture(path: &Path) -> Result<TextureDesc> {
    let image = image::open(path)
        .with_context(|| format!("failed to load texture {}", path.display()))?
        .to_rgba8();
    let label = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "source".to_string());
    rgba_texture_desc(label, image)
}

/// Sampled `R8G8B8A8_UNORM` texture carrying `image` as its initial data
pub fn rgba_texture_desc(label: String, image: RgbaImage) -> Result<TextureDesc> {
    let (width, height) = image.dimensions();
    ensure!(width > 0 && height > 0, "texture '{}' is empty", label);

    Ok(TextureDesc {
        label,
        width,
        height,
        format: TextureFormat::R8G8B8A8_UNORM,
        usage: TextureUsage::SAMPLED,
        data: Some(image.into_raw()),
    })
}

/// Decode `path` to 8-bit luma
pub fn load_luma(path: &Path) -> Result<GrayImage> {
    Ok(image::open(path)
        .with_context(|| format!("failed to load image {}", path.display()))?
        .to_luma8())
}

#[cfg(test)]
#[path = "assets_tests.rs"]
mod tests;
