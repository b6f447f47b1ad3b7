/// Texture trait and descriptors (attachments and sampled images)

use bitflags::bitflags;

/// Pixel formats used by the pass chain and the swapchain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    /// Offscreen attachments and the source texture
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    /// Preferred swapchain format
    B8G8R8A8_UNORM,
    B8G8R8A8_SRGB,
}

impl TextureFormat {
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            TextureFormat::R8G8B8A8_UNORM
            | TextureFormat::R8G8B8A8_SRGB
            | TextureFormat::B8G8R8A8_UNORM
            | TextureFormat::B8G8R8A8_SRGB => 4,
        }
    }
}

bitflags! {
    /// How an image may be used. Fixed at creation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextureUsage: u32 {
        const COLOR_ATTACHMENT = 1 << 0;
        const SAMPLED = 1 << 1;
        const TRANSFER_SRC = 1 << 2;
        const TRANSFER_DST = 1 << 3;
    }
}

/// Descriptor for creating a texture
#[derive(Debug, Clone)]
pub struct TextureDesc {
    pub label: String,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub usage: TextureUsage,
    /// Initial pixel data, tightly packed. Uploaded through a staging buffer.
    pub data: Option<Vec<u8>>,
}

impl TextureDesc {
    /// Size in bytes of a full level-0 image
    pub fn byte_size(&self) -> u64 {
        self.width as u64 * self.height as u64 * self.format.bytes_per_pixel() as u64
    }
}

/// Read-only texture properties
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureInfo {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub usage: TextureUsage,
}

impl From<&TextureDesc> for TextureInfo {
    fn from(desc: &TextureDesc) -> Self {
        Self {
            width: desc.width,
            height: desc.height,
            format: desc.format,
            usage: desc.usage,
        }
    }
}

/// GPU image + view
pub trait Texture: Send + Sync {
    fn info(&self) -> &TextureInfo;
}
