/// RenderPass and Framebuffer traits plus their descriptors

use std::sync::Arc;
use crate::renderer::{TextureFormat, Texture, PassDependency};

/// Render pass marker trait
pub trait RenderPass: Send + Sync {
    fn color_attachment_count(&self) -> usize;
}

/// Framebuffer binding attachments to a render pass at a fixed extent
pub trait Framebuffer: Send + Sync {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
}

/// Descriptor for creating a render pass with a single graphics subpass
#[derive(Debug, Clone)]
pub struct RenderPassDesc {
    pub label: String,
    /// One entry per color output. Index i is color attachment i of subpass 0.
    pub color_attachments: Vec<AttachmentDesc>,
    pub dependencies: Vec<PassDependency>,
}

/// Descriptor for a single color attachment in a render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentDesc {
    pub format: TextureFormat,
    pub load_op: LoadOp,
    pub store_op: StoreOp,
    pub initial_layout: ImageLayout,
    pub final_layout: ImageLayout,
}

impl AttachmentDesc {
    /// Cleared, stored, left ready for sampling by a later pass
    pub fn offscreen(format: TextureFormat) -> Self {
        Self {
            format,
            load_op: LoadOp::Clear,
            store_op: StoreOp::Store,
            initial_layout: ImageLayout::Undefined,
            final_layout: ImageLayout::ShaderReadOnly,
        }
    }

    /// Cleared, stored, left ready for presentation
    pub fn present(format: TextureFormat) -> Self {
        Self {
            format,
            load_op: LoadOp::Clear,
            store_op: StoreOp::Store,
            initial_layout: ImageLayout::Undefined,
            final_layout: ImageLayout::PresentSrc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOp {
    Load,
    Clear,
    DontCare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Store,
    DontCare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLayout {
    Undefined,
    ColorAttachment,
    ShaderReadOnly,
    TransferSrc,
    TransferDst,
    PresentSrc,
}

/// Descriptor for creating a framebuffer over offscreen attachments
pub struct FramebufferDesc<'a> {
    pub render_pass: &'a Arc<dyn RenderPass>,
    pub color_attachments: &'a [Arc<dyn Texture>],
    pub width: u32,
    pub height: u32,
}
