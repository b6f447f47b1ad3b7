/// Texture - Vulkan image, full-range 2D view and its device-local memory

use lens_flare_engine::lensflare::render::{Texture as RendererTexture, TextureInfo};
use ash::vk;
use gpu_allocator::vulkan::Allocation;
use std::sync::Arc;

use crate::vulkan_context::GpuContext;

pub struct Texture {
    ctx: Arc<GpuContext>,
    pub(crate) image: vk::Image,
    pub(crate) view: vk::ImageView,
    allocation: Option<Allocation>,
    info: TextureInfo,
}

impl Texture {
    pub(crate) fn new(
        ctx: Arc<GpuContext>,
        image: vk::Image,
        view: vk::ImageView,
        allocation: Allocation,
        info: TextureInfo,
    ) -> Self {
        Self {
            ctx,
            image,
            view,
            allocation: Some(allocation),
            info,
        }
    }

    /// Single-level, single-layer color range
    pub(crate) fn color_range() -> vk::ImageSubresourceRange {
        vk::ImageSubresourceRange {
            aspect_mask: vk::ImageAspectFlags::COLOR,
            base_mip_level: 0,
            level_count: 1,
            base_array_layer: 0,
            layer_count: 1,
        }
    }
}

impl RendererTexture for Texture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            self.ctx.device.destroy_image_view(self.view, None);

            if let Some(allocation) = self.allocation.take() {
                self.ctx.free(allocation);
            }

            self.ctx.device.destroy_image(self.image, None);
        }
    }
}
