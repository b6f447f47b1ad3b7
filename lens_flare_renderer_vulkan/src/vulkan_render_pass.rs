/// RenderPass - single-subpass Vulkan render pass

use lens_flare_engine::lensflare::render::RenderPass as RendererRenderPass;
use ash::vk;

pub struct RenderPass {
    pub(crate) render_pass: vk::RenderPass,
    color_attachment_count: usize,
    device: ash::Device,
}

impl RenderPass {
    pub(crate) fn new(render_pass: vk::RenderPass, color_attachment_count: usize, device: ash::Device) -> Self {
        Self { render_pass, color_attachment_count, device }
    }
}

impl RendererRenderPass for RenderPass {
    fn color_attachment_count(&self) -> usize {
        self.color_attachment_count
    }
}

impl Drop for RenderPass {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_render_pass(self.render_pass, None);
        }
    }
}
