/// Framebuffer - VkFramebuffer over a pass's color attachments
///
/// Created once at setup, either over offscreen attachments or over one
/// swapchain image view. Destroyed when dropped.

use lens_flare_engine::lensflare::render::Framebuffer as RendererFramebuffer;
use ash::vk;

pub struct Framebuffer {
    pub(crate) framebuffer: vk::Framebuffer,
    width: u32,
    height: u32,
    device: ash::Device,
}

impl Framebuffer {
    pub(crate) fn new(
        framebuffer: vk::Framebuffer,
        width: u32,
        height: u32,
        device: ash::Device,
    ) -> Self {
        Self { framebuffer, width, height, device }
    }
}

impl RendererFramebuffer for Framebuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_framebuffer(self.framebuffer, None);
        }
    }
}
