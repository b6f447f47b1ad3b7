/// Renderer trait - main rendering factory interface

use std::sync::Arc;

use crate::error::Result;
use crate::renderer::{
    Texture, Buffer, Shader, RenderPass, Framebuffer, Pipeline, BindingSet, CommandList,
    TextureDesc, BufferDesc, ShaderDesc, RenderPassDesc, FramebufferDesc, PipelineDesc,
    BindingResource, TextureFormat,
};

/// Properties of the presentable images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapchainInfo {
    pub image_count: u32,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

/// Main renderer trait
///
/// Central factory for GPU resources. Implemented by `VulkanRenderer` and,
/// in tests, by `MockRenderer`.
pub trait Renderer {
    /// Create a texture, uploading `desc.data` if present
    ///
    /// # Arguments
    ///
    /// * `desc` - Texture descriptor
    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>>;

    /// Create a host-visible buffer
    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>>;

    /// Create a shader module from SPIR-V
    fn create_shader(&mut self, desc: ShaderDesc) -> Result<Arc<dyn Shader>>;

    /// Create a render pass with one graphics subpass
    fn create_render_pass(&mut self, desc: &RenderPassDesc) -> Result<Arc<dyn RenderPass>>;

    /// Create a framebuffer over offscreen attachments
    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> Result<Arc<dyn Framebuffer>>;

    /// Create one framebuffer per swapchain image, in image-index order
    fn create_swapchain_framebuffers(
        &mut self,
        render_pass: &Arc<dyn RenderPass>,
    ) -> Result<Vec<Arc<dyn Framebuffer>>>;

    /// Create a graphics pipeline
    ///
    /// # Arguments
    ///
    /// * `desc` - Pipeline descriptor (shaders, render pass, template, set 0 layout)
    fn create_pipeline(&mut self, desc: PipelineDesc) -> Result<Arc<dyn Pipeline>>;

    /// Allocate and write a binding set for set 0 of `pipeline`
    ///
    /// `resources[i]` is written at the binding number of the pipeline's
    /// `i`-th layout entry and its type must match that entry.
    fn create_binding_set(
        &mut self,
        pipeline: &Arc<dyn Pipeline>,
        resources: &[BindingResource],
    ) -> Result<Arc<dyn BindingSet>>;

    /// Create a primary command list
    fn create_command_list(&mut self) -> Result<Box<dyn CommandList>>;

    fn swapchain_info(&self) -> SwapchainInfo;

    /// Device `minUniformBufferOffsetAlignment`
    fn min_uniform_alignment(&self) -> u64;

    /// Copy a texture's level-0 pixels back to the host (tightly packed)
    ///
    /// The texture must be in shader-read-only layout, i.e. written by a
    /// finished pass or uploaded at creation.
    fn read_texture(&mut self, texture: &Arc<dyn Texture>) -> Result<Vec<u8>>;

    /// Wait for all GPU operations to complete
    fn wait_idle(&self) -> Result<()>;
}
