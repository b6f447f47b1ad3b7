/*!
# Lens Flare - Vulkan Renderer Backend

Vulkan implementation of the `lens_flare_engine` renderer traits, built on
`ash` for bindings and `gpu-allocator` for memory.

`VulkanRenderer` implements both `Renderer` (resource factory) and
`FrameDriver` (acquire / submit / present / per-image fences), so the
engine's frame orchestrator can drive it directly.
*/

mod vulkan;
mod vulkan_context;
mod vulkan_format;
mod vulkan_texture;
mod vulkan_buffer;
mod vulkan_shader;
mod vulkan_pipeline;
mod vulkan_render_pass;
mod vulkan_frame_buffer;
mod vulkan_binding_set;
mod vulkan_sampler;
mod vulkan_command_list;
mod vulkan_swapchain;
#[cfg_attr(not(feature = "vulkan-validation"), allow(dead_code))]
mod debug;

pub use vulkan::VulkanRenderer;
pub use debug::{validation_stats, ValidationStats};
pub use vulkan_swapchain::{
    choose_surface_format, choose_present_mode, choose_image_count,
    choose_pre_transform, choose_composite_alpha,
};
