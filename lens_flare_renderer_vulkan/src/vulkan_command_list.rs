/// CommandList - one primary command buffer recorded once, submitted every frame
///
/// Each list owns its pool. Recording does not use ONE_TIME_SUBMIT because
/// the same buffer is resubmitted for its swapchain image every frame.

use lens_flare_engine::lensflare::{Result, Error};
use lens_flare_engine::lensflare::render::{
    CommandList as RendererCommandList,
    RenderPass as RendererRenderPass,
    Framebuffer as RendererFramebuffer,
    Pipeline as RendererPipeline,
    Buffer as RendererBuffer,
    BindingSet as RendererBindingSet,
    Viewport, Rect2D, ClearValue,
};
use lens_flare_engine::engine_err;
use ash::vk;
use std::sync::Arc;

use crate::vulkan_render_pass::RenderPass;
use crate::vulkan_frame_buffer::Framebuffer;
use crate::vulkan_pipeline::Pipeline;
use crate::vulkan_buffer::Buffer;
use crate::vulkan_binding_set::BindingSet;

/// Recording lifecycle of the command buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordState {
    /// Freshly allocated, nothing recorded
    Initial,
    Recording,
    InRenderPass,
    /// `end()` succeeded; ready for submission
    Executable,
}

pub struct CommandList {
    device: ash::Device,
    command_pool: vk::CommandPool,
    command_buffer: vk::CommandBuffer,
    state: RecordState,
}

/// Concrete backend object behind an engine trait object
///
/// # Safety
///
/// Every engine resource handed to this crate was created by
/// `VulkanRenderer`, so the data pointer of `object` is a `T`.
unsafe fn backend<T, D: ?Sized>(object: &D) -> &T {
    &*(object as *const D as *const T)
}

fn vk_clear_value(value: &ClearValue) -> vk::ClearValue {
    match value {
        ClearValue::Color(rgba) => vk::ClearValue {
            color: vk::ClearColorValue { float32: *rgba },
        },
    }
}

impl CommandList {
    pub(crate) fn new(device: ash::Device, queue_family: u32) -> Result<Self> {
        unsafe {
            let pool_info = vk::CommandPoolCreateInfo::default()
                .queue_family_index(queue_family)
                .flags(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER);
            let command_pool = device.create_command_pool(&pool_info, None)
                .map_err(|e| engine_err!("lensflare::vulkan", "Failed to create command pool: {:?}", e))?;

            let allocate_info = vk::CommandBufferAllocateInfo::default()
                .command_pool(command_pool)
                .level(vk::CommandBufferLevel::PRIMARY)
                .command_buffer_count(1);
            let command_buffer = match device.allocate_command_buffers(&allocate_info) {
                Ok(buffers) => buffers[0],
                Err(e) => {
                    device.destroy_command_pool(command_pool, None);
                    return Err(engine_err!("lensflare::vulkan", "Failed to allocate command buffer: {:?}", e));
                }
            };

            Ok(Self { device, command_pool, command_buffer, state: RecordState::Initial })
        }
    }

    pub(crate) fn command_buffer(&self) -> vk::CommandBuffer {
        self.command_buffer
    }

    /// Whether `end()` completed and the buffer can be submitted
    pub(crate) fn is_executable(&self) -> bool {
        self.state == RecordState::Executable
    }

    /// Fails unless the list is in `expected`
    fn expect_state(&self, expected: RecordState, operation: &str) -> Result<()> {
        if self.state != expected {
            return Err(Error::BackendError(format!(
                "{} requires a {:?} command list, it is {:?}", operation, expected, self.state
            )));
        }
        Ok(())
    }

    /// Recording, inside or outside a render pass
    fn expect_recording(&self, operation: &str) -> Result<()> {
        match self.state {
            RecordState::Recording | RecordState::InRenderPass => Ok(()),
            state => Err(Error::BackendError(format!(
                "{} requires a recording command list, it is {:?}", operation, state
            ))),
        }
    }
}

impl RendererCommandList for CommandList {
    fn begin(&mut self) -> Result<()> {
        if matches!(self.state, RecordState::Recording | RecordState::InRenderPass) {
            return Err(Error::BackendError("begin on a command list that is already recording".to_string()));
        }

        unsafe {
            self.device
                .reset_command_buffer(self.command_buffer, vk::CommandBufferResetFlags::empty())
                .map_err(|e| engine_err!("lensflare::vulkan", "Failed to reset command buffer: {:?}", e))?;
            self.device
                .begin_command_buffer(self.command_buffer, &vk::CommandBufferBeginInfo::default())
                .map_err(|e| engine_err!("lensflare::vulkan", "Failed to begin command buffer: {:?}", e))?;
        }

        self.state = RecordState::Recording;
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        self.expect_state(RecordState::Recording, "end")?;

        unsafe {
            self.device
                .end_command_buffer(self.command_buffer)
                .map_err(|e| engine_err!("lensflare::vulkan", "Failed to end command buffer: {:?}", e))?;
        }

        self.state = RecordState::Executable;
        Ok(())
    }

    fn begin_render_pass(
        &mut self,
        render_pass: &Arc<dyn RendererRenderPass>,
        framebuffer: &Arc<dyn RendererFramebuffer>,
        clear_values: &[ClearValue],
    ) -> Result<()> {
        self.expect_state(RecordState::Recording, "begin_render_pass")?;

        let attachments = render_pass.color_attachment_count();
        if clear_values.len() != attachments {
            return Err(Error::InvalidResource(format!(
                "{} clear values for {} color attachments", clear_values.len(), attachments
            )));
        }

        let clear_values: Vec<vk::ClearValue> = clear_values.iter().map(vk_clear_value).collect();
        let render_area = vk::Rect2D {
            offset: vk::Offset2D::default(),
            extent: vk::Extent2D { width: framebuffer.width(), height: framebuffer.height() },
        };

        unsafe {
            let pass: &RenderPass = backend(render_pass.as_ref());
            let target: &Framebuffer = backend(framebuffer.as_ref());

            let begin_info = vk::RenderPassBeginInfo::default()
                .render_pass(pass.render_pass)
                .framebuffer(target.framebuffer)
                .render_area(render_area)
                .clear_values(&clear_values);
            self.device.cmd_begin_render_pass(self.command_buffer, &begin_info, vk::SubpassContents::INLINE);
        }

        self.state = RecordState::InRenderPass;
        Ok(())
    }

    fn end_render_pass(&mut self) -> Result<()> {
        self.expect_state(RecordState::InRenderPass, "end_render_pass")?;
        unsafe { self.device.cmd_end_render_pass(self.command_buffer) };
        self.state = RecordState::Recording;
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.expect_recording("set_viewport")?;

        let viewports = [vk::Viewport {
            x: viewport.x,
            y: viewport.y,
            width: viewport.width,
            height: viewport.height,
            min_depth: viewport.min_depth,
            max_depth: viewport.max_depth,
        }];
        unsafe { self.device.cmd_set_viewport(self.command_buffer, 0, &viewports) };
        Ok(())
    }

    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()> {
        self.expect_recording("set_scissor")?;

        let scissors = [vk::Rect2D {
            offset: vk::Offset2D { x: scissor.x, y: scissor.y },
            extent: vk::Extent2D { width: scissor.width, height: scissor.height },
        }];
        unsafe { self.device.cmd_set_scissor(self.command_buffer, 0, &scissors) };
        Ok(())
    }

    fn bind_pipeline(&mut self, pipeline: &Arc<dyn RendererPipeline>) -> Result<()> {
        self.expect_recording("bind_pipeline")?;

        unsafe {
            let pipeline: &Pipeline = backend(pipeline.as_ref());
            self.device.cmd_bind_pipeline(self.command_buffer, vk::PipelineBindPoint::GRAPHICS, pipeline.pipeline);
            // LINE_WIDTH is a dynamic state of every pipeline
            self.device.cmd_set_line_width(self.command_buffer, 1.0);
        }
        Ok(())
    }

    fn bind_binding_set(
        &mut self,
        pipeline: &Arc<dyn RendererPipeline>,
        binding_set: &Arc<dyn RendererBindingSet>,
    ) -> Result<()> {
        self.expect_recording("bind_binding_set")?;

        unsafe {
            let pipeline: &Pipeline = backend(pipeline.as_ref());
            let set: &BindingSet = backend(binding_set.as_ref());
            self.device.cmd_bind_descriptor_sets(
                self.command_buffer,
                vk::PipelineBindPoint::GRAPHICS,
                pipeline.pipeline_layout,
                0,
                &[set.descriptor_set],
                &[],
            );
        }
        Ok(())
    }

    fn bind_vertex_buffer(&mut self, buffer: &Arc<dyn RendererBuffer>, offset: u64) -> Result<()> {
        self.expect_recording("bind_vertex_buffer")?;

        unsafe {
            let buffer: &Buffer = backend(buffer.as_ref());
            self.device.cmd_bind_vertex_buffers(self.command_buffer, 0, &[buffer.buffer], &[offset]);
        }
        Ok(())
    }

    fn draw(
        &mut self,
        vertex_count: u32,
        instance_count: u32,
        first_vertex: u32,
        first_instance: u32,
    ) -> Result<()> {
        self.expect_state(RecordState::InRenderPass, "draw")?;
        unsafe {
            self.device.cmd_draw(self.command_buffer, vertex_count, instance_count, first_vertex, first_instance);
        }
        Ok(())
    }
}

impl Drop for CommandList {
    fn drop(&mut self) {
        // Frees the command buffer with it
        unsafe { self.device.destroy_command_pool(self.command_pool, None) };
    }
}
