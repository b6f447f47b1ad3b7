/// CommandList trait - pre-recorded GPU work for one swapchain image

use std::sync::Arc;
use crate::error::Result;
use crate::renderer::{RenderPass, Framebuffer, Pipeline, Buffer, BindingSet};

/// Recorded command buffer
///
/// Lists are recorded once at setup and submitted every frame through
/// `FrameDriver::submit`.
pub trait CommandList: Send + Sync {
    /// Start (or restart) recording
    fn begin(&mut self) -> Result<()>;

    /// Finish recording; the list becomes submittable
    fn end(&mut self) -> Result<()>;

    /// Begin `render_pass` over `framebuffer`, clearing each color attachment
    ///
    /// `clear_values` needs exactly one entry per color attachment.
    fn begin_render_pass(
        &mut self,
        render_pass: &Arc<dyn RenderPass>,
        framebuffer: &Arc<dyn Framebuffer>,
        clear_values: &[ClearValue],
    ) -> Result<()>;

    fn end_render_pass(&mut self) -> Result<()>;

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()>;

    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()>;

    fn bind_pipeline(&mut self, pipeline: &Arc<dyn Pipeline>) -> Result<()>;

    /// Bind a binding set at set 0 of `pipeline`'s layout
    fn bind_binding_set(
        &mut self,
        pipeline: &Arc<dyn Pipeline>,
        binding_set: &Arc<dyn BindingSet>,
    ) -> Result<()>;

    /// Bind a vertex buffer at binding 0
    fn bind_vertex_buffer(&mut self, buffer: &Arc<dyn Buffer>, offset: u64) -> Result<()>;

    /// Non-indexed draw; must be inside a render pass
    fn draw(
        &mut self,
        vertex_count: u32,
        instance_count: u32,
        first_vertex: u32,
        first_instance: u32,
    ) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl Viewport {
    /// Whole-target viewport with depth range [0, 1]
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: width as f32,
            height: height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

/// 2D rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect2D {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect2D {
    pub fn full(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }
}

/// Attachment clear value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClearValue {
    /// Linear RGBA
    Color([f32; 4]),
}

impl ClearValue {
    pub const BLACK: Self = ClearValue::Color([0.0, 0.0, 0.0, 1.0]);
}
