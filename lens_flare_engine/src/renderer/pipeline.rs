/// Pipeline trait and fixed-function state descriptors

use std::sync::Arc;
use crate::renderer::{Shader, RenderPass, BindingLayoutEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveTopology {
    TriangleList,
    TriangleStrip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexFormat {
    Float2,
    Float3,
}

impl VertexFormat {
    pub fn size_bytes(&self) -> u32 {
        match self {
            VertexFormat::Float2 => 8,
            VertexFormat::Float3 => 12,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub binding: u32,
    pub format: VertexFormat,
    pub offset: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexBinding {
    pub binding: u32,
    pub stride: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VertexLayout {
    pub bindings: Vec<VertexBinding>,
    pub attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    /// Interleaved 2D position + RGB color, stride of five floats
    pub fn position2_color3() -> Self {
        Self {
            bindings: vec![VertexBinding { binding: 0, stride: 5 * 4 }],
            attributes: vec![
                VertexAttribute { location: 0, binding: 0, format: VertexFormat::Float2, offset: 0 },
                VertexAttribute { location: 1, binding: 0, format: VertexFormat::Float3, offset: 8 },
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    None,
    Front,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontFace {
    CounterClockwise,
    Clockwise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Never,
    Less,
    LessOrEqual,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterizationState {
    pub cull_mode: CullMode,
    pub front_face: FrontFace,
    pub line_width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthState {
    pub test_enable: bool,
    pub write_enable: bool,
    pub compare_op: CompareOp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorWriteMask {
    pub r: bool,
    pub g: bool,
    pub b: bool,
    pub a: bool,
}

impl ColorWriteMask {
    pub const ALL: Self = Self { r: true, g: true, b: true, a: true };
}

/// Blend state for one color output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorBlendAttachment {
    pub blend_enable: bool,
    pub write_mask: ColorWriteMask,
}

impl ColorBlendAttachment {
    /// Output fully replaces the destination pixel
    pub const REPLACE: Self = Self { blend_enable: false, write_mask: ColorWriteMask::ALL };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DynamicState {
    Viewport,
    Scissor,
    LineWidth,
}

/// Fixed-function state shared by every pipeline built from one template
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineTemplate {
    pub vertex_layout: VertexLayout,
    pub topology: PrimitiveTopology,
    pub rasterization: RasterizationState,
    pub depth: DepthState,
    pub sample_count: u32,
    pub color_blend_attachments: Vec<ColorBlendAttachment>,
    pub dynamic_states: Vec<DynamicState>,
}

impl PipelineTemplate {
    /// Template used by every post-processing pass and the triangle sample
    ///
    /// Depth testing stays enabled even though no pass has a depth
    /// attachment; without one the test is a no-op.
    pub fn fullscreen(color_outputs: usize) -> Self {
        Self {
            vertex_layout: VertexLayout::position2_color3(),
            topology: PrimitiveTopology::TriangleList,
            rasterization: RasterizationState {
                cull_mode: CullMode::Back,
                front_face: FrontFace::Clockwise,
                line_width: 1.0,
            },
            depth: DepthState {
                test_enable: true,
                write_enable: true,
                compare_op: CompareOp::LessOrEqual,
            },
            sample_count: 1,
            color_blend_attachments: vec![ColorBlendAttachment::REPLACE; color_outputs],
            dynamic_states: vec![DynamicState::Viewport, DynamicState::Scissor, DynamicState::LineWidth],
        }
    }
}

/// Descriptor for creating a graphics pipeline
pub struct PipelineDesc {
    pub label: String,
    pub vertex_shader: Arc<dyn Shader>,
    pub fragment_shader: Arc<dyn Shader>,
    pub render_pass: Arc<dyn RenderPass>,
    pub template: PipelineTemplate,
    /// Single descriptor set (set 0) layout
    pub binding_layout: Vec<BindingLayoutEntry>,
}

/// Graphics pipeline + layout + descriptor set layout
pub trait Pipeline: Send + Sync {
    fn binding_layout(&self) -> &[BindingLayoutEntry];
}
