//! Rotating triangle
//!
//! One render pass straight to the swapchain. Three interleaved vertices and
//! a model/view/projection uniform block; the model matrix spins around Z.

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use bytemuck::{Pod, Zeroable};
use clap::Parser;
use glam::{Mat4, Vec3};
use lens_flare_demo::{CommonArgs, Scene, exit_on_error, run_scene};
use lens_flare_engine::lensflare::Engine;
use lens_flare_engine::lensflare::config::LensFlareConfig;
use lens_flare_engine::lensflare::graph::pass_dependencies;
use lens_flare_engine::lensflare::log::DefaultLogger;
use lens_flare_engine::lensflare::render::{
    AttachmentDesc, BindingLayoutEntry, BindingResource, BindingSet, BindingType, Buffer, BufferDesc,
    BufferUsage, ClearValue, CommandList, Framebuffer, Pipeline, PipelineDesc, PipelineTemplate,
    Rect2D, RenderPass, RenderPassDesc, Renderer, ShaderStage, Viewport, load_shader_file,
};
use lens_flare_renderer_vulkan::VulkanRenderer;

/// Position xy, color rgb
#[rustfmt::skip]
const VERTICES: [f32; 15] = [
     0.0, -0.5,   1.0, 0.0, 0.0,
     0.5,  0.5,   0.0, 1.0, 0.0,
    -0.5,  0.5,   0.0, 0.0, 1.0,
];

/// Radians per second
const SPIN_SPEED: f32 = FRAC_PI_2;

#[derive(Debug, Parser)]
#[command(name = "triangle", about = "Rotating triangle on the swapchain")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
}

/// Matches `layout(binding = 0) uniform` in triangle.vert
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct TriangleUniforms {
    model: Mat4,
    view: Mat4,
    projection: Mat4,
}

impl TriangleUniforms {
    fn new(aspect: f32) -> Self {
        Self {
            model: Mat4::IDENTITY,
            view: Mat4::look_at_rh(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y),
            projection: Mat4::perspective_rh(45f32.to_radians(), aspect, 0.01, 25.0),
        }
    }

    fn at(mut self, elapsed: Duration) -> Self {
        self.model = Mat4::from_rotation_z(elapsed.as_secs_f32() * SPIN_SPEED);
        self
    }
}

/// Drops binding set, pipeline, buffers, then the pass objects
struct TriangleScene {
    _binding_set: Arc<dyn BindingSet>,
    _pipeline: Arc<dyn Pipeline>,
    uniform_buffer: Arc<dyn Buffer>,
    _vertex_buffer: Arc<dyn Buffer>,
    _framebuffers: Vec<Arc<dyn Framebuffer>>,
    _render_pass: Arc<dyn RenderPass>,
    uniforms: TriangleUniforms,
}

impl Scene for TriangleScene {
    fn setup(
        renderer: &mut VulkanRenderer,
        config: &LensFlareConfig,
    ) -> Result<(Self, Vec<Box<dyn CommandList>>)> {
        let info = renderer.swapchain_info();

        let vertex_data: &[u8] = bytemuck::cast_slice(&VERTICES);
        let vertex_buffer = renderer.create_buffer(BufferDesc {
            label: "triangle_vertices".to_string(),
            size: vertex_data.len() as u64,
            usage: BufferUsage::Vertex,
        })?;
        vertex_buffer.update(0, vertex_data)?;

        let uniforms = TriangleUniforms::new(info.width as f32 / info.height as f32);
        let uniform_size = std::mem::size_of::<TriangleUniforms>() as u64;
        let uniform_buffer = renderer.create_buffer(BufferDesc {
            label: "triangle_uniforms".to_string(),
            size: uniform_size,
            usage: BufferUsage::Uniform,
        })?;
        uniform_buffer.update(0, bytemuck::bytes_of(&uniforms))?;

        let render_pass = renderer.create_render_pass(&RenderPassDesc {
            label: "triangle".to_string(),
            color_attachments: vec![AttachmentDesc::present(info.format)],
            dependencies: pass_dependencies(),
        })?;
        let framebuffers = renderer.create_swapchain_framebuffers(&render_pass)?;

        let vertex_shader = renderer.create_shader(load_shader_file(
            &config.assets.shader_path("triangle.vert.spv"), ShaderStage::Vertex)?)?;
        let fragment_shader = renderer.create_shader(load_shader_file(
            &config.assets.shader_path("triangle.frag.spv"), ShaderStage::Fragment)?)?;

        let pipeline = renderer.create_pipeline(PipelineDesc {
            label: "triangle".to_string(),
            vertex_shader,
            fragment_shader,
            render_pass: render_pass.clone(),
            template: PipelineTemplate::fullscreen(1),
            binding_layout: vec![BindingLayoutEntry {
                binding: 0,
                binding_type: BindingType::UniformBuffer,
                stage: ShaderStage::Vertex,
            }],
        })?;

        let binding_set = renderer.create_binding_set(&pipeline, &[BindingResource::UniformBuffer {
            buffer: uniform_buffer.as_ref(),
            offset: 0,
            range: uniform_size,
        }])?;

        let mut command_lists = Vec::with_capacity(framebuffers.len());
        for framebuffer in &framebuffers {
            let mut cmd = renderer.create_command_list()?;
            cmd.begin()?;
            cmd.begin_render_pass(&render_pass, framebuffer, &[ClearValue::BLACK])?;
            cmd.set_viewport(Viewport::full(info.width, info.height))?;
            cmd.set_scissor(Rect2D::full(info.width, info.height))?;
            cmd.bind_pipeline(&pipeline)?;
            cmd.bind_binding_set(&pipeline, &binding_set)?;
            cmd.bind_vertex_buffer(&vertex_buffer, 0)?;
            cmd.draw(3, 1, 0, 0)?;
            cmd.end_render_pass()?;
            cmd.end()?;
            command_lists.push(cmd);
        }

        let scene = Self {
            _binding_set: binding_set,
            _pipeline: pipeline,
            uniform_buffer,
            _vertex_buffer: vertex_buffer,
            _framebuffers: framebuffers,
            _render_pass: render_pass,
            uniforms,
        };
        Ok((scene, command_lists))
    }

    fn update(&mut self, elapsed: Duration) -> Result<()> {
        let uniforms = self.uniforms.at(elapsed);
        self.uniform_buffer.update(0, bytemuck::bytes_of(&uniforms))?;
        Ok(())
    }
}

fn main() {
    let cli = Cli::parse();
    Engine::set_logger(DefaultLogger::new(cli.common.log_severity()));
    exit_on_error(run_scene::<TriangleScene>(cli.common.config("Triangle")));
}
