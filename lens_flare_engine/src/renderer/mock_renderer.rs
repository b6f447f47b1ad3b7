/// Mock Renderer for unit tests (no GPU required)
///
/// Implements both `Renderer` and `FrameDriver`. Every factory call and
/// every recorded command is logged as a string so tests can assert on the
/// exact sequence the graph produces.

use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::renderer::{
    Renderer, FrameDriver, Buffer, Texture, Shader, Pipeline, CommandList, RenderPass,
    Framebuffer, BindingSet, BufferDesc, TextureDesc, ShaderDesc, ShaderStage, PipelineDesc,
    PipelineTemplate, RenderPassDesc, FramebufferDesc, BindingResource, BindingLayoutEntry,
    Viewport, Rect2D, ClearValue, TextureInfo, TextureFormat, SwapchainInfo,
};

/// Shared command sink for one mock command list
pub type CommandLog = Arc<Mutex<Vec<String>>>;

fn push(log: &CommandLog, entry: String) {
    if let Ok(mut log) = log.lock() {
        log.push(entry);
    }
}

// ============================================================================
// Mock resources
// ============================================================================

pub struct MockBuffer {
    pub size: u64,
    pub label: String,
    pub writes: Arc<Mutex<Vec<(u64, Vec<u8>)>>>,
}

impl Buffer for MockBuffer {
    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        if offset + data.len() as u64 > self.size {
            return Err(Error::InvalidResource(format!(
                "write of {} bytes at {} overflows buffer '{}' ({} bytes)",
                data.len(), offset, self.label, self.size
            )));
        }
        if let Ok(mut writes) = self.writes.lock() {
            writes.push((offset, data.to_vec()));
        }
        Ok(())
    }

    fn size(&self) -> u64 {
        self.size
    }
}

pub struct MockTexture {
    pub info: TextureInfo,
    pub label: String,
}

impl Texture for MockTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }
}

pub struct MockShader {
    pub stage: ShaderStage,
}

impl Shader for MockShader {
    fn stage(&self) -> ShaderStage {
        self.stage
    }
}

pub struct MockRenderPass {
    pub label: String,
    pub color_attachment_count: usize,
}

impl RenderPass for MockRenderPass {
    fn color_attachment_count(&self) -> usize {
        self.color_attachment_count
    }
}

pub struct MockFramebuffer {
    pub width: u32,
    pub height: u32,
}

impl Framebuffer for MockFramebuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

pub struct MockPipeline {
    pub label: String,
    pub binding_layout: Vec<BindingLayoutEntry>,
}

impl Pipeline for MockPipeline {
    fn binding_layout(&self) -> &[BindingLayoutEntry] {
        &self.binding_layout
    }
}

pub struct MockBindingSet {
    pub binding_count: usize,
}

impl BindingSet for MockBindingSet {
    fn binding_count(&self) -> usize {
        self.binding_count
    }
}

// ============================================================================
// Mock CommandList
// ============================================================================

pub struct MockCommandList {
    pub log: CommandLog,
}

impl CommandList for MockCommandList {
    fn begin(&mut self) -> Result<()> {
        push(&self.log, "begin".to_string());
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        push(&self.log, "end".to_string());
        Ok(())
    }

    fn begin_render_pass(
        &mut self,
        render_pass: &Arc<dyn RenderPass>,
        framebuffer: &Arc<dyn Framebuffer>,
        clear_values: &[ClearValue],
    ) -> Result<()> {
        if clear_values.len() != render_pass.color_attachment_count() {
            return Err(Error::InvalidResource(format!(
                "{} clear values for {} attachments",
                clear_values.len(), render_pass.color_attachment_count()
            )));
        }
        let all_black = clear_values.iter().all(|c| *c == ClearValue::BLACK);
        push(&self.log, format!(
            "begin_render_pass {}x{} clears={} black={}",
            framebuffer.width(), framebuffer.height(), clear_values.len(), all_black
        ));
        Ok(())
    }

    fn end_render_pass(&mut self) -> Result<()> {
        push(&self.log, "end_render_pass".to_string());
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        push(&self.log, format!("set_viewport {}x{}", viewport.width, viewport.height));
        Ok(())
    }

    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()> {
        push(&self.log, format!("set_scissor {}x{}", scissor.width, scissor.height));
        Ok(())
    }

    fn bind_pipeline(&mut self, pipeline: &Arc<dyn Pipeline>) -> Result<()> {
        push(&self.log, format!("bind_pipeline bindings={}", pipeline.binding_layout().len()));
        Ok(())
    }

    fn bind_binding_set(
        &mut self,
        _pipeline: &Arc<dyn Pipeline>,
        binding_set: &Arc<dyn BindingSet>,
    ) -> Result<()> {
        push(&self.log, format!("bind_binding_set bindings={}", binding_set.binding_count()));
        Ok(())
    }

    fn bind_vertex_buffer(&mut self, buffer: &Arc<dyn Buffer>, offset: u64) -> Result<()> {
        push(&self.log, format!("bind_vertex_buffer size={} offset={}", buffer.size(), offset));
        Ok(())
    }

    fn draw(
        &mut self,
        vertex_count: u32,
        instance_count: u32,
        first_vertex: u32,
        first_instance: u32,
    ) -> Result<()> {
        push(&self.log, format!(
            "draw {} {} {} {}", vertex_count, instance_count, first_vertex, first_instance
        ));
        Ok(())
    }
}

// ============================================================================
// Mock Renderer
// ============================================================================

/// Renderer + FrameDriver stand-in
pub struct MockRenderer {
    /// Factory calls, e.g. `create_texture bright.color 800x800`
    pub calls: Vec<String>,
    /// Frame-loop calls, e.g. `acquire 0`, `submit 0`, `wait_fence 0`
    pub frame_calls: Vec<String>,
    pub command_logs: Vec<CommandLog>,
    pub render_passes: Vec<RenderPassDesc>,
    pub pipelines: Vec<(String, PipelineTemplate, Vec<BindingLayoutEntry>)>,
    pub swapchain: SwapchainInfo,
    pub min_uniform_alignment: u64,
    /// Texture creation fails with OutOfMemory once this many exist
    pub texture_limit: Option<usize>,
    /// `acquire` returns SwapchainOutOfDate on this call number (0-based)
    pub fail_acquire_at: Option<u64>,
    pub buffer_writes: Arc<Mutex<Vec<(u64, Vec<u8>)>>>,
    textures_created: usize,
    acquires: u64,
    next_image: u32,
    /// Fence state per image: true while signaled-but-not-waited
    pending_fences: Vec<bool>,
    pub fence_waits: Vec<u32>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::with_swapchain(3, 800, 800)
    }

    pub fn with_swapchain(image_count: u32, width: u32, height: u32) -> Self {
        Self {
            calls: Vec::new(),
            frame_calls: Vec::new(),
            command_logs: Vec::new(),
            render_passes: Vec::new(),
            pipelines: Vec::new(),
            swapchain: SwapchainInfo {
                image_count,
                width,
                height,
                format: TextureFormat::B8G8R8A8_UNORM,
            },
            min_uniform_alignment: 256,
            texture_limit: None,
            fail_acquire_at: None,
            buffer_writes: Arc::new(Mutex::new(Vec::new())),
            textures_created: 0,
            acquires: 0,
            next_image: 0,
            pending_fences: vec![false; image_count as usize],
            fence_waits: vec![0; image_count as usize],
        }
    }

    /// Snapshot of the commands recorded into command list `index`
    pub fn commands(&self, index: usize) -> Vec<String> {
        self.command_logs
            .get(index)
            .and_then(|log| log.lock().ok().map(|l| l.clone()))
            .unwrap_or_default()
    }

    fn check_index(&self, image_index: u32) -> Result<usize> {
        let i = image_index as usize;
        if i >= self.pending_fences.len() {
            return Err(Error::InvalidResource(format!("image index {} out of range", image_index)));
        }
        Ok(i)
    }
}

impl Renderer for MockRenderer {
    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn Texture>> {
        if let Some(limit) = self.texture_limit {
            if self.textures_created >= limit {
                return Err(Error::OutOfMemory);
            }
        }
        self.textures_created += 1;
        self.calls.push(format!("create_texture {} {}x{}", desc.label, desc.width, desc.height));
        Ok(Arc::new(MockTexture { info: TextureInfo::from(&desc), label: desc.label }))
    }

    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>> {
        self.calls.push(format!("create_buffer {} {}", desc.label, desc.size));
        Ok(Arc::new(MockBuffer {
            size: desc.size,
            label: desc.label,
            writes: self.buffer_writes.clone(),
        }))
    }

    fn create_shader(&mut self, desc: ShaderDesc) -> Result<Arc<dyn Shader>> {
        self.calls.push(format!("create_shader {:?} {}", desc.stage, desc.code.len()));
        Ok(Arc::new(MockShader { stage: desc.stage }))
    }

    fn create_render_pass(&mut self, desc: &RenderPassDesc) -> Result<Arc<dyn RenderPass>> {
        self.calls.push(format!("create_render_pass {}", desc.label));
        self.render_passes.push(desc.clone());
        Ok(Arc::new(MockRenderPass {
            label: desc.label.clone(),
            color_attachment_count: desc.color_attachments.len(),
        }))
    }

    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> Result<Arc<dyn Framebuffer>> {
        if desc.color_attachments.len() != desc.render_pass.color_attachment_count() {
            return Err(Error::InvalidResource("framebuffer attachment count mismatch".to_string()));
        }
        self.calls.push(format!(
            "create_framebuffer {} attachments {}x{}",
            desc.color_attachments.len(), desc.width, desc.height
        ));
        Ok(Arc::new(MockFramebuffer { width: desc.width, height: desc.height }))
    }

    fn create_swapchain_framebuffers(
        &mut self,
        _render_pass: &Arc<dyn RenderPass>,
    ) -> Result<Vec<Arc<dyn Framebuffer>>> {
        self.calls.push(format!("create_swapchain_framebuffers {}", self.swapchain.image_count));
        Ok((0..self.swapchain.image_count)
            .map(|_| Arc::new(MockFramebuffer {
                width: self.swapchain.width,
                height: self.swapchain.height,
            }) as Arc<dyn Framebuffer>)
            .collect())
    }

    fn create_pipeline(&mut self, desc: PipelineDesc) -> Result<Arc<dyn Pipeline>> {
        if desc.vertex_shader.stage() != ShaderStage::Vertex
            || desc.fragment_shader.stage() != ShaderStage::Fragment
        {
            return Err(Error::InvalidResource(format!("pipeline '{}': shader stage mismatch", desc.label)));
        }
        self.calls.push(format!("create_pipeline {}", desc.label));
        self.pipelines.push((desc.label.clone(), desc.template.clone(), desc.binding_layout.clone()));
        Ok(Arc::new(MockPipeline { label: desc.label, binding_layout: desc.binding_layout }))
    }

    fn create_binding_set(
        &mut self,
        pipeline: &Arc<dyn Pipeline>,
        resources: &[BindingResource],
    ) -> Result<Arc<dyn BindingSet>> {
        let layout = pipeline.binding_layout();
        if layout.len() != resources.len() {
            return Err(Error::InvalidResource(format!(
                "{} resources for {} bindings", resources.len(), layout.len()
            )));
        }
        for (entry, resource) in layout.iter().zip(resources) {
            if entry.binding_type != resource.binding_type() {
                return Err(Error::InvalidResource(format!(
                    "binding {}: expected {:?}, got {:?}",
                    entry.binding, entry.binding_type, resource.binding_type()
                )));
            }
        }
        self.calls.push(format!("create_binding_set {}", resources.len()));
        Ok(Arc::new(MockBindingSet { binding_count: resources.len() }))
    }

    fn create_command_list(&mut self) -> Result<Box<dyn CommandList>> {
        let log: CommandLog = Arc::new(Mutex::new(Vec::new()));
        self.command_logs.push(log.clone());
        self.calls.push("create_command_list".to_string());
        Ok(Box::new(MockCommandList { log }))
    }

    fn swapchain_info(&self) -> SwapchainInfo {
        self.swapchain
    }

    fn min_uniform_alignment(&self) -> u64 {
        self.min_uniform_alignment
    }

    fn read_texture(&mut self, texture: &Arc<dyn Texture>) -> Result<Vec<u8>> {
        let info = texture.info();
        Ok(vec![0u8; (info.width * info.height * info.format.bytes_per_pixel()) as usize])
    }

    fn wait_idle(&self) -> Result<()> {
        Ok(())
    }
}

impl FrameDriver for MockRenderer {
    fn image_count(&self) -> u32 {
        self.swapchain.image_count
    }

    fn acquire(&mut self) -> Result<u32> {
        let call = self.acquires;
        self.acquires += 1;
        if self.fail_acquire_at == Some(call) {
            self.frame_calls.push("acquire out_of_date".to_string());
            return Err(Error::SwapchainOutOfDate);
        }
        let index = self.next_image;
        self.next_image = (self.next_image + 1) % self.swapchain.image_count.max(1);
        self.frame_calls.push(format!("acquire {}", index));
        Ok(index)
    }

    fn submit(&mut self, _command_list: &dyn CommandList, image_index: u32) -> Result<()> {
        let i = self.check_index(image_index)?;
        if self.pending_fences[i] {
            return Err(Error::BackendError(format!(
                "image {} submitted while its fence is still pending", image_index
            )));
        }
        self.pending_fences[i] = true;
        self.frame_calls.push(format!("submit {}", image_index));
        Ok(())
    }

    fn present(&mut self, image_index: u32) -> Result<()> {
        self.check_index(image_index)?;
        self.frame_calls.push(format!("present {}", image_index));
        Ok(())
    }

    fn wait_and_reset_fence(&mut self, image_index: u32) -> Result<()> {
        let i = self.check_index(image_index)?;
        self.pending_fences[i] = false;
        self.fence_waits[i] += 1;
        self.frame_calls.push(format!("wait_fence {}", image_index));
        Ok(())
    }
}

// ============================================================================
// Test assets
// ============================================================================

/// Write a 4-byte placeholder for every pass shader into a fresh directory
///
/// The mock renderer never parses SPIR-V, so any non-empty multiple of
/// four bytes is accepted.
pub fn write_test_shaders(tag: &str) -> crate::config::AssetConfig {
    let dir = std::env::temp_dir().join(format!("lens_flare_shaders_{}_{}", std::process::id(), tag));
    std::fs::create_dir_all(&dir).unwrap();

    let mut names = vec![crate::graph::VERTEX_SHADER];
    names.extend(crate::graph::PASS_TABLE.iter().map(|desc| desc.fragment_shader));
    for name in names {
        std::fs::write(dir.join(name), [0x03, 0x02, 0x23, 0x07]).unwrap();
    }

    crate::config::AssetConfig {
        shader_dir: dir,
        ..Default::default()
    }
}

/// 800x800 sampled RGBA8 texture standing in for the decoded source image
pub fn source_texture() -> Arc<dyn Texture> {
    Arc::new(MockTexture {
        info: TextureInfo {
            width: 800,
            height: 800,
            format: TextureFormat::R8G8B8A8_UNORM,
            usage: crate::renderer::TextureUsage::SAMPLED | crate::renderer::TextureUsage::TRANSFER_DST,
        },
        label: "source".to_string(),
    })
}
