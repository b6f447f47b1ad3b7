/// Lens flare graph - every setup resource of the pass chain
///
/// Built once from the pass table, immutable afterwards. `record` writes
/// the whole chain for one swapchain image into a command list.

use std::sync::Arc;
use rustc_hash::FxHashMap;

use crate::config::AssetConfig;
use crate::error::{Error, Result};
use crate::{engine_error, engine_info};
use crate::graph::attachment::AttachmentManager;
use crate::graph::binding::{BindingSource, validate_bindings};
use crate::graph::dependency::validate_pass_chain;
use crate::graph::frame_target::{AttachmentSlot, FrameTarget, PresentTarget, render_pass_desc};
use crate::graph::pass::{PassDesc, PassId, PassOutput, PASS_TABLE, find_pass};
use crate::graph::registry::PipelineRegistry;
use crate::graph::uniforms::UniformBlock;
use crate::renderer::{
    Renderer, Texture, RenderPass, Framebuffer, BindingSet, BindingResource, CommandList,
    ClearValue, Viewport, Rect2D, SamplerKind,
};

/// Setup resources of the lens flare chain
///
/// Fields drop in declaration order: binding sets, pipelines, uniforms,
/// offscreen targets, present target, source texture.
pub struct LensFlareGraph {
    binding_sets: FxHashMap<PassId, Arc<dyn BindingSet>>,
    registry: PipelineRegistry,
    uniforms: UniformBlock,
    targets: FxHashMap<PassId, FrameTarget>,
    present: PresentTarget,
    source: Arc<dyn Texture>,
    passes: Vec<PassDesc>,
    attachment_count: usize,
}

impl LensFlareGraph {
    /// Build the standard seven-pass chain over `source`
    pub fn build(
        renderer: &mut dyn Renderer,
        assets: &AssetConfig,
        source: Arc<dyn Texture>,
    ) -> Result<Self> {
        Self::build_with_table(renderer, assets, source, &PASS_TABLE)
    }

    /// Build a chain from an arbitrary table
    ///
    /// The table must be valid (see `validate_bindings`) and have exactly one
    /// pass with `PassOutput::Present`, which must come last.
    pub fn build_with_table(
        renderer: &mut dyn Renderer,
        assets: &AssetConfig,
        source: Arc<dyn Texture>,
        table: &[PassDesc],
    ) -> Result<Self> {
        validate_bindings(table)?;

        let info = renderer.swapchain_info();
        validate_pass_chain(table, |id| match find_pass(table, id) {
            Ok(desc) => render_pass_desc(desc, info.format).dependencies,
            Err(_) => Vec::new(),
        })?;

        let present_desc = match table.last() {
            Some(desc) if desc.output == PassOutput::Present => desc,
            _ => {
                engine_error!("lensflare::graph", "Pass table does not end with the present pass");
                return Err(Error::InvalidResource("pass table must end with the present pass".to_string()));
            }
        };
        if table.iter().filter(|desc| desc.output == PassOutput::Present).count() != 1 {
            return Err(Error::InvalidResource("pass table has more than one present pass".to_string()));
        }

        let mut manager = AttachmentManager::new();
        let mut targets = FxHashMap::default();
        let mut render_passes: FxHashMap<PassId, Arc<dyn RenderPass>> = FxHashMap::default();

        for desc in table.iter().filter(|desc| desc.output != PassOutput::Present) {
            let target = FrameTarget::build(renderer, &mut manager, desc, info.width, info.height)?;
            render_passes.insert(desc.id, target.render_pass().clone());
            targets.insert(desc.id, target);
        }

        let present = PresentTarget::build(renderer, present_desc)?;
        render_passes.insert(present_desc.id, present.render_pass().clone());

        let registry = PipelineRegistry::build(renderer, assets, table, &render_passes)?;
        let uniforms = UniformBlock::create(renderer, info.width, info.height)?;

        let mut binding_sets = FxHashMap::default();
        for desc in table {
            let resources = desc
                .bindings
                .iter()
                .map(|entry| resolve(&entry.source, &source, &targets, &uniforms))
                .collect::<Result<Vec<_>>>()?;
            let pipeline = &registry.get(desc.id)?.pipeline;
            let set = renderer.create_binding_set(pipeline, &resources)?;
            binding_sets.insert(desc.id, set);
        }

        engine_info!("lensflare::graph", "Lens flare graph ready: {} passes, {} attachments, {}x{}",
            table.len(), manager.allocated_count(), info.width, info.height);

        Ok(Self {
            binding_sets,
            registry,
            uniforms,
            targets,
            present,
            source,
            passes: table.to_vec(),
            attachment_count: manager.allocated_count(),
        })
    }

    /// Record the full pass chain for swapchain image `image_index`
    ///
    /// Per pass: begin with black clears, viewport and scissor over the
    /// target, pipeline, binding set, a 3-vertex draw, end.
    pub fn record(&self, cmd: &mut dyn CommandList, image_index: u32) -> Result<()> {
        for desc in &self.passes {
            let (render_pass, framebuffer, width, height) = self.pass_target(desc, image_index)?;
            let clears = vec![ClearValue::BLACK; render_pass.color_attachment_count()];
            let binding = self.registry.get(desc.id)?;
            let binding_set = self.binding_sets.get(&desc.id).ok_or_else(|| {
                Error::InvalidResource(format!("no binding set for pass '{}'", desc.id.name()))
            })?;

            cmd.begin_render_pass(render_pass, framebuffer, &clears)?;
            cmd.set_viewport(Viewport::full(width, height))?;
            cmd.set_scissor(Rect2D::full(width, height))?;
            cmd.bind_pipeline(&binding.pipeline)?;
            cmd.bind_binding_set(&binding.pipeline, binding_set)?;
            cmd.draw(3, 1, 0, 0)?;
            cmd.end_render_pass()?;
        }
        Ok(())
    }

    fn pass_target(
        &self,
        desc: &PassDesc,
        image_index: u32,
    ) -> Result<(&Arc<dyn RenderPass>, &Arc<dyn Framebuffer>, u32, u32)> {
        if desc.output == PassOutput::Present {
            let framebuffer = self.present.framebuffer(image_index)?;
            return Ok((self.present.render_pass(), framebuffer, self.present.width(), self.present.height()));
        }
        let target = self.target(desc.id)?;
        Ok((target.render_pass(), target.framebuffer(), target.width(), target.height()))
    }

    pub fn target(&self, pass: PassId) -> Result<&FrameTarget> {
        self.targets.get(&pass).ok_or_else(|| {
            Error::InvalidResource(format!("pass '{}' has no offscreen target", pass.name()))
        })
    }

    pub fn attachment(&self, pass: PassId, slot: AttachmentSlot) -> Result<&Arc<dyn Texture>> {
        self.target(pass)?.attachment(slot)
    }

    pub fn present(&self) -> &PresentTarget {
        &self.present
    }

    pub fn registry(&self) -> &PipelineRegistry {
        &self.registry
    }

    pub fn uniforms(&self) -> &UniformBlock {
        &self.uniforms
    }

    pub fn source_texture(&self) -> &Arc<dyn Texture> {
        &self.source
    }

    pub fn passes(&self) -> &[PassDesc] {
        &self.passes
    }

    pub fn attachment_count(&self) -> usize {
        self.attachment_count
    }
}

fn resolve<'a>(
    source: &BindingSource,
    source_texture: &'a Arc<dyn Texture>,
    targets: &'a FxHashMap<PassId, FrameTarget>,
    uniforms: &'a UniformBlock,
) -> Result<BindingResource<'a>> {
    Ok(match source {
        BindingSource::SourceTexture => {
            BindingResource::SampledTexture(source_texture.as_ref(), SamplerKind::Linear)
        }
        BindingSource::Attachment { pass, slot } => {
            let target = targets.get(pass).ok_or_else(|| {
                Error::InvalidResource(format!("pass '{}' has no offscreen target", pass.name()))
            })?;
            BindingResource::SampledTexture(target.attachment(*slot)?.as_ref(), SamplerKind::Nearest)
        }
        BindingSource::Uniform(slot) => uniforms.binding(*slot),
    })
}

#[cfg(test)]
#[path = "lens_flare_graph_tests.rs"]
mod tests;
