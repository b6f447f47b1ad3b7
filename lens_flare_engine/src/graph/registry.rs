/// Pipeline registry - one immutable pipeline binding per pass

use std::sync::Arc;
use rustc_hash::FxHashMap;

use crate::config::AssetConfig;
use crate::error::{Error, Result};
use crate::{engine_error, engine_info};
use crate::graph::binding::{layout_entries, validate_shared_layouts};
use crate::graph::pass::{PassDesc, PassId, VERTEX_SHADER};
use crate::renderer::{
    Renderer, RenderPass, Shader, Pipeline, PipelineDesc, PipelineTemplate, ShaderStage,
    BindingLayoutEntry, load_shader_file,
};

/// Pipeline, layout and shader pair of one pass
pub struct PipelineBinding {
    pub pass: PassId,
    pub pipeline: Arc<dyn Pipeline>,
    pub layout: Vec<BindingLayoutEntry>,
    pub vertex_shader: Arc<dyn Shader>,
    pub fragment_shader: Arc<dyn Shader>,
}

/// Pipelines keyed by pass identity
pub struct PipelineRegistry {
    bindings: FxHashMap<PassId, PipelineBinding>,
}

impl PipelineRegistry {
    /// Load shaders and build a pipeline for every pass of `table`
    ///
    /// The shared vertex shader is created once and fragment shaders used
    /// by several passes are created once per file, so their layouts must
    /// agree on every binding number they share. Any missing shader file or
    /// backend failure aborts the whole build.
    pub fn build(
        renderer: &mut dyn Renderer,
        assets: &AssetConfig,
        table: &[PassDesc],
        render_passes: &FxHashMap<PassId, Arc<dyn RenderPass>>,
    ) -> Result<Self> {
        validate_shared_layouts(table)?;

        let vertex_shader = create_shader(renderer, assets, VERTEX_SHADER, ShaderStage::Vertex)?;
        let mut fragment_shaders: FxHashMap<&'static str, Arc<dyn Shader>> = FxHashMap::default();
        let mut bindings = FxHashMap::default();

        for desc in table {
            let render_pass = render_passes.get(&desc.id).ok_or_else(|| {
                engine_error!("lensflare::graph", "No render pass for pass '{}'", desc.id.name());
                Error::InvalidResource(format!("no render pass for pass '{}'", desc.id.name()))
            })?;

            let fragment_shader = match fragment_shaders.get(desc.fragment_shader) {
                Some(shader) => shader.clone(),
                None => {
                    let shader = create_shader(renderer, assets, desc.fragment_shader, ShaderStage::Fragment)?;
                    fragment_shaders.insert(desc.fragment_shader, shader.clone());
                    shader
                }
            };

            let layout = layout_entries(desc.bindings);
            let pipeline = renderer
                .create_pipeline(PipelineDesc {
                    label: desc.id.name().to_string(),
                    vertex_shader: vertex_shader.clone(),
                    fragment_shader: fragment_shader.clone(),
                    render_pass: render_pass.clone(),
                    template: PipelineTemplate::fullscreen(desc.output.attachment_count()),
                    binding_layout: layout.clone(),
                })
                .map_err(|e| {
                    engine_error!("lensflare::graph", "Failed to build pipeline '{}': {}", desc.id.name(), e);
                    e
                })?;

            bindings.insert(desc.id, PipelineBinding {
                pass: desc.id,
                pipeline,
                layout,
                vertex_shader: vertex_shader.clone(),
                fragment_shader,
            });
        }

        engine_info!("lensflare::graph", "Built {} pipelines from {} fragment shaders",
            bindings.len(), fragment_shaders.len());

        Ok(Self { bindings })
    }

    pub fn get(&self, pass: PassId) -> Result<&PipelineBinding> {
        self.bindings.get(&pass).ok_or_else(|| {
            Error::InvalidResource(format!("no pipeline registered for pass '{}'", pass.name()))
        })
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

fn create_shader(
    renderer: &mut dyn Renderer,
    assets: &AssetConfig,
    name: &str,
    stage: ShaderStage,
) -> Result<Arc<dyn Shader>> {
    let desc = load_shader_file(&assets.shader_path(name), stage)?;
    renderer.create_shader(desc)
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
