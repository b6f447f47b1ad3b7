/// Pipeline - graphics pipeline with its layout and set 0 descriptor layout

use lens_flare_engine::lensflare::render::{Pipeline as RendererPipeline, BindingLayoutEntry};
use ash::vk;

pub struct Pipeline {
    pub(crate) pipeline: vk::Pipeline,
    pub(crate) pipeline_layout: vk::PipelineLayout,
    pub(crate) set_layout: vk::DescriptorSetLayout,
    binding_layout: Vec<BindingLayoutEntry>,
    device: ash::Device,
}

impl Pipeline {
    pub(crate) fn new(
        pipeline: vk::Pipeline,
        pipeline_layout: vk::PipelineLayout,
        set_layout: vk::DescriptorSetLayout,
        binding_layout: Vec<BindingLayoutEntry>,
        device: ash::Device,
    ) -> Self {
        Self { pipeline, pipeline_layout, set_layout, binding_layout, device }
    }
}

impl RendererPipeline for Pipeline {
    fn binding_layout(&self) -> &[BindingLayoutEntry] {
        &self.binding_layout
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_pipeline(self.pipeline, None);
            self.device.destroy_pipeline_layout(self.pipeline_layout, None);
            self.device.destroy_descriptor_set_layout(self.set_layout, None);
        }
    }
}
