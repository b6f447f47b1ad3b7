/// BindingSet - descriptor set written once at setup
///
/// The set is owned by the renderer's descriptor pool and freed with it.

use lens_flare_engine::lensflare::render::BindingSet as RendererBindingSet;
use ash::vk;

pub struct BindingSet {
    pub(crate) descriptor_set: vk::DescriptorSet,
    binding_count: usize,
}

impl BindingSet {
    pub(crate) fn new(descriptor_set: vk::DescriptorSet, binding_count: usize) -> Self {
        Self { descriptor_set, binding_count }
    }
}

impl RendererBindingSet for BindingSet {
    fn binding_count(&self) -> usize {
        self.binding_count
    }
}
