/// SamplerCache - the two shared VkSamplers, created on first use
///
/// Upstream attachments are sampled nearest/clamp so every pass reads the
/// exact texel its producer wrote. The source texture is sampled
/// linear/repeat.

use lens_flare_engine::lensflare::Result;
use lens_flare_engine::lensflare::render::SamplerKind;
use lens_flare_engine::engine_err;
use ash::vk;
use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::vulkan_context::GpuContext;

pub(crate) struct SamplerCache {
    ctx: Option<Arc<GpuContext>>,
    cache: FxHashMap<SamplerKind, vk::Sampler>,
}

impl SamplerCache {
    pub(crate) fn new(ctx: Arc<GpuContext>) -> Self {
        Self {
            ctx: Some(ctx),
            cache: FxHashMap::default(),
        }
    }

    /// Get or create the VkSampler for `kind`
    pub(crate) fn get(&mut self, kind: SamplerKind) -> Result<vk::Sampler> {
        if let Some(&sampler) = self.cache.get(&kind) {
            return Ok(sampler);
        }

        let ctx = self.ctx.as_ref()
            .ok_or_else(|| engine_err!("lensflare::vulkan", "Sampler cache used after shutdown"))?;
        let sampler = unsafe {
            ctx.device.create_sampler(&sampler_create_info(kind), None)
                .map_err(|e| engine_err!("lensflare::vulkan", "Failed to create {:?} sampler: {:?}", kind, e))?
        };
        self.cache.insert(kind, sampler);
        Ok(sampler)
    }

    /// Destroy every cached sampler and release the context.
    /// Called from `VulkanRenderer::drop()` while the device is alive.
    pub(crate) fn shutdown(&mut self) {
        if let Some(ctx) = self.ctx.take() {
            for (_, sampler) in self.cache.drain() {
                unsafe { ctx.device.destroy_sampler(sampler, None); }
            }
        }
    }
}

impl Drop for SamplerCache {
    fn drop(&mut self) {
        self.shutdown();
    }
}

pub(crate) fn sampler_create_info(kind: SamplerKind) -> vk::SamplerCreateInfo<'static> {
    let (filter, mipmap, address) = match kind {
        SamplerKind::Nearest => (
            vk::Filter::NEAREST,
            vk::SamplerMipmapMode::NEAREST,
            vk::SamplerAddressMode::CLAMP_TO_EDGE,
        ),
        SamplerKind::Linear => (
            vk::Filter::LINEAR,
            vk::SamplerMipmapMode::LINEAR,
            vk::SamplerAddressMode::REPEAT,
        ),
    };

    vk::SamplerCreateInfo::default()
        .mag_filter(filter)
        .min_filter(filter)
        .mipmap_mode(mipmap)
        .address_mode_u(address)
        .address_mode_v(address)
        .address_mode_w(address)
        .mip_lod_bias(0.0)
        .anisotropy_enable(false)
        .max_anisotropy(1.0)
        .compare_enable(false)
        .compare_op(vk::CompareOp::ALWAYS)
        .min_lod(0.0)
        .max_lod(0.0)
        .border_color(vk::BorderColor::FLOAT_OPAQUE_BLACK)
        .unnormalized_coordinates(false)
}

#[cfg(test)]
#[path = "vulkan_sampler_tests.rs"]
mod tests;
