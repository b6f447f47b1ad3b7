/// Shader - Vulkan shader module plus the descriptor bindings it declares
///
/// Bindings are reflected from the SPIR-V with `spirq` when the module is
/// created, so a pipeline can be checked against the layout its pass
/// declares before any descriptor set is written.

use lens_flare_engine::lensflare::{Result, Error};
use lens_flare_engine::lensflare::render::{
    Shader as RendererShader, ShaderStage, BindingType, BindingLayoutEntry,
};
use lens_flare_engine::{engine_bail, engine_error, engine_warn};
use ash::vk;

/// One descriptor declared by a shader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReflectedBinding {
    pub set: u32,
    pub binding: u32,
    pub binding_type: BindingType,
}

pub struct Shader {
    pub(crate) module: vk::ShaderModule,
    stage: ShaderStage,
    pub(crate) entry_point: String,
    pub(crate) reflected: Vec<ReflectedBinding>,
    device: ash::Device,
}

impl Shader {
    pub(crate) fn new(
        module: vk::ShaderModule,
        stage: ShaderStage,
        entry_point: String,
        reflected: Vec<ReflectedBinding>,
        device: ash::Device,
    ) -> Self {
        Self { module, stage, entry_point, reflected, device }
    }
}

impl RendererShader for Shader {
    fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_shader_module(self.module, None);
        }
    }
}

/// Reinterpret SPIR-V bytes as words. The length must be a multiple of 4.
pub(crate) fn spirv_words(code: &[u8]) -> Result<Vec<u32>> {
    if code.is_empty() || code.len() % 4 != 0 {
        engine_bail!("lensflare::vulkan",
            "Shader code is not SPIR-V ({} bytes, expected a non-empty multiple of 4)", code.len());
    }

    Ok(code
        .chunks_exact(4)
        .map(|word| u32::from_le_bytes([word[0], word[1], word[2], word[3]]))
        .collect())
}

/// Extract the descriptor bindings of every entry point
pub(crate) fn reflect_bindings(words: &[u32]) -> Result<Vec<ReflectedBinding>> {
    let entry_points = spirq::ReflectConfig::new()
        .spv(words)
        .ref_all_rscs(true)
        .reflect()
        .map_err(|e| {
            engine_error!("lensflare::vulkan", "SPIR-V reflection failed: {:?}", e);
            Error::InitializationFailed(format!("SPIR-V reflection failed: {:?}", e))
        })?;

    let mut bindings: Vec<ReflectedBinding> = Vec::new();
    for entry_point in &entry_points {
        for var in entry_point.vars.iter() {
            if let spirq::var::Variable::Descriptor { desc_bind, desc_ty, .. } = var {
                let reflected = ReflectedBinding {
                    set: desc_bind.set(),
                    binding: desc_bind.bind(),
                    binding_type: descriptor_type_to_binding_type(desc_ty)?,
                };
                if !bindings.contains(&reflected) {
                    bindings.push(reflected);
                }
            }
        }
    }

    Ok(bindings)
}

fn descriptor_type_to_binding_type(desc_ty: &spirq::ty::DescriptorType) -> Result<BindingType> {
    use spirq::ty::DescriptorType;
    match desc_ty {
        DescriptorType::UniformBuffer() => Ok(BindingType::UniformBuffer),
        DescriptorType::CombinedImageSampler() => Ok(BindingType::CombinedImageSampler),
        other => {
            engine_error!("lensflare::vulkan", "Unsupported SPIR-V descriptor type: {:?}", other);
            Err(Error::InvalidResource(format!("unsupported descriptor type {:?}", other)))
        }
    }
}

/// Check a shader's declared bindings against the set 0 layout of its pass
///
/// Every declared binding must live in set 0. Those present in `layout`
/// must match its descriptor type and be visible to `stage`; the rest are
/// only logged.
pub(crate) fn check_bindings(
    label: &str,
    stage: ShaderStage,
    reflected: &[ReflectedBinding],
    layout: &[BindingLayoutEntry],
) -> Result<()> {
    for declared in reflected {
        if declared.set != 0 {
            engine_error!("lensflare::vulkan",
                "Pipeline '{}': {:?} shader uses descriptor set {}, only set 0 exists",
                label, stage, declared.set);
            return Err(Error::InvalidResource(format!(
                "pipeline '{}': {:?} shader uses set {}", label, stage, declared.set
            )));
        }

        // A shader shared by several passes may declare slots that some of
        // them never feed
        let Some(entry) = layout.iter().find(|entry| entry.binding == declared.binding) else {
            engine_warn!("lensflare::vulkan",
                "Pipeline '{}': {:?} shader declares binding {}, which the pass layout leaves out",
                label, stage, declared.binding);
            continue;
        };

        if entry.binding_type != declared.binding_type {
            engine_error!("lensflare::vulkan",
                "Pipeline '{}': binding {} is {:?} in the shader but {:?} in the layout",
                label, declared.binding, declared.binding_type, entry.binding_type);
            return Err(Error::InvalidResource(format!(
                "pipeline '{}': binding {} type mismatch", label, declared.binding
            )));
        }

        if entry.stage != stage {
            engine_error!("lensflare::vulkan",
                "Pipeline '{}': binding {} is read by the {:?} shader but declared for {:?}",
                label, declared.binding, stage, entry.stage);
            return Err(Error::InvalidResource(format!(
                "pipeline '{}': binding {} stage mismatch", label, declared.binding
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "vulkan_shader_tests.rs"]
mod tests;
