/// BindingSet trait and descriptor set layout description
///
/// A BindingSet is an immutable descriptor set (set 0) created once at setup.
/// The layout comes from the pipeline it is created for.

use crate::renderer::{Texture, Buffer, ShaderStage};

// ============================================================================
// Layout description
// ============================================================================

/// Type of resource bound at a given slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingType {
    /// Texture + sampler in one binding
    CombinedImageSampler,
    /// Read-only structured data
    UniformBuffer,
}

/// One slot of a descriptor set layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingLayoutEntry {
    /// Binding number (`layout(binding = N)` in GLSL)
    pub binding: u32,
    pub binding_type: BindingType,
    /// Stage that reads the binding
    pub stage: ShaderStage,
}

/// Sampler flavour, resolved to a shared backend sampler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamplerKind {
    /// Nearest filtering, clamp-to-edge. Used for upstream pass attachments.
    Nearest,
    /// Linear filtering, repeat. Used for the source texture.
    Linear,
}

// ============================================================================
// Concrete resources
// ============================================================================

/// A concrete resource written into one binding slot
pub enum BindingResource<'a> {
    SampledTexture(&'a dyn Texture, SamplerKind),
    /// A `range`-byte window of `buffer` starting at `offset`
    UniformBuffer {
        buffer: &'a dyn Buffer,
        offset: u64,
        range: u64,
    },
}

impl BindingResource<'_> {
    pub fn binding_type(&self) -> BindingType {
        match self {
            BindingResource::SampledTexture(..) => BindingType::CombinedImageSampler,
            BindingResource::UniformBuffer { .. } => BindingType::UniformBuffer,
        }
    }
}

/// Immutable set of GPU resource bindings
///
/// The same set is bound every frame. Create a new one to change resources.
pub trait BindingSet: Send + Sync {
    /// Number of bindings written at creation
    fn binding_count(&self) -> usize;
}
