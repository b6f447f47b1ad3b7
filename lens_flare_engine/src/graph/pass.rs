/// Pass table - identity, output shape, shaders and bindings of every pass
///
/// The lens flare chain is a fixed sequence of full-screen passes. Each
/// entry here is consumed by one generic builder (`FrameTarget::build`,
/// `PipelineRegistry::build`, `LensFlareGraph::build`).

use crate::error::{Error, Result};
use crate::graph::binding::{Binding, BindingSource, UniformSlot};
use crate::graph::frame_target::AttachmentSlot;

/// Vertex shader shared by every pass
pub const VERTEX_SHADER: &str = "feature_extraction.vert.spv";

/// Identity of a pass, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PassId {
    Bright,
    Blur,
    BrightDft,
    BlurDft,
    ComplexMultiplication,
    Idft,
    Blend,
}

impl PassId {
    /// Every pass in execution order
    pub const ALL: [PassId; 7] = [
        PassId::Bright,
        PassId::Blur,
        PassId::BrightDft,
        PassId::BlurDft,
        PassId::ComplexMultiplication,
        PassId::Idft,
        PassId::Blend,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PassId::Bright => "bright",
            PassId::Blur => "blur",
            PassId::BrightDft => "bright_dft",
            PassId::BlurDft => "blur_dft",
            PassId::ComplexMultiplication => "complex_multiplication",
            PassId::Idft => "idft",
            PassId::Blend => "blend",
        }
    }

    /// Position in execution order
    pub fn order(&self) -> usize {
        *self as usize
    }
}

/// What a pass renders into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutput {
    /// One offscreen color attachment
    Single,
    /// Real/imaginary pair of offscreen color attachments
    Complex,
    /// The swapchain image
    Present,
}

impl PassOutput {
    pub fn attachment_count(&self) -> usize {
        match self {
            PassOutput::Single | PassOutput::Present => 1,
            PassOutput::Complex => 2,
        }
    }

    /// Slots a consumer may sample. The present target has none.
    pub fn slots(&self) -> &'static [AttachmentSlot] {
        match self {
            PassOutput::Single => &[AttachmentSlot::Color],
            PassOutput::Complex => &[AttachmentSlot::Real, AttachmentSlot::Imaginary],
            PassOutput::Present => &[],
        }
    }

    pub fn has_slot(&self, slot: AttachmentSlot) -> bool {
        self.slots().contains(&slot)
    }
}

/// Static description of one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassDesc {
    pub id: PassId,
    pub output: PassOutput,
    pub fragment_shader: &'static str,
    /// Set 0 slots and what feeds them
    pub bindings: &'static [Binding],
}

const fn attachment(binding: u32, pass: PassId, slot: AttachmentSlot) -> Binding {
    Binding::new(binding, BindingSource::Attachment { pass, slot })
}

const fn uniform(binding: u32, slot: UniformSlot) -> Binding {
    Binding::new(binding, BindingSource::Uniform(slot))
}

const fn source_texture(binding: u32) -> Binding {
    Binding::new(binding, BindingSource::SourceTexture)
}

/// Binding of the transform uniform in `fft.frag.spv`; slot 1 is the
/// imaginary input, read only by the inverse transform
const TRANSFORM_UNIFORM_BINDING: u32 = 2;

/// The lens flare pass chain, in execution order
pub const PASS_TABLE: [PassDesc; 7] = [
    PassDesc {
        id: PassId::Bright,
        output: PassOutput::Single,
        fragment_shader: "feature_extraction.frag.spv",
        bindings: &[source_texture(0)],
    },
    PassDesc {
        id: PassId::Blur,
        output: PassOutput::Single,
        fragment_shader: "blur.frag.spv",
        bindings: &[
            attachment(0, PassId::Bright, AttachmentSlot::Color),
            uniform(1, UniformSlot::Blur),
        ],
    },
    PassDesc {
        id: PassId::BrightDft,
        output: PassOutput::Complex,
        fragment_shader: "fft.frag.spv",
        bindings: &[
            attachment(0, PassId::Bright, AttachmentSlot::Color),
            uniform(TRANSFORM_UNIFORM_BINDING, UniformSlot::ForwardTransform),
        ],
    },
    PassDesc {
        id: PassId::BlurDft,
        output: PassOutput::Complex,
        fragment_shader: "fft.frag.spv",
        bindings: &[
            attachment(0, PassId::Blur, AttachmentSlot::Color),
            uniform(TRANSFORM_UNIFORM_BINDING, UniformSlot::ForwardTransform),
        ],
    },
    PassDesc {
        id: PassId::ComplexMultiplication,
        output: PassOutput::Complex,
        fragment_shader: "complex_multiplication.frag.spv",
        bindings: &[
            attachment(0, PassId::BrightDft, AttachmentSlot::Real),
            attachment(1, PassId::BrightDft, AttachmentSlot::Imaginary),
            attachment(2, PassId::BlurDft, AttachmentSlot::Real),
            attachment(3, PassId::BlurDft, AttachmentSlot::Imaginary),
        ],
    },
    PassDesc {
        id: PassId::Idft,
        output: PassOutput::Single,
        fragment_shader: "fft.frag.spv",
        bindings: &[
            attachment(0, PassId::ComplexMultiplication, AttachmentSlot::Real),
            attachment(1, PassId::ComplexMultiplication, AttachmentSlot::Imaginary),
            uniform(TRANSFORM_UNIFORM_BINDING, UniformSlot::InverseTransform),
        ],
    },
    PassDesc {
        id: PassId::Blend,
        output: PassOutput::Present,
        fragment_shader: "blend.frag.spv",
        bindings: &[
            source_texture(0),
            attachment(1, PassId::Idft, AttachmentSlot::Color),
        ],
    },
];

/// Look up a pass in `table`
pub fn find_pass(table: &[PassDesc], id: PassId) -> Result<&PassDesc> {
    table
        .iter()
        .find(|desc| desc.id == id)
        .ok_or_else(|| Error::InvalidResource(format!("pass '{}' is not in the pass table", id.name())))
}

#[cfg(test)]
#[path = "pass_tests.rs"]
mod tests;
