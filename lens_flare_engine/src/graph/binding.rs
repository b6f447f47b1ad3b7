/// Binding table - which upstream attachment or uniform feeds which slot
///
/// Every slot carries its own binding number, so passes that share a
/// fragment shader can agree on where each resource lives. The table is
/// resolved once at setup; no descriptor is rewritten per frame.

use crate::error::{Error, Result};
use crate::engine_error;
use crate::graph::frame_target::AttachmentSlot;
use crate::graph::pass::{PassDesc, PassId, PassOutput};
use crate::renderer::{BindingLayoutEntry, BindingType, SamplerKind, ShaderStage};

/// Segment of the shared uniform buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformSlot {
    Blur,
    ForwardTransform,
    InverseTransform,
}

/// What feeds one binding slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingSource {
    /// The decoded source image
    SourceTexture,
    /// An attachment written by an earlier pass
    Attachment { pass: PassId, slot: AttachmentSlot },
    Uniform(UniformSlot),
}

impl BindingSource {
    pub fn binding_type(&self) -> BindingType {
        match self {
            BindingSource::SourceTexture | BindingSource::Attachment { .. } => {
                BindingType::CombinedImageSampler
            }
            BindingSource::Uniform(_) => BindingType::UniformBuffer,
        }
    }

    /// Sampler used for image sources, `None` for uniforms
    pub fn sampler_kind(&self) -> Option<SamplerKind> {
        match self {
            BindingSource::SourceTexture => Some(SamplerKind::Linear),
            BindingSource::Attachment { .. } => Some(SamplerKind::Nearest),
            BindingSource::Uniform(_) => None,
        }
    }
}

/// One slot of a pass's set 0 layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub binding: u32,
    pub source: BindingSource,
}

impl Binding {
    pub const fn new(binding: u32, source: BindingSource) -> Self {
        Self { binding, source }
    }

    pub fn binding_type(&self) -> BindingType {
        self.source.binding_type()
    }
}

/// Set 0 layout of a pass, in declaration order, read by the fragment stage
pub fn layout_entries(bindings: &[Binding]) -> Vec<BindingLayoutEntry> {
    bindings
        .iter()
        .map(|entry| BindingLayoutEntry {
            binding: entry.binding,
            binding_type: entry.binding_type(),
            stage: ShaderStage::Fragment,
        })
        .collect()
}

fn invalid(pass: PassId, binding: u32, reason: String) -> Error {
    engine_error!("lensflare::graph", "Pass '{}' binding {}: {}", pass.name(), binding, reason);
    Error::InvalidResource(format!("pass '{}' binding {}: {}", pass.name(), binding, reason))
}

/// Check every binding of `table`
///
/// - no pass uses a binding number twice
/// - the producer runs earlier in `table` than the consumer
/// - the slot exists on the producer's output shape
/// - nothing samples the present target
pub fn validate_bindings(table: &[PassDesc]) -> Result<()> {
    for (position, consumer) in table.iter().enumerate() {
        for (index, entry) in consumer.bindings.iter().enumerate() {
            let binding = entry.binding;
            if consumer.bindings[..index].iter().any(|earlier| earlier.binding == binding) {
                return Err(invalid(consumer.id, binding, "is declared twice".to_string()));
            }

            let BindingSource::Attachment { pass, slot } = &entry.source else {
                continue;
            };

            let producer_position = table.iter().position(|desc| desc.id == *pass).ok_or_else(|| {
                invalid(consumer.id, binding, format!("reads '{}', which is not in the table", pass.name()))
            })?;
            let producer = &table[producer_position];

            if producer_position >= position {
                return Err(invalid(consumer.id, binding, format!(
                    "reads '{}', which does not run earlier", pass.name()
                )));
            }
            if producer.output == PassOutput::Present {
                return Err(invalid(consumer.id, binding, format!(
                    "reads the present target of '{}'", pass.name()
                )));
            }
            if !producer.output.has_slot(*slot) {
                return Err(invalid(consumer.id, binding, format!(
                    "reads {:?} from '{}', whose output is {:?}", slot, pass.name(), producer.output
                )));
            }
        }
    }
    Ok(())
}

/// Check that passes sharing a fragment shader agree on binding types
///
/// A binding number used by two such passes must hold the same kind of
/// resource in both; each pass may leave out numbers the other uses.
pub fn validate_shared_layouts(table: &[PassDesc]) -> Result<()> {
    for (position, desc) in table.iter().enumerate() {
        for other in table[position + 1..].iter().filter(|o| o.fragment_shader == desc.fragment_shader) {
            for entry in desc.bindings {
                let Some(clash) = other
                    .bindings
                    .iter()
                    .find(|o| o.binding == entry.binding && o.binding_type() != entry.binding_type())
                else {
                    continue;
                };

                engine_error!("lensflare::graph",
                    "Passes '{}' and '{}' share '{}' but binding {} is {:?} in one and {:?} in the other",
                    desc.id.name(), other.id.name(), desc.fragment_shader,
                    entry.binding, entry.binding_type(), clash.binding_type());
                return Err(Error::InvalidResource(format!(
                    "passes '{}' and '{}' disagree on binding {} of '{}'",
                    desc.id.name(), other.id.name(), entry.binding, desc.fragment_shader
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "binding_tests.rs"]
mod tests;
