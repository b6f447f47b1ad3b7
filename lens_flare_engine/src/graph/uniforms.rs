/// Uniform block - pass parameters in one host-visible buffer
///
/// Three segments, each aligned to the device's minimum uniform offset
/// alignment:
///
/// - blur: inverse pixel size
/// - forward transform: inverse pixel size, `is_inverse = 0`
/// - inverse transform: inverse pixel size, `is_inverse = 1`
///
/// Contents are written once at setup. The window is fixed-size, so the
/// block is never re-uploaded.

use std::sync::Arc;
use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::error::Result;
use crate::engine_debug;
use crate::graph::binding::UniformSlot;
use crate::renderer::{Renderer, Buffer, BufferDesc, BufferUsage, BindingResource};

/// `layout(binding = N) uniform UBO { vec2 invSize; }`
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct BlurParams {
    pub inv_size: Vec2,
}

/// `layout(binding = N) uniform fftUBO { vec2 invSize; bool isInverse; }`
///
/// std140 puts the bool at offset 8 as a 32-bit value; the block rounds up
/// to 16 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct TransformParams {
    pub inv_size: Vec2,
    pub is_inverse: u32,
    pub _pad: u32,
}

impl BlurParams {
    pub fn new(width: u32, height: u32) -> Self {
        Self { inv_size: inverse_size(width, height) }
    }
}

impl TransformParams {
    pub fn forward(width: u32, height: u32) -> Self {
        Self { inv_size: inverse_size(width, height), is_inverse: 0, _pad: 0 }
    }

    pub fn inverse(width: u32, height: u32) -> Self {
        Self { inv_size: inverse_size(width, height), is_inverse: 1, _pad: 0 }
    }
}

fn inverse_size(width: u32, height: u32) -> Vec2 {
    Vec2::new(1.0 / width.max(1) as f32, 1.0 / height.max(1) as f32)
}

/// Round `value` up to a multiple of `alignment` (0 means unaligned)
pub fn align_up(value: u64, alignment: u64) -> u64 {
    if alignment <= 1 {
        return value;
    }
    value.div_ceil(alignment) * alignment
}

/// Byte window of one segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformRange {
    pub offset: u64,
    pub size: u64,
}

/// Placement of the three segments inside the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformLayout {
    pub blur: UniformRange,
    pub forward: UniformRange,
    pub inverse: UniformRange,
    pub total_size: u64,
}

impl UniformLayout {
    pub fn new(min_alignment: u64) -> Self {
        let blur_size = std::mem::size_of::<BlurParams>() as u64;
        let transform_size = std::mem::size_of::<TransformParams>() as u64;

        let blur = UniformRange { offset: 0, size: blur_size };
        let forward = UniformRange {
            offset: align_up(blur.offset + blur.size, min_alignment),
            size: transform_size,
        };
        let inverse = UniformRange {
            offset: align_up(forward.offset + forward.size, min_alignment),
            size: transform_size,
        };

        Self {
            blur,
            forward,
            inverse,
            total_size: inverse.offset + inverse.size,
        }
    }

    pub fn range(&self, slot: UniformSlot) -> UniformRange {
        match slot {
            UniformSlot::Blur => self.blur,
            UniformSlot::ForwardTransform => self.forward,
            UniformSlot::InverseTransform => self.inverse,
        }
    }
}

/// The shared uniform buffer with its segments written
pub struct UniformBlock {
    buffer: Arc<dyn Buffer>,
    layout: UniformLayout,
}

impl UniformBlock {
    /// Create the buffer and write all three segments for a `width`x`height` target
    pub fn create(renderer: &mut dyn Renderer, width: u32, height: u32) -> Result<Self> {
        let layout = UniformLayout::new(renderer.min_uniform_alignment());
        let buffer = renderer.create_buffer(BufferDesc {
            label: "lens_flare.uniforms".to_string(),
            size: layout.total_size,
            usage: BufferUsage::Uniform,
        })?;

        buffer.update(layout.blur.offset, bytemuck::bytes_of(&BlurParams::new(width, height)))?;
        buffer.update(layout.forward.offset, bytemuck::bytes_of(&TransformParams::forward(width, height)))?;
        buffer.update(layout.inverse.offset, bytemuck::bytes_of(&TransformParams::inverse(width, height)))?;

        engine_debug!("lensflare::graph", "Uniform block: {} bytes, offsets {}/{}/{}",
            layout.total_size, layout.blur.offset, layout.forward.offset, layout.inverse.offset);

        Ok(Self { buffer, layout })
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    pub fn buffer(&self) -> &Arc<dyn Buffer> {
        &self.buffer
    }

    /// Binding resource for one segment
    pub fn binding(&self, slot: UniformSlot) -> BindingResource<'_> {
        let range = self.layout.range(slot);
        BindingResource::UniformBuffer {
            buffer: self.buffer.as_ref(),
            offset: range.offset,
            range: range.size,
        }
    }
}

#[cfg(test)]
#[path = "uniforms_tests.rs"]
mod tests;
