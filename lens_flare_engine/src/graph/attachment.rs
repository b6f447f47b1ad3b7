/// Attachment manager - offscreen color images for frame targets

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::{engine_error, engine_trace};
use crate::renderer::{Renderer, Texture, TextureDesc, TextureFormat, TextureUsage};

/// Allocates device-local color attachments
///
/// Every attachment is a single-mip, single-layer 2D image usable as a color
/// output and as a sampled input of later passes. Allocation failures are
/// setup errors and are never retried.
#[derive(Debug, Default)]
pub struct AttachmentManager {
    allocated: usize,
}

impl AttachmentManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(
        &mut self,
        renderer: &mut dyn Renderer,
        label: &str,
        format: TextureFormat,
        width: u32,
        height: u32,
    ) -> Result<Arc<dyn Texture>> {
        if width == 0 || height == 0 {
            engine_error!("lensflare::graph", "Attachment '{}' has a zero extent ({}x{})",
                label, width, height);
            return Err(Error::InitializationFailed(format!(
                "attachment '{}' has a zero extent ({}x{})", label, width, height
            )));
        }

        let texture = renderer
            .create_texture(TextureDesc {
                label: label.to_string(),
                width,
                height,
                format,
                usage: TextureUsage::COLOR_ATTACHMENT | TextureUsage::SAMPLED,
                data: None,
            })
            .map_err(|e| {
                engine_error!("lensflare::graph", "Failed to allocate attachment '{}': {}", label, e);
                match e {
                    Error::OutOfMemory => Error::OutOfMemory,
                    other => Error::InitializationFailed(format!(
                        "failed to allocate attachment '{}': {}", label, other
                    )),
                }
            })?;

        self.allocated += 1;
        engine_trace!("lensflare::graph", "Allocated attachment '{}' {}x{} {:?}",
            label, width, height, format);
        Ok(texture)
    }

    /// Allocate the real and imaginary halves of a complex target
    pub fn allocate_pair(
        &mut self,
        renderer: &mut dyn Renderer,
        label: &str,
        format: TextureFormat,
        width: u32,
        height: u32,
    ) -> Result<(Arc<dyn Texture>, Arc<dyn Texture>)> {
        let real = self.allocate(renderer, &format!("{}.real", label), format, width, height)?;
        let imaginary = self.allocate(renderer, &format!("{}.imaginary", label), format, width, height)?;
        Ok((real, imaginary))
    }

    /// Attachments allocated so far
    pub fn allocated_count(&self) -> usize {
        self.allocated
    }
}

#[cfg(test)]
#[path = "attachment_tests.rs"]
mod tests;
