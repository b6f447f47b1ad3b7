/// Buffer - host-visible Vulkan buffer (uniform segments, triangle vertices)

use lens_flare_engine::lensflare::{Result, Error, render::Buffer as RendererBuffer};
use lens_flare_engine::{engine_error, engine_err};
use ash::vk;
use gpu_allocator::vulkan::Allocation;
use std::sync::Arc;

use crate::vulkan_context::GpuContext;

pub struct Buffer {
    ctx: Arc<GpuContext>,
    pub(crate) buffer: vk::Buffer,
    allocation: Option<Allocation>,
    size: u64,
}

impl Buffer {
    pub(crate) fn new(
        ctx: Arc<GpuContext>,
        buffer: vk::Buffer,
        allocation: Allocation,
        size: u64,
    ) -> Self {
        Self {
            ctx,
            buffer,
            allocation: Some(allocation),
            size,
        }
    }

    /// Copy the first `len` bytes out of a host-visible buffer
    pub(crate) fn read(&self, len: u64) -> Result<Vec<u8>> {
        if len > self.size {
            return Err(engine_err!("lensflare::vulkan",
                "Buffer read of {} bytes exceeds size {}", len, self.size));
        }

        let mapped_ptr = self.allocation
            .as_ref()
            .and_then(|allocation| allocation.mapped_ptr())
            .ok_or_else(|| engine_err!("lensflare::vulkan", "Buffer is not CPU-accessible"))?
            .as_ptr() as *const u8;

        let mut data = vec![0u8; len as usize];
        unsafe {
            std::ptr::copy_nonoverlapping(mapped_ptr, data.as_mut_ptr(), data.len());
        }
        Ok(data)
    }
}

impl RendererBuffer for Buffer {
    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        let end = offset.checked_add(data.len() as u64);
        if end.map_or(true, |end| end > self.size) {
            engine_error!("lensflare::vulkan",
                "Buffer update out of range: {} bytes at offset {} (size {})",
                data.len(), offset, self.size);
            return Err(Error::InvalidResource(format!(
                "buffer update of {} bytes at offset {} exceeds size {}", data.len(), offset, self.size
            )));
        }

        let allocation = self.allocation.as_ref().ok_or_else(|| {
            engine_error!("lensflare::vulkan", "Buffer update failed: no GPU allocation");
            Error::BackendError("Buffer has no allocation".to_string())
        })?;

        let mapped_ptr = allocation
            .mapped_ptr()
            .ok_or_else(|| Error::BackendError("Buffer is not CPU-accessible".to_string()))?
            .as_ptr() as *mut u8;

        unsafe {
            std::ptr::copy_nonoverlapping(
                data.as_ptr(),
                mapped_ptr.add(offset as usize),
                data.len(),
            );
        }

        Ok(())
    }

    fn size(&self) -> u64 {
        self.size
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        unsafe {
            if let Some(allocation) = self.allocation.take() {
                self.ctx.free(allocation);
            }

            self.ctx.device.destroy_buffer(self.buffer, None);
        }
    }
}
