/// GpuContext - device, allocator and upload queue shared by every Vulkan object
///
/// Resources hold an `Arc<GpuContext>` so they can free their memory and
/// destroy their handles on Drop. Device and instance destruction stays in
/// `VulkanRenderer::drop()`, which runs after every resource is gone.

use ash::vk;
use gpu_allocator::vulkan::{Allocation, AllocationCreateDesc, AllocationScheme, Allocator};
use gpu_allocator::MemoryLocation;
use lens_flare_engine::lensflare::{Error, Result};
use lens_flare_engine::{engine_err, engine_error};
use std::mem::ManuallyDrop;
use std::sync::{Arc, Mutex};

pub struct GpuContext {
    pub device: ash::Device,

    /// Dropped by `VulkanRenderer::drop()` before the device is destroyed
    pub allocator: ManuallyDrop<Arc<Mutex<Allocator>>>,

    pub graphics_queue: vk::Queue,
    pub graphics_queue_family: u32,

    /// TRANSIENT | RESET_COMMAND_BUFFER pool for staging copies and readbacks
    pub upload_command_pool: Mutex<vk::CommandPool>,
}

impl GpuContext {
    pub fn new(
        device: ash::Device,
        allocator: Arc<Mutex<Allocator>>,
        graphics_queue: vk::Queue,
        graphics_queue_family: u32,
        upload_command_pool: vk::CommandPool,
    ) -> Self {
        Self {
            device,
            allocator: ManuallyDrop::new(allocator),
            graphics_queue,
            graphics_queue_family,
            upload_command_pool: Mutex::new(upload_command_pool),
        }
    }

    /// Allocate device memory; any allocator failure is reported as `OutOfMemory`
    pub fn allocate(
        &self,
        name: &str,
        requirements: vk::MemoryRequirements,
        location: MemoryLocation,
        linear: bool,
    ) -> Result<Allocation> {
        let mut allocator = self.allocator.lock()
            .map_err(|_| engine_err!("lensflare::vulkan", "GPU allocator mutex poisoned"))?;

        allocator.allocate(&AllocationCreateDesc {
            name,
            requirements,
            location,
            linear,
            allocation_scheme: AllocationScheme::GpuAllocatorManaged,
        })
        .map_err(|e| {
            let size_mb = requirements.size as f64 / (1024.0 * 1024.0);
            engine_error!("lensflare::vulkan", "Out of GPU memory for {} ({:.2} MB): {}", name, size_mb, e);
            Error::OutOfMemory
        })
    }

    /// Return an allocation to the allocator. Failures are ignored (Drop paths).
    pub fn free(&self, allocation: Allocation) {
        if let Ok(mut allocator) = self.allocator.lock() {
            allocator.free(allocation).ok();
        }
    }

    /// Create a buffer with bound memory
    pub fn create_buffer_with_memory(
        &self,
        name: &str,
        size: u64,
        usage: vk::BufferUsageFlags,
        location: MemoryLocation,
    ) -> Result<(vk::Buffer, Allocation)> {
        unsafe {
            let create_info = vk::BufferCreateInfo::default()
                .size(size)
                .usage(usage)
                .sharing_mode(vk::SharingMode::EXCLUSIVE);

            let buffer = self.device.create_buffer(&create_info, None)
                .map_err(|e| engine_err!("lensflare::vulkan", "Failed to create {} ({} bytes): {:?}", name, size, e))?;

            let requirements = self.device.get_buffer_memory_requirements(buffer);
            let allocation = match self.allocate(name, requirements, location, true) {
                Ok(allocation) => allocation,
                Err(e) => {
                    self.device.destroy_buffer(buffer, None);
                    return Err(e);
                }
            };

            if let Err(e) = self.device.bind_buffer_memory(buffer, allocation.memory(), allocation.offset()) {
                self.free(allocation);
                self.device.destroy_buffer(buffer, None);
                return Err(engine_err!("lensflare::vulkan", "Failed to bind {} memory: {:?}", name, e));
            }

            Ok((buffer, allocation))
        }
    }

    /// Record commands into a throwaway command buffer, submit and wait
    ///
    /// Used for staging uploads and readbacks at setup time only.
    pub fn one_shot<F>(&self, record: F) -> Result<()>
    where
        F: FnOnce(vk::CommandBuffer),
    {
        let pool = self.upload_command_pool.lock()
            .map_err(|_| engine_err!("lensflare::vulkan", "Upload command pool mutex poisoned"))?;

        unsafe {
            let allocate_info = vk::CommandBufferAllocateInfo::default()
                .command_pool(*pool)
                .level(vk::CommandBufferLevel::PRIMARY)
                .command_buffer_count(1);

            let command_buffers = self.device.allocate_command_buffers(&allocate_info)
                .map_err(|e| engine_err!("lensflare::vulkan", "Failed to allocate one-shot command buffer: {:?}", e))?;
            let command_buffer = command_buffers[0];

            let result = self.record_and_submit(command_buffer, record);
            self.device.free_command_buffers(*pool, &command_buffers);
            result
        }
    }

    unsafe fn record_and_submit<F>(&self, command_buffer: vk::CommandBuffer, record: F) -> Result<()>
    where
        F: FnOnce(vk::CommandBuffer),
    {
        let begin_info = vk::CommandBufferBeginInfo::default()
            .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);
        self.device.begin_command_buffer(command_buffer, &begin_info)
            .map_err(|e| engine_err!("lensflare::vulkan", "Failed to begin one-shot command buffer: {:?}", e))?;

        record(command_buffer);

        self.device.end_command_buffer(command_buffer)
            .map_err(|e| engine_err!("lensflare::vulkan", "Failed to end one-shot command buffer: {:?}", e))?;

        let command_buffers = [command_buffer];
        let submit_info = vk::SubmitInfo::default().command_buffers(&command_buffers);
        self.device.queue_submit(self.graphics_queue, &[submit_info], vk::Fence::null())
            .map_err(|e| engine_err!("lensflare::vulkan", "Failed to submit one-shot command buffer: {:?}", e))?;
        self.device.queue_wait_idle(self.graphics_queue)
            .map_err(|e| engine_err!("lensflare::vulkan", "Failed to wait for one-shot command buffer: {:?}", e))?;

        Ok(())
    }
}
