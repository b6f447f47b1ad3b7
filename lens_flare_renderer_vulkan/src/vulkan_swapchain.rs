/// Swapchain - presentable images plus the per-image frame sync objects
///
/// Sync layout:
/// - one acquire semaphore, reused every frame. Its previous wait has
///   always completed because the fence of the previous frame was waited.
/// - one render-complete semaphore per image, waited by present.
/// - one fence per image, signaled by submit and waited + reset by
///   `wait_and_reset_fence`. Created unsignaled: nothing waits on a fence
///   before its first submit.
///
/// The surface is fixed-size. Out-of-date is reported, never recreated.

use lens_flare_engine::lensflare::{Result, Error};
use lens_flare_engine::{engine_error, engine_err, engine_info};
use ash::vk;

pub(crate) struct Swapchain {
    device: ash::Device,

    surface: vk::SurfaceKHR,
    surface_loader: ash::khr::surface::Instance,

    pub(crate) swapchain: vk::SwapchainKHR,
    pub(crate) swapchain_loader: ash::khr::swapchain::Device,
    pub(crate) images: Vec<vk::Image>,
    pub(crate) image_views: Vec<vk::ImageView>,
    pub(crate) format: vk::Format,
    pub(crate) extent: vk::Extent2D,

    pub(crate) acquire_semaphore: vk::Semaphore,
    pub(crate) render_complete_semaphores: Vec<vk::Semaphore>,
    pub(crate) in_flight_fences: Vec<vk::Fence>,
}

impl Swapchain {
    /// Create the swapchain, its image views and sync objects
    ///
    /// Takes ownership of `surface`: it is destroyed with the swapchain.
    pub(crate) fn new(
        instance: &ash::Instance,
        device: &ash::Device,
        physical_device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
        surface_loader: ash::khr::surface::Instance,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let swapchain_loader = ash::khr::swapchain::Device::new(instance, device);

        // Owns every handle created below, so an early return releases them
        let mut this = Self {
            device: device.clone(),
            surface,
            surface_loader,
            swapchain: vk::SwapchainKHR::null(),
            swapchain_loader,
            images: Vec::new(),
            image_views: Vec::new(),
            format: vk::Format::UNDEFINED,
            extent: vk::Extent2D { width, height },
            acquire_semaphore: vk::Semaphore::null(),
            render_complete_semaphores: Vec::new(),
            in_flight_fences: Vec::new(),
        };

        unsafe {
            let capabilities = this.surface_loader
                .get_physical_device_surface_capabilities(physical_device, surface)
                .map_err(|e| init_error("Failed to get surface capabilities", e))?;

            let formats = this.surface_loader
                .get_physical_device_surface_formats(physical_device, surface)
                .map_err(|e| init_error("Failed to get surface formats", e))?;

            let present_modes = this.surface_loader
                .get_physical_device_surface_present_modes(physical_device, surface)
                .map_err(|e| init_error("Failed to get surface present modes", e))?;

            let surface_format = choose_surface_format(&formats).ok_or_else(|| {
                engine_error!("lensflare::vulkan", "Surface reports no formats");
                Error::InitializationFailed("surface reports no formats".to_string())
            })?;
            let composite_alpha = choose_composite_alpha(&capabilities).ok_or_else(|| {
                engine_error!("lensflare::vulkan", "Surface supports no usable composite alpha mode");
                Error::InitializationFailed("surface supports no usable composite alpha mode".to_string())
            })?;
            let present_mode = choose_present_mode(&present_modes);
            let image_count = choose_image_count(&capabilities);
            let extent = choose_extent(&capabilities, width, height);

            let create_info = vk::SwapchainCreateInfoKHR::default()
                .surface(surface)
                .min_image_count(image_count)
                .image_format(surface_format.format)
                .image_color_space(surface_format.color_space)
                .image_extent(extent)
                .image_array_layers(1)
                .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
                .image_sharing_mode(vk::SharingMode::EXCLUSIVE)
                .pre_transform(choose_pre_transform(&capabilities))
                .composite_alpha(composite_alpha)
                .present_mode(present_mode)
                .clipped(true);

            this.swapchain = this.swapchain_loader
                .create_swapchain(&create_info, None)
                .map_err(|e| init_error("Failed to create swapchain", e))?;
            this.format = surface_format.format;
            this.extent = extent;

            this.images = this.swapchain_loader
                .get_swapchain_images(this.swapchain)
                .map_err(|e| init_error("Failed to get swapchain images", e))?;

            for &image in &this.images {
                let view_info = vk::ImageViewCreateInfo::default()
                    .image(image)
                    .view_type(vk::ImageViewType::TYPE_2D)
                    .format(surface_format.format)
                    .components(vk::ComponentMapping::default())
                    .subresource_range(vk::ImageSubresourceRange {
                        aspect_mask: vk::ImageAspectFlags::COLOR,
                        base_mip_level: 0,
                        level_count: 1,
                        base_array_layer: 0,
                        layer_count: 1,
                    });
                let view = device.create_image_view(&view_info, None)
                    .map_err(|e| init_error("Failed to create swapchain image view", e))?;
                this.image_views.push(view);
            }

            let semaphore_info = vk::SemaphoreCreateInfo::default();
            this.acquire_semaphore = device.create_semaphore(&semaphore_info, None)
                .map_err(|e| init_error("Failed to create acquire semaphore", e))?;

            let fence_info = vk::FenceCreateInfo::default();
            for _ in 0..this.images.len() {
                let semaphore = device.create_semaphore(&semaphore_info, None)
                    .map_err(|e| init_error("Failed to create render-complete semaphore", e))?;
                this.render_complete_semaphores.push(semaphore);

                let fence = device.create_fence(&fence_info, None)
                    .map_err(|e| init_error("Failed to create in-flight fence", e))?;
                this.in_flight_fences.push(fence);
            }

            engine_info!("lensflare::vulkan",
                "Swapchain created: {} images, {}x{}, {:?}, {:?}",
                this.images.len(), extent.width, extent.height, surface_format.format, present_mode);
        }

        Ok(this)
    }

    pub(crate) fn image_count(&self) -> u32 {
        self.images.len() as u32
    }

    pub(crate) fn check_index(&self, image_index: u32) -> Result<usize> {
        let index = image_index as usize;
        if index >= self.images.len() {
            return Err(engine_err!("lensflare::vulkan",
                "Image index {} out of range ({} swapchain images)", image_index, self.images.len()));
        }
        Ok(index)
    }
}

impl Drop for Swapchain {
    fn drop(&mut self) {
        unsafe {
            for &fence in &self.in_flight_fences {
                self.device.destroy_fence(fence, None);
            }
            for &semaphore in &self.render_complete_semaphores {
                self.device.destroy_semaphore(semaphore, None);
            }
            if self.acquire_semaphore != vk::Semaphore::null() {
                self.device.destroy_semaphore(self.acquire_semaphore, None);
            }
            for &view in &self.image_views {
                self.device.destroy_image_view(view, None);
            }
            if self.swapchain != vk::SwapchainKHR::null() {
                self.swapchain_loader.destroy_swapchain(self.swapchain, None);
            }
            self.surface_loader.destroy_surface(self.surface, None);
        }
    }
}

fn init_error(what: &str, e: vk::Result) -> Error {
    engine_error!("lensflare::vulkan", "{}: {:?}", what, e);
    Error::InitializationFailed(format!("{}: {:?}", what, e))
}

// ============================================================================
// Selection rules
// ============================================================================

/// `B8G8R8A8_UNORM` when offered, else the first reported format
pub fn choose_surface_format(formats: &[vk::SurfaceFormatKHR]) -> Option<vk::SurfaceFormatKHR> {
    formats
        .iter()
        .find(|f| f.format == vk::Format::B8G8R8A8_UNORM)
        .or_else(|| formats.first())
        .copied()
}

/// MAILBOX, then IMMEDIATE, then FIFO (always available)
pub fn choose_present_mode(modes: &[vk::PresentModeKHR]) -> vk::PresentModeKHR {
    [vk::PresentModeKHR::MAILBOX, vk::PresentModeKHR::IMMEDIATE]
        .into_iter()
        .find(|preferred| modes.contains(preferred))
        .unwrap_or(vk::PresentModeKHR::FIFO)
}

/// One more than the minimum, clamped when the surface has a maximum
pub fn choose_image_count(capabilities: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let count = capabilities.min_image_count + 1;
    if capabilities.max_image_count > 0 {
        count.min(capabilities.max_image_count)
    } else {
        count
    }
}

/// IDENTITY when supported, else the current transform
pub fn choose_pre_transform(capabilities: &vk::SurfaceCapabilitiesKHR) -> vk::SurfaceTransformFlagsKHR {
    if capabilities.supported_transforms.contains(vk::SurfaceTransformFlagsKHR::IDENTITY) {
        vk::SurfaceTransformFlagsKHR::IDENTITY
    } else {
        capabilities.current_transform
    }
}

/// First supported of OPAQUE, PRE_MULTIPLIED, POST_MULTIPLIED, INHERIT
pub fn choose_composite_alpha(capabilities: &vk::SurfaceCapabilitiesKHR) -> Option<vk::CompositeAlphaFlagsKHR> {
    [
        vk::CompositeAlphaFlagsKHR::OPAQUE,
        vk::CompositeAlphaFlagsKHR::PRE_MULTIPLIED,
        vk::CompositeAlphaFlagsKHR::POST_MULTIPLIED,
        vk::CompositeAlphaFlagsKHR::INHERIT,
    ]
    .into_iter()
    .find(|&mode| capabilities.supported_composite_alpha.contains(mode))
}

/// The surface's current extent, or the window size clamped to the
/// supported range when the surface leaves it to the swapchain
pub(crate) fn choose_extent(capabilities: &vk::SurfaceCapabilitiesKHR, width: u32, height: u32) -> vk::Extent2D {
    if capabilities.current_extent.width != u32::MAX {
        return capabilities.current_extent;
    }
    vk::Extent2D {
        width: width.clamp(capabilities.min_image_extent.width, capabilities.max_image_extent.width),
        height: height.clamp(capabilities.min_image_extent.height, capabilities.max_image_extent.height),
    }
}

#[cfg(test)]
#[path = "vulkan_swapchain_tests.rs"]
mod tests;
