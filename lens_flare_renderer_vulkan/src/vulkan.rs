/// VulkanRenderer - Vulkan implementation of the Renderer and FrameDriver traits
///
/// Owns the instance, device, swapchain and the setup-time pools. Every GPU
/// resource it hands out holds an `Arc<GpuContext>` or a device clone and
/// destroys itself on Drop, so those resources must be dropped before the
/// renderer.

use lens_flare_engine::lensflare::{Renderer, Result, Error};
use lens_flare_engine::lensflare::config::RendererConfig;
use lens_flare_engine::lensflare::render::{
    Texture as RendererTexture, Buffer as RendererBuffer, Shader as RendererShader,
    RenderPass as RendererRenderPass, Framebuffer as RendererFramebuffer,
    Pipeline as RendererPipeline, BindingSet as RendererBindingSet,
    CommandList as RendererCommandList, FrameDriver,
    TextureDesc, TextureInfo, TextureFormat, BufferDesc, BufferUsage, ShaderDesc,
    ShaderStage, RenderPassDesc, FramebufferDesc, PipelineDesc, BindingResource, SwapchainInfo,
};
use lens_flare_engine::{engine_info, engine_warn, engine_error, engine_bail, engine_err};
use ash::vk;
use gpu_allocator::vulkan::{Allocator, AllocatorCreateDesc};
use gpu_allocator::MemoryLocation;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use std::ffi::CString;
use std::fmt::Debug;
use std::mem::ManuallyDrop;
use std::sync::{Arc, Mutex};

use crate::vulkan_context::GpuContext;
use crate::vulkan_format::{
    texture_format_to_vk, vk_to_texture_format, texture_usage_to_vk, vertex_format_to_vk,
    topology_to_vk, cull_mode_to_vk, front_face_to_vk, compare_op_to_vk, dynamic_state_to_vk,
    color_write_mask_to_vk, load_op_to_vk, store_op_to_vk, image_layout_to_vk, dependency_to_vk,
    binding_type_to_vk, shader_stage_to_vk, sample_count_to_vk,
};
use crate::vulkan_texture::Texture;
use crate::vulkan_buffer::Buffer;
use crate::vulkan_shader::{Shader, spirv_words, reflect_bindings, check_bindings};
use crate::vulkan_pipeline::Pipeline;
use crate::vulkan_render_pass::RenderPass;
use crate::vulkan_frame_buffer::Framebuffer;
use crate::vulkan_binding_set::BindingSet;
use crate::vulkan_sampler::SamplerCache;
use crate::vulkan_command_list::CommandList;
use crate::vulkan_swapchain::Swapchain;

/// Sets per descriptor pool. The lens flare chain needs seven.
const DESCRIPTOR_POOL_SETS: u32 = 32;

pub struct VulkanRenderer {
    _entry: ash::Entry,
    instance: ash::Instance,
    physical_device: vk::PhysicalDevice,
    device: ash::Device,

    /// Shared with every texture, buffer and the sampler cache
    ctx: Arc<GpuContext>,

    /// Dropped explicitly before the device
    swapchain: ManuallyDrop<Swapchain>,
    swapchain_format: TextureFormat,

    /// Binding set pools; a new one is appended when the last is exhausted
    descriptor_pools: Vec<vk::DescriptorPool>,
    pipeline_cache: vk::PipelineCache,
    sampler_cache: SamplerCache,

    min_uniform_alignment: u64,

    #[cfg(feature = "vulkan-validation")]
    debug_messenger: Option<(ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT)>,
}

impl VulkanRenderer {
    /// Create the renderer for a winit window, sized to its inner size
    pub fn new(window: &winit::window::Window, config: &RendererConfig) -> Result<Self> {
        let size = window.inner_size();
        Self::with_handles(window, size.width, size.height, config)
    }

    /// Create the renderer for any window exposing raw handles
    ///
    /// # Arguments
    ///
    /// * `window` - Source of the display and window handles for the surface
    /// * `width`, `height` - Swapchain extent when the surface leaves it open
    /// * `config` - Layers, extensions and validation filtering
    pub fn with_handles<W: HasDisplayHandle + HasWindowHandle>(
        window: &W,
        width: u32,
        height: u32,
        config: &RendererConfig,
    ) -> Result<Self> {
        config.validate()?;

        unsafe {
            let entry = ash::Entry::load()
                .map_err(|e| init_error("Failed to load Vulkan library", e))?;

            // Instance
            let app_name = CString::new(config.application_name.as_str())
                .map_err(|e| init_error("Invalid application name", e))?;
            let app_info = vk::ApplicationInfo::default()
                .application_name(&app_name)
                .application_version(vk::make_api_version(0, 1, 0, 0))
                .engine_name(c"Lens Flare Engine")
                .engine_version(vk::make_api_version(0, 0, 1, 0))
                .api_version(vk::API_VERSION_1_1);

            let display_handle = window.display_handle()
                .map_err(|e| init_error("Failed to get display handle", e))?;
            let window_handle = window.window_handle()
                .map_err(|e| init_error("Failed to get window handle", e))?;

            #[allow(unused_mut)]
            let mut extension_names = ash_window::enumerate_required_extensions(display_handle.as_raw())
                .map_err(|e| init_error("Failed to get required surface extensions", e))?
                .to_vec();

            #[cfg(feature = "vulkan-validation")]
            if config.enable_validation {
                extension_names.push(ash::ext::debug_utils::NAME.as_ptr());
            }
            #[cfg(not(feature = "vulkan-validation"))]
            if config.enable_validation {
                engine_info!("lensflare::vulkan",
                    "Validation layers enabled without the vulkan-validation feature: messages are not forwarded");
            }

            let layer_names = to_cstrings(config.enabled_layers())?;
            check_layers_available(&entry, &layer_names)?;
            let layer_ptrs: Vec<*const std::os::raw::c_char> = layer_names.iter().map(|l| l.as_ptr()).collect();

            let instance_info = vk::InstanceCreateInfo::default()
                .application_info(&app_info)
                .enabled_layer_names(&layer_ptrs)
                .enabled_extension_names(&extension_names);

            let instance = entry.create_instance(&instance_info, None)
                .map_err(|e| init_error("Failed to create Vulkan instance", e))?;

            #[cfg(feature = "vulkan-validation")]
            let debug_messenger = if config.enable_validation {
                Some(create_debug_messenger(&entry, &instance, config)?)
            } else {
                None
            };

            // Surface
            let surface = ash_window::create_surface(
                &entry,
                &instance,
                display_handle.as_raw(),
                window_handle.as_raw(),
                None,
            )
            .map_err(|e| init_error("Failed to create surface", e))?;
            let surface_loader = ash::khr::surface::Instance::new(&entry, &instance);

            // Physical device + one queue family for graphics and present
            let device_extensions = to_cstrings(&config.device_extensions)?;
            let (physical_device, queue_family) =
                pick_physical_device(&instance, &surface_loader, surface, &device_extensions)?;

            let properties = instance.get_physical_device_properties(physical_device);
            let device_name = properties.device_name_as_c_str()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            engine_info!("lensflare::vulkan", "Using GPU '{}' (queue family {})", device_name, queue_family);

            // Logical device
            let queue_priorities = [1.0];
            let queue_infos = [vk::DeviceQueueCreateInfo::default()
                .queue_family_index(queue_family)
                .queue_priorities(&queue_priorities)];
            let extension_ptrs: Vec<*const std::os::raw::c_char> =
                device_extensions.iter().map(|e| e.as_ptr()).collect();
            let features = vk::PhysicalDeviceFeatures::default();

            let device_info = vk::DeviceCreateInfo::default()
                .queue_create_infos(&queue_infos)
                .enabled_extension_names(&extension_ptrs)
                .enabled_features(&features);

            let device = instance.create_device(physical_device, &device_info, None)
                .map_err(|e| init_error("Failed to create logical device", e))?;
            let graphics_queue = device.get_device_queue(queue_family, 0);

            // Memory, upload pool, shared context
            let allocator = Allocator::new(&AllocatorCreateDesc {
                instance: instance.clone(),
                device: device.clone(),
                physical_device,
                debug_settings: Default::default(),
                buffer_device_address: false,
                allocation_sizes: Default::default(),
            })
            .map_err(|e| init_error("Failed to create GPU allocator", e))?;

            let upload_pool_info = vk::CommandPoolCreateInfo::default()
                .queue_family_index(queue_family)
                .flags(vk::CommandPoolCreateFlags::TRANSIENT | vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER);
            let upload_command_pool = device.create_command_pool(&upload_pool_info, None)
                .map_err(|e| init_error("Failed to create upload command pool", e))?;

            let ctx = Arc::new(GpuContext::new(
                device.clone(),
                Arc::new(Mutex::new(allocator)),
                graphics_queue,
                queue_family,
                upload_command_pool,
            ));

            // Swapchain and its sync objects
            let swapchain = Swapchain::new(
                &instance, &device, physical_device, surface, surface_loader, width, height,
            )?;
            let swapchain_format = vk_to_texture_format(swapchain.format).ok_or_else(|| {
                engine_error!("lensflare::vulkan", "Unsupported swapchain format {:?}", swapchain.format);
                Error::InitializationFailed(format!("unsupported swapchain format {:?}", swapchain.format))
            })?;

            let descriptor_pool = create_descriptor_pool(&device)?;
            let pipeline_cache = device.create_pipeline_cache(&vk::PipelineCacheCreateInfo::default(), None)
                .map_err(|e| init_error("Failed to create pipeline cache", e))?;

            engine_info!("lensflare::vulkan", "Vulkan renderer ready");

            Ok(Self {
                _entry: entry,
                instance,
                physical_device,
                device,
                sampler_cache: SamplerCache::new(Arc::clone(&ctx)),
                ctx,
                swapchain: ManuallyDrop::new(swapchain),
                swapchain_format,
                descriptor_pools: vec![descriptor_pool],
                pipeline_cache,
                min_uniform_alignment: properties.limits.min_uniform_buffer_offset_alignment,
                #[cfg(feature = "vulkan-validation")]
                debug_messenger,
            })
        }
    }

    /// The physical device the renderer runs on
    pub fn physical_device(&self) -> vk::PhysicalDevice {
        self.physical_device
    }

    /// Allocate one set of `layout`, growing the pool list when the last pool is full
    fn allocate_descriptor_set(&mut self, layout: vk::DescriptorSetLayout) -> Result<vk::DescriptorSet> {
        let layouts = [layout];
        let current = *self.descriptor_pools.last()
            .ok_or_else(|| engine_err!("lensflare::vulkan", "No descriptor pool"))?;

        unsafe {
            let allocate_info = vk::DescriptorSetAllocateInfo::default()
                .descriptor_pool(current)
                .set_layouts(&layouts);

            match self.device.allocate_descriptor_sets(&allocate_info) {
                Ok(sets) => Ok(sets[0]),
                Err(vk::Result::ERROR_OUT_OF_POOL_MEMORY) | Err(vk::Result::ERROR_FRAGMENTED_POOL) => {
                    let pool = create_descriptor_pool(&self.device)?;
                    self.descriptor_pools.push(pool);
                    engine_info!("lensflare::vulkan",
                        "Descriptor pool exhausted, created pool #{}", self.descriptor_pools.len());

                    let retry_info = vk::DescriptorSetAllocateInfo::default()
                        .descriptor_pool(pool)
                        .set_layouts(&layouts);
                    let sets = self.device.allocate_descriptor_sets(&retry_info)
                        .map_err(|e| engine_err!("lensflare::vulkan",
                            "Failed to allocate descriptor set after pool growth: {:?}", e))?;
                    Ok(sets[0])
                }
                Err(e) => Err(engine_err!("lensflare::vulkan", "Failed to allocate descriptor set: {:?}", e)),
            }
        }
    }

    fn create_staging_buffer(&self, name: &str, size: u64, usage: vk::BufferUsageFlags, location: MemoryLocation)
        -> Result<Buffer>
    {
        let (buffer, allocation) = self.ctx.create_buffer_with_memory(name, size, usage, location)?;
        Ok(Buffer::new(Arc::clone(&self.ctx), buffer, allocation, size))
    }
}

// ============================================================================
// Renderer
// ============================================================================

impl Renderer for VulkanRenderer {
    fn create_texture(&mut self, desc: TextureDesc) -> Result<Arc<dyn RendererTexture>> {
        if desc.width == 0 || desc.height == 0 {
            engine_bail!("lensflare::vulkan", "Texture '{}' has a zero extent ({}x{})",
                desc.label, desc.width, desc.height);
        }
        if let Some(data) = &desc.data {
            if data.len() as u64 != desc.byte_size() {
                engine_error!("lensflare::vulkan", "Texture '{}': {} bytes of data for a {} byte image",
                    desc.label, data.len(), desc.byte_size());
                return Err(Error::InvalidResource(format!(
                    "texture '{}' data is {} bytes, expected {}", desc.label, data.len(), desc.byte_size()
                )));
            }
        }

        let format = texture_format_to_vk(desc.format);

        // Every image can be read back; uploaded images also receive a copy
        let mut usage = texture_usage_to_vk(desc.usage) | vk::ImageUsageFlags::TRANSFER_SRC;
        if desc.data.is_some() {
            usage |= vk::ImageUsageFlags::TRANSFER_DST;
        }

        let texture = unsafe {
            let image_info = vk::ImageCreateInfo::default()
                .image_type(vk::ImageType::TYPE_2D)
                .format(format)
                .extent(vk::Extent3D { width: desc.width, height: desc.height, depth: 1 })
                .mip_levels(1)
                .array_layers(1)
                .samples(vk::SampleCountFlags::TYPE_1)
                .tiling(vk::ImageTiling::OPTIMAL)
                .usage(usage)
                .sharing_mode(vk::SharingMode::EXCLUSIVE)
                .initial_layout(vk::ImageLayout::UNDEFINED);

            let image = self.device.create_image(&image_info, None)
                .map_err(|e| engine_err!("lensflare::vulkan", "Failed to create image '{}': {:?}", desc.label, e))?;

            let requirements = self.device.get_image_memory_requirements(image);
            let allocation = match self.ctx.allocate(&desc.label, requirements, MemoryLocation::GpuOnly, false) {
                Ok(allocation) => allocation,
                Err(e) => {
                    self.device.destroy_image(image, None);
                    return Err(e);
                }
            };

            if let Err(e) = self.device.bind_image_memory(image, allocation.memory(), allocation.offset()) {
                self.ctx.free(allocation);
                self.device.destroy_image(image, None);
                engine_bail!("lensflare::vulkan", "Failed to bind memory of image '{}': {:?}", desc.label, e);
            }

            let view_info = vk::ImageViewCreateInfo::default()
                .image(image)
                .view_type(vk::ImageViewType::TYPE_2D)
                .format(format)
                .components(vk::ComponentMapping::default())
                .subresource_range(Texture::color_range());

            let view = match self.device.create_image_view(&view_info, None) {
                Ok(view) => view,
                Err(e) => {
                    self.ctx.free(allocation);
                    self.device.destroy_image(image, None);
                    engine_bail!("lensflare::vulkan", "Failed to create view of image '{}': {:?}", desc.label, e);
                }
            };

            Texture::new(Arc::clone(&self.ctx), image, view, allocation, TextureInfo::from(&desc))
        };

        if let Some(data) = &desc.data {
            let staging = self.create_staging_buffer(
                "texture staging",
                data.len() as u64,
                vk::BufferUsageFlags::TRANSFER_SRC,
                MemoryLocation::CpuToGpu,
            )?;
            staging.update(0, data)?;

            let device = &self.device;
            let (image, width, height) = (texture.image, desc.width, desc.height);
            self.ctx.one_shot(|cmd| unsafe {
                record_upload(device, cmd, staging.buffer, image, width, height);
            })?;
        }

        Ok(Arc::new(texture))
    }

    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn RendererBuffer>> {
        if desc.size == 0 {
            engine_bail!("lensflare::vulkan", "Buffer '{}' has size 0", desc.label);
        }

        let usage = match desc.usage {
            BufferUsage::Uniform => vk::BufferUsageFlags::UNIFORM_BUFFER,
            BufferUsage::Vertex => vk::BufferUsageFlags::VERTEX_BUFFER,
        };
        let (buffer, allocation) =
            self.ctx.create_buffer_with_memory(&desc.label, desc.size, usage, MemoryLocation::CpuToGpu)?;

        Ok(Arc::new(Buffer::new(Arc::clone(&self.ctx), buffer, allocation, desc.size)))
    }

    fn create_shader(&mut self, desc: ShaderDesc) -> Result<Arc<dyn RendererShader>> {
        let words = spirv_words(&desc.code)?;
        let reflected = reflect_bindings(&words)?;

        let module = unsafe {
            let create_info = vk::ShaderModuleCreateInfo::default().code(&words);
            self.device.create_shader_module(&create_info, None)
                .map_err(|e| engine_err!("lensflare::vulkan", "Failed to create {:?} shader module: {:?}", desc.stage, e))?
        };

        Ok(Arc::new(Shader::new(module, desc.stage, desc.entry_point, reflected, self.device.clone())))
    }

    fn create_render_pass(&mut self, desc: &RenderPassDesc) -> Result<Arc<dyn RendererRenderPass>> {
        if desc.color_attachments.is_empty() {
            engine_bail!("lensflare::vulkan", "Render pass '{}' has no color attachments", desc.label);
        }

        let attachments: Vec<vk::AttachmentDescription> = desc.color_attachments
            .iter()
            .map(|attachment| {
                vk::AttachmentDescription::default()
                    .format(texture_format_to_vk(attachment.format))
                    .samples(vk::SampleCountFlags::TYPE_1)
                    .load_op(load_op_to_vk(attachment.load_op))
                    .store_op(store_op_to_vk(attachment.store_op))
                    .stencil_load_op(vk::AttachmentLoadOp::DONT_CARE)
                    .stencil_store_op(vk::AttachmentStoreOp::DONT_CARE)
                    .initial_layout(image_layout_to_vk(attachment.initial_layout))
                    .final_layout(image_layout_to_vk(attachment.final_layout))
            })
            .collect();

        let color_refs: Vec<vk::AttachmentReference> = (0..attachments.len() as u32)
            .map(|i| vk::AttachmentReference::default()
                .attachment(i)
                .layout(vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL))
            .collect();

        let subpass = vk::SubpassDescription::default()
            .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
            .color_attachments(&color_refs);

        let dependencies: Vec<vk::SubpassDependency> = desc.dependencies.iter().map(dependency_to_vk).collect();

        let create_info = vk::RenderPassCreateInfo::default()
            .attachments(&attachments)
            .subpasses(std::slice::from_ref(&subpass))
            .dependencies(&dependencies);

        let render_pass = unsafe {
            self.device.create_render_pass(&create_info, None)
                .map_err(|e| engine_err!("lensflare::vulkan", "Failed to create render pass '{}': {:?}", desc.label, e))?
        };

        Ok(Arc::new(RenderPass::new(render_pass, attachments.len(), self.device.clone())))
    }

    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> Result<Arc<dyn RendererFramebuffer>> {
        if desc.color_attachments.len() != desc.render_pass.color_attachment_count() {
            engine_bail!("lensflare::vulkan", "Framebuffer has {} attachments, render pass expects {}",
                desc.color_attachments.len(), desc.render_pass.color_attachment_count());
        }

        let mut views = Vec::with_capacity(desc.color_attachments.len());
        for attachment in desc.color_attachments {
            let info = attachment.info();
            if info.width != desc.width || info.height != desc.height {
                engine_bail!("lensflare::vulkan", "Framebuffer attachment is {}x{}, framebuffer is {}x{}",
                    info.width, info.height, desc.width, desc.height);
            }
            let vk_texture = attachment.as_ref() as *const dyn RendererTexture as *const Texture;
            views.push(unsafe { (*vk_texture).view });
        }

        unsafe {
            let vk_render_pass = desc.render_pass.as_ref() as *const dyn RendererRenderPass as *const RenderPass;
            let vk_render_pass = &*vk_render_pass;

            let framebuffer = create_vk_framebuffer(
                &self.device, vk_render_pass.render_pass, &views, desc.width, desc.height,
            )?;
            Ok(Arc::new(Framebuffer::new(framebuffer, desc.width, desc.height, self.device.clone())))
        }
    }

    fn create_swapchain_framebuffers(
        &mut self,
        render_pass: &Arc<dyn RendererRenderPass>,
    ) -> Result<Vec<Arc<dyn RendererFramebuffer>>> {
        if render_pass.color_attachment_count() != 1 {
            engine_bail!("lensflare::vulkan",
                "Swapchain framebuffers need a render pass with one color attachment, got {}",
                render_pass.color_attachment_count());
        }

        let extent = self.swapchain.extent;
        unsafe {
            let vk_render_pass = render_pass.as_ref() as *const dyn RendererRenderPass as *const RenderPass;
            let vk_render_pass = &*vk_render_pass;

            let mut framebuffers: Vec<Arc<dyn RendererFramebuffer>> = Vec::with_capacity(self.swapchain.image_views.len());
            for &view in &self.swapchain.image_views {
                let framebuffer = create_vk_framebuffer(
                    &self.device, vk_render_pass.render_pass, &[view], extent.width, extent.height,
                )?;
                framebuffers.push(Arc::new(Framebuffer::new(
                    framebuffer, extent.width, extent.height, self.device.clone(),
                )));
            }
            Ok(framebuffers)
        }
    }

    fn create_pipeline(&mut self, desc: PipelineDesc) -> Result<Arc<dyn RendererPipeline>> {
        if desc.vertex_shader.stage() != ShaderStage::Vertex || desc.fragment_shader.stage() != ShaderStage::Fragment {
            engine_bail!("lensflare::vulkan", "Pipeline '{}': shader stages are {:?} and {:?}, expected Vertex and Fragment",
                desc.label, desc.vertex_shader.stage(), desc.fragment_shader.stage());
        }

        let color_count = desc.render_pass.color_attachment_count();
        if desc.template.color_blend_attachments.len() != color_count {
            engine_error!("lensflare::vulkan", "Pipeline '{}': {} blend attachments for {} color attachments",
                desc.label, desc.template.color_blend_attachments.len(), color_count);
            return Err(Error::InvalidResource(format!(
                "pipeline '{}' blend attachment count does not match the render pass", desc.label
            )));
        }

        let (vertex_shader, fragment_shader, vk_render_pass) = unsafe {
            let vs = desc.vertex_shader.as_ref() as *const dyn RendererShader as *const Shader;
            let fs = desc.fragment_shader.as_ref() as *const dyn RendererShader as *const Shader;
            let rp = desc.render_pass.as_ref() as *const dyn RendererRenderPass as *const RenderPass;
            (&*vs, &*fs, &*rp)
        };

        check_bindings(&desc.label, ShaderStage::Vertex, &vertex_shader.reflected, &desc.binding_layout)?;
        check_bindings(&desc.label, ShaderStage::Fragment, &fragment_shader.reflected, &desc.binding_layout)?;

        let vertex_entry = CString::new(vertex_shader.entry_point.as_str())
            .map_err(|e| engine_err!("lensflare::vulkan", "Invalid vertex entry point: {}", e))?;
        let fragment_entry = CString::new(fragment_shader.entry_point.as_str())
            .map_err(|e| engine_err!("lensflare::vulkan", "Invalid fragment entry point: {}", e))?;

        // Owns the layouts as they are created, so an early return destroys them
        let mut pipeline = Pipeline::new(
            vk::Pipeline::null(),
            vk::PipelineLayout::null(),
            vk::DescriptorSetLayout::null(),
            desc.binding_layout.clone(),
            self.device.clone(),
        );

        unsafe {
            let set_bindings: Vec<vk::DescriptorSetLayoutBinding> = desc.binding_layout
                .iter()
                .map(|entry| vk::DescriptorSetLayoutBinding::default()
                    .binding(entry.binding)
                    .descriptor_type(binding_type_to_vk(entry.binding_type))
                    .descriptor_count(1)
                    .stage_flags(shader_stage_to_vk(entry.stage)))
                .collect();
            let set_layout_info = vk::DescriptorSetLayoutCreateInfo::default().bindings(&set_bindings);
            pipeline.set_layout = self.device.create_descriptor_set_layout(&set_layout_info, None)
                .map_err(|e| engine_err!("lensflare::vulkan", "Failed to create descriptor set layout: {:?}", e))?;

            let set_layouts = [pipeline.set_layout];
            let layout_info = vk::PipelineLayoutCreateInfo::default().set_layouts(&set_layouts);
            pipeline.pipeline_layout = self.device.create_pipeline_layout(&layout_info, None)
                .map_err(|e| engine_err!("lensflare::vulkan", "Failed to create pipeline layout: {:?}", e))?;

            let shader_stages = [
                vk::PipelineShaderStageCreateInfo::default()
                    .stage(vk::ShaderStageFlags::VERTEX)
                    .module(vertex_shader.module)
                    .name(&vertex_entry),
                vk::PipelineShaderStageCreateInfo::default()
                    .stage(vk::ShaderStageFlags::FRAGMENT)
                    .module(fragment_shader.module)
                    .name(&fragment_entry),
            ];

            let template = &desc.template;

            let vertex_bindings: Vec<vk::VertexInputBindingDescription> = template.vertex_layout.bindings
                .iter()
                .map(|binding| vk::VertexInputBindingDescription {
                    binding: binding.binding,
                    stride: binding.stride,
                    input_rate: vk::VertexInputRate::VERTEX,
                })
                .collect();
            let vertex_attributes: Vec<vk::VertexInputAttributeDescription> = template.vertex_layout.attributes
                .iter()
                .map(|attribute| vk::VertexInputAttributeDescription {
                    location: attribute.location,
                    binding: attribute.binding,
                    format: vertex_format_to_vk(attribute.format),
                    offset: attribute.offset,
                })
                .collect();
            let vertex_input_state = vk::PipelineVertexInputStateCreateInfo::default()
                .vertex_binding_descriptions(&vertex_bindings)
                .vertex_attribute_descriptions(&vertex_attributes);

            let input_assembly_state = vk::PipelineInputAssemblyStateCreateInfo::default()
                .topology(topology_to_vk(template.topology))
                .primitive_restart_enable(false);

            // Viewport and scissor are dynamic; only the counts matter here
            let viewport_state = vk::PipelineViewportStateCreateInfo::default()
                .viewport_count(1)
                .scissor_count(1);

            let rasterization_state = vk::PipelineRasterizationStateCreateInfo::default()
                .depth_clamp_enable(false)
                .rasterizer_discard_enable(false)
                .polygon_mode(vk::PolygonMode::FILL)
                .line_width(template.rasterization.line_width)
                .cull_mode(cull_mode_to_vk(template.rasterization.cull_mode))
                .front_face(front_face_to_vk(template.rasterization.front_face))
                .depth_bias_enable(false);

            let multisample_state = vk::PipelineMultisampleStateCreateInfo::default()
                .sample_shading_enable(false)
                .rasterization_samples(sample_count_to_vk(template.sample_count));

            let depth_stencil_state = vk::PipelineDepthStencilStateCreateInfo::default()
                .depth_test_enable(template.depth.test_enable)
                .depth_write_enable(template.depth.write_enable)
                .depth_compare_op(compare_op_to_vk(template.depth.compare_op))
                .depth_bounds_test_enable(false)
                .stencil_test_enable(false);

            let blend_attachments: Vec<vk::PipelineColorBlendAttachmentState> = template.color_blend_attachments
                .iter()
                .map(|attachment| {
                    let state = vk::PipelineColorBlendAttachmentState::default()
                        .color_write_mask(color_write_mask_to_vk(attachment.write_mask))
                        .blend_enable(attachment.blend_enable);
                    if attachment.blend_enable {
                        state
                            .src_color_blend_factor(vk::BlendFactor::SRC_ALPHA)
                            .dst_color_blend_factor(vk::BlendFactor::ONE_MINUS_SRC_ALPHA)
                            .color_blend_op(vk::BlendOp::ADD)
                            .src_alpha_blend_factor(vk::BlendFactor::ONE)
                            .dst_alpha_blend_factor(vk::BlendFactor::ZERO)
                            .alpha_blend_op(vk::BlendOp::ADD)
                    } else {
                        state
                    }
                })
                .collect();
            let color_blend_state = vk::PipelineColorBlendStateCreateInfo::default()
                .logic_op_enable(false)
                .attachments(&blend_attachments);

            let dynamic_states: Vec<vk::DynamicState> = template.dynamic_states
                .iter()
                .map(|&state| dynamic_state_to_vk(state))
                .collect();
            let dynamic_state = vk::PipelineDynamicStateCreateInfo::default().dynamic_states(&dynamic_states);

            let create_info = vk::GraphicsPipelineCreateInfo::default()
                .stages(&shader_stages)
                .vertex_input_state(&vertex_input_state)
                .input_assembly_state(&input_assembly_state)
                .viewport_state(&viewport_state)
                .rasterization_state(&rasterization_state)
                .multisample_state(&multisample_state)
                .depth_stencil_state(&depth_stencil_state)
                .color_blend_state(&color_blend_state)
                .dynamic_state(&dynamic_state)
                .layout(pipeline.pipeline_layout)
                .render_pass(vk_render_pass.render_pass)
                .subpass(0);

            let pipelines = self.device
                .create_graphics_pipelines(self.pipeline_cache, &[create_info], None)
                .map_err(|(_, e)| engine_err!("lensflare::vulkan",
                    "Failed to create graphics pipeline '{}': {:?}", desc.label, e))?;
            pipeline.pipeline = pipelines[0];
        }

        Ok(Arc::new(pipeline))
    }

    fn create_binding_set(
        &mut self,
        pipeline: &Arc<dyn RendererPipeline>,
        resources: &[BindingResource],
    ) -> Result<Arc<dyn RendererBindingSet>> {
        let layout = pipeline.binding_layout();
        if resources.len() != layout.len() {
            engine_error!("lensflare::vulkan", "Binding set has {} resources, pipeline layout has {} bindings",
                resources.len(), layout.len());
            return Err(Error::InvalidResource(format!(
                "{} resources for {} bindings", resources.len(), layout.len()
            )));
        }
        for (index, (resource, entry)) in resources.iter().zip(layout).enumerate() {
            if resource.binding_type() != entry.binding_type {
                engine_error!("lensflare::vulkan", "Binding {}: resource is {:?}, layout expects {:?}",
                    index, resource.binding_type(), entry.binding_type);
                return Err(Error::InvalidResource(format!(
                    "binding {} type mismatch", index
                )));
            }
        }

        let vk_pipeline = unsafe {
            let ptr = pipeline.as_ref() as *const dyn RendererPipeline as *const Pipeline;
            &*ptr
        };
        let descriptor_set = self.allocate_descriptor_set(vk_pipeline.set_layout)?;

        // Infos first so the writes can borrow them
        let mut buffer_infos = Vec::with_capacity(resources.len());
        let mut image_infos = Vec::with_capacity(resources.len());
        for resource in resources {
            match resource {
                BindingResource::UniformBuffer { buffer, offset, range } => {
                    let vk_buffer = unsafe { &*(*buffer as *const dyn RendererBuffer as *const Buffer) };
                    buffer_infos.push(vk::DescriptorBufferInfo::default()
                        .buffer(vk_buffer.buffer)
                        .offset(*offset)
                        .range(*range));
                }
                BindingResource::SampledTexture(texture, kind) => {
                    let vk_texture = unsafe { &*(*texture as *const dyn RendererTexture as *const Texture) };
                    image_infos.push(vk::DescriptorImageInfo::default()
                        .image_layout(vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL)
                        .image_view(vk_texture.view)
                        .sampler(self.sampler_cache.get(*kind)?));
                }
            }
        }

        let (mut next_buffer, mut next_image) = (0, 0);
        let writes: Vec<vk::WriteDescriptorSet> = resources
            .iter()
            .zip(layout)
            .map(|(resource, entry)| {
                let write = vk::WriteDescriptorSet::default()
                    .dst_set(descriptor_set)
                    .dst_binding(entry.binding)
                    .dst_array_element(0)
                    .descriptor_type(binding_type_to_vk(entry.binding_type));
                match resource {
                    BindingResource::UniformBuffer { .. } => {
                        next_buffer += 1;
                        write.buffer_info(std::slice::from_ref(&buffer_infos[next_buffer - 1]))
                    }
                    BindingResource::SampledTexture(..) => {
                        next_image += 1;
                        write.image_info(std::slice::from_ref(&image_infos[next_image - 1]))
                    }
                }
            })
            .collect();

        unsafe {
            self.device.update_descriptor_sets(&writes, &[]);
        }

        Ok(Arc::new(BindingSet::new(descriptor_set, resources.len())))
    }

    fn create_command_list(&mut self) -> Result<Box<dyn RendererCommandList>> {
        Ok(Box::new(CommandList::new(self.device.clone(), self.ctx.graphics_queue_family)?))
    }

    fn swapchain_info(&self) -> SwapchainInfo {
        SwapchainInfo {
            image_count: self.swapchain.image_count(),
            width: self.swapchain.extent.width,
            height: self.swapchain.extent.height,
            format: self.swapchain_format,
        }
    }

    fn min_uniform_alignment(&self) -> u64 {
        self.min_uniform_alignment
    }

    fn read_texture(&mut self, texture: &Arc<dyn RendererTexture>) -> Result<Vec<u8>> {
        let info = texture.info().clone();
        let size = info.width as u64 * info.height as u64 * info.format.bytes_per_pixel() as u64;
        let vk_texture = unsafe { &*(texture.as_ref() as *const dyn RendererTexture as *const Texture) };

        let staging = self.create_staging_buffer(
            "texture readback",
            size,
            vk::BufferUsageFlags::TRANSFER_DST,
            MemoryLocation::GpuToCpu,
        )?;

        let device = &self.device;
        let (image, buffer) = (vk_texture.image, staging.buffer);
        self.ctx.one_shot(|cmd| unsafe {
            record_readback(device, cmd, image, buffer, info.width, info.height);
        })?;

        staging.read(size)
    }

    fn wait_idle(&self) -> Result<()> {
        unsafe {
            self.device.device_wait_idle()
                .map_err(|e| engine_err!("lensflare::vulkan", "Failed to wait for device idle: {:?}", e))
        }
    }
}

// ============================================================================
// FrameDriver
// ============================================================================

impl FrameDriver for VulkanRenderer {
    fn image_count(&self) -> u32 {
        self.swapchain.image_count()
    }

    fn acquire(&mut self) -> Result<u32> {
        let result = unsafe {
            self.swapchain.swapchain_loader.acquire_next_image(
                self.swapchain.swapchain,
                u64::MAX,
                self.swapchain.acquire_semaphore,
                vk::Fence::null(),
            )
        };

        match result {
            Ok((image_index, _suboptimal)) => Ok(image_index),
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                engine_warn!("lensflare::vulkan", "Swapchain out of date on acquire");
                Err(Error::SwapchainOutOfDate)
            }
            Err(e) => Err(engine_err!("lensflare::vulkan", "Failed to acquire swapchain image: {:?}", e)),
        }
    }

    fn submit(&mut self, command_list: &dyn RendererCommandList, image_index: u32) -> Result<()> {
        let index = self.swapchain.check_index(image_index)?;

        let vk_command_list = unsafe {
            &*(command_list as *const dyn RendererCommandList as *const CommandList)
        };
        if !vk_command_list.is_executable() {
            engine_bail!("lensflare::vulkan", "Command list for image {} is not fully recorded", image_index);
        }

        let wait_semaphores = [self.swapchain.acquire_semaphore];
        let wait_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
        let command_buffers = [vk_command_list.command_buffer()];
        let signal_semaphores = [self.swapchain.render_complete_semaphores[index]];

        let submit_info = vk::SubmitInfo::default()
            .wait_semaphores(&wait_semaphores)
            .wait_dst_stage_mask(&wait_stages)
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal_semaphores);

        unsafe {
            self.device
                .queue_submit(self.ctx.graphics_queue, &[submit_info], self.swapchain.in_flight_fences[index])
                .map_err(|e| engine_err!("lensflare::vulkan", "Failed to submit frame {}: {:?}", image_index, e))
        }
    }

    fn present(&mut self, image_index: u32) -> Result<()> {
        let index = self.swapchain.check_index(image_index)?;

        let wait_semaphores = [self.swapchain.render_complete_semaphores[index]];
        let swapchains = [self.swapchain.swapchain];
        let image_indices = [image_index];
        let present_info = vk::PresentInfoKHR::default()
            .wait_semaphores(&wait_semaphores)
            .swapchains(&swapchains)
            .image_indices(&image_indices);

        let result = unsafe {
            self.swapchain.swapchain_loader.queue_present(self.ctx.graphics_queue, &present_info)
        };

        match result {
            Ok(_suboptimal) => Ok(()),
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                engine_warn!("lensflare::vulkan", "Swapchain out of date on present");
                Err(Error::SwapchainOutOfDate)
            }
            Err(e) => Err(engine_err!("lensflare::vulkan", "Failed to present image {}: {:?}", image_index, e)),
        }
    }

    fn wait_and_reset_fence(&mut self, image_index: u32) -> Result<()> {
        let index = self.swapchain.check_index(image_index)?;
        let fences = [self.swapchain.in_flight_fences[index]];

        unsafe {
            self.device.wait_for_fences(&fences, true, u64::MAX)
                .map_err(|e| engine_err!("lensflare::vulkan", "Failed to wait for fence {}: {:?}", index, e))?;
            self.device.reset_fences(&fences)
                .map_err(|e| engine_err!("lensflare::vulkan", "Failed to reset fence {}: {:?}", index, e))
        }
    }
}

impl Drop for VulkanRenderer {
    fn drop(&mut self) {
        unsafe {
            self.device.device_wait_idle().ok();

            // 1. No validation callbacks past this point
            crate::debug::clear_filter();

            // 2. Samplers, then renderer-owned pools and cache
            self.sampler_cache.shutdown();
            for &pool in &self.descriptor_pools {
                self.device.destroy_descriptor_pool(pool, None);
            }
            self.device.destroy_pipeline_cache(self.pipeline_cache, None);

            // 3. Swapchain, sync objects and surface
            ManuallyDrop::drop(&mut self.swapchain);

            // 4. Upload pool
            if let Ok(mut pool) = self.ctx.upload_command_pool.lock() {
                if *pool != vk::CommandPool::null() {
                    self.device.destroy_command_pool(*pool, None);
                    *pool = vk::CommandPool::null();
                }
            }

            // 5. Allocator: its memory blocks must be freed while the device lives
            match Arc::get_mut(&mut self.ctx) {
                Some(ctx) => ManuallyDrop::drop(&mut ctx.allocator),
                None => engine_warn!("lensflare::vulkan",
                    "GPU resources outlive the renderer; leaking the allocator"),
            }

            // 6. Debug messenger
            #[cfg(feature = "vulkan-validation")]
            if let Some((debug_utils, messenger)) = self.debug_messenger.take() {
                debug_utils.destroy_debug_utils_messenger(messenger, None);
            }

            // 7. Device and instance
            self.device.destroy_device(None);
            self.instance.destroy_instance(None);
        }
    }
}

// ============================================================================
// Setup helpers
// ============================================================================

fn init_error<E: Debug>(what: &str, e: E) -> Error {
    engine_error!("lensflare::vulkan", "{}: {:?}", what, e);
    Error::InitializationFailed(format!("{}: {:?}", what, e))
}

fn to_cstrings(names: &[String]) -> Result<Vec<CString>> {
    names
        .iter()
        .map(|name| CString::new(name.as_str()).map_err(|e| init_error("Invalid layer or extension name", e)))
        .collect()
}

/// Fail setup when a requested layer is not installed
unsafe fn check_layers_available(entry: &ash::Entry, layers: &[CString]) -> Result<()> {
    if layers.is_empty() {
        return Ok(());
    }

    let available = entry.enumerate_instance_layer_properties()
        .map_err(|e| init_error("Failed to enumerate instance layers", e))?;

    for layer in layers {
        let found = available
            .iter()
            .any(|props| props.layer_name_as_c_str().map_or(false, |name| name == layer.as_c_str()));
        if !found {
            engine_error!("lensflare::vulkan", "Validation layer {:?} is not available", layer);
            return Err(Error::InitializationFailed(format!("layer {:?} is not available", layer)));
        }
    }

    Ok(())
}

/// First device with a queue family that does graphics and presents to
/// `surface`, and that supports every requested device extension
unsafe fn pick_physical_device(
    instance: &ash::Instance,
    surface_loader: &ash::khr::surface::Instance,
    surface: vk::SurfaceKHR,
    extensions: &[CString],
) -> Result<(vk::PhysicalDevice, u32)> {
    let devices = instance.enumerate_physical_devices()
        .map_err(|e| init_error("Failed to enumerate physical devices", e))?;

    for device in devices {
        if !supports_extensions(instance, device, extensions) {
            continue;
        }

        let families = instance.get_physical_device_queue_family_properties(device);
        let family = (0..families.len() as u32).find(|&index| {
            families[index as usize].queue_flags.contains(vk::QueueFlags::GRAPHICS)
                && surface_loader
                    .get_physical_device_surface_support(device, index, surface)
                    .unwrap_or(false)
        });

        if let Some(family) = family {
            return Ok((device, family));
        }
    }

    engine_error!("lensflare::vulkan", "No GPU with a graphics + present queue and the required extensions");
    Err(Error::InitializationFailed("no suitable GPU found".to_string()))
}

unsafe fn supports_extensions(instance: &ash::Instance, device: vk::PhysicalDevice, extensions: &[CString]) -> bool {
    let Ok(available) = instance.enumerate_device_extension_properties(device) else {
        return false;
    };
    extensions.iter().all(|required| {
        available
            .iter()
            .any(|props| props.extension_name_as_c_str().map_or(false, |name| name == required.as_c_str()))
    })
}

#[cfg(feature = "vulkan-validation")]
unsafe fn create_debug_messenger(
    entry: &ash::Entry,
    instance: &ash::Instance,
    config: &RendererConfig,
) -> Result<(ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT)> {
    crate::debug::install_filter(config.debug_severity);

    let debug_utils = ash::ext::debug_utils::Instance::new(entry, instance);
    let create_info = vk::DebugUtilsMessengerCreateInfoEXT::default()
        .message_severity(crate::debug::severity_flags(config.debug_severity))
        .message_type(
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
        )
        .pfn_user_callback(Some(crate::debug::vulkan_debug_callback));

    let messenger = debug_utils.create_debug_utils_messenger(&create_info, None)
        .map_err(|e| init_error("Failed to create debug messenger", e))?;

    Ok((debug_utils, messenger))
}

fn create_descriptor_pool(device: &ash::Device) -> Result<vk::DescriptorPool> {
    let pool_sizes = [
        vk::DescriptorPoolSize {
            ty: vk::DescriptorType::COMBINED_IMAGE_SAMPLER,
            descriptor_count: DESCRIPTOR_POOL_SETS * 4,
        },
        vk::DescriptorPoolSize {
            ty: vk::DescriptorType::UNIFORM_BUFFER,
            descriptor_count: DESCRIPTOR_POOL_SETS,
        },
    ];
    let create_info = vk::DescriptorPoolCreateInfo::default()
        .pool_sizes(&pool_sizes)
        .max_sets(DESCRIPTOR_POOL_SETS);

    unsafe {
        device.create_descriptor_pool(&create_info, None)
            .map_err(|e| init_error("Failed to create descriptor pool", e))
    }
}

unsafe fn create_vk_framebuffer(
    device: &ash::Device,
    render_pass: vk::RenderPass,
    views: &[vk::ImageView],
    width: u32,
    height: u32,
) -> Result<vk::Framebuffer> {
    let create_info = vk::FramebufferCreateInfo::default()
        .render_pass(render_pass)
        .attachments(views)
        .width(width)
        .height(height)
        .layers(1);

    device.create_framebuffer(&create_info, None)
        .map_err(|e| engine_err!("lensflare::vulkan", "Failed to create framebuffer: {:?}", e))
}

// ============================================================================
// Transfer recording
// ============================================================================

fn image_barrier(
    image: vk::Image,
    old_layout: vk::ImageLayout,
    new_layout: vk::ImageLayout,
    src_access: vk::AccessFlags,
    dst_access: vk::AccessFlags,
) -> vk::ImageMemoryBarrier<'static> {
    vk::ImageMemoryBarrier::default()
        .old_layout(old_layout)
        .new_layout(new_layout)
        .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .image(image)
        .subresource_range(Texture::color_range())
        .src_access_mask(src_access)
        .dst_access_mask(dst_access)
}

fn full_image_copy(width: u32, height: u32) -> vk::BufferImageCopy {
    vk::BufferImageCopy::default()
        .buffer_offset(0)
        .buffer_row_length(0)
        .buffer_image_height(0)
        .image_subresource(vk::ImageSubresourceLayers {
            aspect_mask: vk::ImageAspectFlags::COLOR,
            mip_level: 0,
            base_array_layer: 0,
            layer_count: 1,
        })
        .image_offset(vk::Offset3D { x: 0, y: 0, z: 0 })
        .image_extent(vk::Extent3D { width, height, depth: 1 })
}

/// UNDEFINED -> TRANSFER_DST, copy, -> SHADER_READ_ONLY
unsafe fn record_upload(
    device: &ash::Device,
    cmd: vk::CommandBuffer,
    staging: vk::Buffer,
    image: vk::Image,
    width: u32,
    height: u32,
) {
    device.cmd_pipeline_barrier(
        cmd,
        vk::PipelineStageFlags::TOP_OF_PIPE,
        vk::PipelineStageFlags::TRANSFER,
        vk::DependencyFlags::empty(),
        &[],
        &[],
        &[image_barrier(
            image,
            vk::ImageLayout::UNDEFINED,
            vk::ImageLayout::TRANSFER_DST_OPTIMAL,
            vk::AccessFlags::empty(),
            vk::AccessFlags::TRANSFER_WRITE,
        )],
    );

    device.cmd_copy_buffer_to_image(
        cmd,
        staging,
        image,
        vk::ImageLayout::TRANSFER_DST_OPTIMAL,
        &[full_image_copy(width, height)],
    );

    device.cmd_pipeline_barrier(
        cmd,
        vk::PipelineStageFlags::TRANSFER,
        vk::PipelineStageFlags::FRAGMENT_SHADER,
        vk::DependencyFlags::empty(),
        &[],
        &[],
        &[image_barrier(
            image,
            vk::ImageLayout::TRANSFER_DST_OPTIMAL,
            vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
            vk::AccessFlags::TRANSFER_WRITE,
            vk::AccessFlags::SHADER_READ,
        )],
    );
}

/// SHADER_READ_ONLY -> TRANSFER_SRC, copy to `buffer`, back to SHADER_READ_ONLY
unsafe fn record_readback(
    device: &ash::Device,
    cmd: vk::CommandBuffer,
    image: vk::Image,
    buffer: vk::Buffer,
    width: u32,
    height: u32,
) {
    device.cmd_pipeline_barrier(
        cmd,
        vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT | vk::PipelineStageFlags::TRANSFER,
        vk::PipelineStageFlags::TRANSFER,
        vk::DependencyFlags::empty(),
        &[],
        &[],
        &[image_barrier(
            image,
            vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
            vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
            vk::AccessFlags::COLOR_ATTACHMENT_WRITE | vk::AccessFlags::TRANSFER_WRITE,
            vk::AccessFlags::TRANSFER_READ,
        )],
    );

    device.cmd_copy_image_to_buffer(
        cmd,
        image,
        vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
        buffer,
        &[full_image_copy(width, height)],
    );

    let host_barrier = vk::BufferMemoryBarrier::default()
        .src_access_mask(vk::AccessFlags::TRANSFER_WRITE)
        .dst_access_mask(vk::AccessFlags::HOST_READ)
        .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
        .buffer(buffer)
        .offset(0)
        .size(vk::WHOLE_SIZE);

    device.cmd_pipeline_barrier(
        cmd,
        vk::PipelineStageFlags::TRANSFER,
        vk::PipelineStageFlags::HOST | vk::PipelineStageFlags::FRAGMENT_SHADER,
        vk::DependencyFlags::empty(),
        &[],
        &[host_barrier],
        &[image_barrier(
            image,
            vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
            vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
            vk::AccessFlags::TRANSFER_READ,
            vk::AccessFlags::SHADER_READ,
        )],
    );
}
