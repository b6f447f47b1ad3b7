/// Frame targets - render pass + framebuffer + owned attachments

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::{engine_debug, engine_error};
use crate::graph::attachment::AttachmentManager;
use crate::graph::dependency::pass_dependencies;
use crate::graph::pass::{PassDesc, PassId, PassOutput};
use crate::renderer::{
    Renderer, RenderPass, Framebuffer, Texture, TextureFormat, RenderPassDesc,
    AttachmentDesc, FramebufferDesc,
};

/// Format of every offscreen attachment
pub const ATTACHMENT_FORMAT: TextureFormat = TextureFormat::R8G8B8A8_UNORM;

/// Which image of a target a consumer samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentSlot {
    Color,
    Real,
    Imaginary,
}

/// Attachments owned by a frame target
pub enum TargetAttachments {
    Single(Arc<dyn Texture>),
    /// Real and imaginary parts, never interleaved
    Complex {
        real: Arc<dyn Texture>,
        imaginary: Arc<dyn Texture>,
    },
}

impl TargetAttachments {
    /// Build a complex pair, rejecting asymmetric halves
    pub fn complex(real: Arc<dyn Texture>, imaginary: Arc<dyn Texture>) -> Result<Self> {
        let (r, i) = (real.info(), imaginary.info());
        if r.format != i.format || r.width != i.width || r.height != i.height {
            engine_error!("lensflare::graph",
                "Complex pair mismatch: real {:?} {}x{}, imaginary {:?} {}x{}",
                r.format, r.width, r.height, i.format, i.width, i.height);
            return Err(Error::InvalidResource(format!(
                "complex pair halves differ: real {:?} {}x{}, imaginary {:?} {}x{}",
                r.format, r.width, r.height, i.format, i.width, i.height
            )));
        }
        Ok(TargetAttachments::Complex { real, imaginary })
    }

    pub fn get(&self, slot: AttachmentSlot) -> Option<&Arc<dyn Texture>> {
        match (self, slot) {
            (TargetAttachments::Single(color), AttachmentSlot::Color) => Some(color),
            (TargetAttachments::Complex { real, .. }, AttachmentSlot::Real) => Some(real),
            (TargetAttachments::Complex { imaginary, .. }, AttachmentSlot::Imaginary) => Some(imaginary),
            _ => None,
        }
    }

    /// Attachments in color-output order
    pub fn textures(&self) -> Vec<Arc<dyn Texture>> {
        match self {
            TargetAttachments::Single(color) => vec![color.clone()],
            TargetAttachments::Complex { real, imaginary } => vec![real.clone(), imaginary.clone()],
        }
    }

    pub fn count(&self) -> usize {
        match self {
            TargetAttachments::Single(_) => 1,
            TargetAttachments::Complex { .. } => 2,
        }
    }
}

/// Render pass descriptor for a pass: one attachment description per
/// output image plus the entry/exit dependency template
pub fn render_pass_desc(desc: &PassDesc, present_format: TextureFormat) -> RenderPassDesc {
    let color_attachments = match desc.output {
        PassOutput::Present => vec![AttachmentDesc::present(present_format)],
        output => (0..output.attachment_count())
            .map(|_| AttachmentDesc::offscreen(ATTACHMENT_FORMAT))
            .collect(),
    };

    RenderPassDesc {
        label: desc.id.name().to_string(),
        color_attachments,
        dependencies: pass_dependencies(),
    }
}

/// Offscreen target of one pass
///
/// Fields drop in declaration order: framebuffer, then attachments, then
/// the render pass.
pub struct FrameTarget {
    pass: PassId,
    width: u32,
    height: u32,
    framebuffer: Arc<dyn Framebuffer>,
    attachments: TargetAttachments,
    render_pass: Arc<dyn RenderPass>,
}

impl FrameTarget {
    /// Assemble a target, checking the framebuffer matches its attachments
    pub fn new(
        pass: PassId,
        render_pass: Arc<dyn RenderPass>,
        framebuffer: Arc<dyn Framebuffer>,
        attachments: TargetAttachments,
    ) -> Result<Self> {
        if render_pass.color_attachment_count() != attachments.count() {
            return Err(Error::InvalidResource(format!(
                "target '{}': render pass has {} color attachments, target owns {}",
                pass.name(), render_pass.color_attachment_count(), attachments.count()
            )));
        }

        let (width, height) = (framebuffer.width(), framebuffer.height());
        for texture in attachments.textures() {
            let info = texture.info();
            if info.width != width || info.height != height {
                return Err(Error::InvalidResource(format!(
                    "target '{}': attachment is {}x{}, framebuffer is {}x{}",
                    pass.name(), info.width, info.height, width, height
                )));
            }
        }

        Ok(Self { pass, width, height, framebuffer, attachments, render_pass })
    }

    /// Allocate attachments, render pass and framebuffer for an offscreen pass
    pub fn build(
        renderer: &mut dyn Renderer,
        manager: &mut AttachmentManager,
        desc: &PassDesc,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let label = desc.id.name();
        let attachments = match desc.output {
            PassOutput::Single => TargetAttachments::Single(
                manager.allocate(renderer, &format!("{}.color", label), ATTACHMENT_FORMAT, width, height)?,
            ),
            PassOutput::Complex => {
                let (real, imaginary) =
                    manager.allocate_pair(renderer, label, ATTACHMENT_FORMAT, width, height)?;
                TargetAttachments::complex(real, imaginary)?
            }
            PassOutput::Present => {
                return Err(Error::InvalidResource(format!(
                    "pass '{}' renders to the swapchain, use PresentTarget", label
                )));
            }
        };

        let present_format = renderer.swapchain_info().format;
        let render_pass = renderer.create_render_pass(&render_pass_desc(desc, present_format))?;
        let textures = attachments.textures();
        let framebuffer = renderer.create_framebuffer(&FramebufferDesc {
            render_pass: &render_pass,
            color_attachments: &textures,
            width,
            height,
        })?;

        engine_debug!("lensflare::graph", "Built target '{}' ({} attachments, {}x{})",
            label, attachments.count(), width, height);

        Self::new(desc.id, render_pass, framebuffer, attachments)
    }

    pub fn pass(&self) -> PassId {
        self.pass
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn render_pass(&self) -> &Arc<dyn RenderPass> {
        &self.render_pass
    }

    pub fn framebuffer(&self) -> &Arc<dyn Framebuffer> {
        &self.framebuffer
    }

    pub fn attachments(&self) -> &TargetAttachments {
        &self.attachments
    }

    /// Attachment at `slot`; fails if the target's shape has no such slot
    pub fn attachment(&self, slot: AttachmentSlot) -> Result<&Arc<dyn Texture>> {
        self.attachments.get(slot).ok_or_else(|| {
            Error::InvalidResource(format!(
                "target '{}' has no {:?} attachment", self.pass.name(), slot
            ))
        })
    }
}

/// Swapchain target of the final pass: one framebuffer per image
pub struct PresentTarget {
    width: u32,
    height: u32,
    framebuffers: Vec<Arc<dyn Framebuffer>>,
    render_pass: Arc<dyn RenderPass>,
}

impl PresentTarget {
    pub fn build(renderer: &mut dyn Renderer, desc: &PassDesc) -> Result<Self> {
        if desc.output != PassOutput::Present {
            return Err(Error::InvalidResource(format!(
                "pass '{}' does not render to the swapchain", desc.id.name()
            )));
        }

        let info = renderer.swapchain_info();
        let render_pass = renderer.create_render_pass(&render_pass_desc(desc, info.format))?;
        let framebuffers = renderer.create_swapchain_framebuffers(&render_pass)?;
        if framebuffers.len() != info.image_count as usize {
            return Err(Error::InitializationFailed(format!(
                "{} swapchain framebuffers for {} images", framebuffers.len(), info.image_count
            )));
        }

        Ok(Self {
            width: info.width,
            height: info.height,
            framebuffers,
            render_pass,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn render_pass(&self) -> &Arc<dyn RenderPass> {
        &self.render_pass
    }

    pub fn image_count(&self) -> usize {
        self.framebuffers.len()
    }

    pub fn framebuffer(&self, image_index: u32) -> Result<&Arc<dyn Framebuffer>> {
        self.framebuffers.get(image_index as usize).ok_or_else(|| {
            Error::InvalidResource(format!("no swapchain framebuffer for image {}", image_index))
        })
    }
}

#[cfg(test)]
#[path = "frame_target_tests.rs"]
mod tests;
