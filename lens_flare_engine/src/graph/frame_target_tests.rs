//! Unit tests for frame_target.rs

use super::*;
use crate::graph::pass::{PASS_TABLE, find_pass};
use crate::renderer::mock_renderer::{MockRenderer, MockTexture, MockFramebuffer, MockRenderPass};
use crate::renderer::{TextureInfo, TextureUsage, LoadOp, StoreOp, ImageLayout};

fn texture(width: u32, height: u32, format: TextureFormat) -> Arc<dyn Texture> {
    Arc::new(MockTexture {
        info: TextureInfo {
            width,
            height,
            format,
            usage: TextureUsage::COLOR_ATTACHMENT | TextureUsage::SAMPLED,
        },
        label: "test".to_string(),
    })
}

fn render_pass(count: usize) -> Arc<dyn RenderPass> {
    Arc::new(MockRenderPass { label: "test".to_string(), color_attachment_count: count })
}

fn framebuffer(width: u32, height: u32) -> Arc<dyn Framebuffer> {
    Arc::new(MockFramebuffer { width, height })
}

// ============================================================================
// Tests: Complex pair symmetry
// ============================================================================

#[test]
fn test_complex_pair_accepts_identical_halves() {
    let pair = TargetAttachments::complex(
        texture(64, 32, ATTACHMENT_FORMAT),
        texture(64, 32, ATTACHMENT_FORMAT),
    );
    assert!(pair.is_ok());
    assert_eq!(pair.unwrap().count(), 2);
}

#[test]
fn test_complex_pair_rejects_size_mismatch() {
    let pair = TargetAttachments::complex(
        texture(64, 32, ATTACHMENT_FORMAT),
        texture(64, 64, ATTACHMENT_FORMAT),
    );
    assert!(matches!(pair, Err(Error::InvalidResource(_))));
}

#[test]
fn test_complex_pair_rejects_format_mismatch() {
    let pair = TargetAttachments::complex(
        texture(64, 64, TextureFormat::R8G8B8A8_UNORM),
        texture(64, 64, TextureFormat::B8G8R8A8_UNORM),
    );
    assert!(pair.is_err());
}

#[test]
fn test_every_built_complex_target_is_symmetric() {
    let mut renderer = MockRenderer::new();
    let mut manager = AttachmentManager::new();

    for desc in PASS_TABLE.iter().filter(|d| d.output == PassOutput::Complex) {
        let target = FrameTarget::build(&mut renderer, &mut manager, desc, 800, 800).unwrap();
        let real = target.attachment(AttachmentSlot::Real).unwrap().info().clone();
        let imaginary = target.attachment(AttachmentSlot::Imaginary).unwrap().info().clone();
        assert_eq!(real, imaginary, "{}", desc.id.name());
    }
}

// ============================================================================
// Tests: Slot lookup
// ============================================================================

#[test]
fn test_single_target_slots() {
    let target = FrameTarget::new(
        PassId::Bright,
        render_pass(1),
        framebuffer(16, 16),
        TargetAttachments::Single(texture(16, 16, ATTACHMENT_FORMAT)),
    ).unwrap();

    assert!(target.attachment(AttachmentSlot::Color).is_ok());
    assert!(matches!(target.attachment(AttachmentSlot::Real), Err(Error::InvalidResource(_))));
    assert!(target.attachment(AttachmentSlot::Imaginary).is_err());
}

#[test]
fn test_complex_target_slots() {
    let attachments = TargetAttachments::complex(
        texture(16, 16, ATTACHMENT_FORMAT),
        texture(16, 16, ATTACHMENT_FORMAT),
    ).unwrap();
    let target = FrameTarget::new(PassId::BlurDft, render_pass(2), framebuffer(16, 16), attachments).unwrap();

    assert!(target.attachment(AttachmentSlot::Real).is_ok());
    assert!(target.attachment(AttachmentSlot::Imaginary).is_ok());
    assert!(target.attachment(AttachmentSlot::Color).is_err());
}

#[test]
fn test_target_rejects_attachment_count_mismatch() {
    let result = FrameTarget::new(
        PassId::Bright,
        render_pass(2),
        framebuffer(16, 16),
        TargetAttachments::Single(texture(16, 16, ATTACHMENT_FORMAT)),
    );
    assert!(result.is_err());
}

#[test]
fn test_target_rejects_extent_mismatch() {
    let result = FrameTarget::new(
        PassId::Bright,
        render_pass(1),
        framebuffer(32, 32),
        TargetAttachments::Single(texture(16, 16, ATTACHMENT_FORMAT)),
    );
    assert!(result.is_err());
}

// ============================================================================
// Tests: Render pass descriptions
// ============================================================================

#[test]
fn test_offscreen_render_pass_desc() {
    let desc = render_pass_desc(find_pass(&PASS_TABLE, PassId::Blur).unwrap(), TextureFormat::B8G8R8A8_UNORM);

    assert_eq!(desc.color_attachments.len(), 1);
    let attachment = desc.color_attachments[0];
    assert_eq!(attachment.format, TextureFormat::R8G8B8A8_UNORM);
    assert_eq!(attachment.load_op, LoadOp::Clear);
    assert_eq!(attachment.store_op, StoreOp::Store);
    assert_eq!(attachment.initial_layout, ImageLayout::Undefined);
    assert_eq!(attachment.final_layout, ImageLayout::ShaderReadOnly);
    assert_eq!(desc.dependencies, pass_dependencies());
}

#[test]
fn test_complex_render_pass_has_two_distinct_descriptions() {
    let desc = render_pass_desc(
        find_pass(&PASS_TABLE, PassId::ComplexMultiplication).unwrap(),
        TextureFormat::B8G8R8A8_UNORM,
    );
    assert_eq!(desc.color_attachments.len(), 2);
    assert_eq!(desc.color_attachments[0], AttachmentDesc::offscreen(ATTACHMENT_FORMAT));
    assert_eq!(desc.color_attachments[1], AttachmentDesc::offscreen(ATTACHMENT_FORMAT));
}

#[test]
fn test_present_render_pass_uses_swapchain_format() {
    let desc = render_pass_desc(find_pass(&PASS_TABLE, PassId::Blend).unwrap(), TextureFormat::B8G8R8A8_SRGB);
    assert_eq!(desc.color_attachments.len(), 1);
    assert_eq!(desc.color_attachments[0].format, TextureFormat::B8G8R8A8_SRGB);
    assert_eq!(desc.color_attachments[0].final_layout, ImageLayout::PresentSrc);
}

// ============================================================================
// Tests: Build
// ============================================================================

#[test]
fn test_build_single_target() {
    let mut renderer = MockRenderer::new();
    let mut manager = AttachmentManager::new();
    let desc = find_pass(&PASS_TABLE, PassId::Bright).unwrap();

    let target = FrameTarget::build(&mut renderer, &mut manager, desc, 800, 800).unwrap();

    assert_eq!(target.pass(), PassId::Bright);
    assert_eq!((target.width(), target.height()), (800, 800));
    assert_eq!(target.render_pass().color_attachment_count(), 1);
    assert_eq!(manager.allocated_count(), 1);
    assert!(renderer.calls.contains(&"create_texture bright.color 800x800".to_string()));
}

#[test]
fn test_build_complex_target_labels() {
    let mut renderer = MockRenderer::new();
    let mut manager = AttachmentManager::new();
    let desc = find_pass(&PASS_TABLE, PassId::BrightDft).unwrap();

    FrameTarget::build(&mut renderer, &mut manager, desc, 800, 800).unwrap();

    assert!(renderer.calls.contains(&"create_texture bright_dft.real 800x800".to_string()));
    assert!(renderer.calls.contains(&"create_texture bright_dft.imaginary 800x800".to_string()));
    assert!(renderer.calls.contains(&"create_framebuffer 2 attachments 800x800".to_string()));
}

#[test]
fn test_build_rejects_present_pass() {
    let mut renderer = MockRenderer::new();
    let mut manager = AttachmentManager::new();
    let desc = find_pass(&PASS_TABLE, PassId::Blend).unwrap();

    let result = FrameTarget::build(&mut renderer, &mut manager, desc, 800, 800);
    assert!(result.is_err());
    assert_eq!(manager.allocated_count(), 0);
}

#[test]
fn test_present_target_has_one_framebuffer_per_image() {
    let mut renderer = MockRenderer::with_swapchain(4, 800, 800);
    let desc = find_pass(&PASS_TABLE, PassId::Blend).unwrap();

    let present = PresentTarget::build(&mut renderer, desc).unwrap();

    assert_eq!(present.image_count(), 4);
    assert!(present.framebuffer(3).is_ok());
    assert!(present.framebuffer(4).is_err());
}
