//! Unit tests for the swapchain selection rules (no GPU)

use super::*;

fn format(format: vk::Format) -> vk::SurfaceFormatKHR {
    vk::SurfaceFormatKHR { format, color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR }
}

fn capabilities(min: u32, max: u32) -> vk::SurfaceCapabilitiesKHR {
    vk::SurfaceCapabilitiesKHR {
        min_image_count: min,
        max_image_count: max,
        current_extent: vk::Extent2D { width: 800, height: 800 },
        supported_transforms: vk::SurfaceTransformFlagsKHR::IDENTITY,
        current_transform: vk::SurfaceTransformFlagsKHR::IDENTITY,
        supported_composite_alpha: vk::CompositeAlphaFlagsKHR::OPAQUE,
        ..Default::default()
    }
}

// ============================================================================
// Tests: Surface format
// ============================================================================

#[test]
fn test_prefers_bgra_unorm() {
    let formats = [
        format(vk::Format::R8G8B8A8_SRGB),
        format(vk::Format::B8G8R8A8_UNORM),
    ];
    assert_eq!(choose_surface_format(&formats).map(|f| f.format), Some(vk::Format::B8G8R8A8_UNORM));
}

#[test]
fn test_falls_back_to_first_format() {
    let formats = [
        format(vk::Format::R8G8B8A8_SRGB),
        format(vk::Format::B8G8R8A8_SRGB),
    ];
    assert_eq!(choose_surface_format(&formats).map(|f| f.format), Some(vk::Format::R8G8B8A8_SRGB));
    assert!(choose_surface_format(&[]).is_none());
}

// ============================================================================
// Tests: Present mode
// ============================================================================

#[test]
fn test_present_mode_preference() {
    use vk::PresentModeKHR as Mode;

    assert_eq!(choose_present_mode(&[Mode::FIFO, Mode::IMMEDIATE, Mode::MAILBOX]), Mode::MAILBOX);
    assert_eq!(choose_present_mode(&[Mode::FIFO, Mode::IMMEDIATE]), Mode::IMMEDIATE);
    assert_eq!(choose_present_mode(&[Mode::FIFO_RELAXED, Mode::FIFO]), Mode::FIFO);
    assert_eq!(choose_present_mode(&[]), Mode::FIFO);
}

// ============================================================================
// Tests: Image count
// ============================================================================

#[test]
fn test_image_count_is_min_plus_one() {
    assert_eq!(choose_image_count(&capabilities(2, 8)), 3);
}

#[test]
fn test_image_count_clamped_to_max() {
    assert_eq!(choose_image_count(&capabilities(3, 3)), 3);
}

#[test]
fn test_zero_max_means_unbounded() {
    assert_eq!(choose_image_count(&capabilities(4, 0)), 5);
}

// ============================================================================
// Tests: Transform and composite alpha
// ============================================================================

#[test]
fn test_identity_transform_when_supported() {
    let mut caps = capabilities(2, 0);
    caps.supported_transforms = vk::SurfaceTransformFlagsKHR::IDENTITY | vk::SurfaceTransformFlagsKHR::ROTATE_90;
    caps.current_transform = vk::SurfaceTransformFlagsKHR::ROTATE_90;
    assert_eq!(choose_pre_transform(&caps), vk::SurfaceTransformFlagsKHR::IDENTITY);
}

#[test]
fn test_current_transform_otherwise() {
    let mut caps = capabilities(2, 0);
    caps.supported_transforms = vk::SurfaceTransformFlagsKHR::ROTATE_90;
    caps.current_transform = vk::SurfaceTransformFlagsKHR::ROTATE_90;
    assert_eq!(choose_pre_transform(&caps), vk::SurfaceTransformFlagsKHR::ROTATE_90);
}

#[test]
fn test_composite_alpha_order() {
    let mut caps = capabilities(2, 0);

    caps.supported_composite_alpha = vk::CompositeAlphaFlagsKHR::INHERIT | vk::CompositeAlphaFlagsKHR::OPAQUE;
    assert_eq!(choose_composite_alpha(&caps), Some(vk::CompositeAlphaFlagsKHR::OPAQUE));

    caps.supported_composite_alpha = vk::CompositeAlphaFlagsKHR::INHERIT | vk::CompositeAlphaFlagsKHR::POST_MULTIPLIED;
    assert_eq!(choose_composite_alpha(&caps), Some(vk::CompositeAlphaFlagsKHR::POST_MULTIPLIED));

    caps.supported_composite_alpha = vk::CompositeAlphaFlagsKHR::empty();
    assert_eq!(choose_composite_alpha(&caps), None);
}

// ============================================================================
// Tests: Extent
// ============================================================================

#[test]
fn test_current_extent_wins() {
    assert_eq!(choose_extent(&capabilities(2, 0), 1024, 768), vk::Extent2D { width: 800, height: 800 });
}

#[test]
fn test_window_size_clamped_when_extent_undefined() {
    let mut caps = capabilities(2, 0);
    caps.current_extent = vk::Extent2D { width: u32::MAX, height: u32::MAX };
    caps.min_image_extent = vk::Extent2D { width: 1, height: 1 };
    caps.max_image_extent = vk::Extent2D { width: 640, height: 4096 };

    assert_eq!(choose_extent(&caps, 800, 800), vk::Extent2D { width: 640, height: 800 });
}
