//! Unit tests for uniforms.rs

use super::*;
use crate::renderer::mock_renderer::MockRenderer;

// ============================================================================
// Tests: Parameter blocks
// ============================================================================

#[test]
fn test_param_sizes_match_std140() {
    assert_eq!(std::mem::size_of::<BlurParams>(), 8);
    assert_eq!(std::mem::size_of::<TransformParams>(), 16);
}

#[test]
fn test_transform_flags() {
    assert_eq!(TransformParams::forward(800, 800).is_inverse, 0);
    assert_eq!(TransformParams::inverse(800, 800).is_inverse, 1);
}

#[test]
fn test_inverse_pixel_size() {
    let params = BlurParams::new(800, 400);
    assert_eq!(params.inv_size, Vec2::new(1.0 / 800.0, 1.0 / 400.0));
}

// ============================================================================
// Tests: Layout
// ============================================================================

#[test]
fn test_align_up() {
    assert_eq!(align_up(0, 256), 0);
    assert_eq!(align_up(1, 256), 256);
    assert_eq!(align_up(256, 256), 256);
    assert_eq!(align_up(24, 16), 32);
    assert_eq!(align_up(13, 0), 13);
    assert_eq!(align_up(13, 1), 13);
}

#[test]
fn test_layout_segments_are_aligned() {
    for alignment in [1u64, 4, 16, 64, 256] {
        let layout = UniformLayout::new(alignment);
        for range in [layout.blur, layout.forward, layout.inverse] {
            assert_eq!(range.offset % alignment, 0, "alignment {}", alignment);
        }
        assert!(layout.forward.offset >= layout.blur.offset + layout.blur.size);
        assert!(layout.inverse.offset >= layout.forward.offset + layout.forward.size);
    }
}

#[test]
fn test_layout_256() {
    let layout = UniformLayout::new(256);
    assert_eq!(layout.blur, UniformRange { offset: 0, size: 8 });
    assert_eq!(layout.forward, UniformRange { offset: 256, size: 16 });
    assert_eq!(layout.inverse, UniformRange { offset: 512, size: 16 });
    assert_eq!(layout.total_size, 528);
}

#[test]
fn test_layout_range_lookup() {
    let layout = UniformLayout::new(64);
    assert_eq!(layout.range(UniformSlot::Blur), layout.blur);
    assert_eq!(layout.range(UniformSlot::ForwardTransform), layout.forward);
    assert_eq!(layout.range(UniformSlot::InverseTransform), layout.inverse);
}

// ============================================================================
// Tests: Block
// ============================================================================

#[test]
fn test_block_writes_each_segment_once() {
    let mut renderer = MockRenderer::new();
    renderer.min_uniform_alignment = 64;

    let block = UniformBlock::create(&mut renderer, 800, 800).unwrap();
    let writes = renderer.buffer_writes.lock().unwrap().clone();

    assert_eq!(block.buffer().size(), block.layout().total_size);
    assert_eq!(writes.len(), 3);
    assert_eq!(writes[0].0, 0);
    assert_eq!(writes[1].0, 64);
    assert_eq!(writes[2].0, 128);

    let inverse: TransformParams = bytemuck::pod_read_unaligned(&writes[2].1);
    assert_eq!(inverse, TransformParams::inverse(800, 800));
    let forward: TransformParams = bytemuck::pod_read_unaligned(&writes[1].1);
    assert_eq!(forward.is_inverse, 0);
}

#[test]
fn test_block_binding_windows() {
    let mut renderer = MockRenderer::new();
    let block = UniformBlock::create(&mut renderer, 800, 800).unwrap();

    match block.binding(UniformSlot::ForwardTransform) {
        BindingResource::UniformBuffer { offset, range, .. } => {
            assert_eq!(offset, block.layout().forward.offset);
            assert_eq!(range, 16);
        }
        _ => panic!("expected a uniform buffer binding"),
    }
}
