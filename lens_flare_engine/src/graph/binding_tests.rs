//! Unit tests for binding.rs

use super::*;
use crate::graph::pass::{PASS_TABLE, find_pass};

fn table_with(bindings: &'static [Binding]) -> Vec<PassDesc> {
    let mut table = PASS_TABLE.to_vec();
    if let Some(blur) = table.iter_mut().find(|d| d.id == PassId::Blur) {
        blur.bindings = bindings;
    }
    table
}

// ============================================================================
// Tests: Layout
// ============================================================================

#[test]
fn test_layout_keeps_declared_numbers() {
    let bindings = [
        Binding::new(0, BindingSource::Attachment { pass: PassId::Bright, slot: AttachmentSlot::Color }),
        Binding::new(2, BindingSource::Uniform(UniformSlot::ForwardTransform)),
    ];
    let entries = layout_entries(&bindings);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].binding, 0);
    assert_eq!(entries[0].binding_type, BindingType::CombinedImageSampler);
    assert_eq!(entries[1].binding, 2);
    assert_eq!(entries[1].binding_type, BindingType::UniformBuffer);
    assert!(entries.iter().all(|e| e.stage == ShaderStage::Fragment));
}

#[test]
fn test_sampler_kinds() {
    assert_eq!(BindingSource::SourceTexture.sampler_kind(), Some(SamplerKind::Linear));
    assert_eq!(
        BindingSource::Attachment { pass: PassId::Bright, slot: AttachmentSlot::Color }.sampler_kind(),
        Some(SamplerKind::Nearest)
    );
    assert_eq!(BindingSource::Uniform(UniformSlot::Blur).sampler_kind(), None);
}

// ============================================================================
// Tests: Validation
// ============================================================================

#[test]
fn test_standard_table_is_valid() {
    assert!(validate_bindings(&PASS_TABLE).is_ok());
}

#[test]
fn test_forward_reference_is_rejected() {
    let table = table_with(const { &[Binding::new(0, BindingSource::Attachment { pass: PassId::Idft, slot: AttachmentSlot::Color })] });
    assert!(matches!(validate_bindings(&table), Err(Error::InvalidResource(_))));
}

#[test]
fn test_self_reference_is_rejected() {
    let table = table_with(const { &[Binding::new(0, BindingSource::Attachment { pass: PassId::Blur, slot: AttachmentSlot::Color })] });
    assert!(validate_bindings(&table).is_err());
}

#[test]
fn test_missing_slot_is_rejected() {
    let table = table_with(const { &[Binding::new(0, BindingSource::Attachment { pass: PassId::Bright, slot: AttachmentSlot::Imaginary })] });
    match validate_bindings(&table) {
        Err(Error::InvalidResource(msg)) => assert!(msg.contains("Imaginary")),
        other => panic!("expected InvalidResource, got {:?}", other),
    }
}

#[test]
fn test_reading_present_target_is_rejected() {
    let mut table = PASS_TABLE.to_vec();
    table.push(PassDesc {
        id: PassId::Bright,
        output: PassOutput::Single,
        fragment_shader: "feature_extraction.frag.spv",
        bindings: const { &[Binding::new(0, BindingSource::Attachment { pass: PassId::Blend, slot: AttachmentSlot::Color })] },
    });
    assert!(validate_bindings(&table).is_err());
}

#[test]
fn test_unknown_producer_is_rejected() {
    let table: Vec<PassDesc> = PASS_TABLE.iter().copied().filter(|d| d.id != PassId::Bright).collect();
    assert!(validate_bindings(&table).is_err());
}

#[test]
fn test_duplicate_binding_number_is_rejected() {
    let table = table_with(const { &[
        Binding::new(0, BindingSource::Attachment { pass: PassId::Bright, slot: AttachmentSlot::Color }),
        Binding::new(0, BindingSource::Uniform(UniformSlot::Blur)),
    ] });
    match validate_bindings(&table) {
        Err(Error::InvalidResource(msg)) => assert!(msg.contains("binding 0")),
        other => panic!("expected InvalidResource, got {:?}", other),
    }
}

// ============================================================================
// Tests: Shared fragment shaders
// ============================================================================

#[test]
fn test_standard_table_shares_fft_layout() {
    assert!(validate_shared_layouts(&PASS_TABLE).is_ok());
}

#[test]
fn test_positional_transform_uniform_is_rejected() {
    // Forward transforms with the uniform packed into slot 1, where the
    // inverse transform samples the imaginary input
    let mut table = PASS_TABLE.to_vec();
    for desc in table.iter_mut().filter(|d| matches!(d.id, PassId::BrightDft | PassId::BlurDft)) {
        desc.bindings = const { &[
            Binding::new(0, BindingSource::Attachment { pass: PassId::Bright, slot: AttachmentSlot::Color }),
            Binding::new(1, BindingSource::Uniform(UniformSlot::ForwardTransform)),
        ] };
    }

    match validate_shared_layouts(&table) {
        Err(Error::InvalidResource(msg)) => {
            assert!(msg.contains("fft.frag.spv"));
            assert!(msg.contains("binding 1"));
        }
        other => panic!("expected InvalidResource, got {:?}", other),
    }
}

#[test]
fn test_distinct_shaders_may_differ() {
    // Blur and blend put different kinds of resource at binding 1
    let blur = find_pass(&PASS_TABLE, PassId::Blur).unwrap();
    let blend = find_pass(&PASS_TABLE, PassId::Blend).unwrap();
    assert_ne!(blur.bindings[1].binding_type(), blend.bindings[1].binding_type());
    assert!(validate_shared_layouts(&[*blur, *blend]).is_ok());
}
