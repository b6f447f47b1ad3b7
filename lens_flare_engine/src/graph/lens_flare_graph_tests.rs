//! Unit tests for lens_flare_graph.rs
//!
//! Builds the full chain against MockRenderer and checks the recorded
//! command stream.

use super::*;
use crate::renderer::mock_renderer::{MockRenderer, write_test_shaders, source_texture};

fn build(renderer: &mut MockRenderer, tag: &str) -> LensFlareGraph {
    let assets = write_test_shaders(tag);
    LensFlareGraph::build(renderer, &assets, source_texture()).unwrap()
}

fn pass_commands(clears: usize, bindings: usize) -> Vec<String> {
    vec![
        format!("begin_render_pass 800x800 clears={} black=true", clears),
        "set_viewport 800x800".to_string(),
        "set_scissor 800x800".to_string(),
        format!("bind_pipeline bindings={}", bindings),
        format!("bind_binding_set bindings={}", bindings),
        "draw 3 1 0 0".to_string(),
        "end_render_pass".to_string(),
    ]
}

// ============================================================================
// Tests: Build
// ============================================================================

#[test]
fn test_build_standard_chain() {
    let mut renderer = MockRenderer::new();
    let graph = build(&mut renderer, "graph_build");

    assert_eq!(graph.passes().len(), 7);
    // bright, blur, idft: 1 each; bright_dft, blur_dft, complex: 2 each
    assert_eq!(graph.attachment_count(), 9);
    assert_eq!(graph.registry().len(), 7);
    assert_eq!(graph.present().image_count(), 3);
    assert!(graph.target(PassId::Blend).is_err());
}

#[test]
fn test_build_creates_one_binding_set_per_pass() {
    let mut renderer = MockRenderer::new();
    build(&mut renderer, "graph_sets");

    let sets: Vec<&String> = renderer.calls.iter().filter(|c| c.starts_with("create_binding_set")).collect();
    assert_eq!(sets, vec![
        "create_binding_set 1",
        "create_binding_set 2",
        "create_binding_set 2",
        "create_binding_set 2",
        "create_binding_set 4",
        "create_binding_set 3",
        "create_binding_set 2",
    ]);
}

#[test]
fn test_attachments_share_the_swapchain_extent() {
    let mut renderer = MockRenderer::with_swapchain(2, 640, 480);
    let assets = write_test_shaders("graph_extent");
    let graph = LensFlareGraph::build(&mut renderer, &assets, source_texture()).unwrap();

    let info = graph.attachment(PassId::ComplexMultiplication, AttachmentSlot::Imaginary).unwrap().info();
    assert_eq!((info.width, info.height), (640, 480));
}

#[test]
fn test_render_passes_declare_template_dependencies() {
    let mut renderer = MockRenderer::new();
    build(&mut renderer, "graph_deps");

    assert_eq!(renderer.render_passes.len(), 7);
    for desc in &renderer.render_passes {
        assert_eq!(desc.dependencies.len(), 2, "{}", desc.label);
        assert!(desc.dependencies.iter().all(|d| d.by_region));
    }
}

#[test]
fn test_build_fails_without_shaders() {
    let mut renderer = MockRenderer::new();
    let assets = AssetConfig {
        shader_dir: std::path::PathBuf::from("./no/such/shader/dir"),
        ..Default::default()
    };

    let result = LensFlareGraph::build(&mut renderer, &assets, source_texture());
    assert!(matches!(result, Err(Error::InitializationFailed(_))));
}

#[test]
fn test_build_rejects_table_without_present_pass() {
    let mut renderer = MockRenderer::new();
    let assets = write_test_shaders("graph_no_present");

    let result = LensFlareGraph::build_with_table(&mut renderer, &assets, source_texture(), &PASS_TABLE[..6]);
    assert!(matches!(result, Err(Error::InvalidResource(_))));
}

// ============================================================================
// Tests: Recording
// ============================================================================

#[test]
fn test_record_full_chain_in_order() {
    let mut renderer = MockRenderer::new();
    let graph = build(&mut renderer, "graph_record");
    let mut cmd = renderer.create_command_list().unwrap();

    graph.record(cmd.as_mut(), 0).unwrap();

    let mut expected = Vec::new();
    for (clears, bindings) in [(1, 1), (1, 2), (2, 2), (2, 2), (2, 4), (1, 3), (1, 2)] {
        expected.extend(pass_commands(clears, bindings));
    }
    assert_eq!(renderer.commands(0), expected);
}

#[test]
fn test_record_binds_no_vertex_buffer() {
    let mut renderer = MockRenderer::new();
    let graph = build(&mut renderer, "graph_no_vb");
    let mut cmd = renderer.create_command_list().unwrap();

    graph.record(cmd.as_mut(), 1).unwrap();

    let commands = renderer.commands(0);
    assert!(commands.iter().all(|c| !c.starts_with("bind_vertex_buffer")));
    assert_eq!(commands.iter().filter(|c| *c == "draw 3 1 0 0").count(), 7);
}

#[test]
fn test_record_rejects_unknown_image() {
    let mut renderer = MockRenderer::new();
    let graph = build(&mut renderer, "graph_bad_image");
    let mut cmd = renderer.create_command_list().unwrap();

    assert!(graph.record(cmd.as_mut(), 3).is_err());
}

#[test]
fn test_bright_pass_draws_fullscreen_without_blending() {
    let mut renderer = MockRenderer::new();
    let graph = build(&mut renderer, "graph_bright_draw");
    let mut cmd = renderer.create_command_list().unwrap();

    let bright = renderer.pipelines.iter().find(|(label, _, _)| label == "bright").unwrap();
    assert_eq!(bright.1.color_blend_attachments.len(), 1);
    assert!(bright.1.color_blend_attachments.iter().all(|b| !b.blend_enable));

    graph.record(cmd.as_mut(), 0).unwrap();

    let commands = renderer.commands(0);
    assert_eq!(commands[..7], pass_commands(1, 1)[..]);
}
