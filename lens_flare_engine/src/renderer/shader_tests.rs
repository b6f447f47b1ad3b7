//! Unit tests for shader.rs

use crate::error::Error;
use crate::renderer::shader::{load_shader_file, ShaderStage};
use std::path::PathBuf;

fn temp_file(name: &str, bytes: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("lens_flare_{}_{}", std::process::id(), name));
    std::fs::write(&path, bytes).unwrap();
    path
}

// ============================================================================
// LOADING
// ============================================================================

#[test]
fn test_missing_shader_file_is_fatal_setup_error() {
    let path = PathBuf::from("./definitely/not/here/blur.frag.spv");
    let result = load_shader_file(&path, ShaderStage::Fragment);

    match result {
        Err(Error::InitializationFailed(msg)) => assert!(msg.contains("blur.frag.spv")),
        other => panic!("expected InitializationFailed, got {:?}", other.map(|d| d.code.len())),
    }
}

#[test]
fn test_load_reads_whole_file() {
    let bytes: Vec<u8> = (0..16).collect();
    let path = temp_file("whole.spv", &bytes);

    let desc = load_shader_file(&path, ShaderStage::Vertex).unwrap();
    assert_eq!(desc.code, bytes);
    assert_eq!(desc.stage, ShaderStage::Vertex);
    assert_eq!(desc.entry_point, "main");

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_rejects_unaligned_code() {
    let path = temp_file("unaligned.spv", &[1, 2, 3]);
    assert!(matches!(
        load_shader_file(&path, ShaderStage::Fragment),
        Err(Error::InitializationFailed(_))
    ));
    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_rejects_empty_file() {
    let path = temp_file("empty.spv", &[]);
    assert!(load_shader_file(&path, ShaderStage::Fragment).is_err());
    std::fs::remove_file(path).ok();
}
