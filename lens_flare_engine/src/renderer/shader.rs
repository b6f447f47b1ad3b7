/// Shader trait and SPIR-V file loading

use std::path::Path;
use crate::error::{Error, Result};
use crate::engine_error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// Descriptor for creating a shader module
#[derive(Debug, Clone)]
pub struct ShaderDesc {
    pub stage: ShaderStage,
    /// SPIR-V bytes, opaque to the engine
    pub code: Vec<u8>,
    pub entry_point: String,
}

/// Compiled shader module
pub trait Shader: Send + Sync {
    fn stage(&self) -> ShaderStage;
}

/// Read a whole SPIR-V file into a `ShaderDesc` with entry point `main`
///
/// A missing or unreadable file is a setup failure: there is no fallback
/// shader, so the pipeline that needs it cannot be built.
pub fn load_shader_file(path: &Path, stage: ShaderStage) -> Result<ShaderDesc> {
    let code = std::fs::read(path).map_err(|e| {
        engine_error!("lensflare::shader", "Failed to read shader file {}: {}", path.display(), e);
        Error::InitializationFailed(format!("failed to read shader file {}: {}", path.display(), e))
    })?;

    if code.is_empty() || code.len() % 4 != 0 {
        engine_error!("lensflare::shader",
            "Shader file {} is not SPIR-V ({} bytes, expected a non-empty multiple of 4)",
            path.display(), code.len());
        return Err(Error::InitializationFailed(format!(
            "shader file {} is not SPIR-V ({} bytes)", path.display(), code.len()
        )));
    }

    Ok(ShaderDesc {
        stage,
        code,
        entry_point: "main".to_string(),
    })
}

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
