//! Configuration passed explicitly into renderer and graph setup
//!
//! Validation layers and device extensions live here instead of in
//! module-level lists so each demo decides what it enables.

use std::path::{Path, PathBuf};
use crate::error::{Error, Result};

/// Name of the Khronos validation layer
pub const KHRONOS_VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";

/// Name of the swapchain device extension
pub const SWAPCHAIN_EXTENSION: &str = "VK_KHR_swapchain";

/// Which validation messages are forwarded to the engine logger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugSeverity {
    ErrorsOnly,
    ErrorsAndWarnings,
    All,
}

/// Instance and device setup options
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub application_name: String,
    pub enable_validation: bool,
    pub validation_layers: Vec<String>,
    pub device_extensions: Vec<String>,
    pub debug_severity: DebugSeverity,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            application_name: "Lens Flares".to_string(),
            enable_validation: cfg!(debug_assertions),
            validation_layers: vec![KHRONOS_VALIDATION_LAYER.to_string()],
            device_extensions: vec![SWAPCHAIN_EXTENSION.to_string()],
            debug_severity: DebugSeverity::ErrorsAndWarnings,
        }
    }
}

impl RendererConfig {
    /// Reject configurations the backend cannot honor
    pub fn validate(&self) -> Result<()> {
        if !self.device_extensions.iter().any(|e| e == SWAPCHAIN_EXTENSION) {
            return Err(Error::InitializationFailed(format!(
                "device extensions must include {}", SWAPCHAIN_EXTENSION
            )));
        }

        if self.enable_validation && self.validation_layers.is_empty() {
            return Err(Error::InitializationFailed(
                "validation enabled but no validation layers configured".to_string(),
            ));
        }

        let names = self.validation_layers.iter()
            .chain(self.device_extensions.iter())
            .chain(std::iter::once(&self.application_name));
        for name in names {
            if name.contains('\0') {
                return Err(Error::InitializationFailed(format!(
                    "name contains an interior NUL byte: {:?}", name
                )));
            }
        }

        Ok(())
    }

    /// Layers to enable on the instance (empty when validation is off)
    pub fn enabled_layers(&self) -> &[String] {
        if self.enable_validation {
            &self.validation_layers
        } else {
            &[]
        }
    }
}

/// Window options. The surface is fixed-size: no resize handling exists.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Lens Flares".to_string(),
            width: 800,
            height: 800,
            resizable: false,
        }
    }
}

/// Where SPIR-V binaries and the source texture are read from
#[derive(Debug, Clone)]
pub struct AssetConfig {
    pub shader_dir: PathBuf,
    pub source_texture: PathBuf,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            shader_dir: PathBuf::from("./shaders"),
            source_texture: PathBuf::from("./led.jpg"),
        }
    }
}

impl AssetConfig {
    pub fn shader_path(&self, file_name: &str) -> PathBuf {
        self.shader_dir.join(file_name)
    }

    pub fn source_texture(&self) -> &Path {
        &self.source_texture
    }
}

/// Everything the lens flare demo needs at startup
#[derive(Debug, Clone, Default)]
pub struct LensFlareConfig {
    pub window: WindowConfig,
    pub renderer: RendererConfig,
    pub assets: AssetConfig,
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
