/// Command-line flags shared by the windowed demos
///
/// Every flag overrides one field of the default `LensFlareConfig`; a flag
/// left out keeps the default.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use lens_flare_engine::lensflare::config::{DebugSeverity, LensFlareConfig};
use lens_flare_engine::lensflare::log::LogSeverity;

#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Directory holding the compiled SPIR-V shaders
    #[arg(long, value_name = "DIR")]
    pub shaders: Option<PathBuf>,

    /// Source texture of the lens flare chain
    #[arg(long, value_name = "FILE")]
    pub texture: Option<PathBuf>,

    /// Enable the Khronos validation layer (default in debug builds)
    #[arg(long, conflicts_with = "no_validation")]
    pub validation: bool,

    /// Disable validation layers even in debug builds
    #[arg(long)]
    pub no_validation: bool,

    /// Which validation messages reach the log
    #[arg(long, value_enum, default_value_t = ValidationLevel::Warnings)]
    pub validation_level: ValidationLevel,

    /// Minimum severity printed by the logger
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ValidationLevel {
    Errors,
    Warnings,
    All,
}

impl From<ValidationLevel> for DebugSeverity {
    fn from(level: ValidationLevel) -> Self {
        match level {
            ValidationLevel::Errors => DebugSeverity::ErrorsOnly,
            ValidationLevel::Warnings => DebugSeverity::ErrorsAndWarnings,
            ValidationLevel::All => DebugSeverity::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LogSeverity {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LogSeverity::Trace,
            LogLevel::Debug => LogSeverity::Debug,
            LogLevel::Info => LogSeverity::Info,
            LogLevel::Warn => LogSeverity::Warn,
            LogLevel::Error => LogSeverity::Error,
        }
    }
}

impl CommonArgs {
    /// Default configuration with the flags applied, titled `title`
    pub fn config(&self, title: &str) -> LensFlareConfig {
        let mut config = LensFlareConfig::default();
        config.window.title = title.to_string();
        config.renderer.application_name = title.to_string();

        if let Some(dir) = &self.shaders {
            config.assets.shader_dir = dir.clone();
        }
        if let Some(texture) = &self.texture {
            config.assets.source_texture = texture.clone();
        }

        if self.validation {
            config.renderer.enable_validation = true;
        } else if self.no_validation {
            config.renderer.enable_validation = false;
        }
        config.renderer.debug_severity = self.validation_level.into();

        config
    }

    pub fn log_severity(&self) -> LogSeverity {
        self.log_level.into()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
