//! Error types for the lens flare engine
//!
//! Setup failures (GPU object creation, file loads, shader modules) and
//! frame-loop failures share one enum. Only `SwapchainOutOfDate` is
//! recoverable: a caller may recreate the swapchain and retry instead of
//! aborting.

use std::fmt;

/// Result type for lens flare engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Lens flare engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Backend-specific error (Vulkan call failed)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (texture, shader, binding, pass table entry, etc.)
    InvalidResource(String),

    /// Initialization failed (instance, device, pipelines, shader files)
    InitializationFailed(String),

    /// The swapchain no longer matches the surface and must be recreated
    SwapchainOutOfDate,
}

impl Error {
    /// Whether the frame loop may retry after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::SwapchainOutOfDate)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::SwapchainOutOfDate => write!(f, "Swapchain out of date"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
