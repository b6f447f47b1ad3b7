/*!
# Lens Flare Engine

Backend-agnostic core of the lens flare demos.

The lens flare effect is a fixed chain of full-screen passes: brightness
extraction, blur, forward transform of both, complex multiplication,
inverse transform and a final blend onto the swapchain. This crate
describes that chain as data and drives it through renderer traits;
`lens_flare_renderer_vulkan` implements those traits.

## Architecture

- **render**: Renderer, FrameDriver and GPU resource traits
- **graph**: pass table, dependencies, frame targets, pipeline registry,
  binding table and the frame orchestrator
- **spectral**: host-side brute-force DFT used as a reference
- **config**: renderer, window and asset configuration
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod config;
pub mod renderer;
pub mod graph;
pub mod spectral;

// Main lensflare namespace module
pub mod lensflare {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine (global logger)
    pub use crate::engine::Engine;

    // Renderer factory trait
    pub use crate::renderer::Renderer;

    // Logging sub-module (types only, macros live at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    pub mod render {
        pub use crate::renderer::*;
    }

    pub mod graph {
        pub use crate::graph::*;
    }

    pub mod spectral {
        pub use crate::spectral::*;
    }

    pub mod config {
        pub use crate::config::*;
    }
}

// Re-export math library at crate root
pub use glam;
