/*!
# Lens Flare Demos

Shared plumbing for the demo binaries:

- **cli**: command-line flags layered over `LensFlareConfig`
- **assets**: image decoding into texture descriptors
- **app**: the winit event loop driving a `Scene` through a `FrameOrchestrator`

Binaries live in `src/bin/`: `lens_flare`, `triangle` and `spectrum`.
*/

pub mod cli;
pub mod assets;
pub mod app;

pub use cli::{CommonArgs, LogLevel, ValidationLevel};
pub use assets::{load_rgba_texture, load_luma, rgba_texture_desc};
pub use app::{Scene, run_scene, exit_on_error};
