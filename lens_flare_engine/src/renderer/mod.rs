/// Renderer module - backend-neutral GPU types and traits
///
/// The Vulkan crate implements these traits. Graph code only talks to
/// `dyn Renderer` so it can be exercised against `MockRenderer`.

pub mod renderer;
pub mod texture;
pub mod buffer;
pub mod shader;
pub mod sync;
pub mod render_pass;
pub mod pipeline;
pub mod binding;
pub mod command_list;
pub mod frame;
#[cfg(test)]
pub mod mock_renderer;

pub use renderer::*;
pub use texture::*;
pub use buffer::*;
pub use shader::*;
pub use sync::*;
pub use render_pass::*;
pub use pipeline::*;
pub use binding::*;
pub use command_list::*;
pub use frame::*;
