//! Lens flare render graph
//!
//! A fixed chain of full-screen passes described by a static table:
//! source -> bright -> (blur, bright_dft) -> blur_dft -> complex
//! multiplication -> idft -> blend -> swapchain. Every edge is an explicit
//! by-region external dependency declared on both render passes.

pub mod pass;
pub mod dependency;
pub mod frame_target;
pub mod attachment;
pub mod binding;
pub mod uniforms;
pub mod registry;
pub mod lens_flare_graph;
pub mod orchestrator;

pub use pass::{PassId, PassOutput, PassDesc, PASS_TABLE, VERTEX_SHADER, find_pass};
pub use dependency::{entry_dependency, exit_dependency, pass_dependencies, pass_edges, validate_pass_chain};
pub use frame_target::{
    AttachmentSlot, TargetAttachments, FrameTarget, PresentTarget, ATTACHMENT_FORMAT, render_pass_desc,
};
pub use attachment::AttachmentManager;
pub use binding::{Binding, BindingSource, UniformSlot, layout_entries, validate_bindings, validate_shared_layouts};
pub use uniforms::{BlurParams, TransformParams, UniformLayout, UniformRange, UniformBlock, align_up};
pub use registry::{PipelineRegistry, PipelineBinding};
pub use lens_flare_graph::LensFlareGraph;
pub use orchestrator::{FrameOrchestrator, FrameStats, record_frames};
