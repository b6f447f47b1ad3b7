/// Synchronization types for render pass dependencies

use bitflags::bitflags;

bitflags! {
    /// Pipeline stages a dependency waits on or blocks
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PipelineStages: u32 {
        const TOP_OF_PIPE = 1 << 0;
        const FRAGMENT_SHADER = 1 << 1;
        const COLOR_ATTACHMENT_OUTPUT = 1 << 2;
        const TRANSFER = 1 << 3;
        const BOTTOM_OF_PIPE = 1 << 4;
    }
}

bitflags! {
    /// Memory accesses made available or visible by a dependency
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AccessFlags: u32 {
        const SHADER_READ = 1 << 0;
        const COLOR_ATTACHMENT_READ = 1 << 1;
        const COLOR_ATTACHMENT_WRITE = 1 << 2;
        const TRANSFER_WRITE = 1 << 3;
        const MEMORY_READ = 1 << 4;
    }
}

/// One side of a subpass dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubpassRef {
    /// Commands before or after the render pass instance
    External,
    Index(u32),
}

/// Execution and memory dependency between two subpasses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassDependency {
    pub src_subpass: SubpassRef,
    pub dst_subpass: SubpassRef,
    pub src_stages: PipelineStages,
    pub dst_stages: PipelineStages,
    pub src_access: AccessFlags,
    pub dst_access: AccessFlags,
    /// Dependency only holds within the same framebuffer region
    pub by_region: bool,
}

impl PassDependency {
    /// True when this dependency makes `(src_stage, src_access)` happen-before
    /// and visible to `(dst_stage, dst_access)`
    pub fn orders(
        &self,
        src_stage: PipelineStages,
        src_access: AccessFlags,
        dst_stage: PipelineStages,
        dst_access: AccessFlags,
    ) -> bool {
        self.src_stages.contains(src_stage)
            && self.src_access.contains(src_access)
            && self.dst_stages.contains(dst_stage)
            && self.dst_access.contains(dst_access)
    }

    pub fn is_entry(&self) -> bool {
        self.src_subpass == SubpassRef::External && self.dst_subpass != SubpassRef::External
    }

    pub fn is_exit(&self) -> bool {
        self.src_subpass != SubpassRef::External && self.dst_subpass == SubpassRef::External
    }
}
