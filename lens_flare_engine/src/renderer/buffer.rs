/// Buffer trait - host-visible uniform and vertex buffers

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    Uniform,
    Vertex,
}

/// Descriptor for creating a buffer
#[derive(Debug, Clone)]
pub struct BufferDesc {
    pub label: String,
    pub size: u64,
    pub usage: BufferUsage,
}

/// Host-visible GPU buffer
pub trait Buffer: Send + Sync {
    /// Copy `data` into the buffer at `offset`
    fn update(&self, offset: u64, data: &[u8]) -> Result<()>;

    fn size(&self) -> u64;
}
