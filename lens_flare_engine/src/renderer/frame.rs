/// FrameDriver trait - acquire / submit / present / throttle
///
/// One fence and one command list per swapchain image. The fence for an
/// image is signaled by `submit` and waited on by `wait_and_reset_fence`,
/// so at most one submission per image is ever in flight.

use crate::error::Result;
use crate::renderer::CommandList;

pub trait FrameDriver {
    /// Number of swapchain images (and in-flight fences)
    fn image_count(&self) -> u32;

    /// Acquire the next swapchain image, signaling the acquire semaphore
    ///
    /// Returns `Error::SwapchainOutOfDate` when the surface changed.
    fn acquire(&mut self) -> Result<u32>;

    /// Submit a pre-recorded command list for `image_index`
    ///
    /// Waits on the acquire semaphore at the color-attachment-output stage,
    /// signals the render-complete semaphore and the fence of `image_index`.
    fn submit(&mut self, command_list: &dyn CommandList, image_index: u32) -> Result<()>;

    /// Queue `image_index` for presentation after render-complete
    fn present(&mut self, image_index: u32) -> Result<()>;

    /// Block until the fence of `image_index` signals, then reset it
    fn wait_and_reset_fence(&mut self, image_index: u32) -> Result<()>;
}
