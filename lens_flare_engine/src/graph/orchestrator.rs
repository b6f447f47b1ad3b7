/// Frame orchestrator - pre-recorded command lists driven through a FrameDriver
///
/// Per frame: acquire, submit the image's command list, present, then wait
/// on and reset that image's fence. Command lists are recorded once.

use crate::error::{Error, Result};
use crate::{engine_error, engine_info, engine_trace};
use crate::graph::lens_flare_graph::LensFlareGraph;
use crate::renderer::{CommandList, FrameDriver, Renderer};

/// Frame loop counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frames_rendered: u64,
    pub last_image_index: Option<u32>,
}

/// Owns one pre-recorded command list per swapchain image
pub struct FrameOrchestrator {
    command_lists: Vec<Box<dyn CommandList>>,
    stats: FrameStats,
}

impl FrameOrchestrator {
    /// Fails unless there is exactly one command list per driver image
    pub fn new(command_lists: Vec<Box<dyn CommandList>>, driver: &dyn FrameDriver) -> Result<Self> {
        let image_count = driver.image_count() as usize;
        if command_lists.len() != image_count {
            engine_error!("lensflare::graph",
                "{} command lists recorded for {} swapchain images", command_lists.len(), image_count);
            return Err(Error::InvalidResource(format!(
                "{} command lists for {} swapchain images (fences)", command_lists.len(), image_count
            )));
        }
        Ok(Self { command_lists, stats: FrameStats::default() })
    }

    /// Render one frame and return the image index it used
    pub fn render_frame(&mut self, driver: &mut dyn FrameDriver) -> Result<u32> {
        let image_index = driver.acquire()?;
        let command_list = self.command_lists.get(image_index as usize).ok_or_else(|| {
            Error::BackendError(format!(
                "acquired image {} but only {} command lists exist", image_index, self.command_lists.len()
            ))
        })?;

        driver.submit(command_list.as_ref(), image_index)?;
        driver.present(image_index)?;
        driver.wait_and_reset_fence(image_index)?;

        self.stats.frames_rendered += 1;
        self.stats.last_image_index = Some(image_index);
        engine_trace!("lensflare::graph", "Frame {} on image {}", self.stats.frames_rendered, image_index);
        Ok(image_index)
    }

    /// Render frames until `poll` returns `Ok(false)` or an error occurs
    ///
    /// `poll` runs after every frame and stands in for the window event pump.
    pub fn run<F>(&mut self, driver: &mut dyn FrameDriver, mut poll: F) -> Result<FrameStats>
    where
        F: FnMut(&FrameStats) -> Result<bool>,
    {
        loop {
            self.render_frame(driver)?;
            if !poll(&self.stats)? {
                break;
            }
        }
        engine_info!("lensflare::graph", "Frame loop stopped after {} frames", self.stats.frames_rendered);
        Ok(self.stats)
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn command_list_count(&self) -> usize {
        self.command_lists.len()
    }
}

/// Record the lens flare chain once per swapchain image
pub fn record_frames(
    graph: &LensFlareGraph,
    renderer: &mut dyn Renderer,
) -> Result<Vec<Box<dyn CommandList>>> {
    let image_count = renderer.swapchain_info().image_count;
    let mut command_lists = Vec::with_capacity(image_count as usize);

    for image_index in 0..image_count {
        let mut cmd = renderer.create_command_list()?;
        cmd.begin()?;
        graph.record(cmd.as_mut(), image_index)?;
        cmd.end()?;
        command_lists.push(cmd);
    }

    engine_info!("lensflare::graph", "Recorded {} command lists", image_count);
    Ok(command_lists)
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
