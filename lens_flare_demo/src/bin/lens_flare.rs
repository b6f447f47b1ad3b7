//! Lens flare post-processing demo
//!
//! Loads the source texture, builds the seven-pass chain and presents the
//! blended result every frame.

use anyhow::Result;
use clap::Parser;
use lens_flare_demo::{CommonArgs, Scene, exit_on_error, load_rgba_texture, run_scene};
use lens_flare_engine::lensflare::Engine;
use lens_flare_engine::lensflare::config::LensFlareConfig;
use lens_flare_engine::lensflare::graph::{LensFlareGraph, record_frames};
use lens_flare_engine::lensflare::log::DefaultLogger;
use lens_flare_engine::lensflare::render::{CommandList, Renderer};
use lens_flare_renderer_vulkan::VulkanRenderer;

#[derive(Debug, Parser)]
#[command(name = "lens_flare", about = "Convolution lens flare rendered on the GPU")]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
}

struct LensFlareScene {
    _graph: LensFlareGraph,
}

impl Scene for LensFlareScene {
    fn setup(
        renderer: &mut VulkanRenderer,
        config: &LensFlareConfig,
    ) -> Result<(Self, Vec<Box<dyn CommandList>>)> {
        let source_desc = load_rgba_texture(config.assets.source_texture())?;
        let source = renderer.create_texture(source_desc)?;

        let graph = LensFlareGraph::build(renderer, &config.assets, source)?;
        let command_lists = record_frames(&graph, renderer)?;
        Ok((Self { _graph: graph }, command_lists))
    }
}

fn main() {
    let cli = Cli::parse();
    Engine::set_logger(DefaultLogger::new(cli.common.log_severity()));
    exit_on_error(run_scene::<LensFlareScene>(cli.common.config("Lens Flares")));
}
