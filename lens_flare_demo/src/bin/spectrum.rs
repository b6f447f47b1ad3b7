//! Host-side magnitude spectrum of an image
//!
//! Brute-force DFT, so keep inputs small (a 64x64 image is already 16M
//! complex multiply-adds).

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use image::GrayImage;
use lens_flare_demo::{LogLevel, exit_on_error, load_luma};
use lens_flare_engine::engine_info;
use lens_flare_engine::lensflare::Engine;
use lens_flare_engine::lensflare::log::DefaultLogger;
use lens_flare_engine::lensflare::spectral::magnitude_spectrum;

#[derive(Debug, Parser)]
#[command(name = "spectrum", about = "Centered DFT magnitude of a grayscale image")]
struct Cli {
    /// Image to transform (converted to 8-bit luma)
    input: PathBuf,

    /// Where to write the spectrum PNG
    #[arg(short, long, default_value = "spectrum.png")]
    output: PathBuf,

    /// Minimum severity printed by the logger
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

fn run(cli: &Cli) -> Result<()> {
    let luma = load_luma(&cli.input)?;
    let (width, height) = luma.dimensions();

    let started = Instant::now();
    let magnitudes = magnitude_spectrum(luma.as_raw(), width as usize, height as usize)?;
    engine_info!("lensflare::spectrum", "{}x{} spectrum in {:.2}s",
        width, height, started.elapsed().as_secs_f64());

    let spectrum = GrayImage::from_raw(width, height, magnitudes)
        .context("spectrum size does not match the input image")?;
    spectrum
        .save(&cli.output)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    engine_info!("lensflare::spectrum", "Wrote {}", cli.output.display());
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    Engine::set_logger(DefaultLogger::new(cli.log_level.into()));
    exit_on_error(run(&cli));
}
