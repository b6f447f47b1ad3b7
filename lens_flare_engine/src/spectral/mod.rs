//! Host-side spectral math (brute-force DFT experiment)
//!
//! Independent of the GPU pass chain; shares no state with it.

pub mod dft;

pub use dft::{Spectrum, dft, inverse_dft, magnitude_spectrum};
