/// Brute-force 2D discrete Fourier transform
///
/// Reference code for what the GPU transform passes approximate. Every
/// output coordinate sums over every input coordinate: O(H²W²).
///
/// Images are row-major: `input[x * width + y]`, row `x` in `0..height`,
/// column `y` in `0..width`.

use std::f64::consts::PI;

use crate::error::{Error, Result};
use crate::engine_error;

/// Complex output of a forward transform, split into real and imaginary planes
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    width: usize,
    height: usize,
    real: Vec<f64>,
    imaginary: Vec<f64>,
}

impl Spectrum {
    pub fn new(width: usize, height: usize, real: Vec<f64>, imaginary: Vec<f64>) -> Result<Self> {
        check_len(real.len(), width, height)?;
        check_len(imaginary.len(), width, height)?;
        Ok(Self { width, height, real, imaginary })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn real(&self) -> &[f64] {
        &self.real
    }

    pub fn imaginary(&self) -> &[f64] {
        &self.imaginary
    }

    /// `|F(i, j)|`, or `None` outside `height x width`
    pub fn magnitude(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.height || j >= self.width {
            return None;
        }
        let k = i * self.width + j;
        Some(self.real[k].hypot(self.imaginary[k]))
    }
}

fn check_len(len: usize, width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 || len != width * height {
        engine_error!("lensflare::spectral",
            "Image of {} samples does not match {}x{}", len, width, height);
        return Err(Error::InvalidResource(format!(
            "image has {} samples, expected {}x{} = {}", len, width, height, width * height
        )));
    }
    Ok(())
}

/// Forward kernel over a complex image: `Σ in[x][y]·exp(-2πi·(i·x/H + j·y/W))`
fn transform(real: &[f64], imaginary: &[f64], width: usize, height: usize) -> (Vec<f64>, Vec<f64>) {
    let mut out_real = vec![0.0; width * height];
    let mut out_imaginary = vec![0.0; width * height];

    for i in 0..height {
        for j in 0..width {
            let (mut re, mut im) = (0.0, 0.0);

            for x in 0..height {
                for y in 0..width {
                    let phase = -2.0 * PI
                        * (i as f64 * x as f64 / height as f64 + j as f64 * y as f64 / width as f64);
                    let (sin, cos) = phase.sin_cos();
                    let (a, b) = (real[x * width + y], imaginary[x * width + y]);
                    re += a * cos - b * sin;
                    im += a * sin + b * cos;
                }
            }

            out_real[i * width + j] = re;
            out_imaginary[i * width + j] = im;
        }
    }

    (out_real, out_imaginary)
}

/// Forward DFT of a signed 16-bit image
pub fn dft(input: &[i16], width: usize, height: usize) -> Result<Spectrum> {
    check_len(input.len(), width, height)?;

    let real: Vec<f64> = input.iter().map(|&v| v as f64).collect();
    let imaginary = vec![0.0; real.len()];
    let (real, imaginary) = transform(&real, &imaginary, width, height);

    Ok(Spectrum { width, height, real, imaginary })
}

/// Inverse DFT by conjugate-and-rescale, returning the real part
///
/// Conjugates the spectrum, applies the forward kernel, conjugates again and
/// divides by `W·H`.
pub fn inverse_dft(spectrum: &Spectrum) -> Vec<f64> {
    let (width, height) = (spectrum.width, spectrum.height);
    let conjugate: Vec<f64> = spectrum.imaginary.iter().map(|v| -v).collect();
    let (real, _imaginary) = transform(&spectrum.real, &conjugate, width, height);

    // Conjugating again only flips the imaginary part, which is dropped.
    let scale = (width * height) as f64;
    real.into_iter().map(|v| v / scale).collect()
}

/// Centered magnitude spectrum of an 8-bit image, for display
///
/// Each sample is multiplied by `(-1)^(x+y)`, which moves the zero frequency
/// to `(H/2, W/2)` when both dimensions are even. With an odd dimension the
/// shift falls between bins and the energy spreads instead. Magnitudes are
/// divided by `sqrt(W·H)`, truncated and clamped to `0..=255`.
pub fn magnitude_spectrum(input: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
    check_len(input.len(), width, height)?;

    let real: Vec<f64> = input
        .iter()
        .enumerate()
        .map(|(k, &v)| {
            let (x, y) = (k / width, k % width);
            if (x + y) % 2 == 0 { v as f64 } else { -(v as f64) }
        })
        .collect();
    let imaginary = vec![0.0; real.len()];
    let (real, imaginary) = transform(&real, &imaginary, width, height);

    let norm = ((width * height) as f64).sqrt();
    Ok(real
        .iter()
        .zip(&imaginary)
        .map(|(re, im)| (re.hypot(*im) / norm).clamp(0.0, 255.0) as u8)
        .collect())
}

#[cfg(test)]
#[path = "dft_tests.rs"]
mod tests;
