//! Integration tests for the host-side reference transform
//!
//! Run with: cargo test --test spectral_integration_tests

use lens_flare_engine::lensflare::spectral::{dft, inverse_dft, magnitude_spectrum};
use lens_flare_engine::lensflare::Error;

#[test]
fn test_integration_round_trip_8x8_pattern() {
    let (width, height) = (8, 8);
    let input: Vec<i16> = (0..width * height)
        .map(|k| ((k * 37) % 255) as i16 - 128)
        .collect();

    let spectrum = dft(&input, width, height).unwrap();
    let restored = inverse_dft(&spectrum);

    for (k, (&expected, actual)) in input.iter().zip(&restored).enumerate() {
        assert!((expected as f64 - actual).abs() < 1e-6, "sample {}", k);
    }
}

#[test]
fn test_integration_parseval() {
    let input: Vec<i16> = vec![3, -1, 4, 1, -5, 9, 2, -6, 5, 3, -5, 8];
    let (width, height) = (4, 3);
    let spectrum = dft(&input, width, height).unwrap();

    let spatial: f64 = input.iter().map(|&v| (v as f64).powi(2)).sum();
    let mut spectral = 0.0;
    for i in 0..height {
        for j in 0..width {
            spectral += spectrum.magnitude(i, j).unwrap().powi(2);
        }
    }
    let spectral = spectral / (width * height) as f64;

    assert!((spatial - spectral).abs() < 1e-6);
}

#[test]
fn test_integration_centered_spectrum_of_stripes() {
    // Vertical stripes: energy on the center row only
    let (width, height) = (4, 4);
    let input: Vec<u8> = (0..width * height)
        .map(|k| if (k % width) % 2 == 0 { 40 } else { 0 })
        .collect();

    let magnitudes = magnitude_spectrum(&input, width, height).unwrap();

    for i in 0..height {
        for j in 0..width {
            if i != height / 2 {
                assert_eq!(magnitudes[i * width + j], 0, "({}, {})", i, j);
            }
        }
    }
    assert!(magnitudes[(height / 2) * width + width / 2] > 0);
}

#[test]
fn test_integration_rejects_mismatched_sizes() {
    assert!(matches!(magnitude_spectrum(&[0u8; 10], 4, 4), Err(Error::InvalidResource(_))));
}
