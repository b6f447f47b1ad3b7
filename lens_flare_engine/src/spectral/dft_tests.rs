//! Unit tests for dft.rs

use super::*;

const EPSILON: f64 = 1e-9;

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (k, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!((a - e).abs() < EPSILON, "sample {}: {} != {}", k, a, e);
    }
}

// ============================================================================
// Tests: Forward transform
// ============================================================================

#[test]
fn test_dc_term_is_sum() {
    let input = [5i16; 6];
    let spectrum = dft(&input, 3, 2).unwrap();

    assert!((spectrum.real()[0] - 30.0).abs() < EPSILON);
    assert!(spectrum.imaginary()[0].abs() < EPSILON);
    for k in 1..6 {
        assert!(spectrum.magnitude(k / 3, k % 3).unwrap() < EPSILON, "bin {}", k);
    }
}

#[test]
fn test_origin_impulse_is_flat() {
    let mut input = [0i16; 16];
    input[0] = 7;
    let spectrum = dft(&input, 4, 4).unwrap();

    assert_close(spectrum.real(), &[7.0; 16]);
    assert_close(spectrum.imaginary(), &[0.0; 16]);
}

#[test]
fn test_negative_samples() {
    let input = [-3i16, 3, -3, 3];
    let spectrum = dft(&input, 4, 1).unwrap();

    // Alternating sign puts everything at the Nyquist column
    assert!((spectrum.real()[2] + 12.0).abs() < EPSILON);
    assert!(spectrum.magnitude(0, 0).unwrap() < EPSILON);
}

// ============================================================================
// Tests: Inverse transform
// ============================================================================

#[test]
fn test_impulse_round_trip() {
    let mut input = [0i16; 16];
    input[1 * 4 + 2] = 100;

    let spectrum = dft(&input, 4, 4).unwrap();
    let restored = inverse_dft(&spectrum);

    let expected: Vec<f64> = input.iter().map(|&v| v as f64).collect();
    assert_close(&restored, &expected);
}

#[test]
fn test_non_square_round_trip() {
    let input = [12i16, -4, 0, 9, 255, -128];
    let spectrum = dft(&input, 3, 2).unwrap();
    assert_eq!((spectrum.width(), spectrum.height()), (3, 2));

    let restored = inverse_dft(&spectrum);
    let expected: Vec<f64> = input.iter().map(|&v| v as f64).collect();
    assert_close(&restored, &expected);
}

// ============================================================================
// Tests: Magnitude spectrum
// ============================================================================

#[test]
fn test_constant_image_peaks_at_center() {
    let input = [10u8; 16];
    let magnitudes = magnitude_spectrum(&input, 4, 4).unwrap();

    // 10 * 16 / sqrt(16)
    assert_eq!(magnitudes[2 * 4 + 2], 40);
    for (k, &m) in magnitudes.iter().enumerate() {
        if k != 2 * 4 + 2 {
            assert_eq!(m, 0, "bin {}", k);
        }
    }
}

#[test]
fn test_odd_dimensions_do_not_center() {
    let magnitudes = magnitude_spectrum(&[10u8; 9], 3, 3).unwrap();
    assert!(magnitudes.iter().filter(|&&m| m > 0).count() > 1);
}

#[test]
fn test_magnitude_is_clamped() {
    let input = [200u8; 16];
    let magnitudes = magnitude_spectrum(&input, 4, 4).unwrap();
    assert_eq!(magnitudes[2 * 4 + 2], 255);
}

#[test]
fn test_black_image_has_empty_spectrum() {
    let magnitudes = magnitude_spectrum(&[0u8; 12], 4, 3).unwrap();
    assert_eq!(magnitudes, vec![0u8; 12]);
}

// ============================================================================
// Tests: Errors
// ============================================================================

#[test]
fn test_size_mismatch_is_rejected() {
    assert!(matches!(dft(&[1i16; 5], 2, 2), Err(Error::InvalidResource(_))));
    assert!(matches!(magnitude_spectrum(&[1u8; 3], 2, 2), Err(Error::InvalidResource(_))));
}

#[test]
fn test_zero_extent_is_rejected() {
    assert!(dft(&[], 0, 4).is_err());
    assert!(magnitude_spectrum(&[], 4, 0).is_err());
}

#[test]
fn test_magnitude_out_of_range() {
    let spectrum = dft(&[1i16, 2, 3, 4], 2, 2).unwrap();

    assert!(spectrum.magnitude(1, 1).is_some());
    // Column 2 would otherwise alias bin (1, 0)
    assert_eq!(spectrum.magnitude(0, 2), None);
    assert_eq!(spectrum.magnitude(2, 0), None);
    assert_eq!(spectrum.magnitude(5, 5), None);
}

#[test]
fn test_spectrum_planes_must_match() {
    let result = Spectrum::new(2, 2, vec![0.0; 4], vec![0.0; 3]);
    assert!(result.is_err());
    assert!(Spectrum::new(2, 2, vec![0.0; 4], vec![0.0; 4]).is_ok());
}
