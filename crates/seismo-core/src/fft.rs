//! Radix-2 FFT on power-of-two buffers
//!
//! Real inputs are zero-padded to the next power of two, so callers never
//! have to size their records. The forward direction uses the `e^{+j...}`
//! kernel; [`fft_inverse`] applies the opposite sign and the `1/N` scale.

use crate::complex::Complex64;
use std::f64::consts::PI;

/// Transform direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Time to frequency, kernel `e^{+j2πkn/N}`
    Forward,
    /// Frequency to time, kernel `e^{-j2πkn/N}` (unscaled)
    Inverse,
}

impl Direction {
    fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Inverse => -1.0,
        }
    }
}

/// Smallest power of two `>= n` (0 stays 0).
pub fn next_power_of_two(n: usize) -> usize {
    if n == 0 { 0 } else { n.next_power_of_two() }
}

/// In-place iterative Cooley-Tukey transform.
///
/// The buffer length must be a power of two; lengths 0 and 1 are left
/// untouched. No scaling is applied in either direction.
pub fn transform_in_place(buffer: &mut [Complex64], direction: Direction) {
    let n = buffer.len();
    if n < 2 {
        return;
    }
    assert!(n.is_power_of_two(), "FFT length {n} is not a power of two");

    // Bit-reversal permutation
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            buffer.swap(i, j);
        }
    }

    // Butterfly stages
    let sign = direction.sign();
    let mut twiddles = Vec::with_capacity(n / 2);
    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let step = sign * 2.0 * PI / len as f64;
        twiddles.clear();
        twiddles.extend((0..half).map(|k| {
            let angle = step * k as f64;
            Complex64::new(angle.cos(), angle.sin())
        }));

        for start in (0..n).step_by(len) {
            for k in 0..half {
                let u = buffer[start + k];
                let v = buffer[start + k + half] * twiddles[k];
                buffer[start + k] = u + v;
                buffer[start + k + half] = u - v;
            }
        }
        len <<= 1;
    }
}

/// Forward FFT of a real sequence, zero-padded to the next power of two.
///
/// An empty input returns an empty spectrum.
pub fn fft(samples: &[f32]) -> Vec<Complex64> {
    fft_padded(samples, next_power_of_two(samples.len()))
}

/// Forward FFT of a real sequence zero-padded (or truncated) to `size`.
///
/// `size` must be zero or a power of two.
pub fn fft_padded(samples: &[f32], size: usize) -> Vec<Complex64> {
    let mut buffer: Vec<Complex64> = samples
        .iter()
        .take(size)
        .map(|&x| Complex64::new(f64::from(x), 0.0))
        .collect();
    buffer.resize(size, Complex64::new(0.0, 0.0));
    transform_in_place(&mut buffer, Direction::Forward);
    buffer
}

/// Inverse FFT returning the first `n` real parts, scaled by `1/N`.
///
/// `n` larger than the spectrum length is clamped to it.
pub fn fft_inverse(spectrum: &[Complex64], n: usize) -> Vec<f32> {
    let mut buffer = spectrum.to_vec();
    inverse_in_place(&mut buffer);
    buffer.iter().take(n).map(|c| c.re as f32).collect()
}

/// Inverse FFT on a complex buffer, in place, including the `1/N` scale.
pub fn inverse_in_place(buffer: &mut [Complex64]) {
    if buffer.is_empty() {
        return;
    }
    transform_in_place(buffer, Direction::Inverse);
    let scale = 1.0 / buffer.len() as f64;
    for c in buffer.iter_mut() {
        *c *= scale;
    }
}

/// Frequency in Hz of bin `k` for a transform of `fft_size` points.
#[inline]
pub fn bin_frequency(k: usize, fft_size: usize, sample_interval: f64) -> f64 {
    k as f64 / (fft_size as f64 * sample_interval)
}

/// Bin spacing in Hz for a transform of `fft_size` points.
#[inline]
pub fn frequency_resolution(fft_size: usize, sample_interval: f64) -> f64 {
    1.0 / (fft_size as f64 * sample_interval)
}
