//! Seismo Core - numeric primitives for strong-motion processing
//!
//! This crate is the foundation every other seismo crate builds on:
//!
//! - [`complex`] - complex value helpers (stable square root, unit phasors, reflection)
//! - [`fft`] - in-place radix-2 Cooley-Tukey FFT with zero-padding helpers
//! - [`pole_zero`] - pole/zero sets, polynomial expansion and rational evaluation
//! - [`math`] - decibel and angular-frequency conversions
//!
//! # Sign convention
//!
//! The forward transform uses the kernel `e^{+j2πkn/N}` and the inverse
//! `e^{-j2πkn/N} / N`. Frequency-domain filters built on top of this crate
//! therefore apply physical transfer functions conjugated.
//!
//! # Example
//!
//! ```rust
//! use seismo_core::fft::{fft, fft_inverse};
//!
//! let samples = [0.0f32, 1.0, 0.0, -1.0, 0.5];
//! let spectrum = fft(&samples);
//! assert_eq!(spectrum.len(), 8); // zero-padded to the next power of two
//!
//! let restored = fft_inverse(&spectrum, samples.len());
//! for (a, b) in samples.iter().zip(&restored) {
//!     assert!((a - b).abs() < 1e-6);
//! }
//! ```

pub mod complex;
pub mod fft;
pub mod math;
pub mod pole_zero;

pub use complex::{Complex, Complex64, ComplexExt, expj};
pub use fft::{Direction, fft, fft_inverse, fft_padded, next_power_of_two};
pub use math::{db_to_linear, hz_to_omega, linear_to_db};
pub use pole_zero::{
    PoleZero, SENTINEL_MAGNITUDE, evaluate_polynomial, evaluate_rational, expand_polynomial,
};
