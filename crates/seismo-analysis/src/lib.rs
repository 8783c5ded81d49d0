//! Seismo Analysis - frequency-domain processing of strong-motion records
//!
//! This crate turns raw channel samples into corrected products:
//!
//! - [`filters`] - spectral filters (Butterworth, Gaussian, power band-pass,
//!   differentiate, integrate, Hilbert, envelope, attenuation removal,
//!   convolution and water-level deconvolution)
//! - [`waveform`] - the single-channel container with time-domain operations
//!   and a cached spectrum shared between consecutive filters
//! - [`pipeline`] - ordered processing steps run against a waveform
//! - [`spectrogram`] - narrow-band envelope spectrograms on linear or
//!   logarithmic frequency axes
//! - [`export`] - CSV output for spectra, spectrograms and waveforms
//!
//! ## Example
//!
//! ```rust
//! use seismo_analysis::filters::{BandPass, FreqFilter};
//! use seismo_analysis::{FreqOptions, ProcessingStep, Waveform};
//!
//! let samples: Vec<f32> = (0..4000).map(|i| (i as f32 * 0.02).sin()).collect();
//! let mut acc = Waveform::new(samples, 0.005).unwrap().with_units("cm/sec/sec", "sec");
//! acc.run(&[
//!     ProcessingStep::RemoveMean { start: None, end: None },
//!     ProcessingStep::Filter {
//!         filter: FreqFilter::Butterworth(BandPass::new(0.1, 25.0, 4)),
//!         options: FreqOptions::new().with_taper(5.0),
//!     },
//!     ProcessingStep::Filter {
//!         filter: FreqFilter::Integrate,
//!         options: FreqOptions::new(),
//!     },
//! ])
//! .unwrap();
//! assert_eq!(acc.amplitude_units(), "cm/sec");
//! ```

pub mod error;
pub mod export;
pub mod filters;
pub mod pipeline;
pub mod spectrogram;
pub mod waveform;

pub use error::{FilterError, Result};
pub use filters::{BandPass, FreqFilter, Gaussian, MasterSpectrum, UnitChange};
pub use pipeline::ProcessingStep;
pub use spectrogram::{FrequencyAxis, RowFilter, Spectrogram, SpectrogramConfig};
pub use waveform::{AmplitudeSpectrum, CacheState, FreqOptions, GapWindow, Waveform};
