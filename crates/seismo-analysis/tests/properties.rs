//! Property-based tests for seismo-analysis.
//!
//! Randomized checks that filters keep real spectra conjugate-symmetric,
//! that tapering and mean removal behave for any record, and that cached
//! filter chains and spectrograms stay consistent.

use proptest::prelude::*;
use seismo_analysis::{BandPass, FreqFilter, FreqOptions, Gaussian, Spectrogram, SpectrogramConfig, Waveform};
use seismo_core::{Complex64, fft};

fn filters() -> impl Strategy<Value = FreqFilter> {
    prop_oneof![
        (0.05f64..5.0, 1.2f64..8.0, 1usize..=10)
            .prop_map(|(low, ratio, half)| FreqFilter::Butterworth(BandPass::new(low, low * ratio, 2 * half))),
        (0.05f64..5.0, 1.2f64..8.0, 1usize..=20)
            .prop_map(|(low, ratio, n)| FreqFilter::Amplitude(BandPass::new(low, low * ratio, n))),
        (0.1f64..40.0, 0.01f64..1000.0).prop_map(|(f, a)| FreqFilter::Gaussian(Gaussian::new(f, a))),
        Just(FreqFilter::Differentiate),
        Just(FreqFilter::Integrate),
        Just(FreqFilter::Hilbert),
        (0.0f64..0.05, 1.0f64..40.0).prop_map(|(t_star, f_max)| FreqFilter::RemoveAttenuation { t_star, f_max }),
    ]
}

fn symmetric(s: &[Complex64]) -> bool {
    let n = s.len();
    let scale = s.iter().map(|c| c.norm()).fold(1.0, f64::max);
    (1..n / 2).all(|k| (s[n - k] - s[k].conj()).norm() <= 1e-9 * scale)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Every filter maps a real spectrum to a real spectrum.
    #[test]
    fn filters_preserve_conjugate_symmetry(
        input in prop::collection::vec(-100.0f32..100.0f32, 2..600),
        filter in filters(),
    ) {
        let mut spectrum = fft(&input);
        filter.apply(0.01, &mut spectrum).unwrap();
        prop_assert!(symmetric(&spectrum));
        prop_assert!(spectrum.iter().all(|c| c.is_finite()));
    }

    /// The taper zeroes both ends and never grows a sample.
    #[test]
    fn taper_bounds(
        input in prop::collection::vec(-10.0f32..10.0f32, 8..400),
        percent in 1.0f64..50.0,
    ) {
        let mut wf = Waveform::new(input.clone(), 0.01).unwrap();
        let applied = wf.cosine_taper(percent);
        let out = wf.samples();
        if applied {
            prop_assert_eq!(out[0], 0.0);
            prop_assert_eq!(out[out.len() - 1], 0.0);
        } else {
            prop_assert_eq!(out, input.as_slice());
        }
        for (o, i) in out.iter().zip(&input) {
            prop_assert!(o.abs() <= i.abs());
        }
    }

    /// Mean removal followed by undo restores the record bit for bit.
    #[test]
    fn remove_mean_undo_is_exact(input in prop::collection::vec(-1e4f32..1e4f32, 1..500)) {
        let mut wf = Waveform::new(input.clone(), 0.005).unwrap();
        let extrema = wf.extrema();
        wf.remove_mean_all().unwrap();
        prop_assert!(wf.undo_remove_mean().is_some());
        prop_assert_eq!(wf.samples(), input.as_slice());
        prop_assert_eq!(wf.extrema(), extrema);
        prop_assert!(wf.undo_remove_mean().is_none());
    }

    /// Chaining a filter with an inverse transform equals applying it to a
    /// freshly transformed copy.
    #[test]
    fn cached_chain_matches_direct(input in prop::collection::vec(-1.0f32..1.0f32, 16..300)) {
        let mut chained = Waveform::new(input.clone(), 0.01).unwrap();
        chained.apply_freq_process(&FreqFilter::Hilbert, &FreqOptions::new()).unwrap();
        chained.apply_freq_process(&FreqFilter::Hilbert, &FreqOptions::new().with_inverse(true)).unwrap();

        let mut direct = fft(&input);
        FreqFilter::Hilbert.apply(0.01, &mut direct).unwrap();
        FreqFilter::Hilbert.apply(0.01, &mut direct).unwrap();
        let expected = seismo_core::fft_inverse(&direct, input.len());

        for (a, b) in chained.samples().iter().zip(&expected) {
            prop_assert!((a - b).abs() < 1e-5);
        }
    }

    /// Spectrogram amplitudes are finite and non-negative for any record.
    #[test]
    fn spectrogram_is_finite(
        input in prop::collection::vec(-5.0f32..5.0f32, 64..400),
        segments in 1usize..8,
    ) {
        let config = SpectrogramConfig {
            segments,
            frequencies: 6,
            ..SpectrogramConfig::default()
        };
        let spec = Spectrogram::compute(&input, 0.01, 0.0, &config).unwrap();
        prop_assert_eq!(spec.num_times(), input.len());
        prop_assert!(spec.amplitudes().iter().flatten().all(|a| a.is_finite() && *a >= 0.0));
    }
}
