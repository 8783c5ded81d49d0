//! Property-based tests for seismo-design.
//!
//! Randomized specifications must always yield stable, real-coefficient
//! filters whose recurrence stays finite.

use proptest::prelude::*;
use seismo_design::{Characteristic, DesignSpec, Recurrence, Response, design};

const SAMPLE_RATE: f64 = 200.0;

fn characteristic(index: usize, ripple_db: f64) -> Characteristic {
    match index % 3 {
        0 => Characteristic::Bessel,
        1 => Characteristic::Butterworth,
        _ => Characteristic::Chebyshev { ripple_db },
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Low-pass and high-pass designs place every pole inside the unit
    /// circle and are unity gain at their reference frequency.
    #[test]
    fn single_corner_designs_are_stable(
        family in 0usize..3,
        order in 1usize..=10,
        corner in 0.5f64..90.0,
        ripple_db in -3.0f64..-0.1,
        highpass in any::<bool>(),
    ) {
        let response = if highpass { Response::Highpass } else { Response::Lowpass };
        let spec = DesignSpec::new(characteristic(family, ripple_db), response, SAMPLE_RATE)
            .with_order(order)
            .with_corner(corner);
        let f = design(&spec).unwrap();
        for p in &f.zplane.poles {
            prop_assert!(p.norm() < 1.0, "{}: pole {}", spec, p);
        }
        if highpass {
            prop_assert!((f.magnitude_at(SAMPLE_RATE / 2.0) - 1.0).abs() < 1e-3);
        } else {
            prop_assert!((f.magnitude_at(0.0) - 1.0).abs() < 1e-9);
        }
    }

    /// Band designs keep pole and zero counts at twice the order.
    #[test]
    fn band_designs_double_the_order(
        family in 0usize..3,
        order in 1usize..=6,
        low in 1.0f64..40.0,
        width in 1.0f64..50.0,
        bandstop in any::<bool>(),
    ) {
        let response = if bandstop { Response::Bandstop } else { Response::Bandpass };
        let spec = DesignSpec::new(characteristic(family, -0.5), response, SAMPLE_RATE)
            .with_order(order)
            .with_band(low, low + width);
        let f = design(&spec).unwrap();
        prop_assert_eq!(f.zplane.num_poles(), 2 * order);
        prop_assert_eq!(f.zplane.num_zeros(), 2 * order);
        prop_assert_eq!(f.x_coeffs.len(), 2 * order + 1);
        prop_assert_eq!(f.y_coeffs.len(), 2 * order);
    }

    /// The recurrence output stays finite for bounded input.
    #[test]
    fn recurrence_is_bounded(
        order in 1usize..=6,
        corner in 5.0f64..50.0,
        input in prop::collection::vec(-1.0f64..1.0, 256),
    ) {
        let spec = DesignSpec::new(Characteristic::Butterworth, Response::Lowpass, SAMPLE_RATE)
            .with_order(order)
            .with_corner(corner);
        let mut runner = Recurrence::new(&design(&spec).unwrap());
        for &x in &input {
            let y = runner.process(x);
            prop_assert!(y.is_finite() && y.abs() < 100.0, "{}", y);
        }
    }

    /// Finite-Q resonators converge for moderate Q away from DC and Nyquist.
    #[test]
    fn resonators_converge(q in 5.0f64..100.0, freq in 10.0f64..90.0) {
        let spec = DesignSpec::new(Characteristic::Resonator { q: Some(q) }, Response::Bandpass, SAMPLE_RATE)
            .with_corner(freq);
        let f = design(&spec).unwrap();
        prop_assert!(f.warnings.is_empty(), "{:?}", f.warnings);
        prop_assert!((f.magnitude_at(freq) - 1.0).abs() < 1e-6);
    }
}
