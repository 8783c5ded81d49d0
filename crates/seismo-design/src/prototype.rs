//! Normalized analog low-pass prototypes (S plane, corner at 1 rad/s).

use crate::design::DesignContext;
use crate::spec::Characteristic;
use seismo_core::{Complex64, expj};
use std::f64::consts::PI;

/// Bessel poles normalized for -3 dB at 1 rad/s, orders 1 to 10.
///
/// Only one member of each conjugate pair is listed. The poles of order `n`
/// start at index `n*n/4`; odd orders begin with their real pole.
const BESSEL_POLES: [(f64, f64); 30] = [
    (-1.00000000000e+00, 0.00000000000e+00),
    (-1.10160133059e+00, 6.36009824757e-01),
    (-1.32267579991e+00, 0.00000000000e+00),
    (-1.04740916101e+00, 9.99264436281e-01),
    (-1.37006783055e+00, 4.10249717494e-01),
    (-9.95208764350e-01, 1.25710573945e+00),
    (-1.50231627145e+00, 0.00000000000e+00),
    (-1.38087732586e+00, 7.17909587627e-01),
    (-9.57676548563e-01, 1.47112432073e+00),
    (-1.57149040362e+00, 3.20896374221e-01),
    (-1.37890321680e+00, 9.73657054502e-01),
    (-9.30656522947e-01, 1.66186326894e+00),
    (-1.68436817927e+00, 0.00000000000e+00),
    (-1.61203876622e+00, 5.89244506931e-01),
    (-1.37384121764e+00, 1.18689575427e+00),
    (-9.09867780623e-01, 1.83645135304e+00),
    (-1.75740840040e+00, 2.72867575103e-01),
    (-1.63693941813e+00, 8.22795625139e-01),
    (-1.36758830979e+00, 1.38974265474e+00),
    (-8.92869718847e-01, 1.99832584364e+00),
    (-1.85660050123e+00, 0.00000000000e+00),
    (-1.80717053496e+00, 5.12383730575e-01),
    (-1.65239648458e+00, 1.03138956698e+00),
    (-1.36069227838e+00, 1.56761411020e+00),
    (-8.78399653860e-01, 2.14914280434e+00),
    (-1.92761969145e+00, 2.41623471082e-01),
    (-1.84219624443e+00, 7.27257597722e-01),
    (-1.66181024140e+00, 1.22110021857e+00),
    (-1.35348410968e+00, 1.73862903889e+00),
    (-8.65756901707e-01, 2.29260483098e+00),
];

/// Fill `ctx.splane.poles` with the prototype for Bessel, Butterworth or
/// Chebyshev characteristics.
pub(crate) fn analog_poles(ctx: &mut DesignContext<'_>) {
    let order = ctx.spec.order;
    ctx.splane.poles.clear();
    ctx.splane.zeros.clear();

    match ctx.spec.characteristic {
        Characteristic::Bessel => {
            let mut p = order * order / 4;
            if order % 2 == 1 {
                let (re, im) = BESSEL_POLES[p];
                choose_pole(ctx, Complex64::new(re, im));
                p += 1;
            }
            for _ in 0..order / 2 {
                let (re, im) = BESSEL_POLES[p];
                let pole = Complex64::new(re, im);
                choose_pole(ctx, pole);
                choose_pole(ctx, pole.conj());
                p += 1;
            }
        }
        Characteristic::Butterworth | Characteristic::Chebyshev { .. } => {
            for i in 0..2 * order {
                let theta = if order % 2 == 1 {
                    i as f64 * PI / order as f64
                } else {
                    (i as f64 + 0.5) * PI / order as f64
                };
                choose_pole(ctx, expj(theta));
            }
            if let Characteristic::Chebyshev { ripple_db } = ctx.spec.characteristic {
                chebyshev_warp(&mut ctx.splane.poles, ripple_db, order);
            }
        }
        Characteristic::Resonator { .. } | Characteristic::ProportionalIntegral => {}
    }
}

/// Keep left-half-plane candidates that the pole mask selects.
fn choose_pole(ctx: &mut DesignContext<'_>, pole: Complex64) {
    if pole.re < 0.0 {
        if ctx.pole_mask & 1 == 1 {
            ctx.splane.poles.push(pole);
        }
        ctx.pole_mask >>= 1;
    }
}

/// Move Butterworth poles onto the Chebyshev ellipse.
fn chebyshev_warp(poles: &mut [Complex64], ripple_db: f64, order: usize) {
    let rip = 10f64.powf(-ripple_db / 10.0);
    let eps = (rip - 1.0).sqrt();
    let y = (1.0 / eps).asinh() / order as f64;
    let (sinh_y, cosh_y) = (y.sinh(), y.cosh());
    for pole in poles.iter_mut() {
        pole.re *= sinh_y;
        pole.im *= cosh_y;
    }
}
