//! Frequency transforms and S-to-Z mappings.
//!
//! All frequencies here are normalized to the sample rate, so the S plane is
//! in radians per sample and the bilinear transform uses `T = 1`.

use crate::design::DesignContext;
use crate::spec::{Mapping, Response};
use seismo_core::{Complex64, ComplexExt, expj};
use std::f64::consts::{PI, TAU};

/// Pre-warp the raw corners for the bilinear transform.
///
/// Matched-Z designs and designs with pre-warping disabled keep the raw
/// values.
pub(crate) fn prewarp(ctx: &mut DesignContext<'_>) {
    let (a1, a2) = ctx.raw;
    ctx.warped = if ctx.spec.prewarp && ctx.spec.mapping == Mapping::Bilinear {
        (warp(a1), warp(a2))
    } else {
        (a1, a2)
    };
}

fn warp(alpha: f64) -> f64 {
    (PI * alpha).tan() / PI
}

/// Map the normalized prototype onto the requested response.
pub(crate) fn normalize(ctx: &mut DesignContext<'_>) {
    let w1 = TAU * ctx.warped.0;
    let w2 = TAU * ctx.warped.1;
    let zero = Complex64::new(0.0, 0.0);
    let n = ctx.splane.poles.len();

    match ctx.spec.response {
        Response::Lowpass => {
            for pole in ctx.splane.poles.iter_mut() {
                *pole *= w1;
            }
            ctx.splane.zeros.clear();
        }
        Response::Highpass => {
            for pole in ctx.splane.poles.iter_mut() {
                *pole = Complex64::new(w1, 0.0) / *pole;
            }
            ctx.splane.zeros = vec![zero; n];
        }
        Response::Bandpass | Response::Bandstop => {
            let w0 = (w1 * w2).sqrt();
            let bw = w2 - w1;
            let bandstop = ctx.spec.response == Response::Bandstop;

            let mut upper = Vec::with_capacity(n);
            let mut lower = Vec::with_capacity(n);
            for &pole in &ctx.splane.poles {
                let hba = if bandstop {
                    Complex64::new(0.5 * bw, 0.0) / pole
                } else {
                    pole * (0.5 * bw)
                };
                let ratio = Complex64::new(w0, 0.0) / hba;
                let temp = (Complex64::new(1.0, 0.0) - ratio * ratio).stable_sqrt();
                upper.push(hba * (Complex64::new(1.0, 0.0) + temp));
                lower.push(hba * (Complex64::new(1.0, 0.0) - temp));
            }
            upper.extend(lower);
            ctx.splane.poles = upper;

            ctx.splane.zeros = if bandstop {
                (0..n)
                    .flat_map(|_| [Complex64::new(0.0, w0), Complex64::new(0.0, -w0)])
                    .collect()
            } else {
                vec![zero; n]
            };
        }
        // rejected by validation for analog prototypes
        Response::Allpass => {}
    }
}

/// Map the S-plane set into `ctx.zplane` with the selected mapping.
pub(crate) fn to_z_plane(ctx: &mut DesignContext<'_>) {
    match ctx.spec.mapping {
        Mapping::Bilinear => {
            ctx.zplane.poles = ctx.splane.poles.iter().map(|&s| bilinear(s)).collect();
            ctx.zplane.zeros = ctx.splane.zeros.iter().map(|&s| bilinear(s)).collect();
            while ctx.zplane.zeros.len() < ctx.zplane.poles.len() {
                ctx.zplane.zeros.push(Complex64::new(-1.0, 0.0));
            }
        }
        Mapping::MatchedZ => {
            ctx.zplane.poles = ctx.splane.poles.iter().map(|s| s.exp()).collect();
            ctx.zplane.zeros = ctx.splane.zeros.iter().map(|s| s.exp()).collect();
        }
    }
}

/// Bilinear transform `z = (2 + s) / (2 - s)`.
pub(crate) fn bilinear(s: Complex64) -> Complex64 {
    let two = Complex64::new(2.0, 0.0);
    (two + s) / (two - s)
}

/// Append a conjugate zero pair on the unit circle at `alpha` (fraction of
/// the sample rate), padding poles at the origin to keep the filter causal.
pub(crate) fn add_extra_zero(ctx: &mut DesignContext<'_>, alpha: f64) {
    let z = expj(TAU * alpha);
    ctx.zplane.zeros.push(z);
    ctx.zplane.zeros.push(z.conj());
    while ctx.zplane.poles.len() < ctx.zplane.zeros.len() {
        ctx.zplane.poles.push(Complex64::new(0.0, 0.0));
    }
}
