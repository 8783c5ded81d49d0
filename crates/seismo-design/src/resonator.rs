//! Two-pole resonators placed directly in the Z plane.

use crate::design::{DesignContext, expand_real};
use crate::error::{DesignWarning, Result};
use crate::spec::Response;
use seismo_core::{Complex64, ComplexExt, evaluate_rational, expj};
use std::f64::consts::{PI, TAU};

/// Bisection cap for the finite-Q pole search.
pub const MAX_ITERATIONS: usize = 50;

/// Convergence threshold on `Im/Re` of the response at the target angle.
const PHASE_TOLERANCE: f64 = 1e-10;

/// Fill `ctx.zplane` with the resonator for the requested response.
pub(crate) fn place(ctx: &mut DesignContext<'_>, q: Option<f64>) -> Result<()> {
    let theta = TAU * ctx.raw.0;
    bandpass(ctx, theta, q)?;

    match ctx.spec.response {
        Response::Bandstop => {
            let z = expj(theta);
            ctx.zplane.zeros = vec![z, z.conj()];
        }
        Response::Allpass => {
            ctx.zplane.zeros = ctx.zplane.poles.iter().map(|p| p.reflect()).collect();
        }
        _ => {}
    }
    Ok(())
}

/// Band-pass resonator: zeros at DC and Nyquist, a conjugate pole pair
/// tuned so the response is real (zero phase) at `theta`.
fn bandpass(ctx: &mut DesignContext<'_>, theta: f64, q: Option<f64>) -> Result<()> {
    ctx.zplane.zeros = vec![Complex64::new(1.0, 0.0), Complex64::new(-1.0, 0.0)];

    let Some(q) = q else {
        let p = expj(theta);
        ctx.zplane.poles = vec![p, p.conj()];
        return Ok(());
    };

    let r = (-theta / (2.0 * q)).exp();
    let target = expj(theta);
    let residual = bisect(|thm| {
        let p = expj(thm) * r;
        ctx.zplane.poles = vec![p, p.conj()];
        let (top, bot) = expand_real(&ctx.zplane)?;
        let g = evaluate_rational(&top, &bot, target);
        Ok(g.im / g.re)
    })?;

    if residual.is_nan() || residual >= PHASE_TOLERANCE {
        ctx.warnings.push(DesignWarning::ResonatorNotConverged {
            iterations: MAX_ITERATIONS,
            residual,
        });
    }
    Ok(())
}

/// Halve `[0, π]` around the angle where `phase` crosses zero from below,
/// starting at the midpoint. Returns `|phase|` at the last angle evaluated.
fn bisect(mut phase: impl FnMut(f64) -> Result<f64>) -> Result<f64> {
    let (mut th1, mut th2) = (0.0, PI);
    let mut residual = f64::INFINITY;

    for _ in 0..MAX_ITERATIONS {
        let thm = 0.5 * (th1 + th2);
        let phi = phase(thm)?;
        residual = phi.abs();
        if residual < PHASE_TOLERANCE {
            break;
        }
        if phi > 0.0 {
            th2 = thm;
        } else {
            th1 = thm;
        }
    }
    Ok(residual)
}
